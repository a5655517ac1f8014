/// Durable storage boundary for saved beacons.
///
/// The engine never touches a storage medium itself — hosts implement
/// [`BeaconVault`] over whatever they have (CoreData shim, NVS, a flat
/// file). The crate owns the record wire format so every host vault
/// stores the same NDJSON bytes: one [`BeaconRecord`] per line, id and
/// display name only. Observations are transient and never persisted.
use heapless::Vec;
use serde::{Deserialize, Serialize};

use crate::beacon::{
    format_uuid, parse_uuid, BeaconId, BeaconItem, BeaconObservation, NameString, Proximity,
    UuidString,
};
use crate::defaults::{MAX_SAVED, UNKNOWN_ACCURACY};

/// Failure classes a vault implementation can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VaultError {
    /// Read or write against the storage medium failed
    Io,
    /// Stored data could not be decoded
    Corrupt,
    /// Storage medium has no room for another record
    Full,
}

impl core::fmt::Display for VaultError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            VaultError::Io => f.write_str("storage i/o failed"),
            VaultError::Corrupt => f.write_str("stored record corrupt"),
            VaultError::Full => f.write_str("storage full"),
        }
    }
}

/// Host-provided durable store for saved beacons.
///
/// Calls are blocking and never retried by the engine; a failure is
/// logged, surfaced to the caller, and re-synced by the next
/// `load_saved()` (spelled out in `store.rs`).
pub trait BeaconVault {
    /// Insert or replace the record for the item's id.
    fn insert(&mut self, item: &BeaconItem) -> Result<(), VaultError>;

    /// Delete the record for the given id. Deleting an absent id is Ok.
    fn delete(&mut self, id: &BeaconId) -> Result<(), VaultError>;

    /// Load every stored record, in stored order.
    fn load_all(&mut self) -> Result<Vec<BeaconItem, MAX_SAVED>, VaultError>;
}

/// One persisted beacon: identity plus display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BeaconRecord {
    pub uuid: UuidString,
    pub major: u16,
    pub minor: u16,
    pub name: NameString,
}

impl BeaconRecord {
    pub fn from_item(item: &BeaconItem) -> Self {
        let mut uuid = UuidString::new();
        format_uuid(&item.id().uuid, &mut uuid);
        Self {
            uuid,
            major: item.id().major,
            minor: item.id().minor,
            name: item.name.clone(),
        }
    }

    /// Rebuild an item from a stored record. The observation starts at
    /// the unknown-accuracy sentinel until the next ranging cycle
    /// refreshes it. Returns `None` for an unparseable UUID.
    pub fn to_item(&self) -> Option<BeaconItem> {
        let uuid = parse_uuid(&self.uuid)?;
        Some(BeaconItem::new(
            self.name.clone(),
            BeaconObservation {
                id: BeaconId {
                    uuid,
                    major: self.major,
                    minor: self.minor,
                },
                accuracy: UNKNOWN_ACCURACY,
                rssi: 0,
                proximity: Proximity::Unknown,
            },
        ))
    }
}

/// Serialize a record to JSON bytes with a trailing NDJSON newline.
/// Returns the number of bytes written, or None if it didn't fit.
pub fn encode_record(rec: &BeaconRecord, buf: &mut [u8]) -> Option<usize> {
    match serde_json_core::to_slice(rec, buf) {
        Ok(len) => {
            if len < buf.len() {
                buf[len] = b'\n';
                Some(len + 1)
            } else {
                Some(len)
            }
        }
        Err(_) => None,
    }
}

/// Deserialize a record from one NDJSON line.
pub fn decode_record(data: &[u8]) -> Option<BeaconRecord> {
    let trimmed = crate::wire::trim_trailing_whitespace(data);
    if trimmed.is_empty() {
        return None;
    }
    serde_json_core::from_slice::<BeaconRecord>(trimmed)
        .ok()
        .map(|(rec, _)| rec)
}
