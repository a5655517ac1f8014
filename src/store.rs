/// Beacon reconciliation store — the engine core.
///
/// Two bounded collections of [`BeaconItem`]: `saved` (user-curated,
/// persisted through the vault) and `available` (detected this session,
/// never persisted). A key lives in at most one collection at a time.
///
/// Every call is synchronous and bounded by the batch size. The store is
/// driven from the host's ranging callback context, one callback at a
/// time, so no internal locking is needed — but calls must be safe to
/// repeat in quick succession, which they are (no blocking I/O beyond
/// the vault delegation on promote/remove).
use heapless::Vec;
use log::{error, warn};

use crate::beacon::{format_id, name_from, BeaconId, BeaconItem, BeaconObservation, IdString};
use crate::defaults::{self, MAX_AVAILABLE, MAX_SAVED, SAVE_ACCURACY_THRESHOLD};
use crate::vault::{BeaconVault, VaultError};

/// Notification sink for store changes, injected at construction.
///
/// `beacon_detected` carries no payload — the listener re-reads
/// `available()`. `save_candidate` carries the specific item whose
/// accuracy crossed the save threshold.
pub trait StoreListener {
    fn beacon_detected(&mut self);
    fn save_candidate(&mut self, item: &BeaconItem);
}

/// Failures surfaced by store operations. None is fatal; in-memory
/// state is never corrupted by a failed call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreError {
    /// The referenced key or index is not present
    NotFound,
    /// The target collection is at capacity
    Capacity,
    /// The durable store reported a failure. For promote/remove the
    /// in-memory change has already been applied (best-effort
    /// persistence); `load_saved()` re-syncs on next start.
    Vault(VaultError),
}

impl core::fmt::Display for StoreError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            StoreError::NotFound => f.write_str("beacon not found"),
            StoreError::Capacity => f.write_str("collection full"),
            StoreError::Vault(e) => write!(f, "vault: {}", e),
        }
    }
}

impl From<VaultError> for StoreError {
    fn from(e: VaultError) -> Self {
        StoreError::Vault(e)
    }
}

/// The reconciliation store. Owns its collaborators: a [`BeaconVault`]
/// for durable records and a [`StoreListener`] for change events.
pub struct BeaconStore<V, L> {
    saved: Vec<BeaconItem, MAX_SAVED>,
    available: Vec<BeaconItem, MAX_AVAILABLE>,
    vault: V,
    listener: L,
}

impl<V: BeaconVault, L: StoreListener> BeaconStore<V, L> {
    pub fn new(vault: V, listener: L) -> Self {
        Self {
            saved: Vec::new(),
            available: Vec::new(),
            vault,
            listener,
        }
    }

    // ── Ingestion ───────────────────────────────────────────────────

    /// Merge one ranging batch into the collections.
    ///
    /// Per observation: a key already in `saved` or `available` gets its
    /// observation replaced in place (latest wins — the last occurrence
    /// of a key within the batch sticks). An unseen key becomes a new
    /// `available` item with a placeholder name and fires one
    /// `beacon_detected` notification. Items absent from the batch are
    /// left untouched; there is no staleness eviction here.
    ///
    /// `saved` is matched first, so a saved key can never re-enter
    /// `available` through reconciliation.
    pub fn reconcile(&mut self, batch: &[BeaconObservation]) {
        for obs in batch {
            if let Some(item) = self.saved.iter_mut().find(|i| i.observation.id == obs.id) {
                item.observation = *obs;
                continue;
            }
            if let Some(item) = self
                .available
                .iter_mut()
                .find(|i| i.observation.id == obs.id)
            {
                item.observation = *obs;
                continue;
            }

            let name = defaults::default_name_for(&obs.id.uuid);
            if self.available.push(BeaconItem::new(name, *obs)).is_err() {
                let mut id = IdString::new();
                format_id(&obs.id, &mut id);
                warn!("available list full, dropping discovery {}", id);
                continue;
            }
            self.listener.beacon_detected();
        }
    }

    /// Emit a `save_candidate` notification for every `available` item
    /// whose accuracy is known and below the save threshold. `saved`
    /// items are never inspected. No de-duplication across calls — the
    /// listener handles idempotence (e.g. prompt once per key).
    ///
    /// Returns the number of candidates emitted.
    pub fn save_candidate_scan(&mut self) -> usize {
        let mut count = 0;
        for item in &self.available {
            let obs = &item.observation;
            if obs.accuracy_known() && obs.accuracy < SAVE_ACCURACY_THRESHOLD {
                self.listener.save_candidate(item);
                count += 1;
            }
        }
        count
    }

    // ── Promotion / removal ─────────────────────────────────────────

    /// Move an `available` item into `saved` and persist it.
    ///
    /// Missing key → `NotFound`, no mutation. `saved` at capacity →
    /// `Capacity`, item stays in `available` at its position. A vault
    /// write failure is logged and surfaced with the in-memory move
    /// already applied.
    pub fn promote(&mut self, id: &BeaconId) -> Result<(), StoreError> {
        let pos = self
            .available
            .iter()
            .position(|i| i.id() == id)
            .ok_or(StoreError::NotFound)?;

        let item = self.available.remove(pos);
        if let Err(item) = self.saved.push(item) {
            let _ = self.available.insert(pos, item);
            warn!("saved list full, promotion refused");
            return Err(StoreError::Capacity);
        }

        if let Some(stored) = self.saved.last() {
            if let Err(e) = self.vault.insert(stored) {
                error!("vault insert failed: {}", e);
                return Err(StoreError::Vault(e));
            }
        }
        Ok(())
    }

    /// Remove a saved beacon by key. Vault delete runs first; a vault
    /// failure is logged, the in-memory removal still proceeds, and the
    /// error is surfaced.
    pub fn remove_saved(&mut self, id: &BeaconId) -> Result<(), StoreError> {
        let pos = self
            .saved
            .iter()
            .position(|i| i.id() == id)
            .ok_or(StoreError::NotFound)?;
        self.remove_saved_at(pos)
    }

    /// Remove a saved beacon by row index. Out-of-range → `NotFound`.
    pub fn remove_saved_at(&mut self, index: usize) -> Result<(), StoreError> {
        if index >= self.saved.len() {
            return Err(StoreError::NotFound);
        }
        let id = *self.saved[index].id();
        let vault_result = self.vault.delete(&id);
        self.saved.remove(index);
        if let Err(e) = vault_result {
            error!("vault delete failed: {}", e);
            return Err(StoreError::Vault(e));
        }
        Ok(())
    }

    /// Set the user-assigned display name of a saved beacon and update
    /// its durable record. Names longer than the cap are clipped.
    pub fn rename_saved(&mut self, id: &BeaconId, name: &str) -> Result<(), StoreError> {
        let pos = self
            .saved
            .iter()
            .position(|i| i.id() == id)
            .ok_or(StoreError::NotFound)?;
        self.saved[pos].name = name_from(name);
        if let Err(e) = self.vault.insert(&self.saved[pos]) {
            error!("vault insert failed: {}", e);
            return Err(StoreError::Vault(e));
        }
        Ok(())
    }

    // ── Startup ─────────────────────────────────────────────────────

    /// Replace `saved` with the vault contents. First occurrence wins
    /// on duplicate keys in the vault; any `available` entry whose key
    /// now appears in `saved` is dropped to restore disjointness.
    pub fn load_saved(&mut self) -> Result<(), StoreError> {
        let loaded = match self.vault.load_all() {
            Ok(items) => items,
            Err(e) => {
                error!("vault load failed: {}", e);
                return Err(StoreError::Vault(e));
            }
        };

        self.saved.clear();
        for item in loaded {
            if self.saved.iter().any(|i| i.id() == item.id()) {
                continue;
            }
            let _ = self.saved.push(item);
        }

        let saved = &self.saved;
        self.available
            .retain(|i| !saved.iter().any(|s| s.id() == i.id()));
        Ok(())
    }

    // ── Ranging source failure hooks ────────────────────────────────

    /// The ranging source failed to range a region. Logged only; the
    /// collections keep their last state.
    pub fn ranging_failed(&self, reason: &str) {
        warn!("ranging failed: {}", reason);
    }

    /// The ranging source failed to monitor a region. Logged only.
    pub fn monitoring_failed(&self, reason: &str) {
        warn!("region monitoring failed: {}", reason);
    }

    // ── Accessors (UI tables index by row) ──────────────────────────

    pub fn saved(&self) -> &[BeaconItem] {
        &self.saved
    }

    pub fn available(&self) -> &[BeaconItem] {
        &self.available
    }

    pub fn saved_len(&self) -> usize {
        self.saved.len()
    }

    pub fn available_len(&self) -> usize {
        self.available.len()
    }

    pub fn get_saved(&self, index: usize) -> Option<&BeaconItem> {
        self.saved.get(index)
    }

    pub fn get_available(&self, index: usize) -> Option<&BeaconItem> {
        self.available.get(index)
    }

    pub fn vault(&self) -> &V {
        &self.vault
    }
}
