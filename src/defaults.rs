/// Compiled-in defaults: capacities, thresholds, and the vendor UUID table.
///
/// Vendor entries are the factory-default proximity UUIDs that common
/// iBeacon hardware ships with. A freshly discovered beacon whose UUID is
/// in the table gets the vendor name as its placeholder instead of
/// "Unknown"; a user rename replaces either.
use crate::beacon::{name_from, NameString};

/// Placeholder display name for beacons with an unrecognized UUID
pub const DEFAULT_BEACON_NAME: &str = "Unknown";

/// Accuracy (meters) below which an `available` beacon becomes a
/// save candidate. Effectively "phone is touching the beacon".
pub const SAVE_ACCURACY_THRESHOLD: f32 = 0.02;

/// Accuracy sentinel for items with no usable ranging data yet
/// (e.g. restored from the vault before the first ranging cycle).
pub const UNKNOWN_ACCURACY: f32 = -1.0;

/// Maximum number of saved (persisted) beacons
pub const MAX_SAVED: usize = 32;

/// Maximum number of transient available beacons tracked at once
pub const MAX_AVAILABLE: usize = 32;

/// Factory-default proximity UUIDs (16 bytes, vendor name).
pub static VENDOR_UUIDS: &[([u8; 16], &str)] = &[
    // B9407F30-F5F8-466E-AFF9-25556B57FE6D
    (
        [
            0xB9, 0x40, 0x7F, 0x30, 0xF5, 0xF8, 0x46, 0x6E, 0xAF, 0xF9, 0x25, 0x55, 0x6B, 0x57,
            0xFE, 0x6D,
        ],
        "Estimote",
    ),
    // F7826DA6-4FA2-4E98-8024-BC5B71E0893E
    (
        [
            0xF7, 0x82, 0x6D, 0xA6, 0x4F, 0xA2, 0x4E, 0x98, 0x80, 0x24, 0xBC, 0x5B, 0x71, 0xE0,
            0x89, 0x3E,
        ],
        "Kontakt.io",
    ),
    // 2F234454-CF6D-4A0F-ADF2-F4911BA9FFA6
    (
        [
            0x2F, 0x23, 0x44, 0x54, 0xCF, 0x6D, 0x4A, 0x0F, 0xAD, 0xF2, 0xF4, 0x91, 0x1B, 0xA9,
            0xFF, 0xA6,
        ],
        "Radius Networks",
    ),
    // E2C56DB5-DFFB-48D2-B060-D0F5A71096E0
    (
        [
            0xE2, 0xC5, 0x6D, 0xB5, 0xDF, 0xFB, 0x48, 0xD2, 0xB0, 0x60, 0xD0, 0xF5, 0xA7, 0x10,
            0x96, 0xE0,
        ],
        "Apple AirLocate",
    ),
    // AB8190D5-D11E-4941-ACC4-42F30510B408
    (
        [
            0xAB, 0x81, 0x90, 0xD5, 0xD1, 0x1E, 0x49, 0x41, 0xAC, 0xC4, 0x42, 0xF3, 0x05, 0x10,
            0xB4, 0x08,
        ],
        "AprilBeacon",
    ),
    // 74278BDA-B644-4520-8F0C-720EAF059935
    (
        [
            0x74, 0x27, 0x8B, 0xDA, 0xB6, 0x44, 0x45, 0x20, 0x8F, 0x0C, 0x72, 0x0E, 0xAF, 0x05,
            0x99, 0x35,
        ],
        "Glimworm",
    ),
    // 61687109-905F-4436-91F8-E602F514C96D
    (
        [
            0x61, 0x68, 0x71, 0x09, 0x90, 0x5F, 0x44, 0x36, 0x91, 0xF8, 0xE6, 0x02, 0xF5, 0x14,
            0xC9, 0x6D,
        ],
        "BlueCats",
    ),
    // 8DEEFBB9-F738-4297-8040-96668BB44281
    (
        [
            0x8D, 0xEE, 0xFB, 0xB9, 0xF7, 0x38, 0x42, 0x97, 0x80, 0x40, 0x96, 0x66, 0x8B, 0xB4,
            0x42, 0x81,
        ],
        "Roximity",
    ),
    // 92AB49BE-4127-42F4-B532-90FAF1E26491
    (
        [
            0x92, 0xAB, 0x49, 0xBE, 0x41, 0x27, 0x42, 0xF4, 0xB5, 0x32, 0x90, 0xFA, 0xF1, 0xE2,
            0x64, 0x91,
        ],
        "Twocanoes",
    ),
    // A0B13730-3A9A-11E3-AA6E-0800200C9A66
    (
        [
            0xA0, 0xB1, 0x37, 0x30, 0x3A, 0x9A, 0x11, 0xE3, 0xAA, 0x6E, 0x08, 0x00, 0x20, 0x0C,
            0x9A, 0x66,
        ],
        "Bluesense",
    ),
];

/// Look up the vendor name for a factory-default UUID.
pub fn vendor_for_uuid(uuid: &[u8; 16]) -> Option<&'static str> {
    for &(ref known, vendor) in VENDOR_UUIDS {
        if uuid == known {
            return Some(vendor);
        }
    }
    None
}

/// Placeholder name for a newly discovered beacon.
pub fn default_name_for(uuid: &[u8; 16]) -> NameString {
    name_from(vendor_for_uuid(uuid).unwrap_or(DEFAULT_BEACON_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::beacon::parse_uuid;

    #[test]
    fn vendor_lookup_hit() {
        let estimote = parse_uuid("B9407F30-F5F8-466E-AFF9-25556B57FE6D").unwrap();
        assert_eq!(vendor_for_uuid(&estimote), Some("Estimote"));
    }

    #[test]
    fn vendor_lookup_miss() {
        let unknown = [0u8; 16];
        assert_eq!(vendor_for_uuid(&unknown), None);
    }

    #[test]
    fn default_name_uses_vendor_when_known() {
        let kontakt = parse_uuid("F7826DA6-4FA2-4E98-8024-BC5B71E0893E").unwrap();
        assert_eq!(default_name_for(&kontakt).as_str(), "Kontakt.io");
    }

    #[test]
    fn default_name_falls_back_to_placeholder() {
        assert_eq!(default_name_for(&[0xFFu8; 16]).as_str(), "Unknown");
    }

    #[test]
    fn vendor_table_entries_unique() {
        for (i, (uuid_a, _)) in VENDOR_UUIDS.iter().enumerate() {
            for (uuid_b, _) in &VENDOR_UUIDS[i + 1..] {
                assert_ne!(uuid_a, uuid_b);
            }
        }
    }

    #[test]
    fn unknown_accuracy_is_sign_negative() {
        assert!(UNKNOWN_ACCURACY.is_sign_negative());
    }
}
