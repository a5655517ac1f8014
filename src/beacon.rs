/// Core beacon types shared by every layer.
///
/// A beacon's identity is the (UUID, major, minor) triple from its
/// advertisement — never its display name. Observations are transient
/// snapshots replaced wholesale on each ranging cycle; items pair the
/// latest observation with a user-visible name.
///
/// Uses `heapless` types for no_std/no-alloc operation.
use heapless::String;

/// Maximum length for beacon display name strings
pub type NameString = String<32>;

/// Maximum length for UUID strings ("B9407F30-F5F8-466E-AFF9-25556B57FE6D")
pub type UuidString = String<37>;

/// Formatted beacon id strings ("UUID/major/minor") for logs
pub type IdString = String<50>;

/// Composite beacon identity: proximity UUID plus major/minor pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BeaconId {
    pub uuid: [u8; 16],
    pub major: u16,
    pub minor: u16,
}

/// Proximity category as reported by the ranging source.
///
/// Carried verbatim — the engine never derives proximity from accuracy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Proximity {
    Immediate,
    Near,
    Far,
    Unknown,
}

impl Proximity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Proximity::Immediate => "immediate",
            Proximity::Near => "near",
            Proximity::Far => "far",
            Proximity::Unknown => "unknown",
        }
    }

    /// Parse a wire proximity string. Returns `None` for unrecognized input.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "immediate" => Some(Proximity::Immediate),
            "near" => Some(Proximity::Near),
            "far" => Some(Proximity::Far),
            "unknown" => Some(Proximity::Unknown),
            _ => None,
        }
    }
}

/// One ranged snapshot of a physical beacon signal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BeaconObservation {
    pub id: BeaconId,
    /// Estimated distance in meters. Any sign-negative value (including
    /// -0.0) means "unknown, do not use".
    pub accuracy: f32,
    /// Received signal strength in dBm
    pub rssi: i8,
    pub proximity: Proximity,
}

impl BeaconObservation {
    /// Whether the accuracy estimate is usable for threshold decisions.
    pub fn accuracy_known(&self) -> bool {
        !self.accuracy.is_sign_negative()
    }
}

/// A named, addressable beacon known to the application.
#[derive(Debug, Clone, PartialEq)]
pub struct BeaconItem {
    /// User-assigned display name, or a default placeholder
    pub name: NameString,
    /// Latest observation, refreshed every reconciliation cycle
    pub observation: BeaconObservation,
}

impl BeaconItem {
    pub fn new(name: NameString, observation: BeaconObservation) -> Self {
        Self { name, observation }
    }

    /// Identity is the underlying observation's composite key.
    pub fn id(&self) -> &BeaconId {
        &self.observation.id
    }
}

/// Build a display name, clipping to capacity on a char boundary.
pub fn name_from(s: &str) -> NameString {
    let mut name = NameString::new();
    let max = name.capacity();
    let clipped = if s.len() <= max {
        s
    } else {
        let mut end = max;
        while end > 0 && !s.is_char_boundary(end) {
            end -= 1;
        }
        &s[..end]
    };
    let _ = name.push_str(clipped);
    name
}

/// Parse a UUID string (hyphenated or bare hex) into 16 bytes.
pub fn parse_uuid(s: &str) -> Option<[u8; 16]> {
    let mut out = [0u8; 16];
    let mut nibbles = 0usize;
    for c in s.chars() {
        if c == '-' {
            continue;
        }
        let v = c.to_digit(16)? as u8;
        if nibbles >= 32 {
            return None;
        }
        out[nibbles / 2] = (out[nibbles / 2] << 4) | v;
        nibbles += 1;
    }
    if nibbles == 32 {
        Some(out)
    } else {
        None
    }
}

/// Format 16 UUID bytes into the canonical uppercase 8-4-4-4-12 string.
pub fn format_uuid(uuid: &[u8; 16], buf: &mut UuidString) {
    use core::fmt::Write;
    for (i, b) in uuid.iter().enumerate() {
        if i == 4 || i == 6 || i == 8 || i == 10 {
            let _ = buf.push('-');
        }
        let _ = write!(buf, "{:02X}", b);
    }
}

/// Format a full beacon id as "UUID/major/minor" for log lines.
pub fn format_id(id: &BeaconId, buf: &mut IdString) {
    use core::fmt::Write;
    let mut uuid = UuidString::new();
    format_uuid(&id.uuid, &mut uuid);
    let _ = write!(buf, "{}/{}/{}", uuid, id.major, id.minor);
}
