use std::fmt;

use crate::extract::{Extracted, extract_number, low_mask};
use crate::field::{Field, FieldKind};
use crate::lookup::Lookup;
use crate::pgn::Pgn;
use crate::resolver::BitCursor;
use crate::table::PgnTable;

fn format_data_bytes(data: &[u8]) -> String {
    data.iter()
        .map(|b| format!("{:02X}", b))
        .collect::<Vec<_>>()
        .join(" ")
}

/// One field of a decoded payload.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedField {
    pub name: String,
    pub kind: FieldKind,
    pub unit: Option<String>,
    /// Offset of the first bit from the start of the payload
    pub bit_offset: usize,
    pub bits: usize,
    /// Raw extraction result; `None` for fields wider than 64 bits or
    /// running past the end of the payload
    pub extracted: Option<Extracted>,
    /// Extracted value times the field resolution; `None` when the field is
    /// missing or holds the "not available" pattern
    pub value: Option<f64>,
    /// Payload bytes covering a field that is too wide to be a number
    pub bytes: Vec<u8>,
    /// Name of the value for lookup fields
    pub lookup_name: Option<&'static str>,
}

impl DecodedField {
    fn decode(field: &Field, payload: &[u8], cursor: BitCursor) -> Self {
        let bits = field.size as usize;
        let mut decoded = DecodedField {
            name: field.name.clone(),
            kind: field.kind,
            unit: field.display_unit().map(str::to_string),
            bit_offset: cursor.absolute_bit(),
            bits,
            extracted: None,
            value: None,
            bytes: Vec::new(),
            lookup_name: None,
        };

        if bits > 64 {
            let start = cursor.byte_index.min(payload.len());
            let end = (cursor.absolute_bit() + bits).div_ceil(8).min(payload.len());
            decoded.bytes = payload[start..end].to_vec();
            return decoded;
        }
        if !cursor.fits(bits, payload.len()) {
            return decoded;
        }

        let extracted = extract_number(field, &payload[cursor.byte_index..], cursor.bit_offset, bits);
        decoded.extracted = Some(extracted);
        if !is_unavailable(field, &extracted, bits) {
            let resolution = if field.resolution == 0.0 { 1.0 } else { field.resolution };
            let number = if field.has_sign {
                extracted.value as f64
            } else {
                extracted.value as u64 as f64
            };
            decoded.value = Some(number * resolution);
        }
        decoded
    }

    pub fn is_available(&self) -> bool {
        self.value.is_some()
    }
}

/// All ones marks "data not available" for plain numbers; for two's
/// complement fields it is the positive maximum instead.
fn is_unavailable(field: &Field, extracted: &Extracted, bits: usize) -> bool {
    if field.kind != FieldKind::Number || bits < 2 || field.fixed_value().is_some() {
        return false;
    }
    if field.has_sign && field.offset == 0 {
        extracted.value as u64 == extracted.max_value
    } else {
        extracted.raw == low_mask(bits)
    }
}

/// A payload decoded with a resolved PGN definition.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedMessage {
    pub pgn: u32,
    pub description: String,
    /// Decoded with a catch-all range definition, i.e. the PGN itself is unknown
    pub fallback: bool,
    pub fields: Vec<DecodedField>,
}

impl DecodedMessage {
    /// Decodes every field of `definition`. Fields past the end of `payload`
    /// are kept, without a value.
    pub fn decode(pgn: u32, definition: &Pgn, payload: &[u8]) -> Self {
        let mut cursor = BitCursor::default();
        let mut fields = Vec::with_capacity(definition.field_count());
        for field in definition.active_fields() {
            fields.push(DecodedField::decode(field, payload, cursor));
            cursor.advance(field.size as usize);
        }
        name_lookup_values(definition.active_fields(), &mut fields);
        Self {
            pgn,
            description: definition.description.clone(),
            fallback: definition.fallback,
            fields,
        }
    }

    pub fn field(&self, name: &str) -> Option<&DecodedField> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// Device functions are named per device class, which may come later in the
/// payload, so names are filled in once every field is decoded.
fn name_lookup_values(definitions: &[Field], fields: &mut [DecodedField]) {
    let raw_of = |field: &DecodedField| field.extracted.map(|e| e.raw as u32);
    let class = definitions
        .iter()
        .zip(fields.iter())
        .find(|(def, _)| def.lookup == Some(Lookup::DeviceClass))
        .and_then(|(_, decoded)| raw_of(decoded));

    for (def, decoded) in definitions.iter().zip(fields.iter_mut()) {
        if let (Some(lookup), Some(raw)) = (def.lookup, raw_of(decoded)) {
            decoded.lookup_name = lookup.name(raw, class);
        }
    }
}

/// Any message after PGN resolution
#[derive(Debug, Clone, PartialEq)]
pub enum N2kMessage {
    Decoded(DecodedMessage),
    /// Known PGN, but no variant accepts the payload
    NoMatch(u32, Vec<u8>),
    Unknown(u32, Vec<u8>),
}

impl N2kMessage {
    /// Resolves and decodes a complete payload. PGNs missing from the table
    /// are decoded with the catch-all definition of their range, if any.
    pub fn from_payload(table: &PgnTable, pgn: u32, data: &[u8]) -> Self {
        if let Some(definition) = table.resolve(pgn, data) {
            return N2kMessage::Decoded(DecodedMessage::decode(pgn, definition, data));
        }
        if table.find_first(pgn).is_some() {
            return N2kMessage::NoMatch(pgn, data.to_vec());
        }
        match table.fallback_for(pgn) {
            Some(definition) => N2kMessage::Decoded(DecodedMessage::decode(pgn, definition, data)),
            None => N2kMessage::Unknown(pgn, data.to_vec()),
        }
    }

    pub fn pgn(&self) -> u32 {
        match self {
            N2kMessage::Decoded(msg) => msg.pgn,
            N2kMessage::NoMatch(pgn, _) | N2kMessage::Unknown(pgn, _) => *pgn,
        }
    }

    /// True when a specific (non catch-all) definition was found.
    pub fn is_known(&self) -> bool {
        matches!(self, N2kMessage::Decoded(msg) if !msg.fallback)
    }
}

/// A decoded message together with its CAN header fields
#[derive(Debug, Clone, PartialEq)]
pub struct N2kFrame {
    pub priority: u8,
    pub source: u8,
    pub destination: u8,
    pub message: N2kMessage,
}

impl N2kFrame {
    pub fn decode(table: &PgnTable, priority: u8, pgn: u32, source: u8, destination: u8, data: &[u8]) -> Self {
        Self {
            priority,
            source,
            destination,
            message: N2kMessage::from_payload(table, pgn, data),
        }
    }

    pub fn pgn(&self) -> u32 {
        self.message.pgn()
    }
}

impl fmt::Display for DecodedField {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} = ", self.name)?;
        if !self.bytes.is_empty() {
            return write!(f, "{}", format_data_bytes(&self.bytes));
        }
        match (self.extracted, self.value) {
            (None, _) => write!(f, "missing"),
            (Some(_), None) => write!(f, "N/A"),
            (Some(extracted), Some(value)) => {
                match self.kind {
                    FieldKind::Binary => write!(f, "{:#x}", extracted.raw)?,
                    _ if value.fract() == 0.0 => write!(f, "{}", value)?,
                    _ => write!(f, "{:.3}", value)?,
                }
                if let Some(name) = self.lookup_name {
                    write!(f, " ({})", name)?;
                }
                if let Some(unit) = &self.unit {
                    write!(f, " {}", unit)?;
                }
                Ok(())
            }
        }
    }
}

impl fmt::Display for DecodedMessage {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} ({}):", self.description, self.pgn)?;
        let visible = self
            .fields
            .iter()
            .filter(|field| !matches!(field.kind, FieldKind::Reserved | FieldKind::Spare));
        for (i, field) in visible.enumerate() {
            let sep = if i == 0 { " " } else { "; " };
            write!(f, "{}{}", sep, field)?;
        }
        Ok(())
    }
}

impl fmt::Display for N2kMessage {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            N2kMessage::Decoded(msg) => write!(f, "{}", msg),
            N2kMessage::NoMatch(pgn, data) => {
                write!(f, "PGN {} (no matching variant): [{}]", pgn, format_data_bytes(data))
            }
            N2kMessage::Unknown(pgn, data) => {
                write!(f, "Unknown PGN {}: [{}]", pgn, format_data_bytes(data))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn builtin(pgn: u32, data: &[u8]) -> N2kMessage {
        N2kMessage::from_payload(PgnTable::builtin(), pgn, data)
    }

    fn decoded(message: N2kMessage) -> DecodedMessage {
        match message {
            N2kMessage::Decoded(msg) => msg,
            other => panic!("expected decoded message, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_engine_rpm() {
        // 1500 rpm = 12000 * 0.125
        let rpm = 12000u16.to_le_bytes();
        let data = [0xFF, 0xFF, 0xFF, rpm[0], rpm[1], 0xFF, 0xFF, 0xFF];
        let msg = decoded(builtin(61444, &data));
        assert_eq!(msg.description, "ECU #1");
        let field = msg.field("Engine RPM").unwrap();
        assert_relative_eq!(field.value.unwrap(), 1500.0);
        assert_eq!(field.unit.as_deref(), Some("rpm"));
        assert_eq!(field.bit_offset, 24);
    }

    #[test]
    fn test_decode_not_available() {
        let data = [0xFF; 8];
        let msg = decoded(builtin(61444, &data));
        let field = msg.field("Engine RPM").unwrap();
        assert!(!field.is_available());
        assert_eq!(field.extracted.unwrap().raw, 0xFFFF);
        assert!(msg.to_string().contains("Engine RPM = N/A"));
    }

    #[test]
    fn test_decode_excess_k_power() {
        // 2_000_001_500 stored = 1500 W
        let real = 2_000_001_500u32.to_le_bytes();
        let apparent = 1_999_999_000u32.to_le_bytes();
        let mut data = Vec::new();
        data.extend_from_slice(&real);
        data.extend_from_slice(&apparent);
        let msg = decoded(builtin(65029, &data));
        assert_relative_eq!(msg.field("Real Power").unwrap().value.unwrap(), 1500.0);
        assert_relative_eq!(msg.field("Apparent Power").unwrap().value.unwrap(), -1000.0);
    }

    #[test]
    fn test_decode_coolant_temperature_offset() {
        let msg = decoded(builtin(65262, &[100]));
        assert_relative_eq!(msg.field("Engine Coolant Temp").unwrap().value.unwrap(), 333.0);
    }

    #[test]
    fn test_decode_bit_fields_address_claim() {
        // Unique number 0x12345, manufacturer 137, instance lower 2, upper 5
        let name: u64 = 0x12345 | (137 << 21) | (2 << 32) | (5 << 35) | (130 << 40);
        let msg = decoded(builtin(60928, &name.to_le_bytes()));
        assert_eq!(msg.field("Unique Number").unwrap().value, Some(f64::from(0x12345)));
        assert_eq!(msg.field("Manufacturer Code").unwrap().value, Some(137.0));
        assert_eq!(msg.field("Device Instance Lower").unwrap().value, Some(2.0));
        assert_eq!(msg.field("Device Instance Upper").unwrap().value, Some(5.0));
        assert_eq!(msg.field("Device Function").unwrap().value, Some(130.0));
    }

    #[test]
    fn test_decode_transport_variant() {
        let data = [16, 0x2C, 0x01, 43, 0xFF, 0x00, 0xEF, 0x01];
        let msg = decoded(builtin(60416, &data));
        assert!(msg.description.ends_with("Request To Send"));
        assert_eq!(msg.field("Message size").unwrap().value, Some(300.0));
        assert_eq!(msg.field("PGN").unwrap().value, Some(f64::from(0x1EF00)));
        assert!(msg.field("Group Function Code").unwrap().unit.is_none());
        assert!(msg.to_string().contains("Group Function Code = 16 (RTS)"));
    }

    #[test]
    fn test_lookup_names_in_address_claim() {
        // Function 140 in class 50 (Propulsion) is an engine; industry group 4
        let name: u64 = 0x12345 | (140 << 40) | (50 << 49) | (4 << 60);
        let msg = decoded(builtin(60928, &name.to_le_bytes()));
        assert_eq!(msg.field("Industry Group").unwrap().lookup_name, Some("Marine"));
        assert_eq!(msg.field("Device Class").unwrap().lookup_name, Some("Propulsion"));
        assert_eq!(msg.field("Device Function").unwrap().lookup_name, Some("Engine"));

        let text = msg.to_string();
        assert!(text.contains("Industry Group = 4 (Marine)"));
        assert!(text.contains("Device Function = 140 (Engine)"));
        assert!(!text.contains("Unique Number = 74565 ("));
    }

    #[test]
    fn test_unnamed_lookup_value_prints_number_only() {
        let msg = decoded(builtin(59392, &[7, 0, 0xFF, 0xFF, 0xFF, 0x00, 0xEE, 0x00]));
        let control = msg.field("Control").unwrap();
        assert_eq!(control.lookup_name, None);
        assert!(msg.to_string().contains("Control = 7;"));
    }

    #[test]
    fn test_short_payload_marks_fields_missing() {
        let msg = decoded(builtin(61444, &[0xFF, 0xFF, 0xFF, 0x10]));
        let field = msg.field("Engine RPM").unwrap();
        assert!(field.extracted.is_none());
        assert!(msg.to_string().contains("Engine RPM = missing"));
    }

    #[test]
    fn test_no_match() {
        let message = builtin(60416, &[18, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(message, N2kMessage::NoMatch(60416, vec![18, 0, 0, 0, 0, 0, 0, 0]));
        assert!(!message.is_known());
        assert!(message.to_string().contains("no matching variant"));
    }

    #[test]
    fn test_unknown_pgn_uses_range_fallback() {
        let msg = decoded(builtin(65100, &[0x89, 0x98, 1, 2, 3, 4, 5, 6]));
        assert!(msg.fallback);
        assert_eq!(msg.pgn, 65100);
        assert_eq!(msg.field("Manufacturer Code").unwrap().value, Some(137.0));
        assert_eq!(msg.field("Industry Code").unwrap().value, Some(4.0));
    }

    #[test]
    fn test_wide_binary_field_keeps_bytes() {
        let msg = decoded(builtin(130900, &[1, 2, 3]));
        let data = msg.field("Data").unwrap();
        assert_eq!(data.bytes, vec![1, 2, 3]);
        assert!(msg.to_string().contains("Data = 01 02 03"));
    }

    #[test]
    fn test_unknown_pgn() {
        let message = builtin(0xFFFFFF, &[0xAB, 0xCD]);
        assert_eq!(message.pgn(), 0xFFFFFF);
        assert_eq!(message.to_string(), "Unknown PGN 16777215: [AB CD]");
    }

    #[test]
    fn test_frame_keeps_header() {
        let frame = N2kFrame::decode(PgnTable::builtin(), 6, 65262, 0x23, 255, &[120]);
        assert_eq!(frame.pgn(), 65262);
        assert_eq!((frame.priority, frame.source, frame.destination), (6, 0x23, 255));
        assert!(frame.message.is_known());
    }

    #[test]
    fn test_display_skips_reserved() {
        let msg = decoded(builtin(65271, &[0, 0, 0, 0, 0x10, 0x01]));
        let text = msg.to_string();
        assert!(!text.contains("Reserved"));
        assert!(text.starts_with("Vehicle Electrical Power (65271):"));
        assert!(text.contains("Battery Voltage = 13.600 V"));
    }
}
