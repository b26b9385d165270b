use serde::{Deserialize, Serialize};

use crate::lookup::Lookup;

/// What a field holds. Only used for presentation; extraction is driven by
/// `size`, `has_sign` and `offset` alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FieldKind {
    #[default]
    Number,
    Lookup,
    Binary,
    Reserved,
    Spare,
    Pgn,
    Manufacturer,
    Industry,
}

/// A single field of a PGN layout.
///
/// Fields are contiguous on the wire: the bit position of a field is the sum
/// of the sizes of the fields before it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    /// Size in bits, not necessarily a multiple of 8
    pub size: u32,
    #[serde(default)]
    pub has_sign: bool,
    /// J1939 Excess-K offset; zero means two's complement for signed fields
    #[serde(default)]
    pub offset: i32,
    /// Either a physical unit or, when it starts with `=`, the value the field
    /// must hold for the enclosing variant to match
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub resolution: f64,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub kind: FieldKind,
    /// Names for the values of this field
    #[serde(default)]
    pub lookup: Option<Lookup>,
}

impl Field {
    pub fn simple(name: &str, size: u32) -> Self {
        Self {
            name: name.to_string(),
            size,
            has_sign: false,
            offset: 0,
            unit: None,
            resolution: 1.0,
            description: None,
            kind: FieldKind::Number,
            lookup: None,
        }
    }

    pub fn signed(name: &str, size: u32) -> Self {
        Self {
            has_sign: true,
            ..Self::simple(name, size)
        }
    }

    /// Signed field in J1939 offset notation: true value = stored + `offset`
    pub fn excess_k(name: &str, size: u32, offset: i32) -> Self {
        Self {
            has_sign: true,
            offset,
            ..Self::simple(name, size)
        }
    }

    /// Unsigned field that must equal `value` for its variant to be selected
    pub fn matching(name: &str, size: u32, value: i64) -> Self {
        Self {
            unit: Some(format!("={}", value)),
            ..Self::simple(name, size)
        }
    }

    pub fn reserved(size: u32) -> Self {
        Self {
            kind: FieldKind::Reserved,
            ..Self::simple("Reserved", size)
        }
    }

    pub fn spare(size: u32) -> Self {
        Self {
            kind: FieldKind::Spare,
            ..Self::simple("Spare", size)
        }
    }

    pub fn binary(name: &str, size: u32) -> Self {
        Self {
            kind: FieldKind::Binary,
            ..Self::simple(name, size)
        }
    }

    pub fn lookup(name: &str, size: u32, lookup: Lookup) -> Self {
        Self {
            kind: FieldKind::Lookup,
            lookup: Some(lookup),
            ..Self::simple(name, size)
        }
    }

    /// Lookup field that must equal `value` for its variant to be selected
    pub fn matching_lookup(name: &str, size: u32, value: i64, lookup: Lookup) -> Self {
        Self {
            kind: FieldKind::Lookup,
            lookup: Some(lookup),
            ..Self::matching(name, size, value)
        }
    }

    pub fn pgn(name: &str) -> Self {
        Self {
            kind: FieldKind::Pgn,
            ..Self::simple(name, 24)
        }
    }

    pub fn manufacturer() -> Self {
        Self {
            kind: FieldKind::Manufacturer,
            ..Self::simple("Manufacturer Code", 11)
        }
    }

    pub fn industry() -> Self {
        Self {
            kind: FieldKind::Industry,
            lookup: Some(Lookup::IndustryCode),
            ..Self::simple("Industry Code", 3)
        }
    }

    pub fn with_unit(mut self, unit: &str) -> Self {
        self.unit = Some(unit.to_string());
        self
    }

    pub fn with_resolution(mut self, resolution: f64) -> Self {
        self.resolution = resolution;
        self
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    /// The constant this field is pinned to, if its unit is of the form `=N`.
    ///
    /// The number is read like `strtol`: optional sign, then leading decimal
    /// digits; anything unparsable yields 0.
    pub fn fixed_value(&self) -> Option<i64> {
        let rest = self.unit.as_deref()?.strip_prefix('=')?;
        Some(parse_leading_int(rest))
    }

    /// Physical unit for display; `None` for fixed-value constraints.
    pub fn display_unit(&self) -> Option<&str> {
        self.unit.as_deref().filter(|u| !u.starts_with('='))
    }

    /// Marks the end of a field list in loaded definition data.
    pub fn is_terminator(&self) -> bool {
        self.name.is_empty() || self.size == 0
    }
}

fn parse_leading_int(s: &str) -> i64 {
    let s = s.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let value = digits
        .bytes()
        .take_while(u8::is_ascii_digit)
        .fold(0i64, |acc, d| acc.saturating_mul(10).saturating_add(i64::from(d - b'0')));
    if negative { -value } else { value }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_value_from_matching_field() {
        let field = Field::matching("Group Function Code", 8, 16);
        assert_eq!(field.unit.as_deref(), Some("=16"));
        assert_eq!(field.fixed_value(), Some(16));
        assert_eq!(field.display_unit(), None);
    }

    #[test]
    fn test_fixed_value_absent_for_physical_unit() {
        let field = Field::simple("Battery Voltage", 16).with_unit("V");
        assert_eq!(field.fixed_value(), None);
        assert_eq!(field.display_unit(), Some("V"));
    }

    #[test]
    fn test_fixed_value_absent_without_unit() {
        assert_eq!(Field::simple("SID", 8).fixed_value(), None);
    }

    #[test]
    fn test_fixed_value_parses_like_strtol() {
        let mut field = Field::simple("x", 8);
        field.unit = Some("=-12abc".to_string());
        assert_eq!(field.fixed_value(), Some(-12));
        field.unit = Some("= 7".to_string());
        assert_eq!(field.fixed_value(), Some(7));
        field.unit = Some("=garbage".to_string());
        assert_eq!(field.fixed_value(), Some(0));
        field.unit = Some("=".to_string());
        assert_eq!(field.fixed_value(), Some(0));
    }

    #[test]
    fn test_terminator() {
        assert!(Field::simple("", 8).is_terminator());
        assert!(Field::simple("Data", 0).is_terminator());
        assert!(!Field::reserved(2).is_terminator());
    }

    #[test]
    fn test_builders() {
        let field = Field::excess_k("Real Power", 32, -2_000_000_000);
        assert!(field.has_sign);
        assert_eq!(field.offset, -2_000_000_000);

        assert_eq!(Field::pgn("PGN").size, 24);
        assert_eq!(Field::manufacturer().size, 11);
        assert_eq!(Field::industry().kind, FieldKind::Industry);
        assert_eq!(Field::industry().lookup, Some(Lookup::IndustryCode));

        let rts = Field::matching_lookup("Group Function Code", 8, 16, Lookup::IsoCommand);
        assert_eq!(rts.fixed_value(), Some(16));
        assert_eq!(rts.kind, FieldKind::Lookup);
        assert_eq!(Field::reserved(6).name, "Reserved");
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let json = r#"{ "name": "Engine RPM", "size": 16, "resolution": 0.125, "unit": "rpm" }"#;
        let field: Field = serde_json::from_str(json).unwrap();
        assert_eq!(field.name, "Engine RPM");
        assert!(!field.has_sign);
        assert_eq!(field.offset, 0);
        assert_eq!(field.kind, FieldKind::Number);
        assert_eq!(field.display_unit(), Some("rpm"));
        assert!(field.lookup.is_none());
    }

    #[test]
    fn test_deserialize_lookup_reference() {
        let json = r#"{ "name": "Industry Group", "size": 3, "kind": "Lookup", "lookup": "IndustryCode" }"#;
        let field: Field = serde_json::from_str(json).unwrap();
        assert_eq!(field.lookup, Some(Lookup::IndustryCode));
    }
}
