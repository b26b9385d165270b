use serde::{Deserialize, Serialize};
use std::fmt;

use crate::field::Field;

/// How a PGN travels on the bus. Informational only: reassembly happens
/// before a payload reaches this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PacketType {
    #[default]
    Single,
    Fast,
    IsoTp,
    Mixed,
}

impl fmt::Display for PacketType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            PacketType::Single => "Single",
            PacketType::Fast => "Fast",
            PacketType::IsoTp => "ISO",
            PacketType::Mixed => "Mixed",
        };
        write!(f, "{}", s)
    }
}

/// One field layout for a PGN number.
///
/// Several variants may share a number; they are told apart by their fixed
/// fields (see [`Field::fixed_value`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pgn {
    pub pgn: u32,
    pub description: String,
    #[serde(default)]
    pub packet_type: PacketType,
    pub fields: Vec<Field>,
    /// Catch-all definition for a PGN range rather than a specific message
    #[serde(default)]
    pub fallback: bool,
}

impl Pgn {
    pub fn new(pgn: u32, description: &str) -> Self {
        Self {
            pgn,
            description: description.to_string(),
            packet_type: PacketType::Single,
            fields: Vec::new(),
            fallback: false,
        }
    }

    pub fn packet_type(mut self, packet_type: PacketType) -> Self {
        self.packet_type = packet_type;
        self
    }

    pub fn field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    pub fn fields(mut self, fields: impl IntoIterator<Item = Field>) -> Self {
        self.fields.extend(fields);
        self
    }

    pub fn fallback(mut self) -> Self {
        self.fallback = true;
        self
    }

    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// Fields up to (not including) the first terminator.
    pub fn active_fields(&self) -> &[Field] {
        let end = self
            .fields
            .iter()
            .position(Field::is_terminator)
            .unwrap_or(self.fields.len());
        &self.fields[..end]
    }

    /// True when at least one field pins a value, i.e. this is one of several
    /// variants selected by payload content.
    pub fn has_match_fields(&self) -> bool {
        self.active_fields().iter().any(|f| f.fixed_value().is_some())
    }

    /// Bit offset of field `index` from the start of the payload.
    pub fn field_bit_offset(&self, index: usize) -> Option<usize> {
        let fields = self.active_fields();
        if index >= fields.len() {
            return None;
        }
        Some(fields[..index].iter().map(|f| f.size as usize).sum())
    }
}

/// Multi-line layout listing, one line per field with its bit offset.
impl fmt::Display for Pgn {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "PGN {} {} ({})", self.pgn, self.description, self.packet_type)?;
        if self.fallback {
            write!(f, " [range]")?;
        }
        let mut bit = 0;
        for field in self.active_fields() {
            write!(f, "\n  {:>5} {:>5}  {}", bit, field.size, field.name)?;
            if let Some(unit) = &field.unit {
                write!(f, " [{}]", unit)?;
            }
            if let Some(lookup) = field.lookup {
                write!(f, " <{:?}>", lookup)?;
            }
            if let Some(description) = &field.description {
                write!(f, ": {}", description)?;
            }
            bit += field.size;
        }
        Ok(())
    }
}
