//! Picks the field layout that applies to a payload.
//!
//! NMEA 2000 reuses one PGN number for several message shapes and tells them
//! apart with fixed fields (unit `=N`) inside the payload. The first variant in
//! table order whose fixed fields all hold their pinned value wins; a variant
//! without fixed fields matches anything.

use tracing::trace;

use crate::extract::extract_number;
use crate::field::Field;
use crate::pgn::Pgn;
use crate::table::PgnTable;

/// Position of the next field in a payload, as whole bytes plus a bit offset
/// within the current byte.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct BitCursor {
    pub byte_index: usize,
    pub bit_offset: usize,
}

impl BitCursor {
    /// Whether `bits` more bits are available in a payload of `len` bytes.
    pub fn fits(&self, bits: usize, len: usize) -> bool {
        self.byte_index * 8 + self.bit_offset + bits <= len * 8
    }

    pub fn advance(&mut self, bits: usize) {
        self.bit_offset += bits;
        self.byte_index += self.bit_offset / 8;
        self.bit_offset %= 8;
    }

    pub fn absolute_bit(&self) -> usize {
        self.byte_index * 8 + self.bit_offset
    }
}

/// Outcome of testing one variant against a payload.
#[derive(Debug, PartialEq, Eq)]
enum VariantMatch {
    /// No field is pinned to a value
    Unconstrained,
    Matched,
    Mismatched,
}

fn match_variant(pgn: &Pgn, payload: &[u8]) -> VariantMatch {
    let mut cursor = BitCursor::default();
    let mut has_fixed_field = false;

    for field in pgn.fields.iter().take(pgn.field_count()) {
        if field.is_terminator() {
            break;
        }
        let bits = field.size as usize;

        if let Some(desired) = field.fixed_value() {
            has_fixed_field = true;
            if !fixed_field_matches(field, payload, cursor, desired) {
                return VariantMatch::Mismatched;
            }
        }

        cursor.advance(bits);
    }

    if has_fixed_field {
        VariantMatch::Matched
    } else {
        VariantMatch::Unconstrained
    }
}

fn fixed_field_matches(field: &Field, payload: &[u8], cursor: BitCursor, desired: i64) -> bool {
    let bits = field.size as usize;
    if bits > 64 || !cursor.fits(bits, payload.len()) {
        trace!(
            "Fixed field '{}' at bit {} ({} bits) is outside a {} byte payload",
            field.name,
            cursor.absolute_bit(),
            bits,
            payload.len()
        );
        return false;
    }
    let extracted = extract_number(field, &payload[cursor.byte_index..], cursor.bit_offset, bits);
    extracted.value == desired
}

/// The variant of `pgn` that describes `payload`, or `None` when the PGN is
/// not in `table` or every variant's fixed fields reject the payload.
pub fn resolve<'a>(table: &'a PgnTable, pgn: u32, payload: &[u8]) -> Option<&'a Pgn> {
    let first = table.find_first(pgn)?;
    let end = table.find_run(first);

    for index in first..end {
        let candidate = table.get(index)?;
        match match_variant(candidate, payload) {
            VariantMatch::Unconstrained | VariantMatch::Matched => return Some(candidate),
            VariantMatch::Mismatched => {
                trace!("PGN {} variant '{}' rejected", pgn, candidate.description);
            }
        }
    }
    None
}

impl PgnTable {
    /// See [`resolve`].
    pub fn resolve(&self, pgn: u32, payload: &[u8]) -> Option<&Pgn> {
        resolve(self, pgn, payload)
    }
}
