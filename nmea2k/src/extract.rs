//! Bit-field extraction.
//!
//! NMEA 2000 payloads are little endian at the byte level. Fields that are not
//! byte aligned are packed LSB first: when a 2 bit field `A` is followed by a 6
//! bit field `B`, `A` occupies mask `0b0000_0011` and `B` mask `0b1111_1100`.
//! A 16 bit field starting at bit 2 therefore looks like this:
//!
//! ```text
//! byte 0     byte 1     byte 2
//! 0bxxxxxx.. 0bxxxxxxxx 0b......xx
//!   543210     dcba9876         fe
//! ```
//!
//! so the bits of every byte are masked and shifted individually rather than
//! shifted out of a running accumulator.

use crate::field::Field;

/// The result of extracting one numeric field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Extracted {
    /// Decoded value: sign extended or offset adjusted for signed fields.
    /// Unsigned 64 bit fields are stored bit-for-bit, read them with `as u64`.
    pub value: i64,
    /// Largest representable magnitude; halved for signed fields
    pub max_value: u64,
    /// The bits as read from the payload, before any sign handling
    pub raw: u64,
}

/// Extracts `bits` bits starting at bit `start_bit` of `data[0]`.
///
/// `start_bit` must be in `0..8` and `bits` in `1..=64`, and `data` must hold
/// at least `ceil((start_bit + bits) / 8)` bytes. Use [`try_extract_number`]
/// when the payload length is not known to be sufficient.
pub fn extract_number(field: &Field, data: &[u8], start_bit: usize, bits: usize) -> Extracted {
    debug_assert!(start_bit < 8, "start bit {} out of range", start_bit);
    debug_assert!((1..=64).contains(&bits), "bit width {} out of range", bits);
    debug_assert!(
        data.len() * 8 >= start_bit + bits,
        "{} bytes cannot hold {} bits at bit {}",
        data.len(),
        bits,
        start_bit
    );

    let mut raw: u64 = 0;
    let mut max_value: u64 = 0;
    let mut byte_index = 0;
    let mut bit_offset = start_bit;
    let mut magnitude = 0;
    let mut remaining = bits;

    while remaining > 0 {
        let bits_in_byte = (8 - bit_offset).min(remaining);
        let all_ones = (1u64 << bits_in_byte) - 1;
        let mask = all_ones << bit_offset;
        let value_in_byte = (u64::from(data[byte_index]) & mask) >> bit_offset;

        raw |= value_in_byte << magnitude;
        max_value |= all_ones << magnitude;

        magnitude += bits_in_byte;
        remaining -= bits_in_byte;
        bit_offset += bits_in_byte;
        if bit_offset >= 8 {
            bit_offset -= 8;
            byte_index += 1;
        }
    }

    let mut value = raw as i64;
    if field.has_sign {
        // Halved for Excess-K fields as well
        max_value >>= 1;

        if field.offset != 0 {
            value = value.wrapping_add(i64::from(field.offset));
        } else if raw & (1u64 << (bits - 1)) != 0 {
            value = (raw | !max_value) as i64;
        }
    }

    Extracted {
        value,
        max_value,
        raw,
    }
}

/// Like [`extract_number`], but returns `None` instead of reading outside
/// `data` or accepting a width that does not fit an `i64`.
pub fn try_extract_number(field: &Field, data: &[u8], start_bit: usize, bits: usize) -> Option<Extracted> {
    if start_bit >= 8 || bits == 0 || bits > 64 {
        return None;
    }
    if data.len() < (start_bit + bits).div_ceil(8) {
        return None;
    }
    Some(extract_number(field, data, start_bit, bits))
}

/// All ones in the low `bits` bits.
pub(crate) fn low_mask(bits: usize) -> u64 {
    if bits >= 64 { u64::MAX } else { (1u64 << bits) - 1 }
}
