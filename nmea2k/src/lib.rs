//! NMEA2000 / J1939 PGN definitions and payload decoding
//!
//! This library turns a reassembled NMEA2000 payload into named fields:
//! - PGN table with lookup of all variants sharing a PGN number
//! - Variant resolution using the fixed ("=N") fields inside the payload
//! - LSB-first bit-field extraction with two's complement and Excess-K signs
//! - Table-driven field decoder and a message handler trait
//!
//! # Example
//!
//! ```
//! use nmea2k::{N2kMessage, PgnTable};
//!
//! let table = PgnTable::builtin();
//! // Request To Send: group function code 16
//! let payload = [16, 0x2C, 0x01, 43, 0xFF, 0x00, 0xEF, 0x01];
//! let variant = table.resolve(60416, &payload).unwrap();
//! assert!(variant.description.ends_with("Request To Send"));
//!
//! match N2kMessage::from_payload(table, 60416, &payload) {
//!     N2kMessage::Decoded(msg) => println!("{}", msg),
//!     other => println!("{}", other),
//! }
//! ```

pub mod definitions;
pub mod extract;
pub mod field;
pub mod lookup;
pub mod message;
pub mod message_handler;
pub mod pgn;
pub mod resolver;
pub mod table;

// Re-export commonly used types
pub use extract::{Extracted, extract_number, try_extract_number};
pub use field::{Field, FieldKind};
pub use lookup::Lookup;
pub use message::{DecodedField, DecodedMessage, N2kFrame, N2kMessage};
pub use message_handler::MessageHandler;
pub use pgn::{PacketType, Pgn};
pub use resolver::resolve;
pub use table::{MAX_PGN, PgnTable};
