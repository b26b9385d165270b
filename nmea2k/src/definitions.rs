//! Built-in PGN definitions: ISO 11783 network management, the J1939 engine
//! and AC power PGNs, and catch-all entries for the proprietary ranges.
//!
//! Entries must stay sorted by PGN number. Variants of one PGN are listed in
//! the order they are tried.

use crate::field::Field;
use crate::lookup::Lookup;
use crate::pgn::{PacketType, Pgn};

/// Largest payload a fast packet can carry, in bytes
pub const FASTPACKET_MAX_SIZE: u32 = 223;

/// J1939 offset for 32 bit power values: 0 W is stored as 2 000 000 000
const POWER_OFFSET: i32 = -2_000_000_000;

/// J1939 offset for one byte temperatures in Kelvin (-40 C)
const TEMPERATURE_OFFSET: i32 = 233;

fn bytes(n: u32) -> u32 {
    n * 8
}

fn manufacturer_fields() -> [Field; 3] {
    [Field::manufacturer(), Field::reserved(2), Field::industry()]
}

fn iso_name_fields() -> Vec<Field> {
    vec![
        Field::simple("Unique Number", 21).with_description("ISO Identity Number"),
        Field::manufacturer(),
        Field::simple("Device Instance Lower", 3).with_description("ISO ECU Instance"),
        Field::simple("Device Instance Upper", 5).with_description("ISO Function Instance"),
        Field::lookup("Device Function", bytes(1), Lookup::DeviceFunction).with_description("ISO Function"),
    ]
}

fn transport_command(description: &str, code: i64) -> Pgn {
    Pgn::new(60416, description).field(Field::matching_lookup(
        "Group Function Code",
        bytes(1),
        code,
        Lookup::IsoCommand,
    ))
}

fn voltage(name: &str) -> Field {
    Field::simple(name, bytes(2)).with_unit("V")
}

fn basic_ac_quantities(pgn: u32, description: &str, with_current: bool) -> Pgn {
    let last = if with_current {
        Field::simple("AC RMS Current", bytes(2)).with_unit("A")
    } else {
        Field::reserved(bytes(2))
    };
    Pgn::new(pgn, description).fields([
        voltage("Line-Line AC RMS Voltage"),
        voltage("Line-Neutral AC RMS Voltage"),
        Field::simple("AC Frequency", bytes(2))
            .with_resolution(1.0 / 128.0)
            .with_unit("Hz"),
        last,
    ])
}

fn ac_power(pgn: u32, description: &str) -> Pgn {
    Pgn::new(pgn, description).fields([
        Field::excess_k("Real Power", bytes(4), POWER_OFFSET).with_unit("W"),
        Field::excess_k("Apparent Power", bytes(4), POWER_OFFSET).with_unit("VA"),
    ])
}

fn power_factor_fields() -> [Field; 2] {
    [
        Field::simple("Power factor", bytes(2))
            .with_resolution(1.0 / 16384.0)
            .with_unit("Cos Phi"),
        Field::lookup("Power Factor Lagging", 2, Lookup::PowerFactor),
    ]
}

/// Reactive power as an unsigned 16 bit value
fn ac_reactive_power_u16(pgn: u32, description: &str) -> Pgn {
    Pgn::new(pgn, description)
        .field(Field::simple("Reactive Power", bytes(2)).with_unit("VAR"))
        .fields(power_factor_fields())
        .field(Field::reserved(bytes(3) + 6))
}

/// Reactive power as a 32 bit offset value
fn ac_reactive_power(pgn: u32, description: &str) -> Pgn {
    Pgn::new(pgn, description)
        .field(Field::excess_k("Reactive Power", bytes(4), POWER_OFFSET).with_unit("VAR"))
        .fields(power_factor_fields())
        .field(Field::reserved(bytes(1) + 6))
}

fn ac_energy(pgn: u32, description: &str) -> Pgn {
    Pgn::new(pgn, description).fields([
        Field::simple("Total Energy Export", bytes(4)).with_unit("kWh"),
        Field::simple("Total Energy Import", bytes(4)).with_unit("kWh"),
    ])
}

fn proprietary_single(pgn: u32, description: &str) -> Pgn {
    Pgn::new(pgn, description)
        .fields(manufacturer_fields())
        .field(Field::binary("Data", bytes(6)))
        .fallback()
}

fn fast_catch_all(pgn: u32, description: &str, packet_type: PacketType) -> Pgn {
    Pgn::new(pgn, description)
        .packet_type(packet_type)
        .field(Field::binary("Data", bytes(FASTPACKET_MAX_SIZE)))
        .fallback()
}

pub fn builtin_pgns() -> Vec<Pgn> {
    let mut pgns = vec![
        Pgn::new(59392, "ISO Acknowledgement").fields([
            Field::lookup("Control", bytes(1), Lookup::IsoControl),
            Field::simple("Group Function", bytes(1)),
            Field::reserved(24),
            Field::pgn("PGN").with_description("Parameter Group Number of requested information"),
        ]),
        // Same number as the acknowledgement (0xE800); only reached through `fallback_for`
        Pgn::new(0xe800, "0xE800-0xEEFF: Standardized single-frame addressed")
            .field(Field::binary("Data", bytes(8)))
            .fallback(),
        Pgn::new(59904, "ISO Request").field(Field::pgn("PGN")),
        Pgn::new(60160, "ISO Transport Protocol, Data Transfer").fields([
            Field::simple("SID", bytes(1)),
            Field::binary("Data", bytes(7)),
        ]),
        transport_command("ISO Transport Protocol, Connection Management - Request To Send", 16).fields([
            Field::simple("Message size", bytes(2)).with_description("bytes"),
            Field::simple("Packets", bytes(1)).with_description("packets"),
            Field::simple("Packets reply", bytes(1)).with_description("packets sent in response to CTS"),
            Field::pgn("PGN"),
        ]),
        transport_command("ISO Transport Protocol, Connection Management - Clear To Send", 17).fields([
            Field::simple("Max packets", bytes(1))
                .with_description("Number of frames that can be sent before another CTS is required"),
            Field::simple("Next SID", bytes(1)).with_description("Number of next frame to be transmitted"),
            Field::reserved(bytes(2)),
            Field::pgn("PGN"),
        ]),
        transport_command("ISO Transport Protocol, Connection Management - End Of Message", 19).fields([
            Field::simple("Total message size", bytes(2)).with_description("bytes"),
            Field::simple("Total number of frames received", bytes(1)),
            Field::reserved(bytes(1)),
            Field::pgn("PGN"),
        ]),
        transport_command("ISO Transport Protocol, Connection Management - Broadcast Announce", 32).fields([
            Field::simple("Message size", bytes(2)).with_description("bytes"),
            Field::simple("Packets", bytes(1)).with_description("frames"),
            Field::reserved(bytes(1)),
            Field::pgn("PGN"),
        ]),
        transport_command("ISO Transport Protocol, Connection Management - Abort", 255).fields([
            Field::binary("Reason", bytes(1)),
            Field::reserved(bytes(3)),
            Field::pgn("PGN"),
        ]),
        Pgn::new(60928, "ISO Address Claim")
            .fields(iso_name_fields())
            .fields([
                Field::spare(1),
                Field::lookup("Device Class", 7, Lookup::DeviceClass),
                Field::simple("System Instance", 4).with_description("ISO Device Class Instance"),
                Field::lookup("Industry Group", 3, Lookup::IndustryCode),
                Field::simple("Arbitrary address capable", 1),
            ]),
        proprietary_single(61184, "0xEF00: Manufacturer Proprietary single-frame addressed"),
        proprietary_single(61440, "0xF000-0xFEFF: Standardized single-frame non-addressed"),
        Pgn::new(61443, "ECU #2").fields([
            Field::reserved(bytes(1)),
            Field::simple("Throttle Lever", bytes(1)).with_resolution(0.4).with_unit("%"),
            Field::reserved(bytes(6)),
        ]),
        Pgn::new(61444, "ECU #1").fields([
            Field::reserved(bytes(3)),
            Field::simple("Engine RPM", bytes(2)).with_resolution(0.125).with_unit("rpm"),
            Field::reserved(bytes(3)),
        ]),
    ];

    pgns.extend([
        basic_ac_quantities(65001, "Bus #1 Phase C Basic AC Quantities", false),
        basic_ac_quantities(65002, "Bus #1 Phase B Basic AC Quantities", false),
        basic_ac_quantities(65003, "Bus #1 Phase A Basic AC Quantities", false),
        basic_ac_quantities(65004, "Bus #1 Average Basic AC Quantities", false),
        ac_energy(65005, "Utility Total AC Energy"),
        ac_reactive_power_u16(65006, "Utility Phase C AC Reactive Power"),
        ac_power(65007, "Utility Phase C AC Power"),
        basic_ac_quantities(65008, "Utility Phase C Basic AC Quantities", true),
        ac_reactive_power_u16(65009, "Utility Phase B AC Reactive Power"),
        ac_power(65010, "Utility Phase B AC Power"),
        basic_ac_quantities(65011, "Utility Phase B Basic AC Quantities", true),
        ac_reactive_power(65012, "Utility Phase A AC Reactive Power"),
        ac_power(65013, "Utility Phase A AC Power"),
        basic_ac_quantities(65014, "Utility Phase A Basic AC Quantities", true),
        ac_reactive_power(65015, "Utility Total AC Reactive Power"),
        ac_power(65016, "Utility Total AC Power"),
        basic_ac_quantities(65017, "Utility Average Basic AC Quantities", true),
        ac_energy(65018, "Generator Total AC Energy"),
        ac_reactive_power(65019, "Generator Phase C AC Reactive Power"),
        ac_power(65020, "Generator Phase C AC Power"),
        basic_ac_quantities(65021, "Generator Phase C Basic AC Quantities", true),
        ac_reactive_power(65022, "Generator Phase B AC Reactive Power"),
        ac_power(65023, "Generator Phase B AC Power"),
        basic_ac_quantities(65024, "Generator Phase B Basic AC Quantities", true),
        ac_reactive_power(65025, "Generator Phase A AC Reactive Power"),
        ac_power(65026, "Generator Phase A AC Power"),
        basic_ac_quantities(65027, "Generator Phase A Basic AC Quantities", true),
        ac_reactive_power(65028, "Generator Total AC Reactive Power"),
        ac_power(65029, "Generator Total AC Power"),
        basic_ac_quantities(65030, "Generator Average Basic AC Quantities", true),
    ]);

    pgns.extend([
        Pgn::new(65226, "Active Trouble Codes").fields([
            Field::binary("Malfunction Lamp Status", 2),
            Field::binary("Red Stop Lamp Status", 2),
            Field::binary("Amber Warning Lamp Status", 2),
            Field::binary("Protect Lamp Status", 2),
            Field::reserved(bytes(1)),
            Field::binary("SPN", 19).with_description("Suspect Parameter Number"),
            Field::binary("FMI", 5).with_description("Fault Mode Indicator"),
            Field::binary("CM", 1).with_description("SPN Conversion Method"),
            Field::binary("OC", 7).with_description("Occurrence Count"),
        ]),
        Pgn::new(65240, "ISO Commanded Address")
            .packet_type(PacketType::IsoTp)
            .fields(iso_name_fields())
            .fields([
                Field::reserved(1),
                Field::lookup("Device Class", 7, Lookup::DeviceClass),
                Field::simple("System Instance", 4).with_description("ISO Device Class Instance"),
                Field::lookup("Industry Code", 3, Lookup::IndustryCode),
                Field::reserved(1),
                Field::simple("New Source Address", bytes(1)),
            ]),
        Pgn::new(65262, "Engine Temp #1")
            .field(Field::excess_k("Engine Coolant Temp", bytes(1), TEMPERATURE_OFFSET).with_unit("K")),
        Pgn::new(65266, "Fuel Economy").fields([
            Field::reserved(bytes(6)),
            Field::simple("Throttle Position", bytes(1)).with_resolution(0.4).with_unit("%"),
        ]),
        Pgn::new(65269, "Ambient Conditions")
            .field(Field::simple("Barometric Pressure", bytes(1)).with_resolution(500.0).with_unit("Pa")),
        Pgn::new(65270, "Inlet/Exhaust Conditions").fields([
            Field::reserved(bytes(2)),
            Field::excess_k("Intake Manifold Temp", bytes(1), TEMPERATURE_OFFSET).with_unit("K"),
            Field::simple("Air Inlet Pressure", bytes(1)).with_resolution(2000.0).with_unit("Pa"),
        ]),
        Pgn::new(65271, "Vehicle Electrical Power").fields([
            Field::reserved(bytes(4)),
            Field::simple("Battery Voltage", bytes(2)).with_resolution(0.05).with_unit("V"),
        ]),
        proprietary_single(65280, "0xFF00-0xFFFF: Manufacturer Proprietary single-frame non-addressed"),
        fast_catch_all(0x1ed00, "0x1ED00 - 0x1EE00: Standardized fast-packet addressed", PacketType::Fast),
        Pgn::new(126720, "0x1EF00-0x1EFFF: Manufacturer Proprietary fast-packet addressed")
            .packet_type(PacketType::Fast)
            .fields(manufacturer_fields())
            .field(Field::binary("Data", bytes(FASTPACKET_MAX_SIZE - 2)))
            .fallback(),
        fast_catch_all(126976, "0x1F000-0x1FEFF: Standardized mixed single/fast packet non-addressed", PacketType::Mixed),
        fast_catch_all(130816, "0x1FF00-0x1FFFF: Manufacturer Specific fast-packet non-addressed", PacketType::Fast),
    ]);

    pgns
}
