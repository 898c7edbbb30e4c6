use core::fmt;

use crate::error::{Error, Result};
use crate::sel::{RecordId, SelTimestamp};

/// Size of one SEL record.
pub const SEL_RECORD_LEN: usize = 16;

/// A decoded SEL record, classified by its record type byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelRecord {
    /// System event record (type `0x02`, and other types below `0xC0`).
    Event(EventRecord),
    /// Timestamped OEM record (types `0xC0..=0xDF`).
    TimestampedOem(TimestampedOemRecord),
    /// Non-timestamped OEM record (types `0xE0..=0xFF`).
    NonTimestampedOem(NonTimestampedOemRecord),
}

impl SelRecord {
    /// Decode a 16-byte SEL record.
    pub fn decode(data: &[u8]) -> Result<Self> {
        if data.len() < SEL_RECORD_LEN {
            return Err(Error::malformed("SEL Record", SEL_RECORD_LEN, data));
        }

        let record_id = RecordId::new(u16::from_le_bytes([data[0], data[1]]));
        let record_type = data[2];

        let record = match record_type {
            0xC0..=0xDF => Self::TimestampedOem(TimestampedOemRecord {
                record_id,
                record_type,
                timestamp: SelTimestamp::from_le_slice(&data[3..7]),
                manufacturer_id: u32::from_le_bytes([data[7], data[8], data[9], 0]),
                oem_defined: [
                    data[10], data[11], data[12], data[13], data[14], data[15],
                ],
            }),
            0xE0..=0xFF => {
                let mut oem = [0u8; 13];
                oem.copy_from_slice(&data[3..16]);
                Self::NonTimestampedOem(NonTimestampedOemRecord {
                    record_id,
                    record_type,
                    oem,
                })
            }
            _ => Self::Event(EventRecord {
                record_id,
                record_type,
                timestamp: SelTimestamp::from_le_slice(&data[3..7]),
                generator_id: u16::from_le_bytes([data[7], data[8]]),
                evm_revision: data[9],
                sensor_type: data[10],
                sensor_number: data[11],
                direction: if data[12] & 0x80 != 0 {
                    EventDirection::Deassertion
                } else {
                    EventDirection::Assertion
                },
                event_type: data[12] & 0x7F,
                event_data: [data[13], data[14], data[15]],
            }),
        };
        Ok(record)
    }

    /// Record ID.
    pub fn record_id(&self) -> RecordId {
        match self {
            Self::Event(r) => r.record_id,
            Self::TimestampedOem(r) => r.record_id,
            Self::NonTimestampedOem(r) => r.record_id,
        }
    }

    /// Timestamp, if the record type carries one.
    pub fn timestamp(&self) -> Option<SelTimestamp> {
        match self {
            Self::Event(r) => Some(r.timestamp),
            Self::TimestampedOem(r) => Some(r.timestamp),
            Self::NonTimestampedOem(_) => None,
        }
    }
}

impl fmt::Display for SelRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Event(r) => fmt::Display::fmt(r, f),
            Self::TimestampedOem(r) => fmt::Display::fmt(r, f),
            Self::NonTimestampedOem(r) => fmt::Display::fmt(r, f),
        }
    }
}

/// Whether an event was asserted or deasserted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventDirection {
    /// Event condition became true.
    Assertion,
    /// Event condition went away.
    Deassertion,
}

impl fmt::Display for EventDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Assertion => "Asserted",
            Self::Deassertion => "Deasserted",
        })
    }
}

/// A system event record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRecord {
    /// Record ID.
    pub record_id: RecordId,
    /// Record type byte.
    pub record_type: u8,
    /// Time the event was logged.
    pub timestamp: SelTimestamp,
    /// Generator ID (slave address or software ID, plus channel/LUN).
    pub generator_id: u16,
    /// Event message format revision.
    pub evm_revision: u8,
    /// Sensor type code.
    pub sensor_type: u8,
    /// Sensor number.
    pub sensor_number: u8,
    /// Assertion or deassertion.
    pub direction: EventDirection,
    /// Event/reading type code.
    pub event_type: u8,
    /// Event data bytes 1-3.
    pub event_data: [u8; 3],
}

impl EventRecord {
    /// `true` for an assertion event.
    pub fn is_assertion(&self) -> bool {
        self.direction == EventDirection::Assertion
    }

    /// Sensor type name.
    pub fn sensor_type_name(&self) -> &'static str {
        sensor_type_name(self.sensor_type)
    }

    /// Event offset (low nibble of event data 1).
    pub fn offset(&self) -> u8 {
        self.event_data[0] & 0x0F
    }

    /// Human-readable event description from the event type and data.
    pub fn description(&self) -> String {
        let offset = self.offset();
        let text = match self.event_type {
            0x01 => lookup(THRESHOLD_EVENTS, offset),
            0x02..=0x0C => {
                lookup(GENERIC_EVENTS[usize::from(self.event_type - 0x02)], offset)
            }
            0x6F => sensor_specific_events(self.sensor_type).and_then(|t| lookup(t, offset)),
            0x70..=0x7F => return format!("OEM event type {:#04x}", self.event_type),
            _ => None,
        };
        match text {
            Some(text) => text.to_string(),
            None => format!(
                "Unknown event type {:#04x} offset {:#04x}",
                self.event_type, offset
            ),
        }
    }
}

impl fmt::Display for EventRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<4} | {:<25} | {:<25}({:#04x}) | {:<10} | {}",
            self.record_id.get(),
            self.timestamp.to_string(),
            self.sensor_type_name(),
            self.sensor_number,
            self.direction.to_string(),
            self.description()
        )
    }
}

/// A timestamped OEM record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimestampedOemRecord {
    /// Record ID.
    pub record_id: RecordId,
    /// Record type byte.
    pub record_type: u8,
    /// Time the record was logged.
    pub timestamp: SelTimestamp,
    /// IANA manufacturer ID (3 bytes).
    pub manufacturer_id: u32,
    /// OEM-defined bytes.
    pub oem_defined: [u8; 6],
}

impl fmt::Display for TimestampedOemRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<4} | {:<25} | {:#010x} | 0x{}",
            self.record_id.get(),
            self.timestamp.to_string(),
            self.manufacturer_id,
            hex::encode(self.oem_defined)
        )
    }
}

/// A non-timestamped OEM record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NonTimestampedOemRecord {
    /// Record ID.
    pub record_id: RecordId,
    /// Record type byte.
    pub record_type: u8,
    /// OEM bytes.
    pub oem: [u8; 13],
}

impl fmt::Display for NonTimestampedOemRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:<4} | 0x{}", self.record_id.get(), hex::encode(self.oem))
    }
}

fn lookup(table: &[&'static str], offset: u8) -> Option<&'static str> {
    table.get(usize::from(offset)).copied()
}

/// Name of a generic sensor type code.
pub fn sensor_type_name(sensor_type: u8) -> &'static str {
    match sensor_type {
        0xC0..=0xFF => "OEM",
        code => SENSOR_TYPES
            .get(usize::from(code))
            .copied()
            .unwrap_or("Unknown"),
    }
}

const SENSOR_TYPES: &[&str] = &[
    "reserved",
    "Temperature",
    "Voltage",
    "Current",
    "Fan",
    "Physical Security",
    "Platform Security",
    "Processor",
    "Power Supply",
    "Power Unit",
    "Cooling Device",
    "Other",
    "Memory",
    "Drive Slot / Bay",
    "POST Memory Resize",
    "System Firmwares",
    "Event Logging Disabled",
    "Watchdog1",
    "System Event",
    "Critical Interrupt",
    "Button",
    "Module / Board",
    "Microcontroller",
    "Add-in Card",
    "Chassis",
    "Chip Set",
    "Other FRU",
    "Cable / Interconnect",
    "Terminator",
    "System Boot Initiated",
    "Boot Error",
    "OS Boot",
    "OS Critical Stop",
    "Slot / Connector",
    "System ACPI Power State",
    "Watchdog2",
    "Platform Alert",
    "Entity Presence",
    "Monitor ASIC",
    "LAN",
    "Management Subsys Health",
    "Battery",
    "Session Audit",
    "Version Change",
    "FRU State",
];

const THRESHOLD_EVENTS: &[&str] = &[
    "Lower Non-critical going low",
    "Lower Non-critical going high",
    "Lower Critical going low",
    "Lower Critical going high",
    "Lower Non-recoverable going low",
    "Lower Non-recoverable going high",
    "Upper Non-critical going low",
    "Upper Non-critical going high",
    "Upper Critical going low",
    "Upper Critical going high",
    "Upper Non-recoverable going low",
    "Upper Non-recoverable going high",
];

// Indexed by event type - 0x02.
const GENERIC_EVENTS: [&[&str]; 11] = [
    &["Transition to Idle", "Transition to Active", "Transition to Busy"],
    &["State Deasserted", "State Asserted"],
    &["Predictive Failure deasserted", "Predictive Failure asserted"],
    &["Limit Not Exceeded", "Limit Exceeded"],
    &["Performance Met", "Performance Lags"],
    &[
        "Transition to OK",
        "Transition to Non-critical from OK",
        "Transition to Critical from less severe",
        "Transition to Non-recoverable from less severe",
        "Transition to Non-critical from more severe",
        "Transition to Critical from Non-recoverable",
        "Transition to Non-recoverable",
        "Monitor",
        "Informational",
    ],
    &["Device Absent", "Device Present"],
    &["Device Disabled", "Device Enabled"],
    &[
        "Transition to Running",
        "Transition to In Test",
        "Transition to Power Off",
        "Transition to On Line",
        "Transition to Off Line",
        "Transition to Off Duty",
        "Transition to Degraded",
        "Transition to Power Save",
        "Install Error",
    ],
    &[
        "Fully Redundant",
        "Redundancy Lost",
        "Redundancy Degraded",
        "Non-redundant: Sufficient from Redundant",
        "Non-redundant: Sufficient from Insufficient",
        "Non-redundant: Insufficient Resources",
        "Redundancy Degraded from Fully Redundant",
        "Redundancy Degraded from Non-redundant",
    ],
    &[
        "D0 Power State",
        "D1 Power State",
        "D2 Power State",
        "D3 Power State",
    ],
];

fn sensor_specific_events(sensor_type: u8) -> Option<&'static [&'static str]> {
    let table: &[&str] = match sensor_type {
        0x05 => &[
            "General Chassis intrusion",
            "Drive Bay intrusion",
            "I/O Card area intrusion",
            "Processor area intrusion",
            "System unplugged from LAN",
            "Unauthorized dock",
            "FAN area intrusion",
        ],
        0x07 => &[
            "IERR",
            "Thermal Trip",
            "FRB1/BIST failure",
            "FRB2/Hang in POST failure",
            "FRB3/Processor Startup/Init failure",
            "Configuration Error",
            "SM BIOS Uncorrectable CPU-complex Error",
            "Presence detected",
            "Disabled",
            "Terminator presence detected",
            "Throttled",
            "Uncorrectable machine check exception",
            "Correctable machine check error",
        ],
        0x08 => &[
            "Presence detected",
            "Failure detected",
            "Predictive failure",
            "Power Supply AC lost",
            "AC lost or out-of-range",
            "AC out-of-range, but present",
            "Configuration error",
            "Power Supply Inactive",
        ],
        0x0C => &[
            "Correctable ECC",
            "Uncorrectable ECC",
            "Parity",
            "Memory Scrub Failed",
            "Memory Device Disabled",
            "Correctable ECC logging limit reached",
            "Presence Detected",
            "Configuration Error",
            "Spare",
            "Throttled",
            "Critical Overtemperature",
        ],
        0x10 => &[
            "Correctable memory error logging disabled",
            "Event logging disabled",
            "Log area reset/cleared",
            "All event logging disabled",
            "Log full",
            "Log almost full",
            "Correctable Machine Check Error Logging Disabled",
        ],
        0x12 => &[
            "System Reconfigured",
            "OEM System boot event",
            "Undetermined system hardware failure",
            "Entry added to auxiliary log",
            "PEF Action",
            "Timestamp Clock Sync",
        ],
        0x14 => &[
            "Power Button pressed",
            "Sleep Button pressed",
            "Reset Button pressed",
            "FRU latch open",
            "FRU service request button",
        ],
        _ => return None,
    };
    Some(table)
}
