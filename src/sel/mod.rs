//! System Event Log: reservation-guarded retrieval, record decoding and
//! erasure.
//!
//! The reservation is owned by the controller, not by this client. Any agent
//! clearing the log (or the controller itself) may cancel it at any time, so
//! every multi-step operation here is prepared to observe
//! [`CompletionCode::ReservationCancelled`](crate::CompletionCode::ReservationCancelled)
//! and re-reserve.

use core::fmt;

use chrono::{DateTime, Utc};

mod clear;
mod record;
mod scan;

pub use clear::{ClearSelState, ClearStep, SelErasure, Sleep, ThreadSleep, clear_sel};
pub use record::{
    EventDirection, EventRecord, NonTimestampedOemRecord, SEL_RECORD_LEN, SelRecord,
    TimestampedOemRecord, sensor_type_name,
};
pub use scan::{SelScan, read_sel, read_sel_from, sel_entries_window};
pub(crate) use scan::read_window;

/// A SEL record ID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordId(u16);

impl RecordId {
    /// Requests the first record of the log.
    pub const FIRST: Self = Self(0x0000);
    /// Requests the last record; as a next-ID it marks the end of the log.
    pub const LAST: Self = Self(0xFFFF);

    /// Wrap a raw record ID.
    pub const fn new(id: u16) -> Self {
        Self(id)
    }

    /// Raw record ID.
    pub const fn get(self) -> u16 {
        self.0
    }

    /// `true` for the end-of-log sentinel.
    pub const fn is_last(self) -> bool {
        self.0 == Self::LAST.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#06x}", self.0)
    }
}

/// A reservation token issued by `Reserve SEL`.
///
/// Valid until the controller cancels it; there is no way to observe
/// cancellation other than a failed request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reservation(u16);

impl Reservation {
    /// Wrap a raw reservation ID.
    pub const fn new(id: u16) -> Self {
        Self(id)
    }

    /// Raw reservation ID.
    pub const fn id(self) -> u16 {
        self.0
    }
}

/// A SEL timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelTimestamp {
    /// `0xFFFFFFFF`: unspecified.
    Unspecified,
    /// Seconds since controller initialisation (raw value `<= 0x20000000`).
    PreInit(u32),
    /// Absolute time.
    Absolute(DateTime<Utc>),
}

impl SelTimestamp {
    const PRE_INIT_MAX: u32 = 0x2000_0000;

    /// Interpret a raw little-endian timestamp value.
    pub fn from_raw(raw: u32) -> Self {
        match raw {
            0xFFFF_FFFF => Self::Unspecified,
            secs if secs <= Self::PRE_INIT_MAX => Self::PreInit(secs),
            secs => DateTime::from_timestamp(i64::from(secs), 0)
                .map_or(Self::Unspecified, Self::Absolute),
        }
    }

    pub(crate) fn from_le_slice(bytes: &[u8]) -> Self {
        Self::from_raw(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }
}

impl fmt::Display for SelTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unspecified => f.write_str("Unspecified"),
            Self::PreInit(secs) => write!(f, "Pre-Init {secs}s"),
            Self::Absolute(time) => write!(f, "{}", time.format("%Y-%m-%d %H:%M:%S")),
        }
    }
}

/// Response of `Get SEL Info`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelInfo {
    /// SEL version (BCD, e.g. `0x51` for 1.5).
    pub version: u8,
    /// Number of log entries.
    pub entries: u16,
    /// Free space in bytes.
    pub free_space: u16,
    /// Most recent addition.
    pub last_add: SelTimestamp,
    /// Most recent erase.
    pub last_delete: SelTimestamp,
    /// `Get SEL Allocation Info` is supported.
    pub supports_alloc_info: bool,
    /// `Reserve SEL` is supported.
    pub supports_reserve: bool,
    /// `Partial Add SEL Entry` is supported.
    pub supports_partial_add: bool,
    /// `Delete SEL Entry` is supported.
    pub supports_delete: bool,
    /// Events were dropped because the log is full.
    pub overflow: bool,
}

/// Erasure progress reported by `Clear SEL`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErasureProgress {
    /// Erasure has not finished.
    InProgress,
    /// Erasure completed.
    Completed,
}

impl ErasureProgress {
    /// Decode the low nibble of the response byte.
    pub fn from_bits(bits: u8) -> Self {
        if bits & 0x0F == 0x01 {
            Self::Completed
        } else {
            Self::InProgress
        }
    }

    /// `true` once erasure finished.
    pub fn is_completed(self) -> bool {
        self == Self::Completed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamp_classes() {
        assert_eq!(SelTimestamp::from_raw(0xFFFF_FFFF), SelTimestamp::Unspecified);
        assert_eq!(SelTimestamp::from_raw(42), SelTimestamp::PreInit(42));
        assert_eq!(
            SelTimestamp::from_raw(0x2000_0000),
            SelTimestamp::PreInit(0x2000_0000)
        );

        let SelTimestamp::Absolute(time) = SelTimestamp::from_raw(0x6000_0000) else {
            panic!("expected absolute timestamp");
        };
        assert_eq!(time.timestamp(), 0x6000_0000);
        assert_eq!(
            SelTimestamp::from_raw(0x6000_0000).to_string(),
            "2021-01-14 08:25:36"
        );
    }

    #[test]
    fn record_id_sentinels() {
        assert!(RecordId::LAST.is_last());
        assert!(!RecordId::FIRST.is_last());
        assert_eq!(RecordId::new(0x12).to_string(), "0x0012");
    }
}
