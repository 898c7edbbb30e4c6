use crate::commands::{Command, split_counted, validate_len};
use crate::error::Result;
use crate::sel::{ErasureProgress, RecordId, Reservation, SelInfo, SelTimestamp};
use crate::types::NetFn;

/// `Get SEL Info` (Storage NetFn, cmd 0x40).
#[derive(Debug, Clone, Copy)]
pub struct GetSelInfo;

impl Command for GetSelInfo {
    type Output = SelInfo;
    const NAME: &'static str = "Get SEL Info";
    const NETFN: NetFn = NetFn::Storage;
    const CMD: u8 = 0x40;

    fn request_data(&self) -> Vec<u8> {
        Vec::new()
    }

    fn decode<'a>(&self, data: &'a [u8]) -> Result<(Self::Output, &'a [u8])> {
        validate_len(Self::NAME, data, 14)?;

        let flags = data[13];
        let info = SelInfo {
            version: data[0],
            entries: u16::from_le_bytes([data[1], data[2]]),
            free_space: u16::from_le_bytes([data[3], data[4]]),
            last_add: SelTimestamp::from_raw(u32::from_le_bytes([
                data[5], data[6], data[7], data[8],
            ])),
            last_delete: SelTimestamp::from_raw(u32::from_le_bytes([
                data[9], data[10], data[11], data[12],
            ])),
            supports_alloc_info: flags & 0x01 != 0,
            supports_reserve: flags & 0x02 != 0,
            supports_partial_add: flags & 0x04 != 0,
            supports_delete: flags & 0x08 != 0,
            overflow: flags & 0x80 != 0,
        };
        Ok((info, &data[14..]))
    }
}

/// `Reserve SEL` (Storage NetFn, cmd 0x42).
#[derive(Debug, Clone, Copy)]
pub struct ReserveSel;

impl Command for ReserveSel {
    type Output = Reservation;
    const NAME: &'static str = "Reserve SEL";
    const NETFN: NetFn = NetFn::Storage;
    const CMD: u8 = 0x42;

    fn request_data(&self) -> Vec<u8> {
        Vec::new()
    }

    fn decode<'a>(&self, data: &'a [u8]) -> Result<(Self::Output, &'a [u8])> {
        validate_len(Self::NAME, data, 2)?;
        let reservation = Reservation::new(u16::from_le_bytes([data[0], data[1]]));
        Ok((reservation, &data[2..]))
    }
}

/// One slice of a SEL record plus the ID of the record after it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelEntry {
    /// Next record ID; [`RecordId::LAST`] ends the log.
    pub next: RecordId,
    /// Record bytes, at most the requested count.
    pub data: Vec<u8>,
}

/// `Get SEL Entry` (Storage NetFn, cmd 0x43).
#[derive(Debug, Clone, Copy)]
pub struct GetSelEntry {
    /// Reservation guarding a partial read.
    pub reservation: Reservation,
    /// Record to read, or [`RecordId::FIRST`]/[`RecordId::LAST`].
    pub record_id: RecordId,
    /// Offset into the record.
    pub offset: u8,
    /// Bytes to read; `0xFF` reads the entire record.
    pub bytes_to_read: u8,
}

impl GetSelEntry {
    /// Sentinel byte count requesting the entire record.
    pub const ENTIRE_RECORD: u8 = 0xFF;

    /// Read the entire record `record_id`.
    pub fn whole(reservation: Reservation, record_id: RecordId) -> Self {
        Self {
            reservation,
            record_id,
            offset: 0,
            bytes_to_read: Self::ENTIRE_RECORD,
        }
    }
}

impl Command for GetSelEntry {
    type Output = SelEntry;
    const NAME: &'static str = "Get SEL Entry";
    const NETFN: NetFn = NetFn::Storage;
    const CMD: u8 = 0x43;

    fn request_data(&self) -> Vec<u8> {
        let [res_lo, res_hi] = self.reservation.id().to_le_bytes();
        let [id_lo, id_hi] = self.record_id.get().to_le_bytes();
        vec![res_lo, res_hi, id_lo, id_hi, self.offset, self.bytes_to_read]
    }

    fn decode<'a>(&self, data: &'a [u8]) -> Result<(Self::Output, &'a [u8])> {
        validate_len(Self::NAME, data, 2)?;
        let next = RecordId::new(u16::from_le_bytes([data[0], data[1]]));
        let (bytes, rest) = split_counted(&data[2..], usize::from(self.bytes_to_read));
        let entry = SelEntry {
            next,
            data: bytes.to_vec(),
        };
        Ok((entry, rest))
    }
}

/// Action byte of `Clear SEL`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ClearSelAction {
    /// Start erasing (`0xAA`).
    InitiateErase = 0xAA,
    /// Query erasure progress (`0x00`).
    GetErasureStatus = 0x00,
}

/// `Clear SEL` (Storage NetFn, cmd 0x47).
#[derive(Debug, Clone, Copy)]
pub struct ClearSel {
    /// Reservation held by the caller.
    pub reservation: Reservation,
    /// Initiate or poll.
    pub action: ClearSelAction,
}

impl ClearSel {
    /// `C`, `L`, `R` confirmation marker.
    pub const MARKER: [u8; 3] = *b"CLR";

    /// Start erasing.
    pub fn initiate(reservation: Reservation) -> Self {
        Self {
            reservation,
            action: ClearSelAction::InitiateErase,
        }
    }

    /// Poll erasure progress.
    pub fn status(reservation: Reservation) -> Self {
        Self {
            reservation,
            action: ClearSelAction::GetErasureStatus,
        }
    }
}

impl Command for ClearSel {
    type Output = ErasureProgress;
    const NAME: &'static str = "Clear SEL";
    const NETFN: NetFn = NetFn::Storage;
    const CMD: u8 = 0x47;

    fn request_data(&self) -> Vec<u8> {
        let [lo, hi] = self.reservation.id().to_le_bytes();
        let [c, l, r] = Self::MARKER;
        vec![lo, hi, c, l, r, self.action as u8]
    }

    fn decode<'a>(&self, data: &'a [u8]) -> Result<(Self::Output, &'a [u8])> {
        validate_len(Self::NAME, data, 1)?;
        Ok((ErasureProgress::from_bits(data[0]), &data[1..]))
    }
}
