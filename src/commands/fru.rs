use crate::commands::{Command, split_counted, validate_len};
use crate::error::Result;
use crate::types::NetFn;

/// Size and access mode of a FRU device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FruInventoryInfo {
    /// FRU inventory area size in bytes.
    pub size: u16,
    /// Device is accessed by words rather than bytes.
    pub access_by_words: bool,
}

/// `Get FRU Inventory Area Info` (Storage NetFn, cmd 0x10).
#[derive(Debug, Clone, Copy)]
pub struct GetFruInventoryAreaInfo {
    /// FRU device ID.
    pub device_id: u8,
    /// LUN the FRU device sits behind.
    pub lun: u8,
}

impl GetFruInventoryAreaInfo {
    /// Query FRU device `device_id` behind `lun`.
    pub fn new(device_id: u8, lun: u8) -> Self {
        Self { device_id, lun }
    }
}

impl Command for GetFruInventoryAreaInfo {
    type Output = FruInventoryInfo;
    const NAME: &'static str = "Get FRU Inventory Area Info";
    const NETFN: NetFn = NetFn::Storage;
    const CMD: u8 = 0x10;

    fn lun(&self) -> u8 {
        self.lun
    }

    fn request_data(&self) -> Vec<u8> {
        vec![self.device_id]
    }

    fn decode<'a>(&self, data: &'a [u8]) -> Result<(Self::Output, &'a [u8])> {
        validate_len(Self::NAME, data, 3)?;
        let info = FruInventoryInfo {
            size: u16::from_le_bytes([data[0], data[1]]),
            access_by_words: data[2] & 0x01 != 0,
        };
        Ok((info, &data[3..]))
    }
}

/// Bytes returned by one `Read FRU Data` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FruChunk {
    /// Count reported by the controller.
    pub count: u8,
    /// Data bytes, at most the requested count.
    pub data: Vec<u8>,
}

/// `Read FRU Data` (Storage NetFn, cmd 0x11).
#[derive(Debug, Clone, Copy)]
pub struct ReadFruData {
    /// FRU device ID.
    pub device_id: u8,
    /// LUN the FRU device sits behind.
    pub lun: u8,
    /// Byte offset into the FRU inventory area.
    pub offset: u16,
    /// Number of bytes to read.
    pub count: u8,
}

impl Command for ReadFruData {
    type Output = FruChunk;
    const NAME: &'static str = "Read FRU Data";
    const NETFN: NetFn = NetFn::Storage;
    const CMD: u8 = 0x11;

    fn lun(&self) -> u8 {
        self.lun
    }

    fn request_data(&self) -> Vec<u8> {
        let [lo, hi] = self.offset.to_le_bytes();
        vec![self.device_id, lo, hi, self.count]
    }

    fn decode<'a>(&self, data: &'a [u8]) -> Result<(Self::Output, &'a [u8])> {
        validate_len(Self::NAME, data, 1)?;
        let (bytes, rest) = split_counted(&data[1..], usize::from(self.count));
        let chunk = FruChunk {
            count: data[0],
            data: bytes.to_vec(),
        };
        Ok((chunk, rest))
    }
}
