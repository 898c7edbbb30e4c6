//! FRU inventory: Common Header, info areas and chunked retrieval.
//!
//! Decoding is pure and works on an assembled byte buffer. The Common Header
//! checksum is enforced; info area checksums are recorded and can be checked
//! with `checksum_valid()` but do not fail decoding.

use core::fmt;

use crate::error::FruError;

mod area;
mod reader;

pub use area::{
    BoardInfoArea, ChassisInfoArea, END_OF_FIELDS, FieldType, FieldValue, FruField,
    MAX_FIELD_LEN, ProductInfoArea, manufacture_date,
};
pub use reader::{FruAssembler, read_fru_device};

/// Zero checksum: the value that makes `bytes` plus itself sum to 0 mod 256.
pub fn checksum(bytes: &[u8]) -> u8 {
    bytes
        .iter()
        .fold(0u8, |acc, b| acc.wrapping_add(*b))
        .wrapping_neg()
}

/// FRU Common Header (the first 8 bytes of the inventory).
///
/// Area offsets are in 8-byte units; 0 means the area is absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FruCommonHeader {
    /// Format version (1).
    pub version: u8,
    /// Internal Use Area offset.
    pub internal_use_offset: u8,
    /// Chassis Info Area offset.
    pub chassis_offset: u8,
    /// Board Info Area offset.
    pub board_offset: u8,
    /// Product Info Area offset.
    pub product_offset: u8,
    /// MultiRecord Area offset.
    pub multi_record_offset: u8,
    /// Pad byte.
    pub pad: u8,
    /// Checksum over bytes 0..7.
    pub checksum: u8,
}

impl FruCommonHeader {
    /// Header length in bytes.
    pub const LEN: usize = 8;

    /// Decode and validate a Common Header.
    pub fn decode(buf: &[u8]) -> Result<Self, FruError> {
        if buf.len() < Self::LEN {
            return Err(FruError::HeaderTooShort(buf.len()));
        }
        let version = buf[0] & 0x0F;
        if version != 0x01 {
            return Err(FruError::HeaderVersion(version));
        }
        let computed = checksum(&buf[..7]);
        if computed != buf[7] {
            return Err(FruError::HeaderChecksum {
                computed,
                stored: buf[7],
            });
        }

        Ok(Self {
            version,
            internal_use_offset: buf[1],
            chassis_offset: buf[2],
            board_offset: buf[3],
            product_offset: buf[4],
            multi_record_offset: buf[5],
            pad: buf[6],
            checksum: buf[7],
        })
    }

    fn offsets(&self) -> [u8; 5] {
        [
            self.internal_use_offset,
            self.chassis_offset,
            self.board_offset,
            self.product_offset,
            self.multi_record_offset,
        ]
    }
}

/// Slice `data` at an area offset, or `None` for an absent area.
fn area_at<'a>(
    area: &'static str,
    data: &'a [u8],
    offset: u8,
) -> Result<Option<&'a [u8]>, FruError> {
    if offset == 0 {
        return Ok(None);
    }
    let start = usize::from(offset) * 8;
    if start >= data.len() {
        return Err(FruError::AreaOffset {
            area,
            offset: start,
            size: data.len(),
        });
    }
    Ok(Some(&data[start..]))
}

/// Decoded FRU inventory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FruInventory {
    /// Common Header.
    pub header: FruCommonHeader,
    /// Chassis Info Area, if present.
    pub chassis: Option<ChassisInfoArea>,
    /// Board Info Area, if present.
    pub board: Option<BoardInfoArea>,
    /// Product Info Area, if present.
    pub product: Option<ProductInfoArea>,
}

impl FruInventory {
    /// Decode a complete inventory buffer.
    pub fn decode(data: &[u8]) -> Result<Self, FruError> {
        let header = FruCommonHeader::decode(data)?;
        let chassis = area_at("Chassis Info", data, header.chassis_offset)?
            .map(ChassisInfoArea::decode)
            .transpose()?;
        let board = area_at("Board Info", data, header.board_offset)?
            .map(BoardInfoArea::decode)
            .transpose()?;
        let product = area_at("Product Info", data, header.product_offset)?
            .map(ProductInfoArea::decode)
            .transpose()?;

        Ok(Self {
            header,
            chassis,
            board,
            product,
        })
    }
}

impl fmt::Display for FruInventory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(chassis) = &self.chassis {
            writeln!(f, "Chassis Info Area:")?;
            write!(f, "{chassis}")?;
        }
        match &self.board {
            Some(board) => {
                writeln!(f, "Board Info Area:")?;
                write!(f, "{board}")?;
            }
            None => writeln!(f, "Board Info Area: not present")?,
        }
        match &self.product {
            Some(product) => {
                writeln!(f, "Product Info Area:")?;
                write!(f, "{product}")
            }
            None => writeln!(f, "Product Info Area: not present"),
        }
    }
}

/// A FRU device's raw inventory and its decoded form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FruDeviceData {
    /// FRU device ID.
    pub device_id: u8,
    /// LUN the device sits behind.
    pub lun: u8,
    /// Inventory size reported by the controller.
    pub size: u16,
    /// Assembled inventory bytes.
    pub data: Vec<u8>,
    /// Decoded inventory.
    pub inventory: FruInventory,
}

impl FruDeviceData {
    /// Decode an assembled inventory buffer.
    pub fn new(device_id: u8, lun: u8, size: u16, data: Vec<u8>) -> Result<Self, FruError> {
        let inventory = FruInventory::decode(&data)?;
        Ok(Self {
            device_id,
            lun,
            size,
            data,
            inventory,
        })
    }

    /// Common Header.
    pub fn header(&self) -> &FruCommonHeader {
        &self.inventory.header
    }

    /// Board Info Area, if present.
    pub fn board(&self) -> Option<&BoardInfoArea> {
        self.inventory.board.as_ref()
    }

    /// Product Info Area, if present.
    pub fn product(&self) -> Option<&ProductInfoArea> {
        self.inventory.product.as_ref()
    }

    /// Chassis Info Area, if present.
    pub fn chassis(&self) -> Option<&ChassisInfoArea> {
        self.inventory.chassis.as_ref()
    }

    /// Internal Use Area bytes: from its offset up to the next area present.
    pub fn internal_use_area(&self) -> &[u8] {
        let header = &self.inventory.header;
        let start = usize::from(header.internal_use_offset) * 8;
        if header.internal_use_offset == 0 || start >= self.data.len() {
            return &[];
        }
        let end = header
            .offsets()
            .into_iter()
            .filter(|&offset| offset > header.internal_use_offset)
            .min()
            .map_or(self.data.len(), |offset| usize::from(offset) * 8)
            .min(self.data.len());
        &self.data[start..end]
    }
}

impl fmt::Display for FruDeviceData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "FRU Device {} (LUN {}, {} bytes)", self.device_id, self.lun, self.size)?;
        write!(f, "{}", self.inventory)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(offsets: [u8; 5]) -> Vec<u8> {
        let mut buf = vec![0x01];
        buf.extend_from_slice(&offsets);
        buf.push(0x00);
        buf.push(checksum(&buf));
        buf
    }

    #[test]
    fn header_checksum_detects_any_single_byte_flip() {
        let good = header([1, 0, 2, 5, 0]);
        FruCommonHeader::decode(&good).expect("valid header");
        for i in 0..FruCommonHeader::LEN {
            for bit in 0..8 {
                let mut bad = good.clone();
                bad[i] ^= 1 << bit;
                assert!(FruCommonHeader::decode(&bad).is_err(), "byte {i} bit {bit}");
            }
        }
    }

    #[test]
    fn header_version_and_length() {
        assert_eq!(
            FruCommonHeader::decode(&[0x01, 0, 0]),
            Err(FruError::HeaderTooShort(3))
        );
        let mut buf = header([0, 0, 0, 0, 0]);
        buf[0] = 0x02;
        buf[7] = checksum(&buf[..7]);
        assert_eq!(FruCommonHeader::decode(&buf), Err(FruError::HeaderVersion(2)));
    }

    #[test]
    fn area_offset_beyond_data() {
        let buf = header([0, 0, 4, 0, 0]);
        let err = FruInventory::decode(&buf).expect_err("offset out of range");
        assert!(matches!(err, FruError::AreaOffset { offset: 32, .. }));
    }

    #[test]
    fn internal_use_area_runs_to_next_area() {
        let mut data = header([1, 0, 0, 0, 3]);
        data.extend_from_slice(&[0xAA; 16]);
        data.extend_from_slice(&[0x00; 8]);
        let device = FruDeviceData::new(0, 0, data.len() as u16, data).expect("decode");
        assert_eq!(device.internal_use_area(), &[0xAA; 16]);
        assert!(device.board().is_none());
    }
}
