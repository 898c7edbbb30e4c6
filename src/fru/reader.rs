use crate::commands::{GetFruInventoryAreaInfo, ReadFruData};
use crate::error::{Error, FruError, Result};
use crate::fru::{FruCommonHeader, FruDeviceData};
use crate::session::{Session, execute};

/// Byte-offset bookkeeping for a chunked FRU read.
///
/// Seeded with a validated Common Header, it hands out `(offset, count)`
/// requests until the declared size is covered, advancing by the bytes each
/// read actually returned.
#[derive(Debug, Clone)]
pub struct FruAssembler {
    total: usize,
    chunk: u8,
    data: Vec<u8>,
}

impl FruAssembler {
    /// Start assembly of a `total`-byte inventory from its header bytes.
    ///
    /// Fails if the header is short, has the wrong version, or a bad
    /// checksum.
    pub fn new(total: u16, chunk: u8, header: &[u8]) -> std::result::Result<Self, FruError> {
        FruCommonHeader::decode(header)?;
        Ok(Self {
            total: usize::from(total),
            chunk: chunk.max(1),
            data: header[..FruCommonHeader::LEN].to_vec(),
        })
    }

    /// Offset of the next read.
    pub fn offset(&self) -> u16 {
        self.data.len() as u16
    }

    /// `true` once the declared size is covered.
    pub fn is_complete(&self) -> bool {
        self.data.len() >= self.total
    }

    /// Offset and count of the next read, or `None` when complete.
    pub fn next_request(&self) -> Option<(u16, u8)> {
        if self.is_complete() {
            return None;
        }
        let remaining = self.total - self.data.len();
        let count = remaining.min(usize::from(self.chunk)) as u8;
        Some((self.offset(), count))
    }

    /// Append the bytes returned by one read.
    ///
    /// A read returning nothing would never make progress and is an error.
    pub fn push(&mut self, bytes: &[u8]) -> std::result::Result<(), FruError> {
        if bytes.is_empty() {
            return Err(FruError::EmptyRead(self.offset()));
        }
        let remaining = self.total.saturating_sub(self.data.len());
        self.data.extend_from_slice(&bytes[..bytes.len().min(remaining)]);
        Ok(())
    }

    /// Bytes assembled so far.
    pub fn collected(&self) -> &[u8] {
        &self.data
    }

    /// Take the assembled bytes.
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }
}

/// Read and decode the FRU inventory of `device_id` behind `lun`.
///
/// Queries the inventory size, reads and validates the Common Header, then
/// reads the rest in chunks of at most `chunk` bytes. A failed chunk read
/// returns [`Error::FruRead`] carrying the bytes collected so far.
pub fn read_fru_device<S: Session + ?Sized>(
    session: &mut S,
    device_id: u8,
    lun: u8,
    chunk: u8,
) -> Result<FruDeviceData> {
    let info = execute(session, &GetFruInventoryAreaInfo::new(device_id, lun))?;

    let header = execute(
        session,
        &ReadFruData {
            device_id,
            lun,
            offset: 0,
            count: FruCommonHeader::LEN as u8,
        },
    )?;
    let mut assembler = FruAssembler::new(info.size, chunk, &header.data)?;

    while let Some((offset, count)) = assembler.next_request() {
        let read = ReadFruData {
            device_id,
            lun,
            offset,
            count,
        };
        let pushed = execute(session, &read)
            .and_then(|chunk| assembler.push(&chunk.data).map_err(Error::from));
        if let Err(source) = pushed {
            return Err(Error::FruRead {
                offset,
                collected: assembler.into_data(),
                source: Box::new(source),
            });
        }
    }

    let data = assembler.into_data();
    Ok(FruDeviceData::new(device_id, lun, info.size, data)?)
}
