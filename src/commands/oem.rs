use crate::commands::Command;
use crate::error::Result;
use crate::types::NetFn;

/// I2C read/write through Wistron OpenBMC (OEM NetFn 0x30, cmd 0x25).
///
/// An empty `write` performs a read of `read_count` bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WistronI2c {
    /// Bus index, 0-based.
    pub bus: u8,
    /// 7-bit slave address in bits 7:1.
    pub address: u8,
    /// Bytes to read.
    pub read_count: u8,
    /// Data offset.
    pub offset: u8,
    /// Bytes to write.
    pub write: Vec<u8>,
}

impl Command for WistronI2c {
    type Output = Vec<u8>;
    const NAME: &'static str = "Wistron OpenBMC I2C Read Write";
    const NETFN: NetFn = NetFn::Oem(0x30);
    const CMD: u8 = 0x25;

    fn request_data(&self) -> Vec<u8> {
        let mut out = vec![self.bus, self.address, self.read_count, self.offset];
        out.extend_from_slice(&self.write);
        out
    }

    fn decode<'a>(&self, data: &'a [u8]) -> Result<(Self::Output, &'a [u8])> {
        Ok((data.to_vec(), &[]))
    }
}
