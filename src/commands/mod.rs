//! Typed IPMI commands.
//!
//! Every command implements [`Command`]: it names itself, knows its NetFn/LUN
//! address and command number, encodes its request data and decodes the
//! response data that follows the completion code.

use crate::completion::CompletionCode;
use crate::error::{Error, Result};
use crate::types::{NetFn, NetFnLun, RawResponse};

pub mod app;
pub mod chassis;
pub mod fru;
pub mod oem;
pub mod sel;

pub use app::{ColdReset, GetDeviceId, GetSelfTestResults};
pub use chassis::{ChassisControlCommand, GetChassisStatus};
pub use fru::{FruChunk, FruInventoryInfo, GetFruInventoryAreaInfo, ReadFruData};
pub use oem::WistronI2c;
pub use sel::{ClearSel, ClearSelAction, GetSelEntry, GetSelInfo, ReserveSel, SelEntry};

/// A typed IPMI command (single request/response).
pub trait Command {
    /// Parsed output type.
    type Output;

    /// Human-readable command name, used in errors and logs.
    const NAME: &'static str;

    /// Network Function (NetFn) for the request.
    const NETFN: NetFn;

    /// Command number.
    const CMD: u8;

    /// Logical unit the request is addressed to.
    fn lun(&self) -> u8 {
        0
    }

    /// NetFn/LUN address of the request.
    fn netfn_lun(&self) -> NetFnLun {
        NetFnLun::request(Self::NETFN, self.lun())
    }

    /// Encode request payload bytes (excluding NetFn/Cmd framing).
    fn request_data(&self) -> Vec<u8>;

    /// Decode response data (the bytes after the completion code).
    ///
    /// Returns the parsed value and any bytes the command did not consume.
    fn decode<'a>(&self, data: &'a [u8]) -> Result<(Self::Output, &'a [u8])>;

    /// Full request payload: `[netfn/lun][cmd][data]`.
    fn encode(&self) -> Vec<u8> {
        let data = self.request_data();
        let mut out = Vec::with_capacity(data.len() + 2);
        out.push(self.netfn_lun().as_u8());
        out.push(Self::CMD);
        out.extend_from_slice(&data);
        out
    }

    /// Check the completion code, then decode the response data.
    fn parse_response(&self, response: RawResponse) -> Result<Self::Output> {
        let data = ok_data(Self::NAME, &response)?;
        let (output, _rest) = self.decode(data)?;
        Ok(output)
    }
}

pub(crate) fn ok_data<'a>(command: &'static str, response: &'a RawResponse) -> Result<&'a [u8]> {
    let code = CompletionCode::from(response.completion_code);
    if !code.is_success() {
        return Err(Error::CompletionCode { command, code });
    }
    Ok(&response.data)
}

pub(crate) fn validate_len(command: &'static str, data: &[u8], min: usize) -> Result<()> {
    if data.len() < min {
        return Err(Error::malformed(command, min, data));
    }
    Ok(())
}

/// Take up to `limit` bytes, returning the rest only when there is more.
pub(crate) fn split_counted(data: &[u8], limit: usize) -> (&[u8], &[u8]) {
    if data.len() <= limit {
        (data, &[])
    } else {
        data.split_at(limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completion_code_short_circuits_decode() {
        let response = RawResponse {
            completion_code: 0xC1,
            data: vec![],
        };
        let err = GetSelInfo
            .parse_response(response)
            .expect_err("expected completion code");
        assert!(matches!(
            err,
            Error::CompletionCode {
                command: "Get SEL Info",
                code: CompletionCode::InvalidCommand
            }
        ));
    }

    #[test]
    fn encode_prefixes_address_and_command() {
        let cmd = GetFruInventoryAreaInfo::new(3, 0);
        assert_eq!(cmd.encode(), vec![0x28, 0x10, 0x03]);
    }

    #[test]
    fn split_counted_keeps_leftover_only_when_longer() {
        assert_eq!(split_counted(&[1, 2], 4), (&[1u8, 2][..], &[][..]));
        assert_eq!(split_counted(&[1, 2, 3], 2), (&[1u8, 2][..], &[3u8][..]));
    }
}
