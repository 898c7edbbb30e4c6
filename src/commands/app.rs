use crate::commands::{Command, validate_len};
use crate::error::Result;
use crate::types::{DeviceId, NetFn, SelfTestDeviceError, SelfTestResult};

/// `Get Device ID` (App NetFn, cmd 0x01).
#[derive(Debug, Clone, Copy)]
pub struct GetDeviceId;

impl Command for GetDeviceId {
    type Output = DeviceId;
    const NAME: &'static str = "Get Device ID";
    const NETFN: NetFn = NetFn::App;
    const CMD: u8 = 0x01;

    fn request_data(&self) -> Vec<u8> {
        Vec::new()
    }

    fn decode<'a>(&self, data: &'a [u8]) -> Result<(Self::Output, &'a [u8])> {
        validate_len(Self::NAME, data, 11)?;

        let aux_firmware_revision = data
            .get(11..15)
            .map(|aux| [aux[0], aux[1], aux[2], aux[3]]);
        let rest = data.get(15..).unwrap_or(&[]);

        let device = DeviceId {
            device_id: data[0],
            device_revision: data[1] & 0x0F,
            firmware_major: data[2] & 0x7F,
            firmware_minor: data[3],
            ipmi_version: data[4],
            additional_support: data[5],
            manufacturer_id: u32::from_le_bytes([data[6], data[7], data[8], 0]) & 0x000F_FFFF,
            product_id: u16::from_le_bytes([data[9], data[10]]),
            aux_firmware_revision,
        };
        Ok((device, rest))
    }
}

/// `Cold Reset` (App NetFn, cmd 0x02).
#[derive(Debug, Clone, Copy)]
pub struct ColdReset;

impl Command for ColdReset {
    type Output = ();
    const NAME: &'static str = "Cold Reset";
    const NETFN: NetFn = NetFn::App;
    const CMD: u8 = 0x02;

    fn request_data(&self) -> Vec<u8> {
        Vec::new()
    }

    fn decode<'a>(&self, data: &'a [u8]) -> Result<(Self::Output, &'a [u8])> {
        Ok(((), data))
    }
}

/// `Get Self Test Results` (App NetFn, cmd 0x04).
#[derive(Debug, Clone, Copy)]
pub struct GetSelfTestResults;

impl Command for GetSelfTestResults {
    type Output = SelfTestResult;
    const NAME: &'static str = "Get Self Test Results";
    const NETFN: NetFn = NetFn::App;
    const CMD: u8 = 0x04;

    fn request_data(&self) -> Vec<u8> {
        Vec::new()
    }

    fn decode<'a>(&self, data: &'a [u8]) -> Result<(Self::Output, &'a [u8])> {
        validate_len(Self::NAME, data, 2)?;

        let (code, detail) = (data[0], data[1]);
        let result = match code {
            0x55 => SelfTestResult::Passed,
            0x56 => SelfTestResult::NotImplemented,
            0x57 => SelfTestResult::DeviceError(SelfTestDeviceError::from_bits(detail)),
            0x58 => SelfTestResult::FatalError(detail),
            _ => SelfTestResult::DeviceSpecific { code, detail },
        };
        Ok((result, &data[2..]))
    }
}
