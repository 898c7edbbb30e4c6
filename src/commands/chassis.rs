use crate::commands::{Command, validate_len};
use crate::error::Result;
use crate::types::{ChassisControl, ChassisStatus, NetFn, PowerRestorePolicy};

/// `Get Chassis Status` (Chassis NetFn, cmd 0x01).
#[derive(Debug, Clone, Copy)]
pub struct GetChassisStatus;

impl Command for GetChassisStatus {
    type Output = ChassisStatus;
    const NAME: &'static str = "Get Chassis Status";
    const NETFN: NetFn = NetFn::Chassis;
    const CMD: u8 = 0x01;

    fn request_data(&self) -> Vec<u8> {
        Vec::new()
    }

    fn decode<'a>(&self, data: &'a [u8]) -> Result<(Self::Output, &'a [u8])> {
        validate_len(Self::NAME, data, 3)?;

        let (power, last_event, misc) = (data[0], data[1], data[2]);
        let restore_policy = match (power >> 5) & 0x03 {
            0x00 => PowerRestorePolicy::AlwaysOff,
            0x01 => PowerRestorePolicy::Previous,
            0x02 => PowerRestorePolicy::AlwaysOn,
            _ => PowerRestorePolicy::Unknown,
        };

        let status = ChassisStatus {
            power_on: power & 0x01 != 0,
            power_fault: power & 0x1E != 0,
            restore_policy,
            last_power_event: last_event & 0x1F,
            intrusion: misc & 0x01 != 0,
            drive_fault: misc & 0x04 != 0,
            cooling_fault: misc & 0x08 != 0,
        };
        // Byte 4 (front panel button capabilities) is optional.
        Ok((status, &data[3..]))
    }
}

/// `Chassis Control` (Chassis NetFn, cmd 0x02).
#[derive(Debug, Clone, Copy)]
pub struct ChassisControlCommand {
    /// Control operation.
    pub control: ChassisControl,
}

impl Command for ChassisControlCommand {
    type Output = ();
    const NAME: &'static str = "Chassis Control";
    const NETFN: NetFn = NetFn::Chassis;
    const CMD: u8 = 0x02;

    fn request_data(&self) -> Vec<u8> {
        vec![self.control as u8]
    }

    fn decode<'a>(&self, data: &'a [u8]) -> Result<(Self::Output, &'a [u8])> {
        Ok(((), data))
    }
}
