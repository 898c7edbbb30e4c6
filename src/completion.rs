use core::fmt;

/// IPMI completion code, the first byte of every response.
///
/// Generic codes live in `0xC0..=0xFF`, command-specific codes in
/// `0x80..=0xBE`. Values without a fixed meaning are kept as [`Unknown`].
///
/// [`Unknown`]: CompletionCode::Unknown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompletionCode {
    /// `0x00`: command completed normally.
    Ok,
    /// `0x80`: requested FRU device not present.
    FruDeviceNotPresent,
    /// `0x81`: FRU device busy.
    FruDeviceBusy,
    /// `0xC0`: node busy.
    NodeBusy,
    /// `0xC1`: invalid command.
    InvalidCommand,
    /// `0xC2`: command invalid for given LUN.
    InvalidCommandForLun,
    /// `0xC3`: timeout while processing the command.
    ProcessingTimeout,
    /// `0xC4`: out of space.
    OutOfSpace,
    /// `0xC5`: reservation cancelled or invalid reservation ID.
    ReservationCancelled,
    /// `0xC6`: request data truncated.
    RequestDataTruncated,
    /// `0xC7`: request data length invalid.
    RequestDataLengthInvalid,
    /// `0xC8`: request data field length limit exceeded.
    RequestDataFieldLengthExceeded,
    /// `0xC9`: parameter out of range.
    ParameterOutOfRange,
    /// `0xCA`: cannot return number of requested data bytes.
    CannotReturnRequestedBytes,
    /// `0xCB`: requested sensor, data, or record not present.
    RequestedDataNotPresent,
    /// `0xCC`: invalid data field in request.
    InvalidDataField,
    /// `0xCD`: command illegal for specified sensor or record type.
    IllegalForSensorOrRecord,
    /// `0xCE`: command response could not be provided.
    ResponseNotProvided,
    /// `0xCF`: cannot execute duplicated request.
    DuplicatedRequest,
    /// `0xD0`: SDR repository in update mode.
    SdrInUpdateMode,
    /// `0xD1`: device in firmware update mode.
    FirmwareUpdateMode,
    /// `0xD2`: BMC initialization in progress.
    BmcInitializing,
    /// `0xD3`: destination unavailable.
    DestinationUnavailable,
    /// `0xD4`: insufficient privilege level.
    InsufficientPrivilege,
    /// `0xD5`: command not supported in present state.
    NotSupportedInPresentState,
    /// `0xD6`: command sub-function disabled or unavailable.
    SubFunctionDisabled,
    /// `0xFF`: unspecified error.
    Unspecified,
    /// Any value without a fixed meaning.
    Unknown(u8),
}

impl CompletionCode {
    /// Raw byte value.
    pub fn as_u8(self) -> u8 {
        match self {
            Self::Ok => 0x00,
            Self::FruDeviceNotPresent => 0x80,
            Self::FruDeviceBusy => 0x81,
            Self::NodeBusy => 0xC0,
            Self::InvalidCommand => 0xC1,
            Self::InvalidCommandForLun => 0xC2,
            Self::ProcessingTimeout => 0xC3,
            Self::OutOfSpace => 0xC4,
            Self::ReservationCancelled => 0xC5,
            Self::RequestDataTruncated => 0xC6,
            Self::RequestDataLengthInvalid => 0xC7,
            Self::RequestDataFieldLengthExceeded => 0xC8,
            Self::ParameterOutOfRange => 0xC9,
            Self::CannotReturnRequestedBytes => 0xCA,
            Self::RequestedDataNotPresent => 0xCB,
            Self::InvalidDataField => 0xCC,
            Self::IllegalForSensorOrRecord => 0xCD,
            Self::ResponseNotProvided => 0xCE,
            Self::DuplicatedRequest => 0xCF,
            Self::SdrInUpdateMode => 0xD0,
            Self::FirmwareUpdateMode => 0xD1,
            Self::BmcInitializing => 0xD2,
            Self::DestinationUnavailable => 0xD3,
            Self::InsufficientPrivilege => 0xD4,
            Self::NotSupportedInPresentState => 0xD5,
            Self::SubFunctionDisabled => 0xD6,
            Self::Unspecified => 0xFF,
            Self::Unknown(v) => v,
        }
    }

    /// `true` only for `0x00`.
    pub fn is_success(self) -> bool {
        self.as_u8() == 0x00
    }

    /// Generic completion codes (`0xC0..=0xFF`).
    pub fn is_generic(self) -> bool {
        self.as_u8() >= 0xC0
    }

    /// Command-specific completion codes (`0x80..=0xBE`).
    pub fn is_command_specific(self) -> bool {
        (0x80..=0xBE).contains(&self.as_u8())
    }

    /// Fixed description, or `None` for values without one.
    pub fn description(self) -> Option<&'static str> {
        let text = match self {
            Self::Ok => "Command Completed Normally",
            Self::FruDeviceNotPresent => "Requested FRU Device Not Present",
            Self::FruDeviceBusy => "FRU Device Busy",
            Self::NodeBusy => "Node Busy",
            Self::InvalidCommand => "Invalid Command",
            Self::InvalidCommandForLun => "Command invalid for given LUN",
            Self::ProcessingTimeout => "Timeout",
            Self::OutOfSpace => "Out of space",
            Self::ReservationCancelled => "Reservation Canceled or Invalid Reservation ID",
            Self::RequestDataTruncated => "Request data truncated",
            Self::RequestDataLengthInvalid => "Request data length invalid",
            Self::RequestDataFieldLengthExceeded => "Request data field length limit exceeded",
            Self::ParameterOutOfRange => "Parameter out of range",
            Self::CannotReturnRequestedBytes => "Cannot return number of requested data bytes",
            Self::RequestedDataNotPresent => "Requested Sensor, data, or record not present",
            Self::InvalidDataField => "Invalid data field in Request",
            Self::IllegalForSensorOrRecord => "Command illegal for specified sensor or record type",
            Self::ResponseNotProvided => "Command response could not be provided",
            Self::DuplicatedRequest => "Cannot execute duplicated request",
            Self::SdrInUpdateMode => "SDR Repository in update mode",
            Self::FirmwareUpdateMode => "Device in firmware update mode",
            Self::BmcInitializing => "BMC initialization or initialization agent in progress",
            Self::DestinationUnavailable => "Destination unavailable",
            Self::InsufficientPrivilege => {
                "Cannot execute command due to insufficient privilege level"
            }
            Self::NotSupportedInPresentState => "Command not supported in present state",
            Self::SubFunctionDisabled => "Command sub-function has been disabled or is unavailable",
            Self::Unspecified => "Unspecified error",
            Self::Unknown(_) => return None,
        };
        Some(text)
    }
}

impl From<u8> for CompletionCode {
    fn from(value: u8) -> Self {
        match value {
            0x00 => Self::Ok,
            0x80 => Self::FruDeviceNotPresent,
            0x81 => Self::FruDeviceBusy,
            0xC0 => Self::NodeBusy,
            0xC1 => Self::InvalidCommand,
            0xC2 => Self::InvalidCommandForLun,
            0xC3 => Self::ProcessingTimeout,
            0xC4 => Self::OutOfSpace,
            0xC5 => Self::ReservationCancelled,
            0xC6 => Self::RequestDataTruncated,
            0xC7 => Self::RequestDataLengthInvalid,
            0xC8 => Self::RequestDataFieldLengthExceeded,
            0xC9 => Self::ParameterOutOfRange,
            0xCA => Self::CannotReturnRequestedBytes,
            0xCB => Self::RequestedDataNotPresent,
            0xCC => Self::InvalidDataField,
            0xCD => Self::IllegalForSensorOrRecord,
            0xCE => Self::ResponseNotProvided,
            0xCF => Self::DuplicatedRequest,
            0xD0 => Self::SdrInUpdateMode,
            0xD1 => Self::FirmwareUpdateMode,
            0xD2 => Self::BmcInitializing,
            0xD3 => Self::DestinationUnavailable,
            0xD4 => Self::InsufficientPrivilege,
            0xD5 => Self::NotSupportedInPresentState,
            0xD6 => Self::SubFunctionDisabled,
            0xFF => Self::Unspecified,
            other => Self::Unknown(other),
        }
    }
}

impl From<CompletionCode> for u8 {
    fn from(code: CompletionCode) -> Self {
        code.as_u8()
    }
}

impl fmt::Display for CompletionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.description() {
            Some(text) => f.write_str(text),
            None => write!(f, "{:#04x}", self.as_u8()),
        }
    }
}
