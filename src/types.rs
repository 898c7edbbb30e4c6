use core::fmt;

/// The privilege level requested for the IPMI session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum PrivilegeLevel {
    /// Callback privilege.
    Callback = 0x01,
    /// User privilege.
    User = 0x02,
    /// Operator privilege.
    Operator = 0x03,
    /// Administrator privilege.
    Administrator = 0x04,
    /// OEM-defined privilege.
    Oem = 0x05,
}

impl PrivilegeLevel {
    /// Raw privilege value.
    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

/// Network function: the controller subsystem a command is addressed to.
///
/// Only request codes (even values) are stored; the response code is the
/// request code plus one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NetFn {
    /// Chassis (0x00).
    Chassis,
    /// Bridge (0x02).
    Bridge,
    /// Sensor/Event (0x04).
    SensorEvent,
    /// Application (0x06).
    App,
    /// Firmware (0x08).
    Firmware,
    /// Storage: FRU, SDR and SEL (0x0A).
    Storage,
    /// Transport (0x0C).
    Transport,
    /// Group extension (0x2C).
    Group,
    /// OEM/Group (0x2E).
    OemGroup,
    /// Controller-specific OEM range (0x30..=0x3E).
    Oem(u8),
}

impl NetFn {
    /// Request code (6 bits, even).
    pub fn request_code(self) -> u8 {
        match self {
            Self::Chassis => 0x00,
            Self::Bridge => 0x02,
            Self::SensorEvent => 0x04,
            Self::App => 0x06,
            Self::Firmware => 0x08,
            Self::Storage => 0x0A,
            Self::Transport => 0x0C,
            Self::Group => 0x2C,
            Self::OemGroup => 0x2E,
            Self::Oem(code) => code & 0x3E,
        }
    }

    /// Parse a 6-bit NetFn code; the direction bit is ignored.
    pub fn from_code(code: u8) -> Option<Self> {
        let netfn = match code & 0x3E {
            0x00 => Self::Chassis,
            0x02 => Self::Bridge,
            0x04 => Self::SensorEvent,
            0x06 => Self::App,
            0x08 => Self::Firmware,
            0x0A => Self::Storage,
            0x0C => Self::Transport,
            0x2C => Self::Group,
            0x2E => Self::OemGroup,
            c @ 0x30..=0x3E => Self::Oem(c),
            _ => return None,
        };
        Some(netfn)
    }
}

/// NetFn, LUN and direction packed into the first request/response byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NetFnLun {
    netfn: NetFn,
    lun: u8,
    response: bool,
}

impl NetFnLun {
    /// Address a request to `netfn` on `lun` (low two bits are used).
    pub fn request(netfn: NetFn, lun: u8) -> Self {
        Self {
            netfn,
            lun: lun & 0x03,
            response: false,
        }
    }

    /// The matching response address.
    pub fn to_response(self) -> Self {
        Self {
            response: true,
            ..self
        }
    }

    /// Network function.
    pub fn netfn(self) -> NetFn {
        self.netfn
    }

    /// Logical unit number (0..=3).
    pub fn lun(self) -> u8 {
        self.lun
    }

    /// `true` for the response direction.
    pub fn is_response(self) -> bool {
        self.response
    }

    /// Wire byte: `netfn << 2 | lun`, with bit 2 set for responses.
    pub fn as_u8(self) -> u8 {
        let code = self.netfn.request_code() | u8::from(self.response);
        (code << 2) | self.lun
    }

    /// Parse a wire byte.
    pub fn from_u8(byte: u8) -> Option<Self> {
        let code = byte >> 2;
        Some(Self {
            netfn: NetFn::from_code(code)?,
            lun: byte & 0x03,
            response: code & 0x01 != 0,
        })
    }
}

/// A raw IPMI response.
#[derive(Clone, PartialEq, Eq)]
pub struct RawResponse {
    /// IPMI completion code.
    pub completion_code: u8,
    /// Payload bytes after the completion code.
    pub data: Vec<u8>,
}

impl RawResponse {
    /// Split a response payload into completion code and data.
    ///
    /// Returns `None` for an empty payload.
    pub fn from_payload(payload: &[u8]) -> Option<Self> {
        let (&completion_code, data) = payload.split_first()?;
        Some(Self {
            completion_code,
            data: data.to_vec(),
        })
    }
}

impl fmt::Debug for RawResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawResponse")
            .field(
                "completion_code",
                &format_args!("{:#04x}", self.completion_code),
            )
            .field("data_len", &self.data.len())
            .finish()
    }
}

/// Parsed response for the `Get Device ID` command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceId {
    /// Device ID (BMC-defined).
    pub device_id: u8,
    /// Device revision (lower 4 bits).
    pub device_revision: u8,
    /// Firmware major revision (7 bits).
    pub firmware_major: u8,
    /// Firmware minor revision (BCD).
    pub firmware_minor: u8,
    /// IPMI version as BCD (e.g. 0x02 for 2.0).
    pub ipmi_version: u8,
    /// Additional device support bit mask (SEL, FRU, SDR, ...).
    pub additional_support: u8,
    /// Manufacturer ID (24-bit IANA enterprise number).
    pub manufacturer_id: u32,
    /// Product ID.
    pub product_id: u16,
    /// Auxiliary firmware revision, when present.
    pub aux_firmware_revision: Option<[u8; 4]>,
}

impl DeviceId {
    /// Device provides a System Event Log.
    pub fn supports_sel(&self) -> bool {
        self.additional_support & 0x04 != 0
    }

    /// Device provides FRU inventory.
    pub fn supports_fru_inventory(&self) -> bool {
        self.additional_support & 0x08 != 0
    }
}

/// Parsed response for the `Get Self Test Results` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelfTestResult {
    /// `0x55`: all self tests passed.
    Passed,
    /// `0x56`: self test not implemented.
    NotImplemented,
    /// `0x57`: corrupted or inaccessible data or devices.
    DeviceError(SelfTestDeviceError),
    /// `0x58`: fatal hardware error with a device-specific code.
    FatalError(u8),
    /// Any other device-specific status.
    DeviceSpecific {
        /// Self-test result code.
        code: u8,
        /// Device-specific detail byte.
        detail: u8,
    },
}

impl fmt::Display for SelfTestResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Passed => f.write_str("No error, All Self Tests Passed"),
            Self::NotImplemented => {
                f.write_str("Self Test function not implemented in this controller")
            }
            Self::DeviceError(err) => write!(f, "Corrupted or inaccessible data or devices: {err}"),
            Self::FatalError(detail) => write!(
                f,
                "Fatal hardware error (BMC inoperative), device specific information {detail:#04x}"
            ),
            Self::DeviceSpecific { code, detail } => {
                write!(f, "Unknown internal failure, code {code:#04x}/{detail:#04x}")
            }
        }
    }
}

/// Failure bits from self-test result code `0x57`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelfTestDeviceError(u8);

impl SelfTestDeviceError {
    const DESCRIPTIONS: [&'static str; 8] = [
        "Controller operational firmware corrupted",
        "Controller update 'boot block' firmware corrupted",
        "Internal Use Area of BMC FRU corrupted",
        "SDR Repository empty",
        "IPMB signal lines do not respond",
        "Cannot access BMC FRU device",
        "Cannot access SDR Repository",
        "Cannot access SEL device",
    ];

    pub(crate) fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    /// Raw bit field.
    pub fn bits(self) -> u8 {
        self.0
    }

    /// Cannot access the SEL device (bit 7).
    pub fn sel_access_error(self) -> bool {
        self.0 & 0x80 != 0
    }

    /// Cannot access the BMC FRU device (bit 5).
    pub fn fru_access_error(self) -> bool {
        self.0 & 0x20 != 0
    }

    /// Descriptions of every set bit, lowest bit first.
    pub fn descriptions(self) -> impl Iterator<Item = &'static str> {
        Self::DESCRIPTIONS
            .into_iter()
            .enumerate()
            .filter(move |(bit, _)| self.0 & (1 << bit) != 0)
            .map(|(_, text)| text)
    }
}

impl fmt::Display for SelfTestDeviceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, text) in self.descriptions().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            f.write_str(text)?;
        }
        Ok(())
    }
}

/// Power restore policy reported by `Get Chassis Status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerRestorePolicy {
    /// Always remain off after AC loss.
    AlwaysOff,
    /// Restore previous power state after AC loss.
    Previous,
    /// Always power on after AC loss.
    AlwaysOn,
    /// Policy not known.
    Unknown,
}

/// Parsed response for the `Get Chassis Status` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChassisStatus {
    /// System power is on.
    pub power_on: bool,
    /// Power overload, interlock, main power or control fault.
    pub power_fault: bool,
    /// Power restore policy.
    pub restore_policy: PowerRestorePolicy,
    /// Last power event bit field (byte 2).
    pub last_power_event: u8,
    /// Chassis intrusion active.
    pub intrusion: bool,
    /// Drive fault.
    pub drive_fault: bool,
    /// Cooling/fan fault.
    pub cooling_fault: bool,
}

/// Chassis control operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ChassisControl {
    /// Power down the system.
    PowerDown = 0x00,
    /// Power up the system.
    PowerUp = 0x01,
    /// Power cycle the system.
    PowerCycle = 0x02,
    /// Hard reset the system.
    HardReset = 0x03,
    /// Pulse diagnostic interrupt.
    PulseDiagnostic = 0x04,
    /// ACPI soft shutdown.
    AcpiSoft = 0x05,
}
