use std::io;

use thiserror::Error;

use crate::completion::CompletionCode;

/// Result type used across this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by this crate.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error (socket, OS, etc.).
    #[error("io error: {0}")]
    Io(#[from] io::Error),

    /// Operation timed out.
    #[error("timeout waiting for response")]
    Timeout,

    /// Invalid settings, detected before any I/O.
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// Response shorter than the command's minimum length.
    #[error("invalid {command} response size: {actual}/{expected} [raw: {data}]")]
    MalformedResponse {
        /// Command name.
        command: &'static str,
        /// Minimum expected length (bytes after the completion code).
        expected: usize,
        /// Bytes actually received.
        actual: usize,
        /// Hex dump of the received bytes.
        data: String,
    },

    /// An IPMI command completed with a non-zero completion code.
    #[error("{command}: completion code {:#04x} ({code})", .code.as_u8())]
    CompletionCode {
        /// Command name.
        command: &'static str,
        /// Completion code returned by the BMC.
        code: CompletionCode,
    },

    /// FRU inventory data could not be decoded.
    #[error("fru: {0}")]
    Fru(#[from] FruError),

    /// A FRU chunk read failed part-way through assembly.
    #[error("fru read failed at offset {offset} after {} bytes: {source}", .collected.len())]
    FruRead {
        /// Byte offset of the failed read.
        offset: u16,
        /// Bytes assembled before the failure.
        collected: Vec<u8>,
        /// The failed read's error.
        #[source]
        source: Box<Error>,
    },

    /// SEL erasure still in progress after the poll budget.
    #[error("SEL erasure still in progress after {polls} polls")]
    EraseTimeout {
        /// Number of clear commands sent.
        polls: u32,
    },

    /// Controller behaved outside the protocol.
    #[error("protocol error: {0}")]
    Protocol(&'static str),
}

impl Error {
    pub(crate) fn malformed(command: &'static str, expected: usize, data: &[u8]) -> Self {
        Self::MalformedResponse {
            command,
            expected,
            actual: data.len(),
            data: hex::encode(data),
        }
    }

    /// `true` for a transport deadline, the only retryable failure.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout)
    }

    /// The completion code, if the BMC rejected the request.
    pub fn completion_code(&self) -> Option<CompletionCode> {
        match self {
            Self::CompletionCode { code, .. } => Some(*code),
            Self::FruRead { source, .. } => source.completion_code(),
            _ => None,
        }
    }

    /// `true` when the SEL reservation was cancelled by the controller.
    pub fn is_reservation_cancelled(&self) -> bool {
        self.completion_code() == Some(CompletionCode::ReservationCancelled)
    }

    /// Stable label for the error class.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Io(_) => "io",
            Self::Timeout => "timeout",
            Self::Config(_) => "config",
            Self::MalformedResponse { .. } => "malformed_response",
            Self::CompletionCode { .. } => "completion_code",
            Self::Fru(_) => "fru",
            Self::FruRead { source, .. } => source.kind(),
            Self::EraseTimeout { .. } => "erase_timeout",
            Self::Protocol(_) => "protocol",
        }
    }
}

/// Invalid client settings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Username is longer than 16 bytes.
    #[error("username is too long: {0} bytes")]
    UsernameTooLong(usize),
    /// Password is longer than 20 bytes.
    #[error("password is too long: {0} bytes")]
    PasswordTooLong(usize),
    /// Cipher suite ID outside the defined table.
    #[error("invalid cipher suite ID: {0}")]
    InvalidCipherSuite(u8),
    /// Cipher suite ID defined but not supported.
    #[error("unsupported cipher suite ID: {0}")]
    UnsupportedCipherSuite(u8),
    /// Privilege level that cannot be requested for a session.
    #[error("unsupported privilege level: {0:?}")]
    UnsupportedPrivilege(crate::types::PrivilegeLevel),
    /// FRU chunk size of zero.
    #[error("FRU read size must be at least 1 byte")]
    ZeroFruReadSize,
}

/// FRU inventory decode failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FruError {
    /// Fewer than 8 bytes of Common Header.
    #[error("invalid common header size: {0}/8")]
    HeaderTooShort(usize),
    /// Common Header format version is not 1.
    #[error("invalid common header format version: {0}")]
    HeaderVersion(u8),
    /// Common Header checksum mismatch.
    #[error("common header checksum mismatch: computed {computed:#04x}, stored {stored:#04x}")]
    HeaderChecksum {
        /// Checksum computed over bytes 0..7.
        computed: u8,
        /// Checksum byte found in the header.
        stored: u8,
    },
    /// Area offset points past the end of the data.
    #[error("{area} area offset {offset} is beyond FRU data size {size}")]
    AreaOffset {
        /// Area name.
        area: &'static str,
        /// Byte offset of the area.
        offset: usize,
        /// Size of the FRU data.
        size: usize,
    },
    /// Fewer bytes than the fixed area header.
    #[error("invalid {area} area size: {available}/{needed}")]
    AreaTooShort {
        /// Area name.
        area: &'static str,
        /// Bytes required.
        needed: usize,
        /// Bytes available.
        available: usize,
    },
    /// Area format version is not 1.
    #[error("invalid {area} area format version: {version}")]
    AreaVersion {
        /// Area name.
        area: &'static str,
        /// Version found.
        version: u8,
    },
    /// Declared area length exceeds the available data.
    #[error("invalid {area} area size: need {declared}, FRU data has {available}")]
    AreaLength {
        /// Area name.
        area: &'static str,
        /// Declared length in bytes.
        declared: usize,
        /// Bytes available from the area start.
        available: usize,
    },
    /// Declared area length leaves no room for the field list.
    #[error("{area} area length {length} too small for fields starting at {fields_start}")]
    NoFields {
        /// Area name.
        area: &'static str,
        /// Declared length in bytes.
        length: usize,
        /// Offset of the first field.
        fields_start: usize,
    },
    /// A FRU read returned no data before the declared size was reached.
    #[error("empty FRU read at offset {0}")]
    EmptyRead(u16),
    /// Field value longer than a type/length byte can describe.
    #[error("FRU field is too long: {0}/63 bytes")]
    FieldTooLong(usize),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_carries_hex_dump() {
        let err = Error::malformed("Get SEL Info", 14, &[0x51, 0x02, 0xab]);
        let Error::MalformedResponse {
            command,
            expected,
            actual,
            data,
        } = &err
        else {
            panic!("expected malformed response");
        };
        assert_eq!(*command, "Get SEL Info");
        assert_eq!(*expected, 14);
        assert_eq!(*actual, 3);
        assert_eq!(data, "5102ab");
        assert_eq!(
            err.to_string(),
            "invalid Get SEL Info response size: 3/14 [raw: 5102ab]"
        );
    }

    #[test]
    fn kinds_stay_distinct() {
        let cc = Error::CompletionCode {
            command: "Reserve SEL",
            code: CompletionCode::ReservationCancelled,
        };
        assert_eq!(cc.kind(), "completion_code");
        assert!(cc.is_reservation_cancelled());
        assert!(!cc.is_timeout());

        assert!(Error::Timeout.is_timeout());
        assert_eq!(Error::Timeout.completion_code(), None);
        assert_eq!(
            Error::Config(ConfigError::ZeroFruReadSize).kind(),
            "config"
        );
    }

    #[test]
    fn fru_read_reports_inner_kind() {
        let err = Error::FruRead {
            offset: 24,
            collected: vec![0; 24],
            source: Box::new(Error::CompletionCode {
                command: "Read FRU Data",
                code: CompletionCode::FruDeviceBusy,
            }),
        };
        assert_eq!(err.kind(), "completion_code");
        assert_eq!(err.completion_code(), Some(CompletionCode::FruDeviceBusy));
    }
}
