#![deny(unsafe_code)]
#![warn(missing_docs)]

//! A blocking IPMI client layer: command codec, FRU inventory and SEL
//! protocols over an abstract session.
//!
//! The crate implements:
//! - Typed request/response commands with completion-code checking
//! - FRU Common Header and info area decoding, with chunked retrieval
//! - Reservation-guarded SEL enumeration and record decoding
//! - Clear-SEL initiate/poll state machine
//! - Timeout-only retry of single requests
//!
//! Session establishment and transport (RMCP+ key exchange, UDP, integrity
//! and confidentiality) are provided by the caller through [`Session`].

mod client;
pub mod commands;
mod completion;
mod config;
mod debug;
mod error;
pub mod fru;
mod observe;
mod retry;
pub mod sel;
mod session;
mod types;

pub use crate::client::Client;
pub use crate::commands::Command;
pub use crate::completion::CompletionCode;
pub use crate::config::{ClientConfig, ClientConfigBuilder, SecretBytes};
pub use crate::error::{ConfigError, Error, FruError, Result};
pub use crate::retry::{Retrying, execute_with_retry, retry_on_timeout};
pub use crate::session::{Session, execute};
pub use crate::types::{
    ChassisControl, ChassisStatus, DeviceId, NetFn, NetFnLun, PowerRestorePolicy,
    PrivilegeLevel, RawResponse, SelfTestDeviceError, SelfTestResult,
};
