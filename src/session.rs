use std::time::Instant;

use crate::commands::Command;
use crate::error::Result;
use crate::types::{NetFnLun, RawResponse};

/// An established IPMI session with a BMC.
///
/// Implementations own the transport: socket handling, RMCP+ framing,
/// sequence numbers, integrity and confidentiality. This crate only relies on
/// one synchronous request/response exchange per [`send`](Session::send).
pub trait Session {
    /// Establish the session.
    fn open(&mut self) -> Result<()>;

    /// Close the session.
    fn close(&mut self) -> Result<()>;

    /// Check that the BMC is reachable.
    fn ping(&mut self) -> Result<()>;

    /// Send one request and wait for its response.
    ///
    /// A transport deadline must surface as [`Error::Timeout`]. A non-zero
    /// completion code is *not* an error at this level.
    ///
    /// [`Error::Timeout`]: crate::Error::Timeout
    fn send(&mut self, netfn_lun: NetFnLun, cmd: u8, data: &[u8]) -> Result<RawResponse>;

    /// Execute a typed command (single request/response).
    fn execute<C: Command>(&mut self, command: &C) -> Result<C::Output>
    where
        Self: Sized,
    {
        execute(self, command)
    }
}

impl<S: Session + ?Sized> Session for Box<S> {
    fn open(&mut self) -> Result<()> {
        (**self).open()
    }

    fn close(&mut self) -> Result<()> {
        (**self).close()
    }

    fn ping(&mut self) -> Result<()> {
        (**self).ping()
    }

    fn send(&mut self, netfn_lun: NetFnLun, cmd: u8, data: &[u8]) -> Result<RawResponse> {
        (**self).send(netfn_lun, cmd, data)
    }
}

/// Encode `command`, send it, check the completion code and decode.
///
/// Works with unsized sessions such as `dyn Session`.
pub fn execute<S, C>(session: &mut S, command: &C) -> Result<C::Output>
where
    S: Session + ?Sized,
    C: Command,
{
    let netfn_lun = command.netfn_lun();
    let data = command.request_data();
    crate::debug::dump_hex("ipmi request", C::NAME, &data);

    let start = Instant::now();
    let response = match session.send(netfn_lun, C::CMD, &data) {
        Ok(response) => {
            crate::observe::record_ok(
                C::NAME,
                netfn_lun.as_u8(),
                C::CMD,
                start.elapsed(),
                response.completion_code,
            );
            response
        }
        Err(err) => {
            crate::observe::record_err(C::NAME, netfn_lun.as_u8(), C::CMD, start.elapsed(), &err);
            return Err(err);
        }
    };
    crate::debug::dump_hex("ipmi response", C::NAME, &response.data);

    command.parse_response(response)
}
