use crate::commands::Command;
use crate::error::Result;
use crate::session::{Session, execute};
use crate::types::{NetFnLun, RawResponse};

/// Run `op` until it succeeds, fails with a non-timeout error, or `retries`
/// extra attempts have timed out.
///
/// `op` receives the zero-based attempt number.
pub fn retry_on_timeout<T>(retries: u32, mut op: impl FnMut(u32) -> Result<T>) -> Result<T> {
    let mut attempt = 0;
    loop {
        match op(attempt) {
            Err(err) if err.is_timeout() && attempt < retries => attempt += 1,
            result => return result,
        }
    }
}

/// Execute one command, re-sending it unchanged after each timeout.
pub fn execute_with_retry<S, C>(session: &mut S, command: &C, retries: u32) -> Result<C::Output>
where
    S: Session + ?Sized,
    C: Command,
{
    retry_on_timeout(retries, |attempt| {
        if attempt > 0 {
            crate::observe::record_retry(command.netfn_lun().as_u8(), C::CMD, attempt, retries);
        }
        execute(session, command)
    })
}

/// A [`Session`] that retries every request on transport timeout.
///
/// Completion-code failures and malformed responses are never retried: the
/// controller has already processed the request.
#[derive(Debug)]
pub struct Retrying<S> {
    inner: S,
    retries: u32,
}

impl<S: Session> Retrying<S> {
    /// Wrap `inner`, allowing `retries` extra attempts per request.
    pub fn new(inner: S, retries: u32) -> Self {
        Self { inner, retries }
    }

    /// Configured retry count.
    pub fn retries(&self) -> u32 {
        self.retries
    }

    /// Borrow the wrapped session.
    pub fn get_ref(&self) -> &S {
        &self.inner
    }

    /// Mutably borrow the wrapped session.
    pub fn get_mut(&mut self) -> &mut S {
        &mut self.inner
    }

    /// Unwrap the session.
    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: Session> Session for Retrying<S> {
    fn open(&mut self) -> Result<()> {
        self.inner.open()
    }

    fn close(&mut self) -> Result<()> {
        self.inner.close()
    }

    fn ping(&mut self) -> Result<()> {
        let inner = &mut self.inner;
        retry_on_timeout(self.retries, |_| inner.ping())
    }

    fn send(&mut self, netfn_lun: NetFnLun, cmd: u8, data: &[u8]) -> Result<RawResponse> {
        let retries = self.retries;
        let inner = &mut self.inner;
        retry_on_timeout(retries, |attempt| {
            if attempt > 0 {
                crate::observe::record_retry(netfn_lun.as_u8(), cmd, attempt, retries);
            }
            inner.send(netfn_lun, cmd, data)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn non_timeout_error_is_attempted_once() {
        let mut attempts = 0;
        let result: Result<()> = retry_on_timeout(5, |_| {
            attempts += 1;
            Err(Error::Protocol("desync"))
        });
        assert!(matches!(result, Err(Error::Protocol("desync"))));
        assert_eq!(attempts, 1);
    }

    #[test]
    fn succeeds_after_retries_timeouts() {
        let retries = 3;
        let mut attempts = 0;
        let result = retry_on_timeout(retries, |attempt| {
            attempts += 1;
            if attempt < retries {
                Err(Error::Timeout)
            } else {
                Ok(attempt)
            }
        });
        assert_eq!(result.expect("retry"), 3);
        assert_eq!(attempts, retries + 1);
    }

    #[test]
    fn exhausted_budget_returns_timeout() {
        let mut attempts = 0;
        let result: Result<()> = retry_on_timeout(2, |_| {
            attempts += 1;
            Err(Error::Timeout)
        });
        assert!(matches!(result, Err(Error::Timeout)));
        assert_eq!(attempts, 3);
    }

    #[test]
    fn zero_retries_means_single_attempt() {
        let mut attempts = 0;
        let result: Result<()> = retry_on_timeout(0, |_| {
            attempts += 1;
            Err(Error::Timeout)
        });
        assert!(result.is_err());
        assert_eq!(attempts, 1);
    }
}
