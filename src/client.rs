use crate::commands::{
    ChassisControlCommand, ColdReset, Command, GetChassisStatus, GetDeviceId, GetSelInfo,
    GetSelfTestResults,
};
use crate::config::ClientConfig;
use crate::error::Result;
use crate::fru::{FruDeviceData, read_fru_device};
use crate::retry::Retrying;
use crate::sel::{self, SelInfo, SelRecord, Sleep, ThreadSleep};
use crate::session::Session;
use crate::types::{
    ChassisControl, ChassisStatus, DeviceId, NetFn, NetFnLun, RawResponse, SelfTestResult,
};

/// A synchronous IPMI client over an established [`Session`].
///
/// Every request goes through the timeout-only retry executor configured by
/// [`ClientConfig::retries`].
#[derive(Debug)]
pub struct Client<S> {
    session: Retrying<S>,
    config: ClientConfig,
}

impl<S: Session> Client<S> {
    /// Wrap `session`, validating `config` first.
    pub fn new(session: S, config: ClientConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            session: Retrying::new(session, config.retries()),
            config,
        })
    }

    /// Settings in use.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Borrow the underlying session.
    pub fn session(&self) -> &S {
        self.session.get_ref()
    }

    /// Mutably borrow the underlying session.
    pub fn session_mut(&mut self) -> &mut S {
        self.session.get_mut()
    }

    /// Drop the client, returning the session.
    pub fn into_session(self) -> S {
        self.session.into_inner()
    }

    /// Establish the session.
    pub fn open(&mut self) -> Result<()> {
        self.session.open()
    }

    /// Close the session.
    pub fn close(&mut self) -> Result<()> {
        self.session.close()
    }

    /// Check the BMC is reachable.
    pub fn ping(&mut self) -> Result<()> {
        self.session.ping()
    }

    /// Execute a typed command.
    pub fn execute<C: Command>(&mut self, command: &C) -> Result<C::Output> {
        self.session.execute(command)
    }

    /// Send a raw request and return the raw response.
    ///
    /// The completion code is not checked.
    pub fn send_raw(
        &mut self,
        netfn: NetFn,
        lun: u8,
        cmd: u8,
        data: &[u8],
    ) -> Result<RawResponse> {
        self.session.send(NetFnLun::request(netfn, lun), cmd, data)
    }

    /// `Get Device ID`.
    pub fn get_device_id(&mut self) -> Result<DeviceId> {
        self.execute(&GetDeviceId)
    }

    /// `Get Self Test Results`.
    pub fn get_self_test_results(&mut self) -> Result<SelfTestResult> {
        self.execute(&GetSelfTestResults)
    }

    /// `Cold Reset`.
    pub fn cold_reset(&mut self) -> Result<()> {
        self.execute(&ColdReset)
    }

    /// `Get Chassis Status`.
    pub fn get_chassis_status(&mut self) -> Result<ChassisStatus> {
        self.execute(&GetChassisStatus)
    }

    /// `Chassis Control`.
    pub fn chassis_control(&mut self, control: ChassisControl) -> Result<()> {
        self.execute(&ChassisControlCommand { control })
    }

    /// Read and decode a FRU device's inventory.
    pub fn fru_device_data(&mut self, device_id: u8, lun: u8) -> Result<FruDeviceData> {
        let chunk = self.config.fru_read_bytes();
        read_fru_device(&mut self.session, device_id, lun, chunk)
    }

    /// `Get SEL Info`.
    pub fn sel_info(&mut self) -> Result<SelInfo> {
        self.execute(&GetSelInfo)
    }

    /// Every SEL record, oldest first.
    pub fn sel_entries(&mut self) -> Result<Vec<SelRecord>> {
        sel::read_sel(&mut self.session, self.config.sel_reservation_retries())
    }

    /// `count` SEL records starting `offset` entries into the log, plus the
    /// total entry count.
    pub fn sel_entries_window(
        &mut self,
        offset: usize,
        count: usize,
    ) -> Result<(Vec<SelRecord>, usize)> {
        let recoveries = self.config.sel_reservation_retries();
        sel::sel_entries_window(&mut self.session, offset, count, recoveries)
    }

    /// The most recent `count` SEL records, plus the total entry count.
    pub fn latest_sel_entries(&mut self, count: usize) -> Result<(Vec<SelRecord>, usize)> {
        let total = usize::from(self.sel_info()?.entries);
        let offset = total.saturating_sub(count);
        let recoveries = self.config.sel_reservation_retries();
        let records = sel::read_window(&mut self.session, total, offset, count, recoveries)?;
        Ok((records, total))
    }

    /// Erase the SEL, sleeping on the current thread between polls.
    pub fn clear_sel(&mut self) -> Result<()> {
        self.clear_sel_with(&mut ThreadSleep)
    }

    /// Erase the SEL using `sleep` between polls.
    pub fn clear_sel_with<T: Sleep + ?Sized>(&mut self, sleep: &mut T) -> Result<()> {
        sel::clear_sel(
            &mut self.session,
            sleep,
            self.config.clear_poll_interval(),
            self.config.clear_poll_limit(),
        )
    }
}
