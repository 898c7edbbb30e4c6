#![allow(dead_code)]

use std::collections::VecDeque;
use std::time::Duration;

use ipmi_inventory::sel::Sleep;
use ipmi_inventory::{Error, NetFnLun, RawResponse, Result, Session};

/// One request as the session saw it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub netfn_lun: u8,
    pub cmd: u8,
    pub data: Vec<u8>,
}

/// In-memory session replaying scripted replies in order.
#[derive(Debug, Default)]
pub struct ScriptedSession {
    replies: VecDeque<Result<RawResponse>>,
    pub requests: Vec<Request>,
    pub opened: bool,
}

impl ScriptedSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Successful reply carrying `data`.
    pub fn ok(mut self, data: impl Into<Vec<u8>>) -> Self {
        self.replies.push_back(Ok(RawResponse {
            completion_code: 0x00,
            data: data.into(),
        }));
        self
    }

    /// Reply with a non-zero completion code.
    pub fn code(mut self, completion_code: u8) -> Self {
        self.replies.push_back(Ok(RawResponse {
            completion_code,
            data: Vec::new(),
        }));
        self
    }

    /// Transport timeout.
    pub fn timeout(mut self) -> Self {
        self.replies.push_back(Err(Error::Timeout));
        self
    }

    /// Command bytes of every request, in order.
    pub fn commands(&self) -> Vec<u8> {
        self.requests.iter().map(|r| r.cmd).collect()
    }

    /// Replies not consumed yet.
    pub fn remaining(&self) -> usize {
        self.replies.len()
    }
}

impl Session for ScriptedSession {
    fn open(&mut self) -> Result<()> {
        self.opened = true;
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        self.opened = false;
        Ok(())
    }

    fn ping(&mut self) -> Result<()> {
        Ok(())
    }

    fn send(&mut self, netfn_lun: NetFnLun, cmd: u8, data: &[u8]) -> Result<RawResponse> {
        self.requests.push(Request {
            netfn_lun: netfn_lun.as_u8(),
            cmd,
            data: data.to_vec(),
        });
        self.replies
            .pop_front()
            .unwrap_or(Err(Error::Protocol("no scripted reply left")))
    }
}

/// Sleep that records requested delays instead of waiting.
#[derive(Debug, Default)]
pub struct RecordingSleep(pub Vec<Duration>);

impl Sleep for RecordingSleep {
    fn sleep(&mut self, duration: Duration) {
        self.0.push(duration);
    }
}

/// A 16-byte system event record.
pub fn event_record(id: u16) -> Vec<u8> {
    let mut data = vec![0u8; 16];
    data[..2].copy_from_slice(&id.to_le_bytes());
    data[2] = 0x02;
    data[3..7].copy_from_slice(&0x6000_0000u32.to_le_bytes());
    data[7] = 0x20;
    data[9] = 0x04;
    data[10] = 0x01;
    data[11] = 0x30;
    data[12] = 0x01;
    data[13] = 0x59;
    data
}

/// `Get SEL Entry` response data: next ID followed by the record.
pub fn sel_entry(next: u16, record: &[u8]) -> Vec<u8> {
    let mut data = next.to_le_bytes().to_vec();
    data.extend_from_slice(record);
    data
}
