use std::collections::HashSet;

use crate::commands::{Command, GetSelEntry, GetSelInfo, ReserveSel, SelEntry};
use crate::error::{Error, Result};
use crate::sel::{RecordId, Reservation, SEL_RECORD_LEN, SelRecord};
use crate::session::{Session, execute};

/// State of one SEL enumeration.
///
/// The cursor only advances on a successfully decoded record, so after a
/// cancelled reservation the scan resumes at the record that failed.
/// Every requested and decoded record ID is remembered so a next-ID chain
/// that loops back is rejected instead of fetched forever.
#[derive(Debug, Clone)]
pub struct SelScan {
    cursor: RecordId,
    visited: HashSet<RecordId>,
    reservation: Option<Reservation>,
    recoveries: u32,
    max_recoveries: u32,
    limit: Option<usize>,
    records: Vec<SelRecord>,
    done: bool,
}

impl SelScan {
    /// Start a scan at `start`, re-reserving at most `max_recoveries` times
    /// in a row without progress.
    pub fn new(start: RecordId, max_recoveries: u32) -> Self {
        Self {
            cursor: start,
            visited: HashSet::new(),
            reservation: None,
            recoveries: 0,
            max_recoveries,
            limit: None,
            records: Vec::new(),
            done: start.is_last(),
        }
    }

    /// Stop after `limit` records.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.done |= limit == 0;
        self.limit = Some(limit);
        self
    }

    /// Record the next fetch will request.
    pub fn cursor(&self) -> RecordId {
        self.cursor
    }

    /// Reservation currently held, if any.
    pub fn reservation(&self) -> Option<Reservation> {
        self.reservation
    }

    /// `true` once the end of the log (or the limit) was reached.
    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Records decoded so far.
    pub fn records(&self) -> &[SelRecord] {
        &self.records
    }

    /// A new reservation was acquired.
    pub fn reserved(&mut self, reservation: Reservation) {
        self.reservation = Some(reservation);
    }

    /// A full record was fetched: decode it and follow its next ID.
    pub fn record(&mut self, next: RecordId, data: &[u8]) -> Result<()> {
        let record = SelRecord::decode(data)?;
        self.visited.insert(self.cursor);
        self.visited.insert(record.record_id());
        if !next.is_last() && self.visited.contains(&next) {
            return Err(Error::Protocol("SEL next record ID revisits an earlier record"));
        }
        self.records.push(record);
        self.recoveries = 0;
        self.cursor = next;
        self.done =
            next.is_last() || self.limit.is_some_and(|limit| self.records.len() >= limit);
        Ok(())
    }

    /// The controller cancelled the reservation.
    ///
    /// Drops the reservation so the next step re-reserves, or returns `err`
    /// once the recovery budget is spent.
    pub fn reservation_lost(&mut self, err: Error) -> Result<()> {
        if self.recoveries >= self.max_recoveries {
            return Err(err);
        }
        self.recoveries += 1;
        self.reservation = None;
        crate::observe::record_reservation_lost("scan", self.recoveries);
        Ok(())
    }

    /// Finish the scan.
    pub fn into_records(self) -> Vec<SelRecord> {
        self.records
    }
}

/// Read the whole SEL from the first record.
pub fn read_sel<S: Session + ?Sized>(
    session: &mut S,
    max_recoveries: u32,
) -> Result<Vec<SelRecord>> {
    read_sel_from(session, SelScan::new(RecordId::FIRST, max_recoveries))
}

/// Drive `scan` to completion.
pub fn read_sel_from<S: Session + ?Sized>(
    session: &mut S,
    mut scan: SelScan,
) -> Result<Vec<SelRecord>> {
    while !scan.is_done() {
        let reservation = match scan.reservation() {
            Some(reservation) => reservation,
            None => {
                let reservation = execute(session, &ReserveSel)?;
                scan.reserved(reservation);
                reservation
            }
        };

        match fetch_record(session, reservation, scan.cursor()) {
            Ok((next, data)) => scan.record(next, &data)?,
            Err(err) if err.is_reservation_cancelled() => scan.reservation_lost(err)?,
            Err(err) => return Err(err),
        }
    }
    Ok(scan.into_records())
}

/// Read `count` entries starting `offset` entries into the log.
///
/// Returns the records and the total entry count from `Get SEL Info`.
/// Windowing is done client-side: entries before `offset` are still fetched.
pub fn sel_entries_window<S: Session + ?Sized>(
    session: &mut S,
    offset: usize,
    count: usize,
    max_recoveries: u32,
) -> Result<(Vec<SelRecord>, usize)> {
    let total = usize::from(execute(session, &GetSelInfo)?.entries);
    let records = read_window(session, total, offset, count, max_recoveries)?;
    Ok((records, total))
}

/// Read the window `offset..offset + count` of a log holding `total` entries.
///
/// The scan limit is clamped to `total`, so any `count` is accepted.
pub(crate) fn read_window<S: Session + ?Sized>(
    session: &mut S,
    total: usize,
    offset: usize,
    count: usize,
    max_recoveries: u32,
) -> Result<Vec<SelRecord>> {
    if count == 0 || offset >= total {
        return Ok(Vec::new());
    }

    let limit = offset.saturating_add(count).min(total);
    let scan = SelScan::new(RecordId::FIRST, max_recoveries).with_limit(limit);
    let records = read_sel_from(session, scan)?;
    Ok(records.into_iter().skip(offset).take(count).collect())
}

/// Fetch one full record, assembling it from partial reads if the controller
/// returns fewer bytes than a record.
fn fetch_record<S: Session + ?Sized>(
    session: &mut S,
    reservation: Reservation,
    record_id: RecordId,
) -> Result<(RecordId, Vec<u8>)> {
    let SelEntry { next, mut data } =
        execute(session, &GetSelEntry::whole(reservation, record_id))?;

    while data.len() < SEL_RECORD_LEN {
        let missing = SEL_RECORD_LEN - data.len();
        let partial = GetSelEntry {
            reservation,
            record_id,
            offset: data.len() as u8,
            bytes_to_read: missing as u8,
        };
        let entry = execute(session, &partial)?;
        if entry.data.is_empty() {
            return Err(Error::malformed(GetSelEntry::NAME, SEL_RECORD_LEN, &data));
        }
        data.extend_from_slice(&entry.data);
    }
    Ok((next, data))
}
