use std::time::Duration;

use crate::commands::{ClearSel, ReserveSel};
use crate::error::{Error, Result};
use crate::sel::{ErasureProgress, Reservation};
use crate::session::{Session, execute};

/// Blocking delay between erasure polls.
///
/// Tests substitute a recorder so no real time passes.
pub trait Sleep {
    /// Wait for `duration`.
    fn sleep(&mut self, duration: Duration);
}

/// [`Sleep`] backed by [`std::thread::sleep`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadSleep;

impl Sleep for ThreadSleep {
    fn sleep(&mut self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Where a SEL erasure stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearSelState {
    /// Nothing sent yet.
    Idle,
    /// Initiate sent, no progress reported yet.
    EraseRequested,
    /// The controller reported erasure in progress.
    EraseInProgress,
    /// Erasure finished.
    EraseCompleted,
}

/// What to do after a progress report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearStep {
    /// Wait, then poll again.
    Wait(Duration),
    /// Erasure completed.
    Done,
    /// Still in progress and the poll budget is spent.
    Exhausted {
        /// Clear commands sent.
        polls: u32,
    },
}

/// Clear-SEL state machine.
///
/// Every `Clear SEL` command counts against the budget, the initiating one
/// included, so `InProgress` K times followed by `Completed` succeeds after
/// K + 1 commands.
#[derive(Debug, Clone)]
pub struct SelErasure {
    state: ClearSelState,
    polls: u32,
    max_polls: u32,
    interval: Duration,
}

impl SelErasure {
    /// New erasure allowing `max_polls` clear commands (at least one).
    pub fn new(interval: Duration, max_polls: u32) -> Self {
        Self {
            state: ClearSelState::Idle,
            polls: 0,
            max_polls: max_polls.max(1),
            interval,
        }
    }

    /// Current state.
    pub fn state(&self) -> ClearSelState {
        self.state
    }

    /// Clear commands accounted for so far.
    pub fn polls(&self) -> u32 {
        self.polls
    }

    /// The command to send next: initiate from `Idle`, otherwise a status
    /// poll.
    pub fn next_command(&mut self, reservation: Reservation) -> ClearSel {
        match self.state {
            ClearSelState::Idle => {
                self.state = ClearSelState::EraseRequested;
                ClearSel::initiate(reservation)
            }
            _ => ClearSel::status(reservation),
        }
    }

    /// Apply a progress report.
    pub fn advance(&mut self, progress: ErasureProgress) -> ClearStep {
        self.polls += 1;
        match progress {
            ErasureProgress::Completed => {
                self.state = ClearSelState::EraseCompleted;
                ClearStep::Done
            }
            ErasureProgress::InProgress => {
                self.state = ClearSelState::EraseInProgress;
                if self.polls >= self.max_polls {
                    ClearStep::Exhausted { polls: self.polls }
                } else {
                    ClearStep::Wait(self.interval)
                }
            }
        }
    }

    /// The reservation was cancelled by the controller.
    ///
    /// The failed command counts against the budget. A rejected initiate is
    /// sent again after re-reserving. Returns `err` once the budget is spent.
    pub fn reservation_lost(&mut self, err: Error) -> Result<()> {
        self.polls += 1;
        if self.state == ClearSelState::EraseRequested {
            self.state = ClearSelState::Idle;
        }
        if self.polls >= self.max_polls {
            return Err(err);
        }
        crate::observe::record_reservation_lost("clear", self.polls);
        Ok(())
    }
}

/// Erase the SEL and wait for completion.
///
/// Reserves, initiates the erase and polls every `interval` until the
/// controller reports completion or `max_polls` clear commands were sent.
pub fn clear_sel<S, T>(
    session: &mut S,
    sleep: &mut T,
    interval: Duration,
    max_polls: u32,
) -> Result<()>
where
    S: Session + ?Sized,
    T: Sleep + ?Sized,
{
    let mut erasure = SelErasure::new(interval, max_polls);
    let mut reservation = execute(session, &ReserveSel)?;

    loop {
        let command = erasure.next_command(reservation);
        match execute(session, &command) {
            Ok(progress) => {
                crate::observe::record_clear_poll(erasure.polls() + 1, progress.is_completed());
                match erasure.advance(progress) {
                    ClearStep::Done => return Ok(()),
                    ClearStep::Wait(delay) => sleep.sleep(delay),
                    ClearStep::Exhausted { polls } => return Err(Error::EraseTimeout { polls }),
                }
            }
            Err(err) if err.is_reservation_cancelled() => {
                erasure.reservation_lost(err)?;
                reservation = execute(session, &ReserveSel)?;
            }
            Err(err) => return Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::ClearSelAction;
    use crate::completion::CompletionCode;

    const INTERVAL: Duration = Duration::from_millis(10);

    #[test]
    fn synchronous_completion() {
        let mut erasure = SelErasure::new(INTERVAL, 3);
        let command = erasure.next_command(Reservation::new(1));
        assert_eq!(command.action, ClearSelAction::InitiateErase);
        assert_eq!(erasure.state(), ClearSelState::EraseRequested);
        assert_eq!(erasure.advance(ErasureProgress::Completed), ClearStep::Done);
        assert_eq!(erasure.state(), ClearSelState::EraseCompleted);
        assert_eq!(erasure.polls(), 1);
    }

    #[test]
    fn in_progress_then_completed() {
        let k = 4;
        let mut erasure = SelErasure::new(INTERVAL, 10);
        for i in 0..k {
            let command = erasure.next_command(Reservation::new(1));
            let expected = if i == 0 {
                ClearSelAction::InitiateErase
            } else {
                ClearSelAction::GetErasureStatus
            };
            assert_eq!(command.action, expected);
            assert_eq!(erasure.advance(ErasureProgress::InProgress), ClearStep::Wait(INTERVAL));
            assert_eq!(erasure.state(), ClearSelState::EraseInProgress);
        }
        erasure.next_command(Reservation::new(1));
        assert_eq!(erasure.advance(ErasureProgress::Completed), ClearStep::Done);
        assert_eq!(erasure.polls(), k + 1);
    }

    #[test]
    fn budget_exhaustion_is_not_success() {
        let mut erasure = SelErasure::new(INTERVAL, 2);
        assert_eq!(erasure.advance(ErasureProgress::InProgress), ClearStep::Wait(INTERVAL));
        assert_eq!(
            erasure.advance(ErasureProgress::InProgress),
            ClearStep::Exhausted { polls: 2 }
        );
        assert_ne!(erasure.state(), ClearSelState::EraseCompleted);
    }

    #[test]
    fn rejected_initiate_is_resent() {
        let mut erasure = SelErasure::new(INTERVAL, 5);
        erasure.next_command(Reservation::new(1));
        let err = Error::CompletionCode {
            command: "Clear SEL",
            code: CompletionCode::ReservationCancelled,
        };
        erasure.reservation_lost(err).expect("recover");
        assert_eq!(erasure.state(), ClearSelState::Idle);
        let command = erasure.next_command(Reservation::new(2));
        assert_eq!(command.action, ClearSelAction::InitiateErase);
        assert_eq!(command.reservation, Reservation::new(2));
    }
}
