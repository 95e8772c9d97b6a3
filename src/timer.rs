use std::time::{Duration, Instant};

use crate::interval::RestInterval;

/// Identifies one scheduled expiry. Only the ticket from the latest
/// `RestTimer::start` is honoured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerTicket(u64);

#[derive(Debug, Clone, Copy)]
struct Pending {
    ticket: TimerTicket,
    due_at: Instant,
}

/// Single-shot countdown to the next rest prompt.
///
/// Each `start` bumps the epoch, which makes every earlier ticket stale. The
/// runtime sleeps on the returned duration and hands the ticket back through
/// `expire`; a stale ticket means the schedule was replaced in the meantime
/// and the wake-up is dropped. At most one expiry is pending at any moment.
#[derive(Debug, Default)]
pub struct RestTimer {
    epoch: u64,
    pending: Option<Pending>,
}

impl RestTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancels any pending expiry and schedules a new one `interval` after `now`.
    pub fn start(&mut self, now: Instant, interval: RestInterval) -> (TimerTicket, Duration) {
        self.epoch = self.epoch.wrapping_add(1);
        let ticket = TimerTicket(self.epoch);
        let after = interval.as_duration();
        self.pending = Some(Pending {
            ticket,
            due_at: now + after,
        });
        (ticket, after)
    }

    /// Consumes the pending expiry if `ticket` is the current one.
    pub fn expire(&mut self, ticket: TimerTicket) -> bool {
        match self.pending {
            Some(pending) if pending.ticket == ticket => {
                self.pending = None;
                true
            }
            _ => false,
        }
    }

    pub fn due_at(&self) -> Option<Instant> {
        self.pending.map(|p| p.due_at)
    }
}
