use std::time::Duration;

/// Fixed-period capture timer on an externally supplied clock.
///
/// Like a repeating interval timer, a late tick fires once and the schedule re-anchors to the
/// current time instead of bursting to catch up.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CaptureSchedule {
    period: Duration,
    next_due: Option<Duration>,
}

impl CaptureSchedule {
    /// First capture is due one period after `start`.
    pub fn new(period: Duration, start: Duration) -> Self {
        Self {
            period,
            next_due: Some(start + period),
        }
    }

    /// Capture period.
    pub fn period(&self) -> Duration {
        self.period
    }

    /// Time of the next capture, or `None` once cancelled.
    pub fn next_due(&self) -> Option<Duration> {
        self.next_due
    }

    /// Whether a capture is due at `now`; consumes the tick when it is.
    pub fn poll(&mut self, now: Duration) -> bool {
        let Some(due) = self.next_due else {
            return false;
        };
        if now < due {
            return false;
        }
        let next = due + self.period;
        self.next_due = Some(if now >= next { now + self.period } else { next });
        true
    }

    /// Stop firing. Irreversible.
    pub fn cancel(&mut self) {
        self.next_due = None;
    }

    /// `false` after [`CaptureSchedule::cancel`].
    pub fn is_active(&self) -> bool {
        self.next_due.is_some()
    }
}
