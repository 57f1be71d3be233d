use std::time::{Duration, Instant};

/// Progress decay cadence.
pub const DECAY_INTERVAL: Duration = Duration::from_millis(100);
/// Elapsed-time / level cadence.
pub const CLOCK_INTERVAL: Duration = Duration::from_millis(1000);

/// A periodic process with an explicit start/cancel pair.
///
/// The timer does not sleep or spawn anything: the host polls it with the
/// current instant and it reports each period boundary that has passed,
/// one at a time, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodicTimer {
    period: Duration,
    next_due: Option<Instant>,
}

impl PeriodicTimer {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            next_due: None,
        }
    }

    /// (Re)arm the timer; the first firing is one period after `now`.
    pub fn start(&mut self, now: Instant) {
        self.next_due = Some(now + self.period);
    }

    pub fn cancel(&mut self) {
        self.next_due = None;
    }

    pub fn is_running(&self) -> bool {
        self.next_due.is_some()
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn next_due(&self) -> Option<Instant> {
        self.next_due
    }

    /// Consume one firing if it is due at or before `now`, returning the
    /// instant it was scheduled for.
    pub fn fire_if_due(&mut self, now: Instant) -> Option<Instant> {
        match self.next_due {
            Some(due) if due <= now => {
                self.next_due = Some(due + self.period);
                Some(due)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_timer_never_fires() {
        let mut timer = PeriodicTimer::new(DECAY_INTERVAL);
        let now = Instant::now();

        assert!(!timer.is_running());
        assert_eq!(timer.fire_if_due(now + Duration::from_secs(60)), None);
    }

    #[test]
    fn fires_once_per_elapsed_period() {
        let mut timer = PeriodicTimer::new(DECAY_INTERVAL);
        let t0 = Instant::now();
        timer.start(t0);

        assert_eq!(timer.fire_if_due(t0 + Duration::from_millis(99)), None);

        let later = t0 + Duration::from_millis(350);
        let mut fired = Vec::new();
        while let Some(due) = timer.fire_if_due(later) {
            fired.push(due);
        }

        assert_eq!(
            fired,
            vec![
                t0 + Duration::from_millis(100),
                t0 + Duration::from_millis(200),
                t0 + Duration::from_millis(300),
            ]
        );
        assert_eq!(timer.next_due(), Some(t0 + Duration::from_millis(400)));
    }

    #[test]
    fn cancel_stops_pending_firings() {
        let mut timer = PeriodicTimer::new(CLOCK_INTERVAL);
        let t0 = Instant::now();
        timer.start(t0);
        timer.cancel();

        assert!(!timer.is_running());
        assert_eq!(timer.fire_if_due(t0 + Duration::from_secs(5)), None);
    }

    #[test]
    fn restart_rebases_schedule() {
        let mut timer = PeriodicTimer::new(CLOCK_INTERVAL);
        let t0 = Instant::now();
        timer.start(t0);
        let t1 = t0 + Duration::from_millis(1500);
        timer.start(t1);

        assert_eq!(timer.next_due(), Some(t1 + CLOCK_INTERVAL));
    }
}
