//! Deadline timer for search time management.
//!
//! A [`DeadlineTimer`] owns a [`StopFlag`] and a background thread that sleeps
//! on a condition variable until the deadline, then trips the flag. Stopping
//! or dropping the timer wakes the thread so it exits without waiting out the
//! full duration.

use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};

use crate::sync::{StopFlag, Timer};

/// State shared between the timer and its sleeper thread
#[derive(Default)]
struct Alarm {
    cancelled: Mutex<bool>,
    wake: Condvar,
}

impl Alarm {
    /// Sleep until `deadline` or cancellation. Returns true if the deadline
    /// was reached.
    fn wait_until(&self, deadline: Instant) -> bool {
        let mut cancelled = self.cancelled.lock();
        while !*cancelled {
            if self.wake.wait_until(&mut cancelled, deadline).timed_out() {
                return !*cancelled;
            }
        }
        false
    }

    fn cancel(&self) {
        *self.cancelled.lock() = true;
        self.wake.notify_all();
    }

    fn rearm(&self) {
        *self.cancelled.lock() = false;
    }
}

/// A timer that signals a stop flag when its budget runs out.
pub struct DeadlineTimer {
    budget: Duration,
    flag: StopFlag,
    alarm: Arc<Alarm>,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl DeadlineTimer {
    /// A timer that trips `budget` after [`Timer::start`] is called.
    #[must_use]
    pub fn new(budget: Duration) -> Self {
        Self::with_flag(budget, StopFlag::new())
    }

    /// Like [`DeadlineTimer::new`] but tripping an existing flag, so another
    /// party holding a clone can also stop the search.
    #[must_use]
    pub fn with_flag(budget: Duration, flag: StopFlag) -> Self {
        DeadlineTimer {
            budget,
            flag,
            alarm: Arc::new(Alarm::default()),
            handle: Mutex::new(None),
        }
    }

    #[must_use]
    pub fn budget(&self) -> Duration {
        self.budget
    }

    /// The flag this timer trips
    #[must_use]
    pub fn flag(&self) -> &StopFlag {
        &self.flag
    }

    /// Wake and join the sleeper thread, if any
    fn cancel(&self) {
        self.alarm.cancel();
        if let Some(handle) = self.handle.lock().take() {
            let _ = handle.join();
        }
    }
}

impl Timer for DeadlineTimer {
    fn start(&self) {
        self.cancel();
        self.alarm.rearm();
        self.flag.reset();

        if self.budget.is_zero() {
            self.flag.set();
            return;
        }

        let deadline = Instant::now() + self.budget;
        let alarm = Arc::clone(&self.alarm);
        let flag = self.flag.clone();
        let spawned = thread::Builder::new()
            .name("search-timer".to_string())
            .spawn(move || {
                if alarm.wait_until(deadline) {
                    flag.set();
                }
            });
        match spawned {
            Ok(handle) => *self.handle.lock() = Some(handle),
            Err(err) => {
                // No sleeper means no deadline: stop at once
                log::warn!("could not spawn timer thread: {err}");
                self.flag.set();
            }
        }
    }

    #[inline]
    fn should_stop(&self) -> bool {
        self.flag.is_stopped()
    }

    fn stop(&self) {
        self.flag.set();
        self.cancel();
    }
}

impl Drop for DeadlineTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timer_triggers() {
        let timer = DeadlineTimer::new(Duration::from_millis(30));
        timer.start();
        assert!(!timer.should_stop());
        thread::sleep(Duration::from_millis(200));
        assert!(timer.should_stop());
    }

    #[test]
    fn test_timer_zero_duration_trips_immediately() {
        let timer = DeadlineTimer::new(Duration::ZERO);
        timer.start();
        assert!(timer.should_stop());
    }

    #[test]
    fn test_stop_returns_without_waiting_out_the_budget() {
        let timer = DeadlineTimer::new(Duration::from_secs(3600));
        timer.start();
        let begun = Instant::now();
        timer.stop();
        assert!(timer.should_stop());
        assert!(begun.elapsed() < Duration::from_secs(5));
    }

    #[test]
    fn test_restart_rearms_the_flag() {
        let timer = DeadlineTimer::new(Duration::from_secs(3600));
        timer.start();
        timer.stop();
        assert!(timer.should_stop());
        timer.start();
        assert!(!timer.should_stop());
    }

    #[test]
    fn test_shared_flag_sees_the_deadline() {
        let flag = StopFlag::new();
        let timer = DeadlineTimer::with_flag(Duration::from_millis(10), flag.clone());
        timer.start();
        thread::sleep(Duration::from_millis(200));
        assert!(flag.is_stopped());
    }
}
