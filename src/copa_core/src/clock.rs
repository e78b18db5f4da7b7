//! Live match clock.
//!
//! The clock restarts at `0:00` whenever a match goes live and stops at the
//! end of a half. [`ClockTicker`] owns the thread that refreshes it; dropping
//! the ticker stops the thread.

use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::constants::{CLOCK_TICK_MILLIS, HALF_LENGTH_MINUTES};
use crate::error::Result;
use crate::matches::MatchStatus;

/// Format elapsed time as `M:SS`, capped at the end of a half (`45:00`).
pub fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs().min(HALF_LENGTH_MINUTES * 60);
    format!("{}:{:02}", secs / 60, secs % 60)
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MatchClock {
    started_at: Option<Instant>,
}

impl MatchClock {
    /// A clock that is not running and reads `0:00`.
    pub fn idle() -> Self {
        MatchClock { started_at: None }
    }

    pub fn started_at(instant: Instant) -> Self {
        MatchClock {
            started_at: Some(instant),
        }
    }

    /// Start from zero if the match is live, otherwise stay idle.
    pub fn for_status(status: MatchStatus, now: Instant) -> Self {
        match status {
            MatchStatus::Live => MatchClock::started_at(now),
            _ => MatchClock::idle(),
        }
    }

    pub fn is_running(&self) -> bool {
        self.started_at.is_some()
    }

    pub fn elapsed_at(&self, now: Instant) -> Duration {
        self.started_at
            .map(|start| now.saturating_duration_since(start))
            .unwrap_or_default()
    }

    pub fn display_at(&self, now: Instant) -> String {
        format_elapsed(self.elapsed_at(now))
    }

    pub fn display(&self) -> String {
        self.display_at(Instant::now())
    }
}

/// Owned handle to a thread that reports the clock display every `period`.
///
/// The callback runs once immediately, then on every tick until [`stop`]
/// is called or the handle is dropped. It never runs after either returns.
///
/// [`stop`]: ClockTicker::stop
pub struct ClockTicker {
    stop_tx: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl ClockTicker {
    pub fn start<F>(clock: MatchClock, period: Duration, mut on_tick: F) -> Result<Self>
    where
        F: FnMut(String) + Send + 'static,
    {
        let (stop_tx, stop_rx) = mpsc::channel::<()>();

        let handle = thread::Builder::new()
            .name("match-clock".to_string())
            .spawn(move || loop {
                on_tick(clock.display());
                match stop_rx.recv_timeout(period) {
                    Err(RecvTimeoutError::Timeout) => continue,
                    // Stop requested, or the sender went away with the handle
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }
            })?;

        log::debug!("match clock started, ticking every {:?}", period);
        Ok(ClockTicker {
            stop_tx: Some(stop_tx),
            handle: Some(handle),
        })
    }

    /// Start with the default one-second refresh.
    pub fn start_default<F>(clock: MatchClock, on_tick: F) -> Result<Self>
    where
        F: FnMut(String) + Send + 'static,
    {
        Self::start(clock, Duration::from_millis(CLOCK_TICK_MILLIS), on_tick)
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Stop ticking and wait for the thread to exit.
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        if let Some(tx) = self.stop_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::warn!("match clock callback panicked");
            }
            log::debug!("match clock stopped");
        }
    }
}

impl Drop for ClockTicker {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_format_elapsed() {
        assert_eq!(format_elapsed(Duration::ZERO), "0:00");
        assert_eq!(format_elapsed(Duration::from_millis(999)), "0:00");
        assert_eq!(format_elapsed(Duration::from_secs(65)), "1:05");
        assert_eq!(format_elapsed(Duration::from_secs(44 * 60 + 59)), "44:59");
        assert_eq!(format_elapsed(Duration::from_secs(45 * 60)), "45:00");
        assert_eq!(format_elapsed(Duration::from_secs(52 * 60 + 30)), "45:00");
    }

    #[test]
    fn test_clock_follows_status() {
        let now = Instant::now();
        let idle = MatchClock::for_status(MatchStatus::Scheduled, now);
        assert!(!idle.is_running());
        assert_eq!(idle.display_at(now + Duration::from_secs(600)), "0:00");

        let live = MatchClock::for_status(MatchStatus::Live, now);
        assert!(live.is_running());
        assert_eq!(live.display_at(now), "0:00");
        assert_eq!(live.display_at(now + Duration::from_secs(12 * 60 + 7)), "12:07");
        assert_eq!(live.display_at(now + Duration::from_secs(50 * 60)), "45:00");
    }

    #[test]
    fn test_clock_before_start_reads_zero() {
        let now = Instant::now();
        let clock = MatchClock::started_at(now + Duration::from_secs(30));
        assert_eq!(clock.elapsed_at(now), Duration::ZERO);
    }

    #[test]
    fn test_ticker_ticks_immediately_and_stops() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);

        let ticker = ClockTicker::start(MatchClock::started_at(Instant::now()), Duration::from_millis(5), move |s| {
            sink.lock().unwrap().push(s)
        })
        .unwrap();
        thread::sleep(Duration::from_millis(40));
        assert!(ticker.is_running());
        ticker.stop();

        let count = seen.lock().unwrap().len();
        assert!(count >= 1);
        assert_eq!(seen.lock().unwrap()[0], "0:00");

        thread::sleep(Duration::from_millis(30));
        assert_eq!(seen.lock().unwrap().len(), count);
    }

    #[test]
    fn test_ticker_released_on_drop() {
        let ticks = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&ticks);

        {
            let _ticker = ClockTicker::start(MatchClock::idle(), Duration::from_millis(5), move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
            })
            .unwrap();
            thread::sleep(Duration::from_millis(20));
        }

        let after_drop = ticks.load(Ordering::SeqCst);
        assert!(after_drop >= 1);
        thread::sleep(Duration::from_millis(30));
        assert_eq!(ticks.load(Ordering::SeqCst), after_drop);
    }
}
