use tracing::debug;

use crate::capture::photo::Photo;
use crate::capture::source::FrameSource;
use crate::config::CaptureConfig;

/// Scheduler lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    Running,
}

/// What happened during one scheduler tick
#[derive(Debug)]
pub struct TickOutcome {
    /// Countdown value after this tick
    pub countdown: u32,

    /// Photo captured on this tick, if the countdown expired and the source
    /// produced a frame
    pub captured: Option<Photo>,

    /// True when this tick completed the run (photo quota reached)
    pub finished: bool,
}

/// Countdown-driven capture state machine
///
/// The scheduler owns no timer of its own: `tick` is called once per period
/// by whoever drives it (the booth uses a tokio interval, tests call it
/// directly). Each cycle counts down from the configured value and fires one
/// capture when it reaches 1, then rearms. A missed frame is skipped silently
/// and the cycle continues, so a run with a glitching camera can tick
/// indefinitely without reaching its quota.
pub struct CaptureScheduler {
    config: CaptureConfig,
    state: SchedulerState,
    countdown: u32,
    captured: usize,
}

impl CaptureScheduler {
    pub fn new(config: CaptureConfig) -> Self {
        Self {
            config,
            state: SchedulerState::Idle,
            countdown: 0,
            captured: 0,
        }
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    pub fn countdown(&self) -> u32 {
        self.countdown
    }

    /// Photos captured so far in the current run
    pub fn captured_count(&self) -> usize {
        self.captured
    }

    /// Begin a capture run
    ///
    /// Always a clean reset: calling this mid-run or after a completed run
    /// rearms the countdown and zeroes the capture count, never resumes.
    pub fn start(&mut self) {
        self.state = SchedulerState::Running;
        self.countdown = self.config.countdown_from;
        self.captured = 0;
        debug!("Scheduler started: countdown from {}", self.countdown);
    }

    /// Stop the current run and zero the countdown
    pub fn stop(&mut self) {
        self.state = SchedulerState::Idle;
        self.countdown = 0;
    }

    /// Advance the state machine by one timer period
    ///
    /// While the countdown is above 1 it simply decrements. At 1 the
    /// scheduler fires exactly one capture and rearms the countdown; ticks
    /// are synchronous, so back-to-back firing cycles cannot overlap.
    /// Reaching the photo quota transitions to `Idle` on the same tick.
    pub fn tick(&mut self, source: &mut dyn FrameSource) -> TickOutcome {
        if self.state == SchedulerState::Idle {
            return TickOutcome { countdown: 0, captured: None, finished: false };
        }

        if self.countdown > 1 {
            self.countdown -= 1;
            return TickOutcome {
                countdown: self.countdown,
                captured: None,
                finished: false,
            };
        }

        let captured = source.capture_frame();

        if captured.is_some() {
            self.captured += 1;
            debug!("Captured photo {} of {}", self.captured, self.config.photos_per_run);
        } else {
            debug!("Capture miss, continuing run");
        }

        self.countdown = self.config.countdown_from;

        let finished = self.captured >= self.config.photos_per_run;
        if finished {
            self.stop();
        }

        TickOutcome {
            countdown: self.countdown,
            captured,
            finished,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::source::TestPatternSource;

    /// A camera that never produces a frame
    struct MissSource;

    impl FrameSource for MissSource {
        fn capture_frame(&mut self) -> Option<Photo> {
            None
        }
    }

    fn scheduler() -> CaptureScheduler {
        CaptureScheduler::new(CaptureConfig::default())
    }

    #[test]
    fn test_fifth_tick_captures_and_rearms() {
        let mut scheduler = scheduler();
        let mut source = TestPatternSource::new(8, 8);

        scheduler.start();
        assert_eq!(scheduler.countdown(), 5);

        for expected in [4, 3, 2, 1] {
            let outcome = scheduler.tick(&mut source);
            assert_eq!(outcome.countdown, expected);
            assert!(outcome.captured.is_none());
        }

        let outcome = scheduler.tick(&mut source);
        assert!(outcome.captured.is_some());
        assert_eq!(outcome.countdown, 5);
        assert_eq!(scheduler.captured_count(), 1);
    }

    #[test]
    fn test_fifteen_ticks_complete_a_run() {
        let mut scheduler = scheduler();
        let mut source = TestPatternSource::new(8, 8);

        scheduler.start();
        let mut photos = 0;
        for tick in 1..=15 {
            let outcome = scheduler.tick(&mut source);
            if outcome.captured.is_some() {
                photos += 1;
            }
            if tick < 15 {
                assert!(!outcome.finished);
            } else {
                assert!(outcome.finished);
            }
        }

        assert_eq!(photos, 3);
        assert_eq!(scheduler.state(), SchedulerState::Idle);
        assert_eq!(scheduler.countdown(), 0);
    }

    #[test]
    fn test_missed_frames_keep_the_run_alive() {
        let mut scheduler = scheduler();
        let mut source = MissSource;

        scheduler.start();
        for _ in 0..40 {
            let outcome = scheduler.tick(&mut source);
            assert!(outcome.captured.is_none());
            assert!(!outcome.finished);
        }

        assert_eq!(scheduler.state(), SchedulerState::Running);
        assert_eq!(scheduler.captured_count(), 0);
    }

    #[test]
    fn test_stop_goes_idle_and_zeroes_countdown() {
        let mut scheduler = scheduler();
        let mut source = TestPatternSource::new(8, 8);

        scheduler.start();
        scheduler.tick(&mut source);
        scheduler.stop();

        assert_eq!(scheduler.state(), SchedulerState::Idle);
        assert_eq!(scheduler.countdown(), 0);

        // Ticking while idle is a no-op
        let outcome = scheduler.tick(&mut source);
        assert!(outcome.captured.is_none());
        assert_eq!(outcome.countdown, 0);
    }

    #[test]
    fn test_restart_is_a_clean_reset() {
        let mut scheduler = scheduler();
        let mut source = TestPatternSource::new(8, 8);

        scheduler.start();
        for _ in 0..5 {
            scheduler.tick(&mut source);
        }
        assert_eq!(scheduler.captured_count(), 1);

        scheduler.start();
        assert_eq!(scheduler.captured_count(), 0);
        assert_eq!(scheduler.countdown(), 5);
        assert_eq!(scheduler.state(), SchedulerState::Running);
    }

    #[test]
    fn test_single_tick_cycle_still_captures() {
        let mut scheduler = CaptureScheduler::new(CaptureConfig {
            countdown_from: 1,
            ..CaptureConfig::default()
        });
        let mut source = TestPatternSource::new(8, 8);

        scheduler.start();
        let mut photos = 0;
        for _ in 0..3 {
            if scheduler.tick(&mut source).captured.is_some() {
                photos += 1;
            }
        }
        assert_eq!(photos, 3);
        assert_eq!(scheduler.state(), SchedulerState::Idle);
    }
}
