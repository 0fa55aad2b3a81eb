//! Simulated time with pause and stop.

/// Simulated time the preset view jumps to.
pub const PRESET_SIM_TIME: f64 = 24.0;

/// Observable clock state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockState {
    /// Simulated time follows wall-clock frame time.
    Running,
    /// Frames render but simulated time is frozen.
    Paused,
    /// Nothing advances and nothing renders.
    Stopped,
}

/// Accumulates simulated time from per-frame timestamps.
///
/// `last_frame_time` tracks every non-stopped frame, paused or not, so
/// resuming never produces a jump. The first frame after leaving the
/// stopped state only resynchronizes it, so wall time spent stopped is
/// never accumulated.
#[derive(Debug, Clone, Default)]
pub struct SimulationClock {
    sim_time: f64,
    is_paused: bool,
    is_stopped: bool,
    last_frame_time: f64,
    /// Set when stop is cleared; the next frame adds no time.
    resync: bool,
}

impl SimulationClock {
    /// A running clock at `sim_time = 0`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulated seconds so far.
    #[must_use]
    pub fn sim_time(&self) -> f64 {
        self.sim_time
    }

    /// Frame timestamp of the last non-stopped frame.
    #[must_use]
    pub fn last_frame_time(&self) -> f64 {
        self.last_frame_time
    }

    /// Whether simulated time is frozen.
    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.is_paused
    }

    /// Whether frames are skipped entirely.
    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.is_stopped
    }

    /// Current state. Stopped dominates paused.
    #[must_use]
    pub fn state(&self) -> ClockState {
        if self.is_stopped {
            ClockState::Stopped
        } else if self.is_paused {
            ClockState::Paused
        } else {
            ClockState::Running
        }
    }

    /// Flip pause. Has no effect while stopped.
    pub fn toggle_pause(&mut self) {
        if !self.is_stopped {
            self.is_paused = !self.is_paused;
        }
    }

    /// Clear pause, e.g. when leaving the stopped state.
    pub fn resume(&mut self) {
        self.is_paused = false;
    }

    /// Flip stop. Returns the new stopped flag.
    pub fn toggle_stop(&mut self) -> bool {
        self.is_stopped = !self.is_stopped;
        if !self.is_stopped {
            self.resync = true;
        }
        self.is_stopped
    }

    /// Jump to [`PRESET_SIM_TIME`] and pause.
    pub fn activate_preset(&mut self) {
        self.is_paused = true;
        self.sim_time = PRESET_SIM_TIME;
    }

    /// Account for a frame at `frame_time` seconds.
    ///
    /// Returns `None` while stopped, leaving everything untouched.
    /// Otherwise returns the simulated time for this frame. Timestamps that
    /// go backwards count as a zero step, as does the first frame after
    /// leaving the stopped state.
    pub fn advance(&mut self, frame_time: f64) -> Option<f64> {
        if self.is_stopped {
            return None;
        }
        if self.resync {
            self.resync = false;
        } else if !self.is_paused {
            self.sim_time += (frame_time - self.last_frame_time).max(0.0);
        }
        self.last_frame_time = frame_time;
        Some(self.sim_time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn running_accumulates_frame_deltas() {
        let mut clock = SimulationClock::new();
        assert_eq!(clock.advance(0.5), Some(0.5));
        assert_eq!(clock.advance(1.25), Some(1.25));
        assert_eq!(clock.state(), ClockState::Running);
    }

    #[test]
    fn paused_tracks_frame_time_without_jump_on_resume() {
        let mut clock = SimulationClock::new();
        let _ = clock.advance(1.0);
        clock.toggle_pause();
        assert_eq!(clock.advance(5.0), Some(1.0));
        assert_eq!(clock.last_frame_time(), 5.0);
        clock.toggle_pause();
        assert_eq!(clock.advance(5.5), Some(1.5));
    }

    #[test]
    fn stopped_changes_nothing() {
        let mut clock = SimulationClock::new();
        let _ = clock.advance(2.0);
        assert!(clock.toggle_stop());
        assert_eq!(clock.advance(9.0), None);
        assert_eq!(clock.sim_time(), 2.0);
        assert_eq!(clock.last_frame_time(), 2.0);
        assert_eq!(clock.state(), ClockState::Stopped);
    }

    #[test]
    fn time_spent_stopped_is_not_accumulated() {
        let mut clock = SimulationClock::new();
        let _ = clock.advance(1.0);
        assert!(clock.toggle_stop());
        assert_eq!(clock.advance(50.0), None);
        assert!(!clock.toggle_stop());
        assert_eq!(clock.advance(100.0), Some(1.0));
        assert_eq!(clock.last_frame_time(), 100.0);
        assert_eq!(clock.advance(100.25), Some(1.25));
    }

    #[test]
    fn pause_ignored_while_stopped() {
        let mut clock = SimulationClock::new();
        let _ = clock.toggle_stop();
        clock.toggle_pause();
        assert!(!clock.is_paused());
        assert!(!clock.toggle_stop());
        assert_eq!(clock.state(), ClockState::Running);
    }

    #[test]
    fn backwards_timestamp_is_a_zero_step() {
        let mut clock = SimulationClock::new();
        let _ = clock.advance(3.0);
        assert_eq!(clock.advance(2.0), Some(3.0));
        assert_eq!(clock.advance(2.5), Some(3.5));
    }

    #[test]
    fn preset_sets_time_and_pauses() {
        let mut clock = SimulationClock::new();
        let _ = clock.advance(100.0);
        clock.activate_preset();
        assert_eq!(clock.state(), ClockState::Paused);
        assert_eq!(clock.advance(200.0), Some(PRESET_SIM_TIME));
    }
}
