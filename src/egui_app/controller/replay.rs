//! The replay sequencer: an automated walkthrough of all bins.
//!
//! Modelled as an explicit state machine with at most one pending deadline.
//! Cancellation clears that deadline before any further advance can fire,
//! so a cancelled step can never execute.

use std::time::{Duration, Instant};

use crate::egui_app::state::StatusTone;

use super::EguiController;

/// Replay state: idle, or running with the next bin and its fire time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ReplayPhase {
    Idle,
    Running { next_bin: u32, deadline: Instant },
}

impl ReplayPhase {
    pub(crate) fn is_running(self) -> bool {
        matches!(self, ReplayPhase::Running { .. })
    }
}

impl EguiController {
    /// Whether the replay sequencer is running.
    pub fn replay_running(&self) -> bool {
        self.replay.is_running()
    }

    /// Step delay between bins.
    pub fn replay_step(&self) -> Duration {
        Duration::from_millis(self.settings.replay_step_ms)
    }

    /// Start replaying all bins: bin 1 is selected immediately, each later
    /// bin after one step delay, and manual controls lock for the duration.
    pub fn start_replay(&mut self, now: Instant) {
        if self.session.is_none() || self.replay.is_running() {
            return;
        }
        self.select_bin_effect(1);
        self.replay = ReplayPhase::Running {
            next_bin: 2,
            deadline: now + self.replay_step(),
        };
        self.ui.replay_running = true;
        self.set_status("Replaying all quantiles", StatusTone::Info);
    }

    /// Cancel a running replay immediately: the pending deadline is
    /// invalidated, the drill-down cleared, and manual controls restored.
    pub fn cancel_replay(&mut self) {
        if !self.replay.is_running() {
            return;
        }
        self.replay = ReplayPhase::Idle;
        self.ui.replay_running = false;
        self.clear_bin_selection();
        self.set_status("Replay stopped", StatusTone::Info);
    }

    /// Advance the sequencer if its deadline has passed. Returns how long
    /// until the next pending step, or `None` when idle, so the renderer
    /// can schedule a repaint instead of polling.
    pub fn tick_replay(&mut self, now: Instant) -> Option<Duration> {
        let ReplayPhase::Running { next_bin, deadline } = self.replay else {
            return None;
        };
        if now < deadline {
            return Some(deadline - now);
        }
        let bin_count = self
            .session
            .as_ref()
            .map(|session| session.selection.bin_count)
            .unwrap_or(0);
        if next_bin > bin_count {
            // The last bin has had its full display time; auto-stop.
            self.replay = ReplayPhase::Idle;
            self.ui.replay_running = false;
            self.clear_bin_selection();
            self.set_status("Replay finished", StatusTone::Info);
            return None;
        }
        self.select_bin_effect(next_bin);
        let step = self.replay_step();
        self.replay = ReplayPhase::Running {
            next_bin: next_bin + 1,
            deadline: now + step,
        };
        Some(step)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support;
    use super::*;

    fn selected_bin(controller: &EguiController) -> u32 {
        controller.ui.summary.as_ref().unwrap().selected_bin
    }

    #[test]
    fn replay_walks_every_bin_then_auto_stops() {
        let mut controller = test_support::controller_with(
            test_support::dataset_linear(100),
            test_support::selected_columns(),
        );
        controller.set_bin_count(5);
        let step = controller.replay_step();
        let start = Instant::now();

        controller.start_replay(start);
        assert!(controller.replay_running());
        assert!(controller.controls_locked());
        assert_eq!(selected_bin(&controller), 1);

        let mut now = start;
        for expected in 2..=5u32 {
            now += step;
            controller.tick_replay(now);
            assert_eq!(selected_bin(&controller), expected);
            assert!(controller.replay_running());
        }

        // One more step elapses after the last bin, then replay stops and
        // the drill-down clears.
        now += step;
        assert_eq!(controller.tick_replay(now), None);
        assert!(!controller.replay_running());
        assert!(!controller.controls_locked());
        assert_eq!(selected_bin(&controller), 0);
    }

    #[test]
    fn ticking_before_the_deadline_does_not_advance() {
        let mut controller = test_support::controller_with(
            test_support::dataset_linear(100),
            test_support::selected_columns(),
        );
        controller.set_bin_count(3);
        let start = Instant::now();
        controller.start_replay(start);
        let wait = controller
            .tick_replay(start + Duration::from_millis(1))
            .unwrap();
        assert!(wait <= controller.replay_step());
        assert_eq!(selected_bin(&controller), 1);
    }

    #[test]
    fn cancel_prevents_the_next_step_from_ever_firing() {
        let mut controller = test_support::controller_with(
            test_support::dataset_linear(100),
            test_support::selected_columns(),
        );
        controller.set_bin_count(5);
        let step = controller.replay_step();
        let start = Instant::now();

        controller.start_replay(start);
        controller.tick_replay(start + step);
        assert_eq!(selected_bin(&controller), 2);

        controller.cancel_replay();
        assert!(!controller.replay_running());
        assert_eq!(selected_bin(&controller), 0);

        // A late tick at what would have been the third deadline is inert.
        assert_eq!(controller.tick_replay(start + step * 2), None);
        assert_eq!(selected_bin(&controller), 0);
    }

    #[test]
    fn manual_controls_are_locked_while_replaying() {
        let mut controller = test_support::controller_with(
            test_support::dataset_linear(100),
            test_support::selected_columns(),
        );
        controller.set_bin_count(4);
        controller.start_replay(Instant::now());

        controller.set_bin_count(7);
        assert_eq!(
            controller.ui.summary.as_ref().unwrap().groups.len(),
            4,
            "bin count must not change during replay"
        );
        controller.pick_bin(3);
        assert_eq!(selected_bin(&controller), 1);
        controller.set_range(10.0, 20.0);
        assert_eq!(controller.ui.controls.range.lo, 1.0);
    }

    #[test]
    fn replay_with_one_bin_fires_once_then_stops() {
        let mut controller = test_support::controller_with(
            test_support::dataset_linear(20),
            test_support::selected_columns(),
        );
        controller.set_bin_count(1);
        let step = controller.replay_step();
        let start = Instant::now();
        controller.start_replay(start);
        assert_eq!(selected_bin(&controller), 1);
        controller.tick_replay(start + step);
        assert!(!controller.replay_running());
        assert_eq!(selected_bin(&controller), 0);
    }
}
