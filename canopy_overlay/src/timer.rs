// Copyright 2026 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Debounce timer for delayed (hover-intent) overlay opens.
//!
//! Hover-triggered overlays should not open the instant the pointer crosses
//! their trigger. The timer holds each delayed open for a warm-up delay and
//! lets a close request cancel it before it fires. Once an overlay has opened
//! this way — or a hover overlay has just closed — the timer is *warm*:
//! further delayed opens fire on the next settle, so moving the pointer along
//! a row of triggers feels immediate. Warmth decays after a cool-down with no
//! activity.
//!
//! The timer never reads a clock. Deadlines are computed from host-supplied
//! `u64` millisecond timestamps, the same convention used by the rest of this
//! crate family, which keeps hover-intent behavior fully deterministic under
//! test.
//!
//! ```
//! use canopy_overlay::OverlayTimer;
//!
//! let mut timer: OverlayTimer<u32> = OverlayTimer::new();
//! timer.schedule_open(1, 0);
//! assert!(timer.due(999).is_empty()); // warm-up not yet elapsed
//! assert_eq!(timer.due(1000), vec![1]); // fires, and the timer is now warm
//! timer.schedule_open(2, 1200);
//! assert_eq!(timer.due(1200), vec![2]); // warm: fires immediately
//! ```

use alloc::vec::Vec;

/// Deadline bookkeeping for delayed opens, keyed by content.
#[derive(Clone, Debug)]
pub struct OverlayTimer<K> {
    warm_up_delay: u64,
    cool_down_delay: u64,
    /// Pending opens in scheduling order: `(content, deadline)`.
    pending: Vec<(K, u64)>,
    /// Instant until which the timer stays warm. `None` when cold.
    warm_until: Option<u64>,
}

impl<K: Copy + Eq> OverlayTimer<K> {
    /// Default delay before a cold delayed open fires, in milliseconds.
    pub const DEFAULT_WARM_UP: u64 = 1000;
    /// Default period after activity during which delayed opens fire
    /// immediately, in milliseconds.
    pub const DEFAULT_COOL_DOWN: u64 = 1000;

    /// A timer with the default warm-up and cool-down delays.
    pub fn new() -> Self {
        Self::with_delays(Self::DEFAULT_WARM_UP, Self::DEFAULT_COOL_DOWN)
    }

    /// A timer with custom delays.
    pub fn with_delays(warm_up_delay: u64, cool_down_delay: u64) -> Self {
        Self {
            warm_up_delay,
            cool_down_delay,
            pending: Vec::new(),
            warm_until: None,
        }
    }

    /// Whether the timer is warm at `now`.
    pub fn is_warm(&self, now: u64) -> bool {
        self.warm_until.is_some_and(|until| now <= until)
    }

    /// Register a delayed open for `content` and return its deadline.
    ///
    /// Re-scheduling content that already has a pending open restarts its
    /// wait.
    pub fn schedule_open(&mut self, content: K, now: u64) -> u64 {
        let deadline = if self.is_warm(now) {
            now
        } else {
            now + self.warm_up_delay
        };
        if let Some(entry) = self.pending.iter_mut().find(|(key, _)| *key == content) {
            entry.1 = deadline;
        } else {
            self.pending.push((content, deadline));
        }
        deadline
    }

    /// Cancel a pending open. Returns `true` when one existed.
    pub fn cancel(&mut self, content: &K) -> bool {
        let before = self.pending.len();
        self.pending.retain(|(key, _)| key != content);
        self.pending.len() != before
    }

    /// Whether `content` has a pending open.
    pub fn is_pending(&self, content: &K) -> bool {
        self.pending.iter().any(|(key, _)| key == content)
    }

    /// Drain the pending opens whose deadline has elapsed, in scheduling
    /// order. Firing any open marks the timer warm.
    pub fn due(&mut self, now: u64) -> Vec<K> {
        let mut fired = Vec::new();
        self.pending.retain(|&(key, deadline)| {
            if deadline <= now {
                fired.push(key);
                false
            } else {
                true
            }
        });
        if !fired.is_empty() {
            self.warm_until = Some(now + self.cool_down_delay);
        }
        fired
    }

    /// Refresh warmth when a hover overlay closes.
    ///
    /// Only extends an existing warm period: closing a hover overlay that
    /// opened without the timer does not warm a cold timer.
    pub fn note_close(&mut self, now: u64) {
        if self.is_warm(now) {
            self.warm_until = Some(now + self.cool_down_delay);
        }
    }

    /// Drop all pending opens and reset warmth.
    pub fn clear(&mut self) {
        self.pending.clear();
        self.warm_until = None;
    }
}

impl<K: Copy + Eq> Default for OverlayTimer<K> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn cold_open_waits_for_warm_up() {
        let mut timer: OverlayTimer<u32> = OverlayTimer::new();
        let deadline = timer.schedule_open(1, 100);
        assert_eq!(deadline, 1100);
        assert!(timer.is_pending(&1));
        assert!(timer.due(1099).is_empty());
        assert_eq!(timer.due(1100), vec![1]);
        assert!(!timer.is_pending(&1));
    }

    #[test]
    fn cancel_before_deadline_never_fires() {
        let mut timer: OverlayTimer<u32> = OverlayTimer::new();
        timer.schedule_open(1, 0);
        assert!(timer.cancel(&1));
        assert!(timer.due(5000).is_empty());
        // Second cancel is a no-op.
        assert!(!timer.cancel(&1));
    }

    #[test]
    fn firing_warms_the_timer() {
        let mut timer: OverlayTimer<u32> = OverlayTimer::new();
        timer.schedule_open(1, 0);
        assert_eq!(timer.due(1000), vec![1]);
        assert!(timer.is_warm(1000));

        // Warm: fires at the scheduling instant.
        assert_eq!(timer.schedule_open(2, 1500), 1500);
        assert_eq!(timer.due(1500), vec![2]);
    }

    #[test]
    fn warmth_decays_after_cool_down() {
        let mut timer: OverlayTimer<u32> = OverlayTimer::with_delays(100, 200);
        timer.schedule_open(1, 0);
        assert_eq!(timer.due(100), vec![1]);
        assert!(timer.is_warm(300));
        assert!(!timer.is_warm(301));

        // Cold again: the next open waits the full warm-up.
        assert_eq!(timer.schedule_open(2, 400), 500);
    }

    #[test]
    fn note_close_extends_only_existing_warmth() {
        let mut timer: OverlayTimer<u32> = OverlayTimer::with_delays(100, 200);

        // Cold timer: a close does not warm it.
        timer.note_close(50);
        assert!(!timer.is_warm(50));

        timer.schedule_open(1, 0);
        timer.due(100);
        timer.note_close(250);
        assert!(timer.is_warm(450));
        assert!(!timer.is_warm(451));
    }

    #[test]
    fn reschedule_restarts_the_wait() {
        let mut timer: OverlayTimer<u32> = OverlayTimer::with_delays(100, 100);
        timer.schedule_open(1, 0);
        timer.schedule_open(1, 50);
        assert!(timer.due(100).is_empty());
        assert_eq!(timer.due(150), vec![1]);
    }

    #[test]
    fn due_preserves_scheduling_order() {
        let mut timer: OverlayTimer<u32> = OverlayTimer::with_delays(100, 100);
        timer.schedule_open(3, 0);
        timer.schedule_open(1, 10);
        timer.schedule_open(2, 20);
        assert_eq!(timer.due(200), vec![3, 1, 2]);
    }

    #[test]
    fn clear_resets_everything() {
        let mut timer: OverlayTimer<u32> = OverlayTimer::new();
        timer.schedule_open(1, 0);
        timer.due(1000);
        timer.schedule_open(2, 1100);
        timer.clear();
        assert!(!timer.is_pending(&2));
        assert!(!timer.is_warm(1100));
    }
}
