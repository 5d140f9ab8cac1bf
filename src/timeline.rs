//! Staggered opacity timeline.
//!
//! One timeline animates the characters of one line: character `i` fades from 0 to 1
//! over `fade_ms`, starting `i * stagger_ms` after the timeline starts. Easing is
//! linear. Time only moves when the owner calls `advance` with a frame delta, so a
//! paused timeline keeps its exact progress until `play` is called again.

use std::ops::Range;

use crate::config::TypingConfig;

/// Result of one `advance` on a playing timeline.
#[derive(Clone, Debug, PartialEq)]
pub struct TimelineStep {
    /// Characters whose opacity may have changed during this step.
    pub changed: Range<usize>,
    pub progress: f64,
    /// True exactly once: on the step where the last character reaches full opacity.
    pub completed: bool,
}

#[derive(Clone, Debug)]
pub struct Timeline {
    chars: usize,
    stagger_ms: f64,
    fade_ms: f64,
    elapsed_ms: f64,
    paused: bool,
    killed: bool,
    completion_fired: bool,
}

impl Timeline {
    pub fn new(chars: usize, cfg: &TypingConfig, paused: bool) -> Self {
        Self {
            chars,
            stagger_ms: cfg.char_stagger_ms.max(0.0),
            fade_ms: cfg.char_fade_ms.max(0.0),
            elapsed_ms: 0.0,
            paused,
            killed: false,
            completion_fired: false,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.chars == 0
    }

    pub fn total_ms(&self) -> f64 {
        if self.chars == 0 {
            return 0.0;
        }
        (self.chars - 1) as f64 * self.stagger_ms + self.fade_ms
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_killed(&self) -> bool {
        self.killed
    }

    /// 0..=1 fraction of the whole reveal.
    pub fn progress(&self) -> f64 {
        let total = self.total_ms();
        if total <= 0.0 {
            return if self.completion_fired { 1.0 } else { 0.0 };
        }
        (self.elapsed_ms / total).clamp(0.0, 1.0)
    }

    pub fn is_finished(&self) -> bool {
        self.progress() >= 1.0
    }

    pub fn play(&mut self) {
        if !self.killed {
            self.paused = false;
        }
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// Stop for good; a killed timeline never advances again.
    pub fn kill(&mut self) {
        self.killed = true;
        self.paused = true;
    }

    pub fn char_opacity(&self, idx: usize) -> f64 {
        if idx >= self.chars {
            return 0.0;
        }
        let start = idx as f64 * self.stagger_ms;
        if self.fade_ms <= 0.0 {
            return if self.completion_fired || self.elapsed_ms > start { 1.0 } else { 0.0 };
        }
        ((self.elapsed_ms - start) / self.fade_ms).clamp(0.0, 1.0)
    }

    /// Move time forward by `dt_ms`. Paused or killed timelines return `None`.
    pub fn advance(&mut self, dt_ms: f64) -> Option<TimelineStep> {
        if self.paused || self.killed || self.completion_fired {
            return None;
        }
        let total = self.total_ms();
        let prev = self.elapsed_ms;
        self.elapsed_ms = (prev + dt_ms.max(0.0)).min(total);
        let completed = self.elapsed_ms >= total;
        if completed {
            self.completion_fired = true;
        }
        Some(TimelineStep {
            changed: self.window(prev, self.elapsed_ms),
            progress: self.progress(),
            completed,
        })
    }

    /// Characters whose fade overlaps `(prev, now]`.
    fn window(&self, prev: f64, now: f64) -> Range<usize> {
        if self.chars == 0 {
            return 0..0;
        }
        if self.stagger_ms <= 0.0 {
            return 0..self.chars;
        }
        // char i is settled by `prev` when i * stagger + fade <= prev; with no
        // fade it only flips once elapsed is strictly past its start
        let first = if self.fade_ms <= 0.0 {
            (prev / self.stagger_ms).ceil() as usize
        } else if prev < self.fade_ms {
            0
        } else {
            ((prev - self.fade_ms) / self.stagger_ms).floor() as usize + 1
        };
        let last = (now / self.stagger_ms).floor() as usize;
        let end = (last + 1).min(self.chars);
        first.min(end)..end
    }
}
