//! Typing state machine.
//!
//! `TypingController` owns one `TypingSession` and types the letter one line at a
//! time. Each line gets a `Timeline` the first time it is started; later
//! invocations resume or complete that timeline instead of rebuilding it. Lines are
//! strictly sequential: line `i + 1` only starts after line `i` completed and the
//! inter-line gap elapsed without the session being paused.
//!
//! Nothing here touches the DOM. Rendering goes through `BookSurface`, and time
//! comes in through `tick(now_ms)` from whatever frame loop drives the widget.

use std::collections::BTreeMap;

use crate::config::TypingConfig;
use crate::content::{ContentSource, resolve_lines};
use crate::scroll::ScrollThrottle;
use crate::segment::{CharSpan, segment_by_char};
use crate::timeline::Timeline;

/// Rendering side of the book. `Line` is an opaque handle to one line's element.
pub trait BookSurface {
    type Line;

    /// Remove every line element from the letter body.
    fn clear_lines(&mut self);
    /// Append an empty line element and return its handle.
    fn append_line(&mut self) -> Self::Line;
    /// Append `count` empty lines that are not tracked by any session.
    fn fill_placeholders(&mut self, count: usize);
    /// Replace the line's content with `spans`; returns the number of animated characters.
    fn render_chars(&mut self, line: &mut Self::Line, spans: &[CharSpan<'_>]) -> usize;
    fn set_char_opacity(&mut self, line: &Self::Line, idx: usize, opacity: f64);
    fn scroll_into_view(&mut self, line: &Self::Line);
    /// Hide the "open me" guide; used when there is nothing to show.
    fn hide_guide(&mut self);
    fn set_card_opened(&mut self, opened: bool);
}

// --- Session ----------------------------------------------------------------

struct LineTimeline {
    timeline: Timeline,
    throttle: ScrollThrottle,
}

/// Mutable state of one open-to-close interaction.
pub struct TypingSession<L> {
    current_line: usize,
    targets: Vec<L>,
    timelines: BTreeMap<usize, LineTimeline>,
    paused: bool,
    next_line_in_ms: Option<f64>, // pending inter-line gap
}

impl<L> Default for TypingSession<L> {
    fn default() -> Self {
        Self {
            current_line: 0,
            targets: Vec::new(),
            timelines: BTreeMap::new(),
            paused: false,
            next_line_in_ms: None,
        }
    }
}

impl<L> TypingSession<L> {
    pub fn current_line(&self) -> usize {
        self.current_line
    }

    pub fn target_count(&self) -> usize {
        self.targets.len()
    }

    pub fn timeline(&self, line: usize) -> Option<&Timeline> {
        self.timelines.get(&line).map(|t| &t.timeline)
    }

    pub fn timeline_count(&self) -> usize {
        self.timelines.len()
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn has_pending_line(&self) -> bool {
        self.next_line_in_ms.is_some()
    }
}

// --- Controller -------------------------------------------------------------

pub struct TypingController<S: BookSurface> {
    surface: S,
    cfg: TypingConfig,
    lines: Vec<String>,
    session: TypingSession<S::Line>,
    last_now: Option<f64>,
}

impl<S: BookSurface> TypingController<S> {
    pub fn new(surface: S, cfg: TypingConfig) -> Self {
        Self {
            surface,
            cfg,
            lines: Vec::new(),
            session: TypingSession::default(),
            last_now: None,
        }
    }

    pub fn session(&self) -> &TypingSession<S::Line> {
        &self.session
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Lines of the current (or last) session.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Resolve content and start (or continue) typing from the current line.
    pub fn start(&mut self, source: &dyn ContentSource) {
        let lines = resolve_lines(source);
        if lines.is_empty() {
            log::info!("letter content is empty; hiding the book guide");
            self.surface.hide_guide();
            return;
        }
        if self.session.targets.is_empty() {
            log::debug!("starting letter session with {} lines", lines.len());
            self.lines = lines;
            self.surface.clear_lines();
            for _ in 0..self.lines.len() {
                let target = self.surface.append_line();
                self.session.targets.push(target);
            }
        }
        self.session.paused = false;
        self.type_next_line();
    }

    pub fn pause(&mut self) {
        self.session.paused = true;
        for lt in self.session.timelines.values_mut() {
            lt.timeline.pause();
        }
    }

    pub fn resume(&mut self) {
        self.session.paused = false;
        for lt in self.session.timelines.values_mut() {
            if lt.timeline.is_paused() && !lt.timeline.is_finished() {
                lt.timeline.play();
            }
        }
        let cur = self.session.current_line;
        if cur < self.session.targets.len() {
            let idle = self
                .session
                .timelines
                .get(&cur)
                .map_or(true, |lt| lt.timeline.is_finished());
            if idle {
                self.type_next_line();
            }
        }
    }

    /// True while a timeline is playing or the gap to the next line is pending.
    pub fn is_active(&self) -> bool {
        self.session.next_line_in_ms.is_some()
            || self
                .session
                .timelines
                .values()
                .any(|lt| !lt.timeline.is_paused() && !lt.timeline.is_finished())
    }

    /// Forget the last frame time so the next `tick` starts with a zero delta.
    /// Used when the frame loop goes idle.
    pub fn stop_clock(&mut self) {
        self.last_now = None;
    }

    /// Kill every timeline and forget the session's lines.
    pub fn reset(&mut self) {
        for lt in self.session.timelines.values_mut() {
            lt.timeline.kill();
        }
        self.session = TypingSession::default();
        log::debug!("letter session reset");
    }

    /// Advance time to `now_ms`: playing timelines first, then the pending gap.
    /// A line started by the gap begins animating on the next tick.
    pub fn tick(&mut self, now_ms: f64) {
        let dt = match self.last_now {
            Some(prev) => (now_ms - prev).max(0.0),
            None => 0.0,
        };
        self.last_now = Some(now_ms);
        let pending = self.session.next_line_in_ms.take();

        let mut completed = Vec::new();
        for (&idx, lt) in self.session.timelines.iter_mut() {
            let Some(step) = lt.timeline.advance(dt) else { continue };
            let target = &self.session.targets[idx];
            for c in step.changed.clone() {
                self.surface.set_char_opacity(target, c, lt.timeline.char_opacity(c));
            }
            if step.completed {
                completed.push(idx);
            } else if lt.throttle.should_scroll(step.progress) {
                self.surface.scroll_into_view(target);
            }
        }
        for idx in completed {
            self.surface.scroll_into_view(&self.session.targets[idx]);
            self.on_line_complete(idx);
        }

        if let Some(remaining) = pending {
            let left = remaining - dt;
            if left <= 0.0 {
                // pause is checked when the gap fires, not when it was scheduled
                if !self.session.paused {
                    self.type_next_line();
                }
            } else if self.session.next_line_in_ms.is_none() {
                self.session.next_line_in_ms = Some(left);
            }
        }
    }

    fn type_next_line(&mut self) {
        if self.session.paused {
            return;
        }
        let cur = self.session.current_line;
        if cur < self.session.targets.len() {
            self.surface.scroll_into_view(&self.session.targets[cur]);
            self.type_line(cur);
        }
    }

    fn type_line(&mut self, idx: usize) {
        if let Some(lt) = self.session.timelines.get_mut(&idx) {
            if lt.timeline.is_paused() && !lt.timeline.is_empty() {
                if !self.session.paused {
                    lt.timeline.play();
                }
                return;
            }
            if lt.timeline.is_finished() {
                self.on_line_complete(idx);
            }
            // still playing: never rebuild a live timeline
            return;
        }

        let count = {
            let spans = segment_by_char(&self.lines[idx]);
            self.surface.render_chars(&mut self.session.targets[idx], &spans)
        };
        if count == 0 {
            self.on_line_complete(idx);
            return;
        }
        let target = &self.session.targets[idx];
        for c in 0..count {
            self.surface.set_char_opacity(target, c, 0.0);
        }
        let timeline = Timeline::new(count, &self.cfg, self.session.paused);
        let throttle = ScrollThrottle::new(self.cfg.scroll_after_progress);
        self.session.timelines.insert(idx, LineTimeline { timeline, throttle });
    }

    fn on_line_complete(&mut self, idx: usize) {
        log::debug!("letter line {idx} typed");
        self.session.current_line = self.session.current_line.max(idx + 1);
        if !self.session.paused && self.session.current_line < self.session.targets.len() {
            self.session.next_line_in_ms = Some(self.cfg.line_gap_ms);
        }
    }
}
