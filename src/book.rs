//! Card / guide binding.
//!
//! `LetterBook` is the outer controller: it reacts to the guide's class changes and
//! to the pointer entering or leaving the card, and forwards to the typing
//! controller it owns. Each widget on a page gets its own `LetterBook`.

use crate::config::TypingConfig;
use crate::content::{ContentSource, resolve_lines};
use crate::typing::{BookSurface, TypingController};

/// Visibility of the guide element as read from its class list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuideState {
    /// Shown and not hidden: hover interactions are live.
    Shown,
    /// Carries the hidden class: the book is fully closed.
    Hidden,
    /// Neither (e.g. mid-transition).
    Idle,
}

impl GuideState {
    pub fn from_classes(has_shown: bool, has_hidden: bool) -> Self {
        if has_hidden {
            GuideState::Hidden
        } else if has_shown {
            GuideState::Shown
        } else {
            GuideState::Idle
        }
    }
}

pub struct LetterBook<S: BookSurface> {
    typing: TypingController<S>,
    source: Box<dyn ContentSource>,
}

impl<S: BookSurface> LetterBook<S> {
    pub fn new(surface: S, source: Box<dyn ContentSource>, cfg: TypingConfig) -> Self {
        Self { typing: TypingController::new(surface, cfg), source }
    }

    pub fn typing(&self) -> &TypingController<S> {
        &self.typing
    }

    pub fn typing_mut(&mut self) -> &mut TypingController<S> {
        &mut self.typing
    }

    /// Class attribute of the guide changed; `state` is its state after the change.
    pub fn on_guide_class_changed(&mut self, state: GuideState) {
        if state != GuideState::Hidden {
            return;
        }
        self.typing.reset();
        let placeholders = match self.typing.lines().len() {
            0 => resolve_lines(self.source.as_ref()).len(),
            n => n,
        };
        let surface = self.typing.surface_mut();
        surface.set_card_opened(false);
        surface.fill_placeholders(placeholders);
    }

    pub fn on_pointer_enter(&mut self, state: GuideState) {
        if state != GuideState::Shown {
            return;
        }
        self.typing.surface_mut().set_card_opened(true);
        let session = self.typing.session();
        if session.timeline_count() == 0 || session.current_line() == 0 {
            self.typing.start(self.source.as_ref());
        } else {
            self.typing.resume();
        }
    }

    pub fn on_pointer_leave(&mut self, state: GuideState) {
        if state != GuideState::Shown {
            return;
        }
        self.typing.surface_mut().set_card_opened(false);
        self.typing.pause();
    }

    pub fn tick(&mut self, now_ms: f64) {
        self.typing.tick(now_ms);
    }

    /// Whether the frame loop still has work to do.
    pub fn is_animating(&self) -> bool {
        self.typing.is_active()
    }
}
