//! Deferred mounting of video and audio players.
//!
//! A player is only built once its container comes within a margin of
//! the viewport. Until then a placeholder (poster image, or an empty box
//! when there is no poster) stands in for it. The reveal is one-shot: once
//! the player is mounted the observation is released for good.

use std::cell::Cell;
use std::rc::Rc;

use super::geometry::RootMargin;
use super::observer::{ElementId, ObserveOptions, Observation, ViewportObserver};
use crate::domain::{LibraryItem, MediaType};

/// Default distance (px) above and below the viewport at which players mount
pub const DEFAULT_LAZY_MARGIN_PX: f64 = 200.0;

/// Minimum visible fraction for a lazy mount
pub const LAZY_THRESHOLD: f64 = 0.01;

/// Per-element reveal lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealState {
    /// Not registered with any observer yet
    Unobserved,

    /// Registered, not yet in view
    Watching,

    /// Entered view; terminal
    Revealed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerKind {
    Video,
    Audio,
}

/// What to draw for a lazy media slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaFrame {
    /// Poster image, or an empty box when `None`
    Placeholder { poster: Option<String> },

    /// The real player
    Player {
        kind: PlayerKind,
        src: String,
        poster: Option<String>,
    },
}

pub struct LazyMedia {
    element: ElementId,
    kind: PlayerKind,
    src: String,
    poster: Option<String>,
    state: Rc<Cell<RevealState>>,
    observation: Option<Observation>,
}

impl LazyMedia {
    pub fn new(element: ElementId, kind: PlayerKind, src: impl Into<String>, poster: Option<String>) -> Self {
        Self {
            element,
            kind,
            src: src.into(),
            poster,
            state: Rc::new(Cell::new(RevealState::Unobserved)),
            observation: None,
        }
    }

    /// Slot for a library card. Only playable items with a media URL get
    /// a lazy player; everything else renders a static thumbnail.
    pub fn for_item(element: ElementId, item: &LibraryItem) -> Option<Self> {
        let kind = match item.media_type {
            MediaType::Video => PlayerKind::Video,
            MediaType::Audio => PlayerKind::Audio,
            MediaType::Article | MediaType::Book => return None,
        };
        if item.url.is_empty() {
            return None;
        }

        Some(Self::new(
            element,
            kind,
            item.url.clone(),
            item.poster().map(str::to_string),
        ))
    }

    pub fn element(&self) -> ElementId {
        self.element
    }

    pub fn state(&self) -> RevealState {
        self.state.get()
    }

    /// Start watching the slot. No-op unless the slot is still unobserved.
    pub fn mount(&mut self, observer: &dyn ViewportObserver, margin: RootMargin) {
        if self.state.get() != RevealState::Unobserved {
            return;
        }

        let options = ObserveOptions {
            root_margin: margin,
            threshold: LAZY_THRESHOLD,
            once: true,
        };
        let state = Rc::clone(&self.state);

        // Set before observing: an element already in view reveals immediately
        self.state.set(RevealState::Watching);
        self.observation = Some(observer.observe(
            self.element,
            options,
            Box::new(move |_| state.set(RevealState::Revealed)),
        ));
    }

    /// Element removed from the page: stop watching
    pub fn unmount(&mut self) {
        self.observation = None;
        if self.state.get() == RevealState::Watching {
            self.state.set(RevealState::Unobserved);
        }
    }

    pub fn render(&self) -> MediaFrame {
        match self.state.get() {
            RevealState::Revealed => MediaFrame::Player {
                kind: self.kind,
                src: self.src.clone(),
                poster: self.poster.clone(),
            },
            RevealState::Unobserved | RevealState::Watching => MediaFrame::Placeholder {
                poster: self.poster.clone(),
            },
        }
    }
}
