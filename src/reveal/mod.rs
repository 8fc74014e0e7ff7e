//! Viewport-driven rendering: lazy media players and scroll-reveal
//! animations, both built on the [`ViewportObserver`] capability.

pub mod animation;
pub mod geometry;
pub mod lazy;
pub mod observer;

pub use animation::{apply, AnimationDescriptor, Effect, Phase, RevealAnimator, Stagger, StyleFrame};
pub use geometry::{visible_ratio, Length, MarginParseError, Rect, RootMargin};
pub use lazy::{LazyMedia, MediaFrame, PlayerKind, RevealState, DEFAULT_LAZY_MARGIN_PX};
pub use observer::{ElementId, EnterCallback, ObserveOptions, Observation, ScrollObserver, ViewportObserver};
