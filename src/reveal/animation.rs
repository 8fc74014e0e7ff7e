//! Scroll-reveal animations as plain descriptors.
//!
//! A section declares how it should appear ([`AnimationDescriptor`]) and
//! [`apply`] turns that into the style for the hidden and revealed phases.
//! [`RevealAnimator`] flips elements from hidden to revealed as they
//! scroll into view.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use super::geometry::{Length, RootMargin};
use super::observer::{ElementId, ObserveOptions, Observation, ViewportObserver};

/// Fraction of a section that must be visible before it animates in
pub const REVEAL_THRESHOLD: f64 = 0.15;

/// Entrance effect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Effect {
    #[default]
    FadeUp,
    SlideUp,
    ZoomIn,
}

impl Effect {
    /// Parse a `data-aos` style name. Unknown names fall back to fade-up.
    pub fn from_name(name: &str) -> Self {
        match name.trim() {
            "slide-up" => Effect::SlideUp,
            "zoom-in" => Effect::ZoomIn,
            _ => Effect::FadeUp,
        }
    }

    fn hidden_transform(&self) -> &'static str {
        match self {
            Effect::FadeUp | Effect::SlideUp => "translateY(16px)",
            Effect::ZoomIn => "translateY(16px) scale(0.98)",
        }
    }

    fn revealed_transform(&self) -> &'static str {
        match self {
            Effect::FadeUp | Effect::SlideUp => "translateY(0)",
            Effect::ZoomIn => "translateY(0) scale(1)",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stagger {
    /// Position of the element within its group
    pub index: u32,

    #[serde(default = "default_increment_ms")]
    pub increment_ms: u32,
}

impl Stagger {
    pub fn at(index: u32) -> Self {
        Self {
            index,
            increment_ms: default_increment_ms(),
        }
    }
}

fn default_increment_ms() -> u32 {
    75
}

fn default_duration_ms() -> u32 {
    700
}

fn default_easing() -> String {
    "ease-out".to_string()
}

fn default_once() -> bool {
    true
}

/// How one element animates in
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnimationDescriptor {
    #[serde(default)]
    pub effect: Effect,

    #[serde(default)]
    pub delay_ms: u32,

    #[serde(default = "default_duration_ms")]
    pub duration_ms: u32,

    #[serde(default = "default_easing")]
    pub easing: String,

    /// Animate only the first time the element enters view
    #[serde(default = "default_once")]
    pub once: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stagger: Option<Stagger>,
}

impl Default for AnimationDescriptor {
    fn default() -> Self {
        Self::new(Effect::default())
    }
}

impl AnimationDescriptor {
    pub fn new(effect: Effect) -> Self {
        Self {
            effect,
            delay_ms: 0,
            duration_ms: default_duration_ms(),
            easing: default_easing(),
            once: default_once(),
            stagger: None,
        }
    }

    pub fn with_delay(mut self, delay_ms: u32) -> Self {
        self.delay_ms = delay_ms;
        self
    }

    pub fn with_duration(mut self, duration_ms: u32) -> Self {
        self.duration_ms = duration_ms;
        self
    }

    pub fn with_stagger(mut self, stagger: Stagger) -> Self {
        self.stagger = Some(stagger);
        self
    }

    pub fn repeating(mut self) -> Self {
        self.once = false;
        self
    }

    /// Base delay plus the stagger offset
    pub fn effective_delay_ms(&self) -> u32 {
        let offset = self
            .stagger
            .map(|s| s.index.saturating_mul(s.increment_ms))
            .unwrap_or(0);
        self.delay_ms.saturating_add(offset)
    }

    fn transition(&self, delay_ms: u32) -> String {
        let timing = format!("{}ms {} {}ms", self.duration_ms, self.easing, delay_ms);
        format!("opacity {timing}, transform {timing}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Hidden,
    Revealed,
}

/// Inline style properties. `None` means "leave unset".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StyleFrame {
    pub opacity: Option<f64>,
    pub transform: Option<String>,
    pub transition: Option<String>,
    pub will_change: Option<String>,
}

impl StyleFrame {
    pub fn is_empty(&self) -> bool {
        *self == StyleFrame::default()
    }

    /// `key: value;` pairs in a fixed order
    pub fn to_css(&self) -> String {
        let mut parts = Vec::new();
        if let Some(opacity) = self.opacity {
            parts.push(format!("opacity: {};", opacity));
        }
        if let Some(transform) = &self.transform {
            parts.push(format!("transform: {};", transform));
        }
        if let Some(transition) = &self.transition {
            parts.push(format!("transition: {};", transition));
        }
        if let Some(will_change) = &self.will_change {
            parts.push(format!("will-change: {};", will_change));
        }
        parts.join(" ")
    }
}

/// Style for `descriptor` in `phase`.
///
/// With `reduced_motion` set every property is cleared so the element
/// simply shows in its natural position.
pub fn apply(descriptor: &AnimationDescriptor, phase: Phase, reduced_motion: bool) -> StyleFrame {
    if reduced_motion {
        return StyleFrame::default();
    }

    match phase {
        Phase::Hidden => StyleFrame {
            opacity: Some(0.0),
            transform: Some(descriptor.effect.hidden_transform().to_string()),
            transition: Some(descriptor.transition(descriptor.delay_ms)),
            will_change: Some("opacity, transform".to_string()),
        },
        Phase::Revealed => StyleFrame {
            opacity: Some(1.0),
            transform: Some(descriptor.effect.revealed_transform().to_string()),
            transition: Some(descriptor.transition(descriptor.effective_delay_ms())),
            will_change: Some("opacity, transform".to_string()),
        },
    }
}

/// Observer options for reveal animations: 15% visible, with the bottom
/// edge of the viewport pulled up by 10%
pub fn reveal_options(once: bool) -> ObserveOptions {
    ObserveOptions {
        root_margin: RootMargin {
            top: Length::Px(0.0),
            right: Length::Px(0.0),
            bottom: Length::Percent(-10.0),
            left: Length::Px(0.0),
        },
        threshold: REVEAL_THRESHOLD,
        once,
    }
}

struct Tracked {
    descriptor: AnimationDescriptor,
    _observation: Observation,
}

/// Drives a set of animated sections
pub struct RevealAnimator {
    reduced_motion: bool,
    phases: Rc<RefCell<HashMap<ElementId, Phase>>>,
    tracked: HashMap<ElementId, Tracked>,
}

impl RevealAnimator {
    pub fn new(reduced_motion: bool) -> Self {
        Self {
            reduced_motion,
            phases: Rc::new(RefCell::new(HashMap::new())),
            tracked: HashMap::new(),
        }
    }

    pub fn reduced_motion(&self) -> bool {
        self.reduced_motion
    }

    /// Start animating `element`. Re-attaching replaces the previous
    /// descriptor and resets the element to hidden.
    pub fn attach(&mut self, observer: &dyn ViewportObserver, element: ElementId, descriptor: AnimationDescriptor) {
        self.tracked.remove(&element);
        self.phases.borrow_mut().insert(element, Phase::Hidden);

        let phases = Rc::clone(&self.phases);
        let observation = observer.observe(
            element,
            reveal_options(descriptor.once),
            Box::new(move |target| {
                phases.borrow_mut().insert(target, Phase::Revealed);
            }),
        );

        self.tracked.insert(
            element,
            Tracked {
                descriptor,
                _observation: observation,
            },
        );
    }

    pub fn detach(&mut self, element: ElementId) {
        if self.tracked.remove(&element).is_some() {
            self.phases.borrow_mut().remove(&element);
        }
    }

    pub fn phase(&self, element: ElementId) -> Option<Phase> {
        self.phases.borrow().get(&element).copied()
    }

    /// Current inline style for a tracked element
    pub fn style(&self, element: ElementId) -> Option<StyleFrame> {
        let tracked = self.tracked.get(&element)?;
        let phase = self.phase(element)?;
        Some(apply(&tracked.descriptor, phase, self.reduced_motion))
    }
}
