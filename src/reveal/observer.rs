//! Viewport-visibility capability.
//!
//! [`ViewportObserver::observe`] registers interest in one element and
//! returns an [`Observation`], which is the disposer: dropping it (or
//! calling [`Observation::dispose`]) stops monitoring. Any platform's
//! native visibility primitive can sit behind the trait.
//!
//! [`ScrollObserver`] is the geometry-driven implementation used by the
//! crate: the host reports element rectangles and viewport movements and
//! the observer decides which elements just entered view.
//!
//! Everything here runs on the single UI event loop, hence `Rc`/`RefCell`.

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashMap};
use std::rc::{Rc, Weak};

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::geometry::{visible_ratio, Rect, RootMargin};

/// Handle for an element on the page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ElementId(pub u64);

/// Observation options
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObserveOptions {
    pub root_margin: RootMargin,

    /// Minimum visible fraction that counts as "in view"
    pub threshold: f64,

    /// Stop observing after the first entry
    pub once: bool,
}

impl Default for ObserveOptions {
    fn default() -> Self {
        Self {
            root_margin: RootMargin::default(),
            threshold: 0.0,
            once: true,
        }
    }
}

/// Callback fired when an element enters the viewport
pub type EnterCallback = Box<dyn FnMut(ElementId)>;

/// Capability: watch an element and get told when it enters view
pub trait ViewportObserver {
    fn observe(&self, target: ElementId, options: ObserveOptions, on_enter: EnterCallback) -> Observation;
}

/// Disposer for one observation
#[must_use = "dropping an Observation stops monitoring immediately"]
pub struct Observation {
    registry: Weak<RefCell<Registry>>,
    key: u64,
    /// Shared with the registry entry
    cancelled: Rc<Cell<bool>>,
}

impl Observation {
    /// An observation that watches nothing
    pub fn detached() -> Self {
        Self {
            registry: Weak::new(),
            key: 0,
            cancelled: Rc::new(Cell::new(true)),
        }
    }

    /// Whether the observer is still monitoring this element
    pub fn is_active(&self) -> bool {
        !self.cancelled.get()
            && self
                .registry
                .upgrade()
                .map(|registry| registry.borrow().entries.contains_key(&self.key))
                .unwrap_or(false)
    }

    /// Stop monitoring (same as dropping)
    pub fn dispose(self) {}
}

impl Drop for Observation {
    fn drop(&mut self) {
        self.cancelled.set(true);
        let Some(registry) = self.registry.upgrade() else {
            return;
        };

        // Busy when dropped from inside a registry update (a removed entry's
        // callback owned this observation). The entry is pruned on next access.
        match registry.try_borrow_mut() {
            Ok(mut registry) => {
                registry.entries.remove(&self.key);
            }
            Err(_) => debug!("Observation {} dropped during update; removal deferred", self.key),
        };
    }
}

struct Entry {
    target: ElementId,
    options: ObserveOptions,
    /// Taken out while the callback runs
    callback: Option<EnterCallback>,
    intersecting: bool,
    cancelled: Rc<Cell<bool>>,
}

struct Registry {
    viewport: Rect,
    layout: HashMap<ElementId, Rect>,
    entries: BTreeMap<u64, Entry>,
    next_key: u64,
}

impl Registry {
    /// Drop entries whose observation is gone. Dropping one entry's
    /// callback can cancel another, so repeat until nothing changes.
    fn prune(&mut self) {
        loop {
            let before = self.entries.len();
            self.entries.retain(|_, entry| !entry.cancelled.get());
            if self.entries.len() == before {
                break;
            }
        }
    }
}

/// Geometry-driven viewport observer
#[derive(Clone)]
pub struct ScrollObserver {
    registry: Rc<RefCell<Registry>>,
}

impl ScrollObserver {
    /// Viewport of the given size, scrolled to the top
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            registry: Rc::new(RefCell::new(Registry {
                viewport: Rect::new(0.0, 0.0, width, height),
                layout: HashMap::new(),
                entries: BTreeMap::new(),
                next_key: 1,
            })),
        }
    }

    pub fn viewport(&self) -> Rect {
        self.registry.borrow().viewport
    }

    /// Number of live observations
    pub fn observed_count(&self) -> usize {
        let mut registry = self.registry.borrow_mut();
        registry.prune();
        registry.entries.len()
    }

    /// Record an element's position, then re-check visibility
    pub fn set_layout(&self, element: ElementId, rect: Rect) -> usize {
        self.registry.borrow_mut().layout.insert(element, rect);
        self.flush()
    }

    /// Element unmounted: forget its position
    pub fn remove_element(&self, element: ElementId) {
        self.registry.borrow_mut().layout.remove(&element);
    }

    /// Scroll vertically to `y`, then re-check visibility
    pub fn scroll_to(&self, y: f64) -> usize {
        self.registry.borrow_mut().viewport.y = y;
        self.flush()
    }

    pub fn resize(&self, width: f64, height: f64) -> usize {
        {
            let mut registry = self.registry.borrow_mut();
            registry.viewport.width = width;
            registry.viewport.height = height;
        }
        self.flush()
    }

    /// Evaluate every observation and fire callbacks for elements that
    /// just entered view. Returns the number of callbacks fired.
    pub fn flush(&self) -> usize {
        let entering: Vec<(u64, ElementId)> = {
            let mut registry = self.registry.borrow_mut();
            registry.prune();
            let viewport = registry.viewport;
            let Registry { layout, entries, .. } = &mut *registry;

            entries
                .iter_mut()
                .filter_map(|(key, entry)| {
                    let now = layout
                        .get(&entry.target)
                        .and_then(|rect| visible_ratio(rect, &viewport, &entry.options.root_margin))
                        .map(|ratio| ratio > 0.0 && ratio >= entry.options.threshold)
                        .unwrap_or(false);

                    let entered = now && !entry.intersecting;
                    entry.intersecting = now;
                    entered.then_some((*key, entry.target))
                })
                .collect()
        };

        let mut fired = 0;
        for (key, target) in entering {
            let callback = self
                .registry
                .borrow_mut()
                .entries
                .get_mut(&key)
                .filter(|entry| !entry.cancelled.get())
                .and_then(|entry| entry.callback.take());

            // Disposed by an earlier callback in this flush
            let Some(mut callback) = callback else {
                continue;
            };
            callback(target);
            fired += 1;

            let mut registry = self.registry.borrow_mut();
            let once = registry
                .entries
                .get(&key)
                .map(|entry| entry.options.once)
                .unwrap_or(true);
            if once {
                registry.entries.remove(&key);
            } else if let Some(entry) = registry.entries.get_mut(&key) {
                entry.callback = Some(callback);
            }
        }

        fired
    }
}

impl ViewportObserver for ScrollObserver {
    fn observe(&self, target: ElementId, options: ObserveOptions, on_enter: EnterCallback) -> Observation {
        let cancelled = Rc::new(Cell::new(false));
        let key = {
            let mut registry = self.registry.borrow_mut();
            let key = registry.next_key;
            registry.next_key += 1;
            registry.entries.insert(
                key,
                Entry {
                    target,
                    options,
                    callback: Some(on_enter),
                    intersecting: false,
                    cancelled: Rc::clone(&cancelled),
                },
            );
            key
        };

        // Elements already in view fire right away
        self.flush();

        Observation {
            registry: Rc::downgrade(&self.registry),
            key,
            cancelled,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counter() -> (Rc<Cell<u32>>, EnterCallback) {
        let hits = Rc::new(Cell::new(0));
        let inner = Rc::clone(&hits);
        (hits, Box::new(move |_| inner.set(inner.get() + 1)))
    }

    #[test]
    fn test_fires_once_when_scrolled_into_view() {
        let observer = ScrollObserver::new(800.0, 600.0);
        let el = ElementId(1);
        observer.set_layout(el, Rect::new(0.0, 1500.0, 300.0, 200.0));

        let (hits, cb) = counter();
        let observation = observer.observe(el, ObserveOptions::default(), cb);
        assert_eq!(hits.get(), 0);
        assert!(observation.is_active());

        observer.scroll_to(1200.0);
        assert_eq!(hits.get(), 1);
        assert!(!observation.is_active());

        observer.scroll_to(0.0);
        observer.scroll_to(1200.0);
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn test_already_visible_fires_on_observe() {
        let observer = ScrollObserver::new(800.0, 600.0);
        observer.set_layout(ElementId(1), Rect::new(0.0, 100.0, 300.0, 200.0));

        let (hits, cb) = counter();
        let _observation = observer.observe(ElementId(1), ObserveOptions::default(), cb);
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn test_repeating_observation_fires_on_each_entry() {
        let observer = ScrollObserver::new(800.0, 600.0);
        observer.set_layout(ElementId(1), Rect::new(0.0, 1000.0, 300.0, 200.0));

        let (hits, cb) = counter();
        let options = ObserveOptions {
            once: false,
            ..Default::default()
        };
        let _observation = observer.observe(ElementId(1), options, cb);

        observer.scroll_to(800.0);
        observer.scroll_to(0.0);
        observer.scroll_to(800.0);
        assert_eq!(hits.get(), 2);
    }

    #[test]
    fn test_dropping_observation_stops_monitoring() {
        let observer = ScrollObserver::new(800.0, 600.0);
        observer.set_layout(ElementId(1), Rect::new(0.0, 1000.0, 300.0, 200.0));

        let (hits, cb) = counter();
        let observation = observer.observe(ElementId(1), ObserveOptions::default(), cb);
        assert_eq!(observer.observed_count(), 1);

        observation.dispose();
        assert_eq!(observer.observed_count(), 0);

        observer.scroll_to(900.0);
        assert_eq!(hits.get(), 0);
    }

    #[test]
    fn test_threshold_requires_enough_visibility() {
        let observer = ScrollObserver::new(800.0, 600.0);
        observer.set_layout(ElementId(1), Rect::new(0.0, 590.0, 100.0, 100.0));

        let (hits, cb) = counter();
        let options = ObserveOptions {
            threshold: 0.15,
            ..Default::default()
        };
        let _observation = observer.observe(ElementId(1), options, cb);
        // 10% visible
        assert_eq!(hits.get(), 0);

        observer.scroll_to(10.0);
        // 20% visible
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn test_observation_dropped_during_removal_is_pruned() {
        let observer = ScrollObserver::new(800.0, 600.0);
        observer.set_layout(ElementId(1), Rect::new(0.0, 2000.0, 300.0, 200.0));
        observer.set_layout(ElementId(2), Rect::new(0.0, 3000.0, 300.0, 200.0));

        let (hits, cb) = counter();
        let inner = observer.observe(ElementId(2), ObserveOptions::default(), cb);

        // The outer callback owns the inner observation
        let outer = observer.observe(
            ElementId(1),
            ObserveOptions::default(),
            Box::new(move |_| {
                let _keep = &inner;
            }),
        );
        assert_eq!(observer.observed_count(), 2);

        // Removing the outer entry drops the inner observation mid-update
        outer.dispose();
        assert_eq!(observer.observed_count(), 0);

        observer.scroll_to(2900.0);
        assert_eq!(hits.get(), 0);
    }
}
