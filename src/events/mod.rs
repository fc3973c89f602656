//! Lifecycle events
//!
//! Named publish/subscribe used by the controller to announce what it did and by
//! the host to react. Subscribers run synchronously in subscription order; each
//! one is invoked on its own, so a failing subscriber is logged and its siblings
//! still run.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CollaboratorError;

/// Events emitted by a layout instance
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MasonryEvent {
    /// Construction or `reInit` finished
    #[serde(rename = "initialized")]
    Initialized,

    /// A layout pass finished
    #[serde(rename = "recalculated")]
    Recalculated,

    /// One tracked image became ready
    #[serde(rename = "image.load")]
    ImageLoad,

    /// Every tracked image is ready
    #[serde(rename = "image.complete")]
    ImageComplete,

    /// A debounced resize burst ended
    #[serde(rename = "resize")]
    Resize,
}

impl MasonryEvent {
    pub const ALL: [MasonryEvent; 5] = [
        MasonryEvent::Initialized,
        MasonryEvent::Recalculated,
        MasonryEvent::ImageLoad,
        MasonryEvent::ImageComplete,
        MasonryEvent::Resize,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            MasonryEvent::Initialized => "initialized",
            MasonryEvent::Recalculated => "recalculated",
            MasonryEvent::ImageLoad => "image.load",
            MasonryEvent::ImageComplete => "image.complete",
            MasonryEvent::Resize => "resize",
        }
    }

    /// Namespaced name as exposed to page scripts
    pub fn qualified_name(&self) -> &'static str {
        match self {
            MasonryEvent::Initialized => "macy.initialized",
            MasonryEvent::Recalculated => "macy.recalculated",
            MasonryEvent::ImageLoad => "macy.images.load",
            MasonryEvent::ImageComplete => "macy.images.complete",
            MasonryEvent::Resize => "macy.resize",
        }
    }
}

impl fmt::Display for MasonryEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MasonryEvent {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MasonryEvent::ALL
            .iter()
            .copied()
            .find(|event| event.name() == s || event.qualified_name() == s)
            .ok_or_else(|| format!("Unknown event '{}'", s))
    }
}

/// Subscriber callback. An `Err` is reported and swallowed.
pub type Subscriber = Rc<dyn Fn(MasonryEvent) -> Result<(), String>>;

/// Subscriber registry
#[derive(Default)]
pub struct EventBus {
    subscribers: RefCell<Vec<(MasonryEvent, Subscriber)>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to an event
    pub fn on(&self, event: MasonryEvent, subscriber: Subscriber) {
        self.subscribers.borrow_mut().push((event, subscriber));
    }

    /// Invoke every subscriber of `event` and return the failures.
    ///
    /// The registry is not borrowed while subscribers run, so a subscriber may
    /// subscribe further callbacks or trigger another emit.
    pub fn emit(&self, event: MasonryEvent) -> Vec<CollaboratorError> {
        let targets: Vec<Subscriber> = self
            .subscribers
            .borrow()
            .iter()
            .filter(|(subscribed, _)| *subscribed == event)
            .map(|(_, subscriber)| Rc::clone(subscriber))
            .collect();

        log::debug!("emit {} to {} subscriber(s)", event, targets.len());

        let mut failures = Vec::new();
        for subscriber in targets {
            if let Err(message) = subscriber(event) {
                log::warn!("subscriber for '{}' failed: {}", event, message);
                failures.push(CollaboratorError::Subscriber {
                    event: event.name().to_string(),
                    message,
                });
            }
        }
        failures
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscribers.borrow().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn parses_short_and_namespaced_names() {
        assert_eq!("image.load".parse::<MasonryEvent>(), Ok(MasonryEvent::ImageLoad));
        assert_eq!("macy.images.complete".parse::<MasonryEvent>(), Ok(MasonryEvent::ImageComplete));
        assert!("macy.unknown".parse::<MasonryEvent>().is_err());
    }

    #[test]
    fn emits_in_subscription_order() {
        let bus = EventBus::new();
        let order = Rc::new(RefCell::new(Vec::new()));

        for tag in ["first", "second"] {
            let order = Rc::clone(&order);
            bus.on(
                MasonryEvent::Recalculated,
                Rc::new(move |_: MasonryEvent| -> Result<(), String> {
                    order.borrow_mut().push(tag);
                    Ok(())
                }),
            );
        }
        bus.on(MasonryEvent::Resize, Rc::new(|_: MasonryEvent| -> Result<(), String> { panic!("wrong event delivered") }));

        assert!(bus.emit(MasonryEvent::Recalculated).is_empty());
        assert_eq!(*order.borrow(), vec!["first", "second"]);
    }

    #[test]
    fn failing_subscriber_does_not_block_siblings() {
        let bus = EventBus::new();
        let reached = Rc::new(Cell::new(false));

        bus.on(MasonryEvent::Initialized, Rc::new(|_: MasonryEvent| -> Result<(), String> { Err("boom".to_string()) }));
        let flag = Rc::clone(&reached);
        bus.on(
            MasonryEvent::Initialized,
            Rc::new(move |_: MasonryEvent| -> Result<(), String> {
                flag.set(true);
                Ok(())
            }),
        );

        let failures = bus.emit(MasonryEvent::Initialized);
        assert!(reached.get());
        assert_eq!(
            failures,
            vec![CollaboratorError::Subscriber {
                event: "initialized".to_string(),
                message: "boom".to_string(),
            }]
        );
    }
}
