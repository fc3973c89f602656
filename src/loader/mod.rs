//! Image readiness tracking
//!
//! Counts readiness notifications for the current set of tracked images and
//! decides which events they produce. Each call to [`LoadCoordinator::track`]
//! opens a new generation; notifications from an older generation are dropped.

use crate::events::MasonryEvent;

/// Identifies one tracking generation
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LoadTicket(u64);

#[derive(Clone, Debug, Default, PartialEq)]
pub struct LoadCoordinator {
    generation: u64,
    total: usize,
    ready: usize,
    completed: bool,
    /// Refine the layout on every load, not only when the set is complete
    report_every: bool,
}

impl LoadCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start tracking `total` images.
    ///
    /// Returns the ticket readiness notifications must carry, plus the events
    /// produced right away (an empty set is complete immediately).
    pub fn track(&mut self, total: usize, report_every: bool) -> (LoadTicket, Vec<MasonryEvent>) {
        self.generation += 1;
        self.total = total;
        self.ready = 0;
        self.completed = false;
        self.report_every = report_every;

        log::debug!(
            "tracking {} image(s), generation {}, report_every={}",
            total,
            self.generation,
            report_every
        );

        let mut events = Vec::new();
        if total == 0 {
            self.completed = true;
            events.push(MasonryEvent::ImageComplete);
        }
        (LoadTicket(self.generation), events)
    }

    /// Record that one image became ready (loaded or failed).
    ///
    /// Every accepted notification yields `ImageLoad`; the one that completes
    /// the set also yields `ImageComplete`, exactly once per generation.
    pub fn notify(&mut self, ticket: LoadTicket) -> Vec<MasonryEvent> {
        if ticket.0 != self.generation {
            log::debug!("ignoring readiness from stale generation {}", ticket.0);
            return Vec::new();
        }
        if self.completed {
            return Vec::new();
        }

        self.ready += 1;
        let mut events = vec![MasonryEvent::ImageLoad];
        if self.ready >= self.total {
            self.completed = true;
            events.push(MasonryEvent::ImageComplete);
        }
        events
    }

    /// Invalidate the current generation without starting a new one
    pub fn cancel(&mut self) {
        self.generation += 1;
        self.total = 0;
        self.ready = 0;
        self.completed = true;
    }

    pub fn reports_every_load(&self) -> bool {
        self.report_every
    }

    /// (ready, total) for the current generation
    pub fn progress(&self) -> (usize, usize) {
        (self.ready, self.total)
    }
}
