//! Layout controller
//!
//! Owns the options, column state, task queue, event bus and load coordinator of
//! one masonry instance, and decides when a pass runs and with which scope:
//!
//! - resize (debounced) → full settled pass
//! - image ready → provisional incremental pass (when refining on every load)
//! - all images ready → full settled pass
//! - `recalculate(refresh, loaded)` from the host
//!
//! All state lives behind `RefCell`s that are never held across a subscriber
//! call, so subscribers may call back into the controller. Such calls land in
//! the task queue and run after the current pass.
//!
//! Once destroyed, the controller stays inert until `reinit`: queued passes,
//! pending load events and in-flight resize handling are dropped.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use crate::error::{ConfigurationError, MasonryError};
use crate::events::{EventBus, MasonryEvent, Subscriber};
use crate::host::{ResizeBinding, Surface};
use crate::layout::{column_width, ColumnState, LayoutPass};
use crate::loader::{LoadCoordinator, LoadTicket};
use crate::models::{MasonryOptions, RecalculationTask};
use crate::queue::TaskQueue;

/// Quiet period after the last resize event before the layout is recomputed
pub const RESIZE_DEBOUNCE_MS: u32 = 100;

pub struct LayoutController<S: Surface> {
    surface: S,
    options: MasonryOptions,
    columns: RefCell<ColumnState>,
    queue: RefCell<TaskQueue>,
    bus: EventBus,
    loader: RefCell<LoadCoordinator>,
    /// Scope of the passes triggered by individual image loads
    load_refresh: Cell<bool>,
    resize: RefCell<Option<Box<dyn ResizeBinding>>>,
    /// Cleared by `destroy`, set again by `reinit`
    active: Cell<bool>,
    this: Weak<Self>,
}

impl<S: Surface + 'static> LayoutController<S> {
    /// Create a controller, take over the container and start the layout.
    ///
    /// The options are owned by this instance. Fails with a configuration error
    /// when the column count is invalid.
    pub fn new(surface: S, options: MasonryOptions) -> Result<Rc<Self>, MasonryError> {
        if let Err(err) = options.validate() {
            if options.debug {
                log::error!("masonry disabled: {}", err);
            }
            return Err(err.into());
        }

        let controller = Rc::new_cyclic(|this| Self {
            surface,
            options,
            columns: RefCell::new(ColumnState::new()),
            queue: RefCell::new(TaskQueue::new()),
            bus: EventBus::new(),
            loader: RefCell::new(LoadCoordinator::new()),
            load_refresh: Cell::new(false),
            resize: RefCell::new(None),
            active: Cell::new(true),
            this: this.clone(),
        });

        controller.surface.attach()?;
        controller.bind_resize()?;

        if !controller.options.use_own_image_loader {
            controller.watch_images(!controller.options.wait_for_images)?;
        }

        controller.emit(MasonryEvent::Initialized);
        log::info!("masonry initialized ({} base columns)", controller.options.columns);
        Ok(controller)
    }

    pub fn options(&self) -> &MasonryOptions {
        &self.options
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Snapshot of the column state
    pub fn column_state(&self) -> ColumnState {
        self.columns.borrow().clone()
    }

    pub fn is_resize_bound(&self) -> bool {
        self.resize.borrow().is_some()
    }

    /// False between `destroy` and the next `reinit`
    pub fn is_active(&self) -> bool {
        self.active.get()
    }

    // ========================================================================
    // Public operations
    // ========================================================================

    /// Queue a pass. A settled pass (`loaded`) first drops any pending work.
    pub fn recalculate(&self, refresh: bool, loaded: bool) -> Result<(), MasonryError> {
        if loaded {
            self.queue.borrow_mut().clear();
        }
        self.enqueue(RecalculationTask::new(refresh, loaded))
    }

    /// Track the container's images again. Unless `wait_until_finish`, every
    /// load refines the layout with a pass of the given `refresh` scope.
    pub fn recalculate_on_image_load(&self, wait_until_finish: bool, refresh: bool) -> Result<(), MasonryError> {
        self.load_refresh.set(refresh);
        self.watch_images(!wait_until_finish)
    }

    /// Run `callback` once all images are ready, and on every load if `every_load`
    pub fn run_on_image_load(&self, callback: Subscriber, every_load: bool) -> Result<(), MasonryError> {
        self.bus.on(MasonryEvent::ImageComplete, Rc::clone(&callback));
        if every_load {
            self.bus.on(MasonryEvent::ImageLoad, callback);
        }
        self.watch_images(every_load)
    }

    pub fn on(&self, event: MasonryEvent, subscriber: Subscriber) {
        self.bus.on(event, subscriber);
    }

    /// Release the resize listener and hand the container back untouched
    pub fn destroy(&self) -> Result<(), MasonryError> {
        self.active.set(false);
        if let Some(mut binding) = self.resize.borrow_mut().take() {
            binding.release();
        }
        self.loader.borrow_mut().cancel();
        self.queue.borrow_mut().clear();
        self.columns.borrow_mut().reset();
        self.surface.detach()?;
        log::info!("masonry destroyed");
        Ok(())
    }

    /// Take the container over again with the existing options
    pub fn reinit(&self) -> Result<(), MasonryError> {
        self.surface.attach()?;
        self.active.set(true);
        self.bind_resize()?;
        self.recalculate(true, true)?;
        self.emit(MasonryEvent::Initialized);
        Ok(())
    }

    // ========================================================================
    // Triggers
    // ========================================================================

    /// Debounced resize: announce it, then recompute everything
    pub fn handle_resize(&self) -> Result<(), MasonryError> {
        self.emit(MasonryEvent::Resize);
        if !self.active.get() {
            return Ok(());
        }
        self.recalculate(true, true)
    }

    /// Start a new image tracking generation.
    ///
    /// With `report_every`, a provisional pass runs right away, before any
    /// readiness notification, and every load refines it.
    pub fn watch_images(&self, report_every: bool) -> Result<(), MasonryError> {
        let images = self.surface.images()?;
        let (ticket, immediate) = self.loader.borrow_mut().track(images.len(), report_every);

        if report_every {
            self.recalculate(false, false)?;
        }
        self.dispatch_load_events(immediate)?;

        for image in &images {
            if self.surface.image_ready(image) {
                self.image_ready(ticket)?;
                continue;
            }

            let this = self.this.clone();
            self.surface.on_image_ready(
                image,
                Box::new(move || {
                    if let Some(controller) = this.upgrade() {
                        if let Err(err) = controller.image_ready(ticket) {
                            log::error!("image readiness handling failed: {}", err);
                        }
                    }
                }),
            )?;
        }
        Ok(())
    }

    /// One tracked image settled
    pub fn image_ready(&self, ticket: LoadTicket) -> Result<(), MasonryError> {
        let (events, (ready, total)) = {
            let mut loader = self.loader.borrow_mut();
            let events = loader.notify(ticket);
            (events, loader.progress())
        };
        if !events.is_empty() {
            log::debug!("image ready ({}/{})", ready, total);
        }
        self.dispatch_load_events(events)
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn bind_resize(&self) -> Result<(), MasonryError> {
        let this = self.this.clone();
        let binding = self.surface.bind_resize(
            RESIZE_DEBOUNCE_MS,
            Rc::new(move || {
                if let Some(controller) = this.upgrade() {
                    if let Err(err) = controller.handle_resize() {
                        log::error!("resize handling failed: {}", err);
                    }
                }
            }),
        )?;

        if let Some(mut previous) = self.resize.borrow_mut().replace(binding) {
            previous.release();
        }
        Ok(())
    }

    fn dispatch_load_events(&self, events: Vec<MasonryEvent>) -> Result<(), MasonryError> {
        for event in events {
            // a subscriber may have destroyed the controller
            if !self.active.get() {
                break;
            }
            match event {
                MasonryEvent::ImageLoad if self.loader.borrow().reports_every_load() => {
                    self.recalculate(self.load_refresh.get(), false)?;
                }
                MasonryEvent::ImageComplete => self.recalculate(true, true)?,
                _ => {}
            }
            self.emit(event);
        }
        Ok(())
    }

    fn emit(&self, event: MasonryEvent) {
        // failures are logged by the bus and never abort a pass
        let _ = self.bus.emit(event);
    }

    fn enqueue(&self, task: RecalculationTask) -> Result<(), MasonryError> {
        if !self.active.get() {
            return Ok(());
        }
        let Some(mut task) = self.queue.borrow_mut().add(task) else {
            return Ok(());
        };

        loop {
            let result = self.run_pass(task);
            if let Err(err) = result {
                // abandon pending work so the queue is idle again
                let mut queue = self.queue.borrow_mut();
                queue.clear();
                queue.finish();
                return Err(err);
            }

            let next = self.queue.borrow_mut().finish();
            match next {
                Some(next) => task = next,
                None => return Ok(()),
            }
        }
    }

    fn report(&self, err: &ConfigurationError) {
        if self.options.debug {
            log::error!("masonry pass skipped: {}", err);
        } else {
            log::debug!("masonry pass skipped: {}", err);
        }
    }

    fn run_pass(&self, task: RecalculationTask) -> Result<(), MasonryError> {
        if !self.active.get() {
            log::debug!("controller destroyed, pass dropped");
            return Ok(());
        }
        let container_width = self.surface.container_width();
        let resolved = self.options.resolve(container_width);
        let width = match column_width(container_width, resolved.columns, resolved.margin.x) {
            Ok(width) => width,
            Err(err) => {
                self.report(&err);
                return Ok(());
            }
        };

        let items = self.surface.items()?;
        let full = task.refresh
            || self
                .columns
                .borrow()
                .needs_full(resolved.columns as usize, container_width, items.len());

        // widths go on before measuring, heights depend on them
        for item in &items {
            let metrics = self.surface.metrics(item);
            if !metrics.displayed || (!full && metrics.complete) {
                continue;
            }
            self.surface.set_width(item, width)?;
            if full {
                self.surface.set_complete(item, false)?;
            }
        }

        let metrics: Vec<_> = items.iter().map(|item| self.surface.metrics(item)).collect();
        let pass = LayoutPass {
            container_width,
            options: resolved,
            task: RecalculationTask::new(full, task.loaded),
            items: &metrics,
        };

        let outcome = match self.columns.borrow_mut().run(pass) {
            Ok(outcome) => outcome,
            Err(err) => {
                self.report(&err);
                return Ok(());
            }
        };

        for (index, placement) in &outcome.placements {
            let item = &items[*index];
            self.surface.place(item, placement)?;
            if task.loaded {
                self.surface.set_complete(item, true)?;
            }
        }
        self.surface.set_container_height(outcome.container_height)?;

        log::debug!(
            "pass done: {} placed, full={}, loaded={}, height={:.1}px",
            outcome.placements.len(),
            outcome.full,
            task.loaded,
            outcome.container_height
        );

        self.emit(MasonryEvent::Recalculated);
        Ok(())
    }
}

impl<S: Surface> Drop for LayoutController<S> {
    fn drop(&mut self) {
        if let Some(mut binding) = self.resize.get_mut().take() {
            binding.release();
        }
    }
}
