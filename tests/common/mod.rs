// Recording in-memory surface shared by the integration tests

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use masonry_wasm::{CollaboratorError, ItemMetrics, Placement, ResizeBinding, Surface};

#[derive(Clone, Debug, PartialEq)]
pub struct MockItem {
    pub height: f64,
    pub complete: bool,
    pub displayed: bool,
    pub width: Option<f64>,
    pub placement: Option<Placement>,
}

impl MockItem {
    pub fn new(height: f64) -> Self {
        Self {
            height,
            complete: false,
            displayed: true,
            width: None,
            placement: None,
        }
    }
}

pub struct MockImage {
    pub ready: bool,
    pub callback: Option<Box<dyn FnOnce()>>,
}

#[derive(Default)]
pub struct MockState {
    pub width: f64,
    pub items: Vec<MockItem>,
    pub images: Vec<MockImage>,
    pub container_height: Option<f64>,
    pub attached: bool,
    pub resize_handler: Option<Rc<dyn Fn()>>,
    pub binds: usize,
    pub releases: usize,
    /// Id of the binding that owns `resize_handler`
    pub active_binding: usize,
    pub fail_lookup: bool,
}

/// Cheap to clone; every clone sees the same state
#[derive(Clone, Default)]
pub struct MockSurface {
    pub state: Rc<RefCell<MockState>>,
}

impl MockSurface {
    pub fn new(width: f64, heights: &[f64]) -> Self {
        let surface = Self::default();
        {
            let mut state = surface.state.borrow_mut();
            state.width = width;
            state.items = heights.iter().map(|h| MockItem::new(*h)).collect();
        }
        surface
    }

    /// Add images; `ready` lists which ones have already loaded
    pub fn with_images(self, ready: &[bool]) -> Self {
        self.state.borrow_mut().images = ready
            .iter()
            .map(|ready| MockImage { ready: *ready, callback: None })
            .collect();
        self
    }

    pub fn set_width(&self, width: f64) {
        self.state.borrow_mut().width = width;
    }

    pub fn push_item(&self, height: f64) {
        self.state.borrow_mut().items.push(MockItem::new(height));
    }

    pub fn item(&self, index: usize) -> MockItem {
        self.state.borrow().items[index].clone()
    }

    pub fn items(&self) -> Vec<MockItem> {
        self.state.borrow().items.clone()
    }

    pub fn placement(&self, index: usize) -> Placement {
        self.item(index).placement.expect("element should be placed")
    }

    pub fn container_height(&self) -> Option<f64> {
        self.state.borrow().container_height
    }

    pub fn pending_image_callbacks(&self) -> usize {
        self.state.borrow().images.iter().filter(|image| image.callback.is_some()).count()
    }

    /// Settle an image and run its readiness callback, if one was registered
    pub fn load_image(&self, index: usize) {
        let callback = {
            let mut state = self.state.borrow_mut();
            state.images[index].ready = true;
            state.images[index].callback.take()
        };
        if let Some(callback) = callback {
            callback();
        }
    }

    /// Deliver a (debounced) resize, if a listener is bound
    pub fn resize(&self) -> bool {
        let handler = self.state.borrow().resize_handler.clone();
        match handler {
            Some(handler) => {
                handler();
                true
            }
            None => false,
        }
    }
}

pub struct MockBinding {
    state: Rc<RefCell<MockState>>,
    id: usize,
    released: bool,
}

impl ResizeBinding for MockBinding {
    fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        let mut state = self.state.borrow_mut();
        state.releases += 1;
        if state.active_binding == self.id {
            state.resize_handler = None;
        }
    }
}

impl Surface for MockSurface {
    type Item = usize;
    type Image = usize;

    fn container_width(&self) -> f64 {
        self.state.borrow().width
    }

    fn items(&self) -> Result<Vec<usize>, CollaboratorError> {
        let state = self.state.borrow();
        if state.fail_lookup {
            return Err(CollaboratorError::Lookup("lookup disabled".to_string()));
        }
        Ok((0..state.items.len()).collect())
    }

    fn metrics(&self, item: &usize) -> ItemMetrics {
        let state = self.state.borrow();
        let item = &state.items[*item];
        ItemMetrics {
            height: item.height,
            complete: item.complete,
            displayed: item.displayed,
        }
    }

    fn set_width(&self, item: &usize, width: f64) -> Result<(), CollaboratorError> {
        self.state.borrow_mut().items[*item].width = Some(width);
        Ok(())
    }

    fn place(&self, item: &usize, placement: &Placement) -> Result<(), CollaboratorError> {
        self.state.borrow_mut().items[*item].placement = Some(*placement);
        Ok(())
    }

    fn set_complete(&self, item: &usize, complete: bool) -> Result<(), CollaboratorError> {
        self.state.borrow_mut().items[*item].complete = complete;
        Ok(())
    }

    fn set_container_height(&self, height: f64) -> Result<(), CollaboratorError> {
        self.state.borrow_mut().container_height = Some(height);
        Ok(())
    }

    fn attach(&self) -> Result<(), CollaboratorError> {
        self.state.borrow_mut().attached = true;
        Ok(())
    }

    fn detach(&self) -> Result<(), CollaboratorError> {
        let mut state = self.state.borrow_mut();
        state.attached = false;
        state.container_height = None;
        for item in state.items.iter_mut() {
            item.complete = false;
            item.width = None;
            item.placement = None;
        }
        Ok(())
    }

    fn images(&self) -> Result<Vec<usize>, CollaboratorError> {
        Ok((0..self.state.borrow().images.len()).collect())
    }

    fn image_ready(&self, image: &usize) -> bool {
        self.state.borrow().images[*image].ready
    }

    fn on_image_ready(&self, image: &usize, ready: Box<dyn FnOnce()>) -> Result<(), CollaboratorError> {
        self.state.borrow_mut().images[*image].callback = Some(ready);
        Ok(())
    }

    fn bind_resize(
        &self,
        _delay_ms: u32,
        on_resize: Rc<dyn Fn()>,
    ) -> Result<Box<dyn ResizeBinding>, CollaboratorError> {
        let mut state = self.state.borrow_mut();
        state.binds += 1;
        state.active_binding = state.binds;
        state.resize_handler = Some(on_resize);
        Ok(Box::new(MockBinding {
            state: Rc::clone(&self.state),
            id: state.binds,
            released: false,
        }))
    }
}
