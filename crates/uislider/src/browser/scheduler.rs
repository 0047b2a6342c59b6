//! `requestAnimationFrame` as a [`FrameScheduler`].

use std::cell::RefCell;
use std::rc::Rc;
use uislider_core::{FrameError, FrameHandle, FrameScheduler};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::Window;

/// Slot holding the frame callback.
///
/// The callback needs the host that owns the scheduler, so it is installed
/// after the scheduler is built.
pub type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

/// Schedules frames on the browser window.
pub struct RafScheduler {
    window: Window,
    callback: FrameCallback,
}

impl RafScheduler {
    /// Create a scheduler calling whatever `callback` holds on each frame.
    pub fn new(window: Window, callback: FrameCallback) -> Self {
        Self { window, callback }
    }
}

impl FrameScheduler for RafScheduler {
    fn request_frame(&mut self) -> Result<FrameHandle, FrameError> {
        let slot = self.callback.borrow();
        let callback = slot.as_ref().ok_or(FrameError::Unavailable)?;
        self.window
            .request_animation_frame(callback.as_ref().unchecked_ref())
            .map(FrameHandle)
            .map_err(|e| FrameError::Request(format!("{e:?}")))
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if let Err(err) = self.window.cancel_animation_frame(handle.0) {
            tracing::warn!(?err, frame = handle.0, "cancelAnimationFrame failed");
        }
    }
}
