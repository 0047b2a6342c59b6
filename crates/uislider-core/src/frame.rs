//! Animation-frame scheduling and render coalescing.
//!
//! Widgets never write to the host element directly from an event handler.
//! They mark themselves dirty on a [`RenderQueue`], which asks a
//! [`FrameScheduler`] for at most one frame at a time. When the frame fires,
//! the latest state is written once, however many updates happened in
//! between.

use thiserror::Error;

/// Identifier of a requested frame (the value `requestAnimationFrame`
/// returns in a browser).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub i32);

/// Errors from frame schedulers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FrameError {
    /// No frame source is available (no window, detached host).
    #[error("animation frames are unavailable")]
    Unavailable,
    /// The platform rejected the request.
    #[error("frame request failed: {0}")]
    Request(String),
}

/// Source of animation frames.
pub trait FrameScheduler {
    /// Request a callback on the next frame.
    fn request_frame(&mut self) -> Result<FrameHandle, FrameError>;

    /// Cancel a previously requested frame. Unknown handles are ignored.
    fn cancel_frame(&mut self, handle: FrameHandle);
}

impl<S: FrameScheduler + ?Sized> FrameScheduler for Box<S> {
    fn request_frame(&mut self) -> Result<FrameHandle, FrameError> {
        (**self).request_frame()
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        (**self).cancel_frame(handle);
    }
}

/// Coalesces invalidations into at most one pending frame.
#[derive(Debug, Default)]
pub struct RenderQueue {
    pending: Option<FrameHandle>,
    dirty: bool,
    writes: u64,
}

impl RenderQueue {
    /// Create an idle queue.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            pending: None,
            dirty: false,
            writes: 0,
        }
    }

    /// Mark the widget dirty, requesting a frame if none is pending.
    ///
    /// Returns `Ok(true)` when a new frame was requested and `Ok(false)` when
    /// the update joined an already pending frame.
    ///
    /// # Errors
    ///
    /// Propagates the scheduler's error; the queue stays dirty so the caller
    /// can flush synchronously.
    pub fn invalidate<S: FrameScheduler + ?Sized>(
        &mut self,
        scheduler: &mut S,
    ) -> Result<bool, FrameError> {
        self.dirty = true;
        if self.pending.is_some() {
            return Ok(false);
        }
        let handle = scheduler.request_frame()?;
        tracing::trace!(frame = handle.0, "render frame requested");
        self.pending = Some(handle);
        Ok(true)
    }

    /// Consume a fired frame. Returns `true` when a write is due.
    ///
    /// Frames that are not the pending one (stale or cancelled) are ignored.
    pub fn on_frame(&mut self, handle: FrameHandle) -> bool {
        if self.pending != Some(handle) {
            return false;
        }
        self.pending = None;
        self.take_dirty()
    }

    /// Clear the dirty flag outside of a frame (synchronous fallback).
    pub fn take_dirty(&mut self) -> bool {
        let due = std::mem::take(&mut self.dirty);
        if due {
            self.writes += 1;
        }
        due
    }

    /// Cancel the pending frame, if any, and drop the dirty state.
    pub fn cancel<S: FrameScheduler + ?Sized>(&mut self, scheduler: &mut S) {
        if let Some(handle) = self.pending.take() {
            scheduler.cancel_frame(handle);
            tracing::trace!(frame = handle.0, "render frame cancelled");
        }
        self.dirty = false;
    }

    /// The frame currently awaited.
    #[must_use]
    pub const fn pending(&self) -> Option<FrameHandle> {
        self.pending
    }

    /// Whether state changed since the last write.
    #[must_use]
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Number of writes performed so far.
    #[must_use]
    pub const fn writes(&self) -> u64 {
        self.writes
    }
}

/// A scheduler driven by hand: frames fire when the owner says so.
///
/// Used by native hosts and tests in place of `requestAnimationFrame`.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    next: i32,
    due: Vec<FrameHandle>,
    requested: u64,
    cancelled: u64,
    unavailable: bool,
}

impl ManualScheduler {
    /// Create a scheduler with frames available.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a scheduler whose requests always fail.
    #[must_use]
    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::default()
        }
    }

    /// Take every frame requested and not cancelled so far.
    pub fn take_due(&mut self) -> Vec<FrameHandle> {
        std::mem::take(&mut self.due)
    }

    /// Total number of successful requests.
    #[must_use]
    pub const fn requested(&self) -> u64 {
        self.requested
    }

    /// Total number of cancellations of outstanding frames.
    #[must_use]
    pub const fn cancelled(&self) -> u64 {
        self.cancelled
    }

    /// Frames requested and not yet fired.
    #[must_use]
    pub fn outstanding(&self) -> usize {
        self.due.len()
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&mut self) -> Result<FrameHandle, FrameError> {
        if self.unavailable {
            return Err(FrameError::Unavailable);
        }
        self.next += 1;
        self.requested += 1;
        let handle = FrameHandle(self.next);
        self.due.push(handle);
        Ok(handle)
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        let before = self.due.len();
        self.due.retain(|h| *h != handle);
        if self.due.len() != before {
            self.cancelled += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalidate_requests_one_frame() {
        let mut scheduler = ManualScheduler::new();
        let mut queue = RenderQueue::new();

        assert_eq!(queue.invalidate(&mut scheduler), Ok(true));
        assert_eq!(queue.invalidate(&mut scheduler), Ok(false));
        assert_eq!(queue.invalidate(&mut scheduler), Ok(false));

        assert_eq!(scheduler.requested(), 1);
        assert!(queue.is_dirty());
    }

    #[test]
    fn test_frame_coalesces_to_single_write() {
        let mut scheduler = ManualScheduler::new();
        let mut queue = RenderQueue::new();
        queue.invalidate(&mut scheduler).unwrap();
        queue.invalidate(&mut scheduler).unwrap();

        let due = scheduler.take_due();
        assert_eq!(due.len(), 1);
        assert!(queue.on_frame(due[0]));
        assert!(!queue.on_frame(due[0]));
        assert_eq!(queue.writes(), 1);
        assert!(queue.pending().is_none());
    }

    #[test]
    fn test_new_frame_after_write() {
        let mut scheduler = ManualScheduler::new();
        let mut queue = RenderQueue::new();
        queue.invalidate(&mut scheduler).unwrap();
        let first = scheduler.take_due()[0];
        queue.on_frame(first);

        assert_eq!(queue.invalidate(&mut scheduler), Ok(true));
        assert_eq!(scheduler.requested(), 2);
    }

    #[test]
    fn test_cancel_drops_pending_frame() {
        let mut scheduler = ManualScheduler::new();
        let mut queue = RenderQueue::new();
        queue.invalidate(&mut scheduler).unwrap();
        let handle = queue.pending().unwrap();

        queue.cancel(&mut scheduler);
        assert_eq!(scheduler.cancelled(), 1);
        assert_eq!(scheduler.outstanding(), 0);
        assert!(!queue.is_dirty());
        assert!(!queue.on_frame(handle));
    }

    #[test]
    fn test_unavailable_scheduler_keeps_queue_dirty() {
        let mut scheduler = ManualScheduler::unavailable();
        let mut queue = RenderQueue::new();
        assert_eq!(
            queue.invalidate(&mut scheduler),
            Err(FrameError::Unavailable)
        );
        assert!(queue.is_dirty());
        assert!(queue.pending().is_none());
        assert!(queue.take_dirty());
        assert_eq!(queue.writes(), 1);
    }

    #[test]
    fn test_boxed_scheduler() {
        let mut scheduler: Box<dyn FrameScheduler> = Box::new(ManualScheduler::new());
        let mut queue = RenderQueue::new();
        assert_eq!(queue.invalidate(&mut scheduler), Ok(true));
    }
}
