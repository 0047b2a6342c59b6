//! Platform-neutral slider host.
//!
//! A [`SliderHost`] stands in for the host element: it owns the element's
//! bounds, routes gesture events to the [`Slider`], pushes value changes to
//! the bound model, pulls external model changes during [`SliderHost::digest`]
//! and writes the thumb position at most once per animation frame.

use serde::{Deserialize, Serialize};
use uislider_core::{
    Canvas, DrawCommand, Event, FrameHandle, FrameScheduler, GesturePhase, ManualScheduler,
    ReactiveCell, Rect, RecordingCanvas, RenderQueue, TwoWayBinding, Widget,
};
use uislider_widgets::{Geometry, Slider, SliderChanged};

/// Listener for value changes made by the user.
type ChangeListener = Box<dyn FnMut(SliderChanged)>;

/// Thumb state as last written to the host element.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RenderedThumb {
    /// Offset from the track's left edge, in pixels
    pub offset: f32,
    /// Value displayed
    pub value: f64,
}

/// Observable state of a mounted slider.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HostSnapshot {
    /// Current (possibly unwritten) value
    pub value: f64,
    /// Thumb as last written
    pub rendered: RenderedThumb,
    /// Whether a drag is in progress
    pub dragging: bool,
    /// Whether the range is empty
    pub inert: bool,
    /// Whether a frame is pending
    pub frame_pending: bool,
}

/// Slider bound to a host element, a model and a frame source.
pub struct SliderHost<S: FrameScheduler> {
    slider: Slider,
    bounds: Rect,
    binding: Option<TwoWayBinding<f64>>,
    listeners: Vec<ChangeListener>,
    scheduler: S,
    render: RenderQueue,
    rendered: RenderedThumb,
    frame: Vec<DrawCommand>,
    mounted: bool,
}

impl<S: FrameScheduler> SliderHost<S> {
    /// Mount a slider on a host element occupying `bounds`.
    ///
    /// The initial thumb position is written synchronously; no frame is
    /// requested until something changes.
    pub fn new(slider: Slider, bounds: Rect, scheduler: S) -> Self {
        let mut host = Self {
            slider,
            bounds,
            binding: None,
            listeners: Vec::new(),
            scheduler,
            render: RenderQueue::new(),
            rendered: RenderedThumb::default(),
            frame: Vec::new(),
            mounted: true,
        };
        host.slider.layout(bounds);
        host.write();
        host
    }

    /// Bind the slider's value to a model cell.
    ///
    /// The model's current value is reflected into the slider immediately.
    pub fn bind(&mut self, model: &ReactiveCell<f64>) {
        let binding = TwoWayBinding::attach(model);
        let current = binding.current();
        self.binding = Some(binding);
        self.slider.set_value_external(current, self.bounds.width);
        self.write();
    }

    /// Register a listener for user-driven value changes.
    pub fn on_change(&mut self, listener: impl FnMut(SliderChanged) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Route an input event. Returns `true` when the event was consumed.
    ///
    /// While a drag is active, events from any source other than the one
    /// that started it are not consumed.
    pub fn handle_event(&mut self, event: &Event) -> bool {
        if !self.mounted {
            return false;
        }
        if let Event::Resize { width, height } = *event {
            self.set_bounds(Rect::new(self.bounds.x, self.bounds.y, width, height));
            return true;
        }
        let Some(input) = event.gesture() else {
            return false;
        };
        if !self.slider.gesture().accepts(input.owner) {
            tracing::trace!(owner = ?input.owner, "input from a non-owning source ignored");
            return false;
        }
        match (input.phase, input.position) {
            (GesturePhase::Start, Some(position)) => {
                let geometry =
                    Geometry::from_bounds(self.bounds, self.slider.get_thumb_width());
                let changed = self.slider.gesture_start(input.owner, position.x, geometry);
                self.publish(changed);
                self.invalidate();
                true
            }
            (GesturePhase::Move, Some(position)) => {
                if !self.slider.gesture().is_active() {
                    return false;
                }
                let changed = self.slider.gesture_move(input.owner, position.x);
                self.publish(changed);
                self.invalidate();
                true
            }
            (GesturePhase::End, _) => self.slider.gesture_end(input.owner),
            _ => false,
        }
    }

    /// Apply a value written to the model from outside.
    ///
    /// Nothing is pushed back to the model.
    pub fn set_value(&mut self, value: f64) {
        if !self.mounted {
            return;
        }
        self.slider.set_value_external(value, self.bounds.width);
        self.invalidate();
    }

    /// Pull a pending external model change, if any. Returns whether one
    /// was applied.
    pub fn digest(&mut self) -> bool {
        let external = self.binding.as_ref().and_then(TwoWayBinding::take_external);
        match external {
            Some(value) => {
                self.set_value(value);
                true
            }
            None => false,
        }
    }

    /// The host element moved or was resized.
    pub fn set_bounds(&mut self, bounds: Rect) {
        self.bounds = bounds;
        self.slider.layout(bounds);
        if self.mounted {
            self.invalidate();
        }
    }

    /// Replace the slider's range and step (attribute change).
    pub fn set_config(&mut self, config: uislider_core::SliderConfig) {
        let changed = self.slider.set_config(config);
        self.publish(changed);
        if self.mounted {
            self.invalidate();
        }
    }

    /// Run a fired frame. Returns the written thumb state when the frame
    /// carried a write.
    pub fn animation_frame(&mut self, handle: FrameHandle) -> Option<RenderedThumb> {
        if self.render.on_frame(handle) {
            Some(self.write())
        } else {
            None
        }
    }

    /// Run the currently pending frame, whatever its handle.
    ///
    /// Platform callbacks that do not report their handle use this.
    pub fn pending_animation_frame(&mut self) -> Option<RenderedThumb> {
        let handle = self.render.pending()?;
        self.animation_frame(handle)
    }

    /// Cancel the pending frame and detach from the model.
    pub fn unmount(&mut self) {
        self.render.cancel(&mut self.scheduler);
        self.slider.cancel_gesture();
        self.binding = None;
        self.listeners.clear();
        self.mounted = false;
        tracing::debug!("slider unmounted");
    }

    /// The widget.
    pub const fn slider(&self) -> &Slider {
        &self.slider
    }

    /// Host element bounds.
    pub const fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Thumb state as last written.
    pub const fn rendered(&self) -> RenderedThumb {
        self.rendered
    }

    /// Thumb rectangle as last written, in page coordinates.
    pub fn rendered_thumb_rect(&self) -> Rect {
        Rect::new(
            self.bounds.x + self.rendered.offset,
            self.bounds.y,
            self.slider.get_thumb_width(),
            self.bounds.height,
        )
    }

    /// Snapshot of the observable state.
    pub fn snapshot(&self) -> HostSnapshot {
        HostSnapshot {
            value: self.slider.get_value(),
            rendered: self.rendered,
            dragging: self.slider.gesture().is_active(),
            inert: self.slider.is_inert(),
            frame_pending: self.has_pending_frame(),
        }
    }

    /// Draw commands of the last write.
    pub fn frame_commands(&self) -> &[DrawCommand] {
        &self.frame
    }

    /// Paint the current (possibly unwritten) state.
    pub fn paint(&self, canvas: &mut dyn Canvas) {
        self.slider.paint(canvas);
    }

    /// Number of writes to the host element since mounting, excluding the
    /// initial one.
    pub const fn writes(&self) -> u64 {
        self.render.writes()
    }

    /// Whether a frame is pending.
    pub const fn has_pending_frame(&self) -> bool {
        self.render.pending().is_some()
    }

    /// Whether the host is still mounted.
    pub const fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// The frame source.
    pub const fn scheduler(&self) -> &S {
        &self.scheduler
    }

    /// Mutable access to the frame source.
    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    fn publish(&mut self, changed: Option<SliderChanged>) {
        let Some(changed) = changed else {
            return;
        };
        if let Some(binding) = &self.binding {
            binding.push(changed.value);
        }
        for listener in &mut self.listeners {
            listener(changed);
        }
    }

    fn invalidate(&mut self) {
        if let Err(err) = self.render.invalidate(&mut self.scheduler) {
            tracing::warn!(%err, "no animation frame; writing thumb synchronously");
            if self.render.take_dirty() {
                self.write();
            }
        }
    }

    fn write(&mut self) -> RenderedThumb {
        self.rendered = RenderedThumb {
            offset: self.slider.thumb_offset(),
            value: self.slider.get_value(),
        };
        let mut canvas = RecordingCanvas::new();
        self.slider.paint(&mut canvas);
        self.frame = canvas.take_commands();
        tracing::trace!(offset = self.rendered.offset, value = self.rendered.value, "thumb written");
        self.rendered
    }
}

impl SliderHost<ManualScheduler> {
    /// Fire every frame the scheduler has due. Returns the number of
    /// frames that carried a write.
    pub fn flush_frames(&mut self) -> usize {
        let due = self.scheduler.take_due();
        due.into_iter()
            .filter_map(|handle| self.animation_frame(handle))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;
    use uislider_core::{MouseButton, Point, PointerId, PointerType, SliderConfig, TouchId};

    const BOUNDS: Rect = Rect::new(8.0, 8.0, 234.0, 20.0);

    fn host(slider: Slider) -> SliderHost<ManualScheduler> {
        SliderHost::new(slider, BOUNDS, ManualScheduler::new())
    }

    fn down(x: f32) -> Event {
        Event::MouseDown {
            position: Point::new(x, 0.0),
            button: MouseButton::Left,
        }
    }

    fn mv(x: f32) -> Event {
        Event::MouseMove {
            position: Point::new(x, 0.0),
        }
    }

    fn up() -> Event {
        Event::MouseUp {
            position: Point::ORIGIN,
            button: MouseButton::Left,
        }
    }

    // =========================================================================
    // Mounting
    // =========================================================================

    #[test]
    fn test_mount_writes_without_frame() {
        let host = host(Slider::new());
        assert_eq!(host.rendered().offset, 0.0);
        assert_eq!(host.scheduler().requested(), 0);
        assert!(!host.frame_commands().is_empty());
        assert_eq!(host.rendered_thumb_rect().x, BOUNDS.x);
    }

    // =========================================================================
    // Frames
    // =========================================================================

    #[test]
    fn test_render_deferred_to_frame() {
        let mut host = host(Slider::new());
        host.handle_event(&down(BOUNDS.x + 117.0));
        assert_eq!(host.rendered().offset, 0.0);
        assert!(host.has_pending_frame());

        assert_eq!(host.flush_frames(), 1);
        assert_eq!(host.rendered().offset, 117.0);
        assert_eq!(host.rendered().value, 50.0);
    }

    #[test]
    fn test_moves_within_frame_coalesce() {
        let mut host = host(Slider::new());
        host.handle_event(&down(BOUNDS.x));
        for x in [10.0, 20.0, 30.0, 40.0] {
            host.handle_event(&mv(BOUNDS.x + x));
        }
        assert_eq!(host.scheduler().requested(), 1);
        assert_eq!(host.flush_frames(), 1);
        assert_eq!(host.writes(), 1);
        assert_eq!(host.rendered().offset, 40.0);
    }

    #[test]
    fn test_move_before_start_requests_nothing() {
        let mut host = host(Slider::new());
        assert!(!host.handle_event(&mv(100.0)));
        assert!(!host.handle_event(&up()));
        assert_eq!(host.scheduler().requested(), 0);
    }

    #[test]
    fn test_unavailable_frames_write_synchronously() {
        let mut host = SliderHost::new(Slider::new(), BOUNDS, ManualScheduler::unavailable());
        host.handle_event(&down(BOUNDS.right()));
        assert_eq!(host.rendered().offset, 234.0);
        assert_eq!(host.writes(), 1);
    }

    #[test]
    fn test_unmount_cancels_pending_frame() {
        let mut host = host(Slider::new());
        host.handle_event(&down(BOUNDS.right()));
        host.unmount();
        assert_eq!(host.scheduler().cancelled(), 1);
        assert_eq!(host.flush_frames(), 0);
        assert_eq!(host.rendered().offset, 0.0);
        assert!(!host.handle_event(&down(BOUNDS.x)));
        assert!(!host.is_mounted());
    }

    // =========================================================================
    // Model binding
    // =========================================================================

    #[test]
    fn test_gesture_pushes_to_model() {
        let model = ReactiveCell::new(0.0);
        let mut host = host(Slider::new());
        host.bind(&model);

        host.handle_event(&down(BOUNDS.right()));
        host.handle_event(&up());
        assert_eq!(model.get(), 100.0);
        assert!(!host.digest());
    }

    #[test]
    fn test_external_model_change_moves_thumb() {
        let model = ReactiveCell::new(0.0);
        let mut host = host(Slider::new());
        host.bind(&model);

        model.set(50.0);
        assert!(host.digest());
        host.flush_frames();
        assert_eq!(host.rendered().offset, 117.0);
        assert_eq!(host.slider().get_value(), 50.0);
        assert_eq!(model.get(), 50.0);
    }

    #[test]
    fn test_external_value_is_clamped_not_echoed() {
        let model = ReactiveCell::new(0.0);
        let pushes = Rc::new(RefCell::new(0));
        let mut host = host(Slider::new());
        host.bind(&model);
        let p = Rc::clone(&pushes);
        host.on_change(move |_| *p.borrow_mut() += 1);

        model.set(500.0);
        host.digest();
        host.flush_frames();
        assert_eq!(host.slider().get_value(), 100.0);
        assert_eq!(host.rendered().offset, 234.0);
        assert_eq!(*pushes.borrow(), 0);
        // The model keeps what was written to it.
        assert_eq!(model.get(), 500.0);
    }

    #[test]
    fn test_bind_reflects_initial_model_value() {
        let model = ReactiveCell::new(25.0);
        let mut host = host(Slider::new());
        host.bind(&model);
        assert_eq!(host.rendered().offset, 58.5);
        assert_eq!(host.scheduler().requested(), 0);
    }

    #[test]
    fn test_listeners_see_changes() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut host = host(Slider::new().step(25.0));
        let s = Rc::clone(&seen);
        host.on_change(move |c| s.borrow_mut().push(c.value));

        host.handle_event(&Event::TouchStart {
            id: TouchId(0),
            position: Point::new(BOUNDS.x, 0.0),
        });
        host.handle_event(&Event::TouchMove {
            id: TouchId(0),
            position: Point::new(BOUNDS.x + 117.0, 0.0),
        });
        host.handle_event(&Event::TouchMove {
            id: TouchId(0),
            position: Point::new(BOUNDS.x + 120.0, 0.0),
        });
        assert_eq!(*seen.borrow(), vec![50.0]);
    }

    // =========================================================================
    // Gesture ownership
    // =========================================================================

    fn touch_start(id: u32, x: f32) -> Event {
        Event::TouchStart {
            id: TouchId(id),
            position: Point::new(x, 0.0),
        }
    }

    fn touch_move(id: u32, x: f32) -> Event {
        Event::TouchMove {
            id: TouchId(id),
            position: Point::new(x, 0.0),
        }
    }

    #[test]
    fn test_second_finger_lifting_keeps_drag() {
        let mut host = host(Slider::new());
        host.handle_event(&touch_start(0, BOUNDS.x));
        assert!(!host.handle_event(&Event::TouchEnd {
            id: TouchId(1),
            position: Point::ORIGIN,
        }));
        assert!(host.snapshot().dragging);

        assert!(host.handle_event(&touch_move(0, BOUNDS.x + 117.0)));
        host.flush_frames();
        assert_eq!(host.rendered().value, 50.0);
    }

    #[test]
    fn test_second_finger_moving_is_ignored() {
        let model = ReactiveCell::new(0.0);
        let mut host = host(Slider::new());
        host.bind(&model);
        host.handle_event(&touch_start(0, BOUNDS.x));
        assert!(!host.handle_event(&touch_move(1, BOUNDS.right())));
        assert!(!host.handle_event(&touch_start(1, BOUNDS.right())));
        assert_eq!(model.get(), 0.0);
        assert_eq!(host.slider().get_value(), 0.0);

        assert!(host.handle_event(&Event::TouchCancel { id: TouchId(0) }));
        assert!(!host.snapshot().dragging);
    }

    #[test]
    fn test_other_pointer_up_is_ignored() {
        let mut host = host(Slider::new());
        host.handle_event(&Event::PointerDown {
            pointer_id: PointerId(1),
            pointer_type: PointerType::Touch,
            position: Point::new(BOUNDS.x, 0.0),
            is_primary: true,
        });
        assert!(!host.handle_event(&Event::PointerUp {
            pointer_id: PointerId(2),
            pointer_type: PointerType::Touch,
            position: Point::ORIGIN,
        }));
        // The mouse is a different source too.
        assert!(!host.handle_event(&up()));
        assert!(host.snapshot().dragging);

        assert!(host.handle_event(&Event::PointerUp {
            pointer_id: PointerId(1),
            pointer_type: PointerType::Touch,
            position: Point::ORIGIN,
        }));
        assert!(!host.snapshot().dragging);
    }

    // =========================================================================
    // Layout and configuration
    // =========================================================================

    #[test]
    fn test_resize_repositions_thumb() {
        let mut host = host(Slider::new().value(50.0));
        host.handle_event(&Event::Resize {
            width: 100.0,
            height: 20.0,
        });
        host.flush_frames();
        assert_eq!(host.rendered().offset, 50.0);
        assert_eq!(host.bounds().width, 100.0);
    }

    #[test]
    fn test_snapshot_serializes() {
        let mut host = host(Slider::new());
        host.handle_event(&down(BOUNDS.x + 117.0));
        let snapshot = host.snapshot();
        assert!(snapshot.dragging);
        assert!(snapshot.frame_pending);
        assert_eq!(snapshot.value, 50.0);
        assert_eq!(snapshot.rendered.offset, 0.0);

        let json = serde_json::to_string(&snapshot).unwrap();
        let back: HostSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snapshot);
    }

    #[test]
    fn test_set_config_to_inert_pins_thumb() {
        let model = ReactiveCell::new(0.0);
        let mut host = host(Slider::new().value(40.0));
        host.bind(&model);
        host.set_value(40.0);
        host.set_config(SliderConfig::new(10.0, 0.0));
        host.flush_frames();
        assert_eq!(host.rendered().offset, 0.0);
        assert_eq!(model.get(), 10.0);
    }

    // =========================================================================
    // Properties
    // =========================================================================

    #[cfg(not(target_arch = "wasm32"))]
    mod props {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn prop_one_write_per_frame(xs in proptest::collection::vec(-100.0f32..400.0, 1..40)) {
                let model = ReactiveCell::new(0.0);
                let mut host = host(Slider::new().min(-50.0).max(50.0));
                host.bind(&model);
                host.handle_event(&down(xs[0]));
                for x in &xs[1..] {
                    host.handle_event(&mv(*x));
                }
                prop_assert_eq!(host.scheduler().requested(), 1);
                prop_assert_eq!(host.flush_frames(), 1);

                let rendered = host.rendered();
                prop_assert!((0.0..=BOUNDS.width).contains(&rendered.offset));
                prop_assert!((-50.0..=50.0).contains(&model.get()));
                prop_assert_eq!(rendered.value, host.slider().get_value());
            }
        }
    }
}
