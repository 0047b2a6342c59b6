//! Test harness for sliders mounted on a simulated host element.

use std::collections::VecDeque;
use uislider::widgets::Slider;
use uislider::{
    Event, ManualScheduler, MouseButton, Point, PointerId, PointerType, ReactiveCell, Rect,
    SliderConfig, SliderHost, TouchId,
};

/// Bounds of the default host element: 234 pixels wide, offset by the
/// default body margin.
pub const DEFAULT_ELEMENT: Rect = Rect::new(8.0, 8.0, 234.0, 20.0);

/// Family of input events a gesture is made of.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFamily {
    /// touchstart / touchmove / touchend
    Touch,
    /// mousedown / mousemove / mouseup
    Mouse,
    /// pointerdown / pointermove / pointerup
    Pointer,
}

impl InputFamily {
    /// Every family.
    pub const ALL: [Self; 3] = [Self::Touch, Self::Mouse, Self::Pointer];

    /// Event beginning a gesture at `x`.
    pub fn start(self, x: f32) -> Event {
        let position = Point::new(x, 0.0);
        match self {
            Self::Touch => Event::TouchStart {
                id: TouchId(0),
                position,
            },
            Self::Mouse => Event::MouseDown {
                position,
                button: MouseButton::Left,
            },
            Self::Pointer => Event::PointerDown {
                pointer_id: PointerId(1),
                pointer_type: PointerType::Mouse,
                position,
                is_primary: true,
            },
        }
    }

    /// Event moving the gesture to `x`.
    pub fn moved(self, x: f32) -> Event {
        let position = Point::new(x, 0.0);
        match self {
            Self::Touch => Event::TouchMove {
                id: TouchId(0),
                position,
            },
            Self::Mouse => Event::MouseMove { position },
            Self::Pointer => Event::PointerMove {
                pointer_id: PointerId(1),
                pointer_type: PointerType::Mouse,
                position,
            },
        }
    }

    /// Event ending the gesture.
    pub fn end(self) -> Event {
        match self {
            Self::Touch => Event::TouchEnd {
                id: TouchId(0),
                position: Point::ORIGIN,
            },
            Self::Mouse => Event::MouseUp {
                position: Point::ORIGIN,
                button: MouseButton::Left,
            },
            Self::Pointer => Event::PointerUp {
                pointer_id: PointerId(1),
                pointer_type: PointerType::Mouse,
                position: Point::ORIGIN,
            },
        }
    }

    /// Move of a second finger or pointer that did not start the gesture.
    /// Mouse gestures get a stray touch, since there is only one mouse.
    pub fn other_moved(self, x: f32) -> Event {
        let position = Point::new(x, 0.0);
        match self {
            Self::Touch | Self::Mouse => Event::TouchMove {
                id: TouchId(1),
                position,
            },
            Self::Pointer => Event::PointerMove {
                pointer_id: PointerId(2),
                pointer_type: PointerType::Touch,
                position,
            },
        }
    }

    /// Release of a second finger or pointer that did not start the
    /// gesture.
    pub fn other_end(self) -> Event {
        match self {
            Self::Touch | Self::Mouse => Event::TouchEnd {
                id: TouchId(1),
                position: Point::ORIGIN,
            },
            Self::Pointer => Event::PointerUp {
                pointer_id: PointerId(2),
                pointer_type: PointerType::Touch,
                position: Point::ORIGIN,
            },
        }
    }
}

/// Slider mounted on a simulated host element.
pub struct SliderHarness {
    host: SliderHost<ManualScheduler>,
    family: InputFamily,
    model: Option<ReactiveCell<f64>>,
    event_queue: VecDeque<Event>,
    immediate_frames: bool,
    initial_thumb_left: f32,
}

impl SliderHarness {
    /// Mount a default slider (`0..=100`, continuous).
    pub fn new(family: InputFamily) -> Self {
        Self::with_config(family, SliderConfig::default())
    }

    /// Mount a slider configured from host element attributes, the way
    /// `<div min="-50" max="50">` would be read.
    pub fn from_attributes(family: InputFamily, attributes: &[(&str, &str)]) -> Self {
        let config = SliderConfig::default().apply_attributes(attributes.iter().copied());
        Self::with_config(family, config)
    }

    /// Mount a slider with an explicit configuration.
    pub fn with_config(family: InputFamily, config: SliderConfig) -> Self {
        Self::with_slider(family, Slider::from_config(config))
    }

    /// Mount a prepared slider on the default element.
    pub fn with_slider(family: InputFamily, slider: Slider) -> Self {
        let host = SliderHost::new(slider, DEFAULT_ELEMENT, ManualScheduler::new());
        let initial_thumb_left = host.rendered_thumb_rect().x.ceil();
        Self {
            host,
            family,
            model: None,
            event_queue: VecDeque::new(),
            immediate_frames: true,
            initial_thumb_left,
        }
    }

    /// Bind a model cell starting at `initial`.
    pub fn with_model(mut self, initial: f64) -> Self {
        let model = ReactiveCell::new(initial);
        self.host.bind(&model);
        self.model = Some(model);
        self
    }

    /// Keep requested frames pending until [`SliderHarness::run_frames`].
    pub fn defer_frames(mut self) -> Self {
        self.immediate_frames = false;
        self
    }

    // === Event Simulation ===

    /// Begin a gesture at page coordinate `x`.
    pub fn start(&mut self, x: f32) -> &mut Self {
        self.dispatch(self.family.start(x))
    }

    /// Move the gesture to page coordinate `x`.
    pub fn move_to(&mut self, x: f32) -> &mut Self {
        self.dispatch(self.family.moved(x))
    }

    /// End the gesture.
    pub fn end(&mut self) -> &mut Self {
        self.dispatch(self.family.end())
    }

    /// Move a second finger or pointer to page coordinate `x`.
    pub fn move_other_to(&mut self, x: f32) -> &mut Self {
        self.dispatch(self.family.other_moved(x))
    }

    /// Lift a second finger or pointer.
    pub fn end_other(&mut self) -> &mut Self {
        self.dispatch(self.family.other_end())
    }

    /// Start at `from`, move through each of `path`, then end.
    pub fn drag(&mut self, from: f32, path: &[f32]) -> &mut Self {
        let family = self.family;
        self.event_queue.push_back(family.start(from));
        self.event_queue.extend(path.iter().map(|x| family.moved(*x)));
        self.event_queue.push_back(family.end());
        self.process_events();
        self
    }

    /// Dispatch an arbitrary event.
    pub fn dispatch(&mut self, event: Event) -> &mut Self {
        self.event_queue.push_back(event);
        self.process_events();
        self
    }

    /// Write the model from outside and run a digest.
    ///
    /// # Panics
    ///
    /// Panics if no model is bound.
    pub fn set_model(&mut self, value: f64) -> &mut Self {
        self.model
            .as_ref()
            .expect("no model bound; use with_model")
            .set(value);
        self.host.digest();
        self.after_dispatch();
        self
    }

    /// Fire every pending frame. Returns how many wrote.
    pub fn run_frames(&mut self) -> usize {
        self.host.flush_frames()
    }

    /// Unmount the slider.
    pub fn unmount(&mut self) -> &mut Self {
        self.host.unmount();
        self
    }

    // === Queries ===

    /// Left edge of the host element.
    pub fn element_left(&self) -> f32 {
        self.host.bounds().x
    }

    /// Width of the host element.
    pub fn element_width(&self) -> f32 {
        self.host.bounds().width
    }

    /// Width of the thumb.
    pub fn thumb_width(&self) -> f32 {
        self.host.slider().get_thumb_width()
    }

    /// Written thumb left edge in page coordinates, rounded up.
    pub fn thumb_left(&self) -> f32 {
        self.host.rendered_thumb_rect().x.ceil()
    }

    /// Distance the written thumb moved from where it was mounted.
    pub fn thumb_offset(&self) -> f32 {
        self.thumb_left() - self.initial_thumb_left
    }

    /// Current model value, if a model is bound.
    pub fn model_value(&self) -> Option<f64> {
        self.model.as_ref().map(ReactiveCell::get)
    }

    /// Slider value.
    pub fn value(&self) -> f64 {
        self.host.slider().get_value()
    }

    /// Frames requested so far.
    pub fn frames_requested(&self) -> u64 {
        self.host.scheduler().requested()
    }

    /// Pending frames cancelled so far.
    pub fn frames_cancelled(&self) -> u64 {
        self.host.scheduler().cancelled()
    }

    /// The host under test.
    pub const fn host(&self) -> &SliderHost<ManualScheduler> {
        &self.host
    }

    /// Mutable access to the host under test.
    pub fn host_mut(&mut self) -> &mut SliderHost<ManualScheduler> {
        &mut self.host
    }

    // === Assertions ===

    /// Assert the thumb moved exactly `expected` pixels from its start.
    ///
    /// # Panics
    ///
    /// Panics if the offset differs.
    pub fn assert_thumb_offset(&self, expected: f32) -> &Self {
        let actual = self.thumb_offset();
        assert_eq!(
            actual, expected,
            "Expected thumb offset {expected} but got {actual}"
        );
        self
    }

    /// Assert the thumb offset lies within `[low, high]`.
    ///
    /// # Panics
    ///
    /// Panics if the offset is outside the range.
    pub fn assert_thumb_offset_between(&self, low: f32, high: f32) -> &Self {
        let actual = self.thumb_offset();
        assert!(
            (low..=high).contains(&actual),
            "Expected thumb offset within [{low}, {high}] but got {actual}"
        );
        self
    }

    /// Assert a drag is in progress.
    ///
    /// # Panics
    ///
    /// Panics if no drag is active.
    pub fn assert_dragging(&self) -> &Self {
        assert!(
            self.host.slider().gesture().is_active(),
            "Expected a drag in progress"
        );
        self
    }

    /// Assert at least one frame was requested.
    ///
    /// # Panics
    ///
    /// Panics if no frame was requested.
    pub fn assert_frame_requested(&self) -> &Self {
        assert!(
            self.frames_requested() > 0,
            "Expected an animation frame to be requested"
        );
        self
    }

    /// Assert no frame was ever requested.
    ///
    /// # Panics
    ///
    /// Panics if a frame was requested.
    pub fn assert_no_frame_requested(&self) -> &Self {
        let requested = self.frames_requested();
        assert_eq!(
            requested, 0,
            "Expected no animation frame but {requested} were requested"
        );
        self
    }

    /// Assert the bound model holds `expected`.
    ///
    /// # Panics
    ///
    /// Panics if no model is bound or it holds another value.
    pub fn assert_model(&self, expected: f64) -> &Self {
        let actual = self.model_value().expect("no model bound; use with_model");
        assert_eq!(actual, expected, "Expected model {expected} but got {actual}");
        self
    }

    /// Assert the bound model lies within `[low, high]`.
    ///
    /// # Panics
    ///
    /// Panics if no model is bound or it is outside the range.
    pub fn assert_model_between(&self, low: f64, high: f64) -> &Self {
        let actual = self.model_value().expect("no model bound; use with_model");
        assert!(
            (low..=high).contains(&actual),
            "Expected model within [{low}, {high}] but got {actual}"
        );
        self
    }

    // === Internal ===

    fn process_events(&mut self) {
        while let Some(event) = self.event_queue.pop_front() {
            let consumed = self.host.handle_event(&event);
            tracing::trace!(?event, consumed, "harness dispatch");
            self.after_dispatch();
        }
    }

    fn after_dispatch(&mut self) {
        if self.immediate_frames {
            self.host.flush_frames();
        }
    }
}
