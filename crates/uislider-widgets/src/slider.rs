//! Slider widget for value selection.
//!
//! The thumb's left edge travels from the track's left edge (value `min`)
//! to its right edge (value `max`). A drag is a start, any number of moves
//! and an end; the track is measured once at start and that snapshot is
//! reused for every move of the drag. A drag belongs to the mouse, touch or
//! pointer that started it, and input from any other source is ignored
//! until it ends.

use serde::{Deserialize, Serialize};
use std::any::Any;
use uislider_core::{
    widget::{AccessibleRole, LayoutResult},
    Canvas, Color, Event, GestureOwner, GesturePhase, Rect, SliderConfig, Widget,
};

/// Slack when flooring onto the step grid, so that 2.9999999 steps count
/// as 3.
const STEP_EPSILON: f64 = 1e-9;

/// Message emitted when slider value changes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SliderChanged {
    /// The new value
    pub value: f64,
}

/// Track measurements taken when a drag starts.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Geometry {
    /// Page X of the track's left edge
    pub track_left: f32,
    /// Track width in pixels
    pub track_width: f32,
    /// Thumb width in pixels
    pub thumb_width: f32,
}

impl Geometry {
    /// Create a snapshot.
    #[must_use]
    pub fn new(track_left: f32, track_width: f32, thumb_width: f32) -> Self {
        Self {
            track_left,
            track_width: track_width.max(0.0),
            thumb_width: thumb_width.max(0.0),
        }
    }

    /// Snapshot of a laid-out host element.
    #[must_use]
    pub fn from_bounds(bounds: Rect, thumb_width: f32) -> Self {
        Self::new(bounds.x, bounds.width, thumb_width)
    }

    /// Pointer X converted to a thumb offset within `[0, track_width]`.
    #[must_use]
    pub fn offset_at(&self, pointer_x: f32) -> f32 {
        (pointer_x - self.track_left).clamp(0.0, self.track_width)
    }

    /// Fraction of the track covered by `offset`, in `[0, 1]`.
    #[must_use]
    pub fn ratio_of(&self, offset: f32) -> f64 {
        if self.track_width > 0.0 {
            (f64::from(offset) / f64::from(self.track_width)).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

/// Whether a drag is in progress.
///
/// The geometry snapshot and owner live exactly as long as the drag.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum GestureState {
    /// No drag; moves are ignored
    #[default]
    Inactive,
    /// Dragging with the track measured at start
    Active {
        /// Track snapshot
        geometry: Geometry,
        /// Source that started the drag
        owner: GestureOwner,
    },
}

impl GestureState {
    /// Whether a drag is in progress.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        matches!(self, Self::Active { .. })
    }

    /// Source driving the current drag.
    #[must_use]
    pub const fn owner(&self) -> Option<GestureOwner> {
        match *self {
            Self::Active { owner, .. } => Some(owner),
            Self::Inactive => None,
        }
    }

    /// Whether input from `source` may act on this state. Anything may start
    /// a drag when idle; once active only the owner is heard.
    #[must_use]
    pub fn accepts(&self, source: GestureOwner) -> bool {
        self.owner().map_or(true, |owner| owner == source)
    }
}

/// ARIA range values mirrored onto the host element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AriaValues {
    /// `aria-valuemin`
    pub min: f64,
    /// `aria-valuemax`
    pub max: f64,
    /// `aria-valuenow`
    pub now: f64,
}

/// Slider widget for selecting a value from a range.
#[derive(Serialize, Deserialize)]
pub struct Slider {
    /// Range and step
    config: SliderConfig,
    /// Current value
    value: f64,
    /// Thumb offset from the track's left edge, in pixels
    offset: f32,
    /// Thumb width
    thumb_width: f32,
    /// Track height
    track_height: f32,
    /// Track color
    track_color: Color,
    /// Active track color
    active_color: Color,
    /// Thumb color
    thumb_color: Color,
    /// Test ID
    test_id_value: Option<String>,
    /// Accessible name
    accessible_name_value: Option<String>,
    /// Cached bounds
    #[serde(skip)]
    bounds: Rect,
    /// Drag state
    #[serde(skip)]
    gesture: GestureState,
}

impl Default for Slider {
    fn default() -> Self {
        Self::new()
    }
}

impl Slider {
    /// Create a slider over the default range.
    #[must_use]
    pub fn new() -> Self {
        Self::from_config(SliderConfig::default())
    }

    /// Create a slider from a configuration.
    #[must_use]
    pub fn from_config(config: SliderConfig) -> Self {
        if config.is_inert() {
            tracing::warn!(min = config.min, max = config.max, "slider range is empty; thumb is fixed");
        }
        Self {
            value: config.initial_value(),
            config,
            offset: 0.0,
            thumb_width: 20.0,
            track_height: 4.0,
            track_color: Color::new(0.8, 0.8, 0.8, 1.0),
            active_color: Color::new(0.2, 0.6, 1.0, 1.0),
            thumb_color: Color::WHITE,
            test_id_value: None,
            accessible_name_value: None,
            bounds: Rect::default(),
            gesture: GestureState::Inactive,
        }
    }

    /// Set the current value.
    #[must_use]
    pub fn value(mut self, value: f64) -> Self {
        self.config.value = Some(value);
        self.value = self.config.initial_value();
        self
    }

    /// Set the minimum value.
    #[must_use]
    pub fn min(mut self, min: f64) -> Self {
        self.config.min = min;
        self.value = self.config.initial_value();
        self
    }

    /// Set the maximum value.
    #[must_use]
    pub fn max(mut self, max: f64) -> Self {
        self.config.max = max;
        self.value = self.config.initial_value();
        self
    }

    /// Set the step increment (0.0 = continuous).
    #[must_use]
    pub fn step(mut self, step: f64) -> Self {
        self.config = self.config.with_step(step);
        self
    }

    /// Set thumb width.
    #[must_use]
    pub fn thumb_width(mut self, width: f32) -> Self {
        self.thumb_width = width.max(0.0);
        self
    }

    /// Set track height.
    #[must_use]
    pub fn track_height(mut self, height: f32) -> Self {
        self.track_height = height.max(0.0);
        self
    }

    /// Set track color.
    #[must_use]
    pub const fn track_color(mut self, color: Color) -> Self {
        self.track_color = color;
        self
    }

    /// Set active track color.
    #[must_use]
    pub const fn active_color(mut self, color: Color) -> Self {
        self.active_color = color;
        self
    }

    /// Set thumb color.
    #[must_use]
    pub const fn thumb_color(mut self, color: Color) -> Self {
        self.thumb_color = color;
        self
    }

    /// Set test ID.
    #[must_use]
    pub fn with_test_id(mut self, id: impl Into<String>) -> Self {
        self.test_id_value = Some(id.into());
        self
    }

    /// Set accessible name.
    #[must_use]
    pub fn with_accessible_name(mut self, name: impl Into<String>) -> Self {
        self.accessible_name_value = Some(name.into());
        self
    }

    /// Get current value.
    #[must_use]
    pub const fn get_value(&self) -> f64 {
        self.value
    }

    /// Get the configuration.
    #[must_use]
    pub const fn config(&self) -> &SliderConfig {
        &self.config
    }

    /// Thumb offset from the track's left edge, in pixels.
    #[must_use]
    pub const fn thumb_offset(&self) -> f32 {
        self.offset
    }

    /// Get the thumb width.
    #[must_use]
    pub const fn get_thumb_width(&self) -> f32 {
        self.thumb_width
    }

    /// Current drag state.
    #[must_use]
    pub const fn gesture(&self) -> GestureState {
        self.gesture
    }

    /// Whether the range is empty and the thumb fixed.
    #[must_use]
    pub fn is_inert(&self) -> bool {
        self.config.is_inert()
    }

    /// Get normalized value (0.0 - 1.0).
    #[must_use]
    pub fn normalized_value(&self) -> f64 {
        let span = self.config.span();
        if span > 0.0 {
            ((self.value - self.config.min) / span).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    /// Thumb rectangle in page coordinates.
    #[must_use]
    pub fn thumb_rect(&self) -> Rect {
        Rect::new(
            self.bounds.x + self.offset,
            self.bounds.y,
            self.thumb_width,
            self.bounds.height,
        )
    }

    /// ARIA range values for the host element.
    #[must_use]
    pub fn aria_values(&self) -> AriaValues {
        AriaValues {
            min: self.config.min,
            max: self.config.max,
            now: self.value,
        }
    }

    /// Begin a drag by `owner` at `pointer_x` on a track measured as
    /// `geometry`.
    ///
    /// An inert slider only re-pins its thumb at the start of the track. A
    /// start from another source while a drag is active is ignored.
    pub fn gesture_start(
        &mut self,
        owner: GestureOwner,
        pointer_x: f32,
        geometry: Geometry,
    ) -> Option<SliderChanged> {
        if !self.gesture.accepts(owner) {
            tracing::trace!(?owner, "start ignored: drag owned by another input");
            return None;
        }
        if self.config.is_inert() {
            tracing::debug!("gesture ignored: slider is inert");
            self.offset = 0.0;
            self.value = self.config.min;
            return None;
        }
        tracing::debug!(pointer_x, track_width = geometry.track_width, "gesture start");
        self.gesture = GestureState::Active { geometry, owner };
        self.apply_pointer(pointer_x, geometry)
    }

    /// Follow `owner` during a drag. Ignored when no drag is active or the
    /// drag belongs to another source.
    pub fn gesture_move(&mut self, owner: GestureOwner, pointer_x: f32) -> Option<SliderChanged> {
        match self.gesture {
            GestureState::Active {
                geometry,
                owner: active,
            } if active == owner => {
                tracing::trace!(pointer_x, "gesture move");
                self.apply_pointer(pointer_x, geometry)
            }
            _ => None,
        }
    }

    /// End the drag if `owner` started it. Returns whether a drag ended.
    pub fn gesture_end(&mut self, owner: GestureOwner) -> bool {
        match self.gesture.owner() {
            Some(active) if active == owner => self.cancel_gesture(),
            Some(active) => {
                tracing::trace!(?owner, ?active, "end ignored: drag owned by another input");
                false
            }
            None => false,
        }
    }

    /// End any drag regardless of owner. Returns whether a drag was active.
    pub fn cancel_gesture(&mut self) -> bool {
        let was_active = self.gesture.is_active();
        if was_active {
            tracing::debug!(value = self.value, "gesture end");
        }
        self.gesture = GestureState::Inactive;
        was_active
    }

    /// Reflect a value written to the bound model by someone else.
    ///
    /// The value is clamped into range and the thumb placed on a track of
    /// `track_width` pixels. No message is produced, so the write is never
    /// echoed back to the model. Returns the value actually applied.
    pub fn set_value_external(&mut self, value: f64, track_width: f32) -> f64 {
        self.value = self.config.clamp(value);
        self.offset = self.offset_for_value(track_width.max(0.0));
        tracing::debug!(requested = value, applied = self.value, "external model value");
        self.value
    }

    /// Replace range and step. The current value is re-clamped and a
    /// message returned if that changed it.
    pub fn set_config(&mut self, config: SliderConfig) -> Option<SliderChanged> {
        let old_value = self.value;
        self.config = SliderConfig {
            value: Some(old_value),
            ..config
        };
        if self.config.is_inert() {
            tracing::warn!(min = config.min, max = config.max, "slider range is empty; thumb is fixed");
            self.gesture = GestureState::Inactive;
        }
        self.value = self.config.initial_value();
        let width = match self.gesture {
            GestureState::Active { geometry, .. } => geometry.track_width,
            GestureState::Inactive => self.bounds.width,
        };
        self.offset = self.offset_for_value(width);
        self.changed_since(old_value)
    }

    /// Snap a raw value onto the step grid anchored at `min`.
    ///
    /// Values are floored onto the grid, never rounded to the nearest step;
    /// the end of the track always maps to `max` even when the range is not
    /// a whole number of steps.
    #[must_use]
    pub fn quantize(&self, raw: f64, ratio: f64) -> f64 {
        let SliderConfig { min, max, step, .. } = self.config;
        if ratio >= 1.0 {
            return max;
        }
        let snapped = match step {
            Some(step) => min + ((raw - min) / step + STEP_EPSILON).floor() * step,
            None => raw,
        };
        self.config.clamp(snapped)
    }

    fn apply_pointer(&mut self, pointer_x: f32, geometry: Geometry) -> Option<SliderChanged> {
        let raw_offset = geometry.offset_at(pointer_x);
        let ratio = geometry.ratio_of(raw_offset);
        let raw = ratio.mul_add(self.config.span(), self.config.min);
        let old_value = self.value;
        self.value = self.quantize(raw, ratio);
        self.offset = if self.config.step.is_some() {
            self.offset_for_value(geometry.track_width)
        } else {
            raw_offset
        };
        self.changed_since(old_value)
    }

    fn offset_for_value(&self, track_width: f32) -> f32 {
        (self.normalized_value() * f64::from(track_width)) as f32
    }

    fn changed_since(&self, old_value: f64) -> Option<SliderChanged> {
        if (self.value - old_value).abs() > f64::EPSILON {
            Some(SliderChanged { value: self.value })
        } else {
            None
        }
    }
}

impl Widget for Slider {
    fn layout(&mut self, bounds: Rect) -> LayoutResult {
        self.bounds = bounds;
        if !self.gesture.is_active() {
            self.offset = self.offset_for_value(bounds.width);
        }
        LayoutResult {
            size: bounds.size(),
        }
    }

    fn paint(&self, canvas: &mut dyn Canvas) {
        let track_y = self.bounds.y + (self.bounds.height - self.track_height) / 2.0;
        let track_rect = Rect::new(self.bounds.x, track_y, self.bounds.width, self.track_height);

        // Draw track background
        canvas.fill_rect(track_rect, self.track_color);

        // Draw active portion
        canvas.fill_rect(track_rect.with_width(self.offset), self.active_color);

        let thumb_color = if self.is_inert() {
            Color::new(0.6, 0.6, 0.6, 1.0)
        } else {
            self.thumb_color
        };
        canvas.fill_rounded_rect(self.thumb_rect(), self.thumb_width / 2.0, thumb_color);
    }

    /// Start events are accepted wherever they land; hit-testing belongs to
    /// the host, which routes only presses on its element.
    fn event(&mut self, event: &Event) -> Option<Box<dyn Any + Send>> {
        let input = event.gesture()?;
        let changed = match (input.phase, input.position) {
            (GesturePhase::Start, Some(position)) => {
                let geometry = Geometry::from_bounds(self.bounds, self.thumb_width);
                self.gesture_start(input.owner, position.x, geometry)
            }
            (GesturePhase::Move, Some(position)) => self.gesture_move(input.owner, position.x),
            (GesturePhase::End, _) => {
                self.gesture_end(input.owner);
                None
            }
            _ => None,
        };
        changed.map(|msg| Box::new(msg) as Box<dyn Any + Send>)
    }

    fn is_interactive(&self) -> bool {
        !self.is_inert()
    }

    fn accessible_name(&self) -> Option<&str> {
        self.accessible_name_value.as_deref()
    }

    fn accessible_role(&self) -> AccessibleRole {
        AccessibleRole::Slider
    }

    fn test_id(&self) -> Option<&str> {
        self.test_id_value.as_deref()
    }

    fn bounds(&self) -> Rect {
        self.bounds
    }
}
