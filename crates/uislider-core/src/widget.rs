//! Widget trait and related types.
//!
//! Widgets follow a layout-event-paint cycle:
//!
//! 1. **Layout**: receive the bounds allotted by the host element
//! 2. **Event**: react to routed input, optionally returning a message
//! 3. **Paint**: generate draw commands for rendering
//!
//! # Examples
//!
//! ```
//! use uislider_core::AccessibleRole;
//!
//! assert_eq!(AccessibleRole::default(), AccessibleRole::Generic);
//! assert_eq!(AccessibleRole::Slider.aria_role(), "slider");
//! ```

use crate::event::Event;
use crate::geometry::{Rect, Size};
use crate::Color;
use serde::{Deserialize, Serialize};
use std::any::Any;

/// Result of laying out a widget.
#[derive(Debug, Clone, Copy, Default)]
pub struct LayoutResult {
    /// Computed size after layout
    pub size: Size,
}

/// Core widget trait.
pub trait Widget {
    /// Position the widget within the bounds of its host element.
    fn layout(&mut self, bounds: Rect) -> LayoutResult;

    /// Generate draw commands for rendering.
    fn paint(&self, canvas: &mut dyn Canvas);

    /// Handle input events. Returns a message when the event changed state
    /// that the host should forward.
    fn event(&mut self, event: &Event) -> Option<Box<dyn Any + Send>>;

    /// Check if this widget is interactive (can receive focus/events).
    fn is_interactive(&self) -> bool {
        false
    }

    /// Get the accessible name for screen readers.
    fn accessible_name(&self) -> Option<&str> {
        None
    }

    /// Get the accessible role.
    fn accessible_role(&self) -> AccessibleRole {
        AccessibleRole::Generic
    }

    /// Get the test ID for this widget (if any).
    fn test_id(&self) -> Option<&str> {
        None
    }

    /// Get the current bounds of this widget.
    fn bounds(&self) -> Rect {
        Rect::default()
    }
}

/// Canvas trait for paint operations.
///
/// This is a minimal abstraction over the rendering backend.
pub trait Canvas {
    /// Draw a filled rectangle.
    fn fill_rect(&mut self, rect: Rect, color: Color);

    /// Draw a filled rectangle with rounded corners.
    fn fill_rounded_rect(&mut self, rect: Rect, radius: f32, color: Color);
}

/// Accessible role for screen readers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AccessibleRole {
    /// Generic element
    #[default]
    Generic,
    /// Slider
    Slider,
}

impl AccessibleRole {
    /// ARIA role attribute value.
    #[must_use]
    pub const fn aria_role(self) -> &'static str {
        match self {
            Self::Generic => "generic",
            Self::Slider => "slider",
        }
    }
}
