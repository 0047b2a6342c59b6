//! Core types and traits for the uislider widget.
//!
//! This crate provides foundational types used by the slider and its hosts:
//! - Geometric primitives: [`Point`], [`Size`], [`Rect`]
//! - Input events and their reduction to gestures: [`Event`], [`GesturePhase`]
//! - Painting: [`Canvas`], [`DrawCommand`], [`RecordingCanvas`]
//! - Model binding: [`ReactiveCell`], [`TwoWayBinding`]
//! - Frame scheduling: [`FrameScheduler`], [`RenderQueue`]
//! - Configuration: [`SliderConfig`]

pub mod binding;
mod canvas;
mod color;
pub mod config;
pub mod draw;
mod event;
pub mod frame;
mod geometry;
pub mod widget;

pub use binding::{ReactiveCell, SubscriptionId, TwoWayBinding};
pub use canvas::RecordingCanvas;
pub use color::Color;
pub use config::{ConfigError, SliderConfig};
pub use draw::DrawCommand;
pub use event::{
    Event, GestureInput, GestureOwner, GesturePhase, MouseButton, PointerId, PointerType, TouchId,
};
pub use frame::{FrameError, FrameHandle, FrameScheduler, ManualScheduler, RenderQueue};
pub use geometry::{Point, Rect, Size};
pub use widget::{AccessibleRole, Canvas, LayoutResult, Widget};

#[cfg(test)]
mod tests {
    use super::*;

    // ==========================================================================
    // GEOMETRY TESTS
    // ==========================================================================

    mod geometry_tests {
        use super::*;
        use proptest::prelude::*;

        #[test]
        fn test_rect_edges() {
            let rect = Rect::new(8.0, 0.0, 234.0, 20.0);
            assert_eq!(rect.right(), 242.0);
            assert_eq!(rect.size(), Size::new(234.0, 20.0));
            assert_eq!(Rect::default().size(), Size::ZERO);
        }

        #[test]
        fn test_rect_with_width_keeps_origin() {
            let rect = Rect::new(8.0, 5.0, 234.0, 4.0).with_width(117.0);
            assert_eq!(rect, Rect::new(8.0, 5.0, 117.0, 4.0));
        }

        proptest! {
            #[test]
            fn prop_right_edge_follows_width(x in -1000.0f32..1000.0, w in 0.0f32..500.0, narrower in 0.0f32..1.0) {
                let rect = Rect::new(x, 0.0, w, 20.0);
                let partial = rect.with_width(w * narrower);
                prop_assert!(partial.right() <= rect.right() + f32::EPSILON * 1000.0);
                prop_assert_eq!(partial.x, rect.x);
            }
        }
    }

    // ==========================================================================
    // WIDGET TYPES
    // ==========================================================================

    #[test]
    fn test_accessible_role_aria() {
        assert_eq!(AccessibleRole::Slider.aria_role(), "slider");
        assert_eq!(AccessibleRole::Generic.aria_role(), "generic");
    }
}
