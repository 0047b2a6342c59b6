//! Draw commands for backend-agnostic rendering.

use crate::{Color, Rect};
use serde::{Deserialize, Serialize};

/// Drawing primitive - all rendering reduces to these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DrawCommand {
    /// Fill a rectangle
    Rect {
        /// Rectangle bounds
        bounds: Rect,
        /// Corner radius
        radius: f32,
        /// Fill color
        color: Color,
    },
}

impl DrawCommand {
    /// Create a filled rectangle.
    #[must_use]
    pub const fn filled_rect(bounds: Rect, color: Color) -> Self {
        Self::Rect {
            bounds,
            radius: 0.0,
            color,
        }
    }

    /// Create a rounded rectangle.
    #[must_use]
    pub const fn rounded_rect(bounds: Rect, radius: f32, color: Color) -> Self {
        Self::Rect {
            bounds,
            radius,
            color,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filled_rect_has_no_radius() {
        let cmd = DrawCommand::filled_rect(Rect::new(1.0, 2.0, 3.0, 4.0), Color::WHITE);
        assert!(matches!(cmd, DrawCommand::Rect { radius, .. } if radius == 0.0));
    }

    #[test]
    fn test_draw_command_json() {
        let cmd = DrawCommand::rounded_rect(Rect::new(0.0, 0.0, 8.0, 8.0), 4.0, Color::BLACK);
        let json = serde_json::to_string(&cmd).unwrap();
        let back: DrawCommand = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cmd);
    }
}
