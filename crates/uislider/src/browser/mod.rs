//! Browser runtime for uislider.
//!
//! Bridges the DOM (host element, document-level drag listeners,
//! `requestAnimationFrame`) to [`SliderHost`](crate::SliderHost).

#[cfg(target_arch = "wasm32")]
mod dom;
#[cfg(target_arch = "wasm32")]
pub mod events;
#[cfg(target_arch = "wasm32")]
mod scheduler;

#[cfg(target_arch = "wasm32")]
pub use dom::DomSlider;
#[cfg(target_arch = "wasm32")]
pub use scheduler::{FrameCallback, RafScheduler};

/// Class of the track element created inside the host element.
pub const TRACK_CLASS: &str = "ui-slider-track";
/// Class of the thumb element created inside the host element.
pub const THUMB_CLASS: &str = "ui-slider-thumb";
/// Host element attributes read at mount.
pub const CONFIG_ATTRIBUTES: [&str; 4] = ["min", "max", "step", "value"];

/// CSS `left` value placing the thumb at `offset` pixels.
pub fn thumb_left(offset: f32) -> String {
    format!("{offset}px")
}

/// Format a value for an `aria-value*` attribute.
pub fn aria_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{value:.0}")
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thumb_left() {
        assert_eq!(thumb_left(0.0), "0px");
        assert_eq!(thumb_left(117.0), "117px");
        assert_eq!(thumb_left(58.5), "58.5px");
    }

    #[test]
    fn test_aria_number() {
        assert_eq!(aria_number(50.0), "50");
        assert_eq!(aria_number(-50.0), "-50");
        assert_eq!(aria_number(12.5), "12.5");
    }
}
