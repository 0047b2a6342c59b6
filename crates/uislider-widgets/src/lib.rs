//! Widget implementations for the uislider crates.

pub mod slider;

pub use slider::{AriaValues, Geometry, GestureState, Slider, SliderChanged};
