//! uislider: a draggable slider bound two-way to an observable model.
//!
//! The platform-neutral [`SliderHost`] owns the widget, the model binding
//! and frame coalescing. On `wasm32` the [`browser`] module mounts it on a
//! DOM element.
//!
//! # Browser Usage (WASM)
//!
//! ```javascript
//! import init, { DomSlider } from './uislider.js';
//!
//! async function main() {
//!     await init();
//!     const slider = DomSlider.fromId('volume');
//!     slider.on_change((value) => console.log(value));
//!     slider.set_value(40);
//! }
//! ```
//!
//! # Native Usage
//!
//! ```
//! use uislider::{ManualScheduler, Rect, ReactiveCell, SliderHost};
//! use uislider::widgets::Slider;
//!
//! let model = ReactiveCell::new(0.0);
//! let mut host = SliderHost::new(
//!     Slider::new().step(25.0),
//!     Rect::new(0.0, 0.0, 200.0, 20.0),
//!     ManualScheduler::new(),
//! );
//! host.bind(&model);
//!
//! model.set(50.0);
//! host.digest();
//! host.flush_frames();
//! assert_eq!(host.rendered().offset, 100.0);
//! ```

pub use uislider_core::*;
pub use uislider_widgets as widgets;

pub mod browser;
mod error;
mod host;

pub use error::MountError;
pub use host::{HostSnapshot, RenderedThumb, SliderHost};

#[cfg(target_arch = "wasm32")]
pub use browser::DomSlider;
