#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::float_cmp)]
//! Testing harness for uislider.
//!
//! Drives a [`SliderHost`](uislider::SliderHost) the way a page would: a
//! host element of known bounds, gesture events from one input family, and
//! a spy frame source that records requests and (by default) runs each
//! frame as soon as it is requested.
//!
//! ```
//! use uislider_test::{InputFamily, SliderHarness};
//!
//! let mut harness = SliderHarness::new(InputFamily::Mouse);
//! let middle = harness.element_left() + harness.element_width() / 2.0;
//! harness.start(middle).end();
//! harness.assert_frame_requested().assert_thumb_offset(117.0);
//! ```

mod harness;

pub use harness::{InputFamily, SliderHarness, DEFAULT_ELEMENT};
