//! Browser event handling - converts DOM events to slider events.
//!
//! Positions are client coordinates, matching
//! `getBoundingClientRect()` of the host element.

use uislider_core::{Event, MouseButton, Point, TouchId};
use wasm_bindgen::JsCast;
use web_sys::{MouseEvent, TouchEvent};

/// Events the host element listens for.
pub const START_EVENTS: [&str; 2] = ["mousedown", "touchstart"];
/// Events the document listens for while mounted.
pub const DRAG_EVENTS: [&str; 5] = ["mousemove", "mouseup", "touchmove", "touchend", "touchcancel"];

/// Convert a `web_sys::MouseEvent` to a slider event.
pub fn mouse_event_to_slider(event: &MouseEvent, event_type: &str) -> Option<Event> {
    let position = Point::new(event.client_x() as f32, event.client_y() as f32);
    let button = match event.button() {
        1 => MouseButton::Middle,
        2 => MouseButton::Right,
        _ => MouseButton::Left,
    };

    match event_type {
        "mousedown" => Some(Event::MouseDown { position, button }),
        "mouseup" => Some(Event::MouseUp { position, button }),
        "mousemove" => Some(Event::MouseMove { position }),
        _ => None,
    }
}

/// Convert a `web_sys::TouchEvent` to one slider event per changed touch.
///
/// `changedTouches` holds exactly the touches this event is about, each
/// with its own identifier, so a finger that is not driving the drag cannot
/// be mistaken for the one that is. The host drops events whose id does not
/// own the drag.
pub fn touch_event_to_slider(event: &TouchEvent, event_type: &str) -> Vec<Event> {
    let list = event.changed_touches();
    (0..list.length())
        .filter_map(|index| list.get(index))
        .filter_map(|touch| {
            let id = TouchId(u32::try_from(touch.identifier()).unwrap_or_default());
            let position = Point::new(touch.client_x() as f32, touch.client_y() as f32);
            match event_type {
                "touchstart" => Some(Event::TouchStart { id, position }),
                "touchmove" => Some(Event::TouchMove { id, position }),
                "touchend" => Some(Event::TouchEnd { id, position }),
                "touchcancel" => Some(Event::TouchCancel { id }),
                _ => None,
            }
        })
        .collect()
}

/// Convert any DOM event the slider listens for.
pub fn dom_event_to_slider(event: &web_sys::Event) -> Vec<Event> {
    let event_type = event.type_();
    if event_type.starts_with("touch") {
        event
            .dyn_ref::<TouchEvent>()
            .map(|touch| touch_event_to_slider(touch, &event_type))
            .unwrap_or_default()
    } else {
        event
            .dyn_ref::<MouseEvent>()
            .and_then(|mouse| mouse_event_to_slider(mouse, &event_type))
            .into_iter()
            .collect()
    }
}
