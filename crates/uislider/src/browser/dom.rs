//! DOM-backed slider.

use super::events::{dom_event_to_slider, DRAG_EVENTS, START_EVENTS};
use super::scheduler::{FrameCallback, RafScheduler};
use super::{aria_number, thumb_left, CONFIG_ATTRIBUTES, THUMB_CLASS, TRACK_CLASS};
use crate::host::{RenderedThumb, SliderHost};
use crate::MountError;
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use uislider_core::{AccessibleRole, GesturePhase, ReactiveCell, Rect, SliderConfig};
use uislider_widgets::Slider;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{window, Document, EventTarget, HtmlElement};

type Listener = Closure<dyn FnMut(web_sys::Event)>;

impl From<MountError> for JsValue {
    fn from(err: MountError) -> Self {
        Self::from_str(&err.to_string())
    }
}

fn report(err: MountError) -> JsValue {
    web_sys::console::error_1(&JsValue::from_str(&format!("uislider: {err}")));
    err.into()
}

fn dom_error(err: JsValue) -> MountError {
    MountError::Dom(format!("{err:?}"))
}

/// Event listeners registered by one mount. Dropping the set removes every
/// listener in it, so a mount that fails halfway leaves nothing behind.
#[derive(Default)]
struct ListenerSet {
    registered: Vec<(EventTarget, &'static str, Listener)>,
}

impl ListenerSet {
    fn add(
        &mut self,
        target: &EventTarget,
        event_type: &'static str,
        listener: Listener,
    ) -> Result<(), MountError> {
        target
            .add_event_listener_with_callback(event_type, listener.as_ref().unchecked_ref())
            .map_err(dom_error)?;
        self.registered.push((target.clone(), event_type, listener));
        Ok(())
    }

    fn len(&self) -> usize {
        self.registered.len()
    }

    fn clear(&mut self) {
        for (target, event_type, listener) in self.registered.drain(..) {
            target
                .remove_event_listener_with_callback(event_type, listener.as_ref().unchecked_ref())
                .ok();
        }
    }
}

impl Drop for ListenerSet {
    fn drop(&mut self) {
        if !self.registered.is_empty() {
            tracing::debug!(count = self.registered.len(), "removing slider listeners");
        }
        self.clear();
    }
}

/// State shared between the exported handle and the DOM callbacks.
struct Mounted {
    host: SliderHost<RafScheduler>,
    element: HtmlElement,
    track: HtmlElement,
    thumb: HtmlElement,
    listeners: ListenerSet,
    changes: Rc<RefCell<Vec<f64>>>,
    on_change: Option<js_sys::Function>,
}

impl Mounted {
    fn element_bounds(&self) -> Rect {
        element_bounds(&self.element)
    }

    fn write(&self, rendered: RenderedThumb) {
        if let Err(err) = self
            .thumb
            .style()
            .set_property("left", &thumb_left(rendered.offset))
        {
            tracing::warn!(?err, "failed to position thumb");
        }
        self.write_aria();
    }

    fn write_aria(&self) {
        let aria = self.host.slider().aria_values();
        let attributes = [
            ("role", AccessibleRole::Slider.aria_role().to_string()),
            ("aria-valuemin", aria_number(aria.min)),
            ("aria-valuemax", aria_number(aria.max)),
            ("aria-valuenow", aria_number(aria.now)),
        ];
        for (name, value) in attributes {
            if let Err(err) = self.element.set_attribute(name, &value) {
                tracing::warn!(?err, attribute = name, "failed to set attribute");
            }
        }
        let disabled = if self.host.slider().is_inert() { "true" } else { "false" };
        self.element.set_attribute("aria-disabled", disabled).ok();
    }

    fn detach(&mut self) {
        self.listeners.clear();
        self.track.remove();
        self.thumb.remove();
    }
}

/// A slider mounted on a DOM element.
///
/// The host element receives a `.ui-slider-track` and a `.ui-slider-thumb`
/// child. Presses on the host element start a drag; moves and releases are
/// tracked on the document so a drag can leave the element.
#[wasm_bindgen]
pub struct DomSlider {
    inner: Rc<RefCell<Mounted>>,
    frame: FrameCallback,
}

#[wasm_bindgen]
impl DomSlider {
    /// Mount a slider on `element`, reading `min`, `max`, `step` and
    /// `value` attributes.
    #[wasm_bindgen(constructor)]
    pub fn new(element: HtmlElement) -> Result<DomSlider, JsValue> {
        Self::mount(element).map_err(report)
    }

    /// Mount a slider on the element with the given id.
    #[wasm_bindgen(js_name = fromId)]
    pub fn from_id(id: &str) -> Result<DomSlider, JsValue> {
        let element = document()
            .and_then(|document| {
                document
                    .get_element_by_id(id)
                    .ok_or_else(|| MountError::ElementNotFound(id.to_string()))
            })
            .and_then(|element| {
                element
                    .dyn_into::<HtmlElement>()
                    .map_err(|_| MountError::Dom(format!("'{id}' is not an HTML element")))
            })
            .map_err(report)?;
        Self::mount(element).map_err(report)
    }

    /// Register a callback receiving each user-driven value change.
    pub fn on_change(&self, callback: js_sys::Function) {
        self.inner.borrow_mut().on_change = Some(callback);
    }

    /// Reflect a value written to the model from outside. The thumb moves
    /// on the next frame; no change callback fires.
    pub fn set_value(&self, value: f64) {
        let mut mounted = self.inner.borrow_mut();
        mounted.host.set_value(value);
        mounted.write_aria();
    }

    /// Current value.
    pub fn value(&self) -> f64 {
        self.inner.borrow().host.slider().get_value()
    }

    /// Replace range and step, as when the host element's attributes
    /// change. A `step` of `undefined` means continuous.
    pub fn set_range(&self, min: f64, max: f64, step: Option<f64>) {
        let config = SliderConfig::new(min, max);
        let config = match step {
            Some(step) => config.with_step(step),
            None => config,
        };
        {
            let mut mounted = self.inner.borrow_mut();
            mounted.host.set_config(config);
            mounted.write_aria();
        }
        notify(&self.inner);
    }

    /// Pull a pending change from a bound model.
    pub fn digest(&self) -> bool {
        let mut mounted = self.inner.borrow_mut();
        let applied = mounted.host.digest();
        if applied {
            mounted.write_aria();
        }
        applied
    }

    /// Observable state as JSON.
    pub fn state_json(&self) -> String {
        let snapshot = self.inner.borrow().host.snapshot();
        serde_json::to_string(&snapshot).unwrap_or_default()
    }

    /// Remove listeners and child elements and cancel the pending frame.
    pub fn unmount(&self) {
        let mut mounted = self.inner.borrow_mut();
        if !mounted.host.is_mounted() {
            return;
        }
        mounted.host.unmount();
        mounted.detach();
        drop(mounted);
        self.frame.borrow_mut().take();
    }
}

impl DomSlider {
    /// Mount a slider on `element`.
    ///
    /// # Errors
    ///
    /// Fails when there is no window or document, or when creating the
    /// track and thumb elements fails.
    pub fn mount(element: HtmlElement) -> Result<Self, MountError> {
        console_error_panic_hook::set_once();

        let window = window().ok_or(MountError::NoWindow)?;
        let document = window.document().ok_or(MountError::NoDocument)?;

        let attributes: Vec<(&str, String)> = CONFIG_ATTRIBUTES
            .iter()
            .filter_map(|name| element.get_attribute(name).map(|value| (*name, value)))
            .collect();
        let config = SliderConfig::default()
            .apply_attributes(attributes.iter().map(|(name, value)| (*name, value.as_str())));

        let track = create_child(&document, &element, TRACK_CLASS)?;
        let thumb = match create_child(&document, &element, THUMB_CLASS) {
            Ok(thumb) => thumb,
            Err(err) => {
                track.remove();
                return Err(err);
            }
        };
        Self::attach(window, &document, element, config, track.clone(), thumb.clone()).map_err(|err| {
            tracing::warn!(%err, "slider mount failed; removing track and thumb");
            track.remove();
            thumb.remove();
            err
        })
    }

    /// Wire a host, frame callback and listeners to created children.
    /// Listeners registered before a failure are removed when the partial
    /// [`ListenerSet`] drops.
    fn attach(
        window: web_sys::Window,
        document: &Document,
        element: HtmlElement,
        config: SliderConfig,
        track: HtmlElement,
        thumb: HtmlElement,
    ) -> Result<Self, MountError> {
        if element.style().get_property_value("position").map_or(true, |p| p.is_empty()) {
            element.style().set_property("position", "relative").map_err(dom_error)?;
        }
        thumb.style().set_property("position", "absolute").map_err(dom_error)?;

        let mut slider = Slider::from_config(config);
        let measured = thumb.get_bounding_client_rect().width() as f32;
        if measured > 0.0 {
            slider = slider.thumb_width(measured);
        }
        if let Some(label) = element.get_attribute("aria-label") {
            slider = slider.with_accessible_name(label);
        }

        let frame: FrameCallback = Rc::new(RefCell::new(None));
        let scheduler = RafScheduler::new(window, Rc::clone(&frame));
        let mut host = SliderHost::new(slider, element_bounds(&element), scheduler);

        let changes = Rc::new(RefCell::new(Vec::new()));
        let queue = Rc::clone(&changes);
        host.on_change(move |changed| queue.borrow_mut().push(changed.value));

        let inner = Rc::new(RefCell::new(Mounted {
            host,
            element: element.clone(),
            track,
            thumb,
            listeners: ListenerSet::default(),
            changes,
            on_change: None,
        }));

        let weak = Rc::downgrade(&inner);
        *frame.borrow_mut() = Some(Closure::new(move |_timestamp: f64| {
            if let Some(inner) = weak.upgrade() {
                let mut mounted = inner.borrow_mut();
                if let Some(rendered) = mounted.host.pending_animation_frame() {
                    mounted.write(rendered);
                }
            }
        }));

        let document_target: EventTarget = document.clone().into();
        let element_target: EventTarget = element.into();
        let mut listeners = ListenerSet::default();
        for (target, event_types) in [(&element_target, &START_EVENTS[..]), (&document_target, &DRAG_EVENTS[..])] {
            for &event_type in event_types {
                let weak = Rc::downgrade(&inner);
                let listener: Listener = Closure::new(move |event: web_sys::Event| {
                    dispatch(&weak, &event);
                });
                listeners.add(target, event_type, listener)?;
            }
        }
        tracing::trace!(count = listeners.len(), "slider listeners registered");

        {
            let mut mounted = inner.borrow_mut();
            mounted.listeners = listeners;
            let rendered = mounted.host.rendered();
            mounted.write(rendered);
        }
        tracing::debug!(?config, "slider mounted");

        Ok(Self { inner, frame })
    }

    /// Bind the slider to a model cell. External writes to the cell are
    /// picked up by [`DomSlider::digest`].
    pub fn bind(&self, model: &ReactiveCell<f64>) {
        let mut mounted = self.inner.borrow_mut();
        mounted.host.bind(model);
        let rendered = mounted.host.rendered();
        mounted.write(rendered);
    }
}

impl Drop for DomSlider {
    fn drop(&mut self) {
        if let Ok(mut mounted) = self.inner.try_borrow_mut() {
            if mounted.host.is_mounted() {
                mounted.host.unmount();
                mounted.detach();
            }
        }
        if let Ok(mut frame) = self.frame.try_borrow_mut() {
            frame.take();
        }
    }
}

/// Route one DOM event to the host, then run change callbacks with the
/// shared state released so they may call back into the slider.
fn dispatch(inner: &Weak<RefCell<Mounted>>, dom_event: &web_sys::Event) {
    let Some(inner) = inner.upgrade() else {
        return;
    };
    let events = dom_event_to_slider(dom_event);
    if events.is_empty() {
        return;
    }
    {
        let Ok(mut mounted) = inner.try_borrow_mut() else {
            tracing::warn!("re-entrant slider event dropped");
            return;
        };
        let mut consumed_any = false;
        for event in &events {
            let starts = event.gesture().is_some_and(|g| g.phase == GesturePhase::Start);
            if starts {
                let bounds = mounted.element_bounds();
                if mounted.host.bounds() != bounds {
                    mounted.host.set_bounds(bounds);
                }
            }
            let consumed = mounted.host.handle_event(event);
            consumed_any |= consumed;
            if consumed && !starts {
                mounted.write_aria();
            }
        }
        if consumed_any && dom_event.type_().starts_with("touch") {
            dom_event.prevent_default();
        }
    }
    notify(&inner);
}

fn notify(inner: &Rc<RefCell<Mounted>>) {
    let (values, callback) = {
        let mounted = inner.borrow();
        let values: Vec<f64> = mounted.changes.borrow_mut().drain(..).collect();
        (values, mounted.on_change.clone())
    };
    let Some(callback) = callback else {
        return;
    };
    for value in values {
        if let Err(err) = callback.call1(&JsValue::NULL, &JsValue::from_f64(value)) {
            tracing::warn!(?err, "slider change callback threw");
        }
    }
}

fn document() -> Result<Document, MountError> {
    window()
        .ok_or(MountError::NoWindow)?
        .document()
        .ok_or(MountError::NoDocument)
}

fn create_child(
    document: &Document,
    parent: &HtmlElement,
    class: &str,
) -> Result<HtmlElement, MountError> {
    let child = document
        .create_element("div")
        .map_err(dom_error)?
        .dyn_into::<HtmlElement>()
        .map_err(|_| MountError::Dom("created element is not an HTMLElement".into()))?;
    child.set_class_name(class);
    parent.append_child(&child).map_err(dom_error)?;
    Ok(child)
}

fn element_bounds(element: &HtmlElement) -> Rect {
    let rect = element.get_bounding_client_rect();
    Rect::new(
        rect.left() as f32,
        rect.top() as f32,
        rect.width() as f32,
        rect.height() as f32,
    )
}
