//! Two-way state binding between a widget and an observable model.
//!
//! A [`ReactiveCell`] is the model the host framework owns. A widget attaches
//! to it through a [`TwoWayBinding`]:
//!
//! - `widget -> model`: [`TwoWayBinding::push`] writes the value and notifies
//!   every other subscriber, never the widget itself.
//! - `model -> widget`: writes made by anyone else land in the binding's
//!   inbox and are drained by [`TwoWayBinding::take_external`] during the
//!   host's digest.
//!
//! # Example
//!
//! ```
//! use uislider_core::binding::{ReactiveCell, TwoWayBinding};
//!
//! let model = ReactiveCell::new(0.0_f64);
//! let binding = TwoWayBinding::attach(&model);
//!
//! binding.push(42.0);
//! assert_eq!(model.get(), 42.0);
//! assert_eq!(binding.take_external(), None);
//!
//! model.set(10.0);
//! assert_eq!(binding.take_external(), Some(10.0));
//! ```

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock};

/// Type alias for subscriber callbacks.
type SubscriberFn<T> = Box<dyn Fn(&T) + Send + Sync>;

/// Type alias for subscribers list.
type Subscribers<T> = Arc<RwLock<Vec<(SubscriptionId, SubscriberFn<T>)>>>;

/// Handle returned by [`ReactiveCell::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// A reactive cell that holds a value and notifies on changes.
///
/// Clones are handles onto the same value and the same subscriber list.
pub struct ReactiveCell<T> {
    value: Arc<RwLock<T>>,
    subscribers: Subscribers<T>,
    next_id: Arc<AtomicU64>,
}

impl<T: Clone + Send + Sync + 'static> ReactiveCell<T> {
    /// Create a new reactive cell with an initial value.
    pub fn new(value: T) -> Self {
        Self {
            value: Arc::new(RwLock::new(value)),
            subscribers: Arc::new(RwLock::new(Vec::new())),
            next_id: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Get the current value.
    pub fn get(&self) -> T {
        self.value.read().expect("ReactiveCell lock poisoned").clone()
    }

    /// Set a new value, notifying subscribers.
    pub fn set(&self, value: T) {
        self.store(value);
        self.notify(None);
    }

    /// Set a new value on behalf of `writer`, notifying every other subscriber.
    pub fn set_from(&self, value: T, writer: SubscriptionId) {
        self.store(value);
        self.notify(Some(writer));
    }

    /// Subscribe to value changes.
    ///
    /// Callbacks run synchronously inside `set`; they must not subscribe or
    /// unsubscribe on the same cell.
    pub fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.subscribers
            .write()
            .expect("ReactiveCell lock poisoned")
            .push((id, Box::new(callback)));
        id
    }

    /// Remove a subscription. Unknown ids are ignored.
    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.subscribers
            .write()
            .expect("ReactiveCell lock poisoned")
            .retain(|(sub, _)| *sub != id);
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers
            .read()
            .expect("ReactiveCell lock poisoned")
            .len()
    }

    fn store(&self, value: T) {
        *self.value.write().expect("ReactiveCell lock poisoned") = value;
    }

    fn notify(&self, skip: Option<SubscriptionId>) {
        let value = self.get();
        let subscribers = self.subscribers.read().expect("ReactiveCell lock poisoned");
        for (id, sub) in subscribers.iter() {
            if Some(*id) != skip {
                sub(&value);
            }
        }
    }
}

impl<T> Clone for ReactiveCell<T> {
    fn clone(&self) -> Self {
        Self {
            value: Arc::clone(&self.value),
            subscribers: Arc::clone(&self.subscribers),
            next_id: Arc::clone(&self.next_id),
        }
    }
}

impl<T: Clone + Send + Sync + Default + 'static> Default for ReactiveCell<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: Clone + Send + Sync + fmt::Debug + 'static> fmt::Debug for ReactiveCell<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReactiveCell")
            .field("value", &self.get())
            .field("subscribers", &self.subscriber_count())
            .finish_non_exhaustive()
    }
}

/// A widget's attachment to a model cell.
///
/// Dropping the binding detaches it.
pub struct TwoWayBinding<T: Clone + Send + Sync + 'static> {
    cell: ReactiveCell<T>,
    subscription: SubscriptionId,
    inbox: Arc<Mutex<Option<T>>>,
}

impl<T: Clone + Send + Sync + 'static> TwoWayBinding<T> {
    /// Attach to a model cell.
    pub fn attach(cell: &ReactiveCell<T>) -> Self {
        let inbox = Arc::new(Mutex::new(None));
        let sink = Arc::clone(&inbox);
        let subscription = cell.subscribe(move |value: &T| {
            *sink.lock().expect("binding inbox poisoned") = Some(value.clone());
        });
        Self {
            cell: cell.clone(),
            subscription,
            inbox,
        }
    }

    /// Current model value.
    pub fn current(&self) -> T {
        self.cell.get()
    }

    /// Write the widget's value to the model without echoing it back.
    pub fn push(&self, value: T) {
        self.cell.set_from(value, self.subscription);
    }

    /// Latest value written by someone other than this widget, if any.
    ///
    /// Intermediate writes between two digests are collapsed; only the last
    /// one is reported.
    pub fn take_external(&self) -> Option<T> {
        self.inbox.lock().expect("binding inbox poisoned").take()
    }

    /// The model cell this binding is attached to.
    pub const fn cell(&self) -> &ReactiveCell<T> {
        &self.cell
    }
}

impl<T: Clone + Send + Sync + 'static> Drop for TwoWayBinding<T> {
    fn drop(&mut self) {
        self.cell.unsubscribe(self.subscription);
    }
}

impl<T: Clone + Send + Sync + fmt::Debug + 'static> fmt::Debug for TwoWayBinding<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TwoWayBinding")
            .field("cell", &self.cell)
            .field("subscription", &self.subscription)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    // =========================================================================
    // ReactiveCell Tests
    // =========================================================================

    #[test]
    fn test_reactive_cell_get_set() {
        let cell = ReactiveCell::new(1);
        assert_eq!(cell.get(), 1);
        cell.set(2);
        assert_eq!(cell.get(), 2);
    }

    #[test]
    fn test_reactive_cell_update() {
        let cell = ReactiveCell::new(10);
        cell.update(|v| *v += 5);
        assert_eq!(cell.get(), 15);
    }

    #[test]
    fn test_reactive_cell_notifies_subscribers() {
        let cell = ReactiveCell::new(0);
        let seen = Arc::new(AtomicUsize::new(0));
        let s = Arc::clone(&seen);
        cell.subscribe(move |v: &i32| s.store(*v as usize, Ordering::SeqCst));

        cell.set(7);
        assert_eq!(seen.load(Ordering::SeqCst), 7);
    }

    #[test]
    fn test_reactive_cell_set_from_skips_writer() {
        let cell = ReactiveCell::new(0);
        let writer_calls = Arc::new(AtomicUsize::new(0));
        let other_calls = Arc::new(AtomicUsize::new(0));

        let w = Arc::clone(&writer_calls);
        let writer = cell.subscribe(move |_: &i32| {
            w.fetch_add(1, Ordering::SeqCst);
        });
        let o = Arc::clone(&other_calls);
        cell.subscribe(move |_: &i32| {
            o.fetch_add(1, Ordering::SeqCst);
        });

        cell.set_from(3, writer);
        assert_eq!(writer_calls.load(Ordering::SeqCst), 0);
        assert_eq!(other_calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_reactive_cell_unsubscribe() {
        let cell = ReactiveCell::new(0);
        let id = cell.subscribe(|_: &i32| {});
        assert_eq!(cell.subscriber_count(), 1);
        cell.unsubscribe(id);
        assert_eq!(cell.subscriber_count(), 0);
    }

    #[test]
    fn test_reactive_cell_clone_shares_state() {
        let cell = ReactiveCell::new(0);
        let handle = cell.clone();
        handle.set(9);
        assert_eq!(cell.get(), 9);
    }

    // =========================================================================
    // TwoWayBinding Tests
    // =========================================================================

    #[test]
    fn test_binding_push_does_not_echo() {
        let model = ReactiveCell::new(0.0_f64);
        let binding = TwoWayBinding::attach(&model);

        binding.push(25.0);
        assert_eq!(model.get(), 25.0);
        assert_eq!(binding.current(), 25.0);
        assert_eq!(binding.take_external(), None);
    }

    #[test]
    fn test_binding_receives_external_writes() {
        let model = ReactiveCell::new(0.0_f64);
        let binding = TwoWayBinding::attach(&model);

        model.set(10.0);
        model.set(50.0);
        assert_eq!(binding.take_external(), Some(50.0));
        assert_eq!(binding.take_external(), None);
    }

    #[test]
    fn test_binding_push_reaches_other_observers() {
        let model = ReactiveCell::new(0.0_f64);
        let observed = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&observed);
        model.subscribe(move |v: &f64| sink.lock().unwrap().push(*v));

        let binding = TwoWayBinding::attach(&model);
        binding.push(1.0);
        binding.push(2.0);
        assert_eq!(*observed.lock().unwrap(), vec![1.0, 2.0]);
    }

    #[test]
    fn test_binding_drop_detaches() {
        let model = ReactiveCell::new(0_i32);
        {
            let _binding = TwoWayBinding::attach(&model);
            assert_eq!(model.subscriber_count(), 1);
        }
        assert_eq!(model.subscriber_count(), 0);
    }
}
