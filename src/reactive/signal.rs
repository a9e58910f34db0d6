use std::fmt;
use std::marker::PhantomData;

use super::invalidation::request_frame;
use super::owner::register_signal;
use super::runtime::{SignalId, forget_signal, notify_write, track_read};
use super::storage::{
    create_signal_value, dispose_signal, is_signal_alive, update_signal_value, with_signal_value,
};

/// A reactive value.
///
/// Signals are the core primitive of the reactive system. When a signal's
/// value changes, effects that read it are re-run. A `Signal` is a `Copy`
/// handle into thread-local storage, so it can be moved into any number of
/// closures. Signals created inside an owner scope are disposed with it.
pub struct Signal<T> {
    id: SignalId,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for Signal<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Signal<T> {}

impl<T> PartialEq for Signal<T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<T> Eq for Signal<T> {}

impl<T> fmt::Debug for Signal<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Signal").field(&self.id).finish()
    }
}

impl<T: 'static> Signal<T> {
    pub fn new(value: T) -> Self {
        let id = create_signal_value(value);
        register_signal(id);
        Self {
            id,
            _marker: PhantomData,
        }
    }

    pub(crate) fn from_raw(id: SignalId) -> Self {
        Self {
            id,
            _marker: PhantomData,
        }
    }

    pub fn split(self) -> (ReadSignal<T>, WriteSignal<T>) {
        (ReadSignal { signal: self }, WriteSignal { signal: self })
    }

    pub fn read_only(self) -> ReadSignal<T> {
        ReadSignal { signal: self }
    }

    pub fn with<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&T) -> R,
    {
        track_read(self.id);
        with_signal_value(self.id, f)
    }

    pub fn with_untracked<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&T) -> R,
    {
        with_signal_value(self.id, f)
    }

    /// Whether the owning scope has disposed this signal.
    pub fn is_disposed(&self) -> bool {
        !is_signal_alive(self.id)
    }

    pub(crate) fn dispose(self) {
        forget_signal(self.id);
        dispose_signal(self.id);
    }

    fn notify(&self) {
        notify_write(self.id);
        request_frame();
    }
}

impl<T: Clone + 'static> Signal<T> {
    pub fn get(&self) -> T {
        self.with(T::clone)
    }

    pub fn get_untracked(&self) -> T {
        self.with_untracked(T::clone)
    }
}

impl<T: PartialEq + 'static> Signal<T> {
    /// Sets the signal's value, only triggering updates if the value actually changed.
    pub fn set(&self, value: T) {
        let changed = update_signal_value(self.id, |current: &mut T| {
            if *current != value {
                *current = value;
                true
            } else {
                false
            }
        });
        if changed {
            self.notify();
        }
    }
}

impl<T: PartialEq + Clone + 'static> Signal<T> {
    /// Updates the signal's value using a closure, only triggering updates if the value changed.
    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(&mut T),
    {
        let changed = update_signal_value(self.id, |current: &mut T| {
            let old = current.clone();
            f(current);
            *current != old
        });
        if changed {
            self.notify();
        }
    }
}

/// Read-only handle to a signal.
pub struct ReadSignal<T> {
    signal: Signal<T>,
}

impl<T> Clone for ReadSignal<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for ReadSignal<T> {}

impl<T: Clone + 'static> ReadSignal<T> {
    pub fn get(&self) -> T {
        self.signal.get()
    }

    pub fn get_untracked(&self) -> T {
        self.signal.get_untracked()
    }
}

impl<T: 'static> ReadSignal<T> {
    pub fn with<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&T) -> R,
    {
        self.signal.with(f)
    }

    pub fn with_untracked<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&T) -> R,
    {
        self.signal.with_untracked(f)
    }
}

/// Write-only handle to a signal.
pub struct WriteSignal<T> {
    signal: Signal<T>,
}

impl<T> Clone for WriteSignal<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for WriteSignal<T> {}

impl<T: PartialEq + 'static> WriteSignal<T> {
    /// Sets the signal's value, only triggering updates if the value actually changed.
    pub fn set(&self, value: T) {
        self.signal.set(value);
    }
}

impl<T: PartialEq + Clone + 'static> WriteSignal<T> {
    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(&mut T),
    {
        self.signal.update(f);
    }

    /// Get the current value without tracking (useful for read-modify-write patterns)
    pub fn get(&self) -> T {
        self.signal.get_untracked()
    }
}

pub fn create_signal<T: 'static>(value: T) -> Signal<T> {
    Signal::new(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reactive::reset_reactive;

    #[test]
    fn test_create_signal_and_get() {
        reset_reactive();
        let signal = create_signal(42);
        assert_eq!(signal.get(), 42);
    }

    #[test]
    fn test_set_updates_value() {
        reset_reactive();
        let signal = create_signal(10);
        signal.set(20);
        assert_eq!(signal.get(), 20);
    }

    #[test]
    fn test_update_with_closure() {
        reset_reactive();
        let signal = create_signal(5);
        signal.update(|v| *v += 10);
        assert_eq!(signal.get(), 15);
    }

    #[test]
    fn test_with_for_borrowing() {
        reset_reactive();
        let signal = create_signal(String::from("hello"));
        let length = signal.with(|s| s.len());
        assert_eq!(length, 5);
    }

    #[test]
    fn test_split_into_read_write_handles() {
        reset_reactive();
        let signal = create_signal(7);
        let (read, write) = signal.split();

        assert_eq!(read.get(), 7);
        write.set(14);
        assert_eq!(read.get(), 14);
    }

    #[test]
    fn test_read_only_follows_writes() {
        reset_reactive();
        let signal = create_signal("closed");
        let read = signal.read_only();

        signal.set("open");
        assert_eq!(read.get(), "open");
        assert_eq!(read.with(|value| value.len()), 4);
    }

    #[test]
    fn test_copies_share_underlying_value() {
        reset_reactive();
        let signal1 = create_signal(50);
        let signal2 = signal1;

        signal1.set(75);
        assert_eq!(signal2.get(), 75);
    }

    #[test]
    fn test_set_only_triggers_on_change() {
        reset_reactive();
        take_frame();
        let signal = create_signal(5);
        signal.set(5);
        assert!(!take_frame());
        signal.set(10);
        assert!(take_frame());
    }

    #[test]
    fn test_dispose_marks_signal_dead() {
        reset_reactive();
        let signal = create_signal(1u8);
        assert!(!signal.is_disposed());
        signal.dispose();
        assert!(signal.is_disposed());
    }

    #[test]
    #[should_panic(expected = "read after it was disposed")]
    fn test_read_after_dispose_panics() {
        reset_reactive();
        let signal = create_signal(1u8);
        signal.dispose();
        signal.get();
    }

    fn take_frame() -> bool {
        crate::reactive::take_frame_request()
    }
}
