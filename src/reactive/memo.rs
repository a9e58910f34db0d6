use super::effect::create_effect;
use super::runtime::untrack;
use super::signal::{Signal, create_signal};

/// Eager computed value that recomputes immediately when dependencies change.
///
/// A `Memo<T>` only notifies downstream subscribers when the computed result
/// actually differs (`PartialEq`), which keeps dependents from re-running on
/// recomputations that produce the same value.
///
/// ```ignore
/// let height = create_signal(Some(240.0));
/// let style = create_memo(move || derive_style(height.get()));
/// ```
pub struct Memo<T> {
    signal: Signal<T>,
}

impl<T> Clone for Memo<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Memo<T> {}

/// Create an eagerly-evaluated memo that recomputes when dependencies change.
pub fn create_memo<T, F>(f: F) -> Memo<T>
where
    T: Clone + PartialEq + 'static,
    F: Fn() -> T + 'static,
{
    let signal = create_signal(untrack(&f));
    // The first run computes the same value again; set() skips the notification.
    create_effect(move || signal.set(f()));
    Memo { signal }
}

impl<T: Clone + PartialEq + 'static> Memo<T> {
    /// Get the current memo value (tracked).
    pub fn get(&self) -> T {
        self.signal.get()
    }

    pub fn get_untracked(&self) -> T {
        self.signal.get_untracked()
    }

    /// Borrow the current value (tracked).
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        self.signal.with(f)
    }
}
