//! Context values shared across a component tree.
//!
//! Context lets an ancestor (the navbar) hand values to descendants (the
//! collapse panel) without threading them through every constructor. Values
//! are keyed by their concrete type, one value per type.
//!
//! Storage is a `Vec<(TypeId, Box<dyn Any>)>` with a linear scan. A tree holds
//! a handful of context values, so this beats a hash map.
//!
//! Storing a `Signal<T>` (or a struct of signals) as context is the pattern
//! for mutable shared state: readers track the signal as usual.

use std::any::{Any, TypeId};
use std::cell::RefCell;

use super::signal::{Signal, create_signal};

thread_local! {
    static CONTEXTS: RefCell<Vec<(TypeId, Box<dyn Any>)>> = const { RefCell::new(Vec::new()) };
}

/// Store a value in the context, keyed by its type. Replaces an existing value of that type.
pub fn provide_context<T: 'static>(value: T) {
    let type_id = TypeId::of::<T>();
    CONTEXTS.with(|ctx| {
        let mut ctx = ctx.borrow_mut();
        if let Some(entry) = ctx.iter_mut().find(|entry| entry.0 == type_id) {
            entry.1 = Box::new(value);
        } else {
            ctx.push((type_id, Box::new(value)));
        }
    });
}

/// Retrieve a clone of a context value by type, or `None` if it was never provided.
pub fn use_context<T: Clone + 'static>() -> Option<T> {
    with_context::<T, _>(T::clone)
}

/// Retrieve a context value by type, panicking if it was not provided.
///
/// # Panics
///
/// Panics with the type name if the context is missing.
pub fn expect_context<T: Clone + 'static>() -> T {
    use_context::<T>().unwrap_or_else(|| {
        panic!(
            "Context not found for type `{}`.\n\
             Did you forget to call provide_context() in an ancestor?",
            std::any::type_name::<T>()
        )
    })
}

/// Borrow a context value without cloning.
pub fn with_context<T: 'static, R>(f: impl FnOnce(&T) -> R) -> Option<R> {
    let type_id = TypeId::of::<T>();
    CONTEXTS.with(|ctx| {
        let ctx = ctx.borrow();
        ctx.iter()
            .find(|entry| entry.0 == type_id)
            .and_then(|entry| entry.1.downcast_ref::<T>())
            .map(f)
    })
}

/// Check if a context value of type `T` has been provided.
pub fn has_context<T: 'static>() -> bool {
    let type_id = TypeId::of::<T>();
    CONTEXTS.with(|ctx| ctx.borrow().iter().any(|entry| entry.0 == type_id))
}

/// Provide a `Signal<T>` context wrapping the given value and return the signal.
pub fn provide_signal_context<T: Clone + PartialEq + 'static>(value: T) -> Signal<T> {
    let signal = create_signal(value);
    provide_context(signal);
    signal
}

pub(crate) fn reset_contexts() {
    let contexts = CONTEXTS.with(|ctx| std::mem::take(&mut *ctx.borrow_mut()));
    drop(contexts);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reactive::reset_reactive;

    #[derive(Clone, Debug, PartialEq)]
    struct Theme {
        accent: &'static str,
    }

    #[test]
    fn test_provide_and_use_context() {
        reset_reactive();
        provide_context(Theme { accent: "blue" });
        assert_eq!(use_context::<Theme>(), Some(Theme { accent: "blue" }));
    }

    #[test]
    fn test_use_context_returns_none_when_missing() {
        reset_reactive();
        assert_eq!(use_context::<Theme>(), None);
        assert!(!has_context::<Theme>());
    }

    #[test]
    #[should_panic(expected = "Context not found for type")]
    fn test_expect_context_panics_when_missing() {
        reset_reactive();
        expect_context::<Theme>();
    }

    #[test]
    fn test_with_context_borrows_without_clone() {
        reset_reactive();
        provide_context(vec![1, 2, 3]);
        let sum = with_context::<Vec<i32>, _>(|v| v.iter().sum::<i32>());
        assert_eq!(sum, Some(6));
    }

    #[test]
    fn test_provide_replaces_existing() {
        reset_reactive();
        provide_context(10u32);
        provide_context(20u32);
        assert_eq!(use_context::<u32>(), Some(20));
    }

    #[test]
    fn test_provide_signal_context_shares_signal() {
        reset_reactive();
        let signal = provide_signal_context(false);
        let retrieved = expect_context::<Signal<bool>>();
        signal.set(true);
        assert!(retrieved.get());
    }
}
