use std::cell::RefCell;
use std::collections::{BTreeSet, HashMap, HashSet};

use super::owner::{OwnerId, dispose_owner, with_root_owner};

thread_local! {
    static RUNTIME: RefCell<Runtime> = RefCell::new(Runtime::new());
}

pub type SignalId = usize;
pub type EffectId = usize;

type EffectCallback = Box<dyn FnMut()>;

/// Dependency graph between signals and effects.
///
/// Effect callbacks are taken out of the runtime while they run, so a callback
/// is free to read and write signals (or create new effects) without
/// re-borrowing the runtime.
#[derive(Default)]
pub struct Runtime {
    current_effect: Option<EffectId>,
    pending_effects: BTreeSet<EffectId>,
    effect_callbacks: Vec<Option<EffectCallback>>,
    effect_alive: Vec<bool>,
    /// Owner scope of the last run of each effect, disposed before the next run.
    effect_scopes: Vec<Option<OwnerId>>,
    effect_dependencies: Vec<HashSet<SignalId>>,
    signal_subscribers: HashMap<SignalId, HashSet<EffectId>>,
    batch_depth: usize,
    /// Effect bodies currently on the stack.
    running: usize,
    flushing: bool,
}

impl Runtime {
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate_effect(&mut self, callback: EffectCallback) -> EffectId {
        let id = self.effect_callbacks.len();
        self.effect_callbacks.push(Some(callback));
        self.effect_alive.push(true);
        self.effect_scopes.push(None);
        self.effect_dependencies.push(HashSet::new());
        id
    }

    fn track_read(&mut self, signal_id: SignalId) {
        if let Some(effect_id) = self.current_effect {
            self.signal_subscribers
                .entry(signal_id)
                .or_default()
                .insert(effect_id);
            self.effect_dependencies[effect_id].insert(signal_id);
        }
    }

    fn queue_subscribers(&mut self, signal_id: SignalId) {
        if let Some(subscribers) = self.signal_subscribers.get(&signal_id) {
            self.pending_effects.extend(subscribers.iter().copied());
        }
    }

    fn clear_dependencies(&mut self, effect_id: EffectId) {
        let deps = std::mem::take(&mut self.effect_dependencies[effect_id]);
        for signal_id in deps {
            if let Some(subscribers) = self.signal_subscribers.get_mut(&signal_id) {
                subscribers.remove(&effect_id);
            }
        }
    }

    fn forget_signal(&mut self, signal_id: SignalId) {
        if let Some(subscribers) = self.signal_subscribers.remove(&signal_id) {
            for effect_id in subscribers {
                self.effect_dependencies[effect_id].remove(&signal_id);
            }
        }
    }

    /// Writes made while an effect body runs are flushed after it returns.
    fn should_flush(&self) -> bool {
        self.batch_depth == 0 && !self.flushing && self.running == 0
    }
}

pub fn with_runtime<F, R>(f: F) -> R
where
    F: FnOnce(&mut Runtime) -> R,
{
    RUNTIME.with(|rt| f(&mut rt.borrow_mut()))
}

/// Try to access the runtime, skipping the callback if it is already borrowed.
pub fn try_with_runtime<F>(f: F)
where
    F: FnOnce(&mut Runtime),
{
    RUNTIME.with(|rt| {
        if let Ok(mut runtime) = rt.try_borrow_mut() {
            f(&mut runtime);
        }
    });
}

pub(crate) fn track_read(signal_id: SignalId) {
    try_with_runtime(|rt| rt.track_read(signal_id));
}

/// Queue every effect subscribed to `signal_id` and flush unless a batch or
/// another flush is in progress.
pub(crate) fn notify_write(signal_id: SignalId) {
    let mut flush = false;
    try_with_runtime(|rt| {
        rt.queue_subscribers(signal_id);
        flush = rt.should_flush() && !rt.pending_effects.is_empty();
    });
    if flush {
        flush_effects();
    }
}

/// Flush queued effects unless a batch, a flush or an effect body is in progress.
pub(crate) fn flush_pending() {
    let flush = with_runtime(|rt| rt.should_flush() && !rt.pending_effects.is_empty());
    if flush {
        flush_effects();
    }
}

pub(crate) fn forget_signal(signal_id: SignalId) {
    try_with_runtime(|rt| rt.forget_signal(signal_id));
}

pub(crate) fn allocate_effect(callback: EffectCallback) -> EffectId {
    with_runtime(|rt| rt.allocate_effect(callback))
}

/// Run an effect in a fresh owner scope.
///
/// The scope of the previous run is disposed first, so cleanups registered by
/// that run execute before the new body starts.
pub(crate) fn run_effect(effect_id: EffectId) {
    let taken = with_runtime(|rt| {
        if !rt.effect_alive.get(effect_id).copied().unwrap_or(false) {
            return None;
        }
        let callback = rt.effect_callbacks[effect_id].take()?;
        rt.clear_dependencies(effect_id);
        rt.running += 1;
        let previous_scope = rt.effect_scopes[effect_id].take();
        Some((callback, previous_scope))
    });

    let Some((mut callback, previous_scope)) = taken else {
        return;
    };

    if let Some(scope) = previous_scope {
        dispose_owner(scope);
    }

    let prev_effect = with_runtime(|rt| rt.current_effect.replace(effect_id));
    let ((), scope) = with_root_owner(|| callback());

    let orphaned = with_runtime(|rt| {
        rt.current_effect = prev_effect;
        rt.running -= 1;
        if rt.effect_alive[effect_id] {
            rt.effect_callbacks[effect_id] = Some(callback);
            rt.effect_scopes[effect_id] = Some(scope);
            None
        } else {
            // Disposed from inside its own body.
            rt.clear_dependencies(effect_id);
            Some((callback, scope))
        }
    });

    if let Some((callback, scope)) = orphaned {
        dispose_owner(scope);
        drop(callback);
    }
}

pub(crate) fn dispose_effect(effect_id: EffectId) {
    let released = with_runtime(|rt| {
        let alive = rt.effect_alive.get_mut(effect_id)?;
        if !*alive {
            return None;
        }
        *alive = false;
        rt.clear_dependencies(effect_id);
        rt.pending_effects.remove(&effect_id);
        let callback = rt.effect_callbacks[effect_id].take();
        Some((callback, rt.effect_scopes[effect_id].take()))
    });

    let Some((callback, scope)) = released else {
        return;
    };
    if let Some(scope) = scope {
        dispose_owner(scope);
    }
    // Dropped outside the runtime borrow: the closure may own handles whose
    // destructors dispose effects.
    drop(callback);
}

/// Resets the `flushing` flag even if an effect body panics.
struct FlushGuard;

impl Drop for FlushGuard {
    fn drop(&mut self) {
        try_with_runtime(|rt| rt.flushing = false);
    }
}

pub(crate) fn flush_effects() {
    let start = with_runtime(|rt| {
        if rt.flushing {
            false
        } else {
            rt.flushing = true;
            true
        }
    });
    if !start {
        return;
    }
    let _guard = FlushGuard;

    while let Some(effect_id) = with_runtime(|rt| rt.pending_effects.pop_first()) {
        log::trace!("re-running effect {effect_id}");
        run_effect(effect_id);
    }
}

struct BatchGuard;

impl Drop for BatchGuard {
    fn drop(&mut self) {
        let flush = with_runtime(|rt| {
            rt.batch_depth -= 1;
            rt.should_flush() && !rt.pending_effects.is_empty()
        });
        if flush {
            flush_effects();
        }
    }
}

/// Run `f` with effect execution deferred until the outermost batch ends.
pub fn batch<F, R>(f: F) -> R
where
    F: FnOnce() -> R,
{
    with_runtime(|rt| rt.batch_depth += 1);
    let _guard = BatchGuard;
    f()
}

/// Restores the tracked effect even if the untracked closure panics.
struct UntrackGuard {
    prev: Option<EffectId>,
}

impl Drop for UntrackGuard {
    fn drop(&mut self) {
        let prev = self.prev;
        try_with_runtime(|rt| rt.current_effect = prev);
    }
}

/// Run `f` without recording signal reads as dependencies of the current effect.
pub fn untrack<F, R>(f: F) -> R
where
    F: FnOnce() -> R,
{
    let prev = with_runtime(|rt| rt.current_effect.take());
    let _guard = UntrackGuard { prev };
    f()
}

pub(crate) fn runtime_available() -> bool {
    RUNTIME.try_with(|_| ()).is_ok()
}

pub(crate) fn reset_runtime() {
    let previous = RUNTIME.with(|rt| std::mem::take(&mut *rt.borrow_mut()));
    drop(previous);
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;
    use crate::reactive::{create_effect, create_signal, reset_reactive};

    #[test]
    fn test_batch_defers_effects() {
        reset_reactive();
        let signal = create_signal(0);
        let runs = Rc::new(Cell::new(0));
        let counter = runs.clone();
        create_effect(move || {
            signal.get();
            counter.set(counter.get() + 1);
        });
        assert_eq!(runs.get(), 1);

        batch(|| {
            signal.set(1);
            signal.set(2);
            signal.set(3);
            assert_eq!(runs.get(), 1);
        });
        assert_eq!(runs.get(), 2);
    }

    #[test]
    fn test_nested_batch_flushes_once_at_outermost() {
        reset_reactive();
        let signal = create_signal(0);
        let runs = Rc::new(Cell::new(0));
        let counter = runs.clone();
        create_effect(move || {
            signal.get();
            counter.set(counter.get() + 1);
        });

        batch(|| {
            batch(|| signal.set(1));
            assert_eq!(runs.get(), 1);
            signal.set(2);
        });
        assert_eq!(runs.get(), 2);
    }

    #[test]
    fn test_untrack_skips_dependency() {
        reset_reactive();
        let tracked = create_signal(0);
        let ignored = create_signal(0);
        let runs = Rc::new(Cell::new(0));
        let counter = runs.clone();
        create_effect(move || {
            tracked.get();
            untrack(|| ignored.get());
            counter.set(counter.get() + 1);
        });

        ignored.set(5);
        assert_eq!(runs.get(), 1);
        tracked.set(5);
        assert_eq!(runs.get(), 2);
    }

    #[test]
    fn test_untrack_restores_tracking_after_panic() {
        reset_reactive();
        let tracked = create_signal(0);
        let runs = Rc::new(Cell::new(0));
        let counter = runs.clone();
        create_effect(move || {
            let outcome =
                std::panic::catch_unwind(|| untrack::<_, ()>(|| panic!("untracked body failed")));
            assert!(outcome.is_err());
            tracked.get();
            counter.set(counter.get() + 1);
        });

        tracked.set(1);
        assert_eq!(runs.get(), 2);
    }

    #[test]
    fn test_disposed_callback_may_dispose_other_effects() {
        reset_reactive();
        let trigger = create_signal(0);
        let inner_runs = Rc::new(Cell::new(0));
        let counter = inner_runs.clone();
        let inner = create_effect(move || {
            trigger.get();
            counter.set(counter.get() + 1);
        });

        struct DisposeOnDrop(crate::reactive::Effect);
        impl Drop for DisposeOnDrop {
            fn drop(&mut self) {
                self.0.dispose();
            }
        }

        let held = DisposeOnDrop(inner);
        let outer = create_effect(move || {
            let _held = &held;
        });
        outer.dispose();

        trigger.set(1);
        assert_eq!(inner_runs.get(), 1);
    }

    #[test]
    fn test_effect_disposing_itself_releases_its_closure() {
        reset_reactive();
        let trigger = create_signal(0);
        let released = Rc::new(Cell::new(false));

        struct MarkOnDrop(Rc<Cell<bool>>, crate::reactive::Effect);
        impl Drop for MarkOnDrop {
            fn drop(&mut self) {
                self.1.dispose();
                self.0.set(true);
            }
        }

        let bystander = create_effect(|| {});
        let guard = MarkOnDrop(released.clone(), bystander);
        let slot: Rc<Cell<Option<crate::reactive::Effect>>> = Rc::new(Cell::new(None));
        let this = slot.clone();
        let effect = create_effect(move || {
            let _guard = &guard;
            if trigger.get() > 0
                && let Some(effect) = this.get()
            {
                effect.dispose();
            }
        });
        slot.set(Some(effect));

        trigger.set(1);
        assert!(released.get());
    }

    #[test]
    fn test_write_inside_effect_propagates() {
        reset_reactive();
        let source = create_signal(1);
        let derived = create_signal(0);
        create_effect(move || derived.set(source.get() * 10));

        let seen = Rc::new(Cell::new(0));
        let sink = seen.clone();
        create_effect(move || sink.set(derived.get()));

        assert_eq!(seen.get(), 10);
        source.set(4);
        assert_eq!(seen.get(), 40);
    }
}
