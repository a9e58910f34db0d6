//! Reactive ownership for automatic resource cleanup.
//!
//! Signals and effects belong to the owner that was current when they were
//! created. Disposing an owner tears down everything it owns: child owners
//! first, then `on_cleanup` callbacks (last registered runs first), then
//! effects, then signals.
//!
//! Every effect run also gets its own owner scope. Cleanups registered while
//! an effect body runs are executed right before the next run of that effect
//! and when the effect is disposed.
//!
//! ```ignore
//! let (_, scope) = with_owner(|| {
//!     let open = create_signal(false);
//!     create_effect(move || {
//!         let subscription = element.on_scroll(|_| {});
//!         on_cleanup(move || drop(subscription));
//!         open.get();
//!     });
//! });
//!
//! dispose_owner(scope);
//! ```

use std::cell::RefCell;

use super::effect::Effect;
use super::runtime::{EffectId, SignalId};
use super::signal::Signal;

/// Unique identifier for an owner in the owner arena.
pub type OwnerId = usize;

struct Owner {
    signals: Vec<SignalId>,
    effects: Vec<EffectId>,
    cleanups: Vec<Box<dyn FnOnce()>>,
    children: Vec<OwnerId>,
}

impl Owner {
    fn new() -> Self {
        Self {
            signals: Vec::new(),
            effects: Vec::new(),
            cleanups: Vec::new(),
            children: Vec::new(),
        }
    }
}

/// Arena-based storage for owners.
struct OwnerArena {
    owners: Vec<Option<Owner>>,
}

impl OwnerArena {
    fn new() -> Self {
        Self { owners: Vec::new() }
    }

    fn allocate(&mut self, parent: Option<OwnerId>) -> OwnerId {
        let id = self.owners.len();
        self.owners.push(Some(Owner::new()));
        if let Some(parent_id) = parent
            && let Some(parent_owner) = self.get_mut(parent_id)
        {
            parent_owner.children.push(id);
        }
        id
    }

    fn get_mut(&mut self, id: OwnerId) -> Option<&mut Owner> {
        self.owners.get_mut(id).and_then(|o| o.as_mut())
    }

    fn take(&mut self, id: OwnerId) -> Option<Owner> {
        self.owners.get_mut(id).and_then(|o| o.take())
    }
}

thread_local! {
    static CURRENT_OWNER: RefCell<Option<OwnerId>> = const { RefCell::new(None) };
    static OWNERS: RefCell<OwnerArena> = RefCell::new(OwnerArena::new());
}

fn run_in_owner<T>(owner_id: OwnerId, f: impl FnOnce() -> T) -> T {
    let prev_owner = CURRENT_OWNER.with(|current| current.borrow_mut().replace(owner_id));
    let result = f();
    CURRENT_OWNER.with(|current| *current.borrow_mut() = prev_owner);
    result
}

/// Execute a closure within a new owner scope nested under the current one.
///
/// Returns the closure's result and the new owner's ID.
pub fn with_owner<T>(f: impl FnOnce() -> T) -> (T, OwnerId) {
    let parent = current_owner();
    let owner_id = OWNERS.with(|owners| owners.borrow_mut().allocate(parent));
    (run_in_owner(owner_id, f), owner_id)
}

/// Execute a closure within a new owner scope that has no parent.
///
/// Used for effect runs, whose scopes are disposed by the effect itself.
pub(crate) fn with_root_owner<T>(f: impl FnOnce() -> T) -> (T, OwnerId) {
    let owner_id = OWNERS.with(|owners| owners.borrow_mut().allocate(None));
    (run_in_owner(owner_id, f), owner_id)
}

/// Get the current owner ID, if any.
pub fn current_owner() -> Option<OwnerId> {
    CURRENT_OWNER.with(|current| *current.borrow())
}

/// Dispose an owner and all its resources.
///
/// Disposing an owner that is already gone is a no-op.
pub fn dispose_owner(id: OwnerId) {
    let Some(owner) = OWNERS.with(|owners| owners.borrow_mut().take(id)) else {
        return;
    };

    for child_id in owner.children {
        dispose_owner(child_id);
    }

    for cleanup in owner.cleanups.into_iter().rev() {
        cleanup();
    }

    for effect_id in owner.effects {
        Effect::from_id(effect_id).dispose();
    }

    for signal_id in owner.signals {
        Signal::<()>::from_raw(signal_id).dispose();
    }
}

/// Register a cleanup callback to run when the current owner is disposed.
///
/// Inside an effect body this runs before the effect's next run. Outside any
/// owner scope the callback is dropped without running.
pub fn on_cleanup(f: impl FnOnce() + 'static) {
    let Some(owner_id) = current_owner() else {
        log::trace!("on_cleanup called outside an owner scope");
        return;
    };
    OWNERS.with(|owners| {
        if let Some(owner) = owners.borrow_mut().get_mut(owner_id) {
            owner.cleanups.push(Box::new(f));
        }
    });
}

pub(crate) fn register_signal(id: SignalId) {
    if let Some(owner_id) = current_owner() {
        OWNERS.with(|owners| {
            if let Some(owner) = owners.borrow_mut().get_mut(owner_id) {
                owner.signals.push(id);
            }
        });
    }
}

pub(crate) fn register_effect(id: EffectId) {
    if let Some(owner_id) = current_owner() {
        OWNERS.with(|owners| {
            if let Some(owner) = owners.borrow_mut().get_mut(owner_id) {
                owner.effects.push(id);
            }
        });
    }
}

pub(crate) fn owners_available() -> bool {
    OWNERS.try_with(|_| ()).is_ok() && CURRENT_OWNER.try_with(|_| ()).is_ok()
}

pub(crate) fn reset_owners() {
    CURRENT_OWNER.with(|current| *current.borrow_mut() = None);
    let previous = OWNERS.with(|owners| std::mem::replace(&mut *owners.borrow_mut(), OwnerArena::new()));
    drop(previous);
}
