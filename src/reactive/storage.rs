use std::any::Any;
use std::cell::RefCell;
use std::rc::Rc;

use super::runtime::SignalId;

type SignalValue = Rc<RefCell<Box<dyn Any>>>;

thread_local! {
    static STORAGE: RefCell<SignalStorage> = RefCell::new(SignalStorage::new());
}

struct SignalStorage {
    values: Vec<Option<SignalValue>>,
}

impl SignalStorage {
    fn new() -> Self {
        Self { values: Vec::new() }
    }
}

fn slot(id: SignalId) -> SignalValue {
    STORAGE.with(|storage| {
        storage
            .borrow()
            .values
            .get(id)
            .and_then(Clone::clone)
            .unwrap_or_else(|| panic!("signal {id} read after it was disposed"))
    })
}

/// Create a new signal value and return its ID.
pub(crate) fn create_signal_value<T: 'static>(value: T) -> SignalId {
    STORAGE.with(|storage| {
        let mut storage = storage.borrow_mut();
        let id = storage.values.len();
        let boxed: Box<dyn Any> = Box::new(value);
        storage.values.push(Some(Rc::new(RefCell::new(boxed))));
        id
    })
}

/// Borrow a signal's value for reading.
pub(crate) fn with_signal_value<T: 'static, R>(id: SignalId, f: impl FnOnce(&T) -> R) -> R {
    let cell = slot(id);
    let guard = cell.borrow();
    f(guard
        .downcast_ref::<T>()
        .expect("signal value type mismatch"))
}

/// Mutate a signal's value, returning the closure's result.
pub(crate) fn update_signal_value<T: 'static, R>(id: SignalId, f: impl FnOnce(&mut T) -> R) -> R {
    let cell = slot(id);
    let mut guard = cell.borrow_mut();
    f(guard
        .downcast_mut::<T>()
        .expect("signal value type mismatch"))
}

pub(crate) fn is_signal_alive(id: SignalId) -> bool {
    STORAGE.with(|storage| {
        storage
            .borrow()
            .values
            .get(id)
            .is_some_and(|value| value.is_some())
    })
}

pub(crate) fn dispose_signal(id: SignalId) {
    let value = STORAGE.with(|storage| {
        storage
            .borrow_mut()
            .values
            .get_mut(id)
            .and_then(Option::take)
    });
    // Dropped outside the storage borrow: the value may own handles whose
    // destructors touch signals.
    drop(value);
}

pub(crate) fn storage_available() -> bool {
    STORAGE.try_with(|_| ()).is_ok()
}

pub(crate) fn reset_storage() {
    let values = STORAGE.with(|storage| std::mem::take(&mut storage.borrow_mut().values));
    drop(values);
}
