use super::owner::register_effect;
use super::runtime::{EffectId, allocate_effect, dispose_effect, flush_pending, run_effect};

/// Handle to a running effect.
///
/// Effects live until their owner is disposed or [`Effect::dispose`] is
/// called. Dropping the handle does not stop the effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Effect {
    id: EffectId,
}

impl Effect {
    pub fn new<F>(f: F) -> Self
    where
        F: FnMut() + 'static,
    {
        let id = allocate_effect(Box::new(f));
        register_effect(id);
        run_effect(id);
        flush_pending();
        Self { id }
    }

    pub(crate) fn from_id(id: EffectId) -> Self {
        Self { id }
    }

    /// Stop the effect and run the cleanups registered by its last run.
    pub fn dispose(self) {
        dispose_effect(self.id);
    }
}

/// Create an effect that runs now and again whenever a signal it read changes.
pub fn create_effect<F>(f: F) -> Effect
where
    F: FnMut() + 'static,
{
    Effect::new(f)
}
