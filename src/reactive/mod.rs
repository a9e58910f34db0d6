pub mod context;
pub mod effect;
pub mod invalidation;
pub mod memo;
pub mod owner;
pub mod runtime;
pub mod signal;
mod storage;

pub use context::{
    expect_context, has_context, provide_context, provide_signal_context, use_context, with_context,
};
pub use effect::{Effect, create_effect};
pub use invalidation::{ChangeFlags, mark_changed, request_frame, take_change_flags, take_frame_request};
pub use memo::{Memo, create_memo};
pub use owner::{OwnerId, current_owner, dispose_owner, on_cleanup, with_owner};
pub use runtime::{batch, untrack};
pub use signal::{ReadSignal, Signal, WriteSignal, create_signal};

/// Whether the reactive system can still be used on this thread.
///
/// Returns `false` once thread-local storage is being torn down at thread
/// exit; destructors that dispose reactive resources check this first.
pub fn is_available() -> bool {
    owner::owners_available() && runtime::runtime_available() && storage::storage_available()
}

/// Reset all reactive system state on the current thread.
///
/// Signals, effects and owners created before the reset must not be used
/// afterwards.
pub fn reset_reactive() {
    owner::reset_owners();
    runtime::reset_runtime();
    storage::reset_storage();
    invalidation::reset_invalidation();
    context::reset_contexts();
}
