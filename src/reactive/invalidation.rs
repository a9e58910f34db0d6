use std::cell::Cell;

use bitflags::bitflags;

bitflags! {
    /// Flags indicating what aspects of rendering need to be updated
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct ChangeFlags: u8 {
        /// Geometry changed (an element was resized)
        const NEEDS_LAYOUT = 0b01;
        /// Visual state changed (scroll offset, derived flags)
        const NEEDS_PAINT  = 0b10;
    }
}

thread_local! {
    static FRAME_REQUESTED: Cell<bool> = const { Cell::new(false) };
    static CHANGE_FLAGS: Cell<ChangeFlags> = const { Cell::new(ChangeFlags::empty()) };
}

/// Ask the host to produce a new frame.
///
/// Every signal write that changes a value calls this. Hosts poll
/// [`take_frame_request`] once per tick.
pub fn request_frame() {
    FRAME_REQUESTED.with(|flag| flag.set(true));
}

/// Returns whether a frame was requested since the last call, clearing the request.
pub fn take_frame_request() -> bool {
    FRAME_REQUESTED.with(|flag| flag.replace(false))
}

/// Record that layout and/or paint is stale and request a frame.
pub fn mark_changed(flags: ChangeFlags) {
    CHANGE_FLAGS.with(|current| current.set(current.get() | flags));
    request_frame();
}

/// Returns the accumulated change flags, clearing them.
pub fn take_change_flags() -> ChangeFlags {
    CHANGE_FLAGS.with(|current| current.replace(ChangeFlags::empty()))
}

pub(crate) fn reset_invalidation() {
    FRAME_REQUESTED.with(|flag| flag.set(false));
    CHANGE_FLAGS.with(|current| current.set(ChangeFlags::empty()));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mark_changed_accumulates_until_taken() {
        reset_invalidation();
        mark_changed(ChangeFlags::NEEDS_PAINT);
        mark_changed(ChangeFlags::NEEDS_LAYOUT);

        assert_eq!(
            take_change_flags(),
            ChangeFlags::NEEDS_LAYOUT | ChangeFlags::NEEDS_PAINT
        );
        assert!(take_change_flags().is_empty());
    }

    #[test]
    fn test_mark_changed_requests_frame() {
        reset_invalidation();
        assert!(!take_frame_request());
        mark_changed(ChangeFlags::NEEDS_PAINT);
        assert!(take_frame_request());
        assert!(!take_frame_request());
    }
}
