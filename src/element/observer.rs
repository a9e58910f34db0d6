use crate::reactive::{Signal, create_effect, create_signal, on_cleanup};

use super::element_ref::ElementRef;

/// Track the client height of whatever element `target` holds.
///
/// The returned signal is `None` while nothing is attached. While an element
/// is attached, a resize listener keeps the signal in step with
/// [`Element::client_height`](super::Element::client_height); the listener is
/// released when the element is detached or replaced, and when the current
/// owner is disposed.
pub fn observe_client_height(target: ElementRef) -> Signal<Option<f32>> {
    let height = create_signal(target.current().map(|element| element.client_height()));

    create_effect(move || {
        let Some(element) = target.get() else {
            height.set(None);
            return;
        };

        height.set(Some(element.client_height()));
        let subscription = element.on_resize(move |event| {
            log::trace!("observed client height {}", event.client_height);
            height.set(Some(event.client_height));
        });
        on_cleanup(move || drop(subscription));
    });

    height
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{Element, create_element_ref};
    use crate::reactive::{dispose_owner, reset_reactive, with_owner};

    #[test]
    fn test_detached_ref_has_no_height() {
        reset_reactive();
        let target = create_element_ref();
        let height = observe_client_height(target);
        assert_eq!(height.get(), None);
    }

    #[test]
    fn test_follows_attach_resize_and_detach() {
        reset_reactive();
        let target = create_element_ref();
        let height = observe_client_height(target);

        let element = Element::new("navbar").height(300.0);
        target.attach(element.clone());
        assert_eq!(height.get(), Some(300.0));

        element.set_height(420.0);
        assert_eq!(height.get(), Some(420.0));

        target.detach();
        assert_eq!(height.get(), None);
        assert_eq!(element.resize_listener_count(), 0);
    }

    #[test]
    fn test_replacing_element_moves_listener() {
        reset_reactive();
        let target = create_element_ref();
        let height = observe_client_height(target);

        let first = Element::new("first").height(10.0);
        let second = Element::new("second").height(20.0);
        target.attach(first.clone());
        target.attach(second.clone());

        assert_eq!(first.resize_listener_count(), 0);
        assert_eq!(second.resize_listener_count(), 1);
        first.set_height(99.0);
        assert_eq!(height.get(), Some(20.0));
    }

    #[test]
    fn test_owner_disposal_releases_listener() {
        reset_reactive();
        let element = Element::new("navbar").height(300.0);
        let (_, scope) = with_owner(|| {
            let target = create_element_ref();
            target.attach(element.clone());
            observe_client_height(target)
        });
        assert_eq!(element.resize_listener_count(), 1);

        dispose_owner(scope);
        assert_eq!(element.resize_listener_count(), 0);
    }
}
