// Lets `navkit-macros` output refer to `::navkit` from inside this crate.
extern crate self as navkit;

pub mod children;
pub mod element;
pub mod navbar;
pub mod reactive;
pub mod style;

pub use navkit_macros::SignalFields;

pub mod prelude {
    pub use crate::SignalFields;
    pub use crate::children::{Children, ComponentKind, Node, children, pick_child};
    pub use crate::element::{
        Edges, Element, ElementRef, ScrollEvent, ScrollSubscription, create_element_ref,
        observe_client_height, use_dom_ref,
    };
    pub use crate::navbar::{
        CollapseProps, NavbarCollapse, NavbarCollapseItem, NavbarContext, NavbarState,
        UseNavbarCollapseReturn, navbar_collapse_item, provide_navbar_context,
        use_navbar_collapse, use_navbar_context,
    };
    pub use crate::reactive::{
        Effect, Memo, ReadSignal, Signal, WriteSignal, batch, create_effect, create_memo,
        create_signal, on_cleanup, untrack,
    };
    pub use crate::style::{HEIGHT, MAX_HEIGHT, OPACITY, OVERFLOW_Y, Style, StyleValue, merge_styles};
}
