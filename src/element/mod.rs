//! In-memory element model.
//!
//! Components never own elements; they observe them through an
//! [`ElementRef`] that the renderer fills in.

mod element_ref;
mod node;
mod observer;

pub use element_ref::{ElementRef, create_element_ref, use_dom_ref};
pub use node::{
    Edges, Element, ListenerId, ResizeEvent, ResizeSubscription, ScrollEvent, ScrollSubscription,
};
pub use observer::observe_client_height;
