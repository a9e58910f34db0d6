//! Navbar components.

mod collapse;
mod collapse_item;
mod context;

pub use collapse::{
    CollapseProps, NavbarCollapse, PanelState, PanelStateSignals, PanelStateWriters,
    UseNavbarCollapseReturn, use_navbar_collapse,
};
pub use collapse_item::{NavbarCollapseItem, navbar_collapse_item};
pub use context::{NavbarContext, NavbarState, provide_navbar_context, use_navbar_context};
