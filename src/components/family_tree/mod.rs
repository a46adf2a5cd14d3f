mod component;
mod layout;
mod normalize;
mod render;
mod state;
mod types;

pub use component::FamilyTreeCanvas;
pub use layout::{Edge, LayoutConfig, LayoutNode, TreeLayout};
pub use normalize::normalize;
pub use state::{FamilyTreeState, ZOOM_MAX, ZOOM_MIN};
pub use types::{Gender, PersonNode};
