use log::debug;

use super::layout::{LayoutConfig, LayoutNode, TreeLayout};
use super::types::PersonNode;

/// Zoom clamp bounds; out-of-range requests are silently clamped.
pub const ZOOM_MIN: f64 = 0.5;
pub const ZOOM_MAX: f64 = 2.0;

/// Pixels of travel before a pressed node stops counting as a click.
pub const CLICK_SLOP: f64 = 3.0;

#[derive(Clone, Debug)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

/// Pressed-node bookkeeping for click-vs-drag discrimination.
#[derive(Clone, Debug, Default)]
pub struct PressState {
	pub node: Option<usize>,
	pub start_x: f64,
	pub start_y: f64,
	pub moved: bool,
}

/// Tooltip descriptor: text lines anchored at a screen position.
#[derive(Clone, Debug, PartialEq)]
pub struct Tooltip {
	pub lines: Vec<String>,
	pub x: f64,
	pub y: f64,
}

#[derive(Clone, Debug, Default)]
pub struct HoverState {
	pub node: Option<usize>,
	pub tooltip: Option<Tooltip>,
}

/// All widget state for one mounted canvas: the kept normalized tree, the
/// current layout derived from it, and presentation-only view state.
///
/// Interaction never mutates the layout; hover, click, zoom and pan only
/// touch the view fields. Every recompute replaces the layout wholesale.
pub struct FamilyTreeState {
	root: PersonNode,
	pub config: LayoutConfig,
	pub layout: TreeLayout,
	pub transform: ViewTransform,
	pub pan: PanState,
	pub press: PressState,
	pub hover: HoverState,
	pub width: f64,
	pub height: f64,
}

impl FamilyTreeState {
	pub fn new(root: PersonNode, width: f64, height: f64) -> Self {
		let config = LayoutConfig::default();
		let layout = TreeLayout::compute(&root, &config);
		debug!(
			"family tree laid out: {} nodes, {} edges",
			layout.nodes.len(),
			layout.edges.len()
		);
		let transform = ViewTransform {
			x: (width - layout.width) / 2.0,
			y: 0.0,
			k: 1.0,
		};
		Self {
			root,
			config,
			layout,
			transform,
			pan: PanState::default(),
			press: PressState::default(),
			hover: HoverState::default(),
			width,
			height,
		}
	}

	/// Replace the tree wholesale; the old layout and any hover state
	/// referring into it are discarded.
	pub fn set_data(&mut self, root: PersonNode) {
		self.root = root;
		self.recompute();
	}

	/// Full recompute on viewport resize; nothing is adjusted incrementally.
	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
		self.recompute();
	}

	fn recompute(&mut self) {
		self.layout = TreeLayout::compute(&self.root, &self.config);
		debug!(
			"family tree recomputed: {} nodes, {} edges",
			self.layout.nodes.len(),
			self.layout.edges.len()
		);
		// Node indices from the previous layout are meaningless now.
		self.hover = HoverState::default();
		self.press = PressState::default();
	}

	pub fn screen_to_tree(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	/// Index of the node box under a screen position, if any.
	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<usize> {
		let (tx, ty) = self.screen_to_tree(sx, sy);
		let half_width = self.config.node_width / 2.0;
		self.layout.nodes.iter().position(|node| {
			(tx - node.x).abs() <= half_width && ty >= node.y && ty <= node.y + self.config.node_height
		})
	}

	pub fn node(&self, idx: usize) -> Option<&LayoutNode> {
		self.layout.nodes.get(idx)
	}

	/// The clicked node's data, subtree stripped, for the caller's callback.
	pub fn person_at(&self, idx: usize) -> Option<PersonNode> {
		self.layout.nodes.get(idx).map(|node| node.person.clone())
	}

	pub fn set_hover(&mut self, node: Option<usize>) {
		if self.hover.node == node {
			return;
		}
		self.hover.node = node;
		self.hover.tooltip = node.and_then(|idx| self.tooltip_for(idx));
	}

	fn tooltip_for(&self, idx: usize) -> Option<Tooltip> {
		let node = self.layout.nodes.get(idx)?;
		let mut lines = vec![node.person.display_name()];
		let lifespan = node.person.lifespan();
		if !lifespan.is_empty() {
			lines.push(lifespan);
		}
		if !node.person.relationship_to_user.is_empty() {
			lines.push(node.person.relationship_to_user.clone());
		}
		if node.person.is_current_user {
			lines.push("This is you".into());
		}
		Some(Tooltip {
			lines,
			x: node.x * self.transform.k + self.transform.x,
			y: node.y * self.transform.k + self.transform.y,
		})
	}

	pub fn zoom(&self) -> f64 {
		self.transform.k
	}

	/// Set the zoom level, clamped to [`ZOOM_MIN`, `ZOOM_MAX`], keeping the
	/// viewport center fixed.
	pub fn set_zoom(&mut self, k: f64) {
		self.zoom_at(k, self.width / 2.0, self.height / 2.0);
	}

	/// Multiply the zoom level, anchored at a screen position.
	pub fn zoom_by(&mut self, factor: f64, sx: f64, sy: f64) {
		self.zoom_at(self.transform.k * factor, sx, sy);
	}

	fn zoom_at(&mut self, k: f64, sx: f64, sy: f64) {
		let k = k.clamp(ZOOM_MIN, ZOOM_MAX);
		let ratio = k / self.transform.k;
		self.transform.x = sx - (sx - self.transform.x) * ratio;
		self.transform.y = sy - (sy - self.transform.y) * ratio;
		self.transform.k = k;
	}
}
