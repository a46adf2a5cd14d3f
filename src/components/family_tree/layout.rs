//! Generational ("tidy tree") layout for normalized family trees.
//!
//! Nodes at the same generation share a row: `y = depth * (node_height +
//! generation_gap)`. Horizontal positions come from a post-order walk over
//! an arena of flattened slots: child subtrees are packed left to right by
//! merging per-row contours so no two boxes in a row overlap, and each
//! parent is centered over its first and last child.
//!
//! Partners are injected into the working child list as pseudo-children
//! flagged `is_partner`. They take a horizontal slot next to the real
//! children but keep the parent's depth; a spouse is not a generation.
//! Because a partner occupies its spouse's row, the walk pushes it clear
//! of the spouse's box before the row contour is handed upward, so later
//! siblings pack around it.
//!
//! Zoom never participates here; it is a pure scale factor the renderer
//! applies on top of these coordinates.

use std::collections::{BTreeMap, HashSet};

use super::types::PersonNode;

/// Geometry knobs for the layout. All distances are unscaled pixels.
#[derive(Clone, Debug)]
pub struct LayoutConfig {
	pub node_width: f64,
	pub node_height: f64,
	/// Minimum horizontal clearance between sibling boxes.
	pub sibling_gap: f64,
	/// Vertical clearance between generation rows.
	pub generation_gap: f64,
	/// How far a partner connector dips below the shared row.
	pub partner_drop: f64,
	pub margin: f64,
}

impl Default for LayoutConfig {
	fn default() -> Self {
		Self {
			node_width: 148.0,
			node_height: 56.0,
			sibling_gap: 28.0,
			generation_gap: 88.0,
			partner_drop: 26.0,
			margin: 40.0,
		}
	}
}

/// A laid-out vertex: the person's own fields plus box coordinates.
/// `x` is the box center, `y` the box top. Rebuilt from scratch on every
/// data or dimension change, never adjusted incrementally.
#[derive(Clone, Debug)]
pub struct LayoutNode {
	pub person: PersonNode,
	pub x: f64,
	pub y: f64,
	pub depth: u32,
	pub is_partner: bool,
}

/// Line work emitted alongside the nodes.
#[derive(Clone, Debug, PartialEq)]
pub enum Edge {
	/// Connector from a parent's box bottom to a child's box top.
	ParentChild { x1: f64, y1: f64, x2: f64, y2: f64 },
	/// Right-angle connector linking two partners: down from each box
	/// bottom at `y`, joined horizontally at `y + drop`.
	Partner { x1: f64, x2: f64, y: f64, drop: f64 },
}

/// One full layout pass over a normalized tree.
#[derive(Clone, Debug, Default)]
pub struct TreeLayout {
	pub nodes: Vec<LayoutNode>,
	pub edges: Vec<Edge>,
	/// Unscaled extent of the laid-out content, margins included.
	pub width: f64,
	pub height: f64,
}

impl TreeLayout {
	/// Lay out `root` with the given geometry.
	///
	/// A root with no children or partners yields a single node and no
	/// edges. A duplicated id across branches is placed once; later
	/// occurrences are skipped.
	pub fn compute(root: &PersonNode, config: &LayoutConfig) -> Self {
		let mut builder = Builder {
			config,
			slots: Vec::new(),
			seen: HashSet::new(),
		};
		if builder.build(root, 0, false).is_none() {
			return Self::default();
		}
		builder.assign_x(0);
		builder.finish()
	}
}

/// Working vertex during the layout pass.
struct Slot {
	card: PersonNode,
	/// Generation row (partners share their spouse's row).
	depth: u32,
	children: Vec<usize>,
	is_partner: bool,
	/// Exclusive end of this slot's contiguous subtree range in the arena.
	subtree_end: usize,
	x: f64,
}

struct Builder<'a> {
	config: &'a LayoutConfig,
	slots: Vec<Slot>,
	seen: HashSet<String>,
}

impl Builder<'_> {
	/// Flatten the tree depth-first so every subtree occupies a contiguous
	/// slot range. Returns `None` for an id already placed elsewhere.
	fn build(&mut self, person: &PersonNode, depth: u32, is_partner: bool) -> Option<usize> {
		if !person.id.is_empty() && !self.seen.insert(person.id.clone()) {
			return None;
		}

		let slot = self.slots.len();
		let mut card = person.card();
		card.is_partner = card.is_partner || is_partner;
		self.slots.push(Slot {
			card,
			depth,
			children: Vec::new(),
			is_partner,
			subtree_end: slot + 1,
			x: 0.0,
		});

		let mut children = Vec::new();
		for child in &person.children {
			if let Some(placed) = self.build(child, depth + 1, false) {
				children.push(placed);
			}
		}
		// Partners append after the real children and keep this row's depth.
		for partner in &person.partners {
			if let Some(placed) = self.build(partner, depth, true) {
				children.push(placed);
			}
		}

		self.slots[slot].children = children;
		self.slots[slot].subtree_end = self.slots.len();
		Some(slot)
	}

	/// Post-order x assignment: pack each child subtree to the right of the
	/// merged contour of its left siblings, center the parent, then push
	/// this node's partners clear of its own box.
	fn assign_x(&mut self, v: usize) {
		let children = self.slots[v].children.clone();
		for &child in &children {
			self.assign_x(child);
		}

		let min_sep = self.config.node_width + self.config.sibling_gap;
		if children.is_empty() {
			self.slots[v].x = 0.0;
		} else {
			let mut merged: BTreeMap<u32, (f64, f64)> = BTreeMap::new();
			for &child in &children {
				let contour = self.contour(child);
				let mut shift = 0.0f64;
				for (row, (child_min, _)) in &contour {
					if let Some((_, merged_max)) = merged.get(row) {
						shift = shift.max(merged_max + min_sep - child_min);
					}
				}
				if shift > 0.0 {
					self.shift_subtree(child, shift);
				}
				for (row, (child_min, child_max)) in contour {
					let entry = merged.entry(row).or_insert((f64::INFINITY, f64::NEG_INFINITY));
					entry.0 = entry.0.min(child_min + shift);
					entry.1 = entry.1.max(child_max + shift);
				}
			}

			let first = self.slots[children[0]].x;
			let last = self.slots[children[children.len() - 1]].x;
			self.slots[v].x = (first + last) / 2.0;
		}

		// Centering can land this box on a partner sharing its row; shift
		// partners right before the contour is handed to the level above.
		let mut row_edge = self.slots[v].x;
		for &child in &children {
			if self.slots[child].is_partner {
				let overlap = row_edge + min_sep - self.slots[child].x;
				if overlap > 0.0 {
					self.shift_subtree(child, overlap);
				}
				row_edge = self.slots[child].x;
			}
		}
	}

	/// Per-row horizontal extent of a subtree's box centers, the subtree's
	/// own root and any raised partners included.
	fn contour(&self, v: usize) -> BTreeMap<u32, (f64, f64)> {
		let mut rows: BTreeMap<u32, (f64, f64)> = BTreeMap::new();
		for slot in &self.slots[v..self.slots[v].subtree_end] {
			let entry = rows.entry(slot.depth).or_insert((slot.x, slot.x));
			entry.0 = entry.0.min(slot.x);
			entry.1 = entry.1.max(slot.x);
		}
		rows
	}

	fn shift_subtree(&mut self, v: usize, dx: f64) {
		let end = self.slots[v].subtree_end;
		for slot in &mut self.slots[v..end] {
			slot.x += dx;
		}
	}

	fn finish(self) -> TreeLayout {
		let config = self.config;
		let row_y =
			|depth: u32| config.margin + depth as f64 * (config.node_height + config.generation_gap);

		let min_x = self.slots.iter().map(|s| s.x).fold(f64::INFINITY, f64::min);
		let offset = config.margin + config.node_width / 2.0 - min_x;

		let mut edges = Vec::new();
		for slot in &self.slots {
			for &child in &slot.children {
				let target = &self.slots[child];
				if target.is_partner {
					edges.push(Edge::Partner {
						x1: slot.x + offset,
						x2: target.x + offset,
						y: row_y(slot.depth) + config.node_height,
						drop: config.partner_drop,
					});
				} else {
					edges.push(Edge::ParentChild {
						x1: slot.x + offset,
						y1: row_y(slot.depth) + config.node_height,
						x2: target.x + offset,
						y2: row_y(target.depth),
					});
				}
			}
		}

		let max_x = self.slots.iter().map(|s| s.x).fold(f64::NEG_INFINITY, f64::max);
		let max_depth = self.slots.iter().map(|s| s.depth).max().unwrap_or(0);

		let nodes = self
			.slots
			.into_iter()
			.map(|slot| LayoutNode {
				x: slot.x + offset,
				y: row_y(slot.depth),
				depth: slot.depth,
				is_partner: slot.is_partner,
				person: slot.card,
			})
			.collect();

		TreeLayout {
			nodes,
			edges,
			width: max_x + offset + config.node_width / 2.0 + config.margin,
			height: row_y(max_depth) + config.node_height + config.margin,
		}
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;

	fn person(id: &str, name: &str) -> PersonNode {
		PersonNode {
			id: id.into(),
			first_name: name.into(),
			..PersonNode::default()
		}
	}

	fn min_sep(config: &LayoutConfig) -> f64 {
		config.node_width + config.sibling_gap
	}

	/// Collect node centers per row and assert pairwise clearance.
	fn assert_rows_clear(layout: &TreeLayout, config: &LayoutConfig) {
		let mut rows: BTreeMap<u32, Vec<f64>> = BTreeMap::new();
		for node in &layout.nodes {
			rows.entry(node.depth).or_default().push(node.x);
		}
		for xs in rows.values_mut() {
			xs.sort_by(|a, b| a.partial_cmp(b).unwrap());
			for pair in xs.windows(2) {
				assert!(
					pair[1] - pair[0] >= min_sep(config) - 1e-6,
					"row neighbors too close: {} vs {}",
					pair[0],
					pair[1]
				);
			}
		}
	}

	#[test]
	fn single_node_tree_has_no_edges() {
		let layout = TreeLayout::compute(&person("1", "Only"), &LayoutConfig::default());
		assert_eq!(layout.nodes.len(), 1);
		assert_eq!(layout.edges.len(), 0);
		assert_eq!(layout.nodes[0].depth, 0);
	}

	#[test]
	fn depth_counts_generations_not_partners() {
		let mut root = person("1", "Root");
		root.partners.push(person("p", "Partner"));
		for child_id in ["2", "3"] {
			let mut child = person(child_id, "Child");
			child.children.push(person(&format!("{child_id}g"), "Grandchild"));
			root.children.push(child);
		}

		let layout = TreeLayout::compute(&root, &LayoutConfig::default());
		for node in &layout.nodes {
			match node.person.id.as_str() {
				"1" => assert_eq!(node.depth, 0),
				"p" => assert_eq!(node.depth, 0),
				"2" | "3" => assert_eq!(node.depth, 1),
				other => {
					assert!(other.ends_with('g'));
					assert_eq!(node.depth, 2);
				}
			}
		}
	}

	#[test]
	fn partner_rows_share_vertical_position() {
		let mut root = person("1", "Root");
		root.partners.push(person("2", "Partner"));
		let layout = TreeLayout::compute(&root, &LayoutConfig::default());
		assert_eq!(layout.nodes[0].y, layout.nodes[1].y);
	}

	#[test]
	fn one_partner_one_connector_no_child_edge() {
		let mut root = person("1", "Root");
		root.partners.push(person("2", "Partner"));

		let layout = TreeLayout::compute(&root, &LayoutConfig::default());
		assert_eq!(layout.edges.len(), 1);
		assert!(matches!(layout.edges[0], Edge::Partner { .. }));
		assert!(layout.nodes[1].is_partner);
		assert!(layout.nodes[1].person.is_partner);
	}

	#[test]
	fn partner_with_children_keeps_its_descendants() {
		let mut partner = person("2", "Partner");
		partner.children.push(person("3", "Step Child"));
		let mut root = person("1", "Root");
		root.partners.push(partner);

		let layout = TreeLayout::compute(&root, &LayoutConfig::default());
		assert_eq!(layout.nodes.len(), 3);

		let child = layout.nodes.iter().find(|n| n.person.id == "3").unwrap();
		assert_eq!(child.depth, 1);
		let parent_child_edges = layout
			.edges
			.iter()
			.filter(|e| matches!(e, Edge::ParentChild { .. }))
			.count();
		assert_eq!(parent_child_edges, 1);
	}

	#[test]
	fn childless_partner_gets_connector_only() {
		let mut root = person("1", "Root");
		root.children.push(person("2", "Child"));
		root.partners.push(person("3", "Partner"));

		let layout = TreeLayout::compute(&root, &LayoutConfig::default());
		let partner = layout.nodes.iter().find(|n| n.is_partner).unwrap();
		assert_eq!(partner.depth, 0);
		let partner_edges = layout
			.edges
			.iter()
			.filter(|e| matches!(e, Edge::Partner { .. }))
			.count();
		assert_eq!(partner_edges, 1);
	}

	#[test]
	fn siblings_never_overlap() {
		let config = LayoutConfig::default();
		let mut root = person("1", "Root");
		for i in 0..4 {
			let mut child = person(&format!("c{i}"), "Child");
			for j in 0..3 {
				child.children.push(person(&format!("g{i}{j}"), "Grandchild"));
			}
			root.children.push(child);
		}

		let layout = TreeLayout::compute(&root, &config);
		assert_rows_clear(&layout, &config);
	}

	#[test]
	fn partner_does_not_collide_with_spouse_siblings() {
		// A married child next to an unmarried sibling: the partner is
		// raised into the children's row and must still clear everyone.
		let config = LayoutConfig::default();
		let mut married = person("2", "Married");
		married.partners.push(person("4", "Spouse"));
		let mut root = person("1", "Root");
		root.children.push(married);
		root.children.push(person("3", "Single"));

		let layout = TreeLayout::compute(&root, &config);
		assert_rows_clear(&layout, &config);
	}

	#[test]
	fn parent_centers_over_children() {
		let mut root = person("1", "Root");
		root.children.push(person("2", "Left"));
		root.children.push(person("3", "Right"));

		let layout = TreeLayout::compute(&root, &LayoutConfig::default());
		let x = |id: &str| layout.nodes.iter().find(|n| n.person.id == id).unwrap().x;
		assert!((x("1") - (x("2") + x("3")) / 2.0).abs() < 1e-6);
	}

	#[test]
	fn duplicate_id_across_branches_is_placed_once() {
		let mut root = person("1", "Root");
		root.children.push(person("2", "Child"));
		let mut second = person("3", "Other");
		second.children.push(person("2", "Duplicate"));
		root.children.push(second);

		let layout = TreeLayout::compute(&root, &LayoutConfig::default());
		let placed = layout.nodes.iter().filter(|n| n.person.id == "2").count();
		assert_eq!(placed, 1);
	}

	#[test]
	fn partner_clears_its_spouse_box() {
		let config = LayoutConfig::default();
		let mut root = person("1", "Root");
		root.partners.push(person("2", "Partner"));

		let layout = TreeLayout::compute(&root, &config);
		assert!(layout.nodes[1].x - layout.nodes[0].x >= min_sep(&config) - 1e-6);
	}

	#[test]
	fn coordinates_are_zoom_independent() {
		// Zoom is applied by the renderer; the same tree always lays out
		// to the same coordinates.
		let mut root = person("1", "Root");
		root.children.push(person("2", "Child"));
		let config = LayoutConfig::default();
		let first = TreeLayout::compute(&root, &config);
		let second = TreeLayout::compute(&root, &config);
		let xs = |l: &TreeLayout| l.nodes.iter().map(|n| (n.x, n.y)).collect::<Vec<_>>();
		assert_eq!(xs(&first), xs(&second));
	}
}
