//! Tidy top-down placement of the family graph.
//!
//! Isolated people are stacked in a column on the left. Every root that has
//! relationships gets its own tree, laid out left to right after the column.
//! A child reachable through several parents is placed once under each of
//! them, and its subtree width is counted once per parent. Cycles are cut at
//! the first revisit of a node already on the current descent path.

use log::{debug, warn};

use super::config::LayoutConfig;
use super::graph::{FamilyGraph, NodeIdx};
use super::routing::{ElbowPath, Point};
use super::types::PersonId;

#[derive(Clone, Debug, PartialEq)]
pub struct PositionedNode {
	pub id: PersonId,
	/// The graph node this was placed from. Several slots may share one node.
	pub node: NodeIdx,
	pub x: f64,
	pub y: f64,
	pub depth: usize,
	pub subtree_width: f64,
	pub isolated: bool,
}

impl PositionedNode {
	pub fn center(&self) -> Point {
		Point::new(self.x, self.y)
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct RoutedLink {
	/// Slot of the parent in [`TreeLayout::nodes`].
	pub parent: usize,
	/// Slot of the child in [`TreeLayout::nodes`].
	pub child: usize,
	pub source: Point,
	pub target: Point,
	pub path: ElbowPath,
}

/// Axis-aligned extent of node centers.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
	pub min_x: f64,
	pub max_x: f64,
	pub min_y: f64,
	pub max_y: f64,
}

impl Bounds {
	pub fn width(&self) -> f64 {
		self.max_x - self.min_x
	}

	pub fn height(&self) -> f64 {
		self.max_y - self.min_y
	}

	pub fn center(&self) -> Point {
		Point::new(
			(self.min_x + self.max_x) / 2.0,
			(self.min_y + self.max_y) / 2.0,
		)
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct TreeLayout {
	pub config: LayoutConfig,
	pub nodes: Vec<PositionedNode>,
	pub links: Vec<RoutedLink>,
}

impl TreeLayout {
	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	pub fn bounds(&self) -> Option<Bounds> {
		let first = self.nodes.first()?;
		let init = Bounds {
			min_x: first.x,
			max_x: first.x,
			min_y: first.y,
			max_y: first.y,
		};
		Some(self.nodes.iter().fold(init, |b, n| Bounds {
			min_x: b.min_x.min(n.x),
			max_x: b.max_x.max(n.x),
			min_y: b.min_y.min(n.y),
			max_y: b.max_y.max(n.y),
		}))
	}

	/// First slot placed for `id`.
	pub fn find(&self, id: &str) -> Option<&PositionedNode> {
		self.nodes.iter().find(|n| n.id == id)
	}
}

/// Horizontal space `node` and its descendants need.
pub fn subtree_width(graph: &FamilyGraph, node: NodeIdx, config: &LayoutConfig) -> f64 {
	width_on_path(graph, node, config, &mut Vec::new())
}

fn width_on_path(
	graph: &FamilyGraph,
	node: NodeIdx,
	config: &LayoutConfig,
	path: &mut Vec<NodeIdx>,
) -> f64 {
	path.push(node);
	let mut children = 0.0;
	for &child in &graph.nodes[node].children {
		if path.contains(&child) {
			continue;
		}
		children += width_on_path(graph, child, config, path);
	}
	path.pop();
	config.leaf_width().max(children)
}

/// Position every node of `graph` for a canvas `canvas_width` wide.
pub fn layout_family(graph: &FamilyGraph, config: &LayoutConfig, canvas_width: f64) -> TreeLayout {
	let mut positioner = Positioner {
		graph,
		config,
		nodes: Vec::with_capacity(graph.len()),
		edges: Vec::new(),
		path: Vec::new(),
		placed: vec![false; graph.len()],
	};

	let column_width = config.isolated_column_width();
	let column_x = -(canvas_width - 2.0 * config.canvas_margin) / 2.0 + column_width / 2.0;
	let row_spacing = config.node_height + config.isolated_gap;
	for (row, idx) in graph.isolated().enumerate() {
		positioner.placed[idx] = true;
		positioner.nodes.push(PositionedNode {
			id: graph.nodes[idx].id.clone(),
			node: idx,
			x: column_x,
			y: config.top_margin + row as f64 * row_spacing,
			depth: 0,
			subtree_width: config.node_width,
			isolated: true,
		});
	}

	let mut cursor = column_x + column_width / 2.0 + config.tree_gutter;
	for root in graph.roots_with_relationships() {
		let width = subtree_width(graph, root, config);
		positioner.place(root, cursor + width / 2.0, 0);
		cursor += width;
	}

	// Components without a root are cycles; start them at their first member.
	for idx in 0..graph.len() {
		if positioner.placed[idx] {
			continue;
		}
		warn!(
			"{:?} is not reachable from any root, laying out its cycle separately",
			graph.nodes[idx].id
		);
		let width = subtree_width(graph, idx, config);
		positioner.place(idx, cursor + width / 2.0, 0);
		cursor += width;
	}

	let Positioner { nodes, edges, .. } = positioner;
	let links = edges
		.into_iter()
		.map(|(parent, child)| {
			let (source, target) = (nodes[parent].center(), nodes[child].center());
			RoutedLink {
				parent,
				child,
				source,
				target,
				path: ElbowPath::route(source, target, config),
			}
		})
		.collect::<Vec<_>>();

	debug!(
		"laid out {} people as {} slots with {} links",
		graph.len(),
		nodes.len(),
		links.len()
	);
	TreeLayout {
		config: config.clone(),
		nodes,
		links,
	}
}

struct Positioner<'a> {
	graph: &'a FamilyGraph,
	config: &'a LayoutConfig,
	nodes: Vec<PositionedNode>,
	edges: Vec<(usize, usize)>,
	path: Vec<NodeIdx>,
	placed: Vec<bool>,
}

impl Positioner<'_> {
	/// Place `node` centred at `center_x`, then its descendants beneath it.
	/// Returns the slot of `node`.
	fn place(&mut self, node: NodeIdx, center_x: f64, depth: usize) -> usize {
		let (graph, config) = (self.graph, self.config);
		let width = width_on_path(graph, node, config, &mut self.path);
		let slot = self.nodes.len();
		self.placed[node] = true;
		self.nodes.push(PositionedNode {
			id: graph.nodes[node].id.clone(),
			node,
			x: center_x,
			y: config.top_margin + depth as f64 * config.level_height,
			depth,
			subtree_width: width,
			isolated: false,
		});

		self.path.push(node);
		let mut child_x = center_x - width / 2.0;
		let mut span: Option<(f64, f64)> = None;
		for &child in &graph.nodes[node].children {
			if self.path.contains(&child) {
				warn!(
					"ignoring edge {:?} -> {:?}: it closes a cycle",
					graph.nodes[node].id, graph.nodes[child].id
				);
				continue;
			}
			let child_width = width_on_path(graph, child, config, &mut self.path);
			let child_slot = self.place(child, child_x + child_width / 2.0, depth + 1);
			self.edges.push((slot, child_slot));
			let x = self.nodes[child_slot].x;
			span = Some(span.map_or((x, x), |(first, _)| (first, x)));
			child_x += child_width;
		}
		self.path.pop();

		if let Some((first, last)) = span {
			self.nodes[slot].x = (first + last) / 2.0;
		}
		slot
	}
}

#[cfg(test)]
mod tests {
	use std::collections::BTreeMap;

	use super::*;
	use crate::components::family_tree::types::{
		Gender, GraphSnapshot, PersonRecord, RelationshipEdge,
	};
	use pretty_assertions::assert_eq;
	use proptest::prelude::*;

	const CANVAS: f64 = 1200.0;

	fn snapshot(names: &[&str], edges: &[(&str, &str)]) -> GraphSnapshot {
		GraphSnapshot {
			nodes: names
				.iter()
				.map(|&n| PersonRecord::new(n, Gender::Female))
				.collect(),
			edges: edges
				.iter()
				.map(|&(s, t)| RelationshipEdge::new(s, t))
				.collect(),
		}
	}

	fn run(data: &GraphSnapshot) -> TreeLayout {
		let config = LayoutConfig::for_canvas_width(CANVAS);
		layout_family(&FamilyGraph::build(data), &config, CANVAS)
	}

	/// `parents[i]` is the parent of node `i + 1`, always an earlier node.
	fn random_tree(parents: &[usize]) -> GraphSnapshot {
		let names: Vec<String> = (0..=parents.len()).map(|i| format!("p{i}")).collect();
		GraphSnapshot {
			nodes: names
				.iter()
				.map(|n| PersonRecord::new(n.clone(), Gender::Male))
				.collect(),
			edges: parents
				.iter()
				.enumerate()
				.map(|(i, &p)| {
					RelationshipEdge::new(names[p % (i + 1)].clone(), names[i + 1].clone())
				})
				.collect(),
		}
	}

	#[test]
	fn empty_input_lays_out_nothing() {
		let layout = run(&GraphSnapshot::default());
		assert!(layout.is_empty());
		assert!(layout.links.is_empty());
		assert_eq!(layout.bounds(), None);
	}

	#[test]
	fn subtree_widths() {
		let config = LayoutConfig::for_canvas_width(CANVAS);
		let graph = FamilyGraph::build(&snapshot(
			&["root", "a", "b", "c", "only"],
			&[("root", "a"), ("root", "b"), ("root", "c"), ("a", "only")],
		));
		assert_eq!(subtree_width(&graph, 4, &config), 140.0);
		assert_eq!(subtree_width(&graph, 1, &config), 140.0);
		assert_eq!(subtree_width(&graph, 0, &config), 420.0);
	}

	#[test]
	fn lone_person_goes_to_first_row_of_column() {
		let layout = run(&snapshot(&["Dave"], &[]));
		let dave = layout.find("Dave").unwrap();
		assert!(dave.isolated);
		assert_eq!((dave.x, dave.y), (-480.0, 60.0));
	}

	#[test]
	fn shared_child_is_placed_under_each_parent() {
		let layout = run(&snapshot(
			&["Alice", "Bob", "Carol"],
			&[("Alice", "Carol"), ("Bob", "Carol")],
		));
		let alice = layout.find("Alice").unwrap();
		let bob = layout.find("Bob").unwrap();
		assert_eq!((alice.y, bob.y), (60.0, 60.0));
		assert_eq!((alice.x, bob.x), (-280.0, -140.0));

		let carols: Vec<_> = layout.nodes.iter().filter(|n| n.id == "Carol").collect();
		assert_eq!(carols.len(), 2);
		for link in &layout.links {
			let (parent, child) = (&layout.nodes[link.parent], &layout.nodes[link.child]);
			assert_eq!(child.id, "Carol");
			assert_eq!(child.y, 60.0 + 120.0);
			assert_eq!(child.x, parent.x);
		}
	}

	#[test]
	fn unknown_parent_edge_is_ignored() {
		let layout = run(&snapshot(
			&["Alice", "Carol"],
			&[("Eve", "Carol"), ("Alice", "Carol")],
		));
		assert_eq!(layout.nodes.len(), 2);
		assert_eq!(layout.links.len(), 1);
		assert!(layout.nodes.iter().all(|n| !n.isolated));
	}

	#[test]
	fn trees_start_right_of_isolated_column() {
		let layout = run(&snapshot(
			&["Solo", "Gran", "Mum", "Kid", "Aunt"],
			&[("Gran", "Mum"), ("Gran", "Aunt"), ("Mum", "Kid")],
		));
		let column_right = layout
			.nodes
			.iter()
			.filter(|n| n.isolated)
			.map(|n| n.x + layout.config.node_width / 2.0)
			.fold(f64::MIN, f64::max);
		let trees_left = layout
			.nodes
			.iter()
			.filter(|n| !n.isolated)
			.map(|n| n.x - layout.config.node_width / 2.0)
			.fold(f64::MAX, f64::min);
		assert!(column_right < trees_left);
	}

	#[test]
	fn generations_step_by_level_height() {
		let layout = run(&snapshot(
			&["g0", "g1", "g2"],
			&[("g0", "g1"), ("g1", "g2")],
		));
		let ys: Vec<f64> = ["g0", "g1", "g2"]
			.iter()
			.map(|id| layout.find(id).unwrap().y)
			.collect();
		assert_eq!(ys, vec![60.0, 180.0, 300.0]);
	}

	#[test]
	fn two_node_cycle_is_cut() {
		let layout = run(&snapshot(&["A", "B"], &[("A", "B"), ("B", "A")]));
		assert_eq!(layout.nodes.len(), 2);
		assert_eq!(layout.links.len(), 1);
	}

	#[test]
	fn self_loop_is_cut() {
		let layout = run(&snapshot(&["A"], &[("A", "A")]));
		assert_eq!(layout.nodes.len(), 1);
		assert!(!layout.nodes[0].isolated);
		assert!(layout.links.is_empty());
	}

	#[test]
	fn links_follow_node_positions() {
		let layout = run(&snapshot(&["P", "C1", "C2"], &[("P", "C1"), ("P", "C2")]));
		for link in &layout.links {
			assert_eq!(link.source, layout.nodes[link.parent].center());
			assert_eq!(link.target, layout.nodes[link.child].center());
			assert_eq!(link.path.points[0].x, link.source.x);
			assert_eq!(link.path.end().x, link.target.x);
		}
	}

	proptest! {
		#[test]
		fn unconnected_people_form_one_column(n in 1usize..40) {
			let names: Vec<String> = (0..n).map(|i| format!("person {i}")).collect();
			let refs: Vec<&str> = names.iter().map(String::as_str).collect();
			let layout = run(&snapshot(&refs, &[]));
			prop_assert_eq!(layout.nodes.len(), n);
			prop_assert!(layout.nodes.iter().all(|p| p.isolated && p.x == layout.nodes[0].x));
			for pair in layout.nodes.windows(2) {
				prop_assert!(pair[0].y < pair[1].y);
			}
		}

		#[test]
		fn parents_are_centred_over_children(parents in prop::collection::vec(0usize..64, 1..40)) {
			let layout = run(&random_tree(&parents));
			let mut children: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
			for link in &layout.links {
				children.entry(link.parent).or_default().push(link.child);
			}
			for (parent, kids) in children {
				let first = layout.nodes[kids[0]].x;
				let last = layout.nodes[kids[kids.len() - 1]].x;
				prop_assert!((layout.nodes[parent].x - (first + last) / 2.0).abs() < 1e-9);
			}
		}

		#[test]
		fn extra_leaf_never_shrinks_a_tree(
			parents in prop::collection::vec(0usize..64, 1..30),
			attach in 0usize..64,
		) {
			let config = LayoutConfig::for_canvas_width(CANVAS);
			let before = random_tree(&parents);
			let mut after = before.clone();
			let leaf = PersonRecord::new("extra leaf", Gender::Female);
			let anchor = before.nodes[attach % before.nodes.len()].id.clone();
			after.edges.push(RelationshipEdge::new(anchor, leaf.id.clone()));
			after.nodes.push(leaf);

			let width_before = subtree_width(&FamilyGraph::build(&before), 0, &config);
			let width_after = subtree_width(&FamilyGraph::build(&after), 0, &config);
			prop_assert!(width_after >= width_before);
		}

		#[test]
		fn layout_is_deterministic(parents in prop::collection::vec(0usize..64, 0..30)) {
			let data = random_tree(&parents);
			prop_assert_eq!(run(&data), run(&data));
		}
	}
}
