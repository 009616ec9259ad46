use std::collections::HashMap;

use log::debug;

use super::types::{GraphSnapshot, PersonId};

/// Index into [`FamilyGraph::nodes`].
pub type NodeIdx = usize;

#[derive(Clone, Debug)]
pub struct GraphNode {
	pub id: PersonId,
	/// Edge insertion order.
	pub children: Vec<NodeIdx>,
	/// Edge insertion order.
	pub parents: Vec<NodeIdx>,
}

impl GraphNode {
	pub fn has_relationships(&self) -> bool {
		!self.children.is_empty() || !self.parents.is_empty()
	}
}

/// Arena of people with parent/child adjacency, rebuilt on every recompute.
#[derive(Clone, Debug, Default)]
pub struct FamilyGraph {
	pub nodes: Vec<GraphNode>,
}

impl FamilyGraph {
	/// Build adjacency from a snapshot. Edges naming an unknown person are dropped.
	pub fn build(data: &GraphSnapshot) -> Self {
		let mut graph = Self::default();
		let mut index: HashMap<&str, NodeIdx> = HashMap::with_capacity(data.nodes.len());
		for person in &data.nodes {
			if index.contains_key(person.id.as_str()) {
				debug!("ignoring duplicate person {:?}", person.id);
				continue;
			}
			index.insert(person.id.as_str(), graph.nodes.len());
			graph.nodes.push(GraphNode {
				id: person.id.clone(),
				children: Vec::new(),
				parents: Vec::new(),
			});
		}

		for edge in &data.edges {
			let (Some(&parent), Some(&child)) =
				(index.get(edge.source.as_str()), index.get(edge.target.as_str()))
			else {
				debug!(
					"dropping edge {:?} -> {:?}: unknown endpoint",
					edge.source, edge.target
				);
				continue;
			};
			graph.nodes[parent].children.push(child);
			graph.nodes[child].parents.push(parent);
		}
		graph
	}

	pub fn len(&self) -> usize {
		self.nodes.len()
	}

	/// Nodes without parents, isolated ones included.
	pub fn roots(&self) -> impl Iterator<Item = NodeIdx> + '_ {
		(0..self.nodes.len()).filter(|&i| self.nodes[i].parents.is_empty())
	}

	/// Nodes with neither parents nor children.
	pub fn isolated(&self) -> impl Iterator<Item = NodeIdx> + '_ {
		(0..self.nodes.len()).filter(|&i| !self.nodes[i].has_relationships())
	}

	pub fn roots_with_relationships(&self) -> impl Iterator<Item = NodeIdx> + '_ {
		self.roots().filter(|&i| self.nodes[i].has_relationships())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::family_tree::types::{Gender, PersonRecord, RelationshipEdge};
	use pretty_assertions::assert_eq;

	fn snapshot(nodes: &[(&str, Gender)], edges: &[(&str, &str)]) -> GraphSnapshot {
		GraphSnapshot {
			nodes: nodes
				.iter()
				.map(|&(id, gender)| PersonRecord::new(id, gender))
				.collect(),
			edges: edges
				.iter()
				.map(|&(s, t)| RelationshipEdge::new(s, t))
				.collect(),
		}
	}

	#[test]
	fn two_parents_one_child() {
		let graph = FamilyGraph::build(&snapshot(
			&[
				("Alice", Gender::Female),
				("Bob", Gender::Male),
				("Carol", Gender::Female),
			],
			&[("Alice", "Carol"), ("Bob", "Carol")],
		));
		assert_eq!(graph.nodes[2].id, "Carol");
		assert_eq!(graph.nodes[2].parents, vec![0, 1]);
		assert_eq!(graph.roots().collect::<Vec<_>>(), vec![0, 1]);
		assert_eq!(graph.roots_with_relationships().collect::<Vec<_>>(), vec![0, 1]);
		assert_eq!(graph.isolated().count(), 0);
	}

	#[test]
	fn isolated_nodes_are_also_roots() {
		let graph = FamilyGraph::build(&snapshot(
			&[("Dave", Gender::Male), ("Erin", Gender::Female), ("Finn", Gender::Male)],
			&[("Erin", "Finn")],
		));
		assert_eq!(graph.roots().collect::<Vec<_>>(), vec![0, 1]);
		assert_eq!(graph.isolated().collect::<Vec<_>>(), vec![0]);
		assert_eq!(graph.roots_with_relationships().collect::<Vec<_>>(), vec![1]);
	}

	#[test]
	fn edge_with_unknown_endpoint_is_dropped() {
		let graph = FamilyGraph::build(&snapshot(
			&[("Alice", Gender::Female), ("Carol", Gender::Female)],
			&[("Eve", "Carol"), ("Alice", "Carol"), ("Alice", "Zed")],
		));
		assert_eq!(graph.nodes[0].children, vec![1]);
		assert_eq!(graph.nodes[1].parents, vec![0]);
	}

	#[test]
	fn children_keep_edge_order() {
		let graph = FamilyGraph::build(&snapshot(
			&[("P", Gender::Male), ("Zoe", Gender::Female), ("Adam", Gender::Male)],
			&[("P", "Zoe"), ("P", "Adam")],
		));
		assert_eq!(graph.nodes[0].children, vec![1, 2]);
	}
}
