//! In-memory family store backing the home page.
//!
//! Mirrors the backend's person and relationship rules so the canvas is fed
//! the same snapshots the server would return.

use log::{debug, info};
use thiserror::Error;

use crate::components::family_tree::{
	Gender, GraphSnapshot, PersonId, PersonRecord, RelationshipEdge,
};

pub const UNKNOWN_COLOR: &str = "#F3F4F6";
pub const UNRELATED_COLOR: &str = "#FEF3C7";
pub const MALE_COLOR: &str = "#DBEAFE";
pub const FEMALE_COLOR: &str = "#FCE7F3";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
	#[error("name is required")]
	EmptyName,
	#[error("person '{0}' already exists")]
	DuplicatePerson(PersonId),
	#[error("person '{0}' does not exist")]
	UnknownPerson(PersonId),
	#[error("'{0}' cannot be their own parent")]
	SelfRelationship(PersonId),
	#[error("'{0}' is already a parent of '{1}'")]
	DuplicateRelationship(PersonId, PersonId),
}

pub type Result<T> = std::result::Result<T, StoreError>;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct FamilyStore {
	people: Vec<PersonRecord>,
	edges: Vec<RelationshipEdge>,
}

impl FamilyStore {
	/// Load a snapshot, dropping edges that point at unknown people.
	pub fn from_snapshot(snapshot: GraphSnapshot) -> Self {
		let mut store = Self::default();
		for person in snapshot.nodes {
			let id = person.id.clone();
			if let Err(err) = store.insert(person) {
				debug!("skipping {:?} while loading: {}", id, err);
			}
		}
		for edge in snapshot.edges {
			if let Err(err) = store.add_relationship(&edge.source, &edge.target) {
				debug!("skipping edge {:?} -> {:?}: {}", edge.source, edge.target, err);
			}
		}
		store
	}

	pub fn snapshot(&self) -> GraphSnapshot {
		GraphSnapshot {
			nodes: self.people.clone(),
			edges: self.edges.clone(),
		}
	}

	pub fn people(&self) -> &[PersonRecord] {
		&self.people
	}

	pub fn person(&self, name: &str) -> Option<&PersonRecord> {
		self.people.iter().find(|p| p.id == name)
	}

	pub fn contains(&self, name: &str) -> bool {
		self.person(name).is_some()
	}

	pub fn add_person(
		&mut self,
		name: &str,
		gender: Gender,
		description: Option<&str>,
	) -> Result<()> {
		let name = name.trim();
		if name.is_empty() {
			return Err(StoreError::EmptyName);
		}
		let description = description
			.map(str::trim)
			.filter(|d| !d.is_empty())
			.map(str::to_string);
		let mut person = PersonRecord::new(name, gender);
		person.description = description;
		self.insert(person)?;
		info!("added {:?}", name);
		Ok(())
	}

	fn insert(&mut self, person: PersonRecord) -> Result<()> {
		if person.id.trim().is_empty() {
			return Err(StoreError::EmptyName);
		}
		if self.contains(&person.id) {
			return Err(StoreError::DuplicatePerson(person.id));
		}
		self.people.push(person);
		Ok(())
	}

	pub fn add_relationship(&mut self, parent: &str, child: &str) -> Result<()> {
		for name in [parent, child] {
			if !self.contains(name) {
				return Err(StoreError::UnknownPerson(name.to_string()));
			}
		}
		if parent == child {
			return Err(StoreError::SelfRelationship(parent.to_string()));
		}
		if self
			.edges
			.iter()
			.any(|e| e.source == parent && e.target == child)
		{
			return Err(StoreError::DuplicateRelationship(
				parent.to_string(),
				child.to_string(),
			));
		}
		self.edges.push(RelationshipEdge::new(parent, child));
		info!("linked {:?} -> {:?}", parent, child);
		Ok(())
	}

	/// Link `child` under `parent`, creating the child first if needed.
	pub fn add_child(
		&mut self,
		parent: &str,
		child: &str,
		gender: Gender,
		description: Option<&str>,
	) -> Result<()> {
		if !self.contains(parent) {
			return Err(StoreError::UnknownPerson(parent.to_string()));
		}
		if !self.contains(child.trim()) {
			self.add_person(child, gender, description)?;
		}
		self.add_relationship(parent, child.trim())
	}

	/// Remove a person together with every relationship they take part in.
	pub fn delete_person(&mut self, name: &str) -> Result<()> {
		let Some(pos) = self.people.iter().position(|p| p.id == name) else {
			return Err(StoreError::UnknownPerson(name.to_string()));
		};
		self.people.remove(pos);
		self.edges.retain(|e| e.source != name && e.target != name);
		info!("deleted {:?}", name);
		Ok(())
	}

	/// Case-insensitive substring match on names.
	pub fn search(&self, term: &str) -> Vec<&PersonRecord> {
		let needle = term.trim().to_lowercase();
		if needle.is_empty() {
			return Vec::new();
		}
		self.people
			.iter()
			.filter(|p| p.id.to_lowercase().contains(&needle))
			.collect()
	}

	pub fn parents_of(&self, name: &str) -> Vec<&str> {
		self.edges
			.iter()
			.filter(|e| e.target == name)
			.map(|e| e.source.as_str())
			.collect()
	}

	pub fn children_of(&self, name: &str) -> Vec<&str> {
		self.edges
			.iter()
			.filter(|e| e.source == name)
			.map(|e| e.target.as_str())
			.collect()
	}

	pub fn has_relationships(&self, name: &str) -> bool {
		self.edges
			.iter()
			.any(|e| e.source == name || e.target == name)
	}

	pub fn without_relationships(&self) -> Vec<&PersonRecord> {
		self.people
			.iter()
			.filter(|p| !self.has_relationships(&p.id))
			.collect()
	}

	/// Fill color for a person's node and list entry.
	pub fn color_for(&self, name: &str) -> &'static str {
		match self.person(name) {
			None => UNKNOWN_COLOR,
			Some(_) if !self.has_relationships(name) => UNRELATED_COLOR,
			Some(p) => match p.gender {
				Gender::Male => MALE_COLOR,
				Gender::Female => FEMALE_COLOR,
			},
		}
	}
}
