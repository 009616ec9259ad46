use serde::{Deserialize, Serialize};

/// A person's identity. The display name doubles as the unique id.
pub type PersonId = String;

/// Gender of a person, used by the host to pick a node color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
	/// Male.
	#[serde(alias = "male", alias = "MALE")]
	Male,
	/// Female.
	#[serde(alias = "female", alias = "FEMALE")]
	Female,
}

impl Gender {
	/// Label shown in the UI.
	pub fn as_str(self) -> &'static str {
		match self {
			Gender::Male => "Male",
			Gender::Female => "Female",
		}
	}
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PersonRecord {
	pub id: PersonId,
	pub gender: Gender,
	#[serde(rename = "desc", default, skip_serializing_if = "Option::is_none")]
	pub description: Option<String>,
}

/// `source` is a parent of `target`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationshipEdge {
	pub source: PersonId,
	pub target: PersonId,
}

/// Full snapshot of the family graph, as returned by the backend.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphSnapshot {
	pub nodes: Vec<PersonRecord>,
	#[serde(rename = "links", alias = "edges", default)]
	pub edges: Vec<RelationshipEdge>,
}

impl PersonRecord {
	/// Convenience constructor without a description.
	pub fn new(id: impl Into<PersonId>, gender: Gender) -> Self {
		Self {
			id: id.into(),
			gender,
			description: None,
		}
	}
}

impl RelationshipEdge {
	/// Edge from `parent` to `child`.
	pub fn new(parent: impl Into<PersonId>, child: impl Into<PersonId>) -> Self {
		Self {
			source: parent.into(),
			target: child.into(),
		}
	}
}
