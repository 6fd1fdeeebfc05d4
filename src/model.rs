//! Domain vocabulary: relationship kinds, filters, labels and the
//! relationship record consumed from the provider.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::{KinpathError, Result};

/// Opaque person identifier (e.g. a GEDCOM pointer like `@I1@`).
pub type PersonId = String;

/// Recorded gender of a person. Unknown gender is represented as `None`
/// wherever a `Gender` appears.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    #[serde(rename = "M")]
    Male,
    #[serde(rename = "F")]
    Female,
}

/// A kind of relationship edge the search may traverse.
///
/// `Mother` and `Father` are gender-filtered specializations of `Parent`:
/// they are resolved against the parent's recorded gender at
/// neighbor-generation time and never stored separately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipKind {
    Parent,
    Child,
    Spouse,
    Sibling,
    Mother,
    Father,
}

impl RelationshipKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RelationshipKind::Parent => "parent",
            RelationshipKind::Child => "child",
            RelationshipKind::Spouse => "spouse",
            RelationshipKind::Sibling => "sibling",
            RelationshipKind::Mother => "mother",
            RelationshipKind::Father => "father",
        }
    }
}

/// Set of relationship kinds a search is allowed to traverse.
///
/// Backed by a `BTreeSet` so iteration order (and therefore every cache key
/// derived from a filter) is deterministic. An empty filter yields no edges:
/// every search except an identity query fails against it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RelationshipFilter {
    kinds: BTreeSet<RelationshipKind>,
}

impl RelationshipFilter {
    /// Empty filter (no traversable edges).
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_kinds(kinds: impl IntoIterator<Item = RelationshipKind>) -> Self {
        Self {
            kinds: kinds.into_iter().collect(),
        }
    }

    /// All relationship kinds: parent, child, spouse, sibling.
    pub fn all() -> Self {
        Self::from_kinds([
            RelationshipKind::Parent,
            RelationshipKind::Child,
            RelationshipKind::Spouse,
            RelationshipKind::Sibling,
        ])
    }

    /// Blood relationships only: parent, child.
    pub fn blood() -> Self {
        Self::from_kinds([RelationshipKind::Parent, RelationshipKind::Child])
    }

    /// Parse a free-form comma-separated relationship spec.
    ///
    /// Accepts individual kinds (`parent`, `child`, `spouse`, `sibling`,
    /// `mother`, `father`) and the aliases `all` (parent, child, spouse,
    /// sibling), `default` (parent, spouse, child), `blood` (parent, child),
    /// `parents` (parent) and `children` (child). Tokens are trimmed and
    /// matched case-insensitively. An unknown token fails the whole parse.
    pub fn parse(spec: &str) -> Result<Self> {
        let mut kinds = BTreeSet::new();
        for token in spec.split(',') {
            let token = token.trim().to_lowercase();
            if token.is_empty() {
                continue;
            }
            match token.as_str() {
                "all" => {
                    kinds.extend([
                        RelationshipKind::Parent,
                        RelationshipKind::Child,
                        RelationshipKind::Spouse,
                        RelationshipKind::Sibling,
                    ]);
                }
                "default" => {
                    kinds.extend([
                        RelationshipKind::Parent,
                        RelationshipKind::Spouse,
                        RelationshipKind::Child,
                    ]);
                }
                "blood" => {
                    kinds.extend([RelationshipKind::Parent, RelationshipKind::Child]);
                }
                "parent" | "parents" => {
                    kinds.insert(RelationshipKind::Parent);
                }
                "child" | "children" => {
                    kinds.insert(RelationshipKind::Child);
                }
                "spouse" => {
                    kinds.insert(RelationshipKind::Spouse);
                }
                "sibling" => {
                    kinds.insert(RelationshipKind::Sibling);
                }
                "mother" => {
                    kinds.insert(RelationshipKind::Mother);
                }
                "father" => {
                    kinds.insert(RelationshipKind::Father);
                }
                other => {
                    return Err(KinpathError::Parse(format!(
                        "unknown relationship type: {}",
                        other
                    )));
                }
            }
        }
        Ok(Self { kinds })
    }

    pub fn contains(&self, kind: RelationshipKind) -> bool {
        self.kinds.contains(&kind)
    }

    pub fn insert(&mut self, kind: RelationshipKind) {
        self.kinds.insert(kind);
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    /// Kinds in ascending order (stable across runs).
    pub fn iter(&self) -> impl Iterator<Item = RelationshipKind> + '_ {
        self.kinds.iter().copied()
    }

    /// Sorted kind list used as part of the neighbor cache key.
    pub fn sorted_kinds(&self) -> Vec<RelationshipKind> {
        self.kinds.iter().copied().collect()
    }

    /// True when any parent-side kind (parent, mother, father) is enabled.
    pub fn wants_parents(&self) -> bool {
        self.contains(RelationshipKind::Parent)
            || self.contains(RelationshipKind::Mother)
            || self.contains(RelationshipKind::Father)
    }
}

/// Gender-aware label for one traversed hop of a resolved path, read from
/// the earlier person's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationLabel {
    FatherOf,
    MotherOf,
    ParentOf,
    SonOf,
    DaughterOf,
    ChildOf,
    HusbandOf,
    WifeOf,
    SpouseOf,
    BrotherOf,
    SisterOf,
    SiblingOf,
    Unknown,
}

impl RelationLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RelationLabel::FatherOf => "father_of",
            RelationLabel::MotherOf => "mother_of",
            RelationLabel::ParentOf => "parent_of",
            RelationLabel::SonOf => "son_of",
            RelationLabel::DaughterOf => "daughter_of",
            RelationLabel::ChildOf => "child_of",
            RelationLabel::HusbandOf => "husband_of",
            RelationLabel::WifeOf => "wife_of",
            RelationLabel::SpouseOf => "spouse_of",
            RelationLabel::BrotherOf => "brother_of",
            RelationLabel::SisterOf => "sister_of",
            RelationLabel::SiblingOf => "sibling_of",
            RelationLabel::Unknown => "unknown",
        }
    }

    /// Human-readable phrase used in path descriptions ("father of", ...).
    pub fn phrase(&self) -> &'static str {
        match self {
            RelationLabel::FatherOf => "father of",
            RelationLabel::MotherOf => "mother of",
            RelationLabel::ParentOf => "parent of",
            RelationLabel::SonOf => "son of",
            RelationLabel::DaughterOf => "daughter of",
            RelationLabel::ChildOf => "child of",
            RelationLabel::HusbandOf => "husband of",
            RelationLabel::WifeOf => "wife of",
            RelationLabel::SpouseOf => "spouse of",
            RelationLabel::BrotherOf => "brother of",
            RelationLabel::SisterOf => "sister of",
            RelationLabel::SiblingOf => "sibling of",
            RelationLabel::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for RelationLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One traversable edge of the implicit relationship graph.
///
/// Edges are computed on demand by the neighbor resolver and never stored as
/// an adjacency structure. All edges currently carry unit weight, but weight
/// is a first-class field and the search relaxes distances through it rather
/// than assuming 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub neighbor: PersonId,
    pub weight: u32,
    pub kind: RelationshipKind,
}

impl Edge {
    pub fn new(neighbor: impl Into<PersonId>, kind: RelationshipKind) -> Self {
        Self {
            neighbor: neighbor.into(),
            weight: 1,
            kind,
        }
    }
}

/// Per-person relationship record as supplied by the provider.
///
/// All id lists are sorted ascending; neighbor generation relies on this for
/// deterministic edge ordering between runs.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PersonRelationships {
    pub gender: Option<Gender>,
    pub parents: Vec<PersonId>,
    pub spouses: Vec<PersonId>,
    pub children: Vec<PersonId>,
}
