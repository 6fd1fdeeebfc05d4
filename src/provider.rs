//! Collaborator interface to the underlying record store.
//!
//! The search core never sees raw genealogical records; it consumes
//! per-person relationship sets, birth years and display names through
//! [`RelationshipProvider`]. A HashMap-backed [`MemoryProvider`] is included
//! for callers that already hold materialized records (and for tests).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::model::{Gender, PersonId, PersonRelationships};

/// Supplies relationship data for the search core.
///
/// Implementations must be cheap to call repeatedly; the core additionally
/// memoizes results in a bounded LRU cache, so a fetch may be served many
/// searches. Must be `Send + Sync`: caches and provider are shared across
/// concurrently running searches.
pub trait RelationshipProvider: Send + Sync {
    /// Relationship record for a person, or `None` if the id is unknown.
    ///
    /// The returned id lists must be sorted ascending.
    fn relationships(&self, person: &str) -> Option<PersonRelationships>;

    /// Birth year if one is recorded and parseable.
    fn birth_year(&self, person: &str) -> Option<i32>;

    /// Display name, used only when describing resolved paths.
    fn display_name(&self, person: &str) -> Option<String>;
}

/// One person's record in a [`MemoryProvider`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PersonRecord {
    pub id: PersonId,
    pub name: Option<String>,
    pub gender: Option<Gender>,
    pub birth_year: Option<i32>,
    pub parents: Vec<PersonId>,
    pub spouses: Vec<PersonId>,
    pub children: Vec<PersonId>,
}

impl PersonRecord {
    pub fn new(id: impl Into<PersonId>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }
}

/// In-memory [`RelationshipProvider`] over a map of [`PersonRecord`]s.
#[derive(Debug, Clone, Default)]
pub struct MemoryProvider {
    people: HashMap<PersonId, PersonRecord>,
}

impl MemoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a record.
    pub fn insert(&mut self, record: PersonRecord) {
        self.people.insert(record.id.clone(), record);
    }

    fn entry(&mut self, person: &str) -> &mut PersonRecord {
        self.people
            .entry(person.to_string())
            .or_insert_with(|| PersonRecord::new(person))
    }

    /// Record a parent/child link in both directions, creating missing
    /// records on the fly.
    pub fn link_parent_child(&mut self, parent: &str, child: &str) {
        let p = self.entry(parent);
        if !p.children.iter().any(|c| c == child) {
            p.children.push(child.to_string());
        }
        let c = self.entry(child);
        if !c.parents.iter().any(|p| p == parent) {
            c.parents.push(parent.to_string());
        }
    }

    /// Record a marriage in both directions, creating missing records on
    /// the fly.
    pub fn link_spouses(&mut self, a: &str, b: &str) {
        let ra = self.entry(a);
        if !ra.spouses.iter().any(|s| s == b) {
            ra.spouses.push(b.to_string());
        }
        let rb = self.entry(b);
        if !rb.spouses.iter().any(|s| s == a) {
            rb.spouses.push(a.to_string());
        }
    }

    pub fn len(&self) -> usize {
        self.people.len()
    }

    pub fn is_empty(&self) -> bool {
        self.people.is_empty()
    }
}

impl RelationshipProvider for MemoryProvider {
    fn relationships(&self, person: &str) -> Option<PersonRelationships> {
        let record = self.people.get(person)?;
        let mut parents = record.parents.clone();
        let mut spouses = record.spouses.clone();
        let mut children = record.children.clone();
        parents.sort();
        spouses.sort();
        children.sort();
        Some(PersonRelationships {
            gender: record.gender,
            parents,
            spouses,
            children,
        })
    }

    fn birth_year(&self, person: &str) -> Option<i32> {
        self.people.get(person).and_then(|r| r.birth_year)
    }

    fn display_name(&self, person: &str) -> Option<String> {
        self.people.get(person).and_then(|r| r.name.clone())
    }
}
