use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use amcat_protocol::Position;

use crate::error::ExtractionError;

/// Relation labels that glue tokens into one predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PredicateRelations(BTreeSet<String>);

impl PredicateRelations {
    pub fn new<I, S>(labels: I) -> Result<Self, ExtractionError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut set = BTreeSet::new();
        for label in labels {
            let label = label.into();
            if label.trim().is_empty() {
                return Err(ExtractionError::BlankRelationLabel);
            }
            set.insert(label);
        }
        Ok(Self(set))
    }

    pub fn contains(&self, label: &str) -> bool {
        self.0.contains(label)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl Default for PredicateRelations {
    /// Verb-complement chains only.
    fn default() -> Self {
        Self(BTreeSet::from(["vc".to_string()]))
    }
}

/// An equivalence class of tokens that together express one event. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Predicate(BTreeSet<Position>);

impl Predicate {
    pub fn singleton(position: Position) -> Self {
        Self(BTreeSet::from([position]))
    }

    /// Returns `None` for an empty set of positions.
    pub fn new(positions: impl IntoIterator<Item = Position>) -> Option<Self> {
        let set: BTreeSet<Position> = positions.into_iter().collect();
        if set.is_empty() {
            None
        } else {
            Some(Self(set))
        }
    }

    pub fn contains(&self, position: Position) -> bool {
        self.0.contains(&position)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = Position> + '_ {
        self.0.iter().copied()
    }

    pub fn positions(&self) -> &BTreeSet<Position> {
        &self.0
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|p| p.to_string()).collect();
        f.write_str(&parts.join(","))
    }
}

/// Token position -> the predicate it belongs to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PredicateMap {
    map: BTreeMap<Position, Predicate>,
}

impl PredicateMap {
    /// The predicate of `position`; positions never seen in a triple are their own singleton.
    pub fn get(&self, position: Position) -> Predicate {
        self.map
            .get(&position)
            .cloned()
            .unwrap_or_else(|| Predicate::singleton(position))
    }

    pub fn contains(&self, position: Position) -> bool {
        self.map.contains_key(&position)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Position, &Predicate)> {
        self.map.iter().map(|(p, pred)| (*p, pred))
    }

    /// The distinct predicates, as a set of sets.
    pub fn partition(&self) -> BTreeSet<Predicate> {
        self.map.values().cloned().collect()
    }
}

impl From<BTreeMap<Position, Predicate>> for PredicateMap {
    fn from(map: BTreeMap<Position, Predicate>) -> Self {
        Self { map }
    }
}
