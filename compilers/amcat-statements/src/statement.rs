use std::collections::BTreeSet;
use std::fmt;

use amcat_protocol::{Position, Sentence};
use bitflags::bitflags;

use crate::predicate::Predicate;

/// A member of a statement's subject, object or source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Participant {
    /// Unexpressed subject, e.g. "VVD stijgt" has no one doing the rising.
    Implicit,
    Explicit(Position),
}

impl Participant {
    pub fn position(&self) -> Option<Position> {
        match self {
            Participant::Implicit => None,
            Participant::Explicit(p) => Some(*p),
        }
    }
}

impl From<Position> for Participant {
    fn from(position: Position) -> Self {
        Participant::Explicit(position)
    }
}

impl From<Option<Position>> for Participant {
    fn from(position: Option<Position>) -> Self {
        position.map_or(Participant::Implicit, Participant::Explicit)
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub struct StatementType: u8 {
        /// No explicit subject: the statement describes a state of the world.
        const REALITY = 1;
        /// "X wants Z", derived from a purpose clause.
        const AFFECTIVE = 2;
        /// "doing Y causes Z", derived from a purpose clause.
        const CAUSAL = 4;
    }
}

static TYPE_NAMES: [(StatementType, &str); 3] = [
    (StatementType::REALITY, "Reality"),
    (StatementType::AFFECTIVE, "Affective"),
    (StatementType::CAUSAL, "Causal"),
];

impl StatementType {
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        TYPE_NAMES
            .iter()
            .filter(move |(flag, _)| self.contains(*flag))
            .map(|(_, name)| *name)
    }
}

impl fmt::Display for StatementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.names().collect();
        f.write_str(&names.join(","))
    }
}

/// Part of a statement, for [`Statement::lemmata`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    Subject,
    Predicate,
    Object,
    Source,
    Condition,
}

/// An extracted subject/predicate/object assertion.
///
/// Equality, ordering and hashing cover all six parts; members are held in
/// ordered sets so construction order never matters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Statement {
    subject: BTreeSet<Participant>,
    predicate: Predicate,
    object: BTreeSet<Participant>,
    source: BTreeSet<Participant>,
    condition: BTreeSet<Position>,
    kind: StatementType,
}

impl Statement {
    pub fn new(
        subject: impl IntoIterator<Item = Participant>,
        predicate: Predicate,
        object: impl IntoIterator<Item = Participant>,
    ) -> Self {
        Self {
            subject: subject.into_iter().collect(),
            predicate,
            object: object.into_iter().collect(),
            source: BTreeSet::new(),
            condition: BTreeSet::new(),
            kind: StatementType::empty(),
        }
    }

    pub fn with_source(mut self, source: impl IntoIterator<Item = Participant>) -> Self {
        self.source = source.into_iter().collect();
        self
    }

    pub fn with_condition(mut self, condition: &Predicate) -> Self {
        self.condition = condition.positions().clone();
        self
    }

    pub fn with_type(mut self, kind: StatementType) -> Self {
        self.kind |= kind;
        self
    }

    pub fn subject(&self) -> &BTreeSet<Participant> {
        &self.subject
    }

    pub fn predicate(&self) -> &Predicate {
        &self.predicate
    }

    pub fn object(&self) -> &BTreeSet<Participant> {
        &self.object
    }

    pub fn source(&self) -> &BTreeSet<Participant> {
        &self.source
    }

    pub fn condition(&self) -> &BTreeSet<Position> {
        &self.condition
    }

    pub fn kind(&self) -> StatementType {
        self.kind
    }

    fn slot_positions(&self, slot: Slot) -> Vec<Position> {
        let participants = |set: &BTreeSet<Participant>| -> Vec<Position> {
            set.iter().filter_map(Participant::position).collect()
        };
        match slot {
            Slot::Subject => participants(&self.subject),
            Slot::Predicate => self.predicate.iter().collect(),
            Slot::Object => participants(&self.object),
            Slot::Source => participants(&self.source),
            Slot::Condition => self.condition.iter().copied().collect(),
        }
    }

    /// `lemma/pos` of every explicit token in `slot`, comma separated.
    pub fn lemmata(&self, slot: Slot, sentence: &Sentence) -> String {
        self.slot_positions(slot)
            .into_iter()
            .filter_map(|p| sentence.token(p))
            .map(|t| format!("{}/{}", t.lemma, t.pos))
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Renders the statement with lemmas instead of positions.
    pub fn describe(&self, sentence: &Sentence) -> String {
        self.render(&|p| {
            sentence
                .token(p)
                .map_or_else(|| p.to_string(), |t| t.lemma.clone())
        })
    }

    fn render(&self, name: &dyn Fn(Position) -> String) -> String {
        let participants = |set: &BTreeSet<Participant>| {
            set.iter()
                .map(|m| m.position().map_or_else(|| "_".to_string(), name))
                .collect::<Vec<_>>()
                .join(",")
        };
        let positions = |ps: Vec<Position>| ps.into_iter().map(name).collect::<Vec<_>>().join(",");

        let mut out = String::new();
        if !self.source.is_empty() {
            out.push_str(&participants(&self.source));
            out.push(':');
        }
        out.push_str(&participants(&self.subject));
        out.push('/');
        out.push_str(&positions(self.predicate.iter().collect()));
        if !self.kind.is_empty() {
            out.push_str(&format!(" ({})", self.kind));
        }
        if !self.condition.is_empty() {
            out.push_str(&format!(" (IF {})", positions(self.condition.iter().copied().collect())));
        }
        out.push('/');
        out.push_str(&participants(&self.object));
        out
    }
}

impl fmt::Display for Statement {
    /// `[source:]subject/predicate[ (types)][ (IF condition)]/object`, by position.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(&|p| p.to_string()))
    }
}
