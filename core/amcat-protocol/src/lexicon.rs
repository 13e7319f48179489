use core::fmt;

use alloc::string::String;
use alloc::vec::Vec;
use rkyv::{Archive, Deserialize, Serialize};

use crate::ids::LemmaId;

#[cfg(feature = "serde")]
use serde::{Deserialize as SerdeDeserialize, Serialize as SerdeSerialize};

/// Externally assigned topic tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
#[archive(check_bytes)]
pub struct Topic(pub String);

impl Topic {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One row of a sentiment lexicon, keyed by lemma.
#[derive(Debug, Clone, PartialEq, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[archive(check_bytes)]
pub struct LexiconEntry {
    pub lemma: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub sentiment: Option<f64>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub intensity: Option<f64>,
    /// Rule annotation such as `topic=economy,finance` or `previous=niet,geen`.
    #[cfg_attr(feature = "serde", serde(default))]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[archive(check_bytes)]
pub struct TopicAssignment {
    pub lemma_id: LemmaId,
    pub topic: Topic,
}

/// Serialisable lexicon: sentiment rows plus the lemma-id topic table.
#[derive(Debug, Clone, PartialEq, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[archive(check_bytes)]
pub struct Lexicon {
    pub version: u32,
    pub entries: Vec<LexiconEntry>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub topics: Vec<TopicAssignment>,
}
