use std::collections::HashMap;

use amcat_protocol::{LemmaId, Lexicon, Topic};
use rkyv::AlignedVec;

use crate::condition::{parse_notes, Condition};
use crate::error::LexiconError;

/// What the lexicon says about one lemma.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LexiconRule {
    pub sentiment: Option<f64>,
    pub intensity: Option<f64>,
    pub condition: Option<Condition>,
}

/// In-memory lexicon: sentiment rules by lemma, topics by lemma id.
///
/// Read-only once built, so one instance can serve any number of threads.
#[derive(Debug, Clone, Default)]
pub struct SentimentLexicon {
    rules: HashMap<String, LexiconRule>,
    topics: HashMap<LemmaId, Topic>,
}

impl SentimentLexicon {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the lookup tables, turning each entry's notes into a [`Condition`].
    pub fn from_lexicon(lexicon: &Lexicon) -> Self {
        let mut rules = HashMap::with_capacity(lexicon.entries.len());
        for entry in &lexicon.entries {
            let condition = entry.notes.as_deref().and_then(|notes| {
                let parsed = parse_notes(notes);
                if parsed.is_none() {
                    tracing::debug!(lemma = %entry.lemma, notes, "ignoring unrecognised lexicon notes");
                }
                parsed
            });
            rules.insert(
                entry.lemma.clone(),
                LexiconRule {
                    sentiment: entry.sentiment,
                    intensity: entry.intensity,
                    condition,
                },
            );
        }

        let topics: HashMap<LemmaId, Topic> = lexicon
            .topics
            .iter()
            .map(|a| (a.lemma_id, a.topic.clone()))
            .collect();

        tracing::debug!(
            version = lexicon.version,
            rules = rules.len(),
            topics = topics.len(),
            "loaded sentiment lexicon"
        );
        Self { rules, topics }
    }

    /// Loads a lexicon archive produced by `amcat compile-lexicon`.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, LexiconError> {
        // archives must be aligned; file buffers are not
        let mut aligned = AlignedVec::with_capacity(bytes.len());
        aligned.extend_from_slice(bytes);

        let lexicon: Lexicon =
            rkyv::from_bytes(&aligned).map_err(|e| LexiconError::InvalidArchive(e.to_string()))?;
        Ok(Self::from_lexicon(&lexicon))
    }

    pub fn insert(&mut self, lemma: impl Into<String>, rule: LexiconRule) {
        self.rules.insert(lemma.into(), rule);
    }

    pub fn assign_topic(&mut self, lemma_id: LemmaId, topic: Topic) {
        self.topics.insert(lemma_id, topic);
    }

    pub fn rule(&self, lemma: &str) -> Option<&LexiconRule> {
        self.rules.get(lemma)
    }

    pub fn topic(&self, lemma_id: LemmaId) -> Option<&Topic> {
        self.topics.get(&lemma_id)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
