use amcat_protocol::{Position, SentenceId};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractionError {
    /// A triple or role refers to a position that has no token in the sentence.
    #[error("sentence {sentence}: no token at position {position}")]
    UnknownPosition { sentence: SentenceId, position: Position },

    #[error("sentence {sentence}: 'om' role on position {target} has no means position")]
    MissingMeans { sentence: SentenceId, target: Position },

    #[error("predicate relation labels must not be blank")]
    BlankRelationLabel,
}
