use thiserror::Error;

#[derive(Debug, Error)]
pub enum LexiconError {
    #[error("invalid lexicon archive: {0}")]
    InvalidArchive(String),
}
