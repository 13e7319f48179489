use core::fmt;
use core::str::FromStr;

use alloc::string::String;
use alloc::vec::Vec;
use rkyv::{Archive, Deserialize, Serialize};

use crate::ids::{ArticleId, LemmaId, Position, SentenceId};

#[cfg(feature = "serde")]
use serde::{Deserialize as SerdeDeserialize, Serialize as SerdeSerialize};

/// A word occurrence within a sentence. Identity is `(sentence, position)`.
#[derive(Debug, Clone, PartialEq, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[archive(check_bytes)]
pub struct Token {
    pub sentence: SentenceId,
    pub position: Position,
    /// Surface form. Only the comparative-modal rule reads it.
    #[cfg_attr(feature = "serde", serde(default))]
    pub word: String,
    pub lemma: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub lemma_id: Option<LemmaId>,
    pub pos: char,
}

impl Token {
    pub fn new(sentence: SentenceId, position: Position, lemma: impl Into<String>, pos: char) -> Self {
        let lemma = lemma.into();
        Self {
            sentence,
            position,
            word: lemma.clone(),
            lemma,
            lemma_id: None,
            pos,
        }
    }

    pub fn with_word(mut self, word: impl Into<String>) -> Self {
        self.word = word.into();
        self
    }

    pub fn with_lemma_id(mut self, lemma_id: LemmaId) -> Self {
        self.lemma_id = Some(lemma_id);
        self
    }
}

/// A labeled dependency edge `parent -> child` inside one sentence.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[archive(check_bytes)]
pub struct Triple {
    pub parent: Position,
    pub child: Position,
    pub relation: String,
}

impl Triple {
    pub fn new(parent: Position, child: Position, relation: impl Into<String>) -> Self {
        Self { parent, child, relation: relation.into() }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[archive(check_bytes)]
#[repr(u8)]
pub enum RoleName {
    /// Subject of the target predicate.
    Su = 0,
    /// Object of the target predicate.
    Obj = 1,
    /// Quoted source ("according to X").
    Quote = 2,
    /// Purpose/means: the subject's predicate is done in order to reach the target.
    Om = 3,
}

impl RoleName {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoleName::Su => "su",
            RoleName::Obj => "obj",
            RoleName::Quote => "quote",
            RoleName::Om => "om",
        }
    }
}

impl fmt::Display for RoleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseRoleError(pub String);

impl fmt::Display for ParseRoleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown role name '{}' (expected su, obj, quote or om)", self.0)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ParseRoleError {}

impl FromStr for RoleName {
    type Err = ParseRoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "su" => Ok(RoleName::Su),
            "obj" => Ok(RoleName::Obj),
            "quote" => Ok(RoleName::Quote),
            "om" => Ok(RoleName::Om),
            other => Err(ParseRoleError(String::from(other))),
        }
    }
}

/// Semantic role annotation: `subject` (or nothing) plays `role` for the predicate of `object`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[archive(check_bytes)]
pub struct RoleTriple {
    pub subject: Option<Position>,
    pub role: RoleName,
    pub object: Position,
}

impl RoleTriple {
    pub fn new(subject: Option<Position>, role: RoleName, object: Position) -> Self {
        Self { subject, role, object }
    }
}

/// A parsed sentence: its tokens in order plus the dependency triples over them.
#[derive(Debug, Clone, PartialEq, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[archive(check_bytes)]
pub struct Sentence {
    pub id: SentenceId,
    pub tokens: Vec<Token>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub triples: Vec<Triple>,
}

impl Sentence {
    pub fn new(id: SentenceId) -> Self {
        Self { id, tokens: Vec::new(), triples: Vec::new() }
    }

    /// Appends a token at the next position and returns that position.
    pub fn push_token(&mut self, lemma: impl Into<String>, pos: char) -> Position {
        let position = Position(self.tokens.len() as u32 + 1);
        self.tokens.push(Token::new(self.id, position, lemma, pos));
        position
    }

    pub fn add_triple(&mut self, parent: Position, child: Position, relation: impl Into<String>) {
        self.triples.push(Triple::new(parent, child, relation));
    }

    pub fn token(&self, position: Position) -> Option<&Token> {
        self.tokens.iter().find(|t| t.position == position)
    }
}

#[derive(Debug, Clone, PartialEq, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[archive(check_bytes)]
pub struct Article {
    pub id: ArticleId,
    pub sentences: Vec<Sentence>,
}

impl Article {
    /// All tokens of the article, sentence by sentence.
    pub fn tokens(&self) -> impl Iterator<Item = &Token> {
        self.sentences.iter().flat_map(|s| s.tokens.iter())
    }
}
