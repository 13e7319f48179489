#![no_std]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

pub mod ids;
pub mod lexicon;
pub mod model;

pub use ids::{ArticleId, LemmaId, Position, SentenceId};
pub use lexicon::{Lexicon, LexiconEntry, Topic, TopicAssignment};
pub use model::{Article, ParseRoleError, RoleName, RoleTriple, Sentence, Token, Triple};
