use core::fmt;

use rkyv::{Archive, Deserialize, Serialize};

#[cfg(feature = "serde")]
use serde::{Deserialize as SerdeDeserialize, Serialize as SerdeSerialize};

macro_rules! define_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Archive, Serialize, Deserialize)]
        #[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
        #[cfg_attr(feature = "serde", serde(transparent))]
        #[archive(check_bytes)]
        #[repr(transparent)]
        pub struct $name(pub u32);

        impl $name {
            pub const fn new(id: u32) -> Self {
                Self(id)
            }
        }

        impl From<u32> for $name {
            fn from(id: u32) -> Self {
                Self(id)
            }
        }

        impl From<$name> for u32 {
            fn from(id: $name) -> u32 {
                id.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

define_id!(LemmaId, "Identifier of a lemma in the lemma table; topic assignments are keyed on it.");
define_id!(SentenceId, "Identifier of an analysed sentence.");
define_id!(ArticleId, "Identifier of an article (an ordered run of sentences).");
define_id!(Position, "1-based position of a token within its sentence.");
