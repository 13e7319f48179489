pub mod error;
pub mod extract;
pub mod graph;
pub mod predicate;
pub mod statement;

pub use error::ExtractionError;
pub use extract::{extract_statements, StatementExtractor};
pub use graph::{resolve_predicates, DependencyGraph};
pub use predicate::{Predicate, PredicateMap, PredicateRelations};
pub use statement::{Participant, Slot, Statement, StatementType};
