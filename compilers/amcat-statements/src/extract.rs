use std::collections::{BTreeMap, BTreeSet};

use amcat_protocol::{Position, RoleName, RoleTriple, Sentence};

use crate::error::ExtractionError;
use crate::graph::DependencyGraph;
use crate::predicate::{Predicate, PredicateMap, PredicateRelations};
use crate::statement::{Participant, Statement, StatementType};

/// Role fillers collected for one predicate.
#[derive(Debug, Default)]
struct RoleBuckets {
    su: BTreeSet<Participant>,
    obj: BTreeSet<Participant>,
    quote: BTreeSet<Participant>,
    /// Means predicates done in order to achieve this one.
    om: BTreeSet<Predicate>,
}

#[derive(Debug, Clone, Default)]
pub struct StatementExtractor {
    relations: PredicateRelations,
}

impl StatementExtractor {
    pub fn new(relations: PredicateRelations) -> Self {
        Self { relations }
    }

    pub fn relations(&self) -> &PredicateRelations {
        &self.relations
    }

    /// Derives statements from the semantic roles of one sentence.
    ///
    /// A predicate with both a subject and an object yields one direct statement
    /// (tagged `Reality` when the only subject is implicit). A predicate with an
    /// object and a purpose link yields an `Affective` and a `Causal` statement
    /// per means predicate. Any other role combination yields nothing.
    /// Statements come out ordered by predicate.
    pub fn extract(&self, sentence: &Sentence, roles: &[RoleTriple]) -> Result<Vec<Statement>, ExtractionError> {
        let graph = DependencyGraph::from_sentence(sentence)?;
        let predicates = graph.resolve_predicates(&self.relations);
        let buckets = bucket_roles(sentence, &predicates, roles)?;

        let mut statements = Vec::new();
        for (predicate, rels) in &buckets {
            if !rels.obj.is_empty() && !rels.su.is_empty() {
                let mut statement = Statement::new(rels.su.iter().copied(), predicate.clone(), rels.obj.iter().copied())
                    .with_source(rels.quote.iter().copied());
                if rels.su.len() == 1 && rels.su.contains(&Participant::Implicit) {
                    statement = statement.with_type(StatementType::REALITY);
                }
                statements.push(statement);
            } else if !rels.obj.is_empty() && !rels.om.is_empty() {
                let none = RoleBuckets::default();
                for means in &rels.om {
                    let means_rels = buckets.get(means).unwrap_or(&none);

                    // S says X does Y in order to reach Z: X wants Z (according to S)
                    statements.push(
                        Statement::new(means_rels.su.iter().copied(), predicate.clone(), rels.obj.iter().copied())
                            .with_source(means_rels.quote.iter().copied())
                            .with_type(StatementType::AFFECTIVE),
                    );
                    // ...and X believes doing Y brings about Z
                    statements.push(
                        Statement::new(means_rels.obj.iter().copied(), predicate.clone(), rels.obj.iter().copied())
                            .with_source(means_rels.quote.union(&means_rels.su).copied())
                            .with_condition(means)
                            .with_type(StatementType::CAUSAL),
                    );
                }
            } else {
                tracing::debug!(sentence = %sentence.id, %predicate, "incomplete roles, no statement");
            }
        }

        tracing::debug!(
            sentence = %sentence.id,
            tokens = graph.token_count(),
            predicates = predicates.partition().len(),
            statements = statements.len(),
            "extracted statements"
        );
        Ok(statements)
    }
}

/// Extracts statements with the default predicate relations (`vc`).
pub fn extract_statements(sentence: &Sentence, roles: &[RoleTriple]) -> Result<Vec<Statement>, ExtractionError> {
    StatementExtractor::default().extract(sentence, roles)
}

fn bucket_roles(
    sentence: &Sentence,
    predicates: &PredicateMap,
    roles: &[RoleTriple],
) -> Result<BTreeMap<Predicate, RoleBuckets>, ExtractionError> {
    let mut buckets: BTreeMap<Predicate, RoleBuckets> = BTreeMap::new();

    for role in roles {
        let target = predicate_of(sentence, predicates, role.object)?;
        match role.role {
            RoleName::Su | RoleName::Obj | RoleName::Quote => {
                let participant = match role.subject {
                    Some(position) => Participant::Explicit(checked(sentence, position)?),
                    None => Participant::Implicit,
                };
                let bucket = buckets.entry(target).or_default();
                let set = match role.role {
                    RoleName::Su => &mut bucket.su,
                    RoleName::Obj => &mut bucket.obj,
                    _ => &mut bucket.quote,
                };
                set.insert(participant);
            }
            RoleName::Om => {
                let means_position = role.subject.ok_or(ExtractionError::MissingMeans {
                    sentence: sentence.id,
                    target: role.object,
                })?;
                let means = predicate_of(sentence, predicates, means_position)?;
                buckets.entry(target).or_default().om.insert(means);
            }
        }
    }

    Ok(buckets)
}

fn checked(sentence: &Sentence, position: Position) -> Result<Position, ExtractionError> {
    match sentence.token(position) {
        Some(_) => Ok(position),
        None => Err(ExtractionError::UnknownPosition {
            sentence: sentence.id,
            position,
        }),
    }
}

fn predicate_of(sentence: &Sentence, predicates: &PredicateMap, position: Position) -> Result<Predicate, ExtractionError> {
    checked(sentence, position).map(|p| predicates.get(p))
}
