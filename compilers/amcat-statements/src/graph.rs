use petgraph::graph::{Graph, NodeIndex};
use petgraph::unionfind::UnionFind;
use petgraph::visit::EdgeRef;
use petgraph::Directed;
use amcat_protocol::{Position, Sentence, Triple};
use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::error::ExtractionError;
use crate::predicate::{Predicate, PredicateMap, PredicateRelations};

/// Dependency structure of one sentence: tokens are nodes, triples are `parent -> child` edges.
pub struct DependencyGraph {
    graph: Graph<Position, String, Directed>,
    index_map: HashMap<Position, NodeIndex>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self {
            graph: Graph::new(),
            index_map: HashMap::new(),
        }
    }

    pub fn from_triples<'a>(triples: impl IntoIterator<Item = &'a Triple>) -> Self {
        let mut graph = Self::new();
        for triple in triples {
            graph.add_relation(triple.parent, triple.child, &triple.relation);
        }
        graph
    }

    /// Builds the graph of `sentence`, failing on triples that point outside its tokens.
    pub fn from_sentence(sentence: &Sentence) -> Result<Self, ExtractionError> {
        let mut graph = Self::new();
        for triple in &sentence.triples {
            for position in [triple.parent, triple.child] {
                if sentence.token(position).is_none() {
                    return Err(ExtractionError::UnknownPosition {
                        sentence: sentence.id,
                        position,
                    });
                }
            }
            graph.add_relation(triple.parent, triple.child, &triple.relation);
        }
        Ok(graph)
    }

    pub fn add_token(&mut self, position: Position) -> NodeIndex {
        *self
            .index_map
            .entry(position)
            .or_insert_with(|| self.graph.add_node(position))
    }

    pub fn add_relation(&mut self, parent: Position, child: Position, relation: &str) {
        let parent_idx = self.add_token(parent);
        let child_idx = self.add_token(child);

        self.graph.add_edge(parent_idx, child_idx, relation.to_string());
    }

    pub fn token_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn relation_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Merges every pair of tokens joined by one of `relations` into a shared predicate.
    ///
    /// Every token in the graph gets an entry; unmerged tokens map to their singleton.
    /// The partition does not depend on the order the triples were added in.
    pub fn resolve_predicates(&self, relations: &PredicateRelations) -> PredicateMap {
        let mut sets = UnionFind::<usize>::new(self.graph.node_count());

        for edge in self.graph.edge_references() {
            if relations.contains(edge.weight()) {
                sets.union(edge.source().index(), edge.target().index());
            }
        }

        let mut classes: BTreeMap<usize, BTreeSet<Position>> = BTreeMap::new();
        for idx in self.graph.node_indices() {
            let root = sets.find_mut(idx.index());
            classes.entry(root).or_default().insert(self.graph[idx]);
        }

        let mut map = BTreeMap::new();
        for members in classes.into_values() {
            if let Some(predicate) = Predicate::new(members) {
                for position in predicate.iter() {
                    map.insert(position, predicate.clone());
                }
            }
        }
        PredicateMap::from(map)
    }
}

impl Default for DependencyGraph {
    fn default() -> Self {
        Self::new()
    }
}

/// Predicate partition of a bare triple list, without checking positions against a sentence.
pub fn resolve_predicates(triples: &[Triple], relations: &PredicateRelations) -> PredicateMap {
    DependencyGraph::from_triples(triples).resolve_predicates(relations)
}
