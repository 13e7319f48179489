use std::collections::BTreeMap;

use amcat_protocol::Topic;

use crate::token::AnnotatedToken;

/// `sum(s) / sum(|s|)`: in `[-1, 1]`, weighted by magnitude rather than count.
///
/// `None` when there is nothing to weigh.
pub fn compute_sentiment(sentiments: &[f64]) -> Option<f64> {
    let magnitude: f64 = sentiments.iter().map(|s| s.abs()).sum();
    if magnitude == 0.0 {
        return None;
    }
    Some(sentiments.iter().sum::<f64>() / magnitude)
}

/// Contributing sentiments per topic. Every contribution also lands in the `None` bucket.
pub fn sentiments_per_topic(tokens: &[AnnotatedToken]) -> BTreeMap<Option<Topic>, Vec<f64>> {
    let mut buckets: BTreeMap<Option<Topic>, Vec<f64>> = BTreeMap::new();
    for token in tokens {
        let Some(sentiment) = token.contribution() else {
            continue;
        };
        if let Some(topic) = &token.topic {
            buckets.entry(Some(topic.clone())).or_default().push(sentiment);
        }
        buckets.entry(None).or_default().push(sentiment);
    }
    buckets
}

pub fn aggregate(tokens: &[AnnotatedToken]) -> BTreeMap<Option<Topic>, f64> {
    sentiments_per_topic(tokens)
        .into_iter()
        .filter_map(|(topic, values)| compute_sentiment(&values).map(|s| (topic, s)))
        .collect()
}

pub fn total_sentiment(tokens: &[AnnotatedToken]) -> Option<f64> {
    let values: Vec<f64> = tokens.iter().filter_map(AnnotatedToken::contribution).collect();
    compute_sentiment(&values)
}
