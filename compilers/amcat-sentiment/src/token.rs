use amcat_protocol::{SentenceId, Token, Topic};

use crate::condition::Condition;
use crate::lexicon::SentimentLexicon;

/// A token plus the fields the resolution passes derive and rewrite.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotatedToken {
    pub token: Token,
    pub topic: Option<Topic>,
    pub sentiment: Option<f64>,
    pub intensity: Option<f64>,
    /// Pending rule; cleared once evaluated.
    pub condition: Option<Condition>,
}

impl AnnotatedToken {
    pub fn new(token: Token) -> Self {
        Self {
            token,
            topic: None,
            sentiment: None,
            intensity: None,
            condition: None,
        }
    }

    /// Looks the token up in `lexicon`. A miss leaves every derived field empty.
    pub fn from_lexicon(token: &Token, lexicon: &SentimentLexicon) -> Self {
        let mut annotated = Self::new(token.clone());
        annotated.topic = token.lemma_id.and_then(|id| lexicon.topic(id)).cloned();
        if let Some(rule) = lexicon.rule(&token.lemma) {
            annotated.sentiment = rule.sentiment;
            annotated.intensity = rule.intensity;
            annotated.condition = rule.condition.clone();
        }
        annotated
    }

    pub fn with_topic(mut self, topic: Topic) -> Self {
        self.topic = Some(topic);
        self
    }

    pub fn with_sentiment(mut self, sentiment: f64) -> Self {
        self.sentiment = Some(sentiment);
        self
    }

    pub fn with_intensity(mut self, intensity: f64) -> Self {
        self.intensity = Some(intensity);
        self
    }

    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.condition = Some(condition);
        self
    }

    pub fn sentence(&self) -> SentenceId {
        self.token.sentence
    }

    /// The sentiment this token contributes; zero counts as none.
    pub fn contribution(&self) -> Option<f64> {
        self.sentiment.filter(|s| *s != 0.0)
    }
}
