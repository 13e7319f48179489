use std::collections::BTreeMap;

use amcat_protocol::{Article, Sentence, Token, Topic};

use crate::aggregate::aggregate;
use crate::condition::Condition;
use crate::lexicon::SentimentLexicon;
use crate::token::AnnotatedToken;

/// Offsets checked by the `previous=` and comparative rules.
const PRECEDING: [isize; 2] = [-1, -2];

/// Modal verbs that turn a following comparative ("kan beter") negative.
const MODAL_LEMMAS: [&str; 3] = ["kunnen", "mogen", "moeten"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolverOptions {
    /// How far topic spreading and intensifiers look.
    pub radius: usize,
    /// Apply lexicon conditions (`topic=` / `previous=` notes).
    pub conditions: bool,
    /// Apply the comparative-after-modal rule.
    pub comparatives: bool,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self {
            radius: 2,
            conditions: false,
            comparatives: false,
        }
    }
}

/// Upper bound on the search radius accepted from configuration.
pub const MAX_RADIUS: usize = 64;

/// `[+1, -1, +2, -2, ..., +radius, -radius]`
pub fn search_pattern(radius: usize) -> Vec<isize> {
    let radius = isize::try_from(radius).unwrap_or(isize::MAX);
    (1..=radius).flat_map(|d| [d, -d]).collect()
}

/// No window reaches further than the slice is long.
fn pattern_for(tokens: &[AnnotatedToken], radius: usize) -> Vec<isize> {
    search_pattern(radius.min(tokens.len()))
}

/// Indices reached from `i` by `offsets`, in order, skipping anything outside
/// the slice or in another sentence.
fn window<'a>(tokens: &'a [AnnotatedToken], i: usize, offsets: &'a [isize]) -> impl Iterator<Item = usize> + 'a {
    let sentence = tokens[i].sentence();
    offsets.iter().filter_map(move |&offset| {
        let j = i.checked_add_signed(offset)?;
        (j < tokens.len() && tokens[j].sentence() == sentence).then_some(j)
    })
}

/// Gives each untagged token the nearest original topic within `radius`.
///
/// Reads from a snapshot, so a topic never travels further than `radius`.
pub fn spread_topics(tokens: &mut [AnnotatedToken], radius: usize) {
    let pattern = pattern_for(tokens, radius);
    let original: Vec<Option<Topic>> = tokens.iter().map(|t| t.topic.clone()).collect();

    for i in 0..tokens.len() {
        if tokens[i].topic.is_some() {
            continue;
        }
        let found = window(tokens, i, &pattern).find_map(|j| original[j].clone());
        if found.is_some() {
            tokens[i].topic = found;
        }
    }
}

/// Multiplies the nearest sentiment within `radius` by each intensifier, once.
pub fn resolve_intensifiers(tokens: &mut [AnnotatedToken], radius: usize) {
    let pattern = pattern_for(tokens, radius);

    for i in 0..tokens.len() {
        let Some(factor) = tokens[i].intensity.filter(|f| *f != 0.0) else {
            continue;
        };
        let target = window(tokens, i, &pattern).find(|&j| tokens[j].contribution().is_some());
        if let Some(sentiment) = target.and_then(|j| tokens[j].sentiment.as_mut()) {
            *sentiment *= factor;
        }
        tokens[i].intensity = None;
    }
}

/// Drops sentiments whose lexicon condition does not hold, consuming the condition.
pub fn resolve_conditions(tokens: &mut [AnnotatedToken]) {
    for i in 0..tokens.len() {
        let Some(condition) = tokens[i].condition.take() else {
            continue;
        };
        let holds = match &condition {
            Condition::TopicIn(topics) => tokens[i].topic.as_ref().is_some_and(|t| topics.contains(t)),
            Condition::PrecededByLemma(lemmas) => {
                window(tokens, i, &PRECEDING).any(|j| lemmas.contains(&tokens[j].token.lemma))
            }
        };
        if !holds {
            tokens[i].sentiment = None;
        }
    }
}

/// "mag/moet/kan beter": a comparative adjective right after a modal is a complaint.
pub fn resolve_comparatives(tokens: &mut [AnnotatedToken]) {
    for i in 0..tokens.len() {
        let token = &tokens[i].token;
        if token.pos != 'A' || !token.word.ends_with("er") {
            continue;
        }
        let after_modal = window(tokens, i, &PRECEDING).any(|j| {
            let prev = &tokens[j].token;
            prev.pos == 'V' && MODAL_LEMMAS.contains(&prev.lemma.as_str())
        });
        if after_modal {
            tokens[i].sentiment = Some(-1.0);
        }
    }
}

/// Runs the passes in order: topics, intensifiers, then the optional ones.
pub fn resolve_tokens(tokens: &mut [AnnotatedToken], options: &ResolverOptions) {
    spread_topics(tokens, options.radius);
    resolve_intensifiers(tokens, options.radius);
    if options.conditions {
        resolve_conditions(tokens);
    }
    if options.comparatives {
        resolve_comparatives(tokens);
    }
}

/// Lexicon lookup plus resolution for sentences and articles.
pub struct SentimentResolver<'a> {
    lexicon: &'a SentimentLexicon,
    options: ResolverOptions,
}

impl<'a> SentimentResolver<'a> {
    pub fn new(lexicon: &'a SentimentLexicon, options: ResolverOptions) -> Self {
        Self { lexicon, options }
    }

    pub fn annotate<'t>(&self, tokens: impl IntoIterator<Item = &'t Token>) -> Vec<AnnotatedToken> {
        tokens
            .into_iter()
            .map(|t| AnnotatedToken::from_lexicon(t, self.lexicon))
            .collect()
    }

    pub fn resolve_sentence_tokens(&self, tokens: &[Token]) -> Vec<AnnotatedToken> {
        let mut annotated = self.annotate(tokens);
        resolve_tokens(&mut annotated, &self.options);
        annotated
    }

    pub fn resolve_sentence(&self, sentence: &Sentence) -> Vec<AnnotatedToken> {
        self.resolve_sentence_tokens(&sentence.tokens)
    }

    /// Resolves each sentence on its own and concatenates the results.
    ///
    /// Windows never leave the enclosing [`Sentence`], whatever the tokens
    /// claim as their sentence id.
    pub fn resolve_article(&self, article: &Article) -> Vec<AnnotatedToken> {
        let annotated: Vec<AnnotatedToken> = article
            .sentences
            .iter()
            .flat_map(|sentence| self.resolve_sentence(sentence))
            .collect();
        tracing::trace!(
            article = %article.id,
            tokens = annotated.len(),
            "resolved article tokens"
        );
        annotated
    }

    /// Normalised sentiment per topic for an article; `None` is the article-wide score.
    pub fn sentiment_per_topic(&self, article: &Article) -> BTreeMap<Option<Topic>, f64> {
        aggregate(&self.resolve_article(article))
    }
}
