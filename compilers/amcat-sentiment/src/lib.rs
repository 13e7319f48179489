pub mod aggregate;
pub mod condition;
pub mod error;
pub mod lexicon;
pub mod resolve;
pub mod token;

pub use aggregate::{aggregate, compute_sentiment, sentiments_per_topic, total_sentiment};
pub use condition::{parse_notes, Condition};
pub use error::LexiconError;
pub use lexicon::{LexiconRule, SentimentLexicon};
pub use resolve::{
    resolve_comparatives, resolve_conditions, resolve_intensifiers, resolve_tokens, search_pattern,
    spread_topics, ResolverOptions, SentimentResolver, MAX_RADIUS,
};
pub use token::AnnotatedToken;

#[cfg(test)]
mod tests {
    use super::*;
    use amcat_protocol::{
        Article, ArticleId, LemmaId, Lexicon, LexiconEntry, Position, Sentence, SentenceId, Token, Topic,
        TopicAssignment,
    };
    use proptest::prelude::*;
    use std::collections::BTreeSet;

    fn tok(sentence: u32, position: u32, lemma: &str) -> AnnotatedToken {
        AnnotatedToken::new(Token::new(SentenceId(sentence), Position(position), lemma, 'N'))
    }

    fn topic(name: &str) -> Topic {
        Topic::new(name)
    }

    #[test]
    fn test_search_pattern() {
        assert_eq!(search_pattern(2), vec![1, -1, 2, -2]);
        assert!(search_pattern(0).is_empty());
    }

    #[test]
    fn test_compute_sentiment() {
        assert_eq!(compute_sentiment(&[]), None);
        assert_eq!(compute_sentiment(&[1.0, -1.0]), Some(0.0));
        assert_eq!(compute_sentiment(&[2.0]), Some(1.0));
        // magnitude outweighs count
        assert_eq!(compute_sentiment(&[5.0, -1.0, -1.0, -1.0]), Some(0.25));
    }

    #[test]
    fn test_intensifier_is_single_shot() {
        let mut tokens = vec![
            tok(1, 1, "t0"),
            tok(1, 2, "t1").with_intensity(2.0),
            tok(1, 3, "t2").with_sentiment(0.5),
        ];
        resolve_intensifiers(&mut tokens, 2);

        assert_eq!(tokens[2].sentiment, Some(1.0));
        assert_eq!(tokens[1].intensity, None);
        assert_eq!(tokens[0].sentiment, None);
    }

    #[test]
    fn test_intensifier_prefers_right_neighbour() {
        let mut tokens = vec![
            tok(1, 1, "slecht").with_sentiment(-1.0),
            tok(1, 2, "zeer").with_intensity(3.0),
            tok(1, 3, "goed").with_sentiment(1.0),
        ];
        resolve_intensifiers(&mut tokens, 2);

        assert_eq!(tokens[0].sentiment, Some(-1.0));
        assert_eq!(tokens[2].sentiment, Some(3.0));
    }

    #[test]
    fn test_intensifier_stays_in_sentence_and_radius() {
        let mut tokens = vec![
            tok(1, 1, "zeer").with_intensity(2.0),
            tok(2, 1, "goed").with_sentiment(1.0),
        ];
        resolve_intensifiers(&mut tokens, 2);
        assert_eq!(tokens[1].sentiment, Some(1.0));
        // consumed even without a target
        assert_eq!(tokens[0].intensity, None);

        let mut tokens = vec![
            tok(1, 1, "zeer").with_intensity(2.0),
            tok(1, 2, "a"),
            tok(1, 3, "b"),
            tok(1, 4, "goed").with_sentiment(1.0),
        ];
        resolve_intensifiers(&mut tokens, 2);
        assert_eq!(tokens[3].sentiment, Some(1.0));
    }

    #[test]
    fn test_spread_does_not_cascade() {
        let mut tokens = vec![
            tok(1, 1, "a").with_topic(topic("economie")),
            tok(1, 2, "b"),
            tok(1, 3, "c"),
            tok(1, 4, "d"),
            tok(1, 5, "e"),
        ];
        spread_topics(&mut tokens, 2);

        let topics: Vec<Option<&str>> = tokens.iter().map(|t| t.topic.as_ref().map(Topic::as_str)).collect();
        assert_eq!(
            topics,
            vec![Some("economie"), Some("economie"), Some("economie"), None, None]
        );
    }

    #[test]
    fn test_spread_prefers_following_token() {
        let mut tokens = vec![
            tok(1, 1, "a").with_topic(topic("links")),
            tok(1, 2, "b"),
            tok(1, 3, "c").with_topic(topic("rechts")),
            tok(2, 1, "d"),
        ];
        spread_topics(&mut tokens, 2);

        assert_eq!(tokens[1].topic, Some(topic("rechts")));
        assert_eq!(tokens[0].topic, Some(topic("links")));
        assert_eq!(tokens[3].topic, None);
    }

    #[test]
    fn test_topic_condition() {
        let allowed: BTreeSet<Topic> = [topic("economie")].into_iter().collect();
        let mut tokens = vec![
            tok(1, 1, "stijgen")
                .with_sentiment(1.0)
                .with_topic(topic("economie"))
                .with_condition(Condition::TopicIn(allowed.clone())),
            tok(1, 2, "stijgen")
                .with_sentiment(1.0)
                .with_topic(topic("werkloosheid"))
                .with_condition(Condition::TopicIn(allowed.clone())),
            tok(1, 3, "stijgen").with_sentiment(1.0).with_condition(Condition::TopicIn(allowed)),
        ];
        resolve_conditions(&mut tokens);

        assert_eq!(tokens[0].sentiment, Some(1.0));
        assert_eq!(tokens[1].sentiment, None);
        assert_eq!(tokens[2].sentiment, None);
        assert!(tokens.iter().all(|t| t.condition.is_none()));
    }

    #[test]
    fn test_previous_condition() {
        let lemmas: BTreeSet<String> = ["heel".to_string()].into_iter().collect();
        let mut tokens = vec![
            tok(1, 1, "heel"),
            tok(1, 2, "erg"),
            tok(1, 3, "goed")
                .with_sentiment(1.0)
                .with_condition(Condition::PrecededByLemma(lemmas.clone())),
            tok(1, 4, "erg"),
            tok(1, 5, "erg"),
            tok(1, 6, "goed")
                .with_sentiment(1.0)
                .with_condition(Condition::PrecededByLemma(lemmas.clone())),
            tok(2, 1, "goed")
                .with_sentiment(1.0)
                .with_condition(Condition::PrecededByLemma(lemmas)),
        ];
        resolve_conditions(&mut tokens);

        assert_eq!(tokens[2].sentiment, Some(1.0));
        assert_eq!(tokens[5].sentiment, None);
        assert_eq!(tokens[6].sentiment, None);
    }

    fn verb(sentence: u32, position: u32, lemma: &str, word: &str) -> AnnotatedToken {
        AnnotatedToken::new(Token::new(SentenceId(sentence), Position(position), lemma, 'V').with_word(word))
    }

    fn better(sentence: u32, position: u32) -> AnnotatedToken {
        AnnotatedToken::new(Token::new(SentenceId(sentence), Position(position), "goed", 'A').with_word("beter"))
            .with_sentiment(1.0)
    }

    #[test]
    fn test_comparatives() {
        // kan beter
        let mut tokens = vec![verb(1, 1, "kunnen", "kan"), better(1, 2)];
        resolve_comparatives(&mut tokens);
        assert_eq!(tokens[1].sentiment, Some(-1.0));

        // hij beter
        let mut tokens = vec![tok(1, 1, "hij"), better(1, 2)];
        resolve_comparatives(&mut tokens);
        assert_eq!(tokens[1].sentiment, Some(1.0));

        // moet veel beter
        let mut tokens = vec![verb(1, 1, "moeten", "moet"), tok(1, 2, "veel"), better(1, 3)];
        resolve_comparatives(&mut tokens);
        assert_eq!(tokens[2].sentiment, Some(-1.0));

        // mag nog veel beter
        let mut tokens = vec![verb(1, 1, "mogen", "mag"), tok(1, 2, "nog"), tok(1, 3, "veel"), better(1, 4)];
        resolve_comparatives(&mut tokens);
        assert_eq!(tokens[3].sentiment, Some(1.0));

        // kan. beter
        let mut tokens = vec![verb(1, 1, "kunnen", "kan"), better(2, 1)];
        resolve_comparatives(&mut tokens);
        assert_eq!(tokens[1].sentiment, Some(1.0));
    }

    #[test]
    fn test_radius_is_capped_by_sentence_length() {
        let mut tokens = vec![
            tok(1, 1, "economie").with_topic(topic("economie")),
            tok(1, 2, "zeer").with_intensity(2.0),
            tok(1, 3, "goed").with_sentiment(1.0),
        ];
        spread_topics(&mut tokens, usize::MAX);
        resolve_intensifiers(&mut tokens, usize::MAX);

        assert_eq!(tokens[2].topic, Some(topic("economie")));
        assert_eq!(tokens[2].sentiment, Some(2.0));
        assert_eq!(search_pattern(MAX_RADIUS).len(), 2 * MAX_RADIUS);
    }

    fn lexicon() -> SentimentLexicon {
        SentimentLexicon::from_lexicon(&Lexicon {
            version: 1,
            entries: vec![
                LexiconEntry { lemma: "goed".into(), sentiment: Some(1.0), intensity: None, notes: None },
                LexiconEntry { lemma: "slecht".into(), sentiment: Some(-1.0), intensity: None, notes: None },
                LexiconEntry { lemma: "zeer".into(), sentiment: None, intensity: Some(2.0), notes: None },
                LexiconEntry {
                    lemma: "stijgen".into(),
                    sentiment: Some(1.0),
                    intensity: None,
                    notes: Some("topic=economie".into()),
                },
                LexiconEntry { lemma: "raar".into(), sentiment: Some(-0.5), intensity: None, notes: Some("ironisch".into()) },
            ],
            topics: vec![
                TopicAssignment { lemma_id: LemmaId(10), topic: topic("economie") },
                TopicAssignment { lemma_id: LemmaId(11), topic: topic("zorg") },
            ],
        })
    }

    fn push(s: &mut Sentence, lemma: &str, lemma_id: Option<u32>) {
        s.push_token(lemma, 'N');
        if let (Some(id), Some(last)) = (lemma_id, s.tokens.last_mut()) {
            last.lemma_id = Some(LemmaId(id));
        }
    }

    #[test]
    fn test_lexicon_loading() {
        let lex = lexicon();
        assert_eq!(lex.len(), 5);
        assert!(matches!(lex.rule("stijgen").and_then(|r| r.condition.as_ref()), Some(Condition::TopicIn(_))));
        assert_eq!(lex.rule("raar").and_then(|r| r.condition.as_ref()), None);
        assert_eq!(lex.topic(LemmaId(11)), Some(&topic("zorg")));
        assert!(lex.rule("onbekend").is_none());
    }

    #[test]
    fn test_lexicon_archive() {
        let source = Lexicon {
            version: 2,
            entries: vec![LexiconEntry { lemma: "goed".into(), sentiment: Some(1.0), intensity: None, notes: None }],
            topics: vec![],
        };
        let bytes = rkyv::to_bytes::<_, 256>(&source).expect("Failed to serialize Lexicon");
        let lex = SentimentLexicon::from_bytes(&bytes).expect("Failed to load archive");
        assert_eq!(lex.rule("goed").and_then(|r| r.sentiment), Some(1.0));

        assert!(matches!(SentimentLexicon::from_bytes(&[1, 2, 3]), Err(LexiconError::InvalidArchive(_))));
    }

    #[test]
    fn test_article_sentiment_per_topic() {
        let lex = lexicon();

        // economie zeer goed . zorg slecht
        let mut s1 = Sentence::new(SentenceId(1));
        push(&mut s1, "economie", Some(10));
        push(&mut s1, "zeer", None);
        push(&mut s1, "goed", None);
        let mut s2 = Sentence::new(SentenceId(2));
        push(&mut s2, "zorg", Some(11));
        push(&mut s2, "slecht", None);
        let article = Article { id: ArticleId(59074552), sentences: vec![s1, s2] };

        let resolver = SentimentResolver::new(&lex, ResolverOptions::default());
        let resolved = resolver.resolve_article(&article);
        assert_eq!(resolved[2].sentiment, Some(2.0));
        assert_eq!(resolved[2].topic, Some(topic("economie")));
        assert_eq!(resolved[4].topic, Some(topic("zorg")));

        let scores = resolver.sentiment_per_topic(&article);
        assert_eq!(scores.get(&Some(topic("economie"))), Some(&1.0));
        assert_eq!(scores.get(&Some(topic("zorg"))), Some(&-1.0));
        // (2 - 1) / 3
        let overall = scores[&None];
        assert!((overall - 1.0 / 3.0).abs() < 1e-12);
        assert_eq!(total_sentiment(&resolved), Some(overall));
    }

    #[test]
    fn test_article_windows_stay_in_sentence() {
        let mut lex = SentimentLexicon::new();
        assert!(lex.is_empty());
        lex.insert("zeer", LexiconRule { intensity: Some(2.0), ..LexiconRule::default() });
        lex.insert("goed", LexiconRule { sentiment: Some(1.0), ..LexiconRule::default() });
        lex.assign_topic(LemmaId(10), topic("economie"));

        // token ids claim both tokens belong to sentence 1
        let mut s1 = Sentence::new(SentenceId(1));
        s1.tokens.push(Token::new(SentenceId(1), Position(1), "economie", 'N').with_lemma_id(LemmaId(10)));
        s1.tokens.push(Token::new(SentenceId(1), Position(2), "zeer", 'B'));
        let mut s2 = Sentence::new(SentenceId(2));
        s2.tokens.push(Token::new(SentenceId(1), Position(1), "goed", 'A'));
        let article = Article { id: ArticleId(7), sentences: vec![s1, s2] };

        let resolver = SentimentResolver::new(&lex, ResolverOptions::default());
        let resolved = resolver.resolve_article(&article);
        assert_eq!(resolved.len(), article.tokens().count());
        assert_eq!(resolved[1].topic, Some(topic("economie")));
        assert_eq!(resolved[2].sentiment, Some(1.0));
        assert_eq!(resolved[2].topic, None);
    }

    #[test]
    fn test_conditions_are_optional() {
        let lex = lexicon();
        let mut s = Sentence::new(SentenceId(3));
        push(&mut s, "zorg", Some(11));
        push(&mut s, "stijgen", None);

        let plain = SentimentResolver::new(&lex, ResolverOptions::default()).resolve_sentence(&s);
        assert_eq!(plain[1].sentiment, Some(1.0));
        assert!(plain[1].condition.is_some());

        let options = ResolverOptions { conditions: true, ..ResolverOptions::default() };
        let strict = SentimentResolver::new(&lex, options).resolve_sentence(&s);
        assert_eq!(strict[1].sentiment, None);
        assert!(strict[1].condition.is_none());
    }

    #[test]
    fn test_lexicon_miss_is_excluded() {
        let lex = lexicon();
        let mut s = Sentence::new(SentenceId(4));
        push(&mut s, "tafel", None);
        let resolved = SentimentResolver::new(&lex, ResolverOptions::default()).resolve_sentence(&s);

        assert_eq!(resolved[0], AnnotatedToken::new(s.tokens[0].clone()));
        assert!(aggregate(&resolved).is_empty());
        assert_eq!(total_sentiment(&resolved), None);
    }

    proptest! {
        #[test]
        fn test_sentiment_is_bounded(values in prop::collection::vec(-10.0f64..10.0, 0..30)) {
            match compute_sentiment(&values) {
                Some(s) => prop_assert!((-1.0 - 1e-9..=1.0 + 1e-9).contains(&s)),
                None => prop_assert!(values.iter().all(|v| *v == 0.0)),
            }
        }
    }
}
