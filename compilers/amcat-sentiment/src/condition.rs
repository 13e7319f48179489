use std::collections::BTreeSet;

use amcat_protocol::Topic;
use nom::{
    branch::alt,
    bytes::complete::{tag, take_while},
    character::complete::char,
    combinator::{map, verify},
    multi::separated_list1,
    sequence::preceded,
    IResult,
};

/// When a lexicon sentiment is allowed to stand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    /// Only while the token's topic is one of these.
    TopicIn(BTreeSet<Topic>),
    /// Only when one of the two preceding tokens has one of these lemmas.
    PrecededByLemma(BTreeSet<String>),
}

fn item(input: &str) -> IResult<&str, &str> {
    take_while(|c: char| c != ',' && c != ';')(input)
}

/// Comma-separated items, trimmed; empty ones are skipped but at least one must remain.
fn items(input: &str) -> IResult<&str, Vec<&str>> {
    verify(
        map(separated_list1(char(','), item), |xs| {
            xs.into_iter().map(str::trim).filter(|x| !x.is_empty()).collect::<Vec<_>>()
        }),
        |xs: &[&str]| !xs.is_empty(),
    )(input)
}

fn condition(input: &str) -> IResult<&str, Condition> {
    alt((
        map(preceded(tag("topic="), items), |xs| {
            Condition::TopicIn(xs.into_iter().map(Topic::new).collect())
        }),
        map(preceded(tag("previous="), items), |xs| {
            Condition::PrecededByLemma(xs.into_iter().map(str::to_string).collect())
        }),
    ))(input)
}

/// Parses a lexicon note such as `topic=a,b` or `previous=niet,geen`.
///
/// Anything after a `;` is ignored. Notes of any other shape give `None`.
pub fn parse_notes(notes: &str) -> Option<Condition> {
    condition(notes.trim_start()).ok().map(|(_, c)| c)
}
