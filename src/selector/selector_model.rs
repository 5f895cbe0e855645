use thiserror::Error;

/// Errors raised while parsing a selector string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectorError {
    #[error("empty selector")]
    Empty,

    #[error("unexpected {found:?} at offset {offset}")]
    Unexpected { found: char, offset: usize },

    #[error("unexpected end of selector, expected {expected}")]
    UnexpectedEnd { expected: &'static str },

    #[error("invalid identifier at offset {offset}")]
    InvalidIdentifier { offset: usize },

    #[error("unterminated string starting at offset {offset}")]
    UnterminatedString { offset: usize },

    #[error("invalid nth expression {0:?}")]
    InvalidNth(String),

    #[error("unsupported pseudo-class :{0}")]
    UnsupportedPseudo(String),

    #[error(":not() nested deeper than {limit} levels")]
    NestingTooDeep { limit: usize },
}

/// Comma-separated selector group; matches when any member matches.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectorList(pub Vec<ComplexSelector>);

/// Compounds joined by combinators, stored left to right.
/// `combinators[i]` sits between `compounds[i]` and `compounds[i + 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct ComplexSelector {
    pub compounds: Vec<CompoundSelector>,
    pub combinators: Vec<Combinator>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    Descendant,
    Child,
    NextSibling,
    SubsequentSibling,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct CompoundSelector {
    /// `None` is the universal selector.
    pub tag: Option<String>,
    pub simples: Vec<SimpleSelector>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SimpleSelector {
    Id(String),
    Class(String),
    Attribute(AttributeSelector),
    Pseudo(PseudoClass),
}

#[derive(Debug, Clone, PartialEq)]
pub struct AttributeSelector {
    pub name: String,
    /// `None` tests presence only.
    pub matcher: Option<(AttrOp, String)>,
    pub case_insensitive: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttrOp {
    /// `=`
    Equals,
    /// `~=`
    Includes,
    /// `|=`
    DashMatch,
    /// `^=`
    Prefix,
    /// `$=`
    Suffix,
    /// `*=`
    Substring,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PseudoClass {
    FirstChild,
    LastChild,
    OnlyChild,
    NthChild(Nth),
    NthOfType(Nth),
    Not(SelectorList),
}

/// `An+B` with 1-based indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Nth {
    pub a: i64,
    pub b: i64,
}

impl Nth {
    pub fn matches(&self, index: usize) -> bool {
        let index = index as i64;
        if self.a == 0 {
            return index == self.b;
        }
        // Out-of-range coefficients simply never match.
        let Some(diff) = index.checked_sub(self.b) else {
            return false;
        };
        match (diff.checked_rem(self.a), diff.checked_div(self.a)) {
            (Some(rem), Some(steps)) => rem == 0 && steps >= 0,
            _ => false,
        }
    }
}
