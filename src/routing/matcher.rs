//! Segment matching logic.
//!
//! # Responsibilities
//! - Parse one pattern segment into a literal or a typed variable
//! - Match one input segment against it
//! - Decide whether two declared segments denote the same route position
//!
//! # Design Decisions
//! - Literal segments are case-sensitive exact matches
//! - Variable classes are ASCII only and never match an empty segment
//! - No regex: each segment is checked in O(len)

use std::fmt;

/// Character class of a variable segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VarKind {
    /// `[09]`: ASCII digits.
    Digits,
    /// `[AZ]`: ASCII letters.
    Alpha,
    /// `[AZ09]` or no suffix: ASCII letters and digits.
    Alnum,
}

impl VarKind {
    fn from_code(code: &str) -> Option<Self> {
        match code {
            "09" => Some(VarKind::Digits),
            "AZ" => Some(VarKind::Alpha),
            "AZ09" => Some(VarKind::Alnum),
            _ => None,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            VarKind::Digits => "09",
            VarKind::Alpha => "AZ",
            VarKind::Alnum => "AZ09",
        }
    }

    /// Returns true if `value` is a non-empty run of this class.
    pub fn accepts(self, value: &str) -> bool {
        !value.is_empty()
            && value.chars().all(|c| match self {
                VarKind::Digits => c.is_ascii_digit(),
                VarKind::Alpha => c.is_ascii_alphabetic(),
                VarKind::Alnum => c.is_ascii_alphanumeric(),
            })
    }

    /// Two kinds are interchangeable when equal or when either is the default.
    pub fn compatible(self, other: VarKind) -> bool {
        self == other || self == VarKind::Alnum || other == VarKind::Alnum
    }
}

/// One `/`-delimited piece of a route pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    Variable { name: String, kind: VarKind },
}

impl Segment {
    /// Parse a raw segment. `None` means a malformed `:` segment.
    pub fn parse(raw: &str) -> Option<Self> {
        let Some(body) = raw.strip_prefix(':') else {
            return Some(Segment::Literal(raw.to_string()));
        };

        let (name, kind) = match body.split_once('[') {
            Some((name, rest)) => {
                let code = rest.strip_suffix(']')?;
                (name, VarKind::from_code(code)?)
            }
            None => (body, VarKind::Alnum),
        };

        let is_word = |c: char| c.is_ascii_alphanumeric() || c == '_';
        if name.is_empty() || !name.chars().all(is_word) {
            return None;
        }

        Some(Segment::Variable {
            name: name.to_string(),
            kind,
        })
    }

    pub fn is_literal(&self) -> bool {
        matches!(self, Segment::Literal(_))
    }

    /// Returns true if the input segment satisfies this pattern segment.
    pub fn matches(&self, input: &str) -> bool {
        match self {
            Segment::Literal(lit) => lit == input,
            Segment::Variable { kind, .. } => kind.accepts(input),
        }
    }

    /// Returns true if both segments claim the same route position.
    ///
    /// Variable names are irrelevant; only kinds count.
    pub fn equivalent(&self, other: &Segment) -> bool {
        match (self, other) {
            (Segment::Literal(a), Segment::Literal(b)) => a == b,
            (Segment::Variable { kind: a, .. }, Segment::Variable { kind: b, .. }) => {
                a.compatible(*b)
            }
            _ => false,
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Literal(lit) => f.write_str(lit),
            Segment::Variable { name, kind } => write!(f, ":{}[{}]", name, kind.code()),
        }
    }
}
