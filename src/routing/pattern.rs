//! Route pattern compilation.
//!
//! A pattern such as `users/:id[09]/edit` compiles into a segment list, a
//! canonical path and a specificity weight. The weight gives every literal
//! segment at index `i` of `n` the value `2^(n - i - 1)`, so earlier literals
//! dominate later ones and variables count for nothing.

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use crate::error::{RouterError, RouterResult};
use crate::routing::matcher::Segment;

/// Captured variable values, keyed by variable name.
pub type Params = BTreeMap<String, String>;

/// A compiled route pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    segments: Vec<Segment>,
    canonical: String,
    weight: u64,
}

impl Pattern {
    /// Compile `pattern`. A single leading `/` is ignored.
    pub fn parse(pattern: &str) -> RouterResult<Self> {
        let body = pattern.strip_prefix('/').unwrap_or(pattern);
        let mut names = HashSet::new();
        let mut segments = Vec::new();

        for raw in body.split('/') {
            let segment = Segment::parse(raw).ok_or_else(|| RouterError::InvalidSegment {
                pattern: pattern.to_string(),
                segment: raw.to_string(),
            })?;
            if let Segment::Variable { name, .. } = &segment {
                if !names.insert(name.clone()) {
                    return Err(RouterError::DuplicatePathId {
                        pattern: pattern.to_string(),
                        name: name.clone(),
                    });
                }
            }
            segments.push(segment);
        }

        let canonical = segments
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("/");
        let weight = weigh(&segments);

        Ok(Self {
            segments,
            canonical,
            weight,
        })
    }

    /// Canonical path: variable kinds always written out.
    pub fn canonical(&self) -> &str {
        &self.canonical
    }

    pub fn weight(&self) -> u64 {
        self.weight
    }

    /// Match a whole path, returning the captured variables.
    pub fn capture(&self, path: &str) -> Option<Params> {
        let mut params = Params::new();
        let mut inputs = path.split('/');

        for segment in &self.segments {
            let input = inputs.next()?;
            if !segment.matches(input) {
                return None;
            }
            if let Segment::Variable { name, .. } = segment {
                params.insert(name.clone(), input.to_string());
            }
        }

        match inputs.next() {
            Some(_) => None,
            None => Some(params),
        }
    }

    /// Returns true if both patterns identify the same route.
    pub fn equivalent(&self, other: &Pattern) -> bool {
        self.segments.len() == other.segments.len()
            && self
                .segments
                .iter()
                .zip(&other.segments)
                .all(|(a, b)| a.equivalent(b))
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical)
    }
}

fn weigh(segments: &[Segment]) -> u64 {
    let n = segments.len();
    segments
        .iter()
        .enumerate()
        .filter(|(_, segment)| segment.is_literal())
        .fold(0u64, |weight, (i, _)| {
            let exponent = u32::try_from(n - i - 1).unwrap_or(u32::MAX);
            weight.saturating_add(2u64.saturating_pow(exponent))
        })
}
