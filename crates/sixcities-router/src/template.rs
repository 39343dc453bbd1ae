//! Path template parsing and matching.

use crate::error::RouteError;
use crate::params::Params;
use std::cmp::Ordering;
use std::fmt;

/// One segment of a path template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Must equal the request segment exactly.
    Literal(String),
    /// Captures the request segment under this name.
    Param(String),
}

impl Segment {
    const fn is_param(&self) -> bool {
        matches!(self, Self::Param(_))
    }
}

/// A parsed path template such as `/offers/premium/:city`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathTemplate {
    raw: String,
    segments: Vec<Segment>,
}

impl PathTemplate {
    /// Parses a template. Empty segments are ignored, so `/offers/` and
    /// `/offers` are the same template.
    ///
    /// # Errors
    ///
    /// Returns [`RouteError::InvalidTemplate`] for a template without a
    /// leading `/`, an unnamed `:` segment, or a parameter name used twice.
    pub fn parse(path: &str) -> Result<Self, RouteError> {
        let invalid = |reason| RouteError::InvalidTemplate {
            path: path.to_string(),
            reason,
        };

        if !path.starts_with('/') {
            return Err(invalid("template must start with '/'"));
        }

        let mut segments = Vec::new();
        for part in split_path(path) {
            if let Some(name) = part.strip_prefix(':') {
                if name.is_empty() {
                    return Err(invalid("parameter segment has no name"));
                }
                if segments
                    .iter()
                    .any(|s| matches!(s, Segment::Param(existing) if existing == name))
                {
                    return Err(invalid("parameter name used twice"));
                }
                segments.push(Segment::Param(name.to_string()));
            } else {
                segments.push(Segment::Literal(part.to_string()));
            }
        }

        Ok(Self {
            raw: path.to_string(),
            segments,
        })
    }

    /// The template as registered.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Parsed segments.
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Matches a request path, capturing parameter values.
    #[must_use]
    pub fn matches(&self, path: &str) -> Option<Params> {
        let mut params = Params::new();
        let mut parts = split_path(path);

        for segment in &self.segments {
            let part = parts.next()?;
            match segment {
                Segment::Literal(expected) if expected != part => return None,
                Segment::Literal(_) => {}
                Segment::Param(name) => params.push(name.as_str(), part),
            }
        }

        if parts.next().is_some() {
            return None;
        }
        Some(params)
    }

    /// Two templates overlap exactly when they have the same literals in
    /// the same places, whatever the parameter names.
    #[must_use]
    pub fn same_shape(&self, other: &Self) -> bool {
        self.segments.len() == other.segments.len()
            && self
                .segments
                .iter()
                .zip(&other.segments)
                .all(|(a, b)| match (a, b) {
                    (Segment::Literal(x), Segment::Literal(y)) => x == y,
                    (Segment::Param(_), Segment::Param(_)) => true,
                    _ => false,
                })
    }

    /// Orders templates so that the more specific one sorts first: at the
    /// first position where one template has a literal and the other a
    /// parameter, the literal wins.
    #[must_use]
    pub fn cmp_specificity(&self, other: &Self) -> Ordering {
        self.segments
            .iter()
            .zip(&other.segments)
            .map(|(a, b)| a.is_param().cmp(&b.is_param()))
            .find(|o| o.is_ne())
            .unwrap_or(Ordering::Equal)
    }

    /// Joins a mount prefix and a route path into one template string.
    #[must_use]
    pub fn join(prefix: &str, path: &str) -> String {
        let prefix = prefix.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        match (prefix.is_empty(), path.is_empty()) {
            (true, true) => "/".to_string(),
            (true, false) => format!("/{path}"),
            (false, true) => prefix.to_string(),
            (false, false) => format!("{prefix}/{path}"),
        }
    }
}

impl fmt::Display for PathTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

fn split_path(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}
