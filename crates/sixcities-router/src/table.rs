//! The route table.

use crate::error::RouteError;
use crate::params::Params;
use crate::template::PathTemplate;
use http::Method;

#[derive(Debug)]
struct Entry<T> {
    method: Method,
    template: PathTemplate,
    value: T,
}

/// A successful lookup.
#[derive(Debug, PartialEq, Eq)]
pub struct RouteMatch<'a, T> {
    /// The value registered for the route.
    pub value: &'a T,
    /// The matched template.
    pub template: &'a PathTemplate,
    /// Values captured from parameter segments.
    pub params: Params,
}

/// Routes keyed by method and path template, in registration order.
#[derive(Debug)]
pub struct RouteTable<T> {
    entries: Vec<Entry<T>>,
}

impl<T> Default for RouteTable<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<T> RouteTable<T> {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `value` for `method` and `path`.
    ///
    /// # Errors
    ///
    /// [`RouteError::Duplicate`] if a route with the same method and shape
    /// exists, [`RouteError::InvalidTemplate`] if `path` does not parse.
    pub fn insert(&mut self, method: Method, path: &str, value: T) -> Result<(), RouteError> {
        let template = PathTemplate::parse(path)?;

        if let Some(existing) = self
            .entries
            .iter()
            .find(|e| e.method == method && e.template.same_shape(&template))
        {
            return Err(RouteError::Duplicate {
                method,
                path: path.to_string(),
                existing: existing.template.as_str().to_string(),
            });
        }

        self.entries.push(Entry {
            method,
            template,
            value,
        });
        Ok(())
    }

    /// Finds the route for a request.
    ///
    /// Among matching templates the most specific wins; on a tie the first
    /// registered wins.
    #[must_use]
    pub fn lookup(&self, method: &Method, path: &str) -> Option<RouteMatch<'_, T>> {
        self.entries
            .iter()
            .filter(|e| e.method == *method)
            .filter_map(|e| e.template.matches(path).map(|params| (e, params)))
            .min_by(|(a, _), (b, _)| a.template.cmp_specificity(&b.template))
            .map(|(entry, params)| RouteMatch {
                value: &entry.value,
                template: &entry.template,
                params,
            })
    }

    /// Iterates `(method, template, value)` in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (&Method, &PathTemplate, &T)> {
        self.entries
            .iter()
            .map(|e| (&e.method, &e.template, &e.value))
    }

    /// Number of routes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` when no routes are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
