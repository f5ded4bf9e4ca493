//! Engine configuration.

use std::fmt;

/// Default name-like heuristic: the field name contains `"Name"`.
pub fn contains_name(field: &str) -> bool {
    field.contains("Name")
}

/// Options that tune how requests are interpreted.
///
/// Options are passed explicitly to every call; the engine keeps no global
/// configuration.
///
/// ```
/// use gridquery::GridOptions;
///
/// let options = GridOptions::new()
///     .case_sensitive(true)
///     .ascending_token("ASC")
///     .name_like(|field| field.ends_with("_name"));
///
/// assert!(options.is_name_like("first_name"));
/// assert!(!options.is_name_like("FirstName"));
/// ```
#[derive(Clone)]
pub struct GridOptions {
    case_sensitive: bool,
    ascending_token: String,
    name_like: fn(&str) -> bool,
    lenient_search: bool,
}

impl GridOptions {
    /// Creates options with the default settings.
    pub fn new() -> Self {
        GridOptions::default()
    }

    /// Sets whether text matching respects case.
    ///
    /// Affects `Equal`, `NotEqual`, `Contains`, `StartsWith` and `EndsWith`
    /// on text fields. Defaults to `false`.
    pub fn case_sensitive(mut self, yes: bool) -> Self {
        self.case_sensitive = yes;
        self
    }

    /// Sets the direction token that selects ascending order.
    ///
    /// Any other token sorts descending. Defaults to `"asc"`.
    pub fn ascending_token(mut self, token: impl Into<String>) -> Self {
        self.ascending_token = token.into();
        self
    }

    /// Sets the test deciding which text fields get per-word search.
    pub fn name_like(mut self, test: fn(&str) -> bool) -> Self {
        self.name_like = test;
        self
    }

    /// Sets whether a search term that does not convert to a searchable
    /// column's type is ignored for that column instead of failing the call.
    pub fn lenient_search(mut self, yes: bool) -> Self {
        self.lenient_search = yes;
        self
    }

    /// Returns `true` if text comparisons respect case.
    pub fn is_case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    /// The direction token that means ascending.
    pub fn ascending(&self) -> &str {
        &self.ascending_token
    }

    /// Returns `true` if multi-word search terms must match every word on
    /// `field`.
    pub fn is_name_like(&self, field: &str) -> bool {
        (self.name_like)(field)
    }

    /// Returns `true` if search skips columns the term cannot be coerced to.
    pub fn is_lenient_search(&self) -> bool {
        self.lenient_search
    }
}

impl Default for GridOptions {
    fn default() -> Self {
        GridOptions {
            case_sensitive: false,
            ascending_token: "asc".to_string(),
            name_like: contains_name,
            lenient_search: false,
        }
    }
}

impl fmt::Debug for GridOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GridOptions")
            .field("case_sensitive", &self.case_sensitive)
            .field("ascending_token", &self.ascending_token)
            .field("lenient_search", &self.lenient_search)
            .finish_non_exhaustive()
    }
}
