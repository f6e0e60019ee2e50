//! Search query types

/// Default language filter (ISO 639-1).
pub const DEFAULT_LANGUAGE: &str = "en";

/// Default and maximum number of results per search (the provider caps
/// `maxResults` at 40).
pub const MAX_RESULTS_LIMIT: u32 = 40;

/// Terms searched when the caller supplies neither text nor category.
pub const FALLBACK_TERMS: &str = "subject:fiction";

/// Category used by bestseller lookups.
pub const BESTSELLER_CATEGORY: &str = "bestseller";

/// A catalog search request.
///
/// Two queries share a cache entry iff their [`terms`](Self::terms) (text
/// with the category folded in, sanitized and lowercased) and
/// [`language`](Self::language) match. `max_results` is not part of that
/// identity.
///
/// ```rust
/// # use mimir::SearchQuery;
/// let query = SearchQuery::new("Dune")
///     .language("fr")
///     .category("science fiction")
///     .max_results(10);
/// assert_eq!(query.terms(), "dune subject:science fiction");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    /// Free-text query as typed by the caller.
    pub text: String,
    /// ISO 639-1 language code. Default: `"en"`.
    pub language: String,
    /// Optional category, searched as `subject:<category>`.
    pub category: Option<String>,
    /// Result cap. `None` means [`MAX_RESULTS_LIMIT`].
    pub max_results: Option<u32>,
}

impl SearchQuery {
    /// Create a query for `text` in the default language.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            language: DEFAULT_LANGUAGE.to_string(),
            category: None,
            max_results: None,
        }
    }

    /// Bestsellers for a year, expressed as an ordinary search
    /// (`subject:bestseller <year>`).
    pub fn bestsellers(year: i32) -> Self {
        Self::new("").category(format!("{BESTSELLER_CATEGORY} {year}"))
    }

    /// Set the language filter. Blank codes keep the default.
    pub fn language(mut self, language: impl Into<String>) -> Self {
        let language = language.into().trim().to_lowercase();
        if !language.is_empty() {
            self.language = language;
        }
        self
    }

    /// Set the category filter. Blank categories are ignored.
    pub fn category(mut self, category: impl Into<String>) -> Self {
        let category = category.into();
        self.category = if category.trim().is_empty() {
            None
        } else {
            Some(category)
        };
        self
    }

    /// Set the result cap.
    pub fn max_results(mut self, n: u32) -> Self {
        self.max_results = Some(n);
        self
    }

    /// Effective result cap, clamped to `1..=MAX_RESULTS_LIMIT`.
    pub fn result_limit(&self) -> u32 {
        self.max_results
            .unwrap_or(MAX_RESULTS_LIMIT)
            .clamp(1, MAX_RESULTS_LIMIT)
    }

    /// Sanitized search terms with original casing: free text, then the
    /// category as `subject:<category>`. Falls back to [`FALLBACK_TERMS`]
    /// when both are empty.
    pub fn upstream_terms(&self) -> String {
        let text = sanitize(&self.text);
        let subject = self
            .category
            .as_deref()
            .map(sanitize)
            .filter(|c| !c.is_empty())
            .map(|c| format!("subject:{c}"));

        match (text.is_empty(), subject) {
            (true, None) => FALLBACK_TERMS.to_string(),
            (true, Some(subject)) => subject,
            (false, None) => text,
            (false, Some(subject)) => format!("{text} {subject}"),
        }
    }

    /// Normalized terms used for cache identity.
    pub fn terms(&self) -> String {
        self.upstream_terms().to_lowercase()
    }
}

/// Strip everything except alphanumerics and whitespace, then collapse runs
/// of whitespace to single spaces.
///
/// Keeps user input from injecting operators into the provider's query
/// syntax.
pub fn sanitize(input: &str) -> String {
    let kept: String = input
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect();
    kept.split_whitespace().collect::<Vec<_>>().join(" ")
}
