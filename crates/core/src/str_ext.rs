//! Extension traits for trimmed-text handling in validation.

/// Extension trait for `str` to handle empty-as-none semantics.
pub trait StrExt {
    /// Returns `Some(String)` if non-empty, `None` if empty.
    ///
    /// Blank optional fields such as `phone` or `search` are treated as absent.
    #[must_use]
    fn to_opt(&self) -> Option<String>;

    /// Returns self if non-empty, otherwise returns `default`.
    #[must_use]
    fn or_str<'a>(&'a self, default: &'a str) -> &'a str;
}

impl StrExt for str {
    #[inline]
    fn to_opt(&self) -> Option<String> {
        (!self.is_empty()).then(|| self.to_string())
    }

    #[inline]
    fn or_str<'a>(&'a self, default: &'a str) -> &'a str {
        if self.is_empty() { default } else { self }
    }
}
