//! Query-string encoding for Parse REST endpoints.

use serde_json::Value;
use url::form_urlencoded;

/// Ordered set of query parameters, percent-encoded on [`QueryString::suffix`].
#[derive(Debug, Clone, Default)]
pub struct QueryString {
    pairs: Vec<(String, String)>,
}

impl QueryString {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, key: &str, value: impl Into<String>) {
        self.pairs.push((key.to_string(), value.into()));
    }

    /// Append a parameter whose value is JSON-encoded (e.g. `where`).
    pub fn push_json(&mut self, key: &str, value: &Value) {
        self.pairs.push((key.to_string(), value.to_string()));
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// `?`-prefixed encoded query, or the empty string for no parameters.
    #[must_use]
    pub fn suffix(&self) -> String {
        if self.pairs.is_empty() {
            return String::new();
        }
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (key, value) in &self.pairs {
            serializer.append_pair(key, value);
        }
        format!("?{}", serializer.finish())
    }
}

#[cfg(test)]
mod tests {
    use super::QueryString;
    use serde_json::json;

    #[test]
    fn empty_query_has_empty_suffix() {
        assert_eq!(QueryString::new().suffix(), "");
    }

    #[test]
    fn pairs_are_encoded_in_insertion_order() {
        let mut query = QueryString::new();
        query.push("limit", "10");
        query.push("order", "-createdAt");
        assert_eq!(query.suffix(), "?limit=10&order=-createdAt");
    }

    #[test]
    fn json_values_are_percent_encoded() {
        let mut query = QueryString::new();
        query.push_json("where", &json!({"isActive": true}));
        assert_eq!(query.suffix(), "?where=%7B%22isActive%22%3Atrue%7D");
    }
}
