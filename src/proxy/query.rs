//! Recognized query parameters of the collection proxy.

use std::collections::HashMap;

use url::form_urlencoded;

/// Query parameters the collection proxy forwards. Anything else is dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectionQuery {
    pub search: Option<String>,
    pub category: Option<String>,
    /// Forwarded as given; "true"/"false" encoding is the caller's job.
    pub is_active: Option<String>,
}

impl CollectionQuery {
    /// Pick the recognized parameters out of an inbound mapping.
    ///
    /// Empty values count as absent.
    pub fn from_params(params: &HashMap<String, String>) -> Self {
        let pick = |name: &str| params.get(name).filter(|v| !v.is_empty()).cloned();

        Self {
            search: pick("search"),
            category: pick("category"),
            is_active: pick("isActive"),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.search.is_none() && self.category.is_none() && self.is_active.is_none()
    }

    /// Encoded query string in fixed order (`search`, `category`, `isActive`),
    /// or `None` when no parameter is present.
    pub fn to_query_string(&self) -> Option<String> {
        if self.is_empty() {
            return None;
        }

        let mut serializer = form_urlencoded::Serializer::new(String::new());
        let fields = [
            ("search", &self.search),
            ("category", &self.category),
            ("isActive", &self.is_active),
        ];
        for (name, value) in fields {
            if let Some(value) = value {
                serializer.append_pair(name, value);
            }
        }
        Some(serializer.finish())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_unrecognized_parameters_dropped() {
        let query = CollectionQuery::from_params(&params(&[
            ("search", "a"),
            ("category", "b"),
            ("other", "x"),
        ]));
        assert_eq!(query.to_query_string().as_deref(), Some("search=a&category=b"));
    }

    #[test]
    fn test_fixed_order() {
        let query = CollectionQuery::from_params(&params(&[
            ("isActive", "false"),
            ("category", "email"),
            ("search", "name"),
        ]));
        assert_eq!(
            query.to_query_string().as_deref(),
            Some("search=name&category=email&isActive=false")
        );
    }

    #[test]
    fn test_no_parameters_no_query_string() {
        assert_eq!(CollectionQuery::default().to_query_string(), None);
        let query = CollectionQuery::from_params(&params(&[("page", "2"), ("search", "")]));
        assert!(query.is_empty());
        assert_eq!(query.to_query_string(), None);
    }

    #[test]
    fn test_values_are_encoded() {
        let query = CollectionQuery::from_params(&params(&[("search", "first name&co")]));
        assert_eq!(query.to_query_string().as_deref(), Some("search=first+name%26co"));
    }

    #[test]
    fn test_is_active_not_coerced() {
        let query = CollectionQuery::from_params(&params(&[("isActive", "yes")]));
        assert_eq!(query.is_active.as_deref(), Some("yes"));
        assert_eq!(query.to_query_string().as_deref(), Some("isActive=yes"));
    }
}
