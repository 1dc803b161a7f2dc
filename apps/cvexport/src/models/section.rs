use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::PipelineError;

/// Section identifiers the templates know how to render, in canonical order.
pub const KNOWN_SECTIONS: &[&str] = &[
    "basics",
    "education",
    "work",
    "projects",
    "skills",
    "awards",
    "misc",
];

/// Which resume sections appear, and in what order.
///
/// Always a duplicate-free sub-sequence of [`KNOWN_SECTIONS`] (in any order).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct SectionOrder(Vec<String>);

impl SectionOrder {
    /// Validates `ids` against the known set. Duplicates keep their first position.
    pub fn new<I, S>(ids: I) -> Result<Self, PipelineError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut order: Vec<String> = Vec::new();
        for id in ids {
            let id = id.into();
            if !KNOWN_SECTIONS.contains(&id.as_str()) {
                return Err(PipelineError::InvalidSection(id));
            }
            if order.contains(&id) {
                debug!(section = %id, "Dropping duplicate section identifier");
                continue;
            }
            order.push(id);
        }
        Ok(SectionOrder(order))
    }

    /// Parses a comma-separated list such as `basics,work,education`.
    pub fn parse_list(list: &str) -> Result<Self, PipelineError> {
        Self::new(
            list.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty()),
        )
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for SectionOrder {
    fn default() -> Self {
        SectionOrder(KNOWN_SECTIONS.iter().map(|s| s.to_string()).collect())
    }
}

impl TryFrom<Vec<String>> for SectionOrder {
    type Error = PipelineError;

    fn try_from(ids: Vec<String>) -> Result<Self, Self::Error> {
        SectionOrder::new(ids)
    }
}

impl From<SectionOrder> for Vec<String> {
    fn from(order: SectionOrder) -> Self {
        order.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_full_known_set() {
        let order = SectionOrder::default();
        assert_eq!(order.len(), KNOWN_SECTIONS.len());
        assert_eq!(order.as_slice()[0], "basics");
    }

    #[test]
    fn test_subsequence_in_custom_order_is_accepted() {
        let order = SectionOrder::new(["work", "basics"]).unwrap();
        assert_eq!(order.as_slice(), &["work".to_string(), "basics".to_string()]);
    }

    #[test]
    fn test_duplicates_keep_first_position() {
        let order = SectionOrder::new(["basics", "work", "basics"]).unwrap();
        assert_eq!(order.as_slice(), &["basics".to_string(), "work".to_string()]);
    }

    #[test]
    fn test_unknown_section_is_rejected() {
        let err = SectionOrder::new(["basics", "hobbies"]).unwrap_err();
        assert!(matches!(err, PipelineError::InvalidSection(id) if id == "hobbies"));
    }

    #[test]
    fn test_parse_list_trims_and_skips_blanks() {
        let order = SectionOrder::parse_list(" basics, education ,,skills").unwrap();
        assert_eq!(order.len(), 3);
        assert_eq!(order.as_slice()[2], "skills");
    }

    #[test]
    fn test_serializes_as_plain_array() {
        let order = SectionOrder::new(["basics", "education"]).unwrap();
        let json = serde_json::to_string(&order).unwrap();
        assert_eq!(json, r#"["basics","education"]"#);

        let back: SectionOrder = serde_json::from_str(&json).unwrap();
        assert_eq!(back, order);
    }

    #[test]
    fn test_deserializing_unknown_section_fails() {
        let result: Result<SectionOrder, _> = serde_json::from_str(r#"["basics","nope"]"#);
        assert!(result.is_err());
    }
}
