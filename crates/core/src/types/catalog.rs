//! Seed data and category helpers

use crate::types::{normalize_category, QuoteRecord, RecordId};
use std::collections::BTreeSet;

/// The collection written on first launch
pub fn default_quotes() -> Vec<QuoteRecord> {
    vec![
        seed(
            "1",
            "The only way to do great work is to love what you do.",
            "inspiration",
            "Steve Jobs",
        ),
        seed(
            "2",
            "Knowing yourself is the beginning of all wisdom.",
            "wisdom",
            "Aristotle",
        ),
        seed(
            "3",
            "Believe you can and you're halfway there.",
            "motivation",
            "Theodore Roosevelt",
        ),
    ]
}

fn seed(id: &str, text: &str, category: &str, author: &str) -> QuoteRecord {
    QuoteRecord {
        id: RecordId::from(id),
        text: text.to_string(),
        category: category.to_string(),
        author: author.to_string(),
        version: 1,
    }
}

/// Distinct categories in sorted order
pub fn categories(records: &[QuoteRecord]) -> Vec<String> {
    records
        .iter()
        .map(|r| r.category.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Records in the given category, or all records when `category` is `None`
pub fn filter_by_category<'a>(
    records: &'a [QuoteRecord],
    category: Option<&str>,
) -> Vec<&'a QuoteRecord> {
    match category.map(normalize_category) {
        Some(wanted) => records.iter().filter(|r| r.category == wanted).collect(),
        None => records.iter().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_quotes_are_version_one() {
        let quotes = default_quotes();
        assert_eq!(quotes.len(), 3);
        assert!(quotes.iter().all(|q| q.version == 1));
    }

    #[test]
    fn test_categories_sorted_and_distinct() {
        let mut quotes = default_quotes();
        quotes.push(seed("4", "x", "wisdom", "y"));

        assert_eq!(
            categories(&quotes),
            vec!["inspiration", "motivation", "wisdom"]
        );
    }

    #[test]
    fn test_filter_by_category() {
        let quotes = default_quotes();

        assert_eq!(filter_by_category(&quotes, None).len(), 3);

        let wisdom = filter_by_category(&quotes, Some("Wisdom"));
        assert_eq!(wisdom.len(), 1);
        assert_eq!(wisdom[0].author, "Aristotle");

        assert!(filter_by_category(&quotes, Some("humor")).is_empty());
    }
}
