//! Content catalog
//!
//! Read-only lookup of quotes and categories. The playback core treats the
//! catalog as an external collaborator and only relies on the query contract
//! of [`ContentCatalog`].

use crate::error::{Result, SelahError};
use crate::types::{Category, Quote};
use rand::seq::SliceRandom;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

/// Query contract for quote and category lookup
pub trait ContentCatalog: Send + Sync {
    /// Look up a quote by id
    fn quote_by_id(&self, id: &str) -> Option<Quote>;

    /// All quotes in a category, in catalog order
    fn quotes_by_category(&self, name: &str) -> Vec<Quote>;

    /// A uniformly random quote, `None` if the catalog is empty
    fn random_quote(&self) -> Option<Quote>;

    /// All categories, in catalog order
    fn categories(&self) -> Vec<Category>;

    /// Quotes whose text, explanation, category or reference contains
    /// `query`, ignoring case
    fn search(&self, query: &str) -> Vec<Quote>;

    /// Look up a category by id
    fn category_by_id(&self, id: &str) -> Option<Category> {
        self.categories().into_iter().find(|c| c.id == id)
    }
}

/// On-disk catalog document
#[derive(Debug, Deserialize)]
struct CatalogDocument {
    quotes: Vec<Quote>,
    #[serde(default)]
    categories: Vec<Category>,
}

/// In-memory catalog loaded once at startup
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    quotes: Vec<Quote>,
    categories: Vec<Category>,
    by_id: HashMap<String, usize>,
}

impl StaticCatalog {
    /// Build a catalog from quotes and categories
    ///
    /// Category quote counts are recomputed from the quotes. When an id
    /// appears more than once the first occurrence wins.
    pub fn new(quotes: Vec<Quote>, mut categories: Vec<Category>) -> Self {
        let mut by_id = HashMap::with_capacity(quotes.len());
        for (index, quote) in quotes.iter().enumerate() {
            by_id.entry(quote.id.clone()).or_insert(index);
        }

        for category in &mut categories {
            let count = quotes.iter().filter(|q| q.category == category.name).count();
            category.quote_count = Some(count);
        }

        Self {
            quotes,
            categories,
            by_id,
        }
    }

    /// Parse a catalog from a JSON document
    pub fn from_json_str(json: &str) -> Result<Self> {
        let document: CatalogDocument = serde_json::from_str(json)?;
        if document.quotes.iter().any(|q| q.id.is_empty()) {
            return Err(SelahError::InvalidCatalog(
                "quote with empty id".to_string(),
            ));
        }
        Ok(Self::new(document.quotes, document.categories))
    }

    /// Load a catalog from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let catalog = Self::from_json_str(&json)?;
        debug!(
            "Loaded catalog from {}: {} quotes, {} categories",
            path.display(),
            catalog.quotes.len(),
            catalog.categories.len()
        );
        Ok(catalog)
    }

    /// Number of quotes
    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    /// Whether the catalog holds no quotes
    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }

    /// All quotes, in catalog order
    pub fn quotes(&self) -> &[Quote] {
        &self.quotes
    }
}

impl ContentCatalog for StaticCatalog {
    fn quote_by_id(&self, id: &str) -> Option<Quote> {
        self.by_id.get(id).map(|&index| self.quotes[index].clone())
    }

    fn quotes_by_category(&self, name: &str) -> Vec<Quote> {
        self.quotes
            .iter()
            .filter(|q| q.category == name)
            .cloned()
            .collect()
    }

    fn random_quote(&self) -> Option<Quote> {
        self.quotes.choose(&mut rand::thread_rng()).cloned()
    }

    fn categories(&self) -> Vec<Category> {
        self.categories.clone()
    }

    fn search(&self, query: &str) -> Vec<Quote> {
        let needle = query.to_lowercase();
        self.quotes
            .iter()
            .filter(|q| {
                [&q.text, &q.explanation, &q.category, &q.reference]
                    .iter()
                    .any(|field| field.to_lowercase().contains(&needle))
            })
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn category(id: &str, name: &str) -> Category {
        Category {
            id: id.to_string(),
            name: name.to_string(),
            icon: String::new(),
            description: String::new(),
            quote_count: None,
        }
    }

    #[test]
    fn lookup_by_id() {
        let catalog = StaticCatalog::new(
            vec![Quote::new("1", "a", "Prayer"), Quote::new("2", "b", "Prayer")],
            Vec::new(),
        );
        assert_eq!(catalog.quote_by_id("2").unwrap().text, "b");
        assert!(catalog.quote_by_id("3").is_none());
    }

    #[test]
    fn search_ignores_case_across_fields() {
        let mut with_reference = Quote::new("1", "Ask, and it will be given", "Prayer");
        with_reference.reference = "Matthew 7:7".to_string();
        let mut with_explanation = Quote::new("2", "Follow me", "Discipleship");
        with_explanation.explanation = "An invitation to PRAYER and service".to_string();
        let catalog = StaticCatalog::new(
            vec![with_reference, with_explanation, Quote::new("3", "Peace be with you", "Peace")],
            Vec::new(),
        );

        let ids = |query: &str| -> Vec<String> {
            catalog.search(query).into_iter().map(|q| q.id).collect()
        };
        assert_eq!(ids("prayer"), vec!["1", "2"]);
        assert_eq!(ids("MATTHEW 7"), vec!["1"]);
        assert_eq!(ids("peace be"), vec!["3"]);
        assert!(ids("zebra").is_empty());
    }

    #[test]
    fn duplicate_id_keeps_first() {
        let catalog = StaticCatalog::new(
            vec![Quote::new("1", "first", "Prayer"), Quote::new("1", "second", "Prayer")],
            Vec::new(),
        );
        assert_eq!(catalog.quote_by_id("1").unwrap().text, "first");
    }

    #[test]
    fn category_counts_are_derived() {
        let catalog = StaticCatalog::new(
            vec![
                Quote::new("1", "a", "Prayer"),
                Quote::new("2", "b", "Salvation"),
                Quote::new("3", "c", "Prayer"),
            ],
            vec![category("1", "Prayer"), category("2", "Salvation"), category("3", "Empty")],
        );

        let counts: Vec<_> = catalog
            .categories()
            .into_iter()
            .map(|c| c.quote_count)
            .collect();
        assert_eq!(counts, vec![Some(2), Some(1), Some(0)]);
        assert_eq!(catalog.category_by_id("2").unwrap().name, "Salvation");
    }

    #[test]
    fn quotes_by_category_preserves_order() {
        let catalog = StaticCatalog::new(
            vec![
                Quote::new("3", "c", "Prayer"),
                Quote::new("1", "a", "Prayer"),
                Quote::new("2", "b", "Other"),
            ],
            Vec::new(),
        );
        let ids: Vec<_> = catalog
            .quotes_by_category("Prayer")
            .into_iter()
            .map(|q| q.id)
            .collect();
        assert_eq!(ids, vec!["3", "1"]);
    }

    #[test]
    fn random_quote_on_empty_catalog() {
        assert!(StaticCatalog::default().random_quote().is_none());
    }

    #[test]
    fn rejects_empty_ids() {
        let json = r#"{"quotes": [{"id": "", "text": "x", "category": "c"}]}"#;
        assert!(matches!(
            StaticCatalog::from_json_str(json),
            Err(SelahError::InvalidCatalog(_))
        ));
    }
}
