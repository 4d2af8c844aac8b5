// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::model::Product;

/// How many products the one-shot index fetch asks for.
pub const INDEX_FETCH_LIMIT: u32 = 1000;

/// Most suggestions shown under a filter input.
pub const MAX_SUGGESTIONS: usize = 5;

/// In-memory completion source for the catalog filter inputs. Built once per
/// screen from a bulk product fetch; never refreshed incrementally.
#[derive(Debug, Clone, Default)]
pub struct SuggestionIndex {
    titles: Vec<String>,
    categories: Vec<String>,
}

impl SuggestionIndex {
    /// Index every title in input order and every category in first-seen
    /// order, skipping blanks and duplicate categories.
    pub fn from_products<'a>(products: impl IntoIterator<Item = &'a Product>) -> Self {
        let mut titles = Vec::new();
        let mut categories: Vec<String> = Vec::new();
        for product in products {
            if !product.title.is_empty() {
                titles.push(product.title.clone());
            }
            if !product.category.is_empty()
                && !categories
                    .iter()
                    .any(|known| known.eq_ignore_ascii_case(&product.category))
            {
                categories.push(product.category.clone());
            }
        }
        Self { titles, categories }
    }

    pub fn is_empty(&self) -> bool {
        self.titles.is_empty() && self.categories.is_empty()
    }

    /// Every known category, in first-seen order. Feeds the category select.
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn titles_matching(&self, input: &str) -> Vec<&str> {
        matching(&self.titles, input)
    }

    pub fn categories_matching(&self, input: &str) -> Vec<&str> {
        matching(&self.categories, input)
    }
}

/// Case-insensitive substring containment over `candidates`, input order
/// preserved, capped at [`MAX_SUGGESTIONS`]. Empty input matches nothing.
fn matching<'a>(candidates: &'a [String], input: &str) -> Vec<&'a str> {
    if input.is_empty() {
        return Vec::new();
    }
    let needle = input.to_lowercase();
    candidates
        .iter()
        .filter(|candidate| candidate.to_lowercase().contains(&needle))
        .take(MAX_SUGGESTIONS)
        .map(String::as_str)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{MAX_SUGGESTIONS, SuggestionIndex};
    use crate::model::Product;

    fn product(title: &str, category: &str) -> Product {
        serde_json::from_str(&format!(
            r#"{{"id": "p", "title": "{title}", "category": "{category}"}}"#
        ))
        .expect("product")
    }

    fn index() -> SuggestionIndex {
        let products = vec![
            product("Handwoven Wool Carpet", "Carpets"),
            product("Punja Kilim Durry", "Durries"),
            product("Cotton Flatweave Durry", "Durries"),
            product("Tufted Bath Rug", "Bath"),
            product("Jute Runner", "Runners"),
            product("Chindi Rag Durry", "Durries"),
        ];
        SuggestionIndex::from_products(&products)
    }

    #[test]
    fn matching_is_case_insensitive_substring() {
        let index = index();
        assert_eq!(
            index.titles_matching("DURRY"),
            vec![
                "Punja Kilim Durry",
                "Cotton Flatweave Durry",
                "Chindi Rag Durry",
            ],
        );
        assert_eq!(index.categories_matching("dur"), vec!["Durries"]);
    }

    #[test]
    fn empty_input_matches_nothing() {
        let index = index();
        assert!(index.titles_matching("").is_empty());
        assert!(index.categories_matching("").is_empty());
    }

    #[test]
    fn results_are_capped() {
        let products: Vec<Product> = (0..20)
            .map(|n| product(&format!("Durry {n}"), "Durries"))
            .collect();
        let index = SuggestionIndex::from_products(&products);
        let matches = index.titles_matching("durry");
        assert_eq!(matches.len(), MAX_SUGGESTIONS);
        assert_eq!(matches[0], "Durry 0");
    }

    #[test]
    fn categories_deduplicate_in_first_seen_order() {
        let index = index();
        assert_eq!(
            index.categories(),
            ["Carpets", "Durries", "Bath", "Runners"],
        );
    }

    #[test]
    fn blank_fields_are_skipped() {
        let products = vec![product("", ""), product("Jute Runner", "Runners")];
        let index = SuggestionIndex::from_products(&products);
        assert_eq!(index.titles_matching("runner"), vec!["Jute Runner"]);
        assert_eq!(index.categories(), ["Runners"]);
    }
}
