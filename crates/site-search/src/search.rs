/// Substring search over the content registry.
///
/// Every item's searchable fields are normalized once when the index is
/// built. A query matches an item when each of its whitespace-separated terms
/// occurs in that text. Results keep registry order and are capped per kind.
use std::sync::Arc;

use site_common::text::normalize;
use tracing::debug;

use crate::model::{GroupedResults, ItemKind, SearchItem};

/// Queries shorter than this (after normalization, in chars) return nothing.
pub const MIN_QUERY_CHARS: usize = 2;

struct IndexedItem {
    item: Arc<SearchItem>,
    haystack: String,
}

pub struct SearchIndex {
    entries: Vec<IndexedItem>,
}

impl SearchIndex {
    pub fn new(items: Vec<SearchItem>) -> Self {
        let entries = items
            .into_iter()
            .map(|item| {
                let haystack = normalize(&item.searchable_fields().collect::<Vec<_>>().join(" "));
                IndexedItem {
                    item: Arc::new(item),
                    haystack,
                }
            })
            .collect();
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn items(&self) -> impl Iterator<Item = &Arc<SearchItem>> {
        self.entries.iter().map(|e| &e.item)
    }

    pub fn items_of_kind(&self, kind: ItemKind) -> impl Iterator<Item = &Arc<SearchItem>> {
        self.items().filter(move |i| i.kind == kind)
    }

    /// Absence is a normal outcome here; callers render it as "not found".
    pub fn find_by_href(&self, href: &str) -> Option<&Arc<SearchItem>> {
        let href = href.trim();
        self.items().find(|i| i.href == href)
    }

    pub fn search(&self, query: &str) -> GroupedResults {
        let mut results = GroupedResults::default();

        let query = normalize(query);
        if query.chars().count() < MIN_QUERY_CHARS {
            return results;
        }
        let terms: Vec<&str> = query.split_whitespace().collect();

        for entry in &self.entries {
            let kind = entry.item.kind;
            let group = results.group_mut(kind);
            if group.len() >= kind.result_cap() {
                continue;
            }
            if terms.iter().all(|term| entry.haystack.contains(term)) {
                group.push(Arc::clone(&entry.item));
            }
        }

        debug!(query = %query, terms = terms.len(), hits = results.len(), "search evaluated");
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry;

    fn item(kind: ItemKind, title: &str, tags: &[&str]) -> SearchItem {
        SearchItem {
            kind,
            title: title.to_string(),
            description: None,
            href: format!("/{}", site_common::text::slugify(title)),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            parent_title: None,
            keywords: vec![],
        }
    }

    fn titles(items: &[Arc<SearchItem>]) -> Vec<&str> {
        items.iter().map(|i| i.title.as_str()).collect()
    }

    fn builtin() -> SearchIndex {
        SearchIndex::new(registry::builtin_items())
    }

    #[test]
    fn short_queries_return_nothing() {
        let index = builtin();
        for query in ["", " ", "r", "  r  ", "\u{0301}r", "\t\n"] {
            assert!(index.search(query).is_empty(), "query {query:?} should be empty");
        }
    }

    #[test]
    fn punctuation_and_bare_accents_are_safe() {
        let index = builtin();
        assert!(index.search("\u{0301}\u{0300}\u{0302}").is_empty());
        assert!(index.search("!!!").is_empty());
    }

    #[test]
    fn keyword_matches_regardless_of_case() {
        let results = builtin().search("usememo");
        assert!(titles(&results.articles).contains(&"useMemo, useCallback et React.memo"));
    }

    #[test]
    fn repeated_spaces_split_into_two_terms() {
        let results = builtin().search("tdd   front");
        assert_eq!(titles(&results.articles), vec!["Le TDD appliqué au front-end"]);
    }

    #[test]
    fn accents_are_ignored_both_ways() {
        let index = builtin();
        let plain = index.search("hydratation");
        let accented = index.search("HYDRATÂTION");
        assert!(!plain.is_empty());
        assert_eq!(plain, accented);
    }

    #[test]
    fn all_terms_must_match_one_document() {
        let index = SearchIndex::new(vec![
            item(ItemKind::Article, "Kubernetes en local", &["devops"]),
            item(ItemKind::Article, "Animations CSS", &["design"]),
        ]);
        assert_eq!(titles(&index.search("kubernetes").articles), vec!["Kubernetes en local"]);
        assert_eq!(titles(&index.search("animations").articles), vec!["Animations CSS"]);
        assert!(index.search("kubernetes animations").is_empty());
        assert_eq!(
            titles(&index.search("local devops").articles),
            vec!["Kubernetes en local"]
        );
    }

    #[test]
    fn every_single_field_term_is_found() {
        let index = builtin();
        for entry in &index.entries {
            for field in entry.item.searchable_fields() {
                let term = normalize(field);
                if term.chars().count() < MIN_QUERY_CHARS {
                    continue;
                }
                let results = index.search(&term);
                let group = results.group(entry.item.kind);
                // Capped groups may legitimately drop later items.
                if group.len() < entry.item.kind.result_cap() {
                    assert!(
                        group.iter().any(|i| Arc::ptr_eq(i, &entry.item)),
                        "{:?} not found for {term:?}",
                        entry.item.title
                    );
                }
            }
        }
    }

    #[test]
    fn groups_are_capped_in_registry_order() {
        let mut items: Vec<SearchItem> = (0..10)
            .map(|n| item(ItemKind::GuideSection, &format!("Section {n}"), &["rust"]))
            .collect();
        items.extend((0..10).map(|n| item(ItemKind::Article, &format!("Article {n}"), &["rust"])));
        items.push(item(ItemKind::Guide, "Rust", &[]));

        let results = SearchIndex::new(items).search("rust");
        assert_eq!(results.guide_sections.len(), 5);
        assert_eq!(results.articles.len(), 3);
        assert_eq!(results.guides.len(), 1);
        assert_eq!(
            titles(&results.guide_sections),
            vec!["Section 0", "Section 1", "Section 2", "Section 3", "Section 4"]
        );
        assert_eq!(titles(&results.articles), vec!["Article 0", "Article 1", "Article 2"]);
    }

    #[test]
    fn search_is_idempotent() {
        let index = builtin();
        for query in ["react", "architecture hexagonale", "test", "zzz"] {
            assert_eq!(index.search(query), index.search(query));
        }
    }

    #[test]
    fn lookup_by_href() {
        let index = builtin();
        let found = index.find_by_href(" /blog/tdd-front-end ").unwrap();
        assert_eq!(found.kind, ItemKind::Article);
        assert!(index.find_by_href("/blog/does-not-exist").is_none());
    }

    #[test]
    fn items_of_kind_preserve_order() {
        let index = SearchIndex::new(vec![
            item(ItemKind::Guide, "B", &[]),
            item(ItemKind::Article, "X", &[]),
            item(ItemKind::Guide, "A", &[]),
        ]);
        let guides: Vec<&str> = index
            .items_of_kind(ItemKind::Guide)
            .map(|i| i.title.as_str())
            .collect();
        assert_eq!(guides, vec!["B", "A"]);
    }
}
