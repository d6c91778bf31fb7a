use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use site_common::error::CommonError;

/// Kind of searchable document, in flattened-result order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ItemKind {
    Guide,
    GuideSection,
    Article,
    ArticleHeading,
}

impl ItemKind {
    pub const ALL: [ItemKind; 4] = [
        ItemKind::Guide,
        ItemKind::GuideSection,
        ItemKind::Article,
        ItemKind::ArticleHeading,
    ];

    /// Maximum number of results shown for this kind.
    pub fn result_cap(self) -> usize {
        match self {
            ItemKind::Guide => 5,
            ItemKind::GuideSection => 5,
            ItemKind::Article => 3,
            ItemKind::ArticleHeading => 5,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ItemKind::Guide => "guide",
            ItemKind::GuideSection => "guide-section",
            ItemKind::Article => "article",
            ItemKind::ArticleHeading => "article-heading",
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ItemKind {
    type Err = CommonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| CommonError::UnknownKind(wanted.to_string()))
    }
}

/// A single searchable record: a course, one of its sections, a blog
/// article or one of its headings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchItem {
    #[serde(rename = "type")]
    pub kind: ItemKind,
    pub title: String,
    pub description: Option<String>,
    /// Navigation target, e.g. "/cours/react#les-hooks"
    pub href: String,
    pub tags: Vec<String>,
    /// Title of the enclosing guide or article for sections and headings.
    pub parent_title: Option<String>,
    pub keywords: Vec<String>,
}

impl SearchItem {
    /// Fields that take part in matching, in concatenation order.
    pub fn searchable_fields(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.title.as_str())
            .chain(self.description.as_deref())
            .chain(self.parent_title.as_deref())
            .chain(self.tags.iter().map(String::as_str))
            .chain(self.keywords.iter().map(String::as_str))
    }
}

/// Search results split by kind, each group capped and in registry order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupedResults {
    pub guides: Vec<Arc<SearchItem>>,
    pub guide_sections: Vec<Arc<SearchItem>>,
    pub articles: Vec<Arc<SearchItem>>,
    pub article_headings: Vec<Arc<SearchItem>>,
}

impl GroupedResults {
    pub fn group(&self, kind: ItemKind) -> &[Arc<SearchItem>] {
        match kind {
            ItemKind::Guide => &self.guides,
            ItemKind::GuideSection => &self.guide_sections,
            ItemKind::Article => &self.articles,
            ItemKind::ArticleHeading => &self.article_headings,
        }
    }

    pub(crate) fn group_mut(&mut self, kind: ItemKind) -> &mut Vec<Arc<SearchItem>> {
        match kind {
            ItemKind::Guide => &mut self.guides,
            ItemKind::GuideSection => &mut self.guide_sections,
            ItemKind::Article => &mut self.articles,
            ItemKind::ArticleHeading => &mut self.article_headings,
        }
    }

    pub fn len(&self) -> usize {
        ItemKind::ALL.iter().map(|&k| self.group(k).len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Item at `index` in the flattened list (guides, sections, articles, headings).
    pub fn get(&self, index: usize) -> Option<&Arc<SearchItem>> {
        let mut offset = index;
        for kind in ItemKind::ALL {
            let group = self.group(kind);
            if offset < group.len() {
                return group.get(offset);
            }
            offset -= group.len();
        }
        None
    }

    pub fn flatten(&self) -> Vec<Arc<SearchItem>> {
        ItemKind::ALL
            .iter()
            .flat_map(|&k| self.group(k).iter().cloned())
            .collect()
    }
}
