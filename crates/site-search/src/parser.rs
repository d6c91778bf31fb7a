/// Parser for markdown content directories.
///
/// Layout: `<root>/guides/*.md` and `<root>/articles/*.md`. Each file starts
/// with a front-matter block:
///
/// ```text
/// ---
/// title: Le TDD appliqué au front-end
/// href: /blog/tdd-front-end
/// description: Écrire le test d'abord.
/// tags: Tests, TDD
/// keywords: Vitest, Testing Library
/// ---
/// ## First heading
/// ```
///
/// Every `## ` heading outside fenced code blocks becomes a section (guides)
/// or heading (articles) item.
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use regex::Regex;
use site_common::error::CommonError;
use site_common::text::slugify;
use tracing::{info, warn};

use crate::error::AppError;
use crate::model::{ItemKind, SearchItem};

pub const GUIDES_DIR: &str = "guides";
pub const ARTICLES_DIR: &str = "articles";

/// Markdown files of the content directory in load order (guides first, then
/// articles, each lexically sorted).
pub fn content_files(root: &Path) -> Result<Vec<(ItemKind, PathBuf)>, AppError> {
    let mut files = Vec::new();
    for (dir, kind) in [(GUIDES_DIR, ItemKind::Guide), (ARTICLES_DIR, ItemKind::Article)] {
        let path = root.join(dir);
        if !path.is_dir() {
            continue;
        }
        let mut entries = Vec::new();
        for entry in std::fs::read_dir(&path).map_err(CommonError::from)? {
            let entry_path = entry.map_err(CommonError::from)?.path();
            if entry_path.extension().is_some_and(|ext| ext == "md") {
                entries.push(entry_path);
            }
        }
        entries.sort();
        files.extend(entries.into_iter().map(|p| (kind, p)));
    }
    Ok(files)
}

pub fn parse_content_dir(root: &Path) -> Result<Vec<SearchItem>, AppError> {
    let mut documents = Vec::new();
    let mut parts = Vec::new();

    for (kind, path) in content_files(root)? {
        let content = std::fs::read_to_string(&path).map_err(CommonError::from)?;
        let rel = path.strip_prefix(root).unwrap_or(&path).display().to_string();

        let (document, mut children) =
            parse_document(&content, kind).map_err(|e| AppError::Parse {
                line: e.line,
                message: format!("{} in {}", e.message, rel),
            })?;
        documents.push(document);
        parts.append(&mut children);
    }

    // Registry order: documents, then their parts; kinds stay grouped.
    let mut items = Vec::with_capacity(documents.len() + parts.len());
    for kind in ItemKind::ALL {
        items.extend(documents.iter().filter(|d| d.kind == kind).cloned());
        items.extend(parts.iter().filter(|p| p.kind == kind).cloned());
    }

    info!(
        root = %root.display(),
        documents = documents.len(),
        items = items.len(),
        "parsed content directory"
    );
    Ok(items)
}

#[derive(Debug)]
pub struct ParseError {
    pub line: usize,
    pub message: String,
}

fn part_kind(kind: ItemKind) -> ItemKind {
    match kind {
        ItemKind::Guide | ItemKind::GuideSection => ItemKind::GuideSection,
        ItemKind::Article | ItemKind::ArticleHeading => ItemKind::ArticleHeading,
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse one document into its own item plus one item per `## ` heading.
pub fn parse_document(
    content: &str,
    kind: ItemKind,
) -> Result<(SearchItem, Vec<SearchItem>), ParseError> {
    let field_re = Regex::new(r"^([A-Za-z_]+)\s*:\s*(.*?)\s*$").expect("valid regex");
    let heading_re = Regex::new(r"^##\s+(.+?)(?:\s+#+)?\s*$").expect("valid regex");

    let lines: Vec<&str> = content.lines().collect();
    let first = lines
        .iter()
        .position(|l| !l.trim().is_empty())
        .ok_or_else(|| ParseError {
            line: 1,
            message: "empty document".to_string(),
        })?;
    if lines[first].trim() != "---" {
        return Err(ParseError {
            line: first + 1,
            message: "missing front matter".to_string(),
        });
    }
    let close = lines[first + 1..]
        .iter()
        .position(|l| l.trim() == "---")
        .map(|offset| first + 1 + offset)
        .ok_or_else(|| ParseError {
            line: first + 1,
            message: "unterminated front matter".to_string(),
        })?;

    let mut title = None;
    let mut href = None;
    let mut description = None;
    let mut tags = Vec::new();
    let mut keywords = Vec::new();

    for (idx, line) in lines.iter().enumerate().take(close).skip(first + 1) {
        if line.trim().is_empty() {
            continue;
        }
        let Some(caps) = field_re.captures(line) else {
            warn!(line_number = idx + 1, content = line, "unrecognized front matter line, skipping");
            continue;
        };
        let value = caps[2].to_string();
        match caps[1].to_ascii_lowercase().as_str() {
            "title" => title = Some(value),
            "href" => href = Some(value),
            "description" => description = Some(value).filter(|v| !v.is_empty()),
            "tags" => tags = split_list(&value),
            "keywords" => keywords = split_list(&value),
            other => warn!(line_number = idx + 1, key = other, "unknown front matter key"),
        }
    }

    let title = title.filter(|t| !t.is_empty()).ok_or_else(|| ParseError {
        line: first + 1,
        message: "front matter missing 'title'".to_string(),
    })?;
    let href = href.filter(|h| !h.is_empty()).ok_or_else(|| ParseError {
        line: first + 1,
        message: "front matter missing 'href'".to_string(),
    })?;

    let child_kind = part_kind(kind);
    let mut children = Vec::new();
    let mut in_fence = false;
    let mut seen_anchors: HashMap<String, usize> = HashMap::new();
    for (idx, line) in lines.iter().enumerate().skip(close + 1) {
        let trimmed = line.trim_start();
        if trimmed.starts_with("```") || trimmed.starts_with("~~~") {
            in_fence = !in_fence;
            continue;
        }
        if in_fence {
            continue;
        }
        if let Some(caps) = heading_re.captures(line) {
            let heading = caps[1].to_string();
            let slug = slugify(&heading);
            let seen = seen_anchors.entry(slug.clone()).or_insert(0);
            let anchor = if *seen == 0 {
                slug
            } else {
                warn!(line_number = idx + 1, heading = %heading, "duplicate heading anchor, adding suffix");
                format!("{slug}-{seen}")
            };
            *seen += 1;
            children.push(SearchItem {
                kind: child_kind,
                href: format!("{href}#{anchor}"),
                title: heading,
                description: None,
                tags: tags.clone(),
                parent_title: Some(title.clone()),
                keywords: vec![],
            });
        }
    }

    let document = SearchItem {
        kind,
        title,
        description,
        href,
        tags,
        parent_title: None,
        keywords,
    };
    Ok((document, children))
}
