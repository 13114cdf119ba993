//! Individual extraction rules.
//!
//! Each rule takes the raw source and returns its piece of the model.
//! Rules are independent of one another so any of them can be swapped for
//! a real parser without touching the others.

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

use super::sanitize::{clean, strip_comments};
use crate::model::{Section, SectionLevel};
use crate::validate::END_DOCUMENT;

static ABSTRACT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)\\begin\{abstract\}(.*?)\\end\{abstract\}").unwrap());

static HEADING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\\(section|subsection|subsubsection)\*?\s*(?:\[[^\]]*\])?\s*\{").unwrap()
});

static BIBLIOGRAPHY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)\\begin\{thebibliography\}\s*(?:\{[^{}]*\})?(.*?)\\end\{thebibliography\}")
        .unwrap()
});

static BIBITEM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\\bibitem\s*(?:\[[^\]]*\])?\s*\{[^{}]*\}").unwrap());

static EQUATION: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)\$\$(.*?)\$\$").unwrap());

static PARAGRAPH_BREAK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n[ \t]*\n").unwrap());

static AUTHOR_SEPARATOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\\\\(?:\[[^\]]*\])?|\\and\b").unwrap());

static COMMAND_OPEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\\([a-zA-Z]+)\*?\s*(?:\[[^\]]*\])?\s*\{").unwrap());

static THANKS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\\thanks\s*\{[^{}]*\}").unwrap());

/// Date format used for `\today`.
pub const TODAY_FORMAT: &str = "%B %-d, %Y";

/// Title from `\title{…}`, cleaned.
pub fn extract_title(source: &str) -> Option<String> {
    command_argument(source, "title")
        .map(clean)
        .filter(|t| !t.is_empty())
}

/// Author block from `\author{…}`.
///
/// `\\` and `\and` separate lines; each line is cleaned on its own and the
/// line structure is kept.
pub fn extract_author(source: &str) -> Option<String> {
    let raw = command_argument(source, "author")?;
    let raw = THANKS.replace_all(raw, "");
    let lines: Vec<String> = AUTHOR_SEPARATOR
        .split(&raw)
        .map(clean)
        .flat_map(|piece| {
            piece
                .lines()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(str::to_string)
                .collect::<Vec<_>>()
        })
        .collect();

    if lines.is_empty() {
        None
    } else {
        Some(lines.join("\n"))
    }
}

/// Date from `\date{…}`, with `\today` resolved against `now`.
pub fn extract_date(source: &str, now: DateTime<Utc>) -> Option<String> {
    let raw = command_argument(source, "date")?;
    let today = now.format(TODAY_FORMAT).to_string();
    let resolved = raw.replace("\\today", &today);
    Some(clean(&resolved)).filter(|d| !d.is_empty())
}

/// Abstract environment body, cleaned into a single block.
pub fn extract_abstract(source: &str) -> Option<String> {
    let body = ABSTRACT.captures(source)?.get(1)?.as_str();
    let text = clean(body).split_whitespace().collect::<Vec<_>>().join(" ");
    Some(text).filter(|t| !t.is_empty())
}

/// Sections in source order.
///
/// A section runs from its heading to the next heading of any level, the
/// end of the document body, or the end of input. The bibliography block
/// is excluded. Sections with no text left after cleaning are dropped.
pub fn extract_sections(source: &str) -> Vec<Section> {
    let scan = strip_comments(source);
    let scan = BIBLIOGRAPHY.replace_all(&scan, "");
    let limit = scan.find(END_DOCUMENT).unwrap_or(scan.len());

    let mut headings = Vec::new();
    for caps in HEADING.captures_iter(&scan[..limit]) {
        let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let Some(level) = SectionLevel::from_command(name.as_str()) else {
            continue;
        };
        let Some((title, body_start)) = balanced_group(&scan[..limit], whole.end()) else {
            continue;
        };
        headings.push((whole.start(), body_start, level, title));
    }

    let mut sections = Vec::new();
    for (i, (_, body_start, level, title)) in headings.iter().enumerate() {
        let body_end = headings
            .get(i + 1)
            .map(|(next_start, ..)| *next_start)
            .unwrap_or(limit)
            .max(*body_start);
        let content = clean_paragraphs(&scan[*body_start..body_end]);
        if content.is_empty() {
            log::debug!("Dropping empty section {:?}", title);
            continue;
        }
        sections.push(Section::new(clean(title), content, *level));
    }
    sections
}

/// Entries of the first `thebibliography` block, in order.
pub fn extract_bibliography(source: &str) -> Vec<String> {
    let scan = strip_comments(source);
    let Some(block) = BIBLIOGRAPHY.captures(&scan).and_then(|c| c.get(1)) else {
        return Vec::new();
    };
    let block = block.as_str();

    let items: Vec<_> = BIBITEM.find_iter(block).collect();
    items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let end = items.get(i + 1).map(|m| m.start()).unwrap_or(block.len());
            clean(&block[item.end()..end])
        })
        .filter(|entry| !entry.is_empty())
        .collect()
}

/// Bodies of `$$…$$` spans, trimmed, verbatim otherwise.
pub fn extract_equations(source: &str) -> Vec<String> {
    EQUATION
        .captures_iter(source)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|e| !e.is_empty())
        .collect()
}

/// Clean each blank-line separated block and rejoin with a blank line.
fn clean_paragraphs(text: &str) -> String {
    PARAGRAPH_BREAK
        .split(text)
        .map(clean)
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Braced argument of the first `\name{…}` (optionally starred, with an
/// optional `[…]` argument), nested groups included.
pub fn command_argument<'a>(source: &'a str, name: &str) -> Option<&'a str> {
    let open = COMMAND_OPEN
        .captures_iter(source)
        .find(|caps| &caps[1] == name)?;
    let start = open.get(0)?.end();
    balanced_group(source, start).map(|(content, _)| content)
}

/// Scan a brace group whose opening `{` ends just before `start`.
///
/// Returns the group content and the byte offset after the closing `}`.
/// Escaped braces do not count.
fn balanced_group(text: &str, start: usize) -> Option<(&str, usize)> {
    let mut depth = 1usize;
    let mut escaped = false;
    for (offset, c) in text[start..].char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    let end = start + offset;
                    return Some((&text[start..end], end + 1));
                }
            }
            _ => {}
        }
    }
    None
}
