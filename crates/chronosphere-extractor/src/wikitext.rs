//! Minimal wikitext implementation of the markup capability
//!
//! Covers what the field extractor needs from MediaWiki markup: flat
//! sections split on `==` headings, `{{coord}}` templates, a short summary,
//! and plain-text paragraphs. Templates, references, comments, tables and
//! file links are dropped; link markup is reduced to its label. It does not
//! try to be a full wikitext grammar.

use chronosphere_domain::traits::{MarkupDocument, MarkupParser, Paragraph, Section};
use chronosphere_domain::Coordinates;
use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

static COMMENT: LazyLock<Regex> = LazyLock::new(|| regex(r"(?s)<!--.*?-->"));
static REF_SELF_CLOSING: LazyLock<Regex> = LazyLock::new(|| regex(r"(?is)<ref\b[^>]*/>"));
static REF_BLOCK: LazyLock<Regex> = LazyLock::new(|| regex(r"(?is)<ref\b[^>]*>.*?</ref\s*>"));
static HTML_TAG: LazyLock<Regex> = LazyLock::new(|| regex(r"</?[a-zA-Z][^>]*>"));
static HEADING: LazyLock<Regex> = LazyLock::new(|| regex(r"^(={2,6})\s*(.+?)\s*={2,6}\s*$"));
static COORD: LazyLock<Regex> = LazyLock::new(|| regex(r"(?i)\{\{\s*coord\s*\|([^{}]*)\}\}"));
static SHORT_DESCRIPTION: LazyLock<Regex> =
    LazyLock::new(|| regex(r"(?i)\{\{\s*short description\s*\|([^{}|]*)"));
static WIKI_LINK: LazyLock<Regex> = LazyLock::new(|| regex(r"\[\[(?:[^\]|]*\|)?([^\]]*)\]\]"));
static EXTERNAL_LINK: LazyLock<Regex> =
    LazyLock::new(|| regex(r"\[(?:https?:)?//[^\s\]]+\s*([^\]]*)\]"));
static EMPHASIS: LazyLock<Regex> = LazyLock::new(|| regex(r"'{2,}"));
static LIST_MARKER: LazyLock<Regex> = LazyLock::new(|| regex(r"^[*#:;]+\s*"));
static MAGIC_WORD: LazyLock<Regex> = LazyLock::new(|| regex(r"__[A-Z]+__"));
static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| regex(r"\s+"));
static SPACE_BEFORE_PUNCT: LazyLock<Regex> = LazyLock::new(|| regex(r"\s+([,.;:!?)])"));
static COPULA: LazyLock<Regex> =
    LazyLock::new(|| regex(r"\b(?:is|was|are|were)\s+((?:a|an|the)\s+[^,.;()]+)"));

fn regex(pattern: &str) -> Regex {
    Regex::new(pattern).expect("static pattern is valid")
}

const FILE_PREFIXES: [&str; 3] = ["file:", "image:", "category:"];

/// Errors from optional wikitext derivations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WikitextError {
    /// No short description template and no usable first sentence
    #[error("no summary could be derived")]
    NoSummary,
}

/// Parser for MediaWiki markup
#[derive(Debug, Clone, Copy, Default)]
pub struct WikitextParser;

impl WikitextParser {
    /// Create a parser
    pub fn new() -> Self {
        Self
    }
}

impl MarkupParser for WikitextParser {
    type Document = WikitextDocument;

    fn parse(&self, text: &str) -> WikitextDocument {
        WikitextDocument::parse(text)
    }
}

/// A parsed wikitext article
#[derive(Debug, Clone, Default)]
pub struct WikitextDocument {
    sections: Vec<ParsedSection>,
    coordinates: Vec<Coordinates>,
    short_description: Option<String>,
}

#[derive(Debug, Clone, Default)]
struct ParsedSection {
    heading: String,
    paragraphs: Vec<String>,
}

impl WikitextDocument {
    fn parse(raw: &str) -> Self {
        let text = COMMENT.replace_all(raw, "");

        let coordinates = COORD
            .captures_iter(&text)
            .filter_map(|caps| parse_coord(&caps[1]))
            .collect();

        let short_description = SHORT_DESCRIPTION
            .captures(&text)
            .map(|caps| caps[1].trim().to_string())
            .filter(|s| !s.is_empty() && !s.eq_ignore_ascii_case("none"));

        let text = REF_SELF_CLOSING.replace_all(&text, "");
        let text = REF_BLOCK.replace_all(&text, "");
        let text = strip_templates(&text);
        let text = strip_file_links(&text);

        Self {
            sections: split_sections(&text),
            coordinates,
            short_description,
        }
    }

    /// Headings of every section, lead section first (with an empty heading)
    pub fn headings(&self) -> impl Iterator<Item = &str> {
        self.sections.iter().map(|s| s.heading.as_str())
    }
}

impl MarkupDocument for WikitextDocument {
    type Error = WikitextError;

    fn section(&self, heading: &str) -> Option<Section> {
        self.sections
            .iter()
            .find(|s| s.heading == heading)
            .map(|s| Section::new(s.heading.clone(), s.paragraphs.join("\n\n")))
    }

    fn coordinates(&self) -> Vec<Coordinates> {
        self.coordinates.clone()
    }

    fn summary(&self) -> Result<String, WikitextError> {
        if let Some(description) = &self.short_description {
            return Ok(description.clone());
        }
        let first = self
            .sections
            .iter()
            .flat_map(|s| s.paragraphs.iter())
            .next()
            .ok_or(WikitextError::NoSummary)?;
        let sentence = first.split(". ").next().unwrap_or(first.as_str());
        COPULA
            .captures(sentence)
            .map(|caps| caps[1].trim().to_string())
            .filter(|s| !s.is_empty())
            .ok_or(WikitextError::NoSummary)
    }

    fn paragraphs(&self) -> Result<Vec<Paragraph>, WikitextError> {
        Ok(self
            .sections
            .iter()
            .flat_map(|s| s.paragraphs.iter())
            .map(|p| Paragraph::new(p.clone()))
            .collect())
    }
}

/// Split cleaned markup into flat sections of rendered paragraphs
fn split_sections(text: &str) -> Vec<ParsedSection> {
    let mut sections = vec![ParsedSection::default()];
    let mut block: Vec<&str> = Vec::new();
    let mut table_depth = 0usize;

    for line in text.lines() {
        let trimmed = line.trim();

        if trimmed.starts_with("{|") {
            table_depth += 1;
            continue;
        }
        if table_depth > 0 {
            if trimmed.starts_with("|}") {
                table_depth -= 1;
            }
            continue;
        }

        if let Some(caps) = HEADING.captures(trimmed) {
            flush_paragraph(&mut block, &mut sections);
            sections.push(ParsedSection {
                heading: render_inline(&caps[2]),
                paragraphs: Vec::new(),
            });
            continue;
        }

        if trimmed.is_empty() {
            flush_paragraph(&mut block, &mut sections);
        } else {
            block.push(trimmed);
        }
    }
    flush_paragraph(&mut block, &mut sections);

    sections
}

fn flush_paragraph(block: &mut Vec<&str>, sections: &mut [ParsedSection]) {
    if block.is_empty() {
        return;
    }
    let joined = block
        .iter()
        .map(|line| LIST_MARKER.replace(line, ""))
        .collect::<Vec<_>>()
        .join(" ");
    block.clear();

    let rendered = render_inline(&joined);
    if rendered.is_empty() {
        return;
    }
    if let Some(current) = sections.last_mut() {
        current.paragraphs.push(rendered);
    }
}

/// Reduce inline markup to plain text
fn render_inline(text: &str) -> String {
    let text = WIKI_LINK.replace_all(text, "$1");
    let text = EXTERNAL_LINK.replace_all(&text, "$1");
    let text = EMPHASIS.replace_all(&text, "");
    let text = HTML_TAG.replace_all(&text, "");
    let text = MAGIC_WORD.replace_all(&text, "");
    let text = text
        .replace("&nbsp;", " ")
        .replace("&ndash;", "–")
        .replace("&mdash;", "—")
        .replace("&amp;", "&");
    let text = WHITESPACE.replace_all(&text, " ");
    let text = SPACE_BEFORE_PUNCT.replace_all(&text, "$1");
    text.replace("()", "").trim().to_string()
}

/// Remove `{{...}}` templates, including nested ones
fn strip_templates(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut depth = 0usize;
    let mut rest = text;

    while !rest.is_empty() {
        if rest.starts_with("{{") {
            depth += 1;
            rest = &rest[2..];
        } else if depth > 0 && rest.starts_with("}}") {
            depth -= 1;
            rest = &rest[2..];
        } else {
            let ch = rest.chars().next().unwrap_or_default();
            if depth == 0 {
                out.push(ch);
            }
            rest = &rest[ch.len_utf8()..];
        }
    }
    out
}

/// Remove `[[File:...]]`, `[[Image:...]]` and `[[Category:...]]` links,
/// whose captions may themselves contain links
fn strip_file_links(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(start) = rest.find("[[") {
        out.push_str(&rest[..start]);
        let candidate = &rest[start + 2..];
        let is_file = FILE_PREFIXES.iter().any(|prefix| {
            candidate
                .get(..prefix.len())
                .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
        });
        if !is_file {
            out.push_str("[[");
            rest = candidate;
            continue;
        }

        let mut depth = 1usize;
        let mut cursor = candidate;
        while depth > 0 && !cursor.is_empty() {
            if cursor.starts_with("[[") {
                depth += 1;
                cursor = &cursor[2..];
            } else if cursor.starts_with("]]") {
                depth -= 1;
                cursor = &cursor[2..];
            } else {
                let ch = cursor.chars().next().unwrap_or_default();
                cursor = &cursor[ch.len_utf8()..];
            }
        }
        rest = cursor;
    }
    out.push_str(rest);
    out
}

/// Parse the parameters of a `{{coord}}` template
///
/// Accepts decimal (`54.0|-113.0`), hemisphere (`54|N|113|W`) and
/// degree/minute/second (`51|30|26|N|0|7|39|W`) forms. Named parameters
/// such as `display=title` are ignored.
fn parse_coord(params: &str) -> Option<Coordinates> {
    let positional: Vec<&str> = params
        .split('|')
        .map(str::trim)
        .filter(|p| !p.is_empty() && !p.contains('='))
        .collect();

    let coordinates = match positional.iter().position(|p| is_hemisphere(p, "N", "S")) {
        Some(ns) => {
            let lat = dms(&positional[..ns])? * sign(positional[ns], "S");
            let rest = &positional[ns + 1..];
            let ew = rest.iter().position(|p| is_hemisphere(p, "E", "W"))?;
            let lon = dms(&rest[..ew])? * sign(rest[ew], "W");
            Coordinates::new(lat, lon)
        }
        None => {
            let lat = positional.first()?.parse::<f64>().ok()?;
            let lon = positional.get(1)?.parse::<f64>().ok()?;
            Coordinates::new(lat, lon)
        }
    };

    let in_range = coordinates.lat.abs() <= 90.0 && coordinates.lon.abs() <= 180.0;
    in_range.then_some(coordinates)
}

fn is_hemisphere(param: &str, positive: &str, negative: &str) -> bool {
    param.eq_ignore_ascii_case(positive) || param.eq_ignore_ascii_case(negative)
}

fn dms(parts: &[&str]) -> Option<f64> {
    if parts.is_empty() || parts.len() > 3 {
        return None;
    }
    let mut value = 0.0;
    let mut scale = 1.0;
    for part in parts {
        value += part.parse::<f64>().ok()? / scale;
        scale *= 60.0;
    }
    Some(value)
}

fn sign(hemisphere: &str, negative: &str) -> f64 {
    if hemisphere.eq_ignore_ascii_case(negative) {
        -1.0
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALBERTA: &str = r#"{{Short description|Province of Canada}}
{{Infobox province
| name = Alberta
| coordinates = {{coord|55|N|115|W|display=inline}}
}}
'''Alberta''' is a [[Provinces and territories of Canada|province]] of [[Canada]].<ref>{{cite web|url=x}}</ref>

[[File:Alberta map.png|thumb|A [[map]] of Alberta]]
It borders [[British Columbia]].

== History ==
Paleo-Indians arrived in Alberta at least 10,000 years ago.<ref name="a" />
In 1821 the British government forced them to merge.

=== Treaties ===
* Treaty 6 (1876)
* Treaty 7 (1877)

== Geography ==
{| class="wikitable"
| cell
|}
The province spans {{convert|660000|km2}} of land.
{{coord|54.0|-113.0|display=title}}
"#;

    fn doc() -> WikitextDocument {
        WikitextParser::new().parse(ALBERTA)
    }

    #[test]
    fn test_sections_are_flat() {
        let doc = doc();
        let headings: Vec<&str> = doc.headings().collect();
        assert_eq!(headings, vec!["", "History", "Treaties", "Geography"]);
    }

    #[test]
    fn test_history_section_text() {
        let history = doc().section("History").unwrap();
        assert_eq!(
            history.text(),
            "Paleo-Indians arrived in Alberta at least 10,000 years ago. \
             In 1821 the British government forced them to merge."
        );
    }

    #[test]
    fn test_section_lookup_is_case_sensitive() {
        assert!(doc().section("history").is_none());
    }

    #[test]
    fn test_coordinates_in_document_order() {
        let coordinates = doc().coordinates();
        assert_eq!(
            coordinates,
            vec![Coordinates::new(55.0, -115.0), Coordinates::new(54.0, -113.0)]
        );
    }

    #[test]
    fn test_paragraphs_strip_markup() {
        let paragraphs = doc().paragraphs().unwrap();
        assert_eq!(paragraphs[0].text(), "Alberta is a province of Canada.");
        assert_eq!(paragraphs[1].text(), "It borders British Columbia.");
        assert_eq!(paragraphs[3].text(), "Treaty 6 (1876) Treaty 7 (1877)");
        assert_eq!(paragraphs[4].text(), "The province spans of land.");
    }

    #[test]
    fn test_summary_prefers_short_description() {
        assert_eq!(doc().summary().unwrap(), "Province of Canada");
    }

    #[test]
    fn test_summary_from_first_sentence() {
        let doc = WikitextParser::new().parse("'''Fort Chipewyan''' is a hamlet in [[Alberta]], Canada.");
        assert_eq!(doc.summary().unwrap(), "a hamlet in Alberta");
    }

    #[test]
    fn test_summary_fails_without_material() {
        let doc = WikitextParser::new().parse("{{Infobox}}");
        assert_eq!(doc.summary(), Err(WikitextError::NoSummary));
        assert!(doc.paragraphs().unwrap().is_empty());
    }

    #[test]
    fn test_parse_coord_forms() {
        assert_eq!(parse_coord("54.0|-113.0"), Some(Coordinates::new(54.0, -113.0)));
        assert_eq!(parse_coord("54|N|113|W"), Some(Coordinates::new(54.0, -113.0)));
        let london = parse_coord("51|30|0|N|0|7|30|W|display=title").unwrap();
        assert!((london.lat - 51.5).abs() < 1e-9);
        assert!((london.lon + 0.125).abs() < 1e-9);
        assert_eq!(parse_coord("S"), None);
        assert_eq!(parse_coord("95|10"), None);
        assert_eq!(parse_coord("abc|def"), None);
    }

    #[test]
    fn test_strip_templates_nested() {
        assert_eq!(strip_templates("a{{b|{{c}}|d}}e"), "ae");
        assert_eq!(strip_templates("no templates"), "no templates");
    }

    #[test]
    fn test_strip_file_links_keeps_normal_links() {
        assert_eq!(
            strip_file_links("x [[Image:a.jpg|a [[b]] c]] [[Canada]] y"),
            "x  [[Canada]] y"
        );
    }

    #[test]
    fn test_comments_removed() {
        let doc = WikitextParser::new().parse("== History ==\n<!-- hidden -->Visible.");
        assert_eq!(doc.section("History").unwrap().text(), "Visible.");
    }
}
