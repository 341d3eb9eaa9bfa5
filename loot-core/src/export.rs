//! MediaWiki export document reading.
//!
//! The wiki export function emits `<mediawiki><page><title>…<revision>
//! <text>…` documents; only those three fields matter here. A page missing
//! its title or revision text aborts the whole extraction, because a
//! partially built database is worse than no database.

use crate::error::{LootError, Result};
use crate::models::Extraction;
use crate::parsers;
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct Export {
    #[serde(rename = "page", default)]
    pages: Vec<Page>,
}

#[derive(Debug, Deserialize)]
struct Page {
    title: Option<String>,
    revision: Option<Revision>,
}

#[derive(Debug, Deserialize)]
struct Revision {
    text: Option<RevisionText>,
}

// The text element carries an xml:space attribute, so its body maps
// through $text rather than deserializing the element as a plain String.
#[derive(Debug, Deserialize)]
struct RevisionText {
    #[serde(rename = "$text")]
    body: Option<String>,
}

/// Read a wiki export file and run the extraction pass over every page.
pub fn read_export(path: &Path) -> Result<Extraction> {
    let xml = std::fs::read_to_string(path)?;
    parse_export(&xml)
}

/// Extract all monster pages from an export document, in document order.
pub fn parse_export(xml: &str) -> Result<Extraction> {
    let export: Export = quick_xml::de::from_str(xml)?;

    let mut extraction = Extraction::default();
    for page in export.pages {
        let title = page
            .title
            .ok_or_else(|| LootError::MissingField("page title".to_string()))?;
        let text = page
            .revision
            .and_then(|r| r.text)
            .and_then(|t| t.body)
            .ok_or_else(|| {
                LootError::MissingField(format!("revision text for page '{}'", title))
            })?;

        let monster = parsers::extract_monster(&title, &text);
        extraction
            .item_names
            .extend(monster.drop_list.iter().map(|d| d.item.clone()));
        extraction.monsters.push(monster);
    }

    tracing::debug!(
        monsters = extraction.monsters.len(),
        items = extraction.item_names.len(),
        "Export parsed"
    );

    Ok(extraction)
}
