//! HTML parsing for day pages and snapshots
//!
//! This module handles parsing HTML content to extract:
//! - Snapshot links from a day's listing page
//! - Outbound links from the main content block of a snapshot
//!
//! Both functions are pure so the extraction rules can be tested without a network.

use scraper::{ElementRef, Html, Selector};

/// Color of the horizontal rules that frame a snapshot's main content block
const MARKER_COLOR: &str = "#0000A0";

/// Extracts every href on a day page that points at a snapshot
///
/// The prefix comparison is case-sensitive.
pub fn select_snapshot_hrefs(html: &str, prefix: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let mut hrefs = Vec::new();

    if let Ok(a_selector) = Selector::parse("a[href]") {
        for element in document.select(&a_selector) {
            if let Some(href) = element.value().attr("href") {
                let href = href.trim();
                if href.starts_with(prefix) {
                    hrefs.push(href.to_string());
                }
            }
        }
    }

    hrefs
}

/// Extracts the links in a snapshot's main content block
///
/// # Region Rules
///
/// The archived front page separates its sections with `<hr color="#0000A0">` markers.
/// Anchors are taken in document order:
///
/// | Markers | Links returned |
/// |---------|----------------|
/// | none | every anchor on the page |
/// | 1 | anchors after the marker |
/// | 2 | anchors after marker 2 (marker 1 closes the masthead) |
/// | 3 or more | anchors between marker 2 and marker 3 (the rest is footer) |
///
/// A lone marker is read as the masthead rule, so the anchors after it are kept rather
/// than waiting for a second marker that never comes.
///
/// This is a best-effort rule tied to the archive's markup, not a guarantee.
///
/// # Returns
///
/// Whitespace-trimmed href values; anchors with an empty href are skipped.
pub fn select_content_links(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);

    let selector = match Selector::parse("hr, a[href]") {
        Ok(s) => s,
        Err(_) => return Vec::new(),
    };

    // Selection yields elements in document order
    let elements: Vec<ElementRef> = document.select(&selector).collect();
    let marker_count = elements.iter().filter(|e| is_marker(e)).count();

    let (start, end) = match marker_count {
        0 => (0, None),
        1 => (1, None),
        2 => (2, None),
        _ => (2, Some(3)),
    };

    let mut links = Vec::new();
    let mut markers_seen = 0;

    for element in elements {
        if is_marker(&element) {
            markers_seen += 1;
            continue;
        }

        if element.value().name() != "a" {
            continue;
        }

        if markers_seen < start || end.is_some_and(|end| markers_seen >= end) {
            continue;
        }

        if let Some(href) = element.value().attr("href") {
            let href = href.trim();
            if !href.is_empty() {
                links.push(href.to_string());
            }
        }
    }

    links
}

/// Returns true for the colored rules that delimit page regions
fn is_marker(element: &ElementRef) -> bool {
    element.value().name() == "hr"
        && element
            .value()
            .attr("color")
            .is_some_and(|color| color.trim().eq_ignore_ascii_case(MARKER_COLOR))
}
