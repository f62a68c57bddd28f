//! HTML field extraction for listing detail pages
//!
//! Pattern matching over the detail page markup: the address and MLS number
//! live in the `<title>`, the listed price in the description meta tag, and
//! the three engagement stats in the overview `<dl>`. Every lookup degrades
//! to [`UNAVAILABLE`] when the markup does not match.

use crate::listing::record::{FieldExtractor, ListingRecord, UNAVAILABLE};
use scraper::{ElementRef, Html, Selector};

/// The default scraper-based extractor
#[derive(Debug, Clone, Default)]
pub struct HtmlFieldExtractor;

impl FieldExtractor for HtmlFieldExtractor {
    fn extract(&self, html: &str, url: &str) -> ListingRecord {
        let document = Html::parse_document(html);

        let (address, mls_id) = extract_title_fields(&document);
        let listed_price = extract_listed_price(&document);
        let (days_on_market, views, saves) = extract_stats(&document);

        ListingRecord {
            address,
            listed_price,
            mls_id,
            days_on_market,
            views,
            saves,
            url: url.to_string(),
            timestamp: String::new(),
        }
    }
}

/// Address and MLS number from the page title, formatted as
/// `{address} | MLS #{id} | ...`
fn extract_title_fields(document: &Html) -> (String, String) {
    let unavailable = || (UNAVAILABLE.to_string(), UNAVAILABLE.to_string());

    let Some(selector) = Selector::parse("title").ok() else {
        return unavailable();
    };
    let Some(title) = document.select(&selector).next() else {
        return unavailable();
    };

    let text: String = title.text().collect();
    let mut parts = text.split('|');
    let (Some(address), Some(mls_part)) = (parts.next(), parts.next()) else {
        return unavailable();
    };

    let mls_id = mls_part
        .trim()
        .split('#')
        .next_back()
        .map(str::trim)
        .unwrap_or(UNAVAILABLE);

    (address.trim().to_string(), mls_id.to_string())
}

/// Listed price from the description meta tag, the first token after `$`
fn extract_listed_price(document: &Html) -> String {
    let Some(selector) = Selector::parse(r#"meta[name="description"]"#).ok() else {
        return UNAVAILABLE.to_string();
    };
    let content = document
        .select(&selector)
        .next()
        .and_then(|meta| meta.value().attr("content"))
        .unwrap_or("");

    let mut parts = content.split('$');
    parts.next();
    parts
        .next()
        .and_then(|rest| rest.split_whitespace().next())
        .unwrap_or(UNAVAILABLE)
        .to_string()
}

/// Days on market, views, and saves from the first three unclassed `<dt>`
/// entries of the overview stats list
fn extract_stats(document: &Html) -> (String, String, String) {
    let unavailable = || {
        (
            UNAVAILABLE.to_string(),
            UNAVAILABLE.to_string(),
            UNAVAILABLE.to_string(),
        )
    };

    let (Some(dl_selector), Some(dt_selector)) = (
        Selector::parse(r#"dl[class*="StyledOverviewStats"]"#).ok(),
        Selector::parse("dt").ok(),
    ) else {
        return unavailable();
    };

    let Some(stats) = document.select(&dl_selector).next() else {
        return unavailable();
    };

    let entries: Vec<ElementRef> = stats
        .select(&dt_selector)
        .filter(|dt| dt.value().attr("class").is_none())
        .collect();

    (
        stat_text(entries.first()),
        stat_text(entries.get(1)),
        stat_text(entries.get(2)),
    )
}

fn stat_text(entry: Option<&ElementRef>) -> String {
    let Some(selector) = Selector::parse("strong").ok() else {
        return UNAVAILABLE.to_string();
    };
    entry
        .and_then(|dt| dt.select(&selector).next())
        .map(|strong| strong.text().collect::<String>().trim().to_string())
        .filter(|text| !text.is_empty())
        .unwrap_or_else(|| UNAVAILABLE.to_string())
}
