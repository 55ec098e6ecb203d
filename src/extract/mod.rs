//! Extraction engine: marker-driven search over a parsed HTML tree.
//!
//! Result pages have no guaranteed shape, so every locator here walks
//! the tree recursively and distinguishes two kinds of failure: the
//! marker is simply absent under a subtree (keep looking elsewhere),
//! or the marker was found but its content is invalid (abort the
//! card). `Search` makes the three outcomes explicit at each call
//! site. The tree is read-only throughout.

pub mod fields;
mod price;
mod specs;

use ego_tree::NodeRef;
use scraper::{Html, Node};
use serde::Serialize;
use thiserror::Error;
use tracing::warn;

const CARD_CLASS: &str = "product-card-content";

/// One fully parsed listing. All four fields resolve together or the
/// card is dropped; partial records are never produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CarListing {
    /// Asking price, taken as printed on the page.
    pub price: u32,
    pub year: u32,
    pub mileage: u32,
    pub engine_size: u32,
}

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("cannot parse price '{0}'")]
    MalformedPrice(String),
    #[error("could not parse year from '{0}'")]
    MalformedYear(String),
    #[error("could not parse '{0}' as a mileage")]
    MalformedMileage(String),
    #[error("could not parse '{0}' as an engine size")]
    MalformedEngineSize(String),
    #[error("pricing span does not start with a text node")]
    UnexpectedPriceStructure,
    #[error("unexpected list item: expected leading text")]
    UnexpectedListItem,
    #[error("key-specs list ended before year, mileage and engine size were all read")]
    IncompleteSpecs,
    #[error("no price found under this card")]
    PriceNotFound,
    #[error("no key-specs list found under this card")]
    SpecsNotFound,
}

/// Outcome of searching a subtree for one marker.
///
/// `NotFound` means "absent here" and drives continued search in the
/// caller; `Failed` is terminal and propagates untouched.
#[derive(Debug)]
pub enum Search<T> {
    Found(T),
    NotFound,
    Failed(ExtractError),
}

impl<T> Search<T> {
    /// Finish a search at the card boundary: an exhausted search
    /// becomes the given terminal error.
    fn into_result(self, missing: ExtractError) -> Result<T, ExtractError> {
        match self {
            Search::Found(value) => Ok(value),
            Search::NotFound => Err(missing),
            Search::Failed(e) => Err(e),
        }
    }
}

/// Find every listing card on the page, in document order, and build a
/// record from each. Cards that fail to parse are logged with their
/// page and position and dropped; one bad card never aborts the rest
/// of the page.
pub fn extract_listings(page: &Html, page_num: u64) -> Vec<CarListing> {
    let mut cards = Vec::new();
    find_cards(page.tree.root(), &mut cards);

    let mut listings = Vec::with_capacity(cards.len());
    for (idx, card) in cards.into_iter().enumerate() {
        match extract_card(card) {
            Ok(listing) => listings.push(listing),
            Err(e) => warn!("page {page_num}: dropping card {idx}: {e}"),
        }
    }
    listings
}

/// Pre-order depth-first scan for card markers. A matched subtree is
/// not descended into; this layout does not nest cards.
fn find_cards<'a>(node: NodeRef<'a, Node>, out: &mut Vec<NodeRef<'a, Node>>) {
    if has_class(node, CARD_CLASS) {
        out.push(node);
        return;
    }
    for child in node.children() {
        find_cards(child, out);
    }
}

/// Build one complete record from a card subtree.
pub fn extract_card(card: NodeRef<Node>) -> Result<CarListing, ExtractError> {
    let price = price::find_price(card).into_result(ExtractError::PriceNotFound)?;
    let specs = specs::find_specs(card).into_result(ExtractError::SpecsNotFound)?;

    Ok(CarListing {
        price,
        year: specs.year,
        mileage: specs.mileage,
        engine_size: specs.engine_size,
    })
}

// ── Node helpers ──

fn has_class(node: NodeRef<Node>, class: &str) -> bool {
    node.value()
        .as_element()
        .is_some_and(|el| el.attr("class") == Some(class))
}

fn is_element(node: NodeRef<Node>, tag: &str) -> bool {
    node.value().as_element().is_some_and(|el| el.name() == tag)
}

/// The node's first child, if that child is a text node.
fn leading_text<'a>(node: NodeRef<'a, Node>) -> Option<&'a str> {
    match node.first_child()?.value() {
        Node::Text(text) => Some(&**text),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cards_of(doc: &Html) -> Vec<NodeRef<'_, Node>> {
        let mut cards = Vec::new();
        find_cards(doc.tree.root(), &mut cards);
        cards
    }

    fn card(price: &str, specs: &[&str]) -> String {
        let items: String = specs.iter().map(|s| format!("<li>{s}</li>")).collect();
        format!(
            concat!(
                r#"<div class="product-card-content">"#,
                r#"<div class="product-card-pricing__price"><span>{}</span></div>"#,
                r#"<ul class="listing-key-specs">{}</ul>"#,
                r#"</div>"#
            ),
            price, items,
        )
    }

    #[test]
    fn synthetic_card_end_to_end() {
        let html = card("£9,500", &["2016 (16 reg)", "Petrol", "32,100 miles", "1.2L", "Hatchback"]);
        let doc = Html::parse_document(&format!("<html><body>{html}</body></html>"));
        let cards = cards_of(&doc);
        assert_eq!(cards.len(), 1);

        let listing = extract_card(cards[0]).unwrap();
        assert_eq!(
            listing,
            CarListing { price: 9500, year: 2016, mileage: 32100, engine_size: 1200 }
        );
    }

    #[test]
    fn no_markers_yields_empty_sequence() {
        let doc = Html::parse_document(
            r#"<html><body><div class="hero"><p>no cars here</p></div></body></html>"#,
        );
        assert!(extract_listings(&doc, 0).is_empty());
    }

    #[test]
    fn listings_preserve_document_order() {
        let first = card("£8,000", &["2015", "Diesel", "60,000 miles", "1.5L", "Hatchback"]);
        let second = card("£11,750", &["2018 (18 reg)", "Petrol", "12,345 miles", "1.0L", "Hatchback"]);
        let doc = Html::parse_document(&format!(
            r#"<html><body><ul><li>{first}</li><li>{second}</li></ul></body></html>"#
        ));

        let listings = extract_listings(&doc, 3);
        assert_eq!(listings.len(), 2);
        assert_eq!(listings[0].price, 8000);
        assert_eq!(listings[1].price, 11750);
    }

    #[test]
    fn matched_subtrees_are_not_descended() {
        let inner = card("£5,000", &["2015", "Petrol", "9,000 miles", "1.2L"]);
        let doc = Html::parse_document(&format!(
            r#"<html><body><div class="product-card-content">{inner}</div></body></html>"#
        ));
        assert_eq!(cards_of(&doc).len(), 1);
    }

    #[test]
    fn missing_and_malformed_price_are_distinct() {
        let missing = r#"<div class="product-card-content"><ul class="listing-key-specs"><li>2016</li><li>Petrol</li><li>1,000 miles</li><li>1.2L</li></ul></div>"#;
        let doc = Html::parse_document(&format!("<html><body>{missing}</body></html>"));
        let err = extract_card(cards_of(&doc)[0]).unwrap_err();
        assert!(matches!(err, ExtractError::PriceNotFound));

        let malformed = card("POA", &["2016", "Petrol", "1,000 miles", "1.2L"]);
        let doc = Html::parse_document(&format!("<html><body>{malformed}</body></html>"));
        let err = extract_card(cards_of(&doc)[0]).unwrap_err();
        assert!(matches!(err, ExtractError::MalformedPrice(_)));
    }

    #[test]
    fn short_spec_list_drops_the_card() {
        // Year and mileage parse fine, but the list never reaches the
        // engine-size position.
        let html = card("£7,200", &["2016 (16 reg)", "Petrol", "20,000 miles"]);
        let doc = Html::parse_document(&format!("<html><body>{html}</body></html>"));
        let err = extract_card(cards_of(&doc)[0]).unwrap_err();
        assert!(matches!(err, ExtractError::IncompleteSpecs));
    }

    #[test]
    fn bad_card_does_not_abort_the_page() {
        let bad = card("POA", &["2016", "Petrol", "1,000 miles", "1.2L"]);
        let good = card("£6,450", &["2017", "Petrol", "30,500 miles", "1.6L", "Hatchback"]);
        let doc = Html::parse_document(&format!("<html><body>{bad}{good}</body></html>"));

        let listings = extract_listings(&doc, 0);
        assert_eq!(listings.len(), 1);
        assert_eq!(
            listings[0],
            CarListing { price: 6450, year: 2017, mileage: 30500, engine_size: 1600 }
        );
    }

    #[test]
    fn fixture_page_extracts_good_cards_in_order() {
        let html = std::fs::read_to_string("tests/fixtures/search_page.html").unwrap();
        let doc = Html::parse_document(&html);

        let listings = extract_listings(&doc, 0);
        assert_eq!(
            listings,
            vec![
                CarListing { price: 10490, year: 2017, mileage: 28415, engine_size: 1000 },
                CarListing { price: 9250, year: 2016, mileage: 44210, engine_size: 1600 },
                CarListing { price: 12995, year: 2018, mileage: 9876, engine_size: 2000 },
            ]
        );
    }

    #[test]
    fn listing_serializes_with_fixed_field_names() {
        let listing = CarListing { price: 9500, year: 2016, mileage: 32100, engine_size: 1200 };
        let json = serde_json::to_string(&listing).unwrap();
        assert_eq!(
            json,
            r#"{"price":9500,"year":2016,"mileage":32100,"engine_size":1200}"#
        );
    }
}
