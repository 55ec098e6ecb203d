//! Price Locator: find the pricing marker anywhere under a card
//! subtree and parse its displayed value.

use ego_tree::NodeRef;
use scraper::Node;

use super::{fields, has_class, is_element, leading_text, ExtractError, Search};

const PRICE_CLASS: &str = "product-card-pricing__price";

/// Search direct children first, then recurse. The first successfully
/// parsed price wins; a marker whose span text violates the currency
/// grammar aborts the whole card rather than resuming the search.
pub(super) fn find_price(node: NodeRef<Node>) -> Search<u32> {
    for child in node.children() {
        if has_class(child, PRICE_CLASS) {
            if let Some(span) = child.children().find(|c| is_element(*c, "span")) {
                let Some(text) = leading_text(span) else {
                    return Search::Failed(ExtractError::UnexpectedPriceStructure);
                };
                return match fields::parse_currency(text) {
                    Ok(price) => Search::Found(price),
                    Err(e) => Search::Failed(e),
                };
            }
            // Marker with no span child: fall through and keep searching.
        }

        match find_price(child) {
            Search::NotFound => {}
            outcome => return outcome,
        }
    }

    Search::NotFound
}
