//! Spec-List Locator: find the key-specs list under a card subtree and
//! map its items to fields by position.

use ego_tree::NodeRef;
use scraper::Node;

use super::{fields, has_class, is_element, leading_text, ExtractError, Search};

const SPECS_CLASS: &str = "listing-key-specs";

pub(super) struct KeySpecs {
    pub year: u32,
    pub mileage: u32,
    pub engine_size: u32,
}

/// Search direct children first, then recurse, mirroring the price
/// search. Once the list is located its outcome is final: a malformed
/// or missing item aborts the card, never resumes the search.
pub(super) fn find_specs(node: NodeRef<Node>) -> Search<KeySpecs> {
    for child in node.children() {
        if is_element(child, "ul") && has_class(child, SPECS_CLASS) {
            return match read_items(child) {
                Ok(specs) => Search::Found(specs),
                Err(e) => Search::Failed(e),
            };
        }

        match find_specs(child) {
            Search::NotFound => {}
            outcome => return outcome,
        }
    }

    Search::NotFound
}

/// Consume the list's `li` children in order. Positions are counted
/// over `li` elements only: 0 → year, 1 → fuel type (not mapped),
/// 2 → mileage, 3 → engine size; items past position 3 are ignored.
/// A list that ends before all three fields are set yields no record.
fn read_items(list: NodeRef<Node>) -> Result<KeySpecs, ExtractError> {
    let mut year = None;
    let mut mileage = None;
    let mut engine_size = None;

    let mut position = 0usize;
    for item in list.children() {
        if !is_element(item, "li") {
            continue;
        }
        let text = leading_text(item).ok_or(ExtractError::UnexpectedListItem)?;

        match position {
            0 => year = Some(fields::parse_year(text)?),
            2 => mileage = Some(fields::parse_mileage(text)?),
            3 => engine_size = Some(fields::parse_engine_size(text)?),
            _ if position > 3 => break,
            _ => {} // position 1 (fuel type) is read but unused
        }
        position += 1;
    }

    match (year, mileage, engine_size) {
        (Some(year), Some(mileage), Some(engine_size)) => Ok(KeySpecs {
            year,
            mileage,
            engine_size,
        }),
        _ => Err(ExtractError::IncompleteSpecs),
    }
}
