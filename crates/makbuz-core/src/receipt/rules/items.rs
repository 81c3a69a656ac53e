//! Line-item extraction: product names and their costs.

use super::patterns::LINE_ITEM;

/// Extracted line items as parallel lists (`costs[i]` belongs to
/// `names[i]`), the shape the export layer expects.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LineItems {
    pub names: Vec<String>,
    pub costs: Vec<String>,
}

impl LineItems {
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Extract product lines of the `NAME <qty> *<price>` shape.
///
/// Names shorter than three characters are discarded; they are almost
/// always OCR debris rather than products.
pub fn extract_line_items(text: &str) -> LineItems {
    let mut items = LineItems::default();

    for caps in LINE_ITEM.captures_iter(text) {
        let name = caps[1].trim().to_string();
        if name.chars().count() < 3 {
            continue;
        }
        items.names.push(name);
        items.costs.push(caps[3].trim().to_string());
    }

    items
}
