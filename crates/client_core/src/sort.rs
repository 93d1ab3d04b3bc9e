//! Client-side ordering of the loaded page.

use std::cmp::Ordering;

use shared::{
    domain::{SortConfig, SortDirection},
    protocol::Contact,
};

/// Three-way compare on the configured column; descending inverts the result.
pub fn compare_contacts(a: &Contact, b: &Contact, sort: SortConfig) -> Ordering {
    let ordering = a.field_value(sort.field).cmp(b.field_value(sort.field));
    match sort.direction {
        SortDirection::Ascending => ordering,
        SortDirection::Descending => ordering.reverse(),
    }
}

/// Stable sort of a single page. Equal keys keep their fetched order in both
/// directions.
pub fn sort_page(items: &[Contact], sort: SortConfig) -> Vec<Contact> {
    let mut rows = items.to_vec();
    sort_in_place(&mut rows, sort);
    rows
}

pub fn sort_in_place(rows: &mut [Contact], sort: SortConfig) {
    rows.sort_by(|a, b| compare_contacts(a, b, sort));
}
