use serde::{Deserialize, Serialize};
use shared::protocol::{Contact, ContactListResponse};

/// Number of pages needed for `total` records; zero records means zero pages.
pub fn total_pages(total: u64, page_size: u32) -> u32 {
    if page_size == 0 {
        return 0;
    }
    u32::try_from(total.div_ceil(u64::from(page_size))).unwrap_or(u32::MAX)
}

/// Keeps a requested page within `1..=total_pages` (page 1 when there are none).
pub fn clamp_page(page: u32, total_pages: u32) -> u32 {
    page.clamp(1, total_pages.max(1))
}

/// Page numbers shown by the pagination control: a window of `width` pages
/// around the current one, shifted to stay inside the valid range.
pub fn visible_pages(page: u32, total_pages: u32, width: u32) -> Vec<u32> {
    if total_pages == 0 || width == 0 {
        return Vec::new();
    }
    let width = width.min(total_pages);
    let page = clamp_page(page, total_pages);
    let half = width / 2;
    let start = page
        .saturating_sub(half)
        .max(1)
        .min(total_pages - width + 1);
    (start..start + width).collect()
}

/// One fetched page of contacts, in backend order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactPage {
    pub page: u32,
    pub contacts: Vec<Contact>,
    pub total: u64,
    pub total_pages: u32,
}

impl ContactPage {
    pub fn from_response(page: u32, page_size: u32, response: ContactListResponse) -> Self {
        Self {
            page,
            total_pages: total_pages(response.total, page_size),
            total: response.total,
            contacts: response.contacts,
        }
    }
}
