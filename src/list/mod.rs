//! # List Presentation
//!
//! Pagination over the cached snapshot and a plain-text rendering of one page
//! of restaurant cards.

use std::fmt;

use crate::model::RestaurantRecord;

/// Records per page.
pub const PAGE_SIZE: usize = 3;

pub const LIST_TITLE: &str = "My Restaurants";
pub const EMPTY_MESSAGE: &str = "No restaurants available. Add one to get started!";
pub const LOADING_MESSAGE: &str = "Loading restaurants...";

pub fn total_pages(count: usize) -> usize {
    count.div_ceil(PAGE_SIZE)
}

/// The slice shown on 1-based `page`. Pages outside `1..=total_pages` are empty.
pub fn paginate<T>(records: &[T], page: usize) -> &[T] {
    let Some(start) = page.checked_sub(1).and_then(|p| p.checked_mul(PAGE_SIZE)) else {
        return &[];
    };
    if start >= records.len() {
        return &[];
    }
    let end = (start + PAGE_SIZE).min(records.len());
    &records[start..end]
}

/// `"1 star"`, `"4 stars"`.
pub fn rating_label(rating: u8) -> String {
    if rating == 1 {
        "1 star".to_string()
    } else {
        format!("{rating} stars")
    }
}

/// One restaurant rendered as a text card.
pub struct RestaurantCard<'a>(pub &'a RestaurantRecord);

impl fmt::Display for RestaurantCard<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let r = self.0;
        writeln!(f, "#{} {} ({})", r.id, r.name, r.cuisine_type)?;
        writeln!(f, "  {} {}", r.price_range.symbol(), r.price_range.label())?;
        writeln!(f, "  {}", rating_label(r.rating))?;
        writeln!(f, "  {}", r.location)?;
        if let Some(description) = r.description.as_deref().filter(|d| !d.is_empty()) {
            writeln!(f, "  {description}")?;
        }
        Ok(())
    }
}

/// One page of the list, with its pager line when there is more than one page.
pub struct ListView<'a> {
    records: &'a [RestaurantRecord],
    page: usize,
}

impl<'a> ListView<'a> {
    pub fn new(records: &'a [RestaurantRecord], page: usize) -> Self {
        Self { records, page }
    }

    pub fn visible(&self) -> &'a [RestaurantRecord] {
        paginate(self.records, self.page)
    }

    pub fn total_pages(&self) -> usize {
        total_pages(self.records.len())
    }

    /// `Some("Page 2 of 3")` when paging applies.
    pub fn pager(&self) -> Option<String> {
        let total = self.total_pages();
        (total > 1).then(|| format!("Page {} of {}", self.page, total))
    }
}

impl fmt::Display for ListView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{LIST_TITLE}")?;
        if self.records.is_empty() {
            return writeln!(f, "{EMPTY_MESSAGE}");
        }
        for record in self.visible() {
            writeln!(f)?;
            write!(f, "{}", RestaurantCard(record))?;
        }
        if let Some(pager) = self.pager() {
            writeln!(f)?;
            writeln!(f, "{pager}")?;
        }
        Ok(())
    }
}
