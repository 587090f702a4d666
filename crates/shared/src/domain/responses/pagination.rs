use crate::domain::requests::PageRequest;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, ToSchema)]
pub struct Pagination {
    pub page: i64,
    pub page_size: i64,
    pub total_items: i64,
    pub total_pages: i64,
}

impl Pagination {
    pub fn new(page: &PageRequest, total_items: i64) -> Self {
        let total_pages = if total_items <= 0 {
            0
        } else {
            (total_items + page.page_size - 1) / page.page_size
        };

        Self {
            page: page.page,
            page_size: page.page_size,
            total_items,
            total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_pages_rounds_up() {
        let page = PageRequest::new(Some(2), Some(10));

        assert_eq!(Pagination::new(&page, 0).total_pages, 0);
        assert_eq!(Pagination::new(&page, 10).total_pages, 1);
        assert_eq!(Pagination::new(&page, 11).total_pages, 2);

        let pagination = Pagination::new(&page, 25);
        assert_eq!(pagination.page, 2);
        assert_eq!(pagination.total_pages, 3);
    }
}
