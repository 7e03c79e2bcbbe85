use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PaginationMeta {
    pub page: i64,
    pub limit: i64,
    pub returned: usize,
}

#[derive(Debug, Serialize, Clone)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub pagination: PaginationMeta,
}

impl<T> Paginated<T> {
    pub fn new(items: Vec<T>, limit: i64, offset: i64) -> Self {
        let page = if limit > 0 { offset / limit + 1 } else { 1 };
        let returned = items.len();
        Self {
            items,
            pagination: PaginationMeta { page, limit, returned },
        }
    }
}
