pub const DEFAULT_PAGE_SIZE: i64 = 10;
pub const MAX_PAGE_SIZE: i64 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub page_size: i64,
}

impl PageRequest {
    pub fn new(page: Option<i64>, page_size: Option<i64>) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            page_size: page_size
                .unwrap_or(DEFAULT_PAGE_SIZE)
                .clamp(1, MAX_PAGE_SIZE),
        }
    }

    pub fn limit(&self) -> i64 {
        self.page_size
    }

    /// Saturates so an absurd `page` still maps to an offset past the end.
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.page_size)
    }
}

/// Whitelisted `ORDER BY` column. `field` is always one of the allowed
/// names, never caller input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortOrder {
    pub field: &'static str,
    pub descending: bool,
}

impl SortOrder {
    pub const fn asc(field: &'static str) -> Self {
        Self {
            field,
            descending: false,
        }
    }

    pub const fn desc(field: &'static str) -> Self {
        Self {
            field,
            descending: true,
        }
    }

    /// Parses `field` / `-field`; unknown fields fall back to `default`.
    pub fn parse(raw: Option<&str>, allowed: &[&'static str], default: SortOrder) -> Self {
        let Some(raw) = raw.map(str::trim).filter(|r| !r.is_empty()) else {
            return default;
        };

        let (name, descending) = match raw.strip_prefix('-') {
            Some(rest) => (rest, true),
            None => (raw, false),
        };

        allowed
            .iter()
            .find(|candidate| **candidate == name)
            .map(|field| SortOrder {
                field: *field,
                descending,
            })
            .unwrap_or(default)
    }

    pub fn direction(&self) -> &'static str {
        if self.descending { "DESC" } else { "ASC" }
    }
}

/// Builds a `%value%` pattern for `ILIKE`, escaping wildcard characters.
pub fn like_pattern(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len() + 2);
    escaped.push('%');
    for ch in value.trim().chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped.push('%');
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_defaults_and_bounds() {
        let page = PageRequest::new(None, None);
        assert_eq!(page, PageRequest { page: 1, page_size: DEFAULT_PAGE_SIZE });
        assert_eq!(page.offset(), 0);

        let clamped = PageRequest::new(Some(0), Some(1_000));
        assert_eq!(clamped.page, 1);
        assert_eq!(clamped.page_size, MAX_PAGE_SIZE);

        let third = PageRequest::new(Some(3), Some(20));
        assert_eq!(third.offset(), 40);
        assert_eq!(third.limit(), 20);
    }

    #[test]
    fn huge_page_saturates_offset() {
        let far = PageRequest::new(Some(i64::MAX), Some(10));
        assert_eq!(far.offset(), i64::MAX);

        let negative = PageRequest::new(Some(i64::MIN), Some(MAX_PAGE_SIZE));
        assert_eq!(negative.offset(), 0);
    }

    #[test]
    fn sort_order_accepts_whitelisted_fields() {
        let allowed = ["name", "price", "created_at"];
        let default = SortOrder::desc("created_at");

        assert_eq!(
            SortOrder::parse(Some("-price"), &allowed, default),
            SortOrder::desc("price")
        );
        assert_eq!(
            SortOrder::parse(Some("name"), &allowed, default),
            SortOrder::asc("name")
        );
        assert_eq!(SortOrder::parse(None, &allowed, default), default);
        assert_eq!(
            SortOrder::parse(Some("price; DROP TABLE products"), &allowed, default),
            default
        );
    }

    #[test]
    fn like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("phone"), "%phone%");
        assert_eq!(like_pattern(" 50%_off "), "%50\\%\\_off%");
    }
}
