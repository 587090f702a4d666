use serde::Serialize;

/// Cache key layout shared by readers and invalidators.
pub struct CacheKey;

impl CacheKey {
    pub const PRODUCT_LIST_PREFIX: &'static str = "public_products:list";
    pub const CATEGORY_LIST_PREFIX: &'static str = "public_categories:list";

    pub const PRODUCT_PATTERNS: [&'static str; 3] =
        ["*products_list*", "*product_list*", "*public_products*"];
    pub const CATEGORY_PATTERNS: [&'static str; 3] =
        ["*categories_list*", "*category_list*", "*public_categories*"];

    pub fn product_detail(id: i32) -> String {
        format!("product_detail_{id}")
    }

    pub fn category_detail(id: i32) -> String {
        format!("category_detail_{id}")
    }

    pub fn product_list<T: Serialize>(params: &T) -> String {
        list_key(Self::PRODUCT_LIST_PREFIX, params)
    }

    pub fn category_list<T: Serialize>(params: &T) -> String {
        list_key(Self::CATEGORY_LIST_PREFIX, params)
    }

    pub fn session(user_id: i32) -> String {
        format!("session:{user_id}")
    }

    pub fn login_attempts(username: &str) -> String {
        format!("auth:login_attempts:{}", username.to_lowercase())
    }
}

fn list_key<T: Serialize>(prefix: &str, params: &T) -> String {
    let params = serde_json::to_string(params).unwrap_or_default();
    format!("{prefix}:{params}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::glob_match;
    use crate::domain::requests::FindAllProducts;

    #[test]
    fn list_keys_match_invalidation_patterns() {
        let key = CacheKey::product_list(&FindAllProducts::default());
        assert!(key.starts_with("public_products:list:"));
        assert!(
            CacheKey::PRODUCT_PATTERNS
                .iter()
                .any(|pattern| glob_match(pattern, &key))
        );
        assert!(
            !CacheKey::CATEGORY_PATTERNS
                .iter()
                .any(|pattern| glob_match(pattern, &key))
        );
    }

    #[test]
    fn different_filters_produce_different_keys() {
        let first = CacheKey::product_list(&FindAllProducts::default());
        let second = CacheKey::product_list(&FindAllProducts {
            page: Some(2),
            ..Default::default()
        });
        assert_ne!(first, second);
    }

    #[test]
    fn detail_keys() {
        assert_eq!(CacheKey::product_detail(7), "product_detail_7");
        assert_eq!(CacheKey::category_detail(3), "category_detail_3");
        assert_eq!(CacheKey::session(9), "session:9");
        assert_eq!(CacheKey::login_attempts("Jane"), "auth:login_attempts:jane");
    }
}
