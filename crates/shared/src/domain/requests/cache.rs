use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Body of the targeted invalidation endpoints. Without an id every list and
/// detail entry of the resource is dropped.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, Validate)]
pub struct InvalidateCacheRequest {
    #[serde(default, alias = "product_id", alias = "category_id")]
    #[validate(range(min = 1))]
    pub id: Option<i32>,
}
