mod command;
mod query;

pub use self::command::{OrderCommandService, OrderCommandServiceDeps};
pub use self::query::OrderQueryService;

use crate::{
    abstract_trait::DynOrderQueryRepository,
    domain::responses::OrderResponse,
    errors::ServiceError,
    model::Order,
};
use std::collections::HashMap;

/// Loads the lines of `orders` in one query and pairs them up.
async fn with_items(
    query: &DynOrderQueryRepository,
    orders: Vec<Order>,
) -> Result<Vec<OrderResponse>, ServiceError> {
    if orders.is_empty() {
        return Ok(Vec::new());
    }

    let ids: Vec<i32> = orders.iter().map(|o| o.id).collect();
    let mut lines = HashMap::new();
    for item in query.find_items(&ids).await? {
        lines.entry(item.order_id).or_insert_with(Vec::new).push(item);
    }

    Ok(orders
        .into_iter()
        .map(|order| {
            let items = lines.remove(&order.id).unwrap_or_default();
            OrderResponse::new(order, items)
        })
        .collect())
}
