use crate::domain::event::OrderEvent;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::broadcast::Receiver;

pub type DynNotifier = Arc<dyn NotifierTrait + Send + Sync>;

#[async_trait]
pub trait NotifierTrait {
    /// Sends `event` to every socket in `group`; returns how many received it.
    async fn publish(&self, group: &str, event: OrderEvent) -> usize;
    async fn subscribe(&self, group: &str) -> Receiver<OrderEvent>;
    async fn release(&self, group: &str);
}
