use crate::{abstract_trait::NotifierTrait, domain::event::OrderEvent};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::{
    RwLock,
    broadcast::{self, Receiver, Sender},
};
use tracing::{debug, info};

const GROUP_CAPACITY: usize = 64;

/// In-process channel layer: one broadcast channel per group name.
pub struct NotificationHub {
    groups: RwLock<HashMap<String, Sender<OrderEvent>>>,
    capacity: usize,
}

impl NotificationHub {
    pub fn new() -> Self {
        Self::with_capacity(GROUP_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            groups: RwLock::new(HashMap::new()),
            capacity,
        }
    }

    pub async fn group_count(&self) -> usize {
        self.groups.read().await.len()
    }
}

impl Default for NotificationHub {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NotifierTrait for NotificationHub {
    async fn publish(&self, group: &str, event: OrderEvent) -> usize {
        let groups = self.groups.read().await;

        let Some(sender) = groups.get(group) else {
            debug!("No listeners in group {group}, dropping event");
            return 0;
        };

        match sender.send(event) {
            Ok(receivers) => {
                info!("📣 Delivered order event to {receivers} socket(s) in {group}");
                receivers
            }
            Err(_) => {
                debug!("Group {group} has no live receivers");
                0
            }
        }
    }

    async fn subscribe(&self, group: &str) -> Receiver<OrderEvent> {
        let mut groups = self.groups.write().await;

        groups
            .entry(group.to_string())
            .or_insert_with(|| broadcast::channel(self.capacity).0)
            .subscribe()
    }

    /// Forgets a group once its last socket has gone away.
    async fn release(&self, group: &str) {
        let mut groups = self.groups.write().await;

        if groups
            .get(group)
            .is_some_and(|sender| sender.receiver_count() == 0)
        {
            groups.remove(group);
            debug!("Released empty group {group}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::event::{ADMIN_ORDERS_GROUP, user_group};
    use chrono::Utc;

    fn created(order_id: i32) -> OrderEvent {
        OrderEvent::OrderCreated {
            order_id,
            message: format!("Order #{order_id} created"),
            timestamp: Utc::now(),
        }
    }

    #[tokio::test]
    async fn publish_without_listeners_is_dropped() {
        let hub = NotificationHub::new();
        assert_eq!(hub.publish(&user_group(1), created(1)).await, 0);
    }

    #[tokio::test]
    async fn every_subscriber_in_group_receives() {
        let hub = NotificationHub::new();
        let mut first = hub.subscribe(ADMIN_ORDERS_GROUP).await;
        let mut second = hub.subscribe(ADMIN_ORDERS_GROUP).await;

        let event = created(5);
        assert_eq!(hub.publish(ADMIN_ORDERS_GROUP, event.clone()).await, 2);
        assert_eq!(first.recv().await.unwrap(), event);
        assert_eq!(second.recv().await.unwrap(), event);
    }

    #[tokio::test]
    async fn groups_are_isolated() {
        let hub = NotificationHub::new();
        let mut alice = hub.subscribe(&user_group(1)).await;
        let _bob = hub.subscribe(&user_group(2)).await;

        assert_eq!(hub.publish(&user_group(2), created(9)).await, 1);
        assert!(alice.try_recv().is_err());
    }

    #[tokio::test]
    async fn release_drops_only_empty_groups() {
        let hub = NotificationHub::new();
        let receiver = hub.subscribe(&user_group(3)).await;

        hub.release(&user_group(3)).await;
        assert_eq!(hub.group_count().await, 1);

        drop(receiver);
        hub.release(&user_group(3)).await;
        assert_eq!(hub.group_count().await, 0);
    }
}
