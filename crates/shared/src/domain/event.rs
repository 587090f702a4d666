use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const ADMIN_ORDERS_GROUP: &str = "admin_orders";

pub fn user_group(user_id: i32) -> String {
    format!("user_{user_id}")
}

/// Order events fanned out to WebSocket channel groups.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OrderEvent {
    OrderCreated {
        order_id: i32,
        message: String,
        timestamp: DateTime<Utc>,
    },
    OrderUpdate {
        order_id: i32,
        old_status: String,
        new_status: String,
        message: String,
        timestamp: DateTime<Utc>,
    },
    NewOrder {
        order_id: i32,
        user_id: i32,
        user_name: String,
        total_price: String,
        message: String,
        timestamp: DateTime<Utc>,
    },
    OrderStatusChanged {
        order_id: i32,
        user_id: i32,
        old_status: String,
        new_status: String,
        message: String,
        timestamp: DateTime<Utc>,
    },
}

/// Frames the server writes on an order socket besides [`OrderEvent`]s.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SocketReply {
    ConnectionEstablished { message: String, user_id: i32 },
    Pong { message: String },
    SubscriptionConfirmed { message: String },
    Error { message: String },
}

#[derive(Deserialize, Debug)]
struct ClientFrame {
    #[serde(rename = "type", default)]
    kind: Option<String>,
}

/// Answers a text frame sent by a client. Unknown frame types get no reply.
pub fn reply_to_client(text: &str) -> Option<SocketReply> {
    let frame: ClientFrame = match serde_json::from_str(text) {
        Ok(frame) => frame,
        Err(_) => {
            return Some(SocketReply::Error {
                message: "Invalid JSON format".to_string(),
            });
        }
    };

    match frame.kind.as_deref() {
        Some("ping") => Some(SocketReply::Pong {
            message: "Connection is alive".to_string(),
        }),
        Some("subscribe_orders") => Some(SocketReply::SubscriptionConfirmed {
            message: "Subscribed to order updates".to_string(),
        }),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn events_are_tagged_with_snake_case_type() {
        let event = OrderEvent::NewOrder {
            order_id: 3,
            user_id: 9,
            user_name: "jane".into(),
            total_price: "42.00".into(),
            message: "New order #3 from jane".into(),
            timestamp: Utc::now(),
        };

        let json: Value = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "new_order");
        assert_eq!(json["total_price"], "42.00");
        assert_eq!(json["user_name"], "jane");
    }

    #[test]
    fn ping_gets_pong() {
        let reply = reply_to_client(r#"{"type":"ping"}"#).unwrap();
        let json: Value = serde_json::to_value(&reply).unwrap();
        assert_eq!(json["type"], "pong");
    }

    #[test]
    fn subscribe_is_confirmed() {
        assert!(matches!(
            reply_to_client(r#"{"type":"subscribe_orders"}"#),
            Some(SocketReply::SubscriptionConfirmed { .. })
        ));
    }

    #[test]
    fn malformed_json_is_reported_and_unknown_types_ignored() {
        assert_eq!(
            reply_to_client("{not json"),
            Some(SocketReply::Error {
                message: "Invalid JSON format".into()
            })
        );
        assert_eq!(reply_to_client(r#"{"type":"dance"}"#), None);
        assert_eq!(reply_to_client(r#"{}"#), None);
    }

    #[test]
    fn group_names() {
        assert_eq!(user_group(12), "user_12");
        assert_eq!(ADMIN_ORDERS_GROUP, "admin_orders");
    }
}
