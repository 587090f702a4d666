use axum::{
    Json,
    extract::{FromRequest, Request},
    http::StatusCode,
};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value, json};
use validator::{Validate, ValidationError, ValidationErrors};

/// JSON body that has passed its `validator` rules. Rejections answer 400
/// with `{error, message, details}`.
pub struct SimpleValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for SimpleValidatedJson<T>
where
    T: DeserializeOwned + Validate + Send,
    S: Send + Sync,
{
    type Rejection = (StatusCode, Json<Value>);

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(body) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| {
                let payload = json!({
                    "error": "Invalid JSON",
                    "message": rejection.body_text(),
                });
                (StatusCode::BAD_REQUEST, Json(payload))
            })?;

        body.validate().map_err(|errors| {
            let details = field_messages(&errors);
            let payload = json!({
                "error": "Validation failed",
                "message": summary(&details),
                "details": details,
            });
            (StatusCode::BAD_REQUEST, Json(payload))
        })?;

        Ok(Self(body))
    }
}

fn describe(field: &str, error: &ValidationError) -> String {
    if let Some(message) = &error.message {
        return message.to_string();
    }

    match error.code.as_ref() {
        "email" => "Invalid email format".to_string(),
        "length" => "Invalid length".to_string(),
        "range" => "Value out of range".to_string(),
        "must_match" => "Values do not match".to_string(),
        _ => format!("Invalid {field}"),
    }
}

/// Field name to its messages, ordered by field name.
fn field_messages(errors: &ValidationErrors) -> Map<String, Value> {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    fields
        .into_iter()
        .map(|(field, field_errors)| {
            let messages: Vec<Value> = field_errors
                .iter()
                .map(|error| Value::String(describe(&field, error)))
                .collect();
            (field.to_string(), Value::Array(messages))
        })
        .collect()
}

fn summary(details: &Map<String, Value>) -> String {
    let parts: Vec<String> = details
        .iter()
        .flat_map(|(field, messages)| {
            messages
                .as_array()
                .into_iter()
                .flatten()
                .filter_map(Value::as_str)
                .map(move |message| format!("{field}: {message}"))
        })
        .collect();

    if parts.is_empty() {
        "Validation failed".to_string()
    } else {
        parts.join("; ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Router, body::Body, routing::post};
    use serde::Deserialize;
    use tower::ServiceExt;

    #[derive(Debug, Deserialize, Validate)]
    struct Signup {
        #[validate(length(min = 3, message = "Too short"))]
        username: String,
        #[validate(email)]
        email: String,
    }

    fn app() -> Router {
        Router::new().route(
            "/signup",
            post(|SimpleValidatedJson(body): SimpleValidatedJson<Signup>| async move {
                body.username
            }),
        )
    }

    async fn send(body: &str) -> (StatusCode, Value) {
        let response = app()
            .oneshot(
                axum::http::Request::builder()
                    .method("POST")
                    .uri("/signup")
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    #[tokio::test]
    async fn valid_body_reaches_handler() {
        let (status, _) = send(r#"{"username":"jane","email":"jane@example.com"}"#).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn rule_failures_are_listed_per_field() {
        let (status, body) = send(r#"{"username":"jo","email":"nope"}"#).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Validation failed");
        assert_eq!(body["details"]["username"][0], "Too short");
        assert_eq!(body["details"]["email"][0], "Invalid email format");
        assert_eq!(
            body["message"],
            "email: Invalid email format; username: Too short"
        );
    }

    #[tokio::test]
    async fn malformed_json_is_a_bad_request() {
        let (status, body) = send(r#"{"username":"#).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid JSON");
    }
}
