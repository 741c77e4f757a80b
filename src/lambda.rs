#[cfg(feature = "lambda")]
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
#[cfg(feature = "lambda")]
use serde::{Deserialize, Serialize};
#[cfg(feature = "lambda")]
use std::collections::HashMap;
#[cfg(feature = "lambda")]
use std::sync::Arc;
#[cfg(feature = "lambda")]
use weekend_planner::adapters::http::parse_body;
#[cfg(feature = "lambda")]
use weekend_planner::utils::{logger, validation::Validate};
#[cfg(feature = "lambda")]
use weekend_planner::{AppConfig, GeminiClient, PlanHandler};

/// 函式平台轉送過來的 HTTP 事件（只取需要的欄位）
#[cfg(feature = "lambda")]
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Request {
    pub http_method: String,
    pub body: Option<String>,
}

#[cfg(feature = "lambda")]
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    pub status_code: u16,
    pub headers: HashMap<String, String>,
    pub body: String,
}

#[cfg(feature = "lambda")]
fn cors_headers() -> HashMap<String, String> {
    HashMap::from([
        ("Access-Control-Allow-Origin".to_string(), "*".to_string()),
        ("Access-Control-Allow-Headers".to_string(), "Content-Type".to_string()),
        (
            "Access-Control-Allow-Methods".to_string(),
            "POST, OPTIONS".to_string(),
        ),
        ("Content-Type".to_string(), "application/json".to_string()),
    ])
}

#[cfg(feature = "lambda")]
fn respond(status_code: u16, body: String) -> Response {
    Response {
        status_code,
        headers: cors_headers(),
        body,
    }
}

#[cfg(feature = "lambda")]
async fn function_handler(
    handler: &PlanHandler,
    event: LambdaEvent<Request>,
) -> Result<Response, Error> {
    let request = event.payload;

    match request.http_method.to_ascii_uppercase().as_str() {
        "OPTIONS" => return Ok(respond(200, String::new())),
        "POST" => {}
        other => {
            tracing::warn!("Rejected {} request", other);
            return Ok(respond(
                405,
                serde_json::json!({ "error": "Method not allowed" }).to_string(),
            ));
        }
    }

    let body = request.body.unwrap_or_default();
    let result = match parse_body(body.as_bytes()) {
        Ok(payload) => handler.generate_plan(&payload).await,
        Err(e) => Err(e),
    };

    let response = match result {
        Ok(plan) => respond(200, serde_json::to_string(&plan)?),
        Err(e) => respond(e.status_code(), e.to_response_body().to_string()),
    };
    Ok(response)
}

#[cfg(feature = "lambda")]
#[tokio::main]
async fn main() -> Result<(), Error> {
    logger::init_lambda_logger();

    let config = AppConfig::from_env()?;
    config.validate()?;

    let generator = GeminiClient::new(&config)?;
    let handler = Arc::new(PlanHandler::new(config, Arc::new(generator)));

    tracing::info!("Starting weekend-planner function");
    run(service_fn(move |event: LambdaEvent<Request>| {
        let handler = Arc::clone(&handler);
        async move { function_handler(&handler, event).await }
    }))
    .await
}

#[cfg(all(test, feature = "lambda"))]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use lambda_runtime::Context;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use weekend_planner::domain::ports::TextGenerator;

    const REPLY: &str = "```json\n{\"movies\":[{\"title\":\"X\",\"price\":999,\"showtimes\":[\"2:00 PM\",\"5:00 PM\",\"8:00 PM\"]}],\"transport\":[{\"method\":\"Cab\",\"estimatedCost\":150}],\"food\":[{\"restaurantType\":\"Cafe\",\"estimatedFoodCost\":400}]}\n```";

    struct CannedGenerator {
        reply: &'static str,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl TextGenerator for CannedGenerator {
        async fn generate_text(
            &self,
            _model: &str,
            _prompt: &str,
        ) -> weekend_planner::Result<Option<String>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Some(self.reply.to_string()))
        }
    }

    fn handler_with(key: Option<&str>, reply: &'static str) -> (PlanHandler, Arc<CannedGenerator>) {
        let generator = Arc::new(CannedGenerator {
            reply,
            calls: AtomicUsize::new(0),
        });
        let config = AppConfig {
            gemini_api_key: key.map(str::to_string),
            ..AppConfig::default()
        };
        (PlanHandler::new(config, generator.clone()), generator)
    }

    fn event(method: &str, body: Option<&str>) -> LambdaEvent<Request> {
        LambdaEvent::new(
            Request {
                http_method: method.to_string(),
                body: body.map(str::to_string),
            },
            Context::default(),
        )
    }

    fn body_json(response: &Response) -> serde_json::Value {
        serde_json::from_str(&response.body).unwrap()
    }

    fn assert_cors(response: &Response) {
        assert_eq!(response.headers["Access-Control-Allow-Origin"], "*");
        assert_eq!(response.headers["Access-Control-Allow-Headers"], "Content-Type");
        assert_eq!(response.headers["Access-Control-Allow-Methods"], "POST, OPTIONS");
    }

    #[tokio::test]
    async fn test_options_preflight_is_empty_ok() {
        let (handler, generator) = handler_with(Some("k"), REPLY);
        let response = function_handler(&handler, event("OPTIONS", None)).await.unwrap();

        assert_eq!(response.status_code, 200);
        assert!(response.body.is_empty());
        assert_cors(&response);
        assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_other_methods_are_not_allowed() {
        let (handler, generator) = handler_with(Some("k"), REPLY);
        for method in ["GET", "PUT", "DELETE"] {
            let response = function_handler(&handler, event(method, None)).await.unwrap();
            assert_eq!(response.status_code, 405);
            assert_eq!(
                body_json(&response),
                serde_json::json!({"error": "Method not allowed"})
            );
            assert_cors(&response);
        }
        assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_post_returns_normalized_plan() {
        let (handler, generator) = handler_with(Some("k"), REPLY);
        let body = r#"{"budget":1000,"numberOfPeople":2,"numberOfBoys":1,"numberOfGirls":1}"#;
        let response = function_handler(&handler, event("post", Some(body))).await.unwrap();

        assert_eq!(response.status_code, 200);
        assert_cors(&response);
        let json = body_json(&response);
        assert_eq!(json["movies"][0]["price"], 350.0);
        assert_eq!(json["transport"][0]["estimatedCost"], 150.0);
        assert_eq!(generator.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_post_invalid_request_is_400() {
        let (handler, generator) = handler_with(Some("k"), REPLY);
        for body in [Some(r#"{"budget":0,"numberOfPeople":1}"#), Some("not json"), None] {
            let response = function_handler(&handler, event("POST", body)).await.unwrap();
            assert_eq!(response.status_code, 400);
            assert_eq!(body_json(&response)["error"], "Invalid request data");
            assert!(body_json(&response)["details"].is_string());
            assert_cors(&response);
        }
        assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_post_failures_are_500() {
        let (handler, _) = handler_with(None, REPLY);
        let body = r#"{"budget":1000,"numberOfPeople":2}"#;
        let response = function_handler(&handler, event("POST", Some(body))).await.unwrap();
        assert_eq!(response.status_code, 500);
        assert_eq!(
            body_json(&response),
            serde_json::json!({"error": "Google Gemini API key is not configured"})
        );

        let (handler, _) = handler_with(Some("k"), "not json");
        let response = function_handler(&handler, event("POST", Some(body))).await.unwrap();
        assert_eq!(response.status_code, 500);
        assert_eq!(
            body_json(&response),
            serde_json::json!({"error": "Failed to generate budget plan. Please try again."})
        );
        assert_cors(&response);
    }
}
