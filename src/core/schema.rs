//! Request and response schemas.
//!
//! Payloads arrive as untyped JSON. They are checked against a JSON Schema
//! first so every bad field is reported at once, then deserialized into the
//! typed model.

use crate::domain::model::{PlanRequest, PlanResponse};
use crate::utils::validation::{FieldViolation, ValidationError};
use jsonschema::error::{TypeKind, ValidationErrorKind};
use jsonschema::JSONSchema;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::sync::LazyLock;

pub const MIN_SHOWTIMES: usize = 1;
pub const MAX_SHOWTIMES: usize = 3;

type Validated<T> = std::result::Result<T, ValidationError>;

/// 各欄位下限對應的錯誤訊息，沒有列出的欄位使用通用訊息
const MINIMUM_MESSAGES: &[(&str, &str)] = &[
    ("budget", "Budget must be at least 1 INR"),
    ("numberOfPeople", "Number of people must be at least 1"),
    ("numberOfBoys", "Number of boys must be at least 0"),
    ("numberOfGirls", "Number of girls must be at least 0"),
];

static REQUEST_SCHEMA: LazyLock<JSONSchema> = LazyLock::new(|| {
    let count = |minimum: u32| json!({"type": "integer", "minimum": minimum, "maximum": u32::MAX});
    compile(json!({
        "type": "object",
        "required": ["budget", "numberOfPeople"],
        "properties": {
            "budget": {"type": "number", "minimum": 1},
            "numberOfPeople": count(1),
            "numberOfBoys": count(0),
            "numberOfGirls": count(0)
        }
    }))
});

static RESPONSE_SCHEMA: LazyLock<JSONSchema> = LazyLock::new(|| {
    let array_of = |item: Value| json!({"type": "array", "items": item});
    compile(json!({
        "type": "object",
        "required": ["movies", "transport", "food"],
        "properties": {
            "movies": array_of(json!({
                "type": "object",
                "required": ["title", "price", "showtimes"],
                "properties": {
                    "title": {"type": "string"},
                    "price": {"type": "number"},
                    "showtimes": {
                        "type": "array",
                        "minItems": MIN_SHOWTIMES,
                        "maxItems": MAX_SHOWTIMES,
                        "items": {"type": "string"}
                    }
                }
            })),
            "transport": array_of(json!({
                "type": "object",
                "required": ["method", "estimatedCost"],
                "properties": {
                    "method": {"type": "string"},
                    "estimatedCost": {"type": "number"}
                }
            })),
            "food": array_of(json!({
                "type": "object",
                "required": ["restaurantType", "estimatedFoodCost"],
                "properties": {
                    "restaurantType": {"type": "string"},
                    "estimatedFoodCost": {"type": "number"}
                }
            }))
        }
    }))
});

fn compile(schema: Value) -> JSONSchema {
    JSONSchema::compile(&schema).expect("built-in plan schema is valid")
}

/// 驗證前端送來的規劃請求
pub fn validate_plan_request(payload: &Value) -> Validated<PlanRequest> {
    check(&REQUEST_SCHEMA, payload)
}

/// 驗證模型回傳並解析後的 JSON 是否符合計畫結構
pub fn validate_plan_response(payload: &Value) -> Validated<PlanResponse> {
    check(&RESPONSE_SCHEMA, payload)
}

fn check<T: DeserializeOwned>(schema: &JSONSchema, payload: &Value) -> Validated<T> {
    if let Err(errors) = schema.validate(payload) {
        let mut violations: Vec<FieldViolation> = errors.map(|e| to_violation(&e)).collect();
        violations.sort_by(|a, b| a.path.cmp(&b.path));
        return Err(ValidationError::new(violations));
    }

    // 通過 schema 後仍可能無法轉型，例如人數寫成 2.0
    serde_json::from_value(payload.clone())
        .map_err(|e| ValidationError::new(vec![FieldViolation::new("", e.to_string())]))
}

fn to_violation(error: &jsonschema::ValidationError<'_>) -> FieldViolation {
    let path = field_path(&error.instance_path.to_string());

    match &error.kind {
        ValidationErrorKind::Required { property } => {
            let key = property.as_str().map(str::to_string).unwrap_or_else(|| property.to_string());
            let path = if path.is_empty() {
                key
            } else {
                format!("{}.{}", path, key)
            };
            FieldViolation::new(path, "Required")
        }
        ValidationErrorKind::Type { kind } => {
            let expected = match kind {
                TypeKind::Single(ty) => ty.to_string(),
                TypeKind::Multiple(_) => "value".to_string(),
            };
            let message = mismatch(&expected, &error.instance);
            FieldViolation::new(path, message)
        }
        ValidationErrorKind::Minimum { limit } => {
            let message = MINIMUM_MESSAGES
                .iter()
                .find(|(field, _)| *field == path)
                .map(|(_, message)| message.to_string())
                .unwrap_or_else(|| format!("Number must be greater than or equal to {}", limit));
            FieldViolation::new(path, message)
        }
        ValidationErrorKind::Maximum { limit } => {
            FieldViolation::new(path, format!("Number must be less than or equal to {}", limit))
        }
        ValidationErrorKind::MinItems { limit } => {
            FieldViolation::new(path, format!("Array must contain at least {} element(s)", limit))
        }
        ValidationErrorKind::MaxItems { limit } => {
            FieldViolation::new(path, format!("Array must contain at most {} element(s)", limit))
        }
        _ => FieldViolation::new(path, error.to_string()),
    }
}

/// JSON Pointer (`/movies/1/showtimes`) 轉成 `movies[1].showtimes`
fn field_path(pointer: &str) -> String {
    let mut path = String::new();
    for token in pointer.split('/').skip(1) {
        let token = token.replace("~1", "/").replace("~0", "~");
        if token.parse::<usize>().is_ok() {
            path.push_str(&format!("[{}]", token));
        } else {
            if !path.is_empty() {
                path.push('.');
            }
            path.push_str(&token);
        }
    }
    path
}

fn mismatch(expected: &str, received: &Value) -> String {
    let received = match received {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) if expected == "integer" => "float",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    };
    format!("Expected {}, received {}", expected, received)
}
