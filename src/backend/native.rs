use crate::backend::{Dialect, normalize_base_url};
use crate::openai::responses::models::prompt_request::PromptRequest;
use anyhow::{Context, Result, anyhow, bail};
use jsonschema::JSONSchema;
use reqwest::Client;
use serde_json::{Map, Value};
use std::fmt;
use tracing::debug;

/// A backend that speaks the Responses API itself.
#[derive(Clone)]
pub struct NativeBackend {
    api_key: String,
    base_url: String,
}

/// How the backend is called. `Parse` is used for `json_schema` structured
/// outputs: the reply text is decoded and checked against the schema.
#[derive(Debug, Clone, PartialEq)]
pub enum EntryPoint {
    Create,
    Parse { schema: Value },
}

#[derive(Debug, Clone)]
pub struct NativeCall {
    /// The caller's body, untouched apart from `stream`.
    pub body: Map<String, Value>,
    pub entry_point: EntryPoint,
}

impl fmt::Debug for NativeBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeBackend")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl NativeBackend {
    pub fn new(api_key: &str, base_url: &str) -> Self {
        Self {
            api_key: api_key.trim().to_string(),
            base_url: normalize_base_url(base_url),
        }
    }

    pub fn responses_url(&self) -> String {
        format!("{}/responses", self.base_url)
    }
}

impl Dialect for NativeBackend {
    type Outbound = NativeCall;
    type Reply = Value;
    type Output = Value;

    fn transform_request(&self, request: PromptRequest) -> NativeCall {
        let entry_point = match request.json_schema() {
            Some(schema) => EntryPoint::Parse {
                schema: schema.clone(),
            },
            None => EntryPoint::Create,
        };

        let mut body = request.into_body();
        body.insert("stream".to_string(), Value::Bool(false));

        NativeCall { body, entry_point }
    }

    async fn invoke(&self, client: &Client, call: NativeCall) -> Result<Value> {
        let url = self.responses_url();

        debug!(
            "native_request ({:?}):\n{}",
            call.entry_point,
            serde_json::to_string_pretty(&call.body).unwrap_or_default()
        );

        let response = client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&call.body)
            .send()
            .await
            .with_context(|| format!("Failed to send request to {}", url))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            bail!("Responses backend returned error: {} - {}", status, error_text);
        }

        let body: Value = response
            .json()
            .await
            .context("Failed to parse Responses backend reply")?;

        match call.entry_point {
            EntryPoint::Create => Ok(body),
            EntryPoint::Parse { schema } => {
                tokio::task::spawn_blocking(move || parse_structured_output(body, &schema))
                    .await
                    .context("Structured output validation task failed")?
            }
        }
    }

    fn transform_response(&self, reply: Value) -> Value {
        reply
    }
}

/// Decode the reply text as JSON, validate it against `schema` and attach it
/// as `output_parsed`. A reply without text gets `output_parsed: null`.
pub(crate) fn parse_structured_output(mut response: Value, schema: &Value) -> Result<Value> {
    let parsed = match first_output_text(&response) {
        Some(text) => {
            let value: Value =
                serde_json::from_str(text).context("Structured output is not valid JSON")?;
            validate_against_schema(&value, schema)?;
            value
        }
        None => Value::Null,
    };

    let Some(object) = response.as_object_mut() else {
        bail!("Responses backend reply is not a JSON object");
    };
    object.insert("output_parsed".to_string(), parsed);

    Ok(response)
}

fn first_output_text(response: &Value) -> Option<&str> {
    response
        .get("output")?
        .as_array()?
        .iter()
        .filter(|item| item.get("type").and_then(Value::as_str) == Some("message"))
        .flat_map(|item| item.get("content").and_then(Value::as_array).into_iter().flatten())
        .find(|part| part.get("type").and_then(Value::as_str) == Some("output_text"))
        .and_then(|part| part.get("text")?.as_str())
}

/// External `$ref`s are never fetched: jsonschema is built without its
/// resolver features, so they surface as validation errors.
fn validate_against_schema(instance: &Value, schema: &Value) -> Result<()> {
    // Compiled per call; the schema arrives with each request.
    let compiled =
        JSONSchema::compile(schema).map_err(|e| anyhow!("Invalid structured output schema: {}", e))?;

    if let Err(errors) = compiled.validate(instance) {
        let details: Vec<String> = errors.map(|e| e.to_string()).collect();
        bail!(
            "Structured output does not match schema: {}",
            details.join("; ")
        );
    }

    Ok(())
}
