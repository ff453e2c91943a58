use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// An OpenAI Responses API request as sent by the caller.
///
/// Only the fields the relay acts on are typed. The body is kept exactly as
/// received (explicit nulls included) so it can be forwarded to a native
/// backend without loss.
#[derive(Debug, Clone)]
pub struct PromptRequest {
    pub model: String,
    pub input: Input,
    pub stream: bool,
    body: Map<String, Value>,
}

#[derive(Deserialize)]
struct TypedFields {
    model: String,
    #[serde(default, deserialize_with = "null_as_default")]
    input: Input,
    #[serde(default, deserialize_with = "null_as_default")]
    stream: bool,
}

/// `input` is either a bare string (one user turn) or a list of items.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Input {
    Text(String),
    Items(Vec<InputItem>),
}

/// One entry of the `input` array.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputItem {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub item_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    /// Plain text or an array of content blocks, never inspected here.
    /// An explicit `null` is kept as `Some(Value::Null)`.
    #[serde(
        default,
        deserialize_with = "keep_null",
        skip_serializing_if = "Option::is_none"
    )]
    pub content: Option<Value>,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    Developer,
    User,
    Assistant,
    Tool,
}

impl Default for Input {
    fn default() -> Self {
        Input::Items(vec![])
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn keep_null<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

impl TryFrom<Value> for PromptRequest {
    type Error = serde_json::Error;

    fn try_from(body: Value) -> Result<Self, Self::Error> {
        let fields = TypedFields::deserialize(&body)?;

        let Value::Object(body) = body else {
            return Err(de::Error::custom("request body must be a JSON object"));
        };

        Ok(Self {
            model: fields.model,
            input: fields.input,
            stream: fields.stream,
            body,
        })
    }
}

impl InputItem {
    pub fn is_message(&self) -> bool {
        self.item_type.as_deref() == Some("message")
    }
}

impl PromptRequest {
    /// The request body as the caller sent it.
    pub fn body(&self) -> &Map<String, Value> {
        &self.body
    }

    pub fn into_body(self) -> Map<String, Value> {
        self.body
    }

    /// `tools` exactly as sent, `null` included.
    pub fn tools(&self) -> Option<&Value> {
        self.body.get("tools")
    }

    /// The schema to enforce when the caller asked for `json_schema` structured output.
    pub fn json_schema(&self) -> Option<&Value> {
        let format = self.body.get("text")?.get("format")?;
        if format.get("type").and_then(Value::as_str) != Some("json_schema") {
            return None;
        }
        format.get("schema")
    }
}
