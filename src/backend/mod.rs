pub mod compat;
pub mod native;

use crate::config::Config;
use crate::openai::responses::models::prompt_request::PromptRequest;
use anyhow::{Context, Result};
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;

use self::compat::CompatBackend;
use self::native::NativeBackend;

/// The steps every backend dialect goes through for a single request.
pub(crate) trait Dialect {
    /// What gets sent to the backend.
    type Outbound;
    /// What the backend answered, already checked and decoded.
    type Reply;
    /// What goes back to the caller.
    type Output: Serialize;

    fn transform_request(&self, request: PromptRequest) -> Self::Outbound;

    async fn invoke(&self, client: &Client, outbound: Self::Outbound) -> Result<Self::Reply>;

    fn transform_response(&self, reply: Self::Reply) -> Self::Output;
}

/// The backend serving a request. Exactly one is active at a time.
#[derive(Debug, Clone)]
pub enum Backend {
    Native(NativeBackend),
    Compatibility(CompatBackend),
}

impl Backend {
    /// Pick the backend from configuration. A compatibility base URL wins over
    /// a native API key. Returns `None` when neither is set.
    pub fn select(config: &Config) -> Option<Self> {
        if let Some(base_url) = config.compat_base_url() {
            return Some(Backend::Compatibility(CompatBackend::new(base_url)));
        }

        config
            .native_credentials()
            .map(|native| Backend::Native(NativeBackend::new(&native.api_key, &native.base_url)))
    }

    pub fn name(&self) -> &'static str {
        match self {
            Backend::Native(_) => "native",
            Backend::Compatibility(_) => "compatibility",
        }
    }

    /// Run one request through the selected backend and return the
    /// Responses-shaped body for the caller.
    pub async fn relay(&self, client: &Client, request: PromptRequest) -> Result<Value> {
        match self {
            Backend::Native(backend) => run(backend, client, request).await,
            Backend::Compatibility(backend) => run(backend, client, request).await,
        }
    }
}

async fn run<D: Dialect>(dialect: &D, client: &Client, request: PromptRequest) -> Result<Value> {
    let outbound = dialect.transform_request(request);
    let reply = dialect.invoke(client, outbound).await?;
    let output = dialect.transform_response(reply);

    serde_json::to_value(output).context("Failed to serialize response for the caller")
}

pub(crate) fn normalize_base_url(base_url: &str) -> String {
    base_url.trim().trim_end_matches('/').to_string()
}
