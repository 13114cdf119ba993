//! HTTP compilation service strategy.
//!
//! The service accepts
//! `{"compiler": …, "resources": [{"main": true, "file": …, "content": …}]}`
//! and answers with a JSON body carrying the base64 output in `result`
//! (or `pdf`/`output`) plus a `logs` list of `{level, message}` entries.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use chrono::Utc;
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};

use super::options::RemoteOptions;
use super::CompilationStrategy;
use crate::artifact::Artifact;
use crate::error::{Error, RemoteError, Result};

#[derive(Debug, Serialize)]
struct CompileRequest<'a> {
    compiler: &'a str,
    resources: [Resource<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Resource<'a> {
    main: bool,
    file: &'a str,
    content: &'a str,
}

#[derive(Debug, Default, Deserialize)]
struct CompileResponse {
    #[serde(default, alias = "pdf", alias = "output")]
    result: Option<String>,

    #[serde(default, alias = "log")]
    logs: Vec<LogEntry>,
}

#[derive(Debug, Deserialize)]
struct LogEntry {
    #[serde(default)]
    level: String,

    #[serde(default)]
    message: String,
}

impl CompileResponse {
    /// Error-level log messages, newline-joined.
    fn error_messages(&self) -> String {
        self.logs
            .iter()
            .filter(|entry| entry.level.eq_ignore_ascii_case("error"))
            .map(|entry| entry.message.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Strategy posting the source to a remote compile endpoint.
#[derive(Debug, Clone)]
pub struct RemoteCompiler {
    name: String,
    url: Url,
    client: Client,
    options: RemoteOptions,
}

impl RemoteCompiler {
    /// Create a strategy for the configured endpoint.
    pub fn new(options: RemoteOptions) -> Result<Self> {
        let url = Url::parse(&options.endpoint)?;
        let mut builder = Client::builder().user_agent(Self::user_agent());
        if let Some(timeout) = options.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| Error::Other(format!("failed to build HTTP client: {}", e)))?;

        let name = match url.host_str() {
            Some(host) => format!("remote:{}", host),
            None => "remote".to_string(),
        };

        Ok(Self {
            name,
            url,
            client,
            options,
        })
    }

    /// User agent sent with every request.
    pub fn user_agent() -> &'static str {
        concat!("texpage/", env!("CARGO_PKG_VERSION"))
    }

    /// Endpoint this strategy posts to.
    pub fn url(&self) -> &Url {
        &self.url
    }

    fn request<'a>(&'a self, source: &'a str) -> CompileRequest<'a> {
        CompileRequest {
            compiler: &self.options.compiler,
            resources: [Resource {
                main: true,
                file: &self.options.main_file,
                content: source,
            }],
        }
    }
}

#[async_trait]
impl CompilationStrategy for RemoteCompiler {
    fn name(&self) -> &str {
        &self.name
    }

    async fn compile(&self, source: &str) -> std::result::Result<Artifact, RemoteError> {
        let response = self
            .client
            .post(self.url.clone())
            .json(&self.request(source))
            .send()
            .await
            .map_err(|e| RemoteError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| RemoteError::Transport(e.to_string()))?;

        if !status.is_success() {
            let parsed: CompileResponse = serde_json::from_slice(&body).unwrap_or_default();
            let mut message = parsed.error_messages();
            if message.is_empty() {
                message = String::from_utf8_lossy(&body).trim().to_string();
            }
            return Err(RemoteError::NonSuccessStatus {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: CompileResponse = serde_json::from_slice(&body)
            .map_err(|e| RemoteError::MalformedPayload(format!("invalid JSON: {}", e)))?;

        let encoded = match parsed.result.as_deref() {
            Some(encoded) if !encoded.trim().is_empty() => encoded.trim(),
            _ => {
                let errors = parsed.error_messages();
                return Err(RemoteError::MalformedPayload(if errors.is_empty() {
                    "response has no output".to_string()
                } else {
                    errors
                }));
            }
        };

        let bytes = STANDARD
            .decode(encoded)
            .map_err(|e| RemoteError::MalformedPayload(format!("invalid base64: {}", e)))?;
        if bytes.is_empty() {
            return Err(RemoteError::MalformedPayload("empty output".to_string()));
        }

        let mime_type = sniff_mime_type(&bytes);
        Ok(Artifact::new(bytes, mime_type, self.name.clone(), Utc::now()))
    }
}

fn sniff_mime_type(bytes: &[u8]) -> &'static str {
    if bytes.starts_with(b"%PDF") {
        "application/pdf"
    } else if bytes.starts_with(b"\x89PNG") {
        "image/png"
    } else {
        "application/octet-stream"
    }
}
