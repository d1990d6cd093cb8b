//! Jolokia adapter: JMX over the Jolokia HTTP/JSON agent.
//!
//! The agent is usually reachable at `http://<host>:8778/jolokia`.
//!
//! ## Requests
//!
//! - **connect**: `GET {agent}/version` proves the agent answers and accepts
//!   the credentials
//! - **instance lookup**: a `search` request for the object name
//! - **attribute read**: a `read` request for one attribute
//!
//! Remote JMX exceptions come back as `error_type` in the response body and
//! are mapped onto [`ReadError`] / [`LookupError`] variants. Transport
//! failures are I/O errors and make the collector reconnect.
//!
//! ## Example
//!
//! ```rust,no_run
//! use beanwatch_collector::jolokia::JolokiaClient;
//! use std::time::Duration;
//!
//! let client = JolokiaClient::builder()
//!     .base_path("/jolokia")
//!     .timeout(Duration::from_secs(5))
//!     .build()
//!     .expect("HTTP client");
//! ```

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::{
    ConnectError, Credentials, Endpoint, LookupError, ManagementClient, ManagementSession,
    ObjectInstance, ReadError, SessionHandle,
};

/// Management client talking to a Jolokia agent.
#[derive(Debug)]
pub struct JolokiaClient {
    http: Client,
    scheme: &'static str,
    base_path: String,
    session: Option<Arc<JolokiaSession>>,
}

impl JolokiaClient {
    /// Create a new builder for configuring the client.
    pub fn builder() -> JolokiaClientBuilder {
        JolokiaClientBuilder::default()
    }

    fn agent_url(&self, endpoint: &Endpoint) -> String {
        format!(
            "{}://{}:{}{}",
            self.scheme, endpoint.host, endpoint.port, self.base_path
        )
    }
}

#[async_trait]
impl ManagementClient for JolokiaClient {
    async fn connect(&mut self, endpoint: &Endpoint) -> Result<(), ConnectError> {
        self.session = None;

        let mut addrs = tokio::net::lookup_host((endpoint.host.as_str(), endpoint.port))
            .await
            .map_err(|e| ConnectError::UnknownHost(format!("{}: {}", endpoint.host, e)))?;
        if addrs.next().is_none() {
            return Err(ConnectError::UnknownHost(endpoint.host.clone()));
        }

        let url = self.agent_url(endpoint);
        let request = authenticate(
            self.http.get(format!("{}/version", url)),
            endpoint.credentials.as_ref(),
        );
        let response = request.send().await?;

        if response.status() == reqwest::StatusCode::UNAUTHORIZED {
            return Err(ConnectError::Io("Agent rejected the credentials".to_string()));
        }
        if !response.status().is_success() {
            return Err(ConnectError::Io(format!(
                "Agent returned status {}",
                response.status()
            )));
        }

        let body: JolokiaResponse = response.json().await?;
        match body.value.get("agent").and_then(Value::as_str) {
            Some(version) if body.status == 200 => {
                debug!("Connected to Jolokia agent {} at {}", version, url);
                self.session = Some(Arc::new(JolokiaSession {
                    http: self.http.clone(),
                    url,
                    credentials: endpoint.credentials.clone(),
                }));
            }
            // Answered, but not like a Jolokia agent: leave the session unset
            _ => debug!("No Jolokia agent version in response from {}", url),
        }
        Ok(())
    }

    fn session(&self) -> Option<SessionHandle> {
        self.session.clone().map(|s| s as SessionHandle)
    }

    async fn disconnect(&mut self) {
        self.session = None;
    }
}

/// Builder for JolokiaClient.
#[derive(Debug, Default)]
pub struct JolokiaClientBuilder {
    base_path: Option<String>,
    timeout: Option<Duration>,
    https: bool,
}

impl JolokiaClientBuilder {
    /// Set the agent path (default: "/jolokia").
    pub fn base_path(mut self, base_path: impl Into<String>) -> Self {
        self.base_path = Some(base_path.into());
        self
    }

    /// Set the request timeout (default: 10 seconds).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Talk to the agent over HTTPS.
    pub fn https(mut self, https: bool) -> Self {
        self.https = https;
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<JolokiaClient, reqwest::Error> {
        let timeout = self.timeout.unwrap_or(Duration::from_secs(10));
        let http = Client::builder().timeout(timeout).build()?;

        Ok(JolokiaClient {
            http,
            scheme: if self.https { "https" } else { "http" },
            base_path: normalize_path(self.base_path.as_deref().unwrap_or("/jolokia")),
            session: None,
        })
    }
}

/// An authenticated view of one agent.
#[derive(Debug)]
struct JolokiaSession {
    http: Client,
    url: String,
    credentials: Option<Credentials>,
}

impl JolokiaSession {
    async fn post(&self, request: &Request<'_>) -> Result<JolokiaResponse, reqwest::Error> {
        authenticate(self.http.post(&self.url), self.credentials.as_ref())
            .json(request)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
    }
}

#[async_trait]
impl ManagementSession for JolokiaSession {
    async fn object_instance(&self, object_name: &str) -> Result<ObjectInstance, LookupError> {
        validate_object_name(object_name)?;

        let response = self
            .post(&Request {
                kind: "search",
                mbean: object_name,
                attribute: None,
            })
            .await?;

        if let Some(error_type) = &response.error_type {
            return Err(lookup_error(error_type, response.error_message()));
        }

        response
            .value
            .as_array()
            .and_then(|names| names.iter().find_map(Value::as_str))
            .map(ObjectInstance::new)
            .ok_or_else(|| LookupError::InstanceNotFound(object_name.to_string()))
    }

    async fn read_attribute(
        &self,
        instance: &ObjectInstance,
        attribute: &str,
    ) -> Result<Value, ReadError> {
        let response = self
            .post(&Request {
                kind: "read",
                mbean: &instance.name,
                attribute: Some(attribute),
            })
            .await?;

        match &response.error_type {
            Some(error_type) => Err(read_error(error_type, response.error_message())),
            None => Ok(response.value),
        }
    }
}

fn authenticate(
    request: reqwest::RequestBuilder,
    credentials: Option<&Credentials>,
) -> reqwest::RequestBuilder {
    match credentials {
        Some(c) => request.basic_auth(&c.user, Some(&c.password)),
        None => request,
    }
}

fn normalize_path(path: &str) -> String {
    let trimmed = path.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{}", trimmed)
    }
}

/// Check `domain:key=value[,key=value...]` shape before asking the agent.
fn validate_object_name(name: &str) -> Result<(), LookupError> {
    let malformed = || LookupError::MalformedName(name.to_string());

    let (_domain, properties) = name.split_once(':').ok_or_else(malformed)?;
    if properties.is_empty() {
        return Err(malformed());
    }
    for property in properties.split(',') {
        if property == "*" {
            continue;
        }
        match property.split_once('=') {
            Some((key, _)) if !key.is_empty() => {}
            _ => return Err(malformed()),
        }
    }
    Ok(())
}

fn exception_name(error_type: &str) -> &str {
    error_type.rsplit('.').next().unwrap_or(error_type)
}

fn lookup_error(error_type: &str, message: String) -> LookupError {
    match exception_name(error_type) {
        "MalformedObjectNameException" => LookupError::MalformedName(message),
        "IOException" | "ConnectException" => LookupError::Io(message),
        _ => LookupError::InstanceNotFound(message),
    }
}

fn read_error(error_type: &str, message: String) -> ReadError {
    match exception_name(error_type) {
        "AttributeNotFoundException" => ReadError::AttributeNotFound(message),
        "InstanceNotFoundException" => ReadError::InstanceNotFound(message),
        "ReflectionException" => ReadError::Reflection(message),
        "MBeanException" => ReadError::Bean(message),
        "RuntimeMBeanException" | "RuntimeOperationsException" | "RuntimeErrorException" => {
            ReadError::RuntimeBean(message)
        }
        "IOException" | "ConnectException" => ReadError::Io(message),
        _ => ReadError::MalformedRemote(format!("{}: {}", error_type, message)),
    }
}

#[derive(Debug, Serialize)]
struct Request<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    mbean: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    attribute: Option<&'a str>,
}

/// Response envelope of the Jolokia protocol.
#[derive(Debug, Deserialize)]
struct JolokiaResponse {
    #[serde(default)]
    status: u16,
    #[serde(default)]
    value: Value,
    #[serde(default)]
    error_type: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

impl JolokiaResponse {
    fn error_message(&self) -> String {
        self.error
            .clone()
            .unwrap_or_else(|| format!("status {}", self.status))
    }
}
