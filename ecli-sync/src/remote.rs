//! Remote component service.
//!
//! The service answers every call with a `{ data, error }` envelope; both
//! are converted into `Result<_, RemoteError>` here and nowhere else.
//!
//! | call | request |
//! |---|---|
//! | lookup | `GET  {api_url}/workflows/name/{name}` |
//! | update | `PUT  {api_url}/workflows/{id}` with `{ "data": UpdatePayload }` |

use std::time::Duration;

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use ecli_core::{ArtifactKind, ComponentName, ComponentType};
use ecli_schema::ValidatedComponent;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RemoteError {
    #[error("component '{name}' not found on the remote service")]
    NotFound { name: String },

    #[error("remote service returned HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("remote service error: {0}")]
    Api(String),

    #[error("request failed: {0}")]
    Transport(String),

    #[error("unexpected response: {0}")]
    Decode(String),

    #[error("'{name}' is not a valid component name; refusing to query the remote service")]
    InvalidName { name: String },
}

/// Server-side identity of a component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteComponent {
    pub id: String,
    pub component_type: ComponentType,
}

/// Body of an update call. Absent artifacts are sent as `null`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UpdatePayload {
    pub form: Option<Value>,
    pub inputs: Option<Value>,
    pub workflow: Option<Value>,
    pub test: Option<Value>,
    pub api: Option<Value>,
    pub body: Option<Value>,
    pub credits_script: Option<String>,
    pub output_node_id: Option<String>,
}

impl UpdatePayload {
    pub fn from_component(component: &ValidatedComponent) -> Self {
        let json = |kind| component.json(kind).cloned();
        Self {
            form: json(ArtifactKind::Form),
            inputs: json(ArtifactKind::Inputs),
            workflow: json(ArtifactKind::Workflow),
            test: json(ArtifactKind::Test),
            api: json(ArtifactKind::Api),
            body: json(ArtifactKind::Body),
            credits_script: component.credits_script().map(str::to_owned),
            output_node_id: component.output_node_id().map(str::to_owned),
        }
    }
}

/// The two calls the sync engine needs from the remote service.
pub trait Remote {
    fn lookup(&self, name: &ComponentName) -> Result<RemoteComponent, RemoteError>;

    fn update(&self, id: &str, payload: &UpdatePayload) -> Result<(), RemoteError>;
}

// ---------------------------------------------------------------------------
// HTTP implementation
// ---------------------------------------------------------------------------

/// [`Remote`] over blocking HTTP.
pub struct HttpRemote {
    api_url: String,
    agent: ureq::Agent,
}

impl HttpRemote {
    pub fn new(api_url: impl Into<String>) -> Self {
        let api_url: String = api_url.into();
        Self {
            api_url: api_url.trim_end_matches('/').to_string(),
            agent: ureq::AgentBuilder::new().timeout(REQUEST_TIMEOUT).build(),
        }
    }

    fn lookup_url(&self, name: &ComponentName) -> String {
        format!("{}/workflows/name/{}", self.api_url, name)
    }

    fn update_url(&self, id: &str) -> String {
        format!("{}/workflows/{}", self.api_url, id)
    }
}

impl Remote for HttpRemote {
    fn lookup(&self, name: &ComponentName) -> Result<RemoteComponent, RemoteError> {
        // Valid names are URL path safe; anything else could escape the path.
        if !name.is_valid() {
            return Err(RemoteError::InvalidName {
                name: name.to_string(),
            });
        }
        let url = self.lookup_url(name);
        tracing::debug!(%url, "looking up component");
        let envelope: Envelope<WireComponent> = read_envelope(self.agent.get(&url).call())?;
        match open_envelope(envelope)? {
            Some(wire) => wire.into_remote(),
            None => Err(RemoteError::NotFound {
                name: name.to_string(),
            }),
        }
    }

    fn update(&self, id: &str, payload: &UpdatePayload) -> Result<(), RemoteError> {
        let url = self.update_url(id);
        tracing::debug!(%url, "updating component");
        let envelope: Envelope<Value> =
            read_envelope(self.agent.put(&url).send_json(UpdateRequest { data: payload }))?;
        open_envelope(envelope).map(|_| ())
    }
}

#[derive(Serialize)]
struct UpdateRequest<'a> {
    data: &'a UpdatePayload,
}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: Option<T>,
    #[serde(default)]
    error: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct WireComponent {
    id: Value,
    #[serde(rename = "type")]
    component_type: ComponentType,
}

impl WireComponent {
    fn into_remote(self) -> Result<RemoteComponent, RemoteError> {
        let id = match self.id {
            Value::String(s) => s,
            Value::Number(n) => n.to_string(),
            other => {
                return Err(RemoteError::Decode(format!(
                    "component id {other} is not a string or number"
                )))
            }
        };
        Ok(RemoteComponent {
            id,
            component_type: self.component_type,
        })
    }
}

fn read_envelope<T: DeserializeOwned>(
    result: Result<ureq::Response, ureq::Error>,
) -> Result<Envelope<T>, RemoteError> {
    match result {
        Ok(response) => response
            .into_json::<Envelope<T>>()
            .map_err(|e| RemoteError::Decode(e.to_string())),
        Err(ureq::Error::Status(status, response)) => {
            let body = response.into_string().unwrap_or_default();
            Err(RemoteError::Status {
                status,
                message: status_message(&body),
            })
        }
        Err(ureq::Error::Transport(transport)) => {
            Err(RemoteError::Transport(transport.to_string()))
        }
    }
}

fn open_envelope<T>(envelope: Envelope<T>) -> Result<Option<T>, RemoteError> {
    match envelope.error {
        None | Some(Value::Null) => Ok(envelope.data),
        Some(Value::String(message)) => Err(RemoteError::Api(message)),
        Some(other) => Err(RemoteError::Api(other.to_string())),
    }
}

/// Prefer the envelope's `error` over the raw body in HTTP error messages.
fn status_message(body: &str) -> String {
    match serde_json::from_str::<Envelope<Value>>(body) {
        Ok(Envelope {
            error: Some(Value::String(message)),
            ..
        }) => message,
        _ if body.trim().is_empty() => "empty response body".to_string(),
        _ => body.trim().to_string(),
    }
}
