//! Structural schemas for component artifacts.
//!
//! Each `check_*` function takes an already-parsed JSON document and returns
//! every rule violation it finds, prefixed with a location inside the
//! document. An empty vector means the document conforms.

use std::collections::BTreeMap;

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{Map, Value};
use url::Url;

// ---------------------------------------------------------------------------
// form.json
// ---------------------------------------------------------------------------

/// Fields shared by every form field variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldBase {
    pub id: String,
    pub name: String,
    pub display: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SliderConstraints {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectField {
    #[serde(flatten)]
    pub base: FieldBase,
    /// Configuration file naming the selectable options.
    pub conf_file: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptEditorField {
    #[serde(flatten)]
    pub base: FieldBase,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SliderField {
    #[serde(flatten)]
    pub base: FieldBase,
    pub constraints: SliderConstraints,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageLoaderField {
    #[serde(flatten)]
    pub base: FieldBase,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AspectRatioField {
    #[serde(flatten)]
    pub base: FieldBase,
    pub conf_file: String,
}

/// A form field descriptor, discriminated by its `type` key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FormField {
    Select(SelectField),
    PromptEditor(PromptEditorField),
    Slider(SliderField),
    ImageLoader(ImageLoaderField),
    AspectRatio(AspectRatioField),
}

impl FormField {
    pub fn base(&self) -> &FieldBase {
        match self {
            FormField::Select(f) => &f.base,
            FormField::PromptEditor(f) => &f.base,
            FormField::Slider(f) => &f.base,
            FormField::ImageLoader(f) => &f.base,
            FormField::AspectRatio(f) => &f.base,
        }
    }
}

/// Check a `form.json` document.
pub fn check_form(value: &Value) -> Vec<String> {
    let Some(object) = value.as_object() else {
        return vec![format!(
            "expected an object with `main` and `advanced`, found {}",
            kind_of(value)
        )];
    };

    let mut errors = Vec::new();
    for section in ["main", "advanced"] {
        match object.get(section) {
            None => errors.push(format!("missing field `{section}`")),
            Some(Value::Array(fields)) => {
                errors.extend(check_each::<FormField>(section, fields));
            }
            Some(other) => errors.push(format!(
                "{section}: expected an array of fields, found {}",
                kind_of(other)
            )),
        }
    }
    errors
}

// ---------------------------------------------------------------------------
// inputs.json
// ---------------------------------------------------------------------------

/// Maps a form field to a jq expression locating it in the request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputMapping {
    pub id: String,
    #[serde(rename = "pathJq")]
    pub path_jq: String,
}

/// Check an `inputs.json` document.
pub fn check_inputs(value: &Value) -> Vec<String> {
    match value {
        Value::Array(entries) => check_each::<InputMapping>("", entries),
        other => vec![format!(
            "expected an array of {{id, pathJq}} entries, found {}",
            kind_of(other)
        )],
    }
}

// ---------------------------------------------------------------------------
// api.json
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FetchType {
    Wait,
    Poll,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WaitMode {
    pub output_expr_jq: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PollMode {
    pub interval: f64,
    pub timeout: f64,
    pub status_expr_jq: String,
    pub output_expr_jq: String,
}

/// `api.json` exactly as written on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiConfig {
    pub url: String,
    pub method: HttpMethod,
    pub headers: BTreeMap<String, String>,
    pub success_response_code: Vec<i64>,
    pub fetch_type: FetchType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wait: Option<WaitMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poll: Option<PollMode>,
}

/// How the result of an API call is retrieved. Exactly one applies.
#[derive(Debug, Clone, PartialEq)]
pub enum Retrieval {
    Wait(WaitMode),
    Poll(PollMode),
}

/// A checked `api.json`: the URL is parsed and the retrieval mode resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiContract {
    pub url: Url,
    pub method: HttpMethod,
    pub headers: BTreeMap<String, String>,
    pub success_response_code: Vec<i64>,
    pub retrieval: Retrieval,
}

impl ApiConfig {
    /// Resolve into an [`ApiContract`], or every rule the document breaks.
    pub fn into_contract(self) -> Result<ApiContract, Vec<String>> {
        let mut errors = Vec::new();

        let url = match Url::parse(&self.url) {
            Ok(url) => Some(url),
            Err(err) => {
                errors.push(format!("url: '{}' is not a valid URL ({err})", self.url));
                None
            }
        };

        let retrieval = match (self.fetch_type, self.wait, self.poll) {
            (FetchType::Wait, Some(wait), None) => Some(Retrieval::Wait(wait)),
            (FetchType::Poll, None, Some(poll)) => Some(Retrieval::Poll(poll)),
            (_, Some(_), Some(_)) => {
                errors.push("`wait` and `poll` are mutually exclusive; set only one".to_string());
                None
            }
            (FetchType::Wait, None, _) => {
                errors.push("fetchType is `wait` but the `wait` block is missing".to_string());
                None
            }
            (FetchType::Poll, _, None) => {
                errors.push("fetchType is `poll` but the `poll` block is missing".to_string());
                None
            }
        };

        match (url, retrieval) {
            (Some(url), Some(retrieval)) if errors.is_empty() => Ok(ApiContract {
                url,
                method: self.method,
                headers: self.headers,
                success_response_code: self.success_response_code,
                retrieval,
            }),
            _ => Err(errors),
        }
    }
}

/// Check an `api.json` document.
pub fn check_api(value: &Value) -> Vec<String> {
    match serde_json::from_value::<ApiConfig>(value.clone()) {
        Ok(config) => config.into_contract().err().unwrap_or_default(),
        Err(err) => vec![err.to_string()],
    }
}

// ---------------------------------------------------------------------------
// workflow.json
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowConfig {
    /// Opaque node graph, keyed by node id.
    pub nodes: Map<String, Value>,
    pub output_node_id: String,
}

/// Check a `workflow.json` document.
pub fn check_workflow(value: &Value) -> Vec<String> {
    match serde_json::from_value::<WorkflowConfig>(value.clone()) {
        Ok(_) => vec![],
        Err(err) => vec![err.to_string()],
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn check_each<T: DeserializeOwned>(section: &str, items: &[Value]) -> Vec<String> {
    items
        .iter()
        .enumerate()
        .filter_map(|(i, item)| {
            serde_json::from_value::<T>(item.clone())
                .err()
                .map(|err| format!("{section}[{i}]: {err}"))
        })
        .collect()
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn slider(id: &str) -> Value {
        json!({
            "id": id, "name": "Steps", "type": "slider", "display": true,
            "default": 20, "constraints": { "min": 1, "max": 50, "step": 1 }
        })
    }

    #[test]
    fn form_field_resolves_variant_by_tag() {
        let field: FormField = serde_json::from_value(slider("steps")).unwrap();
        let FormField::Slider(slider) = &field else {
            panic!("expected slider, got {field:?}");
        };
        assert_eq!(slider.constraints.max, 50.0);
        assert_eq!(field.base().id, "steps");
        assert_eq!(field.base().default, Some(json!(20)));
    }

    #[test]
    fn form_reports_every_bad_field_with_its_position() {
        let form = json!({
            "main": [slider("ok"), { "id": "x", "name": "X", "type": "select", "display": true }],
            "advanced": [{ "id": "y", "name": "Y", "type": "color_picker", "display": false }]
        });
        let errors = check_form(&form);
        assert_eq!(errors.len(), 2, "{errors:?}");
        assert!(errors[0].starts_with("main[1]:") && errors[0].contains("conf_file"));
        assert!(errors[1].starts_with("advanced[0]:") && errors[1].contains("color_picker"));
    }

    #[test]
    fn form_requires_both_sections() {
        let errors = check_form(&json!({ "main": [] }));
        assert_eq!(errors, vec!["missing field `advanced`".to_string()]);
        assert_eq!(check_form(&json!([])).len(), 1);
    }

    #[test]
    fn inputs_entries_need_path_jq() {
        let errors = check_inputs(&json!([
            { "id": "prompt", "pathJq": ".prompt" },
            { "id": "seed" }
        ]));
        assert_eq!(errors.len(), 1);
        assert!(errors[0].starts_with("[1]:") && errors[0].contains("pathJq"));
    }

    #[test]
    fn api_with_wait_becomes_wait_contract() {
        let api: ApiConfig = serde_json::from_value(json!({
            "url": "https://api.example.com/v1/run",
            "method": "POST",
            "headers": { "Content-Type": "application/json" },
            "successResponseCode": [200, 201],
            "fetchType": "wait",
            "wait": { "outputExprJq": ".output" }
        }))
        .unwrap();
        let contract = api.into_contract().unwrap();
        assert_eq!(contract.url.host_str(), Some("api.example.com"));
        assert!(matches!(contract.retrieval, Retrieval::Wait(_)));
    }

    #[test]
    fn api_collects_url_and_mode_errors_together() {
        let errors = check_api(&json!({
            "url": "not a url",
            "method": "GET",
            "headers": {},
            "successResponseCode": [200],
            "fetchType": "poll",
            "wait": { "outputExprJq": ".output" }
        }));
        assert_eq!(errors.len(), 2, "{errors:?}");
        assert!(errors[0].starts_with("url:"));
        assert!(errors[1].contains("`poll` block is missing"));
    }

    #[test]
    fn api_rejects_both_modes() {
        let errors = check_api(&json!({
            "url": "https://x.test",
            "method": "GET",
            "headers": {},
            "successResponseCode": [200],
            "fetchType": "wait",
            "wait": { "outputExprJq": "." },
            "poll": { "interval": 1, "timeout": 10, "statusExprJq": ".s", "outputExprJq": ".o" }
        }));
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("mutually exclusive"));
    }

    #[test]
    fn api_rejects_unknown_method() {
        let errors = check_api(&json!({
            "url": "https://x.test", "method": "PATCH", "headers": {},
            "successResponseCode": [200], "fetchType": "wait", "wait": { "outputExprJq": "." }
        }));
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("PATCH"));
    }

    #[test]
    fn workflow_requires_output_node_id() {
        assert!(check_workflow(&json!({ "nodes": {}, "output_node_id": "9" })).is_empty());
        let errors = check_workflow(&json!({ "nodes": { "1": {} } }));
        assert!(errors[0].contains("output_node_id"));
    }
}
