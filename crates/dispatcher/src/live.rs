//! Live mode: request construction and response normalization

use contracts::{
    ApiDefinition, AuthScheme, DispatcherSettings, Params, ResponseEnvelope, ResponseSource,
};
use serde_json::{Map, Value};
use transport::{TransportError, TransportRequest, TransportResponse};

/// Error text for a non-ok response whose body carries no usable `message`
pub const API_ERROR: &str = "API Error";

/// Error text for a transport failure with an empty description
pub const NETWORK_ERROR: &str = "Network Error (CORS or Offline)";

/// Build the single outbound request for `api`
///
/// Parameter values travel as JSON strings exactly as submitted; declared
/// kinds are not coerced.
pub fn build_request(
    settings: &DispatcherSettings,
    api: &ApiDefinition,
    params: &Params,
    credential: Option<&str>,
) -> Result<TransportRequest, TransportError> {
    let mut request = TransportRequest::new(api.method, settings.url_for(&api.endpoint))
        .header("Content-Type", "application/json");

    if let AuthScheme::Bearer = settings.auth_scheme {
        request = request.header(
            "Authorization",
            format!("Bearer {}", credential.unwrap_or_default()),
        );
    }

    let body: Map<String, Value> = params
        .iter()
        .map(|(name, value)| (name.clone(), Value::String(value.clone())))
        .collect();

    request.json_body(&Value::Object(body))
}

/// Fold a transport outcome into an envelope
pub fn normalize(
    outcome: Result<TransportResponse, TransportError>,
    latency: u64,
) -> ResponseEnvelope {
    let parsed = outcome.and_then(|response| {
        let body = response.parse_json()?;
        Ok((response.is_success(), body))
    });

    match parsed {
        Ok((true, body)) => ResponseEnvelope::success(ResponseSource::Live, body, latency),
        Ok((false, body)) => {
            let error = error_message(&body);
            ResponseEnvelope::failure(ResponseSource::Live, error, Some(body), latency)
        }
        Err(e) => ResponseEnvelope::failure(ResponseSource::Live, failure_text(&e), None, latency),
    }
}

/// `message` field of an error body, if it is truthy
fn error_message(body: &Value) -> String {
    match body.get("message") {
        Some(Value::String(s)) if !s.is_empty() => s.clone(),
        Some(Value::Bool(true)) => "true".to_string(),
        Some(Value::Number(n)) if n.as_f64() != Some(0.0) => n.to_string(),
        Some(other @ (Value::Array(_) | Value::Object(_))) => other.to_string(),
        _ => API_ERROR.to_string(),
    }
}

fn failure_text(error: &TransportError) -> String {
    let text = error.to_string();
    if text.trim().is_empty() {
        NETWORK_ERROR.to_string()
    } else {
        text
    }
}
