//! Endpoint handlers.
//!
//! Each handler turns an already buffered [`ApiRequest`] into a response.
//! Query-string fields take precedence over JSON body fields. A body is only
//! looked at for `POST` with a JSON content type, and a body that does not
//! parse is treated as empty.

use super::{error_response, json_response, ApiRequest, ApiResponse};
use crate::processing::{calculate, port_lookup, PortLookupRequest, SubnetQuery};
use hyper::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::error::Error;

/// Decode the query string. A repeated key keeps its last value.
fn decode_query<T: DeserializeOwned + Default>(request: &ApiRequest) -> T {
    let Some(query) = request.query.as_deref() else {
        return T::default();
    };
    let pairs: Vec<(String, String)> = match serde_urlencoded::from_str(query) {
        Ok(pairs) => pairs,
        Err(e) => {
            log::warn!("Ignoring malformed query string '{query}': {e}");
            return T::default();
        }
    };
    let fields: serde_json::Map<String, Value> = pairs
        .into_iter()
        .map(|(key, value)| (key, Value::String(value)))
        .collect();
    serde_json::from_value(Value::Object(fields)).unwrap_or_else(|e| {
        log::warn!("Ignoring query string '{query}': {e}");
        T::default()
    })
}

/// Decode the JSON body of a `POST application/json` request.
fn decode_body<T: DeserializeOwned + Default>(request: &ApiRequest) -> T {
    let is_json = request
        .content_type
        .as_deref()
        .is_some_and(|ct| ct.contains("application/json"));
    if request.method != Method::POST || !is_json || request.body.is_empty() {
        return T::default();
    }
    let mut deserializer = serde_json::Deserializer::from_slice(&request.body);
    serde_path_to_error::deserialize(&mut deserializer).unwrap_or_else(|e| {
        log::warn!(
            "Ignoring unparsable JSON body for {}: path={} error={}",
            request.path,
            e.path(),
            e
        );
        T::default()
    })
}

fn string_field(value: Option<Value>) -> Option<String> {
    match value {
        Some(Value::String(s)) => Some(s),
        _ => None,
    }
}

/// JSON `cidr` must be a number; integral floats are written without a fraction.
fn number_field(value: Option<Value>) -> Option<String> {
    match value {
        Some(Value::Number(n)) => Some(match (n.as_i64(), n.as_f64()) {
            (Some(i), _) => i.to_string(),
            (None, Some(f)) if f.is_finite() && f.fract() == 0.0 => format!("{f:.0}"),
            _ => n.to_string(),
        }),
        _ => None,
    }
}

/// Loosely typed subnet body: fields of the wrong JSON type are ignored.
#[derive(Deserialize, Debug, Default)]
struct SubnetBody {
    q: Option<Value>,
    ip: Option<Value>,
    mask: Option<Value>,
    cidr: Option<Value>,
}

impl From<SubnetBody> for SubnetQuery {
    fn from(body: SubnetBody) -> Self {
        SubnetQuery {
            q: string_field(body.q),
            ip: string_field(body.ip),
            mask: string_field(body.mask),
            cidr: number_field(body.cidr),
        }
    }
}

/// `GET|POST /api/subnet-calc`
pub fn handle_subnet_calc(request: &ApiRequest) -> Result<ApiResponse, Box<dyn Error>> {
    let from_query: SubnetQuery = decode_query(request);
    let from_body: SubnetQuery = decode_body::<SubnetBody>(request).into();
    let query = from_query.or(from_body);

    match calculate(&query) {
        Ok(result) => Ok(json_response(StatusCode::OK, &result)?),
        Err(e) => {
            log::debug!("subnet-calc rejected {query:?}: {e:?}");
            Ok(error_response(e.status_code(), &e.to_string()))
        }
    }
}

#[derive(Deserialize, Debug, Default)]
struct PortParams {
    q: Option<String>,
    port: Option<String>,
    protocol: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
struct PortBody {
    q: Option<Value>,
    protocol: Option<Value>,
    ports: Option<Value>,
    services: Option<Value>,
}

fn array_field(value: Option<Value>) -> Vec<Value> {
    match value {
        Some(Value::Array(items)) => items,
        _ => Vec::new(),
    }
}

/// `GET|POST /api/port-lookup`
pub fn handle_port_lookup(request: &ApiRequest) -> Result<ApiResponse, Box<dyn Error>> {
    let params: PortParams = decode_query(request);
    let body: PortBody = decode_body(request);

    let lookup = PortLookupRequest {
        q: params
            .q
            .filter(|q| !q.is_empty())
            .or_else(|| string_field(body.q)),
        port: params.port,
        protocol: params.protocol.or_else(|| string_field(body.protocol)),
        ports: array_field(body.ports),
        services: array_field(body.services),
    };

    match port_lookup(&lookup) {
        Some(response) => Ok(json_response(StatusCode::OK, &response)?),
        None => {
            let usage = serde_json::json!({
                "error": "Provide q (e.g., \"80,443,https\") or port=NUM or POST { ports: [...], services: [...] }",
                "examples": [
                    "/api/port-lookup?q=443",
                    "/api/port-lookup?q=http,https,ssh",
                    "/api/port-lookup?port=3389&protocol=tcp"
                ],
            });
            Ok(json_response(StatusCode::BAD_REQUEST, &usage)?)
        }
    }
}

/// `GET /api/hello` liveness probe.
pub fn handle_hello(_request: &ApiRequest) -> Result<ApiResponse, Box<dyn Error>> {
    let now = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true);
    Ok(json_response(
        StatusCode::OK,
        &serde_json::json!({ "ok": true, "time": now }),
    )?)
}
