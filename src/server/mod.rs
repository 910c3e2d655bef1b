//! HTTP service exposing the calculators.
//!
//! Built directly on hyper: one tokio task per connection, HTTP/1 only.
//! Requests are fully buffered (up to the configured body limit) into an
//! [`ApiRequest`] and dispatched by [`route`], which is synchronous and has
//! no I/O, so it is tested without opening sockets.
//!
//! Routes:
//! - `/api/subnet-calc` - [`handlers::handle_subnet_calc`]
//! - `/api/port-lookup` - [`handlers::handle_port_lookup`]
//! - `/api/hello` - [`handlers::handle_hello`]

mod cors;
pub mod handlers;

pub use cors::{CorsConfig, ALLOW_HEADERS, ALLOW_METHODS};

use crate::config::ServerConfig;
use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::body::{Bytes, Incoming};
use hyper::header::{self, HeaderValue};
use hyper::service::service_fn;
use hyper::{Method, Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use serde::Serialize;
use std::convert::Infallible;
use std::error::Error;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tokio::net::TcpListener;

pub type ApiResponse = Response<Full<Bytes>>;

/// A fully buffered request, detached from the connection.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    /// Raw query string without the leading `?`.
    pub query: Option<String>,
    pub origin: Option<String>,
    pub content_type: Option<String>,
    pub body: Bytes,
}

fn raw_response(status: StatusCode, content_type: &'static str, body: Bytes) -> ApiResponse {
    let mut response = Response::new(Full::new(body));
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
    response
        .headers_mut()
        .insert(header::CACHE_CONTROL, HeaderValue::from_static("no-cache"));
    response
}

/// Serialize `body` as a JSON response.
pub fn json_response<T: Serialize>(
    status: StatusCode,
    body: &T,
) -> Result<ApiResponse, serde_json::Error> {
    let bytes = serde_json::to_vec(body)?;
    Ok(raw_response(status, "application/json", Bytes::from(bytes)))
}

/// `{"error": message}` with the given status.
pub fn error_response(status: StatusCode, message: &str) -> ApiResponse {
    json_response(status, &serde_json::json!({ "error": message })).unwrap_or_else(|_| {
        raw_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            "application/json",
            Bytes::from_static(br#"{"error":"Server error."}"#),
        )
    })
}

fn empty_response(status: StatusCode) -> ApiResponse {
    let mut response = Response::new(Full::new(Bytes::new()));
    *response.status_mut() = status;
    response
}

fn apply_cors(response: &mut ApiResponse, cors: &CorsConfig, origin: Option<&str>) {
    let allowed = cors.allow_origin(origin);
    let allowed = HeaderValue::from_str(allowed)
        .or_else(|_| HeaderValue::from_str(&cors.allowed_origins[0]));
    let headers = response.headers_mut();
    if let Ok(allowed) = allowed {
        headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, allowed);
    }
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(ALLOW_METHODS),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(ALLOW_HEADERS),
    );
    headers.insert(header::VARY, HeaderValue::from_static("Origin"));
}

type Handler = fn(&ApiRequest) -> Result<ApiResponse, Box<dyn Error>>;

/// Dispatch a buffered request and attach CORS headers.
///
/// Never fails: handler errors become `500 {"error": "Server error."}`.
pub fn route(config: &ServerConfig, request: &ApiRequest) -> ApiResponse {
    // (handler, accepts POST); every route accepts GET
    let handler: Option<(Handler, bool)> = match request.path.as_str() {
        "/api/subnet-calc" => Some((handlers::handle_subnet_calc as Handler, true)),
        "/api/port-lookup" => Some((handlers::handle_port_lookup as Handler, true)),
        "/api/hello" => Some((handlers::handle_hello as Handler, false)),
        _ => None,
    };
    let method_allowed = |accepts_post: bool| {
        request.method == Method::GET || (accepts_post && request.method == Method::POST)
    };

    let mut response = match handler {
        _ if request.method == Method::OPTIONS => empty_response(StatusCode::NO_CONTENT),
        None => {
            log::warn!("Unknown endpoint: {} {}", request.method, request.path);
            error_response(StatusCode::NOT_FOUND, "Not found.")
        }
        Some((_, accepts_post)) if !method_allowed(accepts_post) => {
            error_response(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed.")
        }
        Some((handle, _)) => handle(request).unwrap_or_else(|e| {
            log::error!("{} error: {}", request.path, e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Server error.")
        }),
    };

    apply_cors(&mut response, &config.cors, request.origin.as_deref());
    response
}

fn header_string(request: &Request<Incoming>, name: header::HeaderName) -> Option<String> {
    request
        .headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(String::from)
}

fn log_completion(method: &Method, path: &str, status: StatusCode, started: Instant) {
    let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
    if status.as_u16() >= 400 {
        log::warn!(
            "Request completed: {} {} - {} ({:.2}ms)",
            method,
            path,
            status.as_u16(),
            elapsed_ms
        );
    } else {
        log::info!(
            "Request completed: {} {} - {} ({:.2}ms)",
            method,
            path,
            status.as_u16(),
            elapsed_ms
        );
    }
}

/// The HTTP server: configuration plus the accept loop.
#[derive(Debug)]
pub struct NetcalcServer {
    config: ServerConfig,
}

impl NetcalcServer {
    pub fn new(config: ServerConfig) -> Result<Self, Box<dyn Error>> {
        config.validate()?;
        Ok(NetcalcServer { config })
    }

    /// Bind to the configured address and serve until the process stops or accept fails.
    pub async fn start(self) -> Result<(), Box<dyn Error>> {
        let bind_addr = self.config.bind_addr;
        let listener = TcpListener::bind(bind_addr)
            .await
            .map_err(|e| format!("Failed to bind to address {bind_addr}: {e}"))?;
        self.serve(listener).await
    }

    /// Serve connections from an already bound listener.
    pub async fn serve(self, listener: TcpListener) -> Result<(), Box<dyn Error>> {
        let local_addr = listener
            .local_addr()
            .map_err(|e| format!("Failed to read listener address: {e}"))?;
        log::info!("Server listening on {}", local_addr);

        let server = Arc::new(self);
        loop {
            let (stream, remote_addr) = listener
                .accept()
                .await
                .map_err(|e| format!("Failed to accept connection: {e}"))?;
            let server = Arc::clone(&server);

            tokio::task::spawn(async move {
                let service = service_fn(move |req| {
                    let server = Arc::clone(&server);
                    async move { server.handle_request(req, remote_addr).await }
                });
                if let Err(e) = hyper::server::conn::http1::Builder::new()
                    .serve_connection(TokioIo::new(stream), service)
                    .await
                {
                    log::error!("Connection error from {}: {}", remote_addr, e);
                }
            });
        }
    }

    async fn handle_request(
        &self,
        request: Request<Incoming>,
        remote_addr: SocketAddr,
    ) -> Result<ApiResponse, Infallible> {
        let started = Instant::now();
        let origin = header_string(&request, header::ORIGIN);
        let content_type = header_string(&request, header::CONTENT_TYPE);
        let method = request.method().clone();
        let path = request.uri().path().to_string();
        let query = request.uri().query().map(String::from);

        let body = match Limited::new(request.into_body(), self.config.max_body_bytes)
            .collect()
            .await
        {
            Ok(collected) => collected.to_bytes(),
            Err(e) => {
                let (status, message) = if e.is::<LengthLimitError>() {
                    log::warn!("Payload too large from {}", remote_addr);
                    (StatusCode::PAYLOAD_TOO_LARGE, "Payload too large.")
                } else {
                    log::warn!("Failed to read request body from {}: {}", remote_addr, e);
                    (StatusCode::BAD_REQUEST, "Could not read request body.")
                };
                let mut response = error_response(status, message);
                apply_cors(&mut response, &self.config.cors, origin.as_deref());
                log_completion(&method, &path, response.status(), started);
                return Ok(response);
            }
        };

        let api_request = ApiRequest {
            method,
            path,
            query,
            origin,
            content_type,
            body,
        };
        log::debug!(
            "{} {} from {}",
            api_request.method,
            api_request.path,
            remote_addr
        );

        let response = route(&self.config, &api_request);
        log_completion(&api_request.method, &api_request.path, response.status(), started);
        Ok(response)
    }
}

/// Build a [`NetcalcServer`] and run it.
pub async fn start_server(config: ServerConfig) -> Result<(), Box<dyn Error>> {
    NetcalcServer::new(config)?.start().await
}
