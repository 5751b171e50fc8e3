use std::net::SocketAddr;
use std::time::Instant;

use axum::{
    extract::{ConnectInfo, Request},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

/// One `info!` line per request: method, path, status, client and latency.
pub async fn log_requests(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let client = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.to_string())
        .unwrap_or_else(|| "-".to_string());
    let request_id = Uuid::new_v4();
    let started = Instant::now();

    let response = next.run(request).await;

    tracing::info!(
        %request_id,
        %method,
        path = %path,
        status = response.status().as_u16(),
        client = %client,
        latency_ms = started.elapsed().as_millis() as u64,
        "request completed"
    );

    response
}
