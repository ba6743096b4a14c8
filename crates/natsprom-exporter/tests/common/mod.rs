//! In-process stand-in for a NATS monitoring endpoint.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU16, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};

pub struct StubVarz {
    status: AtomicU16,
    body: Mutex<String>,
    delay_ms: AtomicU64,
    hits: AtomicUsize,
}

impl StubVarz {
    pub fn set_status(&self, code: u16) {
        self.status.store(code, Ordering::SeqCst);
    }

    pub fn set_body(&self, body: impl Into<String>) {
        *self.body.lock().unwrap() = body.into();
    }

    pub fn set_delay(&self, d: Duration) {
        self.delay_ms.store(d.as_millis() as u64, Ordering::SeqCst);
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

async fn varz(State(stub): State<Arc<StubVarz>>) -> Response {
    stub.hits.fetch_add(1, Ordering::SeqCst);
    let delay = stub.delay_ms.load(Ordering::SeqCst);
    if delay > 0 {
        tokio::time::sleep(Duration::from_millis(delay)).await;
    }
    let status = StatusCode::from_u16(stub.status.load(Ordering::SeqCst)).unwrap();
    let body = stub.body.lock().unwrap().clone();
    (status, [(header::CONTENT_TYPE, "application/json")], body).into_response()
}

/// Start a stub answering `GET /varz` with 200 and `body`.
pub async fn spawn_stub(body: &str) -> (SocketAddr, Arc<StubVarz>) {
    let stub = Arc::new(StubVarz {
        status: AtomicU16::new(200),
        body: Mutex::new(body.to_string()),
        delay_ms: AtomicU64::new(0),
        hits: AtomicUsize::new(0),
    });
    let app = Router::new()
        .route("/varz", get(varz))
        .with_state(stub.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (addr, stub)
}

/// A loopback port with nothing listening on it.
pub fn closed_port() -> u16 {
    let l = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    l.local_addr().unwrap().port()
}

pub const SAMPLE_VARZ: &str = r#"{
  "server_id": "stub",
  "in_bytes": 100,
  "out_bytes": 50,
  "in_msgs": 10,
  "out_msgs": 5,
  "connections": 3,
  "slow_consumers": 0,
  "max_connections": 65536,
  "mem": 1234
}"#;
