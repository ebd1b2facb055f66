#![allow(dead_code)]

use std::{
    net::SocketAddr,
    sync::{Arc, Mutex},
    time::Duration,
};

use axum::{
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use futures::{SinkExt, StreamExt};
use infrapilot_core::{auth::StreamAuth, AuthSource, PilotClient, PilotClientBuilder, PilotConfig};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::oneshot};
use tokio_tungstenite::{
    accept_hdr_async,
    tungstenite::{
        handshake::server::{ErrorResponse, Request, Response},
        Message,
    },
};

/// What the plan endpoint saw on its last request.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub body: Value,
    pub authorization: Option<String>,
    pub user_id: Option<String>,
}

pub struct PlanServer {
    pub base_url: String,
    pub recorded: Arc<Mutex<Option<RecordedRequest>>>,
}

impl PlanServer {
    pub fn last_request(&self) -> RecordedRequest {
        self.recorded
            .lock()
            .unwrap()
            .clone()
            .expect("plan endpoint was not called")
    }
}

/// Serves `reply` with `status` on the plan endpoint, and a fixed identity
/// on `/token`.
pub async fn spawn_plan_server(status: u16, reply: String) -> PlanServer {
    let recorded = Arc::new(Mutex::new(None));
    let sink = recorded.clone();

    let app = Router::new()
        .route(
            "/api/v1/agent/process",
            post(move |headers: HeaderMap, Json(body): Json<Value>| {
                let sink = sink.clone();
                let reply = reply.clone();
                async move {
                    let header = |name: &str| {
                        headers
                            .get(name)
                            .and_then(|value| value.to_str().ok())
                            .map(str::to_string)
                    };
                    *sink.lock().unwrap() = Some(RecordedRequest {
                        body,
                        authorization: header("authorization"),
                        user_id: header("x-user-id"),
                    });
                    (StatusCode::from_u16(status).unwrap(), reply)
                }
            }),
        )
        .route(
            "/token",
            get(|| async { Json(json!({"token": "t-issued", "userId": "u-issued"})) }),
        );

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    PlanServer {
        base_url: format!("http://{addr}"),
        recorded,
    }
}

/// First request on the stream: the handshake query and the envelope.
#[derive(Debug)]
pub struct Captured {
    pub query: Option<String>,
    pub envelope: Value,
}

/// How the stream server ends the connection after the scripted frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ending {
    /// Sends a close frame
    Close,
    /// Keeps the connection open until the client goes away
    Hold,
}

pub struct StreamServer {
    pub addr: SocketAddr,
    pub captured: oneshot::Receiver<Captured>,
    /// Resolves once the connection has ended, whichever side ended it.
    pub finished: oneshot::Receiver<()>,
}

impl StreamServer {
    pub fn url(&self) -> String {
        format!("ws://{}/ws/v1/agent/execute", self.addr)
    }
}

/// Accepts one execution stream connection, reads the envelope, then sends
/// `frames` in order.
pub async fn spawn_stream_server(frames: Vec<String>, ending: Ending) -> StreamServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (captured_tx, captured) = oneshot::channel();
    let (finished_tx, finished) = oneshot::channel::<()>();

    tokio::spawn(async move {
        // Dropped with the task, whichever way it ends.
        let _finished = finished_tx;
        let (stream, _) = listener.accept().await.unwrap();
        let mut query = None;
        let mut ws = accept_hdr_async(
            stream,
            |request: &Request, response: Response| -> Result<Response, ErrorResponse> {
                query = request.uri().query().map(str::to_string);
                Ok(response)
            },
        )
        .await
        .unwrap();

        let envelope = match ws.next().await {
            Some(Ok(Message::Text(text))) => serde_json::from_str(&text).unwrap(),
            other => panic!("expected an envelope, got {other:?}"),
        };
        let _ = captured_tx.send(Captured { query, envelope });

        for frame in frames {
            if ws.send(Message::Text(frame)).await.is_err() {
                return;
            }
        }

        match ending {
            Ending::Close => {
                let _ = ws.close(None).await;
                let drain = async {
                    while let Some(Ok(_)) = ws.next().await {}
                };
                let _ = tokio::time::timeout(Duration::from_secs(5), drain).await;
            }
            Ending::Hold => while let Some(Ok(_)) = ws.next().await {},
        }
    });

    StreamServer {
        addr,
        captured,
        finished,
    }
}

pub fn static_auth(user_id: &str) -> AuthSource {
    AuthSource::Static(StreamAuth {
        token: None,
        user_id: Some(user_id.to_string()),
    })
}

/// Client pointed at the given backends.
pub fn create_test_client(
    backend_url: &str,
    stream_url: Option<String>,
    auth: AuthSource,
) -> PilotClient {
    let config = PilotConfig {
        backend_url: backend_url.to_string(),
        stream_url,
        connect_timeout_secs: 5,
        request_timeout_secs: 5,
        ..PilotConfig::default()
    };
    PilotClientBuilder::new()
        .with_config(config)
        .with_auth_source(auth)
        .build()
        .expect("Failed to create client")
}

/// A two-step plan response as the backend sends it.
pub fn two_step_plan_body() -> String {
    json!({
        "request": "create a t3.micro ec2 instance",
        "mode": "dry-run",
        "confidence": 0.93,
        "action": "create_ec2_instance",
        "reasoning": "An AMI lookup is needed before launching.",
        "executionPlan": [
            {
                "id": "step-1",
                "name": "Get latest Ubuntu AMI",
                "description": "Find the newest Ubuntu image",
                "mcpTool": "get-latest-ubuntu-ami"
            },
            {
                "id": "step-2",
                "name": "Create new EC2 instance",
                "description": "Launch a t3.micro",
                "toolParameters": {"InstanceType": "t3.micro"},
                "dependsOn": ["step-1"]
            }
        ]
    })
    .to_string()
}

pub fn progress(step_id: &str, status: &str) -> String {
    json!({"type": "execution_progress", "stepId": step_id, "status": status}).to_string()
}
