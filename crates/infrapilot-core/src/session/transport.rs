//! WebSocket transport for the execution stream.

use std::time::Duration;

use futures::{SinkExt, StreamExt};
use log::{debug, info};
use reqwest::Url;
use tokio::{sync::oneshot, time};
use tokio_tungstenite::{
    connect_async,
    tungstenite::{self, error::ProtocolError, protocol::Message},
};

use super::{ExecutionSession, Flow, Inbound};
use crate::{
    auth::AuthSource,
    error::ExecutionError,
    models::{Credentials, ExecutionReport},
    wire::ExecuteEnvelope,
};

/// Everything the transport needs besides the session itself.
pub(crate) struct StreamRequest {
    pub endpoint: Url,
    pub auth: AuthSource,
    pub http: reqwest::Client,
    pub credentials: Credentials,
    pub connect_timeout: Duration,
}

/// Runs one execution attempt to its end.
///
/// `cancel` fires when the caller closes or drops its handle; it is checked
/// before every other input.
pub(crate) async fn run(
    mut session: ExecutionSession,
    request: StreamRequest,
    mut cancel: oneshot::Receiver<()>,
) -> ExecutionReport {
    let auth = tokio::select! {
        biased;
        _ = &mut cancel => {
            session.cancel();
            return session.into_report();
        }
        auth = request.auth.resolve(&request.http) => auth,
    };

    let url = match auth.and_then(|auth| auth.stream_url(&request.endpoint)) {
        Ok(url) => url,
        Err(e) => {
            session.fail(e);
            return session.into_report();
        }
    };

    info!(
        "Connecting to execution stream at {} for {}",
        request.endpoint,
        session.execution_id()
    );
    let connected = tokio::select! {
        biased;
        _ = &mut cancel => {
            session.cancel();
            return session.into_report();
        }
        connected = time::timeout(request.connect_timeout, connect_async(url.as_str())) => {
            connected
        }
    };

    let socket = match connected {
        Ok(Ok((socket, _response))) => socket,
        Ok(Err(e)) => {
            session.fail(ExecutionError::Transport(format!(
                "WebSocket connection failed. Is the agent server running? ({e})"
            )));
            return session.into_report();
        }
        Err(_) => {
            session.fail(ExecutionError::Transport(format!(
                "WebSocket connection timed out after {}s",
                request.connect_timeout.as_secs()
            )));
            return session.into_report();
        }
    };
    let (mut sink, mut stream) = socket.split();

    session.status("WebSocket connected, sending plan and credentials...");
    let envelope = ExecuteEnvelope::new(
        session.execution_id(),
        &request.credentials,
        &session.plan().steps,
    );
    let payload = match serde_json::to_string(&envelope) {
        Ok(payload) => payload,
        Err(e) => {
            session.fail(ExecutionError::Protocol(e.to_string()));
            return session.into_report();
        }
    };
    if let Err(e) = sink.send(Message::Text(payload)).await {
        session.fail(ExecutionError::Transport(e.to_string()));
        return session.into_report();
    }

    loop {
        let inbound = tokio::select! {
            biased;
            _ = &mut cancel => {
                info!("Execution stream closed by caller");
                session.cancel();
                let _ = sink.close().await;
                break;
            }
            frame = stream.next() => match frame {
                Some(Ok(Message::Text(text))) => Inbound::Text(text),
                Some(Ok(Message::Binary(bytes))) => {
                    Inbound::Text(String::from_utf8_lossy(&bytes).into_owned())
                }
                Some(Ok(Message::Close(frame))) => {
                    debug!("Execution stream close frame: {frame:?}");
                    Inbound::Closed
                }
                Some(Ok(_)) => continue,
                Some(Err(e)) => classify(e),
                None => Inbound::Closed,
            },
        };

        if session.handle(inbound) == Flow::Finish {
            let _ = sink.close().await;
            break;
        }
    }

    info!("Execution stream for {} finished", session.execution_id());
    session.into_report()
}

/// Maps a read error to a transport input; a peer that vanished without a
/// close handshake counts as a closed stream.
fn classify(error: tungstenite::Error) -> Inbound {
    match error {
        tungstenite::Error::ConnectionClosed
        | tungstenite::Error::AlreadyClosed
        | tungstenite::Error::Protocol(ProtocolError::ResetWithoutClosingHandshake) => {
            Inbound::Closed
        }
        other => Inbound::TransportError(other.to_string()),
    }
}
