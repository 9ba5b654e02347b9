//! TCP server loop: accept connections, frame requests, dispatch each
//! one on its own task, and funnel replies through a writer task.
//!
//! Request tasks outlive their connection on purpose: a client that
//! hangs up mid-restore must not kill the restore process, it just
//! stops receiving replies.

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::net::tcp::OwnedWriteHalf;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;

use feedback_analysis::{Analyzer, SolutionEngine};

use crate::codec::{FrameReader, FrameWriter};
use crate::proto::{
    self, CompileErrorsResult, IncomingRequest, SolutionParams, SyntaxCheckResult,
};

const REPLY_CHANNEL_CAPACITY: usize = 64;

/// The listening half of the service.
pub struct RpcServer {
    listener: TcpListener,
}

impl RpcServer {
    pub async fn bind(addr: &str) -> Result<Self> {
        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("binding {addr}"))?;
        Ok(Self { listener })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        self.listener.local_addr().context("reading local address")
    }

    /// Accept connections forever. Individual connection or request
    /// failures are logged and never take the server down.
    pub async fn serve<E: SolutionEngine>(self, analyzer: Arc<Analyzer<E>>) -> Result<()> {
        loop {
            let (stream, peer) = self.listener.accept().await.context("accepting client")?;
            tracing::info!(%peer, "client connected");
            let analyzer = Arc::clone(&analyzer);
            tokio::spawn(async move {
                if let Err(e) = handle_connection(stream, analyzer).await {
                    tracing::warn!(%peer, "connection error: {e:#}");
                }
                tracing::info!(%peer, "client disconnected");
            });
        }
    }
}

async fn handle_connection<E: SolutionEngine>(
    stream: TcpStream,
    analyzer: Arc<Analyzer<E>>,
) -> Result<()> {
    let (read_half, write_half) = stream.into_split();
    let (reply_tx, reply_rx) = mpsc::channel(REPLY_CHANNEL_CAPACITY);
    let writer = tokio::spawn(write_replies(write_half, reply_rx));

    let mut reader = FrameReader::new(read_half);
    let result = loop {
        match reader.read_frame().await {
            Ok(Some(frame)) => dispatch_frame(frame, &analyzer, &reply_tx),
            Ok(None) => break Ok(()),
            Err(e) => break Err(e),
        }
    };

    // Dropping our sender lets the writer drain replies from requests
    // still in flight, then exit when the last request task finishes.
    drop(reply_tx);
    let _ = writer.await;
    result
}

async fn write_replies(
    write_half: OwnedWriteHalf,
    mut reply_rx: mpsc::Receiver<serde_json::Value>,
) {
    let mut writer = FrameWriter::new(write_half);
    while let Some(reply) = reply_rx.recv().await {
        if let Err(e) = writer.write_frame(&reply).await {
            tracing::warn!("dropping reply, write failed: {e}");
            break;
        }
    }
}

/// Parse and launch one request. Each request runs on its own task so a
/// slow restore/load never blocks the connection's other requests.
fn dispatch_frame<E: SolutionEngine>(
    frame: serde_json::Value,
    analyzer: &Arc<Analyzer<E>>,
    reply_tx: &mpsc::Sender<serde_json::Value>,
) {
    let request: IncomingRequest = match serde_json::from_value(frame) {
        Ok(request) => request,
        Err(e) => {
            tracing::warn!("ignoring malformed request frame: {e}");
            return;
        }
    };
    let Some(id) = request.id else {
        tracing::debug!(method = %request.method, "dropping notification");
        return;
    };

    let analyzer = Arc::clone(analyzer);
    let reply_tx = reply_tx.clone();
    tokio::spawn(async move {
        let reply = handle_request(&analyzer, &id, &request.method, request.params).await;
        if reply_tx.send(reply).await.is_err() {
            tracing::debug!("client gone before reply was ready");
        }
    });
}

async fn handle_request<E: SolutionEngine>(
    analyzer: &Analyzer<E>,
    id: &serde_json::Value,
    method: &str,
    params: Option<serde_json::Value>,
) -> serde_json::Value {
    match method {
        proto::METHOD_GET_COMPILE_ERRORS => {
            let params = match solution_params(params) {
                Ok(params) => params,
                Err(reason) => return proto::error(id, proto::code::INVALID_PARAMS, reason, None),
            };
            match analyzer
                .compile_errors(Path::new(&params.file_path), params.refresh)
                .await
            {
                Ok(errors) => proto::success(id, CompileErrorsResult { errors }),
                Err(e) => proto::pipeline_error(id, &e),
            }
        }
        proto::METHOD_HAS_SYNTAX_ERRORS => {
            let params = match solution_params(params) {
                Ok(params) => params,
                Err(reason) => return proto::error(id, proto::code::INVALID_PARAMS, reason, None),
            };
            match analyzer.has_syntax_errors(Path::new(&params.file_path)).await {
                Ok(has_syntax_errors) => {
                    proto::success(id, SyntaxCheckResult { has_syntax_errors })
                }
                Err(e) => proto::pipeline_error(id, &e),
            }
        }
        other => proto::error(
            id,
            proto::code::METHOD_NOT_FOUND,
            format!("method not found: {other}"),
            None,
        ),
    }
}

/// Validate params before anything touches the pipeline: a request
/// without a usable solution path is rejected at the boundary.
fn solution_params(params: Option<serde_json::Value>) -> Result<SolutionParams, String> {
    let params = params.ok_or_else(|| "params are required".to_string())?;
    let params: SolutionParams =
        serde_json::from_value(params).map_err(|e| format!("invalid params: {e}"))?;
    if params.file_path.trim().is_empty() {
        return Err("filePath must not be empty".to_string());
    }
    Ok(params)
}
