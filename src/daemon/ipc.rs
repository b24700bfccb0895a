//! IPC server for the session daemon.
//!
//! One JSON request per connection, one JSON response back:
//! - [`IpcServer`] owns the Unix socket and frames requests and responses
//! - [`RequestHandler`] turns requests into [`SessionController`] calls

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{UnixListener, UnixStream};
use tokio::sync::Mutex;
use tokio::time::{timeout, Duration};
use tracing::{debug, warn};

use crate::timer::{Scheduler, SessionController};
use crate::types::{IpcRequest, IpcResponse, ResponseData};

// ============================================================================
// Constants
// ============================================================================

/// Maximum request size in bytes (4KB)
const MAX_REQUEST_SIZE: usize = 4096;

/// Read timeout in seconds
const READ_TIMEOUT_SECS: u64 = 5;

// ============================================================================
// IpcError
// ============================================================================

/// IPC-specific error types.
#[derive(Debug, thiserror::Error)]
pub enum IpcError {
    /// Read error
    #[error("Failed to read request: {0}")]
    ReadError(String),

    /// Timeout error
    #[error("Operation timed out")]
    Timeout,

    /// The client hung up before sending anything
    #[error("Connection closed by client")]
    ConnectionClosed,

    /// Request too large
    #[error("Request too large (max {MAX_REQUEST_SIZE} bytes)")]
    RequestTooLarge,

    /// Request was not valid JSON for any known command
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

// ============================================================================
// IpcServer
// ============================================================================

/// Unix Domain Socket IPC server.
#[derive(Debug)]
pub struct IpcServer {
    listener: UnixListener,
    socket_path: PathBuf,
}

impl IpcServer {
    /// Binds a new server at `socket_path`.
    ///
    /// A socket file nobody answers on is stale and gets removed; missing
    /// parent directories are created first.
    ///
    /// # Errors
    ///
    /// Returns an error if another daemon is already listening on
    /// `socket_path`, or if the socket cannot be bound.
    pub fn new(socket_path: &Path) -> Result<Self> {
        if socket_path.exists() {
            if std::os::unix::net::UnixStream::connect(socket_path).is_ok() {
                anyhow::bail!("A daemon is already running on {:?}", socket_path);
            }
            debug!("Removing stale socket {:?}", socket_path);
            std::fs::remove_file(socket_path)
                .with_context(|| format!("Failed to remove existing socket: {:?}", socket_path))?;
        }

        if let Some(parent) = socket_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create socket directory: {:?}", parent))?;
        }

        let listener = UnixListener::bind(socket_path)
            .with_context(|| format!("Failed to bind Unix socket: {:?}", socket_path))?;
        debug!("Listening on {:?}", socket_path);

        Ok(Self {
            listener,
            socket_path: socket_path.to_path_buf(),
        })
    }

    /// Accepts an incoming client connection.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be accepted.
    pub async fn accept(&self) -> Result<UnixStream> {
        let (stream, _addr) = self
            .listener
            .accept()
            .await
            .context("Failed to accept connection")?;
        Ok(stream)
    }

    /// Reads and decodes one request, giving up after the read timeout.
    ///
    /// # Errors
    ///
    /// Returns an [`IpcError`] if nothing valid arrives in time.
    pub async fn receive_request(stream: &mut UnixStream) -> Result<IpcRequest, IpcError> {
        let mut buffer = vec![0u8; MAX_REQUEST_SIZE + 1];

        let n = match timeout(
            Duration::from_secs(READ_TIMEOUT_SECS),
            stream.read(&mut buffer),
        )
        .await
        {
            Ok(Ok(n)) => n,
            Ok(Err(e)) => return Err(IpcError::ReadError(e.to_string())),
            Err(_) => return Err(IpcError::Timeout),
        };

        if n == 0 {
            return Err(IpcError::ConnectionClosed);
        }
        if n > MAX_REQUEST_SIZE {
            return Err(IpcError::RequestTooLarge);
        }

        serde_json::from_slice(&buffer[..n]).map_err(|e| IpcError::InvalidRequest(e.to_string()))
    }

    /// Encodes and writes a response.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub async fn send_response(stream: &mut UnixStream, response: &IpcResponse) -> Result<()> {
        let json = serde_json::to_vec(response).context("Failed to serialize IPC response")?;

        stream
            .write_all(&json)
            .await
            .context("Failed to write response")?;
        stream.flush().await.context("Failed to flush response")?;

        Ok(())
    }

    /// Returns the socket path.
    pub fn socket_path(&self) -> &Path {
        &self.socket_path
    }
}

impl Drop for IpcServer {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.socket_path);
    }
}

// ============================================================================
// RequestHandler
// ============================================================================

/// Dispatches IPC requests to a shared session controller.
pub struct RequestHandler<S: Scheduler> {
    controller: Arc<Mutex<SessionController<S>>>,
}

impl<S: Scheduler> Clone for RequestHandler<S> {
    fn clone(&self) -> Self {
        Self {
            controller: Arc::clone(&self.controller),
        }
    }
}

impl<S: Scheduler> RequestHandler<S> {
    /// Creates a handler for `controller`.
    pub fn new(controller: Arc<Mutex<SessionController<S>>>) -> Self {
        Self { controller }
    }

    /// Returns the shared controller.
    pub fn controller(&self) -> &Arc<Mutex<SessionController<S>>> {
        &self.controller
    }

    /// Executes `request` and returns the response.
    ///
    /// Every timer command is total, so only malformed input ever produces
    /// an error response.
    pub async fn handle(&self, request: IpcRequest) -> IpcResponse {
        let mut controller = self.controller.lock().await;

        let message = match request {
            IpcRequest::Start => {
                let was_running = controller.state().is_running();
                controller.start();
                if was_running {
                    "Timer already running".to_string()
                } else if controller.state().is_running() {
                    "Timer started".to_string()
                } else {
                    "Nothing left to count down".to_string()
                }
            }
            IpcRequest::Pause => {
                controller.pause();
                "Timer paused".to_string()
            }
            IpcRequest::Reset => {
                controller.reset();
                "Session reset".to_string()
            }
            IpcRequest::ResetCount => {
                controller.reset_session_count();
                "Session count reset".to_string()
            }
            IpcRequest::Switch { mode } => {
                controller.switch_mode(mode);
                format!("Switched to {}", mode.label())
            }
            IpcRequest::Status | IpcRequest::Settings => String::new(),
            IpcRequest::ApplySettings { patch } => {
                controller.apply_patch(&patch);
                "Settings updated".to_string()
            }
        };

        IpcResponse::success(message, Some(snapshot(&controller)))
    }

    /// Serves one connection: read a request, answer it.
    ///
    /// Undecodable requests get an error response instead of a dropped
    /// connection.
    ///
    /// # Errors
    ///
    /// Returns an error if the response cannot be written.
    pub async fn serve(&self, mut stream: UnixStream) -> Result<()> {
        let response = match IpcServer::receive_request(&mut stream).await {
            Ok(request) => {
                debug!(?request, "Handling request");
                self.handle(request).await
            }
            Err(IpcError::ConnectionClosed) => return Ok(()),
            Err(e) => {
                warn!("Rejecting request: {}", e);
                IpcResponse::error(e.to_string())
            }
        };

        IpcServer::send_response(&mut stream, &response).await
    }
}

/// Builds the full status payload.
fn snapshot<S: Scheduler>(controller: &SessionController<S>) -> ResponseData {
    ResponseData::from_timer_state(controller.state())
        .with_settings(controller.settings())
        .with_banner(controller.active_banner().cloned())
}

// ============================================================================
// Tests
// ============================================================================
