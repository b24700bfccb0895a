//! IPC client for talking to the session daemon.
//!
//! This module provides:
//! - Unix Domain Socket client
//! - Request/response handling
//! - Connection retry logic
//! - Timeout handling

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::UnixStream;
use tokio::time::timeout;

use crate::paths;
use crate::types::{IpcRequest, IpcResponse, SessionMode, SettingsPatch};

// ============================================================================
// Constants
// ============================================================================

/// Connection timeout in seconds
const CONNECTION_TIMEOUT_SECS: u64 = 5;

/// Read/write timeout in seconds
const IO_TIMEOUT_SECS: u64 = 5;

/// Maximum response size in bytes (64KB)
const MAX_RESPONSE_SIZE: usize = 65536;

/// Maximum connection attempts
const MAX_RETRIES: u32 = 3;

/// Retry delay in milliseconds (base delay, multiplied by attempt number)
const RETRY_DELAY_MS: u64 = 500;

// ============================================================================
// IpcClient
// ============================================================================

/// IPC client for daemon communication.
#[derive(Debug, Clone)]
pub struct IpcClient {
    socket_path: PathBuf,
    timeout: Duration,
    max_retries: u32,
}

impl IpcClient {
    /// Creates a client for the default socket path.
    ///
    /// # Errors
    ///
    /// Returns an error if the socket path cannot be determined.
    pub fn new() -> Result<Self> {
        Ok(Self::with_socket_path(paths::socket_path()?))
    }

    /// Creates a client for a custom socket path.
    pub fn with_socket_path(socket_path: PathBuf) -> Self {
        Self {
            socket_path,
            timeout: Duration::from_secs(CONNECTION_TIMEOUT_SECS),
            max_retries: MAX_RETRIES,
        }
    }

    /// Sets how many times a failed connection is attempted.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries.max(1);
        self
    }

    /// Returns the socket path.
    pub fn socket_path(&self) -> &PathBuf {
        &self.socket_path
    }

    pub async fn start(&self) -> Result<IpcResponse> {
        self.send(&IpcRequest::Start).await
    }

    pub async fn pause(&self) -> Result<IpcResponse> {
        self.send(&IpcRequest::Pause).await
    }

    pub async fn reset(&self) -> Result<IpcResponse> {
        self.send(&IpcRequest::Reset).await
    }

    pub async fn reset_count(&self) -> Result<IpcResponse> {
        self.send(&IpcRequest::ResetCount).await
    }

    pub async fn switch(&self, mode: SessionMode) -> Result<IpcResponse> {
        self.send(&IpcRequest::Switch { mode }).await
    }

    pub async fn status(&self) -> Result<IpcResponse> {
        self.send(&IpcRequest::Status).await
    }

    /// Reads the settings, or applies `patch` first if it changes anything.
    pub async fn settings(&self, patch: SettingsPatch) -> Result<IpcResponse> {
        if patch.is_empty() {
            self.send(&IpcRequest::Settings).await
        } else {
            self.send(&IpcRequest::ApplySettings { patch }).await
        }
    }

    /// Sends a request and turns an error response into an `Err`.
    pub async fn send(&self, request: &IpcRequest) -> Result<IpcResponse> {
        let response = self.send_request_with_retry(request).await?;

        if !response.is_success() {
            anyhow::bail!("{}", response.message);
        }

        Ok(response)
    }

    /// Sends a request to the daemon with retry logic.
    async fn send_request_with_retry(&self, request: &IpcRequest) -> Result<IpcResponse> {
        let mut attempt = 1;

        loop {
            match self.send_request(request).await {
                Ok(response) => return Ok(response),
                Err(e) if attempt >= self.max_retries => return Err(e),
                Err(e) => {
                    tracing::debug!(
                        "Request failed (attempt {}/{}): {:#}",
                        attempt,
                        self.max_retries,
                        e
                    );
                    let delay = Duration::from_millis(RETRY_DELAY_MS * u64::from(attempt));
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }

    /// Sends a single request to the daemon.
    async fn send_request(&self, request: &IpcRequest) -> Result<IpcResponse> {
        let mut stream = timeout(self.timeout, UnixStream::connect(&self.socket_path))
            .await
            .context("Connection timed out")?
            .context("Cannot reach the daemon. Start it with 'stayontask daemon'")?;

        let request_json = serde_json::to_vec(request).context("Failed to serialize request")?;

        timeout(
            Duration::from_secs(IO_TIMEOUT_SECS),
            stream.write_all(&request_json),
        )
        .await
        .context("Write timed out")?
        .context("Failed to send request")?;

        // Shutdown write side to signal end of request
        stream.shutdown().await.context("Failed to close request")?;

        let mut buffer = Vec::with_capacity(4096);
        let n = timeout(
            Duration::from_secs(IO_TIMEOUT_SECS),
            (&mut stream)
                .take(MAX_RESPONSE_SIZE as u64)
                .read_to_end(&mut buffer),
        )
        .await
        .context("Read timed out")?
        .context("Failed to receive response")?;

        if n == 0 {
            anyhow::bail!("The daemon closed the connection without answering");
        }

        serde_json::from_slice(&buffer).context("Failed to parse response")
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use tokio::net::UnixListener;
    use tokio::sync::Mutex;

    use crate::types::ResponseData;

    // ------------------------------------------------------------------------
    // Helper functions
    // ------------------------------------------------------------------------

    fn create_temp_socket_path() -> PathBuf {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.sock");
        // Keep the directory so it's not deleted
        std::mem::forget(dir);
        path
    }

    /// Answers one connection with `response` and records the request.
    fn spawn_mock_server(
        socket_path: &PathBuf,
        response: IpcResponse,
    ) -> (
        tokio::task::JoinHandle<()>,
        Arc<Mutex<Option<IpcRequest>>>,
    ) {
        let _ = std::fs::remove_file(socket_path);
        let listener = UnixListener::bind(socket_path).unwrap();
        let received = Arc::new(Mutex::new(None));
        let received_clone = received.clone();

        let handle = tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();

            let mut buffer = vec![0u8; 4096];
            let n = stream.read(&mut buffer).await.unwrap();
            let request: IpcRequest = serde_json::from_slice(&buffer[..n]).unwrap();
            *received_clone.lock().await = Some(request);

            let json = serde_json::to_vec(&response).unwrap();
            stream.write_all(&json).await.unwrap();
            stream.flush().await.unwrap();
        });

        (handle, received)
    }

    // ------------------------------------------------------------------------
    // IpcClient Tests
    // ------------------------------------------------------------------------

    mod client_tests {
        use super::*;

        #[test]
        fn test_with_socket_path() {
            let path = PathBuf::from("/tmp/test.sock");
            let client = IpcClient::with_socket_path(path.clone());
            assert_eq!(client.socket_path(), &path);
        }

        #[tokio::test]
        async fn test_connection_failure() {
            let socket_path = PathBuf::from("/tmp/stayontask_nonexistent_12345.sock");
            let client = IpcClient::with_socket_path(socket_path).with_max_retries(1);

            let result = client.status().await;
            assert!(result.is_err());
        }

        #[tokio::test]
        async fn test_send_status_request() {
            let socket_path = create_temp_socket_path();
            let (server, received) = spawn_mock_server(
                &socket_path,
                IpcResponse::success(
                    "",
                    Some(ResponseData {
                        mode: Some(SessionMode::Work),
                        remaining_seconds: Some(1500),
                        is_running: Some(false),
                        completed_work_sessions: Some(0),
                        ..ResponseData::default()
                    }),
                ),
            );

            let client = IpcClient::with_socket_path(socket_path);
            let response = client.status().await.unwrap();

            assert!(response.is_success());
            assert_eq!(response.data.unwrap().remaining_seconds, Some(1500));
            assert_eq!(*received.lock().await, Some(IpcRequest::Status));

            server.await.unwrap();
        }

        #[tokio::test]
        async fn test_send_switch_request() {
            let socket_path = create_temp_socket_path();
            let (server, received) =
                spawn_mock_server(&socket_path, IpcResponse::success("Switched", None));

            let client = IpcClient::with_socket_path(socket_path);
            client.switch(SessionMode::LongBreak).await.unwrap();

            assert_eq!(
                *received.lock().await,
                Some(IpcRequest::Switch {
                    mode: SessionMode::LongBreak
                })
            );
            server.await.unwrap();
        }

        #[tokio::test]
        async fn test_settings_without_changes_reads() {
            let socket_path = create_temp_socket_path();
            let (server, received) =
                spawn_mock_server(&socket_path, IpcResponse::success("", None));

            let client = IpcClient::with_socket_path(socket_path);
            client.settings(SettingsPatch::default()).await.unwrap();

            assert_eq!(*received.lock().await, Some(IpcRequest::Settings));
            server.await.unwrap();
        }

        #[tokio::test]
        async fn test_settings_with_changes_applies() {
            let socket_path = create_temp_socket_path();
            let (server, received) =
                spawn_mock_server(&socket_path, IpcResponse::success("Settings updated", None));

            let patch = SettingsPatch {
                work_minutes: Some(45),
                ..SettingsPatch::default()
            };
            let client = IpcClient::with_socket_path(socket_path);
            client.settings(patch.clone()).await.unwrap();

            assert_eq!(
                *received.lock().await,
                Some(IpcRequest::ApplySettings { patch })
            );
            server.await.unwrap();
        }

        #[tokio::test]
        async fn test_error_response_becomes_err() {
            let socket_path = create_temp_socket_path();
            let (server, _received) =
                spawn_mock_server(&socket_path, IpcResponse::error("Invalid request"));

            let client = IpcClient::with_socket_path(socket_path);
            let result = client.pause().await;

            assert_eq!(result.unwrap_err().to_string(), "Invalid request");
            server.await.unwrap();
        }
    }
}
