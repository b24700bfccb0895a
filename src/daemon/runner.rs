//! Daemon event loop.
//!
//! A single task owns the loop and multiplexes three sources:
//! - new IPC connections, each served on its own task
//! - scheduler wakeups, fed to the controller in arrival order
//! - the shutdown signal
//!
//! The controller sits behind one mutex, so wakeups and requests never
//! interleave inside an operation.

use std::future::Future;
use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::ipc::{IpcServer, RequestHandler};
use crate::notification::NotificationSink;
use crate::settings::SettingsStore;
use crate::timer::{SessionController, TokioScheduler};

/// Runs the daemon until `shutdown` resolves.
///
/// On the way out every pending callback is cancelled and the socket file
/// is removed.
///
/// # Errors
///
/// Returns an error if the socket cannot be bound.
pub async fn run(
    socket_path: &Path,
    store: SettingsStore,
    sink: Box<dyn NotificationSink + Send>,
    shutdown: impl Future<Output = ()>,
) -> Result<()> {
    let server = IpcServer::new(socket_path)?;
    let (scheduler, mut wakeups) = TokioScheduler::new();
    let controller = Arc::new(Mutex::new(SessionController::new(store, scheduler, sink)));
    let handler = RequestHandler::new(Arc::clone(&controller));

    info!("Daemon listening on {:?}", server.socket_path());

    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            accepted = server.accept() => match accepted {
                Ok(stream) => {
                    let handler = handler.clone();
                    tokio::spawn(async move {
                        if let Err(e) = handler.serve(stream).await {
                            warn!("Failed to answer client: {:#}", e);
                        }
                    });
                }
                Err(e) => warn!("{:#}", e),
            },
            Some(wakeup) = wakeups.recv() => {
                controller.lock().await.handle_wakeup(wakeup);
            }
            () = &mut shutdown => {
                debug!("Shutdown requested");
                break;
            }
        }
    }

    controller.lock().await.shutdown();
    info!("Daemon stopped");

    Ok(())
}
