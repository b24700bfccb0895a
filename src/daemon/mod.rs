//! Session daemon.
//!
//! - `ipc`: Unix socket server and request dispatch
//! - `runner`: event loop driving the session controller

pub mod ipc;
pub mod runner;

pub use ipc::{IpcError, IpcServer, RequestHandler};
pub use runner::run;
