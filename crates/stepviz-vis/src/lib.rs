//! Stepviz Visualization
//!
//! Step playback for algorithm traces, with a timer driver and an HTTP API.
//!
//! # Architecture
//!
//! - **Playback**: cursor state machine over one immutable trace
//! - **Driver**: tokio task that owns the playback and fires ticks
//! - **REST API**: generate traces, browse the catalogue, control playback
//!
//! # Usage
//!
//! ```ignore
//! let server = VisServer::new(VisConfig::from_env()?);
//! server.serve().await?;
//! ```

mod config;
mod driver;
mod error;
mod playback;
mod server;

pub use config::VisConfig;
pub use driver::Player;
pub use error::{Error, Result};
pub use playback::{
    Direction, Playback, PlaybackCommand, PlaybackState, PlaybackStatus, PlaybackView, SpeedTier,
    TraceLogLine,
};
pub use server::VisServer;
