//! Odyssey Trace Playback
//!
//! Step through generated algorithm traces, by hand or on a timer.
//!
//! # Architecture
//!
//! - **Playback**: Pure cursor and timing state machine over one trace
//! - **Player**: Async task that owns the engine and realizes its timer
//! - **Render**: Terminal rendering of snapshots
//! - **REST API + WebSocket**: Load traces, control playback, stream frames
//!
//! # Usage
//!
//! ```ignore
//! let server = VisServer::new(&VisConfig::default())?;
//! server.serve(3000).await?;
//! ```

mod config;
mod error;
mod playback;
mod player;
mod render;
mod server;

pub use config::{PlaybackConfig, VisConfig, DEFAULT_PORT};
pub use error::{Error, Result};
pub use playback::{
    PlaybackEngine, PlaybackSpeed, PlaybackState, PlaybackStatus, ScheduledTick, TickOutcome,
    TickToken, MAX_SPEED, MIN_SPEED,
};
pub use player::{Control, Frame, Player};
pub use render::{Render, TextRenderer};
pub use server::{AppState, TraceLoaded, TraceRequest, VisServer};

#[cfg(test)]
mod tests {
    use super::*;
    use odyssey_trace::{Registry, Seed};
    use std::sync::Arc;

    #[test]
    fn engine_walks_a_generated_trace() {
        let trace = Registry::standard()
            .generate("bubble", &Seed::from(vec![5, 3, 8, 1]))
            .unwrap();
        let len = trace.len();
        let mut engine = PlaybackEngine::new(&PlaybackConfig::default());
        engine.load(Arc::new(trace));

        let mut pending = engine.play();
        while let Some(tick) = pending {
            pending = match engine.tick(tick.token) {
                TickOutcome::Advanced(next) => Some(next),
                _ => None,
            };
        }

        assert_eq!(engine.index(), len - 1);
        assert_eq!(engine.state(), PlaybackState::Paused);
        let last = engine.current().unwrap();
        assert!(TextRenderer::new().render(last).starts_with("1 3 5 8"));
    }
}
