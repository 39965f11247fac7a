//! The async player: one task that owns a [`PlaybackEngine`].
//!
//! User commands and the auto-advance timer are handled by the same task
//! loop, so they never interleave. The engine's single armed tick maps onto
//! one `tokio::time::Sleep`; re-arming resets it and cancelling disables it.
//! Every change is published on a `watch` channel.

use std::sync::Arc;

use odyssey_trace::{Snapshot, Trace, VisualizationType};
use serde::Serialize;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::time::{sleep, Instant};
use tracing::{debug, info};

use crate::config::PlaybackConfig;
use crate::error::{Error, Result};
use crate::playback::{
    PlaybackEngine, PlaybackSpeed, PlaybackStatus, ScheduledTick, TickOutcome, TickToken,
};

const COMMAND_BUFFER: usize = 64;

/// A cursor or timing change requested by a user.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Control {
    Play,
    Pause,
    Next,
    Prev,
    Seek(usize),
    Speed(PlaybackSpeed),
    Reset,
}

/// The snapshot under the cursor, with its position and the renderer it
/// should go to.
#[derive(Debug, Clone, Serialize)]
pub struct Frame {
    pub visualization: VisualizationType,
    pub algorithm: String,
    pub index: usize,
    pub total: usize,
    pub snapshot: Snapshot,
}

enum Command {
    Load(Arc<Trace>, VisualizationType, oneshot::Sender<PlaybackStatus>),
    Control(Control, oneshot::Sender<PlaybackStatus>),
    Frame(oneshot::Sender<Option<Frame>>),
}

/// Cloneable handle to a running player task.
///
/// The task stops once every handle is dropped.
#[derive(Debug, Clone)]
pub struct Player {
    commands: mpsc::Sender<Command>,
    status: watch::Receiver<PlaybackStatus>,
}

impl Player {
    /// Spawn a player task on the current runtime.
    pub fn spawn(config: &PlaybackConfig) -> Self {
        let engine = PlaybackEngine::new(config);
        let (commands, rx) = mpsc::channel(COMMAND_BUFFER);
        let (status_tx, status) = watch::channel(engine.status());
        tokio::spawn(run(engine, rx, status_tx));
        Self { commands, status }
    }

    /// Load a trace, paused at step 0. Frames of this trace carry `visualization`.
    pub async fn load(
        &self,
        trace: Arc<Trace>,
        visualization: VisualizationType,
    ) -> Result<PlaybackStatus> {
        self.request(|reply| Command::Load(trace, visualization, reply)).await
    }

    /// Apply a control and return the resulting status.
    pub async fn control(&self, control: Control) -> Result<PlaybackStatus> {
        self.request(|reply| Command::Control(control, reply)).await
    }

    /// Start auto-advance.
    pub async fn play(&self) -> Result<PlaybackStatus> {
        self.control(Control::Play).await
    }

    /// Stop auto-advance, keeping the cursor.
    pub async fn pause(&self) -> Result<PlaybackStatus> {
        self.control(Control::Pause).await
    }

    /// The frame under the cursor, `None` before the first load.
    pub async fn frame(&self) -> Result<Option<Frame>> {
        self.request(Command::Frame).await
    }

    /// Latest published status.
    pub fn status(&self) -> PlaybackStatus {
        self.status.borrow().clone()
    }

    /// A receiver that wakes on every status change.
    pub fn subscribe(&self) -> watch::Receiver<PlaybackStatus> {
        self.status.clone()
    }

    async fn request<T>(&self, make: impl FnOnce(oneshot::Sender<T>) -> Command) -> Result<T> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(make(reply))
            .await
            .map_err(|_| Error::PlayerClosed)?;
        response.await.map_err(|_| Error::PlayerClosed)
    }
}

fn apply(engine: &mut PlaybackEngine, control: Control) -> Option<ScheduledTick> {
    match control {
        Control::Play => engine.play(),
        Control::Pause => {
            engine.pause();
            None
        }
        Control::Next => engine.next(),
        Control::Prev => engine.prev(),
        Control::Seek(step) => engine.goto(step),
        Control::Speed(speed) => {
            engine.set_speed(speed);
            None
        }
        Control::Reset => {
            engine.reset();
            None
        }
    }
}

fn frame(engine: &PlaybackEngine, visualization: VisualizationType) -> Option<Frame> {
    let trace = engine.trace()?;
    let snapshot = engine.current()?;
    Some(Frame {
        visualization,
        algorithm: trace.algorithm().to_string(),
        index: engine.index(),
        total: trace.len(),
        snapshot: snapshot.clone(),
    })
}

async fn run(
    mut engine: PlaybackEngine,
    mut commands: mpsc::Receiver<Command>,
    status: watch::Sender<PlaybackStatus>,
) {
    let timer = sleep(std::time::Duration::ZERO);
    tokio::pin!(timer);
    let mut pending: Option<TickToken> = None;
    // Set together with the trace so frames never pair one with another's tag.
    let mut visualization = VisualizationType::Array;

    loop {
        let scheduled = tokio::select! {
            command = commands.recv() => {
                let Some(command) = command else { break };
                match command {
                    Command::Load(trace, tag, reply) => {
                        info!(algorithm = trace.algorithm(), steps = trace.len(), %tag, "player loaded trace");
                        engine.load(trace);
                        visualization = tag;
                        let _ = reply.send(engine.status());
                        None
                    }
                    Command::Control(control, reply) => {
                        let scheduled = apply(&mut engine, control);
                        let _ = reply.send(engine.status());
                        scheduled
                    }
                    Command::Frame(reply) => {
                        let _ = reply.send(frame(&engine, visualization));
                        continue;
                    }
                }
            }
            () = &mut timer, if pending.is_some() => {
                let Some(token) = pending.take() else { continue };
                match engine.tick(token) {
                    TickOutcome::Advanced(next) => Some(next),
                    TickOutcome::Finished => {
                        info!(algorithm = ?engine.trace().map(|t| t.algorithm()), "playback finished");
                        None
                    }
                    TickOutcome::Stale => None,
                }
            }
        };

        match scheduled {
            Some(tick) => {
                timer.as_mut().reset(Instant::now() + tick.delay);
                pending = Some(tick.token);
            }
            None if engine.pending() != pending => pending = None,
            None => {}
        }
        status.send_replace(engine.status());
    }

    debug!("player task stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::playback::PlaybackState;
    use odyssey_trace::View;
    use std::time::Duration;

    fn make_trace(len: usize) -> Arc<Trace> {
        let steps = (0..len)
            .map(|i| Snapshot::new(View::array(&[i as i64]), format!("step {i}")))
            .collect();
        Arc::new(Trace::from_steps("demo", steps).unwrap())
    }

    #[tokio::test(start_paused = true)]
    async fn new_player_is_idle() {
        let player = Player::spawn(&PlaybackConfig::default());
        assert_eq!(player.status().state, PlaybackState::Idle);
        assert!(player.frame().await.unwrap().is_none());
        assert_eq!(player.play().await.unwrap().state, PlaybackState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn auto_advance_stops_at_last_step() {
        let player = Player::spawn(&PlaybackConfig::default());
        player.load(make_trace(4), VisualizationType::Array).await.unwrap();
        let status = player.play().await.unwrap();
        assert_eq!(status.state, PlaybackState::Playing);

        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert_eq!(player.status().current_step, 1);

        tokio::time::sleep(Duration::from_secs(10)).await;
        let status = player.status();
        assert_eq!(status.current_step, 3);
        assert_eq!(status.state, PlaybackState::Paused);
        assert_eq!(status.progress, 1.0);
    }

    #[tokio::test(start_paused = true)]
    async fn pause_stops_the_timer() {
        let player = Player::spawn(&PlaybackConfig::default());
        player.load(make_trace(10), VisualizationType::Array).await.unwrap();
        player.play().await.unwrap();

        tokio::time::sleep(Duration::from_millis(2500)).await;
        let paused = player.pause().await.unwrap();
        assert_eq!(paused.current_step, 2);

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(player.status().current_step, 2);
        assert_eq!(player.status().state, PlaybackState::Paused);
    }

    #[tokio::test(start_paused = true)]
    async fn speed_shortens_the_interval() {
        let player = Player::spawn(&PlaybackConfig::default());
        player.load(make_trace(10), VisualizationType::Array).await.unwrap();
        player.control(Control::Speed(PlaybackSpeed::QUADRUPLE)).await.unwrap();
        player.play().await.unwrap();

        tokio::time::sleep(Duration::from_millis(1100)).await;
        assert_eq!(player.status().current_step, 4);
    }

    #[tokio::test(start_paused = true)]
    async fn load_while_playing_cancels_the_old_timer() {
        let player = Player::spawn(&PlaybackConfig::default());
        player.load(make_trace(10), VisualizationType::Array).await.unwrap();
        player.play().await.unwrap();
        tokio::time::sleep(Duration::from_millis(900)).await;

        let status = player.load(make_trace(3), VisualizationType::Array).await.unwrap();
        assert_eq!(status.state, PlaybackState::Paused);

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(player.status().current_step, 0);
        assert_eq!(player.status().total_steps, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn manual_steps_and_frames() {
        let player = Player::spawn(&PlaybackConfig::default());
        player.load(make_trace(3), VisualizationType::Array).await.unwrap();

        player.control(Control::Next).await.unwrap();
        let frame = player.frame().await.unwrap().unwrap();
        assert_eq!(frame.index, 1);
        assert_eq!(frame.total, 3);
        assert_eq!(frame.snapshot.message, "step 1");

        let status = player.control(Control::Seek(99)).await.unwrap();
        assert_eq!(status.current_step, 2);

        let status = player.control(Control::Reset).await.unwrap();
        assert_eq!(status.current_step, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn frames_carry_the_tag_of_their_trace() {
        let player = Player::spawn(&PlaybackConfig::default());
        player.load(make_trace(3), VisualizationType::Graph).await.unwrap();
        let first = player.frame().await.unwrap().unwrap();
        assert_eq!(first.visualization, VisualizationType::Graph);

        // Concurrent loads: whichever trace is current, its own tag comes with it.
        let (a, b) = (player.clone(), player.clone());
        let (left, right) = tokio::join!(
            a.load(make_trace(2), VisualizationType::Tree),
            b.load(make_trace(5), VisualizationType::Stack),
        );
        left.unwrap();
        right.unwrap();
        let frame = player.frame().await.unwrap().unwrap();
        let expected = match frame.total {
            2 => VisualizationType::Tree,
            _ => VisualizationType::Stack,
        };
        assert_eq!(frame.visualization, expected);
    }

    #[tokio::test(start_paused = true)]
    async fn paused_player_stays_quiet() {
        let player = Player::spawn(&PlaybackConfig::default());
        player.load(make_trace(3), VisualizationType::Array).await.unwrap();
        let mut updates = player.subscribe();
        updates.mark_unchanged();

        tokio::time::sleep(Duration::from_secs(5)).await;
        let mut changed = tokio_test::task::spawn(updates.changed());
        tokio_test::assert_pending!(changed.poll());
    }

    #[tokio::test(start_paused = true)]
    async fn subscribers_see_ticks() {
        let player = Player::spawn(&PlaybackConfig::default());
        let mut updates = player.subscribe();
        player.load(make_trace(3), VisualizationType::Array).await.unwrap();
        player.play().await.unwrap();

        let mut seen = Vec::new();
        while seen.last() != Some(&2) {
            updates.changed().await.unwrap();
            let step = updates.borrow_and_update().current_step;
            if seen.last() != Some(&step) {
                seen.push(step);
            }
        }
        assert_eq!(seen, vec![0, 1, 2]);
    }
}
