//! Async timer driver for [`Playback`].
//!
//! One task owns the state machine. Commands arrive over an mpsc channel and
//! every change is published on a `watch` channel. The pending tick is a
//! deadline owned by the task and tagged with the epoch it was scheduled
//! under, so a transition that supersedes it also cancels it.

use std::sync::Arc;

use stepviz_trace::Trace;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::time::{sleep_until, Instant};

use crate::error::{Error, Result};
use crate::playback::{Direction, Playback, PlaybackCommand, PlaybackStatus, PlaybackView, SpeedTier};

const COMMAND_BUFFER: usize = 32;

enum Request {
    Apply(PlaybackCommand, oneshot::Sender<PlaybackStatus>),
    View(oneshot::Sender<PlaybackView>),
}

/// Handle to a running playback task.
///
/// Cloning the handle shares the task. The task stops once every handle
/// is dropped.
#[derive(Clone)]
pub struct Player {
    requests: mpsc::Sender<Request>,
    status: watch::Receiver<PlaybackStatus>,
}

impl Player {
    /// Spawn the playback task on the current runtime.
    pub fn spawn(playback: Playback) -> Self {
        let (requests, inbox) = mpsc::channel(COMMAND_BUFFER);
        let (publish, status) = watch::channel(PlaybackStatus::from(&playback));
        tokio::spawn(run(playback, inbox, publish));
        Self { requests, status }
    }

    /// Apply a command and return the resulting status.
    pub async fn send(&self, command: PlaybackCommand) -> Result<PlaybackStatus> {
        let (reply, response) = oneshot::channel();
        self.requests
            .send(Request::Apply(command, reply))
            .await
            .map_err(|_| Error::DriverClosed)?;
        response.await.map_err(|_| Error::DriverClosed)
    }

    pub async fn select(&self, trace: impl Into<Arc<Trace>>) -> Result<PlaybackStatus> {
        self.send(PlaybackCommand::Select(trace.into())).await
    }

    pub async fn play(&self) -> Result<PlaybackStatus> {
        self.send(PlaybackCommand::Play).await
    }

    pub async fn pause(&self) -> Result<PlaybackStatus> {
        self.send(PlaybackCommand::Pause).await
    }

    pub async fn reset(&self) -> Result<PlaybackStatus> {
        self.send(PlaybackCommand::Reset).await
    }

    pub async fn step(&self, direction: Direction) -> Result<PlaybackStatus> {
        self.send(PlaybackCommand::Step(direction)).await
    }

    pub async fn seek(&self, index: usize) -> Result<PlaybackStatus> {
        self.send(PlaybackCommand::Seek(index)).await
    }

    pub async fn set_speed(&self, tier: SpeedTier) -> Result<PlaybackStatus> {
        self.send(PlaybackCommand::SetSpeed(tier)).await
    }

    /// Derived view data at the current cursor.
    pub async fn view(&self) -> Result<PlaybackView> {
        let (reply, response) = oneshot::channel();
        self.requests
            .send(Request::View(reply))
            .await
            .map_err(|_| Error::DriverClosed)?;
        response.await.map_err(|_| Error::DriverClosed)
    }

    /// Latest published status.
    pub fn status(&self) -> PlaybackStatus {
        self.status.borrow().clone()
    }

    /// Receiver that is notified on every status change.
    pub fn subscribe(&self) -> watch::Receiver<PlaybackStatus> {
        let mut status = self.status.clone();
        status.mark_unchanged();
        status
    }
}

/// Next tick deadline plus the epoch it belongs to.
fn schedule(playback: &Playback) -> Option<(Instant, u64)> {
    playback
        .interval()
        .map(|interval| (Instant::now() + interval, playback.epoch()))
}

async fn run(
    mut playback: Playback,
    mut inbox: mpsc::Receiver<Request>,
    publish: watch::Sender<PlaybackStatus>,
) {
    let mut pending = schedule(&playback);

    loop {
        let deadline = pending.map_or_else(Instant::now, |(at, _)| at);

        tokio::select! {
            request = inbox.recv() => {
                let Some(request) = request else { break };
                match request {
                    Request::Apply(command, reply) => {
                        let epoch = playback.epoch();
                        playback.apply(command);
                        tracing::debug!(
                            state = ?playback.state(),
                            cursor = playback.cursor(),
                            "playback command applied"
                        );
                        if playback.epoch() != epoch {
                            pending = schedule(&playback);
                        }
                        let status = PlaybackStatus::from(&playback);
                        publish.send_replace(status.clone());
                        let _ = reply.send(status);
                    }
                    Request::View(reply) => {
                        let _ = reply.send(playback.view());
                    }
                }
            }
            () = sleep_until(deadline), if pending.is_some() => {
                if let Some((_, epoch)) = pending.take() {
                    if playback.tick(epoch) {
                        tracing::trace!(cursor = playback.cursor(), "tick");
                        publish.send_replace(PlaybackStatus::from(&playback));
                    }
                    pending = schedule(&playback);
                }
            }
        }
    }

    tracing::debug!("playback driver stopped");
}
