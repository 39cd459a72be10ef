// SPDX-License-Identifier: GPL-3.0-only

//! Async session driver
//!
//! Owns a [`SequenceController`] and the single timer it may have pending.
//! Commands arrive over a tokio channel while the timer sleeps; session
//! progress goes out as [`SessionEvent`]s on a futures channel.

use super::{Phase, ScheduledStep, SequenceController, StepKind};
use crate::backends::camera::VideoSource;
use crate::errors::{CaptureError, SequenceError};
use crate::pipelines::StillImage;
use futures::channel::mpsc as events;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// Requests accepted by a running driver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionCommand {
    Start,
    Reset,
    Shutdown,
}

/// Progress reported by the driver
#[derive(Debug, Clone)]
pub enum SessionEvent {
    Started {
        generation: u64,
    },
    Countdown {
        shot: usize,
        remaining: u32,
        prompt: Option<&'static str>,
    },
    Captured {
        shot: usize,
    },
    FlashEnded,
    /// All three stills, in capture order
    Review {
        frames: Vec<Arc<StillImage>>,
    },
    CaptureFailed(CaptureError),
    Rejected(SequenceError),
    Reset,
}

/// Cloneable command sender for a driver
#[derive(Debug, Clone)]
pub struct SessionHandle {
    commands: mpsc::UnboundedSender<SessionCommand>,
}

impl SessionHandle {
    /// False once the driver has stopped
    pub fn send(&self, command: SessionCommand) -> bool {
        self.commands.send(command).is_ok()
    }

    pub fn start(&self) -> bool {
        self.send(SessionCommand::Start)
    }

    pub fn reset(&self) -> bool {
        self.send(SessionCommand::Reset)
    }

    pub fn shutdown(&self) -> bool {
        self.send(SessionCommand::Shutdown)
    }
}

/// Runs one controller against one video source
pub struct SessionDriver {
    controller: SequenceController,
    source: Arc<dyn VideoSource>,
    commands: mpsc::UnboundedReceiver<SessionCommand>,
    events: events::UnboundedSender<SessionEvent>,
}

impl SessionDriver {
    pub fn new(
        controller: SequenceController,
        source: Arc<dyn VideoSource>,
    ) -> (Self, SessionHandle, events::UnboundedReceiver<SessionEvent>) {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (event_tx, event_rx) = events::unbounded();
        let driver = Self {
            controller,
            source,
            commands: command_rx,
            events: event_tx,
        };
        (
            driver,
            SessionHandle {
                commands: command_tx,
            },
            event_rx,
        )
    }

    /// Process commands and timers until shutdown or every handle is dropped
    ///
    /// Returns the controller so callers can inspect the final state.
    pub async fn run(mut self) -> SequenceController {
        let mut pending: Option<(ScheduledStep, Instant)> = None;

        loop {
            let deadline = pending.map(|(_, at)| at);
            let timer = async move {
                match deadline {
                    Some(at) => tokio::time::sleep_until(at).await,
                    None => std::future::pending::<()>().await,
                }
            };

            tokio::select! {
                command = self.commands.recv() => {
                    match command {
                        None | Some(SessionCommand::Shutdown) => {
                            info!("Session driver stopping");
                            break;
                        }
                        Some(SessionCommand::Start) => match self.controller.start() {
                            Ok(step) => {
                                pending = Some((step, Instant::now() + step.delay));
                                self.emit(SessionEvent::Started {
                                    generation: self.controller.generation(),
                                });
                                self.emit_countdown();
                            }
                            Err(e) => self.emit(SessionEvent::Rejected(e)),
                        },
                        Some(SessionCommand::Reset) => {
                            self.controller.reset();
                            pending = None;
                            self.emit(SessionEvent::Reset);
                        }
                    }
                }
                _ = timer => {
                    let Some((step, at)) = pending.take() else {
                        continue;
                    };
                    match self.controller.fire(step, self.source.as_ref()) {
                        Ok(next) => {
                            // Chain from the scheduled instant so delays don't drift
                            pending = next.map(|n| (n, at + n.delay));
                            self.report(step.kind);
                        }
                        Err(e) => {
                            warn!(error = %e, "Session stalled after capture failure");
                            self.emit(SessionEvent::CaptureFailed(e));
                        }
                    }
                }
            }
        }

        self.controller
    }

    fn report(&self, fired: StepKind) {
        match fired {
            StepKind::Tick if self.controller.flash_active() => {
                self.emit(SessionEvent::Captured {
                    shot: self.controller.iteration(),
                });
            }
            StepKind::Tick | StepKind::Advance => self.emit_countdown(),
            StepKind::FlashEnd if self.controller.phase() == Phase::Review => {
                let frames = self
                    .controller
                    .frames()
                    .iter()
                    .map(|f| Arc::clone(&f.image))
                    .collect();
                self.emit(SessionEvent::Review { frames });
            }
            StepKind::FlashEnd => self.emit(SessionEvent::FlashEnded),
        }
    }

    fn emit_countdown(&self) {
        if let Some(remaining) = self.controller.countdown() {
            let prompt = if self.controller.prompt_visible() {
                self.controller.prompt()
            } else {
                None
            };
            self.emit(SessionEvent::Countdown {
                shot: self.controller.iteration(),
                remaining,
                prompt,
            });
        }
    }

    fn emit(&self, event: SessionEvent) {
        if self.events.unbounded_send(event).is_err() {
            debug!("No session event listener");
        }
    }
}
