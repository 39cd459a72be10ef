// SPDX-License-Identifier: GPL-3.0-only

//! Session handlers
//!
//! Forwards start/reset to the driver and folds its events into the view.

use crate::app::state::{ActiveDevice, AppModel, DeviceState, SessionView};
use crate::errors::{AppError, AppResult, SequenceError};
use crate::session::{Phase, SessionEvent};
use futures::StreamExt;
use tracing::{debug, error, info, warn};

impl AppModel {
    fn active(&self) -> AppResult<&ActiveDevice> {
        match &self.device_state {
            DeviceState::Ready(active) => Ok(active),
            DeviceState::Failed(e) => Err(AppError::Device(e.clone())),
        }
    }

    /// Ask the driver to begin a session
    ///
    /// The driver rejects this outside idle; the rejection arrives as an
    /// event and lands in [`SessionView::rejected`].
    pub fn start_session(&mut self) -> AppResult<()> {
        if !self.active()?.handle.start() {
            error!("Session driver stopped; start not delivered");
            return Err(SequenceError::DriverStopped.into());
        }
        self.session.rejected = None;
        self.strip = None;
        info!("Session start requested");
        Ok(())
    }

    /// Abandon the current session
    ///
    /// The view is cleared right away. Events the driver sent before it
    /// saw the reset are dropped when they arrive.
    pub fn reset_session(&mut self) -> AppResult<()> {
        if !self.active()?.handle.reset() {
            error!("Session driver stopped; reset not delivered");
            return Err(SequenceError::DriverStopped.into());
        }
        self.pending_resets += 1;
        self.session = SessionView::default();
        self.strip = None;
        info!("Session reset requested");
        Ok(())
    }

    /// Reset, then start over
    pub fn new_session(&mut self) -> AppResult<()> {
        self.reset_session()?;
        self.start_session()
    }

    /// Wait for the next driver event and apply it
    ///
    /// Returns `None` when there is no camera or the driver has stopped.
    pub async fn next_event(&mut self) -> Option<SessionEvent> {
        let DeviceState::Ready(active) = &mut self.device_state else {
            return None;
        };
        let event = active.events.next().await?;
        self.apply_event(&event);
        Some(event)
    }

    /// Fold one driver event into the view
    pub fn apply_event(&mut self, event: &SessionEvent) {
        if self.pending_resets > 0 {
            if let SessionEvent::Reset = event {
                self.pending_resets -= 1;
            } else {
                debug!("Dropping event from a superseded session");
            }
            return;
        }

        let view = &mut self.session;
        match event {
            SessionEvent::Started { generation } => {
                debug!(generation, "Session started");
                *view = SessionView {
                    phase: Phase::Countdown,
                    ..SessionView::default()
                };
                self.strip = None;
            }
            SessionEvent::Countdown {
                shot,
                remaining,
                prompt,
            } => {
                view.phase = Phase::Countdown;
                view.shot = *shot;
                view.countdown = Some(*remaining);
                view.prompt = *prompt;
                view.flash_active = false;
            }
            SessionEvent::Captured { shot } => {
                view.shot = *shot;
                view.countdown = None;
                view.prompt = None;
                view.flash_active = true;
                view.captured = shot + 1;
            }
            SessionEvent::FlashEnded => {
                view.flash_active = false;
            }
            SessionEvent::Review { frames } => {
                view.phase = Phase::Review;
                view.flash_active = false;
                view.countdown = None;
                view.prompt = None;
                view.captured = frames.len();
                view.frames = frames.clone();
                info!(frames = frames.len(), "Session ready for review");
            }
            SessionEvent::CaptureFailed(e) => {
                warn!(error = %e, "Capture failed; reset to try again");
                view.countdown = None;
                view.prompt = None;
                view.capture_error = Some(e.clone());
            }
            SessionEvent::Rejected(e) => {
                warn!(error = %e, "Session request rejected");
                view.rejected = Some(e.clone());
            }
            SessionEvent::Reset => {
                *view = SessionView::default();
                self.strip = None;
            }
        }
    }
}
