// SPDX-License-Identifier: GPL-3.0-only

//! Capture session sequencing
//!
//! A session walks `Idle → Countdown → (capture × 3) → Review`. The
//! [`SequenceController`] is a plain state machine: every timer it needs is
//! handed back to the caller as a [`ScheduledStep`], and the caller returns
//! it through [`SequenceController::fire`] once the delay has elapsed.
//!
//! ```text
//!            start()
//!   Idle ─────────────▶ Countdown ──tick──▶ … ──0──▶ capture ─┐
//!    ▲                     ▲                                  │ flash
//!    │                     └────────── advance ◀──────────────┤
//!    │ reset()                                                │ 3rd shot
//!    └──────────────────────── Review ◀───────────────────────┘
//! ```
//!
//! Only one step is pending at a time. `start()` and `reset()` bump the
//! generation, so a step that was already sleeping when the session changed
//! is recognised as stale and dropped.

pub mod driver;

pub use driver::{SessionCommand, SessionDriver, SessionEvent, SessionHandle};

use crate::backends::camera::VideoSource;
use crate::config::TimingSettings;
use crate::constants::{PROMPTS, SHOTS_PER_SESSION, timing};
use crate::errors::{CaptureError, SequenceError};
use crate::pipelines::{FrameCapturer, StillImage};
use chrono::{DateTime, Local};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Session phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    /// Counting down to (or between) captures
    Countdown,
    /// All three photos taken
    Review,
}

/// What a scheduled step does when it fires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepKind {
    /// Decrement the countdown, capturing at zero
    Tick,
    /// Clear the flash; enters review after the last shot
    FlashEnd,
    /// Begin the next shot's countdown
    Advance,
}

/// A timer request from the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledStep {
    pub delay: Duration,
    pub kind: StepKind,
    pub generation: u64,
    pub sequence: u64,
}

/// Countdown and flash durations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequenceTiming {
    pub countdown_seconds: u32,
    pub tick: Duration,
    pub flash: Duration,
    /// Time from a capture to the next countdown, flash included
    pub settle: Duration,
}

impl Default for SequenceTiming {
    fn default() -> Self {
        Self {
            countdown_seconds: timing::COUNTDOWN_SECONDS,
            tick: Duration::from_millis(timing::TICK_MS),
            flash: Duration::from_millis(timing::FLASH_MS),
            settle: Duration::from_millis(timing::SETTLE_MS),
        }
    }
}

impl From<&TimingSettings> for SequenceTiming {
    fn from(settings: &TimingSettings) -> Self {
        Self {
            countdown_seconds: settings.countdown_seconds.max(1),
            tick: Duration::from_millis(settings.tick_ms),
            flash: Duration::from_millis(settings.flash_ms),
            settle: Duration::from_millis(settings.settle_ms.max(settings.flash_ms)),
        }
    }
}

/// Chooses the prompt shown during each countdown
pub trait PromptPicker: Send {
    fn pick(&mut self) -> &'static str;
}

/// Uniform random choice from a fixed list
#[derive(Debug, Clone)]
pub struct RandomPrompts {
    prompts: &'static [&'static str],
}

impl RandomPrompts {
    pub fn new(prompts: &'static [&'static str]) -> Self {
        Self { prompts }
    }
}

impl Default for RandomPrompts {
    fn default() -> Self {
        Self::new(PROMPTS)
    }
}

impl PromptPicker for RandomPrompts {
    fn pick(&mut self) -> &'static str {
        if self.prompts.is_empty() {
            return "";
        }
        // v4 UUIDs carry 122 random bits; the low 62 are all random
        let index = (uuid::Uuid::new_v4().as_u128() % self.prompts.len() as u128) as usize;
        self.prompts[index]
    }
}

/// Walks the list in order, wrapping around
#[derive(Debug, Clone)]
pub struct SequentialPrompts {
    prompts: &'static [&'static str],
    next: usize,
}

impl SequentialPrompts {
    pub fn new(prompts: &'static [&'static str]) -> Self {
        Self { prompts, next: 0 }
    }
}

impl PromptPicker for SequentialPrompts {
    fn pick(&mut self) -> &'static str {
        if self.prompts.is_empty() {
            return "";
        }
        let prompt = self.prompts[self.next % self.prompts.len()];
        self.next += 1;
        prompt
    }
}

/// One still taken during a session
#[derive(Debug, Clone)]
pub struct CapturedFrame {
    pub image: Arc<StillImage>,
    /// Position 0..3 within the session
    pub position: usize,
    pub captured_at: DateTime<Local>,
}

/// The capture sequencing state machine
pub struct SequenceController {
    timing: SequenceTiming,
    prompts: Box<dyn PromptPicker>,
    phase: Phase,
    iteration: usize,
    countdown: Option<u32>,
    prompt: Option<&'static str>,
    prompt_visible: bool,
    flash_active: bool,
    frames: Vec<CapturedFrame>,
    generation: u64,
    next_sequence: u64,
    pending: Option<ScheduledStep>,
    last_error: Option<CaptureError>,
}

impl SequenceController {
    pub fn new(timing: SequenceTiming, prompts: Box<dyn PromptPicker>) -> Self {
        Self {
            timing,
            prompts,
            phase: Phase::Idle,
            iteration: 0,
            countdown: None,
            prompt: None,
            prompt_visible: false,
            flash_active: false,
            frames: Vec::with_capacity(SHOTS_PER_SESSION),
            generation: 0,
            next_sequence: 0,
            pending: None,
            last_error: None,
        }
    }

    /// Begin a new session
    ///
    /// Discards any previous frames and returns the first countdown tick.
    pub fn start(&mut self) -> Result<ScheduledStep, SequenceError> {
        if self.phase != Phase::Idle {
            warn!(phase = ?self.phase, "Start requested outside idle");
            return Err(SequenceError::NotIdle);
        }

        self.generation += 1;
        self.frames.clear();
        self.last_error = None;
        self.phase = Phase::Countdown;
        info!(generation = self.generation, "Session started");
        Ok(self.begin_shot(0))
    }

    /// Return to idle from any phase, dropping the session
    pub fn reset(&mut self) {
        self.generation += 1;
        self.frames.clear();
        self.pending = None;
        self.iteration = 0;
        self.countdown = None;
        self.prompt = None;
        self.prompt_visible = false;
        self.flash_active = false;
        self.last_error = None;
        self.phase = Phase::Idle;
        info!(generation = self.generation, "Session reset");
    }

    /// Apply a step whose delay has elapsed
    ///
    /// Stale steps are ignored and yield `Ok(None)`. A failed capture leaves
    /// the session stalled in countdown with nothing scheduled; only
    /// [`reset`](Self::reset) recovers.
    pub fn fire(
        &mut self,
        step: ScheduledStep,
        source: &dyn VideoSource,
    ) -> Result<Option<ScheduledStep>, CaptureError> {
        if !self.is_current(&step) {
            debug!(
                kind = ?step.kind,
                generation = step.generation,
                current = self.generation,
                "Discarding stale step"
            );
            return Ok(None);
        }
        self.pending = None;

        match step.kind {
            StepKind::Tick => self.tick(source),
            StepKind::FlashEnd => Ok(self.end_flash()),
            StepKind::Advance => Ok(Some(self.begin_shot(self.iteration + 1))),
        }
    }

    /// Whether `step` is the one currently pending
    pub fn is_current(&self, step: &ScheduledStep) -> bool {
        self.pending
            .is_some_and(|p| p.generation == step.generation && p.sequence == step.sequence)
    }

    fn begin_shot(&mut self, iteration: usize) -> ScheduledStep {
        self.iteration = iteration;
        let prompt = self.prompts.pick();
        self.prompt = Some(prompt);
        self.countdown = Some(self.timing.countdown_seconds);
        self.prompt_visible = self.timing.countdown_seconds > 1;
        self.flash_active = false;
        info!(shot = iteration + 1, prompt, "Countdown started");
        self.schedule(StepKind::Tick, self.timing.tick)
    }

    fn tick(&mut self, source: &dyn VideoSource) -> Result<Option<ScheduledStep>, CaptureError> {
        let remaining = self.countdown.unwrap_or(1).saturating_sub(1);

        if remaining > 0 {
            self.countdown = Some(remaining);
            self.prompt_visible = remaining > 1;
            debug!(remaining, "Countdown tick");
            return Ok(Some(self.schedule(StepKind::Tick, self.timing.tick)));
        }

        self.countdown = Some(0);
        self.prompt_visible = false;

        let image = match FrameCapturer::capture(source) {
            Ok(image) => image,
            Err(e) => {
                warn!(shot = self.iteration + 1, error = %e, "Capture failed, session stalled");
                self.last_error = Some(e.clone());
                return Err(e);
            }
        };

        self.frames.push(CapturedFrame {
            image: Arc::new(image),
            position: self.iteration,
            captured_at: Local::now(),
        });
        self.countdown = None;
        self.flash_active = true;
        info!(
            shot = self.iteration + 1,
            total = SHOTS_PER_SESSION,
            "Photo captured"
        );
        Ok(Some(self.schedule(StepKind::FlashEnd, self.timing.flash)))
    }

    fn end_flash(&mut self) -> Option<ScheduledStep> {
        self.flash_active = false;

        if self.frames.len() >= SHOTS_PER_SESSION {
            self.phase = Phase::Review;
            self.prompt = None;
            self.countdown = None;
            info!(frames = self.frames.len(), "Session complete, entering review");
            return None;
        }

        let rest = self.timing.settle.saturating_sub(self.timing.flash);
        Some(self.schedule(StepKind::Advance, rest))
    }

    fn schedule(&mut self, kind: StepKind, delay: Duration) -> ScheduledStep {
        self.next_sequence += 1;
        let step = ScheduledStep {
            delay,
            kind,
            generation: self.generation,
            sequence: self.next_sequence,
        };
        self.pending = Some(step);
        step
    }

    // ===== Observable state =====

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Zero-based shot index of the current or last countdown
    pub fn iteration(&self) -> usize {
        self.iteration
    }

    /// Number shown on screen, if a countdown is running
    pub fn countdown(&self) -> Option<u32> {
        self.countdown
    }

    pub fn prompt(&self) -> Option<&'static str> {
        self.prompt
    }

    pub fn prompt_visible(&self) -> bool {
        self.prompt_visible && self.prompt.is_some()
    }

    pub fn flash_active(&self) -> bool {
        self.flash_active
    }

    pub fn frames(&self) -> &[CapturedFrame] {
        &self.frames
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn pending(&self) -> Option<ScheduledStep> {
        self.pending
    }

    pub fn last_error(&self) -> Option<&CaptureError> {
        self.last_error.as_ref()
    }

    /// In countdown with nothing scheduled (a capture failed)
    pub fn is_stalled(&self) -> bool {
        self.phase == Phase::Countdown && self.pending.is_none()
    }

    /// The three stills, in order, once the session is in review
    pub fn strip_frames(&self) -> Result<Vec<Arc<StillImage>>, SequenceError> {
        if self.phase != Phase::Review {
            return Err(SequenceError::NotInReview);
        }
        Ok(self.frames.iter().map(|f| Arc::clone(&f.image)).collect())
    }
}

impl Default for SequenceController {
    fn default() -> Self {
        Self::new(SequenceTiming::default(), Box::new(RandomPrompts::default()))
    }
}

impl std::fmt::Debug for SequenceController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SequenceController")
            .field("phase", &self.phase)
            .field("iteration", &self.iteration)
            .field("countdown", &self.countdown)
            .field("frames", &self.frames.len())
            .field("generation", &self.generation)
            .field("pending", &self.pending)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::camera::{LiveFeedSource, PatternSource, VideoFrame};

    fn controller() -> SequenceController {
        SequenceController::new(
            SequenceTiming::default(),
            Box::new(SequentialPrompts::new(PROMPTS)),
        )
    }

    /// Fire steps until nothing is scheduled, returning the elapsed time
    fn run(
        controller: &mut SequenceController,
        mut step: ScheduledStep,
        source: &dyn VideoSource,
    ) -> Duration {
        let mut elapsed = step.delay;
        while let Some(next) = controller.fire(step, source).unwrap() {
            elapsed += next.delay;
            step = next;
        }
        elapsed
    }

    #[test]
    fn test_full_session_reaches_review() {
        let mut controller = controller();
        let source = PatternSource::rgb(8, 6);
        let first = controller.start().unwrap();
        assert_eq!(controller.phase(), Phase::Countdown);

        let elapsed = run(&mut controller, first, &source);
        assert_eq!(controller.phase(), Phase::Review);
        assert_eq!(controller.frames().len(), 3);
        assert!(!controller.flash_active());
        assert!(controller.pending().is_none());
        // Three 3s countdowns, two 1s settles, one final flash
        assert_eq!(elapsed, Duration::from_millis(11_150));

        let positions: Vec<_> = controller.frames().iter().map(|f| f.position).collect();
        assert_eq!(positions, vec![0, 1, 2]);
        // Pattern cycles red, green, blue
        assert_eq!(controller.frames()[0].image.get_pixel(0, 0).0, [255, 0, 0, 255]);
        assert_eq!(controller.frames()[2].image.get_pixel(0, 0).0, [0, 0, 255, 255]);
    }

    #[test]
    fn test_countdown_and_prompt_visibility() {
        let mut controller = controller();
        let source = PatternSource::rgb(8, 6);
        let step = controller.start().unwrap();
        assert_eq!(controller.countdown(), Some(3));
        assert_eq!(controller.prompt(), Some(PROMPTS[0]));
        assert!(controller.prompt_visible());
        assert_eq!(step.kind, StepKind::Tick);
        assert_eq!(step.delay, Duration::from_secs(1));

        let step = controller.fire(step, &source).unwrap().unwrap();
        assert_eq!(controller.countdown(), Some(2));
        assert!(controller.prompt_visible());

        let step = controller.fire(step, &source).unwrap().unwrap();
        assert_eq!(controller.countdown(), Some(1));
        assert!(!controller.prompt_visible());

        let step = controller.fire(step, &source).unwrap().unwrap();
        assert_eq!(step.kind, StepKind::FlashEnd);
        assert_eq!(step.delay, Duration::from_millis(150));
        assert!(controller.flash_active());
        assert_eq!(controller.frames().len(), 1);

        let step = controller.fire(step, &source).unwrap().unwrap();
        assert_eq!(step.kind, StepKind::Advance);
        assert_eq!(step.delay, Duration::from_millis(850));
        assert!(!controller.flash_active());

        controller.fire(step, &source).unwrap().unwrap();
        assert_eq!(controller.iteration(), 1);
        assert_eq!(controller.countdown(), Some(3));
        assert_eq!(controller.prompt(), Some(PROMPTS[1]));
    }

    #[test]
    fn test_start_outside_idle_fails() {
        let mut controller = controller();
        controller.start().unwrap();
        assert_eq!(controller.start().unwrap_err(), SequenceError::NotIdle);
    }

    #[test]
    fn test_reset_discards_in_flight_step() {
        let mut controller = controller();
        let source = PatternSource::rgb(8, 6);
        let stale = controller.start().unwrap();
        controller.reset();
        assert_eq!(controller.phase(), Phase::Idle);

        let fresh = controller.start().unwrap();
        // The old tick fires late and must not advance the new session
        assert_eq!(controller.fire(stale, &source).unwrap(), None);
        assert_eq!(controller.countdown(), Some(3));
        assert!(controller.is_current(&fresh));

        run(&mut controller, fresh, &source);
        assert_eq!(controller.frames().len(), 3);
    }

    #[test]
    fn test_step_fires_only_once() {
        let mut controller = controller();
        let source = PatternSource::rgb(8, 6);
        let step = controller.start().unwrap();
        controller.fire(step, &source).unwrap();
        assert_eq!(controller.fire(step, &source).unwrap(), None);
        assert_eq!(controller.countdown(), Some(2));
    }

    #[test]
    fn test_capture_failure_stalls_session() {
        let mut controller = controller();
        let (_sender, source) = LiveFeedSource::channel();
        let mut step = controller.start().unwrap();
        for _ in 0..2 {
            step = controller.fire(step, &source).unwrap().unwrap();
        }

        let err = controller.fire(step, &source).unwrap_err();
        assert_eq!(err, CaptureError::NotReady);
        assert_eq!(controller.phase(), Phase::Countdown);
        assert!(controller.is_stalled());
        assert!(controller.frames().is_empty());
        assert_eq!(controller.last_error(), Some(&CaptureError::NotReady));

        controller.reset();
        assert!(controller.last_error().is_none());
        assert!(controller.start().is_ok());
    }

    #[test]
    fn test_new_session_replaces_frames() {
        let mut controller = controller();
        let (sender, source) = LiveFeedSource::channel();
        sender.push(VideoFrame::solid(4, 3, [1, 1, 1, 255]));
        let step = controller.start().unwrap();
        run(&mut controller, step, &source);
        assert_eq!(controller.phase(), Phase::Review);

        controller.reset();
        sender.push(VideoFrame::solid(4, 3, [9, 9, 9, 255]));
        let step = controller.start().unwrap();
        run(&mut controller, step, &source);
        assert!(
            controller
                .frames()
                .iter()
                .all(|f| f.image.get_pixel(0, 0).0 == [9, 9, 9, 255])
        );
    }

    #[test]
    fn test_strip_frames_requires_review() {
        let mut controller = controller();
        assert_eq!(
            controller.strip_frames().unwrap_err(),
            SequenceError::NotInReview
        );
        let source = PatternSource::rgb(8, 6);
        let step = controller.start().unwrap();
        run(&mut controller, step, &source);
        assert_eq!(controller.strip_frames().unwrap().len(), 3);
    }

    #[test]
    fn test_timing_from_settings() {
        let settings = TimingSettings {
            countdown_seconds: 0,
            tick_ms: 10,
            flash_ms: 50,
            settle_ms: 20,
        };
        let timing = SequenceTiming::from(&settings);
        assert_eq!(timing.countdown_seconds, 1);
        assert_eq!(timing.settle, Duration::from_millis(50));
    }

    #[test]
    fn test_random_prompt_is_from_list() {
        let mut picker = RandomPrompts::default();
        for _ in 0..20 {
            assert!(PROMPTS.contains(&picker.pick()));
        }
    }
}
