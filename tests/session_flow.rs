// SPDX-License-Identifier: GPL-3.0-only

//! End-to-end session scenarios driven on a paused clock

use chrono::NaiveDate;
use futures::StreamExt;
use photobooth::backends::camera::{FeedSender, LiveFeedSource, VideoFrame, VideoSource};
use photobooth::constants::PROMPTS;
use photobooth::effects::{FilterChain, OverlayKind};
use photobooth::pipelines::{StillImage, StripCompositor};
use photobooth::session::{
    SequenceController, SequenceTiming, SequentialPrompts, SessionDriver, SessionEvent,
};
use std::sync::Arc;

fn live_feed(rgba: [u8; 4]) -> (FeedSender, Arc<dyn VideoSource>) {
    let (sender, source) = LiveFeedSource::channel();
    sender.push(VideoFrame::solid(64, 48, rgba));
    (sender, Arc::new(source))
}

fn driver(
    source: Arc<dyn VideoSource>,
) -> (
    SessionDriver,
    photobooth::session::SessionHandle,
    futures::channel::mpsc::UnboundedReceiver<SessionEvent>,
) {
    let controller = SequenceController::new(
        SequenceTiming::default(),
        Box::new(SequentialPrompts::new(PROMPTS)),
    );
    SessionDriver::new(controller, source)
}

async fn wait_for_review(
    events: &mut futures::channel::mpsc::UnboundedReceiver<SessionEvent>,
) -> Vec<Arc<StillImage>> {
    loop {
        match events.next().await {
            Some(SessionEvent::Review { frames }) => return frames,
            Some(_) => {}
            None => panic!("driver stopped before review"),
        }
    }
}

#[tokio::test(start_paused = true)]
async fn test_restart_keeps_only_new_frames() {
    let (sender, source) = live_feed([255, 0, 0, 255]);
    let (driver, handle, mut events) = driver(source);
    let task = tokio::spawn(driver.run());

    handle.start();
    // Let the first shot complete, then abandon the session
    loop {
        if let Some(SessionEvent::Captured { shot: 0 }) = events.next().await {
            break;
        }
    }
    handle.reset();
    sender.push(VideoFrame::solid(64, 48, [0, 0, 255, 255]));
    handle.start();

    let frames = wait_for_review(&mut events).await;
    assert_eq!(frames.len(), 3);
    for frame in &frames {
        assert_eq!(frame.get_pixel(10, 10).0, [0, 0, 255, 255]);
    }

    handle.shutdown();
    let controller = task.await.unwrap();
    assert_eq!(controller.frames().len(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_session_frames_compose_into_strip() {
    let (_sender, source) = live_feed([40, 160, 90, 255]);
    let (driver, handle, mut events) = driver(source);
    tokio::spawn(driver.run());

    handle.start();
    let frames = wait_for_review(&mut events).await;

    let strip = StripCompositor::new("TEST")
        .render_async(
            frames,
            FilterChain::empty(),
            OverlayKind::None,
            NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(strip.dimensions(), (760, 1570));
    assert_eq!(strip.get_pixel(380, 285).0, [40, 160, 90, 255]);
}

#[tokio::test(start_paused = true)]
async fn test_source_lost_mid_session() {
    let (sender, source) = live_feed([255, 255, 255, 255]);
    let (driver, handle, mut events) = driver(source);
    tokio::spawn(driver.run());

    handle.start();
    loop {
        if let Some(SessionEvent::Captured { shot: 0 }) = events.next().await {
            break;
        }
    }
    drop(sender);

    let err = loop {
        match events.next().await {
            Some(SessionEvent::CaptureFailed(e)) => break e,
            Some(SessionEvent::Review { .. }) => panic!("review without three captures"),
            Some(_) => {}
            None => panic!("driver stopped"),
        }
    };
    assert_eq!(err, photobooth::errors::CaptureError::SourceUnavailable);
}
