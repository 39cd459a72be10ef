// SPDX-License-Identifier: GPL-3.0-only

//! CLI commands for the photo booth
//!
//! This module provides command-line functionality for:
//! - Running a timed session against a test pattern or image file
//! - Composing a strip from existing images
//! - Listing filters and overlays

use chrono::Local;
use photobooth::app::{AppModel, DeviceState};
use photobooth::backends::camera::{CameraProvider, ImageFileCamera, PatternCamera};
use photobooth::config::BoothConfig;
use photobooth::constants::SHOTS_PER_SESSION;
use photobooth::effects::{FilterCatalog, OverlayCatalog, Selection};
use photobooth::pipelines::{StillImage, StripCompositor, StripExporter, SystemDate};
use photobooth::session::SessionEvent;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Run one session and save the strip
pub fn run_session(
    image: Option<PathBuf>,
    filter: Option<String>,
    overlay: Option<String>,
    output: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = apply_overrides(BoothConfig::load_or_default(), filter, overlay, None, output)?;

    let provider: Arc<dyn CameraProvider> = match image {
        Some(path) => Arc::new(ImageFileCamera::new(path)),
        None => Arc::new(PatternCamera::default()),
    };

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async move {
        let mut app = AppModel::new(config, provider, Arc::new(SystemDate));

        let handle = match &app.device_state {
            DeviceState::Ready(active) => {
                println!("Using camera: {}", active.device.name);
                active.handle.clone()
            }
            DeviceState::Failed(e) => {
                return Err(format!("Camera unavailable: {}", e).into());
            }
        };

        // Ctrl+C abandons the session
        let cancelled = Arc::new(AtomicBool::new(false));
        let cancelled_clone = Arc::clone(&cancelled);
        ctrlc::set_handler(move || {
            cancelled_clone.store(true, Ordering::SeqCst);
            handle.reset();
        })?;

        let selection = app.selection;
        println!(
            "Filter: {}  Overlay: {}",
            selection.filter().name,
            selection.overlay().name
        );
        println!("Press Ctrl+C to cancel");
        println!();

        app.start_session()?;
        while let Some(event) = app.next_event().await {
            match event {
                SessionEvent::Countdown {
                    shot,
                    remaining,
                    prompt,
                } => {
                    print!("\rShot {}/{}: {}  ", shot + 1, SHOTS_PER_SESSION, remaining);
                    if let Some(prompt) = prompt {
                        print!("{}", prompt);
                    }
                    print!("{:20}", "");
                    std::io::stdout().flush()?;
                }
                SessionEvent::Captured { shot } => {
                    println!("\rShot {}/{}: captured{:40}", shot + 1, SHOTS_PER_SESSION, "");
                }
                SessionEvent::Review { .. } => break,
                SessionEvent::CaptureFailed(e) => return Err(e.into()),
                SessionEvent::Reset if cancelled.load(Ordering::SeqCst) => {
                    println!();
                    println!("Session cancelled");
                    return Ok(());
                }
                _ => {}
            }
        }

        let strip = app.compose_strip().await?;
        println!("Strip rendered: {}x{}", strip.width(), strip.height());
        let path = app.export_strip().await?;
        println!("Strip saved: {}", path.display());
        Ok::<(), Box<dyn std::error::Error>>(())
    })
}

/// Render a strip from three existing images
pub fn compose_files(
    inputs: &[PathBuf],
    filter: Option<String>,
    overlay: Option<String>,
    title: Option<String>,
    output: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = apply_overrides(
        BoothConfig::load_or_default(),
        filter,
        overlay,
        title,
        output,
    )?;

    let frames = inputs
        .iter()
        .map(|path| load_still(path))
        .collect::<Result<Vec<_>, _>>()?;

    let selection = Selection::from_ids(&config.default_filter, &config.default_overlay);
    let compositor = StripCompositor::new(config.strip_title.clone());
    let exporter = StripExporter::from_config(&config);
    let output_dir = config.output_dir();

    let runtime = tokio::runtime::Runtime::new()?;
    let path = runtime.block_on(async move {
        let frames = frames.into_iter().map(Arc::new).collect();
        let strip = compositor
            .render_async(
                frames,
                selection.filter().chain.clone(),
                selection.overlay().kind,
                Local::now().date_naive(),
            )
            .await?;
        let path = exporter.export(strip, output_dir).await?;
        Ok::<_, Box<dyn std::error::Error>>(path)
    })?;

    println!("Strip saved: {}", path.display());
    Ok(())
}

/// List all filters
pub fn list_filters() -> Result<(), Box<dyn std::error::Error>> {
    println!("Available filters:");
    println!();
    for filter in FilterCatalog::all() {
        println!("  {:<10} {:<10} {}", filter.id, filter.name, filter.chain.css());
    }
    Ok(())
}

/// List all overlays
pub fn list_overlays() -> Result<(), Box<dyn std::error::Error>> {
    println!("Available overlays:");
    println!();
    for overlay in OverlayCatalog::all() {
        println!("  {:<10} {}", overlay.id, overlay.name);
    }
    Ok(())
}

/// Fold command-line options into the loaded config
fn apply_overrides(
    mut config: BoothConfig,
    filter: Option<String>,
    overlay: Option<String>,
    title: Option<String>,
    output: Option<PathBuf>,
) -> Result<BoothConfig, Box<dyn std::error::Error>> {
    if let Some(id) = filter {
        if FilterCatalog::get(&id).is_none() {
            return Err(format!("Unknown filter '{}' (see 'photobooth filters')", id).into());
        }
        config.default_filter = id;
    }
    if let Some(id) = overlay {
        if OverlayCatalog::get(&id).is_none() {
            return Err(format!("Unknown overlay '{}' (see 'photobooth overlays')", id).into());
        }
        config.default_overlay = id;
    }
    if let Some(title) = title {
        config.strip_title = title;
    }
    if let Some(dir) = output {
        config.output_dir = Some(dir);
    }
    Ok(config)
}

fn load_still(path: &Path) -> Result<StillImage, Box<dyn std::error::Error>> {
    let image = image::open(path)
        .map_err(|e| format!("Failed to load '{}': {}", path.display(), e))?;
    Ok(image.to_rgba8())
}
