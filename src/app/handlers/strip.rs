// SPDX-License-Identifier: GPL-3.0-only

//! Effect selection, strip rendering and export

use crate::app::state::AppModel;
use crate::errors::{AppResult, SequenceError};
use crate::pipelines::StillImage;
use crate::session::Phase;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

/// CSS the live preview applies so it matches the rendered strip
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewStyle {
    pub filter: String,
    pub overlay: Option<String>,
    pub transform: Option<&'static str>,
}

impl AppModel {
    /// Choose a filter; the last choice wins
    pub fn select_filter(&mut self, id: &str) -> bool {
        if !self.selection.select_filter(id) {
            warn!(id, "Unknown filter");
            return false;
        }
        info!(id, "Filter selected");
        self.strip = None;
        true
    }

    /// Choose an overlay; the last choice wins
    pub fn select_overlay(&mut self, id: &str) -> bool {
        if !self.selection.select_overlay(id) {
            warn!(id, "Unknown overlay");
            return false;
        }
        info!(id, "Overlay selected");
        self.strip = None;
        true
    }

    pub fn preview_style(&self) -> PreviewStyle {
        PreviewStyle {
            filter: self.selection.filter().chain.css(),
            overlay: self.selection.overlay().kind.preview_css(),
            transform: self.config.mirror_preview.then_some("scaleX(-1)"),
        }
    }

    /// Render the strip for the session under review
    pub async fn compose_strip(&mut self) -> AppResult<Arc<StillImage>> {
        if self.session.phase != Phase::Review {
            return Err(SequenceError::NotInReview.into());
        }

        let strip = self
            .compositor
            .render_async(
                self.session.frames.clone(),
                self.selection.filter().chain.clone(),
                self.selection.overlay().kind,
                self.dates.today(),
            )
            .await?;

        let strip = Arc::new(strip);
        self.strip = Some(Arc::clone(&strip));
        Ok(strip)
    }

    /// Save the strip to the configured output directory
    ///
    /// Renders first if the current selection has not been rendered yet.
    pub async fn export_strip(&mut self) -> AppResult<PathBuf> {
        let strip = match self.strip.clone() {
            Some(strip) => strip,
            None => self.compose_strip().await?,
        };

        let output_dir = self.config.output_dir();
        let path = self
            .exporter
            .export(Arc::unwrap_or_clone(strip), output_dir)
            .await?;
        self.last_export = Some(path.clone());
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::camera::PatternCamera;
    use crate::config::BoothConfig;
    use crate::errors::AppError;
    use crate::pipelines::FixedDate;
    use chrono::NaiveDate;

    fn app(config: BoothConfig) -> AppModel {
        AppModel::new(
            config,
            Arc::new(PatternCamera::default()),
            Arc::new(FixedDate(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap())),
        )
    }

    async fn run_to_review(app: &mut AppModel) {
        app.start_session().unwrap();
        while app.session.phase != Phase::Review {
            app.next_event().await.unwrap();
        }
    }

    #[tokio::test]
    async fn test_compose_requires_review() {
        let mut app = app(BoothConfig::default());
        assert!(matches!(
            app.compose_strip().await,
            Err(AppError::Sequence(SequenceError::NotInReview))
        ));
    }

    #[tokio::test]
    async fn test_selection_invalidates_strip() {
        let mut app = app(BoothConfig::default());
        assert!(!app.select_filter("nope"));
        assert!(app.select_filter("bw"));
        assert!(app.select_filter("sepia"));
        assert_eq!(app.selection.filter().id, "sepia");
        assert!(app.select_overlay("vignette"));
        assert!(app.strip.is_none());

        let style = app.preview_style();
        assert_ne!(style.filter, "none");
        assert!(style.overlay.is_some());
        assert_eq!(style.transform, Some("scaleX(-1)"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_new_session_discards_reviewed_frames() {
        let mut app = app(BoothConfig::default());
        run_to_review(&mut app).await;
        let old = app.session.frames.clone();

        app.new_session().unwrap();
        assert_eq!(app.session.phase, Phase::Idle);
        assert!(app.session.frames.is_empty());
        assert!(matches!(
            app.compose_strip().await,
            Err(AppError::Sequence(SequenceError::NotInReview))
        ));
        assert!(matches!(
            app.export_strip().await,
            Err(AppError::Sequence(SequenceError::NotInReview))
        ));

        while app.session.phase != Phase::Review {
            app.next_event().await.unwrap();
        }
        assert_eq!(app.session.frames.len(), 3);
        for (new, old) in app.session.frames.iter().zip(&old) {
            assert!(!Arc::ptr_eq(new, old));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_session_to_export() {
        let dir = std::env::temp_dir().join(format!("photobooth-app-{}", uuid::Uuid::new_v4()));
        let config = BoothConfig {
            output_dir: Some(dir.clone()),
            ..Default::default()
        };
        let mut app = app(config);
        run_to_review(&mut app).await;

        let strip = app.compose_strip().await.unwrap();
        assert_eq!(strip.dimensions(), (760, 1570));

        let path = app.export_strip().await.unwrap();
        assert!(path.starts_with(&dir));
        assert_eq!(app.last_export.as_ref(), Some(&path));
        let _ = std::fs::remove_dir_all(&dir);
    }
}
