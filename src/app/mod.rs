// SPDX-License-Identifier: MPL-2.0

//! Booth application model
//!
//! Ties the pieces together the way a front end would use them: open the
//! camera once, run a session driver against it, mirror its events into a
//! [`SessionView`], and render/export the strip once the session reaches
//! review.
//!
//! # Architecture
//!
//! - `state`: Application state types (AppModel, DeviceState, SessionView)
//! - `handlers`: Session, effect selection and strip operations
//!
//! A camera failure at startup puts the model in [`DeviceState::Failed`].
//! Nothing else works until [`AppModel::reload`] succeeds.

mod handlers;
mod state;

pub use handlers::strip::PreviewStyle;
pub use state::{ActiveDevice, AppModel, DeviceState, SessionView};

use crate::backends::camera::{CameraProvider, VideoSource};
use crate::config::BoothConfig;
use crate::effects::Selection;
use crate::pipelines::{DateSource, StripCompositor, StripExporter};
use crate::session::{RandomPrompts, SequenceController, SequenceTiming, SessionDriver};
use std::sync::Arc;
use tracing::{error, info};

impl AppModel {
    /// Build the model and try to open the camera
    ///
    /// Must be called from within a tokio runtime; the session driver is
    /// spawned onto it.
    pub fn new(
        config: BoothConfig,
        provider: Arc<dyn CameraProvider>,
        dates: Arc<dyn DateSource>,
    ) -> Self {
        let selection = Selection::from_ids(&config.default_filter, &config.default_overlay);
        let compositor = StripCompositor::new(config.strip_title.clone());
        let exporter = StripExporter::from_config(&config);
        let device_state = Self::open_device(&config, provider.as_ref());

        Self {
            config,
            device_state,
            session: SessionView::default(),
            selection,
            strip: None,
            last_export: None,
            provider,
            compositor,
            exporter,
            dates,
            pending_resets: 0,
        }
    }

    /// Reacquire the camera from scratch, discarding all session state
    pub fn reload(&mut self) -> bool {
        info!("Reloading booth");
        self.shutdown_driver();
        self.session = SessionView::default();
        self.selection =
            Selection::from_ids(&self.config.default_filter, &self.config.default_overlay);
        self.strip = None;
        self.last_export = None;
        self.pending_resets = 0;
        self.device_state = Self::open_device(&self.config, self.provider.as_ref());
        self.device_state.is_ready()
    }

    /// Stop the session driver, if one is running
    pub fn shutdown_driver(&mut self) {
        if let DeviceState::Ready(active) = &self.device_state {
            active.handle.shutdown();
            active.driver.abort();
        }
    }

    fn open_device(config: &BoothConfig, provider: &dyn CameraProvider) -> DeviceState {
        let device = provider.device();
        info!(name = %device.name, path = %device.path, "Opening camera");

        match provider.open(config.camera_resolution) {
            Ok(source) => {
                let source: Arc<dyn VideoSource> = Arc::from(source);
                let (width, height) = source.intrinsic_size();
                info!(width, height, "Camera ready");

                let controller = SequenceController::new(
                    SequenceTiming::from(&config.timing),
                    Box::new(RandomPrompts::default()),
                );
                let (driver, handle, events) = SessionDriver::new(controller, Arc::clone(&source));
                DeviceState::Ready(ActiveDevice {
                    device,
                    source,
                    handle,
                    events,
                    driver: tokio::spawn(driver.run()),
                })
            }
            Err(e) => {
                error!(error = %e, "Camera unavailable");
                DeviceState::Failed(e)
            }
        }
    }
}

impl Drop for AppModel {
    fn drop(&mut self) {
        self.shutdown_driver();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::camera::PatternCamera;
    use crate::errors::DeviceError;
    use crate::pipelines::FixedDate;
    use chrono::NaiveDate;

    fn dates() -> Arc<dyn DateSource> {
        Arc::new(FixedDate(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()))
    }

    #[tokio::test]
    async fn test_denied_camera_blocks_until_reload() {
        let provider = Arc::new(PatternCamera {
            deny_permission: true,
        });
        let mut app = AppModel::new(BoothConfig::default(), provider, dates());
        assert!(matches!(
            app.device_state.error(),
            Some(DeviceError::PermissionDenied(_))
        ));
        assert!(app.start_session().is_err());

        // Same provider still refuses
        assert!(!app.reload());

        app.provider = Arc::new(PatternCamera::default());
        assert!(app.reload());
        assert!(app.device_state.is_ready());
    }

    #[tokio::test]
    async fn test_config_selects_defaults() {
        let config = BoothConfig {
            default_filter: "sepia".to_string(),
            default_overlay: "hearts".to_string(),
            ..Default::default()
        };
        let app = AppModel::new(config, Arc::new(PatternCamera::default()), dates());
        assert_eq!(app.selection.filter().id, "sepia");
        assert_eq!(app.selection.overlay().id, "hearts");
    }
}
