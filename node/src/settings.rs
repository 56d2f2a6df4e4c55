//! Atomically swappable engine settings.

use crate::config::validate_settings;
use crate::NodeError;
use recount_types::EngineSettings;
use std::sync::{Arc, RwLock};
use tracing::info;

/// Process-wide handle to the current engine settings.
///
/// Components never hold onto a snapshot across operations; they take one
/// per batch run or per request, so a reload takes effect at the next
/// operation boundary without tearing anything mid-run.
#[derive(Clone)]
pub struct SettingsHandle {
    inner: Arc<RwLock<EngineSettings>>,
}

impl SettingsHandle {
    pub fn new(settings: EngineSettings) -> Self {
        Self {
            inner: Arc::new(RwLock::new(settings)),
        }
    }

    /// A copy of the current settings.
    pub fn snapshot(&self) -> EngineSettings {
        self.inner
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Atomically replace the settings. The update is validated first; an
    /// invalid settings set is rejected and the running one stays in place.
    pub fn replace(&self, settings: EngineSettings) -> Result<(), NodeError> {
        validate_settings(&settings)?;
        let mut guard = self
            .inner
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard = settings;
        info!("engine settings reloaded");
        Ok(())
    }
}
