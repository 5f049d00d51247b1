//! Application state for the chatbot server

use parking_lot::RwLock;
use std::sync::Arc;

use crate::config::RagConfig;
use crate::workflow::SupportWorkflow;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// Configuration
    config: RagConfig,
    /// Empty until startup has finished building the workflow
    workflow: RwLock<Option<Arc<SupportWorkflow>>>,
}

impl AppState {
    /// Create state with no workflow yet
    pub fn new(config: RagConfig) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                workflow: RwLock::new(None),
            }),
        }
    }

    /// Create state around an already built workflow
    pub fn with_workflow(config: RagConfig, workflow: SupportWorkflow) -> Self {
        let state = Self::new(config);
        state.set_workflow(workflow);
        state
    }

    /// Get configuration
    pub fn config(&self) -> &RagConfig {
        &self.inner.config
    }

    /// Handle to the workflow, if initialized
    pub fn workflow(&self) -> Option<Arc<SupportWorkflow>> {
        self.inner.workflow.read().clone()
    }

    /// Publish the workflow; requests are served from here on
    pub fn set_workflow(&self, workflow: SupportWorkflow) {
        *self.inner.workflow.write() = Some(Arc::new(workflow));
    }

    /// Check if the workflow is ready
    pub fn is_initialized(&self) -> bool {
        self.inner.workflow.read().is_some()
    }
}
