use std::sync::Arc;

use anyhow::Result;
use calmanage_core::{Dispatcher, EngineConfig};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    // Built once at startup; the dispatcher is immutable
    dispatcher: Arc<Dispatcher>,
}

impl AppState {
    pub fn new(config: &EngineConfig) -> Result<Self> {
        let dispatcher = Dispatcher::from_config(config)?;
        Ok(Self::from_dispatcher(dispatcher))
    }

    pub fn from_dispatcher(dispatcher: Dispatcher) -> Self {
        AppState {
            dispatcher: Arc::new(dispatcher),
        }
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }
}
