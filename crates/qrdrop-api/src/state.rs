//! Application state shared by every handler.

use crate::auth::SessionResolver;
use crate::services::HandoffService;
use qrdrop_core::Config;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub handoff: HandoffService,
    pub sessions: Arc<dyn SessionResolver>,
}
