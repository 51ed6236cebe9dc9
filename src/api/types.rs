//! Shared types for the dashboard router.

use std::sync::Arc;

use crate::config::ChartSettings;
use crate::pipeline::analysis::MeetingAnalyzer;
use crate::session::Session;

// ═══════════════════════════════════════════════════════════
// API context: shared state for the dashboard router
// ═══════════════════════════════════════════════════════════

/// Shared context for all routes and middleware.
#[derive(Clone)]
pub struct ApiContext {
    pub session: Arc<Session>,
    pub analyzer: Arc<MeetingAnalyzer>,
    pub chart: ChartSettings,
}

impl ApiContext {
    pub fn new(session: Arc<Session>, analyzer: Arc<MeetingAnalyzer>, chart: ChartSettings) -> Self {
        Self {
            session,
            analyzer,
            chart,
        }
    }
}
