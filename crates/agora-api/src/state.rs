use crate::app::ChatApp;
use crate::config::Config;
use crate::session::SessionStore;
use std::sync::Arc;

/// Shared application state passed to all handlers
///
/// All resources are wrapped in Arc for efficient sharing across async
/// tasks. Cloning is cheap regardless of the app type.
pub struct AppState<A: ChatApp> {
    pub config: Arc<Config>,
    pub app: Arc<A>,
    pub sessions: Arc<SessionStore<A::Session>>,
}

impl<A: ChatApp> AppState<A> {
    pub fn new(config: Config, app: A) -> Self {
        Self {
            config: Arc::new(config),
            app: Arc::new(app),
            sessions: Arc::new(SessionStore::new()),
        }
    }
}

// derive(Clone) would demand A: Clone
impl<A: ChatApp> Clone for AppState<A> {
    fn clone(&self) -> Self {
        Self {
            config: Arc::clone(&self.config),
            app: Arc::clone(&self.app),
            sessions: Arc::clone(&self.sessions),
        }
    }
}
