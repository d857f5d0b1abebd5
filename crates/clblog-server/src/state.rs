use std::sync::Arc;

use clblog_content::Blog;

use crate::auth::{AuthProvider, TokenAuth};

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub blog: Arc<Blog>,
    pub auth: Arc<dyn AuthProvider>,
}

impl AppState {
    /// State with bearer-token authentication against `blog`'s users.
    pub fn new(blog: Arc<Blog>) -> Self {
        let auth = Arc::new(TokenAuth::new(Arc::clone(&blog)));
        Self { blog, auth }
    }

    pub fn with_auth(blog: Arc<Blog>, auth: Arc<dyn AuthProvider>) -> Self {
        Self { blog, auth }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Arc::new(Blog::new()))
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState").field("blog", &self.blog).finish()
    }
}
