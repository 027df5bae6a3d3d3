use std::time::Duration;

/// Options that control how remote graphs are fetched.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    pub timeout: Duration,
    pub verify_tls: bool,
    pub max_redirects: usize,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            verify_tls: true,
            max_redirects: 10,
        }
    }
}
