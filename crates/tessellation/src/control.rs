//! Cancellation and progress reporting for long generations.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use litho_kernel::{LithoError, Result};

/// Progress callback: stage name and completed fraction in `[0, 1]`.
pub type ProgressCallback = Box<dyn Fn(&str, f32) + Send + Sync>;

/// Shared flag a caller flips to stop a running generation.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Optional cancel token and progress sink for one generation request.
#[derive(Default)]
pub struct GenerationControl {
    cancel: Option<CancelToken>,
    progress: Option<ProgressCallback>,
}

impl fmt::Debug for GenerationControl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenerationControl")
            .field("cancel", &self.cancel)
            .field("progress", &self.progress.is_some())
            .finish()
    }
}

impl GenerationControl {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cancel(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn with_progress(mut self, on_progress: impl Fn(&str, f32) + Send + Sync + 'static) -> Self {
        self.progress = Some(Box::new(on_progress));
        self
    }

    /// Fail with [`LithoError::Cancelled`] once the token is set.
    pub fn checkpoint(&self) -> Result<()> {
        match &self.cancel {
            Some(token) if token.is_cancelled() => Err(LithoError::Cancelled),
            _ => Ok(()),
        }
    }

    pub fn report(&self, stage: &str, fraction: f32) {
        if let Some(on_progress) = &self.progress {
            on_progress(stage, fraction.clamp(0.0, 1.0));
        }
    }
}
