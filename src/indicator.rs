use instant::Duration;

/// Percent per second the synthetic progress advances while loading.
pub const PROGRESS_RATE: f32 = 80.0;
/// Progress never reaches 100 on its own; only a finished load gets there.
pub const PROGRESS_CAP: f32 = 95.0;

/// Synthetic loading progress shown while the model is being acquired.
///
/// It is time-based and unrelated to the actual fetch.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LoadingIndicator {
    progress: f32,
    visible: bool,
}

impl LoadingIndicator {
    pub fn new() -> Self {
        Self {
            progress: 0.0,
            visible: true,
        }
    }

    pub fn advance(&mut self, dt: Duration) {
        if self.visible {
            self.progress = (self.progress + PROGRESS_RATE * dt.as_secs_f32()).min(PROGRESS_CAP);
        }
    }

    pub fn finish(&mut self) {
        self.progress = 100.0;
        self.visible = false;
    }

    /// Progress in percent.
    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }
}

impl Default for LoadingIndicator {
    fn default() -> Self {
        Self::new()
    }
}
