//! Aggregate loading progress.

/// Snapshot of how many registered assets have finished loading.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Progress {
    pub loaded: usize,
    pub total: usize,
}

impl Progress {
    /// Fraction of assets loaded in [0, 1]. Nothing to load counts as done.
    pub fn ratio(&self) -> f32 {
        if self.total == 0 {
            return 1.0;
        }
        self.loaded.min(self.total) as f32 / self.total as f32
    }

    pub fn is_complete(&self) -> bool {
        self.loaded >= self.total
    }
}

/// Counts finished assets. Every asset is registered up front so the ratio
/// only reaches 1 once, after the last one.
#[derive(Debug)]
pub struct LoadingManager {
    total: usize,
    loaded: usize,
}

impl LoadingManager {
    pub fn new(total: usize) -> Self {
        Self { total, loaded: 0 }
    }

    /// Mark one asset as loaded. Extra calls past `total` are ignored.
    pub fn item_loaded(&mut self) -> Progress {
        if self.loaded < self.total {
            self.loaded += 1;
        } else {
            log::warn!(
                "More assets reported loaded than were registered ({})",
                self.total
            );
        }
        self.progress()
    }

    pub fn progress(&self) -> Progress {
        Progress {
            loaded: self.loaded,
            total: self.total,
        }
    }
}
