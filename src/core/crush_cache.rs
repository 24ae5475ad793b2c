// Copyright @yucwang 2026

/// A value derived for one instant of scene time.
#[derive(Debug, Clone)]
pub struct CrushCache<T> {
    cached_value: Option<T>,
    valid_for_time: Option<f64>,
}

impl<T> Default for CrushCache<T> {
    fn default() -> Self {
        Self { cached_value: None, valid_for_time: None }
    }
}

impl<T> CrushCache<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_valid_for(&self, time: f64) -> bool {
        self.cached_value.is_some() && self.valid_for_time == Some(time)
    }

    pub fn get(&self) -> Option<&T> {
        self.cached_value.as_ref()
    }

    pub fn store(&mut self, time: f64, value: T) {
        self.cached_value = Some(value);
        self.valid_for_time = Some(time);
    }

    pub fn invalidate(&mut self) {
        self.cached_value = None;
        self.valid_for_time = None;
    }

    /// Rebuilds with `build` unless the cache already holds `time`.
    /// Returns true when a rebuild happened.
    pub fn refresh_with<F: FnOnce() -> T>(&mut self, time: f64, build: F) -> bool {
        if self.is_valid_for(time) {
            return false;
        }
        self.store(time, build());
        true
    }
}
