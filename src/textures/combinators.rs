// Copyright @yucwang 2026

use crate::core::texture::{MaterialCoords, MaterialMap};
use crate::math::constants::Float;

use std::sync::Arc;

/// `(1 - t) * a + t * b`.
pub struct Lerp {
    pub t: Arc<dyn MaterialMap>,
    pub a: Arc<dyn MaterialMap>,
    pub b: Arc<dyn MaterialMap>,
}

impl MaterialMap for Lerp {
    fn eval(&self, at: &MaterialCoords) -> Float {
        let t = self.t.eval(at);
        (1.0 - t) * self.a.eval(at) + t * self.b.eval(at)
    }
}

/// `a` below `t_switch`, `b` from it on.
pub struct Level {
    pub t_switch: Float,
    pub t: Arc<dyn MaterialMap>,
    pub a: Arc<dyn MaterialMap>,
    pub b: Arc<dyn MaterialMap>,
}

impl MaterialMap for Level {
    fn eval(&self, at: &MaterialCoords) -> Float {
        if self.t.eval(at) < self.t_switch {
            self.a.eval(at)
        } else {
            self.b.eval(at)
        }
    }
}

pub struct Clamp {
    pub min: Float,
    pub max: Float,
    pub map: Arc<dyn MaterialMap>,
}

impl MaterialMap for Clamp {
    fn eval(&self, at: &MaterialCoords) -> Float {
        self.map.eval(at).max(self.min).min(self.max)
    }
}
