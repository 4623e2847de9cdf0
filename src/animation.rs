//! Animation parameter for time-dependent plots
//!
//! [`Animation`] owns the parameter `t` and whether it is advancing. The
//! host drives it by calling [`Animation::tick`] once per frame; after
//! [`Animation::stop`] ticks change nothing, so no further work is scheduled.

use crate::graphing::{CurveSet, Viewport, sample_curves};
use serde::Serialize;
use std::f64::consts::TAU;
use tracing::debug;

/// Parameter advance per frame
pub const FRAME_STEP: f64 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Animation {
    t: f64,
    running: bool,
}

impl Animation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn t(&self) -> f64 {
        self.t
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn start(&mut self) {
        if !self.running {
            debug!(t = self.t, "animation started");
        }
        self.running = true;
    }

    pub fn stop(&mut self) {
        if self.running {
            debug!(t = self.t, "animation stopped");
        }
        self.running = false;
    }

    /// Flip between running and stopped
    pub fn toggle(&mut self) {
        if self.running {
            self.stop();
        } else {
            self.start();
        }
    }

    /// Advance `t` by one frame, wrapping at 2π; returns the current `t`
    pub fn tick(&mut self) -> f64 {
        if self.running {
            self.t = (self.t + FRAME_STEP) % TAU;
        }
        self.t
    }

    /// Sample `formulas` at the current parameter value
    pub fn frame(&self, formulas: &[&str], viewport: &Viewport, num_points: usize) -> CurveSet {
        sample_curves(formulas, viewport, num_points, Some(self.t))
    }
}
