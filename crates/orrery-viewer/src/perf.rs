// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Rolling frame clock for the FPS readout.

use std::collections::VecDeque;
use std::time::Instant;

const MAX_SAMPLES: usize = 240;

/// Tracks frame-to-frame time over a sliding window.
pub struct FrameClock {
    last: Instant,
    frame_ms: VecDeque<f32>,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self {
            last: Instant::now(),
            frame_ms: VecDeque::with_capacity(MAX_SAMPLES),
        }
    }
}

impl FrameClock {
    /// Record the end of a frame; returns its duration in milliseconds.
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let ms = now.duration_since(self.last).as_secs_f32() * 1000.0;
        self.last = now;
        if self.frame_ms.len() == MAX_SAMPLES {
            self.frame_ms.pop_front();
        }
        self.frame_ms.push_back(ms);
        ms
    }

    /// Frames per second over the window; 0 before the first tick.
    pub fn fps(&self) -> f32 {
        if self.frame_ms.is_empty() {
            return 0.0;
        }
        let mean = self.frame_ms.iter().sum::<f32>() / self.frame_ms.len() as f32;
        if mean <= f32::EPSILON {
            0.0
        } else {
            1000.0 / mean
        }
    }
}
