use super::FrameTime;

/// Frame-rate summary over one reporting interval.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FrameReport {
    pub frames: u64,
    /// Sum of the frames' delta times, in seconds.
    pub elapsed: f32,
}

impl FrameReport {
    pub fn fps(&self) -> f32 {
        if self.elapsed > 0.0 {
            self.frames as f32 / self.elapsed
        } else {
            0.0
        }
    }

    pub fn mean_frame_ms(&self) -> f32 {
        if self.frames > 0 {
            self.elapsed * 1000.0 / self.frames as f32
        } else {
            0.0
        }
    }
}

/// Accumulates frame times and yields a [`FrameReport`] every `interval` frames.
#[derive(Debug, Clone)]
pub struct FrameStats {
    interval: u64,
    frames: u64,
    elapsed: f32,
}

impl FrameStats {
    pub fn new(interval: u64) -> Self {
        Self {
            interval: interval.max(1),
            frames: 0,
            elapsed: 0.0,
        }
    }

    pub fn record(&mut self, time: FrameTime) -> Option<FrameReport> {
        self.frames += 1;
        self.elapsed += time.dt;

        if self.frames < self.interval {
            return None;
        }

        let report = FrameReport {
            frames: self.frames,
            elapsed: self.elapsed,
        };
        self.frames = 0;
        self.elapsed = 0.0;
        Some(report)
    }
}
