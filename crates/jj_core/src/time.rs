use std::time::{Duration, Instant};

const FPS_SAMPLE_COUNT: usize = 60;
const SPIKE_THRESHOLD: Duration = Duration::from_millis(250);

/// Per-frame timing handed to the scene by value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameStats {
    pub frame_time_seconds: f64,
    pub frames_per_second: f64,
}

impl Default for FrameStats {
    fn default() -> Self {
        Self {
            frame_time_seconds: 1.0 / 60.0,
            frames_per_second: 60.0,
        }
    }
}

/// Measures the wall-clock gap between redraw callbacks.
///
/// Simulation does not depend on this: physics advances one step per frame.
/// The clock only feeds the debug readout, smoothed over the last
/// `FPS_SAMPLE_COUNT` frames.
pub struct FrameClock {
    last_instant: Option<Instant>,
    samples: [f64; FPS_SAMPLE_COUNT],
    sample_index: usize,
    pub frame_count: u64,
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            last_instant: None,
            samples: [1.0 / 60.0; FPS_SAMPLE_COUNT],
            sample_index: 0,
            frame_count: 0,
        }
    }

    pub fn begin_frame(&mut self) -> FrameStats {
        self.tick(Instant::now())
    }

    pub fn tick(&mut self, now: Instant) -> FrameStats {
        self.frame_count += 1;
        let Some(last) = self.last_instant.replace(now) else {
            return self.stats();
        };

        let real_dt = now.saturating_duration_since(last);
        if real_dt > SPIKE_THRESHOLD {
            log::warn!("Frame took {:.1}ms", real_dt.as_secs_f64() * 1000.0);
        }

        self.samples[self.sample_index] = real_dt.as_secs_f64();
        self.sample_index = (self.sample_index + 1) % FPS_SAMPLE_COUNT;
        self.stats()
    }

    fn stats(&self) -> FrameStats {
        let avg_dt = self.samples.iter().sum::<f64>() / FPS_SAMPLE_COUNT as f64;
        FrameStats {
            frame_time_seconds: avg_dt,
            frames_per_second: if avg_dt > 0.0 { 1.0 / avg_dt } else { 0.0 },
        }
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}
