// Copyright (c) 2026 rezky_nightky

use std::time::Duration;

/// Frame timing gathered for `--perf-stats`.
#[derive(Clone, Debug, Default)]
pub struct PerfStats {
    pub frames: u64,
    pub overshoot_frames: u64,
    work_sum_s: f64,
    work_max_s: f64,
}

impl PerfStats {
    /// Records one frame's tick+render+flush time against the frame budget.
    pub fn record(&mut self, work: Duration, budget: Duration) {
        let s = work.as_secs_f64();
        self.frames = self.frames.saturating_add(1);
        self.work_sum_s += s;
        self.work_max_s = self.work_max_s.max(s);
        if work > budget {
            self.overshoot_frames = self.overshoot_frames.saturating_add(1);
        }
    }

    pub fn avg_work_ms(&self) -> f64 {
        self.work_sum_s / self.frames.max(1) as f64 * 1000.0
    }

    pub fn max_work_ms(&self) -> f64 {
        self.work_max_s * 1000.0
    }

    pub fn summary(&self, elapsed: Duration, target_fps: f64) -> String {
        let elapsed_s = elapsed.as_secs_f64().max(0.000_001);
        let frames = self.frames.max(1) as f64;
        format!(
            "PERF STATS:\n  elapsed_s: {:.3}\n  target_fps: {:.3}\n  avg_fps: {:.3}\n  frames: {}\n  avg_work_ms: {:.3}\n  max_work_ms: {:.3}\n  overshoot_frames: {} ({:.1}%)",
            elapsed_s,
            target_fps,
            self.frames as f64 / elapsed_s,
            self.frames,
            self.avg_work_ms(),
            self.max_work_ms(),
            self.overshoot_frames,
            self.overshoot_frames as f64 / frames * 100.0,
        )
    }
}
