use std::time::{Duration, Instant};

/// Timing snapshot for one frame.
#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    /// Seconds since the previous tick, clamped.
    pub dt: f32,

    /// Seconds since the clock started (sum of clamped deltas).
    pub elapsed: f32,

    /// Monotonic frame counter, starting at 0.
    pub frame_index: u64,
}

/// Produces `FrameTime` snapshots.
///
/// Deltas are clamped so a debugger pause or a minimized window does not turn
/// into a huge jump in animation time.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Instant,
    elapsed: f32,
    frame_index: u64,
    max_dt: Duration,
}

impl FrameClock {
    pub const DEFAULT_MAX_DT: Duration = Duration::from_millis(250);

    pub fn new() -> Self {
        Self::with_max_dt(Self::DEFAULT_MAX_DT)
    }

    pub fn with_max_dt(max_dt: Duration) -> Self {
        Self {
            last: Instant::now(),
            elapsed: 0.0,
            frame_index: 0,
            max_dt,
        }
    }

    /// Advances the clock to now.
    pub fn tick(&mut self) -> FrameTime {
        let now = Instant::now();
        let dt = now.saturating_duration_since(self.last);
        self.last = now;
        self.advance(dt)
    }

    /// Advances the clock by an explicit delta.
    fn advance(&mut self, dt: Duration) -> FrameTime {
        let dt = dt.min(self.max_dt).as_secs_f32();
        self.elapsed += dt;

        let ft = FrameTime {
            dt,
            elapsed: self.elapsed,
            frame_index: self.frame_index,
        };
        self.frame_index = self.frame_index.wrapping_add(1);
        ft
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn frame_index_counts_from_zero() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.advance(Duration::from_millis(16)).frame_index, 0);
        assert_eq!(clock.advance(Duration::from_millis(16)).frame_index, 1);
    }

    #[test]
    fn long_stall_is_clamped() {
        let mut clock = FrameClock::with_max_dt(Duration::from_millis(100));
        let ft = clock.advance(Duration::from_secs(5));
        assert_abs_diff_eq!(ft.dt, 0.1, epsilon = 1e-6);
    }

    #[test]
    fn elapsed_accumulates_clamped_deltas() {
        let mut clock = FrameClock::with_max_dt(Duration::from_millis(100));
        clock.advance(Duration::from_millis(50));
        let ft = clock.advance(Duration::from_secs(1));
        assert_abs_diff_eq!(ft.elapsed, 0.15, epsilon = 1e-6);
    }
}
