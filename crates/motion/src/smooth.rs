/// Critically damped spring toward a target value.
///
/// Carries its own rate of change between calls, so one instance must be used
/// per smoothed quantity.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SmoothDamp {
    pub velocity: f32,
}

impl SmoothDamp {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.velocity = 0.0;
    }

    /// Advance `current` toward `target`, reaching it in roughly
    /// `smooth_time` seconds. Never overshoots the target.
    pub fn step(&mut self, current: f32, target: f32, smooth_time: f32, dt: f32) -> f32 {
        if dt <= 0.0 {
            return current;
        }
        let smooth_time = smooth_time.max(1e-4);
        let omega = 2.0 / smooth_time;
        let x = omega * dt;
        let exp = 1.0 / (1.0 + x + 0.48 * x * x + 0.235 * x * x * x);

        let change = current - target;
        let temp = (self.velocity + omega * change) * dt;
        self.velocity = (self.velocity - omega * temp) * exp;
        let mut output = target + (change + temp) * exp;

        if (target - current > 0.0) == (output > target) {
            output = target;
            self.velocity = (output - target) / dt;
        }
        output
    }
}
