/// Per-tick inputs shared by every agent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickContext {
    pub tick: u64,
    /// Simulated time in game-hours. Monotonic across ticks.
    pub now_hours: f64,
}

impl TickContext {
    pub fn new(tick: u64, now_hours: f64) -> Self {
        Self { tick, now_hours }
    }

    /// Hours elapsed since `since_hours`.
    pub fn elapsed_since(&self, since_hours: f64) -> f64 {
        self.now_hours - since_hours
    }
}
