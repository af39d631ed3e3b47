use serde::{Deserialize, Serialize};

/// Simulated-day counter. Starts at day 1 and only ever moves forward,
/// exactly once per successful day-advance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationClock {
    day_count: u32,
}

impl Default for SimulationClock {
    fn default() -> Self {
        SimulationClock { day_count: 1 }
    }
}

impl SimulationClock {
    pub fn day(&self) -> u32 {
        self.day_count
    }

    pub fn advance(&mut self) {
        self.day_count += 1;
    }
}
