use crate::domain::model::Student;
use rand::seq::SliceRandom;
use std::time::Duration;

/// Cosmetic name shuffle shown before a committed draw. It uses its own
/// thread-local RNG so it never advances the engine's random source.
#[derive(Debug, Clone)]
pub struct Spinner {
    pub ticks: usize,
    pub tick: Duration,
}

impl Default for Spinner {
    fn default() -> Self {
        Self {
            ticks: 12,
            tick: Duration::from_millis(60),
        }
    }
}

impl Spinner {
    pub fn new(ticks: usize, tick_millis: u64) -> Self {
        Self {
            ticks,
            tick: Duration::from_millis(tick_millis),
        }
    }

    pub fn frames(&self, display_pool: &[Student]) -> Vec<String> {
        let mut rng = rand::thread_rng();
        (0..self.ticks)
            .filter_map(|_| display_pool.choose(&mut rng))
            .map(|s| s.name.clone())
            .collect()
    }

    /// Plays the frames, handing each one to `show` with a pause in between.
    pub async fn play<F: FnMut(&str)>(&self, display_pool: &[Student], mut show: F) {
        for frame in self.frames(display_pool) {
            show(&frame);
            tokio::time::sleep(self.tick).await;
        }
    }
}
