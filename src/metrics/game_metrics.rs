use super::store::Stats;
use std::time::{Duration, Instant};

/// Stats for the interactive session: run clock plus the persisted counters
pub struct GameMetrics {
    pub start_time: Instant,
    pub elapsed_time: Duration,
    pub high_score: u32,
    pub play_count: u32,
    /// Best score seen in the current run, across level resets
    pub run_best: u32,
}

impl GameMetrics {
    pub fn new() -> Self {
        Self::from_stats(Stats::default())
    }

    /// Resume counters loaded from disk
    pub fn from_stats(stats: Stats) -> Self {
        Self {
            start_time: Instant::now(),
            elapsed_time: Duration::ZERO,
            high_score: stats.high_score,
            play_count: stats.play_count,
            run_best: 0,
        }
    }

    pub fn stats(&self) -> Stats {
        Stats {
            high_score: self.high_score,
            play_count: self.play_count,
        }
    }

    pub fn update(&mut self) {
        self.elapsed_time = self.start_time.elapsed();
    }

    pub fn on_game_start(&mut self) {
        self.start_time = Instant::now();
        self.elapsed_time = Duration::ZERO;
        self.run_best = 0;
    }

    /// Track the score as it changes; level advances reset the in-game score
    pub fn on_score(&mut self, score: u32) {
        self.run_best = self.run_best.max(score);
    }

    pub fn on_game_over(&mut self, final_score: u32) {
        self.on_score(final_score);
        self.play_count += 1;
        if self.run_best > self.high_score {
            self.high_score = self.run_best;
        }
    }

    pub fn format_time(&self) -> String {
        let total_secs = self.elapsed_time.as_secs();
        let minutes = total_secs / 60;
        let seconds = total_secs % 60;
        format!("{:02}:{:02}", minutes, seconds)
    }
}

impl Default for GameMetrics {
    fn default() -> Self {
        Self::new()
    }
}
