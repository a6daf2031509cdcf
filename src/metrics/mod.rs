pub mod game_metrics;
pub mod store;

pub use game_metrics::GameMetrics;
pub use store::{Stats, StatsStore};
