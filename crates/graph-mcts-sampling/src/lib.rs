pub mod episodes;
pub mod problems;

pub use episodes::{run_episodes, Episode, EpisodeConfig, EpisodeResult, EpisodeStats};
pub use problems::{BitstringProblem, BitstringState, CountingProblem, CountingState};
