use std::time::Instant;

use graph_mcts::{ActionSelection, Mcts, Problem, ProblemError};
use log::debug;
use rand::Rng;

// ---------------------------------------------------------------------------
// Data structures
// ---------------------------------------------------------------------------

/// Episode loop configuration.
#[derive(Clone, Debug)]
pub struct EpisodeConfig {
    pub num_episodes: u32,
    /// Samples per committed move.
    pub num_mcts_samples: u32,
    pub action_selection: ActionSelection,
}

impl Default for EpisodeConfig {
    fn default() -> Self {
        Self {
            num_episodes: 10,
            num_mcts_samples: 20,
            action_selection: ActionSelection::Softmax,
        }
    }
}

/// One committed trajectory, root first, and the reward of its last state.
#[derive(Clone, Debug)]
pub struct Episode<S> {
    pub states: Vec<S>,
    pub reward: f32,
}

/// Aggregate statistics over an episode run.
#[derive(Clone, Debug)]
pub struct EpisodeStats {
    pub episodes: u32,
    /// Select/expand/evaluate/backpropagate cycles executed.
    pub samples: u64,
    /// Committed moves (trajectory vertices) across all episodes.
    pub positions: u64,
    /// Vertices in the engine's cache when the run finished.
    pub distinct_states: usize,
    pub elapsed_secs: f64,
    pub mean_reward: f32,
    pub best_reward: f32,
}

impl EpisodeStats {
    pub fn new() -> Self {
        Self {
            episodes: 0,
            samples: 0,
            positions: 0,
            distinct_states: 0,
            elapsed_secs: 0.0,
            mean_reward: 0.0,
            best_reward: f32::NEG_INFINITY,
        }
    }

    /// Incrementally add one episode's data to the stats.
    pub fn add_episode<S>(&mut self, episode: &Episode<S>, samples: u64) {
        self.episodes += 1;
        self.samples += samples;
        self.positions += episode.states.len() as u64;
        self.mean_reward += (episode.reward - self.mean_reward) / self.episodes as f32;
        self.best_reward = self.best_reward.max(episode.reward);
    }

    pub fn episodes_per_second(&self) -> f64 {
        if self.elapsed_secs > 0.0 {
            self.episodes as f64 / self.elapsed_secs
        } else {
            0.0
        }
    }

    pub fn samples_per_second(&self) -> f64 {
        if self.elapsed_secs > 0.0 {
            self.samples as f64 / self.elapsed_secs
        } else {
            0.0
        }
    }

    pub fn avg_length(&self) -> f64 {
        if self.episodes > 0 {
            self.positions as f64 / self.episodes as f64
        } else {
            0.0
        }
    }
}

impl Default for EpisodeStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of `run_episodes`: every episode in order, plus stats.
#[derive(Clone, Debug)]
pub struct EpisodeResult<S> {
    pub episodes: Vec<Episode<S>>,
    pub stats: EpisodeStats,
}

impl<S> EpisodeResult<S> {
    /// Highest-reward episode. First one wins ties.
    pub fn best(&self) -> Option<&Episode<S>> {
        let mut best: Option<&Episode<S>> = None;
        for episode in &self.episodes {
            match best {
                Some(b) if episode.reward <= b.reward => {}
                _ => best = Some(episode),
            }
        }
        best
    }
}

// ---------------------------------------------------------------------------
// run_episodes
// ---------------------------------------------------------------------------

/// Run `config.num_episodes` searches from the problem's initial state.
///
/// The engine is reused across episodes, so later episodes start from the
/// statistics earlier ones left behind. Each episode's reward is the
/// problem's reward for its last committed state.
///
/// Fails fast on the first domain error.
pub fn run_episodes<P: Problem>(
    engine: &mut Mcts<P>,
    config: &EpisodeConfig,
    rng: &mut impl Rng,
) -> Result<EpisodeResult<P::State>, ProblemError> {
    let start = Instant::now();
    let mut episodes = Vec::with_capacity(config.num_episodes as usize);
    let mut stats = EpisodeStats::new();

    for i in 0..config.num_episodes {
        let mut states: Vec<P::State> = Vec::new();
        let trajectory = engine.run_with(
            None,
            Some(config.num_mcts_samples),
            Some(config.action_selection),
            rng,
            |cache, v| states.push(cache[v].state().clone()),
        )?;

        let last = states
            .last()
            .ok_or_else(|| ProblemError::msg("run returned an empty trajectory"))?;
        let reward = engine.problem().reward(last)?;

        debug!(
            "episode {i}: {} moves, reward {reward:.4}, {} vertices cached",
            states.len(),
            engine.cache().len()
        );

        let episode = Episode { states, reward };
        stats.add_episode(&episode, trajectory.len() as u64 * config.num_mcts_samples as u64);
        episodes.push(episode);
    }

    stats.distinct_states = engine.cache().len();
    stats.elapsed_secs = start.elapsed().as_secs_f64();
    if stats.episodes == 0 {
        stats.best_reward = 0.0;
    }

    Ok(EpisodeResult { episodes, stats })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problems::{BitstringProblem, CountingProblem};
    use graph_mcts::SearchConfig;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn rng() -> SmallRng {
        SmallRng::seed_from_u64(42)
    }

    // ---- EpisodeStats ----

    #[test]
    fn stats_accumulate() {
        let mut stats = EpisodeStats::new();
        stats.add_episode(&Episode { states: vec![0u8; 3], reward: 1.0 }, 60);
        stats.add_episode(&Episode { states: vec![0u8; 5], reward: 0.0 }, 100);

        assert_eq!(stats.episodes, 2);
        assert_eq!(stats.samples, 160);
        assert_eq!(stats.positions, 8);
        assert!((stats.mean_reward - 0.5).abs() < 1e-6);
        assert_eq!(stats.best_reward, 1.0);
        assert!((stats.avg_length() - 4.0).abs() < 1e-9);
    }

    #[test]
    fn stats_rates_zero_without_time() {
        let stats = EpisodeStats::new();
        assert_eq!(stats.episodes_per_second(), 0.0);
        assert_eq!(stats.samples_per_second(), 0.0);
        assert_eq!(stats.avg_length(), 0.0);
    }

    #[test]
    fn stats_rates() {
        let stats = EpisodeStats {
            episodes: 10,
            samples: 2000,
            elapsed_secs: 2.0,
            ..EpisodeStats::new()
        };
        assert!((stats.episodes_per_second() - 5.0).abs() < 1e-9);
        assert!((stats.samples_per_second() - 1000.0).abs() < 1e-9);
    }

    #[test]
    fn best_episode_first_wins_ties() {
        let result = EpisodeResult {
            episodes: vec![
                Episode { states: vec![1u8], reward: 0.5 },
                Episode { states: vec![2u8], reward: 0.9 },
                Episode { states: vec![3u8], reward: 0.9 },
            ],
            stats: EpisodeStats::new(),
        };
        assert_eq!(result.best().unwrap().states, vec![2]);

        let empty: EpisodeResult<u8> = EpisodeResult {
            episodes: Vec::new(),
            stats: EpisodeStats::new(),
        };
        assert!(empty.best().is_none());
    }

    // ---- run_episodes ----

    #[test_log::test]
    fn counting_episodes_reach_terminal() {
        let problem = CountingProblem::new(6, 4);
        let mut engine = Mcts::new(problem, SearchConfig::default());
        let config = EpisodeConfig {
            num_episodes: 5,
            num_mcts_samples: 30,
            action_selection: ActionSelection::Visit,
        };

        let result = run_episodes(&mut engine, &config, &mut rng()).unwrap();
        assert_eq!(result.episodes.len(), 5);
        for episode in &result.episodes {
            // Root plus one state per placement.
            assert_eq!(episode.states.len(), 7);
            assert_eq!(episode.states.last().unwrap().placed(), 6);
        }

        let stats = &result.stats;
        assert_eq!(stats.episodes, 5);
        assert_eq!(stats.samples, 5 * 7 * 30);
        assert!(stats.distinct_states <= engine.problem().num_states());
        assert_eq!(stats.distinct_states, engine.cache().len());
    }

    #[test]
    fn counting_finds_target() {
        let problem = CountingProblem::new(6, 4);
        let mut engine = Mcts::new(problem, SearchConfig::default());
        let config = EpisodeConfig {
            num_episodes: 3,
            num_mcts_samples: 200,
            action_selection: ActionSelection::Visit,
        };

        let result = run_episodes(&mut engine, &config, &mut rng()).unwrap();
        assert!((result.stats.best_reward - 1.0).abs() < 1e-6);
        assert_eq!(result.best().unwrap().states.last().unwrap().ones, 4);
    }

    #[test]
    fn bitstring_episodes_share_root() {
        let problem = BitstringProblem::from_pattern(0b1101, 4);
        let mut engine = Mcts::new(problem, SearchConfig::default());
        let config = EpisodeConfig {
            num_episodes: 4,
            num_mcts_samples: 10,
            ..EpisodeConfig::default()
        };

        let result = run_episodes(&mut engine, &config, &mut rng()).unwrap();
        let root = engine.cache().get(&engine.problem().initial_state()).unwrap();

        // Every episode samples the shared root the same number of times.
        assert_eq!(engine.cache()[root].visit_count(), 4 * 10);
        for episode in &result.episodes {
            assert_eq!(episode.states.len(), 5);
            assert!(episode.states[0].bits().is_empty());
        }
    }

    #[test]
    fn zero_sample_episode_fails_on_partial_state() {
        // No samples → root stays unexpanded → reward asked for a partial bitstring.
        let problem = BitstringProblem::from_pattern(0b1, 1);
        let mut engine = Mcts::new(problem, SearchConfig::default());
        let config = EpisodeConfig {
            num_episodes: 1,
            num_mcts_samples: 0,
            ..EpisodeConfig::default()
        };

        let err = run_episodes(&mut engine, &config, &mut rng()).unwrap_err();
        assert_eq!(err.to_string(), "reward: state has 0 of 1 bits");
    }

    #[test]
    fn no_episodes() {
        let mut engine = Mcts::new(CountingProblem::new(3, 1), SearchConfig::default());
        let config = EpisodeConfig {
            num_episodes: 0,
            ..EpisodeConfig::default()
        };
        let result = run_episodes(&mut engine, &config, &mut rng()).unwrap();
        assert!(result.episodes.is_empty());
        assert_eq!(result.stats.best_reward, 0.0);
        assert_eq!(result.stats.distinct_states, 0);
    }
}
