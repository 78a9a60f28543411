use log::debug;
use rand::Rng;

use crate::graph::VertexCache;
use crate::problem::{Problem, ProblemError};
use crate::search::{backpropagate, select, ucb_score, ActionSelection, SearchConfig};
use crate::vertex::VertexIndex;

// ---------------------------------------------------------------------------
// Mcts
// ---------------------------------------------------------------------------

/// MCTS engine over a transposition-aware vertex cache.
///
/// Owns the problem, the cache and the configuration. Vertices live as
/// long as the engine (or until `reset`), so statistics gathered by one
/// `run` carry over to the next.
pub struct Mcts<P: Problem> {
    problem: P,
    cache: VertexCache<P::State>,
    config: SearchConfig,
}

impl<P: Problem> Mcts<P> {
    pub fn new(problem: P, config: SearchConfig) -> Self {
        Self {
            problem,
            cache: VertexCache::new(),
            config,
        }
    }

    pub fn problem(&self) -> &P {
        &self.problem
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn cache(&self) -> &VertexCache<P::State> {
        &self.cache
    }

    /// Vertex of the problem's initial state.
    pub fn root(&mut self) -> VertexIndex {
        let state = self.problem.initial_state();
        self.cache.vertex_for(state)
    }

    pub fn vertex_for_state(&mut self, state: P::State) -> VertexIndex {
        self.cache.vertex_for(state)
    }

    /// UCB1 score with the configured exploration constant.
    ///
    /// # Panics
    ///
    /// If `parent` has never been visited.
    pub fn ucb_score(&self, parent: VertexIndex, child: VertexIndex) -> f32 {
        ucb_score(&self.cache, parent, child, self.config.ucb_constant)
    }

    /// Run `num_mcts_samples` select/expand/evaluate/backpropagate cycles
    /// from `vertex`.
    ///
    /// On error, samples completed before the failing one stay backed up.
    pub fn sample(
        &mut self,
        vertex: VertexIndex,
        num_mcts_samples: u32,
        rng: &mut impl Rng,
    ) -> Result<(), ProblemError> {
        for _ in 0..num_mcts_samples {
            let (path, value) = select(
                &mut self.cache,
                &self.problem,
                vertex,
                self.config.ucb_constant,
                rng,
            )?;
            backpropagate(&mut self.cache, &path, value);
        }
        Ok(())
    }

    /// Search and commit move by move until a terminal vertex.
    ///
    /// Starts at `state` (the problem's initial state if `None`). At each
    /// committed vertex, samples `num_mcts_samples` times (configured count
    /// if `None`), then advances with `action_selection` (configured policy
    /// if `None`). Stops once the current vertex has no children after
    /// sampling (terminal, or still unexpanded when zero samples were
    /// asked), or when the policy picks a vertex already committed.
    ///
    /// Returns the committed trajectory, start vertex first.
    pub fn run(
        &mut self,
        state: Option<P::State>,
        num_mcts_samples: Option<u32>,
        action_selection: Option<ActionSelection>,
        rng: &mut impl Rng,
    ) -> Result<Vec<VertexIndex>, ProblemError> {
        self.run_with(state, num_mcts_samples, action_selection, rng, |_, _| {})
    }

    /// `run`, calling `on_commit` with each committed vertex right after
    /// its samples, before the next move is chosen.
    pub fn run_with<F>(
        &mut self,
        state: Option<P::State>,
        num_mcts_samples: Option<u32>,
        action_selection: Option<ActionSelection>,
        rng: &mut impl Rng,
        mut on_commit: F,
    ) -> Result<Vec<VertexIndex>, ProblemError>
    where
        F: FnMut(&VertexCache<P::State>, VertexIndex),
    {
        let mut vertex = match state {
            Some(state) => self.cache.vertex_for(state),
            None => self.root(),
        };
        let num_mcts_samples = num_mcts_samples.unwrap_or(self.config.num_mcts_samples);
        let action_selection = action_selection.unwrap_or(self.config.action_selection);

        let mut trajectory = Vec::new();
        loop {
            self.sample(vertex, num_mcts_samples, rng)?;
            trajectory.push(vertex);
            on_commit(&self.cache, vertex);

            let v = &self.cache[vertex];
            debug!(
                "run: depth {} vertex {vertex:?} visits {} value {:.4}",
                trajectory.len() - 1,
                v.visit_count(),
                v.value_estimate()
            );

            match action_selection.select(&self.cache, vertex, rng) {
                Some(child) if trajectory.contains(&child) => {
                    debug!("run: cycle back to {child:?}, stopping");
                    break;
                }
                Some(child) => vertex = child,
                None => break,
            }
        }

        Ok(trajectory)
    }

    /// Drop every vertex and its statistics.
    pub fn reset(&mut self) {
        debug!("reset: dropping {} vertices", self.cache.len());
        self.cache.clear();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
