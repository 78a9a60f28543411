use log::trace;
use rand::distributions::WeightedIndex;
use rand::prelude::Distribution;
use rand::Rng;

use crate::graph::VertexCache;
use crate::problem::{Problem, ProblemError, State};
use crate::vertex::{Children, VertexIndex};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Policy used to commit to a child after sampling.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ActionSelection {
    /// Most visited child.
    Visit,
    /// Sample proportionally to `exp(visit_count)`.
    #[default]
    Softmax,
}

impl ActionSelection {
    pub fn select<S>(
        self,
        cache: &VertexCache<S>,
        parent: VertexIndex,
        rng: &mut impl Rng,
    ) -> Option<VertexIndex> {
        match self {
            ActionSelection::Visit => visit_selection(cache, parent),
            ActionSelection::Softmax => softmax_selection(cache, parent, rng),
        }
    }
}

/// Search configuration.
#[derive(Clone, Debug)]
pub struct SearchConfig {
    /// UCB1 exploration constant.
    pub ucb_constant: f32,
    /// Samples per committed move when `Mcts::run` is not given a count.
    pub num_mcts_samples: u32,
    /// Policy `Mcts::run` commits with when not given one.
    pub action_selection: ActionSelection,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            ucb_constant: std::f32::consts::SQRT_2,
            num_mcts_samples: 20,
            action_selection: ActionSelection::Softmax,
        }
    }
}

/// Vertices visited by one sample, root first. May end with the random
/// child picked during evaluation.
pub type SearchPath = Vec<VertexIndex>;

// ---------------------------------------------------------------------------
// ucb_score
// ---------------------------------------------------------------------------

/// UCB1 score of `child` under `parent` (Auer, Cesa-Bianchi & Fischer, 2002).
///
/// Unvisited children score `+inf`, so every child is tried once before
/// any is revisited.
///
/// # Panics
///
/// If `parent` has never been visited. Selection only scores children of
/// vertices it has already backed up through, so this is a traversal bug.
pub fn ucb_score<S>(
    cache: &VertexCache<S>,
    parent: VertexIndex,
    child: VertexIndex,
    ucb_constant: f32,
) -> f32 {
    let parent_visits = cache[parent].visit_count();
    assert!(
        parent_visits > 0,
        "ucb_score: parent {parent:?} of child {child:?} has zero visits"
    );

    let child = &cache[child];
    if child.visit_count() == 0 {
        return f32::INFINITY;
    }

    let exploration = (2.0 * (parent_visits as f32).ln() / child.visit_count() as f32).sqrt();
    child.value_estimate() + ucb_constant * exploration
}

/// Child of `parent` with the highest UCB1 score. First one wins ties.
fn best_child<S>(cache: &VertexCache<S>, parent: VertexIndex, ucb_constant: f32) -> VertexIndex {
    let children = cache[parent].children().as_slice();
    debug_assert!(!children.is_empty(), "best_child: vertex {parent:?} has no children");

    let mut best = children[0];
    let mut best_score = f32::NEG_INFINITY;
    for &child in children {
        let score = ucb_score(cache, parent, child, ucb_constant);
        if score > best_score {
            best_score = score;
            best = child;
        }
    }
    best
}

// ---------------------------------------------------------------------------
// select
// ---------------------------------------------------------------------------

/// Descend from `start` by UCB1 until an unexpanded or terminal vertex.
///
/// Unexpanded leaves are expanded and evaluated with a random rollout;
/// terminal leaves are scored with `problem.reward` directly. If UCB1 picks
/// a vertex already on the path, the descent stops there and that vertex's
/// state is scored by rollout. Returns the path to back up (each vertex at
/// most once) and the value to back up along it.
pub fn select<P: Problem>(
    cache: &mut VertexCache<P::State>,
    problem: &P,
    start: VertexIndex,
    ucb_constant: f32,
    rng: &mut impl Rng,
) -> Result<(SearchPath, f32), ProblemError> {
    let mut current = start;
    let mut path: SearchPath = Vec::new();

    loop {
        path.push(current);

        let vertex = &cache[current];
        match vertex.children() {
            Children::Terminal => {
                let value = problem.reward(vertex.state())?;
                return Ok((path, value));
            }
            Children::Expanded(_) if vertex.visit_count() > 0 => {
                let child = best_child(cache, current, ucb_constant);
                // A cycle back onto the path: scores can't change during one
                // descent, so stop and score the repeated vertex by rollout.
                if path.contains(&child) {
                    let terminal = rollout(cache[child].state().clone(), rng)?;
                    trace!("select: cycle at {child:?} after {} steps", path.len());
                    return Ok((path, problem.reward(&terminal)?));
                }
                current = child;
            }
            // Expanded but never backed up: an earlier sample failed after
            // expansion. Evaluate it like a fresh leaf.
            Children::Unexpanded | Children::Expanded(_) => {
                let value = evaluate(cache, problem, current, &mut path, rng)?;
                return Ok((path, value));
            }
        }
    }
}

// ---------------------------------------------------------------------------
// expand
// ---------------------------------------------------------------------------

/// Compute the children of `leaf` once. No-op if already expanded.
///
/// Successor states go through the cache, so a successor already known
/// from another path becomes a shared child.
pub fn expand<S: State>(cache: &mut VertexCache<S>, leaf: VertexIndex) -> Result<(), ProblemError> {
    if cache[leaf].children().is_expanded() {
        return Ok(());
    }

    let successors = cache[leaf].state().next_actions()?;
    let children: Vec<VertexIndex> = successors
        .into_iter()
        .map(|state| cache.vertex_for(state))
        .collect();

    trace!("expand: {leaf:?} -> {} children", children.len());
    cache[leaf].set_children(children);
    Ok(())
}

// ---------------------------------------------------------------------------
// evaluate + rollout
// ---------------------------------------------------------------------------

/// Expand `leaf` and estimate its value.
///
/// If `leaf` has children, one is picked uniformly, pushed onto `path`
/// unless already on it, and a random rollout from its state is scored. Otherwise `leaf` itself
/// is terminal and scored directly.
pub fn evaluate<P: Problem>(
    cache: &mut VertexCache<P::State>,
    problem: &P,
    leaf: VertexIndex,
    path: &mut SearchPath,
    rng: &mut impl Rng,
) -> Result<f32, ProblemError> {
    expand(cache, leaf)?;

    let children = cache[leaf].children().as_slice();
    if children.is_empty() {
        return problem.reward(cache[leaf].state());
    }

    let child = children[rng.gen_range(0..children.len())];
    if !path.contains(&child) {
        path.push(child);
    }

    let terminal = rollout(cache[child].state().clone(), rng)?;
    problem.reward(&terminal)
}

/// Uniform random playout from `state` to a terminal state.
///
/// States visited here are never inserted into the cache.
pub fn rollout<S: State>(state: S, rng: &mut impl Rng) -> Result<S, ProblemError> {
    let mut state = state;
    let mut depth = 0u32;

    loop {
        let mut next = state.next_actions()?;
        if next.is_empty() {
            trace!("rollout: terminal after {depth} steps");
            return Ok(state);
        }
        state = next.swap_remove(rng.gen_range(0..next.len()));
        depth += 1;
    }
}

// ---------------------------------------------------------------------------
// backpropagate
// ---------------------------------------------------------------------------

/// Walk the path leaf→root, adding one visit and folding `value` into each
/// vertex's running mean.
pub fn backpropagate<S>(cache: &mut VertexCache<S>, path: &[VertexIndex], value: f32) {
    for &idx in path.iter().rev() {
        cache[idx].update(value);
    }
}

// ---------------------------------------------------------------------------
// Action selection
// ---------------------------------------------------------------------------

/// Most visited child of `parent`. First one wins ties.
///
/// `None` if `parent` has no children (unexpanded or terminal).
pub fn visit_selection<S>(cache: &VertexCache<S>, parent: VertexIndex) -> Option<VertexIndex> {
    let mut best: Option<(VertexIndex, u32)> = None;
    for &child in cache[parent].children().as_slice() {
        let visits = cache[child].visit_count();
        match best {
            Some((_, best_visits)) if visits <= best_visits => {}
            _ => best = Some((child, visits)),
        }
    }
    best.map(|(child, _)| child)
}

/// Sample a child of `parent` with probability proportional to
/// `exp(visit_count)`.
///
/// Weights are shifted by the max visit count before exponentiating, so
/// the most visited child always has weight 1.
///
/// `None` if `parent` has no children (unexpanded or terminal).
pub fn softmax_selection<S>(
    cache: &VertexCache<S>,
    parent: VertexIndex,
    rng: &mut impl Rng,
) -> Option<VertexIndex> {
    let children = cache[parent].children().as_slice();
    let max_visits = children.iter().map(|&c| cache[c].visit_count()).max()?;

    let weights: Vec<f64> = children
        .iter()
        .map(|&c| (cache[c].visit_count() as f64 - max_visits as f64).exp())
        .collect();

    let dist = WeightedIndex::new(&weights).ok()?;
    Some(children[dist.sample(rng)])
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
