pub mod engine;
pub mod graph;
pub mod problem;
pub mod search;
pub mod vertex;

#[cfg(test)]
pub(crate) mod test_util;

pub use engine::Mcts;
pub use graph::VertexCache;
pub use problem::{Problem, ProblemError, State};
pub use search::{
    backpropagate, evaluate, expand, rollout, select, softmax_selection, ucb_score,
    visit_selection, ActionSelection, SearchConfig, SearchPath,
};
pub use vertex::{Children, Vertex, VertexIndex};
