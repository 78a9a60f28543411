use std::fmt;
use std::hash::Hash;

// ---------------------------------------------------------------------------
// ProblemError — error type for domain adapter failures
// ---------------------------------------------------------------------------

/// Error raised by a domain adapter (`State::next_actions` or `Problem::reward`).
///
/// Wraps `Box<dyn Error + Send + Sync>` so `graph-mcts` stays decoupled
/// from domain-specific error types. Search never inspects or retries it.
#[derive(Debug)]
pub struct ProblemError(Box<dyn std::error::Error + Send + Sync>);

impl ProblemError {
    /// Wrap any error into a ProblemError.
    pub fn new(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self(Box::new(err))
    }

    /// Create from a string message.
    pub fn msg(msg: impl Into<String>) -> Self {
        Self(msg.into().into())
    }
}

impl fmt::Display for ProblemError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for ProblemError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&*self.0)
    }
}

impl From<String> for ProblemError {
    fn from(s: String) -> Self {
        Self::msg(s)
    }
}

// ---------------------------------------------------------------------------
// State trait
// ---------------------------------------------------------------------------

/// A node of the searched state graph.
///
/// Equality and hashing decide vertex identity: two states that compare
/// equal share one vertex and its statistics, whichever path reached them.
/// `next_actions` must be a pure function of the state. An empty result
/// marks the state terminal.
pub trait State: Clone + Eq + Hash {
    fn next_actions(&self) -> Result<Vec<Self>, ProblemError>;
}

// ---------------------------------------------------------------------------
// Problem trait
// ---------------------------------------------------------------------------

/// Clean boundary between search and the domain.
///
/// Search asks for the root state and for rewards of terminal states
/// reached by selection or rollout. It doesn't know what the states mean.
pub trait Problem {
    type State: State;

    fn initial_state(&self) -> Self::State;

    /// Reward of a (typically terminal) state.
    fn reward(&self, state: &Self::State) -> Result<f32, ProblemError>;
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
