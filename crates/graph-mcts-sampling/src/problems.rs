//! Synthetic problems for benchmarks and tests.
//!
//! - `CountingProblem`: order-independent, so almost every state is a
//!   transposition reachable through many paths.
//! - `BitstringProblem`: every prefix is reachable one way only, a pure tree.

use graph_mcts::{Problem, ProblemError, State};

// ---------------------------------------------------------------------------
// CountingProblem
// ---------------------------------------------------------------------------

/// Number of ones and zeros placed so far. Terminal at `depth` placements.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct CountingState {
    pub ones: u32,
    pub zeros: u32,
    depth: u32,
}

impl CountingState {
    pub fn placed(&self) -> u32 {
        self.ones + self.zeros
    }
}

impl State for CountingState {
    fn next_actions(&self) -> Result<Vec<Self>, ProblemError> {
        if self.placed() >= self.depth {
            return Ok(Vec::new());
        }
        Ok(vec![
            Self {
                ones: self.ones + 1,
                ..*self
            },
            Self {
                zeros: self.zeros + 1,
                ..*self
            },
        ])
    }
}

/// Place `depth` ones or zeros; reward peaks at exactly `target_ones` ones.
///
/// Reward is `1 - |ones - target_ones| / depth`, in `[0, 1]` when
/// `target_ones <= depth`.
#[derive(Clone, Debug)]
pub struct CountingProblem {
    depth: u32,
    target_ones: u32,
}

impl CountingProblem {
    pub fn new(depth: u32, target_ones: u32) -> Self {
        Self { depth, target_ones }
    }

    /// Distinct states in the full graph: (depth + 1)(depth + 2) / 2.
    pub fn num_states(&self) -> usize {
        let d = self.depth as usize;
        (d + 1) * (d + 2) / 2
    }
}

impl Problem for CountingProblem {
    type State = CountingState;

    fn initial_state(&self) -> CountingState {
        CountingState {
            ones: 0,
            zeros: 0,
            depth: self.depth,
        }
    }

    fn reward(&self, state: &CountingState) -> Result<f32, ProblemError> {
        let diff = state.ones.abs_diff(self.target_ones) as f32;
        Ok(1.0 - diff / self.depth.max(1) as f32)
    }
}

// ---------------------------------------------------------------------------
// BitstringProblem
// ---------------------------------------------------------------------------

/// Bits placed so far. Terminal at `len` bits.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct BitstringState {
    bits: Vec<bool>,
    len: usize,
}

impl BitstringState {
    pub fn bits(&self) -> &[bool] {
        &self.bits
    }
}

impl State for BitstringState {
    fn next_actions(&self) -> Result<Vec<Self>, ProblemError> {
        if self.bits.len() >= self.len {
            return Ok(Vec::new());
        }
        Ok([false, true]
            .into_iter()
            .map(|bit| {
                let mut bits = self.bits.clone();
                bits.push(bit);
                Self { bits, len: self.len }
            })
            .collect())
    }
}

/// Guess a hidden bitstring; reward is the fraction of matching bits.
#[derive(Clone, Debug)]
pub struct BitstringProblem {
    target: Vec<bool>,
}

impl BitstringProblem {
    pub fn new(target: Vec<bool>) -> Self {
        Self { target }
    }

    /// Target bits from the low `len` bits of `pattern`, most significant first.
    pub fn from_pattern(pattern: u64, len: usize) -> Self {
        let target = (0..len).rev().map(|i| (pattern >> i) & 1 == 1).collect();
        Self { target }
    }

    pub fn target(&self) -> &[bool] {
        &self.target
    }
}

impl Problem for BitstringProblem {
    type State = BitstringState;

    fn initial_state(&self) -> BitstringState {
        BitstringState {
            bits: Vec::with_capacity(self.target.len()),
            len: self.target.len(),
        }
    }

    fn reward(&self, state: &BitstringState) -> Result<f32, ProblemError> {
        if state.bits.len() != self.target.len() {
            return Err(ProblemError::msg(format!(
                "reward: state has {} of {} bits",
                state.bits.len(),
                self.target.len()
            )));
        }
        if self.target.is_empty() {
            return Ok(1.0);
        }
        let matching = state
            .bits
            .iter()
            .zip(&self.target)
            .filter(|(a, b)| a == b)
            .count();
        Ok(matching as f32 / self.target.len() as f32)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
