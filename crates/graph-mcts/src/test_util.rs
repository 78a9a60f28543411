use std::collections::{HashMap, HashSet};
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use crate::problem::{Problem, ProblemError, State};

/// Explicit adjacency table. States without an entry are terminal.
#[derive(Default, Debug)]
pub struct TableGraph {
    edges: HashMap<u32, Vec<u32>>,
    rewards: HashMap<u32, f32>,
    broken: HashSet<u32>,
}

impl TableGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn edge(mut self, from: u32, to: &[u32]) -> Self {
        self.edges.insert(from, to.to_vec());
        self
    }

    pub fn reward(mut self, id: u32, reward: f32) -> Self {
        self.rewards.insert(id, reward);
        self
    }

    /// `next_actions` on this id returns an error.
    pub fn broken(mut self, id: u32) -> Self {
        self.broken.insert(id);
        self
    }

    pub fn build(self) -> Rc<TableGraph> {
        Rc::new(self)
    }
}

/// State handle into a `TableGraph`. Identity is the id alone.
#[derive(Clone, Debug)]
pub struct TableState {
    id: u32,
    graph: Rc<TableGraph>,
}

impl TableState {
    pub fn new(graph: &Rc<TableGraph>, id: u32) -> Self {
        Self {
            id,
            graph: Rc::clone(graph),
        }
    }

    pub fn id(&self) -> u32 {
        self.id
    }
}

impl PartialEq for TableState {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TableState {}

impl Hash for TableState {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl State for TableState {
    fn next_actions(&self) -> Result<Vec<Self>, ProblemError> {
        if self.graph.broken.contains(&self.id) {
            return Err(ProblemError::msg(format!("state {} is broken", self.id)));
        }
        Ok(self
            .graph
            .edges
            .get(&self.id)
            .map(|to| to.iter().map(|&id| TableState::new(&self.graph, id)).collect())
            .unwrap_or_default())
    }
}

pub struct TableProblem {
    graph: Rc<TableGraph>,
    root: u32,
}

impl TableProblem {
    pub fn new(graph: Rc<TableGraph>) -> Self {
        Self { graph, root: 0 }
    }

    pub fn graph(&self) -> &Rc<TableGraph> {
        &self.graph
    }
}

impl Problem for TableProblem {
    type State = TableState;

    fn initial_state(&self) -> TableState {
        TableState::new(&self.graph, self.root)
    }

    fn reward(&self, state: &TableState) -> Result<f32, ProblemError> {
        self.graph
            .rewards
            .get(&state.id)
            .copied()
            .ok_or_else(|| ProblemError::msg(format!("no reward for state {}", state.id)))
    }
}

/// Root 0 with two terminal children: 1 (reward 1.0) and 2 (reward 0.0).
pub fn binary() -> Rc<TableGraph> {
    TableGraph::new()
        .edge(0, &[1, 2])
        .reward(1, 1.0)
        .reward(2, 0.0)
        .build()
}

/// 0 → {1, 2}, both → 3. State 3 is reachable by two paths.
pub fn diamond() -> Rc<TableGraph> {
    TableGraph::new()
        .edge(0, &[1, 2])
        .edge(1, &[3])
        .edge(2, &[3])
        .reward(3, 1.0)
        .build()
}

/// Root 0 with three terminal children of increasing reward.
pub fn three_way() -> Rc<TableGraph> {
    TableGraph::new()
        .edge(0, &[1, 2, 3])
        .reward(1, 0.1)
        .reward(2, 0.5)
        .reward(3, 0.9)
        .build()
}

/// Two-level tree: 0 → {1, 2}; 1 → {3, 4}; 2 → {5, 6}.
/// Best leaf is 4 (reward 1.0) under 1.
pub fn two_level() -> Rc<TableGraph> {
    TableGraph::new()
        .edge(0, &[1, 2])
        .edge(1, &[3, 4])
        .edge(2, &[5, 6])
        .reward(3, 0.2)
        .reward(4, 1.0)
        .reward(5, 0.3)
        .reward(6, 0.1)
        .build()
}

/// Root 0 → {1, 2}; 1 is terminal, 2 fails on `next_actions`.
pub fn with_broken_child() -> Rc<TableGraph> {
    TableGraph::new()
        .edge(0, &[1, 2])
        .reward(1, 1.0)
        .broken(2)
        .build()
}
