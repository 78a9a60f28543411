// ---------------------------------------------------------------------------
// VertexIndex — typed arena index
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct VertexIndex(u32);

impl VertexIndex {
    pub(crate) fn new(idx: usize) -> Self {
        debug_assert!(idx <= u32::MAX as usize, "VertexIndex overflow: {idx}");
        Self(idx as u32)
    }

    pub(crate) fn as_usize(self) -> usize {
        self.0 as usize
    }
}

// ---------------------------------------------------------------------------
// Children — expansion status
// ---------------------------------------------------------------------------

/// Expansion status of a vertex.
///
/// `Unexpanded` until the first expansion, then `Terminal` or `Expanded`
/// forever. `Expanded` is never empty.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Children {
    #[default]
    Unexpanded,
    Terminal,
    Expanded(Vec<VertexIndex>),
}

impl Children {
    /// Children as a slice. Empty for both `Unexpanded` and `Terminal`.
    pub fn as_slice(&self) -> &[VertexIndex] {
        match self {
            Children::Expanded(children) => children,
            Children::Unexpanded | Children::Terminal => &[],
        }
    }

    pub fn is_expanded(&self) -> bool {
        !matches!(self, Children::Unexpanded)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Children::Terminal)
    }
}

// ---------------------------------------------------------------------------
// Vertex — per-state statistics
// ---------------------------------------------------------------------------

/// Search statistics for one canonical state.
///
/// `value` is the running mean of every value backed up through this
/// vertex, so `value_estimate()` is directly comparable to rewards.
#[derive(Clone, Debug)]
pub struct Vertex<S> {
    state: S,
    visit_count: u32,
    value: f32,
    children: Children,
}

impl<S> Vertex<S> {
    pub fn new(state: S) -> Self {
        Self {
            state,
            visit_count: 0,
            value: 0.0,
            children: Children::Unexpanded,
        }
    }

    // --- Getters ---

    pub fn state(&self) -> &S {
        &self.state
    }
    pub fn visit_count(&self) -> u32 {
        self.visit_count
    }
    pub fn value_estimate(&self) -> f32 {
        self.value
    }
    pub fn children(&self) -> &Children {
        &self.children
    }

    // --- Setters ---

    /// Record the expansion result. An empty list makes the vertex terminal.
    pub fn set_children(&mut self, children: Vec<VertexIndex>) {
        debug_assert!(
            !self.children.is_expanded(),
            "set_children: vertex already expanded ({:?})",
            self.children
        );
        self.children = if children.is_empty() {
            Children::Terminal
        } else {
            Children::Expanded(children)
        };
    }

    // --- Value update ---

    /// Welford running-average update: value ← value + (x - value) / visits.
    /// Increments visit_count.
    pub fn update(&mut self, x: f32) {
        self.visit_count += 1;
        self.value += (x - self.value) / self.visit_count as f32;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
