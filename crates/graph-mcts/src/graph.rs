use std::collections::HashMap;
use std::ops::{Index, IndexMut};

use crate::problem::State;
use crate::vertex::{Vertex, VertexIndex};

// ---------------------------------------------------------------------------
// VertexCache — arena + canonical state index
// ---------------------------------------------------------------------------

/// Owns every vertex of the search graph.
///
/// Vertices live in an arena and are addressed by `VertexIndex`. A hash
/// index maps each distinct state to its single vertex, so transpositions
/// reached through different parents resolve to the same index.
///
/// Append-only: nothing is evicted until `clear`.
pub struct VertexCache<S> {
    vertices: Vec<Vertex<S>>,
    index: HashMap<S, VertexIndex>,
}

impl<S: State> VertexCache<S> {
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            index: HashMap::new(),
        }
    }

    pub fn with_capacity(cap: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(cap),
            index: HashMap::with_capacity(cap),
        }
    }

    /// Vertex for `state`, allocated on first request.
    pub fn vertex_for(&mut self, state: S) -> VertexIndex {
        if let Some(&idx) = self.index.get(&state) {
            return idx;
        }

        let idx = VertexIndex::new(self.vertices.len());
        self.vertices.push(Vertex::new(state.clone()));
        self.index.insert(state, idx);
        idx
    }

    /// Lookup without allocating.
    pub fn get(&self, state: &S) -> Option<VertexIndex> {
        self.index.get(state).copied()
    }

    pub fn clear(&mut self) {
        self.vertices.clear();
        self.index.clear();
    }
}

impl<S> VertexCache<S> {
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// All vertices in allocation order.
    pub fn iter(&self) -> impl Iterator<Item = (VertexIndex, &Vertex<S>)> {
        self.vertices
            .iter()
            .enumerate()
            .map(|(i, v)| (VertexIndex::new(i), v))
    }
}

impl<S: State> Default for VertexCache<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> Index<VertexIndex> for VertexCache<S> {
    type Output = Vertex<S>;
    fn index(&self, idx: VertexIndex) -> &Self::Output {
        &self.vertices[idx.as_usize()]
    }
}

impl<S> IndexMut<VertexIndex> for VertexCache<S> {
    fn index_mut(&mut self, idx: VertexIndex) -> &mut Self::Output {
        &mut self.vertices[idx.as_usize()]
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
