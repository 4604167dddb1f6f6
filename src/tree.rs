//! Parent-pointer output of a traversal.

use crate::edge::VertexId;

/// Slot value for a vertex the traversal never reached.
pub const UNREACHED: VertexId = u64::MAX;

/// Slot value for the traversal root.
pub const ROOT: VertexId = u64::MAX - 1;

/// Decoded value of one tree slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Parent {
    /// The vertex is the traversal source.
    Root,
    /// The vertex was reached through an edge from this vertex.
    Vertex(VertexId),
    /// The vertex is not connected to the source.
    Unreached,
}

impl Parent {
    #[inline]
    #[must_use]
    pub fn decode(slot: VertexId) -> Self {
        match slot {
            UNREACHED => Parent::Unreached,
            ROOT => Parent::Root,
            u => Parent::Vertex(u),
        }
    }

    #[inline]
    #[must_use]
    pub fn encode(self) -> VertexId {
        match self {
            Parent::Unreached => UNREACHED,
            Parent::Root => ROOT,
            Parent::Vertex(u) => u,
        }
    }

    #[must_use]
    pub fn is_reached(self) -> bool {
        self != Parent::Unreached
    }
}

/// BFS spanning tree indexed by vertex id.
///
/// Slot `v` holds the parent of `v`, [`ROOT`] for the source, or
/// [`UNREACHED`]. Exactly one slot holds [`ROOT`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BfsTree {
    source: VertexId,
    slots: Vec<VertexId>,
}

impl BfsTree {
    pub(crate) fn from_parts(source: VertexId, slots: Vec<VertexId>) -> Self {
        Self { source, slots }
    }

    #[must_use]
    pub fn source(&self) -> VertexId {
        self.source
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Parent of `v`; ids past the end read as unreached.
    #[must_use]
    pub fn parent(&self, v: VertexId) -> Parent {
        usize::try_from(v)
            .ok()
            .and_then(|i| self.slots.get(i))
            .map_or(Parent::Unreached, |&slot| Parent::decode(slot))
    }

    #[must_use]
    pub fn is_reached(&self, v: VertexId) -> bool {
        self.parent(v).is_reached()
    }

    /// Number of vertices in the source's component.
    #[must_use]
    pub fn reached_count(&self) -> usize {
        self.slots.iter().filter(|&&slot| slot != UNREACHED).count()
    }

    /// Iterates `(vertex, parent)` for every reached vertex.
    pub fn reached(&self) -> impl Iterator<Item = (VertexId, Parent)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, &slot)| slot != UNREACHED)
            .map(|(v, &slot)| (v as VertexId, Parent::decode(slot)))
    }

    /// Follows parent pointers from `v` up to the root, returning the path
    /// `[v, parent(v), .., source]`. `None` when `v` is unreached or the walk
    /// does not terminate within `len()` steps.
    #[must_use]
    pub fn path_to_root(&self, v: VertexId) -> Option<Vec<VertexId>> {
        let mut path = vec![v];
        let mut current = v;
        for _ in 0..=self.slots.len() {
            match self.parent(current) {
                Parent::Root => return Some(path),
                Parent::Unreached => return None,
                Parent::Vertex(u) => {
                    path.push(u);
                    current = u;
                }
            }
        }
        None
    }

    #[must_use]
    pub fn as_slice(&self) -> &[VertexId] {
        &self.slots
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<VertexId> {
        self.slots
    }
}
