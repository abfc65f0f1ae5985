//! Chromosome representation: an ordered, acyclic chain of typed nodes.
//!
//! Nodes live in an arena (`Vec<Node>`) and are chained through explicit
//! `next`/`prev` arena indices instead of raw pointers. Removed nodes stay
//! in the arena unlinked; only the linked chain is semantically part of
//! the chromosome.
//!
//! A chromosome carries a lazily cached fitness value. Every structural
//! edit goes through methods that invalidate it, so a clean fitness always
//! describes the current node sequence.

use crate::error::{EvoError, Result};
use rand::Rng;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Closed set of node payload variants.
///
/// The engine attaches no meaning to a payload; interpretation belongs to
/// the external evaluator. Variation and evaluation collaborators must
/// handle every kind they encounter or fail with
/// [`EvoError::UnsupportedObjectKind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ObjectKind {
    /// Signed integer payload, randomly initialized in `0..=1000`.
    Integer,
    /// Real-valued payload, randomly initialized in `-1.0..1.0`.
    Real,
    /// Small bit-pattern payload, randomly initialized in `0..512`.
    Bits,
}

/// One node's payload, tagged by [`ObjectKind`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NodePayload {
    Integer(i64),
    Real(f64),
    Bits(u16),
}

impl NodePayload {
    /// Creates a random payload of the given kind.
    pub fn random<R: Rng>(kind: ObjectKind, rng: &mut R) -> Self {
        match kind {
            ObjectKind::Integer => NodePayload::Integer(rng.random_range(0..=1000)),
            ObjectKind::Real => NodePayload::Real(rng.random_range(-1.0..1.0)),
            ObjectKind::Bits => NodePayload::Bits(rng.random_range(0..512)),
        }
    }

    /// The kind this payload belongs to.
    pub fn kind(&self) -> ObjectKind {
        match self {
            NodePayload::Integer(_) => ObjectKind::Integer,
            NodePayload::Real(_) => ObjectKind::Real,
            NodePayload::Bits(_) => ObjectKind::Bits,
        }
    }

    /// Content hash contribution. `f64` payloads hash by bit pattern so
    /// structurally identical chromosomes share a signature.
    fn hash_into<H: Hasher>(&self, state: &mut H) {
        match self {
            NodePayload::Integer(v) => {
                0u8.hash(state);
                v.hash(state);
            }
            NodePayload::Real(v) => {
                1u8.hash(state);
                v.to_bits().hash(state);
            }
            NodePayload::Bits(v) => {
                2u8.hash(state);
                v.hash(state);
            }
        }
    }
}

impl std::fmt::Display for NodePayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NodePayload::Integer(v) => write!(f, "int:{v}"),
            NodePayload::Real(v) => write!(f, "real:{v:.6}"),
            NodePayload::Bits(v) => write!(f, "bits:{v:09b}"),
        }
    }
}

/// One arena slot: payload plus chain links.
#[derive(Debug, Clone)]
struct Node {
    payload: NodePayload,
    next: Option<usize>,
    prev: Option<usize>,
}

/// One candidate individual: a non-empty, acyclic ordered node chain.
#[derive(Debug, Clone)]
pub struct Chromosome {
    kind: ObjectKind,
    nodes: Vec<Node>,
    head: usize,
    tail: usize,
    /// Number of linked (live) nodes; the arena may hold unlinked slots.
    len: usize,
    /// `Some` once evaluated, `None` while dirty.
    fitness: Option<f64>,
}

impl Chromosome {
    /// Builds a chromosome of `size` randomly initialized nodes.
    pub fn random<R: Rng>(size: usize, kind: ObjectKind, rng: &mut R) -> Result<Self> {
        if size == 0 {
            return Err(EvoError::Configuration(
                "chromosome size must be at least 1".into(),
            ));
        }
        let payloads = (0..size).map(|_| NodePayload::random(kind, rng)).collect();
        Self::from_payloads(kind, payloads)
    }

    /// Builds a chromosome from an ordered payload sequence.
    ///
    /// The result is unevaluated. Fails if `payloads` is empty or contains
    /// a payload of a different kind.
    pub fn from_payloads(kind: ObjectKind, payloads: Vec<NodePayload>) -> Result<Self> {
        if payloads.is_empty() {
            return Err(EvoError::StructuralInvariant(
                "chromosome must contain at least one node".into(),
            ));
        }
        let len = payloads.len();
        let mut nodes = Vec::with_capacity(len);
        for (i, payload) in payloads.into_iter().enumerate() {
            if payload.kind() != kind {
                return Err(EvoError::StructuralInvariant(format!(
                    "payload kind {:?} does not match chromosome kind {kind:?}",
                    payload.kind()
                )));
            }
            nodes.push(Node {
                payload,
                next: (i + 1 < len).then_some(i + 1),
                prev: i.checked_sub(1),
            });
        }
        Ok(Self {
            kind,
            nodes,
            head: 0,
            tail: len - 1,
            len,
            fitness: None,
        })
    }

    /// Number of nodes in the chain.
    pub fn len(&self) -> usize {
        self.len
    }

    /// A chromosome is never empty; present for API completeness.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The object kind shared by every node.
    pub fn kind(&self) -> ObjectKind {
        self.kind
    }

    /// Cached fitness, or [`EvoError::NotEvaluated`] while dirty.
    pub fn fitness(&self) -> Result<f64> {
        self.fitness.ok_or(EvoError::NotEvaluated)
    }

    /// True once a fitness value is cached.
    pub fn is_evaluated(&self) -> bool {
        self.fitness.is_some()
    }

    /// Records an evaluator result, marking the chromosome clean.
    ///
    /// The value must be finite; the runner enforces this for values it
    /// writes back, and non-finite values here would corrupt fitness
    /// ordering.
    pub fn set_fitness(&mut self, fitness: f64) {
        self.fitness = Some(fitness);
    }

    /// Invalidates the cached fitness.
    ///
    /// Called automatically by every structural edit; exposed for
    /// collaborators that change payloads through other means.
    pub fn mark_dirty(&mut self) {
        self.fitness = None;
    }

    /// Iterates payloads in chain order.
    pub fn iter(&self) -> PayloadIter<'_> {
        PayloadIter {
            chromosome: self,
            cursor: Some(self.head),
        }
    }

    /// Ordered payload snapshot.
    pub fn payloads(&self) -> Vec<NodePayload> {
        self.iter().copied().collect()
    }

    /// Payload at chain position `pos`, if in range.
    pub fn payload_at(&self, pos: usize) -> Option<&NodePayload> {
        self.arena_index_of(pos).map(|i| &self.nodes[i].payload)
    }

    /// Replaces the payload at chain position `pos` and marks dirty.
    pub fn set_payload(&mut self, pos: usize, payload: NodePayload) -> Result<()> {
        if payload.kind() != self.kind {
            return Err(EvoError::StructuralInvariant(format!(
                "payload kind {:?} does not match chromosome kind {:?}",
                payload.kind(),
                self.kind
            )));
        }
        let idx = self.arena_index_of(pos).ok_or_else(|| {
            EvoError::StructuralInvariant(format!(
                "position {pos} out of range for chromosome of length {}",
                self.len
            ))
        })?;
        self.nodes[idx].payload = payload;
        self.mark_dirty();
        Ok(())
    }

    /// Inserts a node so the new payload occupies chain position `pos`
    /// (`pos == len` appends). Marks dirty.
    pub fn insert(&mut self, pos: usize, payload: NodePayload) -> Result<()> {
        if payload.kind() != self.kind {
            return Err(EvoError::StructuralInvariant(format!(
                "payload kind {:?} does not match chromosome kind {:?}",
                payload.kind(),
                self.kind
            )));
        }
        if pos > self.len {
            return Err(EvoError::StructuralInvariant(format!(
                "insert position {pos} out of range for chromosome of length {}",
                self.len
            )));
        }
        let new = self.nodes.len();
        if pos == self.len {
            // append after tail
            self.nodes.push(Node {
                payload,
                next: None,
                prev: Some(self.tail),
            });
            self.nodes[self.tail].next = Some(new);
            self.tail = new;
        } else {
            let at = self
                .arena_index_of(pos)
                .ok_or_else(|| EvoError::StructuralInvariant("broken chain".into()))?;
            let prev = self.nodes[at].prev;
            self.nodes.push(Node {
                payload,
                next: Some(at),
                prev,
            });
            self.nodes[at].prev = Some(new);
            match prev {
                Some(p) => self.nodes[p].next = Some(new),
                None => self.head = new,
            }
        }
        self.len += 1;
        self.mark_dirty();
        Ok(())
    }

    /// Unlinks the node at chain position `pos`, returning its payload.
    ///
    /// Fails rather than leave the chromosome empty.
    pub fn remove(&mut self, pos: usize) -> Result<NodePayload> {
        if self.len == 1 {
            return Err(EvoError::StructuralInvariant(
                "cannot remove the last node of a chromosome".into(),
            ));
        }
        let at = self.arena_index_of(pos).ok_or_else(|| {
            EvoError::StructuralInvariant(format!(
                "remove position {pos} out of range for chromosome of length {}",
                self.len
            ))
        })?;
        let (prev, next) = (self.nodes[at].prev, self.nodes[at].next);
        match prev {
            Some(p) => self.nodes[p].next = next,
            None => self.head = next.ok_or_else(|| {
                EvoError::StructuralInvariant("removing sole node of a chain".into())
            })?,
        }
        match next {
            Some(n) => self.nodes[n].prev = prev,
            None => {
                self.tail = prev.ok_or_else(|| {
                    EvoError::StructuralInvariant("removing sole node of a chain".into())
                })?
            }
        }
        self.nodes[at].next = None;
        self.nodes[at].prev = None;
        self.len -= 1;
        self.mark_dirty();
        Ok(self.nodes[at].payload)
    }

    /// Content-addressed structural signature over kind and ordered payloads.
    ///
    /// Structurally identical chromosomes share a signature regardless of
    /// arena layout or ownership.
    pub fn signature(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.kind.hash(&mut hasher);
        self.len.hash(&mut hasher);
        for payload in self.iter() {
            payload.hash_into(&mut hasher);
        }
        hasher.finish()
    }

    /// Node-by-node payload and order equality.
    pub fn structurally_eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.len == other.len && self.iter().eq(other.iter())
    }

    /// Verifies chain integrity: non-empty, acyclic, consistent
    /// `next`/`prev` links, and a reachable tail.
    ///
    /// Run after every collaborator call; a failure aborts the run.
    pub fn check_structure(&self) -> Result<()> {
        if self.len == 0 {
            return Err(EvoError::StructuralInvariant("empty chromosome".into()));
        }
        if self.head >= self.nodes.len() || self.tail >= self.nodes.len() {
            return Err(EvoError::StructuralInvariant(
                "head or tail index outside arena".into(),
            ));
        }
        if self.nodes[self.head].prev.is_some() {
            return Err(EvoError::StructuralInvariant(
                "head node has a predecessor".into(),
            ));
        }
        let mut visited = vec![false; self.nodes.len()];
        let mut cursor = self.head;
        let mut count = 1usize;
        visited[cursor] = true;
        while let Some(next) = self.nodes[cursor].next {
            if next >= self.nodes.len() {
                return Err(EvoError::StructuralInvariant(
                    "next link outside arena".into(),
                ));
            }
            if visited[next] {
                return Err(EvoError::StructuralInvariant(
                    "cycle detected in node chain".into(),
                ));
            }
            if self.nodes[next].prev != Some(cursor) {
                return Err(EvoError::StructuralInvariant(
                    "prev link does not mirror next link".into(),
                ));
            }
            visited[next] = true;
            cursor = next;
            count += 1;
        }
        if cursor != self.tail {
            return Err(EvoError::StructuralInvariant(
                "chain does not terminate at tail".into(),
            ));
        }
        if count != self.len {
            return Err(EvoError::StructuralInvariant(format!(
                "chain length {count} disagrees with recorded length {}",
                self.len
            )));
        }
        Ok(())
    }

    /// Arena index of the node at chain position `pos`.
    fn arena_index_of(&self, pos: usize) -> Option<usize> {
        if pos >= self.len {
            return None;
        }
        let mut cursor = self.head;
        for _ in 0..pos {
            cursor = self.nodes[cursor].next?;
        }
        Some(cursor)
    }
}

/// Iterator over payloads in chain order.
pub struct PayloadIter<'a> {
    chromosome: &'a Chromosome,
    cursor: Option<usize>,
}

impl<'a> Iterator for PayloadIter<'a> {
    type Item = &'a NodePayload;

    fn next(&mut self) -> Option<Self::Item> {
        let idx = self.cursor?;
        let node = &self.chromosome.nodes[idx];
        self.cursor = node.next;
        Some(&node.payload)
    }
}
