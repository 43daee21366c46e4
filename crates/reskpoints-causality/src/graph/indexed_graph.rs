//! Arena-backed adjacency graph with slot-indexed nodes and an edge map
//! keyed by slot pairs.
//!
//! Forward and backward adjacency are two views of the single `edges` map:
//! every key `(s, t)` appears in `outgoing` of `s` and `incoming` of `t`.
//! `verify_consistency` checks that invariant.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use reskpoints_core::errors::CausalityError;
use reskpoints_core::models::{CausalityEdge, CausalityNode, Confidence, NodeId, RelationKind};

/// Position of a node in the arena. Slots of evicted nodes are reused.
pub type Slot = usize;

/// Adjacency direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Follow edges from source to target ("what did this cause?").
    Outgoing,
    /// Follow edges from target to source ("what caused this?").
    Incoming,
}

/// Outcome of an edge write.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EdgeUpsert {
    /// No edge existed for the ordered pair; one was created.
    Created { confidence: f64 },
    /// The observation raised the existing edge's confidence.
    Strengthened { previous: f64, confidence: f64 },
    /// The observation was folded in but did not exceed the stored confidence.
    Unchanged { confidence: f64 },
}

impl EdgeUpsert {
    pub fn confidence(&self) -> f64 {
        match *self {
            Self::Created { confidence }
            | Self::Strengthened { confidence, .. }
            | Self::Unchanged { confidence } => confidence,
        }
    }
}

#[derive(Debug, Clone)]
struct NodeEntry {
    node: Arc<CausalityNode>,
    outgoing: BTreeSet<Slot>,
    incoming: BTreeSet<Slot>,
}

/// The causality graph. Cheap to clone: nodes are shared via `Arc`.
#[derive(Debug, Clone, Default)]
pub struct CausalityGraph {
    slots: Vec<Option<NodeEntry>>,
    free: Vec<Slot>,
    index: HashMap<NodeId, Slot>,
    edges: HashMap<(Slot, Slot), CausalityEdge>,
    by_time: BTreeSet<(DateTime<Utc>, Slot)>,
}

impl CausalityGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.index.len()
    }

    /// Number of edges.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    // --- Nodes ---

    /// Insert a node. Fails with `DuplicateNode` if the id is already present.
    pub fn insert_node(&mut self, node: CausalityNode) -> Result<Slot, CausalityError> {
        if self.index.contains_key(&node.id) {
            return Err(CausalityError::DuplicateNode {
                id: node.id.0.clone(),
            });
        }
        let entry = NodeEntry {
            node: Arc::new(node),
            outgoing: BTreeSet::new(),
            incoming: BTreeSet::new(),
        };
        let slot = match self.free.pop() {
            Some(slot) => {
                self.slots[slot] = Some(entry);
                slot
            }
            None => {
                self.slots.push(Some(entry));
                self.slots.len() - 1
            }
        };
        let node = self.entry(slot).map(|e| Arc::clone(&e.node));
        if let Some(node) = node {
            self.index.insert(node.id.clone(), slot);
            self.by_time.insert((node.timestamp, slot));
        }
        Ok(slot)
    }

    /// Look up a node's slot by id.
    pub fn slot(&self, id: &str) -> Option<Slot> {
        self.index.get(id).copied()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Node stored at a slot.
    pub fn node(&self, slot: Slot) -> Option<&Arc<CausalityNode>> {
        self.entry(slot).map(|e| &e.node)
    }

    /// Node by id.
    pub fn get(&self, id: &str) -> Option<&Arc<CausalityNode>> {
        self.slot(id).and_then(|slot| self.node(slot))
    }

    /// All nodes, in no particular order.
    pub fn nodes(&self) -> impl Iterator<Item = &Arc<CausalityNode>> {
        self.slots.iter().flatten().map(|e| &e.node)
    }

    /// Slots of nodes whose timestamp falls within `[from, to]`, oldest first.
    pub fn slots_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> impl Iterator<Item = Slot> + '_ {
        let range = if from <= to {
            Some(self.by_time.range((from, Slot::MIN)..=(to, Slot::MAX)))
        } else {
            None
        };
        range.into_iter().flatten().map(|&(_, slot)| slot)
    }

    /// Slots of nodes strictly older than `cutoff`.
    pub fn slots_before(&self, cutoff: DateTime<Utc>) -> Vec<Slot> {
        self.by_time
            .range(..(cutoff, Slot::MIN))
            .map(|&(_, slot)| slot)
            .collect()
    }

    /// Remove a node and every edge touching it. Returns the number of edges removed.
    pub fn remove_node(&mut self, slot: Slot) -> usize {
        let Some(entry) = self.slots.get_mut(slot).and_then(Option::take) else {
            return 0;
        };
        let mut removed = 0;
        for &target in &entry.outgoing {
            if self.edges.remove(&(slot, target)).is_some() {
                removed += 1;
            }
            if let Some(t) = self.entry_mut(target) {
                t.incoming.remove(&slot);
            }
        }
        for &source in &entry.incoming {
            if self.edges.remove(&(source, slot)).is_some() {
                removed += 1;
            }
            if let Some(s) = self.entry_mut(source) {
                s.outgoing.remove(&slot);
            }
        }
        self.index.remove(&entry.node.id);
        self.by_time.remove(&(entry.node.timestamp, slot));
        self.free.push(slot);
        removed
    }

    // --- Edges ---

    /// Edge for the ordered pair, if any.
    pub fn edge(&self, source: &str, target: &str) -> Option<&CausalityEdge> {
        let s = self.slot(source)?;
        let t = self.slot(target)?;
        self.edges.get(&(s, t))
    }

    /// Edge between two slots, if any.
    pub fn edge_at(&self, source: Slot, target: Slot) -> Option<&CausalityEdge> {
        self.edges.get(&(source, target))
    }

    /// All edges, in no particular order.
    pub fn edges(&self) -> impl Iterator<Item = &CausalityEdge> {
        self.edges.values()
    }

    /// Create the edge for `source → target`, or fold the observation into the
    /// existing one with `max(old, observed)`.
    pub fn upsert_edge(
        &mut self,
        source: &str,
        target: &str,
        confidence: Confidence,
        kind: RelationKind,
        at: DateTime<Utc>,
        evidence: Option<&str>,
    ) -> Result<EdgeUpsert, CausalityError> {
        if source == target {
            return Err(CausalityError::SelfLoop {
                id: source.to_string(),
            });
        }
        let s = self.require(source)?;
        let t = self.require(target)?;

        if let Some(edge) = self.edges.get_mut(&(s, t)) {
            let previous = edge.confidence.value();
            let raised = edge.strengthen(confidence, at, evidence);
            let current = edge.confidence.value();
            return Ok(if raised {
                EdgeUpsert::Strengthened {
                    previous,
                    confidence: current,
                }
            } else {
                EdgeUpsert::Unchanged {
                    confidence: current,
                }
            });
        }

        let mut edge = CausalityEdge::new(
            NodeId(source.to_string()),
            NodeId(target.to_string()),
            confidence,
            kind,
            at,
        );
        if let Some(ev) = evidence {
            edge.add_evidence(ev);
        }
        self.link(s, t, edge);
        Ok(EdgeUpsert::Created {
            confidence: confidence.value(),
        })
    }

    /// Insert a fully formed edge as-is (used when restoring persisted records).
    /// Returns `Ok(false)` if an edge already exists for the ordered pair.
    pub fn restore_edge(&mut self, edge: CausalityEdge) -> Result<bool, CausalityError> {
        if edge.source == edge.target {
            return Err(CausalityError::SelfLoop {
                id: edge.source.0.clone(),
            });
        }
        let s = self.require(edge.source.as_str())?;
        let t = self.require(edge.target.as_str())?;
        if self.edges.contains_key(&(s, t)) {
            return Ok(false);
        }
        self.link(s, t, edge);
        Ok(true)
    }

    /// Adjacent slots and the connecting edge in the given direction.
    ///
    /// Yields `GraphInconsistency` if an adjacency entry has no backing edge.
    pub fn neighbors(
        &self,
        slot: Slot,
        direction: Direction,
    ) -> impl Iterator<Item = Result<(Slot, &CausalityEdge), CausalityError>> + '_ {
        self.entry(slot).into_iter().flat_map(move |entry| {
            let set = match direction {
                Direction::Outgoing => &entry.outgoing,
                Direction::Incoming => &entry.incoming,
            };
            set.iter().map(move |&other| {
                let key = match direction {
                    Direction::Outgoing => (slot, other),
                    Direction::Incoming => (other, slot),
                };
                self.edges
                    .get(&key)
                    .map(|edge| (other, edge))
                    .ok_or_else(|| CausalityError::GraphInconsistency {
                        details: format!(
                            "adjacency lists {} -> {} but the edge set has no such edge",
                            key.0, key.1
                        ),
                    })
            })
        })
    }

    /// Number of edges in the given direction.
    pub fn degree(&self, slot: Slot, direction: Direction) -> usize {
        self.entry(slot).map_or(0, |e| match direction {
            Direction::Outgoing => e.outgoing.len(),
            Direction::Incoming => e.incoming.len(),
        })
    }

    /// Check that both adjacency views, the id index, and the time index agree
    /// with the node arena and the edge set.
    pub fn verify_consistency(&self) -> Result<(), CausalityError> {
        let inconsistent = |details: String| Err(CausalityError::GraphInconsistency { details });

        let live = self.slots.iter().flatten().count();
        if live != self.index.len() || live != self.by_time.len() {
            return inconsistent(format!(
                "{live} live slots, {} indexed ids, {} time entries",
                self.index.len(),
                self.by_time.len()
            ));
        }
        for (id, &slot) in &self.index {
            match self.node(slot) {
                Some(node) if &node.id == id => {}
                _ => return inconsistent(format!("index entry {id} points at slot {slot}")),
            }
        }

        let mut forward = 0;
        let mut backward = 0;
        for entry in self.slots.iter().flatten() {
            forward += entry.outgoing.len();
            backward += entry.incoming.len();
        }
        if forward != self.edges.len() || backward != self.edges.len() {
            return inconsistent(format!(
                "forward view has {forward} edges, backward view has {backward}, edge set has {}",
                self.edges.len()
            ));
        }
        for (&(s, t), edge) in &self.edges {
            let (Some(src), Some(dst)) = (self.entry(s), self.entry(t)) else {
                return inconsistent(format!("edge {s} -> {t} references an empty slot"));
            };
            if !src.outgoing.contains(&t) || !dst.incoming.contains(&s) {
                return inconsistent(format!("edge {s} -> {t} missing from an adjacency view"));
            }
            if src.node.id != edge.source || dst.node.id != edge.target {
                return inconsistent(format!(
                    "edge {} -> {} stored under slots of {} -> {}",
                    edge.source, edge.target, src.node.id, dst.node.id
                ));
            }
        }
        Ok(())
    }

    // --- Internal ---

    fn entry(&self, slot: Slot) -> Option<&NodeEntry> {
        self.slots.get(slot).and_then(Option::as_ref)
    }

    fn entry_mut(&mut self, slot: Slot) -> Option<&mut NodeEntry> {
        self.slots.get_mut(slot).and_then(Option::as_mut)
    }

    fn require(&self, id: &str) -> Result<Slot, CausalityError> {
        self.slot(id).ok_or_else(|| CausalityError::UnknownNode { id: id.to_string() })
    }

    fn link(&mut self, s: Slot, t: Slot, edge: CausalityEdge) {
        self.edges.insert((s, t), edge);
        if let Some(src) = self.entry_mut(s) {
            src.outgoing.insert(t);
        }
        if let Some(dst) = self.entry_mut(t) {
            dst.incoming.insert(s);
        }
    }
}
