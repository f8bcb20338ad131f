// src/fleet.rs

//! The fixed pool of compute nodes a plan is built against.
//!
//! A [`Fleet`] keeps nodes in declaration order. That order is the
//! tie-break whenever two nodes give the same earliest finish time, so it
//! is never derived from a hash map.

use std::collections::{BTreeSet, HashMap};

use crate::errors::{HeftError, Result};
use crate::types::{NodeId, ZoneId};

/// One compute node.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: NodeId,
    pub zone: ZoneId,
    /// Node class (e.g. `"master"`, `"worker"`); selects a column of the
    /// execution-cost table.
    pub class: String,
    /// Relative capacity; execution costs are divided by it.
    pub capacity: f64,
}

impl Node {
    pub fn new(id: &str, zone: &str, class: &str, capacity: f64) -> Self {
        Self {
            id: id.to_string(),
            zone: zone.to_string(),
            class: class.to_string(),
            capacity,
        }
    }
}

/// Ordered, immutable set of nodes.
#[derive(Debug, Clone)]
pub struct Fleet {
    nodes: Vec<Node>,
    by_id: HashMap<NodeId, usize>,
}

impl Fleet {
    /// Build a fleet, rejecting empty fleets, duplicate ids and capacities
    /// that cannot be used as a divisor.
    pub fn new(nodes: Vec<Node>) -> Result<Self> {
        if nodes.is_empty() {
            return Err(HeftError::config("fleet must contain at least one node"));
        }

        let mut by_id = HashMap::with_capacity(nodes.len());
        for (idx, node) in nodes.iter().enumerate() {
            if node.id.trim().is_empty() {
                return Err(HeftError::config("node id must not be empty"));
            }
            if !node.capacity.is_finite() || node.capacity <= 0.0 {
                return Err(HeftError::config(format!(
                    "node '{}' has invalid capacity {} (must be finite and > 0)",
                    node.id, node.capacity
                )));
            }
            if by_id.insert(node.id.clone(), idx).is_some() {
                return Err(HeftError::config(format!(
                    "node '{}' is declared more than once",
                    node.id
                )));
            }
        }

        Ok(Self { nodes, by_id })
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Nodes in declaration order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Position of a node in declaration order.
    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.by_id.get(id).copied()
    }

    pub fn get(&self, id: &str) -> Option<&Node> {
        self.index_of(id).map(|idx| &self.nodes[idx])
    }

    /// Like [`Fleet::get`], but an unknown id is an error.
    pub fn node(&self, id: &str) -> Result<&Node> {
        self.get(id)
            .ok_or_else(|| HeftError::UnknownNode(id.to_string()))
    }

    /// Distinct zones, sorted.
    pub fn zones(&self) -> BTreeSet<&str> {
        self.nodes.iter().map(|n| n.zone.as_str()).collect()
    }

    /// Distinct node classes, sorted.
    pub fn classes(&self) -> BTreeSet<&str> {
        self.nodes.iter().map(|n| n.class.as_str()).collect()
    }
}
