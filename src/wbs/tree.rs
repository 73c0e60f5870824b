//! The flat, level-encoded WBS tree and its structural operations.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{rollup, toggle};
use crate::error::{Result, WbsError};
use crate::models::{NodePosition, NodeView, UpdateNodeInput, WbsNode, MAX_LEVEL};

/// Why a calendar click left the tree unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IgnoredReason {
    /// The row has children; its dates are computed from them.
    GroupingNode,
    /// The row is excluded from export and cannot hold a schedule.
    ExportDisabled,
    /// The date is not on the grid.
    OutsideCalendar,
}

/// Result of a click on a calendar cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ClickOutcome {
    Updated { node: NodeView },
    Ignored { reason: IgnoredReason },
}

/// An ordered sequence of [`WbsNode`]s encoding a tree by nesting level.
///
/// Invariants, upheld by every operation:
/// - the tree is never empty
/// - the first node is at level 0
/// - each node is at most one level deeper than its predecessor
/// - every node with children has the rolled-up span of its children as schedule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<WbsNode>", into = "Vec<WbsNode>")]
pub struct WbsTree {
    nodes: Vec<WbsNode>,
}

impl Default for WbsTree {
    fn default() -> Self {
        Self::new()
    }
}

impl TryFrom<Vec<WbsNode>> for WbsTree {
    type Error = WbsError;

    fn try_from(nodes: Vec<WbsNode>) -> Result<Self> {
        Self::from_nodes(nodes)
    }
}

impl From<WbsTree> for Vec<WbsNode> {
    fn from(tree: WbsTree) -> Self {
        tree.nodes
    }
}

impl WbsTree {
    /// A tree holding a single blank root row.
    pub fn new() -> Self {
        Self {
            nodes: vec![WbsNode::new(0)],
        }
    }

    /// Build a tree from an externally supplied sequence.
    ///
    /// The sequence is validated against the level invariants and rolled up,
    /// so stale parent schedules are replaced by their children's span.
    pub fn from_nodes(nodes: Vec<WbsNode>) -> Result<Self> {
        if nodes.is_empty() {
            return Err(WbsError::EmptyTree);
        }

        let mut previous: Option<u8> = None;
        for (index, node) in nodes.iter().enumerate() {
            let max = previous.map_or(0, |p| (p + 1).min(MAX_LEVEL));
            if node.level > max {
                return Err(WbsError::InvalidLevel {
                    index,
                    level: node.level,
                    max,
                });
            }
            if let Some(range) = node.schedule {
                if !range.is_valid() {
                    return Err(WbsError::InvalidDateRange {
                        start: range.start,
                        end: range.end,
                    });
                }
            }
            previous = Some(node.level);
        }

        let mut tree = Self { nodes };
        for node in tree.nodes.iter_mut().filter(|n| !n.include_in_export) {
            node.schedule = None;
        }
        tree.rollup();
        Ok(tree)
    }

    pub fn nodes(&self) -> &[WbsNode] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, id: Uuid) -> Option<&WbsNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn index_of(&self, id: Uuid) -> Result<usize> {
        self.nodes
            .iter()
            .position(|n| n.id == id)
            .ok_or(WbsError::NodeNotFound(id))
    }

    /// Whether the row right after `index` is nested deeper.
    pub fn has_children(&self, index: usize) -> bool {
        match (self.nodes.get(index), self.nodes.get(index + 1)) {
            (Some(node), Some(next)) => next.level > node.level,
            _ => false,
        }
    }

    /// Exclusive end index of the subtree rooted at `index`.
    pub fn subtree_end(&self, index: usize) -> usize {
        let level = self.nodes[index].level;
        self.nodes[index + 1..]
            .iter()
            .position(|n| n.level <= level)
            .map_or(self.nodes.len(), |offset| index + 1 + offset)
    }

    /// Indices of the direct children of the node at `index`.
    pub fn children(&self, index: usize) -> Vec<usize> {
        let level = self.nodes[index].level;
        (index + 1..self.subtree_end(index))
            .filter(|&i| self.nodes[i].level == level + 1)
            .collect()
    }

    /// A node with its derived fields.
    pub fn view(&self, id: Uuid) -> Result<NodeView> {
        let index = self.index_of(id)?;
        Ok(self.view_at(index))
    }

    fn view_at(&self, index: usize) -> NodeView {
        let node = self.nodes[index].clone();
        NodeView {
            duration: node.duration(),
            has_children: self.has_children(index),
            node,
        }
    }

    pub fn views(&self) -> Vec<NodeView> {
        (0..self.nodes.len()).map(|i| self.view_at(i)).collect()
    }

    /// Insert a blank node and return its id.
    ///
    /// Without a reference the node is appended as a root. Otherwise it goes
    /// right after the reference, as a sibling or as a child.
    pub fn add_node(&mut self, reference: Option<Uuid>, position: NodePosition) -> Result<Uuid> {
        let (index, level) = match reference {
            None => (self.nodes.len(), 0),
            Some(id) => {
                let index = self.index_of(id)?;
                let reference_level = self.nodes[index].level;
                let level = match position {
                    NodePosition::Sibling => reference_level,
                    NodePosition::Child => (reference_level + 1).min(MAX_LEVEL),
                };
                (index + 1, level)
            }
        };

        let node = WbsNode::new(level);
        let id = node.id;
        self.nodes.insert(index, node);
        tracing::debug!("Added node {} at row {} (level {})", id, index, level);

        // A leaf that just gained a child gives up its own schedule.
        self.rollup();
        Ok(id)
    }

    /// Remove a node together with its subtree and return the removed ids.
    ///
    /// Fails with [`WbsError::LastNode`] if nothing would be left.
    pub fn remove_node(&mut self, id: Uuid) -> Result<Vec<Uuid>> {
        let index = self.index_of(id)?;
        let end = self.subtree_end(index);
        if end - index >= self.nodes.len() {
            tracing::warn!("Refusing to remove node {}: it would empty the plan", id);
            return Err(WbsError::LastNode);
        }

        let removed: Vec<Uuid> = self.nodes.drain(index..end).map(|n| n.id).collect();
        tracing::debug!("Removed {} node(s) starting at row {}", removed.len(), index);

        self.rollup();
        Ok(removed)
    }

    /// Indent (`delta > 0`) or outdent (`delta < 0`) a single node.
    ///
    /// The new level is clamped to `0..=MAX_LEVEL` and to what keeps the tree
    /// consistent: at most one deeper than the previous row, and no shallower
    /// than one above the next row. Returns the effective level.
    pub fn change_level(&mut self, id: Uuid, delta: i32) -> Result<u8> {
        let index = self.index_of(id)?;
        let current = self.nodes[index].level;

        let upper = match index {
            0 => 0,
            _ => (self.nodes[index - 1].level + 1).min(MAX_LEVEL),
        };
        let lower = self
            .nodes
            .get(index + 1)
            .map_or(0, |next| next.level.saturating_sub(1))
            .min(upper);

        let requested = i32::from(current)
            .saturating_add(delta)
            .clamp(0, i32::from(MAX_LEVEL));
        let level = (requested as u8).clamp(lower, upper);

        if level != current {
            self.nodes[index].level = level;
            tracing::debug!("Node {} moved from level {} to {}", id, current, level);
        } else {
            tracing::debug!("Level change of node {} clamped, stays at {}", id, current);
        }

        self.rollup();
        Ok(level)
    }

    /// Apply a partial update. Only schedule changes trigger a rollup.
    pub fn update_node(&mut self, id: Uuid, input: UpdateNodeInput) -> Result<NodeView> {
        let index = self.index_of(id)?;

        if input.touches_schedule() {
            if let Some(range) = input.schedule {
                if !range.is_valid() {
                    return Err(WbsError::InvalidDateRange {
                        start: range.start,
                        end: range.end,
                    });
                }
            }
            if self.has_children(index) || !self.nodes[index].include_in_export {
                return Err(WbsError::ScheduleNotEditable(id));
            }
        }

        let touches_schedule = input.touches_schedule();
        let node = &mut self.nodes[index];
        if let Some(title) = input.title {
            node.title = title;
        }
        if let Some(description) = input.description {
            node.description = description;
        }
        if let Some(priority) = input.priority {
            node.priority = priority;
        }
        if let Some(responsible) = input.responsible_id {
            node.responsible_id = normalize_responsible(responsible);
        }
        if let Some(expanded) = input.expanded {
            node.expanded = expanded;
        }
        if let Some(range) = input.schedule {
            node.schedule = Some(range);
        } else if input.clear_schedule {
            node.schedule = None;
        }

        if touches_schedule {
            self.rollup();
        }
        Ok(self.view_at(index))
    }

    /// Include or exclude a node from export.
    ///
    /// Excluding a node also drops its own schedule.
    pub fn set_export_flag(&mut self, id: Uuid, include: bool) -> Result<NodeView> {
        let index = self.index_of(id)?;
        let node = &mut self.nodes[index];
        node.include_in_export = include;
        if !include {
            node.schedule = None;
        }

        self.rollup();
        Ok(self.view_at(index))
    }

    /// Apply a calendar click to a node's row.
    ///
    /// Clicks on grouping rows and on export-disabled rows are ignored.
    pub fn click_cell(&mut self, id: Uuid, date: NaiveDate) -> Result<ClickOutcome> {
        let index = self.index_of(id)?;

        if !self.nodes[index].include_in_export {
            return Ok(ClickOutcome::Ignored {
                reason: IgnoredReason::ExportDisabled,
            });
        }
        if self.has_children(index) {
            return Ok(ClickOutcome::Ignored {
                reason: IgnoredReason::GroupingNode,
            });
        }

        let schedule = toggle::toggle(self.nodes[index].schedule, date);
        self.nodes[index].schedule = schedule;
        tracing::debug!("Node {} schedule is now {:?}", id, schedule);

        self.rollup();
        Ok(ClickOutcome::Updated {
            node: self.view_at(index),
        })
    }

    /// Recompute every parent's schedule from its children.
    pub fn rollup(&mut self) {
        let changed = rollup::rollup(&mut self.nodes);
        if changed > 0 {
            tracing::trace!("Rollup updated {} parent row(s)", changed);
        }
    }
}

fn normalize_responsible(id: String) -> Option<String> {
    let id = id.trim();
    if id.is_empty() || id == "unassigned" {
        None
    } else {
        Some(id.to_string())
    }
}
