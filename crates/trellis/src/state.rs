//! Interaction state that outlives the per-frame tree.
//!
//! The tree is rebuilt every frame, so hover/pressed flags and visibility live here, keyed by
//! [`StableId`]. Each frame copies the stored state into the fresh tree after IDs are assigned
//! and copies the (possibly updated) state back out after hit-testing.

use crate::node::{Display, Node, NodeKind, StableId};
use std::collections::{HashMap, HashSet};

/// Persisted per-widget flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InteractionState {
    pub is_hovered: bool,
    pub is_pressed: bool,
    pub display: Display,
}

impl InteractionState {
    fn from_node(node: &Node) -> Self {
        let (is_hovered, is_pressed) = node.button_state().unwrap_or((false, false));
        Self {
            is_hovered,
            is_pressed,
            display: node.display,
        }
    }
}

/// What happens to records of widgets that were not in the current frame's tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatePruning {
    /// Keep every record for the life of the store
    #[default]
    Retain,
    /// Drop records whose ID was not registered this frame
    PruneUnseen,
}

/// Map from stable ID to [`InteractionState`]
#[derive(Debug, Default)]
pub struct StateStore {
    states: HashMap<StableId, InteractionState>,
}

fn stable_id_of(node: &Node) -> &StableId {
    match node.stable_id() {
        Some(id) => id,
        None => panic!(
            "{} node reached state sync without a stable ID; assign IDs first",
            node.kind.name()
        ),
    }
}

impl StateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write stored state into the tree.
    ///
    /// A widget seen for the first time gets a record seeded from the node as built.
    pub fn copy_state_into_tree(&mut self, node: &mut Node) {
        let state = *self
            .states
            .entry(stable_id_of(node).clone())
            .or_insert_with(|| InteractionState::from_node(node));

        node.display = state.display;
        if let NodeKind::Button(button) = &mut node.kind {
            button.is_hovered = state.is_hovered;
            button.is_pressed = state.is_pressed;
        }

        for child in &mut node.children {
            self.copy_state_into_tree(child);
        }
    }

    /// Record the tree's current state, overwriting existing records
    pub fn copy_state_from_tree(&mut self, node: &Node) {
        self.states
            .insert(stable_id_of(node).clone(), InteractionState::from_node(node));
        for child in &node.children {
            self.copy_state_from_tree(child);
        }
    }

    /// Apply `policy` given the IDs seen this frame. Returns how many records were removed.
    pub fn prune(&mut self, seen: &HashSet<StableId>, policy: StatePruning) -> usize {
        match policy {
            StatePruning::Retain => 0,
            StatePruning::PruneUnseen => {
                let before = self.states.len();
                self.states.retain(|id, _| seen.contains(id));
                before - self.states.len()
            }
        }
    }

    pub fn get(&self, id: &StableId) -> Option<&InteractionState> {
        self.states.get(id)
    }

    /// Change a widget's stored visibility; takes effect when the state is next copied in
    pub fn set_display(&mut self, id: &StableId, display: Display) {
        self.states.entry(id.clone()).or_default().display = display;
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&StableId, &InteractionState)> {
        self.states.iter()
    }

    pub fn snapshot(&self) -> HashMap<StableId, InteractionState> {
        self.states.clone()
    }
}
