//! Keymap struct for storing and looking up keybindings

use std::collections::HashMap;

use super::binding::Keybinding;
use super::command::Command;
use super::context::{Condition, KeyContext};
use super::types::Keystroke;

/// The keymap stores all keybindings and handles lookup
#[derive(Debug, Clone)]
pub struct Keymap {
    bindings: Vec<Keybinding>,
    /// Keystroke -> indices into `bindings`
    /// Multiple bindings can share the same keystroke with different conditions
    lookup: HashMap<Keystroke, Vec<usize>>,
}

impl Keymap {
    pub fn new() -> Self {
        Self {
            bindings: Vec::new(),
            lookup: HashMap::new(),
        }
    }

    pub fn with_bindings(bindings: Vec<Keybinding>) -> Self {
        let mut keymap = Self::new();
        for binding in bindings {
            keymap.add_binding(binding);
        }
        keymap
    }

    pub fn add_binding(&mut self, binding: Keybinding) {
        let idx = self.bindings.len();
        self.lookup.entry(binding.keystroke).or_default().push(idx);
        self.bindings.push(binding);
    }

    /// Look up a keystroke ignoring conditional bindings
    pub fn lookup(&self, keystroke: &Keystroke) -> Option<Command> {
        self.lookup_with_context(keystroke, None)
    }

    /// Look up a keystroke against the current grid state
    ///
    /// Conditional bindings whose conditions hold win over unconditional ones.
    /// Without a context, conditional bindings are skipped.
    pub fn lookup_with_context(
        &self,
        keystroke: &Keystroke,
        context: Option<&KeyContext>,
    ) -> Option<Command> {
        let indices = self.lookup.get(keystroke)?;

        if let Some(ctx) = context {
            for &idx in indices {
                let binding = &self.bindings[idx];
                if let Some(ref conditions) = binding.when {
                    if Condition::evaluate_all(conditions, ctx) {
                        return Some(binding.command);
                    }
                }
            }
        }

        indices
            .iter()
            .map(|&idx| &self.bindings[idx])
            .find(|binding| !binding.is_conditional())
            .map(|binding| binding.command)
    }
}

impl Default for Keymap {
    fn default() -> Self {
        Self::new()
    }
}
