// src/core/env.rs
//! Runtime scope stack.
//!
//! Frames are reference-counted so closures can share them: a function
//! value holds clones of the `Rc` frames that were live at its declaration
//! site, and later mutations through either holder are visible to both.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::core::value::Value;

/// One binding: value plus the declaration facts assignment must honor.
#[derive(Debug, Clone)]
pub struct Slot {
    pub value: Value,
    pub is_const: bool,
    pub declared_type: Option<String>,
}

impl Slot {
    pub fn new(value: Value) -> Self {
        Self { value, is_const: false, declared_type: None }
    }

    pub fn typed(value: Value, declared_type: Option<String>) -> Self {
        Self { value, is_const: false, declared_type }
    }

    pub fn constant(value: Value, declared_type: Option<String>) -> Self {
        Self { value, is_const: true, declared_type }
    }
}

pub type ScopeFrame = Rc<RefCell<HashMap<String, Slot>>>;

pub fn new_frame() -> ScopeFrame {
    Rc::new(RefCell::new(HashMap::new()))
}

/// Ordered stack of scope frames; the bottom frame is the global scope and
/// is never popped while the interpreter lives.
#[derive(Debug, Clone)]
pub struct Scopes {
    frames: Vec<ScopeFrame>,
}

impl Scopes {
    pub fn new() -> Self {
        Self { frames: vec![new_frame()] }
    }

    /// Rebuilds a stack from a captured closure chain.
    pub fn from_frames(frames: Vec<ScopeFrame>) -> Self {
        let mut scopes = Self { frames };
        if scopes.frames.is_empty() {
            scopes.frames.push(new_frame());
        }
        scopes
    }

    /// Clones the live chain (the `Rc`s, not the bindings) for a closure.
    pub fn snapshot(&self) -> Vec<ScopeFrame> {
        self.frames.clone()
    }

    pub fn push(&mut self) {
        self.frames.push(new_frame());
    }

    pub fn pop(&mut self) {
        if self.frames.len() > 1 {
            self.frames.pop();
        }
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn global_frame(&self) -> ScopeFrame {
        self.frames[0].clone()
    }

    /// Binds a name in the innermost frame. `false` when the name is
    /// already declared there (redeclaration is the caller's error).
    pub fn define(&self, name: &str, slot: Slot) -> bool {
        let frame = self.frames.last().expect("scope stack is never empty");
        let mut frame = frame.borrow_mut();
        if frame.contains_key(name) {
            return false;
        }
        frame.insert(name.to_string(), slot);
        true
    }

    pub fn current_contains(&self, name: &str) -> bool {
        self.frames
            .last()
            .map_or(false, |frame| frame.borrow().contains_key(name))
    }

    /// Innermost-first value lookup.
    pub fn get(&self, name: &str) -> Option<Value> {
        for frame in self.frames.iter().rev() {
            if let Some(slot) = frame.borrow().get(name) {
                return Some(slot.value.clone());
            }
        }
        None
    }

    /// Declaration facts of the nearest slot, for assignment validation.
    pub fn lookup_slot(&self, name: &str) -> Option<(Value, bool, Option<String>)> {
        for frame in self.frames.iter().rev() {
            if let Some(slot) = frame.borrow().get(name) {
                return Some((slot.value.clone(), slot.is_const, slot.declared_type.clone()));
            }
        }
        None
    }

    /// Writes through to the nearest declaring frame. `false` when the name
    /// is not declared anywhere.
    pub fn set(&self, name: &str, value: Value) -> bool {
        for frame in self.frames.iter().rev() {
            let mut frame = frame.borrow_mut();
            if let Some(slot) = frame.get_mut(name) {
                slot.value = value;
                return true;
            }
        }
        false
    }
}

impl Default for Scopes {
    fn default() -> Self {
        Self::new()
    }
}
