//! Loop-kind nesting seen by node writers
//!
//! A `for.index` and a `while.index` print differently, so writers need to
//! know whether the nearest enclosing loop is a `while`. The stack is pushed
//! through [`LoopScope`], whose `Drop` pops it again on every exit path.

use super::renderer::Renderer;
use std::ops::{Deref, DerefMut};

/// Stack of `is_while` flags, one per loop ancestor being rendered
#[derive(Debug, Default, Clone)]
pub struct LoopContext {
    kinds: Vec<bool>,
}

impl LoopContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, is_while: bool) {
        self.kinds.push(is_while);
    }

    pub fn pop(&mut self) -> Option<bool> {
        self.kinds.pop()
    }

    /// Whether the nearest enclosing loop is while-style; false outside loops
    pub fn is_while_loop(&self) -> bool {
        self.kinds.last().copied().unwrap_or(false)
    }

    pub fn depth(&self) -> usize {
        self.kinds.len()
    }

    pub fn clear(&mut self) {
        self.kinds.clear();
    }
}

/// Renderer borrowed for the duration of one loop statement
pub(crate) struct LoopScope<'r, 'o> {
    renderer: &'r mut Renderer<'o>,
}

impl<'r, 'o> LoopScope<'r, 'o> {
    pub(crate) fn enter(renderer: &'r mut Renderer<'o>, is_while: bool) -> Self {
        renderer.loops_mut().push(is_while);
        Self { renderer }
    }
}

impl<'o> Deref for LoopScope<'_, 'o> {
    type Target = Renderer<'o>;

    fn deref(&self) -> &Self::Target {
        &*self.renderer
    }
}

impl DerefMut for LoopScope<'_, '_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut *self.renderer
    }
}

impl Drop for LoopScope<'_, '_> {
    fn drop(&mut self) {
        self.renderer.loops_mut().pop();
    }
}
