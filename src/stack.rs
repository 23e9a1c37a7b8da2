use crate::consts::STACK_DEPTH;
use crate::{Error, Result};

/// Return addresses of active subroutine calls, at most [`STACK_DEPTH`] deep.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallStack {
    frames: Vec<u16>,
}

impl Default for CallStack {
    fn default() -> Self {
        Self::new()
    }
}

impl CallStack {
    pub fn new() -> Self {
        CallStack {
            frames: Vec::with_capacity(STACK_DEPTH),
        }
    }

    pub fn push(&mut self, address: u16) -> Result<()> {
        if self.frames.len() >= STACK_DEPTH {
            return Err(Error::StackOverflow);
        }
        self.frames.push(address);
        Ok(())
    }

    pub fn pop(&mut self) -> Result<u16> {
        self.frames.pop().ok_or(Error::StackUnderflow)
    }

    pub fn reset(&mut self) {
        self.frames.clear();
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn capacity(&self) -> usize {
        STACK_DEPTH
    }

    /// Innermost frame last.
    pub fn frames(&self) -> &[u16] {
        &self.frames
    }
}
