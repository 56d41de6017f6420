/*
Copyright 2025 Connor Nolan

Licensed under the Apache License, Version 2.0 (the "License");
you may not use this file except in compliance with the License.
You may obtain a copy of the License at

    http://www.apache.org/licenses/LICENSE-2.0

Unless required by applicable law or agreed to in writing, software
distributed under the License is distributed on an "AS IS" BASIS,
WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
See the License for the specific language governing permissions and
limitations under the License.
*/

/// A LIFO cursor into a preallocated region of named scratch slots. Used
/// only by `cg_binop` to save a nested binary operand's secondary register
/// across the evaluation of a compound left operand. This is named storage,
/// not the hardware call stack: it survives across subroutine calls and the
/// target-specific emitter decides whether a slot is a memory word or a
/// zero-page cell.
#[derive(Default)]
pub struct ScratchAllocator {
    depth: u32,
}

impl ScratchAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates the next slot and returns its identity.
    pub fn alloc(&mut self) -> u32 {
        self.depth += 1;
        self.depth
    }

    /// Releases the most recently allocated slot.
    pub fn free(&mut self) {
        self.depth = self
            .depth
            .checked_sub(1)
            .expect("scratch allocator underflow: free() without a matching alloc()");
    }

    /// The identity of the slot currently in use (the one returned by the
    /// most recent `alloc()` not yet `free()`d).
    pub fn current(&self) -> u32 {
        debug_assert!(self.depth > 0, "current() called with no active slot");
        self.depth
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lifo_alloc_free_returns_to_entry_depth() {
        let mut s = ScratchAllocator::new();
        assert_eq!(s.depth(), 0);
        let a = s.alloc();
        assert_eq!(a, 1);
        let b = s.alloc();
        assert_eq!(b, 2);
        assert_eq!(s.current(), 2);
        s.free();
        assert_eq!(s.current(), 1);
        s.free();
        assert_eq!(s.depth(), 0);
    }

    #[test]
    #[should_panic(expected = "underflow")]
    fn free_without_alloc_panics() {
        let mut s = ScratchAllocator::new();
        s.free();
    }
}
