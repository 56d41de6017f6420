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

use crate::codegen::emitter::Emitter;
use crate::codegen::labels::LabelGenerator;
use crate::codegen::scratch::ScratchAllocator;
use crate::codegen::symbols::SymbolTable;
use crate::codegen::target::Target;
use std::marker::PhantomData;

/// All mutable state a compilation owns: the listing, the scratch cursor,
/// the label counter, and the symbol table. Owned by one `Codegen` instance
/// per compilation and mutated only by the walker.
pub struct Codegen<T: Target> {
    pub emitter: Emitter,
    pub symbols: SymbolTable,
    pub scratch: ScratchAllocator,
    pub labels: LabelGenerator,
    /// The source line of the top-level form currently being lowered, used
    /// only to annotate error messages.
    pub current_line: usize,
    _target: PhantomData<T>,
}

impl<T: Target> Default for Codegen<T> {
    fn default() -> Self {
        Self {
            emitter: Emitter::new(),
            symbols: SymbolTable::new(),
            scratch: ScratchAllocator::new(),
            labels: LabelGenerator::new(),
            current_line: 0,
            _target: PhantomData,
        }
    }
}

impl<T: Target> Codegen<T> {
    pub fn new() -> Self {
        Self::default()
    }
}
