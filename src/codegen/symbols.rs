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

use crate::errors::CompileError;
use std::collections::HashMap;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SymbolKind {
    Variable,
    Subroutine,
}

/// The process-wide set of declared globals. Lookup is by exact string
/// match; insertion order only matters for reproducible output, not
/// semantics, so a plain map is sufficient.
#[derive(Default)]
pub struct SymbolTable {
    symbols: HashMap<String, SymbolKind>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn declare(
        &mut self,
        name: &str,
        kind: SymbolKind,
        line: usize,
    ) -> Result<(), CompileError> {
        if self.symbols.contains_key(name) {
            return Err(CompileError::Redefinition {
                line,
                name: name.to_string(),
            });
        }
        self.symbols.insert(name.to_string(), kind);
        Ok(())
    }

    pub fn is_declared(&self, name: &str) -> bool {
        self.symbols.contains_key(name)
    }

    pub fn kind_of(&self, name: &str) -> Option<SymbolKind> {
        self.symbols.get(name).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_redefinition() {
        let mut table = SymbolTable::new();
        table.declare("x", SymbolKind::Variable, 1).unwrap();
        let err = table.declare("x", SymbolKind::Subroutine, 2).unwrap_err();
        assert!(matches!(err, CompileError::Redefinition { line: 2, .. }));
    }

    #[test]
    fn resolves_declared_kind() {
        let mut table = SymbolTable::new();
        table.declare("f", SymbolKind::Subroutine, 1).unwrap();
        assert_eq!(table.kind_of("f"), Some(SymbolKind::Subroutine));
        assert!(table.is_declared("f"));
        assert!(!table.is_declared("g"));
    }
}
