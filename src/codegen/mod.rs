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

pub mod context;
pub mod control;
pub mod destination;
pub mod emitter;
pub mod form;
pub mod labels;
pub mod scratch;
pub mod symbols;
pub mod target;
pub mod targets;

use crate::ast::Node;
use crate::errors::CompileError;
use context::Codegen;
use target::Target;

/// Compiles a whole program (the forms the parser produced, each paired
/// with its source line) against one dialect, returning the finished
/// listing.
pub fn compile_forms<T: Target>(forms: &[(usize, Node)]) -> Result<Vec<String>, CompileError> {
    let mut cg: Codegen<T> = Codegen::new();
    for (line, node) in forms {
        form::cg_toplevel(&mut cg, node, *line)?;
    }
    Ok(cg.emitter.into_lines())
}
