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

pub mod ast;
pub mod codegen;
pub mod errors;
pub mod file_reader;
pub mod lexer;
pub mod parser;

use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result};
use file_reader::FileReader;

extern crate pest;
extern crate pest_derive;

/// The two backend conventions this compiler lowers onto. Selected once per
/// run and threaded through as the `Target` type parameter of every codegen
/// call -- there is no runtime dispatch inside the walker itself.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Dialect {
    Z80,
    M65816,
}

impl FromStr for Dialect {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "z80" => Ok(Dialect::Z80),
            "65816" | "m65816" => Ok(Dialect::M65816),
            other => Err(anyhow::anyhow!("unknown dialect: {}", other)),
        }
    }
}

/// Reads, parses, and compiles `source_path` against `dialect`, returning
/// the finished assembly listing as one string per line.
pub fn compile_path<F: FileReader>(source_path: &Path, dialect: Dialect, reader: &F) -> Result<Vec<String>> {
    let source = reader
        .read_to_string(source_path)
        .with_context(|| format!("failed to read {}", source_path.display()))?;
    compile_source(&source, dialect).context("compilation failed")
}

/// Parses and compiles source text already in memory.
pub fn compile_source(source: &str, dialect: Dialect) -> Result<Vec<String>> {
    let forms = parser::parse_source(source)?;
    let lines = match dialect {
        Dialect::Z80 => codegen::compile_forms::<codegen::targets::z80::Z80>(&forms)?,
        Dialect::M65816 => codegen::compile_forms::<codegen::targets::m65816::M65816>(&forms)?,
    };
    Ok(lines)
}
