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

use std::fmt;

/// A label argument: either one of the generator's numeric labels, or a
/// verbatim name (a declared subroutine or variable).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LabelRef {
    Numeric(u32),
    Named(String),
}

impl fmt::Display for LabelRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LabelRef::Numeric(n) => write!(f, "L{}", n),
            LabelRef::Named(name) => write!(f, "{}", name),
        }
    }
}

impl From<u32> for LabelRef {
    fn from(n: u32) -> Self {
        LabelRef::Numeric(n)
    }
}

impl From<&str> for LabelRef {
    fn from(s: &str) -> Self {
        LabelRef::Named(s.to_string())
    }
}

/// Appends formatted label/mnemonic/operand lines to the assembly listing.
/// The listing is append-only; emission order is the single source of truth
/// for program order.
#[derive(Default)]
pub struct Emitter {
    lines: Vec<String>,
}

impl Emitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit_label(&mut self, label: impl Into<LabelRef>) {
        self.lines.push(format!("{}:", label.into()));
    }

    pub fn emit(&mut self, mnemonic: &str, operand: &str) {
        self.lines.push(format!("    {:<6} {}", mnemonic, operand));
    }

    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_label_and_instruction_lines() {
        let mut e = Emitter::new();
        e.emit_label("start");
        e.emit("LD", "HL,1");
        e.emit_label(100u32);
        e.emit("RET", "");
        assert_eq!(
            e.into_lines(),
            vec![
                "start:".to_string(),
                "    LD     HL,1".to_string(),
                "L100:".to_string(),
                "    RET    ".to_string(),
            ]
        );
    }
}
