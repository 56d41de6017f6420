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

//! The Z80 dialect: `HL` is the canonical accumulator, `DE` is a single
//! shared secondary register reused at every nesting level, and scratch
//! spills go to a bank of named memory cells (`TMPDE<n>`).

use crate::codegen::context::Codegen;
use crate::codegen::destination::ControlDestination;
use crate::codegen::target::Target;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Z80Dest {
    Hl,
    De,
    Bc,
    ZFlag,
    Tmp,
}

pub struct Z80;

impl Z80 {
    fn tmp_name(cg: &Codegen<Self>) -> String {
        format!("TMPDE{}", cg.scratch.current())
    }
}

impl Target for Z80 {
    type Dest = Z80Dest;

    const CANONICAL: Z80Dest = Z80Dest::Hl;
    const ZFLAG: Z80Dest = Z80Dest::ZFlag;
    const SCRATCH: Z80Dest = Z80Dest::Tmp;

    fn dialect_name() -> &'static str {
        "z80"
    }

    fn is_primary(dest: Z80Dest) -> bool {
        matches!(dest, Z80Dest::Hl | Z80Dest::De | Z80Dest::Bc)
    }

    fn register_name(dest: Z80Dest) -> &'static str {
        match dest {
            Z80Dest::Hl => "HL",
            Z80Dest::De => "DE",
            Z80Dest::Bc => "BC",
            Z80Dest::ZFlag => "F",
            Z80Dest::Tmp => "TMP",
        }
    }

    fn load_immediate(cg: &mut Codegen<Self>, dest: Z80Dest, value: i64) {
        match dest {
            Z80Dest::Hl | Z80Dest::De | Z80Dest::Bc => {
                let reg = Self::register_name(dest);
                cg.emitter.emit("LD", &format!("{},{}", reg, value));
            }
            Z80Dest::ZFlag | Z80Dest::Tmp => {
                cg.emitter.emit("LD", &format!("HL,{}", value));
                Self::route_canonical_to(cg, dest);
            }
        }
    }

    fn load_variable(cg: &mut Codegen<Self>, dest: Z80Dest, name: &str) {
        match dest {
            Z80Dest::Hl | Z80Dest::De | Z80Dest::Bc => {
                let reg = Self::register_name(dest);
                cg.emitter.emit("LD", &format!("{},({})", reg, name));
            }
            Z80Dest::ZFlag | Z80Dest::Tmp => {
                cg.emitter.emit("LD", &format!("HL,({})", name));
                Self::route_canonical_to(cg, dest);
            }
        }
    }

    fn declare_variable_storage(cg: &mut Codegen<Self>, name: &str) {
        cg.emitter.emit_label(name);
        cg.emitter.emit("DEFW", "0");
    }

    fn store_canonical_to_variable(cg: &mut Codegen<Self>, name: &str) {
        cg.emitter.emit("LD", &format!("({}),HL", name));
    }

    fn route_canonical_to(cg: &mut Codegen<Self>, dest: Z80Dest) {
        match dest {
            Z80Dest::De => {
                cg.emitter.emit("LD", "D,H");
                cg.emitter.emit("LD", "E,L");
            }
            Z80Dest::Bc => {
                cg.emitter.emit("LD", "B,H");
                cg.emitter.emit("LD", "C,L");
            }
            Z80Dest::ZFlag => {
                cg.emitter.emit("LD", "A,H");
                cg.emitter.emit("OR", "L");
            }
            Z80Dest::Tmp => {
                let name = Self::tmp_name(cg);
                cg.emitter.emit("LD", &format!("({}),HL", name));
            }
            Z80Dest::Hl => unreachable!("route_canonical_to called with HL already canonical"),
        }
    }

    fn protects_secondary_across_pair_left() -> bool {
        true
    }

    fn fast_secondary() -> Z80Dest {
        Z80Dest::De
    }

    fn reload_secondary_from_scratch(cg: &mut Codegen<Self>) {
        let name = Self::tmp_name(cg);
        cg.emitter.emit("LD", &format!("DE,({})", name));
    }

    fn add(cg: &mut Codegen<Self>, dd: Z80Dest, op2: Z80Dest, cd: ControlDestination) {
        let reg = Self::register_name(op2);
        cg.emitter.emit("ADD", &format!("HL,{}", reg));
        finish(cg, dd, cd);
    }

    fn sub(cg: &mut Codegen<Self>, dd: Z80Dest, op2: Z80Dest, cd: ControlDestination) {
        let reg = Self::register_name(op2);
        cg.emitter.emit("OR", "A");
        cg.emitter.emit("SBC", &format!("HL,{}", reg));
        finish(cg, dd, cd);
    }

    fn bitand(cg: &mut Codegen<Self>, dd: Z80Dest, op2: Z80Dest, cd: ControlDestination) {
        byte_op(cg, "AND", op2);
        finish(cg, dd, cd);
    }

    fn bitor(cg: &mut Codegen<Self>, dd: Z80Dest, op2: Z80Dest, cd: ControlDestination) {
        byte_op(cg, "OR", op2);
        finish(cg, dd, cd);
    }

    fn bitxor(cg: &mut Codegen<Self>, dd: Z80Dest, op2: Z80Dest, cd: ControlDestination) {
        byte_op(cg, "XOR", op2);
        finish(cg, dd, cd);
    }

    fn mul(cg: &mut Codegen<Self>, dd: Z80Dest, op2: Z80Dest, cd: ControlDestination) {
        let name = format!("multiply_{}_{}", Self::register_name(Z80Dest::Hl), Self::register_name(op2));
        cg.emitter.emit("CALL", &name);
        finish(cg, dd, cd);
    }

    fn div(cg: &mut Codegen<Self>, dd: Z80Dest, op2: Z80Dest, cd: ControlDestination) {
        let name = format!("divide_{}_{}", Self::register_name(Z80Dest::Hl), Self::register_name(op2));
        cg.emitter.emit("CALL", &name);
        finish(cg, dd, cd);
    }

    fn emit_ret(cg: &mut Codegen<Self>) {
        cg.emitter.emit("RET", "");
    }

    fn emit_ret_zero(cg: &mut Codegen<Self>) {
        cg.emitter.emit("RET", "Z");
    }

    fn emit_ret_nonzero(cg: &mut Codegen<Self>) {
        cg.emitter.emit("RET", "NZ");
    }

    fn emit_jump(cg: &mut Codegen<Self>, label: u32) {
        cg.emitter.emit("JP", &format!("L{}", label));
    }

    fn emit_branch_zero(cg: &mut Codegen<Self>, label: u32) {
        cg.emitter.emit("JP", &format!("Z,L{}", label));
    }

    fn emit_branch_nonzero(cg: &mut Codegen<Self>, label: u32) {
        cg.emitter.emit("JP", &format!("NZ,L{}", label));
    }

    fn emit_call(cg: &mut Codegen<Self>, name: &str) {
        cg.emitter.emit("CALL", name);
    }
}

/// `HL op= (secondary)` performed byte-wise, since Z80 has no 16-bit
/// logical instructions: low bytes first (so the flags checked by a caller
/// that only cares about the low byte see the last op), high bytes via `B`
/// as a holding register.
fn byte_op(cg: &mut Codegen<Z80>, mnemonic: &str, op2: Z80Dest) {
    let (hi, lo) = match op2 {
        Z80Dest::De => ("D", "E"),
        Z80Dest::Bc => ("B", "C"),
        other => unreachable!("byte_op called with non-register secondary {:?}", other),
    };
    cg.emitter.emit("LD", "A,H");
    cg.emitter.emit(mnemonic, hi);
    cg.emitter.emit("LD", "B,A");
    cg.emitter.emit("LD", "A,L");
    cg.emitter.emit(mnemonic, lo);
    cg.emitter.emit("LD", "L,A");
    cg.emitter.emit("LD", "H,B");
}

/// Every binary-operator lowering computes its result into `HL`; only the
/// non-primary destinations (`ZFLAG`, `TMP`) need the post-hoc fixup. `cg_binop`
/// never requests a binop's final destination be a bare secondary register,
/// since no Z80 instruction here writes a 16-bit result anywhere but `HL`.
fn finish(cg: &mut Codegen<Z80>, dd: Z80Dest, cd: ControlDestination) {
    if dd != Z80Dest::Hl {
        Z80::route_canonical_to(cg, dd);
    }
    crate::codegen::control::goto(cg, cd);
}
