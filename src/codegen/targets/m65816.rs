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

//! The 65816 dialect: `AC` (16-bit accumulator mode) is canonical, and the
//! secondary operand of every binary op is always a freshly allocated
//! zero-page cell -- there is no shared secondary register to protect, so
//! `cg_binop`'s left-operand-is-compound special case never triggers here.
//! 65816 also carries the only dialect-only extension forms (`@`, `peek`,
//! `poke`, `highbyte`, `lowbyte`, `>>`, `<<`).

use crate::ast::Node;
use crate::codegen::context::Codegen;
use crate::codegen::destination::ControlDestination;
use crate::codegen::form::cg_form;
use crate::codegen::target::Target;
use crate::lexer::decode_numeric;
use crate::errors::CompileError;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum M65816Dest {
    Ac,
    Xr,
    Yr,
    ZFlag,
    Zp,
}

pub struct M65816;

impl M65816 {
    /// The zero-page address backing the scratch cell at the allocator's
    /// current depth. Cells are 2 bytes wide, based at the bottom of the
    /// compiler's reserved direct-page window.
    fn zp_addr(depth: u32) -> String {
        format!("${:02X}", (depth.saturating_sub(1)) * 2)
    }

    fn current_zp_operand(cg: &Codegen<Self>) -> String {
        Self::zp_addr(cg.scratch.current())
    }
}

impl Target for M65816 {
    type Dest = M65816Dest;

    const CANONICAL: M65816Dest = M65816Dest::Ac;
    const ZFLAG: M65816Dest = M65816Dest::ZFlag;
    const SCRATCH: M65816Dest = M65816Dest::Zp;

    fn dialect_name() -> &'static str {
        "65816"
    }

    fn is_primary(dest: M65816Dest) -> bool {
        matches!(dest, M65816Dest::Ac | M65816Dest::Xr | M65816Dest::Yr)
    }

    fn register_name(dest: M65816Dest) -> &'static str {
        match dest {
            M65816Dest::Ac => "AC",
            M65816Dest::Xr => "XR",
            M65816Dest::Yr => "YR",
            M65816Dest::ZFlag => "P",
            M65816Dest::Zp => "ZP",
        }
    }

    fn load_immediate(cg: &mut Codegen<Self>, dest: M65816Dest, value: i64) {
        match dest {
            M65816Dest::Ac => cg.emitter.emit("LDA", &format!("#{}", value)),
            M65816Dest::Xr => cg.emitter.emit("LDX", &format!("#{}", value)),
            M65816Dest::Yr => cg.emitter.emit("LDY", &format!("#{}", value)),
            M65816Dest::ZFlag | M65816Dest::Zp => {
                cg.emitter.emit("LDA", &format!("#{}", value));
                Self::route_canonical_to(cg, dest);
            }
        }
    }

    fn load_variable(cg: &mut Codegen<Self>, dest: M65816Dest, name: &str) {
        match dest {
            M65816Dest::Ac => cg.emitter.emit("LDA", name),
            M65816Dest::Xr => cg.emitter.emit("LDX", name),
            M65816Dest::Yr => cg.emitter.emit("LDY", name),
            M65816Dest::ZFlag | M65816Dest::Zp => {
                cg.emitter.emit("LDA", name);
                Self::route_canonical_to(cg, dest);
            }
        }
    }

    fn declare_variable_storage(cg: &mut Codegen<Self>, name: &str) {
        cg.emitter.emit_label(name);
        cg.emitter.emit(".WORD", "0");
    }

    fn store_canonical_to_variable(cg: &mut Codegen<Self>, name: &str) {
        cg.emitter.emit("STA", name);
    }

    fn route_canonical_to(cg: &mut Codegen<Self>, dest: M65816Dest) {
        match dest {
            M65816Dest::Xr => cg.emitter.emit("TAX", ""),
            M65816Dest::Yr => cg.emitter.emit("TAY", ""),
            M65816Dest::Zp => {
                let operand = Self::current_zp_operand(cg);
                cg.emitter.emit("STA", &operand);
            }
            M65816Dest::ZFlag => {
                cg.emitter.emit("ORA", "#0");
            }
            M65816Dest::Ac => unreachable!("route_canonical_to called with AC already canonical"),
        }
    }

    fn protects_secondary_across_pair_left() -> bool {
        false
    }

    fn fast_secondary() -> M65816Dest {
        M65816Dest::Zp
    }

    fn add(cg: &mut Codegen<Self>, dd: M65816Dest, op2: M65816Dest, cd: ControlDestination) {
        let operand = zp_operand_of(cg, op2);
        cg.emitter.emit("CLC", "");
        cg.emitter.emit("ADC", &operand);
        finish(cg, dd, cd);
    }

    fn sub(cg: &mut Codegen<Self>, dd: M65816Dest, op2: M65816Dest, cd: ControlDestination) {
        let operand = zp_operand_of(cg, op2);
        cg.emitter.emit("SEC", "");
        cg.emitter.emit("SBC", &operand);
        finish(cg, dd, cd);
    }

    fn bitand(cg: &mut Codegen<Self>, dd: M65816Dest, op2: M65816Dest, cd: ControlDestination) {
        let operand = zp_operand_of(cg, op2);
        cg.emitter.emit("AND", &operand);
        finish(cg, dd, cd);
    }

    fn bitor(cg: &mut Codegen<Self>, dd: M65816Dest, op2: M65816Dest, cd: ControlDestination) {
        let operand = zp_operand_of(cg, op2);
        cg.emitter.emit("ORA", &operand);
        finish(cg, dd, cd);
    }

    fn bitxor(cg: &mut Codegen<Self>, dd: M65816Dest, op2: M65816Dest, cd: ControlDestination) {
        let operand = zp_operand_of(cg, op2);
        cg.emitter.emit("EOR", &operand);
        finish(cg, dd, cd);
    }

    fn mul(cg: &mut Codegen<Self>, dd: M65816Dest, op2: M65816Dest, cd: ControlDestination) {
        let name = format!("multiply_{}_{}", Self::register_name(M65816Dest::Ac), Self::register_name(op2));
        cg.emitter.emit("JSR", &name);
        finish(cg, dd, cd);
    }

    fn div(cg: &mut Codegen<Self>, dd: M65816Dest, op2: M65816Dest, cd: ControlDestination) {
        let name = format!("divide_{}_{}", Self::register_name(M65816Dest::Ac), Self::register_name(op2));
        cg.emitter.emit("JSR", &name);
        finish(cg, dd, cd);
    }

    fn emit_ret(cg: &mut Codegen<Self>) {
        cg.emitter.emit("RTS", "");
    }

    /// `return if zero`: no native conditional return, so skip the `RTS`
    /// when the flag says not to take it.
    fn emit_ret_zero(cg: &mut Codegen<Self>) {
        cg.emitter.emit("BNE", "*+3");
        cg.emitter.emit("RTS", "");
    }

    /// `return if nonzero`: branch past a plain `RTS` when the flag says
    /// not to take it, landing on a fresh label.
    fn emit_ret_nonzero(cg: &mut Codegen<Self>) {
        let skip = cg.labels.fresh();
        cg.emitter.emit("BEQ", &format!("L{}", skip));
        cg.emitter.emit("RTS", "");
        cg.emitter.emit_label(skip);
    }

    fn emit_jump(cg: &mut Codegen<Self>, label: u32) {
        cg.emitter.emit("JMP", &format!("L{}", label));
    }

    fn emit_branch_zero(cg: &mut Codegen<Self>, label: u32) {
        cg.emitter.emit("BEQ", &format!("L{}", label));
    }

    fn emit_branch_nonzero(cg: &mut Codegen<Self>, label: u32) {
        cg.emitter.emit("BNE", &format!("L{}", label));
    }

    fn emit_call(cg: &mut Codegen<Self>, name: &str) {
        cg.emitter.emit("JSR", name);
    }

    fn lower_extension(
        cg: &mut Codegen<Self>,
        head: &str,
        args: &Node,
        dd: M65816Dest,
        cd: ControlDestination,
        line: usize,
    ) -> Option<Result<(), CompileError>> {
        Some(match head {
            "@" => lower_address_of(cg, args, dd, cd, line),
            "peek" => lower_peek(cg, args, dd, cd, line),
            "poke" => lower_poke(cg, args, dd, cd, line),
            "highbyte" => lower_byte_half(cg, args, dd, cd, line, true),
            "lowbyte" => lower_byte_half(cg, args, dd, cd, line, false),
            ">>" => lower_shift(cg, args, dd, cd, line, "LSR"),
            "<<" => lower_shift(cg, args, dd, cd, line, "ASL"),
            _ => return None,
        })
    }
}

fn zp_operand_of(cg: &Codegen<M65816>, op2: M65816Dest) -> String {
    match op2 {
        M65816Dest::Zp => M65816::current_zp_operand(cg),
        other => M65816::register_name(other).to_string(),
    }
}

fn finish(cg: &mut Codegen<M65816>, dd: M65816Dest, cd: ControlDestination) {
    if dd != M65816Dest::Ac {
        M65816::route_canonical_to(cg, dd);
    }
    crate::codegen::control::goto(cg, cd);
}

fn one_arg<'a>(args: &'a Node, line: usize, form: &str) -> Result<&'a Node, CompileError> {
    let items = args.proper_list(line)?;
    match items.as_slice() {
        [only] => Ok(*only),
        _ => Err(CompileError::UnsupportedForm {
            line,
            reason: format!("`{}` takes exactly one argument", form),
        }),
    }
}

fn lower_address_of(
    cg: &mut Codegen<M65816>,
    args: &Node,
    dd: M65816Dest,
    cd: ControlDestination,
    line: usize,
) -> Result<(), CompileError> {
    let target = one_arg(args, line, "@")?;
    let name = target.as_atom().ok_or_else(|| CompileError::UnsupportedForm {
        line,
        reason: "`@` requires a bare symbol name".to_string(),
    })?;
    if !cg.symbols.is_declared(name) {
        return Err(CompileError::UndeclaredSymbol {
            line,
            name: name.to_string(),
        });
    }
    cg.emitter.emit("LDA", &format!("#{}", name));
    if dd != M65816Dest::Ac {
        M65816::route_canonical_to(cg, dd);
    }
    crate::codegen::control::goto(cg, cd);
    Ok(())
}

/// `peek`/`poke`'s leading `byte`/`word` selector. A bare symbol, not a
/// literal value, so it's read off the atom text rather than decoded
/// numerically.
fn parse_size(node: &Node, line: usize, form: &str) -> Result<bool, CompileError> {
    let atom = node.as_atom().ok_or_else(|| CompileError::UnsupportedForm {
        line,
        reason: format!("`{}`'s size selector must be `byte` or `word`", form),
    })?;
    match atom {
        "byte" => Ok(true),
        "word" => Ok(false),
        other => Err(CompileError::UnsupportedForm {
            line,
            reason: format!("`{}`'s size selector must be `byte` or `word`, got `{}`", form, other),
        }),
    }
}

fn lower_peek(
    cg: &mut Codegen<M65816>,
    args: &Node,
    dd: M65816Dest,
    cd: ControlDestination,
    line: usize,
) -> Result<(), CompileError> {
    let items = args.proper_list(line)?;
    let (sz, addr) = match items.as_slice() {
        [sz, addr] => (*sz, *addr),
        _ => {
            return Err(CompileError::UnsupportedForm {
                line,
                reason: "`peek` takes a size selector and an address".to_string(),
            })
        }
    };
    let byte_sized = parse_size(sz, line, "peek")?;
    cg_form(cg, addr, M65816Dest::Xr, ControlDestination::NEXT)?;
    cg.emitter.emit("LDA", "0,X");
    if byte_sized {
        cg.emitter.emit("AND", "#$00FF");
    }
    if dd != M65816Dest::Ac {
        M65816::route_canonical_to(cg, dd);
    }
    crate::codegen::control::goto(cg, cd);
    Ok(())
}

fn lower_poke(
    cg: &mut Codegen<M65816>,
    args: &Node,
    dd: M65816Dest,
    cd: ControlDestination,
    line: usize,
) -> Result<(), CompileError> {
    let items = args.proper_list(line)?;
    let (sz, addr, value) = match items.as_slice() {
        [sz, addr, value] => (*sz, *addr, *value),
        _ => {
            return Err(CompileError::UnsupportedForm {
                line,
                reason: "`poke` takes a size selector, an address, and a value".to_string(),
            })
        }
    };
    let byte_sized = parse_size(sz, line, "poke")?;
    cg_form(cg, addr, M65816Dest::Xr, ControlDestination::NEXT)?;
    cg_form(cg, value, M65816Dest::Ac, ControlDestination::NEXT)?;
    if byte_sized {
        cg.emitter.emit("SEP", "#$20");
        cg.emitter.emit("STA", "0,X");
        cg.emitter.emit("REP", "#$20");
    } else {
        cg.emitter.emit("STA", "0,X");
    }
    if dd != M65816Dest::Ac {
        M65816::route_canonical_to(cg, dd);
    }
    crate::codegen::control::goto(cg, cd);
    Ok(())
}

fn lower_byte_half(
    cg: &mut Codegen<M65816>,
    args: &Node,
    dd: M65816Dest,
    cd: ControlDestination,
    line: usize,
    high: bool,
) -> Result<(), CompileError> {
    let operand = one_arg(args, line, if high { "highbyte" } else { "lowbyte" })?;
    cg_form(cg, operand, M65816Dest::Ac, ControlDestination::NEXT)?;
    if high {
        cg.emitter.emit("XBA", "");
    }
    cg.emitter.emit("AND", "#$00FF");
    if dd != M65816Dest::Ac {
        M65816::route_canonical_to(cg, dd);
    }
    crate::codegen::control::goto(cg, cd);
    Ok(())
}

fn lower_shift(
    cg: &mut Codegen<M65816>,
    args: &Node,
    dd: M65816Dest,
    cd: ControlDestination,
    line: usize,
    mnemonic: &str,
) -> Result<(), CompileError> {
    let items = args.proper_list(line)?;
    let (value, count) = match items.as_slice() {
        [value, count] => (*value, *count),
        _ => {
            return Err(CompileError::UnsupportedForm {
                line,
                reason: format!("`{}` takes a value and a literal shift count", if mnemonic == "LSR" { ">>" } else { "<<" }),
            })
        }
    };
    let count_atom = count.as_atom().ok_or_else(|| CompileError::UnsupportedForm {
        line,
        reason: "shift count must be a literal".to_string(),
    })?;
    let shift_count = decode_numeric(count_atom, line)?;
    cg_form(cg, value, M65816Dest::Ac, ControlDestination::NEXT)?;
    for _ in 0..shift_count {
        cg.emitter.emit(mnemonic, "A");
    }
    if dd != M65816Dest::Ac {
        M65816::route_canonical_to(cg, dd);
    }
    crate::codegen::control::goto(cg, cd);
    Ok(())
}
