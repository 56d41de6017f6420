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

use crate::codegen::context::Codegen;
use crate::codegen::destination::ControlDestination;

/// Everything the walker needs from a backend dialect to lower destination-
/// driven code generation onto real mnemonics. Every method here is a
/// mechanical lowering hook; none of them decide *what* to lower, only *how*
/// a given dialect expresses it. That decision lives in the walker
/// (`codegen::form`), which is written once against this trait and shared by
/// every dialect.
pub trait Target: Sized {
    /// A destination: a concrete register, flag, or scratch cell.
    type Dest: Copy + Eq + std::fmt::Debug;

    /// The canonical accumulator (`HL` on Z80, `AC` on 65816). Every value
    /// that isn't immediately consumed ends up here.
    const CANONICAL: Self::Dest;
    /// The destination meaning "leave only the zero flag set".
    const ZFLAG: Self::Dest;
    /// The non-register scratch destination `cg_binop` spills through.
    const SCRATCH: Self::Dest;

    fn dialect_name() -> &'static str;

    /// `true` for a real register or flag destination; `false` for the
    /// scratch destination, which always needs a re-routing fixup after the
    /// value lands in `CANONICAL`.
    fn is_primary(dest: Self::Dest) -> bool;

    /// The assembly-level name used to build multiply/divide library call
    /// targets (`multiply_<dst>_<src>`).
    fn register_name(dest: Self::Dest) -> &'static str;

    /// Loads a decoded integer literal into `dest` with no control transfer.
    fn load_immediate(cg: &mut Codegen<Self>, dest: Self::Dest, value: i64);
    /// Loads a declared variable's value into `dest` with no control transfer.
    fn load_variable(cg: &mut Codegen<Self>, dest: Self::Dest, name: &str);
    /// Emits the storage declaration for a global 16-bit variable.
    fn declare_variable_storage(cg: &mut Codegen<Self>, name: &str);
    /// Stores `CANONICAL` into a declared variable.
    fn store_canonical_to_variable(cg: &mut Codegen<Self>, name: &str);

    /// Re-routes a value already sitting in `CANONICAL` to `dest`, where
    /// `dest` is `ZFLAG` or `SCRATCH` (the two non-primary destinations).
    /// Called once per `cg_form` as the final step whenever the requested
    /// destination isn't primary; primary destinations are targeted directly
    /// during evaluation and never need this fixup.
    fn route_canonical_to(cg: &mut Codegen<Self>, dest: Self::Dest);

    /// Whether a compound (pair) left operand must have its own right
    /// operand protected by spilling to scratch, because the dialect's
    /// secondary operand is a single register shared across nesting levels
    /// (Z80's `DE`). Dialects whose secondary operand is a fresh scratch
    /// cell per nesting level (65816's zero page) never need this.
    fn protects_secondary_across_pair_left() -> bool;
    /// The destination Y is evaluated into when X is atomic and no
    /// protection is required.
    fn fast_secondary() -> Self::Dest;
    /// Reloads the register `fast_secondary()` names from the scratch cell
    /// the right operand was spilled to, after the left operand's own
    /// evaluation has had free use of `CANONICAL`. Only invoked when
    /// `protects_secondary_across_pair_left()` is `true`.
    fn reload_secondary_from_scratch(cg: &mut Codegen<Self>) {
        let _ = cg;
    }

    fn add(cg: &mut Codegen<Self>, dd: Self::Dest, op2: Self::Dest, cd: ControlDestination);
    fn sub(cg: &mut Codegen<Self>, dd: Self::Dest, op2: Self::Dest, cd: ControlDestination);
    fn bitand(cg: &mut Codegen<Self>, dd: Self::Dest, op2: Self::Dest, cd: ControlDestination);
    fn bitor(cg: &mut Codegen<Self>, dd: Self::Dest, op2: Self::Dest, cd: ControlDestination);
    fn bitxor(cg: &mut Codegen<Self>, dd: Self::Dest, op2: Self::Dest, cd: ControlDestination);
    fn mul(cg: &mut Codegen<Self>, dd: Self::Dest, op2: Self::Dest, cd: ControlDestination);
    fn div(cg: &mut Codegen<Self>, dd: Self::Dest, op2: Self::Dest, cd: ControlDestination);

    fn emit_ret(cg: &mut Codegen<Self>);
    fn emit_ret_zero(cg: &mut Codegen<Self>);
    fn emit_ret_nonzero(cg: &mut Codegen<Self>);
    fn emit_jump(cg: &mut Codegen<Self>, label: u32);
    fn emit_branch_zero(cg: &mut Codegen<Self>, label: u32);
    fn emit_branch_nonzero(cg: &mut Codegen<Self>, label: u32);

    fn emit_call(cg: &mut Codegen<Self>, name: &str);

    /// Lowers a dialect-only extension form (`@`, `peek`, `poke`,
    /// `highbyte`, `lowbyte`, `>>`, `<<` on 65816). Returns `None` when
    /// `head` isn't one of this dialect's extension forms, so the generic
    /// walker can fall through to `UnsupportedForm`.
    fn lower_extension(
        cg: &mut Codegen<Self>,
        head: &str,
        args: &crate::ast::Node,
        dd: Self::Dest,
        cd: ControlDestination,
        line: usize,
    ) -> Option<Result<(), crate::errors::CompileError>> {
        let _ = (cg, head, args, dd, cd, line);
        None
    }
}
