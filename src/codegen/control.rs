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
use crate::codegen::destination::{ControlDestination, SimpleControlDestination};
use crate::codegen::target::Target;

/// Transfers control per `cd`, the one place in the walker that decides
/// *whether* a jump/return is needed; the mnemonic it comes out as is always
/// the target's call.
pub fn goto<T: Target>(cg: &mut Codegen<T>, cd: ControlDestination) {
    match cd {
        ControlDestination::Simple(SimpleControlDestination::Next) => {}
        ControlDestination::Simple(SimpleControlDestination::Ret) => T::emit_ret(cg),
        ControlDestination::Simple(SimpleControlDestination::Label(l)) => T::emit_jump(cg, l),
        ControlDestination::Cond(on_nonzero, on_zero) => dispatch_cond(cg, on_nonzero, on_zero),
    }
}

fn dispatch_cond<T: Target>(
    cg: &mut Codegen<T>,
    on_nonzero: SimpleControlDestination,
    on_zero: SimpleControlDestination,
) {
    use SimpleControlDestination::*;
    match (on_nonzero, on_zero) {
        (Next, Next) => {}
        (Next, Ret) => T::emit_ret_zero(cg),
        (Next, Label(l)) => T::emit_branch_zero(cg, l),
        (Ret, Next) => T::emit_ret_nonzero(cg),
        (Ret, Ret) => T::emit_ret(cg),
        (Ret, Label(l)) => {
            T::emit_ret_nonzero(cg);
            goto(cg, ControlDestination::label(l));
        }
        (Label(l), Next) => T::emit_branch_nonzero(cg, l),
        (Label(l), Ret) => {
            T::emit_branch_nonzero(cg, l);
            T::emit_ret(cg);
        }
        (Label(l1), Label(l2)) => {
            T::emit_branch_nonzero(cg, l1);
            goto(cg, ControlDestination::label(l2));
        }
    }
}
