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

//! The destination-driven walker: the one place that decides *what* a form
//! means. Every dialect shares this file; only the mnemonics it calls
//! through `Target` differ.

use crate::ast::Node;
use crate::codegen::context::Codegen;
use crate::codegen::control::goto;
use crate::codegen::destination::{ControlDestination, SimpleControlDestination};
use crate::codegen::symbols::SymbolKind;
use crate::codegen::target::Target;
use crate::errors::CompileError;
use crate::lexer::{decode_numeric, starts_with_decimal_digit};

/// Lowers one top-level form: a global variable declaration or a subroutine
/// declaration. Nothing else is legal at top level.
pub fn cg_toplevel<T: Target>(cg: &mut Codegen<T>, node: &Node, line: usize) -> Result<(), CompileError> {
    cg.current_line = line;
    let items = node.proper_list(line)?;
    let head = items
        .first()
        .and_then(|n| n.as_atom())
        .ok_or_else(|| CompileError::Syntax {
            line,
            reason: "expected a top-level form".to_string(),
        })?;
    match head {
        "int16" => declare_variables(cg, &items[1..], line),
        "sub" => declare_subroutine(cg, &items[1..], line),
        other => Err(CompileError::UnsupportedForm {
            line,
            reason: format!("`{}` is not valid at top level", other),
        }),
    }
}

fn declare_variables<T: Target>(cg: &mut Codegen<T>, names: &[&Node], line: usize) -> Result<(), CompileError> {
    if names.is_empty() {
        return Err(CompileError::UnsupportedForm {
            line,
            reason: "`int16` requires at least one variable name".to_string(),
        });
    }
    for name_node in names {
        let name = name_node.as_atom().ok_or_else(|| CompileError::UnsupportedForm {
            line,
            reason: "`int16` names must be bare symbols".to_string(),
        })?;
        cg.symbols.declare(name, SymbolKind::Variable, line)?;
        T::declare_variable_storage(cg, name);
    }
    Ok(())
}

fn declare_subroutine<T: Target>(cg: &mut Codegen<T>, items: &[&Node], line: usize) -> Result<(), CompileError> {
    let (name_node, body) = items.split_first().ok_or_else(|| CompileError::UnsupportedForm {
        line,
        reason: "`sub` requires a name".to_string(),
    })?;
    let name = name_node.as_atom().ok_or_else(|| CompileError::UnsupportedForm {
        line,
        reason: "`sub` name must be a bare symbol".to_string(),
    })?;
    cg.symbols.declare(name, SymbolKind::Subroutine, line)?;
    cg.emitter.emit_label(name);
    cg_statements(cg, body, T::CANONICAL, ControlDestination::RET)
}

/// A `block`/`do` body, and a subroutine body: every statement but the last
/// is evaluated for effect only (`CANONICAL`, `NEXT`); the last one gets the
/// destination and control transfer the caller actually wants.
pub fn cg_statements<T: Target>(
    cg: &mut Codegen<T>,
    stmts: &[&Node],
    dd: T::Dest,
    cd: ControlDestination,
) -> Result<(), CompileError> {
    match stmts.split_last() {
        None => {
            goto(cg, cd);
            Ok(())
        }
        Some((last, init)) => {
            for stmt in init {
                cg_form(cg, stmt, T::CANONICAL, ControlDestination::NEXT)?;
            }
            cg_form(cg, last, dd, cd)
        }
    }
}

/// Lowers one expression form into `dd`, transferring control per `cd`
/// afterward.
pub fn cg_form<T: Target>(
    cg: &mut Codegen<T>,
    node: &Node,
    dd: T::Dest,
    cd: ControlDestination,
) -> Result<(), CompileError> {
    let line = cg.current_line;
    match node {
        Node::Atom(text) => cg_atom(cg, text, dd, cd, line),
        Node::Nil => Err(CompileError::UnsupportedForm {
            line,
            reason: "empty form `()`".to_string(),
        }),
        Node::Pair(..) => {
            let items = node.proper_list(line)?;
            let head = items[0].as_atom().ok_or_else(|| CompileError::UnsupportedForm {
                line,
                reason: "a form's head must be a bare symbol".to_string(),
            })?;
            let args = &items[1..];
            let args_tail = node.cdr().expect("Pair always has a cdr");
            cg_list_form(cg, head, args, args_tail, dd, cd, line)
        }
    }
}

fn cg_atom<T: Target>(
    cg: &mut Codegen<T>,
    text: &str,
    dd: T::Dest,
    cd: ControlDestination,
    line: usize,
) -> Result<(), CompileError> {
    if starts_with_decimal_digit(text) {
        let value = decode_numeric(text, line)?;
        T::load_immediate(cg, dd, value);
    } else {
        if !cg.symbols.is_declared(text) {
            return Err(CompileError::UndeclaredSymbol {
                line,
                name: text.to_string(),
            });
        }
        T::load_variable(cg, dd, text);
    }
    goto(cg, cd);
    Ok(())
}

fn cg_list_form<T: Target>(
    cg: &mut Codegen<T>,
    head: &str,
    args: &[&Node],
    args_tail: &Node,
    dd: T::Dest,
    cd: ControlDestination,
    line: usize,
) -> Result<(), CompileError> {
    match head {
        "block" | "do" => cg_statements(cg, args, dd, cd),
        "+" => cg_binop(cg, T::add, args, dd, cd, line),
        "-" => cg_binop(cg, T::sub, args, dd, cd, line),
        "&" => cg_binop(cg, T::bitand, args, dd, cd, line),
        "|" => cg_binop(cg, T::bitor, args, dd, cd, line),
        "^" => cg_binop(cg, T::bitxor, args, dd, cd, line),
        "*" => cg_binop(cg, T::mul, args, dd, cd, line),
        "/" => cg_binop(cg, T::div, args, dd, cd, line),
        "if" => cg_if(cg, args, dd, cd, line),
        "set" => cg_set(cg, args, dd, cd, line),
        _ => {
            if args.is_empty() {
                match cg.symbols.kind_of(head) {
                    Some(SymbolKind::Subroutine) => {
                        T::emit_call(cg, head);
                        if dd != T::CANONICAL {
                            T::route_canonical_to(cg, dd);
                        }
                        goto(cg, cd);
                        return Ok(());
                    }
                    Some(SymbolKind::Variable) => {
                        return Err(CompileError::UnsupportedForm {
                            line,
                            reason: format!("`{}` is a variable, not a subroutine", head),
                        })
                    }
                    None => {
                        return Err(CompileError::UndeclaredSymbol {
                            line,
                            name: head.to_string(),
                        })
                    }
                }
            }
            if let Some(result) = T::lower_extension(cg, head, args_tail, dd, cd, line) {
                return result;
            }
            Err(CompileError::UnsupportedForm {
                line,
                reason: format!("unknown form `{}`", head),
            })
        }
    }
}

/// Lowers a binary operator by the shared destination-driven algorithm:
/// the left operand always ends up in `CANONICAL`, the right operand in
/// whatever the dialect calls its secondary destination, and the dialect's
/// lowering (`op`) combines them into `dd`.
///
/// Evaluation order is right-then-left unless the dialect must protect a
/// single shared secondary register from being clobbered by a compound left
/// operand's own nested evaluation (`protects_secondary_across_pair_left`):
/// in that case the right operand is spilled to named scratch while the
/// left operand has free use of the secondary register, then reloaded.
/// Dialects whose secondary operand is always a fresh scratch cell (one per
/// nesting level) never need this and always take the spill path, since
/// there's no shared register to protect in the first place.
fn cg_binop<T: Target>(
    cg: &mut Codegen<T>,
    op: fn(&mut Codegen<T>, T::Dest, T::Dest, ControlDestination),
    args: &[&Node],
    dd: T::Dest,
    cd: ControlDestination,
    line: usize,
) -> Result<(), CompileError> {
    let (x, y) = match args {
        [x, y] => (*x, *y),
        _ => {
            return Err(CompileError::UnsupportedForm {
                line,
                reason: "a binary operator takes exactly two operands".to_string(),
            })
        }
    };

    cg.scratch.alloc();
    if T::fast_secondary() == T::SCRATCH {
        cg_form(cg, y, T::SCRATCH, ControlDestination::NEXT)?;
        cg_form(cg, x, T::CANONICAL, ControlDestination::NEXT)?;
        op(cg, dd, T::SCRATCH, cd);
    } else if T::protects_secondary_across_pair_left() && x.is_pair() {
        cg_form(cg, y, T::CANONICAL, ControlDestination::NEXT)?;
        T::route_canonical_to(cg, T::SCRATCH);
        cg_form(cg, x, T::CANONICAL, ControlDestination::NEXT)?;
        T::reload_secondary_from_scratch(cg);
        op(cg, dd, T::fast_secondary(), cd);
    } else {
        cg_form(cg, y, T::fast_secondary(), ControlDestination::NEXT)?;
        cg_form(cg, x, T::CANONICAL, ControlDestination::NEXT)?;
        op(cg, dd, T::fast_secondary(), cd);
    }
    cg.scratch.free();
    Ok(())
}

fn cg_if<T: Target>(
    cg: &mut Codegen<T>,
    args: &[&Node],
    dd: T::Dest,
    cd: ControlDestination,
    line: usize,
) -> Result<(), CompileError> {
    let (pred, then_branch, else_branch) = match args {
        [p, t] => (*p, *t, None),
        [p, t, e] => (*p, *t, Some(*e)),
        _ => {
            return Err(CompileError::UnsupportedForm {
                line,
                reason: "`if` takes a predicate, a consequent, and an optional alternate".to_string(),
            })
        }
    };

    match else_branch {
        None if cd == ControlDestination::RET => {
            // No alternate, cd == RET: return early on false, no label at
            // all -- the consequent's own RET is the only terminator.
            cg_form(
                cg,
                pred,
                T::ZFLAG,
                ControlDestination::cond(SimpleControlDestination::Next, SimpleControlDestination::Ret),
            )?;
            cg_form(cg, then_branch, dd, cd)
        }
        None => {
            let after = cg.labels.fresh();
            cg_form(
                cg,
                pred,
                T::ZFLAG,
                ControlDestination::cond(SimpleControlDestination::Next, SimpleControlDestination::Label(after)),
            )?;
            cg_form(cg, then_branch, dd, cd)?;
            cg.emitter.emit_label(after);
            goto(cg, cd);
            Ok(())
        }
        Some(else_branch) => {
            // With alternate: always lower the consequent to `Lend`, the
            // alternate with `NEXT`, then honor `cd` once after `Lend:` --
            // no cd-dependent shortcut here, regardless of what `cd` is.
            let else_label = cg.labels.fresh();
            cg_form(
                cg,
                pred,
                T::ZFLAG,
                ControlDestination::cond(SimpleControlDestination::Next, SimpleControlDestination::Label(else_label)),
            )?;
            let end = cg.labels.fresh();
            cg_form(cg, then_branch, dd, ControlDestination::label(end))?;
            cg.emitter.emit_label(else_label);
            cg_form(cg, else_branch, dd, ControlDestination::NEXT)?;
            cg.emitter.emit_label(end);
            goto(cg, cd);
            Ok(())
        }
    }
}

fn cg_set<T: Target>(
    cg: &mut Codegen<T>,
    args: &[&Node],
    dd: T::Dest,
    cd: ControlDestination,
    line: usize,
) -> Result<(), CompileError> {
    let (name_node, value) = match args {
        [name, value] => (*name, *value),
        _ => {
            return Err(CompileError::UnsupportedForm {
                line,
                reason: "`set` takes a variable name and a value".to_string(),
            })
        }
    };
    let name = name_node.as_atom().ok_or_else(|| CompileError::UnsupportedForm {
        line,
        reason: "`set` target must be a bare symbol".to_string(),
    })?;
    match cg.symbols.kind_of(name) {
        Some(SymbolKind::Variable) => {}
        Some(SymbolKind::Subroutine) => {
            return Err(CompileError::UnsupportedForm {
                line,
                reason: format!("`{}` is a subroutine, not a variable", name),
            })
        }
        None => {
            return Err(CompileError::UndeclaredSymbol {
                line,
                name: name.to_string(),
            })
        }
    }
    cg_form(cg, value, T::CANONICAL, ControlDestination::NEXT)?;
    T::store_canonical_to_variable(cg, name);
    if dd != T::CANONICAL {
        T::route_canonical_to(cg, dd);
    }
    goto(cg, cd);
    Ok(())
}
