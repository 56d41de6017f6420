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

/// One side of a conditional control destination, or a control destination
/// in its own right.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SimpleControlDestination {
    Next,
    Ret,
    Label(u32),
}

/// Where control should flow after a subexpression has been evaluated.
///
/// `Cond` is a distinct variant (not a tuple of atoms glued on afterward) so
/// a `match` over it is exhaustive at the type level: every (true, false)
/// combination has to be handled explicitly by the dispatcher.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ControlDestination {
    Simple(SimpleControlDestination),
    /// `(on_nonzero, on_zero)`, produced only by predicate lowering in `if`.
    Cond(SimpleControlDestination, SimpleControlDestination),
}

impl ControlDestination {
    pub const NEXT: ControlDestination = ControlDestination::Simple(SimpleControlDestination::Next);
    pub const RET: ControlDestination = ControlDestination::Simple(SimpleControlDestination::Ret);

    pub fn label(n: u32) -> ControlDestination {
        ControlDestination::Simple(SimpleControlDestination::Label(n))
    }

    pub fn cond(on_nonzero: SimpleControlDestination, on_zero: SimpleControlDestination) -> ControlDestination {
        ControlDestination::Cond(on_nonzero, on_zero)
    }
}
