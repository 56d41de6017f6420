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

/// A node of the cons-list AST the parser produces. `Pair` mirrors a classical
/// car/cdr cell; `Nil` is the list terminator. Dotted (improper) pairs are
/// representable but rejected wherever a form expects a proper list.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Atom(String),
    Pair(Box<Node>, Box<Node>),
    Nil,
}

impl Node {
    pub fn cons(car: Node, cdr: Node) -> Node {
        Node::Pair(Box::new(car), Box::new(cdr))
    }

    pub fn is_pair(&self) -> bool {
        matches!(self, Node::Pair(..))
    }

    pub fn as_atom(&self) -> Option<&str> {
        match self {
            Node::Atom(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn car(&self) -> Option<&Node> {
        match self {
            Node::Pair(car, _) => Some(car),
            _ => None,
        }
    }

    pub fn cdr(&self) -> Option<&Node> {
        match self {
            Node::Pair(_, cdr) => Some(cdr),
            _ => None,
        }
    }

    /// Walks the cdr chain, collecting cars, and requires a `Nil` terminator.
    /// Forms are built exclusively from proper lists (dotted pairs are not
    /// used by valid programs); a non-nil terminator is a structural error
    /// at the use site, not a parser concern.
    pub fn proper_list(&self, line: usize) -> Result<Vec<&Node>, CompileError> {
        let mut items = Vec::new();
        let mut cur = self;
        loop {
            match cur {
                Node::Nil => return Ok(items),
                Node::Pair(car, cdr) => {
                    items.push(car.as_ref());
                    cur = cdr;
                }
                Node::Atom(_) => {
                    return Err(CompileError::Syntax {
                        line,
                        reason: "improper (dotted) list where a proper list was expected"
                            .to_string(),
                    });
                }
            }
        }
    }
}
