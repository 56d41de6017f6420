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

use crate::ast::Node;
use crate::errors::CompileError;
use pest::Parser;
use pest::iterators::{Pair, Pairs};
use pest_derive::Parser;

#[derive(Parser)]
#[grammar = "parser/grammar.pest"]
struct SexprParser;

/// Parses a whole source file into its top-level forms, each paired with the
/// 1-based source line it starts on (used only for error messages; the core
/// walker is otherwise indifferent to source position).
pub fn parse_source(source: &str) -> Result<Vec<(usize, Node)>, CompileError> {
    let mut pairs = SexprParser::parse(Rule::program, source)?;
    let program = pairs.next().expect("program rule always produces one pair");

    let mut forms = Vec::new();
    for pair in program.into_inner() {
        if pair.as_rule() == Rule::sexpr {
            let line = pair.as_span().start_pos().line_col().0;
            forms.push((line, build_node(pair)));
        }
    }
    Ok(forms)
}

fn build_node(pair: Pair<Rule>) -> Node {
    match pair.as_rule() {
        Rule::sexpr => build_node(pair.into_inner().next().expect("sexpr wraps one child")),
        Rule::atom => Node::Atom(pair.as_str().to_string()),
        Rule::list => build_list(pair.into_inner()),
        other => unreachable!("unexpected rule in parse tree: {:?}", other),
    }
}

fn build_list(inner: Pairs<Rule>) -> Node {
    let mut items = Vec::new();
    let mut tail = Node::Nil;

    for pair in inner {
        match pair.as_rule() {
            Rule::sexpr => items.push(build_node(pair)),
            Rule::dot_tail => {
                let cdr_pair = pair
                    .into_inner()
                    .next()
                    .expect("dot_tail always wraps one sexpr");
                tail = build_node(cdr_pair);
            }
            other => unreachable!("unexpected rule inside list: {:?}", other),
        }
    }

    items
        .into_iter()
        .rev()
        .fold(tail, |cdr, car| Node::cons(car, cdr))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn atom(s: &str) -> Node {
        Node::Atom(s.to_string())
    }

    #[test]
    fn parses_bare_atom() {
        let forms = parse_source("42\n").unwrap();
        assert_eq!(forms, vec![(1, atom("42"))]);
    }

    #[test]
    fn parses_nested_list() {
        let forms = parse_source("(+ 1 2)").unwrap();
        assert_eq!(
            forms,
            vec![(
                1,
                Node::cons(atom("+"), Node::cons(atom("1"), Node::cons(atom("2"), Node::Nil)))
            )]
        );
    }

    #[test]
    fn parses_dotted_pair() {
        let forms = parse_source("(1 . 2)").unwrap();
        assert_eq!(forms, vec![(1, Node::cons(atom("1"), atom("2")))]);
    }

    #[test]
    fn skips_comments() {
        let forms = parse_source("; a comment\n(sub f 1)\n").unwrap();
        assert_eq!(forms.len(), 1);
        assert_eq!(forms[0].0, 2);
    }

    #[test]
    fn multiple_top_level_forms_track_their_own_lines() {
        let forms = parse_source("(int16 x)\n(set x 1)\n").unwrap();
        assert_eq!(forms.len(), 2);
        assert_eq!(forms[0].0, 1);
        assert_eq!(forms[1].0, 2);
    }

    #[test]
    fn rejects_malformed_source() {
        assert!(parse_source("(+ 1 2").is_err());
    }
}
