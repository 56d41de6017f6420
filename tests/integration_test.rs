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

use ddcg::file_reader::MockFileReader;
use ddcg::{compile_path, compile_source, Dialect};
use std::path::Path;

fn compile(source: &str, dialect: Dialect) -> Vec<String> {
    compile_source(source, dialect).unwrap()
}

#[test]
fn reads_source_through_the_file_reader_boundary() {
    let mut reader = MockFileReader::default();
    reader.add_file("test.ddcg", "(int16 x)\n(sub main (set x 1))\n");

    let listing = compile_path(Path::new("test.ddcg"), Dialect::Z80, &reader).unwrap();
    assert!(listing.iter().any(|l| l == "x:"));
    assert!(listing.iter().any(|l| l == "main:"));
}

#[test]
fn missing_file_is_reported_through_anyhow_context() {
    let reader = MockFileReader::default();
    let err = compile_path(Path::new("missing.ddcg"), Dialect::Z80, &reader).unwrap_err();
    assert!(format!("{:#}", err).contains("missing.ddcg"));
}

#[test]
fn z80_declares_a_global_variable() {
    let listing = compile("(int16 counter)\n", Dialect::Z80);
    assert_eq!(listing, vec!["counter:".to_string(), "    DEFW   0".to_string()]);
}

#[test]
fn m65816_declares_a_global_variable() {
    let listing = compile("(int16 counter)\n", Dialect::M65816);
    assert_eq!(listing, vec!["counter:".to_string(), "    .WORD  0".to_string()]);
}

#[test]
fn z80_subroutine_returning_a_literal() {
    let listing = compile("(sub answer 42)\n", Dialect::Z80);
    assert_eq!(
        listing,
        vec![
            "answer:".to_string(),
            "    LD     HL,42".to_string(),
            "    RET    ".to_string(),
        ]
    );
}

#[test]
fn m65816_subroutine_returns_with_rts_not_ret() {
    let listing = compile("(sub answer 42)\n", Dialect::M65816);
    assert_eq!(
        listing,
        vec![
            "answer:".to_string(),
            "    LDA    #42".to_string(),
            "    RTS    ".to_string(),
        ]
    );
}

#[test]
fn z80_atomic_operand_takes_the_fast_path_into_de() {
    // `x` is atomic, so `3` (y) is loaded directly into DE with no scratch
    // spill, then `x` into HL, then ADD HL,DE.
    let listing = compile("(int16 x)\n(sub bump (+ x 3))\n", Dialect::Z80);
    let add_idx = listing.iter().position(|l| l.contains("ADD")).unwrap();
    assert!(listing[add_idx - 1].contains("LD     HL,(x)"));
    assert!(listing[add_idx - 2].contains("LD     DE,3"));
    assert!(listing[add_idx].contains("ADD    HL,DE"));
}

#[test]
fn z80_compound_left_operand_spills_through_scratch() {
    // Left operand `(+ a b)` is compound, so `c` (y) must be evaluated into
    // HL first, spilled to TMPDE1, then the left side computed, then
    // reloaded into DE before the outer add.
    let listing = compile(
        "(int16 a)\n(int16 b)\n(int16 c)\n(sub total (+ (+ a b) c))\n",
        Dialect::Z80,
    );
    let joined = listing.join("\n");
    assert!(joined.contains("(TMPDE1),HL"));
    assert!(joined.contains("DE,(TMPDE1)"));
}

#[test]
fn m65816_binop_always_routes_the_right_operand_through_zero_page() {
    let listing = compile("(int16 x)\n(sub bump (+ x 3))\n", Dialect::M65816);
    let joined = listing.join("\n");
    assert!(joined.contains("STA    $00"));
    assert!(joined.contains("ADC    $00"));
}

#[test]
fn if_without_else_at_ret_returns_early_with_no_label() {
    // cd is RET here (the if is the subroutine's final statement), so the
    // predicate returns directly on false -- no label at all.
    let listing = compile("(int16 x)\n(sub maybe (if x 1))\n", Dialect::Z80);
    let joined = listing.join("\n");
    assert!(joined.contains("RET    Z"));
    assert!(joined.contains("LD     HL,1"));
    assert!(!listing.iter().any(|l| l == "L100:"));
    assert_eq!(joined.matches("RET").count(), 2);
}

#[test]
fn if_without_else_inside_a_block_jumps_past_on_false() {
    // Here cd is NEXT, not RET, so the generic label-based path applies.
    let listing = compile("(int16 x)\n(sub maybe (block (if x 1) 0))\n", Dialect::Z80);
    assert!(listing.iter().any(|l| l.contains("JP     Z,L100")));
    assert!(listing.iter().any(|l| l == "L100:"));
}

#[test]
fn if_with_else_emits_both_arms() {
    // The with-alternate path always allocates both the else-label and the
    // rejoin label, then honors the outer cd (RET) exactly once at the end.
    let listing = compile("(int16 x)\n(sub pick (if x 1 2))\n", Dialect::Z80);
    let joined = listing.join("\n");
    assert!(joined.contains("LD     HL,1"));
    assert!(joined.contains("LD     HL,2"));
    assert!(joined.contains("L100:"));
    assert!(joined.contains("L101:"));
    assert_eq!(joined.matches("RET").count(), 1);
}

#[test]
fn if_with_else_inside_a_block_needs_a_rejoin_label() {
    // Here the `if` is not the subroutine's final statement, so its cd is
    // NEXT, not RET -- the then-branch must jump past the else-branch to an
    // explicit "after" label.
    let listing = compile("(int16 x)\n(sub pick (block (if x 1 2) 0))\n", Dialect::Z80);
    let joined = listing.join("\n");
    assert!(joined.contains("L100:"));
    assert!(joined.contains("L101:"));
}

#[test]
fn set_assigns_and_subroutine_declares_before_use() {
    let listing = compile("(int16 x)\n(sub setter (set x 7))\n", Dialect::Z80);
    let joined = listing.join("\n");
    assert!(joined.contains("LD     HL,7"));
    assert!(joined.contains("LD     (x),HL"));
}

#[test]
fn bare_call_to_a_declared_subroutine() {
    let listing = compile("(sub helper 1)\n(sub main (helper))\n", Dialect::Z80);
    let joined = listing.join("\n");
    assert!(joined.contains("CALL   helper"));
}

#[test]
fn calling_an_undeclared_subroutine_is_an_error() {
    let err = compile_source("(sub main (missing))\n", Dialect::Z80).unwrap_err();
    assert!(format!("{}", err).contains("missing"));
}

#[test]
fn referencing_an_undeclared_variable_is_an_error() {
    let err = compile_source("(sub main x)\n", Dialect::Z80).unwrap_err();
    assert!(format!("{}", err).contains("x"));
}

#[test]
fn redeclaring_a_symbol_is_an_error() {
    let err = compile_source("(int16 x)\n(int16 x)\n", Dialect::Z80).unwrap_err();
    assert!(format!("{}", err).to_lowercase().contains("redefin"));
}

#[test]
fn m65816_address_of_extension_form() {
    let listing = compile("(int16 x)\n(sub addr (@ x))\n", Dialect::M65816);
    assert!(listing.iter().any(|l| l.contains("LDA    #x")));
}

#[test]
fn m65816_extension_forms_are_unavailable_on_z80() {
    let err = compile_source("(int16 x)\n(sub addr (@ x))\n", Dialect::Z80).unwrap_err();
    assert!(format!("{}", err).contains("@"));
}

#[test]
fn m65816_peek_word_routes_the_address_through_xr() {
    let listing = compile("(int16 x)\n(sub load (peek word x))\n", Dialect::M65816);
    let joined = listing.join("\n");
    assert!(joined.contains("LDX    x"));
    assert!(joined.contains("LDA    0,X"));
    assert!(!joined.contains("AND    #$00FF"));
}

#[test]
fn m65816_peek_byte_masks_the_high_byte() {
    let listing = compile("(int16 x)\n(sub load (peek byte x))\n", Dialect::M65816);
    let joined = listing.join("\n");
    assert!(joined.contains("LDA    0,X"));
    assert!(joined.contains("AND    #$00FF"));
}

#[test]
fn m65816_poke_byte_brackets_the_store_with_sep_rep() {
    let listing = compile("(int16 x)\n(sub store (poke byte x 9))\n", Dialect::M65816);
    let joined = listing.join("\n");
    assert!(joined.contains("SEP    #$20"));
    assert!(joined.contains("STA    0,X"));
    assert!(joined.contains("REP    #$20"));
}

#[test]
fn m65816_poke_word_stores_without_the_sep_rep_bracket() {
    let listing = compile("(int16 x)\n(sub store (poke word x 9))\n", Dialect::M65816);
    let joined = listing.join("\n");
    assert!(joined.contains("STA    0,X"));
    assert!(!joined.contains("SEP"));
    assert!(!joined.contains("REP"));
}

#[test]
fn m65816_shift_forms_emit_one_instruction_per_bit() {
    let listing = compile("(sub shifted (>> 16 2))\n", Dialect::M65816);
    let shifts = listing.iter().filter(|l| l.contains("LSR")).count();
    assert_eq!(shifts, 2);
    let listing = compile("(sub shifted (<< 1 3))\n", Dialect::M65816);
    let shifts = listing.iter().filter(|l| l.contains("ASL")).count();
    assert_eq!(shifts, 3);
}

#[test]
fn numeric_literal_bases_decode_correctly_in_context() {
    let listing = compile("(sub k (+ 0x10 0o17))\n", Dialect::Z80);
    let joined = listing.join("\n");
    assert!(joined.contains("HL,16") || joined.contains("DE,16"));
    assert!(joined.contains("HL,15") || joined.contains("DE,15"));
}

#[test]
fn nested_block_discards_all_but_the_last_statement() {
    let listing = compile("(int16 x)\n(sub main (block (set x 1) (set x 2) x))\n", Dialect::Z80);
    let joined = listing.join("\n");
    assert_eq!(joined.matches("LD     (x),HL").count(), 2);
}
