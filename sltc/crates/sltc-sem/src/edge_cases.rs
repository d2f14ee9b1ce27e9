//! End-to-end scope/by-ref edge cases exercised through the public API
//! only (no direct construction of internal types).

use crate::{compute_byref_mappings, prepare, ScopeInfo};
use sltc_lex::lex;
use sltc_par::{parse_blocks, Block};
use sltc_util::{FxHashSet, Handler};

fn lower(s: &str) -> String {
    s.to_ascii_lowercase()
}

fn parse(src: &str) -> Vec<Block> {
    let mut handler = Handler::new();
    let tokens = lex(src, &mut handler).expect("lex ok");
    parse_blocks(tokens, &mut handler).expect("parse ok")
}

#[test]
fn nested_class_method_signatures_are_collected() {
    let blocks = parse(
        r#"
        Class Widget
            Public Sub Resize(ByRef w, ByVal h)
            End Sub
        End Class
        "#,
    );
    let (signatures, _) = prepare(&blocks, &lower);
    let sig = signatures.lookup("resize").expect("nested sub is collected");
    assert_eq!(sig.byref_positions, vec![true, false]);
}

#[test]
fn bare_params_default_to_byref_in_signature() {
    let blocks = parse("Sub Legacy(a, b)\nEnd Sub");
    let (signatures, _) = prepare(&blocks, &lower);
    let sig = signatures.lookup("legacy").expect("signature present");
    assert_eq!(sig.byref_positions, vec![true, true]);
}

#[test]
fn name_lookup_requires_pre_folded_key() {
    let blocks = parse("Function DoThing(x)\nEnd Function");
    let (signatures, _) = prepare(&blocks, &lower);
    assert!(signatures.lookup("dothing").is_some());
    assert!(signatures.lookup("DOTHING").is_none());
}

#[test]
fn mapper_finds_no_aliasing_when_caller_has_no_byref_params() {
    let blocks = parse("Sub Outer()\n  Inner x\nEnd Sub\nSub Inner(ByRef y)\nEnd Sub");
    let (signatures, _) = prepare(&blocks, &lower);

    let scope = ScopeInfo::default();
    let expr = sltc_par::Expression::atom(sltc_par::Segment::Call {
        path: vec![sltc_util::Symbol::intern("Inner")],
        args: vec![sltc_par::Expression::atom(sltc_par::Segment::Call {
            path: vec![sltc_util::Symbol::intern("x")],
            args: vec![],
            brackets_present: false,
        })],
        brackets_present: true,
    });

    let mappings = compute_byref_mappings(&expr, &scope, &signatures, &lower);
    assert!(mappings.is_empty(), "x is not a by-ref param of the (empty) scope");
}

#[test]
fn mapper_deduplicates_repeated_occurrences_of_the_same_name() {
    let blocks = parse(
        "Function F(ByRef x)\n  Combine x, x\nEnd Function\nSub Combine(ByRef a, ByRef b)\nEnd Sub",
    );
    let (signatures, _) = prepare(&blocks, &lower);

    let mut byref_params = FxHashSet::default();
    byref_params.insert("x".to_string());
    let scope = ScopeInfo {
        byref_params,
        ..ScopeInfo::default()
    };

    let x = sltc_util::Symbol::intern("x");
    let bare_x = || {
        sltc_par::Expression::atom(sltc_par::Segment::Call {
            path: vec![x],
            args: vec![],
            brackets_present: false,
        })
    };
    let expr = sltc_par::Expression::atom(sltc_par::Segment::Call {
        path: vec![sltc_util::Symbol::intern("Combine")],
        args: vec![bare_x(), bare_x()],
        brackets_present: true,
    });

    let mappings = compute_byref_mappings(&expr, &scope, &signatures, &lower);
    assert_eq!(mappings.len(), 1, "one alias per distinct from-name, reused across occurrences");
}

#[test]
fn scope_stack_tracks_enclosing_class_through_nested_push() {
    use crate::ScopeStack;
    let rewrite = lower;
    let mut stack = ScopeStack::new(&rewrite);
    stack.push_class(sltc_util::Symbol::intern("Account"));
    stack.push_callable(sltc_util::Symbol::intern("Withdraw"), FxHashSet::default());
    assert_eq!(
        stack.current().enclosing_class,
        Some(sltc_util::Symbol::intern("Account"))
    );
    assert_eq!(
        stack.current().enclosing_callable,
        Some(sltc_util::Symbol::intern("Withdraw"))
    );
}
