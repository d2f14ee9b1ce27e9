//! Expression translation: segment dispatch and the operator-to-runtime-call
//! table from SPEC_FULL.md §4.5.

use crate::error::{GenError, Result};
use crate::TranslateCtx;
use sltc_lex::{BuiltInValue, ComparisonSymbol, NumericValue, OperatorSymbol};
use sltc_par::{Expression, Op, Segment};

/// Maps a binary/unary SL operator onto the runtime façade's method name.
fn op_name(op: Op) -> &'static str {
    match op {
        Op::Symbol(OperatorSymbol::Caret) => "POW",
        Op::Symbol(OperatorSymbol::Slash) => "DIV",
        Op::Symbol(OperatorSymbol::Star) => "MULT",
        Op::Symbol(OperatorSymbol::Backslash) => "INTDIV",
        Op::Symbol(OperatorSymbol::Mod) => "MOD",
        Op::Symbol(OperatorSymbol::Plus) => "ADD",
        Op::Symbol(OperatorSymbol::Minus) => "SUBT",
        Op::Symbol(OperatorSymbol::Ampersand) => "CONCAT",
        Op::Symbol(OperatorSymbol::Not) => "NOT",
        Op::Symbol(OperatorSymbol::And) => "AND",
        Op::Symbol(OperatorSymbol::Or) => "OR",
        Op::Symbol(OperatorSymbol::Xor) => "XOR",
        Op::Symbol(OperatorSymbol::Eqv) => "EQV",
        Op::Symbol(OperatorSymbol::Imp) => "IMP",
        Op::Symbol(OperatorSymbol::Is) => "IS",
        Op::Comparison(ComparisonSymbol::Eq) => "EQ",
        Op::Comparison(ComparisonSymbol::NotEq) => "NOTEQ",
        Op::Comparison(ComparisonSymbol::Lt) => "LT",
        Op::Comparison(ComparisonSymbol::Gt) => "GT",
        Op::Comparison(ComparisonSymbol::LtEq) => "LTE",
        Op::Comparison(ComparisonSymbol::GtEq) => "GTE",
    }
}

fn literal_text(value: NumericValue) -> String {
    match value {
        NumericValue::Integer(i) => i.to_string(),
        NumericValue::Float(f) => {
            let text = format!("{f}");
            if text.contains('.') || text.contains('e') || text.contains("inf") || text.contains("NaN") {
                text
            } else {
                format!("{text}.0")
            }
        }
    }
}

fn escape_string_literal(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for ch in text.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            other => out.push(other),
        }
    }
    out.push('"');
    out
}

fn builtin_text(value: BuiltInValue) -> &'static str {
    match value {
        BuiltInValue::Nothing => "Nothing",
        BuiltInValue::Null => "Null",
        BuiltInValue::Empty => "Empty",
        BuiltInValue::True => "True",
        BuiltInValue::False => "False",
    }
}

/// Renders `expr` as TL text calling through `ctx`'s support façade.
/// `expr` must already be in fully segmented form — see [`Segment`]'s
/// well-formedness invariants.
pub fn translate_expression(expr: &Expression, ctx: &TranslateCtx) -> Result<String> {
    match expr.segments.as_slice() {
        [single] => translate_segment(single, ctx),
        [Segment::Operation(op), operand] => {
            let rendered = translate_segment(operand, ctx)?;
            Ok(format!("{}.{}({})", ctx.support_class_name, op_name(*op), rendered))
        }
        [left, Segment::Operation(op), right] => {
            let left_text = translate_segment(left, ctx)?;
            let right_text = translate_segment(right, ctx)?;
            Ok(format!(
                "{}.{}({}, {})",
                ctx.support_class_name,
                op_name(*op),
                left_text,
                right_text
            ))
        }
        other => Err(GenError::MalformedExpression(other.len())),
    }
}

fn translate_segment(segment: &Segment, ctx: &TranslateCtx) -> Result<String> {
    match segment {
        Segment::NumericValue(v) => Ok(literal_text(*v)),
        Segment::StringValue(s) => Ok(escape_string_literal(s.as_str())),
        Segment::BuiltinValue(v) => Ok(builtin_text(*v).to_string()),
        Segment::Bracketed(inner) => translate_expression(inner, ctx),
        Segment::Call { path, args, brackets_present } => {
            translate_call(path, args, *brackets_present, ctx)
        }
        Segment::Operation(_) => Err(GenError::MalformedExpression(1)),
    }
}

fn translate_call(
    path: &[sltc_util::Symbol],
    args: &[Expression],
    brackets_present: bool,
    ctx: &TranslateCtx,
) -> Result<String> {
    let (first, rest) = path.split_first().ok_or(GenError::EmptyCallPath)?;
    let rewritten_first = (ctx.rewrite)(first.as_str());

    if rest.is_empty() {
        if let Some(sig) = ctx.signatures.lookup(&rewritten_first) {
            // A resolved top-level Sub/Function/Property: emitted as a
            // direct call, `ref`-qualifying whichever positions the
            // signature declares by-ref, rather than routed through the
            // fully dynamic CALL façade.
            let mut arg_texts = Vec::with_capacity(args.len());
            for (position, arg) in args.iter().enumerate() {
                let text = translate_expression(arg, ctx)?;
                if sig.is_byref(position) {
                    arg_texts.push(format!("ref {text}"));
                } else {
                    arg_texts.push(text);
                }
            }
            return Ok(format!("{rewritten_first}({})", arg_texts.join(", ")));
        }

        if args.is_empty() && !brackets_present {
            // A bare, unresolved name with no call parentheses: a plain
            // variable reference.
            return Ok(rewritten_first);
        }
    }

    let members: Vec<String> = rest.iter().map(|s| format!("\"{}\"", s.as_str())).collect();
    let mut arg_texts = Vec::with_capacity(args.len());
    for arg in args {
        arg_texts.push(translate_expression(arg, ctx)?);
    }

    Ok(format!(
        "{}.CALL(\"{}\", [{}], [{}])",
        ctx.support_class_name,
        rewritten_first,
        members.join(", "),
        arg_texts.join(", ")
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TranslateCtx;
    use sltc_sem::{CallableSignatures, ScopeInfo};
    use sltc_util::Symbol;

    fn lower(s: &str) -> String {
        s.to_ascii_lowercase()
    }

    fn ctx<'a>(scope: &'a ScopeInfo, sigs: &'a CallableSignatures, rewrite: &'a dyn Fn(&str) -> String) -> TranslateCtx<'a> {
        TranslateCtx {
            support_class_name: "support",
            rewrite,
            scope,
            signatures: sigs,
        }
    }

    #[test]
    fn numeric_literal_renders_verbatim() {
        let scope = ScopeInfo::default();
        let sigs = CallableSignatures::default();
        let c = ctx(&scope, &sigs, &lower);
        let expr = Expression::atom(Segment::NumericValue(NumericValue::Integer(42)));
        assert_eq!(translate_expression(&expr, &c).unwrap(), "42");
    }

    #[test]
    fn string_literal_is_escaped() {
        let scope = ScopeInfo::default();
        let sigs = CallableSignatures::default();
        let c = ctx(&scope, &sigs, &lower);
        let expr = Expression::atom(Segment::StringValue(Symbol::intern("a\"b")));
        assert_eq!(translate_expression(&expr, &c).unwrap(), "\"a\\\"b\"");
    }

    #[test]
    fn binary_add_dispatches_to_add() {
        let scope = ScopeInfo::default();
        let sigs = CallableSignatures::default();
        let c = ctx(&scope, &sigs, &lower);
        let expr = Expression::binary(
            Expression::atom(Segment::NumericValue(NumericValue::Integer(1))),
            Op::Symbol(OperatorSymbol::Plus),
            Expression::atom(Segment::NumericValue(NumericValue::Integer(2))),
        );
        assert_eq!(translate_expression(&expr, &c).unwrap(), "support.ADD(1, 2)");
    }

    #[test]
    fn unary_not_dispatches_to_not() {
        let scope = ScopeInfo::default();
        let sigs = CallableSignatures::default();
        let c = ctx(&scope, &sigs, &lower);
        let expr = Expression::unary(
            OperatorSymbol::Not,
            Expression::atom(Segment::BuiltinValue(BuiltInValue::True)),
        );
        assert_eq!(translate_expression(&expr, &c).unwrap(), "support.NOT(True)");
    }

    #[test]
    fn comparison_dispatches_to_gte() {
        let scope = ScopeInfo::default();
        let sigs = CallableSignatures::default();
        let c = ctx(&scope, &sigs, &lower);
        let expr = Expression::binary(
            Expression::atom(Segment::NumericValue(NumericValue::Integer(2))),
            Op::Comparison(ComparisonSymbol::GtEq),
            Expression::atom(Segment::NumericValue(NumericValue::Integer(1))),
        );
        assert_eq!(translate_expression(&expr, &c).unwrap(), "support.GTE(2, 1)");
    }

    #[test]
    fn call_with_args_renders_members_and_arguments() {
        let scope = ScopeInfo::default();
        let sigs = CallableSignatures::default();
        let c = ctx(&scope, &sigs, &lower);
        let expr = Expression::atom(Segment::Call {
            path: vec![Symbol::intern("Obj"), Symbol::intern("Method")],
            args: vec![Expression::atom(Segment::NumericValue(NumericValue::Integer(1)))],
            brackets_present: true,
        });
        assert_eq!(
            translate_expression(&expr, &c).unwrap(),
            "support.CALL(\"obj\", [\"Method\"], [1])"
        );
    }

    #[test]
    fn bare_unresolved_name_renders_as_variable_reference() {
        let scope = ScopeInfo::default();
        let sigs = CallableSignatures::default();
        let c = ctx(&scope, &sigs, &lower);
        let expr = Expression::atom(Segment::Call {
            path: vec![Symbol::intern("X")],
            args: vec![],
            brackets_present: false,
        });
        assert_eq!(translate_expression(&expr, &c).unwrap(), "x");
    }

    #[test]
    fn resolved_call_with_byref_position_emits_ref_argument() {
        use sltc_sem::CallableSignature;
        let scope = ScopeInfo::default();
        let mut sigs = CallableSignatures::default();
        sigs.insert("f", CallableSignature { byref_positions: vec![true] });
        let c = ctx(&scope, &sigs, &lower);
        let expr = Expression::atom(Segment::Call {
            path: vec![Symbol::intern("F")],
            args: vec![Expression::atom(Segment::Call {
                path: vec![Symbol::intern("P")],
                args: vec![],
                brackets_present: false,
            })],
            brackets_present: true,
        });
        assert_eq!(translate_expression(&expr, &c).unwrap(), "f(ref p)");
    }

    #[test]
    fn dotted_path_always_routes_through_call_facade() {
        let scope = ScopeInfo::default();
        let sigs = CallableSignatures::default();
        let c = ctx(&scope, &sigs, &lower);
        let expr = Expression::atom(Segment::Call {
            path: vec![Symbol::intern("Obj"), Symbol::intern("Method")],
            args: vec![],
            brackets_present: true,
        });
        assert_eq!(
            translate_expression(&expr, &c).unwrap(),
            "support.CALL(\"obj\", [\"Method\"], [])"
        );
    }
}
