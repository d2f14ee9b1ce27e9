//! Condition-expression emission: the by-ref-aware `support.IF` cascade and
//! `If`/`ElseIf`/`Else` nesting from SPEC_FULL.md §4.5.

use crate::error::Result;
use crate::expr::translate_expression;
use crate::temp::TempCounter;
use crate::{Line, TranslateCtx};
use sltc_par::{Block, ConditionalClause, Expression};
use sltc_sem::{compute_byref_mappings, substitute, ErrorToken};

fn token_var(token: ErrorToken) -> String {
    format!("errorToken{token}")
}

/// Renders one condition expression, returning any preamble lines (alias
/// opens, the `support.IF` assignment, alias closes) that must precede the
/// `if (...)` line, plus the text to place inside the parentheses.
///
/// Follows the three-way cascade: a condition whose by-ref parameters would
/// be unsafely captured by the `() => ...` closure gets opened into aliases
/// and evaluated into a temporary first; one that only needs error-trap
/// wrapping is evaluated inline as a closure; a plain condition is passed
/// to `support.IF` by value.
pub fn emit_condition(
    expr: &Expression,
    ctx: &TranslateCtx,
    indent: usize,
    temp: &mut TempCounter,
) -> Result<(Vec<Line>, String)> {
    let mappings = compute_byref_mappings(expr, ctx.scope, ctx.signatures, ctx.rewrite);

    if !mappings.is_empty() {
        let mut lines = Vec::new();
        for mapping in &mappings {
            lines.push((
                indent,
                format!("var {} = {};", mapping.to.as_str(), mapping.from.as_str()),
            ));
        }

        let substituted = substitute(expr, &mappings);
        let body_text = translate_expression(&substituted, ctx)?;
        let closure = format!("() => {body_text}");
        let result_name = temp.next("ifResult");
        let assignment = match ctx.scope.error_token {
            Some(token) => format!(
                "var {result_name} = {}.IF({closure}, {});",
                ctx.support_class_name,
                token_var(token)
            ),
            None => format!("var {result_name} = {}.IF({closure});", ctx.support_class_name),
        };
        lines.push((indent, assignment));

        for mapping in &mappings {
            lines.push((
                indent,
                format!("{} = {};", mapping.from.as_str(), mapping.to.as_str()),
            ));
        }

        return Ok((lines, result_name));
    }

    let body_text = translate_expression(expr, ctx)?;
    let condition_text = match ctx.scope.error_token {
        Some(token) => format!(
            "{}.IF(() => {body_text}, {})",
            ctx.support_class_name,
            token_var(token)
        ),
        None => format!("{}.IF({body_text})", ctx.support_class_name),
    };
    Ok((Vec::new(), condition_text))
}

/// Emits a full `If`/`ElseIf`/`Else` chain. `translate_body` lowers one
/// nested block list at one indent deeper; it is supplied by the statement
/// translator to avoid a module-level cycle.
///
/// Clauses chain as plain `else if (...)` for as long as no condition needs
/// alias rewriting. The first time one does, every remaining clause (even
/// ones that themselves need no rewriting) is nested inside an explicit
/// `else { if (...) { ... } }`, so a later clause's alias-open/close only
/// runs when control actually reaches it.
pub fn emit_if_block(
    clauses: &[ConditionalClause],
    else_body: Option<&[Block]>,
    ctx: &TranslateCtx,
    indent: usize,
    temp: &mut TempCounter,
    translate_body: &mut dyn FnMut(&[Block], &TranslateCtx, usize, &mut TempCounter) -> Result<Vec<Line>>,
) -> Result<Vec<Line>> {
    let mut out = Vec::new();
    let mut depth = indent;
    // Becomes true the first time a clause's condition needed alias
    // rewriting; from then on every further clause opens its own nested
    // `else { ... }` instead of chaining as `else if`.
    let mut nesting = false;

    for (i, clause) in clauses.iter().enumerate() {
        let needs_rewrite =
            !compute_byref_mappings(&clause.condition, ctx.scope, ctx.signatures, ctx.rewrite).is_empty();
        let use_else_if = i > 0 && !nesting && !needs_rewrite;
        let open_nest = i > 0 && (nesting || needs_rewrite);

        if open_nest {
            out.push((depth, "else".to_string()));
            out.push((depth, "{".to_string()));
            depth += 1;
        }

        let (preamble, condition_text) = emit_condition(&clause.condition, ctx, depth, temp)?;
        out.extend(preamble);
        if use_else_if {
            out.push((depth, format!("else if ({condition_text})")));
        } else {
            out.push((depth, format!("if ({condition_text})")));
        }
        out.push((depth, "{".to_string()));
        out.extend(translate_body(&clause.body, ctx, depth + 1, temp)?);
        out.push((depth, "}".to_string()));

        nesting = nesting || needs_rewrite;
    }

    if let Some(body) = else_body {
        out.push((depth, "else".to_string()));
        out.push((depth, "{".to_string()));
        out.extend(translate_body(body, ctx, depth + 1, temp)?);
        out.push((depth, "}".to_string()));
    }

    for d in (indent..depth).rev() {
        out.push((d, "}".to_string()));
    }

    Ok(out)
}
