//! Statement and block translation: the driver that walks a parsed SL unit
//! and emits a flat `(indent, text)` line stream.

use crate::cond::emit_if_block;
use crate::error::Result;
use crate::expr::translate_expression;
use crate::temp::TempCounter;
use crate::{Line, TranslateCtx};
use sltc_par::{
    AssignKind, Block, DimVariable, ExitKind, FunctionBlock, LoopPolarity, LoopTest, Param,
    PassingMode, PropertyBlock, PropertyKind, SelectCase, Segment, SubBlock, Visibility,
};
use sltc_sem::{CallableSignatures, ScopeInfo};
use sltc_util::FxHashSet;

/// Owns the whole-unit callable signature table and drives translation of
/// every top-level block into emitted TL text.
pub struct Translator<'a> {
    support_class_name: String,
    rewrite: &'a dyn Fn(&str) -> String,
    signatures: CallableSignatures,
}

impl<'a> Translator<'a> {
    pub fn new(
        blocks: &[Block],
        support_class_name: impl Into<String>,
        rewrite: &'a dyn Fn(&str) -> String,
    ) -> Self {
        let signatures = CallableSignatures::collect(blocks, rewrite);
        Self {
            support_class_name: support_class_name.into(),
            rewrite,
            signatures,
        }
    }

    pub fn translate_unit(&self, blocks: &[Block]) -> Result<Vec<Line>> {
        let scope = ScopeInfo::default();
        let ctx = TranslateCtx {
            support_class_name: &self.support_class_name,
            rewrite: self.rewrite,
            scope: &scope,
            signatures: &self.signatures,
        };
        let mut temp = TempCounter::new();
        translate_block(blocks, &ctx, 0, &mut temp)
    }
}

fn visibility_modifier(visibility: Visibility) -> &'static str {
    match visibility {
        Visibility::Public | Visibility::Default => "public ",
        Visibility::Private => "private ",
    }
}

fn param_text(param: &Param, rewrite: &dyn Fn(&str) -> String) -> String {
    let name = rewrite(param.name.as_str());
    match param.mode {
        PassingMode::ByRef => format!("ref object {name}"),
        PassingMode::ByVal => format!("object {name}"),
    }
}

fn params_list(params: &[Param], rewrite: &dyn Fn(&str) -> String) -> String {
    params.iter().map(|p| param_text(p, rewrite)).collect::<Vec<_>>().join(", ")
}

fn byref_param_names(params: &[Param], rewrite: &dyn Fn(&str) -> String) -> FxHashSet<String> {
    params
        .iter()
        .filter(|p| matches!(p.mode, PassingMode::ByRef))
        .map(|p| rewrite(p.name.as_str()))
        .collect()
}

/// Translates a sequence of sibling blocks at one indent level. Error-trap
/// state (`On Error Resume Next`/`Goto 0`) threads sequentially through the
/// siblings in this list only — a nested body's trap changes do not leak
/// back out to its parent, matching the source language's single, flat,
/// per-procedure trap state.
pub(crate) fn translate_block(blocks: &[Block], ctx: &TranslateCtx, indent: usize, temp: &mut TempCounter) -> Result<Vec<Line>> {
    let (lines, _) = translate_block_with_final_scope(blocks, ctx, indent, temp)?;
    Ok(lines)
}

/// Like [`translate_block`] but also hands back the error-trap state the
/// sibling list ended in, so a procedure body can tell whether it fell off
/// the end with a trap still active and needs to release it.
fn translate_block_with_final_scope(
    blocks: &[Block],
    ctx: &TranslateCtx,
    indent: usize,
    temp: &mut TempCounter,
) -> Result<(Vec<Line>, ScopeInfo)> {
    let mut local_scope = ctx.scope.clone();
    let mut out = Vec::new();
    for block in blocks {
        let step_ctx = TranslateCtx {
            support_class_name: ctx.support_class_name,
            rewrite: ctx.rewrite,
            scope: &local_scope,
            signatures: ctx.signatures,
        };
        let (lines, updated_scope) = translate_one(block, &step_ctx, indent, temp)?;
        out.extend(lines);
        if let Some(scope) = updated_scope {
            local_scope = scope;
        }
    }
    Ok((out, local_scope))
}

/// Appends a `RELEASEERRORTRAPPINGTOKEN` call when the body fell off its end
/// with a trap still active, matching the release already emitted by every
/// explicit exit path.
fn release_trailing_error_token(out: &mut Vec<Line>, final_scope: &ScopeInfo, ctx: &TranslateCtx, indent: usize) {
    if let Some(token_id) = final_scope.error_token {
        let token_var = format!("errorToken{token_id}");
        out.push((indent, format!("{}.RELEASEERRORTRAPPINGTOKEN({token_var});", ctx.support_class_name)));
    }
}

fn translate_one(
    block: &Block,
    ctx: &TranslateCtx,
    indent: usize,
    temp: &mut TempCounter,
) -> Result<(Vec<Line>, Option<ScopeInfo>)> {
    match block {
        Block::Statement { tokens, lines } => {
            let expr = sltc_par::parse_expression(tokens, lines.start)?;
            let text = translate_expression(&expr, ctx)?;
            Ok((vec![(indent, format!("{text};"))], None))
        }

        Block::ValueSettingStatement { target, value, kind, lines } => {
            let target_expr = sltc_par::parse_expression(target, lines.start)?;
            let value_expr = sltc_par::parse_expression(value, lines.start)?;
            let line = translate_assignment(&target_expr, &value_expr, *kind, ctx)?;
            Ok((vec![(indent, line)], None))
        }

        Block::IfBlock { clauses, else_body, .. } => {
            let lines = emit_if_block(
                clauses,
                else_body.as_deref(),
                ctx,
                indent,
                temp,
                &mut |body, inner_ctx, inner_indent, inner_temp| translate_block(body, inner_ctx, inner_indent, inner_temp),
            )?;
            Ok((lines, None))
        }

        Block::ForBlock { counter, from, to, step, body, .. } => {
            let counter_name = (ctx.rewrite)(counter.as_str());
            let from_text = translate_expression(from, ctx)?;
            let to_text = translate_expression(to, ctx)?;
            let step_text = match step {
                Some(expr) => translate_expression(expr, ctx)?,
                None => "1".to_string(),
            };
            let mut out = vec![(
                indent,
                format!(
                    "for (var {counter_name} = {from_text}; {}.LTE({counter_name}, {to_text}); {counter_name} = {}.ADD({counter_name}, {step_text}))",
                    ctx.support_class_name, ctx.support_class_name
                ),
            )];
            out.push((indent, "{".to_string()));
            out.extend(translate_block(body, ctx, indent + 1, temp)?);
            out.push((indent, "}".to_string()));
            Ok((out, None))
        }

        Block::ForEachBlock { item, collection, body, .. } => {
            let item_name = (ctx.rewrite)(item.as_str());
            let collection_text = translate_expression(collection, ctx)?;
            let mut out = vec![(indent, format!("foreach (var {item_name} in {collection_text})"))];
            out.push((indent, "{".to_string()));
            out.extend(translate_block(body, ctx, indent + 1, temp)?);
            out.push((indent, "}".to_string()));
            Ok((out, None))
        }

        Block::DoBlock { test, polarity, condition, body, .. } => {
            Ok((emit_do_loop(*test, *polarity, condition.as_ref(), body, ctx, indent, temp)?, None))
        }

        Block::WhileBlock { condition, body, .. } => {
            Ok((
                emit_do_loop(sltc_par::LoopTest::Pre, Some(LoopPolarity::While), Some(condition), body, ctx, indent, temp)?,
                None,
            ))
        }

        Block::SelectBlock { subject, cases, .. } => Ok((emit_select(subject, cases, ctx, indent, temp)?, None)),

        Block::DimStatement { vars, .. } => Ok((emit_dim(vars, ctx, indent)?, None)),

        Block::ReDimStatement { vars, preserve, .. } => Ok((emit_redim(vars, *preserve, ctx, indent)?, None)),

        Block::OnErrorResumeNext { .. } => {
            let token_id = temp.next_id();
            let token_var = format!("errorToken{token_id}");
            let lines = vec![
                (indent, format!("var {token_var} = {}.GETERRORTRAPPINGTOKEN();", ctx.support_class_name)),
                (indent, format!("{}.STARTERRORTRAPPINGANDCLEARANYERROR({token_var});", ctx.support_class_name)),
            ];
            let mut scope = ctx.scope.clone();
            scope.error_token = Some(token_id);
            Ok((lines, Some(scope)))
        }

        Block::OnErrorGoto0 { .. } => {
            let lines = match ctx.scope.error_token {
                Some(token_id) => {
                    let token_var = format!("errorToken{token_id}");
                    vec![
                        (indent, format!("{}.STOPERRORTRAPPINGANDCLEARANYERROR({token_var});", ctx.support_class_name)),
                        (indent, format!("{}.RELEASEERRORTRAPPINGTOKEN({token_var});", ctx.support_class_name)),
                    ]
                }
                None => Vec::new(),
            };
            let mut scope = ctx.scope.clone();
            scope.error_token = None;
            Ok((lines, Some(scope)))
        }

        Block::CommentStatement { text, .. } => Ok((vec![(indent, format!("// {}", text.as_str()))], None)),

        Block::ExitStatement { kind, .. } => {
            let mut out = Vec::new();
            let leaves_procedure = matches!(
                kind,
                ExitKind::Sub | ExitKind::Function | ExitKind::Property
            );
            if leaves_procedure {
                if let Some(token_id) = ctx.scope.error_token {
                    let token_var = format!("errorToken{token_id}");
                    out.push((indent, format!("{}.RELEASEERRORTRAPPINGTOKEN({token_var});", ctx.support_class_name)));
                }
            }
            let text = match kind {
                ExitKind::Do | ExitKind::For => "break;",
                ExitKind::Sub | ExitKind::Function | ExitKind::Property => "return;",
            };
            out.push((indent, text.to_string()));
            Ok((out, None))
        }

        Block::SubBlock(sub) => Ok((emit_sub(sub, ctx, indent)?, None)),
        Block::FunctionBlock(func) => Ok((emit_function(func, ctx, indent)?, None)),
        Block::PropertyBlock(prop) => Ok((emit_property(prop, ctx, indent)?, None)),

        Block::ClassBlock(class) => {
            let mut out = vec![(indent, format!("class {}", (ctx.rewrite)(class.name.as_str())))];
            out.push((indent, "{".to_string()));
            let inner_scope = ScopeInfo {
                enclosing_class: Some(class.name),
                enclosing_callable: None,
                declared_names: Default::default(),
                error_token: None,
                byref_params: Default::default(),
            };
            let inner_ctx = TranslateCtx {
                support_class_name: ctx.support_class_name,
                rewrite: ctx.rewrite,
                scope: &inner_scope,
                signatures: ctx.signatures,
            };
            let mut inner_temp = TempCounter::new();
            out.extend(translate_block(&class.members, &inner_ctx, indent + 1, &mut inner_temp)?);
            out.push((indent, "}".to_string()));
            Ok((out, None))
        }

        Block::WithBlock { target, body, .. } => {
            let target_text = translate_expression(target, ctx)?;
            let with_name = temp.next("withTarget");
            let mut out = vec![(indent, format!("var {with_name} = {target_text};"))];
            out.extend(translate_block(body, ctx, indent, temp)?);
            Ok((out, None))
        }
    }
}

fn translate_assignment(
    target: &sltc_par::Expression,
    value: &sltc_par::Expression,
    kind: AssignKind,
    ctx: &TranslateCtx,
) -> Result<String> {
    let value_text = translate_expression(value, ctx)?;

    if let [Segment::Call { path, args, brackets_present: false }] = target.segments.as_slice() {
        if kind == AssignKind::Let && args.is_empty() && path.len() == 1 {
            let name = (ctx.rewrite)(path[0].as_str());
            return Ok(format!("{name} = {value_text};"));
        }
    }

    if let [Segment::Call { path, args, .. }] = target.segments.as_slice() {
        let (first, rest) = path.split_first().ok_or(crate::error::GenError::EmptyCallPath)?;
        let object_text = (ctx.rewrite)(first.as_str());
        let member_text = match rest.len() {
            0 => "null".to_string(),
            _ => format!("\"{}\"", rest.last().unwrap().as_str()),
        };
        let mut arg_texts = Vec::with_capacity(args.len());
        for arg in args {
            arg_texts.push(translate_expression(arg, ctx)?);
        }
        return Ok(format!(
            "{}.SET({value_text}, \"{object_text}\", {member_text}, [{}]);",
            ctx.support_class_name,
            arg_texts.join(", ")
        ));
    }

    Err(crate::error::GenError::MalformedExpression(target.segments.len()))
}

fn emit_dim(vars: &[DimVariable], ctx: &TranslateCtx, indent: usize) -> Result<Vec<Line>> {
    let mut out = Vec::with_capacity(vars.len());
    for var in vars {
        let name = (ctx.rewrite)(var.name.as_str());
        let text = match &var.dims {
            None => format!("object {name};"),
            Some(dims) if dims.is_empty() => format!("object[] {name} = {}.NEWARRAY(0);", ctx.support_class_name),
            Some(dims) => {
                let mut sizes = Vec::with_capacity(dims.len());
                for dim in dims {
                    sizes.push(translate_expression(dim, ctx)?);
                }
                format!("object[] {name} = {}.NEWARRAY({});", ctx.support_class_name, sizes.join(", "))
            }
        };
        out.push((indent, text));
    }
    Ok(out)
}

fn emit_redim(vars: &[DimVariable], preserve: bool, ctx: &TranslateCtx, indent: usize) -> Result<Vec<Line>> {
    let mut out = Vec::with_capacity(vars.len());
    for var in vars {
        let name = (ctx.rewrite)(var.name.as_str());
        let dims = var.dims.clone().unwrap_or_default();
        let mut sizes = Vec::with_capacity(dims.len());
        for dim in &dims {
            sizes.push(translate_expression(dim, ctx)?);
        }
        let text = format!(
            "{name} = {}.RESIZEARRAY({name}, [{}], {preserve});",
            ctx.support_class_name,
            sizes.join(", ")
        );
        out.push((indent, text));
    }
    Ok(out)
}

fn emit_do_loop(
    test: LoopTest,
    polarity: Option<LoopPolarity>,
    condition: Option<&sltc_par::Expression>,
    body: &[Block],
    ctx: &TranslateCtx,
    indent: usize,
    temp: &mut TempCounter,
) -> Result<Vec<Line>> {
    let mut out = vec![(indent, "while (true)".to_string())];
    out.push((indent, "{".to_string()));

    let check = condition
        .map(|cond| -> Result<Vec<Line>> {
            let (preamble, condition_text) = crate::cond::emit_condition(cond, ctx, indent + 1, temp)?;
            let negate = matches!(polarity, Some(LoopPolarity::While));
            let test_text = if negate {
                format!("!({condition_text})")
            } else {
                condition_text
            };
            let mut lines = preamble;
            lines.push((indent + 1, format!("if ({test_text}) {{ break; }}")));
            Ok(lines)
        })
        .transpose()?
        .unwrap_or_default();

    match test {
        LoopTest::Pre => {
            out.extend(check);
            out.extend(translate_block(body, ctx, indent + 1, temp)?);
        }
        LoopTest::Post => {
            out.extend(translate_block(body, ctx, indent + 1, temp)?);
            out.extend(check);
        }
        LoopTest::None => {
            out.extend(translate_block(body, ctx, indent + 1, temp)?);
        }
    }

    out.push((indent, "}".to_string()));
    Ok(out)
}

fn emit_select(
    subject: &sltc_par::Expression,
    cases: &[SelectCase],
    ctx: &TranslateCtx,
    indent: usize,
    temp: &mut TempCounter,
) -> Result<Vec<Line>> {
    let subject_name = temp.next("selectSubject");
    let subject_text = translate_expression(subject, ctx)?;
    let mut out = vec![(indent, format!("var {subject_name} = {subject_text};"))];

    let mut first = true;
    let mut else_case: Option<&SelectCase> = None;
    for case in cases {
        if case.values.is_empty() {
            else_case = Some(case);
            continue;
        }
        let mut comparisons = Vec::with_capacity(case.values.len());
        for value in &case.values {
            let value_text = translate_expression(value, ctx)?;
            comparisons.push(format!("{}.EQ({subject_name}, {value_text})", ctx.support_class_name));
        }
        let condition = comparisons
            .into_iter()
            .reduce(|acc, next| format!("{}.OR({acc}, {next})", ctx.support_class_name))
            .unwrap_or_else(|| "false".to_string());

        let keyword = if first { "if" } else { "else if" };
        out.push((indent, format!("{keyword} ({condition})")));
        out.push((indent, "{".to_string()));
        out.extend(translate_block(&case.body, ctx, indent + 1, temp)?);
        out.push((indent, "}".to_string()));
        first = false;
    }

    if let Some(case) = else_case {
        out.push((indent, "else".to_string()));
        out.push((indent, "{".to_string()));
        out.extend(translate_block(&case.body, ctx, indent + 1, temp)?);
        out.push((indent, "}".to_string()));
    }

    Ok(out)
}

fn emit_sub(sub: &SubBlock, ctx: &TranslateCtx, indent: usize) -> Result<Vec<Line>> {
    let name = (ctx.rewrite)(sub.name.as_str());
    let params = params_list(&sub.params, ctx.rewrite);
    let mut out = vec![(indent, format!("{}void {name}({params})", visibility_modifier(sub.visibility)))];
    out.push((indent, "{".to_string()));
    let inner_scope = ScopeInfo {
        enclosing_class: ctx.scope.enclosing_class,
        enclosing_callable: Some(sub.name),
        declared_names: Default::default(),
        error_token: None,
        byref_params: byref_param_names(&sub.params, ctx.rewrite),
    };
    let inner_ctx = TranslateCtx {
        support_class_name: ctx.support_class_name,
        rewrite: ctx.rewrite,
        scope: &inner_scope,
        signatures: ctx.signatures,
    };
    let mut inner_temp = TempCounter::new();
    let (body_lines, final_scope) = translate_block_with_final_scope(&sub.body, &inner_ctx, indent + 1, &mut inner_temp)?;
    out.extend(body_lines);
    release_trailing_error_token(&mut out, &final_scope, &inner_ctx, indent + 1);
    out.push((indent, "}".to_string()));
    Ok(out)
}

fn emit_function(func: &FunctionBlock, ctx: &TranslateCtx, indent: usize) -> Result<Vec<Line>> {
    let name = (ctx.rewrite)(func.name.as_str());
    let params = params_list(&func.params, ctx.rewrite);
    let mut out = vec![(indent, format!("{}object {name}({params})", visibility_modifier(func.visibility)))];
    out.push((indent, "{".to_string()));
    let inner_scope = ScopeInfo {
        enclosing_class: ctx.scope.enclosing_class,
        enclosing_callable: Some(func.name),
        declared_names: Default::default(),
        error_token: None,
        byref_params: byref_param_names(&func.params, ctx.rewrite),
    };
    let inner_ctx = TranslateCtx {
        support_class_name: ctx.support_class_name,
        rewrite: ctx.rewrite,
        scope: &inner_scope,
        signatures: ctx.signatures,
    };
    let mut inner_temp = TempCounter::new();
    let (body_lines, final_scope) = translate_block_with_final_scope(&func.body, &inner_ctx, indent + 1, &mut inner_temp)?;
    out.extend(body_lines);
    release_trailing_error_token(&mut out, &final_scope, &inner_ctx, indent + 1);
    out.push((indent, format!("return {name};")));
    out.push((indent, "}".to_string()));
    Ok(out)
}

fn emit_property(prop: &PropertyBlock, ctx: &TranslateCtx, indent: usize) -> Result<Vec<Line>> {
    let base_name = (ctx.rewrite)(prop.name.as_str());
    let (prefix, return_type) = match prop.kind {
        PropertyKind::Get => ("get_", "object"),
        PropertyKind::Let | PropertyKind::Set => ("set_", "void"),
    };
    let name = format!("{prefix}{base_name}");
    let params = params_list(&prop.params, ctx.rewrite);
    let mut out = vec![(
        indent,
        format!("{}{return_type} {name}({params})", visibility_modifier(prop.visibility)),
    )];
    out.push((indent, "{".to_string()));
    let inner_scope = ScopeInfo {
        enclosing_class: ctx.scope.enclosing_class,
        enclosing_callable: Some(prop.name),
        declared_names: Default::default(),
        error_token: None,
        byref_params: byref_param_names(&prop.params, ctx.rewrite),
    };
    let inner_ctx = TranslateCtx {
        support_class_name: ctx.support_class_name,
        rewrite: ctx.rewrite,
        scope: &inner_scope,
        signatures: ctx.signatures,
    };
    let mut inner_temp = TempCounter::new();
    let (body_lines, final_scope) = translate_block_with_final_scope(&prop.body, &inner_ctx, indent + 1, &mut inner_temp)?;
    out.extend(body_lines);
    release_trailing_error_token(&mut out, &final_scope, &inner_ctx, indent + 1);
    if matches!(prop.kind, PropertyKind::Get) {
        out.push((indent, format!("return {base_name};")));
    }
    out.push((indent, "}".to_string()));
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sltc_lex::lex;
    use sltc_par::parse_blocks;
    use sltc_util::Handler;

    fn lower(s: &str) -> String {
        s.to_ascii_lowercase()
    }

    fn parse(src: &str) -> Vec<Block> {
        let mut handler = Handler::new();
        let tokens = lex(src, &mut handler).expect("lex ok");
        parse_blocks(tokens, &mut handler).expect("parse ok")
    }

    fn render(src: &str) -> Vec<String> {
        let blocks = parse(src);
        let translator = Translator::new(&blocks, "support", &lower);
        translator
            .translate_unit(&blocks)
            .expect("translate ok")
            .into_iter()
            .map(|(_, text)| text)
            .collect()
    }

    #[test]
    fn plain_assignment_renders_as_direct_assign() {
        let lines = render("x = 1");
        assert_eq!(lines, vec!["x = 1;"]);
    }

    #[test]
    fn set_assignment_routes_through_support_set() {
        let lines = render("Set x = y");
        assert_eq!(lines, vec!["support.SET(y, \"x\", null, []);"]);
    }

    #[test]
    fn dim_without_dims_is_a_plain_local() {
        let lines = render("Dim x");
        assert_eq!(lines, vec!["object x;"]);
    }

    #[test]
    fn bare_sub_call_statement_renders_as_expression_statement() {
        let lines = render("Foo 1");
        assert_eq!(lines, vec!["foo(1);"]);
    }

    #[test]
    fn exit_do_renders_as_break() {
        let lines = render("Do\nExit Do\nLoop");
        assert!(lines.iter().any(|l| l == "break;"));
    }

    #[test]
    fn sub_definition_renders_header_and_body() {
        let lines = render("Sub Greet(ByRef name)\n  x = 1\nEnd Sub");
        assert_eq!(lines[0], "public void greet(ref object name)");
        assert_eq!(lines[1], "{");
        assert!(lines.contains(&"x = 1;".to_string()));
        assert_eq!(lines.last().unwrap(), "}");
    }

    #[test]
    fn function_definition_returns_its_own_name() {
        let lines = render("Function Double(ByVal n)\n  Double = n\nEnd Function");
        assert_eq!(lines[0], "public object double(object n)");
        assert!(lines.contains(&"return double;".to_string()));
    }

    #[test]
    fn on_error_resume_next_emits_token_acquisition() {
        let lines = render("On Error Resume Next\nx = 1");
        assert!(lines[0].contains("GETERRORTRAPPINGTOKEN"));
        assert!(lines[1].contains("STARTERRORTRAPPINGANDCLEARANYERROR"));
    }

    #[test]
    fn sub_falling_off_the_end_with_an_active_trap_releases_its_token() {
        let lines = render("Sub Greet()\nOn Error Resume Next\nx = 1\nEnd Sub");
        assert!(lines.iter().any(|l| l.contains("RELEASEERRORTRAPPINGTOKEN")));
    }

    #[test]
    fn exit_sub_with_an_active_trap_releases_its_token_before_returning() {
        let lines = render("Sub Greet()\nOn Error Resume Next\nExit Sub\nEnd Sub");
        let exit_idx = lines.iter().position(|l| l == "return;").expect("return; present");
        assert!(lines[..exit_idx].iter().any(|l| l.contains("RELEASEERRORTRAPPINGTOKEN")));
    }

    #[test]
    fn exit_sub_without_an_active_trap_emits_no_release() {
        let lines = render("Sub Greet()\nExit Sub\nEnd Sub");
        assert!(!lines.iter().any(|l| l.contains("RELEASEERRORTRAPPINGTOKEN")));
    }

    #[test]
    fn on_error_goto0_already_releases_so_falling_off_the_end_does_not_double_release() {
        let lines = render("Sub Greet()\nOn Error Resume Next\nOn Error Goto 0\nx = 1\nEnd Sub");
        let release_count = lines.iter().filter(|l| l.contains("RELEASEERRORTRAPPINGTOKEN")).count();
        assert_eq!(release_count, 1);
    }
}
