//! Edge case tests for sltc-par

#[cfg(test)]
mod tests {
    use crate::{parse_blocks, Block, Op, Segment};
    use sltc_lex::{lex, OperatorSymbol};
    use sltc_util::Handler;

    fn parse(source: &str) -> Vec<Block> {
        let mut handler = Handler::new();
        let tokens = lex(source, &mut handler).expect("lex ok");
        parse_blocks(tokens, &mut handler).expect("parse ok")
    }

    #[test]
    fn test_edge_empty_source_has_no_blocks() {
        assert!(parse("").is_empty());
    }

    #[test]
    fn test_edge_single_line_if_without_block() {
        let blocks = parse("If x > 0 Then y = 1");
        match &blocks[0] {
            Block::IfBlock {
                clauses, else_body, ..
            } => {
                assert_eq!(clauses.len(), 1);
                assert!(else_body.is_none());
            }
            other => panic!("expected if block, got {other:?}"),
        }
    }

    #[test]
    fn test_edge_single_line_if_with_else() {
        let blocks = parse("If x Then y = 1 Else y = 2");
        match &blocks[0] {
            Block::IfBlock { else_body, .. } => assert!(else_body.is_some()),
            other => panic!("expected if block, got {other:?}"),
        }
    }

    #[test]
    fn test_edge_if_elseif_else_chain() {
        let blocks = parse("If a Then\nx = 1\nElseIf b Then\nx = 2\nElse\nx = 3\nEnd If");
        match &blocks[0] {
            Block::IfBlock {
                clauses, else_body, ..
            } => {
                assert_eq!(clauses.len(), 2);
                assert!(else_body.is_some());
            }
            other => panic!("expected if block, got {other:?}"),
        }
    }

    #[test]
    fn test_edge_nested_if() {
        let blocks = parse("If a Then\nIf b Then\nx = 1\nEnd If\nEnd If");
        match &blocks[0] {
            Block::IfBlock { clauses, .. } => {
                assert_eq!(clauses[0].body.len(), 1);
                assert!(matches!(clauses[0].body[0], Block::IfBlock { .. }));
            }
            other => panic!("expected if block, got {other:?}"),
        }
    }

    #[test]
    fn test_edge_for_each_loop() {
        let blocks = parse("For Each item In collection\nx = item\nNext");
        assert!(matches!(blocks[0], Block::ForEachBlock { .. }));
    }

    #[test]
    fn test_edge_for_loop_with_step() {
        let blocks = parse("For i = 10 To 1 Step -1\nNext");
        match &blocks[0] {
            Block::ForBlock { step, .. } => assert!(step.is_some()),
            other => panic!("expected for block, got {other:?}"),
        }
    }

    #[test]
    fn test_edge_do_while_pretest() {
        let blocks = parse("Do While x < 10\nx = x + 1\nLoop");
        match &blocks[0] {
            Block::DoBlock { test, .. } => assert_eq!(*test, crate::LoopTest::Pre),
            other => panic!("expected do block, got {other:?}"),
        }
    }

    #[test]
    fn test_edge_do_loop_until_posttest() {
        let blocks = parse("Do\nx = x + 1\nLoop Until x >= 10");
        match &blocks[0] {
            Block::DoBlock { test, .. } => assert_eq!(*test, crate::LoopTest::Post),
            other => panic!("expected do block, got {other:?}"),
        }
    }

    #[test]
    fn test_edge_select_case_else() {
        let blocks = parse("Select Case x\nCase 1\ny = 1\nCase Else\ny = 2\nEnd Select");
        match &blocks[0] {
            Block::SelectBlock { cases, .. } => {
                assert_eq!(cases.len(), 2);
                assert!(cases[1].values.is_empty());
            }
            other => panic!("expected select block, got {other:?}"),
        }
    }

    #[test]
    fn test_edge_select_case_multiple_values() {
        let blocks = parse("Select Case x\nCase 1, 2, 3\ny = 1\nEnd Select");
        match &blocks[0] {
            Block::SelectBlock { cases, .. } => assert_eq!(cases[0].values.len(), 3),
            other => panic!("expected select block, got {other:?}"),
        }
    }

    #[test]
    fn test_edge_array_dim_with_dimensions() {
        let blocks = parse("Dim arr(10, 20)");
        match &blocks[0] {
            Block::DimStatement { vars, .. } => {
                assert_eq!(vars[0].dims.as_ref().unwrap().len(), 2)
            }
            other => panic!("expected dim statement, got {other:?}"),
        }
    }

    #[test]
    fn test_edge_redim_preserve() {
        let blocks = parse("ReDim Preserve arr(20)");
        match &blocks[0] {
            Block::ReDimStatement { preserve, .. } => assert!(*preserve),
            other => panic!("expected redim statement, got {other:?}"),
        }
    }

    #[test]
    fn test_edge_multiple_dim_vars_comma_separated() {
        let blocks = parse("Dim a, b, c");
        match &blocks[0] {
            Block::DimStatement { vars, .. } => assert_eq!(vars.len(), 3),
            other => panic!("expected dim statement, got {other:?}"),
        }
    }

    #[test]
    fn test_edge_call_with_dotted_path_and_no_parens() {
        let blocks = parse("x = Foo.Bar.Baz");
        match &blocks[0] {
            Block::ValueSettingStatement { value, .. } => {
                let expr = crate::parse_expression(value, 1).unwrap();
                match &expr.segments[0] {
                    Segment::Call { path, .. } => assert_eq!(path.len(), 3),
                    other => panic!("expected call segment, got {other:?}"),
                }
            }
            other => panic!("expected value setting statement, got {other:?}"),
        }
    }

    #[test]
    fn test_edge_full_precedence_ladder_nests_correctly() {
        // `1 + 2 * 3` must bind as `1 + (2 * 3)`, not `(1 + 2) * 3`.
        let e = crate::parse_expression(
            &sltc_lex::lex("1 + 2 * 3", &mut Handler::new())
                .unwrap()
                .into_iter()
                .map(|t| t.token)
                .collect::<Vec<_>>(),
            1,
        )
        .unwrap();
        assert_eq!(e.segments.len(), 3);
        assert_eq!(e.segments[1], Segment::Operation(Op::Symbol(OperatorSymbol::Plus)));
        match &e.segments[2] {
            Segment::Bracketed(inner) => assert_eq!(inner.segments.len(), 3),
            other => panic!("expected bracketed right operand, got {other:?}"),
        }
    }

    #[test]
    fn test_edge_with_block_inside_sub() {
        let blocks = parse("Sub Foo\nWith Bar\nx = 1\nEnd With\nEnd Sub");
        match &blocks[0] {
            Block::SubBlock(s) => assert!(matches!(s.body[0], Block::WithBlock { .. })),
            other => panic!("expected sub block, got {other:?}"),
        }
    }

    #[test]
    fn test_edge_comment_alone_is_comment_statement() {
        let blocks = parse("' just a comment");
        assert!(matches!(blocks[0], Block::CommentStatement { .. }));
    }
}
