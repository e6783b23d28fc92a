#[cfg(test)]
mod node_tests {
    use quill_ast::{
        AstError, AstNode, ConstValue, Location, Node, NodeKind, Token, TypeExpr,
        nodes::{
            AwaitExpr, BlockStatement, BooleanLiteral, CommaExpr, EmptyStatement, FloatLiteral,
            GroupExpr, IdentifierExpr, InOfExpr, IntegerLiteral, ListLiteral, ListType,
            NamedType, NullLiteral, NullableType, SpreadExpr, StringInterpolation, StringLiteral,
        },
    };

    use crate::utils::{ident, span, var};

    fn one_of_each() -> Vec<Node> {
        vec![
            EmptyStatement::new(span(0, 1)).into(),
            BlockStatement::new(vec![EmptyStatement::new(span(2, 1)).into()], span(1, 3)).into(),
            var("v", 4, Some(IntegerLiteral::new(3, span(10, 1)).into())),
            NullLiteral::new(span(12, 4)).into(),
            BooleanLiteral::new(true, span(17, 4)).into(),
            IntegerLiteral::new(42, span(22, 2)).into(),
            FloatLiteral::new(1.5, span(25, 3)).into(),
            StringLiteral::new("s", span(29, 3)).into(),
            StringInterpolation::new(
                vec![
                    StringLiteral::new("a", span(34, 1)).into(),
                    ident("b", 37).into(),
                ],
                span(33, 6),
            )
            .into(),
            ident("c", 40).into(),
            SpreadExpr::new(ident("d", 45).into(), span(42, 4)).into(),
            CommaExpr::new(vec![ident("e", 47).into(), ident("f", 50).into()], span(47, 4)).into(),
            ListLiteral::new(vec![ident("g", 53).into()], span(52, 3)).into(),
            InOfExpr::new(ident("h", 56).into(), ident("i", 61).into(), true, span(56, 6)).into(),
            GroupExpr::new(ident("j", 64).into(), span(63, 3)).into(),
            AwaitExpr::new(ident("k", 73).into(), span(67, 7)).into(),
            TypeExpr::from(NamedType::new("Int", None, true, span(75, 3))).into(),
            TypeExpr::from(ListType::new(
                NamedType::new("Int", None, true, span(80, 3)).into(),
                span(79, 5),
            ))
            .into(),
            TypeExpr::from(NullableType::new(
                NamedType::new("Str", Some("core".to_string()), false, span(85, 8)).into(),
                span(85, 9),
            ))
            .into(),
        ]
    }

    #[test]
    fn test_end_is_offset_plus_length() {
        for node in one_of_each() {
            let location = node.location();
            assert_eq!(location.end(), location.offset + location.length, "{}", node.kind());
        }
    }

    #[test]
    fn test_expression_is_the_negation_of_statement() {
        for node in one_of_each() {
            assert_eq!(node.is_expression(), !node.is_statement(), "{}", node.kind());
        }
    }

    #[test]
    fn test_statement_kinds() {
        let statements: Vec<NodeKind> = one_of_each()
            .iter()
            .filter(|node| node.is_statement())
            .map(AstNode::kind)
            .collect();
        assert_eq!(
            statements,
            vec![NodeKind::Empty, NodeKind::Block, NodeKind::VarDecl]
        );
        let blocks = one_of_each().iter().filter(|node| node.is_block()).count();
        assert_eq!(blocks, 1);
    }

    #[test]
    fn test_only_literals_are_const_values() {
        for node in one_of_each() {
            assert_eq!(
                node.is_const_value(),
                node.kind().is_literal(),
                "{}",
                node.kind()
            );
        }
    }

    #[test]
    fn test_literal_values() {
        let values: Vec<ConstValue> = one_of_each()
            .iter()
            .filter_map(AstNode::const_value)
            .collect();
        assert_eq!(
            values,
            vec![
                ConstValue::Null,
                ConstValue::Boolean(true),
                ConstValue::Integer(42),
                ConstValue::Float(1.5),
                ConstValue::String("s".to_string()),
            ]
        );
    }

    #[test]
    fn test_identifier_from_token_keeps_span() {
        let location = Location::new(7, 13, 120, 9);
        let token = Token::new("someValue", location);
        let identifier = IdentifierExpr::from_token(&token, false, true);
        assert_eq!(identifier.name, "someValue");
        assert_eq!(identifier.location.line, 7);
        assert_eq!(identifier.location.column, 13);
        assert_eq!(identifier.location.offset, 120);
        assert_eq!(identifier.location.length, 9);
        assert!(!identifier.is_bound());
    }

    #[test]
    fn test_comma_await_flag_folds_elements() {
        let awaited = || -> Node { AwaitExpr::new(ident("p", 6).into(), span(0, 7)).into() };
        let plain = |offset| -> Node { ident("q", offset).into() };

        let with_await = CommaExpr::new(vec![plain(0), awaited(), plain(9)], span(0, 10));
        assert!(with_await.is_await());

        let without = CommaExpr::new(vec![plain(0), plain(3)], span(0, 4));
        assert!(!without.is_await());
    }

    #[test]
    fn test_await_flag_propagates_through_wrappers() {
        let awaited: Node = AwaitExpr::new(ident("p", 6).into(), span(0, 7)).into();
        let group: Node = GroupExpr::new(awaited, span(0, 9)).into();
        let spread: Node = SpreadExpr::new(group, span(0, 12)).into();
        let list = ListLiteral::new(vec![spread], span(0, 14));
        assert!(list.is_await());

        let in_of = InOfExpr::new(
            ident("x", 0).into(),
            AwaitExpr::new(ident("y", 11).into(), span(5, 7)).into(),
            false,
            span(0, 12),
        );
        assert!(in_of.is_await());

        let block = BlockStatement::new(vec![var("z", 0, Some(in_of.into()))], span(0, 20));
        assert!(block.is_await());
    }

    #[test]
    fn test_type_locality_comes_from_the_named_type() {
        let local: TypeExpr = NamedType::new("Point", None, true, span(0, 5)).into();
        let external: TypeExpr =
            NamedType::new("Map", Some("std".to_string()), false, span(0, 8)).into();
        let list: TypeExpr = ListType::new(external, span(0, 10)).into();
        let nullable: TypeExpr = NullableType::new(local.clone(), span(0, 6)).into();
        assert!(local.is_local());
        assert!(!list.is_local());
        assert!(nullable.is_local());
    }

    #[test]
    fn test_malformed_integer_token() {
        let token = Token::new("12ab", span(0, 4));
        let error = IntegerLiteral::from_token(&token).unwrap_err();
        assert_eq!(
            error,
            AstError::InvalidLiteral {
                kind: "integer",
                lexeme: "12ab".to_string(),
                location: span(0, 4),
            }
        );
    }

    #[test]
    fn test_hex_and_separators() {
        let hex = IntegerLiteral::from_token(&Token::new("0xFF", span(0, 4))).unwrap();
        let grouped = IntegerLiteral::from_token(&Token::new("1_000", span(0, 5))).unwrap();
        assert_eq!(hex.value, 255);
        assert_eq!(grouped.value, 1000);
    }
}
