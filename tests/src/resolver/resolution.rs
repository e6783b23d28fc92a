#[cfg(test)]
mod resolution_tests {
    use quill_ast::{
        AstNode, BindingState, NamespaceRef, Node, SpanCollector,
        nodes::{BlockStatement, ListLiteral},
    };
    use quill_resolver::{BUILTIN_PATH, ResolverBuilder, ResolverConfig, resolve};

    use crate::utils::{export, ident, identifier, import, messages, module, program, span, var};

    #[test]
    fn test_identifier_is_bound_after_resolution_and_stays_bound() {
        let mut compilation = program(vec![module(
            "main.ql",
            vec![],
            vec![var("a", 0, None), ident("a", 10).into()],
        )]);
        let before = SpanCollector::collect(&compilation);
        assert!(!identifier(&compilation.unit("main.ql").unwrap().nodes()[1]).is_bound());

        let report = resolve(&mut compilation).unwrap();
        assert!(report.is_clean());
        assert_eq!(report.bound, 2);

        let after = SpanCollector::collect(&compilation);
        assert_eq!(before, after);

        let main = compilation.unit("main.ql").unwrap();
        let use_site = identifier(&main.nodes()[1]);
        let BindingState::Bound(binding) = use_site.binding_state() else {
            panic!("`a` should be bound");
        };
        assert_eq!(binding.namespace, NamespaceRef::Module("main.ql".to_string()));
        assert_eq!(binding.declaration.location, span(4, 1));
        assert!(main.is_resolved());
    }

    #[test]
    fn test_imports_bind_to_the_exporting_module() {
        let main = module(
            "main.ql",
            vec![import("lib.ql", &[("helper", 8)])],
            vec![ident("helper", 30).into()],
        );
        let lib = module(
            "lib.ql",
            vec![export(&[("helper", 7)])],
            vec![var("helper", 20, None)],
        );
        let mut compilation = program(vec![main, lib]);
        let report = resolve(&mut compilation).unwrap();
        assert!(report.is_clean(), "{:?}", messages(compilation.diagnostics()));
        assert_eq!(report.resolved_units, vec!["main.ql", "lib.ql"]);

        let main = compilation.unit("main.ql").unwrap();
        let use_site = identifier(&main.nodes()[0]);
        let declaration = use_site.declaration().unwrap();
        assert_eq!(declaration.path, "lib.ql");
        assert_eq!(declaration.location, span(24, 6));
        assert_eq!(
            use_site.namespace(),
            Some(&NamespaceRef::Module("lib.ql".to_string()))
        );
    }

    #[test]
    fn test_unknown_identifier_leaves_unit_unresolved() {
        let mut compilation = program(vec![module(
            "main.ql",
            vec![],
            vec![ident("missing", 3).into()],
        )]);
        let report = resolve(&mut compilation).unwrap();
        assert_eq!(report.unresolved, 1);
        assert_eq!(report.unresolved_units, vec!["main.ql"]);

        let main = compilation.unit("main.ql").unwrap();
        assert!(!main.is_resolved());
        assert!(!identifier(&main.nodes()[0]).is_bound());
        assert_eq!(
            messages(main.diagnostics()),
            vec!["1:4: error: unknown identifier `missing`"]
        );
    }

    #[test]
    fn test_declared_and_imported_name_is_ambiguous() {
        let main = module(
            "main.ql",
            vec![import("lib.ql", &[("x", 8)])],
            vec![var("x", 20, None), ident("x", 40).into()],
        );
        let lib = module("lib.ql", vec![export(&[("x", 7)])], vec![var("x", 10, None)]);
        let mut compilation = program(vec![main, lib]);
        resolve(&mut compilation).unwrap();

        let main = compilation.unit("main.ql").unwrap();
        assert_eq!(
            messages(main.diagnostics()),
            vec!["1:41: error: identifier `x` is ambiguous: declared in this module and `lib.ql`"]
        );
        assert!(!identifier(&main.nodes()[1]).is_bound());
        assert!(compilation.unit("lib.ql").unwrap().is_resolved());
    }

    #[test]
    fn test_name_imported_from_two_modules_is_ambiguous() {
        let main = module(
            "main.ql",
            vec![import("a.ql", &[("x", 8)]), import("b.ql", &[("x", 18)])],
            vec![ident("x", 40).into()],
        );
        let a = module("a.ql", vec![export(&[("x", 7)])], vec![var("x", 10, None)]);
        let b = module("b.ql", vec![export(&[("x", 7)])], vec![var("x", 10, None)]);
        let mut compilation = program(vec![main, a, b]);
        let report = resolve(&mut compilation).unwrap();
        assert_eq!(report.unresolved_units, vec!["main.ql"]);
        assert!(
            messages(compilation.unit("main.ql").unwrap().diagnostics())[0]
                .contains("declared in `a.ql` and `b.ql`")
        );
    }

    #[test]
    fn test_self_referencing_initializer_is_circular() {
        let mut compilation = program(vec![module(
            "main.ql",
            vec![],
            vec![var("n", 0, Some(ident("n", 8).into()))],
        )]);
        resolve(&mut compilation).unwrap();
        let main = compilation.unit("main.ql").unwrap();
        assert_eq!(
            messages(main.diagnostics()),
            vec!["1:9: error: `n` refers to itself in its own initializer"]
        );
        assert!(identifier(&main.nodes()[0]).is_bound());
    }

    #[test]
    fn test_unexported_name_is_reported_on_the_importer() {
        let main = module("main.ql", vec![import("lib.ql", &[("hidden", 8)])], vec![]);
        let lib = module("lib.ql", vec![], vec![var("hidden", 0, None)]);
        let mut compilation = program(vec![main, lib]);
        let report = resolve(&mut compilation).unwrap();
        assert_eq!(report.unresolved_units, vec!["main.ql"]);
        assert_eq!(
            messages(compilation.unit("main.ql").unwrap().diagnostics()),
            vec!["1:9: error: `hidden` is not exported by `lib.ql`"]
        );
    }

    #[test]
    fn test_unknown_module_is_a_whole_program_diagnostic() {
        let main = module("main.ql", vec![import("gone.ql", &[("x", 8)])], vec![]);
        let mut compilation = program(vec![main]);
        let report = resolve(&mut compilation).unwrap();
        assert_eq!(report.unresolved, 1);
        assert!(compilation.unit("main.ql").unwrap().diagnostics().is_empty());
        assert!(!compilation.unit("main.ql").unwrap().is_resolved());
        assert_eq!(
            messages(compilation.diagnostics()),
            vec!["1:1: error: module `gone.ql` imported by `main.ql` is not part of the program"]
        );
    }

    #[test]
    fn test_missing_entry_is_reported() {
        let mut compilation = quill_ast::AstCompilation::new("app.ql", quill_ast::ResourceKind::Module);
        compilation.insert(module("main.ql", vec![], vec![])).unwrap();
        let report = resolve(&mut compilation).unwrap();
        assert_eq!(report.resolved_units, vec!["main.ql"]);
        assert!(compilation.has_errors());
        assert!(messages(compilation.diagnostics())[0].contains("app.ql"));

        resolve(&mut compilation).unwrap();
        assert_eq!(compilation.diagnostics().len(), 1);
    }

    #[test]
    fn test_builtins_come_from_config() {
        let build = || program(vec![module("main.ql", vec![], vec![ident("print", 0).into()])]);

        let mut without = build();
        assert_eq!(resolve(&mut without).unwrap().unresolved, 1);

        let mut with = build();
        let config = ResolverConfig::from_toml_str(r#"builtins = ["print"]"#).unwrap();
        let report = ResolverBuilder::new()
            .with_config(config)
            .resolve(&mut with)
            .unwrap()
            .report();
        assert!(report.is_clean());
        let declaration = identifier(&with.unit("main.ql").unwrap().nodes()[0])
            .declaration()
            .unwrap();
        assert_eq!(declaration.path, BUILTIN_PATH);
    }

    #[test]
    fn test_stop_at_first_unresolved_prunes_the_unit() {
        let nodes = || -> Vec<Node> {
            vec![
                ListLiteral::new(
                    vec![ident("a", 1).into(), ident("b", 4).into(), ident("c", 7).into()],
                    span(0, 9),
                )
                .into(),
            ]
        };

        let mut full = program(vec![module("main.ql", vec![], nodes())]);
        resolve(&mut full).unwrap();
        assert_eq!(full.unit("main.ql").unwrap().diagnostics().len(), 3);

        let mut pruned = program(vec![module("main.ql", vec![], nodes())]);
        let config = ResolverConfig::default().stop_at_first_unresolved(true);
        let report = ResolverBuilder::new()
            .with_config(config)
            .resolve(&mut pruned)
            .unwrap()
            .report();
        assert_eq!(report.unresolved, 1);
        assert_eq!(
            messages(pruned.unit("main.ql").unwrap().diagnostics()),
            vec!["1:2: error: unknown identifier `a`"]
        );
    }

    #[test]
    fn test_diagnostic_cap_counts_every_failure() {
        let names: Vec<Node> = (0..5).map(|i| ident("nope", i * 10).into()).collect();
        let mut compilation = program(vec![module("main.ql", vec![], names)]);
        let config = ResolverConfig::default().max_diagnostics_per_unit(2);
        let report = ResolverBuilder::new()
            .with_config(config)
            .resolve(&mut compilation)
            .unwrap()
            .report();
        assert_eq!(report.unresolved, 5);
        assert_eq!(compilation.unit("main.ql").unwrap().diagnostics().len(), 2);
    }

    #[test]
    fn test_block_locals_do_not_leak() {
        let block: Node = BlockStatement::new(vec![var("tmp", 2, None)], span(0, 12)).into();
        let mut compilation = program(vec![module(
            "main.ql",
            vec![],
            vec![block, ident("tmp", 20).into()],
        )]);
        let report = resolve(&mut compilation).unwrap();
        assert_eq!(report.bound, 1);
        assert_eq!(report.unresolved, 1);
        let main = compilation.unit("main.ql").unwrap();
        assert_eq!(main.nodes()[0].kind(), quill_ast::NodeKind::Block);
        assert!(!identifier(&main.nodes()[1]).is_bound());
    }

    #[test]
    fn test_resolved_units_are_skipped_on_a_second_pass() {
        let mut compilation = program(vec![
            module("main.ql", vec![], vec![ident("later", 0).into()]),
            module("ok.ql", vec![], vec![var("v", 0, None)]),
        ]);
        let first = resolve(&mut compilation).unwrap();
        assert_eq!(first.resolved_units, vec!["ok.ql"]);
        assert_eq!(first.unresolved_units, vec!["main.ql"]);

        let second = resolve(&mut compilation).unwrap();
        assert_eq!(second.bound, 0);
        assert_eq!(second.unresolved, 1);
        assert_eq!(second.resolved_units, vec!["ok.ql"]);
        assert_eq!(
            messages(compilation.unit("main.ql").unwrap().diagnostics()),
            vec!["1:1: error: unknown identifier `later`"]
        );
    }

    #[test]
    fn test_second_pass_walks_initializers_of_bound_declarations() {
        let mut compilation = program(vec![module(
            "main.ql",
            vec![],
            vec![var("y", 0, Some(ident("z", 8).into()))],
        )]);
        let first = resolve(&mut compilation).unwrap();
        assert_eq!(first.bound, 1);
        assert_eq!(first.unresolved_units, vec!["main.ql"]);

        let again = resolve(&mut compilation).unwrap();
        assert_eq!(again.unresolved, 1);
        assert!(!compilation.unit("main.ql").unwrap().is_resolved());

        let config = ResolverConfig::default().with_builtins(["z"]);
        let last = ResolverBuilder::new()
            .with_config(config)
            .resolve(&mut compilation)
            .unwrap()
            .report();
        assert_eq!(last.bound, 1);
        assert_eq!(last.resolved_units, vec!["main.ql"]);

        let main = compilation.unit("main.ql").unwrap();
        let Node::VarDecl(decl) = &main.nodes()[0] else {
            panic!("expected a declaration");
        };
        assert!(identifier(decl.initializer.as_ref().unwrap()).is_bound());
    }

    #[test]
    fn test_second_pass_sees_locals_bound_earlier() {
        let block: Node = BlockStatement::new(
            vec![var("t", 2, None), ident("z", 12).into(), ident("t", 15).into()],
            span(0, 17),
        )
        .into();
        let mut compilation = program(vec![module("main.ql", vec![], vec![block])]);
        let pruning = ResolverConfig::default().stop_at_first_unresolved(true);
        let first = ResolverBuilder::new()
            .with_config(pruning)
            .resolve(&mut compilation)
            .unwrap()
            .report();
        assert_eq!(first.bound, 1);

        let config = ResolverConfig::default().with_builtins(["z"]);
        let second = ResolverBuilder::new()
            .with_config(config)
            .resolve(&mut compilation)
            .unwrap()
            .report();
        assert_eq!(second.bound, 2);
        assert_eq!(second.resolved_units, vec!["main.ql"]);

        let main = compilation.unit("main.ql").unwrap();
        let Node::Block(block) = &main.nodes()[0] else {
            panic!("expected a block");
        };
        assert!(matches!(
            identifier(&block.body[2]).namespace(),
            Some(NamespaceRef::Scope(_))
        ));
    }
}
