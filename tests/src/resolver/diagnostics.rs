#[cfg(test)]
mod diagnostics_tests {
    use quill_ast::{Diagnostic, Location, Severity};
    use quill_resolver::{ResolveError, ResolveErrorKind, resolve};

    use crate::utils::{ident, messages, module, program, var};

    #[test]
    fn test_resolve_error_converts_to_diagnostic() {
        let error = ResolveError::new(
            ResolveErrorKind::CircularReference {
                name: "n".to_string(),
            },
            Location::new(3, 5, 40, 1),
        );
        assert_eq!(error.to_string(), "3:5: `n` refers to itself in its own initializer");
        let diagnostic = Diagnostic::from(error);
        assert_eq!(diagnostic.severity, Severity::Error);
        assert_eq!(diagnostic.location, Some(Location::new(3, 5, 40, 1)));
    }

    #[test]
    fn test_duplicate_top_level_declaration() {
        let mut compilation = program(vec![module(
            "main.ql",
            vec![],
            vec![var("a", 0, None), var("a", 10, None)],
        )]);
        let report = resolve(&mut compilation).unwrap();
        assert_eq!(report.bound, 1);
        assert_eq!(report.unresolved, 1);
        assert_eq!(
            messages(compilation.unit("main.ql").unwrap().diagnostics()),
            vec!["1:15: error: `a` is already declared in this scope at 1:5"]
        );
    }

    #[test]
    fn test_failures_are_recorded_in_source_order() {
        let mut compilation = program(vec![module(
            "main.ql",
            vec![],
            vec![
                ident("first", 0).into(),
                var("x", 20, None),
                var("x", 40, None),
                ident("second", 60).into(),
            ],
        )]);
        resolve(&mut compilation).unwrap();
        let unit = compilation.unit("main.ql").unwrap();
        let names: Vec<&str> = unit
            .diagnostics()
            .iter()
            .map(|diagnostic| diagnostic.message.as_str())
            .collect();
        assert_eq!(
            names,
            vec![
                "unknown identifier `first`",
                "`x` is already declared in this scope at 1:25",
                "unknown identifier `second`",
            ]
        );
        assert!(compilation.has_errors());
        assert_eq!(compilation.all_diagnostics().count(), 3);
    }
}
