#[cfg(test)]
mod annotation_tests {
    use quill_ast::{Annotation, AstError, AstNode, Comment, Node, nodes::StringLiteral};

    use crate::utils::{span, var};

    #[test]
    fn test_documentation_skips_blank_lines_and_plain_comments() {
        let mut node = var("answer", 40, None);
        let annotations = node.annotations_mut();
        annotations.push_preceding(Comment::doc("a", span(0, 5)));
        annotations.push_preceding(Annotation::blank_line(span(6, 1)));
        annotations.push_preceding(Comment::new("b", span(8, 4)));
        annotations.push_preceding(Comment::doc("c", span(13, 5)));
        assert_eq!(node.documentation(), "a\nc\n");
    }

    #[test]
    fn test_documentation_is_recomputed_on_every_call() {
        let mut node: Node = StringLiteral::new("x", span(20, 3)).into();
        assert_eq!(node.documentation(), "");
        node.annotations_mut()
            .push_preceding(Comment::doc("first", span(0, 9)));
        assert_eq!(node.documentation(), "first\n");
        node.annotations_mut()
            .push_preceding(Comment::doc("second", span(10, 9)));
        assert_eq!(node.documentation(), "first\nsecond\n");
    }

    #[test]
    fn test_trailing_slots_fill_once() {
        let mut node: Node = StringLiteral::new("x", span(0, 3)).into();
        let annotations = node.annotations_mut();
        annotations
            .set_trailing(Comment::new("one", span(4, 6)).trailing())
            .unwrap();
        let error = annotations
            .set_trailing(Comment::new("two", span(11, 6)).trailing())
            .unwrap_err();
        assert_eq!(error, AstError::AnnotationSlotOccupied { slot: "trailing" });
        assert_eq!(annotations.trailing().unwrap().content(), "one");

        annotations
            .set_trailing_after_comma(Comment::new("three", span(20, 8)))
            .unwrap();
        assert!(annotations
            .set_trailing_after_comma(Comment::new("four", span(30, 7)))
            .is_err());
    }

    #[test]
    fn test_iteration_is_in_source_order() {
        let mut node: Node = StringLiteral::new("x", span(10, 3)).into();
        let annotations = node.annotations_mut();
        annotations.push_succeeding(Comment::new("after", span(20, 8)));
        annotations
            .set_trailing(Comment::new("trailing", span(14, 5)))
            .unwrap();
        annotations.push_preceding(Comment::new("before", span(0, 9)));
        let contents: Vec<&str> = node.annotations().iter().map(Annotation::content).collect();
        assert_eq!(contents, vec!["before", "trailing", "after"]);
        assert!(!node.annotations().is_empty());
    }
}
