//! Comments and blank lines attached around nodes.
//!
//! Annotations are not children of the node they belong to: they never take
//! part in dispatch or traversal. Each node owns four slots, filled by the
//! parser in source order:
//!
//! - `precedings`: everything written before the node
//! - `trailing`: one inline annotation on the same line, after the node
//! - `trailing_after_comma`: one inline annotation after the comma that
//!   separates the node from the next element of a list
//! - `succeedings`: what follows the node when no later sibling claims it

use serde::{Deserialize, Serialize};

use crate::{errors::AstError, nodes::Location};

/// Payload of a blank-line annotation.
pub const BLANK_LINE_CONTENT: &str = "\n";

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Comment {
    /// Comment text without its delimiters.
    pub content: String,
    pub is_documentation: bool,
    pub is_multi_line: bool,
    pub is_trailing: bool,
    pub location: Location,
}

impl Comment {
    #[must_use]
    pub fn new(content: impl Into<String>, location: Location) -> Self {
        Self {
            content: content.into(),
            is_documentation: false,
            is_multi_line: false,
            is_trailing: false,
            location,
        }
    }

    #[must_use]
    pub fn doc(content: impl Into<String>, location: Location) -> Self {
        Self {
            is_documentation: true,
            ..Self::new(content, location)
        }
    }

    #[must_use]
    pub fn multi_line(mut self) -> Self {
        self.is_multi_line = true;
        self
    }

    #[must_use]
    pub fn trailing(mut self) -> Self {
        self.is_trailing = true;
        self
    }
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum Annotation {
    Comment(Comment),
    BlankLine { location: Location },
}

impl Annotation {
    #[must_use]
    pub fn blank_line(location: Location) -> Self {
        Annotation::BlankLine { location }
    }

    #[must_use]
    pub fn content(&self) -> &str {
        match self {
            Annotation::Comment(comment) => &comment.content,
            Annotation::BlankLine { .. } => BLANK_LINE_CONTENT,
        }
    }

    #[must_use]
    pub fn is_documentation(&self) -> bool {
        matches!(self, Annotation::Comment(comment) if comment.is_documentation)
    }

    #[must_use]
    pub fn is_blank_line(&self) -> bool {
        matches!(self, Annotation::BlankLine { .. })
    }

    #[must_use]
    pub fn location(&self) -> Location {
        match self {
            Annotation::Comment(comment) => comment.location,
            Annotation::BlankLine { location } => *location,
        }
    }
}

impl From<Comment> for Annotation {
    fn from(comment: Comment) -> Self {
        Annotation::Comment(comment)
    }
}

#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct Annotations {
    precedings: Vec<Annotation>,
    trailing: Option<Annotation>,
    trailing_after_comma: Option<Annotation>,
    succeedings: Vec<Annotation>,
}

impl Annotations {
    #[must_use]
    pub fn precedings(&self) -> &[Annotation] {
        &self.precedings
    }

    #[must_use]
    pub fn trailing(&self) -> Option<&Annotation> {
        self.trailing.as_ref()
    }

    #[must_use]
    pub fn trailing_after_comma(&self) -> Option<&Annotation> {
        self.trailing_after_comma.as_ref()
    }

    #[must_use]
    pub fn succeedings(&self) -> &[Annotation] {
        &self.succeedings
    }

    pub fn push_preceding(&mut self, annotation: impl Into<Annotation>) {
        self.precedings.push(annotation.into());
    }

    pub fn push_succeeding(&mut self, annotation: impl Into<Annotation>) {
        self.succeedings.push(annotation.into());
    }

    /// Fills the trailing slot.
    ///
    /// # Errors
    ///
    /// Returns [`AstError::AnnotationSlotOccupied`] if the slot is already filled.
    pub fn set_trailing(&mut self, annotation: impl Into<Annotation>) -> Result<(), AstError> {
        fill_slot(&mut self.trailing, annotation.into(), "trailing")
    }

    /// Fills the slot for an annotation written after the node's separating comma.
    ///
    /// # Errors
    ///
    /// Returns [`AstError::AnnotationSlotOccupied`] if the slot is already filled.
    pub fn set_trailing_after_comma(
        &mut self,
        annotation: impl Into<Annotation>,
    ) -> Result<(), AstError> {
        fill_slot(
            &mut self.trailing_after_comma,
            annotation.into(),
            "trailing-after-comma",
        )
    }

    /// Concatenates the documentation comments among `precedings`, each
    /// followed by a newline. Blank lines and plain comments are skipped.
    ///
    /// Computed on every call.
    #[must_use]
    pub fn documentation(&self) -> String {
        self.precedings
            .iter()
            .filter(|annotation| annotation.is_documentation())
            .fold(String::new(), |mut doc, annotation| {
                doc.push_str(annotation.content());
                doc.push('\n');
                doc
            })
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.precedings.is_empty()
            && self.trailing.is_none()
            && self.trailing_after_comma.is_none()
            && self.succeedings.is_empty()
    }

    /// All annotations in source order: precedings, trailing,
    /// trailing-after-comma, succeedings.
    pub fn iter(&self) -> impl Iterator<Item = &Annotation> {
        self.precedings
            .iter()
            .chain(self.trailing.iter())
            .chain(self.trailing_after_comma.iter())
            .chain(self.succeedings.iter())
    }
}

fn fill_slot(
    slot: &mut Option<Annotation>,
    annotation: Annotation,
    name: &'static str,
) -> Result<(), AstError> {
    if slot.is_some() {
        return Err(AstError::AnnotationSlotOccupied { slot: name });
    }
    *slot = Some(annotation);
    Ok(())
}
