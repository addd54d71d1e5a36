//! Synchronous document processing pipeline.

use crate::node::Document;

use super::{IdentityTransform, Transform};

/// Synchronous pipeline for document processing.
///
/// Wraps a `Document` and provides a fluent API for transformations.
///
/// # Example
///
/// ```ignore
/// let composed = Pipeline::new(doc)
///     .pipe(StripInjections)
///     .pipe(InjectHead::new(&plan))
///     .pipe_if(plan.has_regions(), BuildLayout::new(&plan))
///     .into_inner();
/// ```
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    doc: Document,
}

impl Pipeline {
    /// Create a new pipeline from a document.
    #[inline]
    pub fn new(doc: Document) -> Self {
        Self { doc }
    }

    /// Apply a transform to the document.
    #[inline]
    pub fn pipe<T: Transform>(self, transform: T) -> Self {
        Self {
            doc: transform.transform(self.doc),
        }
    }

    /// Apply a transform only if `condition` is true.
    #[inline]
    pub fn pipe_if<T: Transform>(self, condition: bool, transform: T) -> Self {
        if condition {
            self.pipe(transform)
        } else {
            self.pipe(IdentityTransform)
        }
    }

    /// Inspect the document without consuming the pipeline.
    ///
    /// Useful for logging or debugging intermediate state.
    #[inline]
    pub fn inspect<F>(self, f: F) -> Self
    where
        F: FnOnce(&Document),
    {
        f(&self.doc);
        self
    }

    /// Get a reference to the underlying document.
    #[inline]
    pub fn document(&self) -> &Document {
        &self.doc
    }

    /// Consume the pipeline and return the document.
    #[inline]
    pub fn into_inner(self) -> Document {
        self.doc
    }
}

impl From<Document> for Pipeline {
    #[inline]
    fn from(doc: Document) -> Self {
        Self::new(doc)
    }
}

impl From<Pipeline> for Document {
    #[inline]
    fn from(pipeline: Pipeline) -> Self {
        pipeline.into_inner()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Element;

    struct Mark(&'static str);

    impl Transform for Mark {
        fn transform(self, mut doc: Document) -> Document {
            if let Some(body) = doc.body_mut() {
                body.push_elem(Element::new(self.0));
            }
            doc
        }
    }

    fn mark(name: &'static str) -> Mark {
        Mark(name)
    }

    fn doc() -> Document {
        Document::from_root(Element::new("html").child(Element::new("body")))
    }

    #[test]
    fn test_pipe_runs_in_order() {
        let out = Pipeline::new(doc()).pipe(mark("a")).pipe(mark("b")).into_inner();
        let tags: Vec<_> = out
            .body()
            .unwrap()
            .children_elements()
            .map(|e| e.tag.to_string())
            .collect();
        assert_eq!(tags, ["a", "b"]);
    }

    #[test]
    fn test_pipe_if_skips() {
        let out = Pipeline::new(doc())
            .pipe_if(false, mark("a"))
            .pipe_if(true, mark("b"))
            .into_inner();
        assert_eq!(out.body().unwrap().child_count(), 1);
        assert!(out.has_element(|e| e.is("b")));
    }

    #[test]
    fn test_inspect_sees_intermediate_state() {
        let mut seen = 0;
        let _ = Pipeline::new(doc())
            .pipe(mark("a"))
            .inspect(|d| seen = d.element_count())
            .pipe(mark("b"));
        assert_eq!(seen, 3);
    }
}
