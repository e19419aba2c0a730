//! Shape extraction and page sources.

pub mod annotation;
pub mod backend;
pub mod options;
pub mod stream;
pub mod tokenizer;

pub use annotation::rects_from_annotations;
pub use backend::{LopdfSource, PageSource, SourcePage};
pub use options::{ErrorMode, LayoutOptions, PageSelection};
pub use stream::{rects_from_stream, StreamInterpreter, StreamShapes, Transform};

use rayon::prelude::*;
use serde::Serialize;

use crate::error::{PageIssue, Result};
use crate::model::{Annotation, Rect};

/// Recover every shape on a page: stream shapes first, then annotation
/// shapes.
pub fn extract_shapes(
    stream: &str,
    annotations: &[Annotation],
    page_height: f32,
    options: &LayoutOptions,
) -> StreamShapes {
    let interpreter = StreamInterpreter::new(stream, page_height, options.line_thickness);
    collect_shapes(interpreter, annotations)
}

fn collect_shapes(interpreter: StreamInterpreter<'_>, annotations: &[Annotation]) -> StreamShapes {
    let mut shapes = interpreter.run();
    shapes.rects.extend(rects_from_annotations(annotations));
    log::debug!("Recovered {} shape(s)", shapes.rects.len());
    shapes
}

/// Shapes recovered from one document page.
#[derive(Debug, Clone, Serialize)]
pub struct PageShapes {
    /// Page number (1-indexed)
    pub page: u32,
    pub width: f32,
    pub height: f32,
    pub rects: Vec<Rect>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub issues: Vec<PageIssue>,
}

/// Recover shapes from every selected page of a document.
///
/// Pages are read sequentially and interpreted in parallel when enabled.
/// In strict mode a malformed stream fails the whole call.
pub fn extract_document_shapes<S: PageSource>(
    source: &S,
    options: &LayoutOptions,
) -> Result<Vec<PageShapes>> {
    let pages = source
        .page_numbers()
        .into_iter()
        .filter(|n| options.pages.includes(*n))
        .map(|n| source.page(n))
        .collect::<Result<Vec<SourcePage>>>()?;

    let extract = |page: SourcePage| -> Result<PageShapes> {
        let (x, y) = page.origin;
        let interpreter = StreamInterpreter::new(&page.stream, page.height, options.line_thickness)
            .with_origin(x, y);
        let shapes = collect_shapes(interpreter, &page.annotations);
        let issues: Vec<PageIssue> = shapes.error.into_iter().map(PageIssue::from).collect();
        if options.error_mode == ErrorMode::Strict {
            if let Some(issue) = issues.first() {
                return Err(issue.clone().into());
            }
        }
        Ok(PageShapes {
            page: page.number,
            width: page.width,
            height: page.height,
            rects: shapes.rects,
            issues,
        })
    };

    if options.parallel {
        pages.into_par_iter().map(extract).collect()
    } else {
        pages.into_iter().map(extract).collect()
    }
}
