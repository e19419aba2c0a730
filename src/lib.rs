//! # pagelayout
//!
//! PDF page layout normalization for document conversion.
//!
//! A PDF decoder produces raw per-page blocks of lines, spans and characters.
//! This library turns them into a layout a document writer can consume:
//! it recovers highlight, underline and strike-through shapes from the page's
//! content stream and annotations, folds inline images into text lines,
//! splits text spans under those shapes into styled runs and computes
//! paragraph and line spacing.
//!
//! ## Quick Start
//!
//! ```no_run
//! use pagelayout::{load_pages_file, normalize_pages, render, LayoutOptions};
//!
//! fn main() -> pagelayout::Result<()> {
//!     // Decoded pages, as dumped by the decoder
//!     let pages = load_pages_file("pages.json")?;
//!
//!     let normalized = normalize_pages(pages, &LayoutOptions::default())?;
//!     println!("{}", render::pages_to_json(&normalized, render::JsonFormat::Pretty)?);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Shape recovery**: filled rectangles and horizontal rules from content
//!   streams, highlight/underline/strike-out annotations
//! - **Inline images**: images sharing a row with text become spans
//! - **Format splitting**: spans are cut into styled runs under shapes
//! - **Spacing**: paragraph before/after space and line pitch
//! - **Parallel processing**: Uses Rayon for multi-page documents

pub mod detect;
pub mod error;
pub mod layout;
pub mod model;
pub mod parser;
pub mod render;

// Re-export commonly used types
pub use detect::{
    detect_format_from_bytes, detect_format_from_path, detect_input_from_bytes,
    detect_input_from_path, is_pdf, InputKind, PdfFormat,
};
pub use error::{Error, PageIssue, Result, StreamError};
pub use layout::{LayoutNormalizer, NormalizedPage};
pub use model::{
    Annotation, AnnotationType, BBox, Block, BlockContent, Char, ImageData, ImageSpan, Layout,
    Line, Margin, RawPage, Rect, Rgb, Span, StyleType, TextSpan, TextStyle,
};
pub use parser::{
    extract_document_shapes, extract_shapes, ErrorMode, LayoutOptions, LopdfSource,
    PageSelection, PageShapes, PageSource, StreamShapes,
};
pub use render::JsonFormat;

use std::fs;
use std::path::Path;

/// Normalize one decoded page.
///
/// # Example
///
/// ```
/// use pagelayout::{normalize_page, LayoutOptions, RawPage};
///
/// let page = RawPage::new(612.0, 792.0)
///     .with_stream("q 1 0 0 -1 0 792 cm 1 1 0 rg 100 100 50 20 re f Q");
/// let result = normalize_page(page, &LayoutOptions::default()).unwrap();
/// assert_eq!(result.layout.rects.len(), 1);
/// ```
pub fn normalize_page(page: RawPage, options: &LayoutOptions) -> Result<NormalizedPage> {
    LayoutNormalizer::new(options.clone()).normalize(page)
}

/// Normalize many decoded pages, in parallel unless disabled in `options`.
pub fn normalize_pages(pages: Vec<RawPage>, options: &LayoutOptions) -> Result<Vec<NormalizedPage>> {
    LayoutNormalizer::new(options.clone()).normalize_all(pages)
}

/// Load a single page dump.
pub fn load_page_file<P: AsRef<Path>>(path: P) -> Result<RawPage> {
    let data = fs::read(path)?;
    Ok(serde_json::from_slice(&data)?)
}

/// Load a page dump holding either one page or an array of pages.
pub fn load_pages_file<P: AsRef<Path>>(path: P) -> Result<Vec<RawPage>> {
    let data = fs::read(path)?;
    load_pages_bytes(&data)
}

/// Parse a page dump holding either one page or an array of pages.
pub fn load_pages_bytes(data: &[u8]) -> Result<Vec<RawPage>> {
    if detect_input_from_bytes(data)? != InputKind::PageJson {
        return Err(Error::UnknownFormat);
    }

    #[derive(serde::Deserialize)]
    #[serde(untagged)]
    enum Dump {
        Many(Vec<RawPage>),
        One(Box<RawPage>),
    }

    Ok(match serde_json::from_slice(data)? {
        Dump::Many(pages) => pages,
        Dump::One(page) => vec![*page],
    })
}

/// Recover the shapes of every selected page of a PDF file.
pub fn extract_file_shapes<P: AsRef<Path>>(
    path: P,
    options: &LayoutOptions,
) -> Result<Vec<PageShapes>> {
    let source = LopdfSource::load_file(path)?;
    extract_document_shapes(&source, options)
}
