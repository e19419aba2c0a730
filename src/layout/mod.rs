//! Page normalization pipeline.
//!
//! Each page passes through five stages in a fixed order:
//!
//! 1. shape extraction from the content stream and annotations
//! 2. preprocessing (cleaning, reading order, margin, shape assignment)
//! 3. inline image merging
//! 4. text format splitting
//! 5. spacing calculation
//!
//! Pages share no state, so [`LayoutNormalizer::normalize_all`] fans them
//! out over a rayon pool.

pub mod inline_image;
pub mod margin;
pub mod preprocess;
pub mod spacing;
pub mod text_format;

pub use inline_image::{merge_inline_images, merge_lines};
pub use margin::page_margin;
pub use preprocess::{preprocess, PreprocessReport};
pub use spacing::compute_spacing;
pub use text_format::{apply_text_format, classify_style, split_span};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{Error, PageIssue, Result};
use crate::model::{Layout, RawPage};
use crate::parser::{extract_shapes, ErrorMode, LayoutOptions};

/// A normalized page together with the issues met on the way.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizedPage {
    /// Page number (1-indexed)
    pub number: u32,

    pub layout: Layout,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub issues: Vec<PageIssue>,
}

impl NormalizedPage {
    /// Whether the page went through every stage without workarounds.
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Runs the normalization pipeline over pages.
#[derive(Debug, Clone, Default)]
pub struct LayoutNormalizer {
    options: LayoutOptions,
}

impl LayoutNormalizer {
    /// Create a normalizer with the given options.
    pub fn new(options: LayoutOptions) -> Self {
        Self { options }
    }

    /// Get the options.
    pub fn options(&self) -> &LayoutOptions {
        &self.options
    }

    /// Normalize a single page.
    ///
    /// In lenient mode every recoverable problem is recorded in
    /// [`NormalizedPage::issues`]; in strict mode the first one is returned
    /// as an error. A page with a non-positive size skips every stage: it is
    /// returned as decoded with a [`PageIssue::InvalidPageSize`], or as
    /// [`Error::InvalidPage`] in strict mode.
    pub fn normalize(&self, page: RawPage) -> Result<NormalizedPage> {
        let number = page.number.unwrap_or(1);
        if !(page.width > 0.0 && page.height > 0.0) {
            if self.options.error_mode == ErrorMode::Strict {
                return Err(Error::InvalidPage(format!(
                    "page {} has size {}x{}",
                    number, page.width, page.height
                )));
            }
            log::warn!(
                "Page {} has size {}x{}, passing layout through",
                number,
                page.width,
                page.height
            );
            let issue = PageIssue::InvalidPageSize {
                width: page.width,
                height: page.height,
            };
            return Ok(NormalizedPage {
                number,
                layout: Layout::new(page.width, page.height, page.blocks, Vec::new()),
                issues: vec![issue],
            });
        }

        let options = &self.options;
        let mut issues = Vec::new();

        let shapes = extract_shapes(&page.stream, &page.annotations, page.height, options);
        if let Some(error) = shapes.error {
            issues.push(PageIssue::from(error));
        }

        let mut layout = Layout::new(page.width, page.height, page.blocks, shapes.rects);
        let report = preprocess(&mut layout, options);
        if report.dropped > 0 {
            issues.push(PageIssue::DroppedBlocks {
                count: report.dropped,
            });
        }
        if report.margin_fallback {
            issues.push(PageIssue::NoMarginCandidate);
        }

        merge_inline_images(&mut layout, options);
        apply_text_format(&mut layout, options);
        compute_spacing(&mut layout, options);

        if options.error_mode == ErrorMode::Strict {
            if let Some(issue) = issues.first() {
                return Err(Error::Issue(issue.clone()));
            }
        }

        log::debug!(
            "Page {}: {} block(s), {} shape(s), {} issue(s)",
            number,
            layout.blocks.len(),
            layout.rects.len(),
            issues.len()
        );

        Ok(NormalizedPage {
            number,
            layout,
            issues,
        })
    }

    /// Normalize many pages, in parallel when enabled.
    ///
    /// Pages without a number are numbered by position. Output order
    /// follows input order.
    pub fn normalize_all(&self, pages: Vec<RawPage>) -> Result<Vec<NormalizedPage>> {
        let numbered: Vec<RawPage> = pages
            .into_iter()
            .enumerate()
            .map(|(i, mut p)| {
                p.number.get_or_insert(i as u32 + 1);
                p
            })
            .filter(|p| p.number.map_or(true, |n| self.options.pages.includes(n)))
            .collect();

        if self.options.parallel {
            numbered
                .into_par_iter()
                .map(|p| self.normalize(p))
                .collect()
        } else {
            numbered.into_iter().map(|p| self.normalize(p)).collect()
        }
    }
}
