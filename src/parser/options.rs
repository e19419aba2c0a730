//! Normalization options and configuration.

use std::ops::RangeInclusive;

/// Options controlling shape extraction and layout normalization.
#[derive(Debug, Clone)]
pub struct LayoutOptions {
    /// Height given to horizontal line segments, in output units
    pub line_thickness: f32,

    /// Tolerance for edge clustering, line merging and the spacing
    /// safety margin
    pub alignment_tolerance: f32,

    /// Minimum vertical overlap ratio for two lines to count as one row
    /// when computing line spacing
    pub line_overlap_factor: f32,

    /// Vertical expansion of a line before testing it against a shape
    pub line_tolerance: f32,

    /// Fallback margin on every side; also caps the top and bottom margin
    pub default_margin: f32,

    /// Error handling mode
    pub error_mode: ErrorMode,

    /// Whether to normalize pages in parallel
    pub parallel: bool,

    /// Page selection (which pages to process)
    pub pages: PageSelection,
}

impl LayoutOptions {
    /// Create new options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the synthetic thickness of horizontal line segments.
    pub fn with_line_thickness(mut self, thickness: f32) -> Self {
        self.line_thickness = thickness.max(0.0);
        self
    }

    /// Set the alignment tolerance.
    pub fn with_alignment_tolerance(mut self, tolerance: f32) -> Self {
        self.alignment_tolerance = tolerance.max(0.0);
        self
    }

    /// Set the line overlap factor used for line counting.
    pub fn with_line_overlap_factor(mut self, factor: f32) -> Self {
        self.line_overlap_factor = factor.clamp(0.0, 1.0);
        self
    }

    /// Set the line expansion used when matching shapes to lines.
    pub fn with_line_tolerance(mut self, tolerance: f32) -> Self {
        self.line_tolerance = tolerance.max(0.0);
        self
    }

    /// Set the default margin.
    pub fn with_default_margin(mut self, margin: f32) -> Self {
        self.default_margin = margin.max(0.0);
        self
    }

    /// Set error mode.
    pub fn with_error_mode(mut self, mode: ErrorMode) -> Self {
        self.error_mode = mode;
        self
    }

    /// Fail on the first page issue instead of reporting it.
    pub fn strict(mut self) -> Self {
        self.error_mode = ErrorMode::Strict;
        self
    }

    /// Enable or disable parallel processing.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Disable parallel processing.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Set page selection.
    pub fn with_pages(mut self, pages: PageSelection) -> Self {
        self.pages = pages;
        self
    }
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            line_thickness: 0.5,
            alignment_tolerance: 1.0,
            line_overlap_factor: 0.5,
            line_tolerance: 0.5,
            default_margin: 72.0,
            error_mode: ErrorMode::Lenient,
            parallel: true,
            pages: PageSelection::All,
        }
    }
}

/// Error handling mode during normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorMode {
    /// Fail on the first page issue
    Strict,
    /// Keep partial results and report issues
    #[default]
    Lenient,
}

/// Page selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PageSelection {
    /// All pages
    #[default]
    All,
    /// A range of pages (inclusive, 1-indexed)
    Range(RangeInclusive<u32>),
    /// Specific pages (1-indexed)
    Pages(Vec<u32>),
}

impl PageSelection {
    /// Check if a page number should be included.
    pub fn includes(&self, page: u32) -> bool {
        match self {
            PageSelection::All => true,
            PageSelection::Range(range) => range.contains(&page),
            PageSelection::Pages(pages) => pages.contains(&page),
        }
    }

    /// Parse a page selection string (e.g., "1-10", "1,3,5,7-10").
    pub fn parse(s: &str) -> Result<Self, String> {
        let s = s.trim();

        if s.is_empty() || s == "all" {
            return Ok(PageSelection::All);
        }

        if let Some((start, end)) = s.split_once('-') {
            if !start.contains(',') && !end.contains(',') {
                let start: u32 = start.trim().parse().map_err(|_| "Invalid start page")?;
                let end: u32 = end.trim().parse().map_err(|_| "Invalid end page")?;
                if start > end {
                    return Err(format!("Range start {} exceeds end {}", start, end));
                }
                return Ok(PageSelection::Range(start..=end));
            }
        }

        let mut pages = Vec::new();
        for part in s.split(',') {
            let part = part.trim();
            if let Some((start, end)) = part.split_once('-') {
                let start: u32 = start.trim().parse().map_err(|_| "Invalid page number")?;
                let end: u32 = end.trim().parse().map_err(|_| "Invalid page number")?;
                for p in start..=end {
                    if !pages.contains(&p) {
                        pages.push(p);
                    }
                }
            } else {
                let p: u32 = part.parse().map_err(|_| "Invalid page number")?;
                if !pages.contains(&p) {
                    pages.push(p);
                }
            }
        }
        pages.sort_unstable();

        Ok(PageSelection::Pages(pages))
    }
}
