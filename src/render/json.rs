//! JSON rendering for normalized pages.

use serde::Serialize;

use crate::error::Result;
use crate::layout::NormalizedPage;

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Serialize any page-level value (a page, a slice of pages, a layout).
pub fn to_json<T: Serialize + ?Sized>(value: &T, format: JsonFormat) -> Result<String> {
    let json = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(value)?,
        JsonFormat::Compact => serde_json::to_string(value)?,
    };
    Ok(json)
}

/// Serialize normalized pages as a JSON array.
pub fn pages_to_json(pages: &[NormalizedPage], format: JsonFormat) -> Result<String> {
    to_json(pages, format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Layout, Margin};

    fn page() -> NormalizedPage {
        let mut layout = Layout::new(612.0, 792.0, Vec::new(), Vec::new());
        layout.margin = Margin::uniform(72.0);
        NormalizedPage {
            number: 3,
            layout,
            issues: Vec::new(),
        }
    }

    #[test]
    fn test_to_json_pretty() {
        let json = to_json(&page(), JsonFormat::Pretty).unwrap();
        assert!(json.contains("\"margin\""));
        assert!(json.contains("\"number\": 3"));
        assert!(json.contains('\n'));
        assert!(!json.contains("issues"));
    }

    #[test]
    fn test_to_json_compact() {
        let json = pages_to_json(&[page(), page()], JsonFormat::Compact).unwrap();
        assert!(!json.contains('\n'));
        assert!(json.starts_with('['));
    }
}
