//! Page source abstraction layer.
//!
//! Provides a trait-based interface for reading the two raw inputs of shape
//! extraction (content stream text and annotation records) together with the
//! page size, isolating the concrete PDF library (lopdf) from the pipeline.

use std::collections::BTreeMap;
use std::path::Path;

use lopdf::{Dictionary, Document as LopdfDocument, Object, ObjectId};

use crate::error::{Error, Result};
use crate::model::{Annotation, AnnotationType, BBox};

/// Raw inputs of one page, read from a document.
#[derive(Debug, Clone)]
pub struct SourcePage {
    /// Page number (1-indexed)
    pub number: u32,
    pub width: f32,
    pub height: f32,
    /// Lower-left corner of the media box in user space
    pub origin: (f32, f32),
    /// Decompressed content stream, lossily decoded as text
    pub stream: String,
    /// Annotations with rectangles converted to page space
    pub annotations: Vec<Annotation>,
}

/// Abstract interface for reading page inputs from a document.
pub trait PageSource {
    /// Page numbers in document order.
    fn page_numbers(&self) -> Vec<u32>;

    /// Read one page.
    fn page(&self, number: u32) -> Result<SourcePage>;
}

/// US Letter, used when a page has no readable media box.
const DEFAULT_MEDIA_BOX: [f32; 4] = [0.0, 0.0, 612.0, 792.0];

/// Parent chain depth limit for inherited attributes.
const MAX_INHERIT_DEPTH: usize = 32;

/// Concrete [`PageSource`] backed by `lopdf::Document`.
pub struct LopdfSource {
    doc: LopdfDocument,
    pages: BTreeMap<u32, ObjectId>,
}

impl LopdfSource {
    /// Load from a file path.
    pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let doc = LopdfDocument::load(path)?;
        Ok(Self::from_document(doc))
    }

    /// Load from an in-memory byte slice.
    pub fn load_bytes(data: &[u8]) -> Result<Self> {
        crate::detect::detect_format_from_bytes(data)?;
        let doc = LopdfDocument::load_mem(data)?;
        Ok(Self::from_document(doc))
    }

    /// Load from a reader.
    pub fn load_reader<R: std::io::Read>(mut reader: R) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::load_bytes(&data)
    }

    fn from_document(doc: LopdfDocument) -> Self {
        let pages = doc.get_pages();
        Self { doc, pages }
    }

    /// Get PDF version string.
    pub fn version(&self) -> String {
        self.doc.version.to_string()
    }

    /// Check if the document is encrypted.
    pub fn is_encrypted(&self) -> bool {
        self.doc.is_encrypted()
    }

    fn resolve<'a>(&'a self, obj: &'a Object) -> Result<&'a Object> {
        match obj {
            Object::Reference(id) => Ok(self.doc.get_object(*id)?),
            other => Ok(other),
        }
    }

    fn numbers(&self, obj: &Object) -> Result<Vec<f32>> {
        self.resolve(obj)?
            .as_array()?
            .iter()
            .map(|item| -> Result<f32> { Ok(self.resolve(item)?.as_float()?) })
            .collect()
    }

    /// `/MediaBox`, following the `/Parent` chain for inherited values.
    fn media_box(&self, page: &Dictionary) -> [f32; 4] {
        let mut dict = page;
        for _ in 0..MAX_INHERIT_DEPTH {
            if let Ok(obj) = dict.get(b"MediaBox") {
                match self.numbers(obj) {
                    Ok(v) if v.len() == 4 => return [v[0], v[1], v[2], v[3]],
                    _ => break,
                }
            }
            let parent = dict
                .get(b"Parent")
                .ok()
                .and_then(|p| self.resolve(p).ok())
                .and_then(|p| p.as_dict().ok());
            match parent {
                Some(p) => dict = p,
                None => break,
            }
        }
        log::debug!("No usable MediaBox, assuming US Letter");
        DEFAULT_MEDIA_BOX
    }

    fn annotations(
        &self,
        page: &Dictionary,
        origin: (f32, f32),
        height: f32,
    ) -> Vec<Annotation> {
        let annots = page
            .get(b"Annots")
            .ok()
            .and_then(|a| self.resolve(a).ok())
            .and_then(|a| a.as_array().ok());
        let Some(annots) = annots else {
            return Vec::new();
        };

        annots
            .iter()
            .filter_map(|item| {
                let dict = self.resolve(item).ok()?.as_dict().ok()?;
                match self.annotation(dict, origin, height) {
                    Ok(annot) => Some(annot),
                    Err(e) => {
                        log::warn!("Skipping unreadable annotation: {}", e);
                        None
                    }
                }
            })
            .collect()
    }

    fn annotation(
        &self,
        dict: &Dictionary,
        origin: (f32, f32),
        height: f32,
    ) -> Result<Annotation> {
        let subtype = dict.get(b"Subtype")?.as_name()?;
        let kind = AnnotationType::from_subtype(&String::from_utf8_lossy(subtype));

        let r = self.numbers(dict.get(b"Rect")?)?;
        if r.len() != 4 {
            return Err(Error::PdfParse(format!("Rect has {} entries", r.len())));
        }
        // PDF space is bottom-up from the media box origin.
        let (left, bottom) = origin;
        let top = bottom + height;
        let rect = BBox::from_corners((r[0] - left, top - r[1]), (r[2] - left, top - r[3]));

        let color = match dict.get(b"C") {
            Ok(c) => self.numbers(c)?,
            Err(_) => Vec::new(),
        };

        Ok(Annotation::new(kind, rect, color))
    }
}

impl PageSource for LopdfSource {
    fn page_numbers(&self) -> Vec<u32> {
        self.pages.keys().copied().collect()
    }

    fn page(&self, number: u32) -> Result<SourcePage> {
        let page_id = *self
            .pages
            .get(&number)
            .ok_or(Error::PageOutOfRange(number, self.pages.len() as u32))?;
        let dict = self.doc.get_dictionary(page_id)?;

        let media_box = self.media_box(dict);
        let width = (media_box[2] - media_box[0]).abs();
        let height = (media_box[3] - media_box[1]).abs();
        let origin = (
            media_box[0].min(media_box[2]),
            media_box[1].min(media_box[3]),
        );

        let content = self.doc.get_page_content(page_id).unwrap_or_else(|e| {
            log::warn!("Page {} has no readable content stream: {}", number, e);
            Vec::new()
        });

        Ok(SourcePage {
            number,
            width,
            height,
            origin,
            stream: String::from_utf8_lossy(&content).into_owned(),
            annotations: self.annotations(dict, origin, height),
        })
    }
}
