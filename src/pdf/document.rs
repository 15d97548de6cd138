use super::geometry::{normalize_rotation, page_transform, Matrix, Rect};
use anyhow::{Context, Result};
use lopdf::{Dictionary, Document, Object, ObjectId};
use std::collections::HashMap;
use std::path::Path;

// Guards against Parent loops in broken page trees
const MAX_TREE_DEPTH: usize = 64;

pub struct PdfDocument {
    pub doc: Document,
    pub path: String,
}

impl PdfDocument {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_str = path.as_ref().display().to_string();
        let doc =
            Document::load(&path).with_context(|| format!("Failed to open PDF: {}", path_str))?;
        Ok(PdfDocument {
            doc,
            path: path_str,
        })
    }

    pub fn page_count(&self) -> u32 {
        self.doc.get_pages().len() as u32
    }

    /// Map page object IDs to 1-indexed page numbers
    pub fn page_numbers(&self) -> HashMap<ObjectId, u32> {
        self.doc
            .get_pages()
            .into_iter()
            .map(|(num, id)| (id, num))
            .collect()
    }

    /// Transform from PDF page space to device space for a 1-indexed page
    pub fn page_transform(&self, page: u32) -> Result<Matrix> {
        let page_id = *self
            .doc
            .get_pages()
            .get(&page)
            .with_context(|| format!("Page {} is out of range (1-{})", page, self.page_count()))?;

        let media_box = self
            .inherited_rect(page_id, b"MediaBox")
            .filter(|r| !r.is_empty())
            .unwrap_or(Rect::LETTER);
        let page_box = match self.inherited_rect(page_id, b"CropBox") {
            Some(crop) if !crop.intersect(&media_box).is_empty() => crop.intersect(&media_box),
            _ => media_box,
        };

        let rotation = self
            .inherited(page_id, b"Rotate")
            .and_then(|obj| match obj {
                Object::Integer(i) => Some(*i),
                Object::Real(r) => Some(*r as i64),
                _ => None,
            })
            .map(normalize_rotation)
            .unwrap_or(0);

        Ok(page_transform(page_box, rotation))
    }

    /// Look up a page attribute, following Parent links for inheritable keys
    fn inherited(&self, page_id: ObjectId, key: &[u8]) -> Option<&Object> {
        let mut dict: &Dictionary = self.doc.get_dictionary(page_id).ok()?;

        for _ in 0..MAX_TREE_DEPTH {
            if let Ok(value) = dict.get(key) {
                return self.resolve(value);
            }
            dict = match dict.get(b"Parent") {
                Ok(Object::Reference(parent)) => self.doc.get_dictionary(*parent).ok()?,
                _ => return None,
            };
        }

        None
    }

    fn inherited_rect(&self, page_id: ObjectId, key: &[u8]) -> Option<Rect> {
        let values = match self.inherited(page_id, key)? {
            Object::Array(arr) if arr.len() == 4 => arr
                .iter()
                .map(|v| self.number(v))
                .collect::<Option<Vec<f32>>>()?,
            _ => return None,
        };
        Some(Rect::new(values[0], values[1], values[2], values[3]))
    }

    /// Follow a reference to its target object
    pub fn resolve<'a>(&'a self, obj: &'a Object) -> Option<&'a Object> {
        match obj {
            Object::Reference(id) => self.doc.get_object(*id).ok(),
            other => Some(other),
        }
    }

    pub fn number(&self, obj: &Object) -> Option<f32> {
        match self.resolve(obj)? {
            Object::Integer(i) => Some(*i as f32),
            Object::Real(r) => Some(*r as f32),
            _ => None,
        }
    }
}

/// Decode a PDF text string (UTF-16BE with BOM, otherwise PDFDocEncoding)
pub fn decode_pdf_string(bytes: &[u8]) -> String {
    // Check for UTF-16 BOM
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        // UTF-16 BE
        let u16_chars: Vec<u16> = bytes[2..]
            .chunks(2)
            .filter_map(|chunk| {
                if chunk.len() == 2 {
                    Some(u16::from_be_bytes([chunk[0], chunk[1]]))
                } else {
                    None
                }
            })
            .collect();
        String::from_utf16_lossy(&u16_chars)
    } else if let Some(utf8) = bytes.strip_prefix(&[0xEF_u8, 0xBB, 0xBF][..]) {
        String::from_utf8_lossy(utf8).into_owned()
    } else {
        // PDFDocEncoding / Latin-1 (simplified)
        bytes.iter().map(|&b| b as char).collect()
    }
}
