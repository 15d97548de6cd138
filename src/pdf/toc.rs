use super::document::{decode_pdf_string, PdfDocument};
use super::geometry::{Point, Position};
use anyhow::{Context, Result};
use lopdf::{Dictionary, Object, ObjectId};
use std::collections::{HashMap, HashSet};
use std::path::Path;

// Nesting limit for destination references and name trees
const MAX_DEPTH: usize = 32;

/// Which coordinate system TOC target points are reported in
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CoordinateSpace {
    /// PDF user space: origin bottom-left, y up
    #[default]
    Pdf,
    /// MuPDF page space: origin top-left, y down, page rotation not applied
    Device,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TocEntry {
    /// Nesting depth, 1 for top-level entries
    pub level: u32,
    pub title: String,
    /// 1-indexed target page, `None` if the destination cannot be resolved
    pub page: Option<u32>,
    /// Target point; entries without explicit coordinates get the origin
    pub point: Point,
}

impl TocEntry {
    pub fn position(&self) -> Option<Position> {
        self.page.map(|page| Position {
            page,
            x: self.point.x,
            y: self.point.y,
        })
    }
}

/// A resolved outline destination
#[derive(Debug, Clone, Copy, PartialEq)]
struct Destination {
    page: u32,
    point: Option<Point>,
}

/// Extract the table of contents of a PDF as a flat, pre-ordered list.
///
/// The document is only held open for the duration of this call.
pub fn extract_toc<P: AsRef<Path>>(path: P, space: CoordinateSpace) -> Result<Vec<TocEntry>> {
    let doc = PdfDocument::open(path)?;
    extract_toc_from_doc(&doc, space)
}

pub fn extract_toc_from_doc(doc: &PdfDocument, space: CoordinateSpace) -> Result<Vec<TocEntry>> {
    let catalog = doc
        .doc
        .catalog()
        .with_context(|| format!("Failed to get document catalog: {}", doc.path))?;

    let outlines = match catalog.get(b"Outlines").ok().and_then(|o| doc.resolve(o)) {
        Some(Object::Dictionary(d)) => d,
        _ => return Ok(Vec::new()), // No outlines/bookmarks
    };

    let first_ref = match outlines.get(b"First") {
        Ok(Object::Reference(r)) => *r,
        _ => return Ok(Vec::new()),
    };

    let mut walker = OutlineWalker {
        doc,
        space,
        page_map: doc.page_numbers(),
        visited: HashSet::new(),
        entries: Vec::new(),
    };
    walker.walk(first_ref, 1)?;

    Ok(walker.entries)
}

struct OutlineWalker<'a> {
    doc: &'a PdfDocument,
    space: CoordinateSpace,
    page_map: HashMap<ObjectId, u32>,
    visited: HashSet<ObjectId>,
    entries: Vec<TocEntry>,
}

impl OutlineWalker<'_> {
    fn walk(&mut self, first_id: ObjectId, level: u32) -> Result<()> {
        let doc = self.doc;
        let mut current_id = Some(first_id);

        while let Some(id) = current_id {
            // Outline items that loop back are broken, stop there
            if !self.visited.insert(id) {
                break;
            }
            let dict = match doc.doc.get_dictionary(id) {
                Ok(d) => d,
                Err(_) => break,
            };

            let title = match dict.get(b"Title").ok().and_then(|t| doc.resolve(t)) {
                Some(Object::String(bytes, _)) => decode_pdf_string(bytes),
                _ => "Untitled".to_string(),
            };

            let entry = match self.destination(dict) {
                Some(dest) => TocEntry {
                    level,
                    title,
                    page: Some(dest.page),
                    point: self.to_space(dest.page, dest.point.unwrap_or(Point::ZERO))?,
                },
                None => TocEntry {
                    level,
                    title,
                    page: None,
                    point: Point::ZERO,
                },
            };
            self.entries.push(entry);

            if let Ok(Object::Reference(child_ref)) = dict.get(b"First") {
                self.walk(*child_ref, level + 1)?;
            }

            current_id = match dict.get(b"Next") {
                Ok(Object::Reference(r)) => Some(*r),
                _ => None,
            };
        }

        Ok(())
    }

    /// Convert a point on `page` into the requested space, using that page's own transform
    fn to_space(&self, page: u32, point: Point) -> Result<Point> {
        match self.space {
            CoordinateSpace::Pdf => Ok(point),
            CoordinateSpace::Device => Ok(point * self.doc.page_transform(page)?),
        }
    }

    fn destination(&self, dict: &Dictionary) -> Option<Destination> {
        // Try Dest first (direct destination)
        if let Ok(dest) = dict.get(b"Dest") {
            return self.resolve_destination(dest, 0);
        }

        // Try A (action) - for GoTo actions, inline or referenced
        let action = match dict.get(b"A").ok().and_then(|a| self.doc.resolve(a)) {
            Some(Object::Dictionary(action)) => action,
            _ => return None,
        };
        match action.get(b"S") {
            Ok(Object::Name(action_type)) if action_type == b"GoTo" => {
                self.resolve_destination(action.get(b"D").ok()?, 0)
            }
            _ => None,
        }
    }

    fn resolve_destination(&self, dest: &Object, depth: usize) -> Option<Destination> {
        if depth > MAX_DEPTH {
            return None;
        }

        match dest {
            // Named destination - look up in Names/Dests
            Object::String(name, _) | Object::Name(name) => {
                self.resolve_named_destination(name, depth + 1)
            }
            // Direct destination array
            Object::Array(arr) => self.destination_from_array(arr),
            // Named destinations may map to << /D [...] >>
            Object::Dictionary(d) => self.resolve_destination(d.get(b"D").ok()?, depth + 1),
            Object::Reference(r) => {
                let obj = self.doc.doc.get_object(*r).ok()?;
                self.resolve_destination(obj, depth + 1)
            }
            _ => None,
        }
    }

    fn resolve_named_destination(&self, name: &[u8], depth: usize) -> Option<Destination> {
        let catalog = self.doc.doc.catalog().ok()?;

        // Names/Dests name tree
        if let Some(Object::Dictionary(names)) =
            catalog.get(b"Names").ok().and_then(|n| self.doc.resolve(n))
        {
            if let Ok(dests) = names.get(b"Dests") {
                if let Some(dest) = self.search_name_tree(dests, name, depth) {
                    return Some(dest);
                }
            }
        }

        // Dests dictionary (older style)
        if let Some(Object::Dictionary(dests)) =
            catalog.get(b"Dests").ok().and_then(|d| self.doc.resolve(d))
        {
            if let Ok(dest) = dests.get(name) {
                return self.resolve_destination(dest, depth + 1);
            }
        }

        None
    }

    fn search_name_tree(&self, node: &Object, name: &[u8], depth: usize) -> Option<Destination> {
        if depth > MAX_DEPTH {
            return None;
        }
        let dict = match self.doc.resolve(node)? {
            Object::Dictionary(d) => d,
            _ => return None,
        };

        // Check Names array (leaf node)
        if let Some(Object::Array(names)) =
            dict.get(b"Names").ok().and_then(|n| self.doc.resolve(n))
        {
            for pair in names.chunks_exact(2) {
                if let Some(Object::String(key, _)) = self.doc.resolve(&pair[0]) {
                    if key == name {
                        return self.resolve_destination(&pair[1], depth + 1);
                    }
                }
            }
        }

        // Check Kids array (intermediate node)
        if let Some(Object::Array(kids)) =
            dict.get(b"Kids").ok().and_then(|k| self.doc.resolve(k))
        {
            for kid in kids {
                if let Some(dest) = self.search_name_tree(kid, name, depth + 1) {
                    return Some(dest);
                }
            }
        }

        None
    }

    /// Destination array format: `[page /XYZ left top zoom]`, `[page /FitH top]`, ...
    fn destination_from_array(&self, arr: &[Object]) -> Option<Destination> {
        let page = match arr.first()? {
            Object::Reference(page_ref) => *self.page_map.get(page_ref)?,
            // Some producers write a 0-based page index instead of a reference
            Object::Integer(index) => {
                let page = u32::try_from(*index).ok()? + 1;
                (page <= self.page_map.len() as u32).then_some(page)?
            }
            _ => return None,
        };

        let coord = |i: usize| arr.get(i).and_then(|v| self.doc.number(v)).unwrap_or(0.0);
        let point = match arr.get(1) {
            Some(Object::Name(kind)) => match kind.as_slice() {
                b"XYZ" => Some(Point::new(coord(2), coord(3))),
                b"FitH" | b"FitBH" => Some(Point::new(0.0, coord(2))),
                b"FitV" | b"FitBV" => Some(Point::new(coord(2), 0.0)),
                b"FitR" => Some(Point::new(coord(2), coord(5))),
                _ => None,
            },
            _ => None,
        };

        Some(Destination { page, point })
    }
}

/// Selector labels: titles indented by nesting level
pub fn toc_labels(entries: &[TocEntry]) -> Vec<String> {
    entries
        .iter()
        .map(|e| {
            let indent = "  ".repeat(e.level.saturating_sub(1) as usize);
            format!("{}{}", indent, e.title)
        })
        .collect()
}
