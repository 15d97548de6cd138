//! Builds small PDFs with outlines for tests

use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, StringFormat};
use std::path::PathBuf;

pub struct FixturePage {
    media_box: Option<[f32; 4]>,
    crop_box: Option<[f32; 4]>,
    rotate: Option<i64>,
}

impl FixturePage {
    pub fn sized(width: f32, height: f32) -> Self {
        FixturePage {
            media_box: Some([0.0, 0.0, width, height]),
            crop_box: None,
            rotate: None,
        }
    }

    /// A page taking its MediaBox (500x700) from the page tree
    pub fn inherited() -> Self {
        FixturePage {
            media_box: None,
            crop_box: None,
            rotate: None,
        }
    }

    pub fn rotated(mut self, degrees: i64) -> Self {
        self.rotate = Some(degrees);
        self
    }

    pub fn cropped(mut self, x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        self.crop_box = Some([x0, y0, x1, y1]);
        self
    }
}

/// Where an outline item points; `page` is 0-indexed into the fixture pages
pub enum Target {
    /// `/Dest [page /View args...]`
    Explicit { page: usize, view: Vec<Object> },
    /// `/A << /S /GoTo /D [page /View args...] >>`
    GoTo { page: usize, view: Vec<Object> },
    /// `/Dest (name)` resolved through the `/Names` `/Dests` tree
    Named(&'static str),
    /// `/Dest /name` resolved through the catalog `/Dests` dictionary
    LegacyNamed(&'static str),
    Nowhere,
}

impl Target {
    pub fn xyz(page: usize, left: f32, top: f32) -> Self {
        Target::Explicit {
            page,
            view: vec!["XYZ".into(), left.into(), top.into(), Object::Null],
        }
    }
}

pub struct Item {
    title: &'static str,
    target: Target,
    children: Vec<Item>,
}

impl Item {
    pub fn new(title: &'static str, target: Target) -> Self {
        Item {
            title,
            target,
            children: Vec::new(),
        }
    }

    pub fn child(mut self, child: Item) -> Self {
        self.children.push(child);
        self
    }
}

pub struct PdfFixture {
    pages: Vec<FixturePage>,
    outline: Vec<Item>,
    named: Vec<(&'static str, usize, Vec<Object>)>,
}

impl PdfFixture {
    pub fn new(pages: Vec<FixturePage>) -> Self {
        PdfFixture {
            pages,
            outline: Vec::new(),
            named: Vec::new(),
        }
    }

    pub fn item(mut self, item: Item) -> Self {
        self.outline.push(item);
        self
    }

    /// Register a named destination usable by [`Target::Named`] and [`Target::LegacyNamed`]
    pub fn named(mut self, name: &'static str, page: usize, view: Vec<Object>) -> Self {
        self.named.push((name, page, view));
        self
    }

    pub fn build(&self) -> Document {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let page_ids: Vec<ObjectId> = self
            .pages
            .iter()
            .map(|page| {
                let mut dict = dictionary! {
                    "Type" => "Page",
                    "Parent" => pages_id,
                };
                if let Some(b) = page.media_box {
                    dict.set("MediaBox", rect(b));
                }
                if let Some(b) = page.crop_box {
                    dict.set("CropBox", rect(b));
                }
                if let Some(r) = page.rotate {
                    dict.set("Rotate", r);
                }
                doc.add_object(dict)
            })
            .collect();

        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => page_ids.iter().map(|id| Object::Reference(*id)).collect::<Vec<_>>(),
                "Count" => page_ids.len() as i64,
                "MediaBox" => rect([0.0, 0.0, 500.0, 700.0]),
            }),
        );

        let mut catalog = dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        };

        if !self.named.is_empty() {
            let mut tree = Vec::new();
            let mut legacy = Dictionary::new();
            for (name, page, view) in &self.named {
                let dest = dest_array(&page_ids, *page, view);
                tree.push(Object::string_literal(*name));
                tree.push(dest.clone());
                legacy.set(*name, dest);
            }
            let tree_id = doc.add_object(dictionary! { "Names" => tree });
            let names_id = doc.add_object(dictionary! { "Dests" => tree_id });
            catalog.set("Names", names_id);
            catalog.set("Dests", doc.add_object(legacy));
        }

        if !self.outline.is_empty() {
            let outlines_id = doc.new_object_id();
            let (first, last) = add_items(&mut doc, &self.outline, outlines_id, &page_ids);
            doc.objects.insert(
                outlines_id,
                Object::Dictionary(dictionary! {
                    "Type" => "Outlines",
                    "First" => first,
                    "Last" => last,
                    "Count" => self.outline.len() as i64,
                }),
            );
            catalog.set("Outlines", outlines_id);
        }

        let catalog_id = doc.add_object(catalog);
        doc.trailer.set("Root", catalog_id);
        doc
    }

    /// Write the fixture into a fresh temporary directory
    pub fn save(&self) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fixture.pdf");
        self.build().save(&path).unwrap();
        (dir, path)
    }
}

fn rect(b: [f32; 4]) -> Vec<Object> {
    b.iter().map(|v| Object::from(*v)).collect()
}

fn dest_array(page_ids: &[ObjectId], page: usize, view: &[Object]) -> Object {
    let mut arr = vec![Object::Reference(page_ids[page])];
    arr.extend(view.iter().cloned());
    Object::Array(arr)
}

/// Add sibling items under `parent`, returning the first and last item IDs
fn add_items(
    doc: &mut Document,
    items: &[Item],
    parent: ObjectId,
    page_ids: &[ObjectId],
) -> (ObjectId, ObjectId) {
    let ids: Vec<ObjectId> = items.iter().map(|_| doc.new_object_id()).collect();

    for (i, item) in items.iter().enumerate() {
        let mut dict = dictionary! {
            "Title" => Object::String(item.title.as_bytes().to_vec(), StringFormat::Literal),
            "Parent" => parent,
        };
        if i > 0 {
            dict.set("Prev", ids[i - 1]);
        }
        if i + 1 < ids.len() {
            dict.set("Next", ids[i + 1]);
        }

        match &item.target {
            Target::Explicit { page, view } => dict.set("Dest", dest_array(page_ids, *page, view)),
            Target::GoTo { page, view } => dict.set(
                "A",
                dictionary! {
                    "S" => "GoTo",
                    "D" => dest_array(page_ids, *page, view),
                },
            ),
            Target::Named(name) => dict.set("Dest", Object::string_literal(*name)),
            Target::LegacyNamed(name) => dict.set("Dest", Object::Name(name.as_bytes().to_vec())),
            Target::Nowhere => {}
        }

        if !item.children.is_empty() {
            let (first, last) = add_items(doc, &item.children, ids[i], page_ids);
            dict.set("First", first);
            dict.set("Last", last);
            dict.set("Count", item.children.len() as i64);
        }

        doc.objects.insert(ids[i], Object::Dictionary(dict));
    }

    (ids[0], ids[ids.len() - 1])
}
