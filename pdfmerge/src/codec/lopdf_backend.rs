//! [`PdfCodec`] implementation backed by `lopdf`.

use super::{CodecError, PdfCodec};
use lopdf::{Dictionary, Document, Object, ObjectId, dictionary};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Version header written into merged documents.
const OUTPUT_VERSION: &str = "1.7";

/// Page attributes a page may inherit from its ancestors in the page tree.
const INHERITABLE_ATTRIBUTES: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Upper bound on page tree depth when resolving inherited attributes.
const MAX_TREE_DEPTH: usize = 64;

/// Codec backed by the `lopdf` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct LopdfCodec;

impl LopdfCodec {
    /// Create a new codec.
    pub fn new() -> Self {
        Self
    }
}

impl From<lopdf::Error> for CodecError {
    fn from(err: lopdf::Error) -> Self {
        CodecError::new(err.to_string())
    }
}

impl PdfCodec for LopdfCodec {
    type Document = Document;

    fn decode(&self, bytes: &[u8]) -> Result<Document, CodecError> {
        let document = Document::load_mem(bytes)?;

        if document.is_encrypted() {
            return Err(CodecError::new("document is encrypted"));
        }

        Ok(document)
    }

    fn page_count(&self, document: &Document) -> usize {
        document.get_pages().len()
    }

    fn new_document(&self) -> Document {
        let mut document = Document::with_version(OUTPUT_VERSION);

        let pages_id = document.new_object_id();
        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => Vec::<Object>::new(),
            "Count" => 0,
        };
        document.objects.insert(pages_id, pages.into());

        let catalog_id = document.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        document.trailer.set("Root", catalog_id);

        document
    }

    fn copy_pages(
        &self,
        source: &Document,
        pages: &[usize],
        target: &mut Document,
    ) -> Result<(), CodecError> {
        let source_pages: Vec<ObjectId> = source.get_pages().into_values().collect();
        let pages_root = pages_root_id(target)?;

        let mut copier = ObjectCopier::new(source, target);

        // Page ids are reserved first so that references between copied
        // pages (link annotations, named destinations) resolve to the copies.
        let mut planned = Vec::with_capacity(pages.len());
        for &index in pages {
            let source_id = *source_pages.get(index).ok_or_else(|| {
                CodecError::new(format!(
                    "page index {index} out of range for document with {} pages",
                    source_pages.len()
                ))
            })?;

            if copier.ids.contains_key(&source_id) {
                return Err(CodecError::new(format!("page index {index} listed twice")));
            }

            let target_id = copier.target.new_object_id();
            copier.ids.insert(source_id, target_id);
            planned.push((source_id, target_id));
        }

        for &(source_id, target_id) in &planned {
            copier.copy_page(source_id, target_id, pages_root)?;
        }

        debug!(
            pages = planned.len(),
            objects = copier.ids.len(),
            "Copied pages into target document"
        );

        append_kids(
            target,
            pages_root,
            planned.iter().map(|&(_, target_id)| target_id),
        )
    }

    fn encode(&self, mut document: Document) -> Result<Vec<u8>, CodecError> {
        let mut buffer = Vec::new();
        document
            .save_to(&mut buffer)
            .map_err(|err| CodecError::new(err.to_string()))?;
        Ok(buffer)
    }
}

/// Deep copy of objects from one document into another.
///
/// Every source object is copied at most once; `ids` maps source ids to the
/// ids allocated in the target. The mapping is recorded before recursing so
/// reference cycles terminate.
struct ObjectCopier<'a> {
    source: &'a Document,
    target: &'a mut Document,
    ids: HashMap<ObjectId, ObjectId>,
}

impl<'a> ObjectCopier<'a> {
    fn new(source: &'a Document, target: &'a mut Document) -> Self {
        Self {
            source,
            target,
            ids: HashMap::new(),
        }
    }

    fn copy_page(
        &mut self,
        source_id: ObjectId,
        target_id: ObjectId,
        parent_id: ObjectId,
    ) -> Result<(), CodecError> {
        let source = self.source;
        let page = source.get_dictionary(source_id).map_err(|err| {
            CodecError::new(format!(
                "page object {} {} is unreadable: {err}",
                source_id.0, source_id.1
            ))
        })?;

        let mut page = page.clone();
        for key in INHERITABLE_ATTRIBUTES {
            if !page.has(key)
                && let Some(value) = inherited_attribute(source, source_id, key)
            {
                page.set(key, value.clone());
            }
        }
        page.remove(b"Parent");

        let mut copied = self.copy_dictionary(&page)?;
        copied.set("Parent", Object::Reference(parent_id));
        self.target
            .objects
            .insert(target_id, Object::Dictionary(copied));

        Ok(())
    }

    fn copy_object(&mut self, object: &Object) -> Result<Object, CodecError> {
        match object {
            Object::Reference(id) => {
                Ok(self.copy_reference(*id)?.map_or(Object::Null, Object::Reference))
            }
            Object::Array(items) => items
                .iter()
                .map(|item| self.copy_object(item))
                .collect::<Result<Vec<_>, _>>()
                .map(Object::Array),
            Object::Dictionary(dict) => self.copy_dictionary(dict).map(Object::Dictionary),
            Object::Stream(stream) => {
                let mut copied = stream.clone();
                copied.dict = self.copy_dictionary(&stream.dict)?;
                Ok(Object::Stream(copied))
            }
            other => Ok(other.clone()),
        }
    }

    fn copy_dictionary(&mut self, dict: &Dictionary) -> Result<Dictionary, CodecError> {
        let mut copied = Dictionary::new();
        for (key, value) in dict.iter() {
            copied.set(key.clone(), self.copy_object(value)?);
        }
        Ok(copied)
    }

    /// Copy the object behind `id`, returning its id in the target.
    ///
    /// Returns `None` for dangling references and for page tree nodes that are
    /// not part of the copy; both become `null` in the target.
    fn copy_reference(&mut self, id: ObjectId) -> Result<Option<ObjectId>, CodecError> {
        if let Some(&mapped) = self.ids.get(&id) {
            return Ok(Some(mapped));
        }

        let source = self.source;
        let object = match source.get_object(id) {
            Ok(object) => object,
            Err(err) => {
                warn!(object = ?id, %err, "Dangling reference replaced with null");
                return Ok(None);
            }
        };

        if is_page_tree_node(object) {
            return Ok(None);
        }

        let new_id = self.target.new_object_id();
        self.ids.insert(id, new_id);

        let copied = self.copy_object(object)?;
        self.target.objects.insert(new_id, copied);

        Ok(Some(new_id))
    }
}

fn is_page_tree_node(object: &Object) -> bool {
    let dict = match object {
        Object::Dictionary(dict) => dict,
        _ => return false,
    };

    matches!(
        dict.get(b"Type").and_then(Object::as_name),
        Ok(b"Page") | Ok(b"Pages")
    )
}

/// Look up an attribute on the ancestors of a page.
fn inherited_attribute<'a>(
    source: &'a Document,
    page_id: ObjectId,
    key: &[u8],
) -> Option<&'a Object> {
    let mut node = source.get_dictionary(page_id).ok()?;

    for _ in 0..MAX_TREE_DEPTH {
        let parent_id = node.get(b"Parent").and_then(Object::as_reference).ok()?;
        node = source.get_dictionary(parent_id).ok()?;

        if let Ok(value) = node.get(key) {
            return Some(value);
        }
    }

    None
}

fn pages_root_id(document: &Document) -> Result<ObjectId, CodecError> {
    document
        .catalog()
        .and_then(|catalog| catalog.get(b"Pages"))
        .and_then(Object::as_reference)
        .map_err(|err| CodecError::new(format!("target has no page tree: {err}")))
}

fn append_kids(
    document: &mut Document,
    pages_root: ObjectId,
    kids: impl Iterator<Item = ObjectId>,
) -> Result<(), CodecError> {
    let pages = document.get_dictionary_mut(pages_root)?;

    let added = {
        let array = pages
            .get_mut(b"Kids")
            .and_then(Object::as_array_mut)
            .map_err(|_| CodecError::new("page tree root is missing its Kids array"))?;
        let before = array.len();
        array.extend(kids.map(Object::Reference));
        array.len() - before
    };

    let count = pages.get(b"Count").and_then(Object::as_i64).unwrap_or(0);
    pages.set("Count", Object::Integer(count + added as i64));

    Ok(())
}
