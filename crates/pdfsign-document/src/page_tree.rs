//! Page tree lookups shared by the renderer and the mutator.
//!
//! Page attributes such as `MediaBox` and `Resources` may live on any
//! ancestor `Pages` node; lookups walk `/Parent` links until they find one.

use lopdf::{Dictionary, Document, Object, ObjectId};
use pdfsign_core::constants::FALLBACK_PAGE_SIZE;
use pdfsign_core::Dimensions;
use tracing::warn;

/// Guards against `/Parent` cycles in damaged files.
const MAX_TREE_DEPTH: usize = 64;

/// A page box `[llx lly urx ury]` in PDF points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageBox {
    pub llx: f64,
    pub lly: f64,
    pub urx: f64,
    pub ury: f64,
}

impl PageBox {
    pub fn width(&self) -> f64 {
        (self.urx - self.llx).abs()
    }

    pub fn height(&self) -> f64 {
        (self.ury - self.lly).abs()
    }

    /// Lower-left corner; the origin document-space rectangles are relative to.
    pub fn origin(&self) -> (f64, f64) {
        (self.llx.min(self.urx), self.lly.min(self.ury))
    }

    pub fn dimensions(&self) -> Dimensions {
        Dimensions::new(self.width(), self.height())
    }

    fn fallback() -> Self {
        let (width, height) = FALLBACK_PAGE_SIZE;
        Self {
            llx: 0.0,
            lly: 0.0,
            urx: width,
            ury: height,
        }
    }
}

pub(crate) fn object_to_f64(obj: &Object) -> Option<f64> {
    match obj {
        Object::Integer(i) => Some(*i as f64),
        Object::Real(f) => Some(f64::from(*f)),
        _ => None,
    }
}

/// Follows a single indirect reference, if `obj` is one.
pub(crate) fn resolve<'a>(doc: &'a Document, obj: &'a Object) -> Option<&'a Object> {
    match obj {
        Object::Reference(id) => doc.get_object(*id).ok(),
        other => Some(other),
    }
}

/// Looks up `key` on the page or the nearest ancestor that defines it.
pub fn resolve_inherited<'a>(doc: &'a Document, page_id: ObjectId, key: &[u8]) -> Option<&'a Object> {
    let mut current = Some(page_id);
    let mut depth = 0;
    while let Some(id) = current {
        if depth > MAX_TREE_DEPTH {
            warn!("Page tree deeper than {} levels; stopping lookup", MAX_TREE_DEPTH);
            return None;
        }
        let dict = doc.get_object(id).and_then(Object::as_dict).ok()?;
        if let Ok(value) = dict.get(key) {
            return Some(value);
        }
        current = dict.get(b"Parent").and_then(Object::as_reference).ok();
        depth += 1;
    }
    None
}

fn box_from_object(doc: &Document, obj: &Object) -> Option<PageBox> {
    let array = resolve(doc, obj)?.as_array().ok()?;
    if array.len() != 4 {
        return None;
    }
    let mut values = [0.0; 4];
    for (slot, item) in values.iter_mut().zip(array) {
        *slot = object_to_f64(resolve(doc, item)?)?;
    }
    let page_box = PageBox {
        llx: values[0],
        lly: values[1],
        urx: values[2],
        ury: values[3],
    };
    (page_box.width() > 0.0 && page_box.height() > 0.0).then_some(page_box)
}

/// The page's `MediaBox`, falling back to US Letter when none is usable.
pub fn media_box(doc: &Document, page_id: ObjectId) -> PageBox {
    match resolve_inherited(doc, page_id, b"MediaBox").and_then(|obj| box_from_object(doc, obj)) {
        Some(page_box) => page_box,
        None => {
            warn!("Page {:?} has no usable MediaBox; assuming US Letter", page_id);
            PageBox::fallback()
        }
    }
}

/// A private copy of the page's effective resource dictionary.
///
/// Inherited and indirect dictionaries are cloned so the caller can modify
/// the copy without touching resources shared with other pages. Indirect
/// `XObject` sub-dictionaries are inlined for the same reason.
pub fn owned_resources(doc: &Document, page_id: ObjectId) -> Dictionary {
    let mut resources = resolve_inherited(doc, page_id, b"Resources")
        .and_then(|obj| resolve(doc, obj))
        .and_then(|obj| obj.as_dict().ok())
        .cloned()
        .unwrap_or_default();

    let xobjects = resources
        .get(b"XObject")
        .ok()
        .and_then(|obj| resolve(doc, obj))
        .and_then(|obj| obj.as_dict().ok())
        .cloned();
    if let Some(xobjects) = xobjects {
        resources.set("XObject", Object::Dictionary(xobjects));
    }
    resources
}

/// Content stream references of a page, in drawing order.
///
/// `Contents` may be a single stream reference, an array of references, or
/// a reference to such an array; a page without content yields an empty list.
pub fn content_refs(doc: &Document, page: &Dictionary) -> Option<Vec<Object>> {
    let Ok(contents) = page.get(b"Contents") else {
        return Some(Vec::new());
    };
    match contents {
        Object::Reference(id) => match doc.get_object(*id).ok()? {
            Object::Array(items) => Some(items.clone()),
            Object::Stream(_) => Some(vec![Object::Reference(*id)]),
            _ => None,
        },
        Object::Array(items) => Some(items.clone()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::dictionary;

    fn two_level_tree(media_box: Option<Object>) -> (Document, ObjectId) {
        let mut doc = Document::with_version("1.7");
        let pages_id = doc.new_object_id();
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
        });
        let mut pages = dictionary! {
            "Type" => "Pages",
            "Kids" => vec![Object::Reference(page_id)],
            "Count" => 1,
        };
        if let Some(media_box) = media_box {
            pages.set("MediaBox", media_box);
        }
        doc.objects.insert(pages_id, Object::Dictionary(pages));
        (doc, page_id)
    }

    #[test]
    fn test_media_box_inherited_from_parent() {
        let (doc, page_id) =
            two_level_tree(Some(Object::Array(vec![0.into(), 0.into(), 595.into(), 842.into()])));
        let page_box = media_box(&doc, page_id);
        assert_eq!(page_box.dimensions(), Dimensions::new(595.0, 842.0));
    }

    #[test]
    fn test_media_box_with_offset_origin() {
        let (doc, page_id) = two_level_tree(Some(Object::Array(vec![
            Object::Real(10.5),
            20.into(),
            622.into(),
            812.into(),
        ])));
        let page_box = media_box(&doc, page_id);
        assert_eq!(page_box.origin(), (10.5, 20.0));
        assert!((page_box.width() - 611.5).abs() < 1e-9);
    }

    #[test]
    fn test_missing_media_box_falls_back_to_letter() {
        let (doc, page_id) = two_level_tree(None);
        assert_eq!(media_box(&doc, page_id).dimensions(), Dimensions::new(612.0, 792.0));
    }

    #[test]
    fn test_degenerate_media_box_falls_back() {
        let (doc, page_id) =
            two_level_tree(Some(Object::Array(vec![0.into(), 0.into(), 0.into(), 792.into()])));
        assert_eq!(media_box(&doc, page_id).width(), 612.0);
    }

    #[test]
    fn test_page_without_contents() {
        let (doc, page_id) = two_level_tree(None);
        let page = doc.get_object(page_id).unwrap().as_dict().unwrap();
        assert!(content_refs(&doc, page).is_some_and(|refs| refs.is_empty()));
    }
}
