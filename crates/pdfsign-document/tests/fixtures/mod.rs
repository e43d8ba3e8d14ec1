//! In-memory PDFs and signature images for document tests.

#![allow(dead_code)]

use std::io::Cursor;

use lopdf::{dictionary, Document, Object, ObjectId, Stream};

/// Builds a PDF whose pages have the given media boxes. Page 1 carries a
/// text content stream; the others have none. All pages share one indirect
/// resource dictionary through the `Pages` node.
pub fn pdf_with_pages(media_boxes: &[[i64; 4]]) -> Vec<u8> {
    let mut doc = Document::with_version("1.7");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids = Vec::new();
    for (i, media_box) in media_boxes.iter().enumerate() {
        let mut page = dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => media_box.iter().map(|v| Object::Integer(*v)).collect::<Vec<_>>(),
        };
        if i == 0 {
            let content = Stream::new(
                dictionary! {},
                b"BT /F1 12 Tf 72 720 Td (Hello) Tj ET".to_vec(),
            );
            page.set("Contents", doc.add_object(content));
        }
        kids.push(Object::Reference(doc.add_object(page)));
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "Resources" => resources_id,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", Object::Reference(catalog_id));

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).unwrap();
    buffer
}

/// Letter page followed by an A4 page.
pub fn letter_and_a4() -> Vec<u8> {
    pdf_with_pages(&[[0, 0, 612, 792], [0, 0, 595, 842]])
}

/// A transparent PNG with a black horizontal line through the middle.
pub fn signature_png(width: u32, height: u32) -> Vec<u8> {
    let mut img = image::RgbaImage::new(width, height);
    for x in 0..width {
        img.put_pixel(x, height / 2, image::Rgba([0, 0, 0, 255]));
    }
    let mut out = Cursor::new(Vec::new());
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut out, image::ImageFormat::Png)
        .unwrap();
    out.into_inner()
}

pub fn page_id(doc: &Document, page_number: u32) -> ObjectId {
    *doc.get_pages().get(&page_number).unwrap()
}

/// Raw bytes of every content stream on the page, in drawing order.
pub fn page_streams(doc: &Document, page_number: u32) -> Vec<Vec<u8>> {
    let page = doc
        .get_object(page_id(doc, page_number))
        .unwrap()
        .as_dict()
        .unwrap();
    let refs: Vec<ObjectId> = match page.get(b"Contents") {
        Ok(Object::Array(items)) => items.iter().map(|o| o.as_reference().unwrap()).collect(),
        Ok(Object::Reference(id)) => vec![*id],
        _ => Vec::new(),
    };
    refs.into_iter()
        .map(|id| {
            let stream = doc.get_object(id).unwrap().as_stream().unwrap();
            stream
                .decompressed_content()
                .unwrap_or_else(|_| stream.content.clone())
        })
        .collect()
}

/// The page's direct XObject resource dictionary.
pub fn page_xobjects(doc: &Document, page_number: u32) -> Option<lopdf::Dictionary> {
    let page = doc
        .get_object(page_id(doc, page_number))
        .ok()?
        .as_dict()
        .ok()?;
    let resources = match page.get(b"Resources").ok()? {
        Object::Reference(id) => doc.get_object(*id).ok()?.as_dict().ok()?,
        Object::Dictionary(dict) => dict,
        _ => return None,
    };
    match resources.get(b"XObject").ok()? {
        Object::Dictionary(dict) => Some(dict.clone()),
        _ => None,
    }
}
