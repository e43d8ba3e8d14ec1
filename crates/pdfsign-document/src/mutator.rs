//! Signature embedding.
//!
//! [`LopdfMutator`] stamps the signature PNG onto one page as an image
//! XObject with a soft mask, so the transparent background of the capture
//! stays transparent on the page. The page's existing content is wrapped in
//! `q ... Q` first so a leftover graphics state cannot move the stamp.

use async_trait::async_trait;
use lopdf::{dictionary, Document, Object, ObjectId, Stream};
use pdfsign_core::DocumentRect;
use tracing::{debug, info};

use crate::error::MutationError;
use crate::page_tree;

/// Base name for the stamp in the page's XObject resources.
const XOBJECT_NAME_BASE: &str = "PdfSignIm";

/// Document mutator trait
///
/// Produces a new document with the signature image drawn into `rect`
/// (PDF points, origin at the page's lower-left corner) on the page at
/// 0-based `page_index`. The source bytes are never modified.
#[async_trait(?Send)]
pub trait DocumentMutator {
    async fn embed_image(
        &self,
        source: &[u8],
        png: &[u8],
        page_index: u32,
        rect: &DocumentRect,
    ) -> Result<Vec<u8>, MutationError>;
}

/// Decoded signature split into the colour and alpha planes PDF expects.
struct StampImage {
    width: u32,
    height: u32,
    rgb: Vec<u8>,
    alpha: Vec<u8>,
}

impl StampImage {
    fn decode(png: &[u8]) -> Result<Self, MutationError> {
        if png.is_empty() {
            return Err(MutationError::InvalidImage {
                reason: "empty image".into(),
            });
        }
        let rgba = image::load_from_memory(png)
            .map_err(|e| MutationError::InvalidImage {
                reason: e.to_string(),
            })?
            .to_rgba8();
        let (width, height) = rgba.dimensions();

        let pixel_count = (width as usize) * (height as usize);
        let mut rgb = Vec::with_capacity(pixel_count * 3);
        let mut alpha = Vec::with_capacity(pixel_count);
        for pixel in rgba.pixels() {
            rgb.extend_from_slice(&pixel.0[..3]);
            alpha.push(pixel.0[3]);
        }
        Ok(Self {
            width,
            height,
            rgb,
            alpha,
        })
    }
}

/// Embeds signatures with lopdf.
#[derive(Debug, Clone)]
pub struct LopdfMutator {
    compress: bool,
}

impl Default for LopdfMutator {
    fn default() -> Self {
        Self { compress: true }
    }
}

impl LopdfMutator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flate-compress the image and content streams (on by default).
    pub fn with_compression(mut self, compress: bool) -> Self {
        self.compress = compress;
        self
    }

    fn add_stream(&self, doc: &mut Document, mut stream: Stream) -> Result<ObjectId, MutationError> {
        if self.compress {
            stream.compress().map_err(|e| MutationError::Write {
                reason: format!("stream compression failed: {e}"),
            })?;
        }
        Ok(doc.add_object(stream))
    }

    fn add_image(&self, doc: &mut Document, image: StampImage) -> Result<ObjectId, MutationError> {
        let smask_id = self.add_stream(
            doc,
            Stream::new(
                dictionary! {
                    "Type" => "XObject",
                    "Subtype" => "Image",
                    "Width" => image.width as i64,
                    "Height" => image.height as i64,
                    "ColorSpace" => "DeviceGray",
                    "BitsPerComponent" => 8,
                },
                image.alpha,
            ),
        )?;
        self.add_stream(
            doc,
            Stream::new(
                dictionary! {
                    "Type" => "XObject",
                    "Subtype" => "Image",
                    "Width" => image.width as i64,
                    "Height" => image.height as i64,
                    "ColorSpace" => "DeviceRGB",
                    "BitsPerComponent" => 8,
                    "SMask" => smask_id,
                },
                image.rgb,
            ),
        )
    }

    /// Pure function of its inputs: the same source, image, page and rect
    /// always produce the same bytes.
    pub fn embed(
        &self,
        source: &[u8],
        png: &[u8],
        page_index: u32,
        rect: &DocumentRect,
    ) -> Result<Vec<u8>, MutationError> {
        validate_rect(rect)?;
        let image = StampImage::decode(png)?;
        let mut doc =
            Document::load_mem(source).map_err(|e| MutationError::Parse { reason: e.to_string() })?;

        let pages = doc.get_pages();
        let page_id = *pages
            .get(&(page_index + 1))
            .ok_or(MutationError::PageOutOfRange {
                index: page_index,
                count: pages.len() as u32,
            })?;

        let (origin_x, origin_y) = page_tree::media_box(&doc, page_id).origin();
        let mut resources = page_tree::owned_resources(&doc, page_id);
        let existing_contents = {
            let page = doc
                .get_object(page_id)
                .and_then(Object::as_dict)
                .map_err(|_| MutationError::structure("page object is not a dictionary"))?;
            page_tree::content_refs(&doc, page)
                .ok_or_else(|| MutationError::structure("unsupported /Contents entry"))?
        };

        let image_id = self.add_image(&mut doc, image)?;

        let mut xobjects = match resources.get(b"XObject") {
            Ok(Object::Dictionary(dict)) => dict.clone(),
            _ => lopdf::Dictionary::new(),
        };
        let name = unique_name(&xobjects);
        xobjects.set(name.as_bytes().to_vec(), Object::Reference(image_id));
        resources.set("XObject", Object::Dictionary(xobjects));

        let draw = format!(
            "q {} 0 0 {} {} {} cm /{} Do Q\n",
            pdf_number(rect.width),
            pdf_number(rect.height),
            pdf_number(origin_x + rect.x),
            pdf_number(origin_y + rect.y),
            name
        );

        let mut contents = Vec::with_capacity(existing_contents.len() + 2);
        if existing_contents.is_empty() {
            contents.push(self.add_stream(&mut doc, Stream::new(dictionary! {}, draw.into_bytes()))?);
        } else {
            let save = self.add_stream(&mut doc, Stream::new(dictionary! {}, b"q\n".to_vec()))?;
            let stamp = format!("\nQ\n{}", draw);
            let restore =
                self.add_stream(&mut doc, Stream::new(dictionary! {}, stamp.into_bytes()))?;
            contents.push(save);
            contents.extend(existing_contents.iter().filter_map(|obj| obj.as_reference().ok()));
            contents.push(restore);
        }

        {
            let page = doc
                .get_object_mut(page_id)
                .and_then(Object::as_dict_mut)
                .map_err(|_| MutationError::structure("page object is not a dictionary"))?;
            page.set("Resources", Object::Dictionary(resources));
            page.set(
                "Contents",
                Object::Array(contents.into_iter().map(Object::Reference).collect()),
            );
        }
        debug!("Stamped /{} on page {} at {}", name, page_index + 1, rect);

        let mut output = Vec::new();
        doc.save_to(&mut output)
            .map_err(|e| MutationError::Write { reason: e.to_string() })?;
        info!(
            "Embedded signature on page {} ({} -> {} bytes)",
            page_index + 1,
            source.len(),
            output.len()
        );
        Ok(output)
    }
}

#[async_trait(?Send)]
impl DocumentMutator for LopdfMutator {
    async fn embed_image(
        &self,
        source: &[u8],
        png: &[u8],
        page_index: u32,
        rect: &DocumentRect,
    ) -> Result<Vec<u8>, MutationError> {
        self.embed(source, png, page_index, rect)
    }
}

fn validate_rect(rect: &DocumentRect) -> Result<(), MutationError> {
    let finite = [rect.x, rect.y, rect.width, rect.height]
        .iter()
        .all(|v| v.is_finite());
    if !finite {
        return Err(MutationError::InvalidRect {
            reason: format!("non-finite component in {}", rect),
        });
    }
    if rect.width <= 0.0 || rect.height <= 0.0 {
        return Err(MutationError::InvalidRect {
            reason: format!("non-positive size in {}", rect),
        });
    }
    Ok(())
}

/// First `PdfSignImN` not already used by the page.
fn unique_name(xobjects: &lopdf::Dictionary) -> String {
    (0u32..)
        .map(|n| format!("{}{}", XOBJECT_NAME_BASE, n))
        .find(|candidate| !xobjects.has(candidate.as_bytes()))
        .unwrap_or_else(|| XOBJECT_NAME_BASE.to_string())
}

/// Formats a content-stream number with at most four decimals.
fn pdf_number(value: f64) -> String {
    let formatted = format!("{:.4}", value);
    let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');
    match trimmed {
        "" | "-0" => "0".to_string(),
        other => other.to_string(),
    }
}
