//! lopdf-based page assembler.
//!
//! Builds an image-only PDF: the raster is embedded once as an image
//! XObject and every page draws it at the plan's vertical offset, so each
//! page shows one band of the same image.

use image::RgbaImage;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream};

use crate::domain::export::PagePlan;
use crate::ports::{ExportError, PageAssembler, RasterImage};

/// PostScript points per millimetre.
const PT_PER_MM: f64 = 72.0 / 25.4;

const IMAGE_NAME: &str = "Im0";

/// Page assembler producing PDF bytes with lopdf.
#[derive(Debug, Clone)]
pub struct LopdfPageAssembler {
    compress: bool,
}

impl Default for LopdfPageAssembler {
    fn default() -> Self {
        Self::new()
    }
}

impl LopdfPageAssembler {
    /// Creates an assembler that deflates streams.
    pub fn new() -> Self {
        Self { compress: true }
    }

    /// Leaves streams uncompressed (useful when inspecting output).
    pub fn without_compression(mut self) -> Self {
        self.compress = false;
        self
    }
}

impl PageAssembler for LopdfPageAssembler {
    fn assemble(&self, image: &RasterImage, plan: &PagePlan) -> Result<Vec<u8>, ExportError> {
        let geometry = plan.geometry();
        let media_box: Vec<Object> = vec![
            Object::Integer(0),
            Object::Integer(0),
            real(geometry.page_width_mm * PT_PER_MM),
            real(geometry.page_height_mm * PT_PER_MM),
        ];

        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let image_id = doc.add_object(image_xobject(image.pixels()));
        let resources_id = doc.add_object(dictionary! {
            "XObject" => dictionary! { IMAGE_NAME => image_id },
        });

        let mut kids: Vec<Object> = Vec::with_capacity(plan.page_count());
        for &offset_mm in plan.offsets_mm() {
            let content = placement(plan, offset_mm).encode().map_err(|e| {
                ExportError::assembly_failed(format!("Failed to encode page: {}", e))
            })?;
            let content_id = doc.add_object(Stream::new(dictionary! {}, content));
            let page_id = add_page(&mut doc, pages_id, content_id, resources_id, media_box.clone());
            kids.push(page_id.into());
        }

        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => plan.page_count() as i64,
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages));

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        if self.compress {
            doc.compress();
        }

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes)
            .map_err(|e| ExportError::assembly_failed(format!("Failed to write PDF: {}", e)))?;

        tracing::debug!(
            pages = plan.page_count(),
            bytes = bytes.len(),
            "Assembled PDF document"
        );
        Ok(bytes)
    }
}

fn real(value: f64) -> Object {
    Object::Real(value as f32)
}

fn add_page(
    doc: &mut Document,
    pages_id: ObjectId,
    content_id: ObjectId,
    resources_id: ObjectId,
    media_box: Vec<Object>,
) -> ObjectId {
    doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
        "Resources" => resources_id,
        "MediaBox" => media_box,
    })
}

/// Draws the full image with its top edge `offset_mm` below the page top.
///
/// PDF space has its origin at the bottom-left, so the image's bottom edge
/// sits at `page_height - (offset + image_height)`.
fn placement(plan: &PagePlan, offset_mm: f64) -> Content {
    let geometry = plan.geometry();
    let width_pt = plan.image_width_mm() * PT_PER_MM;
    let height_pt = plan.image_height_mm() * PT_PER_MM;
    let bottom_pt = (geometry.page_height_mm - (offset_mm + plan.image_height_mm())) * PT_PER_MM;

    Content {
        operations: vec![
            Operation::new("q", vec![]),
            Operation::new(
                "cm",
                vec![
                    real(width_pt),
                    real(0.0),
                    real(0.0),
                    real(height_pt),
                    real(0.0),
                    real(bottom_pt),
                ],
            ),
            Operation::new("Do", vec![Object::Name(IMAGE_NAME.as_bytes().to_vec())]),
            Operation::new("Q", vec![]),
        ],
    }
}

/// Encodes the raster as an 8-bit DeviceRGB image, flattening alpha onto white.
fn image_xobject(pixels: &RgbaImage) -> Stream {
    let mut samples = Vec::with_capacity(pixels.width() as usize * pixels.height() as usize * 3);
    for pixel in pixels.pixels() {
        let [r, g, b, a] = pixel.0;
        let alpha = u32::from(a);
        for channel in [r, g, b] {
            let blended = (u32::from(channel) * alpha + 255 * (255 - alpha)) / 255;
            samples.push(blended as u8);
        }
    }

    Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => i64::from(pixels.width()),
            "Height" => i64::from(pixels.height()),
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8i64,
        },
        samples,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::export::{PageGeometry, TailPolicy};
    use image::Rgba;

    fn raster(width: u32, height: u32) -> RasterImage {
        RasterImage::new(RgbaImage::from_pixel(width, height, Rgba([20, 40, 60, 255])))
    }

    fn plan_for(image: &RasterImage) -> PagePlan {
        PagePlan::compute(
            image.width(),
            image.height(),
            PageGeometry::A4,
            TailPolicy::default(),
        )
        .unwrap()
    }

    #[test]
    fn produces_pdf_with_one_page_per_band() {
        // 840x2000 px -> 500 mm -> two pages
        let image = raster(840, 2000);
        let plan = plan_for(&image);
        let bytes = LopdfPageAssembler::new().assemble(&image, &plan).unwrap();

        assert!(bytes.starts_with(b"%PDF-1.5"));
        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 2);
    }

    #[test]
    fn short_image_produces_single_page() {
        let image = raster(840, 300);
        let plan = plan_for(&image);
        let bytes = LopdfPageAssembler::new()
            .without_compression()
            .assemble(&image, &plan)
            .unwrap();

        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 1);
    }

    #[test]
    fn placement_shifts_image_up_by_offset() {
        let image = raster(840, 2000);
        let plan = plan_for(&image);

        let first = placement(&plan, plan.offsets_mm()[0]);
        let second = placement(&plan, plan.offsets_mm()[1]);

        let bottom = |content: &Content| match content.operations[1].operands[5] {
            Object::Real(v) => f64::from(v),
            _ => panic!("expected real operand"),
        };
        // Second page draws the image 295 mm higher than the first.
        let shift_mm = (bottom(&second) - bottom(&first)) / PT_PER_MM;
        assert!((shift_mm - 295.0).abs() < 0.01, "shift was {}", shift_mm);
    }

    #[test]
    fn transparent_pixels_flatten_to_white() {
        let pixels = RgbaImage::from_pixel(1, 1, Rgba([0, 0, 0, 0]));
        let stream = image_xobject(&pixels);
        assert_eq!(stream.content, vec![255, 255, 255]);
    }
}
