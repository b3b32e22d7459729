//! Capture/Import producer: images in, one PDF (plus thumbnail) out.
//!
//! Each image becomes one page whose media box matches the image's pixel
//! dimensions, so nothing is scaled. JPEG sources in RGB or grayscale are
//! embedded byte-for-byte; anything else is decoded and re-encoded as JPEG at
//! the quality implied by the `scanQuality` preference.
//!
//! The first image is copied next to the PDF as its thumbnail. A thumbnail
//! that cannot be written is not fatal: the record is registered without one.

use super::{CancellationToken, WrittenFiles};
use crate::error::{Result, ScanmateError};
use crate::files::{self, DocumentsDir};
use crate::model::PdfRecord;
use crate::prefs::Quality;
use crate::registry::RecordSink;
use image::codecs::jpeg::JpegEncoder;
use image::{ColorType, ImageFormat};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

const PDF_VERSION: &str = "1.5";
const IMAGE_RESOURCE: &str = "Im0";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureKind {
    /// A single camera capture.
    Scan,
    /// One or more images picked from the device.
    ImageImport,
}

impl CaptureKind {
    fn pdf_prefix(&self) -> &'static str {
        match self {
            CaptureKind::Scan => "Scan",
            CaptureKind::ImageImport => "ImagePDF",
        }
    }

    fn thumb_prefix(&self) -> &'static str {
        match self {
            CaptureKind::Scan => "ScanThumb",
            CaptureKind::ImageImport => "ImagePDFThumb",
        }
    }
}

/// JPEG quality used when an image has to be re-encoded.
pub fn reencode_quality(quality: Quality) -> u8 {
    match quality {
        Quality::Low => 60,
        Quality::Medium => 80,
        Quality::High => 95,
    }
}

pub struct CaptureProducer {
    docs: DocumentsDir,
    quality: Quality,
}

impl CaptureProducer {
    pub fn new(docs: DocumentsDir, quality: Quality) -> Self {
        Self { docs, quality }
    }

    /// Turns `images` into a PDF, writes it and its thumbnail, and registers it.
    pub fn produce(
        &self,
        images: &[PathBuf],
        kind: CaptureKind,
        cancel: &CancellationToken,
        sink: &mut dyn RecordSink,
    ) -> Result<PdfRecord> {
        let Some(first) = images.first() else {
            return Err(ScanmateError::Api(
                "Please select images to convert.".to_string(),
            ));
        };

        let quality = reencode_quality(self.quality);
        let mut pages = Vec::with_capacity(images.len());
        for path in images {
            cancel.check()?;
            let bytes = fs::read(path).map_err(|e| ScanmateError::file(path, e))?;
            pages.push(PageImage::prepare(bytes, quality)?);
            debug!(path = %path.display(), "prepared page image");
        }
        let pdf = build_pdf(&pages)?;
        cancel.check()?;

        let mut written = WrittenFiles::new();
        let pdf_path = self.docs.fresh_path(kind.pdf_prefix(), "pdf");
        files::write_atomic(&pdf_path, &pdf)?;
        written.track(&pdf_path);

        let thumb_path = self.docs.fresh_path(kind.thumb_prefix(), "jpg");
        let thumb_uri = match copy_thumbnail(first, &thumb_path) {
            Ok(()) => {
                written.track(&thumb_path);
                Some(thumb_path.to_string_lossy().into_owned())
            }
            Err(e) => {
                warn!(error = %e, "could not write thumbnail, continuing without one");
                None
            }
        };

        cancel.check()?;
        let record = PdfRecord::new(files::file_name(&pdf_path))
            .with_uri(pdf_path.to_string_lossy())
            .with_thumb_uri(thumb_uri);
        sink.register(record.clone())?;
        written.commit();

        info!(
            id = %record.id,
            pages = pages.len(),
            bytes = pdf.len(),
            "registered new PDF"
        );
        Ok(record)
    }
}

fn copy_thumbnail(source: &Path, dest: &Path) -> Result<()> {
    let bytes = fs::read(source).map_err(|e| ScanmateError::file(source, e))?;
    files::write_atomic(dest, &bytes)
}

/// A page-ready JPEG stream and its geometry.
struct PageImage {
    width: u32,
    height: u32,
    color_space: &'static str,
    jpeg: Vec<u8>,
}

impl PageImage {
    fn prepare(bytes: Vec<u8>, quality: u8) -> Result<Self> {
        let format = image::guess_format(&bytes)?;
        let decoded = image::load_from_memory_with_format(&bytes, format)?;
        let (width, height) = (decoded.width(), decoded.height());

        if format == ImageFormat::Jpeg {
            let passthrough = match decoded.color() {
                ColorType::Rgb8 => Some("DeviceRGB"),
                ColorType::L8 => Some("DeviceGray"),
                _ => None,
            };
            if let Some(color_space) = passthrough {
                return Ok(Self {
                    width,
                    height,
                    color_space,
                    jpeg: bytes,
                });
            }
        }

        let rgb = decoded.to_rgb8();
        let mut jpeg = Vec::new();
        JpegEncoder::new_with_quality(&mut jpeg, quality).encode_image(&rgb)?;
        Ok(Self {
            width,
            height,
            color_space: "DeviceRGB",
            jpeg,
        })
    }
}

/// Lays out one full-bleed image per page.
fn build_pdf(pages: &[PageImage]) -> Result<Vec<u8>> {
    let mut doc = Document::with_version(PDF_VERSION);
    let pages_id = doc.new_object_id();
    let mut kids: Vec<Object> = Vec::with_capacity(pages.len());

    for page in pages {
        let width = i64::from(page.width);
        let height = i64::from(page.height);

        let image_id = doc.add_object(Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => width,
                "Height" => height,
                "ColorSpace" => page.color_space,
                "BitsPerComponent" => 8_i64,
                "Filter" => "DCTDecode",
            },
            page.jpeg.clone(),
        ));

        let content = Content {
            operations: vec![
                Operation::new("q", vec![]),
                Operation::new(
                    "cm",
                    vec![
                        width.into(),
                        0_i64.into(),
                        0_i64.into(),
                        height.into(),
                        0_i64.into(),
                        0_i64.into(),
                    ],
                ),
                Operation::new("Do", vec![Object::Name(IMAGE_RESOURCE.as_bytes().to_vec())]),
                Operation::new("Q", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));

        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0_i64.into(), 0_i64.into(), width.into(), height.into()],
            "Contents" => content_id,
            "Resources" => dictionary! {
                "XObject" => dictionary! { IMAGE_RESOURCE => image_id },
            },
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut out = Vec::new();
    doc.save_to(&mut out)?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::PdfRegistry;
    use crate::store::mem_backend::MemBackend;
    use image::{Rgb, RgbImage};
    use tempfile::TempDir;

    fn write_image(dir: &Path, name: &str, w: u32, h: u32) -> PathBuf {
        let path = dir.join(name);
        RgbImage::from_pixel(w, h, Rgb([200, 30, 30])).save(&path).unwrap();
        path
    }

    fn setup() -> (TempDir, CaptureProducer, PdfRegistry<MemBackend>) {
        let dir = tempfile::tempdir().unwrap();
        let producer = CaptureProducer::new(DocumentsDir::new(dir.path().join("docs")), Quality::High);
        let registry = PdfRegistry::open(MemBackend::new());
        (dir, producer, registry)
    }

    #[test]
    fn test_scan_produces_pdf_and_thumbnail() {
        let (dir, producer, mut registry) = setup();
        let photo = write_image(dir.path(), "photo.jpg", 8, 6);

        let record = producer
            .produce(&[photo], CaptureKind::Scan, &CancellationToken::new(), &mut registry)
            .unwrap();

        assert!(record.name.starts_with("Scan_"));
        assert!(record.name.ends_with(".pdf"));
        let pdf = fs::read(record.uri.as_ref().unwrap()).unwrap();
        assert!(pdf.starts_with(b"%PDF-1.5"));
        let thumb = record.thumb_uri.as_ref().unwrap();
        assert!(thumb.contains("ScanThumb_"));
        assert!(Path::new(thumb).exists());

        assert_eq!(registry.records().len(), 1);
        assert_eq!(registry.records()[0], record);
    }

    #[test]
    fn test_import_one_page_per_image() {
        let (dir, producer, mut registry) = setup();
        let images = vec![
            write_image(dir.path(), "a.png", 10, 20),
            write_image(dir.path(), "b.jpg", 30, 15),
        ];

        let record = producer
            .produce(&images, CaptureKind::ImageImport, &CancellationToken::new(), &mut registry)
            .unwrap();
        assert!(record.name.starts_with("ImagePDF_"));

        let doc = Document::load(record.uri.as_ref().unwrap()).unwrap();
        assert_eq!(doc.get_pages().len(), 2);
    }

    #[test]
    fn test_no_images_is_rejected() {
        let (_dir, producer, mut registry) = setup();
        let err = producer.produce(&[], CaptureKind::ImageImport, &CancellationToken::new(), &mut registry);
        assert!(matches!(err, Err(ScanmateError::Api(_))));
        assert!(registry.records().is_empty());
    }

    #[test]
    fn test_unreadable_image_registers_nothing() {
        let (dir, producer, mut registry) = setup();
        let bogus = dir.path().join("notes.jpg");
        fs::write(&bogus, b"definitely not an image").unwrap();

        let err = producer.produce(&[bogus], CaptureKind::Scan, &CancellationToken::new(), &mut registry);
        assert!(err.is_err());
        assert!(registry.records().is_empty());
    }

    #[test]
    fn test_cancelled_registers_nothing_and_leaves_no_files() {
        let (dir, producer, mut registry) = setup();
        let photo = write_image(dir.path(), "photo.jpg", 4, 4);
        let token = CancellationToken::new();
        token.cancel();

        let err = producer.produce(&[photo], CaptureKind::Scan, &token, &mut registry);
        assert!(matches!(err, Err(ScanmateError::Cancelled)));
        assert!(registry.records().is_empty());
        let docs = dir.path().join("docs");
        assert!(!docs.exists() || fs::read_dir(&docs).unwrap().next().is_none());
    }

    #[test]
    fn test_register_failure_removes_written_files() {
        let (dir, producer, _) = setup();
        let backend = MemBackend::new();
        let mut registry = PdfRegistry::open(backend.clone());
        backend.set_simulate_write_error(true);
        let photo = write_image(dir.path(), "photo.jpg", 4, 4);

        let err = producer.produce(&[photo], CaptureKind::Scan, &CancellationToken::new(), &mut registry);
        assert!(err.is_err());
        let leftovers = fs::read_dir(dir.path().join("docs")).unwrap().count();
        assert_eq!(leftovers, 0);
    }

    #[test]
    fn test_reencode_quality_follows_preference() {
        assert!(reencode_quality(Quality::Low) < reencode_quality(Quality::Medium));
        assert!(reencode_quality(Quality::Medium) < reencode_quality(Quality::High));
    }
}
