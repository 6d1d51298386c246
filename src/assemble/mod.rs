//! Assembly of downloaded pages into one document.
//!
//! [`PdfAssembler`] gathers the `<n>.jpg` files of an output directory in
//! page order and writes them into a PDF next to that directory. Gray and
//! RGB JPEG data is embedded untouched; anything else the server sent,
//! including CMYK JPEGs, is decoded and re-encoded as RGB JPEG first.
//! Assembly runs on tokio's blocking pool.

pub mod pdf;

pub use pdf::{ColorSpace, PdfPage, PdfWriter};

use crate::error::{Error, Result};
use crate::service::Assembler;

use async_trait::async_trait;
use image::codecs::jpeg::{JpegDecoder, JpegEncoder};
use image::{ColorType, ImageDecoder, ImageFormat};
use std::fs::{self, File};
use std::io::{BufWriter, Cursor};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Quality used when a page has to be re-encoded.
const JPEG_QUALITY: u8 = 90;

/// Writes the pages of a directory into `<book id>.pdf`.
#[derive(Debug, Clone, Default)]
pub struct PdfAssembler {
    output: Option<PathBuf>,
}

impl PdfAssembler {
    /// Write `<book id>.pdf` beside the pages directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Write the document to `path` instead.
    pub fn with_output(path: impl Into<PathBuf>) -> Self {
        Self {
            output: Some(path.into()),
        }
    }

    /// Where the document for `book_id` built from `pages_dir` goes.
    pub fn artifact_path(&self, pages_dir: &Path, book_id: &str) -> PathBuf {
        match &self.output {
            Some(path) => path.clone(),
            None => {
                let file_name = format!("{}.pdf", book_id);
                match pages_dir.parent() {
                    Some(parent) => parent.join(file_name),
                    None => pages_dir.join(file_name),
                }
            }
        }
    }

    /// Assemble on the calling thread.
    pub fn assemble_blocking(&self, pages_dir: &Path, book_id: &str) -> Result<Option<PathBuf>> {
        let pages = collect_pages(pages_dir)?;
        if pages.is_empty() {
            warn!("No pages in {:?}, nothing to assemble", pages_dir);
            return Ok(None);
        }

        let target = self.artifact_path(pages_dir, book_id);
        debug!("Assembling {} pages into {:?}", pages.len(), target);
        if let Err(e) = write_document(&target, &pages) {
            let _ = fs::remove_file(&target);
            return Err(e);
        }

        info!("Wrote {} pages to {:?}", pages.len(), target);
        Ok(Some(target))
    }
}

#[async_trait]
impl Assembler for PdfAssembler {
    async fn assemble(&self, pages_dir: &Path, book_id: &str) -> Result<Option<PathBuf>> {
        let assembler = self.clone();
        let pages_dir = pages_dir.to_path_buf();
        let book_id = book_id.to_string();
        tokio::task::spawn_blocking(move || assembler.assemble_blocking(&pages_dir, &book_id))
            .await
            .map_err(|e| Error::Internal(format!("assembly task failed: {}", e)))?
    }
}

fn write_document(target: &Path, pages: &[(u32, PathBuf)]) -> Result<()> {
    let mut writer = PdfWriter::new(BufWriter::new(File::create(target)?))?;
    for (number, path) in pages {
        let page = load_page(path)
            .map_err(|e| Error::Assembly(format!("page {} ({:?}): {}", number, path, e)))?;
        writer.add_page(&page)?;
    }
    writer.finish()?;
    Ok(())
}

/// The `<n>.jpg` files of `dir`, sorted by `n`.
pub fn collect_pages(dir: &Path) -> Result<Vec<(u32, PathBuf)>> {
    let mut pages = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.extension().and_then(|e| e.to_str()) != Some("jpg") {
            continue;
        }
        let number = path
            .file_stem()
            .and_then(|s| s.to_str())
            .and_then(|s| s.parse::<u32>().ok());
        if let Some(number) = number {
            pages.push((number, path));
        }
    }
    pages.sort_by_key(|(number, _)| *number);
    Ok(pages)
}

/// Read a page image and turn it into a [`PdfPage`].
pub fn load_page(path: &Path) -> Result<PdfPage> {
    let bytes = fs::read(path)?;

    if image::guess_format(&bytes)? == ImageFormat::Jpeg {
        let (width, height, color) = {
            let decoder = JpegDecoder::new(Cursor::new(&bytes))?;
            let (width, height) = decoder.dimensions();
            // The decoder reports CMYK data as Rgb8, so trust the frame header.
            let color = match (jpeg_components(&bytes), decoder.color_type()) {
                (Some(1), ColorType::L8) => Some(ColorSpace::Gray),
                (Some(3), ColorType::Rgb8) => Some(ColorSpace::Rgb),
                _ => None,
            };
            (width, height, color)
        };
        if let Some(color) = color {
            return Ok(PdfPage {
                width,
                height,
                color,
                jpeg: bytes,
            });
        }
    }

    let rgb = image::load_from_memory(&bytes)?.to_rgb8();
    let mut jpeg = Vec::new();
    JpegEncoder::new_with_quality(&mut jpeg, JPEG_QUALITY).encode_image(&rgb)?;
    Ok(PdfPage {
        width: rgb.width(),
        height: rgb.height(),
        color: ColorSpace::Rgb,
        jpeg,
    })
}

/// Number of colour components declared in a JPEG's frame header.
pub fn jpeg_components(bytes: &[u8]) -> Option<u8> {
    if !bytes.starts_with(&[0xFF, 0xD8]) {
        return None;
    }
    let mut pos = 2;
    while pos + 4 <= bytes.len() {
        if bytes[pos] != 0xFF {
            return None;
        }
        let marker = bytes[pos + 1];
        if marker == 0xFF {
            pos += 1;
            continue;
        }
        match marker {
            // SOF0..SOF15, minus DHT, JPG and DAC.
            0xC0..=0xCF if !matches!(marker, 0xC4 | 0xC8 | 0xCC) => {
                return bytes.get(pos + 9).copied()
            }
            0xD9 | 0xDA => return None,
            _ => {
                let len = u16::from_be_bytes([bytes[pos + 2], bytes[pos + 3]]) as usize;
                pos += 2 + len;
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, GrayImage, Luma, Rgb, RgbImage};

    fn jpeg_bytes(image: DynamicImage) -> Vec<u8> {
        let mut out = Cursor::new(Vec::new());
        image.write_to(&mut out, ImageFormat::Jpeg).unwrap();
        out.into_inner()
    }

    fn png_bytes(image: DynamicImage) -> Vec<u8> {
        let mut out = Cursor::new(Vec::new());
        image.write_to(&mut out, ImageFormat::Png).unwrap();
        out.into_inner()
    }

    #[test]
    fn test_collect_pages_sorted_numerically() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["10.jpg", "2.jpg", "1.jpg", "cover.jpg", "3.png", "4.jpg.part"] {
            fs::write(dir.path().join(name), b"x").unwrap();
        }
        let numbers: Vec<u32> = collect_pages(dir.path())
            .unwrap()
            .into_iter()
            .map(|(n, _)| n)
            .collect();
        assert_eq!(numbers, vec![1, 2, 10]);
    }

    #[test]
    fn test_jpeg_embedded_as_is() {
        let dir = tempfile::tempdir().unwrap();
        let bytes = jpeg_bytes(DynamicImage::ImageRgb8(RgbImage::from_pixel(
            8,
            6,
            Rgb([200, 10, 10]),
        )));
        let path = dir.path().join("1.jpg");
        fs::write(&path, &bytes).unwrap();

        let page = load_page(&path).unwrap();
        assert_eq!((page.width, page.height), (8, 6));
        assert_eq!(page.color, ColorSpace::Rgb);
        assert_eq!(page.jpeg, bytes);
    }

    #[test]
    fn test_gray_jpeg() {
        let dir = tempfile::tempdir().unwrap();
        let bytes = jpeg_bytes(DynamicImage::ImageLuma8(GrayImage::from_pixel(
            5,
            5,
            Luma([128]),
        )));
        let path = dir.path().join("1.jpg");
        fs::write(&path, &bytes).unwrap();
        assert_eq!(load_page(&path).unwrap().color, ColorSpace::Gray);
    }

    #[test]
    fn test_png_is_reencoded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("1.jpg");
        fs::write(
            &path,
            png_bytes(DynamicImage::ImageRgb8(RgbImage::from_pixel(
                3,
                7,
                Rgb([0, 0, 255]),
            ))),
        )
        .unwrap();

        let page = load_page(&path).unwrap();
        assert_eq!((page.width, page.height), (3, 7));
        assert_eq!(image::guess_format(&page.jpeg).unwrap(), ImageFormat::Jpeg);
    }

    #[test]
    fn test_artifact_path() {
        let assembler = PdfAssembler::new();
        assert_eq!(
            assembler.artifact_path(Path::new("./mybook"), "mybook"),
            PathBuf::from("./mybook.pdf")
        );
        let custom = PdfAssembler::with_output("/tmp/out.pdf");
        assert_eq!(
            custom.artifact_path(Path::new("./mybook"), "mybook"),
            PathBuf::from("/tmp/out.pdf")
        );
    }

    #[test]
    fn test_empty_directory() {
        let dir = tempfile::tempdir().unwrap();
        let pages = dir.path().join("book");
        fs::create_dir(&pages).unwrap();
        assert_eq!(PdfAssembler::new().assemble_blocking(&pages, "book").unwrap(), None);
        assert!(!dir.path().join("book.pdf").exists());
    }

    #[test]
    fn test_garbage_page_fails_assembly() {
        let dir = tempfile::tempdir().unwrap();
        let pages = dir.path().join("book");
        fs::create_dir(&pages).unwrap();
        fs::write(pages.join("1.jpg"), b"not an image").unwrap();
        let err = PdfAssembler::new().assemble_blocking(&pages, "book").unwrap_err();
        assert!(matches!(err, Error::Assembly(_)));
        assert!(!dir.path().join("book.pdf").exists());
    }

    const CMYK_JPEG: &[u8] = include_bytes!("../../tests/fixtures/cmyk-8x8.jpg");

    #[test]
    fn test_component_count() {
        let gray = jpeg_bytes(DynamicImage::ImageLuma8(GrayImage::from_pixel(4, 4, Luma([9]))));
        let rgb = jpeg_bytes(DynamicImage::ImageRgb8(RgbImage::from_pixel(4, 4, Rgb([1, 2, 3]))));
        assert_eq!(jpeg_components(&gray), Some(1));
        assert_eq!(jpeg_components(&rgb), Some(3));
        assert_eq!(jpeg_components(CMYK_JPEG), Some(4));
        assert_eq!(jpeg_components(b"not a jpeg"), None);
        assert_eq!(jpeg_components(&[0xFF, 0xD8, 0xFF]), None);
    }

    #[test]
    fn test_cmyk_jpeg_is_reencoded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("1.jpg");
        fs::write(&path, CMYK_JPEG).unwrap();

        let page = load_page(&path).unwrap();
        assert_eq!((page.width, page.height), (8, 8));
        assert_eq!(page.color, ColorSpace::Rgb);
        assert_ne!(page.jpeg, CMYK_JPEG);
        assert_eq!(jpeg_components(&page.jpeg), Some(3));
    }

    #[tokio::test]
    async fn test_assembles_on_blocking_pool() {
        let dir = tempfile::tempdir().unwrap();
        let pages = dir.path().join("book");
        fs::create_dir(&pages).unwrap();
        fs::write(
            pages.join("1.jpg"),
            jpeg_bytes(DynamicImage::ImageRgb8(RgbImage::from_pixel(4, 4, Rgb([9, 9, 9])))),
        )
        .unwrap();

        let artifact = Assembler::assemble(&PdfAssembler::new(), &pages, "book")
            .await
            .unwrap();
        assert_eq!(artifact, Some(dir.path().join("book.pdf")));
        assert!(fs::read(dir.path().join("book.pdf")).unwrap().starts_with(b"%PDF-"));
    }
}
