//! A minimal PDF writer for image-only documents.
//!
//! Every page is one JPEG image drawn at its pixel size. Objects are
//! streamed out as pages are added; the page tree, catalog and cross
//! reference table are written by [`PdfWriter::finish`].

use std::io::{self, Write};

/// Colour space of an embedded JPEG.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorSpace {
    /// One component per pixel.
    Gray,
    /// Three components per pixel.
    Rgb,
}

impl ColorSpace {
    fn name(self) -> &'static str {
        match self {
            ColorSpace::Gray => "DeviceGray",
            ColorSpace::Rgb => "DeviceRGB",
        }
    }
}

/// A JPEG ready to become a page.
#[derive(Debug, Clone)]
pub struct PdfPage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Colour space of the JPEG data.
    pub color: ColorSpace,
    /// Baseline or progressive JPEG data.
    pub jpeg: Vec<u8>,
}

/// Streams a PDF document to `W`.
pub struct PdfWriter<W: Write> {
    out: W,
    position: usize,
    offsets: Vec<usize>,
    page_ids: Vec<usize>,
}

const CATALOG_ID: usize = 1;
const PAGES_ID: usize = 2;

impl<W: Write> PdfWriter<W> {
    /// Start a document on `out`.
    pub fn new(out: W) -> io::Result<Self> {
        let mut writer = Self {
            out,
            position: 0,
            // Catalog and page tree are written last but numbered first.
            offsets: vec![0, 0],
            page_ids: Vec::new(),
        };
        writer.write_raw(b"%PDF-1.4\n%\xE2\xE3\xCF\xD3\n")?;
        Ok(writer)
    }

    /// Number of pages added so far.
    pub fn page_count(&self) -> usize {
        self.page_ids.len()
    }

    /// Append a page showing `page`.
    pub fn add_page(&mut self, page: &PdfPage) -> io::Result<()> {
        let page_id = self.reserve();
        let image_id = self.reserve();
        let content_id = self.reserve();
        let (w, h) = (page.width, page.height);

        self.write_object(
            page_id,
            &format!(
                "<< /Type /Page /Parent {} 0 R /MediaBox [0 0 {} {}] \
                 /Resources << /XObject << /Im0 {} 0 R >> >> /Contents {} 0 R >>",
                PAGES_ID, w, h, image_id, content_id
            ),
            None,
        )?;
        self.write_object(
            image_id,
            &format!(
                "<< /Type /XObject /Subtype /Image /Width {} /Height {} /ColorSpace /{} \
                 /BitsPerComponent 8 /Filter /DCTDecode /Length {} >>",
                w,
                h,
                page.color.name(),
                page.jpeg.len()
            ),
            Some(&page.jpeg),
        )?;
        let content = format!("q\n{} 0 0 {} 0 0 cm\n/Im0 Do\nQ\n", w, h);
        self.write_object(
            content_id,
            &format!("<< /Length {} >>", content.len()),
            Some(content.as_bytes()),
        )?;

        self.page_ids.push(page_id);
        Ok(())
    }

    /// Write the page tree, catalog and trailer, and hand back the output.
    pub fn finish(mut self) -> io::Result<W> {
        let kids = self
            .page_ids
            .iter()
            .map(|id| format!("{} 0 R", id))
            .collect::<Vec<_>>()
            .join(" ");
        self.write_object(
            PAGES_ID,
            &format!(
                "<< /Type /Pages /Kids [{}] /Count {} >>",
                kids,
                self.page_ids.len()
            ),
            None,
        )?;
        self.write_object(
            CATALOG_ID,
            &format!("<< /Type /Catalog /Pages {} 0 R >>", PAGES_ID),
            None,
        )?;

        let xref_offset = self.position;
        let mut xref = format!("xref\n0 {}\n0000000000 65535 f \n", self.offsets.len() + 1);
        for offset in &self.offsets {
            xref.push_str(&format!("{:010} 00000 n \n", offset));
        }
        xref.push_str(&format!(
            "trailer\n<< /Size {} /Root {} 0 R >>\nstartxref\n{}\n%%EOF\n",
            self.offsets.len() + 1,
            CATALOG_ID,
            xref_offset
        ));
        self.write_raw(xref.as_bytes())?;
        self.out.flush()?;
        Ok(self.out)
    }

    fn reserve(&mut self) -> usize {
        self.offsets.push(0);
        self.offsets.len()
    }

    fn write_object(&mut self, id: usize, dict: &str, stream: Option<&[u8]>) -> io::Result<()> {
        self.offsets[id - 1] = self.position;
        self.write_raw(format!("{} 0 obj\n{}\n", id, dict).as_bytes())?;
        if let Some(data) = stream {
            self.write_raw(b"stream\n")?;
            self.write_raw(data)?;
            self.write_raw(b"\nendstream\n")?;
        }
        self.write_raw(b"endobj\n")
    }

    fn write_raw(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.out.write_all(bytes)?;
        self.position += bytes.len();
        Ok(())
    }
}
