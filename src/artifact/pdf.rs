//! Minimal multi-page PDF writer.
//!
//! Every page is the same filler template, so file size grows linearly with
//! the page count. Output is a valid PDF 1.4 file with a cross-reference
//! table that ordinary readers open without repair.

use std::io::{self, Write};

const FILLER_LINES: &[&str] = &[
    "Lorem ipsum dolor sit amet, consectetur adipiscing elit, sed do eiusmod tempor",
    "incididunt ut labore et dolore magna aliqua. Ut enim ad minim veniam, quis nostrud",
    "exercitation ullamco laboris nisi ut aliquip ex ea commodo consequat. Duis aute",
    "irure dolor in reprehenderit in voluptate velit esse cillum dolore eu fugiat nulla",
    "pariatur. Excepteur sint occaecat cupidatat non proident, sunt in culpa qui officia",
    "deserunt mollit anim id est laborum. Sed ut perspiciatis unde omnis iste natus error",
    "sit voluptatem accusantium doloremque laudantium, totam rem aperiam, eaque ipsa quae",
    "ab illo inventore veritatis et quasi architecto beatae vitae dicta sunt explicabo.",
];

/// Repetitions of [`FILLER_LINES`] on one page
const FILLER_BLOCKS_PER_PAGE: usize = 5;

const PAGE_WIDTH: u32 = 612;
const PAGE_HEIGHT: u32 = 792;

// Fixed object numbers; page objects follow in (page, contents) pairs
const CATALOG_OBJ: usize = 1;
const PAGES_OBJ: usize = 2;
const FONT_OBJ: usize = 3;
const INFO_OBJ: usize = 4;
const FIRST_PAGE_OBJ: usize = 5;

/// Document information dictionary
#[derive(Debug, Clone)]
pub struct DocumentInfo {
    pub title: String,
    pub author: String,
    pub subject: String,
}

impl Default for DocumentInfo {
    fn default() -> Self {
        Self {
            title: "Test Document".to_string(),
            author: "Document Factory".to_string(),
            subject: "Generated PDF document for document factory testing".to_string(),
        }
    }
}

/// Render a document of `pages` filler pages into `out`, returning bytes written
pub fn write_filler_document<W: Write>(
    mut out: W,
    pages: usize,
    info: &DocumentInfo,
) -> io::Result<u64> {
    let bytes = render(pages, info);
    out.write_all(&bytes)?;
    out.flush()?;
    Ok(bytes.len() as u64)
}

fn render(pages: usize, info: &DocumentInfo) -> Vec<u8> {
    let mut doc = ObjectWriter::new();
    doc.raw(b"%PDF-1.4\n%\xe2\xe3\xcf\xd3\n");

    doc.object(
        CATALOG_OBJ,
        &format!("<< /Type /Catalog /Pages {} 0 R >>", PAGES_OBJ),
    );

    let kids: Vec<String> = (0..pages)
        .map(|i| format!("{} 0 R", page_obj(i)))
        .collect();
    doc.object(
        PAGES_OBJ,
        &format!(
            "<< /Type /Pages /Kids [{}] /Count {} >>",
            kids.join(" "),
            pages
        ),
    );

    doc.object(
        FONT_OBJ,
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica >>",
    );

    doc.object(
        INFO_OBJ,
        &format!(
            "<< /Title ({}) /Author ({}) /Subject ({}) /Producer (doc-factory) >>",
            escape(&info.title),
            escape(&info.author),
            escape(&info.subject)
        ),
    );

    for i in 0..pages {
        doc.object(
            page_obj(i),
            &format!(
                "<< /Type /Page /Parent {} 0 R /MediaBox [0 0 {} {}] \
                 /Resources << /Font << /F1 {} 0 R >> >> /Contents {} 0 R >>",
                PAGES_OBJ,
                PAGE_WIDTH,
                PAGE_HEIGHT,
                FONT_OBJ,
                page_obj(i) + 1
            ),
        );
        let content = filler_page(i + 1);
        doc.object(
            page_obj(i) + 1,
            &format!(
                "<< /Length {} >>\nstream\n{}\nendstream",
                content.len(),
                content
            ),
        );
    }

    doc.finish(INFO_OBJ)
}

fn page_obj(index: usize) -> usize {
    FIRST_PAGE_OBJ + index * 2
}

fn filler_page(number: usize) -> String {
    let mut content = String::from("BT\n/F1 9 Tf\n11 TL\n54 740 Td\n");
    content.push_str(&format!("(Filler page {}) Tj\nT*\n", number));
    for _ in 0..FILLER_BLOCKS_PER_PAGE {
        for line in FILLER_LINES {
            content.push_str(&format!("({}) Tj\nT*\n", escape(line)));
        }
    }
    content.push_str("ET");
    content
}

fn escape(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace('(', "\\(")
        .replace(')', "\\)")
}

/// Tracks object offsets while the body is written
struct ObjectWriter {
    buf: Vec<u8>,
    offsets: Vec<(usize, usize)>,
}

impl ObjectWriter {
    fn new() -> Self {
        Self {
            buf: Vec::new(),
            offsets: Vec::new(),
        }
    }

    fn raw(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    fn object(&mut self, number: usize, body: &str) {
        self.offsets.push((number, self.buf.len()));
        self.raw(format!("{} 0 obj\n{}\nendobj\n", number, body).as_bytes());
    }

    fn finish(mut self, info: usize) -> Vec<u8> {
        self.offsets.sort_unstable();
        let size = self.offsets.len() + 1;
        let xref_offset = self.buf.len();

        let mut xref = format!("xref\n0 {}\n0000000000 65535 f \n", size);
        for (_, offset) in &self.offsets {
            xref.push_str(&format!("{:010} 00000 n \n", offset));
        }
        xref.push_str(&format!(
            "trailer\n<< /Size {} /Root {} 0 R /Info {} 0 R >>\nstartxref\n{}\n%%EOF\n",
            size, CATALOG_OBJ, info, xref_offset
        ));
        self.raw(xref.as_bytes());
        self.buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_and_trailer() {
        let bytes = render(2, &DocumentInfo::default());
        assert!(bytes.starts_with(b"%PDF-1.4"));
        assert!(bytes.ends_with(b"%%EOF\n"));
    }

    #[test]
    fn test_page_count_recorded() {
        let bytes = render(3, &DocumentInfo::default());
        let text = String::from_utf8_lossy(&bytes);
        assert!(text.contains("/Count 3"));
        assert_eq!(text.matches("/Type /Page ").count(), 3);
    }

    #[test]
    fn test_xref_offsets_point_at_objects() {
        let bytes = render(2, &DocumentInfo::default());
        let marker = b"startxref\n";
        let pos = bytes
            .windows(marker.len())
            .rposition(|w| w == marker)
            .unwrap();
        let tail = std::str::from_utf8(&bytes[pos + marker.len()..]).unwrap();
        let xref_at: usize = tail.lines().next().unwrap().parse().unwrap();
        let xref = std::str::from_utf8(&bytes[xref_at..]).unwrap();
        assert!(xref.starts_with("xref"));

        let entries: Vec<usize> = xref
            .lines()
            .skip(3)
            .take_while(|l| l.ends_with(" n "))
            .map(|l| l[..10].parse().unwrap())
            .collect();
        assert_eq!(entries.len(), FIRST_PAGE_OBJ - 1 + 2 * 2);
        for (i, offset) in entries.iter().enumerate() {
            assert!(bytes[*offset..].starts_with(format!("{} 0 obj", i + 1).as_bytes()));
        }
    }

    #[test]
    fn test_size_grows_with_pages() {
        let info = DocumentInfo::default();
        assert!(render(3, &info).len() < render(25, &info).len());
        assert!(render(25, &info).len() < render(120, &info).len());
    }

    #[test]
    fn test_escape_parentheses() {
        assert_eq!(escape("a (b) \\c"), "a \\(b\\) \\\\c");
    }
}
