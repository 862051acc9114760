//! PDF text extraction with lopdf, page by page in page order

use async_trait::async_trait;
use lopdf::Document;
use std::path::{Path, PathBuf};

use super::{DocumentFormat, IngestionError, IngestionResult, RawDocument, TextExtractor};

pub struct PdfExtractor;

impl PdfExtractor {
    fn extract_blocking(path: PathBuf) -> IngestionResult<RawDocument> {
        let doc = Document::load(&path).map_err(|e| IngestionError::Pdf(e.to_string()))?;

        // get_pages is a BTreeMap keyed by page number, so iteration is in order
        let pages = doc.get_pages();
        let page_count = pages.len() as u32;
        let mut text = String::new();

        for page_number in pages.keys() {
            match doc.extract_text(&[*page_number]) {
                Ok(page_text) => {
                    if !text.is_empty() {
                        text.push('\n');
                    }
                    text.push_str(&page_text);
                }
                Err(e) => {
                    tracing::warn!("Skipping page {} of {:?}: {}", page_number, path, e);
                }
            }
        }

        Ok(RawDocument::new(path, DocumentFormat::Pdf, text).with_page_count(page_count))
    }
}

#[async_trait]
impl TextExtractor for PdfExtractor {
    fn supported_formats(&self) -> &[DocumentFormat] {
        &[DocumentFormat::Pdf]
    }

    async fn extract(&self, path: &Path) -> IngestionResult<RawDocument> {
        let path = path.to_path_buf();
        tokio::task::spawn_blocking(move || Self::extract_blocking(path))
            .await
            .map_err(|e| IngestionError::Pdf(format!("extraction task failed: {}", e)))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::content::{Content, Operation};
    use lopdf::{Dictionary, Object, Stream, StringFormat};
    use std::io::Write;

    /// One page per entry, each showing its text with a WinAnsi Helvetica font
    fn build_pdf(pages: &[&str]) -> Vec<u8> {
        let mut doc = Document::with_version("1.7");
        let pages_id = doc.new_object_id();

        let font_id = doc.add_object(Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Font".to_vec())),
            ("Subtype", Object::Name(b"Type1".to_vec())),
            ("BaseFont", Object::Name(b"Helvetica".to_vec())),
            ("Encoding", Object::Name(b"WinAnsiEncoding".to_vec())),
        ]));
        let resources_id = doc.add_object(Dictionary::from_iter(vec![(
            "Font",
            Object::Dictionary(Dictionary::from_iter(vec![("F1", Object::Reference(font_id))])),
        )]));

        let mut page_ids = Vec::new();
        for text in pages {
            let content = Content {
                operations: vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec![Object::Name(b"F1".to_vec()), Object::Integer(12)]),
                    Operation::new("Td", vec![Object::Integer(72), Object::Integer(700)]),
                    Operation::new(
                        "Tj",
                        vec![Object::String(text.as_bytes().to_vec(), StringFormat::Literal)],
                    ),
                    Operation::new("ET", vec![]),
                ],
            };
            let content_id =
                doc.add_object(Stream::new(Dictionary::new(), content.encode().unwrap()));

            let page_id = doc.add_object(Dictionary::from_iter(vec![
                ("Type", Object::Name(b"Page".to_vec())),
                ("Parent", Object::Reference(pages_id)),
                ("Resources", Object::Reference(resources_id)),
                (
                    "MediaBox",
                    Object::Array(vec![
                        Object::Integer(0),
                        Object::Integer(0),
                        Object::Integer(612),
                        Object::Integer(792),
                    ]),
                ),
                ("Contents", Object::Reference(content_id)),
            ]));
            page_ids.push(page_id);
        }

        let pages_dict = Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Pages".to_vec())),
            ("Count", Object::Integer(page_ids.len() as i64)),
            (
                "Kids",
                Object::Array(page_ids.iter().map(|id| Object::Reference(*id)).collect()),
            ),
        ]);
        doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

        let catalog_id = doc.add_object(Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Catalog".to_vec())),
            ("Pages", Object::Reference(pages_id)),
        ]));
        doc.trailer.set("Root", Object::Reference(catalog_id));

        let mut buffer = Vec::new();
        doc.save_to(&mut buffer).unwrap();
        buffer
    }

    #[tokio::test]
    async fn test_pages_extracted_in_order() {
        let mut file = tempfile::Builder::new().suffix(".pdf").tempfile().unwrap();
        file.write_all(&build_pdf(&["Rent: 1,200 per month", "Notice period of two weeks"]))
            .unwrap();
        file.flush().unwrap();

        let doc = PdfExtractor.extract(file.path()).await.unwrap();
        assert_eq!(doc.format, DocumentFormat::Pdf);
        assert_eq!(doc.page_count, Some(2));

        let first = doc.text.find("Rent: 1,200 per month").unwrap();
        let second = doc.text.find("Notice period of two weeks").unwrap();
        assert!(first < second);
    }

    #[tokio::test]
    async fn test_pdf_through_ingestor_and_extraction() {
        let mut file = tempfile::Builder::new().suffix(".pdf").tempfile().unwrap();
        file.write_all(&build_pdf(&["Security Deposit: 30,000", "Notice Period: 1 month"]))
            .unwrap();
        file.flush().unwrap();

        let raw = crate::ingest::DocumentIngestor::default()
            .ingest(file.path())
            .await
            .unwrap();
        let (terms, _) = crate::analysis::evaluate(&crate::analysis::normalize(&raw.text));
        assert_eq!(terms.get(crate::analysis::TermField::Deposit), "30000");
        assert_eq!(terms.get(crate::analysis::TermField::NoticePeriod), "1 month");
    }

    #[tokio::test]
    async fn test_corrupt_pdf_is_pdf_error() {
        let mut file = tempfile::Builder::new().suffix(".pdf").tempfile().unwrap();
        file.write_all(b"this is not a pdf").unwrap();

        let err = PdfExtractor.extract(file.path()).await.unwrap_err();
        assert!(matches!(err, IngestionError::Pdf(_)));
    }
}
