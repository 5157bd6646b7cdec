//! Document pipelines: text, image, multi-page and batch.

use tracing::{debug, info, warn};

use crate::error::{AduanaError, InputError, OcrError};
use crate::extraction::policy::{confidence, validate};
use crate::extraction::{extract_document, ExtractionOutcome};
use crate::input::{combined_hash, ScannedFile};
use crate::models::config::ExtractionConfig;
use crate::models::document::{DocumentKind, DocumentMetadata, ExtractedDocument, ExtractionMethod};
use crate::ocr::{check_sentinel, OcrGateway};

/// A file of a batch that could not be processed.
#[derive(Debug)]
pub struct BatchFailure {
    /// Position of the file in the batch.
    pub index: usize,
    pub file_name: String,
    pub error: AduanaError,
}

/// Result of a batch: documents and failures, each in input order.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub documents: Vec<ExtractedDocument>,
    pub failures: Vec<BatchFailure>,
}

impl BatchOutcome {
    pub fn total(&self) -> usize {
        self.documents.len() + self.failures.len()
    }

    pub fn valid_count(&self) -> usize {
        self.documents.iter().filter(|d| d.is_valid()).count()
    }
}

/// Runs OCR (when needed) and extraction, and builds the document envelope.
pub struct DocumentProcessor {
    config: ExtractionConfig,
    gateway: Option<Box<dyn OcrGateway>>,
}

impl DocumentProcessor {
    /// Processor for text input only; add a gateway for images.
    pub fn new(config: ExtractionConfig) -> Self {
        Self {
            config,
            gateway: None,
        }
    }

    pub fn with_gateway(mut self, gateway: Box<dyn OcrGateway>) -> Self {
        self.gateway = Some(gateway);
        self
    }

    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    /// Extract a document from text that needs no OCR.
    pub fn process_text(&self, kind: DocumentKind, text: &str) -> ExtractedDocument {
        self.process_text_pages(kind, &[text])
    }

    /// Extract one document from the text of several pages.
    pub fn process_text_pages<S: AsRef<str>>(
        &self,
        kind: DocumentKind,
        pages: &[S],
    ) -> ExtractedDocument {
        let outcomes: Vec<ExtractionOutcome> = pages
            .iter()
            .map(|page| extract_document(kind, page.as_ref()))
            .collect();
        let page_count = outcomes.len();

        self.finish(
            merge_pages(kind, outcomes),
            ExtractionMethod::Text,
            String::new(),
            String::new(),
            page_count,
        )
    }

    /// Validate, OCR and extract a single scanned page.
    pub fn process_file(
        &self,
        kind: DocumentKind,
        file: &ScannedFile,
    ) -> Result<ExtractedDocument, AduanaError> {
        self.process_pages(kind, std::slice::from_ref(file))
    }

    /// Extract one document from several scanned pages.
    ///
    /// Pages are read in order; for every field the first page that has a
    /// value wins. Any page failing validation or OCR fails the document.
    pub fn process_pages(
        &self,
        kind: DocumentKind,
        pages: &[ScannedFile],
    ) -> Result<ExtractedDocument, AduanaError> {
        let Some(first) = pages.first() else {
            return Err(InputError::NoPages.into());
        };

        let mut outcomes = Vec::with_capacity(pages.len());
        for page in pages {
            let text = self.read_page(page)?;
            outcomes.push(extract_document(kind, &text));
        }

        Ok(self.finish(
            merge_pages(kind, outcomes),
            ExtractionMethod::ImageOcr,
            first.name().to_string(),
            combined_hash(pages),
            pages.len(),
        ))
    }

    /// Process each file as its own document.
    ///
    /// A failing file does not stop the batch.
    pub fn process_batch(&self, kind: DocumentKind, files: &[ScannedFile]) -> BatchOutcome {
        let mut outcome = BatchOutcome::default();

        for (index, file) in files.iter().enumerate() {
            match self.process_file(kind, file) {
                Ok(document) => outcome.documents.push(document),
                Err(error) => {
                    warn!(file = %file.name(), %error, "batch item failed");
                    outcome.failures.push(BatchFailure {
                        index,
                        file_name: file.name().to_string(),
                        error,
                    });
                }
            }
        }

        info!(
            total = files.len(),
            processed = outcome.documents.len(),
            failed = outcome.failures.len(),
            "batch finished"
        );
        outcome
    }

    fn read_page(&self, page: &ScannedFile) -> Result<String, AduanaError> {
        let format = page.validate(&self.config)?;
        let gateway = self
            .gateway
            .as_ref()
            .ok_or_else(|| OcrError::NotConfigured("no OCR gateway".to_string()))?;

        debug!(file = %page.name(), %format, gateway = gateway.name(), "sending page to OCR");
        let text = gateway
            .analyze(page.bytes())
            .and_then(check_sentinel)
            .inspect_err(|e| {
                warn!(file = %page.name(), error = %e, "OCR failed");
            })?;
        Ok(text)
    }

    fn finish(
        &self,
        outcome: ExtractionOutcome,
        method: ExtractionMethod,
        file_name: String,
        content_hash: String,
        page_count: usize,
    ) -> ExtractedDocument {
        let validity = validate(&outcome.record);

        let mut comments: Vec<String> = Vec::new();
        if let Some(failure) = &outcome.failure {
            comments.push(failure.to_string());
        }
        if !validity.valid {
            comments.push(validity.comment());
            warn!(kind = %outcome.record.kind(), missing = ?validity.missing, "document is invalid");
        }

        info!(
            kind = %outcome.record.kind(),
            method = method.label(),
            valid = validity.valid,
            pages = page_count,
            "document processed"
        );

        ExtractedDocument {
            record: outcome.record,
            metadata: DocumentMetadata {
                file_name,
                content_hash,
                extraction_method: method,
                raw_text: outcome.text,
                confidence: confidence(&self.config, method),
                comments: comments.join("; "),
                valid: validity.valid,
                missing_fields: validity.missing.iter().map(|m| m.to_string()).collect(),
                page_count,
            },
        }
    }
}

/// Fold page outcomes into one, first non-empty value per field winning.
fn merge_pages(kind: DocumentKind, outcomes: Vec<ExtractionOutcome>) -> ExtractionOutcome {
    let mut pages = outcomes.into_iter();
    let Some(mut merged) = pages.next() else {
        return extract_document(kind, "");
    };

    for page in pages {
        merged.record.fill_missing(&page.record);
        if !page.text.is_empty() {
            if !merged.text.is_empty() {
                merged.text.push(' ');
            }
            merged.text.push_str(&page.text);
        }
        if merged.failure.is_none() {
            merged.failure = page.failure;
        }
    }

    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::document::CustomsRecord;
    use rust_decimal::Decimal;

    const PNG_SIGNATURE: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    /// Reads back the text stored after the PNG signature.
    struct EchoOcr;

    impl OcrGateway for EchoOcr {
        fn analyze(&self, image: &[u8]) -> Result<String, OcrError> {
            Ok(String::from_utf8_lossy(&image[PNG_SIGNATURE.len()..]).into_owned())
        }

        fn name(&self) -> &str {
            "echo"
        }
    }

    fn page(name: &str, text: &str) -> ScannedFile {
        let mut bytes = PNG_SIGNATURE.to_vec();
        bytes.extend_from_slice(text.as_bytes());
        ScannedFile::new(name, bytes)
    }

    fn processor() -> DocumentProcessor {
        let config = ExtractionConfig {
            verify_decodable: false,
            ..Default::default()
        };
        DocumentProcessor::new(config).with_gateway(Box::new(EchoOcr))
    }

    fn folio(doc: &ExtractedDocument) -> (&str, Option<Decimal>) {
        match &doc.record {
            CustomsRecord::ComprobanteTransaccion(r) => (r.numero_folio.as_str(), r.total_pagado),
            other => panic!("unexpected record {other:?}"),
        }
    }

    #[test]
    fn test_text_pipeline() {
        let doc = processor().process_text(
            DocumentKind::ComprobanteTransaccion,
            "Folio 4560010758\nTotal Pagado 8.153.962",
        );

        assert!(doc.is_valid());
        assert_eq!(folio(&doc), ("4560010758", Some(Decimal::new(815396200, 2))));
        assert_eq!(doc.metadata.extraction_method, ExtractionMethod::Text);
        assert_eq!(doc.metadata.confidence, 0.8);
        assert_eq!(doc.metadata.comments, "");
        assert_eq!(doc.metadata.raw_text, "Folio 4560010758 Total Pagado 8.153.962");
        assert_eq!(doc.metadata.page_count, 1);
        assert!(doc.metadata.content_hash.is_empty());
    }

    #[test]
    fn test_invalid_document_gets_comment() {
        let doc = processor().process_text(DocumentKind::ComprobanteTransaccion, "hola");

        assert!(!doc.is_valid());
        assert_eq!(
            doc.metadata.comments,
            "missing critical fields: numero_folio, total_pagado"
        );
        assert_eq!(doc.metadata.missing_fields, vec!["numero_folio", "total_pagado"]);
    }

    #[test]
    fn test_image_pipeline() {
        let file = page("comprobante.png", "Folio 4560010758 Total Pagado 8.153.962");
        let doc = processor()
            .process_file(DocumentKind::ComprobanteTransaccion, &file)
            .unwrap();

        assert!(doc.is_valid());
        assert_eq!(doc.metadata.extraction_method, ExtractionMethod::ImageOcr);
        assert_eq!(doc.metadata.confidence, 0.7);
        assert_eq!(doc.metadata.file_name, "comprobante.png");
        assert_eq!(doc.metadata.content_hash, file.content_hash());
    }

    #[test]
    fn test_image_without_gateway() {
        let processor = DocumentProcessor::new(ExtractionConfig {
            verify_decodable: false,
            ..Default::default()
        });
        let result = processor.process_file(DocumentKind::TactAdc, &page("t.png", "TATC"));
        assert!(matches!(
            result,
            Err(AduanaError::Ocr(OcrError::NotConfigured(_)))
        ));
    }

    #[test]
    fn test_sentinel_text_is_ocr_error() {
        let result = processor().process_file(
            DocumentKind::GuiaDespacho,
            &page("g.png", "Servicio OCR no configurado"),
        );
        assert!(matches!(result, Err(AduanaError::Ocr(OcrError::Unavailable(_)))));
    }

    #[test]
    fn test_pages_are_merged_in_order() {
        let pages = [
            page("p1.png", "Folio 4560010758"),
            page("p2.png", "Folio 4560010759 Total Pagado 8.153.962"),
        ];
        let doc = processor()
            .process_pages(DocumentKind::ComprobanteTransaccion, &pages)
            .unwrap();

        assert!(doc.is_valid());
        assert_eq!(folio(&doc), ("4560010758", Some(Decimal::new(815396200, 2))));
        assert_eq!(doc.metadata.page_count, 2);
        assert_eq!(
            doc.metadata.raw_text,
            "Folio 4560010758 Folio 4560010759 Total Pagado 8.153.962"
        );
        assert_eq!(doc.metadata.file_name, "p1.png");
    }

    #[test]
    fn test_text_pages_are_merged() {
        let doc = processor().process_text_pages(
            DocumentKind::ComprobanteTransaccion,
            &["Folio 4560010758", "Total Pagado 8.153.962"],
        );
        assert!(doc.is_valid());
        assert_eq!(doc.metadata.page_count, 2);
    }

    #[test]
    fn test_no_pages_is_error() {
        let result = processor().process_pages(DocumentKind::TactAdc, &[]);
        assert!(matches!(result, Err(AduanaError::Input(InputError::NoPages))));
    }

    #[test]
    fn test_batch_keeps_order_and_separates_failures() {
        let files = [
            page("a.png", "Folio 4560010758 Total Pagado 8.153.962"),
            ScannedFile::new("b.png", Vec::new()),
            ScannedFile::new("c.jpg", b"not an image".to_vec()),
            page("d.png", "Folio 4560010999 Total Pagado 100"),
        ];
        let outcome = processor().process_batch(DocumentKind::ComprobanteTransaccion, &files);

        assert_eq!(outcome.total(), 4);
        assert_eq!(outcome.valid_count(), 2);
        let names: Vec<&str> = outcome
            .documents
            .iter()
            .map(|d| d.metadata.file_name.as_str())
            .collect();
        assert_eq!(names, vec!["a.png", "d.png"]);

        let failed: Vec<(usize, &str)> = outcome
            .failures
            .iter()
            .map(|f| (f.index, f.file_name.as_str()))
            .collect();
        assert_eq!(failed, vec![(1, "b.png"), (2, "c.jpg")]);
        assert!(matches!(outcome.failures[0].error, AduanaError::Input(_)));
    }
}
