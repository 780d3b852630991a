//! File loading: turning uploaded bytes into document text.

use std::collections::HashMap;
use std::path::Path;

use tracing::debug;
use uuid::Uuid;

use crate::document::Document;
use crate::error::{AssistantError, Result};

/// Supported upload formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    /// PDF, extracted page by page.
    Pdf,
    /// Plain text, decoded as UTF-8.
    Txt,
}

impl FileType {
    /// Detect the file type from a file name's extension.
    pub fn from_name(name: &str) -> Option<Self> {
        let extension = Path::new(name).extension()?.to_str()?;
        match extension.to_ascii_lowercase().as_str() {
            "pdf" => Some(FileType::Pdf),
            "txt" => Some(FileType::Txt),
            _ => None,
        }
    }
}

/// An uploaded file: raw bytes plus the declared format.
#[derive(Debug, Clone)]
pub struct FileUpload {
    /// Original file name, propagated into chunk metadata as `source`.
    pub name: String,
    /// Raw file content.
    pub bytes: Vec<u8>,
    /// Declared format, used to pick the parser.
    pub file_type: FileType,
}

impl FileUpload {
    /// Create an upload from in-memory bytes.
    pub fn new(name: impl Into<String>, bytes: Vec<u8>, file_type: FileType) -> Self {
        Self { name: name.into(), bytes, file_type }
    }

    /// Read an upload from disk, detecting the type from the extension.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        let file_type = FileType::from_name(&name).ok_or_else(|| AssistantError::Parse {
            file: name.clone(),
            message: "unsupported file type (expected .pdf or .txt)".to_string(),
        })?;

        let bytes = std::fs::read(path).map_err(|e| AssistantError::Parse {
            file: name.clone(),
            message: format!("failed to read file: {e}"),
        })?;

        Ok(Self { name, bytes, file_type })
    }

    /// Parse the upload into a [`Document`] with a freshly minted ID.
    ///
    /// # Errors
    ///
    /// Returns [`AssistantError::Parse`] if the bytes cannot be parsed.
    pub fn into_document(self) -> Result<Document> {
        let text = extract_text(&self)?;
        let file_type = match self.file_type {
            FileType::Pdf => "pdf",
            FileType::Txt => "txt",
        };
        Ok(Document {
            id: Uuid::new_v4().to_string(),
            text,
            metadata: HashMap::from([
                ("source".to_string(), self.name),
                ("file_type".to_string(), file_type.to_string()),
            ]),
        })
    }
}

/// Extract text from an upload according to its declared type.
///
/// PDF pages are extracted individually and joined with blank lines; plain
/// text is decoded as strict UTF-8. A file that parses but contains no text
/// yields an empty string, not an error.
pub fn extract_text(upload: &FileUpload) -> Result<String> {
    match upload.file_type {
        FileType::Pdf => extract_pdf(&upload.name, &upload.bytes),
        FileType::Txt => extract_txt(&upload.name, &upload.bytes),
    }
}

fn extract_pdf(name: &str, bytes: &[u8]) -> Result<String> {
    let document = lopdf::Document::load_mem(bytes).map_err(|e| AssistantError::Parse {
        file: name.to_string(),
        message: format!("invalid PDF: {e}"),
    })?;

    if document.is_encrypted() {
        return Err(AssistantError::Parse {
            file: name.to_string(),
            message: "PDF is encrypted".to_string(),
        });
    }

    let mut pages = Vec::new();
    for page_number in document.get_pages().keys() {
        // Pages without a text layer extract as empty rather than failing
        // the whole file.
        let text = document.extract_text(&[*page_number]).unwrap_or_default();
        let text = text.trim();
        if !text.is_empty() {
            pages.push(text.to_string());
        }
    }

    debug!(file = name, page_count = pages.len(), "extracted pdf text");
    Ok(pages.join("\n\n"))
}

fn extract_txt(name: &str, bytes: &[u8]) -> Result<String> {
    String::from_utf8(bytes.to_vec()).map_err(|e| AssistantError::Parse {
        file: name.to_string(),
        message: format!("invalid UTF-8: {e}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_type_is_detected_from_extension() {
        assert_eq!(FileType::from_name("report.pdf"), Some(FileType::Pdf));
        assert_eq!(FileType::from_name("NOTES.TXT"), Some(FileType::Txt));
        assert_eq!(FileType::from_name("image.png"), None);
        assert_eq!(FileType::from_name("no_extension"), None);
    }

    #[test]
    fn txt_decodes_as_utf8() {
        let upload = FileUpload::new("notes.txt", "hello, café".as_bytes().to_vec(), FileType::Txt);
        assert_eq!(extract_text(&upload).unwrap(), "hello, café");
    }

    #[test]
    fn invalid_utf8_is_a_parse_error() {
        let upload = FileUpload::new("broken.txt", vec![0xff, 0xfe, 0x00], FileType::Txt);
        let err = extract_text(&upload);
        assert!(matches!(err, Err(AssistantError::Parse { file, .. }) if file == "broken.txt"));
    }

    #[test]
    fn garbage_bytes_are_not_a_valid_pdf() {
        let upload = FileUpload::new("fake.pdf", b"not a pdf at all".to_vec(), FileType::Pdf);
        let err = extract_text(&upload);
        assert!(matches!(err, Err(AssistantError::Parse { file, .. }) if file == "fake.pdf"));
    }

    #[test]
    fn parsed_document_carries_source_metadata() {
        let upload = FileUpload::new("notes.txt", b"some text".to_vec(), FileType::Txt);
        let document = upload.into_document().unwrap();
        assert_eq!(document.text, "some text");
        assert_eq!(document.metadata.get("source").map(String::as_str), Some("notes.txt"));
        assert_eq!(document.metadata.get("file_type").map(String::as_str), Some("txt"));
        assert!(!document.id.is_empty());
    }

    #[test]
    fn document_ids_are_unique_per_upload() {
        let a = FileUpload::new("same.txt", b"text".to_vec(), FileType::Txt)
            .into_document()
            .unwrap();
        let b = FileUpload::new("same.txt", b"text".to_vec(), FileType::Txt)
            .into_document()
            .unwrap();
        assert_ne!(a.id, b.id);
    }
}
