use serde::{Deserialize, Serialize};

/// File types the retrieval endpoint accepts. Everything else is rejected
/// client-side before any request is issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentKind {
    Csv,
    Pdf,
    Doc,
    Docx,
}

impl DocumentKind {
    pub fn mime_type(&self) -> &'static str {
        match self {
            DocumentKind::Csv => "text/csv",
            DocumentKind::Pdf => "application/pdf",
            DocumentKind::Doc => "application/msword",
            DocumentKind::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
        }
    }

    pub fn from_mime(mime: &str) -> Option<Self> {
        match mime {
            "text/csv" => Some(DocumentKind::Csv),
            "application/pdf" => Some(DocumentKind::Pdf),
            "application/msword" => Some(DocumentKind::Doc),
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document" => {
                Some(DocumentKind::Docx)
            }
            _ => None,
        }
    }

    /// Infers the kind from a filename extension, case-insensitively.
    pub fn from_filename(name: &str) -> Option<Self> {
        let (stem, ext) = name.rsplit_once('.')?;
        if stem.is_empty() {
            // Dotfiles like ".csv" are not documents.
            return None;
        }
        match ext.to_ascii_lowercase().as_str() {
            "csv" => Some(DocumentKind::Csv),
            "pdf" => Some(DocumentKind::Pdf),
            "doc" => Some(DocumentKind::Doc),
            "docx" => Some(DocumentKind::Docx),
            _ => None,
        }
    }
}

/// A local file staged for upload to the retrieval endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentUpload {
    pub filename: String,
    pub kind: DocumentKind,
    pub bytes: Vec<u8>,
}

impl DocumentUpload {
    /// Stages a file when its extension belongs to an accepted kind.
    pub fn from_file(filename: impl Into<String>, bytes: Vec<u8>) -> Option<Self> {
        let filename = filename.into();
        let kind = DocumentKind::from_filename(&filename)?;
        Some(Self {
            filename,
            kind,
            bytes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_lookup_is_case_insensitive() {
        assert_eq!(DocumentKind::from_filename("report.PDF"), Some(DocumentKind::Pdf));
        assert_eq!(DocumentKind::from_filename("data.Csv"), Some(DocumentKind::Csv));
        assert_eq!(DocumentKind::from_filename("notes.docx"), Some(DocumentKind::Docx));
        assert_eq!(DocumentKind::from_filename("old.doc"), Some(DocumentKind::Doc));
    }

    #[test]
    fn disallowed_or_missing_extensions_are_rejected() {
        assert_eq!(DocumentKind::from_filename("image.png"), None);
        assert_eq!(DocumentKind::from_filename("archive.tar.gz"), None);
        assert_eq!(DocumentKind::from_filename("noextension"), None);
        assert_eq!(DocumentKind::from_filename(".csv"), None);
    }

    #[test]
    fn mime_round_trips_for_every_kind() {
        for kind in [
            DocumentKind::Csv,
            DocumentKind::Pdf,
            DocumentKind::Doc,
            DocumentKind::Docx,
        ] {
            assert_eq!(DocumentKind::from_mime(kind.mime_type()), Some(kind));
        }
        assert_eq!(DocumentKind::from_mime("application/json"), None);
    }

    #[test]
    fn staging_keeps_the_original_filename() {
        let doc = DocumentUpload::from_file("Quarterly Report.pdf", vec![1, 2, 3]).unwrap();
        assert_eq!(doc.filename, "Quarterly Report.pdf");
        assert_eq!(doc.kind, DocumentKind::Pdf);
        assert!(DocumentUpload::from_file("movie.mkv", vec![]).is_none());
    }
}
