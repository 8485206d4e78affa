//! # document: plain text out of an uploaded strategy document
//!
//! | Extension     | Reader                                             |
//! |---------------|----------------------------------------------------|
//! | `.txt`, `.md` | UTF-8 as-is                                        |
//! | `.pdf`        | `pdf-extract`, on the blocking pool                |
//! | `.docx`       | `word/document.xml` via `zip`, one line per `<w:p>` |

use std::{
    io::{Cursor, Read},
    path::Path,
};

use quick_xml::{events::Event, Reader};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Unsupported file format: '{ext}'. Supported: .txt, .md, .pdf, .docx")]
    Unsupported { ext: String },

    #[error("Error reading {path}: {source}")]
    Io {
        path:   String,
        #[source]
        source: std::io::Error,
    },

    #[error("Error reading {format} {path}: {reason}")]
    Malformed {
        format: &'static str,
        path:   String,
        reason: String,
    },
}

pub async fn extract_text(path: &Path) -> Result<String, ExtractError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();

    let text = match ext.as_str() {
        "txt" | "md" => tokio::fs::read_to_string(path).await.map_err(|e| io_error(path, e))?,
        "pdf" => {
            let bytes = read_bytes(path).await?;
            tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes))
                .await
                .map_err(|e| malformed("PDF", path, e))?
                .map_err(|e| malformed("PDF", path, e))?
        }
        "docx" => {
            let bytes = read_bytes(path).await?;
            docx_text(&bytes).map_err(|reason| ExtractError::Malformed {
                format: "DOCX",
                path: path.display().to_string(),
                reason,
            })?
        }
        _ => return Err(ExtractError::Unsupported { ext: format!(".{ext}") }),
    };

    debug!(path = %path.display(), chars = text.len(), "Document text extracted");
    Ok(text)
}

async fn read_bytes(path: &Path) -> Result<Vec<u8>, ExtractError> {
    tokio::fs::read(path).await.map_err(|e| io_error(path, e))
}

fn io_error(path: &Path, source: std::io::Error) -> ExtractError {
    ExtractError::Io { path: path.display().to_string(), source }
}

fn malformed(format: &'static str, path: &Path, reason: impl std::fmt::Display) -> ExtractError {
    ExtractError::Malformed { format, path: path.display().to_string(), reason: reason.to_string() }
}

// ─── DOCX ─────────────────────────────────────────────────────────────────────

/// Paragraph texts of the main document part, joined by `\n`.
fn docx_text(bytes: &[u8]) -> Result<String, String> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).map_err(|e| e.to_string())?;
    let mut xml = String::new();
    archive
        .by_name("word/document.xml")
        .map_err(|e| e.to_string())?
        .read_to_string(&mut xml)
        .map_err(|e| e.to_string())?;

    let mut reader = Reader::from_str(&xml);
    let mut paragraphs = Vec::new();
    let mut current = String::new();
    let mut in_text = false;

    loop {
        match reader.read_event().map_err(|e| e.to_string())? {
            Event::Start(e) if e.name().as_ref() == b"w:t" => in_text = true,
            Event::End(e) => match e.name().as_ref() {
                b"w:t" => in_text = false,
                b"w:p" => paragraphs.push(std::mem::take(&mut current)),
                _ => {}
            },
            Event::Empty(e) => match e.name().as_ref() {
                b"w:tab" => current.push('\t'),
                b"w:br" | b"w:cr" => current.push('\n'),
                b"w:p" => paragraphs.push(String::new()),
                _ => {}
            },
            Event::Text(t) if in_text => current.push_str(&t.unescape().map_err(|e| e.to_string())?),
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(paragraphs.join("\n"))
}
