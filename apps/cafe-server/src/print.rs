//! # Spool Printer
//!
//! [`PrintSurface`] that drops rendered documents into a spool directory,
//! where the till's print daemon (CUPS folder watch, a kiosk browser, ...)
//! picks them up.
//!
//! ```text
//! POST /api/orders/7/receipt/print
//!        │
//!        ▼
//! render_receipt() ──► Document { kind: Receipt, html }
//!        │
//!        ▼
//! SpoolPrinter ──► {spool_dir}/receipt-3f2c...e1.html
//! ```
//!
//! Files are written under a temporary name and renamed into place, so a
//! watcher never sees half a page.

use cafe_core::render::{Document, PrintSurface, RenderError};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct SpoolPrinter {
    dir: PathBuf,
}

impl SpoolPrinter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        SpoolPrinter { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn spool(&self, document: &Document) -> std::io::Result<PathBuf> {
        fs::create_dir_all(&self.dir)?;

        let name = format!("{}-{}", document.kind, Uuid::new_v4());
        let partial = self.dir.join(format!(".{}.part", name));
        let path = self.dir.join(format!("{}.html", name));

        fs::write(&partial, document.html.as_bytes())?;
        fs::rename(&partial, &path)?;

        Ok(path)
    }
}

impl PrintSurface for SpoolPrinter {
    fn present(&self, document: &Document) -> Result<(), RenderError> {
        let path = self.spool(document).map_err(|e| {
            RenderError::PresentationUnavailable(format!("{}: {}", self.dir.display(), e))
        })?;

        info!(kind = %document.kind, path = %path.display(), "Document spooled");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cafe_core::render::{present, DocumentKind};

    fn receipt() -> Document {
        Document {
            kind: DocumentKind::Receipt,
            title: "Receipt INV-20261019-00007".to_string(),
            html: "<!DOCTYPE html><html><body>Receipt</body></html>".to_string(),
        }
    }

    #[test]
    fn test_spools_html_file() {
        let dir = tempfile::tempdir().unwrap();
        let printer = SpoolPrinter::new(dir.path().join("spool"));

        present(&printer, &receipt()).unwrap();

        let files: Vec<_> = fs::read_dir(printer.dir())
            .unwrap()
            .map(|entry| entry.unwrap().path())
            .collect();
        assert_eq!(files.len(), 1);

        let name = files[0].file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("receipt-"));
        assert!(name.ends_with(".html"));
        assert_eq!(fs::read_to_string(&files[0]).unwrap(), receipt().html);
    }

    #[test]
    fn test_each_print_gets_its_own_file() {
        let dir = tempfile::tempdir().unwrap();
        let printer = SpoolPrinter::new(dir.path());

        present(&printer, &receipt()).unwrap();
        present(&printer, &receipt()).unwrap();

        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 2);
    }

    #[test]
    fn test_unwritable_spool_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        fs::write(&blocker, "").unwrap();

        let printer = SpoolPrinter::new(blocker.join("spool"));
        let err = present(&printer, &receipt()).unwrap_err();
        assert!(matches!(err, RenderError::PresentationUnavailable(_)));
    }
}
