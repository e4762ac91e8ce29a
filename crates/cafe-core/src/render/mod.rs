//! # Document Renderer
//!
//! Turns a completed order or a sales report into a self-contained,
//! printable HTML page.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Order + items ──► render_receipt() ──┐                                 │
//! │                                       ├──► Document { kind, html }      │
//! │  SalesReport ────► render_report() ───┘            │                    │
//! │                                                    ▼                    │
//! │                                     PrintSurface::present(&document)    │
//! │                                                    │                    │
//! │                          Err(PresentationUnavailable) when the          │
//! │                          surface cannot be acquired (no retry)          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Rendering is pure: the same inputs give byte-identical HTML. Dates are
//! printed in the offset passed in by the caller, and every piece of user
//! text is HTML-escaped. Pages carry their own inline CSS and reference no
//! external assets.

pub mod format;
mod receipt;
mod report;

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

pub use receipt::{render_receipt, ReceiptOrder};
pub use report::render_report;

/// Fixed statutory line printed on every receipt.
pub const LEGAL_FOOTER: &str = "Tax Invoice under GST Act 2017";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Receipt,
    Report,
}

impl DocumentKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            DocumentKind::Receipt => "receipt",
            DocumentKind::Report => "report",
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A rendered, printable page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub kind: DocumentKind,
    /// Contents of the page's `<title>`.
    pub title: String,
    pub html: String,
}

#[derive(Debug, Error)]
pub enum RenderError {
    /// The print window, printer or spool could not be acquired.
    #[error("Could not open print surface: {0}")]
    PresentationUnavailable(String),
}

/// Somewhere a rendered document can be sent: a printer, a spool directory,
/// a browser print dialog.
pub trait PrintSurface {
    /// Hands the document over in one attempt.
    fn present(&self, document: &Document) -> Result<(), RenderError>;
}

/// Presents `document` on `surface`; failures are reported, never retried.
pub fn present<S>(surface: &S, document: &Document) -> Result<(), RenderError>
where
    S: PrintSurface + ?Sized,
{
    surface.present(document)
}

/// Wraps a body in a complete HTML page with inline styles.
pub(crate) fn page(title: &str, style: &str, body: &str) -> String {
    let mut html = String::with_capacity(style.len() + body.len() + 256);
    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str(&format!("<title>{}</title>\n", format::escape_html(title)));
    html.push_str("<style>\n");
    html.push_str(style);
    html.push_str("</style>\n</head>\n<body>\n");
    html.push_str(body);
    html.push_str("</body>\n</html>\n");
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    struct RecordingSurface {
        printed: RefCell<Vec<String>>,
    }

    impl PrintSurface for RecordingSurface {
        fn present(&self, document: &Document) -> Result<(), RenderError> {
            self.printed.borrow_mut().push(document.title.clone());
            Ok(())
        }
    }

    struct BlockedSurface;

    impl PrintSurface for BlockedSurface {
        fn present(&self, _document: &Document) -> Result<(), RenderError> {
            Err(RenderError::PresentationUnavailable("popup blocked".to_string()))
        }
    }

    fn document() -> Document {
        Document {
            kind: DocumentKind::Receipt,
            title: "Receipt #1".to_string(),
            html: page("Receipt #1", "", "<p>hi</p>"),
        }
    }

    #[test]
    fn test_page_is_self_contained() {
        let html = page("A & B", "body { margin: 0; }\n", "<p>x</p>");
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>A &amp; B</title>"));
        assert!(html.contains("<style>"));
        assert!(!html.contains("<link"));
        assert!(!html.contains("<script"));
    }

    #[test]
    fn test_present_delegates_to_surface() {
        let surface = RecordingSurface {
            printed: RefCell::new(Vec::new()),
        };
        present(&surface, &document()).unwrap();
        assert_eq!(*surface.printed.borrow(), vec!["Receipt #1".to_string()]);
    }

    #[test]
    fn test_present_reports_unavailable_surface() {
        let err = present(&BlockedSurface, &document()).unwrap_err();
        assert!(matches!(err, RenderError::PresentationUnavailable(_)));
        assert_eq!(err.to_string(), "Could not open print surface: popup blocked");
    }
}
