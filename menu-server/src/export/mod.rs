//! Menu export
//!
//! [`export_menu`] renders a menu to PDF, one A4 page per segment (header,
//! each section, footer). If any segment cannot be rendered the whole PDF is
//! abandoned and a printable HTML page is returned instead. Export never
//! fails the request.

pub mod pdf;
pub mod print;

use axum::response::{Html, IntoResponse, Response};
use http::{StatusCode, header};
use shared::models::Menu;
use shared::util::underscore_whitespace;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("character {0:?} has no glyph in the standard PDF fonts")]
    UnsupportedCharacter(char),

    #[error("PDF encoding failed: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("PDF write failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Rendered export
#[derive(Debug, Clone)]
pub enum ExportOutput {
    Pdf { file_name: String, bytes: Vec<u8> },
    /// Print-ready page that opens the print dialog
    Print { html: String },
}

/// `"Patel Wedding"` → `"Patel_Wedding_Menu.pdf"`
pub fn file_name(title: &str) -> String {
    format!("{}_Menu.pdf", underscore_whitespace(title))
}

/// `attachment` disposition with an ASCII `filename` fallback and the exact
/// name as RFC 5987 `filename*`
pub fn content_disposition(file_name: &str) -> String {
    let fallback: String = file_name
        .chars()
        .map(|c| match c {
            '"' | '\\' | ';' => '_',
            ' '..='~' => c,
            _ => '_',
        })
        .collect();
    format!(
        "attachment; filename=\"{fallback}\"; filename*=UTF-8''{}",
        urlencoding::encode(file_name)
    )
}

/// Drop `<...>` tags, keeping their text
pub fn strip_markup(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_tag = false;
    for ch in text.chars() {
        match ch {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    out
}

pub fn export_menu(menu: &Menu) -> ExportOutput {
    match pdf::render(menu) {
        Ok(bytes) => {
            tracing::info!(title = %menu.title, size = bytes.len(), "Menu exported to PDF");
            ExportOutput::Pdf {
                file_name: file_name(&menu.title),
                bytes,
            }
        }
        Err(e) => {
            tracing::warn!(title = %menu.title, error = %e, "PDF export failed, serving print view");
            ExportOutput::Print {
                html: print::render(menu),
            }
        }
    }
}

impl IntoResponse for ExportOutput {
    fn into_response(self) -> Response {
        match self {
            ExportOutput::Pdf { file_name, bytes } => (
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, "application/pdf".to_string()),
                    (
                        header::CONTENT_DISPOSITION,
                        content_disposition(&file_name),
                    ),
                ],
                bytes,
            )
                .into_response(),
            ExportOutput::Print { html } => Html(html).into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_name() {
        assert_eq!(file_name("Patel  Wedding\tFeast"), "Patel_Wedding_Feast_Menu.pdf");
    }

    #[test]
    fn test_content_disposition() {
        assert_eq!(
            content_disposition("Patel_Wedding_Menu.pdf"),
            "attachment; filename=\"Patel_Wedding_Menu.pdf\"; filename*=UTF-8''Patel_Wedding_Menu.pdf"
        );

        let header = content_disposition("Café_\"Noël\"_Menu.pdf");
        assert!(header.is_ascii());
        assert!(header.contains("filename=\"Caf___No_l__Menu.pdf\""));
        assert!(header.ends_with("filename*=UTF-8''Caf%C3%A9_%22No%C3%ABl%22_Menu.pdf"));
        assert!(http::HeaderValue::from_str(&header).is_ok());
    }

    #[test]
    fn test_strip_markup() {
        assert_eq!(
            strip_markup("curated for <b>the Patels</b>."),
            "curated for the Patels."
        );
        assert_eq!(strip_markup("3 > 2"), "3 > 2");
    }

    #[test]
    fn test_unrenderable_menu_falls_back_to_print() {
        let mut menu = crate::db::sample_menu("Shaadi");
        menu.title = "शादी Feast".to_string();
        match export_menu(&menu) {
            ExportOutput::Print { html } => assert!(html.contains("window.print()")),
            ExportOutput::Pdf { .. } => panic!("expected print fallback"),
        }
    }
}
