use chrono::{DateTime, Utc};
use genpdf::{Alignment, Element, elements, style};

use crate::error::ViewerError;
use crate::export::layout::{PageSpec, paginate_document};
use crate::model::{SummaryNotes, Transcript};

/// Font configuration for the PDF renderer.
#[derive(Debug, Clone)]
pub struct PdfSettings {
    /// Directory holding the font files.
    pub font_dir: String,
    /// Font family name (e.g. "LiberationSans").
    pub font_family: String,
}

/// Renders the paginated document export to PDF bytes.
///
/// Pagination is decided by `paginate_document`; this function only maps
/// the pre-laid-out rows onto genpdf elements, one explicit page break per
/// layout page, with the stamped "Page i of N" footer centered at the
/// bottom of each.
pub fn render_pdf(
    transcript: &Transcript,
    notes: Option<&SummaryNotes>,
    exported_at: DateTime<Utc>,
    settings: &PdfSettings,
) -> Result<Vec<u8>, ViewerError> {
    let pages = paginate_document(transcript, notes, exported_at, PageSpec::default());

    let font = genpdf::fonts::from_files(&settings.font_dir, &settings.font_family, None)
        .map_err(|e| {
            ViewerError::Export(format!(
                "failed to load font family '{}' from '{}': {e}",
                settings.font_family, settings.font_dir
            ))
        })?;

    let mut doc = genpdf::Document::new(font);
    doc.set_title(transcript.title.clone());
    doc.set_paper_size(genpdf::PaperSize::A4);
    doc.set_font_size(10);
    doc.set_line_spacing(1.2);

    let mut decorator = genpdf::SimplePageDecorator::new();
    decorator.set_margins(15);
    doc.set_page_decorator(decorator);

    let last = pages.len().saturating_sub(1);
    for (i, page) in pages.iter().enumerate() {
        for row in &page.rows {
            if row.is_empty() {
                doc.push(elements::Break::new(1));
            } else {
                doc.push(elements::Paragraph::new(row.clone()));
            }
        }
        doc.push(elements::Break::new(1));
        doc.push(
            elements::Paragraph::new(page.footer.clone())
                .aligned(Alignment::Center)
                .styled(style::Style::new().with_font_size(8)),
        );
        if i != last {
            doc.push(elements::PageBreak::new());
        }
    }

    let mut bytes = Vec::new();
    doc.render(&mut bytes)
        .map_err(|e| ViewerError::Export(e.to_string()))?;
    Ok(bytes)
}
