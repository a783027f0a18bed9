use chrono::{DateTime, Utc};
use printpdf::{BuiltinFont, Mm, PdfDocument};

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const MARGIN_MM: f32 = 15.0;
const LINE_HEIGHT_MM: f32 = 6.0;
const BODY_FONT_SIZE: f32 = 8.0;

/// Render a simple tabular report: title, generation timestamp, then one
/// line per row with cells separated by " | ". Long lines are truncated to
/// the page width rather than wrapped.
pub fn render(
    title: &str,
    generated_at: DateTime<Utc>,
    headers: &[&str],
    rows: &[Vec<String>],
) -> Result<Vec<u8>, String> {
    let (doc, page, layer) =
        PdfDocument::new(title, Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");

    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| format!("Failed to load PDF font: {e}"))?;
    let font_bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| format!("Failed to load PDF font: {e}"))?;

    let mut current_layer = doc.get_page(page).get_layer(layer);
    let mut y = PAGE_HEIGHT_MM - MARGIN_MM;

    current_layer.use_text(title, 16.0, Mm(MARGIN_MM), Mm(y), &font_bold);
    y -= LINE_HEIGHT_MM * 1.5;
    current_layer.use_text(
        format!("Generated on: {}", generated_at.format("%Y-%m-%d %H:%M UTC")),
        9.0,
        Mm(MARGIN_MM),
        Mm(y),
        &font,
    );
    y -= LINE_HEIGHT_MM * 2.0;

    current_layer.use_text(
        truncate(&headers.join(" | ")),
        BODY_FONT_SIZE,
        Mm(MARGIN_MM),
        Mm(y),
        &font_bold,
    );
    y -= LINE_HEIGHT_MM;

    for row in rows {
        if y < MARGIN_MM {
            let (next_page, next_layer) =
                doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
            current_layer = doc.get_page(next_page).get_layer(next_layer);
            y = PAGE_HEIGHT_MM - MARGIN_MM;
        }

        current_layer.use_text(
            truncate(&row.join(" | ")),
            BODY_FONT_SIZE,
            Mm(MARGIN_MM),
            Mm(y),
            &font,
        );
        y -= LINE_HEIGHT_MM;
    }

    doc.save_to_bytes()
        .map_err(|e| format!("Failed to build PDF: {e}"))
}

fn truncate(line: &str) -> String {
    // Helvetica at 8pt fits roughly this many characters across an A4 page.
    const MAX_CHARS: usize = 130;
    if line.chars().count() <= MAX_CHARS {
        return line.to_string();
    }
    let mut out: String = line.chars().take(MAX_CHARS - 1).collect();
    out.push('\u{2026}');
    out
}

#[cfg(test)]
mod tests {
    use super::truncate;

    #[test]
    fn short_lines_untouched() {
        assert_eq!(truncate("abc"), "abc");
    }

    #[test]
    fn long_lines_get_ellipsis() {
        let long = "x".repeat(200);
        let out = truncate(&long);
        assert_eq!(out.chars().count(), 130);
        assert!(out.ends_with('\u{2026}'));
    }
}
