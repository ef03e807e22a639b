use std::path::Path;

use time::OffsetDateTime;

use crate::canvas::{Advance, Align, Border, Canvas, Margins};
use crate::configuration::{AssetPolicy, LayoutConfiguration};
use crate::document::ReportData;
use crate::error::ContextError;
use crate::font::FontStyle;
use crate::pdf::{ImageXObject, PdfDocument, PdfMetadata};

/// First half of the trailer `ID` of every generated sheet.
const DOCUMENT_IDENTIFIER: &str = "LabsheetSinglePageResultReport01";

const TABLE_HEADINGS: [&str; 4] = ["Investigation", "Result", "Reference Value", "Unit"];

/// Draws the whole result sheet on the canvas. Every region starts from the cursor
/// left by the previous one, so the order of the calls below is the layout.
pub fn render_report(
    canvas: &mut Canvas,
    report: &ReportData,
    layout: &LayoutConfiguration,
) -> Result<(), ContextError> {
    canvas.set_margins(Margins::all(layout.margin));
    draw_frame(canvas)?;
    canvas.set_font(FontStyle::Regular, layout.base_font_size);
    draw_logo(canvas, layout)?;
    draw_header(canvas, report, layout)?;
    draw_patient_fields(canvas, report, layout)?;
    draw_results_table(canvas, report, layout)?;
    draw_footer(canvas, report, layout)?;

    Ok(())
}

fn draw_frame(canvas: &mut Canvas) -> Result<(), ContextError> {
    let geometry = canvas.geometry();
    log::debug!(
        "Drawing the page frame of {}mm x {}mm",
        geometry.printable_width(),
        geometry.printable_height()
    );
    canvas.draw_rectangle(
        geometry.margins.left,
        geometry.margins.top,
        geometry.printable_width(),
        geometry.printable_height(),
    )
}

fn draw_logo(canvas: &mut Canvas, layout: &LayoutConfiguration) -> Result<(), ContextError> {
    let logo = match ImageXObject::from_path(&layout.logo_path) {
        Ok(logo) => logo,
        Err(error) if error.is_recoverable() && layout.asset_policy == AssetPolicy::Skip => {
            log::warn!("{}, the report is rendered without a logo", error);
            return Ok(());
        }
        Err(error) => return Err(error),
    };

    let [x, y] = layout.logo_position;
    let height = canvas.place_image(logo, x, y, layout.logo_width)?;
    log::debug!(
        "Placed the logo {:?} at ({}, {}) with a size of {}mm x {}mm",
        layout.logo_path,
        x,
        y,
        layout.logo_width,
        height
    );

    Ok(())
}

fn draw_header(
    canvas: &mut Canvas,
    report: &ReportData,
    layout: &LayoutConfiguration,
) -> Result<(), ContextError> {
    canvas.set_font(FontStyle::Bold, layout.header_font_size);
    canvas.cell(
        layout.printable_width(),
        layout.line_height,
        &report.lab_name,
        Border::None,
        Advance::NextLine,
        Align::Center,
    )
}

fn draw_patient_fields(
    canvas: &mut Canvas,
    report: &ReportData,
    layout: &LayoutConfiguration,
) -> Result<(), ContextError> {
    log::debug!(
        "Writing {} patient fields from {}mm",
        report.patient_fields.len(),
        canvas.cursor().y
    );
    canvas.set_font(FontStyle::Regular, layout.body_font_size);
    for field in report.patient_fields.iter() {
        canvas.set_x(layout.margin);
        canvas.cell(
            layout.label_width,
            layout.line_height,
            &format!("{}:", field.label),
            Border::None,
            Advance::Right,
            Align::Left,
        )?;
        canvas.cell(
            0.0,
            layout.line_height,
            &field.value,
            Border::None,
            Advance::NextLine,
            Align::Left,
        )?;
    }
    // One blank line between the patient details and the table
    canvas.line_break(layout.line_height);

    Ok(())
}

fn draw_results_table(
    canvas: &mut Canvas,
    report: &ReportData,
    layout: &LayoutConfiguration,
) -> Result<(), ContextError> {
    log::debug!(
        "Writing the results table with {} rows from {}mm",
        report.result_rows.len(),
        canvas.cursor().y
    );
    canvas.set_font(FontStyle::Bold, layout.body_font_size);
    draw_table_row(canvas, layout, TABLE_HEADINGS, Align::Center)?;

    canvas.set_font(FontStyle::Regular, layout.body_font_size);
    for row in report.result_rows.iter() {
        draw_table_row(
            canvas,
            layout,
            [
                row.test_name.as_str(),
                row.result.as_str(),
                row.reference_range.as_str(),
                row.unit.as_str(),
            ],
            Align::Left,
        )?;
    }

    Ok(())
}

fn draw_table_row(
    canvas: &mut Canvas,
    layout: &LayoutConfiguration,
    cells: [&str; 4],
    align: Align,
) -> Result<(), ContextError> {
    let last_column = cells.len() - 1;
    for (column, (text, width)) in cells.iter().zip(layout.column_widths).enumerate() {
        let advance = if column == last_column {
            Advance::NextLine
        } else {
            Advance::Right
        };
        canvas.cell(width, layout.line_height, text, Border::Frame, advance, align)?;
    }

    Ok(())
}

fn draw_footer(
    canvas: &mut Canvas,
    report: &ReportData,
    layout: &LayoutConfiguration,
) -> Result<(), ContextError> {
    canvas.set_y_from_bottom(layout.footer_offset);
    canvas.set_font(FontStyle::Italic, layout.footer_font_size);
    canvas.cell(
        0.0,
        layout.line_height,
        &report.footer,
        Border::None,
        Advance::NextLine,
        Align::Center,
    )
}

/// Renders the report into a finalized PDF document, ready to be saved. The creation
/// date is the only input besides the report and the layout, so the same arguments
/// always produce the same bytes.
pub fn report_to_pdf_document(
    report: &ReportData,
    layout: &LayoutConfiguration,
    creation_date: OffsetDateTime,
) -> Result<PdfDocument, ContextError> {
    let mut pdf_document = PdfDocument::new(DOCUMENT_IDENTIFIER.into());
    pdf_document.metadata = PdfMetadata {
        title: report.title.clone(),
        subject: report.subject.clone(),
        author: report.lab_name.clone(),
        creation_date,
        ..PdfMetadata::default()
    };

    let mut canvas = Canvas::new(pdf_document, layout.page_width, layout.page_height);
    render_report(&mut canvas, report, layout)?;

    let mut pdf_document = canvas.into_document();
    pdf_document.write_all(format!("{:032}", creation_date.unix_timestamp()))?;
    pdf_document.optimize();

    Ok(pdf_document)
}

/// Renders the report and writes it to the given path, replacing any existing file.
pub fn save_report_to_path(
    report: &ReportData,
    layout: &LayoutConfiguration,
    creation_date: OffsetDateTime,
    output_path: &Path,
) -> Result<(), ContextError> {
    let mut pdf_document = report_to_pdf_document(report, layout, creation_date)?;
    pdf_document.save_to_path(output_path)?;
    log::info!("Saved the report to the path: {:?}", output_path);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::font::BuiltinFont;
    use crate::pdf::millimeters_to_points;

    fn layout_without_logo() -> LayoutConfiguration {
        LayoutConfiguration {
            logo_path: "img/missing-logo.jpg".into(),
            ..LayoutConfiguration::default()
        }
    }

    #[test]
    fn regions_leave_the_cursor_where_the_next_one_starts() {
        let layout = layout_without_logo();
        let report = ReportData::sample();
        let mut canvas = Canvas::new(PdfDocument::new("RenderTest".into()), 210.0, 297.0);

        canvas.set_margins(Margins::all(layout.margin));
        canvas.set_font(FontStyle::Regular, layout.base_font_size);
        draw_header(&mut canvas, &report, &layout).unwrap();
        assert_eq!((canvas.cursor().x, canvas.cursor().y), (10.0, 20.0));

        draw_patient_fields(&mut canvas, &report, &layout).unwrap();
        // Four rows and a blank line
        assert_eq!((canvas.cursor().x, canvas.cursor().y), (10.0, 70.0));

        draw_results_table(&mut canvas, &report, &layout).unwrap();
        assert_eq!((canvas.cursor().x, canvas.cursor().y), (10.0, 90.0));

        draw_footer(&mut canvas, &report, &layout).unwrap();
        assert_eq!(canvas.cursor().y, 267.0);
        let font = canvas.cursor().font.unwrap();
        assert_eq!(font.size, 8.0);
    }

    #[test]
    fn header_is_centered_inside_wider_margins() {
        let layout = LayoutConfiguration {
            margin: 20.0,
            ..layout_without_logo()
        };
        let report = ReportData::sample();
        let mut canvas = Canvas::new(PdfDocument::new("RenderTest".into()), 210.0, 297.0);
        render_report(&mut canvas, &report, &layout).unwrap();

        let document = canvas.into_document();
        let header_position = document.pages[0].layers[0]
            .operations
            .iter()
            .find(|operation| operation.operator == "Td")
            .unwrap();
        let x = header_position.operands[0].as_float().unwrap() / millimeters_to_points(1.0);
        let y = header_position.operands[1].as_float().unwrap() / millimeters_to_points(1.0);

        let text_width = BuiltinFont::HelveticaBold.string_width(&report.lab_name, 16.0)
            / millimeters_to_points(1.0);
        // Centered on the middle of the page, not of the default 10mm margins
        assert!((x + text_width / 2.0 - 105.0).abs() < 1e-2, "x = {}", x);
        let baseline = 20.0 + 5.0 + 0.3 * 16.0 / millimeters_to_points(1.0);
        assert!((y - (297.0 - baseline)).abs() < 1e-2, "y = {}", y);
    }

    #[test]
    fn missing_logo_is_skipped_by_default() {
        let document = report_to_pdf_document(
            &ReportData::sample(),
            &layout_without_logo(),
            OffsetDateTime::UNIX_EPOCH,
        );

        assert!(document.is_ok());
    }

    #[test]
    fn missing_logo_fails_when_assets_are_strict() {
        let layout = LayoutConfiguration {
            asset_policy: AssetPolicy::Fail,
            ..layout_without_logo()
        };
        let error =
            report_to_pdf_document(&ReportData::sample(), &layout, OffsetDateTime::UNIX_EPOCH)
                .err()
                .unwrap();

        assert_eq!(error.kind, ErrorKind::AssetMissing);
        assert!(error.is_recoverable());
    }
}
