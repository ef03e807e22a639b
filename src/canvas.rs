use crate::error::{ContextError, ErrorKind};
use crate::font::{BuiltinFont, FontStyle};
use crate::pdf::{millimeters_to_points, ImageXObject, PdfDocument};

/// Width of the stroke used for rectangles and cell borders, in millimeters.
const LINE_WIDTH: f32 = 0.2;
/// Horizontal padding between a cell border and left or right aligned text, in millimeters.
const CELL_PADDING: f32 = 1.0;
const TEXT_COLOR: [f32; 3] = [0.0, 0.0, 0.0];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Margins {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl Margins {
    /// Create margins where all values are equal.
    pub fn all(value: f32) -> Margins {
        Margins {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }
}

/// The size of the page and its margins, in millimeters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub width: f32,
    pub height: f32,
    pub margins: Margins,
}

impl PageGeometry {
    pub fn printable_width(&self) -> f32 {
        self.width - self.margins.left - self.margins.right
    }

    pub fn printable_height(&self) -> f32 {
        self.height - self.margins.top - self.margins.bottom
    }
}

/// The font the next cells are written with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontSelection {
    pub font: BuiltinFont,
    /// Size in points.
    pub size: f32,
}

impl FontSelection {
    /// The size converted to millimeters, the unit of every other length on the canvas.
    fn size_in_millimeters(&self) -> f32 {
        self.size / millimeters_to_points(1.0)
    }
}

/// The write position and the current font. Positions are in millimeters measured
/// from the top-left corner of the page, growing rightwards and downwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cursor {
    pub x: f32,
    pub y: f32,
    pub font: Option<FontSelection>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Border {
    None,
    Frame,
}

/// Where the cursor goes once a cell has been written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// To the right edge of the cell, on the same line.
    Right,
    /// To the left margin, below the cell.
    NextLine,
}

/// A single page being drawn with sequential, cursor-relative operations. It owns the
/// document until `into_document` hands it back for finalization.
pub struct Canvas {
    document: PdfDocument,
    page_index: usize,
    layer_index: usize,
    geometry: PageGeometry,
    cursor: Cursor,
}

impl Canvas {
    /// Opens a new page of the given size. The margins default to 10mm and the cursor
    /// starts at the top-left corner of the printable area with no font selected.
    pub fn new(mut document: PdfDocument, page_width: f32, page_height: f32) -> Self {
        let (page_index, layer_index) = document.add_page_with_layer(page_width, page_height);
        let margins = Margins::all(10.0);

        Canvas {
            document,
            page_index,
            layer_index,
            geometry: PageGeometry {
                width: page_width,
                height: page_height,
                margins,
            },
            cursor: Cursor {
                x: margins.left,
                y: margins.top,
                font: None,
            },
        }
    }

    pub fn geometry(&self) -> PageGeometry {
        self.geometry
    }

    /// A snapshot of the cursor, it does not change when the canvas is drawn on afterwards.
    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Changes the margins used by the following operations and moves the cursor to the
    /// top-left corner of the new printable area. The font stays selected.
    pub fn set_margins(&mut self, margins: Margins) {
        self.geometry.margins = margins;
        self.cursor.x = margins.left;
        self.cursor.y = margins.top;
    }

    pub fn set_font(&mut self, style: FontStyle, size: f32) {
        let font = BuiltinFont::from_style(style);
        self.document.add_font(font);
        self.cursor.font = Some(FontSelection { font, size });
    }

    pub fn set_x(&mut self, x: f32) {
        self.cursor.x = x;
    }

    /// Moves to the given height and back to the left margin.
    pub fn set_y(&mut self, y: f32) {
        self.cursor.x = self.geometry.margins.left;
        self.cursor.y = y;
    }

    /// Moves to the given distance above the bottom edge of the page and back to the left margin.
    pub fn set_y_from_bottom(&mut self, distance: f32) {
        self.set_y(self.geometry.height - distance);
    }

    /// Moves to the left margin, the given height further down.
    pub fn line_break(&mut self, height: f32) {
        self.cursor.x = self.geometry.margins.left;
        self.cursor.y += height;
    }

    /// Strokes a rectangle given its top-left corner and its size.
    pub fn draw_rectangle(
        &mut self,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    ) -> Result<(), ContextError> {
        let lower_left = [x, self.geometry.height - y - height];
        self.document.draw_rectangle_in_layer(
            self.page_index,
            self.layer_index,
            lower_left,
            [width, height],
            LINE_WIDTH,
        )
    }

    /// Places the image with its top-left corner at the given position, scaled to the
    /// given width with the height following the aspect ratio. Returns that height.
    pub fn place_image(
        &mut self,
        image: ImageXObject,
        x: f32,
        y: f32,
        width: f32,
    ) -> Result<f32, ContextError> {
        let height = image.height_for_width(width);
        let reference = self.document.add_image_to_page(self.page_index, image)?;
        self.document.place_image_in_layer(
            self.page_index,
            self.layer_index,
            &reference,
            [x, self.geometry.height - y - height],
            [width, height],
        )?;

        Ok(height)
    }

    /// Writes a cell at the cursor. A width of zero stretches the cell to the right margin.
    /// The text is vertically centered in the cell, empty text only draws the border.
    pub fn cell(
        &mut self,
        width: f32,
        height: f32,
        text: &str,
        border: Border,
        advance: Advance,
        align: Align,
    ) -> Result<(), ContextError> {
        let Cursor { x, y, font } = self.cursor;
        let width = if width == 0.0 {
            self.geometry.width - self.geometry.margins.right - x
        } else {
            width
        };

        if border == Border::Frame {
            self.draw_rectangle(x, y, width, height)?;
        }

        if !text.is_empty() {
            let font = font.ok_or(ContextError::with_context(
                ErrorKind::Render,
                format!("No font selected before writing the cell {:?}", text),
            ))?;
            let text_width = font.font.string_width(text, font.size) / millimeters_to_points(1.0);
            let offset = match align {
                Align::Left => CELL_PADDING,
                Align::Center => (width - text_width) / 2.0,
                Align::Right => width - CELL_PADDING - text_width,
            };
            let baseline = y + 0.5 * height + 0.3 * font.size_in_millimeters();
            self.document.write_text_to_layer_in_page(
                self.page_index,
                self.layer_index,
                TEXT_COLOR,
                text,
                font.font,
                font.size,
                [x + offset, self.geometry.height - baseline],
            )?;
        }

        match advance {
            Advance::Right => self.cursor.x = x + width,
            Advance::NextLine => self.line_break(height),
        }

        Ok(())
    }

    /// Hands back the document, with everything drawn so far, for finalization.
    pub fn into_document(self) -> PdfDocument {
        self.document
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn a4_canvas() -> Canvas {
        Canvas::new(PdfDocument::new("CanvasTest".into()), 210.0, 297.0)
    }

    fn text_positions(canvas: Canvas) -> Vec<(Vec<u8>, f32, f32)> {
        let document = canvas.into_document();
        document.pages[0].layers[0]
            .operations
            .windows(5)
            .filter(|window| window[1].operator == "Tf" && window[4].operator == "Tj")
            .map(|window| {
                let x = window[2].operands[0].as_float().unwrap();
                let y = window[2].operands[1].as_float().unwrap();
                let text = window[4].operands[0].as_str().unwrap().to_vec();
                (text, x, y)
            })
            .collect()
    }

    #[test]
    fn cells_advance_right_then_to_the_next_line() {
        let mut canvas = a4_canvas();
        canvas.set_font(FontStyle::Regular, 12.0);

        canvas
            .cell(40.0, 10.0, "Name:", Border::None, Advance::Right, Align::Left)
            .unwrap();
        assert_eq!((canvas.cursor().x, canvas.cursor().y), (50.0, 10.0));

        canvas
            .cell(0.0, 10.0, "Jalpa S. Sharma", Border::None, Advance::NextLine, Align::Left)
            .unwrap();
        assert_eq!((canvas.cursor().x, canvas.cursor().y), (10.0, 20.0));
    }

    #[test]
    fn zero_width_stretches_to_the_right_margin() {
        let mut canvas = a4_canvas();
        canvas.set_x(50.0);
        canvas
            .cell(0.0, 10.0, "", Border::None, Advance::Right, Align::Left)
            .unwrap();

        assert_eq!(canvas.cursor().x, 200.0);
    }

    #[test]
    fn text_without_a_font_is_an_error() {
        let mut canvas = a4_canvas();
        let error = canvas
            .cell(40.0, 10.0, "Unit", Border::None, Advance::Right, Align::Left)
            .unwrap_err();

        assert_eq!(error.kind, ErrorKind::Render);
        assert_eq!(canvas.cursor().x, 10.0);
    }

    #[test]
    fn alignment_moves_the_text_inside_the_cell() {
        let mut canvas = a4_canvas();
        canvas.set_font(FontStyle::Bold, 12.0);
        for align in [Align::Left, Align::Center, Align::Right] {
            canvas
                .cell(60.0, 10.0, "Unit", Border::None, Advance::NextLine, align)
                .unwrap();
        }

        let positions = text_positions(canvas);
        let left = positions[0].1;
        let center = positions[1].1;
        let right = positions[2].1;
        assert!((left - millimeters_to_points(11.0)).abs() < 1e-3);
        assert!(left < center && center < right);

        let text_width = BuiltinFont::HelveticaBold.string_width("Unit", 12.0);
        let cell_center = millimeters_to_points(10.0 + 30.0);
        assert!((center + text_width / 2.0 - cell_center).abs() < 1e-2);
    }

    #[test]
    fn baselines_are_measured_from_the_bottom_of_the_page() {
        let mut canvas = a4_canvas();
        canvas.set_font(FontStyle::Regular, 10.0);
        canvas
            .cell(40.0, 10.0, "PID:", Border::None, Advance::NextLine, Align::Left)
            .unwrap();

        let (text, _, y) = text_positions(canvas).remove(0);
        assert_eq!(text, b"PID:".to_vec());
        // Half of the cell plus 30% of the 10pt font below the 10mm top margin
        let expected = millimeters_to_points(297.0 - 15.0) - 3.0;
        assert!((y - expected).abs() < 1e-2);
    }

    #[test]
    fn bordered_cells_stroke_their_frame() {
        let mut canvas = a4_canvas();
        canvas.set_font(FontStyle::Regular, 12.0);
        canvas
            .cell(40.0, 10.0, "12.5", Border::Frame, Advance::Right, Align::Left)
            .unwrap();

        let document = canvas.into_document();
        let operators: Vec<_> = document.pages[0].layers[0]
            .operations
            .iter()
            .map(|operation| operation.operator.as_str())
            .collect();
        assert_eq!(operators, ["w", "re", "S", "BT", "Tf", "Td", "rg", "Tj", "ET"]);
    }

    #[test]
    fn margins_move_the_cursor_to_the_printable_area() {
        let mut canvas = a4_canvas();
        canvas.set_font(FontStyle::Regular, 12.0);
        canvas.set_margins(Margins::all(20.0));
        assert_eq!((canvas.cursor().x, canvas.cursor().y), (20.0, 20.0));
        assert!(canvas.cursor().font.is_some());

        canvas
            .cell(0.0, 10.0, "Name:", Border::None, Advance::NextLine, Align::Left)
            .unwrap();
        assert_eq!((canvas.cursor().x, canvas.cursor().y), (20.0, 30.0));

        let positions = text_positions(canvas);
        assert!((positions[0].1 - 21.0 * millimeters_to_points(1.0)).abs() < 1e-3);
    }

    #[test]
    fn set_y_from_bottom_returns_to_the_left_margin() {
        let mut canvas = a4_canvas();
        canvas.set_x(120.0);
        canvas.set_y_from_bottom(40.0);

        assert_eq!((canvas.cursor().x, canvas.cursor().y), (10.0, 257.0));
    }

    #[test]
    fn images_are_placed_from_their_top_left_corner() {
        let mut canvas = a4_canvas();
        let image = ImageXObject::from_dynamic_image(&image::DynamicImage::new_rgb8(400, 100));
        let height = canvas.place_image(image, 10.0, 10.0, 40.0).unwrap();
        assert_eq!(height, 10.0);

        let document = canvas.into_document();
        let placement = &document.pages[0].layers[0].operations[1];
        assert_eq!(placement.operator, "cm");
        let bottom = placement.operands[5].as_float().unwrap();
        assert!((bottom - millimeters_to_points(297.0 - 20.0)).abs() < 1e-2);
    }
}
