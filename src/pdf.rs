use lopdf::{Object, StringFormat};
use std::{
    collections::BTreeMap,
    io::{BufWriter, Write as _},
    mem,
    path::{Path, PathBuf},
};
use time::OffsetDateTime;

use crate::error::{ContextError, ErrorKind};
use crate::font::{encode_win_ansi, BuiltinFont};

/// One layer of PDF data. It can be converted into a `lopdf::Stream` by calling `TryInto<lopdf::Stream>::try_into`.
#[derive(Debug, Clone)]
pub struct PdfLayer {
    /// Name of the layer, only used for diagnostics.
    pub(crate) name: String,
    /// Stream objects in this layer. Usually, one layer equals to one stream.
    pub(crate) operations: Vec<lopdf::content::Operation>,
}

impl TryFrom<PdfLayer> for lopdf::Stream {
    type Error = ContextError;

    fn try_from(value: PdfLayer) -> Result<Self, Self::Error> {
        use lopdf::{content::Operation, Dictionary, Stream};

        // Every layer is drawn inside its own graphics state block so that a layer
        // can never leak its line width or colour into the next one
        let mut operations = Vec::with_capacity(value.operations.len() + 2);
        operations.push(Operation::new("q", vec![]));
        operations.extend(value.operations);
        operations.push(Operation::new("Q", vec![]));

        let stream_content = lopdf::content::Content { operations }
            .encode()
            .map_err(|error| {
                ContextError::with_error(
                    ErrorKind::Render,
                    format!("Failed to encode the content of the PDF layer {:?}", value.name),
                    &error,
                )
            })?;

        // Page contents are not compressed, so that they stay inspectable
        Ok(Stream::new(Dictionary::new(), stream_content).with_compression(false))
    }
}

/// The low-level image representation for a PDF document.
#[derive(Debug, Clone)]
pub struct ImageXObject {
    /// Width of the image in pixels (original width, not scaled width).
    pub width: u32,
    /// Height of the image in pixels (original height, not scaled height).
    pub height: u32,
    /// Bits per color component, the images are always decoded to 8-bit RGB.
    pub bits_per_component: u8,
    /// Should the image be interpolated when scaled?
    pub interpolate: bool,
    /// The raw RGB samples, row by row.
    pub image_data: Vec<u8>,
}

impl ImageXObject {
    /// Decode a JPEG or PNG image from disk. The alpha channel, if any, is dropped.
    pub fn from_path(image_path: &Path) -> Result<Self, ContextError> {
        let image = image::open(image_path).map_err(|error| {
            ContextError::with_error(
                ErrorKind::AssetMissing,
                format!("Unable to load the image {:?}", image_path),
                &error,
            )
        })?;

        Ok(Self::from_dynamic_image(&image))
    }

    pub fn from_dynamic_image(image: &image::DynamicImage) -> Self {
        let rgb_image = image.to_rgb8();
        ImageXObject {
            width: rgb_image.width(),
            height: rgb_image.height(),
            bits_per_component: 8,
            interpolate: true,
            image_data: rgb_image.into_raw(),
        }
    }

    /// The height matching the given width while preserving the aspect ratio.
    pub fn height_for_width(&self, width: f32) -> f32 {
        if self.width == 0 {
            return 0.0;
        }
        width * self.height as f32 / self.width as f32
    }
}

/// `XObject`s are parts of the PDF specification. They allow for complex behavior to be
/// inserted into the PDF document: this comprises bookmarks, annotations and even images.
/// This implementation is only partial as it allows only for images.
#[derive(Debug, Clone)]
pub enum XObject {
    /// The `XObject` interface for an image. It can be converted into a `lopdf::Object`.
    Image(ImageXObject),
}

impl From<XObject> for lopdf::Object {
    fn from(value: XObject) -> Self {
        use lopdf::Object::*;

        match value {
            XObject::Image(image) => {
                let dictionary = lopdf::Dictionary::from_iter(vec![
                    ("Type", Name("XObject".into())),
                    ("Subtype", Name("Image".into())),
                    ("Width", Integer(i64::from(image.width))),
                    ("Height", Integer(i64::from(image.height))),
                    ("ColorSpace", Name("DeviceRGB".into())),
                    ("BitsPerComponent", Integer(i64::from(image.bits_per_component))),
                    ("Interpolate", Boolean(image.interpolate)),
                ]);
                // Image samples are left compressible, they are flated when the document is optimized
                Stream(lopdf::Stream::new(dictionary, image.image_data))
            }
        }
    }
}

/// Named reference to an `XObject`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct XObjectReference(String);

impl XObjectReference {
    /// Creates a new reference for an `XObject` from a number.
    pub fn new(index: usize) -> Self {
        Self(format!("X{index}"))
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

/// The association between the `XObject`s names and the actual `XObject`s themselves.
/// It is ordered by name so that the objects are always inserted in the same order.
#[derive(Default, Debug, Clone)]
pub struct XObjectMap(BTreeMap<XObjectReference, XObject>);

impl XObjectMap {
    /// Registers an `XObject` and returns the name it can be drawn with.
    pub fn add(&mut self, object: XObject) -> XObjectReference {
        let reference = XObjectReference::new(self.0.len());
        self.0.insert(reference.clone(), object);
        reference
    }

    /// Inserts the `XObject`s into the document, simultaneously constructing a PDF dictionary of them.
    pub fn into_with_document(&self, document: &mut lopdf::Document) -> lopdf::Dictionary {
        self.0
            .iter()
            .map(|(name, object)| {
                let object: lopdf::Object = object.clone().into();
                let object_reference = document.add_object(object);
                (name.0.clone(), lopdf::Object::Reference(object_reference))
            })
            .collect()
    }
}

/// The representation of a PDF page. Its layers are merged into one content stream
/// when the document is written.
#[derive(Debug, Clone)]
pub struct PdfPage {
    /// Page width in points.
    pub width: f32,
    /// Page height in points.
    pub height: f32,
    /// Page layers.
    pub layers: Vec<PdfLayer>,
    /// Images used in this page.
    pub(crate) xobjects: XObjectMap,
}

impl PdfPage {
    /// Inserts the images of the page into the document and encodes the layers.
    /// Returns the resource dictionary (without fonts) and the merged content stream.
    fn collect_resources_and_stream(
        &self,
        inner_document: &mut lopdf::Document,
    ) -> Result<(lopdf::Dictionary, lopdf::Stream), ContextError> {
        let mut resource_dictionary = lopdf::Dictionary::new();
        let xobjects_dictionary = self.xobjects.into_with_document(inner_document);
        if !xobjects_dictionary.is_empty() {
            resource_dictionary.set("XObject", lopdf::Object::Dictionary(xobjects_dictionary));
        }

        let mut merged_layer_streams = Vec::<u8>::new();
        for layer in self.layers.iter() {
            let mut stream: lopdf::Stream = layer.clone().try_into()?;
            merged_layer_streams.append(&mut stream.content);
        }
        let merged_layer_stream =
            lopdf::Stream::new(lopdf::Dictionary::new(), merged_layer_streams)
                .with_compression(false);

        Ok((resource_dictionary, merged_layer_stream))
    }
}

/// Converts millimeters to points. This function is used in order to present the data
/// in the format required by the PDF specification, while the end user might want to work in
/// millimeters which are easier to reason about.
pub fn millimeters_to_points(millimeters: f32) -> f32 {
    millimeters * 2.834646
}

/// The entries of the document information dictionary.
#[derive(Debug, Clone, PartialEq)]
pub struct PdfMetadata {
    pub title: String,
    pub subject: String,
    pub author: String,
    pub creator: String,
    pub producer: String,
    /// Used for both the creation and the modification date.
    pub creation_date: OffsetDateTime,
}

impl Default for PdfMetadata {
    fn default() -> Self {
        PdfMetadata {
            title: String::new(),
            subject: String::new(),
            author: String::new(),
            creator: env!("CARGO_PKG_NAME").into(),
            producer: format!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
            creation_date: OffsetDateTime::UNIX_EPOCH,
        }
    }
}

/// This struct represents the actual PDF document on a high-level. It is an interface to the actual underlying
/// `lopdf::Document` with the addition of the PDF pages, the document ID and the fonts used in the document.
pub struct PdfDocument {
    /// The built-in fonts used in the document and the object each one will be written to.
    fonts: BTreeMap<BuiltinFont, lopdf::ObjectId>,
    /// The underlying PDF document: this is a low-level interface and shouldn't be directly interacted with
    /// unless strictly necessary, anyway this is why it is exposed to the user.
    pub inner_document: lopdf::Document,
    /// The identifier of the document, it is used to in order to set the PDF `ID` tag.
    pub identifier: String,
    pub metadata: PdfMetadata,
    /// The pages of the PDF document.
    pub(crate) pages: Vec<PdfPage>,
}

impl PdfDocument {
    /// Create a new `PdfDocument` by defaulting the underlying PDF document to version 1.5
    /// of the PDF specification and customly specifying the PDF identifier.
    pub fn new(pdf_document_identifier: String) -> Self {
        PdfDocument {
            fonts: BTreeMap::default(),
            inner_document: lopdf::Document::with_version("1.5"),
            identifier: pdf_document_identifier,
            metadata: PdfMetadata::default(),
            pages: Vec::new(),
        }
    }

    /// Adds a page of given width and height in millimeters with an empty layer for contents to be added to.
    /// The function returns the index of the page and of the layer in the page.
    pub fn add_page_with_layer(&mut self, page_width: f32, page_height: f32) -> (usize, usize) {
        let pdf_page = PdfPage {
            width: millimeters_to_points(page_width),
            height: millimeters_to_points(page_height),
            layers: vec![PdfLayer {
                name: "Layer0".into(),
                operations: Vec::new(),
            }],
            xobjects: XObjectMap::default(),
        };
        self.pages.push(pdf_page);

        (self.pages.len() - 1, 0)
    }

    /// Registers a built-in font so that text can be written with it. Registering it twice is harmless.
    pub fn add_font(&mut self, font: BuiltinFont) {
        if !self.fonts.contains_key(&font) {
            let font_object_id = self.inner_document.new_object_id();
            self.fonts.insert(font, font_object_id);
        }
    }

    /// Adds an image to the resources of the given page and returns the name to draw it with.
    pub fn add_image_to_page(
        &mut self,
        page_index: usize,
        image: ImageXObject,
    ) -> Result<XObjectReference, ContextError> {
        let pdf_page = self.pages.get_mut(page_index).ok_or(ContextError::with_context(
            ErrorKind::Render,
            format!("Failed to find the page with index {}", page_index),
        ))?;

        Ok(pdf_page.xobjects.add(XObject::Image(image)))
    }

    /// Writes the text in the specified font and color with its baseline starting at the given
    /// position, expressed in millimeters from the bottom-left corner of the page.
    #[allow(clippy::too_many_arguments)]
    pub fn write_text_to_layer_in_page(
        &mut self,
        page_index: usize,
        layer_index: usize,
        color: [f32; 3],
        text: &str,
        font: BuiltinFont,
        font_size: f32,
        caret_position: [f32; 2],
    ) -> Result<(), ContextError> {
        use lopdf::content::Operation;

        if !self.fonts.contains_key(&font) {
            return Err(ContextError::with_context(
                ErrorKind::Render,
                format!("The font {} has not been added to the document", font.base_font()),
            ));
        }

        let [x, y] = caret_position;
        let [r, g, b] = color;
        self.add_operations_to_layer_in_page(
            layer_index,
            page_index,
            vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec![font.resource_name().into(), font_size.into()]),
                Operation::new(
                    "Td",
                    vec![
                        millimeters_to_points(x).into(),
                        millimeters_to_points(y).into(),
                    ],
                ),
                Operation::new("rg", vec![r.into(), g.into(), b.into()]),
                Operation::new(
                    "Tj",
                    vec![Object::String(encode_win_ansi(text), StringFormat::Literal)],
                ),
                Operation::new("ET", vec![]),
            ],
        )
    }

    /// Strokes the outline of a rectangle whose lower-left corner and size are in millimeters.
    pub fn draw_rectangle_in_layer(
        &mut self,
        page_index: usize,
        layer_index: usize,
        lower_left: [f32; 2],
        size: [f32; 2],
        line_width: f32,
    ) -> Result<(), ContextError> {
        use lopdf::content::Operation;

        let [x, y] = lower_left;
        let [width, height] = size;
        self.add_operations_to_layer_in_page(
            layer_index,
            page_index,
            vec![
                Operation::new("w", vec![millimeters_to_points(line_width).into()]),
                Operation::new(
                    "re",
                    vec![
                        millimeters_to_points(x).into(),
                        millimeters_to_points(y).into(),
                        millimeters_to_points(width).into(),
                        millimeters_to_points(height).into(),
                    ],
                ),
                Operation::new("S", vec![]),
            ],
        )
    }

    /// Paints a previously added image scaled to the given size, both in millimeters.
    pub fn place_image_in_layer(
        &mut self,
        page_index: usize,
        layer_index: usize,
        image: &XObjectReference,
        lower_left: [f32; 2],
        size: [f32; 2],
    ) -> Result<(), ContextError> {
        use lopdf::content::Operation;

        let [x, y] = lower_left;
        let [width, height] = size;
        self.add_operations_to_layer_in_page(
            layer_index,
            page_index,
            vec![
                Operation::new("q", vec![]),
                Operation::new(
                    "cm",
                    vec![
                        millimeters_to_points(width).into(),
                        0.into(),
                        0.into(),
                        millimeters_to_points(height).into(),
                        millimeters_to_points(x).into(),
                        millimeters_to_points(y).into(),
                    ],
                ),
                Operation::new("Do", vec![Object::Name(image.name().as_bytes().to_vec())]),
                Operation::new("Q", vec![]),
            ],
        )
    }

    /// Write the operations so far specified to the underlying PDF document and finalize it.
    /// The instance ID is the second half of the trailer `ID`, the first one being the document identifier.
    pub fn write_all(&mut self, instance_id: String) -> Result<(), ContextError> {
        use lopdf::Object::*;

        let creation_date = String(
            to_pdf_timestamp_format(&self.metadata.creation_date).into_bytes(),
            StringFormat::Literal,
        );
        let document_info = lopdf::Dictionary::from_iter(vec![
            ("Trapped", Name("False".into())),
            ("CreationDate", creation_date.clone()),
            ("ModDate", creation_date),
            ("Title", pdf_text_string(&self.metadata.title)),
            ("Subject", pdf_text_string(&self.metadata.subject)),
            ("Author", pdf_text_string(&self.metadata.author)),
            ("Creator", pdf_text_string(&self.metadata.creator)),
            ("Producer", pdf_text_string(&self.metadata.producer)),
        ]);
        let document_info_id = self.inner_document.add_object(Dictionary(document_info));

        let pages_id = self.inner_document.new_object_id();
        let catalog = lopdf::Dictionary::from_iter(vec![
            ("Type", Name("Catalog".into())),
            ("PageLayout", Name("OneColumn".into())),
            ("PageMode", Name("UseNone".into())),
            ("Pages", Reference(pages_id)),
        ]);
        let catalog_id = self.inner_document.add_object(catalog);

        self.inner_document
            .trailer
            .set("Root", Reference(catalog_id));
        self.inner_document
            .trailer
            .set("Info", Reference(document_info_id));
        self.inner_document.trailer.set(
            "ID",
            Array(vec![
                String(self.identifier.clone().into_bytes(), StringFormat::Literal),
                String(instance_id.into_bytes(), StringFormat::Literal),
            ]),
        );

        let fonts_dictionary = self.insert_fonts_into_document();
        let fonts_dictionary_id = self.inner_document.add_object(fonts_dictionary);

        let mut page_ids = Vec::<lopdf::Object>::new();
        for page in self.pages.iter() {
            let (mut resource_dictionary, content_stream) =
                page.collect_resources_and_stream(&mut self.inner_document)?;
            resource_dictionary.set("Font", Reference(fonts_dictionary_id));
            let resources_id = self
                .inner_document
                .add_object(Dictionary(resource_dictionary));
            let content_id = self.inner_document.add_object(content_stream);

            let page_box: lopdf::Object =
                vec![0.into(), 0.into(), page.width.into(), page.height.into()].into();
            let page_dictionary = lopdf::Dictionary::from_iter(vec![
                ("Type", Name("Page".into())),
                ("Rotate", Integer(0)),
                ("MediaBox", page_box.clone()),
                ("TrimBox", page_box.clone()),
                ("CropBox", page_box),
                ("Parent", Reference(pages_id)),
                ("Resources", Reference(resources_id)),
                ("Contents", Reference(content_id)),
            ]);
            page_ids.push(Reference(self.inner_document.add_object(page_dictionary)));
        }

        let pages = lopdf::Dictionary::from_iter(vec![
            ("Type", Name("Pages".into())),
            ("Count", Integer(page_ids.len() as i64)),
            ("Kids", Array(page_ids)),
        ]);
        self.inner_document
            .objects
            .insert(pages_id, Dictionary(pages));

        Ok(())
    }

    /// Optimize the PDF document (only superficially).
    pub fn optimize(&mut self) {
        self.inner_document.prune_objects();
        self.inner_document.delete_zero_length_streams();
        self.inner_document.renumber_objects();
        self.inner_document.compress();
    }

    /// Save the `PdfDocument` to bytes in order for it to be written to a file or further processed.
    pub fn save_to_bytes(&mut self) -> Result<Vec<u8>, ContextError> {
        let mut pdf_document_bytes = Vec::new();
        let mut writer = BufWriter::new(&mut pdf_document_bytes);
        self.inner_document.save_to(&mut writer).map_err(|error| {
            ContextError::with_error(
                ErrorKind::Output,
                "Error while saving the PDF document to bytes",
                &error,
            )
        })?;
        mem::drop(writer);

        Ok(pdf_document_bytes)
    }

    /// Save the document to the given path. The bytes are first written to a `.swp` file
    /// next to the destination which is then renamed over it, so the destination either
    /// holds the previous file or the complete new one.
    pub fn save_to_path(&mut self, pdf_path: &Path) -> Result<(), ContextError> {
        let pdf_document_bytes = self.save_to_bytes()?;
        let swap_path = swap_path_for(pdf_path);

        let written = std::fs::File::create(&swap_path)
            .and_then(|mut swap_file| {
                swap_file.write_all(&pdf_document_bytes)?;
                swap_file.sync_all()
            })
            .and_then(|_| std::fs::rename(&swap_path, pdf_path));
        if let Err(error) = written {
            // Nothing useful can be done if the swap file cannot be removed either
            let _ = std::fs::remove_file(&swap_path);
            return Err(ContextError::with_error(
                ErrorKind::Output,
                format!("Unable to write the PDF document to {:?}", pdf_path),
                &error,
            ));
        }

        Ok(())
    }

    /// Converts the fonts into a dictionary and inserts them into the document.
    fn insert_fonts_into_document(&mut self) -> lopdf::Dictionary {
        use lopdf::Object::*;

        let mut font_dictionary = lopdf::Dictionary::new();
        for (font, font_object_id) in self.fonts.iter() {
            let builtin_font_dictionary = lopdf::Dictionary::from_iter(vec![
                ("Type", Name("Font".into())),
                ("Subtype", Name("Type1".into())),
                ("BaseFont", Name(font.base_font().into())),
                ("Encoding", Name("WinAnsiEncoding".into())),
            ]);
            self.inner_document
                .objects
                .insert(*font_object_id, Dictionary(builtin_font_dictionary));
            font_dictionary.set(font.resource_name(), Reference(*font_object_id));
        }
        font_dictionary
    }

    /// This function is responsible for adding the given operations to the specified layer and page.
    pub(crate) fn add_operations_to_layer_in_page(
        &mut self,
        layer_index: usize,
        page_index: usize,
        operations: Vec<lopdf::content::Operation>,
    ) -> Result<(), ContextError> {
        let pdf_layer_reference = self.get_mut_layer_in_page(layer_index, page_index)?;
        pdf_layer_reference.operations.extend(operations);

        Ok(())
    }

    // Retrieve the specified layer in the given page via the respective indices.
    fn get_mut_layer_in_page(
        &mut self,
        layer_index: usize,
        page_index: usize,
    ) -> Result<&mut PdfLayer, ContextError> {
        let pdf_page = self
            .pages
            .get_mut(page_index)
            .ok_or(ContextError::with_context(
                ErrorKind::Render,
                format!("Failed to find the page with index {}", page_index),
            ))?;
        let pdf_layer = pdf_page
            .layers
            .get_mut(layer_index)
            .ok_or(ContextError::with_context(
                ErrorKind::Render,
                format!("Failed to find the layer with index {}", layer_index),
            ))?;

        Ok(pdf_layer)
    }
}

fn swap_path_for(pdf_path: &Path) -> PathBuf {
    let mut swap_path = pdf_path.as_os_str().to_owned();
    swap_path.push(".swp");
    PathBuf::from(swap_path)
}

/// Encodes a text string for the document information dictionary: plain ASCII is
/// written as is, anything else as UTF-16BE with a byte order mark.
fn pdf_text_string(text: &str) -> Object {
    if text.is_ascii() {
        Object::String(text.as_bytes().to_vec(), StringFormat::Literal)
    } else {
        let mut bytes = vec![0xFE, 0xFF];
        bytes.extend(text.encode_utf16().flat_map(|unit| unit.to_be_bytes()));
        Object::String(bytes, StringFormat::Hexadecimal)
    }
}

/// Formats the given time so that it matches what the PDF specification expects.
/// An example of it is the following: D:20170505150224+02'00'.
pub fn to_pdf_timestamp_format(date: &OffsetDateTime) -> String {
    let offset = date.offset();
    let offset_sign = if offset.is_negative() { '-' } else { '+' };
    format!(
        "D:{:04}{:02}{:02}{:02}{:02}{:02}{offset_sign}{:02}'{:02}'",
        date.year(),
        u8::from(date.month()),
        date.day(),
        date.hour(),
        date.minute(),
        date.second(),
        offset.whole_hours().abs(),
        offset.minutes_past_hour().abs(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single_page_document() -> PdfDocument {
        let mut pdf_document = PdfDocument::new("DocumentIdentifier".into());
        pdf_document.add_page_with_layer(210.0, 297.0);
        pdf_document.add_font(BuiltinFont::Helvetica);
        pdf_document
    }

    #[test]
    fn timestamps_follow_the_pdf_date_format() {
        assert_eq!(
            to_pdf_timestamp_format(&OffsetDateTime::UNIX_EPOCH),
            "D:19700101000000+00'00'"
        );
    }

    #[test]
    fn text_requires_a_registered_font() {
        let mut pdf_document = single_page_document();
        let error = pdf_document
            .write_text_to_layer_in_page(
                0,
                0,
                [0.0, 0.0, 0.0],
                "Unit",
                BuiltinFont::HelveticaBold,
                12.0,
                [10.0, 10.0],
            )
            .unwrap_err();

        assert_eq!(error.kind, ErrorKind::Render);
    }

    #[test]
    fn drawing_on_a_missing_page_fails() {
        let mut pdf_document = single_page_document();
        let error = pdf_document
            .draw_rectangle_in_layer(3, 0, [0.0, 0.0], [1.0, 1.0], 0.2)
            .unwrap_err();

        assert!(error.context.contains("page with index 3"));
    }

    #[test]
    fn written_document_parses_back_with_its_page_and_fonts() {
        let mut pdf_document = single_page_document();
        pdf_document
            .write_text_to_layer_in_page(
                0,
                0,
                [0.0, 0.0, 0.0],
                "HEMOGLOBIN",
                BuiltinFont::Helvetica,
                12.0,
                [11.0, 200.0],
            )
            .unwrap();
        pdf_document.metadata.title = "Bericht für Müller".into();
        pdf_document.write_all("InstanceIdentifier".into()).unwrap();
        let bytes = pdf_document.save_to_bytes().unwrap();

        assert!(bytes.starts_with(b"%PDF-1.5"));
        let parsed = lopdf::Document::load_mem(&bytes).unwrap();
        let pages = parsed.get_pages();
        assert_eq!(pages.len(), 1);

        let page_id = *pages.values().next().unwrap();
        let content =
            lopdf::content::Content::decode(&parsed.get_page_content(page_id).unwrap()).unwrap();
        let operators: Vec<_> = content
            .operations
            .iter()
            .map(|operation| operation.operator.as_str())
            .collect();
        assert_eq!(operators, ["q", "BT", "Tf", "Td", "rg", "Tj", "ET", "Q"]);

        let info_id = parsed.trailer.get(b"Info").unwrap().as_reference().unwrap();
        let info = parsed.get_dictionary(info_id).unwrap();
        let title = info.get(b"Title").unwrap().as_str().unwrap();
        assert_eq!(&title[..2], &[0xFE, 0xFF]);
    }

    #[test]
    fn images_keep_their_aspect_ratio() {
        let image = ImageXObject::from_dynamic_image(&image::DynamicImage::new_rgb8(200, 100));

        assert_eq!(image.image_data.len(), 200 * 100 * 3);
        assert_eq!(image.height_for_width(40.0), 20.0);
    }

    #[test]
    fn missing_image_is_an_asset_error() {
        let error = ImageXObject::from_path(Path::new("img/not-there.jpg")).unwrap_err();

        assert_eq!(error.kind, ErrorKind::AssetMissing);
    }

    #[test]
    fn saving_replaces_the_destination_without_leaving_a_swap_file() {
        let directory = std::env::temp_dir().join(format!("labsheet-pdf-{}", std::process::id()));
        std::fs::create_dir_all(&directory).unwrap();
        let pdf_path = directory.join("report.pdf");
        std::fs::write(&pdf_path, b"stale").unwrap();

        let mut pdf_document = single_page_document();
        pdf_document.write_all("InstanceIdentifier".into()).unwrap();
        pdf_document.save_to_path(&pdf_path).unwrap();

        assert!(std::fs::read(&pdf_path).unwrap().starts_with(b"%PDF-"));
        assert!(!swap_path_for(&pdf_path).exists());
        std::fs::remove_dir_all(&directory).unwrap();
    }

    #[test]
    fn saving_into_a_missing_directory_is_an_output_error() {
        let mut pdf_document = single_page_document();
        pdf_document.write_all("InstanceIdentifier".into()).unwrap();
        let error = pdf_document
            .save_to_path(Path::new("no/such/directory/report.pdf"))
            .unwrap_err();

        assert_eq!(error.kind, ErrorKind::Output);
    }
}
