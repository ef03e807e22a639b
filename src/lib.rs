//! labsheet renders a single-page laboratory result sheet to PDF, starting from a small
//! JSON record that carries a title and a content string.
//!
//! The page is laid out with a sequence of absolute-positioned drawing calls issued
//! against a `Canvas`: a frame around the printable area, a logo, the name of the lab,
//! the patient details, the results table and a footer. The canvas keeps the write
//! position and the current font in an explicit `Cursor`, which every call reads and
//! advances, so the layout can be inspected between any two steps.

/// The error type used throughout this crate.
///
/// `ContextError` carries a human readable context, the message of the error that caused
/// it (if any) and an `ErrorKind`, which lets a caller rendering many reports decide
/// whether a failure concerns only one report or the whole run.
pub mod error;

/// The input record and the data drawn on the sheet.
///
/// `InputRecord` is what the JSON input file is parsed into, `ReportData` is what the
/// renderer draws. The record maps into the sample report data and only names the
/// generated document.
pub mod document;

/// The geometry of the sheet and the policy for missing assets, loadable from JSON.
pub mod configuration;

pub mod font;

/// The `PdfDocument` interface for building PDF documents on top of `lopdf`.
///
/// Pages are made of layers of content operations, text is written with the built-in
/// Helvetica fonts, images are embedded as RGB `XObject`s and the document information
/// dictionary is filled from `PdfMetadata`. Finished documents can be saved to bytes or
/// to a file, which is replaced atomically.
pub mod pdf;

/// The cursor-based drawing surface: margins, rectangles, images and text cells.
pub mod canvas;

/// The result sheet layout itself.
pub mod report;
