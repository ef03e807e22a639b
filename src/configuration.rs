use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ContextError, ErrorKind};

/// What to do when an optional asset such as the logo cannot be loaded.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum AssetPolicy {
    /// Log a warning and leave the asset out of the page.
    #[default]
    Skip,
    /// Abort the report with an `AssetMissing` error.
    Fail,
}

/// The geometry of the result sheet, all lengths in millimeters and font sizes in points.
/// Every field has a default, so a configuration file only needs the values it changes.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct LayoutConfiguration {
    pub page_width: f32,
    pub page_height: f32,
    pub margin: f32,
    pub logo_path: PathBuf,
    pub logo_position: [f32; 2],
    pub logo_width: f32,
    pub asset_policy: AssetPolicy,
    pub line_height: f32,
    pub label_width: f32,
    pub column_widths: [f32; 4],
    pub base_font_size: f32,
    pub header_font_size: f32,
    pub body_font_size: f32,
    pub footer_font_size: f32,
    /// Distance of the footer line from the bottom edge of the page.
    pub footer_offset: f32,
}

impl Default for LayoutConfiguration {
    fn default() -> Self {
        LayoutConfiguration {
            page_width: 210.0,
            page_height: 297.0,
            margin: 10.0,
            logo_path: PathBuf::from("./img/discord.jpg"),
            logo_position: [10.0, 10.0],
            logo_width: 40.0,
            asset_policy: AssetPolicy::Skip,
            line_height: 10.0,
            label_width: 40.0,
            column_widths: [40.0, 40.0, 60.0, 50.0],
            base_font_size: 10.0,
            header_font_size: 16.0,
            body_font_size: 12.0,
            footer_font_size: 8.0,
            footer_offset: 40.0,
        }
    }
}

impl LayoutConfiguration {
    pub fn from_path(layout_configuration_file_path: &Path) -> Result<Self, ContextError> {
        let configuration_file_contents = std::fs::read_to_string(layout_configuration_file_path)
            .map_err(|error| {
                ContextError::with_error(
                    ErrorKind::Configuration,
                    format!(
                        "Failed to read the layout configuration file {:?}",
                        layout_configuration_file_path
                    ),
                    &error,
                )
            })?;
        let configuration: LayoutConfiguration =
            serde_json::from_str(&configuration_file_contents).map_err(|error| {
                ContextError::with_error(
                    ErrorKind::Configuration,
                    format!(
                        "Failed to parse the layout configuration file {:?}",
                        layout_configuration_file_path
                    ),
                    &error,
                )
            })?;

        Ok(configuration)
    }

    /// Width available between the left and the right margin.
    pub fn printable_width(&self) -> f32 {
        self.page_width - 2.0 * self.margin
    }
}
