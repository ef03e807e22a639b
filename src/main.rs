use clap::Parser;
use std::path::PathBuf;

use labsheet::{
    configuration::{AssetPolicy, LayoutConfiguration},
    document::{InputRecord, ReportData},
    error::ContextError,
    report,
};
use time::OffsetDateTime;

/// Renders a lab result sheet to PDF from a JSON file of the form
/// `{ "title": "...", "content": "..." }`.
#[derive(Parser, Debug)]
#[command(version, long_about = None)]
struct CliArguments {
    /// The path of the JSON document.
    #[arg(value_name = "json_file_path")]
    document_path: PathBuf,
    /// The path of the output PDF file.
    #[arg(
        short = 'o',
        long = "output",
        value_name = "file_path",
        default_value = "output.pdf"
    )]
    output_file_path: PathBuf,
    /// The JSON file overriding the default layout of the sheet.
    #[arg(short = 'c', long = "configuration", value_name = "json_file")]
    configuration_path: Option<PathBuf>,
    /// The image placed in the top-left corner of the sheet.
    #[arg(short = 'l', long = "logo", value_name = "image_file")]
    logo_path: Option<PathBuf>,
    /// Fail instead of leaving the logo out when it cannot be loaded.
    #[arg(long = "strict-assets")]
    strict_assets: bool,
    /// Log everything down to the trace level.
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,
}

fn main() {
    let arguments = CliArguments::parse();
    env_logger::builder()
        .filter_level(if arguments.verbose {
            log::LevelFilter::Trace
        } else {
            log::LevelFilter::Info
        })
        .parse_default_env()
        .init();

    if let Err(error) = fallible_main(arguments) {
        // The failure must reach stderr even when `RUST_LOG` silences the logger
        if log::log_enabled!(log::Level::Error) {
            log::error!("{}", error);
        } else {
            eprintln!("Error: {}", error);
        }
        std::process::exit(1);
    }
}

fn fallible_main(arguments: CliArguments) -> Result<(), ContextError> {
    log::debug!("{:?}", arguments);

    let mut layout = match &arguments.configuration_path {
        Some(configuration_path) => LayoutConfiguration::from_path(configuration_path)?,
        None => LayoutConfiguration::default(),
    };
    if let Some(logo_path) = arguments.logo_path {
        layout.logo_path = logo_path;
    }
    if arguments.strict_assets {
        layout.asset_policy = AssetPolicy::Fail;
    }

    let record = InputRecord::from_path(&arguments.document_path)?;
    log::debug!("{:?}", record);

    report::save_report_to_path(
        &ReportData::from(&record),
        &layout,
        OffsetDateTime::now_utc(),
        &arguments.output_file_path,
    )
}
