//! Command line interface.

use std::path::PathBuf;

use clap::Parser;
use mailsift_core::{Criteria, ExtractConfig, OutputConfig, parse_date_bound};

/// Default destination of the extracted records.
pub const DEFAULT_OUTPUT: &str = "output.json";

/// Search a mail store and extract emails matching the given criteria to JSON
#[derive(Debug, Parser)]
#[command(name = "mailsift")]
#[command(about = "Search a mail store and extract emails based on criteria")]
#[command(version)]
pub struct Cli {
    /// Path to the mail store
    pub pst_path: PathBuf,

    /// Start date in YYYY-MM-DD format
    #[arg(long, value_name = "YYYY-MM-DD")]
    pub date_from: Option<String>,

    /// End date in YYYY-MM-DD format
    #[arg(long, value_name = "YYYY-MM-DD")]
    pub date_to: Option<String>,

    /// Sender's email address
    #[arg(long = "from", value_name = "ADDRESS")]
    pub from_address: Option<String>,

    /// Keyword to search in the subject
    #[arg(long)]
    pub subject: Option<String>,

    /// Keyword to search in the email body
    #[arg(long)]
    pub body: Option<String>,

    /// Output JSON file path
    #[arg(long, default_value = DEFAULT_OUTPUT)]
    pub output: PathBuf,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Builds the run configuration, validating the date bounds.
    ///
    /// # Errors
    ///
    /// Returns [`mailsift_core::Error::InvalidDate`] if a date bound is not
    /// in `YYYY-MM-DD` format.
    pub fn into_config(self) -> mailsift_core::Result<ExtractConfig> {
        let mut criteria = Criteria::new();
        if let Some(value) = self.date_from.as_deref() {
            criteria = criteria.with_date_from(parse_date_bound("--date-from", value)?);
        }
        if let Some(value) = self.date_to.as_deref() {
            criteria = criteria.with_date_to(parse_date_bound("--date-to", value)?);
        }
        criteria.from = self.from_address;
        criteria.subject = self.subject;
        criteria.body = self.body;

        Ok(ExtractConfig {
            store_path: self.pst_path,
            criteria,
            output: OutputConfig::new(self.output),
        })
    }
}
