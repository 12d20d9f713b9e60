//! # mailsift-core
//!
//! Search and extraction engine for hierarchical mail stores.
//!
//! This crate provides:
//! - **Store accessors** - a read-only folder/message abstraction, with
//!   on-disk (`.eml` trees, mbox) and in-memory implementations
//! - **Extraction** - normalization of raw messages into [`EmailRecord`]s
//! - **Filtering** - conjunctive date range and substring [`Criteria`]
//! - **Traversal** - stack-safe post-order walk collecting matches
//! - **Output** - JSON serialization of the matched records
//! - **Sessions** - open, traverse, close and write in one call
//!
//! ## Quick Start
//!
//! ```ignore
//! use mailsift_core::{Criteria, ExtractConfig, OutputConfig, run};
//!
//! let config = ExtractConfig {
//!     store_path: "archive".into(),
//!     criteria: Criteria::new().with_subject("invoice"),
//!     output: OutputConfig::new("output.json"),
//! };
//! let report = run(&config)?;
//! println!("{} records written", report.written);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod criteria;
mod error;
pub mod extract;
pub mod output;
pub mod record;
pub mod session;
pub mod store;
pub mod traverse;

pub use criteria::{Criteria, DATE_FORMAT, parse_date_bound};
pub use error::{Error, Result};
pub use extract::extract_record;
pub use output::{OutputConfig, to_json, write_records};
pub use record::{EmailRecord, format_timestamp};
pub use session::{ExtractConfig, ExtractReport, run, search, with_store};
pub use store::{Folder, LocalStore, MailStore, MemoryStore, Message, StoreError, StoreResult};
pub use traverse::{Matches, Traversal, TraversalStats, collect_matches, folder_matches};
