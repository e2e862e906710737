//! Decodes MRT TABLE_DUMP_V2 RIB dumps (RFC 6396) into a longest-prefix-
//! match table keyed by each prefix's origin AS number, and serves
//! lookups against it.
//!
//! The pipeline is: [parser::MrtReader] splits a byte stream into
//! records, [parser::decode_payload] turns a record's payload into a
//! [models::rib::MrtMessage], and [ingest::ingest] folds a whole stream
//! of those into a [table::LpmTable]. [orginfo::OrgInfoTable] optionally
//! annotates a looked-up AS number with the country of its registering
//! organization.

pub mod error;
pub mod ingest;
pub mod io;
pub mod models;
pub mod orginfo;
pub mod parser;
pub mod table;

pub use error::{ParserError, TableError};
pub use ingest::{ingest, IngestStats};
pub use table::{LpmTable, Prefix};
