// CSV Query API
// Author: Gabriel Demetrios Lafis

//! # CSV Query API
//!
//! A small authenticated CSV upload-and-query service written in Rust.
//!
//! ## Features
//!
//! - User registration and login with bearer tokens
//! - CSV upload into per-user directories
//! - Column introspection with scalar type inference
//! - Ad-hoc filtering and multi-key sorting via query parameters
//! - REST API for remote access
//!
//! ## Example
//!
//! ```rust
//! use csv_query_api::query::run_query;
//!
//! let bytes = b"a,b\n1,x\n2,y\n3,z\n";
//!
//! // Keep rows where a > 1, then sort by a descending
//! let result = run_query(bytes, Some("a__gt__1"), Some("a:false")).unwrap();
//! assert_eq!(String::from_utf8(result).unwrap(), "a,b\n3,z\n2,y\n");
//!
//! // No filter and no sort returns the original bytes untouched
//! let untouched = run_query(bytes, None, None).unwrap();
//! assert_eq!(untouched, bytes.to_vec());
//! ```

pub mod data;
pub mod query;
pub mod auth;
pub mod storage;
pub mod api;
pub mod utils;

// Re-export main types
pub use data::{introspect, Column, ColumnData, ColumnInfo, ColumnType, Table};
pub use query::{run_query, FilterCondition, FilterOp, QueryRequest, SortKey};
pub use api::Server;
pub use utils::Config;
