//! Scrubbing engine for SQL dumps and fixtures.
//!
//! Given a set of target tables, the engine removes every trace of them
//! from SQL text: `INSERT` statements that load them, foreign-key columns
//! referencing them, joins onto them and `WHERE` predicates that touch
//! them. Everything else is left valid and as close to the input as the
//! removals allow.
//!
//! ```
//! use sqlscrub_core::{pipeline, TargetTables};
//!
//! let tables = TargetTables::new(["target"]);
//! let out = pipeline::process("SELECT * FROM product WHERE target_id = 5;", &tables);
//! assert_eq!(out, "SELECT * FROM product;");
//! ```

pub mod alias;
pub mod comments;
pub mod condition;
pub mod pipeline;
pub mod rewrite;
pub mod scan;
pub mod tables;

mod patterns;

pub use condition::{Condition, TargetContext};
pub use pipeline::process;
pub use tables::{extract_table_names, reference_column, TargetTables};
