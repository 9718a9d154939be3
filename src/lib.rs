//! gloss — embedded documentation annotations, mechanically separated from
//! runnable code and assembled into a queryable documentation database.
//!
//! Source files carry calls of the shape `gloss.kind({...})`. The pipeline:
//!
//! - [`extract::split`] walks a source buffer and produces a runnable
//!   stream (annotations removed) and a documentation stream (only the
//!   annotation calls, in order);
//! - [`params::parse_argument`] turns each call's loosely-quoted argument
//!   into a strict JSON value;
//! - [`ingest::Ingester`] records the values into a [`tree::Tree`], the
//!   hierarchical path-addressed database that renderers query.

pub mod error;
pub mod extract;
pub mod ingest;
pub mod model;
pub mod params;
pub mod scan;
pub mod tree;

pub use error::{ExtractError, IngestError};
pub use extract::{split, Conventions, RawCall, Split};
pub use ingest::Ingester;
pub use model::{Parameter, Record};
pub use tree::{NodeId, Tree};
