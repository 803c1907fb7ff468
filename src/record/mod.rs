//! Read-only access to caller-supplied domain records.
//!
//! Records are opaque JSON trees supplied by the persistence layer; this module
//! only knows how to walk them.

pub mod path;
pub mod resolver;
pub mod value;

pub use path::{FieldPath, PathError};
pub use resolver::{ARRAY_JOIN_SEPARATOR, resolve, resolve_str};
pub use value::FieldValue;
