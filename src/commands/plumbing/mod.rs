//! Plumbing commands
//!
//! Direct access to the object database, used for scripting and inspection.
//!
//! - `hash-object`: compute the blob id of a file and optionally store it
//! - `cat-file`: decode a stored object

pub mod cat_file;
pub mod hash_object;
