//! Support code for the `docs` binary.

pub mod paths;
