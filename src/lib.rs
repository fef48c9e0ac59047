//! poolcheck library surface.
//!
//! The primary workflow is contract-version reconciliation: fingerprint the
//! deployed bytecode of a prize pool and its linked prize strategy against the
//! registry of known builds (`registry`), fall back to a pinned recent build
//! when a deployment is unrecognized (`resolver`), and surface a dismissible
//! advisory for the operator/UI layer (`banner`).

pub mod banner;
pub mod error;
pub mod fields;
pub mod pool_type;
pub mod reader;
pub mod registry;
pub mod resolver;
pub mod watcher;

pub mod config {
    pub mod chains;
}
