//! Filesystem collaborators for tagline
//!
//! Resolves target paths and stages rewrites in scratch files that are
//! renamed over the original once fully written.

pub mod error;
pub mod path;
pub mod scratch;

pub use error::{Error, Result};
pub use path::{ResolvedPath, resolve};
pub use scratch::{ScratchFile, replace_contents};
