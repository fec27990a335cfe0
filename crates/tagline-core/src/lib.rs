//! Tag-anchored line editing for tagline.
//!
//! A [`Document`] is scanned line by line while caller-supplied
//! [`Classifier`]s attach tags to individual lines. Mutations are then
//! addressed by tag rather than by line number:
//!
//! ```text
//! # BEGIN plugins      <- tagged "start"
//! plugin_a
//! # END plugins        <- tagged "end"
//! ```
//!
//! `insert_between("start", "end", ["plugin_b"])` splices `plugin_b` in
//! front of the `# END plugins` line.
//!
//! Every mutation is planned against the in-memory snapshot first (see the
//! `plan_*` methods) and then committed through a scratch file that is
//! renamed over the original. Mutations never rescan: call
//! [`Document::scan`] again to see tags for the rewritten content.

pub mod classifier;
pub mod diff;
pub mod document;
pub mod edit;
pub mod error;

pub use classifier::{Classifier, PatternClassifier};
pub use diff::unified_diff;
pub use document::{Document, Line, Tag};
pub use edit::Rewrite;
pub use error::{Error, Result};
