//! Changelog entry rendering and merging

pub mod merge;
pub mod render;

pub use merge::{merge_entry, merge_lines};
pub use render::{EntryRenderer, MarkdownRenderer, ReleaseMetadata};
