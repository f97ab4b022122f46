//! Core library for relnotes.
//!
//! Extracts the latest release from a plain-text changelog and renders it as
//! an HTML fragment or as Markdown, linking issue-tracker references.
//!
//! # Modules
//!
//! - [`autolink`] - Issue reference recognition and tracker URLs
//! - [`changelog`] - Latest-release extraction and item splitting
//! - [`config`] - Configuration loading and management
//! - [`error`] - Error types and result aliases
//! - [`normalize`] - Paragraph normalization and autolinking
//! - [`notes`] - Option resolution and the end-to-end pipeline
//! - [`render`] - HTML and Markdown renderers
//!
//! # Quick Start
//!
//! ```
//! use relnotes_core::{IssueTracker, OutputFormat, notes};
//!
//! let changelog = "Release 1.0.0\n-------------\n\n * Fixed issue #7.\n";
//! let out = notes::render_notes(changelog, OutputFormat::Markdown, &IssueTracker::default())
//!     .expect("changelog has a release header");
//!
//! assert_eq!(
//!     out.notes,
//!     "* Fixed [issue #7](https://github.com/phusion/passenger/issues/7)."
//! );
//! ```
#![deny(unsafe_code)]

pub mod autolink;

pub mod changelog;

pub mod config;

pub mod error;

pub mod normalize;

pub mod notes;

pub mod render;

pub use autolink::{InvalidIssueUrl, IssueTracker};

pub use changelog::{ChangelogError, ReleaseSection};

pub use config::{Config, ConfigLoader, LogLevel};

pub use error::{ConfigError, ConfigResult};

pub use notes::NotesError;

pub use render::{OutputFormat, RenderedOutput};
