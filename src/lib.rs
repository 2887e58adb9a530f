//! The library code for the `folio` static book generator. A build is a pure
//! derivation from files on disk to files on disk:
//!
//! 1. Discovering and loading book configurations ([`crate::config`])
//! 2. Building each book's chapters in order ([`crate::build`])
//!
//! The second step does the real work. For every chapter it converts the
//! Markdown source to an HTML fragment ([`crate::markdown`]), computes a
//! stable output file name from the book identity and the chapter's ordinal
//! ([`crate::namer`]), and renders the fragment into a full page with links
//! to every earlier chapter of the same book ([`crate::page`]).
//!
//! Output file names never depend on chapter content, so editing a chapter
//! leaves every link to it intact. Re-running a build against unchanged
//! inputs produces byte-identical output.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]

pub mod build;
pub mod config;
pub mod markdown;
pub mod namer;
pub mod page;
mod value;
