//! Persona composition for `claude-launcher`.
//!
//! ```text
//! Catalog::build ─► resolve_selection ─► compose_entry ─► write_artifacts ─► build_command
//!                                         │
//!                                         ├─ persona: resolve_references ─► assemble
//!                                         └─ team:    decompose (agents) + lead as persona
//! ```

pub mod assembler;
pub mod catalog;
pub mod compose;
pub mod config;
pub mod error;
pub mod frontmatter;
pub mod io;
pub mod launch;
pub mod manifest;
pub mod paths;
pub mod resolver;
pub mod selection;
pub mod team;

pub use error::{LauncherError, Result};
