#![warn(missing_docs)]
//! Hornet Selection - Shareable Selection Codec
//!
//! The enabled/disabled state of each benchmark is the authoritative
//! selection. This crate derives a compact textual identifier from it (for a
//! URL fragment or a command line) and applies such an identifier back onto
//! a registry.
//!
//! ```text
//! fragment := "" | "et=" tagname | "e=" idlist | "d=" idlist | segment("&"segment)*
//! idlist   := id ("," id)*
//! ```
//!
//! The empty fragment stands for the CORE selection.

mod codec;
mod selection;

pub use codec::{Segment, decode, encode, parse_fragment};
pub use selection::{add_tag_to_selection, select_tag};

/// Key of the enabled-tag segment
pub const ENABLED_TAG_KEY: &str = "et";
/// Key of the enabled-ids segment
pub const ENABLED_KEY: &str = "e";
/// Key of the disabled-ids segment
pub const DISABLED_KEY: &str = "d";
