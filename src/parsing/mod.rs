//! Parsers for portal schedule documents.
//!
//! The portal exchanges timelines and anchor-rule configuration as JSON.
//! Parsing resolves the name-based wire format into the engine's domain
//! model, including turning `dependsOn` phase names into arena indices.

pub mod timeline_json;


pub use timeline_json::{parse_anchor_rules_str, parse_timeline_file, parse_timeline_str};
