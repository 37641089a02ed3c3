//! `procsite` - process description to Jekyll site generator
//!
//! Reads a YAML process description (roles, activities, artifacts,
//! templates, guidelines, tools), links related records to each other, and
//! writes a Jekyll project: one Markdown collection per entity type, a site
//! configuration carrying a Mermaid activity graph, bundled static pages,
//! and uploaded attachments.

pub mod cli;
pub mod config;
pub mod enrich;
pub mod error;
pub mod graph;
pub mod model;
pub mod observability;
pub mod render;
pub mod site;
