//! Core use-case services: the interactive flows driven from the menu.
//!
//! # Responsibility
//! - Orchestrate validation, reference resolution and repository calls.
//! - Keep the terminal and storage details behind `Console` and repository
//!   traits.

pub mod presentation;
pub mod project_editor;
pub mod project_queries;
pub mod project_removal;
pub mod reference_resolver;
