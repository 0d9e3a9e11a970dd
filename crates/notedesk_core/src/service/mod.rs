//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate store, codec and file access into use-case level APIs.
//! - Keep the console layer decoupled from storage details.

pub mod note_service;
