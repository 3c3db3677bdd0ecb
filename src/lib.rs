//! sigdoc: render declaration graphs as Kotlin or Java signatures and turn
//! doc-comment Markdown into structured content trees.
//!
//! The pipeline is load ([`model::load`]) → page ([`page::build_page`], using
//! a [`signature::LanguageService`]) → emit ([`emit::Emitter`]).

pub mod content;
pub mod emit;
pub mod error;
pub mod markup;
pub mod model;
pub mod page;
pub mod signature;
