//! LLM Provider implementations for Wayfarer.
//!
//! All providers implement the `wayfarer_core::Provider` trait.

pub mod openai_compat;

pub use openai_compat::OpenAiCompatProvider;
