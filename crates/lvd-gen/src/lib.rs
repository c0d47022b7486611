//! LV Designer code generation.
//!
//! Sends a project's export document to a text-generation provider and
//! returns LVGL source in C or MicroPython.

pub mod client;
pub mod config;
pub mod prompt;
pub mod provider;
pub mod target;
pub mod task;

pub use client::{Backend, CodeGenerator, HttpBackend, failure_comment};
pub use config::{GeneratorConfig, Provider};
pub use target::TargetLanguage;
pub use task::{GenerationStatus, GenerationTask};
