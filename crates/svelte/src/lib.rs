#![deny(missing_docs)]
//! svpage Svelte engine: tag taxonomy, layout injection, and codegen.

/// Page assembly around a layout component.
pub mod assemble;
/// Code generation for injected declarations.
pub mod codegen;
/// Document routing by identity.
pub mod kind;
/// Tag patterns for hoistable blocks.
pub mod tags;

pub use assemble::assemble;
pub use codegen::{LAYOUT_SYMBOL, declarations, json_literal};
pub use kind::DocumentKind;
pub use tags::BuiltinTag;
