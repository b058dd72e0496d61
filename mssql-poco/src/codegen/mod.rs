//! Code generation module

mod class_emitter;
mod column_formatter;
mod generator;
mod type_mapper;

pub use class_emitter::*;
pub use column_formatter::*;
pub use generator::*;
pub use type_mapper::*;
