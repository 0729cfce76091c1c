//! Instruction, directive and preprocessor handbook
//!
//! These tables never change, they are used to render hovers over spans that are
//! not user symbols.

pub mod instructions;
pub mod directives;
