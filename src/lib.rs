//! # `kickass-lsp` main library
//!
//! This library backs editor tooling for Kick Assembler, a 6502 family cross assembler
//! whose compiler is an external Java program.  The assembler is run in a mode that
//! only emits an *asminfo* block, and the library turns that block into a scope aware
//! symbol model that answers positional queries.
//!
//! ## Architecture
//!
//! The analysis is a pipeline, leaf first:
//! * `lang::kick::info` parses the asminfo block into a `CompileInfo`
//! * `lang::kick::source` splits each participating file into lines and scopes
//! * `lang::kick::symbols` builds the ordered symbol table
//! * `lang::kick::resolver` maps a cursor position to a symbol or handbook entry
//! * `lang::kick::registry` keeps one `Project` per open document and debounces rebuilds
//!
//! The assembler itself is reached through the `lang::kick::assembler::Assemble` trait,
//! so everything above it can be driven from a captured asminfo block.
//!
//! ## Executables
//!
//! * `server-kickass` is a stdio language server
//! * `kickass` is a CLI for inspecting asminfo captures, symbol tables and memory maps

pub mod lang;

type DYNERR = Box<dyn std::error::Error>;
type STDRESULT = Result<(),Box<dyn std::error::Error>>;

pub use lang::kick;
