//! # Kick Assembler analysis
//!
//! This module is used by both the CLI and the language server.
//! There is no parser of our own, instead Kick Assembler is run with `-asminfo` and the
//! resulting block is the ground truth for what each span of the source is.  We only
//! add the things the assembler does not report, namely scopes, doc comments,
//! parameter lists and the relationships between labels and their references.
//! The server compiles to a separate executable, its entry point is in `src/bin/server-kickass/main.rs`.
//!
//! Coordinates in this module are 0-based.  Columns are counted in characters, and
//! `SourceRange::end_col` is exclusive, which is how the client expects them.

use lsp_types as lsp;
use serde::Serialize;

pub mod info;
pub mod source;
pub mod symbols;
pub mod resolver;
pub mod numbers;
pub mod hovers;
pub mod handbook;
pub mod settings;
pub mod assembler;
pub mod project;
pub mod registry;
pub mod checkpoint;
pub mod memory_map;

#[cfg(test)]
mod tests;

/// Prefix that promotes a declaration to the global scope
pub const GLOBAL_SIGIL: char = '@';

#[derive(thiserror::Error,Debug)]
pub enum Error {
    #[error("assembler jar or java runtime is missing")]
    ConfigurationInvalid,
    #[error("assembler could not be launched: {0}")]
    AssemblerLaunch(String),
    #[error("asminfo block was not found")]
    MissingInfo
}

pub mod symbol_flags {
    /// defined in the file being edited
    pub const MAIN: u64 = 0x01;
    /// promoted to scope 0 with the `@` sigil
    pub const GLOBAL: u64 = 0x02;
    /// supplied by a Kick Assembler library rather than the source
    pub const BUILTIN: u64 = 0x04;
}

#[derive(Clone,Copy,Debug,PartialEq,Eq,Default,Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceRange {
    pub file: usize,
    pub start_line: usize,
    pub start_col: usize,
    pub end_line: usize,
    pub end_col: usize
}

impl SourceRange {
    pub fn new(file: usize, start_line: usize, start_col: usize, end_line: usize, end_col: usize) -> Self {
        Self {
            file,
            start_line,
            start_col,
            end_line,
            end_col
        }
    }
    /// The cursor may sit at either end of the span.
    pub fn contains(&self, line: usize, col: usize) -> bool {
        if line < self.start_line || line > self.end_line {
            return false;
        }
        if line == self.start_line && col < self.start_col {
            return false;
        }
        if line == self.end_line && col > self.end_col {
            return false;
        }
        true
    }
    pub fn to_lsp(&self) -> lsp::Range {
        lsp::Range::new(
            lsp::Position::new(self.start_line as u32, self.start_col as u32),
            lsp::Position::new(self.end_line as u32, self.end_col as u32)
        )
    }
}

/// Span classification as reported in the `[syntax]` section
#[derive(Clone,Copy,Debug,PartialEq,Eq,Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SyntaxKind {
    Label,
    Directive,
    PreprocessorDirective,
    Mnemonic,
    SymbolReference,
    FieldReference,
    MacroInvocation,
    PseudoCommandInvocation,
    Comment
}

impl SyntaxKind {
    /// Map the assembler's tag, unknown tags give `None`.
    pub fn from_asminfo(tag: &str) -> Option<Self> {
        match tag.to_lowercase().as_str() {
            "label" => Some(Self::Label),
            "directive" => Some(Self::Directive),
            "ppdirective" => Some(Self::PreprocessorDirective),
            "mnemonic" => Some(Self::Mnemonic),
            "symbolreference" => Some(Self::SymbolReference),
            "objfieldreference" => Some(Self::FieldReference),
            "macroexecution" => Some(Self::MacroInvocation),
            "pseudocommandexecution" => Some(Self::PseudoCommandInvocation),
            "comment" => Some(Self::Comment),
            _ => None
        }
    }
}

#[derive(Clone,Copy,Debug,PartialEq,Eq,Serialize)]
pub struct SyntaxSpan {
    pub kind: SyntaxKind,
    pub range: SourceRange
}

#[derive(Clone,Debug,PartialEq,Eq,Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileRecord {
    pub index: usize,
    pub path: String,
    /// this is the file being edited
    pub is_current: bool,
    /// auto-included from inside the assembler jar
    pub is_system: bool
}

#[derive(Clone,Debug,PartialEq,Eq,Serialize)]
pub struct CompileError {
    pub level: String,
    pub range: SourceRange,
    pub message: String
}

#[derive(Clone,Copy,Debug,PartialEq,Eq,Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ScopeKind {
    NamedLabel,
    Namespace,
    Function,
    Macro,
    PseudoCommand
}

#[derive(Clone,Debug,PartialEq,Eq,Serialize)]
pub struct Scope {
    pub id: usize,
    pub parent: Option<usize>,
    /// line where the scope is named, this is matched against symbol lines
    pub line: usize,
    pub file: usize,
    pub name: String,
    pub kind: ScopeKind
}

/// Flat classification of a symbol, used for ordered lookups
#[derive(Clone,Copy,Debug,PartialEq,Eq,Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SymbolType {
    NamedLabel,
    Label,
    Constant,
    Function,
    Macro,
    PseudoCommand,
    Variable,
    Namespace,
    Parameter,
    Boolean,
    Comment,
    Reference
}

#[derive(Clone,Copy,Debug,PartialEq,Eq,Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ValueKind {
    Variable,
    Constant,
    Label,
    Boolean
}

#[derive(Clone,Copy,Debug,PartialEq,Eq,Serialize)]
#[serde(rename_all = "camelCase")]
pub enum InvocableKind {
    Function,
    Macro,
    PseudoCommand
}

#[derive(Clone,Copy,Debug,PartialEq,Eq,Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ParamKind {
    Number,
    String
}

#[derive(Clone,Debug,PartialEq,Eq,Serialize)]
pub struct Parameter {
    pub name: String,
    pub kind: ParamKind,
    pub description: Option<String>
}

/// The part of a symbol that depends on what it is
#[derive(Clone,Debug,PartialEq,Eq,Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum SymbolDetail {
    NamedLabel {
        /// the label also opens a block scope
        is_namespace: bool,
        /// first few lines starting at the label
        peek: Option<String>
    },
    Value {
        kind: ValueKind,
        value: Option<i64>,
        original: Option<String>
    },
    Invocable {
        kind: InvocableKind,
        params: Vec<Parameter>
    },
    Parameter {
        kind: ParamKind,
        description: Option<String>
    },
    Namespace,
    Reference {
        is_namespace: bool,
        /// trailing `+` or `-` characters removed from the name
        run: String
    }
}

#[derive(Clone,Debug,PartialEq,Eq,Serialize)]
pub struct Symbol {
    pub name: String,
    pub scope: usize,
    pub range: SourceRange,
    pub flags: u64,
    pub doc: Option<String>,
    pub detail: SymbolDetail
}

impl Symbol {
    pub fn new(name: &str, scope: usize, detail: SymbolDetail) -> Self {
        Self {
            name: name.to_string(),
            scope,
            range: SourceRange::default(),
            flags: 0,
            doc: None,
            detail
        }
    }
    pub fn kind(&self) -> SymbolType {
        match &self.detail {
            SymbolDetail::NamedLabel { .. } => SymbolType::NamedLabel,
            SymbolDetail::Value { kind, .. } => match kind {
                ValueKind::Variable => SymbolType::Variable,
                ValueKind::Constant => SymbolType::Constant,
                ValueKind::Label => SymbolType::Label,
                ValueKind::Boolean => SymbolType::Boolean
            },
            SymbolDetail::Invocable { kind, .. } => match kind {
                InvocableKind::Function => SymbolType::Function,
                InvocableKind::Macro => SymbolType::Macro,
                InvocableKind::PseudoCommand => SymbolType::PseudoCommand
            },
            SymbolDetail::Parameter { .. } => SymbolType::Parameter,
            SymbolDetail::Namespace => SymbolType::Namespace,
            SymbolDetail::Reference { .. } => SymbolType::Reference
        }
    }
    pub fn file(&self) -> usize {
        self.range.file
    }
    pub fn is_main(&self) -> bool {
        self.flags & symbol_flags::MAIN > 0
    }
    pub fn is_global(&self) -> bool {
        self.flags & symbol_flags::GLOBAL > 0
    }
    pub fn is_builtin(&self) -> bool {
        self.flags & symbol_flags::BUILTIN > 0
    }
    /// Numeric value for value-holding declarations
    pub fn value(&self) -> Option<i64> {
        match &self.detail {
            SymbolDetail::Value { value, .. } => *value,
            _ => None
        }
    }
    pub fn params(&self) -> &[Parameter] {
        match &self.detail {
            SymbolDetail::Invocable { params, .. } => params,
            _ => &[]
        }
    }
}
