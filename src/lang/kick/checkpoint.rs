//! Kick Assembler checkpoint module.
//!
//! Provides data from the most recent compile of a project to an LSP client.

use lsp_types as lsp;
use crate::lang::Document;
use crate::lang::server::{Checkpoint,basic_diag};
use super::{Symbol,SymbolDetail,SymbolType,InvocableKind};
use super::project::{Project,Model};
use super::resolver::{Resolver,Resolution,split_relative,word_at};

/// Where a symbol of this model is declared, the file being edited maps back to the project.
fn symbol_uri(proj: &Project, model: &Model, file: usize) -> Option<lsp::Url> {
    let rec = model.info.file(file)?;
    if rec.is_current {
        return Some(proj.uri().clone());
    }
    lsp::Url::from_file_path(&rec.path).ok()
}

fn location(proj: &Project, model: &Model, sym: &Symbol) -> Option<lsp::Location> {
    let uri = symbol_uri(proj, model, sym.file())?;
    Some(lsp::Location::new(uri, sym.range.to_lsp()))
}

/// Quoted string containing the cursor, if any.
fn quoted_at(line: &str, col: usize) -> Option<String> {
    let chars: Vec<char> = line.chars().collect();
    let quotes: Vec<usize> = chars.iter().enumerate().filter(|(_,c)| **c == '"').map(|(i,_)| i).collect();
    for pair in quotes.chunks(2) {
        if pair.len() == 2 && col > pair[0] && col <= pair[1] {
            return Some(chars[pair[0]+1..pair[1]].iter().collect());
        }
    }
    None
}

#[allow(deprecated)]
fn create_symbol(name: String,detail: Option<String>,kind: lsp::SymbolKind,rng: &lsp::Range,children: Option<Vec<lsp::DocumentSymbol>>) -> lsp::DocumentSymbol {
    lsp::DocumentSymbol {
        name: name.to_string(),
        detail,
        kind,
        range: rng.clone(),
        selection_range: rng.clone(),
        tags: None,
        children,
        deprecated: None
    }
}

fn symbol_kind(sym: &Symbol) -> lsp::SymbolKind {
    match sym.kind() {
        SymbolType::NamedLabel | SymbolType::Label => lsp::SymbolKind::CONSTANT,
        SymbolType::Constant => lsp::SymbolKind::CONSTANT,
        SymbolType::Boolean => lsp::SymbolKind::BOOLEAN,
        SymbolType::Variable => lsp::SymbolKind::VARIABLE,
        SymbolType::Namespace => lsp::SymbolKind::NAMESPACE,
        SymbolType::Function => lsp::SymbolKind::FUNCTION,
        SymbolType::Macro | SymbolType::PseudoCommand => lsp::SymbolKind::METHOD,
        _ => lsp::SymbolKind::NULL
    }
}

impl Project {
    /// Declaration the cursor refers to.  The resolver is tried first, then any user
    /// declaration with the word's name unless the word is a statement.
    fn find_declaration<'a>(&self, model: &'a Model, line: usize, col: usize) -> Option<&'a Symbol> {
        let resolver = Resolver::new(model, line, col)?;
        match resolver.resolve() {
            Some(Resolution::Symbol { symbol, .. }) if !symbol.is_builtin() => return Some(symbol),
            Some(Resolution::Symbol { .. }) => return None,
            Some(Resolution::Instruction(_)) | Some(Resolution::Directive(_)) | Some(Resolution::Preprocessor(_)) => return None,
            _ => {}
        }
        let text = model.current_source()?.line(line)?.text.clone();
        let word = word_at(&text, col);
        let (name,_) = split_relative(word.trim());
        let name = name.trim_start_matches(super::GLOBAL_SIGIL);
        if name.len() == 0 {
            return None;
        }
        model.table.symbols.iter().find(|s| {
            s.name == name && s.kind() != SymbolType::Reference
        })
    }
}

impl Checkpoint for Project {
    fn get_doc(&self) -> Document {
        Document::new(self.uri().clone(), self.source().to_string(), self.version())
    }
    fn get_line(&self,row: usize) -> Option<String> {
        if let Some(model) = self.model() {
            if let Some(file) = model.current_source() {
                return file.line(row).map(|l| l.text.clone());
            }
        }
        self.source().lines().nth(row).map(|s| s.to_string())
    }
    fn get_symbols(&self) -> Vec<lsp::DocumentSymbol> {
        let mut ans = Vec::new();
        let model = match self.model() {
            Some(m) => m,
            None => return ans
        };
        let curr = match model.current_record() {
            Some(rec) => rec.index,
            None => return ans
        };
        for sym in model.table.symbols.iter().filter(|s| s.file() == curr) {
            let detail = match &sym.detail {
                SymbolDetail::Reference { .. } | SymbolDetail::Parameter { .. } => continue,
                SymbolDetail::Invocable { kind, .. } => Some(match kind {
                    InvocableKind::Function => "function",
                    InvocableKind::Macro => "macro",
                    InvocableKind::PseudoCommand => "pseudocommand"
                }.to_string()),
                SymbolDetail::Value { original, .. } => original.clone(),
                _ => None
            };
            let rng = sym.range.to_lsp();
            let children = match sym.params().len() {
                0 => None,
                _ => Some(sym.params().iter().map(|p| {
                    create_symbol(p.name.clone(), Some("parameter".to_string()), lsp::SymbolKind::VARIABLE, &rng, None)
                }).collect())
            };
            ans.push(create_symbol(sym.name.clone(), detail, symbol_kind(sym), &rng, children));
        }
        ans
    }
    fn get_defs(&self,sel_loc: &lsp::Location) -> Vec<lsp::Location> {
        let model = match self.model() {
            Some(m) => m,
            None => return Vec::new()
        };
        let pos = sel_loc.range.start;
        let (line,col) = (pos.line as usize, pos.character as usize);
        if let Some(text) = self.get_line(line) {
            if let Some(include) = quoted_at(&text, col) {
                let include = include.replace('\\',"/");
                for rec in &model.info.files {
                    if include.len() > 0 && rec.path.replace('\\',"/").ends_with(&include) {
                        if let Some(uri) = symbol_uri(self, model, rec.index) {
                            let zero = lsp::Position::new(0,0);
                            return vec![lsp::Location::new(uri, lsp::Range::new(zero,zero))];
                        }
                    }
                }
            }
        }
        let sym = match self.find_declaration(model, line, col) {
            Some(s) => s,
            None => return Vec::new()
        };
        if sym.is_main() && sym.range.contains(line, col) {
            let end = lsp::Position::new(pos.line, pos.character + 1);
            return vec![lsp::Location::new(self.uri().clone(), lsp::Range::new(pos,end))];
        }
        match location(self, model, sym) {
            Some(loc) => vec![loc],
            None => Vec::new()
        }
    }
    fn get_refs(&self,sel_loc: &lsp::Location) -> Vec<lsp::Location> {
        let mut ans = Vec::new();
        let model = match self.model() {
            Some(m) => m,
            None => return ans
        };
        let pos = sel_loc.range.start;
        let name = match self.find_declaration(model, pos.line as usize, pos.character as usize) {
            Some(sym) => sym.name.clone(),
            None => return ans
        };
        for sym in model.table.symbols.iter().filter(|s| s.kind() == SymbolType::Reference && s.name == name) {
            if let Some(loc) = location(self, model, sym) {
                ans.push(loc);
            }
        }
        ans
    }
    fn get_diags(&self) -> Vec<lsp::Diagnostic> {
        let mut ans = Vec::new();
        let model = match self.model() {
            Some(m) => m,
            None => return ans
        };
        let curr = match model.current_record() {
            Some(rec) => rec.index,
            None => return ans
        };
        for err in model.info.errors_in_file(curr) {
            let severity = match err.level.to_lowercase().starts_with("warn") {
                true => lsp::DiagnosticSeverity::WARNING,
                false => lsp::DiagnosticSeverity::ERROR
            };
            let mut diag = basic_diag(err.range.to_lsp(), &err.message, severity);
            diag.source = Some("kickassembler".to_string());
            ans.push(diag);
        }
        ans
    }
}
