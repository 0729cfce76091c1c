use lsp_types as lsp;
use std::sync::Arc;
use super::{Symbol,SymbolDetail,ValueKind,InvocableKind,ParamKind};
use super::project::Model;
use super::resolver::{Resolver,Resolution};
use super::numbers;

use crate::lang::server::Hovers;

mod hovers_statements;

pub struct HoverProvider {
    model: Option<Arc<Model>>,
    statements: hovers_statements::StatementHovers
}

fn new_section(hov: &mut String, sec: &str) {
    if hov.len() > 0 && sec.len() > 0 {
        *hov += "\n***\n"
    }
    *hov += sec;
}

/// Where the declaration lives, empty for the file being edited.
fn file_suffix(model: &Model, sym: &Symbol) -> String {
    if sym.is_builtin() {
        return "from built-in".to_string();
    }
    if sym.is_main() {
        return String::new();
    }
    let rec = match model.info.file(sym.file()) {
        Some(r) => r,
        None => return String::new()
    };
    let base = match std::path::Path::new(&rec.path).file_name() {
        Some(n) => n.to_string_lossy().to_string(),
        None => rec.path.clone()
    };
    match base.starts_with(".source") {
        true => String::new(),
        false => format!("from {}",base)
    }
}

fn param_signature(sym: &Symbol, kind: InvocableKind) -> String {
    let names: Vec<&str> = sym.params().iter().map(|p| p.name.as_str()).collect();
    match kind {
        InvocableKind::PseudoCommand => match names.len() {
            0 => format!(".pseudocommand {}",sym.name),
            _ => format!(".pseudocommand {} {}",sym.name,names.join(":"))
        },
        InvocableKind::Function => format!(".function {}({})",sym.name,names.join(",")),
        InvocableKind::Macro => format!(".macro {}({})",sym.name,names.join(","))
    }
}

impl HoverProvider {
    pub fn new() -> Self {
        Self {
            model: None,
            statements: hovers_statements::StatementHovers::new()
        }
    }
    /// Hovers are taken from this model until another is installed.
    pub fn use_shared_model(&mut self, model: Option<Arc<Model>>) {
        self.model = model;
    }
    fn simple_hover(&self, model: &Model, sym: &Symbol, token: &str) -> Vec<String> {
        let mut header = String::from("\t");
        let mut value_block: Option<String> = None;
        let mut desc = sym.doc.clone();
        let mut peek: Option<String> = None;
        match &sym.detail {
            SymbolDetail::Value { kind, value, original } => {
                header += match kind {
                    ValueKind::Constant => ".const",
                    ValueKind::Variable => ".var",
                    ValueKind::Label => ".label",
                    ValueKind::Boolean => "(boolean)"
                };
                header += &format!(" {}",sym.name);
                if let Some(orig) = original {
                    header += &format!(" = {}",orig);
                }
                value_block = value.map(numbers::format_value);
            },
            SymbolDetail::NamedLabel { peek: p, .. } => {
                header += &format!("(label) {}",sym.name);
                if !token.ends_with(':') {
                    peek = p.clone();
                }
            },
            SymbolDetail::Namespace => header += &format!(".namespace {}",sym.name),
            SymbolDetail::Parameter { kind, description } => {
                let tag = match kind {
                    ParamKind::String => "(parameter) string",
                    ParamKind::Number => "(parameter)"
                };
                header += &format!("{} {}",tag,sym.name);
                if description.is_some() {
                    desc = description.clone();
                }
            },
            _ => header += &sym.name
        }
        let suffix = file_suffix(model, sym);
        if suffix.len() > 0 {
            header += &format!(" {}",suffix);
        }
        let mut ans = vec![header];
        if let Some(d) = desc {
            ans.push(d);
        }
        if let Some(p) = peek {
            ans.push(["```\n",&p,"\n```"].concat());
        }
        if let Some(v) = value_block {
            ans.push(v);
        }
        ans
    }
    fn invocable_hover(&self, model: &Model, sym: &Symbol, kind: InvocableKind) -> Vec<String> {
        let mut header = format!("\t{}",param_signature(sym, kind));
        let suffix = file_suffix(model, sym);
        if suffix.len() > 0 {
            header += &format!(" {}",suffix);
        }
        let mut ans = vec![header];
        if let Some(d) = &sym.doc {
            ans.push(d.to_string());
        }
        if sym.params().len() > 0 {
            let mut list = String::from("parameters:");
            for p in sym.params() {
                let tag = match p.kind {
                    ParamKind::String => " (string)",
                    ParamKind::Number => ""
                };
                list += &format!("\n* `{}`{}",p.name,tag);
                if let Some(d) = &p.description {
                    list += &format!(" : {}",d);
                }
            }
            ans.push(list);
        }
        ans
    }
    /// Markdown blocks for the cursor position, `None` if nothing is known there.
    pub fn blocks(&self, model: &Model, line: usize, col: usize) -> Option<Vec<String>> {
        let resolver = Resolver::new(model, line, col)?;
        let ans = match resolver.resolve()? {
            Resolution::Instruction(tok) => self.statements.get_op(&tok)?,
            Resolution::Directive(tok) => self.statements.get_directive(&tok, &model.info.directives)?,
            Resolution::Preprocessor(tok) => self.statements.get_preprocessor(&tok, &model.info.preprocessors)?,
            Resolution::Number(val) => vec![numbers::format_value(val).trim().to_string()],
            Resolution::Symbol { symbol, token } => match &symbol.detail {
                SymbolDetail::Invocable { kind, .. } => self.invocable_hover(model, symbol, *kind),
                _ => self.simple_hover(model, symbol, &token)
            }
        };
        Some(ans)
    }
}

impl Hovers for HoverProvider {
    fn get(&mut self, _line: String, row: isize, col: isize) -> Option<lsp::Hover> {
        if row < 0 || col < 0 {
            return None;
        }
        let model = self.model.clone()?;
        let mut value = String::new();
        for block in self.blocks(&model, row as usize, col as usize)? {
            new_section(&mut value, &block);
        }
        match value.len() {
            0 => None,
            _ => Some(lsp::Hover {
                contents: lsp::HoverContents::Markup(lsp::MarkupContent {
                    kind: lsp::MarkupKind::Markdown,
                    value
                }),
                range: None
            })
        }
    }
}
