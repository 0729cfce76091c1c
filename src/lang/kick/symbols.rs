//! Build the symbol table from the syntax spans.
//!
//! Spans are visited in asminfo order, and each label, directive or reference span
//! may yield a symbol.  The macro, function and pseudo-command declarations also
//! yield one symbol per parameter; these are pushed just before the declaration.
//! The table is rebuilt as a unit after every compile.

use log::trace;
use super::{Symbol,SymbolDetail,SymbolType,SyntaxKind,SyntaxSpan,SourceRange,ValueKind,InvocableKind,Parameter,ParamKind,symbol_flags,GLOBAL_SIGIL};
use super::info::{CompileInfo,LibraryKind};
use super::source::{SourceFile,ScopeArena,Line,char_slice,char_find};
use super::numbers;
use super::resolver::split_relative;

/// Split a macro, function or pseudo-command declaration.
/// The result is `[directive, name, param1, param2, ...]`, possibly shorter if the
/// declaration is incomplete.  Anything after `//` or `{` is ignored.
pub fn split_declaration(line: &str, pseudo: bool) -> Vec<String> {
    let mut ans = Vec::new();
    let mut text = line.to_string();
    if let Some(pos) = text.find("//") {
        if pos > 0 {
            text.truncate(pos);
        }
    }
    if let Some(pos) = text.find('{') {
        if pos > 0 {
            text.truncate(pos);
        }
    }
    let param_pos = match pseudo {
        true => match regex::Regex::new(r"\w+\s*:") {
            Ok(re) => re.find(&text).map(|m| m.start()),
            Err(_) => None
        },
        false => text.find('(')
    };
    let mut params: Option<String> = None;
    if let Some(pos) = param_pos {
        if pos > 0 {
            params = Some(text[pos..].to_string());
            text.truncate(pos);
        }
    }
    let head: Vec<&str> = text.split_whitespace().collect();
    for tok in head.iter().take(2) {
        ans.push(tok.to_string());
    }
    if pseudo && params.is_none() && head.len() > 2 {
        params = Some(head[2].to_string());
    }
    if let Some(p) = params {
        let p = p.replace(|c: char| c == '(' || c == ')' || c == ' ', "");
        let delim = match pseudo {
            true => ':',
            false => ','
        };
        for parm in p.split(delim) {
            if parm.len() > 0 {
                ans.push(parm.to_string());
            }
        }
    }
    ans
}

/// Gather the comment block immediately above `row`, with comment markers removed.
/// The block ends at a blank line or a line with code.
pub fn remarks_above(lines: &[Line], row: usize) -> Option<String> {
    let mut found: Vec<String> = Vec::new();
    let mut curr = row;
    while curr > 0 {
        curr -= 1;
        let line = &lines[curr];
        if line.text.trim().len() == 0 || line.clean.trim().len() > 0 {
            break;
        }
        let mut s = line.text.trim();
        for marker in ["///","//","/**","/*"] {
            if let Some(rest) = s.strip_prefix(marker) {
                s = rest;
                break;
            }
        }
        s = s.strip_suffix("*/").unwrap_or(s).trim();
        s = s.strip_prefix('*').unwrap_or(s).trim();
        found.push(s.to_string());
    }
    found.reverse();
    let ans = found.join("\n").trim().to_string();
    match ans.len() {
        0 => None,
        _ => Some(ans)
    }
}

/// `name = value` with the value cut at `//`, or just the first word.
fn simple_value(text: &str) -> (String,Option<String>) {
    if text.contains('=') {
        let mut parts = text.split('=');
        let name = parts.next().unwrap_or("").trim().to_string();
        let val = parts.next().unwrap_or("");
        let val = val.split("//").next().unwrap_or("").trim().to_string();
        return (name,Some(val));
    }
    let name = text.trim().split(' ').next().unwrap_or("").to_string();
    (name,None)
}

/// Symbol under construction, `position` overrides the span's start column.
struct Draft {
    symbol: Symbol,
    position: Option<usize>,
    params: Vec<Symbol>
}

impl Draft {
    fn new(symbol: Symbol) -> Self {
        Self {
            symbol,
            position: None,
            params: Vec::new()
        }
    }
}

pub struct SymbolTable {
    /// symbols from the source in asminfo order
    pub symbols: Vec<Symbol>,
    /// symbols supplied by libraries
    pub builtins: Vec<Symbol>
}

impl SymbolTable {
    pub fn new() -> Self {
        Self {
            symbols: Vec::new(),
            builtins: Vec::new()
        }
    }
    /// Build from scratch, `files` are the models of the non-system files.
    pub fn build(info: &CompileInfo, files: &[SourceFile], arena: &ScopeArena, peek_lines: usize) -> Self {
        let mut ans = Self::new();
        for span in &info.spans {
            if let Some(rec) = info.file(span.range.file) {
                if rec.is_system {
                    continue;
                }
            }
            let file = match files.iter().find(|f| f.index == span.range.file) {
                Some(f) => f,
                None => continue
            };
            if let Some(draft) = ans.create_symbol(span, file, arena, peek_lines) {
                ans.symbols.extend(draft.params);
                ans.symbols.push(draft.symbol);
            }
        }
        for lib in &info.libraries {
            let detail = match lib.kind {
                LibraryKind::Constant => SymbolDetail::Value { kind: ValueKind::Constant, value: None, original: None },
                LibraryKind::Function => SymbolDetail::Invocable {
                    kind: InvocableKind::Function,
                    params: (1..=lib.args).map(|i| Parameter {
                        name: format!("arg{}",i),
                        kind: ParamKind::Number,
                        description: None
                    }).collect()
                }
            };
            let mut sym = Symbol::new(&lib.name, 0, detail);
            sym.flags = symbol_flags::BUILTIN;
            sym.doc = Some(format!("{} library",lib.library));
            ans.builtins.push(sym);
        }
        trace!("built {} symbols, {} builtins",ans.symbols.len(),ans.builtins.len());
        ans
    }
    /// User symbols followed by builtins
    pub fn all(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.iter().chain(self.builtins.iter())
    }
    fn create_symbol(&self, span: &SyntaxSpan, file: &SourceFile, arena: &ScopeArena, peek_lines: usize) -> Option<Draft> {
        let line = file.line(span.range.start_line)?;
        let mut draft = match span.kind {
            SyntaxKind::Label => self.from_label(&span.range, line, file, arena, peek_lines),
            SyntaxKind::Directive | SyntaxKind::PreprocessorDirective => self.from_directive(&span.range, line, file, arena),
            SyntaxKind::SymbolReference | SyntaxKind::FieldReference => self.from_reference(&span.range, line, file, arena),
            _ => None
        }?;
        if draft.symbol.name.starts_with(GLOBAL_SIGIL) {
            draft.symbol.name = draft.symbol.name[GLOBAL_SIGIL.len_utf8()..].to_string();
            draft.symbol.scope = 0;
            draft.symbol.flags |= symbol_flags::GLOBAL;
            draft.position = draft.position.map(|p| p + 1);
        }
        let r = &span.range;
        draft.symbol.range = match draft.position {
            Some(p) => SourceRange::new(r.file, r.start_line, p, r.end_line, p + draft.symbol.name.chars().count()),
            None => *r
        };
        if file.is_main {
            draft.symbol.flags |= symbol_flags::MAIN;
        }
        draft.symbol.doc = remarks_above(&file.lines, r.start_line);
        if let (Some(doc),SymbolDetail::Invocable { params, .. }) = (&draft.symbol.doc, &mut draft.symbol.detail) {
            backfill_params(doc, params, &mut draft.params);
        }
        for p in draft.params.iter_mut() {
            p.range = draft.symbol.range;
            p.flags = draft.symbol.flags & symbol_flags::MAIN;
        }
        Some(draft)
    }
    fn from_label(&self, rng: &SourceRange, line: &Line, file: &SourceFile, arena: &ScopeArena, peek_lines: usize) -> Option<Draft> {
        let txt = char_slice(&line.clean, rng.start_col, rng.end_col);
        let txt = txt.trim();
        let name = txt.strip_suffix(':').unwrap_or(txt);
        if name.len() == 0 {
            return None;
        }
        let is_namespace = is_scope_name(arena, file, rng.start_line, name);
        let mut peek: Vec<&str> = Vec::new();
        for row in rng.start_line..rng.start_line + peek_lines {
            if let Some(l) = file.line(row) {
                peek.push(&l.text);
            }
        }
        let peek = match peek.len() {
            0 => None,
            _ => Some(peek.join("   \n"))
        };
        Some(Draft::new(Symbol::new(name, line.scope, SymbolDetail::NamedLabel { is_namespace, peek })))
    }
    fn from_reference(&self, rng: &SourceRange, line: &Line, file: &SourceFile, arena: &ScopeArena) -> Option<Draft> {
        let txt = char_slice(&line.clean, rng.start_col, rng.end_col);
        let (name,run) = split_relative(txt.trim());
        if name.len() == 0 {
            return None;
        }
        let is_namespace = is_scope_name(arena, file, rng.start_line, name);
        let detail = SymbolDetail::Reference { is_namespace, run: run.to_string() };
        Some(Draft::new(Symbol::new(name, line.scope, detail)))
    }
    fn from_directive(&self, rng: &SourceRange, line: &Line, file: &SourceFile, arena: &ScopeArena) -> Option<Draft> {
        let text = &line.clean;
        let directive = char_slice(text, rng.start_col, rng.end_col).trim().to_lowercase();
        let after = char_slice(text, rng.end_col, usize::MAX);
        let after = after.trim();
        let value_kind = match directive.as_str() {
            "#define" => Some(ValueKind::Boolean),
            ".var" => Some(ValueKind::Variable),
            ".eval" if after.starts_with("var ") => Some(ValueKind::Variable),
            ".const" => Some(ValueKind::Constant),
            ".label" => Some(ValueKind::Label),
            _ => None
        };
        if let Some(kind) = value_kind {
            let (decl,from) = match directive.as_str() {
                ".eval" => (&after[4..], keyword_end(text, rng.end_col)),
                _ => (after, rng.end_col)
            };
            let (name,original) = simple_value(decl);
            if name.len() == 0 {
                return None;
            }
            let value = match &original {
                Some(v) => numbers::to_decimal(v),
                None => None
            };
            let mut draft = Draft::new(Symbol::new(&name, line.scope, SymbolDetail::Value { kind, value, original }));
            draft.position = find_from(text, from, &name);
            return Some(draft);
        }
        match directive.as_str() {
            ".namespace" | ".filenamespace" => {
                let (name,_) = simple_value(after);
                let name = name.trim_end_matches('{').to_string();
                if name.len() == 0 {
                    return None;
                }
                if self.symbols.iter().any(|s| s.name == name && s.kind() == SymbolType::Namespace) {
                    return None;
                }
                let mut draft = Draft::new(Symbol::new(&name, line.scope, SymbolDetail::Namespace));
                draft.position = find_from(text, rng.end_col, &name);
                Some(draft)
            },
            ".macro" | ".function" | ".pseudocommand" => {
                let kind = match directive.as_str() {
                    ".function" => InvocableKind::Function,
                    ".pseudocommand" => InvocableKind::PseudoCommand,
                    _ => InvocableKind::Macro
                };
                let decl = char_slice(text, rng.start_col, usize::MAX);
                let split = split_declaration(&decl, kind == InvocableKind::PseudoCommand);
                if split.len() < 2 {
                    return None;
                }
                let name = &split[1];
                let decl_scope = match arena.find_at(file.index, rng.start_line) {
                    Some(s) => s.id,
                    None => line.scope
                };
                let mut params = Vec::new();
                let mut param_symbols = Vec::new();
                for p in &split[2..] {
                    params.push(Parameter { name: p.to_string(), kind: ParamKind::Number, description: None });
                    param_symbols.push(Symbol::new(p, decl_scope, SymbolDetail::Parameter { kind: ParamKind::Number, description: None }));
                }
                let mut draft = Draft::new(Symbol::new(name, line.scope, SymbolDetail::Invocable { kind, params }));
                draft.position = find_from(text, rng.end_col, name);
                draft.params = param_symbols;
                Some(draft)
            },
            _ => None
        }
    }
}

/// Character position of `pat` at or after column `from`.
fn find_from(text: &str, from: usize, pat: &str) -> Option<usize> {
    char_find(&char_slice(text, from, usize::MAX), pat).map(|p| from + p)
}

/// Column after the word that follows column `from`, as in `.eval var`.
fn keyword_end(text: &str, from: usize) -> usize {
    let rest: Vec<char> = text.chars().skip(from).collect();
    let gap = rest.iter().take_while(|c| c.is_whitespace()).count();
    let word = rest[gap..].iter().take_while(|c| !c.is_whitespace()).count();
    from + gap + word
}

/// label or reference on the same line as a scope of the same name
fn is_scope_name(arena: &ScopeArena, file: &SourceFile, row: usize, name: &str) -> bool {
    let bare = name.trim_start_matches(GLOBAL_SIGIL);
    file.scopes(arena).iter().any(|s| s.line == row && s.name == bare)
}

/// Copy `@param [type] name description` lines into the parameter list.
fn backfill_params(doc: &str, params: &mut Vec<Parameter>, param_symbols: &mut Vec<Symbol>) {
    let re = match regex::Regex::new(r"@param(?:eter)?\s+(.*)") {
        Ok(re) => re,
        Err(_) => return
    };
    for caps in re.captures_iter(doc) {
        let mut toks: Vec<&str> = match caps.get(1) {
            Some(m) => m.as_str().split_whitespace().collect(),
            None => continue
        };
        let mut is_string = false;
        if let Some(first) = toks.first() {
            if ["string","number","value"].contains(first) && toks.len() > 1 {
                is_string = *first == "string";
                toks.remove(0);
            }
        }
        let pname = match toks.first() {
            Some(n) => *n,
            None => continue
        };
        let desc = toks[1..].join(" ");
        for (i,p) in params.iter_mut().enumerate() {
            if p.name != pname {
                continue;
            }
            p.description = Some(desc.clone());
            if is_string {
                p.kind = ParamKind::String;
            }
            if let Some(sym) = param_symbols.get_mut(i) {
                sym.detail = SymbolDetail::Parameter { kind: p.kind, description: Some(desc.clone()) };
            }
        }
    }
}
