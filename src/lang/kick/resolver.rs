//! Map a cursor position to what the token there means.
//!
//! The span containing the cursor decides which kinds of symbol are searched, and
//! in what order.  If that comes up empty the word under the cursor is tried against
//! every kind, and finally as a numeric literal.

use super::{Symbol,SymbolType,SyntaxKind};
use super::source::{SourceFile,char_slice};
use super::project::Model;
use super::numbers;

/// Order of the whole-word lookup
const WORD_PRIORITY: [SymbolType;10] = [
    SymbolType::NamedLabel,
    SymbolType::Label,
    SymbolType::Constant,
    SymbolType::Function,
    SymbolType::Macro,
    SymbolType::PseudoCommand,
    SymbolType::Variable,
    SymbolType::Namespace,
    SymbolType::Parameter,
    SymbolType::Boolean
];

/// Order of the lookup for references and labels
const REFERENCE_PRIORITY: [SymbolType;4] = [
    SymbolType::Variable,
    SymbolType::Namespace,
    SymbolType::Constant,
    SymbolType::Label
];

#[derive(Clone,Debug,PartialEq)]
pub enum Resolution<'a> {
    /// `token` is the span text
    Symbol { symbol: &'a Symbol, token: String },
    Instruction(String),
    Directive(String),
    Preprocessor(String),
    Number(i64)
}

/// Split off a trailing run of `+` or `-`, e.g. `loop++` gives `("loop","++")`.
pub fn split_relative(token: &str) -> (&str,&str) {
    let base = token.trim_end_matches(|c| c == '+' || c == '-');
    (base,&token[base.len()..])
}

/// Blank out the characters that separate words in a Kick expression.
fn clean_text(text: &str) -> String {
    text.chars().map(|c| match c {
        '(' | ')' | '\\' | ';' | ':' | '[' | ']' | '@' | '=' => ' ',
        _ => c
    }).collect()
}

/// Word containing (or just before) character `pos`, words are separated by spaces only.
pub fn word_at(text: &str, pos: usize) -> String {
    let chars: Vec<char> = clean_text(text).chars().collect();
    if chars.len() == 0 {
        return String::new();
    }
    let mut p = pos.min(chars.len());
    while p < chars.len() && chars[p] == ' ' {
        if p == 0 {
            break;
        }
        p -= 1;
    }
    let search_end = (p + 1).min(chars.len());
    let beg = match chars[..search_end].iter().rposition(|c| *c == ' ') {
        Some(i) => i + 1,
        None => 0
    };
    let end = match chars[beg..].iter().position(|c| *c == ' ') {
        Some(i) => beg + i,
        None => chars.len()
    };
    chars[beg..end].iter().collect()
}

/// Words before the word at `pos`.
pub fn words_before(text: &str, pos: usize) -> Vec<String> {
    let chars: Vec<char> = clean_text(text).chars().collect();
    let search_end = (pos + 1).min(chars.len());
    let idx = match chars[..search_end].iter().rposition(|c| *c == ' ') {
        Some(i) => i,
        None => return Vec::new()
    };
    let work: String = chars[..idx].iter().collect();
    work.split_whitespace().map(|s| s.to_string()).collect()
}

pub struct Resolver<'a> {
    model: &'a Model,
    file: &'a SourceFile,
    line: usize,
    col: usize,
    current_scope: usize
}

impl<'a> Resolver<'a> {
    /// Queries always refer to the file being edited, `None` if it did not take part.
    pub fn new(model: &'a Model, line: usize, col: usize) -> Option<Self> {
        let file = model.current_source()?;
        file.line(line)?;
        Some(Self {
            model,
            file,
            line,
            col,
            current_scope: file.scope_at(line)
        })
    }
    fn line_text(&self) -> &'a str {
        match self.file.line(self.line) {
            Some(l) => &l.text,
            None => ""
        }
    }
    fn visible(&self, sym: &Symbol, target: Option<usize>) -> bool {
        if sym.scope == self.current_scope || sym.scope == 0 || Some(sym.scope) == target {
            return true;
        }
        match self.model.arena.get(sym.scope) {
            Some(scope) => scope.line == sym.range.start_line && scope.file == sym.file(),
            None => false
        }
    }
    /// Find a visible symbol of one kind.  For named labels a trailing `+` or `-` run
    /// selects the n-th label after or before the cursor line, unless `same_line` is set,
    /// which restricts the search to declarations on the cursor line.
    pub fn find_symbol(&self, token: &str, kind: SymbolType, same_line: bool, target: Option<usize>) -> Option<&'a Symbol> {
        let mut plus = 0;
        let mut minus = 0;
        let mut name = token;
        if kind == SymbolType::NamedLabel && !same_line {
            let (base,run) = split_relative(token);
            if run.len() > 0 {
                if run.chars().all(|c| c == '+') {
                    plus = run.len();
                } else if run.chars().all(|c| c == '-') {
                    minus = run.len();
                } else {
                    return None;
                }
            }
            name = base;
        }
        let name = name.replace(|c: char| c == '<' || c == '>', "");
        let mut stack: Vec<&'a Symbol> = Vec::new();
        for sym in self.model.table.all() {
            if sym.kind() != kind || sym.name != name || !self.visible(sym, target) {
                continue;
            }
            if same_line && (sym.is_builtin() || sym.file() != self.file.index || sym.range.start_line != self.line) {
                continue;
            }
            if plus == 0 && minus == 0 {
                return Some(sym);
            }
            if sym.is_builtin() || sym.file() != self.file.index {
                continue;
            }
            let row = sym.range.start_line;
            if (minus > 0 && row < self.line) || (plus > 0 && row > self.line) {
                stack.push(sym);
            }
        }
        if minus > 0 && stack.len() >= minus {
            return Some(stack[stack.len() - minus]);
        }
        if plus > 0 && stack.len() >= plus {
            return Some(stack[plus - 1]);
        }
        None
    }
    fn field_scope(&self) -> Option<usize> {
        let text = self.line_text().replace('.'," ");
        let scope_name = words_before(&text, self.col).pop()?;
        let scope_name = scope_name.trim_start_matches(|c: char| !c.is_alphanumeric() && c != '_');
        self.model.arena.find_by_name(scope_name).map(|s| s.id)
    }
    fn symbol(&self, sym: Option<&'a Symbol>, token: &str) -> Option<Resolution<'a>> {
        sym.map(|symbol| Resolution::Symbol { symbol, token: token.to_string() })
    }
    /// Resolve the cursor position, spans are tried first, then the bare word.
    pub fn resolve(&self) -> Option<Resolution<'a>> {
        let line = self.line_text();
        let mut code_on_line = false;
        for span in self.model.info.spans.iter().filter(|s| s.range.file == self.file.index) {
            let r = &span.range;
            if self.line < r.start_line || self.line > r.end_line {
                continue;
            }
            if span.kind != SyntaxKind::Comment {
                code_on_line = true;
            }
            if !r.contains(self.line, self.col) {
                continue;
            }
            let token = char_slice(line, r.start_col, r.end_col);
            match span.kind {
                SyntaxKind::MacroInvocation => {
                    if let Some(ans) = self.symbol(self.find_symbol(&token, SymbolType::Macro, false, None), &token) {
                        return Some(ans);
                    }
                },
                SyntaxKind::SymbolReference | SyntaxKind::FieldReference | SyntaxKind::Label => {
                    let exact_line = span.kind == SyntaxKind::Label;
                    let target = match span.kind {
                        SyntaxKind::FieldReference => self.field_scope(),
                        _ => None
                    };
                    for kind in REFERENCE_PRIORITY {
                        if let Some(ans) = self.symbol(self.find_symbol(&token, kind, exact_line, target), &token) {
                            return Some(ans);
                        }
                    }
                    let label = token.replace(':',"");
                    if let Some(ans) = self.symbol(self.find_symbol(&label, SymbolType::NamedLabel, exact_line, target), &token) {
                        return Some(ans);
                    }
                },
                SyntaxKind::Mnemonic => return Some(Resolution::Instruction(token)),
                SyntaxKind::Directive => return Some(Resolution::Directive(token)),
                SyntaxKind::PreprocessorDirective => return Some(Resolution::Preprocessor(token)),
                SyntaxKind::PseudoCommandInvocation => {
                    if let Some(ans) = self.symbol(self.find_symbol(&token, SymbolType::PseudoCommand, false, None), &token) {
                        return Some(ans);
                    }
                },
                SyntaxKind::Comment => {}
            }
        }
        if !code_on_line {
            return None;
        }
        let blanked: String = line.chars().map(|c| match c {
            '.' | '+' | '-' | '*' | '/' | ',' => ' ',
            _ => c
        }).collect();
        let token = word_at(&blanked, self.col).trim().to_string();
        if token.len() == 0 {
            return None;
        }
        for kind in WORD_PRIORITY {
            if let Some(ans) = self.symbol(self.find_symbol(&token, kind, false, None), &token) {
                return Some(ans);
            }
        }
        numbers::to_decimal(&token).map(Resolution::Number)
    }
}
