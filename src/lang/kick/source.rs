//! Per-file line and scope model.
//!
//! Every file that took part in the compile is split into lines, paired with a
//! cleaned copy where comment text is blanked out (columns are preserved), and
//! walked once to discover the scopes it opens.  Scopes from all files go into a
//! single `ScopeArena` so that ids are unique across the project.

use log::trace;
use super::{Scope,ScopeKind,SyntaxKind,SyntaxSpan,GLOBAL_SIGIL};
use super::symbols::split_declaration;

#[derive(Clone,Debug,PartialEq,Eq)]
pub struct Line {
    /// innermost scope in effect at the start of the line
    pub scope: usize,
    pub text: String,
    /// text with comments replaced by spaces
    pub clean: String
}

/// Owns all scopes of a project, the id is the index, 0 is the global root.
#[derive(Clone,Debug,PartialEq,Eq)]
pub struct ScopeArena {
    scopes: Vec<Scope>
}

impl ScopeArena {
    pub fn new() -> Self {
        Self {
            scopes: vec![Scope {
                id: 0,
                parent: None,
                line: 0,
                file: 0,
                name: String::new(),
                kind: ScopeKind::NamedLabel
            }]
        }
    }
    pub fn alloc(&mut self, parent: usize, line: usize, file: usize, name: &str, kind: ScopeKind) -> usize {
        let id = self.scopes.len();
        self.scopes.push(Scope {
            id,
            parent: Some(parent),
            line,
            file,
            name: name.to_string(),
            kind
        });
        id
    }
    pub fn get(&self, id: usize) -> Option<&Scope> {
        self.scopes.get(id)
    }
    /// First scope with this name, the root is never matched.
    pub fn find_by_name(&self, name: &str) -> Option<&Scope> {
        self.scopes.iter().skip(1).find(|s| s.name == name)
    }
    /// First scope named on this line of this file.
    pub fn find_at(&self, file: usize, line: usize) -> Option<&Scope> {
        self.scopes.iter().skip(1).find(|s| s.file == file && s.line == line)
    }
    pub fn len(&self) -> usize {
        self.scopes.len()
    }
}

/// Characters `beg..end` of `s`, clamped to the line.
pub fn char_slice(s: &str, beg: usize, end: usize) -> String {
    if end <= beg {
        return String::new();
    }
    s.chars().skip(beg).take(end - beg).collect()
}

/// Character position of the first match of `pat`.
pub fn char_find(s: &str, pat: &str) -> Option<usize> {
    s.find(pat).map(|b| s[..b].chars().count())
}

/// Split on LF or CRLF, a trailing newline gives a final empty line.
pub fn split_lines(text: &str) -> Vec<String> {
    text.split('\n').map(|l| l.strip_suffix('\r').unwrap_or(l).to_string()).collect()
}

/// Blank out `//` and `/* */` comments, block comments may span lines.
/// String and character literals are respected.
pub fn clean_comments(lines: &[String]) -> Vec<String> {
    let mut ans = Vec::new();
    let mut in_block = false;
    for line in lines {
        let chars: Vec<char> = line.chars().collect();
        let mut clean = String::new();
        let mut quote: Option<char> = None;
        let mut i = 0;
        while i < chars.len() {
            let c = chars[i];
            let next = chars.get(i+1).copied();
            if in_block {
                if c == '*' && next == Some('/') {
                    in_block = false;
                    clean.push_str("  ");
                    i += 2;
                } else {
                    clean.push(' ');
                    i += 1;
                }
                continue;
            }
            if let Some(q) = quote {
                clean.push(c);
                if c == '\\' && next.is_some() {
                    clean.push(chars[i+1]);
                    i += 2;
                    continue;
                }
                if c == q {
                    quote = None;
                }
                i += 1;
                continue;
            }
            if c == '/' && next == Some('/') {
                for _ in i..chars.len() {
                    clean.push(' ');
                }
                break;
            }
            if c == '/' && next == Some('*') {
                in_block = true;
                clean.push_str("  ");
                i += 2;
                continue;
            }
            if c == '"' || c == '\'' {
                quote = Some(c);
            }
            clean.push(c);
            i += 1;
        }
        ans.push(clean);
    }
    ans
}

/// Scope opener found on some line
struct Opener {
    line: usize,
    /// braces before this column belong to something else
    col: usize,
    name: String,
    kind: ScopeKind,
    /// opens for the rest of the file without a brace
    rest_of_file: bool
}

/// name following a namespace directive
fn namespace_name(clean: &str, after: usize) -> String {
    let rest = char_slice(clean, after, usize::MAX);
    let rest = match rest.find('{') {
        Some(b) => rest[..b].to_string(),
        None => rest
    };
    match rest.split_whitespace().next() {
        Some(tok) => tok.trim_start_matches(GLOBAL_SIGIL).to_string(),
        None => String::new()
    }
}

fn detect_opener(clean: &str, row: usize, spans: &[SyntaxSpan]) -> Option<Opener> {
    for span in spans.iter().filter(|s| s.range.start_line == row) {
        let r = &span.range;
        let txt = char_slice(clean, r.start_col, r.end_col);
        match span.kind {
            SyntaxKind::Directive | SyntaxKind::PreprocessorDirective => {
                let directive = txt.trim().to_lowercase();
                let (kind,rest_of_file) = match directive.as_str() {
                    ".namespace" => (ScopeKind::Namespace,false),
                    ".filenamespace" => (ScopeKind::Namespace,true),
                    ".function" => (ScopeKind::Function,false),
                    ".macro" => (ScopeKind::Macro,false),
                    ".pseudocommand" => (ScopeKind::PseudoCommand,false),
                    _ => continue
                };
                let name = match kind {
                    ScopeKind::Namespace => namespace_name(clean, r.end_col),
                    _ => {
                        let decl = char_slice(clean, r.start_col, usize::MAX);
                        let split = split_declaration(&decl, kind == ScopeKind::PseudoCommand);
                        match split.get(1) {
                            Some(n) => n.trim_start_matches(GLOBAL_SIGIL).to_string(),
                            None => continue
                        }
                    }
                };
                return Some(Opener { line: row, col: r.end_col, name, kind, rest_of_file });
            },
            SyntaxKind::Label => {
                let name = txt.trim();
                let name = name.strip_suffix(':').unwrap_or(name);
                let rest = char_slice(clean, r.end_col, usize::MAX);
                let braced_here = rest.trim_start().starts_with('{');
                if braced_here || rest.trim().len() == 0 {
                    return Some(Opener {
                        line: row,
                        col: r.end_col,
                        name: name.trim_start_matches(GLOBAL_SIGIL).to_string(),
                        kind: ScopeKind::NamedLabel,
                        rest_of_file: false
                    });
                }
            },
            _ => {}
        }
    }
    None
}

/// One file that took part in the compile.
#[derive(Clone,Debug,PartialEq,Eq)]
pub struct SourceFile {
    pub index: usize,
    pub path: String,
    /// this is the file being edited
    pub is_main: bool,
    pub lines: Vec<Line>,
    /// ids of the scopes this file opened
    pub scope_ids: Vec<usize>
}

impl SourceFile {
    /// Build the model, `spans` should be the spans of this file in asminfo order.
    pub fn new(index: usize, path: &str, text: &str, is_main: bool, spans: &[SyntaxSpan], arena: &mut ScopeArena) -> Self {
        let raw = split_lines(text);
        let cleaned = clean_comments(&raw);
        let mut lines = Vec::new();
        let mut scope_ids = Vec::new();
        // (scope id, closed by a brace)
        let mut stack: Vec<(usize,bool)> = vec![(0,false)];
        let mut pending: Option<Opener> = None;
        for (row,(text,clean)) in raw.into_iter().zip(cleaned.into_iter()).enumerate() {
            // an opener may take its brace from the start of the next code line
            if let Some(p) = &pending {
                if p.line < row && clean.trim().len() > 0 && !clean.trim_start().starts_with('{') {
                    if let Some(p) = pending.take() {
                        if p.kind == ScopeKind::Namespace {
                            let parent = stack.last().map(|x| x.0).unwrap_or(0);
                            let id = arena.alloc(parent, p.line, index, &p.name, p.kind);
                            scope_ids.push(id);
                            stack.push((id,false));
                        }
                    }
                }
            }
            let scope = stack.last().map(|x| x.0).unwrap_or(0);
            if let Some(opener) = detect_opener(&clean, row, spans) {
                if opener.rest_of_file {
                    let id = arena.alloc(scope, opener.line, index, &opener.name, opener.kind);
                    scope_ids.push(id);
                    stack.push((id,false));
                } else {
                    pending = Some(opener);
                }
            }
            for (col,c) in clean.chars().enumerate() {
                match c {
                    '{' => {
                        let parent = stack.last().map(|x| x.0).unwrap_or(0);
                        let takes = match &pending {
                            Some(p) => p.line < row || col >= p.col,
                            None => false
                        };
                        if takes {
                            if let Some(p) = pending.take() {
                                let id = arena.alloc(parent, p.line, index, &p.name, p.kind);
                                trace!("scope {} `{}` opens at {}:{}",id,p.name,index,p.line);
                                scope_ids.push(id);
                                stack.push((id,true));
                            }
                        } else {
                            stack.push((parent,true));
                        }
                    },
                    '}' => {
                        // unbraced scopes opened inside the block close with it
                        if let Some(pos) = stack.iter().rposition(|x| x.1) {
                            stack.truncate(pos);
                        }
                    },
                    _ => {}
                }
            }
            lines.push(Line { scope, text, clean });
        }
        Self {
            index,
            path: path.to_string(),
            is_main,
            lines,
            scope_ids
        }
    }
    pub fn line(&self, row: usize) -> Option<&Line> {
        self.lines.get(row)
    }
    pub fn scope_at(&self, row: usize) -> usize {
        match self.lines.get(row) {
            Some(l) => l.scope,
            None => 0
        }
    }
    /// Scopes opened by this file
    pub fn scopes<'a>(&self, arena: &'a ScopeArena) -> Vec<&'a Scope> {
        self.scope_ids.iter().filter_map(|id| arena.get(*id)).collect()
    }
}
