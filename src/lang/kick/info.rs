//! Parse the asminfo block written by Kick Assembler.
//!
//! The block is a sequence of sections such as `[files]` or `[syntax]`, each
//! consisting of `;` delimited records.  Ranges are given as
//! `startLine,startCol,endLine,endCol,fileIndex`, 1-based and inclusive, and are
//! converted to 0-based with an exclusive end column as they are read.
//! Nothing here fails, a record that cannot be understood is skipped, and a block
//! that cannot be found produces an empty `CompileInfo`.

use std::path::Path;
use log::{trace,debug};
use serde::Serialize;
use super::{SourceRange,SyntaxKind,SyntaxSpan,FileRecord,CompileError};

pub const BLOCK_START: &str = "### ASMINFO START ###";
pub const BLOCK_END: &str = "### ASMINFO END ###";
const SYSTEM_MARKER: &str = ".jar:";

#[derive(Clone,Copy,Debug,PartialEq,Eq,Serialize)]
#[serde(rename_all = "camelCase")]
pub enum LibraryKind {
    Constant,
    Function
}

/// Symbol supplied by a library, such as `Math.PI` or `abs`.
#[derive(Clone,Debug,PartialEq,Eq,Serialize)]
pub struct LibraryEntry {
    pub library: String,
    pub kind: LibraryKind,
    pub name: String,
    pub args: usize
}

/// Entry of the assembler's own `[directives]` or `[preprocessorDirectives]` list
#[derive(Clone,Debug,PartialEq,Eq,Serialize)]
pub struct HandbookEntry {
    pub name: String,
    pub example: String,
    pub description: String
}

#[derive(Clone,Debug,Default,PartialEq,Eq,Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompileInfo {
    pub files: Vec<FileRecord>,
    pub spans: Vec<SyntaxSpan>,
    pub errors: Vec<CompileError>,
    pub libraries: Vec<LibraryEntry>,
    pub directives: Vec<HandbookEntry>,
    pub preprocessors: Vec<HandbookEntry>,
    pub version: Option<String>,
    /// some file in the list is the one being edited
    pub has_current: bool
}

enum Section {
    None,
    Libraries,
    Directives,
    Preprocessors,
    Files,
    Syntax,
    Errors,
    Version,
    Unknown
}

/// Find the block between the delimiters in the assembler's stdout.
pub fn extract_block(stdout: &str) -> Option<&str> {
    let beg = stdout.find(BLOCK_START)? + BLOCK_START.len();
    match stdout[beg..].find(BLOCK_END) {
        Some(len) => Some(&stdout[beg..beg+len]),
        None => Some(&stdout[beg..])
    }
}

/// Take the version from the `[version]` record, otherwise look for `major.minor` in stdout.
pub fn detect_version(info: &CompileInfo, stdout: &str) -> Option<String> {
    if let Some(v) = &info.version {
        if v.len() > 0 {
            return Some(v.to_string());
        }
    }
    let re = regex::Regex::new(r"\d+\.\d+").ok()?;
    re.find(stdout).map(|m| m.as_str().to_string())
}

/// Two paths name the same file, ignoring separators and symbolic links where possible.
pub fn same_path(a: &str, b: &str) -> bool {
    if a == b || Path::new(a) == Path::new(b) {
        return true;
    }
    match (Path::new(a).canonicalize(), Path::new(b).canonicalize()) {
        (Ok(ca),Ok(cb)) => ca == cb,
        _ => false
    }
}

/// `startLine,startCol,endLine,endCol,fileIndex`
fn parse_range(field: &str) -> Option<SourceRange> {
    let mut vals: Vec<usize> = Vec::new();
    for v in field.split(',') {
        vals.push(v.trim().parse::<usize>().ok()?);
    }
    if vals.len() != 5 {
        return None;
    }
    Some(SourceRange::new(
        vals[4],
        vals[0].saturating_sub(1),
        vals[1].saturating_sub(1),
        vals[2].saturating_sub(1),
        vals[3]
    ))
}

fn parse_handbook_entry(line: &str) -> Option<HandbookEntry> {
    let fields: Vec<&str> = line.splitn(3,';').collect();
    if fields.len() < 2 || fields[0].len() == 0 {
        return None;
    }
    Some(HandbookEntry {
        name: fields[0].to_string(),
        example: fields[1].to_string(),
        description: match fields.len() {
            3 => fields[2].to_string(),
            _ => String::new()
        }
    })
}

impl CompileInfo {
    /// Parse the text of a block, `current_paths` are the paths under which the
    /// edited document may appear in the `[files]` section.
    pub fn parse(block: &str, current_paths: &[String]) -> Self {
        let mut ans = Self::default();
        let mut section = Section::None;
        for raw in block.lines() {
            let line = raw.trim_end_matches('\r');
            let trimmed = line.trim();
            if trimmed.len() == 0 {
                continue;
            }
            if trimmed.starts_with('[') && trimmed.ends_with(']') {
                section = match &trimmed[1..trimmed.len()-1] {
                    "libraries" => Section::Libraries,
                    "directives" => Section::Directives,
                    "preprocessorDirectives" => Section::Preprocessors,
                    "files" => Section::Files,
                    "syntax" => Section::Syntax,
                    "errors" => Section::Errors,
                    "version" => Section::Version,
                    s => {
                        trace!("skipping asminfo section {}",s);
                        Section::Unknown
                    }
                };
                continue;
            }
            match section {
                Section::Libraries => ans.add_library(trimmed),
                Section::Directives => {
                    if let Some(entry) = parse_handbook_entry(trimmed) {
                        ans.directives.push(entry);
                    }
                },
                Section::Preprocessors => {
                    if let Some(entry) = parse_handbook_entry(trimmed) {
                        ans.preprocessors.push(entry);
                    }
                },
                Section::Files => ans.add_file(trimmed, current_paths),
                Section::Syntax => ans.add_span(trimmed),
                Section::Errors => ans.add_error(trimmed),
                Section::Version => {
                    if ans.version.is_none() {
                        ans.version = Some(trimmed.to_string());
                    }
                },
                Section::None | Section::Unknown => {}
            }
        }
        ans.has_current = ans.files.iter().any(|f| f.is_current);
        debug!("asminfo: {} files, {} spans, {} errors",ans.files.len(),ans.spans.len(),ans.errors.len());
        ans
    }
    /// Use the delimited block in stdout if there is one, otherwise read the fallback file.
    /// Either one missing gives the empty result.
    pub fn from_output(stdout: &str, fallback: &Path, current_paths: &[String]) -> Self {
        if let Some(block) = extract_block(stdout) {
            return Self::parse(block, current_paths);
        }
        match std::fs::read_to_string(fallback) {
            Ok(block) => Self::parse(&block, current_paths),
            Err(_) => {
                debug!("no asminfo in stdout or in {}",fallback.display());
                Self::default()
            }
        }
    }
    fn add_library(&mut self, line: &str) {
        let fields: Vec<&str> = line.split(';').collect();
        if fields.len() < 3 {
            trace!("bad library record {}",line);
            return;
        }
        let kind = match fields[1] {
            "constant" => LibraryKind::Constant,
            "function" => LibraryKind::Function,
            _ => return
        };
        let args = match fields.get(3) {
            Some(n) => n.trim().parse::<usize>().unwrap_or(0),
            None => 0
        };
        self.libraries.push(LibraryEntry {
            library: fields[0].to_string(),
            kind,
            name: fields[2].to_string(),
            args
        });
    }
    fn add_file(&mut self, line: &str, current_paths: &[String]) {
        let (idx,path) = match line.split_once(';') {
            Some(x) => x,
            None => {
                trace!("bad file record {}",line);
                return;
            }
        };
        let index = match idx.trim().parse::<usize>() {
            Ok(i) => i,
            Err(_) => return
        };
        let is_system = path.contains(SYSTEM_MARKER);
        let is_current = !is_system && current_paths.iter().any(|p| same_path(p,path));
        self.files.push(FileRecord {
            index,
            path: path.to_string(),
            is_current,
            is_system
        });
    }
    fn add_span(&mut self, line: &str) {
        let (tag,rng) = match line.split_once(';') {
            Some(x) => x,
            None => return
        };
        let kind = match SyntaxKind::from_asminfo(tag) {
            Some(k) => k,
            None => {
                trace!("ignoring syntax kind {}",tag);
                return;
            }
        };
        if let Some(range) = parse_range(rng) {
            self.spans.push(SyntaxSpan { kind, range });
        }
    }
    fn add_error(&mut self, line: &str) {
        let fields: Vec<&str> = line.splitn(3,';').collect();
        if fields.len() < 3 {
            trace!("bad error record {}",line);
            return;
        }
        if let Some(range) = parse_range(fields[1]) {
            self.errors.push(CompileError {
                level: fields[0].to_string(),
                range,
                message: fields[2].to_string()
            });
        }
    }
    pub fn file(&self, index: usize) -> Option<&FileRecord> {
        self.files.iter().find(|f| f.index == index)
    }
    pub fn current_file(&self) -> Option<&FileRecord> {
        self.files.iter().find(|f| f.is_current)
    }
    pub fn spans_in_file(&self, index: usize) -> Vec<SyntaxSpan> {
        self.spans.iter().filter(|s| s.range.file == index).cloned().collect()
    }
    pub fn errors_in_file(&self, index: usize) -> Vec<CompileError> {
        self.errors.iter().filter(|e| e.range.file == index).cloned().collect()
    }
}
