//! One project per open document.
//!
//! The project keeps the latest text of the document, the model built by the most
//! recent compile, and at most one pending rebuild.  The model is replaced as a
//! whole, so queries never see a partial rebuild.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use lsp_types as lsp;
use log::{debug,info,warn};
use crate::{STDRESULT,DYNERR};
use crate::lang::pathbuf_from_uri;
use super::{FileRecord,Error};
use super::info::CompileInfo;
use super::source::{SourceFile,ScopeArena};
use super::symbols::SymbolTable;
use super::settings::Settings;
use super::assembler::{Assemble,AssemblerResults};

/// Everything derived from one compile
pub struct Model {
    pub info: CompileInfo,
    /// models of the non-system files, in asminfo order
    pub files: Vec<SourceFile>,
    pub arena: ScopeArena,
    pub table: SymbolTable,
    pub stdout: String,
    pub stderr: String,
    pub status: i32,
    pub version: Option<String>
}

/// Read a file that took part in the compile.
pub fn read_from_disk(path: &str) -> Option<String> {
    match std::fs::read_to_string(path) {
        Ok(s) => Some(s),
        Err(e) => {
            warn!("could not read {}: {}",path,e);
            None
        }
    }
}

impl Model {
    pub fn empty() -> Self {
        Self {
            info: CompileInfo::default(),
            files: Vec::new(),
            arena: ScopeArena::new(),
            table: SymbolTable::new(),
            stdout: String::new(),
            stderr: String::new(),
            status: 0,
            version: None
        }
    }
    /// Build the model, the current file takes `current_text`, other files are
    /// obtained from `loader`, which is given the path from the asminfo block.
    pub fn build(results: AssemblerResults, current_text: &str, peek_lines: usize, loader: &dyn Fn(&str) -> Option<String>) -> Self {
        let mut arena = ScopeArena::new();
        let mut files = Vec::new();
        for rec in &results.info.files {
            if rec.is_system {
                continue;
            }
            let text = match rec.is_current {
                true => current_text.to_string(),
                false => match loader(&rec.path) {
                    Some(t) => t,
                    None => continue
                }
            };
            let spans = results.info.spans_in_file(rec.index);
            files.push(SourceFile::new(rec.index, &rec.path, &text, rec.is_current, &spans, &mut arena));
        }
        let table = SymbolTable::build(&results.info, &files, &arena, peek_lines);
        let version = super::info::detect_version(&results.info, &results.stdout);
        Self {
            info: results.info,
            files,
            arena,
            table,
            stdout: results.stdout,
            stderr: results.stderr,
            status: results.status,
            version
        }
    }
    pub fn current_record(&self) -> Option<&FileRecord> {
        self.info.current_file()
    }
    pub fn current_source(&self) -> Option<&SourceFile> {
        let rec = self.current_record()?;
        self.source(rec.index)
    }
    pub fn source(&self, index: usize) -> Option<&SourceFile> {
        self.files.iter().find(|f| f.index == index)
    }
}

pub struct Project {
    uri: lsp::Url,
    path: PathBuf,
    source: String,
    version: Option<i32>,
    model: Option<Arc<Model>>,
    /// when the debounced rebuild should run
    pending: Option<Instant>,
    notice: Option<String>,
    notice_shown: bool
}

impl Project {
    pub fn new(uri: lsp::Url, text: &str, version: Option<i32>) -> Self {
        let path = match pathbuf_from_uri(&uri) {
            Ok(p) => p,
            Err(_) => PathBuf::from(uri.path())
        };
        Self {
            uri,
            path,
            source: text.to_string(),
            version,
            model: None,
            pending: None,
            notice: None,
            notice_shown: false
        }
    }
    pub fn uri(&self) -> &lsp::Url {
        &self.uri
    }
    pub fn version(&self) -> Option<i32> {
        self.version
    }
    pub fn source(&self) -> &str {
        &self.source
    }
    /// Replace the source text, the model is untouched until the next compile.
    pub fn set_source(&mut self, text: &str, version: Option<i32>) {
        self.source = text.to_string();
        self.version = version;
    }
    /// Most recently completed compile, if any
    pub fn model(&self) -> Option<&Model> {
        self.model.as_deref()
    }
    pub fn shared_model(&self) -> Option<Arc<Model>> {
        self.model.clone()
    }
    /// Install a model that was built elsewhere.
    pub fn set_model(&mut self, model: Model) {
        self.model = Some(Arc::new(model));
    }
    /// Compile the current source, reading the other files from disk.
    pub fn assemble(&mut self, settings: &Settings, assembler: &dyn Assemble) -> STDRESULT {
        self.assemble_with(settings, assembler, &read_from_disk)
    }
    /// Compile the current source, if the startup file does not include this document
    /// the compile is repeated with the document alone.
    pub fn assemble_with(&mut self, settings: &Settings, assembler: &dyn Assemble, loader: &dyn Fn(&str) -> Option<String>) -> STDRESULT {
        if !settings.valid {
            return Err(Box::new(Error::ConfigurationInvalid));
        }
        let mut results = assembler.assemble(settings, &self.path, &self.source, true)?;
        if settings.startup.len() > 0 && !results.info.has_current {
            if !self.notice_shown {
                self.notice = Some(format!("The open file is not part of the startup [{}]",settings.startup));
                self.notice_shown = true;
            }
            debug!("{} not in startup, assembling alone",self.path.display());
            results = assembler.assemble(settings, &self.path, &self.source, false)?;
        }
        let model = Model::build(results, &self.source, settings.peek_lines(), loader);
        info!("{}: {} symbols, {} errors",self.uri,model.table.symbols.len(),model.info.errors.len());
        self.model = Some(Arc::new(model));
        Ok(())
    }
    /// Schedule the debounced rebuild, replacing any that is pending.
    pub fn schedule(&mut self, at: Instant) {
        self.pending = Some(at);
    }
    pub fn cancel(&mut self) {
        self.pending = None;
    }
    pub fn deadline(&self) -> Option<Instant> {
        self.pending
    }
    pub fn is_due(&self, now: Instant) -> bool {
        match self.pending {
            Some(t) => t <= now,
            None => false
        }
    }
    /// One-time message for the client, cleared once taken.
    pub fn take_notice(&mut self) -> Option<String> {
        self.notice.take()
    }
}

/// Build a model from captured output, which is either the asminfo block itself
/// or assembler stdout containing the delimited block.
pub fn model_from_capture(capture: &str, current_path: &str, current_text: &str, peek_lines: usize, loader: &dyn Fn(&str) -> Option<String>) -> Result<Model,DYNERR> {
    let block = super::info::extract_block(capture).unwrap_or(capture);
    let info = CompileInfo::parse(block, &[current_path.to_string()]);
    if info.files.len() == 0 {
        return Err(Box::new(Error::MissingInfo));
    }
    let status = match info.errors.len() {
        0 => 0,
        _ => 1
    };
    let results = AssemblerResults {
        info,
        stdout: capture.to_string(),
        stderr: String::new(),
        status
    };
    Ok(Model::build(results, current_text, peek_lines, loader))
}
