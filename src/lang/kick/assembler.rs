//! The external assembler.
//!
//! Kick Assembler is run synchronously with `-asminfo` so that it reports spans,
//! files and errors instead of producing a program.  The current text of the
//! document is written to a temporary file next to the real one, so that relative
//! imports resolve the same way.  Everything downstream only sees `AssemblerResults`,
//! which lets tests substitute a captured asminfo block for the real tool.

use std::io::Write;
use std::path::{Path,PathBuf};
use std::process::Command;
use log::{debug,info};
use crate::DYNERR;
use super::info::CompileInfo;
use super::settings::Settings;

pub struct AssemblerResults {
    pub info: CompileInfo,
    pub stdout: String,
    pub stderr: String,
    /// process exit status, nonzero if assembly failed
    pub status: i32
}

/// Anything that can turn a document into an asminfo analysis.
pub trait Assemble {
    /// Run the assembler on `text`, which is the current content of the document at `path`.
    /// If `use_startup` is set and the settings name a startup file, assemble that instead.
    fn assemble(&self, settings: &Settings, path: &Path, text: &str, use_startup: bool) -> Result<AssemblerResults,DYNERR>;
}

pub struct KickAssembler {
}

#[cfg(windows)]
const CP_SEPARATOR: &str = ";";
#[cfg(not(windows))]
const CP_SEPARATOR: &str = ":";

/// Library paths that exist, relative paths are tried against both the
/// working directory and the source directory.
fn library_dirs(settings: &Settings, source_dir: &Path) -> Vec<PathBuf> {
    let mut ans = Vec::new();
    let root = std::env::current_dir().unwrap_or(PathBuf::from("."));
    for lib in &settings.assembler_library_paths {
        let p = Path::new(lib);
        if p.is_absolute() {
            if p.exists() {
                ans.push(p.to_path_buf());
            }
            continue;
        }
        for candidate in [source_dir.join(p),root.join(p)] {
            if candidate.exists() && !ans.contains(&candidate) {
                ans.push(candidate);
            }
        }
    }
    ans
}

impl KickAssembler {
    pub fn new() -> Self {
        Self {}
    }
    /// Arguments passed to the java runtime.
    pub fn command_args(settings: &Settings, src: &Path, info_file: &Path, source_dir: &Path) -> Vec<String> {
        let mut cp = settings.java_plugins.clone();
        cp.push(settings.assembler_jar.clone());
        let mut args = vec!["-cp".to_string(),cp.join(CP_SEPARATOR)];
        for prop in &settings.java_plugin_system_properties {
            args.push(format!("-D{}",prop));
        }
        args.push(settings.assembler_main_class.clone());
        args.push(src.to_string_lossy().to_string());
        for a in ["-noeval","-warningsoff","-showmem"] {
            args.push(a.to_string());
        }
        for a in &settings.assembler_args {
            args.push(a.to_string());
        }
        args.push("-asminfo".to_string());
        args.push("allSourceSpecific|libraries|version".to_string());
        args.push("-asminfofile".to_string());
        args.push(info_file.to_string_lossy().to_string());
        args.push("-asminfoToStdOut".to_string());
        if settings.opcodes.dtv {
            args.push("-dtv".to_string());
        }
        if !settings.opcodes.illegal {
            args.push("-excludeillegal".to_string());
        }
        for lib in library_dirs(settings, source_dir) {
            args.push("-libdir".to_string());
            args.push(lib.to_string_lossy().to_string());
        }
        args
    }
}

impl Assemble for KickAssembler {
    fn assemble(&self, settings: &Settings, path: &Path, text: &str, use_startup: bool) -> Result<AssemblerResults,DYNERR> {
        if !settings.valid {
            return Err(Box::new(super::Error::ConfigurationInvalid));
        }
        let source_dir = match path.parent() {
            Some(p) if p.as_os_str().len() > 0 => p.to_path_buf(),
            _ => PathBuf::from(".")
        };
        let mut tmp_source = tempfile::Builder::new().prefix(".source").suffix(".asm").tempfile_in(&source_dir)?;
        tmp_source.write_all(text.as_bytes())?;
        tmp_source.flush()?;
        let tmp_info = tempfile::Builder::new().prefix(".asminfo").suffix(".txt").tempfile_in(&source_dir)?;
        let src = match (use_startup, settings.startup.len() > 0) {
            (true,true) => {
                let p = Path::new(&settings.startup);
                match p.is_absolute() {
                    true => p.to_path_buf(),
                    false => std::env::current_dir()?.join(p)
                }
            },
            _ => tmp_source.path().to_path_buf()
        };
        let args = Self::command_args(settings, &src, tmp_info.path(), &source_dir);
        debug!("{} {}",settings.java_runtime,args.join(" "));
        let output = match Command::new(&settings.java_runtime).args(&args).current_dir(&source_dir).output() {
            Ok(o) => o,
            Err(e) => return Err(Box::new(super::Error::AssemblerLaunch(e.to_string())))
        };
        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();
        let current_paths = vec![
            path.to_string_lossy().to_string(),
            tmp_source.path().to_string_lossy().to_string()
        ];
        let info = CompileInfo::from_output(&stdout, tmp_info.path(), &current_paths);
        let status = output.status.code().unwrap_or(-1);
        info!("assembled {} with status {}",path.display(),status);
        Ok(AssemblerResults {
            info,
            stdout,
            stderr,
            status
        })
    }
}
