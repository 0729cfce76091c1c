//! # Generics and traits for the language server
//!
//! These traits are used to aid in the handling of requests
//! that are typically sent by a language client.  The server binary keeps
//! one checkpoint per open document; the default `*_response` functions
//! turn a request into a response using whatever the checkpoint provides.

use std::io::Write;
use std::str::FromStr;
use lsp_types as lsp;
use std::collections::HashMap;
use std::sync::Arc;

// JSON-RPC error codes, -32768 through -32000 are reserved
pub mod rpc_error {
    pub const PARSE_ERROR: i32 = -32700;
    pub const INVALID_PARAMS: i32 = -32602;
}

/// Build an object around this trait to generate hovers.  Then when the client requests
/// hovers, feed that object into Checkpoint::hover_response.
pub trait Hovers {
    fn get(&mut self, line: String, row: isize, col: isize) -> Option<lsp::Hover>;
}

/// This trait is used to provide data from the most recent compile to the LSP client.
/// The implementation is stored in a map keyed by the document's URI string.
/// The default `*_response` functions are intended to mutate a default response within a match.
/// Every query degrades to an empty result, nothing found is not an error.
pub trait Checkpoint {
    /// Get a copy of the document as last seen.
    fn get_doc(&self) -> super::Document;
    /// Get a row from the document as of the most recent compile.
    fn get_line(&self,row: usize) -> Option<String>;
    fn get_symbols(&self) -> Vec<lsp::DocumentSymbol>;
    fn get_defs(&self,loc: &lsp::Location) -> Vec<lsp::Location>;
    fn get_refs(&self,loc: &lsp::Location) -> Vec<lsp::Location>;
    fn get_diags(&self) -> Vec<lsp::Diagnostic>;
    fn symbol_response(chkpts: HashMap<String,Arc<&Self>>, req: lsp_server::Request, resp: &mut lsp_server::Response) {
        if let Ok(params) = serde_json::from_value::<lsp::DocumentSymbolParams>(req.params) {
            let uri = super::normalize_client_uri(params.text_document.uri);
            if let Some(chkpt) = chkpts.get(&uri.to_string()) {
                *resp = match serde_json::to_value::<Vec<lsp::DocumentSymbol>>(chkpt.get_symbols()) {
                    Ok(result) => lsp_server::Response::new_ok(req.id,Some(result)),
                    Err(_) => lsp_server::Response::new_err(req.id,rpc_error::PARSE_ERROR,"symbol request failed while parsing".to_string())
                };
            }
        }
    }
    fn goto_def_response(chkpts: HashMap<String,Arc<&Self>>, req: lsp_server::Request, resp: &mut lsp_server::Response) {
        if let Ok(params) = serde_json::from_value::<lsp::GotoDefinitionParams>(req.params) {
            let uri = super::normalize_client_uri(params.text_document_position_params.text_document.uri);
            let pos = params.text_document_position_params.position;
            let loc = lsp::Location::new(uri.clone(),lsp::Range::new(pos,pos));
            if let Some(chkpt) = chkpts.get(&uri.to_string()) {
                *resp = match serde_json::to_value::<Vec<lsp::Location>>(chkpt.get_defs(&loc)) {
                    Ok(result) => lsp_server::Response::new_ok(req.id,Some(result)),
                    Err(_) => lsp_server::Response::new_err(req.id,rpc_error::PARSE_ERROR,"goto defs failed while parsing".to_string())
                };
            }
        }
    }
    fn goto_ref_response(chkpts: HashMap<String,Arc<&Self>>, req: lsp_server::Request, resp: &mut lsp_server::Response) {
        if let Ok(params) = serde_json::from_value::<lsp::ReferenceParams>(req.params) {
            let uri = super::normalize_client_uri(params.text_document_position.text_document.uri);
            let pos = params.text_document_position.position;
            let loc = lsp::Location::new(uri.clone(),lsp::Range::new(pos,pos));
            if let Some(chkpt) = chkpts.get(&uri.to_string()) {
                *resp = match serde_json::to_value::<Vec<lsp::Location>>(chkpt.get_refs(&loc)) {
                    Ok(result) => lsp_server::Response::new_ok(req.id,Some(result)),
                    Err(_) => lsp_server::Response::new_err(req.id,rpc_error::PARSE_ERROR,"goto refs failed while parsing".to_string())
                };
            }
        }
    }
    fn hover_response<HOV: Hovers>(chkpts: HashMap<String,Arc<&Self>>, hov: &mut HOV, req: lsp_server::Request, resp: &mut lsp_server::Response) {
        if let Ok(params) = serde_json::from_value::<lsp::HoverParams>(req.params) {
            let uri = super::normalize_client_uri(params.text_document_position_params.text_document.uri);
            let pos = params.text_document_position_params.position;
            if let Some(chkpt) = chkpts.get(&uri.to_string()) {
                if let Some(line) = chkpt.get_line(pos.line as usize) {
                    *resp = match hov.get(line,pos.line as isize, pos.character as isize) {
                        Some(hover) => match serde_json::to_value::<lsp::Hover>(hover) {
                            Ok(result) => lsp_server::Response::new_ok(req.id,result),
                            Err(_) => lsp_server::Response::new_err(req.id,rpc_error::PARSE_ERROR,"hover request failed while parsing".to_string())
                        },
                        None => lsp_server::Response::new_ok(req.id,serde_json::Value::Null)
                    };
                }
            }
        }
    }
}

pub fn basic_diag(range: lsp::Range,mess: &str,severity: lsp::DiagnosticSeverity) -> lsp::Diagnostic {
    lsp::Diagnostic {
        range,
        severity: Some(severity),
        code: None,
        code_description: None,
        source: None,
        message: mess.to_string(),
        related_information: None,
        tags: None,
        data: None
    }
}

fn setup_env_logger(filt: log::LevelFilter, path: &str) {
    if filt==log::LevelFilter::Off {
        return;
    }
    let logging_file = match std::fs::File::create(path) {
        Ok(f) => Box::new(f),
        Err(e) => {
            eprintln!("failed to create log file {}: {}",path,e);
            return;
        }
    };
    env_logger::Builder::new().format(|buf,record| {
        writeln!(buf,"{}:{} [{}] - {}",record.file().unwrap_or("unknown"),
            record.line().unwrap_or(0),
            record.level(),
            record.args()
        )
    })
    .filter(Some("kickass_lsp"),filt)
    .target(env_logger::Target::Pipe(logging_file))
    .init();
}

/// Parse the language server's command line arguments and set up logging.
/// An invalid log level leaves logging off.
pub fn parse_args() {
    let mut log_level = log::LevelFilter::Off;
    let mut log_file = "kickass_log.txt".to_string();
    let mut args = std::env::args().into_iter();
    args.next();
    while let Some(val) = args.next() {
        if &val == "--log-level" {
            if let Some(val) = args.next() {
                match log::LevelFilter::from_str(&val) {
                    Ok(filt) => log_level = filt,
                    Err(_) => eprintln!("invalid logging filter {}",val)
                }
            }
        } else if &val == "--log-file" {
            if let Some(val) = args.next() {
                log_file = val;
            }
        }
    }
    setup_env_logger(log_level, &log_file);
}
