//! Provide our response to incoming requests

use lsp_types as lsp;
use lsp::request::Request;
use lsp_server::{Connection,RequestId,Response};
use serde_json;
use std::collections::HashMap;
use std::sync::Arc;
use kickass_lsp::lang::server::Checkpoint;
use kickass_lsp::lang::server::rpc_error::{PARSE_ERROR,INVALID_PARAMS};
use kickass_lsp::lang::{kick, normalize_client_uri, normalize_client_uri_str};
use super::logger;

pub const MEMORY_MAP: &str = "kickassembler.memoryMap";

fn def_response(req_id: RequestId, meth: &str) -> lsp_server::Response {
    let mess = req_id.to_string();
    lsp_server::Response::new_err(req_id,PARSE_ERROR,format!("request {} ({}) not understood",mess,meth))
}

/// The hover provider works on one model at a time, install the one for this request.
fn prepare_hover(req: &lsp_server::Request, tools: &mut super::Tools) {
    if let Ok(params) = serde_json::from_value::<lsp::HoverParams>(req.params.clone()) {
        let normalized_uri = normalize_client_uri(params.text_document_position_params.text_document.uri);
        let model = tools.registry.get(&normalized_uri).and_then(|p| p.shared_model());
        tools.hover_provider.use_shared_model(model);
    }
}

/// returns true if there was a shutdown request
pub fn handle_request(
    connection: &Connection,
    req: lsp_server::Request,
    tools: &mut super::Tools) -> bool {

    let mut resp = def_response(req.id.clone(),&req.method);
    if req.method == lsp::request::HoverRequest::METHOD {
        prepare_hover(&req, tools);
    }
    let mut chkpts = HashMap::new();
    for (k,v) in tools.registry.projects() {
        chkpts.insert(k.to_string(),Arc::new(v));
    }

    match req.method.as_str() {
        lsp::request::GotoDefinition::METHOD => Checkpoint::goto_def_response(chkpts, req.clone(), &mut resp),
        lsp::request::DocumentSymbolRequest::METHOD => Checkpoint::symbol_response(chkpts, req.clone(), &mut resp),
        lsp::request::References::METHOD => Checkpoint::goto_ref_response(chkpts, req.clone(), &mut resp),
        lsp::request::HoverRequest::METHOD => Checkpoint::hover_response(chkpts, &mut tools.hover_provider, req.clone(), &mut resp),

        lsp::request::Shutdown::METHOD => {
            logger(&connection,"shutdown request");
            resp = lsp_server::Response::new_ok(req.id.clone(), ());
            if let Err(_) = connection.sender.send(resp.into()) {
                logger(&connection,"failed to respond to shutdown request");
            }
            // wait for the exit notification
            let _ = connection.receiver.recv_timeout(std::time::Duration::from_secs(30));
            return true;
        },

        lsp::request::ExecuteCommand::METHOD => {
            if let Ok(params) = serde_json::from_value::<lsp::ExecuteCommandParams>(req.params) {
                match params.command.as_str() {
                    MEMORY_MAP => {
                        resp = match params.arguments.first().and_then(|v| v.as_str()) {
                            Some(uri_str) => match normalize_client_uri_str(uri_str) {
                                Ok(uri) => {
                                    let segments = match tools.registry.get(&uri).and_then(|p| p.model()) {
                                        Some(model) => kick::memory_map::parse(&model.stdout),
                                        None => Vec::new()
                                    };
                                    Response::new_ok(req.id,segments)
                                },
                                Err(_) => Response::new_err(req.id,INVALID_PARAMS,"bad URI".to_string())
                            },
                            None => Response::new_err(req.id,INVALID_PARAMS,"memory map requires a document URI".to_string())
                        };
                    },
                    _ => {
                        logger(&connection,&format!("unhandled command {}",params.command));
                    }
                }
            }
        },

        _ => {
            logger(&connection,&format!("unhandled request: {}",req.method))
        }
    }

    if let Err(_) = connection.sender.send(lsp_server::Message::Response(resp)) {
        logger(&connection,&format!("could not send response to {}",req.method));
    }
    false
}
