//! Handle incoming notifications

use lsp_types as lsp;
use lsp::{notification::Notification, NumberOrString};
use lsp_server;
use serde_json;
use std::time::Instant;
use kickass_lsp::lang::normalize_client_uri;

use super::{logger,report_events,push_diagnostics};

pub fn handle_notification(
    connection: &lsp_server::Connection,
    note: lsp_server::Notification,
    tools: &mut super::Tools) {

    match note.method.as_str() {
        lsp::notification::DidChangeConfiguration::METHOD => {
            match super::request_configuration(&connection) {
                Ok(()) => {},
                Err(_) => logger(&connection,"request for configuration failed")
            }
        },
        lsp::notification::DidOpenTextDocument::METHOD => {
            if let Ok(params) = serde_json::from_value::<lsp::DidOpenTextDocumentParams>(note.params) {
                let normalized_uri = normalize_client_uri(params.text_document.uri);
                let events = tools.registry.open(normalized_uri, &params.text_document.text, Some(params.text_document.version));
                report_events(connection, tools, events);
            }
        },
        lsp::notification::DidCloseTextDocument::METHOD => {
            if let Ok(params) = serde_json::from_value::<lsp::DidCloseTextDocumentParams>(note.params) {
                let normalized_uri = normalize_client_uri(params.text_document.uri);
                tools.registry.close(&normalized_uri);
                push_diagnostics(connection, normalized_uri, None, Vec::new());
            }
        },
        lsp::notification::DidChangeTextDocument::METHOD => {
            if let Ok(params) = serde_json::from_value::<lsp::DidChangeTextDocumentParams>(note.params) {
                let normalized_uri = normalize_client_uri(params.text_document.uri);
                // we asked for full documents so expect just one iteration
                for change in params.content_changes {
                    tools.registry.change(&normalized_uri, &change.text, Some(params.text_document.version), Instant::now());
                }
            }
        },
        lsp::notification::DidSaveTextDocument::METHOD => {
            if let Ok(params) = serde_json::from_value::<lsp::DidSaveTextDocumentParams>(note.params) {
                let normalized_uri = normalize_client_uri(params.text_document.uri);
                let events = tools.registry.save(&normalized_uri, params.text.as_deref());
                report_events(connection, tools, events);
            }
        },
        lsp::notification::Cancel::METHOD => {
            if let Ok(params) = serde_json::from_value::<lsp::CancelParams>(note.params) {
                let id = match params.id {
                    NumberOrString::Number(id) => lsp_server::RequestId::from(id),
                    NumberOrString::String(s) => lsp_server::RequestId::from(s)
                };
                logger(&connection,&format!("request {} was canceled",id.to_string()));
            }
        },
        lsp::notification::SetTrace::METHOD => {
            if let Ok(_params) = serde_json::from_value::<lsp::SetTraceParams>(note.params) {
                logger(&connection,"ignoring the SetTrace notification");
            }
        },
        which_method => {
            logger(&connection,&format!("unhandled notification {}",which_method))
        }
    }
}
