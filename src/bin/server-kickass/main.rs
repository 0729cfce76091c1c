//! This is the Kick Assembler language server.
//! Cargo will compile this to a standalone executable.
//!
//! The kickass_lsp library crate provides the analysis.
//! Compiles run synchronously on this thread, the debounced ones are
//! driven by the receive timeout of the main loop.

use lsp_types as lsp;
use lsp::{notification::Notification, request::Request};
use lsp_server;
use serde_json;
use std::error::Error;
use std::time::Instant;
use kickass_lsp::lang::server::{Checkpoint,parse_args};
use kickass_lsp::lang::kick;
use kickass_lsp::lang::kick::registry::{Event,ProjectRegistry};

mod notification;
mod request;
mod response;

#[derive(thiserror::Error,Debug)]
enum ServerError {
    #[error("Parsing")]
    Parsing
}

/// Send log messages to the client.
fn logger(connection: &lsp_server::Connection, message: &str) {
    let note = lsp_server::Notification::new(
        lsp::notification::LogMessage::METHOD.to_string(),
        lsp::LogMessageParams {
            typ: lsp::MessageType::LOG,
            message: message.to_string()
        }
    );
    match connection.sender.send(lsp_server::Message::Notification(note)) {
        Err(_) => {}, // nowhere to send log
        Ok(()) => {}
    }
}

/// Pop up a message in the client.
fn show_message(connection: &lsp_server::Connection, typ: lsp::MessageType, message: &str) {
    let note = lsp_server::Notification::new(
        lsp::notification::ShowMessage::METHOD.to_string(),
        lsp::ShowMessageParams {
            typ,
            message: message.to_string()
        }
    );
    match connection.sender.send(lsp_server::Message::Notification(note)) {
        Err(_) => logger(connection,"could not show message"),
        Ok(()) => {}
    }
}

/// request the root configuration item
fn request_configuration(connection: &lsp_server::Connection) -> Result<(),Box<dyn Error>> {
    let req = lsp_server::Request::new(
        lsp_server::RequestId::from("kickassembler-pull-config".to_string()),
        lsp::request::WorkspaceConfiguration::METHOD.to_string(),
        lsp::ConfigurationParams { items: vec![
            lsp::ConfigurationItem {
                scope_uri: None,
                section: Some("kickassembler".to_string())
            }
        ]}
    );
    match connection.sender.send(req.into()) {
        Ok(()) => Ok(()),
        Err(e) => Err(Box::new(e))
    }
}

/// parse the response to the configuration request
fn parse_configuration(resp: lsp_server::Response) -> Result<kick::settings::Settings,Box<dyn Error>> {
    if let Some(result) = resp.result {
        if let Some(ary) = result.as_array() {
            // only 1 item was requested
            for item in ary {
                let json_config = item.to_string();
                match kick::settings::parse(&json_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => return Err(e)
                }
            }
        }
    }
    Err(Box::new(ServerError::Parsing))
}

/// Diagnostics are never requested by the client.
/// This server pushes them up after each compile.
pub fn push_diagnostics(connection: &lsp_server::Connection,uri: lsp::Url, version: Option<i32>, diagnostics: Vec<lsp::Diagnostic>) {
    let note = lsp_server::Notification::new(
        "textDocument/publishDiagnostics".to_string(),
        lsp::PublishDiagnosticsParams {
            uri,
            diagnostics,
            version
        }
    );
    match connection.sender.send(lsp_server::Message::Notification(note)) {
        Err(_) => logger(connection,"could not push diagnostics"),
        Ok(()) => {}
    }
}

/// Tell the client about whatever the registry did.
fn report_events(connection: &lsp_server::Connection, tools: &Tools, events: Vec<Event>) {
    for event in events {
        match event {
            Event::Compiled(uri) => {
                if let Some(proj) = tools.registry.get(&uri) {
                    if let Some(model) = proj.model() {
                        if let Some(ver) = &model.version {
                            logger(connection,&format!("Kick Assembler {}, status {}",ver,model.status));
                        }
                    }
                    let doc = proj.get_doc();
                    push_diagnostics(connection, doc.uri, doc.version, proj.get_diags());
                }
            },
            Event::Failed(uri,mess) => {
                logger(connection,&format!("could not assemble {}: {}",uri,mess));
            },
            Event::Notice(mess) => show_message(connection, lsp::MessageType::INFO, &mess),
            Event::ConfigurationInvalid => show_message(connection, lsp::MessageType::ERROR,
                "Kick Assembler is not configured, check the settings for the assembler jar and java runtime")
        }
    }
}

struct Tools {
    registry: ProjectRegistry,
    hover_provider: kick::hovers::HoverProvider
}

impl Tools {
    pub fn new() -> Self {
        Self {
            registry: ProjectRegistry::new(Box::new(kick::assembler::KickAssembler::new())),
            hover_provider: kick::hovers::HoverProvider::new()
        }
    }
}

fn main() -> Result<(), Box<dyn Error + Sync + Send>> {

    parse_args();

    let mut tools = Tools::new();
    let (connection, io_threads) = lsp_server::Connection::stdio();

    logger(&connection,"start initializing connection");
    let (id,params) = connection.initialize_start()?;
    let params: lsp::InitializeParams = serde_json::from_value(params)?;

    let result = lsp::InitializeResult {
        capabilities: lsp::ServerCapabilities {
            text_document_sync: Some(lsp::TextDocumentSyncCapability::Options(
                lsp::TextDocumentSyncOptions {
                    open_close: Some(true),
                    change: Some(lsp::TextDocumentSyncKind::FULL),
                    will_save: None,
                    will_save_wait_until: None,
                    save: Some(lsp::TextDocumentSyncSaveOptions::SaveOptions(lsp::SaveOptions {
                        include_text: Some(true)
                    }))
                }
            )),
            definition_provider: Some(lsp::OneOf::Left(true)),
            references_provider: Some(lsp::OneOf::Left(true)),
            hover_provider: Some(lsp::HoverProviderCapability::Simple(true)),
            document_symbol_provider: Some(lsp::OneOf::Left(true)),
            execute_command_provider: Some(lsp::ExecuteCommandOptions {
                commands: vec![request::MEMORY_MAP.to_string()],
                work_done_progress_options: lsp::WorkDoneProgressOptions::default()
            }),
            ..lsp::ServerCapabilities::default()
        },
        server_info: Some(lsp::ServerInfo {
            name: "kickassembler".to_string(),
            version: Some(env!("CARGO_PKG_VERSION").to_string())
        })
    };
    connection.initialize_finish(id, serde_json::to_value(result)?)?;
    logger(&connection,"connection initialized");

    // registrations
    let mut registrations: Vec<lsp::Registration> = Vec::new();
    if let Some(workspace) = params.capabilities.workspace {
        if let Some(config) = workspace.configuration {
            if config {
                registrations.push(lsp::Registration {
                    id: "pull-config".to_string(),
                    method: lsp::notification::DidChangeConfiguration::METHOD.to_string(),
                    register_options: None
                });
            }
        }
    }
    let req = lsp_server::Request::new(
        lsp_server::RequestId::from("kickassembler-reg-config".to_string()),
        lsp::request::RegisterCapability::METHOD.to_string(),
        lsp::RegistrationParams { registrations });
    if let Err(_) = connection.sender.send(req.into()) {
        logger(&connection,"Could not register change configuration capability");
    }

    // Starting configuration
    match request_configuration(&connection) {
        Ok(()) => {},
        Err(_) => logger(&connection,"could not request starting configuration")
    }

    // Main loop, wakes up for messages or for the next debounced compile
    loop {
        let maybe_msg = match tools.registry.next_deadline() {
            Some(deadline) => {
                let wait = deadline.saturating_duration_since(Instant::now());
                match connection.receiver.recv_timeout(wait) {
                    Ok(msg) => Some(msg),
                    Err(e) if e.is_timeout() => None,
                    Err(_) => break
                }
            },
            None => match connection.receiver.recv() {
                Ok(msg) => Some(msg),
                Err(_) => break
            }
        };

        let events = tools.registry.poll(Instant::now());
        report_events(&connection, &tools, events);

        // Handle messages from the client
        match maybe_msg {
            Some(lsp_server::Message::Notification(note)) => {
                notification::handle_notification(&connection,note,&mut tools);
            },
            Some(lsp_server::Message::Request(req)) => {
                if request::handle_request(&connection, req, &mut tools) {
                    break;
                }
            },
            Some(lsp_server::Message::Response(resp)) => {
                response::handle_response(&connection, resp, &mut tools);
            },
            None => {}
        }
    }

    io_threads.join()?;
    Ok(())
}
