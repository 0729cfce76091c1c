//! Handle incoming responses to our requests

use lsp_server;
use super::logger;

pub fn handle_response(connection: &lsp_server::Connection, resp: lsp_server::Response, tools: &mut super::Tools) {
    match resp.id.to_string().as_str() {
        "\"kickassembler-pull-config\"" => {
            match super::parse_configuration(resp) {
                Ok(mut config) => {
                    if !config.validate() {
                        logger(&connection,"assembler jar or java runtime could not be found");
                    }
                    let events = tools.registry.set_settings(config);
                    logger(&connection,&format!("updated configuration for {} documents",tools.registry.len()));
                    super::report_events(connection, tools, events);
                },
                Err(_) => logger(&connection,"could not parse config")
            }
        },
        "\"kickassembler-reg-config\"" => {
            logger(&connection,"registration response was received");
        },
        s => {
            logger(&connection,&format!("unhandled response: {}",s))
        }
    }
}
