//! # Language Module
//!
//! Language-neutral plumbing shared by the language server and the CLI:
//! documents, URI handling, range arithmetic, and helpers for picking values
//! out of client settings.  Dialect specific analysis lives in the submodules,
//! at present only `kick` (Kick Assembler).

pub mod server;
pub mod kick;

use lsp_types as lsp;
use thiserror::Error;
use std::path::{Path,PathBuf};

use crate::DYNERR;

#[derive(Error,Debug)]
pub enum Error {
    #[error("URI could not be converted to a path")]
    BadUri,
    #[error("document could not be read")]
    Unreadable
}

/// A document as the client last described it.
#[derive(Clone,Debug)]
pub struct Document {
    pub uri: lsp::Url,
    pub version: Option<i32>,
    pub text: String
}

impl Document {
    pub fn new(uri: lsp::Url, text: String, version: Option<i32>) -> Self {
        Self {
            uri,
            version,
            text
        }
    }
    pub fn from_file_path(path: &Path) -> Result<Self,DYNERR> {
        let text = match std::fs::read_to_string(path) {
            Ok(t) => t,
            Err(_) => return Err(Box::new(Error::Unreadable))
        };
        let canon = match path.canonicalize() {
            Ok(p) => p,
            Err(_) => path.to_path_buf()
        };
        match lsp::Url::from_file_path(canon) {
            Ok(uri) => Ok(Self { uri, version: None, text }),
            Err(()) => Err(Box::new(Error::BadUri))
        }
    }
}

/// Clients are not consistent about percent encoding and drive letters.
/// Round trip through the file system path so that map keys agree.
pub fn normalize_client_uri(uri: lsp::Url) -> lsp::Url {
    if let Ok(path) = uri.to_file_path() {
        if let Ok(ans) = lsp::Url::from_file_path(path) {
            return ans;
        }
    }
    uri
}

pub fn normalize_client_uri_str(uri: &str) -> Result<lsp::Url,DYNERR> {
    let parsed = lsp::Url::parse(uri)?;
    Ok(normalize_client_uri(parsed))
}

pub fn pathbuf_from_uri(uri: &lsp::Url) -> Result<PathBuf,DYNERR> {
    match uri.to_file_path() {
        Ok(p) => Ok(p),
        Err(()) => Err(Box::new(Error::BadUri))
    }
}

/// Try to update a boolean from a serde `Value` presumed to be an object.
/// If there is any error do not change the value.
pub fn update_json_bool(maybe_obj: &serde_json::Value, key: &str, curr: &mut bool) {
    if let Some(obj) = maybe_obj.as_object() {
        if let Some(x) = obj.get(key) {
            if let Some(b) = x.as_bool() {
                *curr = b;
            }
        }
    }
}

/// Try to update an integer from a serde `Value` presumed to be an object.
/// If there is any error do not change the value.
pub fn update_json_i64(maybe_obj: &serde_json::Value, key: &str, curr: &mut i64) {
    if let Some(obj) = maybe_obj.as_object() {
        if let Some(x) = obj.get(key) {
            if let Some(i) = x.as_i64() {
                *curr = i;
            }
        }
    }
}

/// Try to update a string from a serde `Value` presumed to be an object.
/// If there is any error do not change the value.
pub fn update_json_string(maybe_obj: &serde_json::Value, key: &str, curr: &mut String) {
    if let Some(obj) = maybe_obj.as_object() {
        if let Some(x) = obj.get(key) {
            if let Some(s) = x.as_str() {
                *curr = s.to_string();
            }
        }
    }
}

/// Try to update a string list from a serde `Value` presumed to be an object.
/// If there is any error, including a non-string element, do not change the value.
pub fn update_json_vec_str(maybe_obj: &serde_json::Value, key: &str, curr: &mut Vec<String>) {
    if let Some(obj) = maybe_obj.as_object() {
        if let Some(x) = obj.get(key) {
            if let Some(a) = x.as_array() {
                let mut ans = Vec::new();
                for v in a {
                    match v.as_str() {
                        Some(s) => ans.push(s.to_string()),
                        None => return
                    }
                }
                *curr = ans;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_helpers_keep_value_on_mismatch() {
        let val = serde_json::json!({"a": true, "b": "x", "c": [1,2], "d": ["p","q"]});
        let mut b = false;
        let mut s = "keep".to_string();
        let mut v = vec!["keep".to_string()];
        update_json_bool(&val,"a",&mut b);
        update_json_string(&val,"a",&mut s);
        update_json_vec_str(&val,"c",&mut v);
        assert!(b);
        assert_eq!(s,"keep");
        assert_eq!(v,vec!["keep".to_string()]);
        update_json_vec_str(&val,"d",&mut v);
        assert_eq!(v,vec!["p".to_string(),"q".to_string()]);
    }
}
