//! Registry of open documents.
//!
//! Each document maps to exactly one `Project`.  Edits reschedule that project's
//! debounced rebuild, saves rebuild immediately, and closing discards the project.
//! The registry has no timer of its own, the owner calls `poll` at or after
//! `next_deadline`.

use std::collections::HashMap;
use std::time::Instant;
use lsp_types as lsp;
use log::{debug,error};
use crate::lang::normalize_client_uri;
use super::project::Project;
use super::settings::Settings;
use super::assembler::Assemble;

/// Things the owner of the registry may want to tell the client about
#[derive(Clone,Debug,PartialEq)]
pub enum Event {
    /// a new model is available for this document
    Compiled(lsp::Url),
    /// the assembler could not be run for this document
    Failed(lsp::Url,String),
    /// informational message, shown once
    Notice(String),
    /// settings are unusable, reported once per settings change
    ConfigurationInvalid
}

pub struct ProjectRegistry {
    projects: HashMap<String,Project>,
    settings: Settings,
    assembler: Box<dyn Assemble>,
    config_reported: bool
}

impl ProjectRegistry {
    pub fn new(assembler: Box<dyn Assemble>) -> Self {
        Self {
            projects: HashMap::new(),
            settings: Settings::new(),
            assembler,
            config_reported: false
        }
    }
    pub fn settings(&self) -> &Settings {
        &self.settings
    }
    /// Replace the settings and rebuild every open document.
    pub fn set_settings(&mut self, settings: Settings) -> Vec<Event> {
        self.settings = settings;
        self.config_reported = false;
        let mut keys: Vec<String> = self.projects.keys().cloned().collect();
        keys.sort();
        let mut ans = Vec::new();
        for key in keys {
            if let Some(p) = self.projects.get_mut(&key) {
                p.cancel();
            }
            ans.append(&mut self.compile(&key));
        }
        ans
    }
    pub fn get(&self, uri: &lsp::Url) -> Option<&Project> {
        self.projects.get(&normalize_client_uri(uri.clone()).to_string())
    }
    /// Projects sorted by key
    pub fn projects(&self) -> Vec<(&String,&Project)> {
        let mut ans: Vec<(&String,&Project)> = self.projects.iter().collect();
        ans.sort_by(|a,b| a.0.cmp(b.0));
        ans
    }
    pub fn len(&self) -> usize {
        self.projects.len()
    }
    fn compile(&mut self, key: &str) -> Vec<Event> {
        let mut ans = Vec::new();
        if !self.settings.valid {
            if !self.config_reported {
                self.config_reported = true;
                ans.push(Event::ConfigurationInvalid);
            }
            return ans;
        }
        let proj = match self.projects.get_mut(key) {
            Some(p) => p,
            None => return ans
        };
        match proj.assemble(&self.settings, self.assembler.as_ref()) {
            Ok(()) => ans.push(Event::Compiled(proj.uri().clone())),
            Err(e) => {
                error!("assembly of {} failed: {}",key,e);
                ans.push(Event::Failed(proj.uri().clone(),e.to_string()));
            }
        }
        if let Some(notice) = proj.take_notice() {
            ans.push(Event::Notice(notice));
        }
        ans
    }
    /// Create the project and run the first compile.
    pub fn open(&mut self, uri: lsp::Url, text: &str, version: Option<i32>) -> Vec<Event> {
        let uri = normalize_client_uri(uri);
        let key = uri.to_string();
        debug!("open {}",key);
        self.projects.insert(key.clone(), Project::new(uri, text, version));
        self.compile(&key)
    }
    /// Update the text now, the compile is debounced.
    pub fn change(&mut self, uri: &lsp::Url, text: &str, version: Option<i32>, now: Instant) {
        let key = normalize_client_uri(uri.clone()).to_string();
        let delay = self.settings.delay();
        let trigger = self.settings.valid && self.settings.on_change();
        if let Some(proj) = self.projects.get_mut(&key) {
            proj.set_source(text, version);
            if trigger {
                proj.schedule(now + delay);
            }
        }
    }
    /// Compile immediately with the saved contents.
    /// If the client did not include the text it is read from disk.
    pub fn save(&mut self, uri: &lsp::Url, text: Option<&str>) -> Vec<Event> {
        let key = normalize_client_uri(uri.clone()).to_string();
        let saved = match text {
            Some(t) => Some(t.to_string()),
            None => match crate::lang::pathbuf_from_uri(uri) {
                Ok(path) => std::fs::read_to_string(path).ok(),
                Err(_) => None
            }
        };
        match self.projects.get_mut(&key) {
            Some(proj) => {
                proj.cancel();
                if let Some(t) = saved {
                    let version = proj.version();
                    proj.set_source(&t, version);
                }
            },
            None => return Vec::new()
        }
        self.compile(&key)
    }
    /// Discard the project along with any pending compile.
    pub fn close(&mut self, uri: &lsp::Url) {
        let key = normalize_client_uri(uri.clone()).to_string();
        if let Some(mut proj) = self.projects.remove(&key) {
            proj.cancel();
        }
    }
    /// Run every debounced compile that is due.
    pub fn poll(&mut self, now: Instant) -> Vec<Event> {
        let mut due: Vec<String> = self.projects.iter().filter(|(_,p)| p.is_due(now)).map(|(k,_)| k.clone()).collect();
        due.sort();
        let mut ans = Vec::new();
        for key in due {
            if let Some(p) = self.projects.get_mut(&key) {
                p.cancel();
            }
            ans.append(&mut self.compile(&key));
        }
        ans
    }
    /// Earliest pending compile
    pub fn next_deadline(&self) -> Option<Instant> {
        self.projects.values().filter_map(|p| p.deadline()).min()
    }
}
