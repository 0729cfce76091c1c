//! Parse settings string sent by any client.
//!
//! The server pulls the `kickassembler` section and checks for specific keys that
//! affect its operation.  Unknown keys are ignored, and a key with the wrong type
//! leaves the default in place.

use std::path::Path;
use log::warn;
use serde_json;
use crate::DYNERR;
use crate::lang::{update_json_bool,update_json_i64,update_json_string,update_json_vec_str};

#[derive(Clone,Copy,Debug,PartialEq,Eq)]
pub enum Trigger {
    OnChange,
    OnSave
}

#[derive(Clone,Debug,PartialEq,Eq)]
pub struct Opcodes {
    pub illegal: bool,
    pub dtv: bool
}

#[derive(Clone,Debug,PartialEq,Eq)]
pub struct Settings {
    pub assembler_jar: String,
    pub java_runtime: String,
    pub assembler_main_class: String,
    pub java_plugins: Vec<String>,
    pub java_plugin_system_properties: Vec<String>,
    pub assembler_args: Vec<String>,
    pub assembler_library_paths: Vec<String>,
    /// master file that is assembled instead of the open document
    pub startup: String,
    pub auto_assemble_trigger: Vec<Trigger>,
    /// milliseconds
    pub auto_assemble_trigger_delay: i64,
    pub code_sneak_peek_lines: i64,
    pub opcodes: Opcodes,
    /// set by `validate`
    pub valid: bool
}

impl Settings {
    pub fn new() -> Self {
        Self {
            assembler_jar: String::new(),
            java_runtime: "java".to_string(),
            assembler_main_class: "kickass.KickAssembler".to_string(),
            java_plugins: Vec::new(),
            java_plugin_system_properties: Vec::new(),
            assembler_args: Vec::new(),
            assembler_library_paths: Vec::new(),
            startup: String::new(),
            auto_assemble_trigger: vec![Trigger::OnChange,Trigger::OnSave],
            auto_assemble_trigger_delay: 250,
            code_sneak_peek_lines: 5,
            opcodes: Opcodes {
                illegal: true,
                dtv: false
            },
            valid: false
        }
    }
    /// The jar and the runtime have to exist, missing plugins and library
    /// paths only produce warnings.
    pub fn validate(&mut self) -> bool {
        self.valid = self.assembler_jar.len() > 0 && Path::new(&self.assembler_jar).exists()
            && resolve_program(&self.java_runtime);
        for lib in &self.assembler_library_paths {
            if Path::new(lib).is_absolute() && !Path::new(lib).exists() {
                warn!("library path {} does not exist",lib);
            }
        }
        for plugin in &self.java_plugins {
            if !Path::new(plugin).exists() {
                warn!("plugin {} does not exist",plugin);
            }
        }
        self.valid
    }
    pub fn on_change(&self) -> bool {
        self.auto_assemble_trigger.contains(&Trigger::OnChange)
    }
    pub fn peek_lines(&self) -> usize {
        self.code_sneak_peek_lines.max(0) as usize
    }
    pub fn delay(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.auto_assemble_trigger_delay.max(0) as u64)
    }
}

/// A runtime given as a bare name is searched in `PATH`.
fn resolve_program(prog: &str) -> bool {
    if prog.len() == 0 {
        return false;
    }
    let p = Path::new(prog);
    if p.components().count() > 1 || p.is_absolute() {
        return p.exists();
    }
    match std::env::var_os("PATH") {
        Some(paths) => std::env::split_paths(&paths).any(|dir| {
            dir.join(prog).exists() || dir.join(format!("{}.exe",prog)).exists()
        }),
        None => false
    }
}

/// Accepts a list of trigger names or a single name.
/// If there is any error do not change the value.
fn update_json_trigger(maybe_obj: &serde_json::Value, key: &str, curr: &mut Vec<Trigger>) {
    let names: Vec<String> = match maybe_obj.get(key) {
        Some(serde_json::Value::String(s)) => vec![s.to_string()],
        Some(serde_json::Value::Array(_)) => {
            let mut ans = Vec::new();
            update_json_vec_str(maybe_obj, key, &mut ans);
            ans
        },
        _ => return
    };
    let mut ans = Vec::new();
    for n in names {
        match n.as_str() {
            "onChange" => ans.push(Trigger::OnChange),
            "onSave" => ans.push(Trigger::OnSave),
            _ => {}
        }
    }
    *curr = ans;
}

pub fn parse(json: &str) -> Result<Settings,DYNERR> {
    let mut ans = Settings::new();
    let root = serde_json::from_str::<serde_json::Value>(json)?;
    if let Some(val) = root.get("opcodes") {
        update_json_bool(val, "illegal", &mut ans.opcodes.illegal);
        update_json_bool(val, "DTV", &mut ans.opcodes.dtv);
    }
    update_json_string(&root, "assemblerJar", &mut ans.assembler_jar);
    update_json_string(&root, "javaRuntime", &mut ans.java_runtime);
    update_json_string(&root, "assemblerMainClass", &mut ans.assembler_main_class);
    update_json_vec_str(&root, "javaPlugins", &mut ans.java_plugins);
    update_json_vec_str(&root, "javaPluginSystemProperties", &mut ans.java_plugin_system_properties);
    update_json_vec_str(&root, "assemblerArgs", &mut ans.assembler_args);
    update_json_vec_str(&root, "assemblerLibraryPaths", &mut ans.assembler_library_paths);
    update_json_string(&root, "startup", &mut ans.startup);
    update_json_trigger(&root, "autoAssembleTrigger", &mut ans.auto_assemble_trigger);
    update_json_i64(&root, "autoAssembleTriggerDelay", &mut ans.auto_assemble_trigger_delay);
    update_json_i64(&root, "codeSneakPeekLines", &mut ans.code_sneak_peek_lines);
    // dotted keys are sent flat by some clients
    update_json_bool(&root, "opcodes.illegal", &mut ans.opcodes.illegal);
    update_json_bool(&root, "opcodes.DTV", &mut ans.opcodes.dtv);
    Ok(ans)
}
