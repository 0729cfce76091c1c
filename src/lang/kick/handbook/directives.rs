use std::collections::HashMap;
use crate::lang::update_json_string;

const DIRECTIVES_STR: &str = include_str!("directives.json");
const PREPROCESSORS_STR: &str = include_str!("preprocessors.json");

#[derive(Clone,Debug)]
pub struct Directive {
    pub name: String,
    pub brief: String,
    pub example: String
}

pub struct DirectiveSet {
    directives: HashMap<String,Directive>,
    preprocessors: HashMap<String,Directive>
}

/// This can panic if something is wrong with the JSON.
/// But the JSON practically never changes.
fn build_map(json: &str) -> HashMap<String,Directive> {
    let mut ans = HashMap::new();
    let root_val = serde_json::from_str::<serde_json::Value>(json).expect("directive table is corrupt");
    if let Some(root) = root_val.as_object() {
        for (name,info) in root {
            let mut dir = Directive {
                name: name.to_string(),
                brief: String::new(),
                example: String::new()
            };
            update_json_string(info, "brief", &mut dir.brief);
            update_json_string(info, "example", &mut dir.example);
            ans.insert(name.to_string(),dir);
        }
    }
    ans
}

impl DirectiveSet {
    pub fn new() -> Self {
        Self {
            directives: build_map(DIRECTIVES_STR),
            preprocessors: build_map(PREPROCESSORS_STR)
        }
    }
    pub fn get_directive(&self, token: &str) -> Option<&Directive> {
        self.directives.get(&token.trim().to_lowercase())
    }
    pub fn get_preprocessor(&self, token: &str) -> Option<&Directive> {
        self.preprocessors.get(&token.trim().to_lowercase())
    }
}
