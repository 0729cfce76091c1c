use std::collections::HashMap;
use crate::lang::update_json_string;

const JSON_STR: &str = include_str!("instructions.json");

/// Instruction set an instruction belongs to
#[derive(Clone,Copy,Debug,PartialEq,Eq)]
pub enum Cpu {
    Legal,
    Illegal,
    Dtv,
    C02,
    CE02,
    GS02
}

impl Cpu {
    fn from_tag(tag: &str) -> Self {
        match tag {
            "illegal" => Self::Illegal,
            "dtv" => Self::Dtv,
            "65c02" => Self::C02,
            "65ce02" => Self::CE02,
            "45gs02" => Self::GS02,
            _ => Self::Legal
        }
    }
    /// Annotation shown for anything other than the legal 6502 set
    pub fn note(&self) -> Option<&'static str> {
        match self {
            Self::Legal => None,
            Self::Illegal => Some("**(illegal opcode)**"),
            Self::Dtv => Some("**(DTV opcode)**"),
            Self::C02 => Some("**(65c02 opcode)**"),
            Self::CE02 => Some("**(65ce02 opcode)**"),
            Self::GS02 => Some("**(45gs02 opcode)**")
        }
    }
}

#[derive(Clone,Debug)]
pub struct Instruction {
    pub mnemonic: String,
    pub brief: String,
    pub group: String,
    pub cpu: Cpu,
    /// `required`, `optional`, or `none`
    pub operand: String
}

pub struct InstructionSet {
    map: HashMap<String,Instruction>
}

/// This can panic if something is wrong with the JSON.
/// But the JSON practically never changes.
fn build_instructions() -> HashMap<String,Instruction> {
    let mut ans = HashMap::new();
    let root_val = serde_json::from_str::<serde_json::Value>(JSON_STR).expect("instruction table is corrupt");
    if let Some(root) = root_val.as_object() {
        for (mnemonic,info) in root {
            let mut cpu = String::new();
            let mut ins = Instruction {
                mnemonic: mnemonic.to_string(),
                brief: String::new(),
                group: String::new(),
                cpu: Cpu::Legal,
                operand: "none".to_string()
            };
            update_json_string(info, "brief", &mut ins.brief);
            update_json_string(info, "group", &mut ins.group);
            update_json_string(info, "operand", &mut ins.operand);
            update_json_string(info, "cpu", &mut cpu);
            ins.cpu = Cpu::from_tag(&cpu);
            ans.insert(mnemonic.to_string(),ins);
        }
    }
    ans
}

impl InstructionSet {
    pub fn new() -> Self {
        Self {
            map: build_instructions()
        }
    }
    /// Case insensitive, an addressing suffix such as `.z` is ignored.
    pub fn get(&self, token: &str) -> Option<&Instruction> {
        let key = token.trim().to_lowercase();
        let key = match key.split_once('.') {
            Some((m,_)) => m.to_string(),
            None => key
        };
        self.map.get(&key)
    }
    pub fn len(&self) -> usize {
        self.map.len()
    }
}
