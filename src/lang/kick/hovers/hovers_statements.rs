use crate::lang::kick::handbook::{instructions::InstructionSet, directives::DirectiveSet};
use crate::lang::kick::info::HandbookEntry;

pub struct StatementHovers {
    op_book: InstructionSet,
    dir_book: DirectiveSet
}

impl StatementHovers {
    pub fn new() -> Self {
        Self {
            op_book: InstructionSet::new(),
            dir_book: DirectiveSet::new()
        }
    }
    pub fn get_op(&self, token: &str) -> Option<Vec<String>> {
        let op = self.op_book.get(token)?;
        let mut ans = vec![format!("*(instruction)* **{}** : {}",op.mnemonic,op.brief)];
        if op.group.len() > 0 {
            ans.push(format!("group: {}",op.group));
        }
        if let Some(note) = op.cpu.note() {
            ans.push(note.to_string());
        }
        Some(ans)
    }
    /// `reported` is the assembler's own list, used when the handbook has no entry
    pub fn get_directive(&self, token: &str, reported: &[HandbookEntry]) -> Option<Vec<String>> {
        if let Some(dir) = self.dir_book.get_directive(token) {
            let mut ans = vec![format!("*(directive)* **{}** : {}",dir.name,dir.brief)];
            if dir.example.len() > 0 {
                ans.push(format!("    {}",dir.example));
            }
            return Some(ans);
        }
        let entry = reported.iter().find(|e| e.name.to_lowercase() == token.trim().to_lowercase())?;
        Some(vec![
            format!("*(directive)* **{}** : {}",entry.name,entry.description),
            format!("    {}",entry.example)
        ])
    }
    pub fn get_preprocessor(&self, token: &str, reported: &[HandbookEntry]) -> Option<Vec<String>> {
        if let Some(dir) = self.dir_book.get_preprocessor(token) {
            return Some(vec![format!("*(pre-processor)* `{}`: {}",dir.name,dir.brief)]);
        }
        let entry = reported.iter().find(|e| e.name.to_lowercase() == token.trim().to_lowercase())?;
        Some(vec![format!("*(pre-processor)* `{}`: {}",entry.name,entry.description)])
    }
}
