//! Unit tests of the Kick Assembler analysis.
//!
//! The assembler is never run, instead each test writes the asminfo block it
//! would have produced.  Span helpers take 0-based lines and columns with an
//! exclusive end, and emit the 1-based inclusive form of the block.

mod info_test;
mod source_test;
mod symbols_test;
mod resolver_test;
mod hovers_test;

use super::project::Model;
use super::assembler::AssemblerResults;
use super::info::CompileInfo;

pub const MAIN: &str = "/work/main.asm";
pub const LIB: &str = "/work/lib.asm";

/// span record for `kind` covering `beg..end` on `line`
pub fn span(kind: &str, line: usize, beg: usize, end: usize, file: usize) -> String {
    format!("{};{},{},{},{},{}",kind,line+1,beg+1,line+1,end,file)
}

/// span record for the first `pat` on `line` of `text`
pub fn span_of(kind: &str, text: &str, line: usize, pat: &str, file: usize) -> String {
    let row = text.lines().nth(line).expect("line out of range");
    let beg = row.find(pat).expect("pattern not on line");
    let beg = row[..beg].chars().count();
    span(kind, line, beg, beg + pat.chars().count(), file)
}

/// error record covering `beg..end` on `line`
pub fn error(line: usize, beg: usize, end: usize, file: usize, message: &str) -> String {
    format!("Error;{},{},{},{},{};{}",line+1,beg+1,line+1,end,file,message)
}

/// Block with the given files, spans and errors
pub fn block(files: &[&str], spans: &[String], errors: &[String]) -> String {
    let mut ans = String::from("[files]\n");
    for (i,f) in files.iter().enumerate() {
        ans += &format!("{};{}\n",i,f);
    }
    ans += "[syntax]\n";
    for s in spans {
        ans += s;
        ans += "\n";
    }
    ans += "[errors]\n";
    for e in errors {
        ans += e;
        ans += "\n";
    }
    ans
}

/// Model of `main` at `MAIN`, `lib` is served for `LIB`.
pub fn model(main: &str, lib: Option<&str>, block: &str) -> Model {
    let info = CompileInfo::parse(block, &[MAIN.to_string()]);
    let results = AssemblerResults {
        info,
        stdout: String::new(),
        stderr: String::new(),
        status: 0
    };
    let loader = |path: &str| -> Option<String> {
        match path == LIB {
            true => lib.map(|s| s.to_string()),
            false => None
        }
    };
    Model::build(results, main, 5, &loader)
}
