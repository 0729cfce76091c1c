use std::sync::Arc;
use lsp_types as lsp;
use super::super::hovers::HoverProvider;
use super::super::project::Model;
use crate::lang::server::Hovers;
use super::{span_of,block,model,MAIN,LIB};

fn hover_text(model: Model, line: isize, col: isize) -> Option<String> {
    let mut provider = HoverProvider::new();
    provider.use_shared_model(Some(Arc::new(model)));
    match provider.get(String::new(), line, col)?.contents {
        lsp::HoverContents::Markup(markup) => Some(markup.value),
        _ => None
    }
}

#[test]
fn macro_with_doc() {
    let text = "// @param a the first value
.macro foo(a,b) {
  lda #a
}
  foo(1,2)
";
    let spans = vec![
        span_of("comment", text, 0, "// @param a the first value", 0),
        span_of("directive", text, 1, ".macro", 0),
        span_of("macroExecution", text, 4, "foo", 0)
    ];
    let hov = hover_text(model(text, None, &block(&[MAIN], &spans, &[])), 4, 3).expect("no hover");
    assert!(hov.starts_with("\t.macro foo(a,b)"));
    assert!(hov.contains("parameters:"));
    assert!(hov.contains("* `a` : the first value"));
    assert!(hov.contains("* `b`"));
}

#[test]
fn constant_value() {
    let text = ".const MAX = $10\n  lda #MAX\n";
    let spans = vec![
        span_of("directive", text, 0, ".const", 0),
        span_of("mnemonic", text, 1, "lda", 0),
        span_of("symbolReference", text, 1, "MAX", 0)
    ];
    let hov = hover_text(model(text, None, &block(&[MAIN], &spans, &[])), 1, 8).expect("no hover");
    assert!(hov.starts_with("\t.const MAX = $10"));
    assert!(hov.contains("* Dec: `16`"));
    assert!(hov.contains("* Hex: `$10`"));
}

#[test]
fn label_peek() {
    let text = "start:
  inx
  rts
  jmp start
";
    let spans = vec![
        span_of("label", text, 0, "start:", 0),
        span_of("symbolReference", text, 3, "start", 0)
    ];
    let hov = hover_text(model(text, None, &block(&[MAIN], &spans, &[])), 3, 7).expect("no hover");
    assert!(hov.starts_with("\t(label) start"));
    assert!(hov.contains("```\nstart:   \n  inx"));
    let hov = hover_text(model(text, None, &block(&[MAIN], &spans, &[])), 0, 2).expect("no hover");
    assert!(!hov.contains("```"));
}

#[test]
fn label_from_other_file() {
    let main = "  jsr clear\n";
    let lib = "// blank the screen\nclear:\n  rts\n";
    let spans = vec![
        span_of("symbolReference", main, 0, "clear", 0),
        span_of("comment", lib, 0, "// blank the screen", 1),
        span_of("label", lib, 1, "clear:", 1)
    ];
    let hov = hover_text(model(main, Some(lib), &block(&[MAIN,LIB], &spans, &[])), 0, 6).expect("no hover");
    assert!(hov.starts_with("\t(label) clear from lib.asm"));
    assert!(hov.contains("blank the screen"));
}

#[test]
fn instructions() {
    let text = "  lda #1\n  lax #2\n";
    let spans = vec![
        span_of("mnemonic", text, 0, "lda", 0),
        span_of("mnemonic", text, 1, "lax", 0)
    ];
    let hov = hover_text(model(text, None, &block(&[MAIN], &spans, &[])), 0, 3).expect("no hover");
    assert!(hov.starts_with("*(instruction)* **lda** : LoaD the Accumulator"));
    assert!(!hov.contains("illegal"));
    let hov = hover_text(model(text, None, &block(&[MAIN], &spans, &[])), 1, 3).expect("no hover");
    assert!(hov.contains("**(illegal opcode)**"));
}

#[test]
fn directives() {
    let text = "  .byte 1,2\n#define DEBUG\n  .zzz\n";
    let spans = vec![
        span_of("directive", text, 0, ".byte", 0),
        span_of("ppDirective", text, 1, "#define", 0),
        span_of("directive", text, 2, ".zzz", 0)
    ];
    let info = format!("[directives]\n.zzz;.zzz;Reported by the assembler.\n{}",block(&[MAIN], &spans, &[]));
    let hov = hover_text(model(text, None, &info), 0, 3).expect("no hover");
    assert!(hov.starts_with("*(directive)* **.byte** : Outputs bytes to memory."));
    assert!(hov.contains(".byte $01,$02,$03"));
    let hov = hover_text(model(text, None, &info), 1, 2).expect("no hover");
    assert!(hov.starts_with("*(pre-processor)* `#define`"));
    let hov = hover_text(model(text, None, &info), 2, 3).expect("no hover");
    assert!(hov.contains("Reported by the assembler."));
}

#[test]
fn nothing_there() {
    let text = "  nop\n\n";
    let spans = vec![span_of("mnemonic", text, 0, "nop", 0)];
    assert!(hover_text(model(text, None, &block(&[MAIN], &spans, &[])), 1, 0).is_none());
    assert!(hover_text(model(text, None, &block(&[MAIN], &spans, &[])), -1, 0).is_none());
    let mut provider = HoverProvider::new();
    assert!(provider.get(String::new(), 0, 2).is_none());
}

#[test]
fn handbook_tables() {
    let ops = super::super::handbook::instructions::InstructionSet::new();
    assert!(ops.len() > 56);
    assert_eq!(ops.get("LDA.z").map(|op| op.mnemonic.as_str()),Some("lda"));
    assert!(ops.get("xyz").is_none());
    let dirs = super::super::handbook::directives::DirectiveSet::new();
    assert_eq!(dirs.get_directive(".CONST").map(|d| d.example.as_str()),Some(".const BORDER = $d020"));
    assert!(dirs.get_preprocessor("#define").is_some());
}
