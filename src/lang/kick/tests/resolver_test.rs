use super::super::resolver::{Resolver,Resolution,split_relative,word_at,words_before};
use super::super::SymbolType;
use super::{span_of,block,model,MAIN};

const RELATIVE: &str = "  ldx #8
  nop
  nop
  bne loop+
  bne loop++
loop:
  dex
  nop
  nop
loop:
  bne loop-
  bne loop--
loop:
  rts
";

fn relative_model() -> super::super::project::Model {
    let mut spans = Vec::new();
    for row in [5,9,12] {
        spans.push(span_of("label", RELATIVE, row, "loop:", 0));
    }
    for (row,tok) in [(3,"loop+"),(4,"loop++"),(10,"loop-"),(11,"loop--")] {
        spans.push(span_of("mnemonic", RELATIVE, row, "bne", 0));
        spans.push(span_of("symbolReference", RELATIVE, row, tok, 0));
    }
    model(RELATIVE, None, &block(&[MAIN], &spans, &[]))
}

fn resolved_line(model: &super::super::project::Model, line: usize, col: usize) -> Option<usize> {
    match Resolver::new(model, line, col)?.resolve()? {
        Resolution::Symbol { symbol, .. } => Some(symbol.range.start_line),
        _ => None
    }
}

#[test]
fn relative_split() {
    assert_eq!(split_relative("loop++"),("loop","++"));
    assert_eq!(split_relative("loop-"),("loop","-"));
    assert_eq!(split_relative("loop"),("loop",""));
    assert_eq!(split_relative("a+-"),("a","+-"));
}

#[test]
fn words() {
    assert_eq!(word_at("  lda (ptr),y", 8),"ptr");
    assert_eq!(word_at("  jsr clear  ", 12),"clear");
    assert_eq!(word_at("", 3),"");
    assert_eq!(words_before("  lda gfx SIZE", 11),vec!["lda","gfx"]);
}

#[test]
fn relative_labels() {
    let model = relative_model();
    assert_eq!(resolved_line(&model, 3, 7),Some(5));
    assert_eq!(resolved_line(&model, 4, 7),Some(9));
    assert_eq!(resolved_line(&model, 10, 7),Some(9));
    assert_eq!(resolved_line(&model, 11, 7),Some(5));
}

#[test]
fn mixed_run() {
    let model = relative_model();
    let resolver = Resolver::new(&model, 3, 7).expect("no resolver");
    assert!(resolver.find_symbol("loop+-", SymbolType::NamedLabel, false, None).is_none());
    assert!(resolver.find_symbol("loop++++", SymbolType::NamedLabel, false, None).is_none());
    assert!(resolver.find_symbol("loop", SymbolType::NamedLabel, false, None).is_some());
}

#[test]
fn label_on_its_own_line() {
    let model = relative_model();
    assert_eq!(resolved_line(&model, 9, 2),Some(9));
    assert_eq!(resolved_line(&model, 12, 2),Some(12));
}

#[test]
fn scope_visibility() {
    let text = ".const COUNT = 4
.namespace gfx {
  .const @TOP = 7
  .const SIZE = 2
  lda #COUNT
}
  lda #TOP
  lda #SIZE
  lda #gfx.SIZE
";
    let spans = vec![
        span_of("directive", text, 0, ".const", 0),
        span_of("directive", text, 1, ".namespace", 0),
        span_of("directive", text, 2, ".const", 0),
        span_of("directive", text, 3, ".const", 0),
        span_of("symbolReference", text, 4, "COUNT", 0),
        span_of("symbolReference", text, 6, "TOP", 0),
        span_of("symbolReference", text, 7, "SIZE", 0),
        span_of("symbolReference", text, 8, "gfx", 0),
        span_of("objFieldReference", text, 8, "SIZE", 0)
    ];
    let model = model(text, None, &block(&[MAIN], &spans, &[]));
    assert_eq!(resolved_line(&model, 4, 9),Some(0));
    assert_eq!(resolved_line(&model, 6, 8),Some(2));
    let outside = Resolver::new(&model, 7, 8).expect("no resolver");
    assert!(outside.find_symbol("SIZE", SymbolType::Constant, false, None).is_none());
    assert_eq!(resolved_line(&model, 8, 12),Some(3));
}

#[test]
fn statements() {
    let text = "  lda #$20\n  .byte 1\n#import \"x.asm\"\n";
    let spans = vec![
        span_of("mnemonic", text, 0, "lda", 0),
        span_of("directive", text, 1, ".byte", 0),
        span_of("ppDirective", text, 2, "#import", 0)
    ];
    let model = model(text, None, &block(&[MAIN], &spans, &[]));
    let at = |line: usize, col: usize| Resolver::new(&model, line, col).and_then(|r| r.resolve());
    assert_eq!(at(0, 3),Some(Resolution::Instruction("lda".to_string())));
    assert_eq!(at(0, 7),Some(Resolution::Number(32)));
    assert_eq!(at(1, 4),Some(Resolution::Directive(".byte".to_string())));
    assert_eq!(at(2, 2),Some(Resolution::Preprocessor("#import".to_string())));
}

#[test]
fn no_code_no_answer() {
    let text = "// 42\n  nop\n";
    let spans = vec![
        span_of("comment", text, 0, "// 42", 0),
        span_of("mnemonic", text, 1, "nop", 0)
    ];
    let model = model(text, None, &block(&[MAIN], &spans, &[]));
    assert!(Resolver::new(&model, 0, 4).and_then(|r| r.resolve()).is_none());
    assert!(Resolver::new(&model, 9, 0).is_none());
}

#[test]
fn not_current() {
    let text = "nop\n";
    let mut m = model(text, None, &block(&[MAIN], &[], &[]));
    m.info.files[0].is_current = false;
    assert!(Resolver::new(&m, 0, 0).is_none());
}
