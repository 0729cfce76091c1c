use super::super::symbols::{SymbolTable,split_declaration,remarks_above};
use super::super::source::{SourceFile,ScopeArena};
use super::super::{SymbolType,SymbolDetail,ParamKind,ValueKind};
use super::{span_of,block,model,MAIN};

#[test]
fn declarations() {
    assert_eq!(split_declaration(".macro foo(a, b) {", false),vec![".macro","foo","a","b"]);
    assert_eq!(split_declaration(".function area(w,h) // size", false),vec![".function","area","w","h"]);
    assert_eq!(split_declaration(".pseudocommand mov src:dst {", true),vec![".pseudocommand","mov","src","dst"]);
    assert_eq!(split_declaration(".pseudocommand inc16 arg", true),vec![".pseudocommand","inc16","arg"]);
    assert_eq!(split_declaration(".macro", false),vec![".macro"]);
}

#[test]
fn remarks() {
    let text = "// first
// second
start:

// orphan

nop
/** Sets up
 * the screen
 */
init:";
    let mut arena = ScopeArena::new();
    let file = SourceFile::new(0, MAIN, text, true, &[], &mut arena);
    assert_eq!(remarks_above(&file.lines, 2),Some("first\nsecond".to_string()));
    assert_eq!(remarks_above(&file.lines, 6),None);
    assert_eq!(remarks_above(&file.lines, 0),None);
    assert_eq!(remarks_above(&file.lines, 10),Some("Sets up\nthe screen".to_string()));
}

#[test]
fn names_after_keyword() {
    let text = ".var a = 1
.macro m(x) {
}
.const c = 2
.eval var v = 3
";
    let spans = vec![
        span_of("directive", text, 0, ".var", 0),
        span_of("directive", text, 1, ".macro", 0),
        span_of("directive", text, 3, ".const", 0),
        span_of("directive", text, 4, ".eval", 0)
    ];
    let model = model(text, None, &block(&[MAIN], &spans, &[]));
    let cols = |name: &str| model.table.symbols.iter()
        .find(|s| s.name == name && s.kind() != SymbolType::Parameter)
        .map(|s| (s.range.start_line,s.range.start_col,s.range.end_col));
    assert_eq!(cols("a"),Some((0,5,6)));
    assert_eq!(cols("m"),Some((1,7,8)));
    assert_eq!(cols("c"),Some((3,7,8)));
    assert_eq!(cols("v"),Some((4,10,11)));
}

#[test]
fn global_sigil() {
    let text = ".namespace gfx {
  .const @MAX = 10
  .const MIN = 1
}
";
    let spans = vec![
        span_of("directive", text, 0, ".namespace", 0),
        span_of("directive", text, 1, ".const", 0),
        span_of("directive", text, 2, ".const", 0)
    ];
    let model = model(text, None, &block(&[MAIN], &spans, &[]));
    let syms = &model.table.symbols;
    assert_eq!(syms.len(),3);
    assert_eq!(syms[0].kind(),SymbolType::Namespace);
    assert_eq!(syms[1].name,"MAX");
    assert_eq!(syms[1].scope,0);
    assert!(syms[1].is_global());
    assert!(syms[1].is_main());
    assert_eq!((syms[1].range.start_col,syms[1].range.end_col),(10,13));
    assert_eq!(syms[1].value(),Some(10));
    assert_eq!(syms[2].name,"MIN");
    assert_eq!(syms[2].scope,1);
    assert!(!syms[2].is_global());
}

#[test]
fn values() {
    let text = ".var speed = $20 // pixels
.label screen = $0400
#define DEBUG
.eval var count = 3
.const NAME = \"hello\"
";
    let spans = vec![
        span_of("directive", text, 0, ".var", 0),
        span_of("directive", text, 1, ".label", 0),
        span_of("ppDirective", text, 2, "#define", 0),
        span_of("directive", text, 3, ".eval", 0),
        span_of("directive", text, 4, ".const", 0)
    ];
    let model = model(text, None, &block(&[MAIN], &spans, &[]));
    let syms = &model.table.symbols;
    assert_eq!(syms.len(),5);
    assert_eq!(syms[0].kind(),SymbolType::Variable);
    assert_eq!(syms[0].value(),Some(32));
    assert_eq!(syms[0].detail,SymbolDetail::Value { kind: ValueKind::Variable, value: Some(32), original: Some("$20".to_string()) });
    assert_eq!(syms[1].kind(),SymbolType::Label);
    assert_eq!(syms[1].value(),Some(1024));
    assert_eq!(syms[2].name,"DEBUG");
    assert_eq!(syms[2].kind(),SymbolType::Boolean);
    assert_eq!(syms[3].name,"count");
    assert_eq!(syms[3].kind(),SymbolType::Variable);
    assert_eq!(syms[4].value(),None);
}

#[test]
fn labels_and_references() {
    let text = "start:
{
  inx
  bne start
}
loop:
  jmp loop-
";
    let spans = vec![
        span_of("label", text, 0, "start:", 0),
        span_of("mnemonic", text, 3, "bne", 0),
        span_of("symbolReference", text, 3, "start", 0),
        span_of("label", text, 5, "loop:", 0),
        span_of("symbolReference", text, 6, "loop-", 0)
    ];
    let model = model(text, None, &block(&[MAIN], &spans, &[]));
    let syms = &model.table.symbols;
    assert_eq!(syms.len(),4);
    match &syms[0].detail {
        SymbolDetail::NamedLabel { is_namespace, peek } => {
            assert!(*is_namespace);
            assert_eq!(peek.as_deref(),Some("start:   \n{   \n  inx   \n  bne start   \n}"));
        },
        _ => panic!("expected a named label")
    }
    assert_eq!(syms[1].kind(),SymbolType::Reference);
    assert_eq!(syms[1].scope,1);
    assert_eq!(syms[3].name,"loop");
    assert_eq!(syms[3].detail,SymbolDetail::Reference { is_namespace: false, run: "-".to_string() });
}

#[test]
fn parameters() {
    let text = "// @param string msg text to show
// @param n repeat count
.macro print(msg,n) {
  nop
}
";
    let spans = vec![
        span_of("comment", text, 0, "// @param string msg text to show", 0),
        span_of("comment", text, 1, "// @param n repeat count", 0),
        span_of("directive", text, 2, ".macro", 0)
    ];
    let model = model(text, None, &block(&[MAIN], &spans, &[]));
    let syms = &model.table.symbols;
    assert_eq!(syms.len(),3);
    // parameters come before the declaration and belong to its scope
    assert_eq!(syms[0].name,"msg");
    assert_eq!(syms[0].scope,1);
    assert_eq!(syms[0].detail,SymbolDetail::Parameter { kind: ParamKind::String, description: Some("text to show".to_string()) });
    assert_eq!(syms[1].name,"n");
    assert_eq!(syms[1].detail,SymbolDetail::Parameter { kind: ParamKind::Number, description: Some("repeat count".to_string()) });
    let print = &syms[2];
    assert_eq!(print.kind(),SymbolType::Macro);
    assert_eq!(print.scope,0);
    assert_eq!((print.range.start_col,print.range.end_col),(7,12));
    assert_eq!(syms[0].range,print.range);
    assert_eq!(print.params().len(),2);
    assert_eq!(print.params()[0].kind,ParamKind::String);
    assert_eq!(print.params()[1].description.as_deref(),Some("repeat count"));
}

#[test]
fn builtins() {
    let text = "nop\n";
    let info = format!("[libraries]\nMath;constant;PI\nMath;function;abs;1\n{}",block(&[MAIN], &[], &[]));
    let model = model(text, None, &info);
    assert_eq!(model.table.symbols.len(),0);
    assert_eq!(model.table.builtins.len(),2);
    let abs = &model.table.builtins[1];
    assert!(abs.is_builtin());
    assert_eq!(abs.kind(),SymbolType::Function);
    assert_eq!(abs.params()[0].name,"arg1");
    assert_eq!(abs.doc.as_deref(),Some("Math library"));
    assert_eq!(model.table.all().count(),2);
}

#[test]
fn namespace_once() {
    let text = ".namespace gfx {
}
.namespace gfx {
}
";
    let spans = vec![
        span_of("directive", text, 0, ".namespace", 0),
        span_of("directive", text, 2, ".namespace", 0)
    ];
    let model = model(text, None, &block(&[MAIN], &spans, &[]));
    assert_eq!(model.table.symbols.len(),1);
    assert_eq!(model.arena.len(),3);
}

#[test]
fn other_files() {
    let main = "#import \"lib.asm\"\n  jsr clear\n";
    let lib = "clear:\n  rts\n";
    let spans = vec![
        span_of("ppDirective", main, 0, "#import", 0),
        span_of("symbolReference", main, 1, "clear", 0),
        span_of("label", lib, 0, "clear:", 1)
    ];
    let model = model(main, Some(lib), &block(&[MAIN,super::LIB], &spans, &[]));
    assert_eq!(model.files.len(),2);
    let clear = model.table.symbols.iter().find(|s| s.kind() == SymbolType::NamedLabel).expect("no label");
    assert_eq!(clear.file(),1);
    assert!(!clear.is_main());
}

#[test]
fn deterministic() {
    let text = ".const A = 1\nstart:\n  lda #A\n";
    let spans = vec![
        span_of("directive", text, 0, ".const", 0),
        span_of("label", text, 1, "start:", 0),
        span_of("symbolReference", text, 2, "A", 0)
    ];
    let model = model(text, None, &block(&[MAIN], &spans, &[]));
    let again = SymbolTable::build(&model.info, &model.files, &model.arena, 5);
    assert_eq!(model.table.symbols,again.symbols);
}
