use super::super::source::{SourceFile,ScopeArena,clean_comments,split_lines};
use super::super::info::CompileInfo;
use super::super::ScopeKind;
use super::{span_of,block,MAIN};

fn build(text: &str, spans: &[String]) -> (SourceFile,ScopeArena) {
    let info = CompileInfo::parse(&block(&[MAIN], spans, &[]), &[]);
    let mut arena = ScopeArena::new();
    let file = SourceFile::new(0, MAIN, text, true, &info.spans_in_file(0), &mut arena);
    (file,arena)
}

#[test]
fn comments_keep_columns() {
    let lines = split_lines("  lda #1 // load\n.text \"a//b\" /* x */ nop\n/* one\ntwo */ rts");
    let clean = clean_comments(&lines);
    assert_eq!(clean[0],"  lda #1        ");
    assert_eq!(clean[1],".text \"a//b\"         nop");
    assert_eq!(clean[2],"      ");
    assert_eq!(clean[3],"       rts");
    for i in 0..lines.len() {
        assert_eq!(clean[i].chars().count(),lines[i].chars().count());
    }
}

#[test]
fn crlf_lines() {
    let lines = split_lines("nop\r\nrts\r\n");
    assert_eq!(lines,vec!["nop","rts",""]);
}

#[test]
fn braced_scopes() {
    let text = ".namespace sprites {
  .label x = 3
}
start:
{
  inx
}
.macro foo(a,b) {
  lda #a
}
";
    let spans = vec![
        span_of("directive", text, 0, ".namespace", 0),
        span_of("directive", text, 1, ".label", 0),
        span_of("label", text, 3, "start:", 0),
        span_of("directive", text, 7, ".macro", 0)
    ];
    let (file,arena) = build(text, &spans);
    assert_eq!(arena.len(),4);
    let sprites = arena.find_by_name("sprites").expect("no namespace");
    assert_eq!(sprites.kind,ScopeKind::Namespace);
    assert_eq!(sprites.parent,Some(0));
    let start = arena.find_by_name("start").expect("no label scope");
    assert_eq!(start.kind,ScopeKind::NamedLabel);
    assert_eq!(start.line,3);
    let foo = arena.find_at(0, 7).expect("no macro scope");
    assert_eq!(foo.name,"foo");
    assert_eq!(foo.kind,ScopeKind::Macro);
    // scope in effect at the start of each line
    let tags: Vec<usize> = (0..10).map(|row| file.scope_at(row)).collect();
    assert_eq!(tags,vec![0,sprites.id,sprites.id,0,0,start.id,start.id,0,foo.id,foo.id]);
    assert_eq!(file.scopes(&arena).len(),3);
}

#[test]
fn label_without_block() {
    let text = "loop:
  dex
  bne loop
";
    let spans = vec![span_of("label", text, 0, "loop:", 0)];
    let (file,arena) = build(text, &spans);
    assert_eq!(arena.len(),1);
    assert_eq!(file.scope_at(1),0);
}

#[test]
fn file_namespace() {
    let text = "// gfx
.filenamespace gfx
.label screen = $0400
.namespace inner {
  nop
}
rts
";
    let spans = vec![
        span_of("comment", text, 0, "// gfx", 0),
        span_of("directive", text, 1, ".filenamespace", 0),
        span_of("directive", text, 2, ".label", 0),
        span_of("directive", text, 3, ".namespace", 0)
    ];
    let (file,arena) = build(text, &spans);
    let gfx = arena.find_by_name("gfx").expect("no file namespace");
    let inner = arena.find_by_name("inner").expect("no inner namespace");
    assert_eq!(inner.parent,Some(gfx.id));
    assert_eq!(file.scope_at(0),0);
    assert_eq!(file.scope_at(2),gfx.id);
    assert_eq!(file.scope_at(4),inner.id);
    assert_eq!(file.scope_at(6),gfx.id);
}

#[test]
fn brace_on_next_line() {
    let text = ".namespace sound
{
  nop
}
";
    let spans = vec![span_of("directive", text, 0, ".namespace", 0)];
    let (file,arena) = build(text, &spans);
    let sound = arena.find_by_name("sound").expect("no namespace");
    assert_eq!(file.scope_at(2),sound.id);
    assert_eq!(file.scope_at(4),0);
}

#[test]
fn braces_in_comments() {
    let text = ".namespace a { // }
  nop /* { */
}
nop
";
    let spans = vec![span_of("directive", text, 0, ".namespace", 0)];
    let (file,arena) = build(text, &spans);
    let a = arena.find_by_name("a").expect("no namespace");
    assert_eq!(file.scope_at(1),a.id);
    assert_eq!(file.scope_at(2),a.id);
    assert_eq!(file.scope_at(3),0);
}
