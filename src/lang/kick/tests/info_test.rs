use std::path::Path;
use super::super::info::{CompileInfo,LibraryKind,extract_block,detect_version};
use super::super::SyntaxKind;

const FULL: &str = "[libraries]
Math;constant;PI
Math;function;abs;1
[directives]
.align;.align $100;Aligns the memory position.
[preprocessorDirectives]
#define;#define DEBUG;Defines a preprocessor symbol.
[files]
0;/work/main.asm
1;/opt/KickAss.jar:/include/autoinclude.asm
2;/work/lib.asm
[syntax]
label;1,1,1,5,0
mnemonic;2,3,2,5,0
somethingNew;2,3,2,5,0
symbolReference;2,7,2,11,0
comment;3,1,3,12,2
[errors]
Error;2,7,2,11,0;Unknown symbol 'star;t'
[version]
5.25
";

#[test]
fn sections() {
    let info = CompileInfo::parse(FULL, &["/work/main.asm".to_string()]);
    assert_eq!(info.libraries.len(),2);
    assert_eq!(info.libraries[0].kind,LibraryKind::Constant);
    assert_eq!(info.libraries[1].name,"abs");
    assert_eq!(info.libraries[1].args,1);
    assert_eq!(info.directives[0].name,".align");
    assert_eq!(info.directives[0].description,"Aligns the memory position.");
    assert_eq!(info.preprocessors[0].name,"#define");
    assert_eq!(info.files.len(),3);
    assert_eq!(info.version,Some("5.25".to_string()));
}

#[test]
fn files() {
    let info = CompileInfo::parse(FULL, &["/work/main.asm".to_string()]);
    assert!(info.files[0].is_current);
    assert!(!info.files[0].is_system);
    assert!(info.files[1].is_system);
    assert!(!info.files[1].is_current);
    assert!(!info.files[2].is_current);
    assert!(info.has_current);
    assert_eq!(info.current_file().map(|f| f.index),Some(0));
    let other = CompileInfo::parse(FULL, &["/work/other.asm".to_string()]);
    assert!(!other.has_current);
    assert!(other.current_file().is_none());
}

#[test]
fn spans() {
    let info = CompileInfo::parse(FULL, &[]);
    // unknown kind is dropped
    assert_eq!(info.spans.len(),4);
    assert_eq!(info.spans[0].kind,SyntaxKind::Label);
    let r = info.spans[0].range;
    assert_eq!((r.file,r.start_line,r.start_col,r.end_line,r.end_col),(0,0,0,0,5));
    let r = info.spans[2].range;
    assert_eq!((r.start_line,r.start_col,r.end_col),(1,6,11));
    assert_eq!(info.spans_in_file(2).len(),1);
    assert_eq!(info.spans_in_file(2)[0].kind,SyntaxKind::Comment);
}

#[test]
fn errors() {
    let info = CompileInfo::parse(FULL, &[]);
    assert_eq!(info.errors.len(),1);
    assert_eq!(info.errors[0].level,"Error");
    assert_eq!(info.errors[0].message,"Unknown symbol 'star;t'");
    assert_eq!(info.errors_in_file(0).len(),1);
    assert_eq!(info.errors_in_file(2).len(),0);
}

#[test]
fn malformed_records() {
    let block = "[files]\nnot a record\nx;/work/a.asm\n[syntax]\nlabel;1,1\nlabel;a,b,c,d,e\n[errors]\nError;1,1,1,1\n";
    let info = CompileInfo::parse(block, &[]);
    assert_eq!(info,CompileInfo::default());
}

#[test]
fn delimited_block() {
    let stdout = format!("Kick Assembler V5.25\nparsing\n### ASMINFO START ###\n{}### ASMINFO END ###\nMade 1 asm pass.\n",FULL);
    let block = extract_block(&stdout).expect("no block");
    assert!(block.contains("[files]"));
    assert!(!block.contains("Made 1"));
    let info = CompileInfo::from_output(&stdout, Path::new("/nonexistent/asminfo.txt"), &[]);
    assert_eq!(info.files.len(),3);
}

#[test]
fn missing_block() {
    assert!(extract_block("no info here").is_none());
    let info = CompileInfo::from_output("no info here", Path::new("/nonexistent/asminfo.txt"), &[]);
    assert_eq!(info,CompileInfo::default());
}

#[test]
fn fallback_file() {
    let dir = tempfile::tempdir().expect("no temp dir");
    let path = dir.path().join("asminfo.txt");
    std::fs::write(&path, FULL).expect("could not write");
    let info = CompileInfo::from_output("Kick Assembler V5.25", &path, &[]);
    assert_eq!(info.files.len(),3);
}

#[test]
fn version() {
    let info = CompileInfo::parse("[files]\n0;/work/main.asm\n", &[]);
    assert_eq!(detect_version(&info, "Kick Assembler V5.24 by Mads Nielsen"),Some("5.24".to_string()));
    assert_eq!(detect_version(&info, "no version"),None);
    let info = CompileInfo::parse(FULL, &[]);
    assert_eq!(detect_version(&info, "Kick Assembler V5.24"),Some("5.25".to_string()));
}
