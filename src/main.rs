//! # Command Line Interface
//!
//! Offline inspection of captured assembler output.  Every subcommand takes
//! a capture, which is either the stdout of a Kick Assembler run with
//! `-asminfoToStdOut` or the asminfo file itself.

use clap::{arg,crate_version,Command};
use env_logger;
use colored::Colorize;
use lsp_types as lsp;
use log::error;
use kickass_lsp::lang::kick;
use kickass_lsp::lang::kick::project::{Model,model_from_capture,read_from_disk};
use kickass_lsp::lang::server::{Checkpoint,Hovers};

const RCH: &str = "unreachable was reached";

fn read_file(path: &str) -> Result<String,Box<dyn std::error::Error>> {
    match std::fs::read_to_string(path) {
        Ok(s) => Ok(s),
        Err(e) => {
            error!("could not read {}",path);
            Err(Box::new(e))
        }
    }
}

fn load_model(cmd: &clap::ArgMatches) -> Result<(Model,String),Box<dyn std::error::Error>> {
    let capture = read_file(cmd.get_one::<String>("input").expect(RCH))?;
    let src_path = cmd.get_one::<String>("source").expect(RCH);
    let src = read_file(src_path)?;
    let peek = match cmd.try_get_one::<usize>("peek") {
        Ok(Some(n)) => *n,
        _ => 5
    };
    Ok((model_from_capture(&capture, src_path, &src, peek, &read_from_disk)?,src))
}

/// The query surface wants a project, make one around the model.
fn project_for(src_path: &str, src: &str, model: Model) -> Result<kick::project::Project,Box<dyn std::error::Error>> {
    let doc = kickass_lsp::lang::Document::from_file_path(std::path::Path::new(src_path))?;
    let mut proj = kick::project::Project::new(doc.uri, src, None);
    proj.set_model(model);
    Ok(proj)
}

fn position(cmd: &clap::ArgMatches) -> (u32,u32) {
    let row = *cmd.get_one::<u32>("line").expect(RCH);
    let col = *cmd.get_one::<u32>("col").expect(RCH);
    (row,col)
}

fn query_cmd(name: &'static str, about: &'static str) -> Command {
    Command::new(name)
        .arg(arg!(-i --input <PATH> "captured stdout or asminfo file").required(true))
        .arg(arg!(-s --source <PATH> "source file that was assembled").required(true))
        .arg(arg!(-l --line <LINE> "0-based line").required(true).value_parser(clap::value_parser!(u32)))
        .arg(arg!(-c --col <COL> "0-based column").required(true).value_parser(clap::value_parser!(u32)))
        .about(about)
}

fn run() -> Result<(),Box<dyn std::error::Error>> {
    let long_help =
"kickass is always invoked with exactly one subcommand.
The input is captured output of Kick Assembler run with `-asminfo all -asminfoToStdOut`,
or the file written by `-asminfofile`.
Set RUST_LOG environment variable to control logging level.
  levels: trace,debug,info,warn,error

Examples:
---------
dump the asminfo:     `kickass info -i capture.txt`
dump the symbols:     `kickass symbols -i capture.txt -s main.asm`
hover at a position:  `kickass hover -i capture.txt -s main.asm -l 10 -c 3`
memory map:           `kickass memmap -i capture.txt`";

    let mut main_cmd = Command::new("kickass")
        .about("Inspects Kick Assembler analysis output.")
        .after_long_help(long_help)
        .subcommand_required(true)
        .arg_required_else_help(true)
        .version(crate_version!());
    main_cmd = main_cmd.subcommand(Command::new("info")
        .arg(arg!(-i --input <PATH> "captured stdout or asminfo file").required(true))
        .about("parse the asminfo block and write it as JSON"));
    main_cmd = main_cmd.subcommand(Command::new("symbols")
        .arg(arg!(-i --input <PATH> "captured stdout or asminfo file").required(true))
        .arg(arg!(-s --source <PATH> "source file that was assembled").required(true))
        .arg(arg!(-p --peek <LINES> "lines of code shown with labels").required(false).value_parser(clap::value_parser!(usize)))
        .about("build the symbol table and write it as JSON"));
    main_cmd = main_cmd.subcommand(query_cmd("hover","write the hover at a position as markdown"));
    main_cmd = main_cmd.subcommand(query_cmd("def","write the definition of the token at a position as JSON"));
    main_cmd = main_cmd.subcommand(Command::new("diags")
        .arg(arg!(-i --input <PATH> "captured stdout or asminfo file").required(true))
        .arg(arg!(-s --source <PATH> "source file that was assembled").required(true))
        .about("write the diagnostics for the source file as JSON"));
    main_cmd = main_cmd.subcommand(Command::new("memmap")
        .arg(arg!(-i --input <PATH> "captured stdout with -showmem output").required(true))
        .about("extract the memory map and write it as JSON"));

    let matches = main_cmd.get_matches();

    if let Some(cmd) = matches.subcommand_matches("info") {
        let capture = read_file(cmd.get_one::<String>("input").expect(RCH))?;
        let block = kick::info::extract_block(&capture).unwrap_or(&capture);
        let info = kick::info::CompileInfo::parse(block, &[]);
        println!("{}",serde_json::to_string_pretty(&info)?);
        return Ok(());
    }

    if let Some(cmd) = matches.subcommand_matches("symbols") {
        let (model,_) = load_model(cmd)?;
        let syms: Vec<&kick::Symbol> = model.table.all().collect();
        println!("{}",serde_json::to_string_pretty(&syms)?);
        return Ok(());
    }

    if let Some(cmd) = matches.subcommand_matches("hover") {
        let (model,_) = load_model(cmd)?;
        let (row,col) = position(cmd);
        let mut provider = kick::hovers::HoverProvider::new();
        provider.use_shared_model(Some(std::sync::Arc::new(model)));
        if let Some(hov) = provider.get(String::new(), row as isize, col as isize) {
            if let lsp::HoverContents::Markup(markup) = hov.contents {
                println!("{}",markup.value);
            }
        }
        return Ok(());
    }

    if let Some(cmd) = matches.subcommand_matches("def") {
        let (model,src) = load_model(cmd)?;
        let (row,col) = position(cmd);
        let proj = project_for(cmd.get_one::<String>("source").expect(RCH), &src, model)?;
        let pos = lsp::Position::new(row,col);
        let loc = lsp::Location::new(proj.uri().clone(), lsp::Range::new(pos,pos));
        println!("{}",serde_json::to_string_pretty(&proj.get_defs(&loc))?);
        return Ok(());
    }

    if let Some(cmd) = matches.subcommand_matches("diags") {
        let (model,src) = load_model(cmd)?;
        let proj = project_for(cmd.get_one::<String>("source").expect(RCH), &src, model)?;
        println!("{}",serde_json::to_string_pretty(&proj.get_diags())?);
        return Ok(());
    }

    if let Some(cmd) = matches.subcommand_matches("memmap") {
        let capture = read_file(cmd.get_one::<String>("input").expect(RCH))?;
        let segs = kick::memory_map::parse(&capture);
        println!("{}",serde_json::to_string_pretty(&segs)?);
        return Ok(());
    }

    error!("No subcommand was found, try `kickass --help`");
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).unwrap_or(());
    if let Err(e) = run() {
        eprintln!("{} {}","error:".red().bold(),e);
        std::process::exit(1);
    }
}
