use clap::{Arg, ArgAction, Command, ValueHint};
use clap_complete::{generate_to, shells::*};
use std::env;
use std::io::Error;

// Mirror of build_cli() in src/main.rs
// We need to duplicate this here since build scripts can't access src/ modules
fn build_cli() -> Command {
    Command::new("docs")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Convert DOCX to Markdown and Markdown to PDF")
        .arg(
            Arg::new("list-pipelines")
                .long("list-pipelines")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .value_hint(ValueHint::FilePath)
                .global(true),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("quiet")
                .long("quiet")
                .short('q')
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand(
            Command::new("docx-to-md")
                .about("Convert a Word document to Markdown")
                .arg(Arg::new("input").index(1).value_hint(ValueHint::FilePath))
                .arg(
                    Arg::new("out")
                        .long("out")
                        .short('o')
                        .value_hint(ValueHint::FilePath),
                ),
        )
        .subcommand(
            Command::new("md-to-pdf")
                .about("Render Markdown to PDF")
                .arg(Arg::new("input").index(1).value_hint(ValueHint::FilePath))
                .arg(
                    Arg::new("out")
                        .long("out")
                        .short('o')
                        .value_hint(ValueHint::FilePath),
                )
                .arg(Arg::new("css").long("css").value_hint(ValueHint::FilePath)),
        )
        .subcommand(Command::new("print-css").about("Print the default PDF stylesheet"))
}

fn main() -> Result<(), Error> {
    let outdir = match env::var_os("OUT_DIR") {
        None => return Ok(()),
        Some(outdir) => outdir,
    };

    let mut cmd = build_cli();

    // Generate completions for bash
    generate_to(Bash, &mut cmd, "docs", &outdir)?;

    // Generate completions for zsh
    generate_to(Zsh, &mut cmd, "docs", &outdir)?;

    // Generate completions for fish
    generate_to(Fish, &mut cmd, "docs", &outdir)?;

    println!("cargo:warning=Shell completions generated in {outdir:?}");

    Ok(())
}
