// Command-line interface for the docs conversion pipelines
//
// The binary is a thin shell over docs-babel: it parses arguments, resolves user paths, loads
// configuration, runs one pipeline and reports the outcome. All conversion logic lives in the
// library.
//
// Usage:
//  docs docx-to-md <input.docx> [--out <path.md>]                  - DOCX to Markdown
//  docs md-to-pdf <input.md> [--out <path.pdf>] [--css <path.css>]   - Markdown to PDF
//  docs <input.docx> [--out <path.md>]                             - Same as docx-to-md
//  docs print-css                                                  - Print the default PDF stylesheet
//  docs --list-pipelines                                           - List available pipelines
//
// Output:
//
// On success the output path is printed to stdout. Warnings from the DOCX reader go to stderr
// as `[docx-parser] <kind>: <message>`. Failures print `Error: <message>` and exit with 1.

use docs_cli::paths::{resolve_config_path, resolve_user_path};

use clap::{Arg, ArgAction, ArgMatches, Command, ValueHint};
use docs_babel::formats::{ChromeRenderer, MarkdownFormat};
use docs_babel::{
    default_css, ConversionRequest, DocxToMarkdown, MarkdownToPdf, Pipeline, PipelineRegistry,
};
use docs_config::{DocsConfig, Loader};
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Subcommand assumed when the first argument is not a known command.
const DEFAULT_SUBCOMMAND: &str = "docx-to-md";
const SUBCOMMANDS: &[&str] = &["docx-to-md", "md-to-pdf", "print-css", "help"];

fn build_cli() -> Command {
    Command::new("docs")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Convert DOCX to Markdown and Markdown to PDF")
        .long_about(
            "docs converts Word documents to Markdown and renders Markdown to PDF.\n\n\
            Commands:\n  \
            - docx-to-md: Word document → Markdown (default command)\n  \
            - md-to-pdf:  Markdown → PDF through headless Chrome\n  \
            - print-css:  Print the default PDF stylesheet\n\n\
            Examples:\n  \
            docs report.docx                          # Writes report.md next to the input\n  \
            docs docx-to-md report.docx -o out/r.md   # Explicit output path\n  \
            docs md-to-pdf notes.md --css print.css   # Render with a custom stylesheet",
        )
        .arg_required_else_help(true)
        .subcommand_required(false)
        .arg(
            Arg::new("list-pipelines")
                .long("list-pipelines")
                .help("List available conversion pipelines")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("PATH")
                .help("Path to a docs.toml configuration file")
                .value_hint(ValueHint::FilePath)
                .global(true),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Log pipeline stages to stderr")
                .action(ArgAction::SetTrue)
                .conflicts_with("quiet")
                .global(true),
        )
        .arg(
            Arg::new("quiet")
                .long("quiet")
                .short('q')
                .help("Only log errors")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand(
            Command::new("docx-to-md")
                .about("Convert a Word document to Markdown (default command)")
                .long_about(
                    "Convert a .docx file to Markdown.\n\n\
                    Headings, emphasis, links, lists, tables and images are kept; images are\n\
                    embedded as data URIs. Styles the converter does not understand are\n\
                    reported as warnings and the text is kept as plain paragraphs.\n\n\
                    The output defaults to the input path with a .md extension.",
                )
                .arg(
                    Arg::new("input")
                        .help("Input .docx file")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("out")
                        .long("out")
                        .short('o')
                        .value_name("PATH")
                        .help("Output .md path (defaults to the input with .md)")
                        .value_hint(ValueHint::FilePath),
                ),
        )
        .subcommand(
            Command::new("md-to-pdf")
                .about("Render Markdown to PDF")
                .long_about(
                    "Render a .md or .markdown file to PDF with headless Chrome.\n\n\
                    Exactly one stylesheet is applied: --css if given, otherwise\n\
                    convert.pdf.css from the configuration, otherwise the built-in one\n\
                    (see `docs print-css`). A relative convert.pdf.css is taken from the\n\
                    directory of the config file. Relative image paths resolve against the\n\
                    directory of the input file.\n\n\
                    Chrome is located through convert.pdf.chrome, DOCS_CHROME_BIN,\n\
                    GOOGLE_CHROME_BIN, CHROME_BIN, then PATH.",
                )
                .arg(
                    Arg::new("input")
                        .help("Input .md or .markdown file")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("out")
                        .long("out")
                        .short('o')
                        .value_name("PATH")
                        .help("Output .pdf path (defaults to the input with .pdf)")
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("css")
                        .long("css")
                        .value_name("PATH")
                        .help("Stylesheet replacing the built-in one")
                        .value_hint(ValueHint::FilePath),
                ),
        )
        .subcommand(
            Command::new("print-css")
                .about("Print the default PDF stylesheet")
                .long_about(
                    "Outputs the stylesheet md-to-pdf uses when no --css is given.\n\n\
                    Save it, edit it and pass it back with --css:\n  \
                    docs print-css > print.css",
                ),
        )
}

/// Parse arguments, retrying with the default subcommand for bare invocations.
fn parse_args(args: &[String]) -> Result<ArgMatches, clap::Error> {
    let cli = build_cli();
    match cli.clone().try_get_matches_from(args) {
        Ok(matches) => Ok(matches),
        Err(_) if should_inject_default(args) => {
            let mut injected = vec![args[0].clone(), DEFAULT_SUBCOMMAND.to_string()];
            injected.extend_from_slice(&args[1..]);
            cli.try_get_matches_from(&injected)
        }
        Err(e) => Err(e),
    }
}

/// Whether a failed parse looks like `docs <input> ...` without a command.
fn should_inject_default(args: &[String]) -> bool {
    let rest = args.get(1..).unwrap_or_default();
    let asks_for_info = rest
        .iter()
        .any(|a| matches!(a.as_str(), "-h" | "--help" | "-V" | "--version"));
    let names_command = rest.iter().any(|a| SUBCOMMANDS.contains(&a.as_str()));
    let has_positional = rest.iter().any(|a| !a.starts_with('-'));
    has_positional && !names_command && !asks_for_info
}

fn main() {
    let args: Vec<String> = std::env::args().collect();
    let matches = match parse_args(&args) {
        Ok(m) => m,
        Err(e) => exit_with_clap_error(e),
    };

    init_tracing(matches.get_flag("verbose"), matches.get_flag("quiet"));

    if matches.get_flag("list-pipelines") {
        handle_list_pipelines_command();
        return;
    }

    let config_path = matches.get_one::<String>("config").map(|s| s.as_str());

    match matches.subcommand() {
        Some(("docx-to-md", sub_matches)) => {
            handle_docx_to_md_command(sub_matches, &load_cli_config(config_path))
        }
        Some(("md-to-pdf", sub_matches)) => {
            handle_md_to_pdf_command(sub_matches, &load_cli_config(config_path))
        }
        Some(("print-css", _)) => handle_print_css_command(),
        _ => {
            let _ = build_cli().print_help();
            std::process::exit(1);
        }
    }
}

fn exit_with_clap_error(e: clap::Error) -> ! {
    let _ = e.print();
    std::process::exit(if e.use_stderr() { 1 } else { 0 });
}

fn init_tracing(verbose: bool, quiet: bool) {
    let level = if verbose {
        "debug"
    } else if quiet {
        "error"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_writer(io::stderr)
        .init();
}

/// Settings plus the directory their relative paths are taken from.
struct CliConfig {
    settings: DocsConfig,
    dir: PathBuf,
}

fn handle_docx_to_md_command(sub_matches: &ArgMatches, config: &CliConfig) {
    let pipeline = DocxToMarkdown::new((&config.settings.convert.markdown).into());
    let request = build_request(sub_matches, None);
    run_pipeline(&pipeline, &request);
}

fn handle_md_to_pdf_command(sub_matches: &ArgMatches, config: &CliConfig) {
    let pdf = &config.settings.convert.pdf;
    let markdown = MarkdownFormat::new().with_highlight(pdf.highlight);
    let renderer = match &pdf.chrome {
        Some(chrome) => ChromeRenderer::with_binary(resolve_config_path(chrome, &config.dir)),
        None => ChromeRenderer::new(),
    };
    let pipeline = MarkdownToPdf::with_transducers(Box::new(markdown), Box::new(renderer));

    // --css is relative to the working directory, convert.pdf.css to the config file
    let css = match sub_matches.get_one::<String>("css") {
        Some(css) => Some(resolve_user_path(css)),
        None => pdf
            .css
            .as_deref()
            .map(|css| resolve_config_path(css, &config.dir)),
    };
    let request = build_request(sub_matches, css);
    run_pipeline(&pipeline, &request);
}

fn build_request(sub_matches: &ArgMatches, css: Option<PathBuf>) -> ConversionRequest {
    let Some(input) = sub_matches.get_one::<String>("input") else {
        eprintln!("Error: missing input file");
        std::process::exit(1);
    };
    let mut request = ConversionRequest::new(resolve_user_path(input));
    if let Some(out) = sub_matches.get_one::<String>("out") {
        request = request.with_output(resolve_user_path(out));
    }
    if let Some(css) = css {
        request = request.with_css(css);
    }
    debug!(?request, "conversion request");
    request
}

fn run_pipeline(pipeline: &dyn Pipeline, request: &ConversionRequest) {
    match pipeline.convert(request) {
        Ok(conversion) => {
            for warning in &conversion.warnings {
                eprintln!("[{}] {warning}", pipeline.warning_source());
            }
            println!("{}", conversion.output.display());
        }
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}

fn handle_print_css_command() {
    print!("{}", default_css());
}

fn handle_list_pipelines_command() {
    println!("Available pipelines:\n");
    let registry = PipelineRegistry::default();
    for name in registry.list_pipelines() {
        let Ok(pipeline) = registry.get(&name) else {
            continue;
        };
        let inputs: Vec<String> = pipeline
            .input_extensions()
            .iter()
            .map(|ext| format!(".{ext}"))
            .collect();
        println!(
            "  {name:<12} {} → .{}  {}",
            inputs.join(", "),
            pipeline.output_extension(),
            pipeline.description()
        );
    }
}

/// Defaults, then `./docs.toml`, then `--config`.
///
/// Relative paths inside the config resolve against the `--config` file's directory when one
/// is given, otherwise against the working directory that holds `docs.toml`.
fn load_cli_config(explicit_path: Option<&str>) -> CliConfig {
    let loader = Loader::new().with_optional_file("docs.toml");
    let (loader, dir) = match explicit_path {
        Some(path) => {
            let path = resolve_user_path(path);
            let dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
            (loader.with_file(&path), dir)
        }
        None => (loader, resolve_user_path(".")),
    };

    match loader.build() {
        Ok(settings) => CliConfig { settings, dir },
        Err(err) => {
            eprintln!("Error: Failed to load configuration: {err}");
            std::process::exit(1);
        }
    }
}
