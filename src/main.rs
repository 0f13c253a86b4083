use clap::Parser;
use colored::Colorize;
use davc::lexer::LexerError;
use davc::parser::ParseError;
use davc::translator::TranslateError;
use davc::{compile, translate};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path of input dav file
    file: String,

    /// Specify path of output C file
    #[arg(long, short)]
    output: Option<String>,

    /// Emit only the translated program, without includes and runtime helpers
    #[arg(long)]
    no_runtime: bool,

    /// Print tokens, AST and generated C
    #[arg(long)]
    debug: bool,
}

fn main() -> std::io::Result<()> {
    let cli = Cli::parse();

    let path = Path::new(&cli.file);
    let text = fs::read_to_string(path)?;

    let out_path = match cli.output {
        Some(out) => PathBuf::from(out),
        None => path.with_extension("c"),
    };
    if fs::canonicalize(&out_path).ok() == Some(fs::canonicalize(path)?) {
        let msg = format!(
            "Error: output {} would overwrite the input file",
            out_path.display()
        );
        eprintln!("{}", msg.red());
        std::process::exit(1);
    }

    let result = if cli.no_runtime {
        translate(&text, cli.debug)
    } else {
        compile(&text, cli.debug)
    };

    let c_code = match result {
        Ok(c_code) => c_code,
        Err(err) => {
            let token = err
                .downcast_ref::<LexerError>()
                .map(|le| &le.token)
                .or_else(|| err.downcast_ref::<ParseError>().map(|pe| &pe.token))
                .or_else(|| err.downcast_ref::<TranslateError>().map(|te| te.token()));

            let msg = match token {
                Some(token) => format!(
                    "Error {}:{} (at {:?}): {}",
                    token.line,
                    token.column,
                    text.get(token.span.0..token.span.1).unwrap_or_default(),
                    err
                ),
                None => format!("Error: {err}"),
            };
            eprintln!("{}", msg.red());
            std::process::exit(1);
        }
    };

    fs::write(&out_path, c_code)?;
    println!("Translated {} to {}", path.display(), out_path.display());

    Ok(())
}
