use clap::Parser;
use owo_colors::OwoColorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::path::Path;

use polka::cli::{generate_completions, AppConfig, Args, Commands};
use polka::diagnostic::render_diagnostics;
use polka::interpreter;

fn main() {
    let args = Args::parse();

    if let Some(Commands::Complete { shell }) = args.command {
        generate_completions(shell);
        return;
    }

    let config = AppConfig::from_args(&args);

    verbose_log(&config, "Starting polka");

    if let Some(expr) = &args.expr {
        verbose_log(&config, &format!("Evaluating expression: {}", expr));
        if !evaluate_line(expr, "<expr>", &config) {
            std::process::exit(1);
        }
        return;
    }

    if let Some(file) = &args.file {
        run_file(file, &config);
        return;
    }

    run_repl(&config);
}

/// Feed one line through the pipeline. Semantic faults print as plain
/// values on stdout; only a syntax failure returns false.
fn evaluate_line(line: &str, source_name: &str, config: &AppConfig) -> bool {
    match interpreter::parse_and_eval_with_diagnostics(line) {
        Ok(value) => {
            println!("{}", value);
            true
        }
        Err(diagnostics) => {
            let rendered = render_diagnostics(line, source_name, &diagnostics, config.color_enabled);
            eprint!("{}", rendered);
            false
        }
    }
}

fn run_file(path: &Path, config: &AppConfig) {
    verbose_log(config, &format!("Reading expressions from {}", path.display()));

    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            error_message(config, &format!("Failed to read {}: {}", path.display(), e));
            std::process::exit(1);
        }
    };

    let source_name = path.display().to_string();
    for line in content.lines() {
        if line.trim().is_empty() {
            continue;
        }
        // A bad line is reported and the rest still run
        evaluate_line(line, &source_name, config);
    }
}

fn run_repl(config: &AppConfig) {
    if !config.verbose {
        println!("polka {}", env!("CARGO_PKG_VERSION"));
        println!("Type an expression like `+ 1 (* 2 3)`. Exit with Ctrl-D.");
        println!();
    } else {
        verbose_log(config, "Entering interactive mode");
    }

    let mut editor = match DefaultEditor::new() {
        Ok(editor) => editor,
        Err(e) => {
            error_message(config, &format!("Failed to initialize line editor: {}", e));
            std::process::exit(1);
        }
    };

    loop {
        match editor.readline("polka> ") {
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }
                let _ = editor.add_history_entry(line.as_str());
                evaluate_line(&line, "<input>", config);
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                verbose_log(config, "Leaving interactive mode");
                break;
            }
            Err(e) => {
                error_message(config, &format!("Error reading input: {}", e));
                break;
            }
        }
    }
}

fn verbose_log(config: &AppConfig, message: &str) {
    if config.verbose {
        eprintln!("[polka:debug] {}", message);
    }
}

fn error_message(config: &AppConfig, message: &str) {
    if config.color_enabled {
        eprintln!("{}", message.red().bold());
    } else {
        eprintln!("{}", message);
    }
}
