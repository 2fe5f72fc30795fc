//! Lantern - Text-Mode Feed Rendering Engine
//!
//! Entry point for the lantern command-line renderer.

use std::env;
use std::fs;
use std::io::{self, Read};
use std::process;

use lantern::renderer::{Color, StyledRun};
use lantern::{DocumentRenderer, FeedRenderer, RenderOptions, NAME, VERSION};

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    let mut charset = "utf-8".to_string();
    let mut path: Option<String> = None;

    for arg in &args[1..] {
        if arg == "--help" || arg == "-h" {
            print_usage();
            return;
        } else if let Some(label) = arg.strip_prefix("--charset=") {
            charset = label.to_string();
        } else {
            path = Some(arg.clone());
        }
    }

    if let Err(err) = run(path.as_deref(), &charset) {
        eprintln!("{}: {}", NAME, err);
        process::exit(1);
    }
}

fn print_usage() {
    println!("{} v{} - text-mode feed renderer", NAME, VERSION);
    println!();
    println!("Usage: lantern [--charset=LABEL] [FILE]");
    println!();
    println!("Renders the RSS/RDF feed in FILE (or stdin) as styled text.");
}

fn run(path: Option<&str>, charset: &str) -> lantern::Result<()> {
    let data = match path {
        Some(path) => fs::read(path)?,
        None => {
            let mut buffer = Vec::new();
            io::stdin().read_to_end(&mut buffer)?;
            buffer
        }
    };

    let renderer = FeedRenderer::with_options(RenderOptions {
        document_charset: charset.to_string(),
        ..RenderOptions::default()
    });
    let document = renderer.render(&data)?;

    if let Some(title) = &document.title {
        println!("== {} ==", title);
    }

    for y in 0..document.canvas.height() {
        println!("{}", paint_line(document.canvas.lines()[y].runs()));
    }

    if !document.canvas.links().is_empty() {
        println!();
        println!("Links:");
        for link in document.canvas.links() {
            println!("  {} -> {}", link.label, link.target);
        }
    }

    Ok(())
}

/// Render one canvas row with ANSI escapes
fn paint_line(runs: &[StyledRun]) -> String {
    let mut out = String::new();
    let mut column = 0;
    let mut sorted: Vec<&StyledRun> = runs.iter().collect();
    sorted.sort_by_key(|run| run.x);

    for run in sorted {
        while column < run.x {
            out.push(' ');
            column += 1;
        }
        out.push_str(&escape_for(run));
        out.push_str(&run.text);
        out.push_str("\x1b[0m");
        column += run.text.chars().count();
    }
    out
}

fn escape_for(run: &StyledRun) -> String {
    let mut escape = String::new();
    if run.style.bold {
        escape.push_str("\x1b[1m");
    }
    if run.style.underline {
        escape.push_str("\x1b[4m");
    }
    if let Some(Color { r, g, b, .. }) = run.style.color {
        escape.push_str(&format!("\x1b[38;2;{};{};{}m", r, g, b));
    }
    escape
}
