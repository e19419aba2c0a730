//! pagelayout CLI - PDF page layout normalization tool

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use colored::Colorize;

use pagelayout::{
    detect_input_from_path, extract_file_shapes, load_pages_file, normalize_pages, render,
    ErrorMode, InputKind, JsonFormat, LayoutOptions, LopdfSource, NormalizedPage, PageSelection,
    PageSource,
};

#[derive(Parser)]
#[command(name = "pagelayout")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Recover format shapes and normalize PDF page layouts", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Normalize decoded pages from a JSON page dump
    Normalize {
        /// Page dump (one page object or an array of pages)
        #[arg(value_name = "PAGES")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,

        /// Height of shapes recovered from horizontal rules
        #[arg(long, default_value = "0.5", env = "PAGELAYOUT_LINE_THICKNESS")]
        line_thickness: f32,

        /// Page range (e.g., "1-10", "1,3,5")
        #[arg(long)]
        pages: Option<String>,

        /// Process pages one at a time
        #[arg(long)]
        sequential: bool,

        /// Fail on the first page issue
        #[arg(long)]
        strict: bool,
    },

    /// List format shapes recovered from a PDF
    Shapes {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Page range (e.g., "1-10", "1,3,5")
        #[arg(long)]
        pages: Option<String>,

        /// Height of shapes recovered from horizontal rules
        #[arg(long, default_value = "0.5", env = "PAGELAYOUT_LINE_THICKNESS")]
        line_thickness: f32,

        /// Print JSON instead of a listing
        #[arg(long)]
        json: bool,
    },

    /// Show input information
    Info {
        /// Input PDF file or page dump
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Show version information
    Version,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Normalize {
            input,
            output,
            compact,
            line_thickness,
            pages,
            sequential,
            strict,
        } => build_options(line_thickness, pages.as_deref(), sequential, strict).and_then(
            |options| cmd_normalize(&input, output.as_deref(), compact, &options),
        ),
        Commands::Shapes {
            input,
            pages,
            line_thickness,
            json,
        } => build_options(line_thickness, pages.as_deref(), false, false)
            .and_then(|options| cmd_shapes(&input, &options, json)),
        Commands::Info { input } => cmd_info(&input),
        Commands::Version => {
            cmd_version();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn build_options(
    line_thickness: f32,
    pages: Option<&str>,
    sequential: bool,
    strict: bool,
) -> Result<LayoutOptions, Box<dyn std::error::Error>> {
    let mut options = LayoutOptions::new()
        .with_line_thickness(line_thickness)
        .with_parallel(!sequential);

    if strict {
        options = options.with_error_mode(ErrorMode::Strict);
    }

    if let Some(pages) = pages {
        let selection = PageSelection::parse(pages)
            .map_err(|e| pagelayout::Error::InvalidPageRange(format!("{}: {}", pages, e)))?;
        options = options.with_pages(selection);
    }

    Ok(options)
}

fn cmd_normalize(
    input: &Path,
    output: Option<&Path>,
    compact: bool,
    options: &LayoutOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let pages = load_pages_file(input)?;
    let normalized = normalize_pages(pages, options)?;
    report_issues(&normalized);

    let format = if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };
    let json = render::pages_to_json(&normalized, format)?;

    if let Some(output_path) = output {
        fs::write(output_path, &json)?;
        println!(
            "{} Normalized {} page(s) to {}",
            "✓".green(),
            normalized.len(),
            output_path.display()
        );
    } else {
        println!("{}", json);
    }

    Ok(())
}

fn report_issues(pages: &[NormalizedPage]) {
    for page in pages {
        for issue in &page.issues {
            eprintln!(
                "{} page {}: {}",
                "Warning".yellow().bold(),
                page.number,
                issue
            );
        }
    }
}

fn cmd_shapes(
    input: &Path,
    options: &LayoutOptions,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let pages = extract_file_shapes(input, options)?;

    if json {
        println!("{}", render::to_json(&pages, JsonFormat::Pretty)?);
        return Ok(());
    }

    for page in &pages {
        println!(
            "{} {} ({} x {})",
            "Page".cyan().bold(),
            page.page,
            page.width,
            page.height
        );
        for rect in &page.rects {
            let style = rect
                .style
                .map(|s| format!("{:?}", s))
                .unwrap_or_else(|| "-".to_string());
            let b = rect.bbox;
            println!(
                "  [{:8.2} {:8.2} {:8.2} {:8.2}] {} {}",
                b.x0, b.y0, b.x1, b.y1, rect.color, style
            );
        }
        for issue in &page.issues {
            println!("  {} {}", "Warning".yellow().bold(), issue);
        }
    }

    Ok(())
}

fn cmd_info(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", "Input Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}: {}", "File".bold(), input.display());

    match detect_input_from_path(input)? {
        InputKind::Pdf(format) => {
            let source = LopdfSource::load_file(input)?;
            println!("{}: {}", "Format".bold(), format);
            println!("{}: {}", "Pages".bold(), source.page_numbers().len());
            println!(
                "{}: {}",
                "Encrypted".bold(),
                if source.is_encrypted() { "Yes" } else { "No" }
            );
        }
        InputKind::PageJson => {
            let pages = load_pages_file(input)?;
            let blocks: usize = pages.iter().map(|p| p.blocks.len()).sum();
            let annotations: usize = pages.iter().map(|p| p.annotations.len()).sum();
            println!("{}: page dump", "Format".bold());
            println!("{}: {}", "Pages".bold(), pages.len());
            println!("{}: {}", "Blocks".bold(), blocks);
            println!("{}: {}", "Annotations".bold(), annotations);
        }
    }

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "pagelayout".green().bold(), env!("CARGO_PKG_VERSION"));
    println!("Recover format shapes and normalize PDF page layouts");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_build_options_flags() {
        let options = build_options(1.5, Some("2-3"), true, true).unwrap();
        assert_eq!(options.line_thickness, 1.5);
        assert!(!options.parallel);
        assert_eq!(options.error_mode, ErrorMode::Strict);
        assert!(options.pages.includes(2));
        assert!(!options.pages.includes(1));
    }

    #[test]
    fn test_build_options_bad_pages() {
        assert!(build_options(0.5, Some("5-2"), false, false).is_err());
    }

    #[test]
    fn test_normalize_writes_output() {
        let mut input = tempfile::NamedTempFile::new().unwrap();
        input
            .write_all(br#"{"width": 612, "height": 792, "stream": "0 0 1 rg 72 700 100 12 re f"}"#)
            .unwrap();
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out.json");

        let options = build_options(0.5, None, true, false).unwrap();
        cmd_normalize(input.path(), Some(&output), true, &options).unwrap();

        let json = fs::read_to_string(&output).unwrap();
        assert!(json.starts_with('['));
        assert!(json.contains(r#""number":1"#));
    }

    #[test]
    fn test_normalize_strict_fails_on_issue() {
        let mut input = tempfile::NamedTempFile::new().unwrap();
        input
            .write_all(br#"{"width": 612, "height": 792}"#)
            .unwrap();

        let options = build_options(0.5, None, false, true).unwrap();
        assert!(cmd_normalize(input.path(), None, true, &options).is_err());
    }
}
