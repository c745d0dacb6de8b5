#[cfg(feature = "viewer")]
mod app;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use tag_lens::catalog::TagCatalog;
use tag_lens::dom::Document;
use tag_lens::highlight::engine::{CategoryReport, HighlightEngine};
use tag_lens::net::PageSource;

/// Cross-highlight skill tags on a portfolio page.
#[derive(Parser, Debug)]
#[command(name = "tag-lens", version, about)]
struct Cli {
    /// Path or http(s) URL of the page
    page: String,

    /// Catalog TOML (default: built-in catalog)
    #[arg(short, long, value_name = "FILE")]
    catalog: Option<PathBuf>,

    /// Print the category report instead of opening a window
    #[arg(long)]
    headless: bool,

    /// Click the first tag with this label (headless, repeatable)
    #[arg(long = "click", value_name = "LABEL")]
    clicks: Vec<String>,

    /// Print the resulting document HTML (headless)
    #[arg(long)]
    dump: bool,
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let catalog = match cli.catalog {
        Some(ref path) => match TagCatalog::from_path(path) {
            Ok(catalog) => catalog,
            Err(e) => {
                eprintln!("error: {}", e);
                return ExitCode::FAILURE;
            }
        },
        None => TagCatalog::default(),
    };
    let source = PageSource::parse(&cli.page);

    if cli.headless {
        return match run_headless(&cli, &source, catalog) {
            Ok(()) => ExitCode::SUCCESS,
            Err(message) => {
                eprintln!("error: {}", message);
                ExitCode::FAILURE
            }
        };
    }

    if !cli.clicks.is_empty() || cli.dump {
        log::warn!("--click and --dump only apply with --headless");
    }
    run_viewer(source, catalog)
}

fn run_headless(cli: &Cli, source: &PageSource, catalog: TagCatalog) -> Result<(), String> {
    let mut document = source.load().map_err(|e| e.to_string())?;
    let mut engine = HighlightEngine::attach(&mut document, catalog).map_err(|e| e.to_string())?;

    for label in &cli.clicks {
        match engine.click_label(&mut document, label) {
            Ok(Some(toggle)) => log::info!("{} -> {:?}", label, toggle),
            Ok(None) => log::warn!("No tag labelled '{}' on the page", label),
            Err(e) => return Err(e.to_string()),
        }
    }

    let reports = engine.report(&document).map_err(|e| e.to_string())?;
    print_report(&document, &reports);

    if cli.dump {
        println!("{}", document.outer_html(document.root()));
    }
    Ok(())
}

fn print_report(document: &Document, reports: &[CategoryReport]) {
    if !document.title.is_empty() {
        println!("{}", document.title);
        println!();
    }
    for report in reports {
        let button = match report.button_active {
            Some(true) => "button: active",
            Some(false) => "button: idle",
            None => "button: none",
        };
        let full = if report.fully_active { ", fully active" } else { "" };
        println!("{} {} ({}{})", report.name, report.color, button, full);
        for label in &report.labels {
            println!(
                "  {:<24} {} element(s), {} active",
                label.label, label.elements, label.active
            );
        }
    }
}

#[cfg(feature = "viewer")]
fn run_viewer(source: PageSource, catalog: TagCatalog) -> ExitCode {
    use eframe::egui;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1100.0, 800.0]),
        ..Default::default()
    };

    let result = eframe::run_native(
        "tag-lens",
        options,
        Box::new(move |cc| {
            let mut app = app::TagLensApp::new(&source, catalog);
            app.reload(&cc.egui_ctx);
            Ok(Box::new(app))
        }),
    );
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: failed to start viewer: {}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(not(feature = "viewer"))]
fn run_viewer(_source: PageSource, _catalog: TagCatalog) -> ExitCode {
    eprintln!("error: built without the 'viewer' feature, use --headless");
    ExitCode::FAILURE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_repeated_clicks() {
        let cli = Cli::parse_from([
            "tag-lens", "--headless", "--click", "Go", "--click", "Rust", "--dump", "page.html",
        ]);
        assert!(cli.headless);
        assert!(cli.dump);
        assert_eq!(cli.clicks, vec!["Go".to_string(), "Rust".to_string()]);
        assert_eq!(cli.page, "page.html");
        assert!(cli.catalog.is_none());
    }

    #[test]
    fn catalog_flag_takes_a_path() {
        let cli = Cli::parse_from(["tag-lens", "-c", "skills.toml", "https://example.com"]);
        assert_eq!(cli.catalog, Some(PathBuf::from("skills.toml")));
        assert!(!cli.headless);
    }
}
