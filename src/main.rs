mod menu;

// Only compile the UI module when the TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

use anyhow::Result;
use estate_register::{load_file, FileSource, ListingRegistry, LoadReport, VERSION};
use std::env;
use std::path::Path;

const DEFAULT_DATA_FILE: &str = "data.txt";

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    if args.len() > 1 && args[1] == "tui" {
        // Interactive table browser
        run_tui_mode(data_path(args.get(2)))?;
    } else if args.len() > 1 && args[1] == "export" {
        // JSON to stdout
        run_export_mode(data_path(args.get(2)))?;
    } else {
        // Console menu (default)
        run_menu_mode(data_path(args.get(1)))?;
    }

    Ok(())
}

/// The file named on the command line, or the default next to the binary.
fn data_path(arg: Option<&String>) -> &Path {
    match arg {
        Some(path) => Path::new(path),
        None => Path::new(DEFAULT_DATA_FILE),
    }
}

fn run_menu_mode(path: &Path) -> Result<()> {
    println!("🏠 Estate Register v{}", VERSION);
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    println!("\n📂 Loading {}...", path.display());
    let report = load_file(path)?;
    print_load_summary(&report);

    let registry = ListingRegistry::new(report.listings);
    if !registry.has_data() {
        println!("\nNo listings loaded, nothing to browse.");
        return Ok(());
    }

    menu::run(&registry)?;

    println!("\nGoodbye!");
    Ok(())
}

fn print_load_summary(report: &LoadReport) {
    println!("✓ Loaded {} listings", report.listings.len());
    if !report.skipped.is_empty() {
        println!("⚠ Skipped {} lines (see warnings)", report.skipped.len());
    }
}

#[cfg(feature = "tui")]
fn run_tui_mode(path: &Path) -> Result<()> {
    println!("🖥️  Loading estate register UI...\n");

    let source = FileSource::new(path);
    let registry = ListingRegistry::load_from(&source)?;

    if !registry.has_data() {
        eprintln!("❌ No listings in {}", path.display());
        eprintln!("   Check the data file and try again.");
        std::process::exit(1);
    }

    println!("✓ Loaded {} listings\n", registry.len());
    println!("Starting UI... (Press 'q' to quit)\n");

    let mut app = ui::App::new(registry);
    ui::run_ui(&mut app)?;

    println!("\n✅ UI closed successfully");

    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_tui_mode(_path: &Path) -> Result<()> {
    eprintln!("❌ TUI mode not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    std::process::exit(1);
}

fn run_export_mode(path: &Path) -> Result<()> {
    let source = FileSource::new(path);
    let registry = ListingRegistry::load_from(&source)?;

    // Bare JSON on stdout; diagnostics stay on stderr.
    let json = serde_json::to_string_pretty(registry.listings())?;
    println!("{}", json);

    Ok(())
}
