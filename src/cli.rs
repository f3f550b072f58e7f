//! Shared command-line interface logic: help text and run reporting.

use crate::controller::{BookStat, RunSummary};

pub fn print_help(binary_name: &str) {
    println!(
        "Marginalia v{} - Sync Kindle clippings to a Notion database",
        env!("CARGO_PKG_VERSION")
    );
    println!();
    println!("USAGE:");
    println!("    {} [OPTIONS]", binary_name);
    println!();
    println!("OPTIONS:");
    println!("    -f, --file <path>     Clippings export to read (default: configured");
    println!("                          clippings_file, usually 'My Clippings.txt').");
    println!("    --covers              Look up book covers on Google Books this run.");
    println!("    --dry-run             Parse and reconcile, print what would be pushed,");
    println!("                          but never call the workspace.");
    println!("    -r, --root <path>     Use a different directory for config and data.");
    println!("    -v, --verbose         Debug-level logging.");
    println!("    -h, --help            Show this help message.");
    println!("    -V, --version         Show the version.");
    println!();
    println!("CONFIG:");
    println!("    config.toml in the platform config directory holds the Notion");
    println!("    integration token, the target database id, the default clippings");
    println!("    path, and whether covers are fetched. A template is written on");
    println!("    first run.");
    println!();
    println!("MORE INFO:");
    println!("    Repository: https://codeberg.org/trougnouf/marginalia");
    println!("    License:    GPL-3.0");
}

/// Per-book parse stats, printed after every run.
pub fn print_parse_stats(parsed: &[BookStat], total_highlights: usize) {
    println!("Parsed {} book(s), {} highlight(s):", parsed.len(), total_highlights);
    for book in parsed {
        println!(
            "  {} — {} ({} highlight{})",
            book.title,
            book.author,
            book.highlights,
            if book.highlights == 1 { "" } else { "s" }
        );
    }
}

/// What a dry run would have pushed.
pub fn print_dry_run(unsynced: &[BookStat]) {
    if unsynced.is_empty() {
        println!("\nEvery book is already synced; nothing to push.");
        return;
    }
    println!("\nWould push {} book(s):", unsynced.len());
    for book in unsynced {
        println!("  {} — {} new highlight(s)", book.title, book.highlights);
    }
}

pub fn print_summary(summary: &RunSummary) {
    print_parse_stats(&summary.parsed, summary.total_highlights());

    if summary.dry_run {
        print_dry_run(&summary.unsynced);
        return;
    }

    if summary.unsynced.is_empty() {
        println!("\nEvery book is already synced!");
        return;
    }

    println!(
        "\nSynced {} highlight(s) across {} book(s); {} book(s) already up to date.",
        summary.highlights_pushed,
        summary.books_pushed,
        summary.books_up_to_date()
    );
}
