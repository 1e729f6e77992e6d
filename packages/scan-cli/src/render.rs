//! Plain-text rendering of a resolution report.

use std::fmt;

use ethical_scan::providers::ethical_consumer::search_page_url;
use ethical_scan::{CallOutcome, ResolutionReport, TrailEntry};

pub fn render_text(report: &ResolutionReport) -> String {
    TextReport(report).to_string()
}

/// Console layout of a report.
struct TextReport<'a>(&'a ResolutionReport);

impl fmt::Display for TextReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = self.0;

        writeln!(f, "Decoded barcode: {}", report.barcode())?;

        match report.product() {
            Some(product) => {
                writeln!(f, "\n--- Product Info ---")?;
                for (label, value) in product.display_fields() {
                    writeln!(f, "{}: {}", label, value)?;
                }
            }
            None => writeln!(f, "\nProduct not found in database.")?,
        }

        if let Some(manufacturer) = report.manufacturer() {
            writeln!(f, "\n--- Manufacturer ---")?;
            writeln!(f, "{}", manufacturer)?;
        }

        if report.ethical().is_empty() {
            writeln!(f, "\nNo ethical info available for this product/brand.")?;
            if let Some(manufacturer) = report.manufacturer() {
                writeln!(
                    f,
                    "Learn more about {}: {}",
                    manufacturer,
                    search_page_url(manufacturer)
                )?;
            }
        }
        for finding in report.ethical() {
            writeln!(f, "\n--- Ethical Info ({}) ---", finding.source())?;
            for (label, text) in finding.entries() {
                writeln!(f, "{}: {}", label, text)?;
            }
        }

        let sources: Vec<String> = report.source_trail().iter().map(trail_label).collect();
        writeln!(f, "\nSources: {}", sources.join(", "))
    }
}

fn trail_label(entry: &TrailEntry) -> String {
    let outcome = match entry.outcome {
        CallOutcome::Found => "found",
        CallOutcome::NotFound => "not found",
        CallOutcome::Failed => "failed",
    };
    format!("{} ({})", entry.provider, outcome)
}
