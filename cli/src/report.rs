use calabash_core::BatchReport;

/// Print the batch summary the way every import subcommand reports it.
pub fn print_summary(report: &BatchReport) {
    println!();
    println!("{}", "=".repeat(50));
    println!("IMPORT COMPLETE");
    println!("{}", "=".repeat(50));
    println!("Created: {}", report.created);
    println!("Updated: {}", report.updated);
    println!("Skipped: {}", report.skipped);

    if !report.failures.is_empty() {
        println!();
        println!("Failures:");
        for failure in &report.failures {
            println!("  {}: {}", failure.identifier, failure.reason);
        }
    }

    println!("{}", "=".repeat(50));
}
