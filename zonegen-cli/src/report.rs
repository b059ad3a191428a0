//! Console report of a finished run

use std::fmt::Write as _;
use std::path::Path;

use zonegen_core::RunSummary;

const RULE: &str = "==================================================";

/// Everything printed to stdout after a run.
pub fn render(summary: &RunSummary, root_dir: &Path) -> String {
    let mut out = String::new();

    for preview in &summary.previews {
        out.push_str(preview);
        out.push('\n');
    }

    section(&mut out, "Summary");
    let _ = writeln!(out, "Processed: {} zone(s)", summary.processed.len());
    for zone in &summary.processed {
        let _ = writeln!(out, "  + {zone}");
    }
    if !summary.skipped.is_empty() {
        let _ = writeln!(out, "Skipped: {}", summary.skipped.len());
        for issue in &summary.skipped {
            let _ = writeln!(out, "  - {}: {}", issue.subject, issue.reason);
        }
    }
    if !summary.failed.is_empty() {
        let _ = writeln!(out, "Failed: {}", summary.failed.len());
        for issue in &summary.failed {
            let _ = writeln!(out, "  ! {}: {}", issue.subject, issue.reason);
        }
    }
    if summary.malformed_records > 0 {
        let _ = writeln!(
            out,
            "Malformed records skipped: {} (see log for details)",
            summary.malformed_records
        );
    }

    if summary.dry_run || summary.processed.is_empty() {
        return out;
    }

    section(&mut out, "Next steps");
    let _ = writeln!(
        out,
        "Run these from '{}' after reviewing the generated files:\n",
        root_dir.display()
    );
    let _ = writeln!(out, "1. Initialize Terraform:\n   terraform init\n");
    match summary.import_commands() {
        Some(commands) => {
            let _ = writeln!(out, "2. Import the existing resources:");
            for line in commands.lines() {
                let _ = writeln!(out, "   {line}");
            }
            out.push('\n');
        }
        None => {
            let _ = writeln!(
                out,
                "2. Existing resources are adopted by the import blocks in imports.tf\n"
            );
        }
    }
    let _ = writeln!(
        out,
        "3. Verify that the imported state matches the configuration:\n   terraform plan\n"
    );
    let _ = writeln!(out, "4. If the plan looks right, apply it:\n   terraform apply");

    out
}

fn section(out: &mut String, title: &str) {
    let _ = writeln!(out, "\n{RULE}\n{title}:\n{RULE}");
}
