//! Plain-text rendering of a finished plan for terminals and logs.

use std::fmt::Write as _;

use wavefront_core::{Grid, Trajectory};

const RULE: &str = "==================================================";

/// Formats the labeled grid and the numbered trajectory steps.
///
/// Every value is right-aligned in a four character column and separated by a
/// single space. Steps are one-based positions printed as `Step i: (r, c)`.
#[must_use]
pub fn render_report(labeled: &Grid, trajectory: &Trajectory) -> String {
    let mut report = String::new();

    let _ = writeln!(report, "{RULE} Value Map {RULE}");
    for row in 0..labeled.rows() {
        let Some(values) = labeled.row(row) else {
            continue;
        };
        let line = values
            .iter()
            .map(|value| format!("{value:4}"))
            .collect::<Vec<_>>()
            .join(" ");
        let _ = writeln!(report, "{line}");
    }

    let _ = writeln!(report);
    let _ = writeln!(report, "{RULE} Trajectory {RULE}");
    for (index, step) in trajectory.iter().enumerate() {
        let _ = writeln!(report, "Step {}: {step}", index + 1);
    }

    report
}
