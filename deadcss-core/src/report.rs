//! Output formatting - CSV report, JSON and a plaintext summary.

use std::fs::File;
use std::io;
use std::path::Path;

use serde_json::json;

use crate::error::{DeadcssError, DeadcssResult};
use crate::verdict::{SelectorReport, Verdict, VerdictStats};

/// Header of the detailed report (one row per occurrence).
pub const DETAILED_HEADER: [&str; 6] = [
    "CSS Element",
    "Defined In",
    "Used?",
    "File",
    "Line Number",
    "Line of Code",
];

/// Header of the condensed report (one row per selector).
pub const CONDENSED_HEADER: [&str; 4] = ["CSS Element", "Defined In", "Used?", "Count"];

/// Which rows end up in the report.
#[derive(Debug, Clone, Default)]
pub struct ReportOptions {
    /// One row per selector with a distinct-file count
    pub condensed: bool,
    /// Only selectors whose verdict is not `Used`
    pub unused_only: bool,
}

/// Applies the unused-only filter.
pub fn select_rows<'a>(
    reports: &'a [SelectorReport],
    options: &ReportOptions,
) -> Vec<&'a SelectorReport> {
    reports
        .iter()
        .filter(|r| !options.unused_only || r.verdict != Verdict::Used)
        .collect()
}

/// Writes the tabular report to any writer.
pub fn write_csv<W: io::Write>(
    writer: W,
    reports: &[&SelectorReport],
    condensed: bool,
) -> csv::Result<()> {
    let mut out = csv::Writer::from_writer(writer);

    if condensed {
        out.write_record(CONDENSED_HEADER)?;
        for r in reports {
            let defined_in = r.defined_in.display().to_string();
            let count = r.file_count().to_string();
            out.write_record([
                r.selector.as_str(),
                defined_in.as_str(),
                r.verdict.report_label(),
                count.as_str(),
            ])?;
        }
    } else {
        out.write_record(DETAILED_HEADER)?;
        for r in reports {
            let defined_in = r.defined_in.display().to_string();
            if r.usages.is_empty() {
                out.write_record([
                    r.selector.as_str(),
                    defined_in.as_str(),
                    r.verdict.report_label(),
                    "",
                    "",
                    "",
                ])?;
                continue;
            }
            for u in &r.usages {
                let file = u.file.display().to_string();
                let line_number = u.line_number.to_string();
                out.write_record([
                    r.selector.as_str(),
                    defined_in.as_str(),
                    r.verdict.report_label(),
                    file.as_str(),
                    line_number.as_str(),
                    u.line.as_str(),
                ])?;
            }
        }
    }

    out.flush()?;
    Ok(())
}

/// Writes the tabular report to `path`, replacing any existing file.
pub fn write_csv_file(
    path: &Path,
    reports: &[&SelectorReport],
    condensed: bool,
) -> DeadcssResult<()> {
    let file = File::create(path)
        .map_err(|e| DeadcssError::report(path, format!("cannot create report: {e}")))?;
    write_csv(file, reports, condensed).map_err(|e| DeadcssError::report(path, e.to_string()))
}

/// Builds the JSON form of a report.
pub fn to_json(
    reports: &[&SelectorReport],
    stats: &VerdictStats,
    files_scanned: usize,
) -> serde_json::Value {
    json!({
        "files_scanned": files_scanned,
        "total_selectors": stats.total_selectors,
        "used": stats.used,
        "unused": stats.unused,
        "indeterminate": stats.indeterminate,
        "selectors": reports.iter().map(|r| {
            json!({
                "selector": r.selector,
                "defined_in": r.defined_in.display().to_string(),
                "shape": r.shape,
                "verdict": r.verdict,
                "file_count": r.file_count(),
                "usages": r.usages.iter().map(|u| {
                    json!({
                        "file": u.file.display().to_string(),
                        "line_number": u.line_number,
                        "line": u.line,
                    })
                }).collect::<Vec<_>>(),
            })
        }).collect::<Vec<_>>(),
    })
}

/// Prints the JSON report to stdout.
///
/// Falls back to a one-line error object if serialization fails.
pub fn print_json(reports: &[&SelectorReport], stats: &VerdictStats, files_scanned: usize) {
    match serde_json::to_string_pretty(&to_json(reports, stats, files_scanned)) {
        Ok(text) => println!("{}", text),
        Err(e) => {
            eprintln!("[WARN] JSON serialization failed: {}", e);
            println!("{{\"error\": {:?}}}", e.to_string());
        }
    }
}

/// Prints a plaintext summary to stdout.
pub fn print_summary(reports: &[&SelectorReport], stats: &VerdictStats, files_scanned: usize) {
    println!("=== CSS Selector Usage ===\n");
    println!("Files scanned:   {}", files_scanned);
    println!("Selectors:       {}", stats.total_selectors);
    println!("  - Used:        {}", stats.used);
    println!("  - Unused:      {}", stats.unused);
    println!("  - Unknown:     {}", stats.indeterminate);

    let unused: Vec<_> = reports
        .iter()
        .filter(|r| r.verdict == Verdict::Unused)
        .collect();
    if unused.is_empty() {
        println!("\nNo unused class or id selectors found.");
    } else {
        println!("\nUNUSED SELECTORS ({}):", unused.len());
        for r in unused {
            println!("  {} ({})", r.selector, r.defined_in.display());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyze::Usage;
    use crate::shape::SelectorShape;
    use std::path::PathBuf;

    fn report(selector: &str, verdict: Verdict, usages: &[(&str, usize, &str)]) -> SelectorReport {
        SelectorReport {
            selector: selector.to_string(),
            defined_in: PathBuf::from("site.css"),
            shape: SelectorShape::of(selector),
            verdict,
            usages: usages
                .iter()
                .map(|(file, n, line)| Usage {
                    selector: selector.to_string(),
                    file: PathBuf::from(file),
                    line_number: *n,
                    line: line.to_string(),
                })
                .collect(),
        }
    }

    fn render(reports: &[SelectorReport], options: &ReportOptions) -> String {
        let rows = select_rows(reports, options);
        let mut buf = Vec::new();
        write_csv(&mut buf, &rows, options.condensed).unwrap();
        String::from_utf8(buf).unwrap()
    }

    fn sample() -> Vec<SelectorReport> {
        vec![
            report(
                ".container",
                Verdict::Used,
                &[("a.html", 1, r#"<div class="container">"#), ("b.html", 4, "x")],
            ),
            report(".btn:hover", Verdict::Indeterminate, &[]),
            report(".unused", Verdict::Unused, &[]),
        ]
    }

    #[test]
    fn test_detailed_layout() {
        let text = render(&sample(), &ReportOptions::default());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "CSS Element,Defined In,Used?,File,Line Number,Line of Code");
        assert_eq!(
            lines[1],
            r#".container,site.css,YES,a.html,1,"<div class=""container"">""#
        );
        assert_eq!(lines[2], ".container,site.css,YES,b.html,4,x");
        assert_eq!(lines[3], ".btn:hover,site.css,UNKNOWN,,,");
        assert_eq!(lines[4], ".unused,site.css,NO,,,");
        assert_eq!(lines.len(), 5);
    }

    #[test]
    fn test_condensed_layout() {
        let options = ReportOptions {
            condensed: true,
            ..ReportOptions::default()
        };
        let text = render(&sample(), &options);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "CSS Element,Defined In,Used?,Count");
        assert_eq!(lines[1], ".container,site.css,YES,2");
        assert_eq!(lines[2], ".btn:hover,site.css,UNKNOWN,0");
        assert_eq!(lines[3], ".unused,site.css,NO,0");
    }

    #[test]
    fn test_unused_only() {
        let options = ReportOptions {
            unused_only: true,
            ..ReportOptions::default()
        };
        let reports = sample();
        let rows = select_rows(&reports, &options);
        let names: Vec<&str> = rows.iter().map(|r| r.selector.as_str()).collect();
        assert_eq!(names, vec![".btn:hover", ".unused"]);
    }

    #[test]
    fn test_json_shape() {
        let reports = sample();
        let rows: Vec<&SelectorReport> = reports.iter().collect();
        let stats = VerdictStats::from_reports(&reports);
        let value = to_json(&rows, &stats, 2);
        assert_eq!(value["files_scanned"], 2);
        assert_eq!(value["used"], 1);
        assert_eq!(value["selectors"][0]["verdict"], "USED");
        assert_eq!(value["selectors"][0]["file_count"], 2);
        assert_eq!(value["selectors"][2]["verdict"], "UNUSED");
        assert_eq!(value["selectors"][1]["shape"], "pseudo_class");
    }
}
