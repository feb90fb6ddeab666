//! Comprehensive test suite for deadcss-core.

use crate::*;
use std::collections::{BTreeSet, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

static TEST_COUNTER: AtomicU64 = AtomicU64::new(0);

fn write_file(file: &Path, content: &str) {
    fs::create_dir_all(file.parent().unwrap()).unwrap();
    fs::write(file, content).unwrap();
}

fn setup_temp_project() -> PathBuf {
    let id = TEST_COUNTER.fetch_add(1, Ordering::SeqCst);
    let timestamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let dir = std::env::temp_dir()
        .join("deadcss_tests")
        .join(format!("{}_{}", timestamp, id));

    if dir.exists() {
        fs::remove_dir_all(&dir).ok();
    }
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn verdict_of(result: &AnalysisResult, selector: &str) -> Verdict {
    result
        .report_for(selector)
        .unwrap_or_else(|| panic!("{selector} missing from report"))
        .verdict
}

const SCENARIO_CSS: &str = ".container{}\n#main{}\ndiv{}\np.error{}\n[data-type=\"button\"]{}\n.btn:hover{}\n.unused{}";

// Core Test 1: End-to-end scenario on a single line of markup
#[test]
fn test_end_to_end_single_line() {
    let root = setup_temp_project();
    write_file(&root.join("styles.css"), SCENARIO_CSS);
    write_file(
        &root.join("site/index.html"),
        r#"<div class="container"><p id="main">x</p><p class="error">e</p><button data-type="button">b</button></div>"#,
    );

    let result = Deadcss::new(root.join("styles.css"), root.join("site"))
        .with_cache(false)
        .analyze()
        .unwrap();

    for used in [".container", "#main", "div", "p.error", "[data-type=\"button\"]"] {
        assert_eq!(verdict_of(&result, used), Verdict::Used, "{used}");
    }
    assert_eq!(verdict_of(&result, ".unused"), Verdict::Unused);
    assert_eq!(verdict_of(&result, ".btn:hover"), Verdict::Indeterminate);
    assert_eq!(result.stats.total_selectors, 7);

    fs::remove_dir_all(&root).ok();
}

// Core Test 2: Markup and template fixture, written out as CSV
#[test]
fn test_markup_and_template_to_csv() {
    let root = setup_temp_project();
    write_file(
        &root.join("styles.css"),
        r#"
    /* styles.css */
    .container { width: 80%; }
    #main { padding: 20px; }
    div { border: 1px solid #ccc; }
    p.error { color: red; }
    [data-type="button"] { cursor: pointer; }
    .btn:hover { background: blue; }
    .unused { display: none; }
"#,
    );
    write_file(
        &root.join("test.html"),
        r#"
    <div class="container">
        <p id="main">Text</p>
        <p class="error">Error</p>
        <button data-type="button">Click</button>
    </div>
"#,
    );
    write_file(
        &root.join("test.php"),
        r#"
    <?php
    echo '<div class="container">';
    echo '<button id="main" data-type="button">Click</button>';
    ?>
"#,
    );

    let result = Deadcss::new(root.join("styles.css"), &root)
        .with_cache(false)
        .analyze()
        .unwrap();
    assert_eq!(result.files_scanned, 2);

    let output = root.join("output.csv");
    let rows = select_rows(&result.reports, &ReportOptions::default());
    write_csv_file(&output, &rows, false).unwrap();

    let mut reader = csv::Reader::from_path(&output).unwrap();
    let headers: Vec<String> = reader.headers().unwrap().iter().map(String::from).collect();
    assert_eq!(headers, DETAILED_HEADER.to_vec());
    let records: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    assert!(records.len() >= 7);

    let used: HashSet<&str> = records
        .iter()
        .filter(|r| &r[2] == "YES")
        .map(|r| r.get(0).unwrap())
        .collect();
    for selector in [".container", "#main", "div", "p.error", "[data-type=\"button\"]"] {
        assert!(used.contains(selector), "{selector}");
    }
    assert!(records.iter().any(|r| &r[0] == ".unused" && &r[2] == "NO"));
    assert!(records.iter().any(|r| &r[0] == ".btn:hover" && &r[2] == "UNKNOWN"));

    // `.container` is used once in each file
    let container = result.report_for(".container").unwrap();
    assert_eq!(container.file_count(), 2);
    assert!(container
        .usages
        .iter()
        .any(|u| u.file.ends_with("test.php") && u.line == "echo '<div class=\"container\">';"));

    fs::remove_dir_all(&root).ok();
}

// Core Test 3: Combinator across two lines is attributed to line 1
#[test]
fn test_combinator_two_line_file() {
    let root = setup_temp_project();
    write_file(&root.join("test.css"), ".container .item {color:blue}\n");
    write_file(
        &root.join("test.html"),
        "<div class=\"container\">\n<span class=\"item\">\n",
    );

    let universe = parse_stylesheet(&root.join("test.css")).unwrap();
    let usages = analyze_file(&universe, &root.join("test.html")).unwrap();

    assert_eq!(usages.len(), 1);
    assert_eq!(usages[0].selector, ".container .item");
    assert_eq!(usages[0].line_number, 1);
    assert_eq!(usages[0].line, "<div class=\"container\">");

    fs::remove_dir_all(&root).ok();
}

// Core Test 4: Echoed markup yields exactly one usage
#[test]
fn test_echo_yields_single_usage() {
    let root = setup_temp_project();
    let line = r#"echo "<div class=\"container\">";"#;
    write_file(&root.join("view.php"), line);

    let universe = SelectorUniverse::from_selectors([".container"], root.join("s.css"));
    let usages = analyze_file(&universe, &root.join("view.php")).unwrap();

    assert_eq!(usages.len(), 1);
    assert_eq!(usages[0].selector, ".container");
    assert_eq!(usages[0].line_number, 1);
    assert_eq!(usages[0].line, line);

    fs::remove_dir_all(&root).ok();
}

// Core Test 5: Selector extraction is deterministic
#[test]
fn test_extraction_is_deterministic() {
    let css = ".b, .a {x:1}\n/* c */ #z > p {y:2}\n@media print { .p { z: 3 } }";
    let first = extract_selectors(css, Path::new("s.css"));
    let second = extract_selectors(css, Path::new("s.css"));
    assert_eq!(first, second);
}

// Core Test 6: Comma groups are split and trimmed
#[test]
fn test_comma_groups() {
    let universe = extract_selectors(".a, .b , #c {x:1}", Path::new("s.css"));
    let found: BTreeSet<&str> = universe.selectors().collect();
    assert_eq!(found, BTreeSet::from([".a", ".b", "#c"]));
}

// Core Test 7: Comments never leak selectors
#[test]
fn test_comment_stripping() {
    let universe = extract_selectors("/* .fake {x:1} */ .real{y:2}", Path::new("s.css"));
    let found: Vec<&str> = universe.selectors().collect();
    assert_eq!(found, vec![".real"]);
}

// Core Test 8: A (selector, file, line) key appears at most once
#[test]
fn test_usage_key_is_unique() {
    let universe = SelectorUniverse::from_selectors(
        [".a", "#b", "div", "div.a", "[id=\"b\"]", "[class=\"a\"]", ".a:hover", ".a #b"],
        "s.css",
    );
    let content = concat!(
        "<div class=\"a\" id=\"b\" style=\"x:hover\"><div class=\"a\">\n",
        "echo \"<div class=\\\"a\\\" id=\\\"b\\\">\";\n",
        "<div class='a' id=\"b\">\n",
    );

    for kind in [FileKind::Markup, FileKind::Template, FileKind::Script] {
        let usages = analyze_content(&universe, Path::new("page"), content, kind);
        let mut keys = HashSet::new();
        for u in &usages {
            assert!(
                keys.insert((u.selector.clone(), u.line_number)),
                "duplicate {} at line {} ({kind:?})",
                u.selector,
                u.line_number
            );
        }
        assert!(!usages.is_empty());
    }
}

// Core Test 9: Unreferenced selectors are classified by shape
#[test]
fn test_unreferenced_classification() {
    let universe = SelectorUniverse::from_selectors([".unused", "div:hover"], "s.css");
    let reports = reconcile(&universe, Vec::new());
    assert_eq!(reports[0].selector, ".unused");
    assert_eq!(reports[0].verdict, Verdict::Unused);
    assert_eq!(reports[1].selector, "div:hover");
    assert_eq!(reports[1].verdict, Verdict::Indeterminate);
}

// Core Test 10: A bad file does not abort the run
#[test]
fn test_unreadable_file_is_skipped() {
    let root = setup_temp_project();
    write_file(&root.join("s.css"), ".ok {}\n.also {}\n");
    write_file(&root.join("site/good.html"), "<b class=\"ok\">");
    fs::write(root.join("site/bad.html"), [0xff, 0xfe, 0x00, 0xc3]).unwrap();

    let result = Deadcss::new(root.join("s.css"), root.join("site"))
        .with_cache(false)
        .analyze()
        .unwrap();

    assert_eq!(result.files_scanned, 2);
    assert_eq!(verdict_of(&result, ".ok"), Verdict::Used);
    assert_eq!(verdict_of(&result, ".also"), Verdict::Unused);

    fs::remove_dir_all(&root).ok();
}

// Core Test 11: Repeated runs give identical reports
#[test]
fn test_runs_are_reproducible() {
    let root = setup_temp_project();
    write_file(&root.join("s.css"), ".a {}\n.b .a {}\np.a {}\n");
    for i in 0..12 {
        write_file(
            &root.join(format!("site/p{i:02}.html")),
            "<section class=\"b\">\n<p class=\"a\">\n",
        );
    }

    let run = || {
        Deadcss::new(root.join("s.css"), root.join("site"))
            .with_cache(false)
            .analyze()
            .unwrap()
            .reports
    };
    let first = run();
    assert_eq!(first, run());

    let files: Vec<&Path> = first[0].usages.iter().map(|u| u.file.as_path()).collect();
    let mut sorted = files.clone();
    sorted.sort();
    assert_eq!(files, sorted);

    fs::remove_dir_all(&root).ok();
}

// Core Test 12: Stylesheet directories merge with later paths winning
#[test]
fn test_stylesheet_dir_later_path_wins() {
    let root = setup_temp_project();
    write_file(&root.join("css/a.css"), ".shared {}\n.only-a {}\n");
    write_file(&root.join("css/b.css"), ".shared {}\n");
    write_file(&root.join("site/index.html"), "<i class=\"shared\">");

    let result = Deadcss::new(root.join("css"), root.join("site"))
        .stylesheet_dir(true)
        .with_cache(false)
        .analyze()
        .unwrap();

    assert_eq!(result.universe.defined_in(".shared"), Some(root.join("css/b.css").as_path()));
    assert_eq!(result.universe.defined_in(".only-a"), Some(root.join("css/a.css").as_path()));

    fs::remove_dir_all(&root).ok();
}

// Core Test 13: Condensed report counts distinct files
#[test]
fn test_condensed_csv_counts_files() {
    let root = setup_temp_project();
    write_file(&root.join("s.css"), ".a {}\n.gone {}\n");
    write_file(&root.join("site/one.html"), "<b class=\"a\">\n<i class=\"a\">");
    write_file(&root.join("site/two.js"), "el.classList.add('a');");

    let result = Deadcss::new(root.join("s.css"), root.join("site"))
        .with_cache(false)
        .analyze()
        .unwrap();

    let options = ReportOptions {
        condensed: true,
        unused_only: false,
    };
    let rows = select_rows(&result.reports, &options);
    let mut buf = Vec::new();
    write_csv(&mut buf, &rows, true).unwrap();
    let text = String::from_utf8(buf).unwrap();

    let expected_a = format!(".a,{},YES,2", root.join("s.css").display());
    let expected_gone = format!(".gone,{},NO,0", root.join("s.css").display());
    assert!(text.starts_with("CSS Element,Defined In,Used?,Count"));
    assert!(text.lines().any(|l| l == expected_a), "{text}");
    assert!(text.lines().any(|l| l == expected_gone), "{text}");

    fs::remove_dir_all(&root).ok();
}

// Core Test 14: Unused-only keeps unused and indeterminate selectors
#[test]
fn test_unused_only_rows() {
    let root = setup_temp_project();
    write_file(&root.join("s.css"), SCENARIO_CSS);
    write_file(&root.join("site/a.html"), "<div class=\"container\">");

    let result = Deadcss::new(root.join("s.css"), root.join("site"))
        .with_cache(false)
        .analyze()
        .unwrap();
    let options = ReportOptions {
        condensed: false,
        unused_only: true,
    };
    let names: BTreeSet<&str> = select_rows(&result.reports, &options)
        .iter()
        .map(|r| r.selector.as_str())
        .collect();

    assert!(!names.contains(".container"));
    assert!(!names.contains("div"));
    assert!(names.contains(".unused"));
    assert!(names.contains(".btn:hover"));

    fs::remove_dir_all(&root).ok();
}
