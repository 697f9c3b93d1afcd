use lyon_stories::{
    narrative::NarrativeRecord,
    report::{render_document, write_report, SEPARATOR_WIDTH},
};

fn record(subject: &str, dismissals: i64, average: f64, text: &str) -> NarrativeRecord {
    NarrativeRecord {
        subject: subject.into(),
        dismissal_count: dismissals,
        average,
        text: text.into(),
    }
}

#[test]
fn blocks_follow_input_order_verbatim() {
    let records = vec![
        record("Zed", 1, 99.5, "last by count"),
        record("Amy", 12, 18.25, "first by count"),
        record("Kim", 6, 30.0, "middle"),
    ];
    let doc = render_document(&records);
    let separator = "=".repeat(SEPARATOR_WIDTH);

    assert_eq!(doc.matches(&format!("{separator}\n")).count(), 3);
    assert_eq!(doc.matches("==== ").count(), 3);

    let positions: Vec<usize> = ["==== Zed ====", "==== Amy ====", "==== Kim ===="]
        .iter()
        .map(|header| doc.find(header).unwrap())
        .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]));
    assert!(doc.contains("Dismissals: 12\nAverage: 18.25\n\nfirst by count\n\n"));
    assert!(doc.contains("Average: 30.0\n"));
}

#[test]
fn single_record_substrings_in_order() {
    let doc = render_document(&[record("X", 5, 20.0, "Text")]);
    let separator = "=".repeat(50);
    let mut cursor = 0;
    for needle in ["X", "5", "20.0", "Text", separator.as_str()] {
        let found = doc[cursor..].find(needle).unwrap_or_else(|| panic!("{needle} missing"));
        cursor += found + needle.len();
    }
}

#[test]
fn cli_report_file_matches_document() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.txt");
    let records = vec![record("X", 5, 20.0, "Text")];
    write_report(&path, &records).unwrap();
    assert_eq!(std::fs::read_to_string(&path).unwrap(), render_document(&records));
}
