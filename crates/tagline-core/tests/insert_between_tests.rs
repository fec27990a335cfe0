//! Integration tests for start/end pair insertion.

use pretty_assertions::assert_eq;
use rstest::rstest;
use tagline_core::{Document, Error};
use tagline_test_utils::TextFixture;

fn tag_when(text: &'static str, tag: &'static str) -> impl Fn(usize, &str) -> Option<String> {
    move |_, content| (content == text).then(|| tag.to_string())
}

fn tag_prefix(prefix: &'static str, tag: &'static str) -> impl Fn(usize, &str) -> Option<String> {
    move |_, content| content.starts_with(prefix).then(|| tag.to_string())
}

fn scanned(lines: &[&str]) -> (TextFixture, Document) {
    let fixture = TextFixture::with_lines("doc.txt", lines);
    let mut doc = Document::open(fixture.path()).unwrap();
    let start = tag_prefix("<", "start");
    let end = tag_prefix(">", "end");
    doc.scan(&[&start, &end]).unwrap();
    (fixture, doc)
}

#[test]
fn test_insert_between_scenario() {
    let fixture = TextFixture::with_lines("abc.txt", &["A", "B", "C"]);
    let mut doc = Document::open(fixture.path()).unwrap();
    let start = tag_when("B", "start");
    let end = tag_when("C", "end");
    doc.scan(&[&start, &end]).unwrap();

    doc.insert_between("start", "end", &["MID"]).unwrap();

    assert_eq!(fixture.read_lines(), vec!["A", "B", "MID", "C"]);
}

#[test]
fn test_block_lands_right_before_end_line() {
    let (fixture, doc) = scanned(&["head", "<open", "body", ">close", "tail"]);

    doc.insert_between("start", "end", &["new 1", "new 2"]).unwrap();

    assert_eq!(
        fixture.read(),
        "head\n<open\nbody\nnew 1\nnew 2\n>close\ntail\n"
    );
    assert!(fixture.stray_scratch_files().is_empty());
}

#[test]
fn test_latest_start_before_end_wins() {
    let (fixture, doc) = scanned(&["<a", "x", "<b", "y", ">end", "z"]);

    let rewrite = doc.plan_insert_between("start", "end", &["NEW"]).unwrap();
    assert_eq!(
        rewrite.lines().collect::<Vec<_>>(),
        vec!["<a", "x", "<b", "y", "NEW", ">end", "z"]
    );

    doc.insert_between("start", "end", &["NEW"]).unwrap();
    assert_eq!(fixture.read_lines(), vec!["<a", "x", "<b", "y", "NEW", ">end", "z"]);
}

#[test]
fn test_only_first_pair_is_used() {
    let (fixture, doc) = scanned(&["<1", ">1", "<2", ">2"]);

    doc.insert_between("start", "end", &["NEW"]).unwrap();

    assert_eq!(fixture.read_lines(), vec!["<1", "NEW", ">1", "<2", ">2"]);
}

#[test]
fn test_end_before_any_start_is_skipped() {
    let (fixture, doc) = scanned(&[">early", "<open", ">close"]);

    doc.insert_between("start", "end", &["NEW"]).unwrap();

    assert_eq!(fixture.read_lines(), vec![">early", "<open", "NEW", ">close"]);
}

#[test]
fn test_line_with_both_tags_counts_as_start() {
    let fixture = TextFixture::with_lines("doc.txt", &["both", "mid", "end"]);
    let mut doc = Document::open(fixture.path()).unwrap();
    let start = tag_when("both", "start");
    let end_on_both = tag_when("both", "end");
    let end = tag_when("end", "end");
    doc.scan(&[&start, &end_on_both, &end]).unwrap();

    doc.insert_between("start", "end", &["NEW"]).unwrap();

    assert_eq!(fixture.read_lines(), vec!["both", "mid", "NEW", "end"]);
}

#[test]
fn test_only_dual_tagged_line_is_a_mismatch() {
    let fixture = TextFixture::with_lines("doc.txt", &["both", "other"]);
    let mut doc = Document::open(fixture.path()).unwrap();
    let start = tag_when("both", "start");
    let end = tag_when("both", "end");
    doc.scan(&[&start, &end]).unwrap();

    let result = doc.insert_between("start", "end", &["NEW"]);

    assert!(matches!(result, Err(Error::TagPairMismatch { .. })));
    assert_eq!(fixture.read_lines(), vec!["both", "other"]);
}

#[rstest]
#[case("", "", "empty")]
#[case("", "end", "empty")]
#[case("start", "", "empty")]
#[case("", "missing", "empty")]
#[case("missing", "end", "start")]
#[case("missing", "missing", "start")]
#[case("start", "missing", "end")]
#[case("end", "start", "mismatch")]
fn test_precondition_errors(#[case] start: &str, #[case] end: &str, #[case] expected: &str) {
    let (fixture, doc) = scanned(&["a", "<open", "b", ">close", "c"]);
    let before = fixture.read();

    let err = doc.insert_between(start, end, &["NEW"]).unwrap_err();

    let matched = match expected {
        "empty" => matches!(err, Error::EmptyTag),
        "start" => matches!(err, Error::StartTagNotFound { ref tag } if tag == start),
        "end" => matches!(err, Error::EndTagNotFound { ref tag } if tag == end),
        "mismatch" => matches!(err, Error::TagPairMismatch { .. }),
        _ => unreachable!(),
    };
    assert!(matched, "expected {} error, got {:?}", expected, err);
    assert_eq!(fixture.read(), before);
    assert!(fixture.stray_scratch_files().is_empty());
}

#[test]
fn test_missing_end_after_start_leaves_file_unchanged() {
    let (fixture, doc) = scanned(&[">close", "a", "<open", "b"]);
    let before = fixture.read();

    let result = doc.insert_between("start", "end", &["NEW"]);

    assert!(matches!(result, Err(Error::TagPairMismatch { .. })));
    assert_eq!(fixture.read(), before);
    assert!(fixture.stray_scratch_files().is_empty());
}

#[test]
fn test_repeat_after_rescan_inserts_again() {
    let (fixture, mut doc) = scanned(&["<open", ">close"]);

    doc.insert_between("start", "end", &["NEW"]).unwrap();
    let start = tag_prefix("<", "start");
    let end = tag_prefix(">", "end");
    doc.scan(&[&start, &end]).unwrap();
    doc.insert_between("start", "end", &["NEW"]).unwrap();

    assert_eq!(fixture.read_lines(), vec!["<open", "NEW", "NEW", ">close"]);
}

#[test]
fn test_unique_skips_existing_and_repeated_lines() {
    let (fixture, doc) = scanned(&["<open", "keep", ">close", "after"]);

    let inserted = doc
        .insert_between_unique("start", "end", &["keep", "new", "new", "after"])
        .unwrap();

    assert_eq!(inserted, 2);
    assert_eq!(
        fixture.read_lines(),
        vec!["<open", "keep", "new", "after", ">close", "after"]
    );
}

#[test]
fn test_unique_with_nothing_new_leaves_file_alone() {
    let fixture = TextFixture::with_text("doc.txt", "<open\nkeep\n>close");
    let mut doc = Document::open(fixture.path()).unwrap();
    let start = tag_prefix("<", "start");
    let end = tag_prefix(">", "end");
    doc.scan(&[&start, &end]).unwrap();

    let inserted = doc.insert_between_unique("start", "end", &["keep"]).unwrap();

    assert_eq!(inserted, 0);
    // Not rewritten, so the missing final newline survives
    assert_eq!(fixture.read(), "<open\nkeep\n>close");
}

#[test]
fn test_unique_checks_preconditions() {
    let (_fixture, doc) = scanned(&["<open", ">close"]);

    assert!(matches!(
        doc.insert_between_unique("", "end", &["x"]),
        Err(Error::EmptyTag)
    ));
    assert!(matches!(
        doc.insert_between_unique("end", "start", &["x"]),
        Err(Error::TagPairMismatch { .. })
    ));
}

#[test]
fn test_insert_between_empty_block_adds_blank_line() {
    let (fixture, doc) = scanned(&["<open", "body", ">close"]);
    let nothing: [&str; 0] = [];

    assert_eq!(doc.plan_insert_between("start", "end", &nothing).unwrap().changed, 1);
    doc.insert_between("start", "end", &nothing).unwrap();

    assert_eq!(fixture.read(), "<open\nbody\n\n>close\n");
}

#[test]
fn test_insert_between_keeps_non_utf8_bytes() {
    let fixture = TextFixture::with_text("latin1.conf", "");
    std::fs::write(fixture.path(), b"caf\xe9\n<open\n\xff\n>close\n").unwrap();
    let mut doc = Document::open(fixture.path()).unwrap();
    let start = tag_prefix("<", "start");
    let end = tag_prefix(">", "end");
    doc.scan(&[&start, &end]).unwrap();

    doc.insert_between("start", "end", &["NEW"]).unwrap();

    assert_eq!(
        std::fs::read(fixture.path()).unwrap(),
        b"caf\xe9\n<open\n\xff\nNEW\n>close\n"
    );
    assert!(fixture.stray_scratch_files().is_empty());
}
