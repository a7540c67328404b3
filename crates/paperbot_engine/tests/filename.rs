use paperbot_engine::{extension_for_content_type, normalize_filename};
use pretty_assertions::assert_eq;

#[test]
fn empty_and_whitespace_fall_back_to_document() {
    assert_eq!(normalize_filename(""), "document.pdf");
    assert_eq!(normalize_filename("   "), "document.pdf");
    assert_eq!(normalize_filename("\t\n"), "document.pdf");
}

#[test]
fn query_string_is_truncated() {
    assert_eq!(
        normalize_filename("q1.pdf?sequence=1&isAllowed=y"),
        "q1.pdf"
    );
    assert_eq!(normalize_filename("paper.pdf?download=true"), "paper.pdf");
}

#[test]
fn wrapping_quotes_are_stripped() {
    assert_eq!(normalize_filename("\"Past Paper.pdf\""), "Past Paper.pdf");
    assert_eq!(normalize_filename("'notes.doc'"), "notes.doc");
}

#[test]
fn residual_noise_patterns_are_removed() {
    assert_eq!(normalize_filename("q1.pdf sequence=1"), "q1.pdf");
    assert_eq!(normalize_filename("Q1.PDF SEQUENCE=9"), "Q1.PDF");
    assert_eq!(normalize_filename("exam.pdf isAllowed=y"), "exam.pdf");
    assert_eq!(normalize_filename("notes.doc;download=true"), "notes.doc");
    assert_eq!(normalize_filename("syllabus.pdf&origin=web"), "syllabus.pdf");
}

#[test]
fn question_marks_only_become_document() {
    assert_eq!(normalize_filename("???"), "document.pdf");
}

#[test]
fn symbol_only_input_becomes_document() {
    assert_eq!(normalize_filename("!!!"), "document.pdf");
}

#[test]
fn unsafe_characters_are_dropped() {
    assert_eq!(normalize_filename("a/b\\c.pdf"), "abc.pdf");
    assert_eq!(normalize_filename("exam<1>.pdf"), "exam1.pdf");
    assert_eq!(normalize_filename("a\u{0}b\u{7}.txt"), "ab.txt");
}

#[test]
fn whitespace_runs_collapse() {
    assert_eq!(normalize_filename("mid   term    2023.pdf"), "mid term 2023.pdf");
    assert_eq!(normalize_filename("  padded.pdf  "), "padded.pdf");
}

#[test]
fn missing_extension_defaults_to_pdf() {
    assert_eq!(normalize_filename("syllabus"), "syllabus.pdf");
    assert_eq!(normalize_filename("EST100 2023"), "EST100 2023.pdf");
}

#[test]
fn normalization_is_idempotent() {
    let samples = [
        "q1.pdf?sequence=1&isAllowed=y",
        "\"Past Paper.pdf\"",
        "mid   term.pdf",
        "syllabus",
        "",
        "notes.doc;download=true",
    ];
    for raw in samples {
        let once = normalize_filename(raw);
        assert_eq!(normalize_filename(&once), once, "not idempotent for {raw:?}");
    }
}

#[test]
fn content_type_extension_mapping() {
    assert_eq!(extension_for_content_type("application/pdf"), ".pdf");
    assert_eq!(extension_for_content_type("image/png"), ".jpg");
    assert_eq!(extension_for_content_type("text/plain; charset=utf-8"), ".txt");
    assert_eq!(extension_for_content_type("application/msword"), ".doc");
    assert_eq!(extension_for_content_type("application/octet-stream"), ".pdf");
}
