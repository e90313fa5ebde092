use super::*;
use serde_json::json;

// ---------------------------------------------------------------
// format_parameters
// ---------------------------------------------------------------

#[test]
fn pairs_in_insertion_order() {
    let input = json!({ "zeta": "z", "alpha": "a", "mid": 3 });
    assert_eq!(format_parameters(&input, 4), "zeta: z, alpha: a, mid: 3");
}

#[test]
fn field_cap_appends_ellipsis() {
    let input = json!({ "a": 1, "b": 2, "c": 3, "d": 4, "e": 5 });
    assert_eq!(format_parameters(&input, 4), "a: 1, b: 2, c: 3, d: 4, ...");
}

#[test]
fn short_arrays_render_inline() {
    let input = json!({ "files": ["a.rs", "b.rs", "c.rs"] });
    assert_eq!(format_parameters(&input, 4), "files: [a.rs, b.rs, c.rs]");
}

#[test]
fn long_arrays_render_a_count() {
    let input = json!({ "files": ["a", "b", "c", "d", "e"] });
    assert_eq!(format_parameters(&input, 4), "files: [a, b, c, ...2 more]");
}

#[test]
fn objects_render_compact() {
    let input = json!({ "filter": { "state": "open", "labels": ["bug"] } });
    assert_eq!(
        format_parameters(&input, 4),
        r#"filter: {"state":"open","labels":["bug"]}"#
    );
}

#[test]
fn long_values_are_capped() {
    let long = "x".repeat(200);
    let input = json!({ "command": long });
    let rendered = format_parameters(&input, 4);
    assert!(rendered.ends_with("..."));
    assert_eq!(rendered, format!("command: {}...", "x".repeat(80)));
}

#[test]
fn null_input_renders_nothing() {
    assert_eq!(format_parameters(&json!(null), 4), "");
}

#[test]
fn scalar_input_renders_capped_value() {
    assert_eq!(format_parameters(&json!("just text"), 4), "just text");
    assert_eq!(format_parameters(&json!(42), 4), "42");
}

#[test]
fn booleans_and_numbers_stringify() {
    let input = json!({ "all": true, "count": 7 });
    assert_eq!(format_parameters(&input, 4), "all: true, count: 7");
}

// ---------------------------------------------------------------
// truncation
// ---------------------------------------------------------------

#[test]
fn truncate_output_is_byte_exact() {
    let content = "a".repeat(300);
    let out = truncate_output(&content, 256);
    assert!(out.ends_with("... (truncated)"));
    assert_eq!(out.len(), 256 + "... (truncated)".len());
}

#[test]
fn truncate_output_leaves_short_content_untouched() {
    let content = "a".repeat(256);
    assert_eq!(truncate_output(&content, 256), content);
    assert_eq!(truncate_output("", 256), "");
}

#[test]
fn truncate_output_respects_char_boundaries() {
    // 'é' is two bytes; a cut at byte 3 must back off to byte 2.
    let content = "aéé";
    let out = truncate_output(content, 3);
    assert!(out.starts_with("aé"));
    assert!(out.ends_with("... (truncated)"));
}

#[test]
fn ellipsize_counts_chars_not_bytes() {
    assert_eq!(ellipsize("héllo", 10), "héllo");
    assert_eq!(ellipsize("héllo", 3), "hél...");
    assert_eq!(ellipsize("", 5), "");
}

// ---------------------------------------------------------------
// content_text
// ---------------------------------------------------------------

#[test]
fn content_text_shapes() {
    assert_eq!(content_text(&json!("plain")), "plain");
    assert_eq!(content_text(&json!(null)), "");
    assert_eq!(
        content_text(&json!([{ "type": "text", "text": "one" }, { "type": "text", "text": "two" }])),
        "one\ntwo"
    );
    assert_eq!(content_text(&json!(["a", "b"])), "a\nb");
    assert_eq!(content_text(&json!({ "status": "ok" })), r#"{"status":"ok"}"#);
}

// ---------------------------------------------------------------
// display helpers
// ---------------------------------------------------------------

#[test]
fn durations_and_costs() {
    assert_eq!(fmt_duration(250), "250ms");
    assert_eq!(fmt_duration(64000), "64.0s");
    assert_eq!(fmt_duration(1500), "1.5s");
    assert_eq!(fmt_cost(0.42), "$0.4200");
}
