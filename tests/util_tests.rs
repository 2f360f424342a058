use promptcraft::util::{log_preview, truncate_chars};

#[test]
fn ascii_no_truncate() {
    assert_eq!(truncate_chars("hello", 10), "hello");
}

#[test]
fn ascii_truncate() {
    assert_eq!(truncate_chars("hello world", 5), "hello…");
}

#[test]
fn cjk_truncate() {
    assert_eq!(truncate_chars("你好世界测试", 4), "你好世界…");
}

#[test]
fn preview_flattens_whitespace() {
    assert_eq!(log_preview("```json\n{\n  \"a\": 1\n}\n```", 100), "```json { \"a\": 1 } ```");
    assert_eq!(log_preview("one\n\ntwo three", 7), "one two…");
}
