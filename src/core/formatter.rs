use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;

fn indent_run() -> &'static Regex {
    static INDENT_RUN: OnceLock<Regex> = OnceLock::new();
    // 換行後接一組以上的四個空白
    INDENT_RUN.get_or_init(|| Regex::new(r"\n(?: {4})+").expect("static regex is valid"))
}

/// Normalizes generated text for display.
///
/// JSON input is pretty-printed with 4-space indentation, keys kept in the
/// order received. Anything else has literal `\n` sequences turned into real
/// newlines and 4-space indentation runs after each newline removed; if that
/// leaves valid JSON, it is pretty-printed too, so formatting twice changes
/// nothing.
pub fn format_response(text: &str) -> String {
    if let Some(pretty) = pretty_json(text) {
        return pretty;
    }
    let plain = format_plain(text);
    // 去除跳脫字元後可能變成合法 JSON
    pretty_json(&plain).unwrap_or(plain)
}

fn pretty_json(text: &str) -> Option<String> {
    let value = serde_json::from_str::<serde_json::Value>(text).ok()?;
    let mut buffer = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    value.serialize(&mut serializer).ok()?;
    String::from_utf8(buffer).ok()
}

fn format_plain(text: &str) -> String {
    let unescaped = text.replace("\\n", "\n");
    indent_run().replace_all(&unescaped, "\n").into_owned()
}
