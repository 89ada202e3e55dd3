//! Human-readable report output.
//!
//! Everything writes through `Console<W>`, so the binaries print to stdout
//! and tests capture into a `Vec<u8>`.

use std::io::{self, Write};

use fathom_core::types::json_display;
use fathom_core::{ApiData, ApiKeyInfo, Meeting, ResponseEnvelope};
use serde_json::Value;

pub const WIDTH: usize = 60;

/// Longest field value printed before truncation.
pub const MAX_VALUE_LEN: usize = 100;

pub struct Console<W: Write> {
    out: W,
}

impl Console<io::Stdout> {
    pub fn stdout() -> Self {
        Self { out: io::stdout() }
    }
}

impl<W: Write> Console<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn line(&mut self, text: impl AsRef<str>) -> io::Result<()> {
        writeln!(self.out, "{}", text.as_ref())
    }

    pub fn blank(&mut self) -> io::Result<()> {
        writeln!(self.out)
    }

    pub fn header(&mut self, text: &str) -> io::Result<()> {
        let rule = "=".repeat(WIDTH);
        writeln!(self.out, "{rule}\n{text}\n{rule}")
    }

    pub fn subheader(&mut self, text: &str) -> io::Result<()> {
        self.blank()?;
        self.header(text)
    }

    pub fn success(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.out, "✅ {message}")
    }

    pub fn error(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.out, "❌ {message}")
    }

    pub fn info(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.out, "ℹ️  {message}")
    }

    pub fn result(&mut self, label: &str, value: impl std::fmt::Display) -> io::Result<()> {
        self.result_indented(label, value, 2)
    }

    pub fn result_indented(
        &mut self,
        label: &str,
        value: impl std::fmt::Display,
        indent: usize,
    ) -> io::Result<()> {
        writeln!(self.out, "{:indent$}{label}: {value}", "")
    }

    pub fn api_key_info(&mut self, info: &ApiKeyInfo) -> io::Result<()> {
        self.success(&format!("API key loaded (length: {})", info.length))?;
        self.success(&format!("SDK client available: {}", info.sdk_client_available))
    }

    pub fn response_summary(&mut self, env: &ResponseEnvelope, label: &str) -> io::Result<()> {
        if env.is_success() {
            self.success(&format!("{label} successful via {}", env.method()))?;
        } else {
            self.error(&format!("{label} failed via {}", env.method()))?;
            self.result("Error", env.error().unwrap_or("Unknown error"))?;
        }
        if let Some(status) = env.status_code() {
            self.result("Status Code", status)?;
        }
        Ok(())
    }

    pub fn json(&mut self, value: &Value) -> io::Result<()> {
        let pretty = serde_json::to_string_pretty(value).map_err(io::Error::other)?;
        self.line(pretty)
    }

    pub fn meeting_summary(&mut self, meetings: &[Meeting], max_display: usize) -> io::Result<()> {
        let rows: Vec<Vec<(String, String)>> = meetings.iter().map(Meeting::fields).collect();
        self.record_summary(&rows, max_display)
    }

    /// Summary of raw JSON meeting records from the REST path.
    pub fn json_meeting_summary(&mut self, items: &[Value], max_display: usize) -> io::Result<()> {
        let rows: Vec<Vec<(String, String)>> = items
            .iter()
            .map(|item| match item {
                Value::Object(map) => map
                    .iter()
                    .map(|(k, v)| (k.clone(), json_display(v)))
                    .collect(),
                other => vec![("value".to_string(), json_display(other))],
            })
            .collect();
        self.record_summary(&rows, max_display)
    }

    fn record_summary(&mut self, rows: &[Vec<(String, String)>], max_display: usize) -> io::Result<()> {
        if rows.is_empty() {
            return self.info("No meetings found in response");
        }
        self.success(&format!("Found {} meeting(s)", rows.len()))?;
        for (i, fields) in rows.iter().take(max_display).enumerate() {
            writeln!(self.out, "\n  Meeting {}:", i + 1)?;
            for (key, value) in fields {
                writeln!(self.out, "    {key}: {}", truncate(value, MAX_VALUE_LEN))?;
            }
        }
        if rows.len() > max_display {
            writeln!(self.out, "\n  ... and {} more meeting(s)", rows.len() - max_display)?;
        }
        Ok(())
    }

    /// One line per filter run: the match count or the error.
    pub fn filter_test(&mut self, name: &str, env: &ResponseEnvelope) -> io::Result<()> {
        match env.data().and_then(ApiData::item_count) {
            Some(count) => {
                let marker = if count > 0 { "🎉" } else { "  " };
                writeln!(self.out, "{marker} {name}: {count} meetings")?;
                if count > 0 {
                    writeln!(self.out, "     Found meetings with this filter!")?;
                }
                Ok(())
            }
            None => writeln!(
                self.out,
                "❌ {name}: Error - {}",
                env.error().unwrap_or("Unknown error")
            ),
        }
    }

    /// Shape of a successful response: kind, item count, limit and cursor.
    pub fn data_debug_info(&mut self, data: &ApiData) -> io::Result<()> {
        self.blank()?;
        self.line("🔍 Debug Information:")?;
        let (kind, limit, cursor) = match data {
            ApiData::Teams(page) => ("teams page", page.limit, page.next_cursor.clone()),
            ApiData::Meetings(page) => ("meetings page", page.limit, page.next_cursor.clone()),
            ApiData::Json(payload) => (
                "raw json",
                payload
                    .get("limit")
                    .and_then(Value::as_u64)
                    .and_then(|n| u32::try_from(n).ok()),
                payload.get("next_cursor").and_then(Value::as_str).map(str::to_string),
            ),
        };
        self.result("type", kind)?;
        if let Some(count) = data.item_count() {
            self.result("items_count", count)?;
        }
        self.result("limit", display_opt(limit))?;
        self.result("next_cursor", display_opt(cursor))
    }

    pub fn suggestions(&mut self, suggestions: &[&str]) -> io::Result<()> {
        writeln!(self.out, "\n💡 Suggestions:")?;
        for (i, suggestion) in suggestions.iter().enumerate() {
            writeln!(self.out, "{}. {suggestion}", i + 1)?;
        }
        Ok(())
    }

    pub fn completion(&mut self) -> io::Result<()> {
        let rule = "=".repeat(WIDTH);
        writeln!(self.out, "\n{rule}\n✅ Test completed successfully!\n{rule}")
    }
}

/// Cut `value` to `max` characters, marking the cut with `...`.
pub fn truncate(value: &str, max: usize) -> String {
    match value.char_indices().nth(max) {
        Some((cut, _)) => format!("{}...", &value[..cut]),
        None => value.to_string(),
    }
}

fn display_opt<T: std::fmt::Display>(value: Option<T>) -> String {
    value.map_or_else(|| "None".to_string(), |v| v.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use fathom_core::{Method, Page, Payload};
    use serde_json::json;

    fn render(f: impl FnOnce(&mut Console<Vec<u8>>) -> io::Result<()>) -> String {
        let mut console = Console::new(Vec::new());
        f(&mut console).unwrap();
        String::from_utf8(console.into_inner()).unwrap()
    }

    fn meetings(n: usize) -> Vec<Meeting> {
        (0..n)
            .map(|i| serde_json::from_value(json!({"title": format!("Meeting {i}")})).unwrap())
            .collect()
    }

    #[test]
    fn truncate_marks_long_values() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdef", 3), "abc...");
    }

    #[test]
    fn header_is_framed() {
        let out = render(|c| c.header("Title"));
        let lines: Vec<_> = out.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].len(), WIDTH);
        assert_eq!(lines[1], "Title");
    }

    #[test]
    fn meeting_summary_limits_display() {
        let out = render(|c| c.meeting_summary(&meetings(5), 3));
        assert!(out.starts_with("✅ Found 5 meeting(s)"));
        assert!(out.contains("Meeting 3:"));
        assert!(!out.contains("Meeting 4:"));
        assert!(out.contains("... and 2 more meeting(s)"));
    }

    #[test]
    fn empty_meeting_summary() {
        let out = render(|c| c.meeting_summary(&[], 3));
        assert_eq!(out, "ℹ️  No meetings found in response\n");
    }

    #[test]
    fn json_summary_truncates_long_strings() {
        let long = "x".repeat(150);
        let out = render(|c| c.json_meeting_summary(&[json!({"notes": long})], 3));
        let expected = format!("    notes: {}...", "x".repeat(MAX_VALUE_LEN));
        assert!(out.contains(&expected));
    }

    #[test]
    fn failed_response_summary_shows_error_and_status() {
        let env = ResponseEnvelope::failure(Method::Rest, "nope", Some(403));
        let out = render(|c| c.response_summary(&env, "List Teams REST"));
        assert_eq!(
            out,
            "❌ List Teams REST failed via rest\n  Error: nope\n  Status Code: 403\n"
        );
    }

    #[test]
    fn filter_test_counts_items() {
        let env = ResponseEnvelope::success(
            Method::Sdk,
            ApiData::Meetings(Page {
                items: meetings(2),
                next_cursor: None,
                limit: Some(10),
            }),
            None,
        );
        let out = render(|c| c.filter_test("External", &env));
        assert!(out.starts_with("🎉 External: 2 meetings\n"));

        let env = ResponseEnvelope::success(Method::Sdk, ApiData::Meetings(Page::default()), None);
        assert_eq!(render(|c| c.filter_test("None", &env)), "   None: 0 meetings\n");

        let env = ResponseEnvelope::sdk_not_initialized();
        assert_eq!(
            render(|c| c.filter_test("Broken", &env)),
            "❌ Broken: Error - SDK client not initialized\n"
        );
    }

    #[test]
    fn debug_info_for_raw_json() {
        let payload = Payload::from_value(json!({"items": [1, 2], "limit": 5, "next_cursor": null})).unwrap();
        let out = render(|c| c.data_debug_info(&ApiData::Json(payload)));
        assert!(out.contains("  type: raw json"));
        assert!(out.contains("  items_count: 2"));
        assert!(out.contains("  limit: 5"));
        assert!(out.contains("  next_cursor: None"));
    }
}
