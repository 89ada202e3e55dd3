//! Exercise teams and meetings through the SDK path, the REST path and the
//! fallback composition, printing what each returns.

use std::io::Write;
use std::process;

use anyhow::Result;
use clap::Parser;
use fathom_cli::display::Console;
use fathom_cli::{logging, CommonArgs};
use fathom_core::types::json_display;
use fathom_core::{ApiData, ConnectionConfig, FathomConnection, FilterSet};

#[derive(Parser, Debug)]
#[command(name = "fathom-test-api", version, about = "Test the Fathom API through both client paths")]
struct Cli {
    #[command(flatten)]
    common: CommonArgs,
}

const SUGGESTIONS: &[&str] = &[
    "Check your Fathom account settings to verify:\n   - Which account/workspace this API key belongs to\n   - What permissions/scopes the API key has\n   - If the key has 'read meetings' permission",
    "Try creating a new API key with full permissions",
    "Verify you're logged into the correct Fathom account",
    "Use fathom-test-filters to test various filter combinations",
    "Pass --debug to see the HTTP requests being sent",
];

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.common.debug);

    let mut out = Console::stdout();
    let conn = match connect(cli.common.debug) {
        Ok(conn) => conn,
        Err(e) => {
            out.error(&format!("ERROR: {e}"))?;
            out.line("\nPlease add your API key to ~/.env:")?;
            out.line("  FATHOM_API_KEY=your_api_key_here")?;
            process::exit(1);
        }
    };

    connection_and_api_key(&mut out, &conn)?;
    teams_both_methods(&mut out, &conn)?;
    meetings_both_methods(&mut out, &conn)?;

    out.subheader("Suggestions & Next Steps")?;
    out.suggestions(SUGGESTIONS)?;
    out.completion()?;
    Ok(())
}

fn connect(debug: bool) -> Result<FathomConnection> {
    let config = ConnectionConfig::resolve(None, None)?.with_debug(debug);
    Ok(FathomConnection::new(config)?)
}

fn connection_and_api_key<W: Write>(out: &mut Console<W>, conn: &FathomConnection) -> Result<()> {
    out.header("Fathom.ai API Connection Test")?;
    let info = conn.api_key_info();
    out.api_key_info(&info)?;
    out.blank()?;

    out.subheader("API Key Information")?;
    out.result("API Key starts with", &info.prefix)?;
    out.result("API Key length", info.length)?;
    out.result("SDK Client Available", info.sdk_client_available)?;
    out.blank()?;
    Ok(())
}

fn teams_both_methods<W: Write>(out: &mut Console<W>, conn: &FathomConnection) -> Result<()> {
    out.subheader("Test: List Teams - Both Methods")?;

    out.line("\n📊 SDK Method:")?;
    let sdk = conn.list_teams_sdk();
    out.response_summary(&sdk, "List Teams SDK")?;
    if let Some(page) = sdk.data().and_then(ApiData::as_teams) {
        out.result("Teams count", page.items.len())?;
        for (i, team) in page.items.iter().enumerate() {
            out.line(format!("\n  Team {}:", i + 1))?;
            out.result_indented("Name", &team.name, 4)?;
            let id = team.extra.get("id").map_or_else(|| "N/A".to_string(), json_display);
            out.result_indented("ID", id, 4)?;
        }
    }

    out.line("\n📊 REST Method:")?;
    let rest = conn.list_teams_rest();
    out.response_summary(&rest, "List Teams REST")?;
    if let Some(payload) = rest.data().and_then(ApiData::as_payload) {
        out.line("\nResponse:")?;
        out.json(&payload.to_value())?;
    }

    out.line("\n📊 Combined Method (auto-fallback):")?;
    let combined = conn.list_teams(false);
    out.response_summary(&combined, "List Teams Combined")?;
    out.result("Method used", combined.method())?;
    Ok(())
}

fn meetings_both_methods<W: Write>(out: &mut Console<W>, conn: &FathomConnection) -> Result<()> {
    out.subheader("Test: List Meetings - Both Methods")?;
    let no_filters = FilterSet::new();

    out.line("\n📊 SDK Method:")?;
    let sdk = conn.list_meetings_sdk(&no_filters);
    out.response_summary(&sdk, "List Meetings SDK")?;
    if let Some(data) = sdk.data() {
        out.data_debug_info(data)?;
        if let Some(page) = data.as_meetings() {
            out.meeting_summary(&page.items, 3)?;
            if page.items.is_empty() {
                out.result("Next cursor", page.next_cursor.as_deref().unwrap_or("N/A"))?;
                out.result(
                    "Limit",
                    page.limit.map_or_else(|| "N/A".to_string(), |l| l.to_string()),
                )?;
            }
        }
    }

    out.line("\n📊 REST Method:")?;
    let rest = conn.list_meetings_rest(&no_filters);
    out.response_summary(&rest, "List Meetings REST")?;
    if let Some(payload) = rest.data().and_then(ApiData::as_payload) {
        out.line("\nResponse:")?;
        out.json(&payload.to_value())?;
        if let Some(items) = payload.items() {
            out.blank()?;
            out.json_meeting_summary(items, 3)?;
        }
    }
    Ok(())
}
