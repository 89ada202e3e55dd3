//! Run meeting listings through the SDK path under a range of filter
//! combinations and report how many meetings each one matches.

use std::io::Write;
use std::process;

use anyhow::Result;
use clap::Parser;
use fathom_cli::display::Console;
use fathom_cli::{logging, CommonArgs};
use fathom_core::filters::{self, CalendarInviteesDomainsType, MeetingType};
use fathom_core::{ApiData, ConnectionConfig, FathomConnection, FilterSet};

#[derive(Parser, Debug)]
#[command(name = "fathom-test-filters", version, about = "Test Fathom API filters")]
struct Cli {
    #[command(flatten)]
    common: CommonArgs,
}

const DATE_RANGES: &[(&str, i64)] = &[
    ("Last 7 days", 7),
    ("Last 30 days", 30),
    ("Last 90 days", 90),
    ("Last 365 days", 365),
];

fn main() -> Result<()> {
    let cli = Cli::parse();
    let debug = cli.common.debug;
    logging::init_logging(debug);

    let mut out = Console::stdout();
    out.header("Fathom.ai Comprehensive Filter Testing")?;

    let conn = match connect(debug) {
        Ok(conn) => conn,
        Err(e) => {
            out.error(&format!("ERROR: {e}"))?;
            process::exit(1);
        }
    };
    out.api_key_info(&conn.api_key_info())?;
    if debug {
        out.success("Debug mode enabled - HTTP requests will be logged")?;
    }
    out.blank()?;

    default_filters(&mut out, &conn)?;
    domain_filters(&mut out, &conn)?;
    date_range_filters(&mut out, &conn)?;
    meeting_type_filters(&mut out, &conn)?;
    combined_filters(&mut out, &conn)?;
    no_filters(&mut out, &conn)?;

    out.completion()?;
    if debug {
        out.line("\n💡 Tip: Review the HTTP request logs above to see exactly what was sent to the API")?;
    }
    Ok(())
}

fn connect(debug: bool) -> Result<FathomConnection> {
    let config = ConnectionConfig::resolve(None, None)?.with_debug(debug);
    Ok(FathomConnection::new(config)?)
}

fn filter_names(set: &FilterSet) -> String {
    set.keys().collect::<Vec<_>>().join(", ")
}

fn default_filters<W: Write>(out: &mut Console<W>, conn: &FathomConnection) -> Result<()> {
    out.subheader("Test 1: Default SDK Filters")?;
    out.line("Default filters applied:")?;
    for (name, value) in fathom_core::sdk::default_meeting_filters().iter() {
        out.line(format!("  - {name}={value}"))?;
    }
    out.blank()?;

    let env = conn.list_meetings_sdk(&FilterSet::new());
    out.filter_test("Default filters", &env)?;
    if let Some(page) = env.data().and_then(ApiData::as_meetings) {
        out.result("Limit", page.limit.map_or_else(|| "None".to_string(), |l| l.to_string()))?;
        out.result("Next cursor", page.next_cursor.as_deref().unwrap_or("None"))?;
    }
    Ok(())
}

fn domain_filters<W: Write>(out: &mut Console<W>, conn: &FathomConnection) -> Result<()> {
    out.subheader("Test 2: Calendar Invitee Domain Filters")?;
    for kind in [
        CalendarInviteesDomainsType::OneOrMoreExternal,
        CalendarInviteesDomainsType::OnlyInternal,
    ] {
        let set = FilterSet::new().with(filters::CALENDAR_INVITEES_DOMAINS_TYPE, kind);
        let env = conn.list_meetings_sdk(&set);
        out.filter_test(&kind.as_str().to_uppercase(), &env)?;
    }
    Ok(())
}

fn date_range_filters<W: Write>(out: &mut Console<W>, conn: &FathomConnection) -> Result<()> {
    out.subheader("Test 3: Date Range Filters")?;
    for &(name, days) in DATE_RANGES {
        let set = filters::last_n_days(days);
        if let Some(since) = set.get(filters::CREATED_AFTER) {
            out.result(name, since)?;
        }
        let env = conn.list_meetings_sdk(&set);
        out.filter_test(name, &env)?;

        if let Some(page) = env.data().and_then(ApiData::as_meetings) {
            if !page.items.is_empty() {
                out.success("Found meetings! Showing first 3:")?;
                out.meeting_summary(&page.items, 3)?;
                out.blank()?;
            }
        }
    }
    Ok(())
}

fn meeting_type_filters<W: Write>(out: &mut Console<W>, conn: &FathomConnection) -> Result<()> {
    out.subheader("Test 4: Meeting Type Filters (DEPRECATED)")?;
    out.line("⚠️  Note: meeting_type is deprecated by the Fathom API.")?;
    out.line("⚠️  Use calendar_invitees_domains_type instead (tested in Test 2).\n")?;

    out.line("Testing meeting_type parameter in isolation:")?;
    for kind in [MeetingType::All, MeetingType::Internal, MeetingType::External] {
        let env = conn.list_meetings_sdk(&filters::meeting_type(kind));
        out.filter_test(&format!("meeting_type={}", kind.as_str()), &env)?;
    }
    Ok(())
}

fn combined_filters<W: Write>(out: &mut Console<W>, conn: &FathomConnection) -> Result<()> {
    out.subheader("Test 5: Combined Filter Patterns")?;

    out.line("\n🔧 External meetings (last 30 days) with full details:")?;
    let set = filters::last_n_days(30)
        .merge(filters::external_meetings())
        .merge(filters::with_details());
    out.result("Filters applied", filter_names(&set))?;
    let env = conn.list_meetings_sdk(&set);
    out.filter_test("Combined: External + Last 30 days + Details", &env)?;

    out.line("\n🔧 Internal meetings only:")?;
    let set = filters::internal_meetings();
    out.result("Filters applied", filter_names(&set))?;
    let env = conn.list_meetings_sdk(&set);
    out.filter_test("Internal meetings only", &env)?;
    Ok(())
}

fn no_filters<W: Write>(out: &mut Console<W>, conn: &FathomConnection) -> Result<()> {
    out.subheader("Test 6: Bypass All Default Filters")?;
    out.line("Unsetting every default filter\n")?;

    let env = conn.list_meetings_sdk(&filters::without_defaults());
    out.filter_test("No filters (all unset)", &env)?;
    Ok(())
}
