//! Build shorthand parsing
//!
//! Splits the raw input into teams (`;` or newline) and slots (`/`, with
//! quoting), then hands every slot to the slot parser. Any slot error aborts
//! the whole build.

use thiserror::Error;
use tracing::debug;

use crate::catalog::EntityLookup;
use crate::models::{Build, Team, MAX_TEAMS};
use crate::slot::parse_slot;

/// Name given to builds parsed without an explicit name.
pub const DEFAULT_BUILD_NAME: &str = "team_build";

const TEAM_SEPARATORS: [char; 2] = [';', '\n'];
const SLOT_SEPARATOR: u8 = b'/';

/// Error type for parsing failures.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    /// Text that matches no token pattern
    #[error("Parse Error: Unknown text '{text}' at position {position}")]
    UnknownText { text: String, position: usize },
    /// A card name the entity lookup could not resolve
    #[error("Lookup Error: '{name}': {reason}")]
    Lookup { name: String, reason: String },
}

/// Split one team string into slot strings.
///
/// Slots are `/`-delimited fields with standard delimited-text quoting: a
/// field that opens with `"` may contain `/`, and `""` inside it stands for a
/// literal quote. A quote anywhere else is literal text. Every field is
/// trimmed after unquoting.
///
/// # Examples
///
/// ```
/// use teamcard::parser::split_slots;
///
/// let slots = split_slots(r#""g/l medjed(g/x zela)"/ amen"#);
/// assert_eq!(slots, vec!["g/l medjed(g/x zela)", "amen"]);
/// ```
pub fn split_slots(team: &str) -> Vec<String> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(SLOT_SEPARATOR)
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(team.as_bytes());

    reader
        .records()
        .map_while(Result::ok)
        .flat_map(|record| {
            record.iter().map(str::to_string).collect::<Vec<_>>()
        })
        .collect()
}

/// Quote a slot string so that [`split_slots`] returns it unchanged.
///
/// # Errors
///
/// Returns the writer error if the slot cannot be encoded.
pub fn quote_slot(slot: &str) -> csv::Result<String> {
    let mut buf = Vec::new();
    {
        let mut writer = csv::WriterBuilder::new()
            .delimiter(SLOT_SEPARATOR)
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(&mut buf);
        writer.write_record([slot])?;
        writer.flush()?;
    }
    let quoted = String::from_utf8_lossy(&buf);
    Ok(quoted.trim_end_matches('\n').to_string())
}

/// Split the raw input into at most three non-blank team strings.
pub fn split_teams(input: &str) -> Vec<&str> {
    input
        .split(TEAM_SEPARATORS)
        .filter(|t| !t.trim().is_empty())
        .take(MAX_TEAMS)
        .collect()
}

/// Parse a build shorthand into a [`Build`].
///
/// # Errors
///
/// The first lexical or lookup error from any slot is returned and no
/// partial build is produced.
pub fn parse(input: &str, lookup: &dyn EntityLookup) -> Result<Build, ParseError> {
    parse_named(input, DEFAULT_BUILD_NAME, lookup)
}

/// Parse a build shorthand, naming the resulting build.
pub fn parse_named(
    input: &str,
    name: &str,
    lookup: &dyn EntityLookup,
) -> Result<Build, ParseError> {
    let mut build = Build::new(name);

    for team_str in split_teams(input) {
        let mut team = Team::default();
        for slot_str in split_slots(team_str) {
            if slot_str.is_empty() {
                continue;
            }
            team.slots.extend(parse_slot(&slot_str, lookup)?);
        }
        build.teams.push(team);
    }

    let capacity = Build::placement_capacity(build.teams.len());
    for team in &mut build.teams {
        team.truncate(capacity);
    }

    debug!(
        teams = build.teams.len(),
        slots = build.teams.iter().map(|t| t.slots.len()).sum::<usize>(),
        "parsed build '{}'",
        build.name
    );
    Ok(build)
}
