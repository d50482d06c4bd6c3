#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Line-oriented text format describing a treasure map.
//!
//! ```text
//! C - <width> - <height>
//! M - <x> - <y>
//! T - <x> - <y> - <count>
//! A - <name> - <x> - <y> - <N|E|S|W> - <A|D|G...>
//! ```
//!
//! Lines starting with `#` and blank lines are skipped. Rendered reports use the
//! same tags, except that `A` lines carry the number of collected treasures in
//! place of the instruction sequence and exhausted treasure piles are omitted.

use std::{fmt, io};

use treasure_map_core::{
    Adventurer, CellCoord, Direction, Instruction, MapDimensions, Mountain, Scenario, Treasure,
};

mod error;

pub use error::{LineError, ParseError};

/// Separator placed between the fields of a record.
pub const FIELD_SEPARATOR: &str = " - ";

/// Validation rules applied while parsing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Dialect {
    /// Rejects duplicate maps, surplus fields and illegal adventurer placements.
    #[default]
    Strict,
    /// Accepts what older tools produced: the last map declaration wins, surplus
    /// fields are dropped and adventurer placements are not checked.
    Legacy,
}

/// Parses a simulation input using the strict dialect.
pub fn parse(text: &str) -> Result<Scenario, ParseError> {
    parse_with(text, Dialect::Strict)
}

/// Parses a simulation input using the provided dialect.
pub fn parse_with(text: &str, dialect: Dialect) -> Result<Scenario, ParseError> {
    parse_document(text, dialect, Layout::Instructions)
}

/// Parses a rendered report back into a scenario whose adventurers have no instructions left.
pub fn parse_report(text: &str) -> Result<Scenario, ParseError> {
    parse_document(text, Dialect::Strict, Layout::Report)
}

/// Renders the scenario in the report layout.
#[must_use]
pub fn render(scenario: &Scenario) -> String {
    Report(scenario).to_string()
}

/// Writes the scenario in the report layout to the provided sink.
pub fn write_scenario<W: io::Write>(scenario: &Scenario, mut writer: W) -> io::Result<()> {
    write!(writer, "{}", Report(scenario))?;
    writer.flush()
}

struct Report<'a>(&'a Scenario);

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let scenario = self.0;
        writeln!(
            f,
            "C - {} - {}",
            scenario.map.width(),
            scenario.map.height()
        )?;
        for mountain in &scenario.mountains {
            let cell = mountain.cell();
            writeln!(f, "M - {} - {}", cell.column(), cell.row())?;
        }
        for treasure in scenario.treasures.iter().filter(|treasure| treasure.count() > 0) {
            let cell = treasure.cell();
            writeln!(
                f,
                "T - {} - {} - {}",
                cell.column(),
                cell.row(),
                treasure.count()
            )?;
        }
        for adventurer in &scenario.adventurers {
            let cell = adventurer.cell();
            writeln!(
                f,
                "A - {} - {} - {} - {} - {}",
                adventurer.name(),
                cell.column(),
                cell.row(),
                adventurer.facing().letter(),
                adventurer.treasures_collected()
            )?;
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Layout {
    Instructions,
    Report,
}

#[derive(Debug)]
enum Record {
    Map(MapDimensions),
    Mountain(Mountain),
    Treasure(Treasure),
    Adventurer(Adventurer),
}

fn parse_document(text: &str, dialect: Dialect, layout: Layout) -> Result<Scenario, ParseError> {
    let mut map: Option<(usize, MapDimensions)> = None;
    let mut mountains = Vec::new();
    let mut treasures = Vec::new();
    let mut adventurers: Vec<(usize, Adventurer)> = Vec::new();

    for (index, raw) in text.lines().enumerate() {
        let line = index + 1;
        if raw.starts_with('#') || raw.trim().is_empty() {
            continue;
        }

        let record = parse_record(raw, dialect, layout)
            .map_err(|reason| ParseError::InvalidLine { line, reason })?;
        match record {
            Record::Map(dimensions) => {
                if let (Some((first, _)), Dialect::Strict) = (map, dialect) {
                    return Err(ParseError::InvalidLine {
                        line,
                        reason: LineError::DuplicateMap { first },
                    });
                }
                map = Some((line, dimensions));
            }
            Record::Mountain(mountain) => mountains.push(mountain),
            Record::Treasure(treasure) => treasures.push(treasure),
            Record::Adventurer(adventurer) => adventurers.push((line, adventurer)),
        }
    }

    let Some((_, map)) = map else {
        return Err(ParseError::NoMapFound);
    };

    let mut scenario = Scenario::new(map);
    scenario.mountains = mountains;
    scenario.treasures = treasures;
    if dialect == Dialect::Strict {
        check_placements(&scenario, &adventurers)?;
    }
    scenario.adventurers = adventurers
        .into_iter()
        .map(|(_, adventurer)| adventurer)
        .collect();
    Ok(scenario)
}

fn parse_record(raw: &str, dialect: Dialect, layout: Layout) -> Result<Record, LineError> {
    let fields: Vec<&str> = raw.split(FIELD_SEPARATOR).collect();
    match fields[0].trim() {
        "C" => {
            let fields = expect_fields(&fields, 3, dialect)?;
            let width = number(fields[1], "width")?;
            let height = number(fields[2], "height")?;
            if width == 0 || height == 0 {
                return Err(LineError::EmptyMap);
            }
            Ok(Record::Map(MapDimensions::new(width, height)))
        }
        "M" => {
            let fields = expect_fields(&fields, 3, dialect)?;
            Ok(Record::Mountain(Mountain::new(cell(fields[1], fields[2])?)))
        }
        "T" => {
            let fields = expect_fields(&fields, 4, dialect)?;
            let position = cell(fields[1], fields[2])?;
            let count = number(fields[3], "count")?;
            Ok(Record::Treasure(Treasure::new(position, count)))
        }
        "A" => {
            let fields = expect_fields(&fields, 6, dialect)?;
            // Names are kept verbatim, surrounding spaces included.
            let name = fields[1];
            let position = cell(fields[2], fields[3])?;
            let facing = direction(fields[4])?;
            let adventurer = match layout {
                Layout::Instructions => {
                    Adventurer::new(name, position, facing, instructions(fields[5])?)
                }
                Layout::Report => Adventurer::new(name, position, facing, Vec::new())
                    .with_treasures(number(fields[5], "treasures")?),
            };
            Ok(Record::Adventurer(adventurer))
        }
        tag => Err(LineError::UnknownTag(tag.to_owned())),
    }
}

fn expect_fields<'f, 'a>(
    fields: &'f [&'a str],
    expected: usize,
    dialect: Dialect,
) -> Result<&'f [&'a str], LineError> {
    let found = fields.len();
    let acceptable = match dialect {
        Dialect::Strict => found == expected,
        Dialect::Legacy => found >= expected,
    };
    if acceptable {
        Ok(&fields[..expected])
    } else {
        Err(LineError::FieldCount { expected, found })
    }
}

fn number(value: &str, field: &'static str) -> Result<u32, LineError> {
    value.trim().parse::<u32>().map_err(|_| LineError::InvalidNumber {
        field,
        value: value.to_owned(),
    })
}

fn cell(column: &str, row: &str) -> Result<CellCoord, LineError> {
    Ok(CellCoord::new(number(column, "x")?, number(row, "y")?))
}

fn direction(value: &str) -> Result<Direction, LineError> {
    let mut letters = value.trim().chars();
    let parsed = match (letters.next(), letters.next()) {
        (Some(letter), None) => Direction::from_letter(letter),
        _ => None,
    };
    parsed.ok_or_else(|| LineError::InvalidDirection(value.to_owned()))
}

fn instructions(value: &str) -> Result<Vec<Instruction>, LineError> {
    value
        .trim()
        .chars()
        .map(|letter| Instruction::from_letter(letter).ok_or(LineError::InvalidInstruction(letter)))
        .collect()
}

fn check_placements(
    scenario: &Scenario,
    adventurers: &[(usize, Adventurer)],
) -> Result<(), ParseError> {
    for (position, (line, adventurer)) in adventurers.iter().enumerate() {
        let here = adventurer.cell();
        let reason = if !scenario.map.contains(here) {
            Some(LineError::OutOfBounds)
        } else if scenario.is_mountain(here) {
            Some(LineError::OnMountain)
        } else {
            adventurers[..position]
                .iter()
                .find(|(_, other)| other.cell() == here)
                .map(|(other, _)| LineError::Overlap { other: *other })
        };
        if let Some(reason) = reason {
            return Err(ParseError::InvalidLine {
                line: *line,
                reason,
            });
        }
    }
    Ok(())
}
