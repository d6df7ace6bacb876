//! Parsers for the small textual grammars the catalog and sysfs speak:
//! ranges, range-lists, assignments, assignment-lists and config-defs.
//!
//! Individual tokens are parsed with `nom`, the same parser-combinator
//! library `perfcnt`'s own `linux::parser` module uses for the binary
//! `perf.data` grammar. The list-level grammars (range-list,
//! assignment-list) split on their separator first, the way the original
//! C implementation does with `strchr`/`strtok`-style scanning, which is
//! what makes "stray trailing comma" naturally a parse failure: it leaves
//! behind an empty segment that the element parser rejects.

use nom::character::complete::{char, digit1};
use nom::combinator::{all_consuming, map_res, opt};
use nom::sequence::preceded;
use nom::IResult;

use crate::error::{Error, Result};

/// A closed integer interval `[start, end]`, `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Range {
    pub start: u64,
    pub end: u64,
}

impl Range {
    pub fn len(&self) -> u64 {
        self.end - self.start + 1
    }

    pub fn contains(&self, n: u64) -> bool {
        n >= self.start && n <= self.end
    }
}

/// An ordered sequence of [`Range`]s.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RangeList(pub Vec<Range>);

impl RangeList {
    pub fn contains(&self, n: u64) -> bool {
        self.0.iter().any(|r| r.contains(n))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// One of the three kernel attribute words a [`ConfigDef`] can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigVar {
    Config,
    Config1,
    Config2,
}

/// `(var, layout)` — how to splice a field value into one attribute word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigDef {
    pub var: ConfigVar,
    pub layout: RangeList,
}

/// A single `key=value` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub key: String,
    pub value: u64,
}

/// An ordered sequence of [`Assignment`]s. Duplicate keys are legal.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AssignmentList(pub Vec<Assignment>);

fn decimal(input: &str) -> IResult<&str, u64> {
    map_res(digit1, |s: &str| s.parse::<u64>())(input)
}

fn range(input: &str) -> IResult<&str, Range> {
    let (input, start) = decimal(input)?;
    let (input, end) = opt(preceded(char('-'), decimal))(input)?;
    Ok((
        input,
        match end {
            Some(end) => Range { start, end },
            None => Range { start, end: start },
        },
    ))
}

/// Parse `"N"` or `"N-M"`.
///
/// Fails on `N > M`: a range's `len()` (`end - start + 1`) would otherwise
/// underflow on malformed catalog input instead of surfacing a `Parse`
/// error.
pub fn parse_range(input: &str) -> Result<Range> {
    let fail = || Error::Parse {
        what: "range",
        input: input.to_owned(),
    };

    let r = all_consuming(range)(input).map(|(_, r)| r).map_err(|_| fail())?;

    if r.start > r.end {
        return Err(fail());
    }

    Ok(r)
}

/// Parse a comma-separated, non-empty list of ranges. A leading, trailing
/// or doubled comma produces an empty segment and therefore fails, same
/// as the upstream C `parse_range_list`.
pub fn parse_range_list(input: &str) -> Result<RangeList> {
    let ranges: Result<Vec<Range>> = input.split(',').map(parse_range).collect();
    ranges.map(RangeList).map_err(|_| Error::Parse {
        what: "range-list",
        input: input.to_owned(),
    })
}

/// Parse `"config:<range-list>"`, `"config1:<range-list>"` or
/// `"config2:<range-list>"`. Any other prefix (including `config3:`)
/// fails.
pub fn parse_config_def(input: &str) -> Result<ConfigDef> {
    let (var, rest) = if let Some(rest) = input.strip_prefix("config1:") {
        (ConfigVar::Config1, rest)
    } else if let Some(rest) = input.strip_prefix("config2:") {
        (ConfigVar::Config2, rest)
    } else if let Some(rest) = input.strip_prefix("config:") {
        (ConfigVar::Config, rest)
    } else {
        return Err(Error::Parse {
            what: "config-def",
            input: input.to_owned(),
        });
    };

    let layout = parse_range_list(rest).map_err(|_| Error::Parse {
        what: "config-def",
        input: input.to_owned(),
    })?;

    Ok(ConfigDef { var, layout })
}

/// Parse `"key=value"`. `value == "None"` normalizes to `0`; otherwise
/// `value` is hexadecimal.
pub fn parse_assignment(input: &str) -> Result<Assignment> {
    let fail = || Error::Parse {
        what: "assignment",
        input: input.to_owned(),
    };

    let eq = input.find('=').ok_or_else(fail)?;
    let key = &input[..eq];
    let value_str = &input[eq + 1..];

    if key.is_empty() || key.contains(',') || value_str.is_empty() {
        return Err(fail());
    }

    let value = if value_str == "None" {
        0
    } else {
        // `strtoul(..., 16)` tolerates an optional "0x"/"0X" prefix; match
        // that so catalog strings written with or without it both parse.
        let digits = value_str
            .strip_prefix("0x")
            .or_else(|| value_str.strip_prefix("0X"))
            .unwrap_or(value_str);
        if digits.is_empty() {
            return Err(fail());
        }
        u64::from_str_radix(digits, 16).map_err(|_| fail())?
    };

    Ok(Assignment {
        key: key.to_owned(),
        value,
    })
}

/// Parse a comma-separated list of assignments. Unlike [`parse_range_list`]
/// there is no tolerance for an empty list: an empty input is treated as
/// one empty segment, which [`parse_assignment`] rejects.
pub fn parse_assignment_list(input: &str) -> Result<AssignmentList> {
    let assignments: Result<Vec<Assignment>> =
        input.split(',').map(parse_assignment).collect();
    assignments.map(AssignmentList)
}
