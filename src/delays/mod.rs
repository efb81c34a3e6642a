//! Delay grammar engine.
//!
//! Motor manufacturers publish ejection-delay options as free-form strings:
//! `"4,6,8"`, `"5-9"`, `"S"`, `"23/P"`, `"0-3-5-7-9"`.  [`parse_delays`]
//! turns one of those into a canonical set of integer delay seconds plus a
//! plugged flag, and [`unparse_delays`] serializes a set back into the
//! minimal canonical string, collapsing runs of three or more consecutive
//! values into ranges.  The pair round-trips exactly for inputs made of
//! integers, ranges and `P`; letter codes are lossy on purpose (they expand
//! to their integer set and stay expanded).

use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::DelayError;

/// Largest `max - min` span accepted for a range token. Guards against
/// malformed input like `"6-100"` expanding into a huge set.
const MAX_RANGE_SPAN: u32 = 20;

static INTEGER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+$").unwrap());
static RANGE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d+)-(\d+)$").unwrap());
static HYPHEN_LIST: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+-\d+-").unwrap());

/// Normalized delay configuration for one motor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DelaySpec {
    /// Achievable delay times in seconds, deduplicated and ascending.
    pub times: BTreeSet<u32>,
    /// True if the motor can be flown with the ejection charge disabled.
    pub plugged: bool,
}

impl DelaySpec {
    pub fn from_times<I: IntoIterator<Item = u32>>(times: I) -> Self {
        Self {
            times: times.into_iter().collect(),
            plugged: false,
        }
    }
}

/// Parse a vendor delay string into a [`DelaySpec`].
pub fn parse_delays(raw: &str) -> Result<DelaySpec, DelayError> {
    // Remove whitespace
    let mut delays: String = raw.chars().filter(|c| !c.is_whitespace()).collect();

    // Kosdon J975F has a "23/P" delay. Not really sure what this means, but
    // we map it to "23,P" for now.
    delays = delays.replace('/', ",");

    // Convert hyphens to commas where it makes sense to do so:
    // "#-#-#..." is a list, not a range.
    if HYPHEN_LIST.is_match(&delays) {
        delays = delays.replace('-', ",");
    }

    let mut times = BTreeSet::new();
    let mut plugged = false;

    for token in delays.split(',') {
        // Ignore empty string (leading/trailing/double commas)
        if token.is_empty() {
            continue;
        }

        if INTEGER.is_match(token) {
            times.insert(parse_int(token, raw)?);
            continue;
        }

        // Aerotech letter delays. The delay drilling tool can remove up to
        // 8 seconds of delay in 2-second increments. Aerotech warns against
        // delays < 6 seconds in the DMS drill tool instructions, and Sirius
        // Rocketry warns against delays < 4 seconds for the RMS drill tool.
        match token {
            "S" => {
                times.extend([4, 6]);
                continue;
            }
            "M" => {
                times.extend([4, 6, 8, 10]);
                continue;
            }
            "L" => {
                times.extend([6, 8, 10, 12, 14]);
                continue;
            }
            "X" => {
                times.extend([10, 12, 14, 16, 18]);
                continue;
            }
            "P" => {
                plugged = true;
                continue;
            }
            _ => {}
        }

        if let Some(caps) = RANGE.captures(token) {
            let mut min: u32 = parse_int(&caps[1], raw)?;
            let mut max: u32 = parse_int(&caps[2], raw)?;
            if min > max {
                std::mem::swap(&mut min, &mut max);
            }
            if max - min > MAX_RANGE_SPAN {
                return Err(DelayError::RangeTooLarge {
                    input: raw.to_string(),
                });
            }
            times.extend(min..=max);
        } else {
            return Err(DelayError::UnrecognizedToken {
                token: token.to_string(),
                input: raw.to_string(),
            });
        }
    }

    Ok(DelaySpec { times, plugged })
}

fn parse_int(token: &str, input: &str) -> Result<u32, DelayError> {
    token.parse().map_err(|_| DelayError::UnrecognizedToken {
        token: token.to_string(),
        input: input.to_string(),
    })
}

/// Serialize a [`DelaySpec`] into its minimal canonical string form.
///
/// Runs of three or more consecutive values collapse into `"min-max"`; a
/// pair of adjacent values stays `"min,max"` (ranges are reserved for 3+).
pub fn unparse_delays(spec: &DelaySpec) -> String {
    let mut vals: Vec<String> = Vec::new();

    // Aggregate adjacent values into runs
    let mut run: Option<(u32, u32)> = None;
    for &t in &spec.times {
        run = match run {
            Some((min, max)) if t == max + 1 => Some((min, t)),
            Some(r) => {
                flush_run(&mut vals, r);
                Some((t, t))
            }
            None => Some((t, t)),
        };
    }
    if let Some(r) = run {
        flush_run(&mut vals, r);
    }

    if spec.plugged {
        vals.push("P".to_string());
    }

    vals.join(",")
}

fn flush_run(vals: &mut Vec<String>, (min, max): (u32, u32)) {
    if min == max {
        vals.push(min.to_string());
    } else if max == min + 1 {
        vals.push(format!("{min},{max}"));
    } else {
        vals.push(format!("{min}-{max}"));
    }
}
