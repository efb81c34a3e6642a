//! Manufacturer-specific delay corrections.
//!
//! Some manufacturers encode the real delay options in the motor
//! designation rather than the catalog `delays` field. Each rule here is a
//! pure function over one motor (plus the scraped-delay cache) that either
//! returns the corrected [`DelaySpec`] or `None` to leave the motor alone,
//! so new manufacturer conventions can be added without touching the
//! normalization loop.

use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::delays::{parse_delays, DelaySpec};
use crate::domain::Motor;

/// Scraped manufacturer delay reference data: designation -> raw delay text.
pub type DelayCache = HashMap<String, String>;

/// Load a scraped-delay cache file. A missing or unreadable file is an
/// empty cache, not an error.
pub fn load_delay_cache(path: &Path) -> DelayCache {
    fs::read_to_string(path)
        .ok()
        .and_then(|text| serde_json::from_str(&text).ok())
        .unwrap_or_default()
}

/// A correction rule inspects one motor and returns a corrected delay set,
/// or `None` to pass the motor through untouched.
pub type DelayRule = fn(&Motor, &DelayCache) -> Option<DelaySpec>;

/// Correction rules keyed by manufacturer abbreviation.
pub fn rule_for(manufacturer_abbrev: &str) -> Option<DelayRule> {
    match manufacturer_abbrev {
        "Cesaroni" => Some(cesaroni_delays),
        _ => None,
    }
}

/// Adjustment amounts (seconds) the Pro24/Pro29 delay-adjustment tool can
/// remove from the nominal delay grain.
const SMALL_DAT_ADJUSTMENTS: [u32; 5] = [0, 3, 5, 7, 9];
/// Adjustment amounts for the larger-case (Pro38 and up) tool.
const LARGE_DAT_ADJUSTMENTS: [u32; 5] = [0, 2, 4, 6, 8];
/// Case diameter (mm) at or below which the small tool applies.
const SMALL_CASE_MAX_DIAMETER: f64 = 29.0;
/// Smallest delay considered safe when the scrape cache has no entry.
const DEFAULT_MIN_DELAY: u32 = 3;

static ADJUSTABLE_SUFFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"-(\d+)A$").unwrap());
static FIXED_SUFFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"-(\d+)$").unwrap());
static PLUGGED_SUFFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"-P$").unwrap());

/// Cesaroni designations carry the delay in their suffix: `-<N>A` is an
/// adjustable delay with nominal maximum N, `-<N>` is a fixed delay, and
/// `-P` is plugged-only.
fn cesaroni_delays(motor: &Motor, scraped: &DelayCache) -> Option<DelaySpec> {
    if let Some(caps) = ADJUSTABLE_SUFFIX.captures(&motor.designation) {
        let nominal: u32 = caps[1].parse().ok()?;
        let adjustments: &[u32] = if motor.diameter <= SMALL_CASE_MAX_DIAMETER {
            &SMALL_DAT_ADJUSTMENTS
        } else {
            &LARGE_DAT_ADJUSTMENTS
        };
        let floor = scraped_min_delay(&motor.designation, scraped).unwrap_or(DEFAULT_MIN_DELAY);
        let times: BTreeSet<u32> = adjustments
            .iter()
            .filter_map(|&adj| nominal.checked_sub(adj))
            .filter(|&t| t >= floor)
            .collect();
        return Some(DelaySpec {
            times,
            plugged: false,
        });
    }

    if PLUGGED_SUFFIX.is_match(&motor.designation) {
        return Some(DelaySpec {
            times: BTreeSet::new(),
            plugged: true,
        });
    }

    if let Some(caps) = FIXED_SUFFIX.captures(&motor.designation) {
        let fixed: u32 = caps[1].parse().ok()?;
        return Some(DelaySpec::from_times([fixed]));
    }

    None
}

/// Smallest delay listed on the manufacturer's site for this designation,
/// when the scrape cache has a parseable entry.
fn scraped_min_delay(designation: &str, scraped: &DelayCache) -> Option<u32> {
    let raw = scraped.get(designation)?;
    let spec = parse_delays(raw).ok()?;
    spec.times.first().copied()
}
