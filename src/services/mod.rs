/// Motor normalization pipeline
use std::collections::{HashMap, HashSet};

use tracing::{info, warn};

use crate::corrections::{rule_for, DelayCache};
use crate::delays::{parse_delays, unparse_delays};
use crate::domain::{Motor, RawSampleSet, ReconciledSamples, SampleSource, ThrustPoint};
use crate::utils::{motor_name, sig};

/// Significant digits retained for thrust-curve samples.
const SAMPLE_SIG_DIGITS: i32 = 4;
/// Time offset applied to a sample reported at t=0 with non-zero thrust.
const IGNITION_EPSILON: f64 = 1e-4;

/// Finalized dataset plus data-quality diagnostics. Warnings never alter
/// control flow; they are reported alongside the motors.
#[derive(Debug, Default)]
pub struct NormalizedCatalog {
    pub motors: Vec<Motor>,
    pub warnings: Vec<String>,
}

/// Merge raw catalog listings and thrust-sample sets into one finalized,
/// sorted motor list. All inputs are explicit; the scraped-delay cache is
/// passed down rather than read from ambient state.
pub fn normalize(
    all: Vec<Motor>,
    available: Vec<Motor>,
    sample_sets: Vec<RawSampleSet>,
    scraped: &DelayCache,
) -> NormalizedCatalog {
    let mut warnings = Vec::new();

    // Index by motorId. The catalog guarantees uniqueness; if it lies, the
    // last record wins.
    let mut motors: HashMap<String, Motor> = HashMap::new();
    for motor in all {
        motors.insert(motor.motor_id.clone(), motor);
    }

    apply_delay_corrections(&mut motors, scraped, &mut warnings);
    validate_delays(&motors, &mut warnings);
    flag_availability(&mut motors, &available);
    reconcile_samples(&mut motors, sample_sets, &mut warnings);
    audit_missing_thrust(&motors, &mut warnings);

    let mut motors: Vec<Motor> = motors.into_values().collect();
    motors.sort_by(|a, b| a.motor_id.cmp(&b.motor_id));

    NormalizedCatalog { motors, warnings }
}

/// Apply per-manufacturer delay-correction rules, overwriting the catalog
/// `delays` value only when the corrected canonical form differs.
fn apply_delay_corrections(
    motors: &mut HashMap<String, Motor>,
    scraped: &DelayCache,
    warnings: &mut Vec<String>,
) {
    for motor in motors.values_mut() {
        let Some(rule) = rule_for(&motor.manufacturer_abbrev) else {
            continue;
        };
        let Some(spec) = rule(motor, scraped) else {
            continue;
        };

        let corrected = unparse_delays(&spec);
        if motor.delays.as_deref() != Some(corrected.as_str()) {
            let msg = format!(
                "{}: delays corrected from {:?} to {:?}",
                motor_name(motor),
                motor.delays.as_deref().unwrap_or(""),
                corrected
            );
            warn!("{msg}");
            warnings.push(msg);
            motor.delays = Some(corrected);
        }
    }
}

/// Re-parse every motor's final delay string. A failure is reportable for
/// that one motor but never aborts the run.
fn validate_delays(motors: &HashMap<String, Motor>, warnings: &mut Vec<String>) {
    for motor in motors.values() {
        let Some(delays) = motor.delays.as_deref() else {
            continue;
        };
        if let Err(err) = parse_delays(delays) {
            let msg = format!("{}: {err}", motor_name(motor));
            warn!("{msg}");
            warnings.push(msg);
        }
    }
}

/// Every motor is provisionally discontinued; the ones present in the
/// available-motors listing are cleared back to regular availability.
fn flag_availability(motors: &mut HashMap<String, Motor>, available: &[Motor]) {
    let available_ids: HashSet<&str> = available.iter().map(|m| m.motor_id.as_str()).collect();
    for motor in motors.values_mut() {
        motor.availability = Some(if available_ids.contains(motor.motor_id.as_str()) {
            "regular".to_string()
        } else {
            "OOP".to_string()
        });
    }
}

/// Pick one thrust curve per motor. The first cert(ification) sample set
/// wins outright; otherwise the last set encountered wins.
fn reconcile_samples(
    motors: &mut HashMap<String, Motor>,
    sample_sets: Vec<RawSampleSet>,
    warnings: &mut Vec<String>,
) {
    for set in sample_sets {
        let Some(motor) = motors.get_mut(&set.motor_id) else {
            warn!("thrust samples reference unknown motor id {}", set.motor_id);
            continue;
        };
        if set.samples.is_empty() {
            continue;
        }

        let mut points: Vec<ThrustPoint> = set
            .samples
            .iter()
            .map(|s| [sig(s.time, SAMPLE_SIG_DIGITS), sig(s.thrust, SAMPLE_SIG_DIGITS)])
            .collect();

        // The curve must start at [0, 0]. Thrust cannot be instantaneous at
        // ignition, so a non-zero thrust reported at t=0 gets nudged forward
        // rather than dropped.
        let [first_time, first_thrust] = points[0];
        if first_time == 0.0 && first_thrust != 0.0 {
            let msg = format!(
                "{}: non-zero thrust at ignition instant, nudging sample",
                motor_name(motor)
            );
            warn!("{msg}");
            warnings.push(msg);
            points[0][0] = IGNITION_EPSILON;
            points.insert(0, [0.0, 0.0]);
        } else if first_time != 0.0 {
            points.insert(0, [0.0, 0.0]);
        }

        let cert_already_kept =
            matches!(&motor.samples, Some(kept) if kept.source == SampleSource::Cert);
        if !cert_already_kept {
            motor.samples = Some(ReconciledSamples {
                points,
                source: set.source,
            });
        }
    }
}

/// Report motors that ended up without any thrust curve. Missing thrust
/// data is not fatal; the motor stays in the output.
fn audit_missing_thrust(motors: &HashMap<String, Motor>, warnings: &mut Vec<String>) {
    let mut names: Vec<String> = motors
        .values()
        .filter(|m| m.samples.is_none())
        .map(motor_name)
        .collect();
    if names.is_empty() {
        return;
    }

    names.sort();
    info!("{} motors missing thrust data", names.len());
    for name in names {
        warnings.push(format!("missing thrust data: {name}"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RawSample;

    fn motor(id: &str, abbrev: &str, designation: &str, diameter: f64) -> Motor {
        Motor {
            motor_id: id.to_string(),
            manufacturer_abbrev: abbrev.to_string(),
            designation: designation.to_string(),
            diameter,
            ..Motor::default()
        }
    }

    fn sample_set(motor_id: &str, source: SampleSource, samples: &[(f64, f64)]) -> RawSampleSet {
        RawSampleSet {
            motor_id: motor_id.to_string(),
            samples: samples
                .iter()
                .map(|&(time, thrust)| RawSample { time, thrust })
                .collect(),
            source,
            format: None,
        }
    }

    #[test]
    fn test_duplicate_motor_id_last_wins() {
        let mut first = motor("a", "Estes", "C6-5", 18.0);
        first.common_name = "first".to_string();
        let mut second = motor("a", "Estes", "C6-5", 18.0);
        second.common_name = "second".to_string();

        let catalog = normalize(vec![first, second], vec![], vec![], &DelayCache::new());
        assert_eq!(catalog.motors.len(), 1);
        assert_eq!(catalog.motors[0].common_name, "second");
    }

    #[test]
    fn test_sorted_by_motor_id() {
        let catalog = normalize(
            vec![
                motor("zzz", "Estes", "C6-5", 18.0),
                motor("aaa", "Estes", "B4-4", 18.0),
                motor("mmm", "Estes", "A8-3", 18.0),
            ],
            vec![],
            vec![],
            &DelayCache::new(),
        );
        let ids: Vec<&str> = catalog.motors.iter().map(|m| m.motor_id.as_str()).collect();
        assert_eq!(ids, ["aaa", "mmm", "zzz"]);
    }

    #[test]
    fn test_availability_set_difference() {
        let catalog = normalize(
            vec![
                motor("a", "Estes", "C6-5", 18.0),
                motor("b", "Estes", "B4-4", 18.0),
            ],
            vec![motor("b", "Estes", "B4-4", 18.0)],
            vec![],
            &DelayCache::new(),
        );
        let by_id: HashMap<&str, &Motor> = catalog
            .motors
            .iter()
            .map(|m| (m.motor_id.as_str(), m))
            .collect();
        assert_eq!(by_id["a"].availability.as_deref(), Some("OOP"));
        assert_eq!(by_id["b"].availability.as_deref(), Some("regular"));
    }

    #[test]
    fn test_cert_wins_over_later_user() {
        let sets = vec![
            sample_set("a", SampleSource::Cert, &[(0.1, 10.0), (1.0, 0.0)]),
            sample_set("a", SampleSource::User, &[(0.2, 20.0), (2.0, 0.0)]),
        ];
        let catalog = normalize(
            vec![motor("a", "Estes", "C6-5", 18.0)],
            vec![],
            sets,
            &DelayCache::new(),
        );
        let kept = catalog.motors[0].samples.as_ref().unwrap();
        assert_eq!(kept.source, SampleSource::Cert);
        assert_eq!(kept.points[1], [0.1, 10.0]);
    }

    #[test]
    fn test_user_then_cert_keeps_cert() {
        let sets = vec![
            sample_set("a", SampleSource::User, &[(0.2, 20.0), (2.0, 0.0)]),
            sample_set("a", SampleSource::Cert, &[(0.1, 10.0), (1.0, 0.0)]),
        ];
        let catalog = normalize(
            vec![motor("a", "Estes", "C6-5", 18.0)],
            vec![],
            sets,
            &DelayCache::new(),
        );
        let kept = catalog.motors[0].samples.as_ref().unwrap();
        assert_eq!(kept.source, SampleSource::Cert);
    }

    #[test]
    fn test_last_non_cert_wins() {
        let sets = vec![
            sample_set("a", SampleSource::User, &[(0.2, 20.0)]),
            sample_set("a", SampleSource::User, &[(0.3, 30.0)]),
        ];
        let catalog = normalize(
            vec![motor("a", "Estes", "C6-5", 18.0)],
            vec![],
            sets,
            &DelayCache::new(),
        );
        let kept = catalog.motors[0].samples.as_ref().unwrap();
        assert_eq!(kept.points, vec![[0.0, 0.0], [0.3, 30.0]]);
    }

    #[test]
    fn test_zero_point_inserted() {
        let sets = vec![sample_set("a", SampleSource::User, &[(0.5, 42.0)])];
        let catalog = normalize(
            vec![motor("a", "Estes", "C6-5", 18.0)],
            vec![],
            sets,
            &DelayCache::new(),
        );
        let kept = catalog.motors[0].samples.as_ref().unwrap();
        assert_eq!(kept.points[0], [0.0, 0.0]);
        assert_eq!(kept.points[1], [0.5, 42.0]);
    }

    #[test]
    fn test_existing_zero_point_kept() {
        let sets = vec![sample_set("a", SampleSource::User, &[(0.0, 0.0), (0.5, 42.0)])];
        let catalog = normalize(
            vec![motor("a", "Estes", "C6-5", 18.0)],
            vec![],
            sets,
            &DelayCache::new(),
        );
        let kept = catalog.motors[0].samples.as_ref().unwrap();
        assert_eq!(kept.points.len(), 2);
        assert_eq!(kept.points[0], [0.0, 0.0]);
    }

    #[test]
    fn test_nonzero_thrust_at_ignition_nudged() {
        let sets = vec![sample_set("a", SampleSource::User, &[(0.0, 50.0), (1.0, 0.0)])];
        let catalog = normalize(
            vec![motor("a", "Estes", "C6-5", 18.0)],
            vec![],
            sets,
            &DelayCache::new(),
        );
        let kept = catalog.motors[0].samples.as_ref().unwrap();
        assert_eq!(kept.points[0], [0.0, 0.0]);
        assert_eq!(kept.points[1], [1e-4, 50.0]);
        assert!(catalog
            .warnings
            .iter()
            .any(|w| w.contains("non-zero thrust at ignition")));
    }

    #[test]
    fn test_samples_rounded_to_four_significant_digits() {
        let sets = vec![sample_set("a", SampleSource::User, &[(0.123456, 98.76543)])];
        let catalog = normalize(
            vec![motor("a", "Estes", "C6-5", 18.0)],
            vec![],
            sets,
            &DelayCache::new(),
        );
        let kept = catalog.motors[0].samples.as_ref().unwrap();
        assert_eq!(kept.points[1], [0.1235, 98.77]);
    }

    #[test]
    fn test_missing_thrust_audit() {
        let catalog = normalize(
            vec![motor("a", "Estes", "C6-5", 18.0)],
            vec![],
            vec![],
            &DelayCache::new(),
        );
        assert_eq!(catalog.motors.len(), 1);
        assert!(catalog.motors[0].samples.is_none());
        assert!(catalog
            .warnings
            .iter()
            .any(|w| w == "missing thrust data: Estes C6-5"));
    }

    #[test]
    fn test_cesaroni_correction_applied_and_warned() {
        let mut m = motor("a", "Cesaroni", "841I303-14A", 38.0);
        m.delays = Some("14A".to_string());
        let catalog = normalize(vec![m], vec![], vec![], &DelayCache::new());
        assert_eq!(catalog.motors[0].delays.as_deref(), Some("6,8,10,12,14"));
        assert!(catalog
            .warnings
            .iter()
            .any(|w| w.contains("delays corrected")));
    }

    #[test]
    fn test_correction_noop_when_already_canonical() {
        let mut m = motor("a", "Cesaroni", "1412K454-5", 54.0);
        m.delays = Some("5".to_string());
        let catalog = normalize(vec![m], vec![], vec![], &DelayCache::new());
        assert_eq!(catalog.motors[0].delays.as_deref(), Some("5"));
        assert!(!catalog
            .warnings
            .iter()
            .any(|w| w.contains("delays corrected")));
    }

    #[test]
    fn test_other_manufacturers_untouched() {
        let mut m = motor("a", "AeroTech", "J500G-14A", 54.0);
        m.delays = Some("14A".to_string());
        let catalog = normalize(vec![m], vec![], vec![], &DelayCache::new());
        assert_eq!(catalog.motors[0].delays.as_deref(), Some("14A"));
    }

    #[test]
    fn test_malformed_delays_reported_not_fatal() {
        let mut bad = motor("a", "Estes", "C6-5", 18.0);
        bad.delays = Some("7,Q".to_string());
        let good = motor("b", "Estes", "B4-4", 18.0);
        let catalog = normalize(vec![bad, good], vec![], vec![], &DelayCache::new());
        assert_eq!(catalog.motors.len(), 2);
        assert_eq!(catalog.motors[0].delays.as_deref(), Some("7,Q"));
        assert!(catalog.warnings.iter().any(|w| w.contains("\"Q\"")));
    }

    #[test]
    fn test_samples_for_unknown_motor_ignored() {
        let sets = vec![sample_set("ghost", SampleSource::Cert, &[(0.1, 10.0)])];
        let catalog = normalize(
            vec![motor("a", "Estes", "C6-5", 18.0)],
            vec![],
            sets,
            &DelayCache::new(),
        );
        assert!(catalog.motors[0].samples.is_none());
    }
}
