/// Utility functions
use crate::domain::Motor;

/// Round a value to `digits` significant digits. Zero and non-finite
/// values pass through unchanged; values whose integer part already has
/// more digits than requested are only rounded to the nearest integer.
pub fn sig(val: f64, digits: i32) -> f64 {
    if val == 0.0 || !val.is_finite() {
        return val;
    }

    let negative = val < 0.0;
    let mut v = val.abs();
    let man = digits - v.log10().ceil() as i32;
    if man > 0 {
        let factor = 10f64.powi(man);
        v = (v * factor).round() / factor;
    } else {
        v = v.round();
    }

    if negative {
        -v
    } else {
        v
    }
}

/// Easy-to-read name for a motor, used in diagnostics
pub fn motor_name(motor: &Motor) -> String {
    format!("{} {}", motor.manufacturer_abbrev, motor.designation)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sig_zero() {
        assert_eq!(sig(0.0, 4), 0.0);
    }

    #[test]
    fn test_sig_rounds_fraction() {
        assert_eq!(sig(3.14159, 4), 3.142);
        assert_eq!(sig(0.125, 2), 0.13);
    }

    #[test]
    fn test_sig_negative() {
        assert_eq!(sig(-3.14159, 4), -3.142);
    }

    #[test]
    fn test_sig_large_values_round_to_integer() {
        // More integer digits than requested: nearest integer, not truncated
        assert_eq!(sig(123456.7, 4), 123457.0);
    }

    #[test]
    fn test_sig_non_finite_passthrough() {
        assert!(sig(f64::NAN, 4).is_nan());
        assert_eq!(sig(f64::INFINITY, 4), f64::INFINITY);
    }

    #[test]
    fn test_motor_name() {
        let motor = Motor {
            manufacturer_abbrev: "Cesaroni".to_string(),
            designation: "841I303-14A".to_string(),
            ..Motor::default()
        };
        assert_eq!(motor_name(&motor), "Cesaroni 841I303-14A");
    }
}
