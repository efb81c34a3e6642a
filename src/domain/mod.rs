/// Domain models for the motor catalog
use chrono::NaiveDate;
use serde::{Deserialize, Serialize, Serializer};

/// One `[time, thrust]` point on a thrust curve.
pub type ThrustPoint = [f64; 2];

/// Origin of a thrust-curve sample set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SampleSource {
    /// Certified by an official testing organization
    Cert,
    /// Community-submitted
    User,
}

/// Thrust curve retained for a motor after reconciliation.
///
/// Serializes as the bare point array; `source` only matters while deciding
/// which candidate curve to keep.
#[derive(Debug, Clone, PartialEq)]
pub struct ReconciledSamples {
    pub points: Vec<ThrustPoint>,
    pub source: SampleSource,
}

impl Serialize for ReconciledSamples {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.points.serialize(serializer)
    }
}

/// One motor record, as listed by the catalog and as emitted in the final
/// dataset. Field names follow the ThrustCurve wire schema.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Motor {
    pub motor_id: String,
    #[serde(default)]
    pub manufacturer: String,
    #[serde(default)]
    pub manufacturer_abbrev: String,
    #[serde(default)]
    pub designation: String,
    #[serde(default)]
    pub common_name: String,
    #[serde(default)]
    pub impulse_class: String,
    #[serde(default)]
    pub diameter: f64,
    #[serde(default)]
    pub length: f64,
    #[serde(default, rename = "type")]
    pub motor_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cert_org: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avg_thrust_n: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_thrust_n: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tot_impulse_ns: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub burn_time_s: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_files: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_weight_g: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prop_weight_g: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delays: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub case_info: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prop_info: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sparky: Option<bool>,
    /// `"regular"` or `"OOP"`; recomputed by the pipeline from the
    /// available-motors listing, never trusted from the per-record value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub availability: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_on: Option<NaiveDate>,
    #[serde(default, skip_deserializing, skip_serializing_if = "Option::is_none")]
    pub samples: Option<ReconciledSamples>,
}

/// One raw `(time, thrust)` sample as delivered by the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct RawSample {
    pub time: f64,
    pub thrust: f64,
}

/// One candidate thrust curve for a motor, as received. Many sets may
/// reference the same motor; reconciliation keeps exactly one.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSampleSet {
    pub motor_id: String,
    #[serde(default)]
    pub samples: Vec<RawSample>,
    pub source: SampleSource,
    #[serde(default)]
    pub format: Option<String>,
}
