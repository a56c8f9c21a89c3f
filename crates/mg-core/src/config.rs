//! Tracer tolerances.

use crate::{CoreError, CoreResult};

/// Numerical tolerances and switches of a tracing run.
///
/// ```
/// use mg_core::TracerConfig;
/// let cfg = TracerConfig { time_tolerance: 1e-12, ..TracerConfig::default() };
/// assert!(cfg.validate().is_ok());
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TracerConfig {
    /// Squared-distance radius under which two locations of one face are merged.
    pub snapping_tolerance: f64,

    /// Two times closer than this are treated as the same instant.
    pub time_tolerance: f64,

    /// Barycentric weights closer than this to 0 or 1 are snapped.
    pub border_tolerance: f64,

    /// Threshold of `|1 - cos²|` for two tracks to share a direction.
    pub same_direction_tolerance: f64,

    /// Run the brute-force validity check at the end of `trace`.
    pub check_validity: bool,
}

impl Default for TracerConfig {
    fn default() -> Self {
        Self {
            snapping_tolerance: 2.0 * f64::EPSILON,
            time_tolerance: f64::EPSILON,
            border_tolerance: 1e-12,
            same_direction_tolerance: 1e-15,
            check_validity: cfg!(debug_assertions),
        }
    }
}

impl TracerConfig {
    pub fn validate(&self) -> CoreResult<()> {
        let fields = [
            ("snapping_tolerance", self.snapping_tolerance),
            ("time_tolerance", self.time_tolerance),
            ("border_tolerance", self.border_tolerance),
            ("same_direction_tolerance", self.same_direction_tolerance),
        ];
        for (name, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(CoreError::Config(format!(
                    "{name} must be finite and non-negative, got {value}"
                )));
            }
        }
        if self.border_tolerance >= 0.5 {
            return Err(CoreError::Config(format!(
                "border_tolerance must be below 0.5, got {}",
                self.border_tolerance
            )));
        }
        Ok(())
    }
}
