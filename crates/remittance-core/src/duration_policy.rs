//! Lock-duration bounds.
//!
//! A deposit's duration must fall inside the inclusive range `[min, max]`.
//! Setters refuse no-op changes and any change that would invert the range.

use remittance_types::{RemittanceError, Result};
use serde::{Deserialize, Serialize};

/// Inclusive `[min, max]` bounds on lock duration, in blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DurationPolicy {
    min: u64,
    max: u64,
}

impl DurationPolicy {
    /// # Errors
    /// Returns `InvalidDurationBounds` if `min > max`.
    pub fn new(min: u64, max: u64) -> Result<Self> {
        if min > max {
            return Err(RemittanceError::InvalidDurationBounds { min, max });
        }
        Ok(Self { min, max })
    }

    #[must_use]
    pub fn min(&self) -> u64 {
        self.min
    }

    #[must_use]
    pub fn max(&self) -> u64 {
        self.max
    }

    /// # Errors
    /// Returns `DurationOutOfRange` unless `min <= duration <= max`.
    pub fn validate(&self, duration: u64) -> Result<()> {
        if duration < self.min || duration > self.max {
            tracing::debug!(duration, min = self.min, max = self.max, "Duration rejected");
            return Err(RemittanceError::DurationOutOfRange {
                duration,
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }

    /// # Errors
    /// - `NoOpChange` if `new_min` equals the current minimum
    /// - `InvalidDurationBounds` if `new_min > max`
    pub fn set_min(&mut self, new_min: u64) -> Result<()> {
        if new_min == self.min {
            return Err(RemittanceError::NoOpChange { field: "min_duration" });
        }
        if new_min > self.max {
            return Err(RemittanceError::InvalidDurationBounds {
                min: new_min,
                max: self.max,
            });
        }
        self.min = new_min;
        Ok(())
    }

    /// # Errors
    /// - `NoOpChange` if `new_max` equals the current maximum
    /// - `InvalidDurationBounds` if `min > new_max`
    pub fn set_max(&mut self, new_max: u64) -> Result<()> {
        if new_max == self.max {
            return Err(RemittanceError::NoOpChange { field: "max_duration" });
        }
        if self.min > new_max {
            return Err(RemittanceError::InvalidDurationBounds {
                min: self.min,
                max: new_max,
            });
        }
        self.max = new_max;
        Ok(())
    }

    /// Replace both bounds at once. Needed when the new range does not
    /// overlap the old one, which two single-bound setters cannot reach.
    ///
    /// # Errors
    /// - `NoOpChange` if both bounds equal the current ones
    /// - `InvalidDurationBounds` if `min > max`
    pub fn set_interval(&mut self, min: u64, max: u64) -> Result<()> {
        if min == self.min && max == self.max {
            return Err(RemittanceError::NoOpChange { field: "duration_interval" });
        }
        if min > max {
            return Err(RemittanceError::InvalidDurationBounds { min, max });
        }
        self.min = min;
        self.max = max;
        Ok(())
    }
}
