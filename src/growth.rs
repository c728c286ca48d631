use crate::error::{GrowVecError, Result};

// Smallest accepted factor is 1 + 1/MIN_STEPS_PER_SLOT.
const MIN_STEPS_PER_SLOT: usize = 8;

/// Geometric capacity growth.
///
/// The next capacity is `max(current + required_extra, ceil(current * factor))`
/// rounded up to an even slot count, where `factor = numerator / denominator`
/// is at least 9/8. Repeated appends therefore cost amortized O(1).
///
/// Factors closer to 1 are rejected: the ceiling and even rounding would
/// dominate and growth would degrade to a fixed +2 per reallocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GrowthPolicy {
    numerator: usize,
    denominator: usize,
}

impl GrowthPolicy {
    /// Grows by 150%.
    pub const DEFAULT: Self = Self {
        numerator: 3,
        denominator: 2,
    };

    /// Creates a policy growing by `numerator / denominator`.
    ///
    /// # Errors
    ///
    /// Returns `GrowVecError::InvalidConfiguration` if `denominator` is 0 or
    /// the factor is below 9/8.
    pub fn geometric(numerator: usize, denominator: usize) -> Result<Self> {
        if denominator == 0 {
            return Err(GrowVecError::InvalidConfiguration {
                parameter: "denominator",
                value: denominator,
            });
        }
        if numerator <= denominator
            || (numerator - denominator).saturating_mul(MIN_STEPS_PER_SLOT) < denominator
        {
            return Err(GrowVecError::InvalidConfiguration {
                parameter: "numerator",
                value: numerator,
            });
        }
        Ok(Self {
            numerator,
            denominator,
        })
    }

    #[must_use]
    pub fn numerator(&self) -> usize {
        self.numerator
    }

    #[must_use]
    pub fn denominator(&self) -> usize {
        self.denominator
    }

    /// Computes the capacity to grow to so that `required_extra` more
    /// elements fit on top of `current`.
    ///
    /// # Errors
    ///
    /// Returns `GrowVecError::CapacityOverflow` if `current + required_extra`
    /// does not fit in `usize`.
    pub fn next_capacity(&self, current: usize, required_extra: usize) -> Result<usize> {
        let required =
            current
                .checked_add(required_extra)
                .ok_or(GrowVecError::CapacityOverflow {
                    current,
                    additional: required_extra,
                })?;

        // Split the product so large capacities do not overflow before dividing.
        let whole = (current / self.denominator).saturating_mul(self.numerator);
        let rest = (current % self.denominator)
            .saturating_mul(self.numerator)
            .div_ceil(self.denominator);
        let scaled = whole.saturating_add(rest);

        let target = required.max(scaled);
        if target % 2 == 1 {
            Ok(target.checked_add(1).unwrap_or(target))
        } else {
            Ok(target)
        }
    }
}

impl Default for GrowthPolicy {
    fn default() -> Self {
        Self::DEFAULT
    }
}
