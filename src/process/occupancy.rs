//! Occupancy band quantization.

use crate::error::RowError;

/// Converts a banded occupancy range `"<lower>-<upper>"` into a point
/// estimate of `max(lower - 1, 0)`.
///
/// The published bands use inclusive lower bounds one greater than the true
/// minimum observed count, so subtracting one gives a conservative floor.
///
/// # Errors
///
/// Returns [`RowError::BadOccupancyBand`] when the band has no `-` or a
/// non-numeric lower bound. Callers drop the row; the band is never
/// silently coerced to zero.
pub fn floor_band(band: &str) -> Result<u32, RowError> {
    let (lower, _upper) = band.split_once('-').ok_or_else(|| RowError::BadOccupancyBand {
        band: band.to_string(),
    })?;
    let lower: u32 = lower
        .trim()
        .parse()
        .map_err(|_| RowError::BadOccupancyBand {
            band: band.to_string(),
        })?;
    Ok(lower.saturating_sub(1))
}
