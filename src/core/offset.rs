use crate::domain::model::AltitudeOffsetRange;
use crate::utils::error::{AppError, Result};

/// Highest `to_meters` across all ranges, `None` when no range is configured.
pub fn max_covered_altitude(ranges: &[AltitudeOffsetRange]) -> Option<i32> {
    ranges.iter().map(|range| range.to_meters).max()
}

/// Temperature offset for `altitude`.
///
/// Ranges are scanned in the given order (ascending `from_meters`) and the
/// first one containing the altitude wins, so overlapping bounds resolve to
/// the lower range. A gap in coverage yields `0.0`. An empty table means no
/// adjustment at all.
///
/// # Errors
///
/// `AltitudeExceedsRange` when the altitude is above every range's upper bound.
pub fn offset_for_altitude(altitude: i32, ranges: &[AltitudeOffsetRange]) -> Result<f64> {
    let Some(max_meters) = max_covered_altitude(ranges) else {
        tracing::debug!("No altitude offset ranges configured, returning 0");
        return Ok(0.0);
    };

    if altitude > max_meters {
        tracing::warn!(
            "Altitude {} exceeds maximum configured altitude {}",
            altitude,
            max_meters
        );
        return Err(AppError::AltitudeExceedsRange { max_meters });
    }

    match ranges.iter().find(|range| range.contains(altitude)) {
        Some(range) => {
            tracing::debug!(
                "Found offset {} for altitude {} in range [{}, {}]",
                range.offset,
                altitude,
                range.from_meters,
                range.to_meters
            );
            Ok(range.offset)
        }
        None => {
            tracing::debug!("No matching altitude offset range for altitude {}, returning 0", altitude);
            Ok(0.0)
        }
    }
}
