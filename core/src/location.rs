//! Resource ids from `Location`-style links such as `/cps-api/enrollments/10002`.

use url::Url;

use crate::error::LocationError;

/// Returns the integer id in the last path segment of `location`.
///
/// Relative links are resolved against a placeholder host, so both
/// `/cps-api/enrollments/1` and `https://host/cps-api/enrollments/1`
/// yield `1`.
pub fn id_from_location(location: &str) -> Result<i64, LocationError> {
    let url = Url::parse("https://location.invalid/")
        .and_then(|base| base.join(location))
        .map_err(|source| LocationError::Url {
            location: location.to_string(),
            source,
        })?;
    let segment = url
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .filter(|segment| !segment.is_empty())
        .ok_or_else(|| LocationError::MissingId(location.to_string()))?;
    segment
        .parse::<i64>()
        .map_err(|source| LocationError::NotAnId {
            segment: segment.to_string(),
            source,
        })
}
