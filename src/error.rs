/// Errors that reject a single conversion, lookup or profile mutation
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid coordinate format: {0}")]
    InvalidFormat(String),

    #[error("Invalid hemisphere identifier {letter:?} (expected {expected})")]
    InvalidHemisphere { letter: char, expected: &'static str },

    #[error("Latitude out of range: {0}")]
    LatitudeOutOfRange(f64),

    #[error("Longitude is not a finite number: {0}")]
    InvalidLongitude(f64),

    #[error("Invalid MGRS input: {0}")]
    Mgrs(String),

    #[error("Geodesic inverse problem did not converge")]
    NoConvergence,

    #[error("Mission station not defined")]
    MissingStation,

    #[error("Only missions can be assigned to a station (got station {0})")]
    UnexpectedStation(u32),

    #[error("Base name not found in base directory: {0}")]
    UnknownBase(String),

    #[error("Sequence {sequence} already holds {max} waypoints")]
    SequenceFull { sequence: u32, max: usize },

    #[error("Unknown waypoint type: {0}")]
    UnknownWaypointType(String),

    #[error("Unknown aircraft: {0}")]
    UnknownAircraft(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Non-fatal issues encountered while loading batches of records
#[derive(Debug, Clone, PartialEq)]
pub enum Warning {
    /// Base feed entry could not be turned into a base, entry skipped
    SkippedBase { name: Option<String>, reason: String },

    /// Waypoint record could not be turned into a waypoint, record skipped
    SkippedWaypoint { index: usize, reason: String },
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use insta::assert_snapshot;

    #[test]
    fn error_messages() {
        assert_snapshot!(Error::MissingStation, @"Mission station not defined");
        assert_snapshot!(
            Error::InvalidHemisphere { letter: 'E', expected: "N or S" },
            @"Invalid hemisphere identifier 'E' (expected N or S)"
        );
        assert_snapshot!(
            Error::SequenceFull { sequence: 2, max: 15 },
            @"Sequence 2 already holds 15 waypoints"
        );
    }
}
