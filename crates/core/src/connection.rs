//! Connection line types and endpoint validation.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::geometry::Point;
use crate::types::DbId;

/// Maximum number of intermediate waypoints on one connection.
pub const MAX_WAYPOINTS: usize = 500;

/// Classification of the line drawn between two symbols.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineType {
    /// Process piping.
    #[default]
    Process,
    /// Signal line (electrical or pneumatic).
    Signal,
    /// Instrument connection.
    Instrument,
}

const VALID_LINE_TYPE_STRINGS: &[&str] = &["process", "signal", "instrument"];

impl LineType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Process => "process",
            Self::Signal => "signal",
            Self::Instrument => "instrument",
        }
    }

    pub fn from_str(s: &str) -> Result<Self, CoreError> {
        match s {
            "process" => Ok(Self::Process),
            "signal" => Ok(Self::Signal),
            "instrument" => Ok(Self::Instrument),
            _ => Err(CoreError::Validation(format!(
                "Invalid line type '{s}'. Must be one of: {}",
                VALID_LINE_TYPE_STRINGS.join(", ")
            ))),
        }
    }
}

/// The slice of a connection the surface and session work with.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageConnection {
    pub id: DbId,
    pub from_annotation_id: DbId,
    pub to_annotation_id: DbId,
    pub line_type: LineType,
    pub waypoints: Vec<Point>,
}

/// Both ends of a connection must be different annotations.
pub fn validate_endpoints(from: DbId, to: DbId) -> Result<(), CoreError> {
    if from == to {
        return Err(CoreError::Validation(format!(
            "a connection needs two distinct annotations, got {from} twice"
        )));
    }
    Ok(())
}

/// Both endpoint annotations must sit on the connection's page.
pub fn validate_same_page(
    connection_page: DbId,
    from_page: DbId,
    to_page: DbId,
) -> Result<(), CoreError> {
    if from_page != connection_page || to_page != connection_page {
        return Err(CoreError::Validation(format!(
            "connection endpoints must be on page {connection_page}, \
             found pages {from_page} and {to_page}"
        )));
    }
    Ok(())
}

pub fn validate_waypoints(waypoints: &[Point]) -> Result<(), CoreError> {
    if waypoints.len() > MAX_WAYPOINTS {
        return Err(CoreError::Validation(format!(
            "connection has {} waypoints, maximum is {MAX_WAYPOINTS}",
            waypoints.len()
        )));
    }
    if let Some(i) = waypoints.iter().position(|p| !p.is_finite()) {
        return Err(CoreError::Validation(format!(
            "waypoint {i} has non-finite coordinates"
        )));
    }
    Ok(())
}

/// Parse a stored `[{x, y}, ...]` JSON array into points.
pub fn waypoints_from_json(value: &serde_json::Value) -> Result<Vec<Point>, CoreError> {
    if value.is_null() {
        return Ok(Vec::new());
    }
    serde_json::from_value(value.clone())
        .map_err(|e| CoreError::Validation(format!("waypoints must be a list of {{x, y}}: {e}")))
}

pub fn waypoints_to_json(waypoints: &[Point]) -> serde_json::Value {
    serde_json::Value::Array(
        waypoints
            .iter()
            .map(|p| serde_json::json!({"x": p.x, "y": p.y}))
            .collect(),
    )
}
