use std::fs;
use std::path::Path;

use crate::error::{RectifyError, Result};
use crate::geometry::{CornerSet, Point2D};

/// Parse a JSON array of four `{"x": number, "y": number}` objects
pub fn parse_corners(json: &str) -> Result<CornerSet> {
    let points: Vec<Point2D> = serde_json::from_str(json)
        .map_err(|e| RectifyError::CorrespondenceInput(format!("malformed corners JSON: {}", e)))?;
    CornerSet::try_from(points)
}

/// Read and parse the corners file
pub fn load_corners(path: &Path) -> Result<CornerSet> {
    let json = fs::read_to_string(path).map_err(|e| {
        RectifyError::CorrespondenceInput(format!("cannot read {:?}: {}", path, e))
    })?;
    let corners = parse_corners(&json)?;
    log::debug!("Parsed corners from {:?}: {}", path, corners);
    Ok(corners)
}
