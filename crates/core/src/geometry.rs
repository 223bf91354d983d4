//! Plain 2D geometry shared by page space and view space.
//!
//! The types carry no notion of which space they live in; callers keep that
//! straight through [`crate::transform::ViewTransform`].

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Tolerance used when comparing projected coordinates.
pub const EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Component-wise comparison within `tolerance`.
    pub fn approx_eq(&self, other: &Point, tolerance: f64) -> bool {
        (self.x - other.x).abs() <= tolerance && (self.y - other.y).abs() <= tolerance
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// A size is usable when both dimensions are finite and strictly positive.
    pub fn is_usable(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

/// Axis-aligned rectangle, origin at its top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Build a normalized box from two opposite corners in any order.
    pub fn from_corners(a: Point, b: Point) -> Self {
        let x = a.x.min(b.x);
        let y = a.y.min(b.y);
        Self {
            x,
            y,
            width: (a.x - b.x).abs(),
            height: (a.y - b.y).abs(),
        }
    }

    pub fn min(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn max(&self) -> Point {
        Point::new(self.x + self.width, self.y + self.height)
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.width.is_finite() && self.height.is_finite()
    }

    /// Inclusive containment test on all four edges.
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x
            && point.x <= self.x + self.width
            && point.y >= self.y
            && point.y <= self.y + self.height
    }

    /// Check the page-space annotation box rules: finite, origin
    /// non-negative, strictly positive extent.
    pub fn validate(&self) -> Result<(), CoreError> {
        if !self.is_finite() {
            return Err(CoreError::Validation(
                "bounding box coordinates must be finite numbers".to_string(),
            ));
        }
        if self.x < 0.0 || self.y < 0.0 {
            return Err(CoreError::Validation(format!(
                "bounding box origin must be non-negative, got ({}, {})",
                self.x, self.y
            )));
        }
        if self.width <= 0.0 || self.height <= 0.0 {
            return Err(CoreError::Validation(format!(
                "bounding box width and height must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        Ok(())
    }

    /// Check that the box lies inside a page of the given pixel dimensions.
    pub fn validate_within(&self, page: Size) -> Result<(), CoreError> {
        self.validate()?;
        let max = self.max();
        if max.x > page.width + EPSILON || max.y > page.height + EPSILON {
            return Err(CoreError::Validation(format!(
                "bounding box extends to ({:.2}, {:.2}) beyond page bounds {}x{}",
                max.x, max.y, page.width, page.height
            )));
        }
        Ok(())
    }
}
