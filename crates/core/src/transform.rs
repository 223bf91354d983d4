//! Page-pixel ↔ view coordinate mapping.
//!
//! A [`ViewTransform`] is a uniform scale plus the view-space position of
//! page origin `(0, 0)`. `to_view` and `to_page` are exact inverses for any
//! transform with a finite, strictly positive scale; every constructor and
//! mutator here preserves that.

use serde::Serialize;

use crate::geometry::{BoundingBox, Point, Size};

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

/// Share of the viewport a freshly fitted page may occupy.
pub const DEFAULT_FIT_MARGIN: f64 = 0.9;

/// Smallest scale reachable through zoom gestures.
pub const DEFAULT_MIN_SCALE: f64 = 0.1;

/// Largest scale reachable through zoom gestures.
pub const DEFAULT_MAX_SCALE: f64 = 5.0;

/// Drawn boxes smaller than this (in page pixels, either axis) are dropped.
pub const DEFAULT_MIN_BOX_SIZE: f64 = 10.0;

/// Scale multiplier applied per wheel notch.
pub const DEFAULT_WHEEL_STEP: f64 = 1.1;

/// Tunables for the annotation surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceConfig {
    pub fit_margin: f64,
    pub min_scale: f64,
    pub max_scale: f64,
    pub min_box_size: f64,
    pub wheel_step: f64,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            fit_margin: DEFAULT_FIT_MARGIN,
            min_scale: DEFAULT_MIN_SCALE,
            max_scale: DEFAULT_MAX_SCALE,
            min_box_size: DEFAULT_MIN_BOX_SIZE,
            wheel_step: DEFAULT_WHEEL_STEP,
        }
    }
}

// ---------------------------------------------------------------------------
// Transform
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ViewTransform {
    scale: f64,
    offset: Point,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl ViewTransform {
    pub const IDENTITY: Self = Self {
        scale: 1.0,
        offset: Point::new(0.0, 0.0),
    };

    /// Build a transform, rejecting scales that would break invertibility.
    pub fn new(scale: f64, offset: Point) -> Option<Self> {
        if scale.is_finite() && scale > 0.0 && offset.is_finite() {
            Some(Self { scale, offset })
        } else {
            None
        }
    }

    /// Fit `image` inside `viewport` shrunk by `margin`, centered, never
    /// magnified past 1:1.
    ///
    /// Returns `None` when either size is empty or non-finite.
    pub fn fit(image: Size, viewport: Size, margin: f64) -> Option<Self> {
        if !image.is_usable() || !viewport.is_usable() {
            return None;
        }
        let margin = if margin.is_finite() && margin > 0.0 {
            margin
        } else {
            DEFAULT_FIT_MARGIN
        };

        let fitted = (viewport.width / image.width).min(viewport.height / image.height) * margin;
        let scale = fitted.min(1.0);

        let offset = Point::new(
            (viewport.width - image.width * scale) / 2.0,
            (viewport.height - image.height * scale) / 2.0,
        );
        Self::new(scale, offset)
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn offset(&self) -> Point {
        self.offset
    }

    pub fn to_view(&self, page: Point) -> Point {
        Point::new(
            self.offset.x + page.x * self.scale,
            self.offset.y + page.y * self.scale,
        )
    }

    pub fn to_page(&self, view: Point) -> Point {
        Point::new(
            (view.x - self.offset.x) / self.scale,
            (view.y - self.offset.y) / self.scale,
        )
    }

    pub fn box_to_view(&self, page: &BoundingBox) -> BoundingBox {
        let origin = self.to_view(page.min());
        BoundingBox::new(
            origin.x,
            origin.y,
            page.width * self.scale,
            page.height * self.scale,
        )
    }

    /// Map both corners of a view rectangle into page space and normalize.
    pub fn box_to_page(&self, a: Point, b: Point) -> BoundingBox {
        BoundingBox::from_corners(self.to_page(a), self.to_page(b))
    }

    /// Multiply the scale by `factor`, clamped to `[min, max]`, keeping
    /// `pivot` (view space) over the same page point.
    ///
    /// Non-finite or non-positive factors leave the transform untouched.
    /// Returns whether anything changed.
    pub fn zoom_about(&mut self, factor: f64, pivot: Point, min: f64, max: f64) -> bool {
        if !factor.is_finite() || factor <= 0.0 || !pivot.is_finite() {
            return false;
        }
        let target = (self.scale * factor).clamp(min, max);
        if !target.is_finite() || target <= 0.0 || target == self.scale {
            return false;
        }

        let anchor = self.to_page(pivot);
        self.scale = target;
        self.offset = Point::new(pivot.x - anchor.x * target, pivot.y - anchor.y * target);
        true
    }

    /// Shift the page origin by a view-space delta. No bounds apply.
    pub fn pan(&mut self, dx: f64, dy: f64) -> bool {
        if !dx.is_finite() || !dy.is_finite() || (dx == 0.0 && dy == 0.0) {
            return false;
        }
        self.offset = Point::new(self.offset.x + dx, self.offset.y + dy);
        true
    }
}
