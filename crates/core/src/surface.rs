//! Annotation surface controller.
//!
//! Owns the page ↔ view transform for one page image inside one viewport,
//! tracks in-flight pointer gestures, and turns them into
//! [`SurfaceIntent`]s. Rendering is a pure projection of page-space records
//! through the current transform: [`AnnotationSurface::render`] takes
//! `&self` and can be called any number of times per frame.
//!
//! UI state that outlives a single gesture (active tool, selection, pending
//! connection start) lives in [`SurfaceState`], owned by the caller.

use std::collections::HashMap;

use serde::Serialize;

use crate::annotation::{AnnotationSource, PageAnnotation};
use crate::connection::{LineType, PageConnection};
use crate::geometry::{BoundingBox, Point, Size};
use crate::transform::{SurfaceConfig, ViewTransform};
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Caller-owned UI state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tool {
    #[default]
    Select,
    Draw,
    Pan,
    Connect,
}

/// Explicit UI state threaded through pointer handlers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SurfaceState {
    pub tool: Tool,
    pub selected: Option<DbId>,
    /// First endpoint picked while the connect tool is active.
    pub connect_from: Option<DbId>,
}

impl SurfaceState {
    /// Switch tools, dropping any half-finished connection.
    pub fn set_tool(&mut self, tool: Tool) {
        self.tool = tool;
        self.connect_from = None;
    }

    /// Forget references to an annotation that no longer exists.
    pub fn forget(&mut self, annotation_id: DbId) {
        if self.selected == Some(annotation_id) {
            self.selected = None;
        }
        if self.connect_from == Some(annotation_id) {
            self.connect_from = None;
        }
    }
}

/// Domain-level outcome of a completed gesture.
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceIntent {
    /// A new box was drawn; coordinates are in page pixels.
    CreateAnnotation { bbox: BoundingBox },
    /// Selection changed (`None` clears it).
    Select(Option<DbId>),
    /// The user picked two annotations with the connect tool.
    RequestConnection { from: DbId, to: DbId },
}

// ---------------------------------------------------------------------------
// Render output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BoxStyle {
    Manual,
    AiDetected { confidence: f64 },
}

impl From<&AnnotationSource> for BoxStyle {
    fn from(source: &AnnotationSource) -> Self {
        match source {
            AnnotationSource::Manual => Self::Manual,
            AnnotationSource::AiDetected { confidence, .. } => Self::AiDetected {
                confidence: *confidence,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedBox {
    pub annotation_id: DbId,
    /// View-space rectangle.
    pub rect: BoundingBox,
    pub style: BoxStyle,
    pub selected: bool,
    pub label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedConnection {
    pub connection_id: DbId,
    pub line_type: LineType,
    /// View-space polyline: source center, waypoints, target center.
    pub points: Vec<Point>,
}

/// Everything the drawing layer needs for one paint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderFrame {
    /// Transform revision this frame was computed against.
    pub revision: u64,
    pub transform: ViewTransform,
    /// In paint order; the last box is topmost.
    pub boxes: Vec<RenderedBox>,
    pub connections: Vec<RenderedConnection>,
    /// View-space preview of an in-progress draw gesture.
    pub draft: Option<BoundingBox>,
}

// ---------------------------------------------------------------------------
// Controller
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
struct DrawGesture {
    start: Point,
    current: Point,
}

#[derive(Debug, Clone)]
pub struct AnnotationSurface {
    config: SurfaceConfig,
    transform: ViewTransform,
    /// Scale chosen by the last fit; zoom-out may always return to it.
    fit_scale: f64,
    image: Option<Size>,
    viewport: Option<Size>,
    draw: Option<DrawGesture>,
    pan_anchor: Option<Point>,
    /// Selection candidate from pointer-down, resolved on pointer-up.
    press: Option<Point>,
    revision: u64,
}

impl Default for AnnotationSurface {
    fn default() -> Self {
        Self::new(SurfaceConfig::default())
    }
}

impl AnnotationSurface {
    pub fn new(config: SurfaceConfig) -> Self {
        Self {
            config,
            transform: ViewTransform::IDENTITY,
            fit_scale: 1.0,
            image: None,
            viewport: None,
            draw: None,
            pan_anchor: None,
            press: None,
            revision: 0,
        }
    }

    pub fn config(&self) -> &SurfaceConfig {
        &self.config
    }

    pub fn transform(&self) -> ViewTransform {
        self.transform
    }

    /// Bumped whenever the transform changes; overlays computed against an
    /// older revision are stale.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn image_size(&self) -> Option<Size> {
        self.image
    }

    pub fn to_view(&self, page: Point) -> Point {
        self.transform.to_view(page)
    }

    pub fn to_page(&self, view: Point) -> Point {
        self.transform.to_page(view)
    }

    // -- transform --------------------------------------------------------

    /// Load a new page image, refitting when a viewport is known.
    ///
    /// Any in-flight gesture belongs to the previous page and is dropped.
    pub fn load_page(&mut self, image: Size) -> bool {
        if !image.is_usable() {
            return false;
        }
        self.image = Some(image);
        self.cancel_gestures();
        self.refit()
    }

    /// Record the container size and refit the page to it.
    pub fn set_viewport(&mut self, viewport: Size) -> bool {
        if !viewport.is_usable() {
            return false;
        }
        self.viewport = Some(viewport);
        self.refit()
    }

    fn refit(&mut self) -> bool {
        let (Some(image), Some(viewport)) = (self.image, self.viewport) else {
            return false;
        };
        match ViewTransform::fit(image, viewport, self.config.fit_margin) {
            Some(fitted) => {
                self.fit_scale = fitted.scale();
                self.transform = fitted;
                self.revision += 1;
                true
            }
            None => false,
        }
    }

    /// Zoom by `factor` around a view-space pivot.
    ///
    /// The lower bound is the configured minimum, relaxed to the fit scale
    /// for pages so large that fitting them already needs less.
    pub fn zoom(&mut self, factor: f64, pivot: Point) -> bool {
        let min = self.config.min_scale.min(self.fit_scale);
        let max = self.config.max_scale.max(min);
        let changed = self.transform.zoom_about(factor, pivot, min, max);
        if changed {
            self.revision += 1;
        }
        changed
    }

    /// Wheel zoom: negative `delta_y` (scroll up) zooms in one step.
    pub fn wheel(&mut self, delta_y: f64, pivot: Point) -> bool {
        if !delta_y.is_finite() || delta_y == 0.0 {
            return false;
        }
        let step = self.config.wheel_step;
        let factor = if delta_y < 0.0 { step } else { 1.0 / step };
        self.zoom(factor, pivot)
    }

    pub fn pan(&mut self, dx: f64, dy: f64) -> bool {
        let changed = self.transform.pan(dx, dy);
        if changed {
            self.revision += 1;
        }
        changed
    }

    // -- drag-to-pan ------------------------------------------------------

    pub fn begin_pan(&mut self, view: Point) {
        if view.is_finite() {
            self.pan_anchor = Some(view);
        }
    }

    pub fn update_pan(&mut self, view: Point) -> bool {
        let Some(anchor) = self.pan_anchor else {
            return false;
        };
        if !view.is_finite() {
            return false;
        }
        self.pan_anchor = Some(view);
        self.pan(view.x - anchor.x, view.y - anchor.y)
    }

    pub fn end_pan(&mut self) {
        self.pan_anchor = None;
    }

    // -- draw gesture -----------------------------------------------------

    pub fn begin_draw(&mut self, view: Point) {
        self.draw = view.is_finite().then_some(DrawGesture {
            start: view,
            current: view,
        });
    }

    pub fn update_draw(&mut self, view: Point) {
        if let Some(draw) = self.draw.as_mut() {
            if view.is_finite() {
                draw.current = view;
            }
        }
    }

    /// Finish the gesture and return the page-space box to create.
    ///
    /// The box is clipped to the page when its size is known. Returns `None`
    /// when no gesture is active, when any coordinate is malformed, or when
    /// either page-space side is below the minimum box size.
    pub fn end_draw(&mut self, view: Point) -> Option<BoundingBox> {
        let draw = self.draw.take()?;
        if !view.is_finite() {
            return None;
        }

        let mut bbox = self.transform.box_to_page(draw.start, view);
        if let Some(page) = self.image {
            bbox = clip_to_page(bbox, page)?;
        }

        let min = self.config.min_box_size;
        if !bbox.is_finite() || bbox.width < min || bbox.height < min {
            return None;
        }
        bbox.validate().ok()?;
        Some(bbox)
    }

    pub fn cancel_draw(&mut self) {
        self.draw = None;
    }

    pub fn is_drawing(&self) -> bool {
        self.draw.is_some()
    }

    fn cancel_gestures(&mut self) {
        self.draw = None;
        self.pan_anchor = None;
        self.press = None;
    }

    // -- queries ----------------------------------------------------------

    /// Topmost annotation under a view-space point.
    ///
    /// Annotations paint in slice order, so the last match wins.
    pub fn hit_test(&self, annotations: &[PageAnnotation], view: Point) -> Option<DbId> {
        if !view.is_finite() {
            return None;
        }
        annotations
            .iter()
            .rev()
            .filter(|a| a.bbox.is_finite())
            .find(|a| self.transform.box_to_view(&a.bbox).contains(view))
            .map(|a| a.id)
    }

    /// Project every annotation and connection into view space.
    ///
    /// Connections whose endpoints are missing from `annotations` are
    /// skipped without error.
    pub fn render(
        &self,
        annotations: &[PageAnnotation],
        connections: &[PageConnection],
        selected: Option<DbId>,
    ) -> RenderFrame {
        let boxes: Vec<RenderedBox> = annotations
            .iter()
            .filter(|a| a.bbox.is_finite())
            .map(|a| RenderedBox {
                annotation_id: a.id,
                rect: self.transform.box_to_view(&a.bbox),
                style: BoxStyle::from(&a.source),
                selected: selected == Some(a.id),
                label: a.tag_id.clone(),
            })
            .collect();

        let centers: HashMap<DbId, Point> = boxes
            .iter()
            .map(|b| (b.annotation_id, b.rect.center()))
            .collect();

        let connections = connections
            .iter()
            .filter_map(|c| {
                let from = centers.get(&c.from_annotation_id)?;
                let to = centers.get(&c.to_annotation_id)?;
                let mut points = Vec::with_capacity(c.waypoints.len() + 2);
                points.push(*from);
                points.extend(
                    c.waypoints
                        .iter()
                        .filter(|p| p.is_finite())
                        .map(|p| self.transform.to_view(*p)),
                );
                points.push(*to);
                Some(RenderedConnection {
                    connection_id: c.id,
                    line_type: c.line_type,
                    points,
                })
            })
            .collect();

        let draft = self
            .draw
            .map(|d| BoundingBox::from_corners(d.start, d.current));

        RenderFrame {
            revision: self.revision,
            transform: self.transform,
            boxes,
            connections,
            draft,
        }
    }

    // -- pointer dispatch -------------------------------------------------

    /// Primary button pressed at a view-space point.
    pub fn pointer_down(&mut self, state: &SurfaceState, view: Point) {
        match state.tool {
            Tool::Draw => self.begin_draw(view),
            Tool::Pan => self.begin_pan(view),
            Tool::Select | Tool::Connect => self.press = view.is_finite().then_some(view),
        }
    }

    pub fn pointer_move(&mut self, state: &SurfaceState, view: Point) {
        match state.tool {
            Tool::Draw => self.update_draw(view),
            Tool::Pan => {
                self.update_pan(view);
            }
            Tool::Select | Tool::Connect => {}
        }
    }

    /// Primary button released; resolves the gesture into an intent.
    ///
    /// Selection and connection state in `state` are updated in place so
    /// the caller's next render already reflects them.
    pub fn pointer_up(
        &mut self,
        state: &mut SurfaceState,
        annotations: &[PageAnnotation],
        view: Point,
    ) -> Option<SurfaceIntent> {
        match state.tool {
            Tool::Draw => self
                .end_draw(view)
                .map(|bbox| SurfaceIntent::CreateAnnotation { bbox }),
            Tool::Pan => {
                self.update_pan(view);
                self.end_pan();
                None
            }
            Tool::Select => {
                self.press.take()?;
                let hit = self.hit_test(annotations, view);
                if hit == state.selected {
                    return None;
                }
                state.selected = hit;
                Some(SurfaceIntent::Select(hit))
            }
            Tool::Connect => {
                self.press.take()?;
                let Some(hit) = self.hit_test(annotations, view) else {
                    state.connect_from = None;
                    return None;
                };
                match state.connect_from.take() {
                    Some(from) if from != hit => {
                        Some(SurfaceIntent::RequestConnection { from, to: hit })
                    }
                    Some(_) => None,
                    None => {
                        state.connect_from = Some(hit);
                        None
                    }
                }
            }
        }
    }
}

/// Intersect a page-space box with the page rectangle.
fn clip_to_page(bbox: BoundingBox, page: Size) -> Option<BoundingBox> {
    let x0 = bbox.x.max(0.0);
    let y0 = bbox.y.max(0.0);
    let x1 = (bbox.x + bbox.width).min(page.width);
    let y1 = (bbox.y + bbox.height).min(page.height);
    if x1 <= x0 || y1 <= y0 {
        return None;
    }
    Some(BoundingBox::from_corners(Point::new(x0, y0), Point::new(x1, y1)))
}
