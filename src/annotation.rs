//! Block drawing, gesture classification, and zoom state for page containers.
//!
//! This module is the interaction core of the admin annotation tool. Each
//! page owns one [`Container`]: an explicit state record holding its zoom
//! transform, its finalized blocks, and the transient gesture session. The
//! UI layer routes pointer, touch, and wheel input here and renders whatever
//! the container reports back; no geometry ever lives in presentation state.

use crate::constants::{MAX_SCALE, MIN_SCALE, WHEEL_ZOOM_RATE};
use crate::types::{Block, BlockRecord, PageId};
use serde::{Deserialize, Serialize};

/// Client-space position of a container's rendered top-left corner.
///
/// The host layout reports this each frame for the *scaled* surface, so
/// dividing a client offset by the current scale recovers container-local
/// untransformed coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceRect {
    /// Left edge of the rendered surface in client coordinates.
    pub left: f32,
    /// Top edge of the rendered surface in client coordinates.
    pub top: f32,
}

impl SurfaceRect {
    /// Creates a surface rect from its top-left corner.
    pub fn new(left: f32, top: f32) -> Self {
        Self { left, top }
    }
}

/// A routed input event, already grouped by pointing device kind.
#[derive(Debug, Clone, PartialEq)]
pub enum PointerInput {
    /// Mouse pointer at a client position.
    Mouse(f32, f32),
    /// The set of active touch points in client coordinates. May hold a
    /// single point (finger draw), two or more (pinch), or none at all
    /// (the last finger was just lifted).
    Touches(Vec<(f32, f32)>),
}

/// What the classifier decided an input event represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureKind {
    /// Single-pointer rectangle drawing.
    Draw,
    /// Two-pointer pinch zoom.
    Pinch,
}

/// Classifies an input event as a draw or a pinch gesture.
///
/// Two or more simultaneous touch points make a pinch; anything else
/// (mouse, one touch, or an empty touch set on gesture end) is routed to
/// the drawing engine. The two cases are mutually exclusive per event.
pub fn classify(input: &PointerInput) -> GestureKind {
    match input {
        PointerInput::Touches(points) if points.len() > 1 => GestureKind::Pinch,
        _ => GestureKind::Draw,
    }
}

/// Euclidean distance between the first two touch points, if present.
fn pinch_distance(input: &PointerInput) -> Option<f32> {
    match input {
        PointerInput::Touches(points) if points.len() > 1 => {
            let (ax, ay) = points[0];
            let (bx, by) = points[1];
            Some((ax - bx).hypot(ay - by))
        }
        _ => None,
    }
}

/// The rectangle under construction during an active drawing gesture.
///
/// Exists only between gesture start and gesture end; it has no identifier
/// until it is promoted to a [`Block`]. At most one per container.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TempBlock {
    /// Left edge in container-local units.
    pub left: f32,
    /// Top edge in container-local units.
    pub top: f32,
    /// Current width; never negative.
    pub width: f32,
    /// Current height; never negative.
    pub height: f32,
}

/// Per-page interaction state: zoom transform, gesture session, and blocks.
///
/// Containers are created when their page is rendered and live for as long
/// as the page does. All handlers are defensive: they no-op when the state
/// they expect is absent instead of failing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Container {
    /// Stable identifier of the owning page.
    pub page_id: PageId,
    /// Rendered width at scale 1, fixed when the container is created.
    pub width: f32,
    /// Rendered height at scale 1, fixed when the container is created.
    pub height: f32,
    /// Current zoom scale, always within [`MIN_SCALE`, `MAX_SCALE`].
    scale: f32,
    /// Zoom pivot in container-local untransformed coordinates. Only the
    /// wheel path moves it; pinch zoom leaves it where it is.
    transform_origin: (f32, f32),
    /// Anchor corner of the in-progress drawing gesture.
    #[serde(skip)]
    start: Option<(f32, f32)>,
    /// Inter-touch distance seen by the last pinch event. Present only
    /// while a pinch session is live, so the delta computation never sees
    /// a stale or zero baseline.
    #[serde(skip)]
    last_pinch_dist: Option<f32>,
    /// The rectangle under construction, if a drawing gesture is active.
    #[serde(skip)]
    temp: Option<TempBlock>,
    /// Finalized blocks in creation order.
    blocks: Vec<Block>,
    /// Next block identifier to assign; starts at 1 and only grows.
    next_block_id: u32,
}

impl Container {
    /// Creates a container for the given page with its rendered dimensions.
    pub fn new(page_id: PageId, width: f32, height: f32) -> Self {
        Self {
            page_id,
            width,
            height,
            scale: 1.0,
            transform_origin: (0.0, 0.0),
            start: None,
            last_pinch_dist: None,
            temp: None,
            blocks: Vec::new(),
            next_block_id: 1,
        }
    }

    /// Current zoom scale.
    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Current zoom pivot in container-local untransformed coordinates.
    pub fn transform_origin(&self) -> (f32, f32) {
        self.transform_origin
    }

    /// Finalized blocks in creation order (ascending identifier).
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// The rectangle under construction, if a drawing gesture is active.
    pub fn temp_block(&self) -> Option<TempBlock> {
        self.temp
    }

    /// Whether a pinch session is currently live.
    pub fn pinching(&self) -> bool {
        self.last_pinch_dist.is_some()
    }

    /// Converts a single-pointer event to container-local coordinates,
    /// compensating for the current zoom scale.
    ///
    /// Multi-touch input carries no usable point, so this returns `None`
    /// and callers must not run drawing logic for it.
    pub fn local_coords(&self, surface: SurfaceRect, input: &PointerInput) -> Option<(f32, f32)> {
        let (cx, cy) = match input {
            PointerInput::Mouse(x, y) => (*x, *y),
            PointerInput::Touches(points) if points.len() == 1 => points[0],
            PointerInput::Touches(_) => return None,
        };
        Some(((cx - surface.left) / self.scale, (cy - surface.top) / self.scale))
    }

    /// Handles a gesture start and returns how it was classified.
    ///
    /// A pinch start seeds the inter-touch distance baseline and touches
    /// nothing else. A draw start records the anchor corner and attaches a
    /// zero-size [`TempBlock`]; only the draw case claims the pointer
    /// (the caller suppresses default handling for it, not for pinches).
    pub fn begin_gesture(&mut self, surface: SurfaceRect, input: &PointerInput) -> GestureKind {
        match classify(input) {
            GestureKind::Pinch => {
                self.last_pinch_dist = pinch_distance(input);
                GestureKind::Pinch
            }
            GestureKind::Draw => {
                if let Some((x, y)) = self.local_coords(surface, input) {
                    self.start = Some((x, y));
                    self.temp = Some(TempBlock {
                        left: x,
                        top: y,
                        width: 0.0,
                        height: 0.0,
                    });
                }
                GestureKind::Draw
            }
        }
    }

    /// Handles pointer movement during a gesture.
    ///
    /// Pinch movement rescales the container by the ratio of the current
    /// inter-touch distance to the last one, clamped to the zoom range, and
    /// re-seeds the baseline. Draw movement resizes the temp block so the
    /// anchor corner stays fixed and the opposite corner tracks the
    /// pointer, with width and height kept non-negative. Movement with no
    /// active gesture, or draw movement without a usable point, is a no-op.
    pub fn update_gesture(&mut self, surface: SurfaceRect, input: &PointerInput) {
        if classify(input) == GestureKind::Pinch {
            if let (Some(d0), Some(d)) = (self.last_pinch_dist, pinch_distance(input)) {
                self.scale = (self.scale * d / d0).clamp(MIN_SCALE, MAX_SCALE);
                self.last_pinch_dist = Some(d);
            }
            return;
        }

        if self.temp.is_none() {
            return;
        }
        let Some((x, y)) = self.local_coords(surface, input) else {
            return;
        };
        let Some((start_x, start_y)) = self.start else {
            return;
        };

        let dx = x - start_x;
        let dy = y - start_y;
        if let Some(temp) = self.temp.as_mut() {
            temp.width = dx.abs();
            temp.height = dy.abs();
            temp.left = if dx < 0.0 { x } else { start_x };
            temp.top = if dy < 0.0 { y } else { start_y };
        }
    }

    /// Handles a gesture end.
    ///
    /// A live pinch session degrades to "pinch ended": the distance baseline
    /// is cleared so the next pinch re-seeds it, and no draw is started.
    /// Otherwise, an active temp block is promoted to a permanent [`Block`]
    /// with the container's next identifier; the returned id reports the
    /// finalization to the caller. An end with no active gesture is a no-op.
    pub fn end_gesture(&mut self) -> Option<u32> {
        if self.last_pinch_dist.take().is_some() {
            return None;
        }

        let temp = self.temp.take()?;
        self.start = None;
        let id = self.next_block_id;
        self.next_block_id += 1;
        self.blocks.push(Block {
            id,
            left: temp.left,
            top: temp.top,
            width: temp.width,
            height: temp.height,
        });
        Some(id)
    }

    /// Handles wheel input, zooming around the cursor.
    ///
    /// `wheel_delta_y` follows the DOM convention: positive values scroll
    /// down and zoom out. The local cursor position is computed at the
    /// pre-update scale and becomes the new transform origin, so the zoom
    /// pivots around the cursor, unlike the pinch path, which never moves
    /// the origin.
    pub fn wheel_zoom(&mut self, surface: SurfaceRect, client_x: f32, client_y: f32, wheel_delta_y: f32) {
        let Some((x, y)) = self.local_coords(surface, &PointerInput::Mouse(client_x, client_y)) else {
            return;
        };
        let delta = -wheel_delta_y * WHEEL_ZOOM_RATE;
        self.transform_origin = (x, y);
        self.scale = (self.scale + delta).clamp(MIN_SCALE, MAX_SCALE);
    }

    /// Finds the topmost finalized block containing the given local point.
    pub fn block_at(&self, x: f32, y: f32) -> Option<&Block> {
        self.blocks.iter().rev().find(|b| b.contains(x, y))
    }

    /// Emits this container's finalized blocks in normalized form, in
    /// creation order. The in-progress temp block is never included; a
    /// container with no blocks contributes no records.
    pub fn block_records(&self) -> Vec<BlockRecord> {
        self.blocks
            .iter()
            .map(|b| BlockRecord {
                page_id: self.page_id,
                x: b.left / self.width * 100.0,
                y: b.top / self.height * 100.0,
                width: b.width / self.width * 100.0,
                height: b.height / self.height * 100.0,
            })
            .collect()
    }
}

/// Collects the normalized block records of every container, in container
/// traversal order.
pub fn collect_block_records<'a>(
    containers: impl IntoIterator<Item = &'a Container>,
) -> Vec<BlockRecord> {
    containers
        .into_iter()
        .flat_map(Container::block_records)
        .collect()
}

/// Serializes all finalized blocks into the single JSON payload handed to
/// the submission boundary.
pub fn blocks_payload<'a>(
    containers: impl IntoIterator<Item = &'a Container>,
) -> Result<String, serde_json::Error> {
    serde_json::to_string(&collect_block_records(containers))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SURFACE: SurfaceRect = SurfaceRect { left: 0.0, top: 0.0 };

    fn mouse(x: f32, y: f32) -> PointerInput {
        PointerInput::Mouse(x, y)
    }

    fn touches(points: &[(f32, f32)]) -> PointerInput {
        PointerInput::Touches(points.to_vec())
    }

    fn draw_block(container: &mut Container, from: (f32, f32), to: (f32, f32)) -> Option<u32> {
        container.begin_gesture(SURFACE, &mouse(from.0, from.1));
        container.update_gesture(SURFACE, &mouse(to.0, to.1));
        container.end_gesture()
    }

    #[test]
    fn test_classify_by_touch_count() {
        assert_eq!(classify(&mouse(10.0, 10.0)), GestureKind::Draw);
        assert_eq!(classify(&touches(&[(1.0, 1.0)])), GestureKind::Draw);
        assert_eq!(classify(&touches(&[])), GestureKind::Draw);
        assert_eq!(
            classify(&touches(&[(1.0, 1.0), (2.0, 2.0)])),
            GestureKind::Pinch
        );
        assert_eq!(
            classify(&touches(&[(1.0, 1.0), (2.0, 2.0), (3.0, 3.0)])),
            GestureKind::Pinch
        );
    }

    #[test]
    fn test_local_coords_compensate_for_scale() {
        let mut container = Container::new(1, 400.0, 200.0);
        let surface = SurfaceRect::new(100.0, 50.0);

        assert_eq!(
            container.local_coords(surface, &mouse(150.0, 100.0)),
            Some((50.0, 50.0))
        );

        container.wheel_zoom(surface, 100.0, 50.0, -1000.0);
        assert_eq!(container.scale(), 2.0);
        assert_eq!(
            container.local_coords(surface, &mouse(200.0, 150.0)),
            Some((50.0, 50.0))
        );
    }

    #[test]
    fn test_local_coords_undefined_for_multi_touch() {
        let container = Container::new(1, 400.0, 200.0);

        assert_eq!(
            container.local_coords(SURFACE, &touches(&[(1.0, 1.0), (2.0, 2.0)])),
            None
        );
        assert_eq!(container.local_coords(SURFACE, &touches(&[])), None);
    }

    #[test]
    fn test_drag_produces_normalized_block() {
        let mut container = Container::new(1, 400.0, 200.0);

        let id = draw_block(&mut container, (50.0, 50.0), (150.0, 120.0));

        assert_eq!(id, Some(1));
        assert_eq!(
            container.blocks(),
            &[Block {
                id: 1,
                left: 50.0,
                top: 50.0,
                width: 100.0,
                height: 70.0,
            }]
        );
        assert!(container.temp_block().is_none());
    }

    #[test]
    fn test_leftward_upward_drag_anchors_at_minimum() {
        let mut container = Container::new(1, 400.0, 200.0);

        draw_block(&mut container, (150.0, 120.0), (50.0, 50.0));

        let block = container.blocks()[0];
        assert_eq!(block.left, 50.0);
        assert_eq!(block.top, 50.0);
        assert_eq!(block.width, 100.0);
        assert_eq!(block.height, 70.0);
    }

    #[test]
    fn test_temp_block_tracks_pointer_during_move() {
        let mut container = Container::new(1, 400.0, 200.0);

        container.begin_gesture(SURFACE, &mouse(100.0, 100.0));
        let temp = container.temp_block().unwrap();
        assert_eq!((temp.left, temp.top, temp.width, temp.height), (100.0, 100.0, 0.0, 0.0));

        // Drag up-left, then down-right past the anchor.
        container.update_gesture(SURFACE, &mouse(60.0, 70.0));
        let temp = container.temp_block().unwrap();
        assert_eq!((temp.left, temp.top, temp.width, temp.height), (60.0, 70.0, 40.0, 30.0));

        container.update_gesture(SURFACE, &mouse(130.0, 110.0));
        let temp = container.temp_block().unwrap();
        assert_eq!((temp.left, temp.top, temp.width, temp.height), (100.0, 100.0, 30.0, 10.0));
    }

    #[test]
    fn test_zero_size_block_is_accepted() {
        let mut container = Container::new(1, 400.0, 200.0);

        container.begin_gesture(SURFACE, &mouse(30.0, 40.0));
        let id = container.end_gesture();

        assert_eq!(id, Some(1));
        let block = container.blocks()[0];
        assert_eq!((block.left, block.top, block.width, block.height), (30.0, 40.0, 0.0, 0.0));
    }

    #[test]
    fn test_end_without_start_is_noop() {
        let mut container = Container::new(1, 400.0, 200.0);

        assert_eq!(container.end_gesture(), None);
        assert!(container.blocks().is_empty());
    }

    #[test]
    fn test_move_without_start_is_noop() {
        let mut container = Container::new(1, 400.0, 200.0);

        container.update_gesture(SURFACE, &mouse(80.0, 90.0));

        assert!(container.temp_block().is_none());
        assert!(container.blocks().is_empty());
    }

    #[test]
    fn test_block_ids_are_monotone_across_zoom_interleaving() {
        let mut container = Container::new(1, 400.0, 200.0);

        draw_block(&mut container, (0.0, 0.0), (10.0, 10.0));
        container.wheel_zoom(SURFACE, 0.0, 0.0, -100.0);
        draw_block(&mut container, (20.0, 20.0), (30.0, 30.0));
        container.begin_gesture(SURFACE, &touches(&[(0.0, 0.0), (100.0, 0.0)]));
        container.update_gesture(SURFACE, &touches(&[(0.0, 0.0), (120.0, 0.0)]));
        container.end_gesture();
        draw_block(&mut container, (40.0, 40.0), (50.0, 50.0));

        let ids: Vec<u32> = container.blocks().iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_drawing_with_scale_applied_uses_local_units() {
        let mut container = Container::new(1, 400.0, 200.0);
        // deltaY = -1000 → delta = 1.0 → scale 2.0
        container.wheel_zoom(SURFACE, 0.0, 0.0, -1000.0);
        assert_eq!(container.scale(), 2.0);

        draw_block(&mut container, (100.0, 100.0), (200.0, 160.0));

        // Client distances are halved by the scale compensation.
        let block = container.blocks()[0];
        assert_eq!((block.left, block.top), (50.0, 50.0));
        assert_eq!((block.width, block.height), (50.0, 30.0));
    }

    #[test]
    fn test_wheel_zoom_scenario() {
        let mut container = Container::new(1, 400.0, 200.0);

        container.wheel_zoom(SURFACE, 120.0, 80.0, -100.0);

        assert!((container.scale() - 1.1).abs() < 1e-6);
        assert_eq!(container.transform_origin(), (120.0, 80.0));
    }

    #[test]
    fn test_wheel_zoom_origin_uses_pre_update_scale() {
        let mut container = Container::new(1, 400.0, 200.0);
        container.wheel_zoom(SURFACE, 0.0, 0.0, -1000.0);
        assert_eq!(container.scale(), 2.0);

        container.wheel_zoom(SURFACE, 100.0, 60.0, -100.0);

        // Local coords were computed at scale 2, before the update.
        assert_eq!(container.transform_origin(), (50.0, 30.0));
        assert!((container.scale() - 2.1).abs() < 1e-6);
    }

    #[test]
    fn test_scale_clamped_for_extreme_wheel_deltas() {
        let mut container = Container::new(1, 400.0, 200.0);

        container.wheel_zoom(SURFACE, 0.0, 0.0, -1_000_000.0);
        assert_eq!(container.scale(), 3.0);

        container.wheel_zoom(SURFACE, 0.0, 0.0, 1_000_000.0);
        assert_eq!(container.scale(), 0.5);
    }

    #[test]
    fn test_pinch_scales_by_distance_ratio() {
        let mut container = Container::new(1, 400.0, 200.0);

        container.begin_gesture(SURFACE, &touches(&[(0.0, 0.0), (100.0, 0.0)]));
        assert!(container.pinching());
        assert!(container.temp_block().is_none());

        container.update_gesture(SURFACE, &touches(&[(0.0, 0.0), (150.0, 0.0)]));

        assert!((container.scale() - 1.5).abs() < 1e-6);
        // Pinch zoom never moves the transform origin.
        assert_eq!(container.transform_origin(), (0.0, 0.0));
    }

    #[test]
    fn test_pinch_reseeds_baseline_each_move() {
        let mut container = Container::new(1, 400.0, 200.0);

        container.begin_gesture(SURFACE, &touches(&[(0.0, 0.0), (100.0, 0.0)]));
        container.update_gesture(SURFACE, &touches(&[(0.0, 0.0), (150.0, 0.0)]));
        container.update_gesture(SURFACE, &touches(&[(0.0, 0.0), (75.0, 0.0)]));

        // 1.0 * 150/100 * 75/150 = 0.75
        assert!((container.scale() - 0.75).abs() < 1e-6);
    }

    #[test]
    fn test_pinch_scale_clamped_for_extreme_ratios() {
        let mut container = Container::new(1, 400.0, 200.0);

        container.begin_gesture(SURFACE, &touches(&[(0.0, 0.0), (1.0, 0.0)]));
        container.update_gesture(SURFACE, &touches(&[(0.0, 0.0), (10_000.0, 0.0)]));
        assert_eq!(container.scale(), 3.0);

        container.update_gesture(SURFACE, &touches(&[(0.0, 0.0), (0.001, 0.0)]));
        assert_eq!(container.scale(), 0.5);
    }

    #[test]
    fn test_pinch_end_clears_baseline() {
        let mut container = Container::new(1, 400.0, 200.0);

        container.begin_gesture(SURFACE, &touches(&[(0.0, 0.0), (100.0, 0.0)]));
        container.update_gesture(SURFACE, &touches(&[(0.0, 0.0), (150.0, 0.0)]));
        assert_eq!(container.end_gesture(), None);

        assert!(!container.pinching());
        assert!(container.blocks().is_empty());

        // A fresh pinch re-seeds its baseline; the old 150 is never reused.
        container.begin_gesture(SURFACE, &touches(&[(0.0, 0.0), (200.0, 0.0)]));
        container.update_gesture(SURFACE, &touches(&[(0.0, 0.0), (300.0, 0.0)]));
        assert!((container.scale() - 2.25).abs() < 1e-6);
    }

    #[test]
    fn test_pinch_losing_a_point_does_not_start_a_draw() {
        let mut container = Container::new(1, 400.0, 200.0);

        container.begin_gesture(SURFACE, &touches(&[(0.0, 0.0), (100.0, 0.0)]));
        // First finger lifts: the session degrades to "pinch ended".
        container.end_gesture();
        // The remaining finger keeps moving; no draw session exists.
        container.update_gesture(SURFACE, &touches(&[(40.0, 40.0)]));
        container.end_gesture();

        assert!(container.temp_block().is_none());
        assert!(container.blocks().is_empty());
    }

    #[test]
    fn test_pinch_move_without_baseline_is_noop() {
        let mut container = Container::new(1, 400.0, 200.0);

        container.update_gesture(SURFACE, &touches(&[(0.0, 0.0), (150.0, 0.0)]));

        assert_eq!(container.scale(), 1.0);
        assert!(!container.pinching());
    }

    #[test]
    fn test_draw_move_ignores_multi_touch_input() {
        let mut container = Container::new(1, 400.0, 200.0);

        container.begin_gesture(SURFACE, &touches(&[(10.0, 10.0)]));
        // A second finger lands mid-draw; there is no usable point, so the
        // temp block must not budge.
        container.update_gesture(SURFACE, &touches(&[(90.0, 90.0), (120.0, 120.0)]));

        let temp = container.temp_block().unwrap();
        assert_eq!((temp.left, temp.top, temp.width, temp.height), (10.0, 10.0, 0.0, 0.0));
    }

    #[test]
    fn test_single_touch_draw_matches_mouse_draw() {
        let mut container = Container::new(1, 400.0, 200.0);

        container.begin_gesture(SURFACE, &touches(&[(50.0, 50.0)]));
        container.update_gesture(SURFACE, &touches(&[(150.0, 120.0)]));
        container.end_gesture();

        assert_eq!(
            container.blocks(),
            &[Block {
                id: 1,
                left: 50.0,
                top: 50.0,
                width: 100.0,
                height: 70.0,
            }]
        );
    }

    #[test]
    fn test_block_at_prefers_topmost() {
        let mut container = Container::new(1, 400.0, 200.0);
        draw_block(&mut container, (0.0, 0.0), (100.0, 100.0));
        draw_block(&mut container, (50.0, 50.0), (150.0, 150.0));

        assert_eq!(container.block_at(75.0, 75.0).map(|b| b.id), Some(2));
        assert_eq!(container.block_at(10.0, 10.0).map(|b| b.id), Some(1));
        assert_eq!(container.block_at(300.0, 10.0).map(|b| b.id), None);
    }

    #[test]
    fn test_serialization_scenario() {
        let mut container = Container::new(3, 400.0, 200.0);
        draw_block(&mut container, (50.0, 50.0), (150.0, 120.0));

        let records = container.block_records();

        assert_eq!(
            records,
            vec![BlockRecord {
                page_id: 3,
                x: 12.5,
                y: 25.0,
                width: 25.0,
                height: 35.0,
            }]
        );
    }

    #[test]
    fn test_serialization_round_trips_against_container_dimensions() {
        let mut container = Container::new(1, 635.0, 898.0);
        draw_block(&mut container, (12.0, 34.0), (181.0, 322.0));
        draw_block(&mut container, (300.0, 700.0), (301.5, 702.25));

        for (record, block) in container.block_records().iter().zip(container.blocks()) {
            assert!((record.x * container.width / 100.0 - block.left).abs() < 1e-3);
            assert!((record.y * container.height / 100.0 - block.top).abs() < 1e-3);
            assert!((record.width * container.width / 100.0 - block.width).abs() < 1e-3);
            assert!((record.height * container.height / 100.0 - block.height).abs() < 1e-3);
        }
    }

    #[test]
    fn test_temp_block_is_never_serialized() {
        let mut container = Container::new(1, 400.0, 200.0);
        container.begin_gesture(SURFACE, &mouse(10.0, 10.0));
        container.update_gesture(SURFACE, &mouse(60.0, 60.0));

        assert!(container.temp_block().is_some());
        assert!(container.block_records().is_empty());
    }

    #[test]
    fn test_payload_walks_containers_in_order() {
        let mut first = Container::new(1, 400.0, 200.0);
        let mut third = Container::new(3, 400.0, 200.0);
        let empty = Container::new(2, 400.0, 200.0);
        draw_block(&mut first, (0.0, 0.0), (40.0, 20.0));
        draw_block(&mut first, (100.0, 100.0), (140.0, 120.0));
        draw_block(&mut third, (200.0, 0.0), (400.0, 200.0));

        let records = collect_block_records([&first, &empty, &third]);

        let pages: Vec<PageId> = records.iter().map(|r| r.page_id).collect();
        assert_eq!(pages, vec![1, 1, 3]);

        let payload = blocks_payload([&first, &empty, &third]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&payload).unwrap();
        assert_eq!(value.as_array().unwrap().len(), 3);
        assert_eq!(value[2]["page_id"], serde_json::json!(3));
        assert_eq!(value[2]["x"], serde_json::json!(50.0));
        assert_eq!(value[2]["width"], serde_json::json!(50.0));
    }

    #[test]
    fn test_empty_containers_produce_empty_payload() {
        let containers = [Container::new(1, 400.0, 200.0), Container::new(2, 400.0, 200.0)];

        assert!(collect_block_records(&containers).is_empty());
        assert_eq!(blocks_payload(&containers).unwrap(), "[]");
    }

    #[test]
    fn test_new_gesture_replaces_abandoned_temp_block() {
        let mut container = Container::new(1, 400.0, 200.0);

        // A gesture that never ends leaves its temp block attached.
        container.begin_gesture(SURFACE, &mouse(10.0, 10.0));
        container.update_gesture(SURFACE, &mouse(90.0, 90.0));
        assert!(container.temp_block().is_some());

        // The next start replaces it wholesale; nothing is finalized.
        container.begin_gesture(SURFACE, &mouse(200.0, 100.0));
        let temp = container.temp_block().unwrap();
        assert_eq!((temp.left, temp.top), (200.0, 100.0));
        assert!(container.blocks().is_empty());
    }
}
