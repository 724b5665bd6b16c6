//! Overlay labels
//!
//! Text drawn on top of the rendered frame at positions projected from 3D
//! anchors. The scene talks to the host's text layer through [`OverlaySink`]
//! so projection can be tested without a window.

use std::collections::BTreeMap;

use crate::rasterizer::{project, Camera, ScreenPoint, Vec3, Viewport};

/// Handle to one overlay element
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LabelId(u32);

/// What a label shows, which decides how the host lays it out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelKind {
    /// Band range text, pinned near the bottom edge at the projected x
    BandRange,
    /// Score readout, centered on the projected point
    Readout,
}

/// Host-side text layer
pub trait OverlaySink {
    /// Allocate a new element
    fn attach(&mut self, kind: LabelKind, text: &str) -> LabelId;
    fn set_text(&mut self, id: LabelId, text: &str);
    /// Move an element; `None` hides it (anchor behind the camera)
    fn place(&mut self, id: LabelId, position: Option<ScreenPoint>);
    /// Release an element
    fn detach(&mut self, id: LabelId);
    /// Number of live elements
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One element of a [`LabelLayer`]
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub kind: LabelKind,
    pub text: String,
    pub position: Option<ScreenPoint>,
}

/// In-memory overlay, the host draws it after the frame texture
#[derive(Debug, Default)]
pub struct LabelLayer {
    labels: BTreeMap<LabelId, Label>,
    next_id: u32,
}

impl LabelLayer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: LabelId) -> Option<&Label> {
        self.labels.get(&id)
    }

    /// Labels in allocation order
    pub fn iter(&self) -> impl Iterator<Item = (LabelId, &Label)> {
        self.labels.iter().map(|(id, label)| (*id, label))
    }
}

impl OverlaySink for LabelLayer {
    fn attach(&mut self, kind: LabelKind, text: &str) -> LabelId {
        let id = LabelId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.labels.insert(
            id,
            Label {
                kind,
                text: text.to_string(),
                position: None,
            },
        );
        id
    }

    fn set_text(&mut self, id: LabelId, text: &str) {
        if let Some(label) = self.labels.get_mut(&id) {
            label.text.clear();
            label.text.push_str(text);
        }
    }

    fn place(&mut self, id: LabelId, position: Option<ScreenPoint>) {
        if let Some(label) = self.labels.get_mut(&id) {
            label.position = position;
        }
    }

    fn detach(&mut self, id: LabelId) {
        self.labels.remove(&id);
    }

    fn len(&self) -> usize {
        self.labels.len()
    }
}

/// An overlay element bound to a world-space point
#[derive(Debug, Clone, PartialEq)]
pub struct LabelAnchor {
    pub id: LabelId,
    pub point: Vec3,
    /// Screen position written by the last `reproject`
    pub screen: Option<ScreenPoint>,
}

impl LabelAnchor {
    pub fn new(id: LabelId, point: Vec3) -> Self {
        Self {
            id,
            point,
            screen: None,
        }
    }

    /// Project through `camera` and push the result to the overlay
    pub fn reproject<O: OverlaySink + ?Sized>(&mut self, camera: &Camera, viewport: Viewport, overlay: &mut O) {
        self.screen = project(self.point, camera, viewport);
        overlay.place(self.id, self.screen);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attach_and_detach() {
        let mut layer = LabelLayer::new();
        let a = layer.attach(LabelKind::BandRange, "300-579");
        let b = layer.attach(LabelKind::Readout, "Score\n700");
        assert_ne!(a, b);
        assert_eq!(layer.len(), 2);

        layer.set_text(b, "Score\n701");
        assert_eq!(layer.get(b).unwrap().text, "Score\n701");

        layer.detach(a);
        layer.detach(a);
        assert_eq!(layer.len(), 1);
        layer.detach(b);
        assert!(layer.is_empty());
    }

    #[test]
    fn test_ids_not_reused() {
        let mut layer = LabelLayer::new();
        let a = layer.attach(LabelKind::BandRange, "a");
        layer.detach(a);
        let b = layer.attach(LabelKind::BandRange, "b");
        assert_ne!(a, b);
    }

    #[test]
    fn test_reproject_writes_position() {
        let mut layer = LabelLayer::new();
        let id = layer.attach(LabelKind::Readout, "x");
        let mut camera = Camera::perspective(60.0, 2.0, 0.1, 1000.0);
        camera.look_at(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO);
        let viewport = Viewport::new(200, 100);

        let mut anchor = LabelAnchor::new(id, Vec3::ZERO);
        anchor.reproject(&camera, viewport, &mut layer);
        let placed = layer.get(id).unwrap().position.unwrap();
        assert!((placed.x - 100.0).abs() < 1e-3);
        assert!((placed.y - 50.0).abs() < 1e-3);
        assert_eq!(anchor.screen, Some(placed));

        // Anchor behind the eye hides the label
        anchor.point = Vec3::new(0.0, 0.0, 20.0);
        anchor.reproject(&camera, viewport, &mut layer);
        assert_eq!(layer.get(id).unwrap().position, None);
    }
}
