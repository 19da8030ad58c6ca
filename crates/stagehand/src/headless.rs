//! In-memory collaborators for running an engine without a renderer.
//!
//! Useful for integration tests, batch script checking and tooling. The scene
//! keeps primitive transforms and screen placements so camera locking and
//! picking behave as they would against a live renderer.

use std::any::Any;
use std::collections::BTreeMap;

use glam::Mat4;
use stagehand_core::{
    Collaborators, Display, FunctionContainer, GrabStack, Lighting, Physics, PrimitiveId, Result,
    Scene,
};

/// Where a primitive appears on screen, as last rendered.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Placement {
    x: i32,
    y: i32,
    depth: f32,
}

#[derive(Debug, Clone)]
struct Prim {
    transform: Mat4,
    placement: Option<Placement>,
}

/// A scene graph that only tracks transforms and screen placements.
#[derive(Debug, Clone)]
pub struct HeadlessScene {
    prims: BTreeMap<PrimitiveId, Prim>,
    next_id: PrimitiveId,
    grabbed: Option<PrimitiveId>,
    clears: usize,
}

impl Default for HeadlessScene {
    fn default() -> Self {
        Self {
            prims: BTreeMap::new(),
            next_id: 1,
            grabbed: None,
            clears: 0,
        }
    }
}

impl HeadlessScene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a primitive with the given world transform and returns its id.
    pub fn add_primitive(&mut self, transform: Mat4) -> PrimitiveId {
        let id = self.next_id;
        self.next_id += 1;
        self.prims.insert(
            id,
            Prim {
                transform,
                placement: None,
            },
        );
        id
    }

    /// Moves a primitive. Returns false if it does not exist.
    pub fn set_transform(&mut self, id: PrimitiveId, transform: Mat4) -> bool {
        match self.prims.get_mut(&id) {
            Some(prim) => {
                prim.transform = transform;
                true
            }
            None => false,
        }
    }

    /// Records where a primitive was drawn on screen and at what depth.
    /// Returns false if it does not exist.
    pub fn place(&mut self, id: PrimitiveId, x: i32, y: i32, depth: f32) -> bool {
        match self.prims.get_mut(&id) {
            Some(prim) => {
                prim.placement = Some(Placement { x, y, depth });
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, id: PrimitiveId) -> bool {
        self.prims.remove(&id).is_some()
    }

    /// Marks a primitive as grabbed for editing.
    pub fn grab(&mut self, id: PrimitiveId) {
        self.grabbed = Some(id);
    }

    #[must_use]
    pub fn grabbed(&self) -> Option<PrimitiveId> {
        self.grabbed
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.prims.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.prims.is_empty()
    }

    /// Number of times the scene has been cleared.
    #[must_use]
    pub fn clears(&self) -> usize {
        self.clears
    }
}

impl Scene for HeadlessScene {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn primitive_transform(&self, id: PrimitiveId) -> Option<Mat4> {
        self.prims.get(&id).map(|p| p.transform)
    }

    fn select(&mut self, x: i32, y: i32, size: u32) -> Option<PrimitiveId> {
        let half = i64::from(size / 2);
        let inside = |p: &Placement| {
            (i64::from(p.x) - i64::from(x)).abs() <= half
                && (i64::from(p.y) - i64::from(y)).abs() <= half
        };
        self.prims
            .iter()
            .filter_map(|(&id, prim)| prim.placement.filter(|p| inside(p)).map(|p| (id, p.depth)))
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(id, _)| id)
    }

    fn clear(&mut self) -> Result<()> {
        self.prims.clear();
        self.clears += 1;
        Ok(())
    }

    fn ungrab(&mut self) -> Result<()> {
        self.grabbed = None;
        Ok(())
    }
}

/// Counts how often a subsystem was cleared.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ClearCounter {
    pub clears: usize,
}

impl Physics for ClearCounter {
    fn clear(&mut self) -> Result<()> {
        self.clears += 1;
        Ok(())
    }
}

impl Lighting for ClearCounter {
    fn clear_lights(&mut self) -> Result<()> {
        self.clears += 1;
        Ok(())
    }
}

impl GrabStack for ClearCounter {
    fn clear(&mut self) -> Result<()> {
        self.clears += 1;
        Ok(())
    }
}

impl FunctionContainer for ClearCounter {
    fn clear(&mut self) -> Result<()> {
        self.clears += 1;
        Ok(())
    }
}

/// A window that only remembers its size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeadlessDisplay {
    pub width: u32,
    pub height: u32,
    pub stereo: bool,
}

impl Default for HeadlessDisplay {
    fn default() -> Self {
        Self {
            width: 720,
            height: 576,
            stereo: false,
        }
    }
}

impl HeadlessDisplay {
    /// A display with quad-buffered stereo.
    #[must_use]
    pub fn stereo() -> Self {
        Self {
            stereo: true,
            ..Self::default()
        }
    }
}

impl Display for HeadlessDisplay {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn stereo_capable(&self) -> bool {
        self.stereo
    }

    fn resolution(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn resize(&mut self, width: u32, height: u32) -> Result<()> {
        log::debug!("headless display resized to {width}x{height}");
        self.width = width;
        self.height = height;
        Ok(())
    }
}

/// Headless collaborators on a mono display.
pub fn collaborators() -> Collaborators {
    with_display(HeadlessDisplay::default())
}

/// Headless collaborators on the given display.
pub fn with_display(display: HeadlessDisplay) -> Collaborators {
    Collaborators {
        scene: Box::new(HeadlessScene::new()),
        physics: Box::new(ClearCounter::default()),
        lighting: Box::new(ClearCounter::default()),
        grab_stack: Box::new(ClearCounter::default()),
        functions: Box::new(ClearCounter::default()),
        display: Box::new(display),
    }
}
