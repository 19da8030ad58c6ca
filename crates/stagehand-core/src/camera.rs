//! Camera transform and lock-to-primitive control.

use glam::Mat4;

use crate::error::{Result, StagehandError};
use crate::scene::{PrimitiveId, Scene};

/// Owns the camera transform and the optional lock onto a scene primitive.
#[derive(Debug, Clone, PartialEq)]
pub struct CameraController {
    /// Camera-to-world transform.
    transform: Mat4,
    /// Primitive the camera follows, if any.
    locked: Option<PrimitiveId>,
    /// Fraction of the previous locked matrix kept each frame.
    lag: f32,
    /// Last blended locked matrix.
    blended: Mat4,
}

impl Default for CameraController {
    fn default() -> Self {
        Self {
            transform: Mat4::IDENTITY,
            locked: None,
            lag: 0.0,
            blended: Mat4::IDENTITY,
        }
    }
}

impl CameraController {
    /// Creates an unlocked camera at the origin.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the camera-to-world transform directly, bypassing the lock.
    pub fn set_matrix(&mut self, transform: Mat4) -> Result<()> {
        if !transform.is_finite() || transform.determinant() == 0.0 {
            return Err(StagehandError::invalid(
                "set-camera",
                "camera transform must be finite and invertible",
            ));
        }
        self.transform = transform;
        Ok(())
    }

    /// Returns the world-to-camera matrix.
    #[must_use]
    pub fn matrix(&self) -> Mat4 {
        self.transform.inverse()
    }

    /// Returns the primitive the camera is locked to.
    #[must_use]
    pub fn locked(&self) -> Option<PrimitiveId> {
        self.locked
    }

    /// Locks the camera onto a primitive, or unlocks it for `None` / id 0.
    ///
    /// An id that does not resolve in `scene` is rejected and the previous
    /// lock is kept.
    pub fn lock(&mut self, id: Option<PrimitiveId>, scene: &dyn Scene) -> Result<()> {
        match id.filter(|&id| id != 0) {
            None => {
                if let Some(previous) = self.locked.take() {
                    log::debug!("camera unlocked from primitive {previous}");
                }
                self.blended = Mat4::IDENTITY;
                Ok(())
            }
            Some(id) => {
                if scene.primitive_transform(id).is_none() {
                    log::warn!("lock-camera: primitive {id} does not exist");
                    return Err(StagehandError::UnresolvedReference(id));
                }
                log::debug!("camera locked to primitive {id}");
                self.locked = Some(id);
                Ok(())
            }
        }
    }

    /// Sets how much of the previous locked matrix survives each frame.
    pub fn set_lag(&mut self, lag: f32) -> Result<()> {
        if !(0.0..1.0).contains(&lag) {
            return Err(StagehandError::invalid(
                "camera-lag",
                format!("lag must be in [0, 1), got {lag}"),
            ));
        }
        self.lag = lag;
        Ok(())
    }

    #[must_use]
    pub fn lag(&self) -> f32 {
        self.lag
    }

    /// Advances the locked blend by one frame and returns its inverse.
    ///
    /// When unlocked this is the inverse of [`matrix`](Self::matrix), i.e. the
    /// camera-to-world transform. A lock whose primitive has vanished is
    /// dropped.
    pub fn locked_matrix(&mut self, scene: &dyn Scene) -> Mat4 {
        let Some(id) = self.locked else {
            return self.transform;
        };
        let Some(target) = scene.primitive_transform(id) else {
            log::warn!("locked primitive {id} no longer exists, unlocking camera");
            self.locked = None;
            self.blended = Mat4::IDENTITY;
            return self.transform;
        };

        self.blended = self.blended * self.lag + target * (1.0 - self.lag);
        self.blended.inverse()
    }
}
