//! Cameras and projections
//!
//! [`Projection`] is shared by the scene camera and the shadow light space.
//! Every matrix follows glam's right-handed convention with depth in [0, 1].

use glam::{Mat4, Vec3};

/// Frustum shape of a camera or a light.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Projection {
    /// Symmetric perspective frustum.
    Perspective {
        /// Vertical field of view in radians.
        fov_y: f32,
        /// Width over height.
        aspect: f32,
        near: f32,
        far: f32,
    },
    /// Box centered on the view axis, `2 * half_width` by `2 * half_height`.
    Orthographic {
        half_width: f32,
        half_height: f32,
        near: f32,
        far: f32,
    },
}

impl Projection {
    /// Perspective frustum with the vertical field of view in degrees.
    pub fn perspective_degrees(fov_y: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self::Perspective {
            fov_y: fov_y.to_radians(),
            aspect,
            near,
            far,
        }
    }

    /// Square orthographic box reaching `half_extent` from the axis.
    pub fn square_orthographic(half_extent: f32, near: f32, far: f32) -> Self {
        Self::Orthographic {
            half_width: half_extent,
            half_height: half_extent,
            near,
            far,
        }
    }

    pub fn matrix(&self) -> Mat4 {
        match *self {
            Self::Perspective {
                fov_y,
                aspect,
                near,
                far,
            } => Mat4::perspective_rh(fov_y, aspect, near, far),
            Self::Orthographic {
                half_width,
                half_height,
                near,
                far,
            } => Mat4::orthographic_rh(
                -half_width,
                half_width,
                -half_height,
                half_height,
                near,
                far,
            ),
        }
    }

    /// Same frustum stretched to a new width over height.
    ///
    /// Orthographic boxes keep their height and widen.
    pub fn with_aspect(self, aspect: f32) -> Self {
        match self {
            Self::Perspective {
                fov_y, near, far, ..
            } => Self::Perspective {
                fov_y,
                aspect,
                near,
                far,
            },
            Self::Orthographic {
                half_height,
                near,
                far,
                ..
            } => Self::Orthographic {
                half_width: half_height * aspect,
                half_height,
                near,
                far,
            },
        }
    }
}

/// Anything a frame can be rendered from.
pub trait Viewer {
    /// World-space eye position used for view vectors.
    fn eye(&self) -> Vec3;

    fn view_matrix(&self) -> Mat4;

    fn projection_matrix(&self) -> Mat4;

    /// World to clip space.
    fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}

/// Look-at camera.
#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Vec3,
    pub target: Vec3,
    /// World up, Y unless changed.
    pub up: Vec3,
    pub projection: Projection,
}

impl Camera {
    /// Camera at `position` looking at `target` with world Y up.
    pub fn look_at(position: Vec3, target: Vec3, projection: Projection) -> Self {
        Self {
            position,
            target,
            up: Vec3::Y,
            projection,
        }
    }

    /// Place the camera on a sphere around `target`.
    ///
    /// `yaw` rotates around world Y, `pitch` lifts the eye above the XZ plane (radians).
    pub fn orbit(&mut self, target: Vec3, yaw: f32, pitch: f32, distance: f32) {
        let pitch = pitch.clamp(-1.55, 1.55);
        let (sin_yaw, cos_yaw) = yaw.sin_cos();
        let (sin_pitch, cos_pitch) = pitch.sin_cos();
        let offset = Vec3::new(cos_pitch * sin_yaw, sin_pitch, cos_pitch * cos_yaw);
        self.target = target;
        self.position = target + offset * distance;
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        self.projection = self.projection.with_aspect(aspect);
    }
}

impl Viewer for Camera {
    fn eye(&self) -> Vec3 {
        self.position
    }

    fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }

    fn projection_matrix(&self) -> Mat4 {
        self.projection.matrix()
    }
}

/// Camera block of the per-frame uniforms.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
    /// Eye position, w = 1.
    pub eye: [f32; 4],
}

impl CameraUniform {
    pub fn from_viewer<V: Viewer + ?Sized>(viewer: &V) -> Self {
        Self {
            view_proj: viewer.view_projection_matrix().to_cols_array_2d(),
            eye: viewer.eye().extend(1.0).to_array(),
        }
    }
}
