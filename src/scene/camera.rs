//! Free-fly camera driven by keyboard, mouse and scroll input.

use nalgebra::{Matrix4, Point3, Vector3};

/// Default yaw in degrees (looking down -Z).
pub const YAW: f32 = -90.0;
/// Default pitch in degrees.
pub const PITCH: f32 = 0.0;
/// Default movement speed in units per second.
pub const SPEED: f32 = 10.0;
/// Default mouse sensitivity in degrees per pixel.
pub const SENSITIVITY: f32 = 0.1;
/// Default vertical field of view in degrees.
pub const ZOOM: f32 = 45.0;
/// Smallest zoom reachable by scrolling.
pub const MIN_ZOOM: f32 = 1.0;
/// Largest zoom reachable by scrolling.
pub const MAX_ZOOM: f32 = 45.0;
/// Lowest constrained pitch.
pub const MIN_PITCH: f32 = -89.0;
/// Highest constrained pitch.
pub const MAX_PITCH: f32 = 89.0;
/// Whether cameras are ground-locked by default.
pub const FPS: bool = false;
/// Default viewport width in pixels.
pub const SCREEN_WIDTH: u32 = 1280;
/// Default viewport height in pixels.
pub const SCREEN_HEIGHT: u32 = 720;

/// Directions for [`Camera::process_keyboard`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraMovement {
    /// Along the view direction.
    Forward,
    /// Against the view direction.
    Backward,
    /// Against the right vector.
    Left,
    /// Along the right vector.
    Right,
}

/// Construction parameters for a [`Camera`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraSettings {
    /// Initial eye position.
    pub position: Point3<f32>,
    /// World up direction.
    pub world_up: Vector3<f32>,
    /// Movement speed.
    pub speed: f32,
    /// Mouse sensitivity.
    pub sensitivity: f32,
    /// Vertical field of view in degrees.
    pub zoom: f32,
    /// Yaw in degrees.
    pub yaw: f32,
    /// Pitch in degrees.
    pub pitch: f32,
    /// Keep the camera on the `y = 0` plane.
    pub fps: bool,
    /// Near clip plane.
    pub near: f32,
    /// Far clip plane.
    pub far: f32,
    /// Viewport width in pixels.
    pub width: u32,
    /// Viewport height in pixels.
    pub height: u32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            position: Point3::origin(),
            world_up: Vector3::y(),
            speed: SPEED,
            sensitivity: SENSITIVITY,
            zoom: ZOOM,
            yaw: YAW,
            pitch: PITCH,
            fps: FPS,
            near: 0.1,
            far: 100.0,
            width: SCREEN_WIDTH,
            height: SCREEN_HEIGHT,
        }
    }
}

/// A camera oriented by Euler angles.
///
/// `front`, `right` and `up` are derived from `yaw` and `pitch` and are kept
/// orthonormal.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    /// Eye position.
    pub position: Point3<f32>,
    /// View direction.
    pub front: Vector3<f32>,
    /// Camera up.
    pub up: Vector3<f32>,
    /// Camera right.
    pub right: Vector3<f32>,
    /// World up used to derive `right`.
    pub world_up: Vector3<f32>,
    /// Movement speed.
    pub speed: f32,
    /// Mouse sensitivity.
    pub sensitivity: f32,
    /// Vertical field of view in degrees.
    pub zoom: f32,
    /// Yaw in degrees.
    pub yaw: f32,
    /// Pitch in degrees.
    pub pitch: f32,
    /// Keep the camera on the `y = 0` plane.
    pub fps: bool,
    /// Near clip plane.
    pub near: f32,
    /// Far clip plane.
    pub far: f32,
    /// Viewport width in pixels.
    pub width: u32,
    /// Viewport height in pixels.
    pub height: u32,
}

impl Default for Camera {
    fn default() -> Self {
        Self::from_settings(CameraSettings::default())
    }
}

impl Camera {
    /// Create a camera at `position` with default settings.
    pub fn new(position: Point3<f32>) -> Self {
        Self::from_settings(CameraSettings {
            position,
            ..Default::default()
        })
    }

    /// Create a camera from explicit settings.
    pub fn from_settings(settings: CameraSettings) -> Self {
        let mut camera = Self {
            position: settings.position,
            front: -Vector3::z(),
            up: settings.world_up,
            right: Vector3::x(),
            world_up: settings.world_up,
            speed: settings.speed,
            sensitivity: settings.sensitivity,
            zoom: settings.zoom,
            yaw: settings.yaw,
            pitch: settings.pitch,
            fps: settings.fps,
            near: settings.near,
            far: settings.far,
            width: settings.width,
            height: settings.height,
        };
        camera.update_vectors();
        camera
    }

    /// World-to-view transform.
    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(&self.position, &(self.position + self.front), &self.up)
    }

    /// View-to-clip transform.
    ///
    /// The perspective projection uses `zoom` as its vertical field of view.
    /// The orthographic one maps the pixel rectangle of the viewport. A
    /// minimized window gives a zero-sized viewport, which is treated as one
    /// pixel wide and high.
    pub fn projection_matrix(&self, ortho: bool) -> Matrix4<f32> {
        if ortho {
            let (width, height) = self.extent();
            Matrix4::new_orthographic(0.0, width, 0.0, height, self.near, self.far)
        } else {
            Matrix4::new_perspective(self.aspect(), self.zoom.to_radians(), self.near, self.far)
        }
    }

    /// Viewport aspect ratio. Zero extents count as one pixel.
    pub fn aspect(&self) -> f32 {
        let (width, height) = self.extent();
        width / height
    }

    fn extent(&self) -> (f32, f32) {
        (self.width.max(1) as f32, self.height.max(1) as f32)
    }

    /// Move the camera for `dt` seconds in `direction`.
    pub fn process_keyboard(&mut self, direction: CameraMovement, dt: f32) {
        let velocity = self.speed * dt;
        match direction {
            CameraMovement::Forward => self.position += self.front * velocity,
            CameraMovement::Backward => self.position -= self.front * velocity,
            CameraMovement::Left => self.position -= self.right * velocity,
            CameraMovement::Right => self.position += self.right * velocity,
        }
        if self.fps {
            self.position.y = 0.0;
        }
    }

    /// Turn the camera by a mouse offset in pixels.
    pub fn process_mouse_movement(&mut self, dx: f32, dy: f32, constrain_pitch: bool) {
        self.yaw += dx * self.sensitivity;
        self.pitch += dy * self.sensitivity;

        // Past ±90 the view flips
        if constrain_pitch {
            self.pitch = self.pitch.clamp(MIN_PITCH, MAX_PITCH);
        }

        self.update_vectors();
    }

    /// Zoom in for positive scroll offsets.
    pub fn process_mouse_scroll(&mut self, dy: f32) {
        self.zoom = (self.zoom - dy).clamp(MIN_ZOOM, MAX_ZOOM);
    }

    /// Resize the viewport.
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    /// Place the camera in front of an axis-aligned box so that all of it is
    /// in view, looking down -Z at its center.
    pub fn look_at_bounds(&mut self, min: &Point3<f32>, max: &Point3<f32>) {
        let center = nalgebra::center(min, max);
        let radius = ((max - min).norm() * 0.5).max(f32::EPSILON);
        let half_fov = (self.zoom.to_radians() * 0.5).min(self.horizontal_half_fov());
        let distance = radius / half_fov.sin();

        self.yaw = YAW;
        self.pitch = PITCH;
        self.update_vectors();
        self.position = center - self.front * distance;
        self.near = (distance - radius).max(distance * 1e-3);
        self.far = self.far.max(distance + radius);
    }

    fn horizontal_half_fov(&self) -> f32 {
        ((self.zoom.to_radians() * 0.5).tan() * self.aspect()).atan()
    }

    fn update_vectors(&mut self) {
        let (yaw, pitch) = (self.yaw.to_radians(), self.pitch.to_radians());
        self.front = Vector3::new(yaw.cos() * pitch.cos(), pitch.sin(), yaw.sin() * pitch.cos())
            .normalize();
        self.right = self.front.cross(&self.world_up).normalize();
        self.up = self.right.cross(&self.front).normalize();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: &Vector3<f32>, b: &Vector3<f32>) -> bool {
        (a - b).norm() < 1e-5
    }

    #[test]
    fn test_default_basis() {
        let camera = Camera::default();
        assert!(close(&camera.front, &-Vector3::z()));
        assert!(close(&camera.right, &Vector3::x()));
        assert!(close(&camera.up, &Vector3::y()));
        assert_eq!((camera.width, camera.height), (SCREEN_WIDTH, SCREEN_HEIGHT));
    }

    #[test]
    fn test_view_matrix_moves_eye_to_origin() {
        let camera = Camera::new(Point3::new(0.0, 0.0, 1.0));
        let p = camera.view_matrix().transform_point(&Point3::origin());
        assert!((p - Point3::new(0.0, 0.0, -1.0)).norm() < 1e-5);
    }

    #[test]
    fn test_projections() {
        let camera = Camera::default();

        let persp = camera.projection_matrix(false);
        let f = 1.0 / (ZOOM.to_radians() * 0.5).tan();
        assert!((persp[(1, 1)] - f).abs() < 1e-5);
        assert!((persp[(0, 0)] - f / camera.aspect()).abs() < 1e-5);

        let ortho = camera.projection_matrix(true);
        let corner = ortho.transform_point(&Point3::new(1280.0, 720.0, -0.1));
        assert!((corner.x - 1.0).abs() < 1e-5);
        assert!((corner.y - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_keyboard_movement() {
        let mut camera = Camera::default();
        camera.process_keyboard(CameraMovement::Forward, 0.5);
        assert!((camera.position - Point3::new(0.0, 0.0, -5.0)).norm() < 1e-5);
        camera.process_keyboard(CameraMovement::Right, 0.1);
        assert!((camera.position - Point3::new(1.0, 0.0, -5.0)).norm() < 1e-5);
    }

    #[test]
    fn test_fps_camera_stays_on_ground() {
        let mut camera = Camera::from_settings(CameraSettings {
            fps: true,
            pitch: 30.0,
            ..Default::default()
        });
        camera.process_keyboard(CameraMovement::Forward, 1.0);
        assert_eq!(camera.position.y, 0.0);
        assert!(camera.position.z < 0.0);
    }

    #[test]
    fn test_pitch_is_constrained() {
        let mut camera = Camera::default();
        camera.process_mouse_movement(0.0, 10_000.0, true);
        assert_eq!(camera.pitch, MAX_PITCH);
        assert!((camera.front.norm() - 1.0).abs() < 1e-5);

        camera.process_mouse_movement(0.0, 10_000.0, false);
        assert!(camera.pitch > MAX_PITCH);
    }

    #[test]
    fn test_scroll_clamps_zoom() {
        let mut camera = Camera::default();
        camera.process_mouse_scroll(10.0);
        assert_eq!(camera.zoom, 35.0);
        camera.process_mouse_scroll(100.0);
        assert_eq!(camera.zoom, MIN_ZOOM);
        camera.process_mouse_scroll(-100.0);
        assert_eq!(camera.zoom, MAX_ZOOM);
    }

    #[test]
    fn test_empty_viewport_projects() {
        let mut camera = Camera::default();
        for (width, height) in [(0, 0), (0, 720), (1280, 0)] {
            camera.set_viewport(width, height);
            assert!(camera.aspect() > 0.0);
            for ortho in [false, true] {
                let projection = camera.projection_matrix(ortho);
                assert!(projection.iter().all(|x| x.is_finite()));
            }
        }
        assert_eq!((camera.width, camera.height), (1280, 0));
        assert_eq!(camera.aspect(), 1280.0);
    }

    #[test]
    fn test_look_at_bounds_centers_box() {
        let mut camera = Camera::default();
        camera.process_mouse_movement(200.0, 100.0, true);

        let (min, max) = (Point3::new(1.0, 2.0, 3.0), Point3::new(3.0, 4.0, 5.0));
        camera.look_at_bounds(&min, &max);

        let clip = (camera.projection_matrix(false) * camera.view_matrix())
            .transform_point(&Point3::new(2.0, 3.0, 4.0));
        assert!(clip.x.abs() < 1e-4);
        assert!(clip.y.abs() < 1e-4);

        for corner in [min, max] {
            let view = camera.view_matrix().transform_point(&corner);
            assert!(-view.z > camera.near && -view.z < camera.far);
        }
    }
}
