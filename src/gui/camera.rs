use std::f32::consts::{FRAC_PI_2, PI};

use kiss3d::camera::Camera;
use kiss3d::event::{Action, Key, MouseButton, WindowEvent};
use kiss3d::resource::ShaderUniform;
use kiss3d::window::Canvas;
use nalgebra::{Isometry3, Matrix4, Perspective3, Point3, Vector2, Vector3};

const KEY_TILT_UP: Key = Key::W;
const KEY_TILT_DOWN: Key = Key::S;
const KEY_SPIN_LEFT: Key = Key::A;
const KEY_SPIN_RIGHT: Key = Key::D;
const KEY_ZOOM_IN: Key = Key::Equals;
const KEY_ZOOM_OUT: Key = Key::Minus;
const KEY_RESET: Key = Key::Home;

const FOVY: f32 = PI / 4.0;
const KEY_ANGLE_STEP: f32 = 0.1;
const DRAG_ANGLE_STEP: f32 = 0.005;
const ZOOM_RATIO: f32 = 1.25;
// Keeps the camera off the poles, where "up" stops making sense
const MIN_TILT: f32 = 0.01;
const MAX_DISTANCE: f32 = 1.0e4;

// Default view: tilted 45 degrees from above, looking along +y
const HOME_YAW: f32 = -FRAC_PI_2;
const HOME_TILT: f32 = PI / 4.0;

/// A turntable camera orbiting the origin, with z up.
///
/// The view translates the scene so the focused body sits at the origin, so
/// the camera never has to move its target. It only needs to know how big the
/// scene is (`scene_radius`) to keep the far plane behind the outermost orbit.
pub struct ZoomableCamera {
    yaw: f32,
    tilt: f32, // from +z, in [MIN_TILT, PI - MIN_TILT]
    distance: f32,
    min_distance: f32,
    scene_radius: f32,
    aspect: f32,
    last_cursor: Vector2<f32>,
}

impl ZoomableCamera {
    pub fn new(distance: f32) -> Self {
        ZoomableCamera {
            yaw: HOME_YAW,
            tilt: HOME_TILT,
            distance,
            min_distance: 1.0,
            scene_radius: distance,
            aspect: 4.0 / 3.0,
            last_cursor: Vector2::zeros(),
        }
    }

    /// Zooms so that something `extent` units across fits on screen, and
    /// remembers it as the size of the scene.
    pub fn frame_extent(&mut self, extent: f32) {
        self.scene_radius = extent;
        self.distance = self.clamp_distance(extent / (FOVY / 2.0).tan());
    }

    /// Stops the camera from zooming inside the focused body.
    pub fn set_min_distance(&mut self, min_distance: f32) {
        self.min_distance = min_distance;
        self.distance = self.clamp_distance(self.distance);
    }

    pub fn distance(&self) -> f32 {
        self.distance
    }

    fn clamp_distance(&self, distance: f32) -> f32 {
        nalgebra::clamp(distance, self.min_distance, MAX_DISTANCE)
    }

    fn turn(&mut self, dyaw: f32, dtilt: f32) {
        self.yaw = (self.yaw + dyaw).rem_euclid(2.0 * PI);
        self.tilt = nalgebra::clamp(self.tilt + dtilt, MIN_TILT, PI - MIN_TILT);
    }

    fn zoom(&mut self, factor: f32) {
        self.distance = self.clamp_distance(self.distance * factor);
    }

    fn reset(&mut self) {
        self.yaw = HOME_YAW;
        self.tilt = HOME_TILT;
        self.frame_extent(self.scene_radius);
    }

    // Near plane scales with zoom so close-ups of moons don't clip. The far
    // plane reaches past the far side of the outermost orbit, wherever the
    // focus is.
    fn clip_distances(&self) -> (f32, f32) {
        let znear = self.distance * 0.01;
        let zfar = self.distance + 2.0 * self.scene_radius.max(self.distance);
        (znear, zfar)
    }

    fn projection(&self) -> Perspective3<f32> {
        let (znear, zfar) = self.clip_distances();
        Perspective3::new(self.aspect, FOVY, znear, zfar)
    }
}

impl Camera for ZoomableCamera {
    fn handle_event(&mut self, canvas: &Canvas, event: &WindowEvent) {
        match *event {
            WindowEvent::CursorPos(x, y, _) => {
                let cursor = Vector2::new(x as f32, y as f32);
                if canvas.get_mouse_button(MouseButton::Button1) == Action::Press {
                    // Dragging right swings the camera left, like grabbing the scene
                    let drag = cursor - self.last_cursor;
                    self.turn(-drag.x * DRAG_ANGLE_STEP, -drag.y * DRAG_ANGLE_STEP);
                }
                self.last_cursor = cursor;
            }
            WindowEvent::Scroll(_, off, _) if off != 0.0 => {
                let factor = if off > 0.0 { ZOOM_RATIO.recip() } else { ZOOM_RATIO };
                self.zoom(factor);
            }
            WindowEvent::FramebufferSize(w, h) if h > 0 => {
                self.aspect = w as f32 / h as f32;
            }
            WindowEvent::Key(key, Action::Press, _) => match key {
                KEY_TILT_UP => self.turn(0.0, -KEY_ANGLE_STEP),
                KEY_TILT_DOWN => self.turn(0.0, KEY_ANGLE_STEP),
                KEY_SPIN_LEFT => self.turn(-KEY_ANGLE_STEP, 0.0),
                KEY_SPIN_RIGHT => self.turn(KEY_ANGLE_STEP, 0.0),
                KEY_ZOOM_IN => self.zoom(ZOOM_RATIO.recip()),
                KEY_ZOOM_OUT => self.zoom(ZOOM_RATIO),
                KEY_RESET => self.reset(),
                _ => {}
            },
            _ => {}
        }
    }

    fn eye(&self) -> Point3<f32> {
        let (sin_tilt, cos_tilt) = self.tilt.sin_cos();
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        Point3::from(self.distance * Vector3::new(sin_tilt * cos_yaw, sin_tilt * sin_yaw, cos_tilt))
    }

    fn view_transform(&self) -> Isometry3<f32> {
        Isometry3::look_at_rh(&self.eye(), &Point3::origin(), &Vector3::z())
    }

    fn transformation(&self) -> Matrix4<f32> {
        self.projection().into_inner() * self.view_transform().to_homogeneous()
    }

    fn inverse_transformation(&self) -> Matrix4<f32> {
        self.transformation()
            .try_inverse()
            .unwrap_or_else(Matrix4::identity)
    }

    fn clip_planes(&self) -> (f32, f32) {
        self.clip_distances()
    }

    fn update(&mut self, _canvas: &Canvas) {}

    fn upload(
        &self,
        _: usize,
        proj: &mut ShaderUniform<Matrix4<f32>>,
        view: &mut ShaderUniform<Matrix4<f32>>,
    ) {
        proj.upload(&self.projection().into_inner());
        view.upload(&self.view_transform().to_homogeneous());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    #[test]
    fn test_frame_extent() {
        let mut camera = ZoomableCamera::new(1.0);
        camera.frame_extent(800.0);
        assert_relative_eq!(camera.distance(), 800.0 / (FOVY / 2.0).tan());

        // The outermost orbit stays in front of the far plane
        let (znear, zfar) = camera.clip_planes();
        assert!(znear > 0.0);
        assert!(zfar > camera.distance() + 800.0);
    }

    #[test]
    fn test_zoom_limits() {
        let mut camera = ZoomableCamera::new(50.0);
        camera.set_min_distance(10.0);
        for _ in 0..100 {
            camera.zoom(ZOOM_RATIO.recip());
        }
        assert_eq!(camera.distance(), 10.0);

        for _ in 0..100 {
            camera.zoom(ZOOM_RATIO);
        }
        assert_eq!(camera.distance(), MAX_DISTANCE);

        // Growing the focused body pushes the camera back out
        camera.distance = 12.0;
        camera.set_min_distance(20.0);
        assert_eq!(camera.distance(), 20.0);
    }

    #[test]
    fn test_eye_position() {
        let mut camera = ZoomableCamera::new(10.0);
        camera.yaw = 0.0;
        camera.tilt = FRAC_PI_2;
        assert_relative_eq!(camera.eye(), Point3::new(10.0, 0.0, 0.0), epsilon = 1e-5);

        // Can't tip over the pole
        camera.turn(0.0, -10.0);
        assert_relative_eq!(camera.tilt, MIN_TILT);
        assert!(camera.eye().z < 10.0);
    }
}
