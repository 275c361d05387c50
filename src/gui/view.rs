use std::collections::HashMap;

use kiss3d::camera::Camera;
use kiss3d::planar_camera::PlanarCamera;
use kiss3d::post_processing::PostProcessingEffect;
use kiss3d::renderer::Renderer;
use kiss3d::scene::SceneNode;
use kiss3d::window::Window;
use log::info;
use nalgebra::{Isometry3, Point3, Translation3, UnitQuaternion, Vector3};

use super::camera::ZoomableCamera;
use super::controller::{clamp_central_mass, clamp_size_multiplier, Controller};
use super::renderers::CompoundRenderer;
use crate::consts::get_period;
use crate::model::orrery::{AttractorRef, Body, BodyID, Orrery};

pub struct View {
    // Object state
    orrery: Orrery,
    central_sphere: SceneNode,
    body_spheres: HashMap<BodyID, SceneNode>,
    // Camera
    camera: ZoomableCamera,
    camera_focus: CameraFocus,
    // Misc
    renderer: CompoundRenderer,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FocusPoint {
    Central,
    Body(BodyID),
}

pub struct CameraFocus {
    focus_points: Vec<FocusPoint>,
    focus_idx: usize,
}

impl CameraFocus {
    pub fn new(orrery: &Orrery) -> Self {
        // Every body comes right after the body it orbits
        let mut focus_points = vec![FocusPoint::Central];
        for id in orrery.update_order() {
            focus_points.push(FocusPoint::Body(*id));
        }

        CameraFocus {
            focus_points,
            focus_idx: 0,
        }
    }

    pub fn next(&mut self) {
        let num_points = self.focus_points.len();
        self.focus_idx = (self.focus_idx + 1) % num_points;
    }

    pub fn prev(&mut self) {
        let num_points = self.focus_points.len();
        self.focus_idx = (self.focus_idx + num_points - 1) % num_points;
    }

    pub fn point(&self) -> FocusPoint {
        self.focus_points[self.focus_idx]
    }
}

impl View {
    pub fn new(orrery: Orrery, window: &mut Window) -> Self {
        // Start zoomed out far enough to see the outermost body
        let mut camera = ZoomableCamera::new(1.0);
        let extent = orrery
            .bodies()
            .map(|b| b.position().coords.norm())
            .fold(1.0, f64::max);
        camera.frame_extent(extent as f32);
        let camera_focus = CameraFocus::new(&orrery);

        let central = &orrery.central().info;
        let mut central_sphere = window.add_sphere(central.size);
        central_sphere.set_color(central.color.x, central.color.y, central.color.z);

        let mut body_spheres = HashMap::new();
        for body in orrery.bodies() {
            let sphere = Self::create_body_object(window, body);
            body_spheres.insert(body.id, sphere);
        }

        let mut view = Self {
            orrery,
            central_sphere,
            body_spheres,
            camera,
            camera_focus,
            renderer: CompoundRenderer::new(),
        };
        view.fix_camera_zoom();
        view.update_scene_objects();

        view
    }

    fn create_body_object(window: &mut Window, body: &Body) -> SceneNode {
        let mut sphere = window.add_sphere(body.size());
        let color = body.color();
        sphere.set_color(color.x, color.y, color.z);
        sphere
    }

    /// Advances the simulation by `delta` seconds of wall-clock time, then
    /// moves scene objects to the right places.
    pub fn update_state_by(&mut self, delta: f64, speed: f64) {
        self.orrery.step(delta, speed);
        self.update_scene_objects();
    }

    pub fn camera_focus_next(&mut self) {
        self.camera_focus.next();
        self.fix_camera_zoom();
        self.update_scene_objects();
    }

    pub fn camera_focus_prev(&mut self) {
        self.camera_focus.prev();
        self.fix_camera_zoom();
        self.update_scene_objects();
    }

    pub fn adjust_central_mass(&mut self, delta: f64) {
        let mass = clamp_central_mass(self.orrery.central().mass() + delta);
        self.orrery.set_central_mass(mass);
        info!("Central mass is {:.0}", mass);
    }

    pub fn adjust_size_multiplier(&mut self, delta: f64) {
        let id = match self.camera_focus.point() {
            FocusPoint::Body(id) => id,
            FocusPoint::Central => {
                info!("The central body can't be resized");
                return;
            }
        };

        let body = self.orrery.get_body_mut(id);
        let multiplier = clamp_size_multiplier(body.size_multiplier() + delta);
        body.set_size_multiplier(multiplier);
        info!("{} is drawn at {:.1}x", body.name(), multiplier);

        self.fix_camera_zoom();
        self.update_scene_objects();
    }

    pub fn recolor_focused(&mut self, color: Point3<f32>) {
        match self.camera_focus.point() {
            FocusPoint::Body(id) => {
                self.orrery.recolor(id, color);
                if let Some(sphere) = self.body_spheres.get_mut(&id) {
                    sphere.set_color(color.x, color.y, color.z);
                }
            }
            FocusPoint::Central => {
                self.central_sphere.set_color(color.x, color.y, color.z);
            }
        }
    }

    pub fn clear_trails(&mut self) {
        self.orrery.clear_trails();
    }

    fn fix_camera_zoom(&mut self) {
        let dist = match self.camera_focus.point() {
            FocusPoint::Central => self.orrery.central().info.size * 2.0,
            FocusPoint::Body(id) => {
                let body = self.orrery.get_body(id);
                body.info.size * body.size_multiplier() as f32 * 2.0
            }
        };
        self.camera.set_min_distance(dist);
    }

    fn focus_position(&self) -> Point3<f64> {
        match self.camera_focus.point() {
            FocusPoint::Central => self.orrery.central().position(),
            FocusPoint::Body(id) => self.orrery.get_body(id).position(),
        }
    }

    fn transform_to_focus_space(&self) -> Isometry3<f32> {
        let offset: Vector3<f32> = nalgebra::convert(-self.focus_position().coords);
        Isometry3::from_parts(Translation3::from(offset), UnitQuaternion::identity())
    }

    fn update_scene_objects(&mut self) {
        let transform = self.transform_to_focus_space();

        let center: Point3<f32> = nalgebra::convert(self.orrery.central().position());
        self.central_sphere
            .set_local_translation(Translation3::from(transform * center));

        for (id, sphere) in self.body_spheres.iter_mut() {
            let body = self.orrery.get_body(*id);
            let position: Point3<f32> = nalgebra::convert(body.position());
            sphere.set_local_translation(Translation3::from(transform * position));

            // Spin about the z-axis, which is "up" for the camera too
            let spin =
                UnitQuaternion::from_axis_angle(&Vector3::z_axis(), body.rotation_phase() as f32);
            sphere.set_local_rotation(spin);

            let scale = body.size_multiplier() as f32;
            sphere.set_local_scale(scale, scale, scale);
        }
    }

    pub fn prerender_scene(&mut self, window: &mut Window, controller: &Controller) {
        self.renderer.draw_grid(self.camera.distance());
        self.draw_trails();
        self.draw_tether();

        use nalgebra::Point2;
        let default_font = kiss3d::text::Font::default();
        let text_color = Point3::new(1.0, 1.0, 1.0);
        window.draw_text(
            &self.left_hand_text(),
            &Point2::origin(),
            60.0,
            &default_font,
            &text_color,
        );
        window.draw_text(
            &self.time_summary_text(controller),
            // no idea why i have to multiply by 2.0, but there it is
            &Point2::new(window.width() as f32 * 2.0 - 600.0, 0.0),
            60.0,
            &default_font,
            &text_color,
        );
    }

    fn draw_trails(&mut self) {
        let transform = self.transform_to_focus_space();
        for body in self.orrery.bodies() {
            let trail = body.trail();
            self.renderer
                .draw_trail(&trail.render(), trail.color(), transform);
        }
    }

    // Only for the focused body, otherwise the screen turns into a web
    fn draw_tether(&mut self) {
        let id = match self.camera_focus.point() {
            FocusPoint::Body(id) => id,
            FocusPoint::Central => return,
        };
        let attractor = match self.orrery.attractor_of(id) {
            Some(a) => a.current_position(),
            None => return,
        };

        let transform = self.transform_to_focus_space();
        let body = self.orrery.get_body(id);
        let body_pt: Point3<f32> = nalgebra::convert(body.position());
        let attractor_pt: Point3<f32> = nalgebra::convert(attractor);
        let color = Point3::from(body.info.color.coords * 0.5);

        self.renderer
            .draw_tether(transform * body_pt, transform * attractor_pt, color);
    }

    fn left_hand_text(&self) -> String {
        let id = match self.camera_focus.point() {
            FocusPoint::Body(id) => id,
            FocusPoint::Central => {
                let central = self.orrery.central();
                return format!(
                    "Focused on: {}
    Mass: {:.1}",
                    central.info.name,
                    central.mass(),
                );
            }
        };

        let body = self.orrery.get_body(id);
        let g = self.orrery.gravitational_constant();
        let (distance, speed, period) = match self.orrery.attractor_of(id) {
            Some(a) => {
                let distance = (body.position() - a.current_position()).norm();
                let speed = match body.parent_id() {
                    Some(parent) => (body.velocity() - self.orrery.get_body(parent).velocity()).norm(),
                    None => body.velocity().norm(),
                };
                // Assumes the orbit is still roughly circular
                (distance, speed, get_period(distance, g * a.current_mass()))
            }
            None => (body.position().coords.norm(), body.velocity().norm(), f64::NAN),
        };

        // Indentation is intentional
        format!(
            "Focused on: {}
    Mass: {:.3}
    Size: {:.1}x
    Day: {:.2} s
Orbiting: {}
    Distance: {:.2}
    Speed: {:.3}
    Period: {:.1} s",
            body.name(),
            body.mass(),
            body.size_multiplier(),
            body.rotation_period(),
            self.attractor_name(body),
            distance,
            speed,
            period,
        )
    }

    fn attractor_name(&self, body: &Body) -> String {
        match body.attractor() {
            Some(AttractorRef::Central) => self.orrery.central().info.name.clone(),
            Some(AttractorRef::Body(id)) => self.orrery.get_body(id).name().to_owned(),
            Some(AttractorRef::Fixed(p)) => format!(
                "({:.1}, {:.1}, {:.1})",
                p.position.x, p.position.y, p.position.z
            ),
            None => String::from("N/A"),
        }
    }

    fn time_summary_text(&self, controller: &Controller) -> String {
        format!(
            "Time: {:.1} s
Simulated: {:.1} s
Speed: {:.2}x{}
Central mass: {:.0}
FPS: {:.0}",
            self.orrery.elapsed(),
            self.orrery.simulated_time(),
            controller.speed(),
            if controller.is_paused() { " (paused)" } else { "" },
            self.orrery.central().mass(),
            controller.fps(),
        )
    }

    pub fn cameras_and_effect_and_renderer(
        &mut self,
    ) -> (
        Option<&mut dyn Camera>,
        Option<&mut dyn PlanarCamera>,
        Option<&mut dyn Renderer>,
        Option<&mut dyn PostProcessingEffect>,
    ) {
        (Some(&mut self.camera), None, Some(&mut self.renderer), None)
    }
}
