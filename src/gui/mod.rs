use std::time::Instant;

use kiss3d::camera::Camera;
use kiss3d::event::EventManager;
use kiss3d::planar_camera::PlanarCamera;
use kiss3d::post_processing::PostProcessingEffect;
use kiss3d::renderer::Renderer;
use kiss3d::window::{State, Window};

use self::controller::Controller;
use self::view::View;
use crate::model::Orrery;

mod camera;
mod controller;
mod renderers;
mod view;

// Frames longer than this are treated as a hiccup (window drag, breakpoint),
// not as time that passed in the simulation.
const MAX_FRAME_SECONDS: f64 = 0.25;

pub struct Simulation {
    view: View,
    controller: Controller,
    last_frame: Instant,
}

impl Simulation {
    pub fn new(orrery: Orrery, speed: f64, window: &mut Window) -> Self {
        Self {
            view: View::new(orrery, window),
            controller: Controller::new(speed),
            last_frame: Instant::now(),
        }
    }

    fn process_user_input(&mut self, mut events: EventManager) {
        for event in events.iter() {
            self.controller.process_event(event, &mut self.view);
        }
    }

    fn frame_delta(&mut self) -> f64 {
        let now = Instant::now();
        let delta = now.duration_since(self.last_frame).as_secs_f64();
        self.last_frame = now;
        delta.min(MAX_FRAME_SECONDS)
    }
}

impl State for Simulation {
    fn cameras_and_effect_and_renderer(
        &mut self,
    ) -> (
        Option<&mut dyn Camera>,
        Option<&mut dyn PlanarCamera>,
        Option<&mut dyn Renderer>,
        Option<&mut dyn PostProcessingEffect>,
    ) {
        self.view.cameras_and_effect_and_renderer()
    }

    fn step(&mut self, window: &mut Window) {
        self.process_user_input(window.events());
        let delta = self.frame_delta();
        self.view.update_state_by(delta, self.controller.speed());
        self.view.prerender_scene(window, &self.controller);
        self.controller.increment_frame_counter();
    }
}
