use std::time::Instant;

use kiss3d::event::{Action, Event, Key, WindowEvent};
use log::info;

use super::view::View;
use crate::consts::{CENTRAL_MASS_RANGE, SIZE_MULTIPLIER_RANGE, SPEED_RANGE};

// Key config, all in one place
const KEY_PREV_FOCUS: Key = Key::Q;
const KEY_NEXT_FOCUS: Key = Key::E;
const KEY_SPEED_UP: Key = Key::Period;
const KEY_SLOW_DOWN: Key = Key::Comma;
const KEY_TOGGLE_PAUSE: Key = Key::Space;
const KEY_MASS_UP: Key = Key::M;
const KEY_MASS_DOWN: Key = Key::N;
const KEY_GROW: Key = Key::RBracket;
const KEY_SHRINK: Key = Key::LBracket;
const KEY_RECOLOR: Key = Key::K;
const KEY_CLEAR_TRAILS: Key = Key::T;

const SPEED_STEP: f64 = 0.25;
const MASS_STEP: f64 = 100.0;
const SIZE_STEP: f64 = 0.5;

/// Colors the recolor key cycles through.
const PALETTE: [(f32, f32, f32); 8] = [
    (1.0, 1.0, 1.0),
    (1.0, 0.3, 0.3),
    (1.0, 0.65, 0.0),
    (1.0, 1.0, 0.3),
    (0.3, 1.0, 0.3),
    (0.3, 1.0, 1.0),
    (0.4, 0.5, 1.0),
    (1.0, 0.4, 1.0),
];

pub struct Controller {
    speed: f64,
    paused: bool,
    palette_idx: usize,
    fps_counter: FpsCounter,
}

pub struct FpsCounter {
    instant: Instant,
    counter: usize,
    window_size_millis: usize,
    previous_fps: f64,
}

impl FpsCounter {
    pub fn new(window_size_millis: usize) -> Self {
        FpsCounter {
            instant: Instant::now(),
            counter: 0,
            previous_fps: 0.0,
            window_size_millis,
        }
    }

    pub fn reset(&mut self) {
        self.instant = Instant::now();
        self.counter = 0;
    }

    pub fn value(&self) -> f64 {
        self.previous_fps
    }

    pub fn increment(&mut self) {
        self.counter += 1;

        let elapsed = self.instant.elapsed();
        if elapsed.as_millis() > self.window_size_millis as u128 {
            self.previous_fps = (1000 * self.counter) as f64 / elapsed.as_millis() as f64;
            self.reset();
        }
    }
}

impl Controller {
    pub fn new(speed: f64) -> Self {
        Controller {
            speed: clamp_speed(speed),
            paused: false,
            palette_idx: 0,
            fps_counter: FpsCounter::new(1000),
        }
    }

    pub fn process_event(&mut self, event: Event, view: &mut View) {
        match event.value {
            WindowEvent::Key(KEY_NEXT_FOCUS, Action::Press, _) => {
                view.camera_focus_next();
            }
            WindowEvent::Key(KEY_PREV_FOCUS, Action::Press, _) => {
                view.camera_focus_prev();
            }
            WindowEvent::Key(KEY_SPEED_UP, Action::Press, _) => {
                self.speed = clamp_speed(self.speed + SPEED_STEP);
                info!("Speed is {:.2}x", self.speed);
            }
            WindowEvent::Key(KEY_SLOW_DOWN, Action::Press, _) => {
                self.speed = clamp_speed(self.speed - SPEED_STEP);
                info!("Speed is {:.2}x", self.speed);
            }
            WindowEvent::Key(KEY_TOGGLE_PAUSE, Action::Press, _) => {
                self.paused = !self.paused;
            }
            WindowEvent::Key(KEY_MASS_UP, Action::Press, _) => {
                view.adjust_central_mass(MASS_STEP);
            }
            WindowEvent::Key(KEY_MASS_DOWN, Action::Press, _) => {
                view.adjust_central_mass(-MASS_STEP);
            }
            WindowEvent::Key(KEY_GROW, Action::Press, _) => {
                view.adjust_size_multiplier(SIZE_STEP);
            }
            WindowEvent::Key(KEY_SHRINK, Action::Press, _) => {
                view.adjust_size_multiplier(-SIZE_STEP);
            }
            WindowEvent::Key(KEY_RECOLOR, Action::Press, _) => {
                self.palette_idx = (self.palette_idx + 1) % PALETTE.len();
                let (r, g, b) = PALETTE[self.palette_idx];
                view.recolor_focused(nalgebra::Point3::new(r, g, b));
            }
            WindowEvent::Key(KEY_CLEAR_TRAILS, Action::Press, _) => {
                view.clear_trails();
            }
            _ => {}
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// The speed handed to the simulation. Pausing is just running at zero
    /// speed, so trails keep fading out.
    pub fn speed(&self) -> f64 {
        if self.paused {
            0.0
        } else {
            self.speed
        }
    }

    pub fn fps(&self) -> f64 {
        self.fps_counter.value()
    }

    pub fn increment_frame_counter(&mut self) {
        self.fps_counter.increment()
    }
}

fn clamp_speed(speed: f64) -> f64 {
    nalgebra::clamp(speed, SPEED_RANGE.0, SPEED_RANGE.1)
}

pub fn clamp_central_mass(mass: f64) -> f64 {
    nalgebra::clamp(mass, CENTRAL_MASS_RANGE.0, CENTRAL_MASS_RANGE.1)
}

pub fn clamp_size_multiplier(multiplier: f64) -> f64 {
    nalgebra::clamp(multiplier, SIZE_MULTIPLIER_RANGE.0, SIZE_MULTIPLIER_RANGE.1)
}
