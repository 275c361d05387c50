use kiss3d::camera::Camera;
use kiss3d::renderer::{LineRenderer, Renderer};
use nalgebra::{Isometry3, Point3};

use self::trail_renderer::TrailRenderer;
use crate::model::trail::TrailRender;

mod trail_renderer;

pub struct CompoundRenderer {
    trail_renderer: TrailRenderer,
    line_renderer: LineRenderer,
}

impl CompoundRenderer {
    pub fn new() -> Self {
        CompoundRenderer {
            trail_renderer: TrailRenderer::new(),
            line_renderer: LineRenderer::new(),
        }
    }

    pub fn draw_grid(&mut self, camera_distance: f32) {
        const NUM_SQUARES: i32 = 40;

        // We use the camera distance to determine the grid spacing.
        // If G is the grid subdivision, and R is a corrective factor, if the camera is
        // between G^k and G^(k+1) away, we draw a bright grid with spacing
        // R*G^(k+1) and a dimmer one with spacing G^k, getting dimmer as we get
        // closer to R*G^(k+1).
        const GRID_SUBDIV: i32 = 10;
        const GRID_SUBDIV_FLOAT: f32 = GRID_SUBDIV as f32;
        const CORRECTIVE: f32 = 0.4;

        let log_distance = camera_distance.log(GRID_SUBDIV_FLOAT);
        let k = log_distance.floor();
        let interp = log_distance - k;

        // The grid sits behind the trails, so keep it dim
        let square_size = CORRECTIVE * GRID_SUBDIV_FLOAT.powf(k);
        let color = Point3::new(0.25, 0.25, 0.25);
        let dim_color = color * (1.0 - interp);

        let max_coord = square_size * (NUM_SQUARES as f32);
        for i in (-NUM_SQUARES)..(NUM_SQUARES + 1) {
            let coord = square_size * (i as f32);
            let color = if i % GRID_SUBDIV == 0 {
                color
            } else {
                dim_color
            };

            // horizontal
            self.line_renderer.draw_line(
                Point3::new(-max_coord, coord, 0.0),
                Point3::new(max_coord, coord, 0.0),
                color,
            );
            // vertical
            self.line_renderer.draw_line(
                Point3::new(coord, -max_coord, 0.0),
                Point3::new(coord, max_coord, 0.0),
                color,
            );
        }
    }

    /// Draws a straight line from a body to whatever it's orbiting.
    pub fn draw_tether(&mut self, body: Point3<f32>, attractor: Point3<f32>, color: Point3<f32>) {
        self.line_renderer.draw_line(body, attractor, color);
    }

    pub fn draw_trail(&mut self, trail: &TrailRender, color: Point3<f32>, transform: Isometry3<f32>) {
        self.trail_renderer.add_trail(trail, color, transform);
    }
}

impl Renderer for CompoundRenderer {
    fn render(&mut self, pass: usize, camera: &mut dyn Camera) {
        self.trail_renderer.render(pass, camera);
        self.line_renderer.render(pass, camera);
    }
}
