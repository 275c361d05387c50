use itertools::Itertools;
use kiss3d::camera::Camera;
use kiss3d::context::Context;
use kiss3d::renderer::Renderer;
use kiss3d::resource::{
    AllocationType, BufferType, Effect, GPUVec, ShaderAttribute, ShaderUniform,
};

use nalgebra::{Isometry3, Matrix4, Point3};

use crate::model::trail::TrailRender;

struct TrailData {
    // Trail segments, stored as (pt, color, pt, color)
    // Color is pre-multiplied by the opacity, fading into the black background
    trail_lines: GPUVec<Point3<f32>>,
    // Transform from simulation space to focus space
    transform: Matrix4<f32>,
}

pub struct TrailRenderer {
    // OpenGL stuff
    shader: Effect,
    pos: ShaderAttribute<Point3<f32>>,
    color: ShaderAttribute<Point3<f32>>,
    model: ShaderUniform<Matrix4<f32>>,
    view: ShaderUniform<Matrix4<f32>>,
    proj: ShaderUniform<Matrix4<f32>>,
    line_width: f32,
    // Data storage
    trails: Vec<TrailData>,
}

impl TrailRenderer {
    pub fn new() -> Self {
        let mut shader = Effect::new_from_str(VERTEX_SRC, FRAGMENT_SRC);

        shader.use_program();

        TrailRenderer {
            pos: shader
                .get_attrib::<Point3<f32>>("position")
                .expect("Failed to get shader attribute."),
            color: shader
                .get_attrib::<Point3<f32>>("color")
                .expect("Failed to get shader attribute."),
            model: shader
                .get_uniform::<Matrix4<f32>>("model")
                .expect("Failed to get shader uniform."),
            view: shader
                .get_uniform::<Matrix4<f32>>("view")
                .expect("Failed to get shader uniform."),
            proj: shader
                .get_uniform::<Matrix4<f32>>("proj")
                .expect("Failed to get shader uniform."),
            shader,
            line_width: 1.5,
            trails: vec![],
        }
    }

    pub fn add_trail(&mut self, trail: &TrailRender, color: Point3<f32>, transform: Isometry3<f32>) {
        // A single sample is a point, not a line
        if trail.count < 2 {
            return;
        }

        let data = trail_vertices(trail, color);
        let trail_data = TrailData {
            trail_lines: GPUVec::new(data, BufferType::Array, AllocationType::StreamDraw),
            transform: transform.to_homogeneous(),
        };

        self.trails.push(trail_data);
    }
}

/// Flattens a trail into line segments, each endpoint followed by its color.
fn trail_vertices(trail: &TrailRender, color: Point3<f32>) -> Vec<Point3<f32>> {
    let mut data = Vec::with_capacity(4 * trail.count.saturating_sub(1));
    let vertices = trail
        .positions
        .iter()
        .zip(trail.opacities.iter())
        .map(|(pt, &alpha)| {
            let pt: Point3<f32> = nalgebra::convert(*pt);
            (pt, color * alpha as f32)
        });

    for ((p0, c0), (p1, c1)) in vertices.tuple_windows() {
        data.push(p0);
        data.push(c0);
        data.push(p1);
        data.push(c1);
    }
    data
}

impl Renderer for TrailRenderer {
    fn render(&mut self, pass: usize, camera: &mut dyn Camera) {
        if self.trails.is_empty() {
            return;
        }

        self.shader.use_program();
        self.pos.enable();
        self.color.enable();

        camera.upload(pass, &mut self.proj, &mut self.view);

        for trail in self.trails.iter_mut() {
            self.pos.bind_sub_buffer(&mut trail.trail_lines, 1, 0);
            self.color.bind_sub_buffer(&mut trail.trail_lines, 1, 1);

            self.model.upload(&trail.transform);

            let ctxt = Context::get();
            ctxt.draw_arrays(Context::LINES, 0, (trail.trail_lines.len() / 2) as i32);
            ctxt.line_width(self.line_width);
        }

        self.pos.disable();
        self.color.disable();

        // Trails change every frame, so they're rebuilt from scratch
        self.trails.clear();
    }
}

/// Vertex shader used by the material to display line.
static VERTEX_SRC: &str = "#version 100
    attribute vec3 position;
    attribute vec3 color;
    varying   vec3 vColor;
    uniform   mat4 model;
    uniform   mat4 proj;
    uniform   mat4 view;
    void main() {
        gl_Position = proj * view * model * vec4(position, 1.0);
        vColor = color;
    }";

/// Fragment shader used by the material to display line.
static FRAGMENT_SRC: &str = "#version 100
#ifdef GL_FRAGMENT_PRECISION_HIGH
   precision highp float;
#else
   precision mediump float;
#endif

    varying vec3 vColor;
    void main() {
        gl_FragColor = vec4(vColor, 1.0);
    }";
