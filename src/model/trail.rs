use nalgebra::Point3;

use std::collections::VecDeque;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrailSample {
    pub position: Point3<f64>,
    pub time: f64,
}

/// A time-windowed history of positions, oldest first.
///
/// Invariant: after each `append(_, now)`, every stored sample satisfies
/// `now - sample.time <= window`.
#[derive(Debug, Clone)]
pub struct TrailBuffer {
    window: f64,
    samples: VecDeque<TrailSample>,
    color: Point3<f32>,
    // Time of the latest append; opacities are measured against this
    now: f64,
}

/// Everything the renderer needs to draw one trail. `positions[i]` is drawn
/// with opacity `opacities[i]`, and both have length `count`.
#[derive(Debug, Clone, PartialEq)]
pub struct TrailRender {
    pub positions: Vec<Point3<f64>>,
    pub opacities: Vec<f64>,
    pub count: usize,
}

impl TrailBuffer {
    pub fn new(window: f64, color: Point3<f32>) -> Self {
        TrailBuffer {
            window,
            samples: VecDeque::new(),
            color,
            now: 0.0,
        }
    }

    pub fn window(&self) -> f64 {
        self.window
    }

    pub fn color(&self) -> Point3<f32> {
        self.color
    }

    pub fn set_color(&mut self, color: Point3<f32>) {
        self.color = color;
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> impl Iterator<Item = &TrailSample> {
        self.samples.iter()
    }

    pub fn latest(&self) -> Option<&TrailSample> {
        self.samples.back()
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }

    pub fn append(&mut self, position: Point3<f64>, now: f64) {
        self.samples.push_back(TrailSample { position, time: now });
        self.now = now;

        // Samples are chronological, so everything stale is at the front
        while let Some(oldest) = self.samples.front() {
            if now - oldest.time > self.window {
                self.samples.pop_front();
            } else {
                break;
            }
        }
    }

    pub fn opacity(&self, sample: &TrailSample) -> f64 {
        let age = self.now - sample.time;
        (1.0 - age / self.window).clamp(0.0, 1.0)
    }

    pub fn render(&self) -> TrailRender {
        let positions: Vec<_> = self.samples.iter().map(|s| s.position).collect();
        let opacities: Vec<_> = self.samples.iter().map(|s| self.opacity(s)).collect();
        TrailRender {
            count: positions.len(),
            positions,
            opacities,
        }
    }
}
