use arena_core::{BenchRegistry, HostValue, RegistryError, Suite};
use std::sync::{Mutex, PoisonError};

pub const N_BODY_COUNT: usize = 100;
pub const N_BODY_STEPS: usize = 1000;
pub const SOFTENING: f64 = 0.01;
pub const MANDELBROT_WIDTH: usize = 100;
pub const MANDELBROT_HEIGHT: usize = 100;
pub const MANDELBROT_MAX_ITER: u32 = 1000;

/// N-body integration and Mandelbrot escape time.
#[derive(Debug, Default)]
pub struct SimulationSuite;

impl SimulationSuite {
    pub fn new() -> Self {
        Self
    }
}

impl Suite for SimulationSuite {
    fn name(&self) -> &str {
        "simulation"
    }

    fn description(&self) -> &str {
        "pairwise force integration and fractal escape time"
    }

    fn register(&self, registry: &mut BenchRegistry) -> Result<(), RegistryError> {
        registry.register("nBody.interleaved", || {
            let mut pos = vec![0.0f64; N_BODY_COUNT * 2];
            let mut vel = vec![0.0f64; N_BODY_COUNT * 2];
            n_body_interleaved(&mut pos, &mut vel, N_BODY_STEPS);
            Ok(HostValue::Nil)
        })?;
        let bodies = Mutex::new(Bodies::zeroed(N_BODY_COUNT));
        registry.register("nBody.soa", move || {
            let mut bodies = bodies.lock().unwrap_or_else(PoisonError::into_inner);
            // Every call starts from the zeroed state; nothing evolves across calls.
            bodies.reset();
            bodies.simulate(N_BODY_STEPS);
            Ok(HostValue::Nil)
        })?;
        registry.register_alias("nBody", "nBody.soa")?;

        registry.register("mandelbrot.escape", || {
            Ok(HostValue::from(mandelbrot_escape(
                MANDELBROT_WIDTH,
                MANDELBROT_HEIGHT,
                MANDELBROT_MAX_ITER,
            ) as i64))
        })?;
        registry.register("mandelbrot.cardioid", || {
            Ok(HostValue::from(mandelbrot_cardioid(
                MANDELBROT_WIDTH,
                MANDELBROT_HEIGHT,
                MANDELBROT_MAX_ITER,
            ) as i64))
        })?;
        registry.register_alias("mandelbrot", "mandelbrot.cardioid")?;
        Ok(())
    }
}

/// Integrate bodies stored as interleaved `[x0, y0, x1, y1, ...]` pairs.
pub fn n_body_interleaved(pos: &mut [f64], vel: &mut [f64], steps: usize) {
    let bodies = pos.len() / 2;
    for _ in 0..steps {
        for b1 in 0..bodies {
            let (b1x, b1y) = (b1 * 2, b1 * 2 + 1);
            for b2 in 0..bodies {
                if b1 == b2 {
                    continue;
                }
                let (b2x, b2y) = (b2 * 2, b2 * 2 + 1);
                let dx = pos[b2x] - pos[b1x];
                let dy = pos[b2y] - pos[b1y];
                let f = 1.0 / (dx * dx + dy * dy + SOFTENING);
                vel[b1x] += dx * f;
                vel[b1y] += dy * f;
            }
        }
        for (p, v) in pos.iter_mut().zip(vel.iter()) {
            *p += v;
        }
    }
}

/// Structure-of-arrays body state.
#[derive(Debug, Clone, PartialEq)]
pub struct Bodies {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub vx: Vec<f64>,
    pub vy: Vec<f64>,
}

impl Bodies {
    pub fn zeroed(count: usize) -> Self {
        Self {
            x: vec![0.0; count],
            y: vec![0.0; count],
            vx: vec![0.0; count],
            vy: vec![0.0; count],
        }
    }

    pub fn from_interleaved(pos: &[f64], vel: &[f64]) -> Self {
        Self {
            x: pos.iter().step_by(2).copied().collect(),
            y: pos.iter().skip(1).step_by(2).copied().collect(),
            vx: vel.iter().step_by(2).copied().collect(),
            vy: vel.iter().skip(1).step_by(2).copied().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    pub fn reset(&mut self) {
        self.x.fill(0.0);
        self.y.fill(0.0);
        self.vx.fill(0.0);
        self.vy.fill(0.0);
    }

    /// Same arithmetic, in the same order, as [`n_body_interleaved`].
    pub fn simulate(&mut self, steps: usize) {
        let n = self.len();
        for _ in 0..steps {
            for b1 in 0..n {
                let (x1, y1) = (self.x[b1], self.y[b1]);
                let (mut vx, mut vy) = (self.vx[b1], self.vy[b1]);
                for b2 in 0..n {
                    if b1 == b2 {
                        continue;
                    }
                    let dx = self.x[b2] - x1;
                    let dy = self.y[b2] - y1;
                    let f = 1.0 / (dx * dx + dy * dy + SOFTENING);
                    vx += dx * f;
                    vy += dy * f;
                }
                self.vx[b1] = vx;
                self.vy[b1] = vy;
            }
            for (x, vx) in self.x.iter_mut().zip(&self.vx) {
                *x += vx;
            }
            for (y, vy) in self.y.iter_mut().zip(&self.vy) {
                *y += vy;
            }
        }
    }
}

/// Iterations until `|z| > 2`, capped at `max_iter`.
#[inline]
pub fn escape_time(cx: f64, cy: f64, max_iter: u32) -> u32 {
    let (mut zx, mut zy) = (0.0f64, 0.0f64);
    let mut iter = 0;
    while zx * zx + zy * zy <= 4.0 && iter < max_iter {
        let tmp = zx * zx - zy * zy + cx;
        zy = 2.0 * zx * zy + cy;
        zx = tmp;
        iter += 1;
    }
    iter
}

#[inline]
pub fn in_main_cardioid(cx: f64, cy: f64) -> bool {
    let xq = cx - 0.25;
    let q = xq * xq + cy * cy;
    q * (q + xq) <= 0.25 * cy * cy
}

#[inline]
pub fn in_period2_bulb(cx: f64, cy: f64) -> bool {
    let xp = cx + 1.0;
    xp * xp + cy * cy <= 0.0625
}

#[inline]
fn grid_point(x: usize, y: usize, w: usize, h: usize) -> (f64, f64) {
    let cx = (x as f64 / w as f64) * 3.5 - 2.5;
    let cy = (y as f64 / h as f64) * 2.0 - 1.0;
    (cx, cy)
}

/// Sum of escape times over the grid.
pub fn mandelbrot_escape(w: usize, h: usize, max_iter: u32) -> u64 {
    let mut total = 0u64;
    for y in 0..h {
        for x in 0..w {
            let (cx, cy) = grid_point(x, y, w, h);
            total += escape_time(cx, cy, max_iter) as u64;
        }
    }
    total
}

/// Like [`mandelbrot_escape`], but points inside the main cardioid or the
/// period-2 bulb are known members and count as `max_iter` without iterating.
pub fn mandelbrot_cardioid(w: usize, h: usize, max_iter: u32) -> u64 {
    let mut total = 0u64;
    for y in 0..h {
        for x in 0..w {
            let (cx, cy) = grid_point(x, y, w, h);
            total += if in_main_cardioid(cx, cy) || in_period2_bulb(cx, cy) {
                max_iter as u64
            } else {
                escape_time(cx, cy, max_iter) as u64
            };
        }
    }
    total
}
