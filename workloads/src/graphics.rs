use arena_core::{BenchRegistry, HostValue, RegistryError, Suite};

pub const RAY_WIDTH: i32 = 100;
pub const RAY_HEIGHT: i32 = 100;
pub const RAY_CENTER: (i32, i32) = (50, 50);
pub const RAY_RADIUS_SQ: i32 = 1600;

/// Pixel coverage of a circle on an integer grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Circle {
    pub cx: i32,
    pub cy: i32,
    pub radius_sq: i32,
}

impl Circle {
    #[inline]
    pub fn hits(&self, x: i32, y: i32) -> bool {
        let dx = x - self.cx;
        let dy = y - self.cy;
        dx * dx + dy * dy < self.radius_sq
    }

    /// Smallest integer radius whose square covers `radius_sq`.
    pub fn radius(&self) -> i32 {
        let mut r = 0;
        while r * r < self.radius_sq {
            r += 1;
        }
        r
    }

    /// Inclusive bounding square, clipped to a `w x h` grid.
    pub fn bounds(&self, w: i32, h: i32) -> (i32, i32, i32, i32) {
        let r = self.radius();
        (
            (self.cx - r).max(0),
            (self.cx + r).min(w - 1),
            (self.cy - r).max(0),
            (self.cy + r).min(h - 1),
        )
    }
}

pub const RAY_TARGET: Circle = Circle {
    cx: RAY_CENTER.0,
    cy: RAY_CENTER.1,
    radius_sq: RAY_RADIUS_SQ,
};

/// Circle hit counting over a pixel grid.
#[derive(Debug, Default)]
pub struct GraphicsSuite;

impl GraphicsSuite {
    pub fn new() -> Self {
        Self
    }
}

impl Suite for GraphicsSuite {
    fn name(&self) -> &str {
        "graphics"
    }

    fn description(&self) -> &str {
        "per-pixel membership tests"
    }

    fn register(&self, registry: &mut BenchRegistry) -> Result<(), RegistryError> {
        registry.register("rayTrace.full", || {
            Ok(HostValue::from(trace_full(&RAY_TARGET, RAY_WIDTH, RAY_HEIGHT) as i64))
        })?;
        registry.register("rayTrace.pruned", || {
            Ok(HostValue::from(trace_pruned(&RAY_TARGET, RAY_WIDTH, RAY_HEIGHT) as i64))
        })?;
        registry.register_alias("rayTrace", "rayTrace.pruned")?;
        Ok(())
    }
}

pub fn trace_full(circle: &Circle, w: i32, h: i32) -> u32 {
    let mut hits = 0;
    for y in 0..h {
        for x in 0..w {
            if circle.hits(x, y) {
                hits += 1;
            }
        }
    }
    hits
}

/// Only visits pixels inside the circle's bounding square; pixels outside
/// it can never hit.
pub fn trace_pruned(circle: &Circle, w: i32, h: i32) -> u32 {
    let (x0, x1, y0, y1) = circle.bounds(w, h);
    let mut hits = 0;
    for y in y0..=y1 {
        for x in x0..=x1 {
            if circle.hits(x, y) {
                hits += 1;
            }
        }
    }
    hits
}
