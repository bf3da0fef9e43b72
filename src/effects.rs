//! Celebration effects: confetti particles and emoji bursts.
//!
//! Pure state; `render.rs` draws it. Randomness is passed in as a closure
//! returning values in `[0, 1)` so the simulation is reproducible in tests.

use crate::board::HazardKind;

pub const CONFETTI_COUNT: usize = 150;
pub const CONFETTI_COLORS: [&str; 6] = [
    "#790ECB", "#9a3de8", "#b84fff", "#d580ff", "#ffffff", "#ffff44",
];
/// Added to vertical speed every frame.
pub const GRAVITY: f64 = 0.1;

pub const BURST_LIFETIME_MS: f64 = 1500.0;
/// Delay between consecutive glyphs of one burst.
pub const BURST_STAGGER_MS: f64 = 100.0;
pub const HAPPY_GLYPHS: [&str; 3] = ["✨", "😊", "🎉"];
pub const SAD_GLYPHS: [&str; 3] = ["😢", "💔", "😞"];

#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub color: &'static str,
    pub size: f64,
    /// Degrees.
    pub rotation: f64,
    pub rotation_speed: f64,
}

/// A falling confetti shower over a `width` × `height` canvas.
#[derive(Clone, Debug, Default)]
pub struct Confetti {
    pub particles: Vec<Particle>,
    height: f64,
}

impl Confetti {
    pub fn burst(width: f64, height: f64, rand: &mut impl FnMut() -> f64) -> Self {
        let particles = (0..CONFETTI_COUNT)
            .map(|_| {
                let color_idx = ((rand() * CONFETTI_COLORS.len() as f64) as usize)
                    .min(CONFETTI_COLORS.len() - 1);
                Particle {
                    x: rand() * width,
                    y: -10.0,
                    vx: (rand() - 0.5) * 4.0,
                    vy: rand() * 3.0 + 2.0,
                    color: CONFETTI_COLORS[color_idx],
                    size: rand() * 8.0 + 4.0,
                    rotation: rand() * 360.0,
                    rotation_speed: (rand() - 0.5) * 10.0,
                }
            })
            .collect();
        Self { particles, height }
    }

    /// Advance one frame. Particles that left the canvas stop moving.
    pub fn step(&mut self) {
        for p in self.particles.iter_mut().filter(|p| p.y < self.height) {
            p.x += p.vx;
            p.y += p.vy;
            p.rotation += p.rotation_speed;
            p.vy += GRAVITY;
        }
    }

    /// Particles still on screen.
    pub fn active(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter().filter(|p| p.y < self.height)
    }

    pub fn is_finished(&self) -> bool {
        self.active().next().is_none()
    }
}

/// Three glyphs floating up from a board cell after landing on a hazard.
#[derive(Clone, Debug, PartialEq)]
pub struct EmojiBurst {
    pub cell: u8,
    pub glyphs: [&'static str; 3],
    pub start_ms: f64,
}

impl EmojiBurst {
    pub fn for_hazard(kind: HazardKind, cell: u8, start_ms: f64) -> Self {
        let glyphs = match kind {
            HazardKind::Ladder => HAPPY_GLYPHS,
            HazardKind::Snake => SAD_GLYPHS,
        };
        Self {
            cell,
            glyphs,
            start_ms,
        }
    }

    /// Animation progress of glyph `i` in `[0, 1]`, or `None` before it appears.
    pub fn progress(&self, i: usize, now_ms: f64) -> Option<f64> {
        let age = now_ms - self.start_ms - i as f64 * BURST_STAGGER_MS;
        if age < 0.0 {
            return None;
        }
        Some((age / (BURST_LIFETIME_MS - 2.0 * BURST_STAGGER_MS)).clamp(0.0, 1.0))
    }

    pub fn is_expired(&self, now_ms: f64) -> bool {
        now_ms - self.start_ms >= BURST_LIFETIME_MS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn constant(v: f64) -> impl FnMut() -> f64 {
        move || v
    }

    #[test]
    fn test_confetti_starts_above_canvas() {
        let c = Confetti::burst(800.0, 600.0, &mut constant(0.5));
        assert_eq!(c.particles.len(), CONFETTI_COUNT);
        assert!(c.particles.iter().all(|p| p.y == -10.0));
        assert!(!c.is_finished());
    }

    #[test]
    fn test_confetti_falls_and_finishes() {
        let mut c = Confetti::burst(800.0, 100.0, &mut constant(0.0));
        let mut frames = 0;
        while !c.is_finished() {
            c.step();
            frames += 1;
            assert!(frames < 1_000, "confetti never left the canvas");
        }
        assert!(c.particles.iter().all(|p| p.y >= 100.0));
    }

    #[test]
    fn test_top_of_unit_range_picks_last_color() {
        let c = Confetti::burst(10.0, 10.0, &mut constant(0.999_999));
        assert_eq!(c.particles[0].color, "#ffff44");
    }

    #[test]
    fn test_burst_glyphs_by_kind() {
        assert_eq!(
            EmojiBurst::for_hazard(HazardKind::Ladder, 4, 0.0).glyphs,
            HAPPY_GLYPHS
        );
        assert_eq!(
            EmojiBurst::for_hazard(HazardKind::Snake, 98, 0.0).glyphs,
            SAD_GLYPHS
        );
    }

    #[test]
    fn test_burst_stagger_and_expiry() {
        let b = EmojiBurst::for_hazard(HazardKind::Snake, 98, 1_000.0);
        assert_eq!(b.progress(0, 1_000.0), Some(0.0));
        assert_eq!(b.progress(2, 1_150.0), None);
        assert!(!b.is_expired(2_499.0));
        assert!(b.is_expired(2_500.0));
    }
}
