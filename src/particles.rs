//! Transient free-flying particles
//!
//! Short-lived ballistic effects (sparks, debris) composited over the grid.
//! They never interact with cells: a fixed pool, sub-pixel motion, aging and
//! an alpha fade over the tail of the lifetime. Removal is swap-with-last.

use crate::elements::Rgba;
use crate::rng::ElementRng;

/// Pool capacity; spawns beyond this simply report failure.
pub const MAX_PARTICLES: usize = 4096;

#[derive(Clone, Copy, Debug)]
pub struct Particle {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub color: Rgba,
    pub velocity_x: f32,
    pub velocity_y: f32,
    pub acceleration_x: f32,
    pub acceleration_y: f32,
    pub lifetime: i32,
    /// Fraction of the initial lifetime below which alpha decays linearly.
    pub fade_threshold: f32,
    accumulation_x: f32,
    accumulation_y: f32,
    max_lifetime: f32,
    initial_alpha: u8,
}

impl Particle {
    /// `lifetime_randomness` scales the initial lifetime by a uniform factor
    /// in [1 - r, 1 + r] (0 = exact, 0.2 = +/-20%).
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        color: Rgba,
        velocity_x: f32,
        velocity_y: f32,
        acceleration_x: f32,
        acceleration_y: f32,
        lifetime: i32,
        lifetime_randomness: f32,
        fade_threshold: f32,
        rng: &mut ElementRng,
    ) -> Self {
        let scaled = (lifetime as f32
            * rng.random_float(1.0 - lifetime_randomness, 1.0 + lifetime_randomness))
            as i32;
        let lifetime = scaled.max(1);
        Self {
            x,
            y,
            width: width.max(1),
            height: height.max(1),
            color,
            velocity_x,
            velocity_y,
            acceleration_x,
            acceleration_y,
            lifetime,
            fade_threshold: fade_threshold.clamp(0.01, 1.0),
            accumulation_x: 0.0,
            accumulation_y: 0.0,
            max_lifetime: lifetime as f32,
            initial_alpha: color.a,
        }
    }
}

/// Fixed-capacity pool with a live count.
pub struct ParticlePool {
    particles: Vec<Particle>,
}

impl ParticlePool {
    pub fn new() -> Self {
        Self {
            particles: Vec::with_capacity(MAX_PARTICLES),
        }
    }

    /// Append if capacity allows; `false` means the effect is dropped.
    pub fn spawn(&mut self, p: Particle) -> bool {
        if self.particles.len() >= MAX_PARTICLES {
            return false;
        }
        self.particles.push(p);
        true
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter()
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }

    /// One integration step for every live particle: acceleration into
    /// velocity, velocity into the sub-pixel accumulator, integer move,
    /// aging, fade, then cull. The swapped-in particle is processed in the
    /// same pass (the index does not advance on removal).
    pub fn update_all(&mut self, world_w: i32, world_h: i32) {
        let mut i = 0;
        while i < self.particles.len() {
            let p = &mut self.particles[i];

            p.velocity_x += p.acceleration_x;
            p.velocity_y += p.acceleration_y;
            p.accumulation_x += p.velocity_x;
            p.accumulation_y += p.velocity_y;
            let move_x = p.accumulation_x as i32;
            let move_y = p.accumulation_y as i32;
            p.x += move_x;
            p.y += move_y;
            p.accumulation_x -= move_x as f32;
            p.accumulation_y -= move_y as f32;

            p.lifetime -= 1;

            let out_of_bounds = p.x + p.width < 0
                || p.x >= world_w
                || p.y + p.height < 0
                || p.y >= world_h;

            let fade_frames = p.max_lifetime * p.fade_threshold;
            p.color.a =
                (p.initial_alpha as f32 * ((p.lifetime as f32).min(fade_frames) / fade_frames))
                    as u8;

            if p.lifetime <= 0 || out_of_bounds {
                self.particles.swap_remove(i);
            } else {
                i += 1;
            }
        }
    }
}

impl Default for ParticlePool {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spark(rng: &mut ElementRng) -> Particle {
        Particle::new(
            10,
            10,
            1,
            1,
            Rgba::new(255, 200, 40, 200),
            0.5,
            -1.0,
            0.0,
            0.05,
            20,
            0.0,
            0.5,
            rng,
        )
    }

    #[test]
    fn pool_respects_capacity() {
        let mut rng = ElementRng::from_seed(1);
        let mut pool = ParticlePool::new();
        for _ in 0..MAX_PARTICLES {
            assert!(pool.spawn(spark(&mut rng)));
        }
        assert!(!pool.spawn(spark(&mut rng)));
        assert_eq!(pool.len(), MAX_PARTICLES);
    }

    #[test]
    fn particles_move_and_age() {
        let mut rng = ElementRng::from_seed(1);
        let mut pool = ParticlePool::new();
        let mut p = spark(&mut rng);
        p.acceleration_y = 0.0;
        pool.spawn(p);
        pool.update_all(100, 100);
        let p = pool.iter().next().unwrap();
        assert_eq!(p.lifetime, 19);
        assert_eq!(p.y, 9); // vy = -1 moves a full cell per step
    }

    #[test]
    fn lifetime_expiry_culls() {
        let mut rng = ElementRng::from_seed(1);
        let mut pool = ParticlePool::new();
        let mut p = spark(&mut rng);
        p.lifetime = 2;
        p.velocity_x = 0.0;
        p.velocity_y = 0.0;
        pool.spawn(p);
        pool.update_all(100, 100);
        assert_eq!(pool.len(), 1);
        pool.update_all(100, 100);
        assert_eq!(pool.len(), 0);
    }

    #[test]
    fn leaving_bounds_culls() {
        let mut rng = ElementRng::from_seed(1);
        let mut pool = ParticlePool::new();
        let mut p = spark(&mut rng);
        p.x = 0;
        p.velocity_x = -3.0;
        p.velocity_y = 0.0;
        p.acceleration_y = 0.0;
        pool.spawn(p);
        pool.update_all(100, 100);
        assert_eq!(pool.len(), 0);
    }

    #[test]
    fn alpha_fades_over_the_tail() {
        let mut rng = ElementRng::from_seed(1);
        let mut pool = ParticlePool::new();
        let mut p = Particle::new(
            50,
            50,
            1,
            1,
            Rgba::new(255, 255, 255, 200),
            0.0,
            0.0,
            0.0,
            0.0,
            10,
            0.0,
            0.5,
            &mut rng,
        );
        p.velocity_y = 0.0;
        pool.spawn(p);

        // above the fade threshold alpha holds steady
        pool.update_all(100, 100);
        assert_eq!(pool.iter().next().unwrap().color.a, 200);

        // run into the tail: alpha decays linearly toward zero
        for _ in 0..6 {
            pool.update_all(100, 100);
        }
        let a = pool.iter().next().unwrap().color.a;
        assert!(a < 200 && a > 0, "alpha in decay, got {}", a);
    }

    #[test]
    fn removal_does_not_skip_the_swapped_in_particle() {
        let mut rng = ElementRng::from_seed(1);
        let mut pool = ParticlePool::new();
        // first dies immediately, second is alive and must still be stepped
        let mut dying = spark(&mut rng);
        dying.lifetime = 1;
        let mut alive = spark(&mut rng);
        alive.lifetime = 30;
        pool.spawn(dying);
        pool.spawn(alive);
        pool.update_all(100, 100);
        assert_eq!(pool.len(), 1);
        assert_eq!(pool.iter().next().unwrap().lifetime, 29);
    }

    #[test]
    fn lifetime_randomness_scales_the_roll() {
        let mut rng = ElementRng::from_seed(5);
        for _ in 0..50 {
            let p = Particle::new(
                0,
                0,
                1,
                1,
                Rgba::new(0, 0, 0, 255),
                0.0,
                0.0,
                0.0,
                0.0,
                100,
                0.2,
                1.0,
                &mut rng,
            );
            assert!((80..=120).contains(&p.lifetime), "lifetime {}", p.lifetime);
        }
    }
}
