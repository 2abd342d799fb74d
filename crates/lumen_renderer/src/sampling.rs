//! Random number helpers and direction sampling.
//!
//! Rendering threads each own a [`StdRng`] in thread-local storage, seeded
//! from a process-wide counter so no two threads share a sequence.

use std::cell::RefCell;
use std::f32::consts::PI;
use std::sync::atomic::{AtomicU64, Ordering};

use lumen_math::{Vec2, Vec3};
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

static NEXT_SEED: AtomicU64 = AtomicU64::new(0x5eed);

thread_local! {
    static THREAD_RNG: RefCell<StdRng> =
        RefCell::new(StdRng::seed_from_u64(NEXT_SEED.fetch_add(1, Ordering::Relaxed)));
}

/// Run `f` with this thread's generator.
pub fn with_thread_rng<R>(f: impl FnOnce(&mut StdRng) -> R) -> R {
    THREAD_RNG.with(|rng| f(&mut rng.borrow_mut()))
}

/// Restart this thread's generator from `seed`.
pub fn reseed(seed: u64) {
    THREAD_RNG.with(|rng| *rng.borrow_mut() = StdRng::seed_from_u64(seed));
}

/// Uniform float in `[0, 1)`.
#[inline]
pub fn gen_f32(rng: &mut dyn RngCore) -> f32 {
    rng.gen::<f32>()
}

#[inline]
pub fn gen_vec2(rng: &mut dyn RngCore) -> Vec2 {
    Vec2::new(gen_f32(rng), gen_f32(rng))
}

/// Polar mapping of the unit square onto the unit disk.
pub fn uniform_disk(u: Vec2) -> Vec2 {
    let r = u.x.sqrt();
    let phi = 2.0 * PI * u.y;
    Vec2::new(r * phi.cos(), r * phi.sin())
}

/// Cosine-weighted direction about +Y. The pdf is `y / π`.
pub fn cosine_hemisphere(u: Vec2) -> Vec3 {
    let d = uniform_disk(u);
    let y = (1.0 - d.length_squared()).max(0.0).sqrt();
    Vec3::new(d.x, y, d.y)
}
