//! Fresnel reflectance and the reflection/refraction laws.

use lumen_math::{Complex, Vec3};

/// Mirror `w` about `n`.
#[inline]
pub fn reflect(w: Vec3, n: Vec3) -> Vec3 {
    -w + 2.0 * w.dot(n) * n
}

/// Refract `wi` through the interface with normal `n` and relative index
/// `eta` (inside over outside).
///
/// When `wi` arrives from the side opposite `n`, the interface is flipped.
/// Returns the transmitted direction and the relative index actually used,
/// or `None` on total internal reflection.
pub fn refract(wi: Vec3, n: Vec3, eta: f32) -> Option<(Vec3, f32)> {
    let mut cos_i = n.dot(wi);
    let mut eta = eta;
    let mut n = n;
    if cos_i < 0.0 {
        eta = 1.0 / eta;
        cos_i = -cos_i;
        n = -n;
    }

    let sin2_i = (1.0 - cos_i * cos_i).max(0.0);
    let sin2_t = sin2_i / (eta * eta);
    if sin2_t >= 1.0 {
        return None;
    }
    let cos_t = (1.0 - sin2_t).sqrt();

    Some((-wi / eta + (cos_i / eta - cos_t) * n, eta))
}

/// Unpolarized reflectance of a dielectric interface.
///
/// `cos_i` is measured against the normal on the outside; a negative value
/// means the light arrives from inside and `eta` is inverted.
pub fn fresnel_dielectric(cos_i: f32, eta: f32) -> f32 {
    let mut cos_i = cos_i.clamp(-1.0, 1.0);
    let mut eta = eta;
    if cos_i < 0.0 {
        eta = 1.0 / eta;
        cos_i = -cos_i;
    }

    let sin2_i = 1.0 - cos_i * cos_i;
    let sin2_t = sin2_i / (eta * eta);
    if sin2_t >= 1.0 {
        return 1.0;
    }
    let cos_t = (1.0 - sin2_t).sqrt();

    let r_parl = (eta * cos_i - cos_t) / (eta * cos_i + cos_t);
    let r_perp = (cos_i - eta * cos_t) / (cos_i + eta * cos_t);
    0.5 * (r_parl * r_parl + r_perp * r_perp)
}

/// Reflectance of an absorbing interface with complex index `eta = n + ik`.
pub fn fresnel_complex(cos_i: f32, eta: Complex) -> f32 {
    let cos_i = cos_i.clamp(0.0, 1.0);
    let sin2_i = 1.0 - cos_i * cos_i;
    let sin2_t = sin2_i / (eta * eta);
    let cos_t = (1.0 - sin2_t).sqrt();

    let r_parl = (eta * cos_i - cos_t) / (eta * cos_i + cos_t);
    let r_perp = (cos_i - eta * cos_t) / (cos_i + eta * cos_t);
    0.5 * (r_parl.norm() + r_perp.norm())
}

/// Per-channel conductor reflectance.
pub fn fresnel_conductor(cos_i: f32, ior: Vec3, k: Vec3) -> Vec3 {
    Vec3::new(
        fresnel_complex(cos_i, Complex::new(ior.x, k.x)),
        fresnel_complex(cos_i, Complex::new(ior.y, k.y)),
        fresnel_complex(cos_i, Complex::new(ior.z, k.z)),
    )
}
