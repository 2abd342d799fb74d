//! Anisotropic GGX microfacet distribution with Smith masking.
//!
//! Everything is expressed in the local shading frame where the macro
//! surface normal is +Y. Directions below the surface are mirrored into the
//! upper hemisphere before masking is evaluated, so the same distribution
//! serves both sides of a dielectric interface.

use std::f32::consts::PI;

use crate::sampling::uniform_disk;
use lumen_math::{Frame, Vec2, Vec3};

/// Smallest alpha; anything at this value is treated as a perfect mirror.
const MIN_ALPHA: f32 = 1e-3;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Microfacet {
    alpha_x: f32,
    alpha_z: f32,
}

#[inline]
fn upper(w: Vec3) -> Vec3 {
    if w.y > 0.0 {
        w
    } else {
        -w
    }
}

impl Microfacet {
    /// Build from perceptual roughness along the tangent X and Z axes.
    ///
    /// Alpha is the squared roughness, clamped to `[1e-3, 1]`.
    pub fn new(roughness_x: f32, roughness_z: f32) -> Self {
        Self {
            alpha_x: (roughness_x * roughness_x).clamp(MIN_ALPHA, 1.0),
            alpha_z: (roughness_z * roughness_z).clamp(MIN_ALPHA, 1.0),
        }
    }

    pub fn alpha(&self) -> Vec2 {
        Vec2::new(self.alpha_x, self.alpha_z)
    }

    /// Whether the surface is smooth enough to sample as a delta lobe.
    pub fn is_delta(&self) -> bool {
        self.alpha_x.max(self.alpha_z) <= MIN_ALPHA
    }

    /// Normal distribution D(m).
    pub fn distribution(&self, m: Vec3) -> f32 {
        if m.y <= 0.0 {
            return 0.0;
        }
        // Stretch the slope back to the unit-roughness configuration
        let sx = -m.x / m.y / self.alpha_x;
        let sz = -m.z / m.y / self.alpha_z;
        let slope_density = 1.0 / (PI * (1.0 + sx * sx + sz * sz).powi(2));
        slope_density / (self.alpha_x * self.alpha_z) / m.y.powi(4)
    }

    /// Smith Λ for a direction in the upper hemisphere.
    fn lambda(&self, w: Vec3) -> f32 {
        if w.y == 0.0 {
            return f32::INFINITY;
        }
        let length2 = w.x * w.x + w.z * w.z;
        if length2 == 0.0 {
            return 0.0;
        }
        let cos2_phi = w.x * w.x / length2;
        let sin2_phi = w.z * w.z / length2;
        let tan2_theta = length2 / (w.y * w.y);
        let alpha0_2 =
            self.alpha_x * self.alpha_x * cos2_phi + self.alpha_z * self.alpha_z * sin2_phi;
        0.5 * ((1.0 + alpha0_2 * tan2_theta).sqrt() - 1.0)
    }

    /// Smith masking G1(v, m).
    pub fn masking(&self, v: Vec3, m: Vec3) -> f32 {
        let v = upper(v);
        if v.dot(m) <= 0.0 {
            return 0.0;
        }
        1.0 / (1.0 + self.lambda(v))
    }

    /// Height-correlated masking-shadowing G2(l, v, m).
    pub fn masking_shadowing(&self, l: Vec3, v: Vec3, m: Vec3) -> f32 {
        let l = upper(l);
        let v = upper(v);
        if l.dot(m) <= 0.0 || v.dot(m) <= 0.0 {
            return 0.0;
        }
        1.0 / (1.0 + self.lambda(v) + self.lambda(l))
    }

    /// Density of visible normals D_v(m) = G1(v, m) max(0, v·m) D(m) / |v.y|.
    pub fn visible_normal_pdf(&self, v: Vec3, m: Vec3) -> f32 {
        let cos_o = upper(v).dot(m);
        if cos_o <= 0.0 {
            return 0.0;
        }
        self.distribution(m) * cos_o * self.masking(v, m) / v.y.abs()
    }

    /// Sample a microfacet normal in proportion to [`Self::visible_normal_pdf`].
    pub fn sample_visible_normal(&self, v: Vec3, u: Vec2) -> Vec3 {
        let v = upper(v);
        // Warp to the hemisphere configuration
        let vh = Vec3::new(self.alpha_x * v.x, v.y, self.alpha_z * v.z).normalize();

        // Sample the projected area of the visible half disk
        let mut p = uniform_disk(u);
        let h = (1.0 - p.x * p.x).sqrt();
        let t = 0.5 * (1.0 + vh.y);
        p.y = t * p.y + (1.0 - t) * h;

        // The frame's z axis leans away from +Y, so the warped coordinate
        // goes on -z to stay on the visible side
        let frame = Frame::new(vh);
        let py = (1.0 - p.x * p.x - p.y * p.y).max(0.0).sqrt();
        let nh = frame.world_from_local(Vec3::new(p.x, py, -p.y));

        // Back to the ellipsoid configuration
        Vec3::new(self.alpha_x * nh.x, nh.y, self.alpha_z * nh.z).normalize()
    }
}
