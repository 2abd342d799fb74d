//! Surface materials and BSDF sampling.
//!
//! All directions handed to [`Material::sample`] live in the local shading
//! frame, with the geometric normal along +Y. `wo` points away from the
//! surface toward the viewer, and so does the sampled `wi`.

use std::f32::consts::PI;

use crate::color::Color;
use crate::fresnel::{fresnel_conductor, fresnel_dielectric, reflect, refract};
use crate::microfacet::Microfacet;
use crate::sampling::{cosine_hemisphere, gen_f32, gen_vec2};
use lumen_core::{MaterialDesc, MaterialKindDesc};
use lumen_math::Vec3;
use rand::RngCore;

/// Result of sampling a material.
#[derive(Clone, Copy, Debug)]
pub struct BsdfSample {
    /// BSDF value for the sampled pair (not cosine weighted)
    pub bsdf: Color,
    /// Solid-angle density of `wi`; `1` for delta lobes
    pub pdf: f32,
    /// Incident direction in the local frame
    pub wi: Vec3,
}

impl BsdfSample {
    /// Throughput factor `bsdf |cos θi| / pdf`.
    pub fn weight(&self) -> Color {
        self.bsdf * self.wi.y.abs() / self.pdf
    }
}

/// The scattering behaviour of a material.
#[derive(Clone, Debug, PartialEq)]
pub enum MaterialKind {
    Diffuse {
        albedo: Color,
    },
    Mirror {
        albedo: Color,
    },
    Dielectric {
        ior: f32,
        albedo_r: Color,
        albedo_t: Color,
        microfacet: Microfacet,
    },
    Conductor {
        ior: Vec3,
        k: Vec3,
        microfacet: Microfacet,
    },
    /// Diffuse with a darkened grid every 1/8 unit
    Ground {
        albedo: Color,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub struct Material {
    kind: MaterialKind,
    emission: Color,
}

impl Material {
    fn from_kind(kind: MaterialKind) -> Self {
        Self {
            kind,
            emission: Color::ZERO,
        }
    }

    pub fn diffuse(albedo: Color) -> Self {
        Self::from_kind(MaterialKind::Diffuse { albedo })
    }

    pub fn mirror(albedo: Color) -> Self {
        Self::from_kind(MaterialKind::Mirror { albedo })
    }

    /// Clear glass-like dielectric with white reflection and transmission.
    pub fn dielectric(ior: f32, roughness_x: f32, roughness_z: f32) -> Self {
        Self::dielectric_with_albedos(ior, Color::ONE, Color::ONE, roughness_x, roughness_z)
    }

    pub fn dielectric_with_albedos(
        ior: f32,
        albedo_r: Color,
        albedo_t: Color,
        roughness_x: f32,
        roughness_z: f32,
    ) -> Self {
        Self::from_kind(MaterialKind::Dielectric {
            ior,
            albedo_r,
            albedo_t,
            microfacet: Microfacet::new(roughness_x, roughness_z),
        })
    }

    /// Metal with complex index of refraction `ior + i k` per channel.
    pub fn conductor(ior: Vec3, k: Vec3, roughness_x: f32, roughness_z: f32) -> Self {
        Self::from_kind(MaterialKind::Conductor {
            ior,
            k,
            microfacet: Microfacet::new(roughness_x, roughness_z),
        })
    }

    pub fn ground(albedo: Color) -> Self {
        Self::from_kind(MaterialKind::Ground { albedo })
    }

    /// Make the material emit `emission` from both sides.
    pub fn with_emission(mut self, emission: Color) -> Self {
        self.emission = emission;
        self
    }

    pub fn emission(&self) -> Color {
        self.emission
    }

    pub fn kind(&self) -> &MaterialKind {
        &self.kind
    }

    pub fn from_desc(desc: &MaterialDesc) -> Self {
        let material = match desc.kind {
            MaterialKindDesc::Diffuse { albedo } => Self::diffuse(albedo),
            MaterialKindDesc::Mirror { albedo } => Self::mirror(albedo),
            MaterialKindDesc::Dielectric {
                ior,
                albedo_r,
                albedo_t,
                roughness_x,
                roughness_z,
            } => Self::dielectric_with_albedos(ior, albedo_r, albedo_t, roughness_x, roughness_z),
            MaterialKindDesc::Conductor {
                ior,
                k,
                roughness_x,
                roughness_z,
            } => Self::conductor(ior, k, roughness_x, roughness_z),
            MaterialKindDesc::Ground { albedo } => Self::ground(albedo),
        };
        material.with_emission(desc.emission)
    }

    /// Sample an incident direction for the outgoing direction `wo`.
    ///
    /// `hit_point` is the world-space hit position, used by textured
    /// materials. `None` means the path is absorbed.
    pub fn sample(&self, hit_point: Vec3, wo: Vec3, rng: &mut dyn RngCore) -> Option<BsdfSample> {
        let sample = match &self.kind {
            MaterialKind::Diffuse { albedo } => sample_diffuse(*albedo, rng),
            MaterialKind::Ground { albedo } => {
                let mut sample = sample_diffuse(*albedo, rng)?;
                if on_grid_line(hit_point) {
                    sample.bsdf *= 0.1;
                }
                Some(sample)
            }
            MaterialKind::Mirror { albedo } => delta(*albedo, mirror(wo)),
            MaterialKind::Dielectric {
                ior,
                albedo_r,
                albedo_t,
                microfacet,
            } => {
                if microfacet.is_delta() {
                    sample_smooth_dielectric(*ior, *albedo_r, *albedo_t, wo, rng)
                } else {
                    sample_rough_dielectric(*ior, *albedo_r, *albedo_t, microfacet, wo, rng)
                }
            }
            MaterialKind::Conductor { ior, k, microfacet } => {
                sample_conductor(*ior, *k, microfacet, wo, rng)
            }
        }?;

        (sample.pdf > 0.0 && sample.pdf.is_finite()).then_some(sample)
    }
}

#[inline]
fn mirror(wo: Vec3) -> Vec3 {
    Vec3::new(-wo.x, wo.y, -wo.z)
}

/// Delta lobe whose throughput is exactly `albedo`.
fn delta(albedo: Color, wi: Vec3) -> Option<BsdfSample> {
    if wi.y == 0.0 {
        return None;
    }
    Some(BsdfSample {
        bsdf: albedo / wi.y.abs(),
        pdf: 1.0,
        wi,
    })
}

fn on_grid_line(p: Vec3) -> bool {
    let cell = |v: f32| ((8.0 * v).floor() as i64).rem_euclid(8);
    cell(p.x) == 0 || cell(p.z) == 0
}

fn sample_diffuse(albedo: Color, rng: &mut dyn RngCore) -> Option<BsdfSample> {
    let wi = cosine_hemisphere(gen_vec2(rng));
    Some(BsdfSample {
        bsdf: albedo / PI,
        pdf: wi.y / PI,
        wi,
    })
}

fn sample_smooth_dielectric(
    ior: f32,
    albedo_r: Color,
    albedo_t: Color,
    wo: Vec3,
    rng: &mut dyn RngCore,
) -> Option<BsdfSample> {
    let f = fresnel_dielectric(wo.y, ior);
    if gen_f32(rng) < f {
        return delta(albedo_r, mirror(wo));
    }

    let (wi, etap) = refract(wo, Vec3::Y, ior)?;
    let mut sample = delta(albedo_t, wi)?;
    sample.bsdf /= etap * etap;
    Some(sample)
}

fn sample_rough_dielectric(
    ior: f32,
    albedo_r: Color,
    albedo_t: Color,
    microfacet: &Microfacet,
    wo: Vec3,
    rng: &mut dyn RngCore,
) -> Option<BsdfSample> {
    let wm = microfacet.sample_visible_normal(wo, gen_vec2(rng));
    let cos_om = wo.dot(wm);
    let f = fresnel_dielectric(cos_om, ior);
    let d = microfacet.distribution(wm);
    let vnd = microfacet.visible_normal_pdf(wo, wm);

    if gen_f32(rng) < f {
        let wi = reflect(wo, wm);
        if wi.y * wo.y <= 0.0 {
            return None;
        }
        let g = microfacet.masking_shadowing(wi, wo, wm);
        return Some(BsdfSample {
            bsdf: albedo_r * (d * g * f / (4.0 * wi.y * wo.y).abs()),
            pdf: vnd / (4.0 * cos_om.abs()) * f,
            wi,
        });
    }

    let (wi, etap) = refract(wo, wm, ior)?;
    if wi.y * wo.y >= 0.0 {
        return None;
    }
    let cos_im = wi.dot(wm);
    let denom = (cos_im + cos_om / etap).powi(2);
    if denom == 0.0 {
        return None;
    }
    let g = microfacet.masking_shadowing(wi, wo, wm);
    let jacobian = (cos_im * cos_om / (wi.y * wo.y * denom)).abs();
    Some(BsdfSample {
        bsdf: albedo_t * (d * g * (1.0 - f) * jacobian / (etap * etap)),
        pdf: vnd * cos_im.abs() / denom * (1.0 - f),
        wi,
    })
}

fn sample_conductor(
    ior: Vec3,
    k: Vec3,
    microfacet: &Microfacet,
    wo: Vec3,
    rng: &mut dyn RngCore,
) -> Option<BsdfSample> {
    if microfacet.is_delta() {
        let wi = reflect(wo, Vec3::Y);
        return delta(fresnel_conductor(wo.y.abs(), ior, k), wi);
    }

    let wm = microfacet.sample_visible_normal(wo, gen_vec2(rng));
    let wi = reflect(wo, wm);
    if wi.y * wo.y <= 0.0 {
        return None;
    }
    let cos_om = wo.dot(wm).abs();
    let f = fresnel_conductor(cos_om, ior, k);
    let d = microfacet.distribution(wm);
    let g = microfacet.masking_shadowing(wi, wo, wm);
    Some(BsdfSample {
        bsdf: f * (d * g / (4.0 * wi.y * wo.y).abs()),
        pdf: microfacet.visible_normal_pdf(wo, wm) / (4.0 * cos_om),
        wi,
    })
}
