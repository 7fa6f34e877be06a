use super::core::{Point3, Tolerance, Vec3};

fn wrap_param(value: f64, start: f64, end: f64) -> f64 {
    let span = end - start;
    if !span.is_finite() || span == 0.0 {
        return start;
    }
    let mut t = (value - start) % span;
    if t < 0.0 {
        t += span;
    }
    start + t
}

pub(crate) fn orthogonal_unit_vector(reference: Vec3) -> Vec3 {
    let candidate = if reference.x.abs() < reference.y.abs() {
        Vec3::new(0.0, -reference.z, reference.y)
    } else {
        Vec3::new(-reference.z, 0.0, reference.x)
    };

    candidate.normalized().unwrap_or(Vec3::X)
}

/// A parametric surface over `domain_u() × domain_v()`.
///
/// Only `point_at` is required. Derivatives default to finite differences,
/// which is what the patch-based evaluator relies on for surfaces without a
/// closed-form derivative.
pub trait Surface {
    fn point_at(&self, u: f64, v: f64) -> Point3;

    #[must_use]
    fn domain_u(&self) -> (f64, f64) {
        (0.0, 1.0)
    }

    #[must_use]
    fn domain_v(&self) -> (f64, f64) {
        (0.0, 1.0)
    }

    #[must_use]
    fn is_u_closed(&self) -> bool {
        false
    }

    #[must_use]
    fn is_v_closed(&self) -> bool {
        false
    }

    /// Central (or one-sided at open boundaries) differences of `point_at`.
    #[must_use]
    fn partial_derivatives_at(&self, u: f64, v: f64) -> (Vec3, Vec3) {
        let (u0, u1) = self.domain_u();
        let (v0, v1) = self.domain_v();
        let u = self.normalize_u(u);
        let v = self.normalize_v(v);

        let mut du = Vec3::ZERO;
        let mut dv = Vec3::ZERO;

        let h = Tolerance::DERIVATIVE.relative_to(u1 - u0);
        if h.is_finite() && h > 0.0 {
            let (ua, ub) = self.u_stencil(u, h);
            if ua != ub {
                let pa = self.point_at(ua, v);
                let pb = self.point_at(ub, v);
                du = pb.sub_point(pa).mul_scalar(1.0 / (ub - ua));
            }
        }

        let h = Tolerance::DERIVATIVE.relative_to(v1 - v0);
        if h.is_finite() && h > 0.0 {
            let (va, vb) = self.v_stencil(v, h);
            if va != vb {
                let pa = self.point_at(u, va);
                let pb = self.point_at(u, vb);
                dv = pb.sub_point(pa).mul_scalar(1.0 / (vb - va));
            }
        }

        (du, dv)
    }

    #[must_use]
    fn normal_at(&self, u: f64, v: f64) -> Option<Vec3> {
        let (du, dv) = self.partial_derivatives_at(u, v);
        du.cross(dv).normalized()
    }

    /// Second partial derivatives `(duu, duv, dvv)` by differencing the first
    /// derivatives with a wider step.
    #[must_use]
    fn second_partial_derivatives_at(&self, u: f64, v: f64) -> (Vec3, Vec3, Vec3) {
        let (u0, u1) = self.domain_u();
        let (v0, v1) = self.domain_v();
        let u = self.normalize_u(u);
        let v = self.normalize_v(v);

        let h_u = Tolerance::SECOND_DERIVATIVE.relative_to(u1 - u0);
        let h_v = Tolerance::SECOND_DERIVATIVE.relative_to(v1 - v0);

        let mut duu = Vec3::ZERO;
        let mut duv = Vec3::ZERO;
        let mut dvv = Vec3::ZERO;

        if h_u.is_finite() && h_u > 0.0 {
            let (ua, ub) = self.u_stencil(u, h_u);
            if ub > ua {
                let (du_a, dv_a) = self.partial_derivatives_at(ua, v);
                let (du_b, dv_b) = self.partial_derivatives_at(ub, v);
                duu = du_b.sub(du_a).mul_scalar(1.0 / (ub - ua));
                if h_v.is_finite() && h_v > 0.0 {
                    duv = dv_b.sub(dv_a).mul_scalar(1.0 / (ub - ua));
                }
            }
        }

        if h_v.is_finite() && h_v > 0.0 {
            let (va, vb) = self.v_stencil(v, h_v);
            if vb > va {
                let (_, dv_a) = self.partial_derivatives_at(u, va);
                let (_, dv_b) = self.partial_derivatives_at(u, vb);
                dvv = dv_b.sub(dv_a).mul_scalar(1.0 / (vb - va));
            }
        }

        (duu, duv, dvv)
    }

    #[doc(hidden)]
    fn normalize_u(&self, u: f64) -> f64 {
        let (u0, u1) = self.domain_u();
        if self.is_u_closed() {
            wrap_param(u, u0, u1)
        } else {
            u.clamp(u0, u1)
        }
    }

    #[doc(hidden)]
    fn normalize_v(&self, v: f64) -> f64 {
        let (v0, v1) = self.domain_v();
        if self.is_v_closed() {
            wrap_param(v, v0, v1)
        } else {
            v.clamp(v0, v1)
        }
    }

    #[doc(hidden)]
    fn u_stencil(&self, u: f64, h: f64) -> (f64, f64) {
        let (u0, u1) = self.domain_u();
        if self.is_u_closed() {
            (u - h, u + h)
        } else {
            ((u - h).max(u0), (u + h).min(u1))
        }
    }

    #[doc(hidden)]
    fn v_stencil(&self, v: f64, h: f64) -> (f64, f64) {
        let (v0, v1) = self.domain_v();
        if self.is_v_closed() {
            (v - h, v + h)
        } else {
            ((v - h).max(v0), (v + h).min(v1))
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaneSurface {
    pub origin: Point3,
    pub u_axis: Vec3,
    pub v_axis: Vec3,
}

impl PlaneSurface {
    #[must_use]
    pub const fn new(origin: Point3, u_axis: Vec3, v_axis: Vec3) -> Self {
        Self {
            origin,
            u_axis,
            v_axis,
        }
    }
}

impl Surface for PlaneSurface {
    fn point_at(&self, u: f64, v: f64) -> Point3 {
        self.origin
            .add_vec(self.u_axis.mul_scalar(u))
            .add_vec(self.v_axis.mul_scalar(v))
    }

    fn partial_derivatives_at(&self, _u: f64, _v: f64) -> (Vec3, Vec3) {
        (self.u_axis, self.v_axis)
    }

    fn normal_at(&self, _u: f64, _v: f64) -> Option<Vec3> {
        self.u_axis.cross(self.v_axis).normalized()
    }

    fn second_partial_derivatives_at(&self, _u: f64, _v: f64) -> (Vec3, Vec3, Vec3) {
        (Vec3::ZERO, Vec3::ZERO, Vec3::ZERO)
    }
}

/// Cylinder around `axis` starting at `base`; `u` runs around, `v` along the axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CylinderSurface {
    pub base: Point3,
    pub axis: Vec3,
    pub x_axis: Vec3,
    pub y_axis: Vec3,
    pub radius: f64,
}

impl CylinderSurface {
    pub fn new(base: Point3, axis: Vec3, radius: f64) -> Result<Self, String> {
        if !radius.is_finite() || radius <= 0.0 {
            return Err("cylinder radius must be finite and > 0".to_string());
        }

        let axis_dir = axis
            .normalized()
            .ok_or_else(|| "cylinder axis must be non-zero".to_string())?;
        let x_axis = orthogonal_unit_vector(axis_dir);
        let y_axis = axis_dir.cross(x_axis).normalized().unwrap_or(Vec3::Y);

        Ok(Self {
            base,
            axis,
            x_axis,
            y_axis,
            radius,
        })
    }
}

impl Surface for CylinderSurface {
    fn point_at(&self, u: f64, v: f64) -> Point3 {
        let u = wrap_param(u, 0.0, 1.0);
        let angle = std::f64::consts::TAU * u;
        let radial = self
            .x_axis
            .mul_scalar(angle.cos())
            .add(self.y_axis.mul_scalar(angle.sin()))
            .mul_scalar(self.radius);

        self.base.add_vec(self.axis.mul_scalar(v)).add_vec(radial)
    }

    fn is_u_closed(&self) -> bool {
        true
    }
}

/// Latitude/longitude sphere. `u` is longitude (closed), `v` runs from the
/// south pole (`v = 0`) to the north pole (`v = 1`), so `du × dv` points outward.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphereSurface {
    pub center: Point3,
    pub radius: f64,
}

impl SphereSurface {
    pub fn new(center: Point3, radius: f64) -> Result<Self, String> {
        if !radius.is_finite() || radius <= 0.0 {
            return Err("sphere radius must be finite and > 0".to_string());
        }
        Ok(Self { center, radius })
    }
}

impl Surface for SphereSurface {
    fn point_at(&self, u: f64, v: f64) -> Point3 {
        let u = wrap_param(u, 0.0, 1.0);
        let v = v.clamp(0.0, 1.0);

        let theta = std::f64::consts::TAU * u;
        let phi = std::f64::consts::PI * (v - 0.5);

        let (sin_phi, cos_phi) = phi.sin_cos();
        let (sin_theta, cos_theta) = theta.sin_cos();

        self.center.add_vec(
            Vec3::new(cos_phi * cos_theta, cos_phi * sin_theta, sin_phi).mul_scalar(self.radius),
        )
    }

    fn is_u_closed(&self) -> bool {
        true
    }

    fn normal_at(&self, u: f64, v: f64) -> Option<Vec3> {
        self.point_at(u, v).sub_point(self.center).normalized()
    }
}
