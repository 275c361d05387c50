use nalgebra::{Unit, Vector3};

pub fn reject(u: &Vector3<f64>, v: &Vector3<f64>) -> Vector3<f64> {
    // Computes the vector rejection of u from v. v must be non-zero.
    let u_proj_v = u.dot(v) * v / v.norm_squared();
    u - u_proj_v
}

/// Returns the direction of prograde motion for a circular orbit, given the
/// radius vector (from the attractor to the body) and the orbit normal.
///
/// With `up` along z and `radial` along x, this is the y axis, so the orbit
/// runs counter-clockwise when viewed from above.
///
/// If `radial` is (nearly) parallel to `up`, the orbit plane is ill-defined.
/// In that case we tilt the plane so that it contains the x axis, and if that
/// is ill-defined too, the y axis.
pub fn prograde_direction(
    radial: &Vector3<f64>,
    up: &Vector3<f64>,
    tolerance: f64,
) -> Unit<Vector3<f64>> {
    let tangent = up.cross(radial);
    if tangent.norm() >= tolerance {
        return Unit::new_normalize(tangent);
    }

    let mut fallback_up = reject(&Vector3::y(), radial);
    if fallback_up.norm() < tolerance {
        fallback_up = reject(&Vector3::x(), radial);
    }
    Unit::new_normalize(fallback_up.cross(radial))
}
