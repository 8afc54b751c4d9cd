use crate::vector::Vector3;

/// Orthogonal view frustum.
///
/// The frame `(origin, d_vector, u_vector, r_vector)` is right handed with unit-length
/// axes. The near face is the rectangle at distance `d_min` along `d_vector` with
/// half-widths `r_bound` and `u_bound`; the far face sits at `d_max` and is scaled by
/// [`Frustum3::d_ratio`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Frustum3 {
    pub origin: Vector3,
    pub d_vector: Vector3,
    pub u_vector: Vector3,
    pub r_vector: Vector3,
    pub d_min: f64,
    pub d_max: f64,
    pub u_bound: f64,
    pub r_bound: f64,
}

impl Frustum3 {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        origin: Vector3,
        d_vector: Vector3,
        u_vector: Vector3,
        r_vector: Vector3,
        d_min: f64,
        d_max: f64,
        u_bound: f64,
        r_bound: f64,
    ) -> Self {
        Self {
            origin,
            d_vector,
            u_vector,
            r_vector,
            d_min,
            d_max,
            u_bound,
            r_bound,
        }
    }

    /// `d_max / d_min`, the scale from the near face to the far face.
    pub fn d_ratio(&self) -> f64 {
        self.d_max / self.d_min
    }

    /// The eight vertices: near face first, then far face, each in the order
    /// `(-r,-u)`, `(+r,-u)`, `(+r,+u)`, `(-r,+u)`.
    pub fn vertices(&self) -> [Vector3; 8] {
        let d_scaled = self.d_vector * self.d_min;
        let u_scaled = self.u_vector * self.u_bound;
        let r_scaled = self.r_vector * self.r_bound;
        let ratio = self.d_ratio();

        let near = [
            d_scaled - u_scaled - r_scaled,
            d_scaled - u_scaled + r_scaled,
            d_scaled + u_scaled + r_scaled,
            d_scaled + u_scaled - r_scaled,
        ];

        let mut vertices = [Vector3::ZERO; 8];
        for (i, corner) in near.iter().enumerate() {
            vertices[i] = self.origin + *corner;
            vertices[i + 4] = self.origin + *corner * ratio;
        }
        vertices
    }
}
