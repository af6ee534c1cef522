use std::fmt;

use nalgebra::{Matrix3, SMatrix, SVector, Vector3};
use serde::Deserialize;

use crate::error::{RectifyError, Result};

/// Minimum |sin| of the angle between two edges before three corners count as collinear
const COLLINEAR_TOLERANCE: f64 = 1e-6;

/// Homogeneous weights closer to zero than this map to infinity
const HOMOGENEOUS_EPSILON: f64 = 1e-12;

/// A point in source-image pixel space
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Point2D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.2}, {:.2})", self.x, self.y)
    }
}

/// Four corners ordered top-left, top-right, bottom-right, bottom-left.
///
/// The order is trusted as given; nothing here sorts or detects corners.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CornerSet([Point2D; 4]);

impl CornerSet {
    pub fn new(
        top_left: Point2D,
        top_right: Point2D,
        bottom_right: Point2D,
        bottom_left: Point2D,
    ) -> Self {
        Self([top_left, top_right, bottom_right, bottom_left])
    }

    pub fn points(&self) -> &[Point2D; 4] {
        &self.0
    }

    /// Reject corner sets in which any three points lie on one line.
    ///
    /// Coincident points fall under this check too. A self-intersecting
    /// quadrilateral still passes: it solves to a valid, if folded, homography.
    pub fn check_non_degenerate(&self) -> Result<()> {
        const TRIPLES: [(usize, usize, usize); 4] = [(0, 1, 2), (0, 1, 3), (0, 2, 3), (1, 2, 3)];

        for (i, j, k) in TRIPLES {
            let (a, b, c) = (self.0[i], self.0[j], self.0[k]);
            let (ux, uy) = (b.x - a.x, b.y - a.y);
            let (vx, vy) = (c.x - a.x, c.y - a.y);
            let cross = ux * vy - uy * vx;
            let scale = ux.hypot(uy) * vx.hypot(vy);

            if scale == 0.0 || cross.abs() <= COLLINEAR_TOLERANCE * scale {
                return Err(RectifyError::Transform(format!(
                    "corners {} {} {} are collinear or coincident",
                    a, b, c
                )));
            }
        }

        Ok(())
    }
}

impl TryFrom<Vec<Point2D>> for CornerSet {
    type Error = RectifyError;

    fn try_from(points: Vec<Point2D>) -> Result<Self> {
        let count = points.len();
        let points: [Point2D; 4] = points.try_into().map_err(|_| {
            RectifyError::CorrespondenceInput(format!(
                "expected exactly 4 corner points, got {}",
                count
            ))
        })?;
        Ok(Self(points))
    }
}

impl fmt::Display for CornerSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [tl, tr, br, bl] = &self.0;
        write!(f, "tl={} tr={} br={} bl={}", tl, tr, br, bl)
    }
}

/// Output rectangle the corners are mapped onto
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetRectangle {
    pub width: u32,
    pub height: u32,
}

impl TargetRectangle {
    /// Fixed output size of every rectification
    pub const CANONICAL: TargetRectangle = TargetRectangle {
        width: 1050,
        height: 1400,
    };

    /// Destination corners (0,0), (W,0), (W,H), (0,H)
    pub fn corners(&self) -> CornerSet {
        let (w, h) = (self.width as f64, self.height as f64);
        CornerSet::new(
            Point2D::new(0.0, 0.0),
            Point2D::new(w, 0.0),
            Point2D::new(w, h),
            Point2D::new(0.0, h),
        )
    }
}

impl Default for TargetRectangle {
    fn default() -> Self {
        Self::CANONICAL
    }
}

/// A 3x3 projective transform normalized so that h33 = 1
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Homography {
    matrix: Matrix3<f64>,
}

impl Homography {
    /// Solve the homography that maps each `src` corner exactly onto its `dst` corner.
    ///
    /// With four correspondences and h33 fixed to 1 the eight remaining
    /// coefficients are the solution of an 8x8 linear system:
    ///
    /// u = (h11 x + h12 y + h13) / (h31 x + h32 y + 1)
    /// v = (h21 x + h22 y + h23) / (h31 x + h32 y + 1)
    pub fn from_correspondences(src: &CornerSet, dst: &CornerSet) -> Result<Self> {
        let mut a = SMatrix::<f64, 8, 8>::zeros();
        let mut b = SVector::<f64, 8>::zeros();

        for (i, (s, d)) in src.points().iter().zip(dst.points()).enumerate() {
            a[(i, 0)] = s.x;
            a[(i, 1)] = s.y;
            a[(i, 2)] = 1.0;
            a[(i, 6)] = -s.x * d.x;
            a[(i, 7)] = -s.y * d.x;
            b[i] = d.x;

            a[(i + 4, 3)] = s.x;
            a[(i + 4, 4)] = s.y;
            a[(i + 4, 5)] = 1.0;
            a[(i + 4, 6)] = -s.x * d.y;
            a[(i + 4, 7)] = -s.y * d.y;
            b[i + 4] = d.y;
        }

        let h = a.lu().solve(&b).ok_or_else(|| {
            RectifyError::Transform("correspondence system is singular".to_string())
        })?;

        if h.iter().any(|v| !v.is_finite()) {
            return Err(RectifyError::Transform(
                "homography has non-finite coefficients".to_string(),
            ));
        }

        #[rustfmt::skip]
        let matrix = Matrix3::new(
            h[0], h[1], h[2],
            h[3], h[4], h[5],
            h[6], h[7], 1.0,
        );

        Ok(Self { matrix })
    }

    pub fn from_matrix(matrix: Matrix3<f64>) -> Self {
        Self { matrix }
    }

    pub fn matrix(&self) -> &Matrix3<f64> {
        &self.matrix
    }

    /// Inverse transform, used to pull destination pixels back into the source
    pub fn inverse(&self) -> Result<Self> {
        self.matrix
            .try_inverse()
            .map(|matrix| Self { matrix })
            .ok_or_else(|| RectifyError::Transform("homography is not invertible".to_string()))
    }

    /// Map a point; `None` when it lands on the line at infinity
    pub fn map(&self, x: f64, y: f64) -> Option<(f64, f64)> {
        let p = self.matrix * Vector3::new(x, y, 1.0);
        if p.z.abs() < HOMOGENEOUS_EPSILON {
            return None;
        }
        Some((p.x / p.z, p.y / p.z))
    }
}

impl fmt::Display for Homography {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..3 {
            if row > 0 {
                writeln!(f)?;
            }
            write!(
                f,
                "[{:12.6}, {:12.6}, {:12.6}]",
                self.matrix[(row, 0)],
                self.matrix[(row, 1)],
                self.matrix[(row, 2)]
            )?;
        }
        Ok(())
    }
}
