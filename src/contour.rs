// Reference surface for the harmonic mean of precision and recall.
//
// The surface is independent of any experiment data. It is generated once
// (see `F1_SURFACE` in lib.rs) and drawn under both variant-type charts as
// a reading aid; nothing in the selection or filtering logic consumes it.

pub const GRID_RESOLUTION: usize = 100;
pub const COARSE_LEVELS: usize = 6;
pub const FINE_LEVELS: usize = 12;

/// Harmonic mean of two ratios. Undefined when both are zero, the only
/// point of the closed unit square where the formula degenerates.
pub fn f1_score(precision: f64, recall: f64) -> Option<f64> {
    let sum = precision + recall;
    if sum <= 0.0 {
        return None;
    }
    let f1 = 2.0 * precision * recall / sum;
    f1.is_finite().then_some(f1)
}

/// F1 values sampled on a `GRID_RESOLUTION`² lattice over the open unit
/// square, row-major in recall. Every sampled value is finite because the
/// lattice excludes the axes.
pub fn sample_grid() -> Vec<f64> {
    let n = GRID_RESOLUTION;
    let mut values = Vec::with_capacity(n * n);
    for row in 0..n {
        let recall = (row + 1) as f64 / (n + 1) as f64;
        for col in 0..n {
            let precision = (col + 1) as f64 / (n + 1) as f64;
            // Unreachable fallback: the open lattice never hits the origin.
            values.push(f1_score(precision, recall).unwrap_or(0.0));
        }
    }
    values
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IsoEmphasis {
    /// Primary reference, drawn solid.
    Coarse,
    /// Secondary reading aid, drawn dotted.
    Fine,
}

/// One iso-F1 polyline in `[x, y]` chart coordinates. The harmonic mean is
/// symmetric in its arguments, so the same polyline serves either axis
/// assignment.
#[derive(Clone, Debug, PartialEq)]
pub struct IsoLine {
    pub level: f64,
    pub emphasis: IsoEmphasis,
    pub points: Vec<[f64; 2]>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct F1Surface {
    pub isolines: Vec<IsoLine>,
}

impl F1Surface {
    /// Coarse levels at k/7 and fine levels at k/13, each traced from the
    /// closed form of the level set: `y = level·x / (2x − level)`, which
    /// stays inside the unit square exactly for `x ∈ [level/(2−level), 1]`.
    pub fn generate() -> Self {
        let mut isolines = Vec::with_capacity(COARSE_LEVELS + FINE_LEVELS);
        for k in 1..=COARSE_LEVELS {
            let level = k as f64 / (COARSE_LEVELS + 1) as f64;
            isolines.push(Self::trace(level, IsoEmphasis::Coarse));
        }
        for k in 1..=FINE_LEVELS {
            let level = k as f64 / (FINE_LEVELS + 1) as f64;
            isolines.push(Self::trace(level, IsoEmphasis::Fine));
        }
        Self { isolines }
    }

    fn trace(level: f64, emphasis: IsoEmphasis) -> IsoLine {
        let x_min = level / (2.0 - level);
        let mut points = Vec::with_capacity(GRID_RESOLUTION + 1);
        for step in 0..=GRID_RESOLUTION {
            let x = x_min + (1.0 - x_min) * step as f64 / GRID_RESOLUTION as f64;
            let y = level * x / (2.0 * x - level);
            points.push([x, y.clamp(0.0, 1.0)]);
        }
        IsoLine {
            level,
            emphasis,
            points,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_f1_score_edges() {
        assert_eq!(f1_score(0.0, 0.0), None);
        assert_eq!(f1_score(1.0, 1.0), Some(1.0));
        let f1 = f1_score(0.5, 1.0).unwrap();
        assert!((f1 - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_grid_is_finite_and_bounded() {
        let grid = sample_grid();
        assert_eq!(grid.len(), GRID_RESOLUTION * GRID_RESOLUTION);
        for value in grid {
            assert!(value.is_finite());
            assert!((0.0..=1.0).contains(&value));
        }
    }

    #[test]
    fn test_surface_is_deterministic() {
        assert_eq!(F1Surface::generate(), F1Surface::generate());
        assert_eq!(sample_grid(), sample_grid());
    }

    #[test]
    fn test_surface_shape() {
        let surface = F1Surface::generate();
        assert_eq!(surface.isolines.len(), COARSE_LEVELS + FINE_LEVELS);
        let coarse = surface
            .isolines
            .iter()
            .filter(|l| l.emphasis == IsoEmphasis::Coarse)
            .count();
        assert_eq!(coarse, COARSE_LEVELS);
        for line in &surface.isolines {
            assert!(line.level > 0.0 && line.level < 1.0);
            for [x, y] in &line.points {
                assert!((0.0..=1.0).contains(x));
                assert!((0.0..=1.0).contains(y));
                // Every traced point lies on its level set.
                let f1 = f1_score(*x, *y).unwrap();
                assert!((f1 - line.level).abs() < 1e-6);
            }
        }
    }
}
