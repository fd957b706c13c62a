//! Drag-to-direction resolution.
//!
//! A drag between two cells rarely lands exactly on a lattice line. The
//! displacement is projected onto each of the six directions in the
//! Cartesian embedding, and the direction with the largest positive
//! projection wins. The projection, measured in unit steps of that
//! direction, is rounded to give the step count.

use crate::board::hex::{to_cartesian, Cell, Direction};

/// A resolved drag: the best-matching direction and how many unit steps to take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Resolution {
    pub direction: Direction,
    pub length: u32,
}

fn dot(a: (f64, f64), b: (f64, f64)) -> f64 {
    a.0 * b.0 + a.1 * b.1
}

/// Scalar projection of `(dx, dy)` onto `dir`, in unit steps of `dir`.
pub fn projection(dx: i32, dy: i32, dir: Direction) -> f64 {
    let d = to_cartesian(f64::from(dx), f64::from(dy));
    let (ux, uy) = dir.offset();
    let u = to_cartesian(f64::from(ux), f64::from(uy));
    dot(d, u) / dot(u, u)
}

/// Resolves a displacement in offset units to a lattice direction and length.
///
/// Returns `None` when no direction has a positive projection, which includes
/// the zero displacement. On equal projections the lower direction index is
/// kept, since a candidate only replaces the best on a strictly larger value.
pub fn resolve(dx: i32, dy: i32) -> Option<Resolution> {
    let mut best: Option<(Direction, f64)> = None;
    for dir in Direction::ALL {
        let p = projection(dx, dy, dir);
        if p > 0.0 && best.map_or(true, |(_, b)| p > b) {
            best = Some((dir, p));
        }
    }
    best.map(|(direction, p)| Resolution {
        direction,
        length: p.round() as u32,
    })
}

/// Resolves the drag from `origin` to `target`.
pub fn resolve_between(origin: Cell, target: Cell) -> Option<Resolution> {
    let (dx, dy) = origin.displacement_to(target);
    resolve(dx, dy)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_multiples_resolve_to_their_direction() {
        for dir in Direction::ALL {
            let (ux, uy) = dir.offset();
            for k in 1..=3 {
                let res = resolve(ux * k, uy * k);
                assert_eq!(
                    res,
                    Some(Resolution { direction: dir, length: k as u32 }),
                    "direction {:?} times {}",
                    dir,
                    k
                );
            }
        }
    }

    #[test]
    fn zero_displacement_has_no_direction() {
        assert_eq!(resolve(0, 0), None);
    }

    #[test]
    fn unit_projection_onto_itself() {
        for dir in Direction::ALL {
            let (ux, uy) = dir.offset();
            assert!((projection(ux, uy, dir) - 1.0).abs() < 1e-12);
            let (ox, oy) = dir.opposite().offset();
            assert!((projection(ox, oy, dir) + 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn ties_keep_the_lower_index() {
        // (1, -2) projects equally onto NorthWest and NorthEast.
        let nw = projection(1, -2, Direction::NorthWest);
        let ne = projection(1, -2, Direction::NorthEast);
        assert!((nw - ne).abs() < 1e-12);
        let res = resolve(1, -2).unwrap();
        assert_eq!(res.direction, Direction::NorthWest);
        assert_eq!(res.length, 2);
    }

    #[test]
    fn off_lattice_drag_snaps_to_nearest_step() {
        // Mostly east with a small south-east component.
        let res = resolve(3, 1).unwrap();
        assert_eq!(res.direction, Direction::East);
        assert_eq!(res.length, 4);
    }

    #[test]
    fn resolve_between_uses_target_minus_origin() {
        let res = resolve_between(Cell::new(7, 10), Cell::new(8, 10));
        assert_eq!(
            res,
            Some(Resolution {
                direction: Direction::East,
                length: 1
            })
        );
        let res = resolve_between(Cell::new(9, 9), Cell::new(9, 10));
        assert_eq!(res.map(|r| (r.direction.index(), r.length)), Some((5, 1)));
    }
}
