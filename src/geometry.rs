//! Membrane shape predicates for the adjacency mask builder.
//!
//! A membrane is any `Fn(f32, f32) -> bool` over physical positions;
//! these constructors cover the stock drum shapes. Custom shapes plug
//! straight into `TriangularMesh::apply_mask`.

/// Axis-aligned rectangular membrane anchored at the origin.
pub fn rectangular_membrane(width: f32, height: f32) -> impl Fn(f32, f32) -> bool + Clone {
    move |x, y| x >= 0.0 && x < width && y >= 0.0 && y < height
}

/// Circular membrane of the given radius, centered at (radius, radius)
/// so the disc sits in the positive quadrant like the rectangle does.
pub fn circular_membrane(radius: f32) -> impl Fn(f32, f32) -> bool + Clone {
    move |x, y| {
        let dx = x - radius;
        let dy = y - radius;
        dx * dx + dy * dy <= radius * radius
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rectangle_is_closed_at_origin_open_at_the_far_edges() {
        let membrane = rectangular_membrane(10.0, 5.0);
        assert!(membrane(0.0, 0.0));
        assert!(membrane(9.9, 4.9));
        assert!(!membrane(10.0, 2.0));
        assert!(!membrane(2.0, 5.0));
        assert!(!membrane(-0.1, 2.0));
    }

    #[test]
    fn circle_contains_center_and_rim() {
        let membrane = circular_membrane(5.0);
        assert!(membrane(5.0, 5.0));
        assert!(membrane(10.0, 5.0));
        assert!(membrane(5.0, 0.0));
        assert!(!membrane(0.0, 0.0));
        assert!(!membrane(10.1, 5.0));
    }
}
