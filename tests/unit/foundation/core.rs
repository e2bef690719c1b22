use super::*;

#[test]
fn premul_rounding_matches_expected() {
    let c = Rgba8Premul::from_straight_rgba(255, 128, 0, 128);
    assert_eq!(c.a, 128);
    assert_eq!(c.r, 128);
    assert_eq!(c.g, 64);
    assert_eq!(c.b, 0);
}

#[test]
fn affine_uses_column_order_coefficients() {
    // (x, y) -> (a*x + c*y + e, b*x + d*y + f)
    let a = affine_from_matrix(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
    let p = a * Point::new(1.0, 1.0);
    assert_eq!(p, Point::new(1.0 + 3.0 + 5.0, 2.0 + 4.0 + 6.0));
}

#[test]
fn affine_rejects_bad_matrices() {
    assert!(affine_from_matrix(&[1.0, 0.0, 0.0, 1.0, 0.0]).is_none());
    assert!(affine_from_matrix(&[1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0]).is_none());
    assert!(affine_from_matrix(&[1.0, 0.0, f64::NAN, 1.0, 0.0, 0.0]).is_none());
}

#[test]
fn position_finiteness_and_conversion() {
    assert!(Position::new(1.0, -2.0).is_finite());
    assert!(!Position::new(f64::INFINITY, 0.0).is_finite());
    assert_eq!(Point::from(Position::new(3.0, 4.0)), Point::new(3.0, 4.0));
}
