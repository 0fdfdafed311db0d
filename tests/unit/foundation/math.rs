use super::*;

#[test]
fn mul_div255_rounds() {
    assert_eq!(mul_div255_u16(255, 255), 255);
    assert_eq!(mul_div255_u16(128, 255), 128);
    assert_eq!(mul_div255_u16(0, 200), 0);
}

#[test]
fn clamp_maps_nan_to_lower_bound() {
    assert_eq!(clamp_f64(f64::NAN, 0.1, 10.0), 0.1);
    assert_eq!(clamp_f64(42.0, 0.1, 10.0), 10.0);
    assert_eq!(clamp_f64(-1.0, 0.1, 10.0), 0.1);
}

#[test]
fn round_tenths_removes_float_drift() {
    let mut v = 1.0;
    for _ in 0..3 {
        v += 0.1;
    }
    assert_eq!(round_tenths(v), 1.3);
}
