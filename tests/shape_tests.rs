// Host-side tests for the shape field animator.

use spirit_core::*;

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-5
}

#[test]
fn scale_factor_stays_in_range_for_every_byte() {
    for v in 0..=255u8 {
        let f = scale_factor(v as f32 / SAMPLE_NORM);
        assert!(
            (MIN_SCALE..=MAX_SCALE).contains(&f),
            "value {v} gave factor {f}"
        );
    }
}

#[test]
fn scale_factor_endpoints() {
    assert_eq!(scale_factor(0.0), MIN_SCALE);
    assert!(approx(scale_factor(1.0), 1.2));
    assert!(approx(scale_factor(0.5), 1.0));
}

#[test]
fn base_scale_shrinks_with_index() {
    let n = SHAPE_COUNT;
    assert!(approx(base_scale(0, n), 0.8));
    for i in 1..n {
        assert!(base_scale(i, n) < base_scale(i - 1, n), "not decreasing at {i}");
    }
    assert!(base_scale(n - 1, n) > 0.4);
}

#[test]
fn sample_bin_repeats_when_shapes_outnumber_bins() {
    assert_eq!(sample_bin(0, 180, 128), 0);
    assert_eq!(sample_bin(179, 180, 128), 127);
    // 180 shapes over 128 bins: some neighbours share a bin
    let shared = (1..180).any(|i| sample_bin(i, 180, 128) == sample_bin(i - 1, 180, 128));
    assert!(shared);
    // more bins than shapes: bins are skipped, never out of range
    for i in 0..10 {
        assert!(sample_bin(i, 10, 128) < 128);
    }
}

#[test]
fn silence_gives_base_scale_times_min() {
    let mut field = ShapeField::new(SHAPE_COUNT, 7);
    field.update(&[0u8; 128], 0.0);
    for s in &field.shapes {
        assert!(approx(s.scale, s.base_scale * 0.8), "shape {}", s.index);
        assert!(approx(s.outline_scale, 1.0 / 0.8));
    }
}

#[test]
fn full_level_gives_max_scale_factor() {
    let mut field = ShapeField::new(SHAPE_COUNT, 7);
    field.update(&[128u8; 128], 0.0);
    for s in &field.shapes {
        assert!(approx(s.scale / s.base_scale, 1.2));
        assert!(approx(s.scale * s.outline_scale, s.base_scale));
    }
}

#[test]
fn rotation_strictly_increases_each_update() {
    let mut field = ShapeField::new(16, 3);
    let samples = [64u8; 128];
    field.update(&samples, 0.0);
    let before: Vec<_> = field.shapes.iter().map(|s| s.rotation).collect();
    field.update(&samples, FLOAT_TIME_STEP);
    for (s, prev) in field.shapes.iter().zip(before) {
        assert!(s.rotation.x > prev.x);
        assert!(s.rotation.y > prev.y);
        assert!(s.rotation.z > prev.z);
    }
}

#[test]
fn rotation_follows_axis_ratios() {
    let mut field = ShapeField::new(1, 3);
    field.update(&[], 0.0);
    let r = field.shapes[0].rotation;
    assert!(approx(r.y / r.x, 0.7));
    assert!(approx(r.z / r.x, 0.5));
}

#[test]
fn original_y_is_captured_once() {
    let mut field = ShapeField::new(32, 11);
    assert!(field.shapes.iter().all(|s| s.original_y().is_none()));

    field.update(&[0u8; 128], 0.0);
    let captured: Vec<_> = field.shapes.iter().map(|s| s.original_y()).collect();
    for (s, y) in field.shapes.iter().zip(&captured) {
        assert_eq!(*y, Some(s.home.y));
    }

    let mut elapsed = 0.0;
    for level in [255u8, 30, 200, 128] {
        elapsed += 0.37;
        field.update(&[level; 128], elapsed);
        let now: Vec<_> = field.shapes.iter().map(|s| s.original_y()).collect();
        assert_eq!(now, captured);
    }
}

#[test]
fn float_offset_is_added_to_original_y() {
    let mut field = ShapeField::new(8, 5);
    let elapsed = 1.25;
    field.update(&[100u8; 128], elapsed);
    let value = 100.0 / SAMPLE_NORM;
    for s in &field.shapes {
        let expected = s.home.y + float_offset(elapsed, s.index, value);
        assert!(approx(s.position.y, expected));
        assert_eq!(s.position.x, s.home.x);
        assert_eq!(s.position.z, s.home.z);
    }
}

#[test]
fn float_offset_vanishes_in_silence() {
    for i in 0..20 {
        assert_eq!(float_offset(3.3, i, 0.0), 0.0);
    }
    let peak = float_offset(0.0, 0, 1.0);
    assert!(peak.abs() <= FLOAT_AMPLITUDE);
}

#[test]
fn same_seed_same_layout() {
    let a = ShapeField::new(50, 99);
    let b = ShapeField::new(50, 99);
    let c = ShapeField::new(50, 100);
    let homes = |f: &ShapeField| f.shapes.iter().map(|s| s.home).collect::<Vec<_>>();
    assert_eq!(homes(&a), homes(&b));
    assert_ne!(homes(&a), homes(&c));
}

#[test]
fn spawn_heights_within_range() {
    let field = ShapeField::new(SHAPE_COUNT, 1);
    let half = SHAPE_HEIGHT_RANGE * 0.5;
    for s in &field.shapes {
        assert!(s.home.y >= -half && s.home.y <= half);
    }
}

#[test]
fn colors_cycle_through_palette() {
    let field = ShapeField::new(PASTEL_COLORS.len() + 1, 1);
    assert_eq!(field.shapes[0].color, field.shapes[PASTEL_COLORS.len()].color);
    assert_eq!(field.shapes[0].color, hex_to_linear_rgb(PASTEL_COLORS[0]));
}

#[test]
fn outline_instances_are_black_and_parented() {
    let mut field = ShapeField::new(4, 2);
    field.update(&[200u8; 128], 0.5);
    let cubes = shape_instances(&field);
    let edges = outline_instances(&field);
    assert_eq!(cubes.len(), 4);
    assert_eq!(edges.len(), 4);
    for (e, s) in edges.iter().zip(&field.shapes) {
        assert_eq!(e.color, [0.0, 0.0, 0.0, 1.0]);
        // outline scale cancels the audio factor: net scale is the base scale
        let m = glam::Mat4::from_cols_array_2d(&e.model);
        let (scale, _, translation) = m.to_scale_rotation_translation();
        assert!(approx(scale.x, s.base_scale));
        assert!((translation - s.position).length() < 1e-4);
    }
}
