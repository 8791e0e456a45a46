// Host-side tests for the camera choreographer and projection.

use glam::Vec3;
use spirit_core::*;

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-4
}

#[test]
fn fov_is_linear_in_bass() {
    assert_eq!(field_of_view(0.0), 75.0);
    assert!(approx(field_of_view(1.0), 85.0));
    for byte in [0u8, 17, 64, 128, 255] {
        let bass = bass_value(&[byte, 0, 0]);
        let pose = choreograph(12.5, bass);
        assert!(approx(pose.fov_degrees, 75.0 + bass * 10.0));
    }
}

#[test]
fn pose_is_pure_function_of_time_and_bass() {
    let a = choreograph(4.2, 0.3);
    let b = choreograph(4.2, 0.3);
    assert_eq!(a, b);
    assert_ne!(choreograph(4.3, 0.3).position, a.position);
}

#[test]
fn at_time_zero_camera_sits_on_offset() {
    // every lissajous term contains a sine of zero
    let pose = choreograph(0.0, 0.0);
    assert_eq!(pose.position, CAMERA_OFFSET);
    assert_eq!(pose.look_at, Vec3::ZERO);

    let loud = choreograph(0.0, 1.0);
    assert!(approx(loud.position.y, CAMERA_OFFSET.y + CAMERA_BASS_LIFT));
}

#[test]
fn position_matches_blended_curves() {
    let (t, bass) = (7.0, 0.5);
    let blend = lissajous(CAMERA_PRIMARY_FREQ, t) * 0.6 + lissajous(CAMERA_SECONDARY_FREQ, t) * 0.4;
    let radius = 25.0 + bass * 5.0;
    let expected = blend * radius + CAMERA_OFFSET + Vec3::Y * bass * CAMERA_BASS_LIFT;
    let pose = choreograph(t, bass);
    assert!((pose.position - expected).length() < 1e-4);
}

#[test]
fn look_at_stays_within_radius() {
    for step in 0..500 {
        let t = step as f32 * 0.37;
        let pose = choreograph(t, 1.0);
        // each component is a product of sin and cos, bounded by 1
        for c in pose.look_at.to_array() {
            assert!(c.abs() <= CAMERA_LOOK_RADIUS + 1e-5);
        }
        let unit = pose.position - CAMERA_OFFSET - Vec3::Y * CAMERA_BASS_LIFT;
        for c in unit.to_array() {
            assert!(c.abs() <= CAMERA_BASE_RADIUS + CAMERA_BASS_RADIUS + 1e-3);
        }
    }
}

#[test]
fn lissajous_components() {
    let f = Vec3::new(1.0, 2.0, 3.0);
    let t = 0.4_f32;
    let v = lissajous(f, t);
    assert!(approx(v.x, (1.0 * t).sin() * (2.0 * t).cos()));
    assert!(approx(v.y, (2.0 * t).sin() * (3.0 * t).cos()));
    assert!(approx(v.z, (3.0 * t).sin() * (1.0 * t).cos()));
}

#[test]
fn camera_applies_pose_and_viewport() {
    let mut cam = Camera::default();
    let pose = choreograph(3.0, 0.8);
    cam.apply(&pose);
    assert_eq!(cam.eye, pose.position);
    assert_eq!(cam.target, pose.look_at);
    assert!(approx(cam.fovy_radians.to_degrees(), pose.fov_degrees));

    cam.set_viewport(1920, 1080);
    assert!(approx(cam.aspect, 16.0 / 9.0));
    cam.set_viewport(800, 0);
    assert!(cam.aspect.is_finite());
}

#[test]
fn look_at_projects_to_screen_centre() {
    let mut cam = Camera::default();
    cam.apply(&choreograph(9.0, 0.2));
    cam.set_viewport(1280, 720);
    let clip = cam.view_proj() * cam.target.extend(1.0);
    let ndc = clip.truncate() / clip.w;
    assert!(ndc.x.abs() < 1e-4 && ndc.y.abs() < 1e-4);
    assert!(ndc.z > 0.0 && ndc.z < 1.0);
}

#[test]
fn mirror_matrix_reflects_across_plane() {
    let plane = MIRROR_LEVEL;
    let m = mirror_matrix(plane);
    let above = Vec3::new(2.0, plane + 3.0, -1.0);
    let image = m.transform_point3(above);
    assert!((image - Vec3::new(2.0, plane - 3.0, -1.0)).length() < 1e-5);
    // points on the plane stay put
    let on = Vec3::new(-4.0, plane, 7.0);
    assert!((m.transform_point3(on) - on).length() < 1e-5);
}

#[test]
fn mirrored_view_lines_up_on_the_water_plane() {
    let mut cam = Camera::default();
    cam.apply(&choreograph(5.0, 0.4));
    cam.set_viewport(1280, 720);
    let plane = MIRROR_LEVEL;

    let on_plane = Vec3::new(1.5, plane, -2.0);
    let direct = cam.view_proj() * on_plane.extend(1.0);
    let mirrored = cam.mirrored_view_proj(plane) * on_plane.extend(1.0);
    assert!((direct - mirrored).length() < 1e-3);

    // a shape above the water shows up where its reflection would be
    let shape = Vec3::new(0.0, 4.0, 0.0);
    let reflection = Vec3::new(0.0, 2.0 * plane - 4.0, 0.0);
    let a = cam.mirrored_view_proj(plane) * shape.extend(1.0);
    let b = cam.view_proj() * reflection.extend(1.0);
    assert!((a - b).length() < 1e-3);

    let eye = cam.mirrored_eye(plane);
    assert!((eye.y - (2.0 * plane - cam.eye.y)).abs() < 1e-5);
    assert_eq!((eye.x, eye.z), (cam.eye.x, cam.eye.z));
}
