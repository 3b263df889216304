//! Tests for curve sampling through the public API

use log::info;
use nalgebra_glm as glm;
use rhodora_runtime::{
    animation::{
        ConvertibleCurve, CurveSampler, Interpolation, Keyframe,
        LinearSampler,
    },
    morph::SparseWeight8,
    RhError,
};
use std::sync::Once;

const EPSILON: f32 = 0.0001f32; // Small value for float comparisons
static INIT: Once = Once::new();

/// Initializes logging in a "once per test run" manner. Call at the start of
/// each test that needs logging.
fn init_tests() {
    INIT.call_once(|| {
        env_logger::init();
    });
}

fn compare_vec3(v1: &glm::Vec3, v2: &glm::Vec3) {
    let c = glm::equal_eps(v1, v2, EPSILON);
    assert!(c.x && c.y && c.z, "{v1} != {v2}");
}

fn vec3_sampler(interpolation: Interpolation) -> LinearSampler<glm::Vec3> {
    LinearSampler::new(
        vec![
            Keyframe::new(1.0, glm::vec3(0.0, 0.0, 0.0)),
            Keyframe::new(2.0, glm::vec3(4.0, -2.0, 8.0)),
            Keyframe::new(4.0, glm::vec3(4.0, 0.0, 0.0)),
        ],
        interpolation,
    )
    .unwrap()
}

/// Offsets outside the keys clamp to the first and last values
#[test]
fn clamping() {
    init_tests();
    for interpolation in [Interpolation::Step, Interpolation::Linear] {
        let s = vec3_sampler(interpolation);
        compare_vec3(&s.get_point(-5.0), &glm::vec3(0.0, 0.0, 0.0));
        compare_vec3(&s.get_point(1.0), &glm::vec3(0.0, 0.0, 0.0));
        compare_vec3(&s.get_point(4.0), &glm::vec3(4.0, 0.0, 0.0));
        compare_vec3(&s.get_point(100.0), &glm::vec3(4.0, 0.0, 0.0));
    }
}

#[test]
fn single_key() {
    for interpolation in [Interpolation::Step, Interpolation::Linear] {
        let s = LinearSampler::new(
            vec![Keyframe::new(0.5, glm::vec3(1.0, 2.0, 3.0))],
            interpolation,
        )
        .unwrap();
        for t in [-1.0f32, 0.0, 0.5, 0.7, 20.0] {
            compare_vec3(&s.get_point(t), &glm::vec3(1.0, 2.0, 3.0));
        }
    }
}

#[test]
fn linear_midpoint() {
    let s = vec3_sampler(Interpolation::Linear);
    compare_vec3(&s.get_point(1.5), &glm::vec3(2.0, -1.0, 4.0));
    compare_vec3(&s.get_point(3.0), &glm::vec3(4.0, -1.0, 4.0));
}

/// STEP holds the earlier key until the next one is reached
#[test]
fn step_never_blends() {
    let s = vec3_sampler(Interpolation::Step);
    compare_vec3(&s.get_point(1.999), &glm::vec3(0.0, 0.0, 0.0));
    compare_vec3(&s.get_point(2.0), &glm::vec3(4.0, -2.0, 8.0));
    compare_vec3(&s.get_point(3.9), &glm::vec3(4.0, -2.0, 8.0));
}

#[test]
fn rotation_midpoint() {
    init_tests();
    let axis = glm::vec3(0.0f32, 1.0, 0.0);
    let s = LinearSampler::new(
        vec![
            Keyframe::new(0.0, glm::quat_angle_axis(0.0, &axis)),
            Keyframe::new(1.0, glm::quat_angle_axis(glm::half_pi(), &axis)),
        ],
        Interpolation::Linear,
    )
    .unwrap();
    let q = s.get_point(0.5);
    info!("slerp midpoint {:?}", q);
    assert!((glm::quat_length(&q) - 1.0).abs() < EPSILON);
    let expected = glm::quat_angle_axis(glm::quarter_pi(), &axis);
    let c = glm::quat_equal_eps(&q, &expected, EPSILON);
    assert!(c.x && c.y && c.z && c.w);
}

/// Slerp takes the short way even when the keys are in opposite
/// hemispheres
#[test]
fn rotation_shortest_arc() {
    let axis = glm::vec3(0.0f32, 0.0, 1.0);
    let a = glm::quat_angle_axis(0.2, &axis);
    let b = -glm::quat_angle_axis(0.4, &axis);
    let s = LinearSampler::new(
        vec![Keyframe::new(0.0, a), Keyframe::new(1.0, b)],
        Interpolation::Linear,
    )
    .unwrap();
    let q = s.get_point(0.5);
    let expected = glm::quat_angle_axis(0.3, &axis);
    let same = glm::quat_equal_eps(&q, &expected, EPSILON);
    let negated = glm::quat_equal_eps(&-q, &expected, EPSILON);
    assert!(
        (same.x && same.y && same.z && same.w)
            || (negated.x && negated.y && negated.z && negated.w)
    );
}

#[test]
fn sparse_weights() {
    let s = LinearSampler::new(
        vec![
            Keyframe::new(0.0, SparseWeight8::from_pairs([(1, 1.0)])),
            Keyframe::new(2.0, SparseWeight8::from_pairs([(3, 1.0)])),
        ],
        Interpolation::Linear,
    )
    .unwrap();
    let w = s.get_point(0.5);
    assert!((w.weight(1) - 0.75).abs() < EPSILON);
    assert!((w.weight(3) - 0.25).abs() < EPSILON);
    assert!(w.weight(0).abs() < EPSILON);
}

#[test]
fn float_arrays() {
    let s = LinearSampler::new(
        vec![
            Keyframe::new(0.0, vec![0.0f32, 10.0, -1.0]),
            Keyframe::new(1.0, vec![1.0f32, 20.0, 1.0]),
        ],
        Interpolation::Linear,
    )
    .unwrap();
    let v = s.get_point(0.25);
    for (a, b) in v.iter().zip([0.25f32, 12.5, -0.5]) {
        assert!((a - b).abs() < EPSILON);
    }
}

#[test]
fn curve_views() {
    let step = vec3_sampler(Interpolation::Step);
    let linear = vec3_sampler(Interpolation::Linear);

    let keys = step.to_step_curve().unwrap();
    assert_eq!(keys.len(), 3);
    assert!((keys[1].0 - 2.0).abs() < EPSILON);
    assert_eq!(linear.to_linear_curve().unwrap().len(), 3);

    assert!(matches!(linear.to_step_curve(), Err(RhError::NotStepCurve)));
    assert!(matches!(step.to_linear_curve(), Err(RhError::NotLinearCurve)));
    assert!(matches!(step.to_spline_curve(), Err(RhError::SplineUnsupported)));
    assert!(matches!(
        linear.to_spline_curve(),
        Err(RhError::SplineUnsupported)
    ));
}

/// Segmenting a long curve gives exactly the same values
#[test]
fn fast_equals_full() {
    init_tests();
    let keys: Vec<_> = (0..40_u8)
        .map(|i| {
            let t = f32::from(i) * 0.37 + 0.2;
            Keyframe::new(t, glm::vec3(t.sin(), f32::from(i % 5), t * t))
        })
        .collect();
    for interpolation in [Interpolation::Step, Interpolation::Linear] {
        let full = LinearSampler::new(keys.clone(), interpolation).unwrap();
        for interval in [0.25f32, 1.0, 3.0, 100.0] {
            let fast = full.to_fast_sampler(interval).unwrap();
            assert_eq!(fast.max_degree(), full.max_degree());
            for i in 0..200_u8 {
                let t = f32::from(i).mul_add(0.0793, -1.0);
                compare_vec3(&fast.get_point(t), &full.get_point(t));
            }
        }
    }
}
