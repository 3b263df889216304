//! Tests for dualquat module
//!
//! `DualQuat` is only used for skinning palettes so the tests focus on
//! getting rigid transforms in and out again.

use log::info;
use nalgebra_glm as glm;
use rhodora_runtime::dualquat::{self, DualQuat};
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

/// Verify a result is unit by multiplying by its conjugate
fn check_unit(dq: &DualQuat) {
    let unit = dualquat::mul(dq, &dualquat::conjugate(dq));
    let c = glm::quat_equal_eps(&unit.real, &glm::Quat::identity(), EPSILON);
    assert!(c.x && c.y && c.z && c.w);
    let c = glm::quat_equal_eps(
        &unit.dual,
        &glm::quat(0.0f32, 0.0f32, 0.0f32, 0.0f32),
        EPSILON,
    );
    assert!(c.x && c.y && c.z && c.w);
}

fn compare_mat4(m1: &glm::Mat4, m2: &glm::Mat4) {
    let c = glm::equal_columns_eps(m1, m2, EPSILON);
    assert!(c.x && c.y && c.z && c.w, "{m1} != {m2}");
}

fn test_rotation() -> glm::Quat {
    glm::quat_angle_axis(
        -1.491f32,
        &glm::vec3(0.620174f32, -0.248069f32, 0.744208f32),
    )
}

/// Tests `DualQuat::default`
#[test]
fn default() {
    // Identity dual quaternion has 1 for real.w with everything else 0
    let dq = DualQuat::default();
    assert_eq!(dq.real, glm::Quat::identity());
    assert_eq!(dq.dual, glm::quat(0.0f32, 0.0f32, 0.0f32, 0.0f32));
    compare_mat4(&dualquat::to_mat4(&dq), &glm::Mat4::identity());
}

/// Tests `DualQuat::new` and `decompose`
#[test]
fn new() {
    init_tests();

    let rot = test_rotation();
    let trans = glm::vec3(-3.0f32, 5.5f32, 0.25f32);
    let dq = DualQuat::new(&rot, &trans);
    info!("new dual quaternion {:?}", dq);
    check_unit(&dq);

    let (r, t) = dualquat::decompose(&dq);
    let c = glm::quat_equal_eps(&r, &rot, EPSILON);
    assert!(c.x && c.y && c.z && c.w);
    let c = glm::equal_eps(&t, &trans, EPSILON);
    assert!(c.x && c.y && c.z);
}

/// Tests `from_mat4` and `to_mat4`
#[test]
fn matrix_round_trip() {
    init_tests();

    let m = glm::translation(&glm::vec3(1.0f32, -2.0f32, 4.0f32))
        * glm::quat_to_mat4(&test_rotation());
    let dq = dualquat::from_mat4(&m);
    check_unit(&dq);
    compare_mat4(&dualquat::to_mat4(&dq), &m);
}

/// Scale does not survive conversion
#[test]
fn drops_scale() {
    let m = glm::translation(&glm::vec3(0.0f32, 3.0f32, 0.0f32))
        * glm::scaling(&glm::vec3(2.0f32, 2.0f32, 2.0f32));
    let dq = dualquat::from_mat4(&m);
    compare_mat4(
        &dualquat::to_mat4(&dq),
        &glm::translation(&glm::vec3(0.0f32, 3.0f32, 0.0f32)),
    );
}

/// Multiplying dual quaternions matches multiplying matrices
#[test]
fn mul() {
    let a = glm::translation(&glm::vec3(1.0f32, 0.0f32, 0.0f32))
        * glm::rotation(0.5f32, &glm::vec3(0.0f32, 0.0f32, 1.0f32));
    let b = glm::translation(&glm::vec3(0.0f32, 2.0f32, -1.0f32))
        * glm::quat_to_mat4(&test_rotation());
    let dq = dualquat::mul(&dualquat::from_mat4(&a), &dualquat::from_mat4(&b));
    check_unit(&dq);
    compare_mat4(&dualquat::to_mat4(&dq), &(a * b));
}

/// Tests conversion to the shader layout
#[test]
fn into_array() {
    let dq = DualQuat {
        real: glm::quat(1.0, 2.0, 3.0, 4.0),
        dual: glm::quat(5.0, 6.0, 7.0, 8.0),
    };
    let a: [[f32; 4]; 2] = dq.into();
    assert_eq!(a, [[1.0, 2.0, 3.0, 4.0], [5.0, 6.0, 7.0, 8.0]]);
}
