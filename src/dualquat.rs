use nalgebra_glm as glm;

/// Dual quaternion for a rigid transform (rotation and translation only)
///
/// Joint palettes are converted to this form for dual quaternion skinning.
/// Any scale in a matrix passed to `from_mat4` is lost.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DualQuat {
    pub real: glm::Quat,
    pub dual: glm::Quat,
}

impl Default for DualQuat {
    fn default() -> Self {
        Self {
            // Real part contains the rotation
            real: glm::quat(0.0, 0.0, 0.0, 1.0),
            // Dual part contains the translation but is also effected by
            // the rotation
            dual: glm::quat(0.0, 0.0, 0.0, 0.0),
        }
    }
}

/// Conversion to GLSL shader ready mat2x4
impl From<DualQuat> for [[f32; 4]; 2] {
    fn from(dq: DualQuat) -> [[f32; 4]; 2] {
        [
            [
                dq.real.coords.x,
                dq.real.coords.y,
                dq.real.coords.z,
                dq.real.coords.w,
            ],
            [
                dq.dual.coords.x,
                dq.dual.coords.y,
                dq.dual.coords.z,
                dq.dual.coords.w,
            ],
        ]
    }
}

impl DualQuat {
    /// Creates a unit dual quaternion from a rotation followed by a
    /// translation
    #[must_use]
    pub fn new(rotation: &glm::Quat, translation: &glm::Vec3) -> Self {
        let real = glm::quat_normalize(rotation);
        let pure = glm::quat(translation.x, translation.y, translation.z, 0.0);
        Self {
            real,
            dual: pure * real * 0.5f32,
        }
    }
}

#[must_use]
pub fn mul(q1: &DualQuat, q2: &DualQuat) -> DualQuat {
    DualQuat {
        real: q1.real * q2.real,
        dual: q1.real * q2.dual + q1.dual * q2.real,
    }
}

#[must_use]
pub fn conjugate(q: &DualQuat) -> DualQuat {
    DualQuat {
        real: q.real.conjugate(),
        dual: q.dual.conjugate(),
    }
}

/// Splits a unit dual quaternion into rotation and translation
#[must_use]
pub fn decompose(dq: &DualQuat) -> (glm::Quat, glm::Vec3) {
    // t = 2 * d * conj(r)
    let t = dq.dual * dq.real.conjugate() * 2.0f32;
    (dq.real, glm::vec3(t.coords.x, t.coords.y, t.coords.z))
}

/// Creates a dual quaternion from the rotation and translation parts of a
/// matrix
#[must_use]
pub fn from_mat4(m: &glm::Mat4) -> DualQuat {
    let rot = nalgebra::Rotation3::from_matrix(&glm::mat4_to_mat3(m));
    let q = nalgebra::UnitQuaternion::from_rotation_matrix(&rot);
    let trans = glm::vec3(m[(0, 3)], m[(1, 3)], m[(2, 3)]);
    DualQuat::new(q.quaternion(), &trans)
}

#[must_use]
pub fn to_mat4(dq: &DualQuat) -> glm::Mat4 {
    let (rot, trans) = decompose(dq);
    glm::translation(&trans) * glm::quat_to_mat4(&rot)
}
