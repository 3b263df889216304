use nalgebra_glm as glm;

/// Local transform decomposed into scale, rotation and translation.
///
/// The matrix form applies scale first, then rotation, then translation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub scale: glm::Vec3,
    pub rotation: glm::Quat,
    pub translation: glm::Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            scale: glm::vec3(1.0f32, 1.0f32, 1.0f32),
            rotation: glm::Quat::identity(),
            translation: glm::Vec3::zeros(),
        }
    }
}

impl Transform {
    #[must_use]
    pub const fn new(
        scale: glm::Vec3,
        rotation: glm::Quat,
        translation: glm::Vec3,
    ) -> Self {
        Self {
            scale,
            rotation,
            translation,
        }
    }

    #[must_use]
    pub fn from_translation(translation: glm::Vec3) -> Self {
        Self {
            translation,
            ..Default::default()
        }
    }

    /// Converts to a matrix (T * R * S)
    #[must_use]
    pub fn to_mat4(&self) -> glm::Mat4 {
        let m = glm::translation(&self.translation);
        let m = m * glm::quat_to_mat4(&glm::quat_normalize(&self.rotation));
        glm::scale(&m, &self.scale)
    }

    /// Weighted blend of several transforms.
    ///
    /// Scale and translation are weighted sums. Rotations are summed after
    /// being flipped into the same hemisphere as the first one, then
    /// normalized. Weights are expected to sum to 1. An empty slice or a
    /// rotation sum of zero length gives the identity rotation.
    #[must_use]
    pub fn blend(items: &[(Self, f32)]) -> Self {
        let Some((first, _)) = items.first() else {
            return Self::default();
        };

        let mut scale = glm::Vec3::zeros();
        let mut translation = glm::Vec3::zeros();
        let mut rotation = glm::quat(0.0f32, 0.0f32, 0.0f32, 0.0f32);
        for (xform, weight) in items {
            scale += xform.scale * *weight;
            translation += xform.translation * *weight;
            let r = if glm::quat_dot(&first.rotation, &xform.rotation)
                < 0.0f32
            {
                -xform.rotation
            } else {
                xform.rotation
            };
            rotation += r * *weight;
        }

        let rotation = if glm::quat_length(&rotation) > f32::EPSILON {
            glm::quat_normalize(&rotation)
        } else {
            glm::Quat::identity()
        };

        Self {
            scale,
            rotation,
            translation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Transform;
    use nalgebra_glm as glm;

    const EPSILON: f32 = 0.0001;

    #[test]
    fn to_mat4_order() {
        let xform = Transform::new(
            glm::vec3(2.0, 2.0, 2.0),
            glm::quat_angle_axis(
                std::f32::consts::FRAC_PI_2,
                &glm::vec3(0.0, 0.0, 1.0),
            ),
            glm::vec3(10.0, 0.0, 0.0),
        );
        let m = xform.to_mat4();
        // Scale then rotate X onto Y then translate
        let p = m * glm::vec4(1.0, 0.0, 0.0, 1.0);
        let c = glm::equal_eps(&p.xyz(), &glm::vec3(10.0, 2.0, 0.0), EPSILON);
        assert!(c.x && c.y && c.z);
    }

    #[test]
    fn blend_halfway() {
        let a = Transform::from_translation(glm::vec3(0.0, 0.0, 0.0));
        let b = Transform::new(
            glm::vec3(3.0, 3.0, 3.0),
            glm::quat_angle_axis(1.0, &glm::vec3(0.0, 1.0, 0.0)),
            glm::vec3(4.0, 0.0, 0.0),
        );
        let c = Transform::blend(&[(a, 0.5), (b, 0.5)]);
        let e = glm::equal_eps(&c.translation, &glm::vec3(2.0, 0.0, 0.0), EPSILON);
        assert!(e.x && e.y && e.z);
        let e = glm::equal_eps(&c.scale, &glm::vec3(2.0, 2.0, 2.0), EPSILON);
        assert!(e.x && e.y && e.z);
        assert!((glm::quat_length(&c.rotation) - 1.0).abs() < EPSILON);
        assert!((glm::quat_angle(&c.rotation) - 0.5).abs() < 0.001);
    }

    #[test]
    fn blend_opposite_hemisphere() {
        // q and -q are the same rotation and must not cancel out
        let q = glm::quat_angle_axis(0.3, &glm::vec3(1.0, 0.0, 0.0));
        let a = Transform::new(glm::vec3(1.0, 1.0, 1.0), q, glm::Vec3::zeros());
        let b = Transform { rotation: -q, ..a };
        let c = Transform::blend(&[(a, 0.5), (b, 0.5)]);
        let d = glm::quat_dot(&c.rotation, &q).abs();
        assert!((d - 1.0).abs() < EPSILON);
    }
}
