use glam::{EulerRot, Mat4, Quat, Vec3};

/// Position plus accumulated euler rotation. Rotation angles grow without
/// bound; the trigonometry downstream is periodic so no wraparound is done.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Vec3,
}

impl Transform {
    pub fn matrix(&self) -> Mat4 {
        let rotation = Quat::from_euler(
            EulerRot::XYZ,
            self.rotation.x,
            self.rotation.y,
            self.rotation.z,
        );
        Mat4::from_translation(self.position) * Mat4::from_quat(rotation)
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pub rotation: Vec3,
    pub fov: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    pub fn view_matrix(&self) -> Mat4 {
        let rotation = Quat::from_euler(
            EulerRot::XYZ,
            self.rotation.x,
            self.rotation.y,
            self.rotation.z,
        );
        (Mat4::from_translation(self.position) * Mat4::from_quat(rotation)).inverse()
    }

    pub fn view_projection(&self, aspect_ratio: f32) -> Mat4 {
        let proj = Mat4::perspective_rh(self.fov.to_radians(), aspect_ratio, self.near, self.far);
        proj * self.view_matrix()
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct PointLight {
    pub position: Vec3,
    pub intensity: f32,
}

#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct Star {
    pub position: Vec3,
}
