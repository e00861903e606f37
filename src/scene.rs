//! Scene state and the per-frame/per-scroll update rules.
//!
//! All animation in this crate is a handful of fixed increments applied to
//! euler angles plus two trigonometric orbits. The state is a plain value so
//! the update rules stay testable without a GPU.

use glam::{const_vec3, vec3, Vec3};
use rand::prelude::*;
use rand_pcg::Pcg64Mcg;

use crate::entity::{Camera, PointLight, Star, Transform};

pub const STAR_COUNT: usize = 400;
/// Each star coordinate is drawn uniformly from a range this wide, centered
/// at the origin.
pub const STAR_FIELD_SPREAD: f32 = 200.0;

pub const MOON_ORBIT_RADIUS: f32 = 15.0;
pub const VENUS_ORBIT_RADIUS: f32 = 25.0;
/// Both orbit angles advance by this much every frame.
pub const ORBIT_STEP: f32 = 0.005;

pub const TORUS_SPIN: Vec3 = const_vec3!([0.01, 0.005, 0.01]);
pub const PROFILE_CUBE_SPIN: Vec3 = const_vec3!([0.0005, 0.0005, 0.0005]);

/// Extra rotation applied to the moon and venus on every scroll event,
/// additive with the frame loop's own increments.
pub const SCROLL_BODY_SPIN: Vec3 = const_vec3!([0.05, 0.075, 0.05]);

pub const CAMERA_Z_PER_SCROLL: f32 = -0.01;
pub const CAMERA_X_PER_SCROLL: f32 = -0.0002;
pub const CAMERA_YAW_PER_SCROLL: f32 = -0.0002;

pub const TORUS_MAJOR_RADIUS: f32 = 8.0;
pub const TORUS_TUBE_RADIUS: f32 = 1.5;
pub const TORUS_COLOR: [f32; 3] = [0x34 as f32 / 255.0, 0x89 as f32 / 255.0, 0xeb as f32 / 255.0];
pub const PROFILE_CUBE_SIZE: f32 = 3.0;
pub const MOON_RADIUS: f32 = 3.0;
pub const VENUS_RADIUS: f32 = 5.0;
pub const STAR_RADIUS: f32 = 0.25;

pub const BACKGROUND_INTENSITY: f32 = 0.01;

/// Camera pose as a pure function of the scroll offset `t` (pixels from the
/// top). Returns (position, euler rotation); only yaw is ever driven.
pub fn camera_pose(t: f32) -> (Vec3, Vec3) {
    let position = vec3(t * CAMERA_X_PER_SCROLL, 0.0, t * CAMERA_Z_PER_SCROLL);
    let rotation = vec3(0.0, t * CAMERA_YAW_PER_SCROLL, 0.0);
    (position, rotation)
}

#[derive(Debug, Clone)]
pub struct SceneState {
    pub camera: Camera,
    pub torus: Transform,
    pub profile_cube: Transform,
    pub moon: Transform,
    pub venus: Transform,
    pub stars: Vec<Star>,
    pub light: PointLight,
    angle_moon: f32,
    angle_venus: f32,
}

impl SceneState {
    pub fn new(seed: u64) -> Self {
        let mut rng = Pcg64Mcg::seed_from_u64(seed);

        let stars = (0..STAR_COUNT)
            .map(|_| {
                let half = STAR_FIELD_SPREAD * 0.5;
                Star {
                    position: vec3(
                        rng.gen_range(-half..half),
                        rng.gen_range(-half..half),
                        rng.gen_range(-half..half),
                    ),
                }
            })
            .collect();

        let mut scene = Self {
            camera: Camera {
                position: vec3(-3.0, 0.0, 30.0),
                rotation: Vec3::ZERO,
                fov: 75.0,
                near: 0.1,
                far: 1000.0,
            },
            torus: Transform {
                position: Vec3::ZERO,
                rotation: Vec3::ZERO,
            },
            profile_cube: Transform {
                position: vec3(2.0, 0.0, -5.0),
                rotation: Vec3::ZERO,
            },
            moon: Transform {
                position: vec3(-10.0, 0.0, 30.0),
                rotation: Vec3::ZERO,
            },
            venus: Transform {
                position: vec3(10.0, 0.0, -30.0),
                rotation: Vec3::ZERO,
            },
            stars,
            light: PointLight {
                position: vec3(30.0, 5.0, 30.0),
                intensity: 5000.0,
            },
            angle_moon: 0.0,
            angle_venus: 0.0,
        };

        // The scroll mapping runs once at startup, so the constructed camera
        // position is immediately overridden by the t = 0 pose.
        scene.apply_scroll(0.0);
        scene
    }

    /// One tick of the refresh loop: fixed rotation increments plus the two
    /// orbits. The venus Y component reuses cosine; the diagonal-planar path
    /// that results is the intended behavior.
    pub fn advance_frame(&mut self) {
        self.torus.rotation += TORUS_SPIN;

        self.angle_moon += ORBIT_STEP;
        self.moon.position = vec3(
            MOON_ORBIT_RADIUS * self.angle_moon.cos(),
            MOON_ORBIT_RADIUS * self.angle_moon.sin(),
            MOON_ORBIT_RADIUS * self.angle_moon.sin(),
        );
        self.angle_venus += ORBIT_STEP;
        self.venus.position = vec3(
            VENUS_ORBIT_RADIUS * self.angle_venus.cos(),
            VENUS_ORBIT_RADIUS * self.angle_venus.cos(),
            VENUS_ORBIT_RADIUS * self.angle_venus.sin(),
        );

        self.moon.rotation.x += ORBIT_STEP;
        self.venus.rotation.z += ORBIT_STEP;

        self.profile_cube.rotation += PROFILE_CUBE_SPIN;
    }

    /// Scroll handler: the camera pose is a pure function of `t`, while the
    /// body rotations get a fixed bump per event on top of whatever the frame
    /// loop has accumulated.
    pub fn apply_scroll(&mut self, t: f32) {
        self.moon.rotation += SCROLL_BODY_SPIN;
        self.venus.rotation += SCROLL_BODY_SPIN;
        self.profile_cube.rotation.y += 0.01;
        self.profile_cube.rotation.z += 0.01;

        let (position, rotation) = camera_pose(t);
        self.camera.position = position;
        self.camera.rotation = rotation;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-4;

    fn assert_vec3_eq(a: Vec3, b: Vec3) {
        assert!((a - b).abs().max_element() < EPS, "{:?} != {:?}", a, b);
    }

    #[test]
    fn torus_rotation_accumulates_linearly() {
        let mut scene = SceneState::new(0);
        for _ in 0..240 {
            scene.advance_frame();
        }
        assert_vec3_eq(scene.torus.rotation, TORUS_SPIN * 240.0);
    }

    #[test]
    fn moon_orbit_is_circular_in_its_tilted_plane() {
        let mut scene = SceneState::new(0);
        for _ in 0..100 {
            scene.advance_frame();
        }
        let theta = ORBIT_STEP * 100.0;
        assert_vec3_eq(
            scene.moon.position,
            vec3(
                MOON_ORBIT_RADIUS * theta.cos(),
                MOON_ORBIT_RADIUS * theta.sin(),
                MOON_ORBIT_RADIUS * theta.sin(),
            ),
        );
    }

    #[test]
    fn venus_orbit_keeps_its_degenerate_cosine_y() {
        // X and Y stay equal on the venus path; that asymmetry is load-bearing
        // and must not be "corrected" into a circular orbit.
        let mut scene = SceneState::new(0);
        for _ in 0..100 {
            scene.advance_frame();
        }
        let theta = ORBIT_STEP * 100.0;
        assert_vec3_eq(
            scene.venus.position,
            vec3(
                VENUS_ORBIT_RADIUS * theta.cos(),
                VENUS_ORBIT_RADIUS * theta.cos(),
                VENUS_ORBIT_RADIUS * theta.sin(),
            ),
        );
        assert!((scene.venus.position.x - scene.venus.position.y).abs() < EPS);
    }

    #[test]
    fn camera_pose_is_pure_in_scroll_offset() {
        let t = 1234.5;
        let (position, rotation) = camera_pose(t);
        assert_vec3_eq(position, vec3(t * -0.0002, 0.0, t * -0.01));
        assert_vec3_eq(rotation, vec3(0.0, t * -0.0002, 0.0));

        // Repeated or interleaved scrolls must not leak hidden camera state.
        let mut scene = SceneState::new(7);
        scene.apply_scroll(900.0);
        scene.apply_scroll(100.0);
        scene.apply_scroll(t);
        assert_vec3_eq(scene.camera.position, position);
        assert_vec3_eq(scene.camera.rotation, rotation);
    }

    #[test]
    fn scroll_and_frame_loop_rotations_are_additive() {
        // Construction counts as one scroll event (apply_scroll(0) runs once),
        // then one more is fired between two frames.
        let mut scene = SceneState::new(0);
        scene.advance_frame();
        scene.apply_scroll(10.0);
        scene.advance_frame();
        assert_vec3_eq(
            scene.moon.rotation,
            vec3(ORBIT_STEP * 2.0, 0.0, 0.0) + SCROLL_BODY_SPIN * 2.0,
        );
        assert_vec3_eq(
            scene.profile_cube.rotation,
            PROFILE_CUBE_SPIN * 2.0 + vec3(0.0, 0.02, 0.02),
        );
    }

    #[test]
    fn star_field_has_400_stars_inside_the_spread() {
        let scene = SceneState::new(42);
        assert_eq!(scene.stars.len(), STAR_COUNT);
        let half = STAR_FIELD_SPREAD * 0.5;
        for star in &scene.stars {
            assert!(star.position.abs().max_element() < half);
        }
    }

    #[test]
    fn same_seed_reproduces_the_star_field() {
        let a = SceneState::new(99);
        let b = SceneState::new(99);
        assert_eq!(a.stars, b.stars);
    }

    #[test]
    fn fresh_scene_matches_the_documented_initial_pose() {
        let scene = SceneState::new(3);
        // apply_scroll(0) ran once at construction.
        assert_vec3_eq(scene.camera.position, Vec3::ZERO);
        assert_vec3_eq(scene.torus.position, Vec3::ZERO);
        assert_vec3_eq(scene.profile_cube.position, vec3(2.0, 0.0, -5.0));
        assert_vec3_eq(scene.moon.position, vec3(-10.0, 0.0, 30.0));
        assert_vec3_eq(scene.venus.position, vec3(10.0, 0.0, -30.0));
        assert_vec3_eq(scene.light.position, vec3(30.0, 5.0, 30.0));
        assert_vec3_eq(scene.moon.rotation, SCROLL_BODY_SPIN);
    }
}
