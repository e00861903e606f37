//! Texture loading with explicit results.
//!
//! Every texture lives at a fixed relative path. A failed load is surfaced to
//! the caller as a value rather than swallowed, but the rendering policy on
//! failure stays "draw with the fallback material".

use image::RgbaImage;
use log::{info, warn};

pub const SPACE_TEXTURE_PATH: &str = "assets/space.jpg";
pub const PROFILE_TEXTURE_PATH: &str = "assets/profile.jpg";
pub const MOON_TEXTURE_PATH: &str = "assets/moon.jpg";
pub const MOON_NORMAL_TEXTURE_PATH: &str = "assets/normal.jpg";
pub const VENUS_TEXTURE_PATH: &str = "assets/venus.jpg";
pub const VENUS_NORMAL_TEXTURE_PATH: &str = "assets/venus_normal.jpg";

#[derive(Debug)]
pub enum TextureLoad {
    Loaded(RgbaImage),
    Failed {
        path: &'static str,
        error: image::ImageError,
    },
}

impl TextureLoad {
    pub fn image(&self) -> Option<&RgbaImage> {
        match self {
            TextureLoad::Loaded(image) => Some(image),
            TextureLoad::Failed { .. } => None,
        }
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, TextureLoad::Loaded(_))
    }
}

pub fn load_texture(path: &'static str) -> TextureLoad {
    match image::open(path) {
        Ok(image) => {
            let image = image.to_rgba8();
            info!("Loaded {} ({}x{})", path, image.width(), image.height());
            TextureLoad::Loaded(image)
        }
        Err(error) => {
            warn!("Failed to load {}, rendering without it: {}", path, error);
            TextureLoad::Failed { path, error }
        }
    }
}

/// Every texture the scene references, loaded up front.
#[derive(Debug)]
pub struct SceneAssets {
    pub space: TextureLoad,
    pub profile: TextureLoad,
    pub moon: TextureLoad,
    pub moon_normal: TextureLoad,
    pub venus: TextureLoad,
    pub venus_normal: TextureLoad,
}

impl SceneAssets {
    pub fn load() -> Self {
        Self {
            space: load_texture(SPACE_TEXTURE_PATH),
            profile: load_texture(PROFILE_TEXTURE_PATH),
            moon: load_texture(MOON_TEXTURE_PATH),
            moon_normal: load_texture(MOON_NORMAL_TEXTURE_PATH),
            venus: load_texture(VENUS_TEXTURE_PATH),
            venus_normal: load_texture(VENUS_NORMAL_TEXTURE_PATH),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_failed_not_panic() {
        let load = load_texture("assets/does_not_exist.jpg");
        assert!(!load.is_loaded());
        assert!(load.image().is_none());
        match load {
            TextureLoad::Failed { path, .. } => {
                assert_eq!(path, "assets/does_not_exist.jpg");
            }
            TextureLoad::Loaded(_) => unreachable!(),
        }
    }
}
