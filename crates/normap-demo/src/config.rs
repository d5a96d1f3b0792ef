//! Demo settings. Everything has a built-in default; only the asset
//! directory can be overridden, through `NORMAP_ASSET_DIR`.

use std::ffi::OsString;
use std::path::PathBuf;

use nalgebra::{Point3, Vector3};

pub const ASSET_DIR_ENV: &str = "NORMAP_ASSET_DIR";

const DEFAULT_ASSET_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/assets");

#[derive(Debug, Clone, PartialEq)]
pub struct DemoConfig {
    pub title: String,
    pub window_width: u32,
    pub window_height: u32,
    pub vsync: bool,
    pub asset_dir: PathBuf,
    pub vertex_shader: String,
    pub fragment_shader: String,
    pub diffuse_texture: String,
    pub normal_texture: String,
    pub clear_color: [f32; 4],
    pub camera_position: Point3<f32>,
    /// Spin of the quad around the world Y axis, in radians per second.
    pub rotation_speed: f32,
    pub light_position: Vector3<f32>,
    pub near_plane: f32,
    pub far_plane: f32,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            title: "Manual Normal Mapping".to_owned(),
            window_width: 640,
            window_height: 480,
            vsync: true,
            asset_dir: PathBuf::from(DEFAULT_ASSET_DIR),
            vertex_shader: "shader.vert".to_owned(),
            fragment_shader: "shader.frag".to_owned(),
            diffuse_texture: "brickwall.jpg".to_owned(),
            normal_texture: "brickwall_normal.jpg".to_owned(),
            clear_color: [0.2, 0.2, 0.2, 1.0],
            camera_position: Point3::new(0.0, 0.0, 5.0),
            rotation_speed: 0.5,
            light_position: Vector3::new(0.5, 1.0, 0.3),
            near_plane: 0.1,
            far_plane: 100.0,
        }
    }
}

impl DemoConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var_os(key))
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<OsString>) -> Self {
        let mut config = Self::default();
        if let Some(dir) = lookup(ASSET_DIR_ENV).filter(|dir| !dir.is_empty()) {
            config.asset_dir = PathBuf::from(dir);
        }
        config
    }

    pub fn asset(&self, name: &str) -> PathBuf {
        self.asset_dir.join(name)
    }

    pub fn vertex_shader_path(&self) -> PathBuf {
        self.asset(&self.vertex_shader)
    }

    pub fn fragment_shader_path(&self) -> PathBuf {
        self.asset(&self.fragment_shader)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_describe_the_brick_scene() {
        let config = DemoConfig::default();
        assert_eq!((config.window_width, config.window_height), (640, 480));
        assert_eq!(config.camera_position, Point3::new(0.0, 0.0, 5.0));
        assert!(config.vertex_shader_path().ends_with("assets/shader.vert"));
        assert!(config.fragment_shader_path().ends_with("assets/shader.frag"));
    }

    #[test]
    fn asset_dir_can_be_overridden() {
        let config = DemoConfig::from_lookup(|key| {
            (key == ASSET_DIR_ENV).then(|| OsString::from("/tmp/normap"))
        });
        assert_eq!(config.asset("brickwall.jpg"), PathBuf::from("/tmp/normap/brickwall.jpg"));
    }

    #[test]
    fn empty_override_is_ignored() {
        let config = DemoConfig::from_lookup(|_| Some(OsString::new()));
        assert_eq!(config.asset_dir, PathBuf::from(DEFAULT_ASSET_DIR));
    }

    #[test]
    fn bundled_shaders_exist() {
        let config = DemoConfig::default();
        assert!(config.vertex_shader_path().is_file());
        assert!(config.fragment_shader_path().is_file());
    }
}
