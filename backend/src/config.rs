//! Compile-time settings. There is no runtime configuration.

pub const TITLE: &str = "OpenGL Triangle";
pub const WIDTH: u32 = 800;
pub const HEIGHT: u32 = 600;

// SPIR-V shader binaries need GL 4.6
pub const GL_MAJOR: u8 = 4;
pub const GL_MINOR: u8 = 6;

pub const VERTEX_SPIRV: &str = "shaders/vertex.spv";
pub const FRAGMENT_SPIRV: &str = "shaders/fragment.spv";
pub const SHADER_ENTRY: &str = "main";

pub const CLEAR_COLOR: [f32; 4] = [0.2, 0.3, 0.3, 1.0];

#[derive(Debug, Clone)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub gl_version: (u8, u8),
    pub vsync: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: TITLE.to_string(),
            width: WIDTH,
            height: HEIGHT,
            gl_version: (GL_MAJOR, GL_MINOR),
            vsync: true,
        }
    }
}
