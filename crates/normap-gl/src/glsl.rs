//! GLSL version detection utilities.

use std::ffi::CStr;
use std::fmt;

/// A shading language version as reported by `GL_SHADING_LANGUAGE_VERSION`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlslVersion {
    pub major: u32,
    pub minor: u32,
    /// OpenGL ES shading language.
    pub es: bool,
}

/// Version the demo shaders are written against (`#version 330 core`).
pub const REQUIRED_GLSL: GlslVersion = GlslVersion {
    major: 3,
    minor: 30,
    es: false,
};

impl GlslVersion {
    /// The number used in a `#version` directive, e.g. `330`.
    pub fn directive_number(self) -> u32 {
        self.major * 100 + self.minor
    }

    /// Whether sources written for `required` compile under this version.
    pub fn supports(self, required: GlslVersion) -> bool {
        self.es == required.es && self.directive_number() >= required.directive_number()
    }
}

impl fmt::Display for GlslVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.es {
            write!(f, "{} es", self.directive_number())
        } else {
            write!(f, "{} core", self.directive_number())
        }
    }
}

/// Parse a driver version string such as `"4.60 NVIDIA"` or
/// `"OpenGL ES GLSL ES 3.00"`.
///
/// Vendor text before and after the number is ignored. Returns `None` if no
/// `major.minor` token is present.
pub fn parse_glsl_version(version: &str) -> Option<GlslVersion> {
    let es = version.contains("ES");
    version.split_whitespace().find_map(|token| {
        let (major, minor) = token.split_once('.')?;
        let major = major.parse().ok()?;
        let minor: String = minor.chars().take_while(char::is_ascii_digit).collect();
        // "3.3" and "3.30" name the same version.
        let minor = match minor.len() {
            0 => return None,
            1 => minor.parse::<u32>().ok()? * 10,
            _ => minor[..2].parse().ok()?,
        };
        Some(GlslVersion { major, minor, es })
    })
}

/// Query the current context's shading language version.
///
/// # Safety
///
/// GL function pointers must be loaded and a context must be current.
pub unsafe fn current_glsl_version() -> Option<GlslVersion> {
    let raw = gl::GetString(gl::SHADING_LANGUAGE_VERSION);
    if raw.is_null() {
        return None;
    }
    let version = CStr::from_ptr(raw as *const _).to_string_lossy();
    parse_glsl_version(&version)
}
