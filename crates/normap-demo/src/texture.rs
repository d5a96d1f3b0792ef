//! 2D textures decoded with `image` and uploaded with mipmaps.

use std::path::Path;

use gl::types::{GLenum, GLint, GLuint};
use image::DynamicImage;
use tracing::{debug, warn};

/// Tightly packed pixels plus the GL format matching their channel count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    pub gl_format: GLenum,
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl DecodedImage {
    /// One texel of `rgba`.
    pub fn solid(rgba: [u8; 4]) -> Self {
        Self {
            gl_format: gl::RGBA,
            width: 1,
            height: 1,
            pixels: rgba.to_vec(),
        }
    }
}

/// Pick `RED`, `RGB` or `RGBA` from the channel count. Two-channel images
/// are widened to RGBA.
pub fn decode(image: DynamicImage) -> DecodedImage {
    let (width, height) = (image.width(), image.height());
    let (gl_format, pixels) = match image.color().channel_count() {
        1 => (gl::RED, image.into_luma8().into_raw()),
        3 => (gl::RGB, image.into_rgb8().into_raw()),
        _ => (gl::RGBA, image.into_rgba8().into_raw()),
    };
    DecodedImage {
        gl_format,
        width,
        height,
        pixels,
    }
}

fn format_name(format: GLenum) -> &'static str {
    match format {
        gl::RED => "RED",
        gl::RGB => "RGB",
        gl::RGBA => "RGBA",
        _ => "unknown",
    }
}

pub struct GpuTexture {
    gl_name: GLuint,
    gl_format: GLenum,
    width: u32,
    height: u32,
}

impl GpuTexture {
    /// Load an image file. If it cannot be read a warning is logged and a
    /// single `fallback` texel is uploaded instead.
    ///
    /// # Safety
    ///
    /// Must be called with a valid OpenGL context active.
    pub unsafe fn load(path: &Path, fallback: [u8; 4]) -> Self {
        let decoded = match image::open(path) {
            Ok(image) => decode(image),
            Err(e) => {
                warn!("Texture failed to load at path {}: {e}", path.display());
                DecodedImage::solid(fallback)
            }
        };
        let texture = Self::upload(&decoded);
        let (width, height) = texture.dimensions();
        debug!(
            path = %path.display(),
            width,
            height,
            format = format_name(texture.gl_format()),
            "texture uploaded"
        );
        texture
    }

    /// # Safety
    ///
    /// Must be called with a valid OpenGL context active.
    pub unsafe fn upload(image: &DecodedImage) -> Self {
        let mut gl_name = 0;
        gl::GenTextures(1, &mut gl_name);
        gl::BindTexture(gl::TEXTURE_2D, gl_name);

        // RGB and RED rows are not 4-byte aligned in general.
        gl::PixelStorei(gl::UNPACK_ALIGNMENT, 1);
        gl::TexImage2D(
            gl::TEXTURE_2D,
            0,
            image.gl_format as GLint,
            image.width as i32,
            image.height as i32,
            0,
            image.gl_format,
            gl::UNSIGNED_BYTE,
            image.pixels.as_ptr().cast(),
        );
        gl::PixelStorei(gl::UNPACK_ALIGNMENT, 4);
        gl::GenerateMipmap(gl::TEXTURE_2D);

        gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_WRAP_S, gl::REPEAT as i32);
        gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_WRAP_T, gl::REPEAT as i32);
        gl::TexParameteri(
            gl::TEXTURE_2D,
            gl::TEXTURE_MIN_FILTER,
            gl::LINEAR_MIPMAP_LINEAR as i32,
        );
        gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_MAG_FILTER, gl::LINEAR as i32);
        gl::BindTexture(gl::TEXTURE_2D, 0);

        Self {
            gl_name,
            gl_format: image.gl_format,
            width: image.width,
            height: image.height,
        }
    }

    pub fn gl_format(&self) -> GLenum {
        self.gl_format
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// # Safety
    ///
    /// Must be called with a valid OpenGL context active.
    pub unsafe fn bind(&self, unit: u32) {
        gl::ActiveTexture(gl::TEXTURE0 + unit);
        gl::BindTexture(gl::TEXTURE_2D, self.gl_name);
    }

    /// # Safety
    ///
    /// Must be called with the context that created the texture current.
    pub unsafe fn delete(&mut self) {
        if self.gl_name != 0 {
            gl::DeleteTextures(1, &self.gl_name);
            self.gl_name = 0;
        }
    }
}
