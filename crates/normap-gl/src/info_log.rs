//! Diagnostic log retrieval for shader and program objects.

use gl::types::GLuint;

use crate::driver::ShaderDriver;

/// Which kind of GL object a log is read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogSource {
    Shader,
    Program,
}

/// Fetch the driver's info log for `id`.
///
/// The buffer is sized from the driver-reported `GL_INFO_LOG_LENGTH`, which
/// counts the terminating NUL. An empty log yields an empty string.
pub fn info_log<D: ShaderDriver + ?Sized>(driver: &D, source: LogSource, id: GLuint) -> String {
    let length = match source {
        LogSource::Shader => driver.get_shader_iv(id, gl::INFO_LOG_LENGTH),
        LogSource::Program => driver.get_program_iv(id, gl::INFO_LOG_LENGTH),
    };

    let mut buf = vec![0u8; length.max(0) as usize];
    let written = match source {
        LogSource::Shader => driver.get_shader_info_log(id, &mut buf),
        LogSource::Program => driver.get_program_info_log(id, &mut buf),
    };
    buf.truncate(written.min(buf.len()));
    while buf.last() == Some(&0) {
        buf.pop();
    }

    String::from_utf8_lossy(&buf).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockDriver;

    #[test]
    fn reads_exactly_the_reported_length() {
        let driver = MockDriver::new();
        let shader = driver.create_shader(gl::FRAGMENT_SHADER);
        driver.shader_source(shader, "void main(){glFragColor=vec4(1);}");
        driver.compile_shader(shader);

        let log = info_log(&driver, LogSource::Shader, shader);
        assert!(log.contains("glFragColor"));
        assert!(!log.ends_with('\0'));
        assert_eq!(
            driver.last_info_log_capacity(),
            Some(driver.get_shader_iv(shader, gl::INFO_LOG_LENGTH) as usize)
        );
    }

    #[test]
    fn empty_log_is_empty_string() {
        let driver = MockDriver::new();
        let program = driver.create_program();
        assert_eq!(info_log(&driver, LogSource::Program, program), "");
    }
}
