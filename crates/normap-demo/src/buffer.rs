//! Vertex array and buffer for the quad.

use anyhow::{Context, Result};
use gl::types::{GLint, GLsizei, GLsizeiptr, GLuint};
use normap_gl::{ShaderDriver, ShaderProgram};

use crate::bytes::AsBytes;
use crate::geometry::{Vertex, VERTEX_ATTRIBUTES};

/// A VAO with one interleaved VBO, drawn as a triangle list.
pub struct QuadMesh {
    vao: GLuint,
    vbo: GLuint,
    vertex_count: GLsizei,
    /// Total size in bytes.
    size: usize,
}

impl QuadMesh {
    /// Upload `vertices` and point every entry of [`VERTEX_ATTRIBUTES`] at the
    /// location `program` registered for it.
    ///
    /// # Safety
    ///
    /// Must be called with a valid OpenGL context active.
    pub unsafe fn upload<D: ShaderDriver>(
        vertices: &[Vertex],
        program: &ShaderProgram<D>,
    ) -> Result<Self> {
        let mut locations = Vec::with_capacity(VERTEX_ATTRIBUTES.len());
        for attribute in VERTEX_ATTRIBUTES {
            let location = program
                .attribute(attribute.name)
                .with_context(|| format!("vertex attribute {} has no location", attribute.name))?;
            locations.push((location, attribute));
        }

        let bytes = Vertex::slice_as_bytes(vertices);
        let stride = std::mem::size_of::<Vertex>() as GLsizei;
        let mut mesh = Self {
            vao: 0,
            vbo: 0,
            vertex_count: vertices.len() as GLsizei,
            size: bytes.len(),
        };

        gl::GenVertexArrays(1, &mut mesh.vao);
        gl::GenBuffers(1, &mut mesh.vbo);
        gl::BindVertexArray(mesh.vao);
        gl::BindBuffer(gl::ARRAY_BUFFER, mesh.vbo);
        gl::BufferData(
            gl::ARRAY_BUFFER,
            bytes.len() as GLsizeiptr,
            bytes.as_ptr().cast(),
            gl::STATIC_DRAW,
        );

        for (location, attribute) in locations {
            gl::EnableVertexAttribArray(location);
            gl::VertexAttribPointer(
                location,
                attribute.components as GLint,
                gl::FLOAT,
                gl::FALSE,
                stride,
                attribute.offset as *const _,
            );
        }

        gl::BindVertexArray(0);
        gl::BindBuffer(gl::ARRAY_BUFFER, 0);

        Ok(mesh)
    }

    pub fn vertex_count(&self) -> usize {
        self.vertex_count as usize
    }

    /// Total size of the vertex buffer in bytes.
    pub fn size(&self) -> usize {
        self.size
    }

    /// # Safety
    ///
    /// Must be called with a valid OpenGL context active and the program
    /// this mesh was uploaded for in use.
    pub unsafe fn draw(&self) {
        gl::BindVertexArray(self.vao);
        gl::DrawArrays(gl::TRIANGLES, 0, self.vertex_count);
        gl::BindVertexArray(0);
    }

    /// # Safety
    ///
    /// Must be called with the context that created the mesh current.
    pub unsafe fn delete(&mut self) {
        if self.vbo != 0 {
            gl::DeleteBuffers(1, &self.vbo);
            self.vbo = 0;
        }
        if self.vao != 0 {
            gl::DeleteVertexArrays(1, &self.vao);
            self.vao = 0;
        }
    }
}
