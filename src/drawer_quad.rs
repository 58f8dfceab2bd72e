//! draw an indexed 2D mesh (a quad by default) with a program built from a combined shader file

use crate::gl_error::{gl_call, ErrorPoller};
use crate::program::{LinkedProgram, ShaderError};
use crate::shader_source::ShaderProgramSource;
use glow::HasContext;

/// corners of the quad, xy
pub const QUAD_VTX2XY: [f32; 8] = [-0.5, -0.5, 0.5, -0.5, 0.5, 0.5, -0.5, 0.5];
/// two triangles covering the quad
pub const QUAD_TRI2VTX: [u32; 6] = [0, 1, 2, 2, 3, 0];

/// the vertex shader reads positions from this attribute location
const LOC_POSITION: u32 = 0;

pub struct Drawer {
    program: Option<LinkedProgram<glow::Program>>,
    vertex_array: Option<glow::VertexArray>,
    vbo: Option<glow::Buffer>,
    ebo: Option<glow::Buffer>,
    num_index: usize,
    poller: Box<dyn ErrorPoller + Send + Sync>,
}

impl Drawer {
    pub fn new(poller: Box<dyn ErrorPoller + Send + Sync>) -> Self {
        Drawer {
            program: None,
            vertex_array: None,
            vbo: None,
            ebo: None,
            num_index: 0,
            poller,
        }
    }

    pub fn program(&self) -> Option<glow::Program> {
        self.program.as_ref().map(|p| p.raw())
    }

    pub fn compile_shader(
        &mut self,
        gl: &glow::Context,
        source: &ShaderProgramSource,
    ) -> Result<(), ShaderError> {
        let program =
            crate::program::create_program(gl, &source.vertex_source, &source.fragment_source)?;
        if let Some(old) = self.program.replace(program) {
            old.delete(gl);
        }
        Ok(())
    }

    /// Upload the vertex positions and the triangle indices.
    pub fn set_mesh(
        &mut self,
        gl: &glow::Context,
        vtx2xy: &[f32],
        tri2vtx: &[u32],
    ) -> Result<(), String> {
        self.delete_buffers(gl);
        unsafe {
            let vertex_array = gl.create_vertex_array()?;
            gl.bind_vertex_array(Some(vertex_array));
            self.vertex_array = Some(vertex_array);

            let vbo = gl.create_buffer()?;
            gl.bind_buffer(glow::ARRAY_BUFFER, Some(vbo));
            gl.buffer_data_u8_slice(
                glow::ARRAY_BUFFER,
                bytemuck::cast_slice(vtx2xy),
                glow::STATIC_DRAW,
            );
            self.vbo = Some(vbo);
            gl.enable_vertex_attrib_array(LOC_POSITION);
            gl.vertex_attrib_pointer_f32(
                LOC_POSITION,
                2,
                glow::FLOAT,
                false,
                2 * std::mem::size_of::<f32>() as i32,
                0,
            );

            let ebo = gl.create_buffer()?;
            gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(ebo));
            gl.buffer_data_u8_slice(
                glow::ELEMENT_ARRAY_BUFFER,
                bytemuck::cast_slice(tri2vtx),
                glow::STATIC_DRAW,
            );
            self.ebo = Some(ebo);
            self.num_index = tri2vtx.len();

            gl.bind_vertex_array(None);
        }
        Ok(())
    }

    pub fn set_quad(&mut self, gl: &glow::Context) -> Result<(), String> {
        self.set_mesh(gl, &QUAD_VTX2XY, &QUAD_TRI2VTX)
    }

    pub fn draw(&self, gl: &glow::Context) {
        let Some(program) = self.program() else {
            return;
        };
        unsafe {
            gl.use_program(Some(program));
            gl.bind_vertex_array(self.vertex_array);
            gl_call(&*self.poller, gl, || {
                gl.draw_elements(
                    glow::TRIANGLES,
                    self.num_index as i32,
                    glow::UNSIGNED_INT,
                    0,
                )
            });
            gl.bind_vertex_array(None);
        }
    }

    fn delete_buffers(&mut self, gl: &glow::Context) {
        unsafe {
            if let Some(vao) = self.vertex_array.take() {
                gl.delete_vertex_array(vao);
            }
            for buf in [self.vbo.take(), self.ebo.take()].into_iter().flatten() {
                gl.delete_buffer(buf);
            }
        }
        self.num_index = 0;
    }

    pub fn destroy(&mut self, gl: &glow::Context) {
        if let Some(program) = self.program.take() {
            program.delete(gl);
        }
        self.delete_buffers(gl);
    }
}
