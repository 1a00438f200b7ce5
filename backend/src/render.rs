use std::path::Path;

use gl::*;
use log::info;

use super::error::{Result, StageKind};
use super::glutils::*;
use super::shaders::{link_program, load_shader_stage, GlBackend, Program};
use super::window::WindowSession;

#[rustfmt::skip]
const QUAD_VERTICES: [f32; 12] = [
     0.5,  0.5, 0.0, // top right
     0.5, -0.5, 0.0, // bottom right
    -0.5, -0.5, 0.0, // bottom left
    -0.5,  0.5, 0.0, // top left
];

const QUAD_INDICES: [u32; 6] = [0, 1, 3, 1, 2, 3];

/// Vertex array, vertex buffer and element buffer of the hard-coded quad.
pub struct Quad {
    vao: u32,
    vbo: u32,
    ebo: u32,
}

impl Quad {
    pub fn new() -> Quad {
        let (mut vao, mut vbo, mut ebo) = (0, 0, 0);
        unsafe { gl::GenVertexArrays(1, &mut vao) };
        unsafe { gl::GenBuffers(1, &mut vbo) };
        unsafe { gl::GenBuffers(1, &mut ebo) };

        unsafe { gl::BindVertexArray(vao) };

        unsafe { gl::BindBuffer(ARRAY_BUFFER, vbo) };
        gl_buffer_data_arr_stat(&QUAD_VERTICES);

        unsafe { gl::BindBuffer(ELEMENT_ARRAY_BUFFER, ebo) };
        gl_buffer_data_element_stat(&QUAD_INDICES);

        gl_vertex_attrib_ptr_enab(0, 3, 3, 0);

        unsafe { gl::BindBuffer(ARRAY_BUFFER, 0) };
        // the element buffer binding is part of the vao state, unbind the vao first
        unsafe { gl::BindVertexArray(0) };

        Quad { vao, vbo, ebo }
    }

    pub fn draw(&self) {
        unsafe { gl::BindVertexArray(self.vao) };
        unsafe {
            gl::DrawElements(
                TRIANGLES,
                QUAD_INDICES.len() as i32,
                UNSIGNED_INT,
                std::ptr::null(),
            )
        };
    }
}

impl Default for Quad {
    fn default() -> Self {
        Quad::new()
    }
}

impl Drop for Quad {
    fn drop(&mut self) {
        unsafe { gl::DeleteVertexArrays(1, &self.vao) };
        unsafe { gl::DeleteBuffers(1, &self.vbo) };
        unsafe { gl::DeleteBuffers(1, &self.ebo) };
    }
}

pub struct Renderer {
    clear_color: [f32; 4],
    scene: Option<(Program<GlBackend>, Quad)>,
}

impl Renderer {
    /// Clear and present only.
    pub fn new(clear_color: [f32; 4]) -> Renderer {
        Renderer {
            clear_color,
            scene: None,
        }
    }

    /// Loads both SPIR-V stages and the quad. Needs a current context.
    pub fn load(
        clear_color: [f32; 4],
        vertex_file: impl AsRef<Path>,
        fragment_file: impl AsRef<Path>,
    ) -> Result<Renderer> {
        let backend = GlBackend;
        let vertex = load_shader_stage(&backend, StageKind::Vertex, vertex_file)?;
        let fragment = load_shader_stage(&backend, StageKind::Fragment, fragment_file)?;
        let program = link_program(&backend, vertex, fragment)?;
        info!("shader program {} linked", program.id());

        Ok(Renderer {
            clear_color,
            scene: Some((program, Quad::new())),
        })
    }

    pub fn draw_frame(&self, session: &mut WindowSession) -> Result<()> {
        let [r, g, b, a] = self.clear_color;
        unsafe {
            gl::ClearColor(r, g, b, a);
            gl::Clear(gl::COLOR_BUFFER_BIT);
        }

        if let Some((program, quad)) = &self.scene {
            program.use_program();
            quad.draw();
        }

        session.present()
    }
}
