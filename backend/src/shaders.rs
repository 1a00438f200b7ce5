//! SPIR-V shader loading.
//!
//! Stages and programs are guards: dropping one deletes the GL object, so
//! every early return releases what was created up to that point.

use std::ffi::{CStr, CString};
use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::Path;

use gl::types::*;
use log::{debug, error};

use crate::config::SHADER_ENTRY;
use crate::error::{Error, FileOp, Result, StageKind};

/// The GL calls the loader needs. [`GlBackend`] talks to the driver.
pub trait ShaderBackend: Clone {
    /// Returns 0 on failure.
    fn create_shader(&self, kind: StageKind) -> u32;
    fn shader_binary(&self, shader: u32, binary: &[u8]);
    fn specialize(&self, shader: u32, entry: &CStr);
    fn compile_status(&self, shader: u32) -> bool;
    fn shader_log(&self, shader: u32) -> String;
    fn delete_shader(&self, shader: u32);

    fn create_program(&self) -> u32;
    fn attach(&self, program: u32, shader: u32);
    fn link(&self, program: u32);
    fn link_status(&self, program: u32) -> bool;
    fn program_log(&self, program: u32) -> String;
    fn delete_program(&self, program: u32);
    fn use_program(&self, program: u32);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct GlBackend;

impl ShaderBackend for GlBackend {
    fn create_shader(&self, kind: StageKind) -> u32 {
        let ty = match kind {
            StageKind::Vertex => gl::VERTEX_SHADER,
            StageKind::Fragment => gl::FRAGMENT_SHADER,
        };
        unsafe { gl::CreateShader(ty) }
    }

    fn shader_binary(&self, shader: u32, binary: &[u8]) {
        unsafe {
            gl::ShaderBinary(
                1,
                &shader,
                gl::SHADER_BINARY_FORMAT_SPIR_V,
                binary.as_ptr().cast(),
                binary.len() as GLsizei,
            )
        };
    }

    fn specialize(&self, shader: u32, entry: &CStr) {
        unsafe {
            gl::SpecializeShader(
                shader,
                entry.as_ptr(),
                0,
                std::ptr::null(),
                std::ptr::null(),
            )
        };
    }

    fn compile_status(&self, shader: u32) -> bool {
        let mut success = 0;
        unsafe { gl::GetShaderiv(shader, gl::COMPILE_STATUS, &mut success) };
        success != 0
    }

    fn shader_log(&self, shader: u32) -> String {
        let mut len = 0_i32;
        unsafe { gl::GetShaderiv(shader, gl::INFO_LOG_LENGTH, &mut len) };
        if len <= 0 {
            return String::new();
        }
        let mut v: Vec<u8> = vec![0; len as usize];
        let mut written = 0_i32;
        unsafe { gl::GetShaderInfoLog(shader, len, &mut written, v.as_mut_ptr().cast()) };
        v.truncate(written.max(0) as usize);
        String::from_utf8_lossy(&v).into_owned()
    }

    fn delete_shader(&self, shader: u32) {
        unsafe { gl::DeleteShader(shader) };
    }

    fn create_program(&self) -> u32 {
        unsafe { gl::CreateProgram() }
    }

    fn attach(&self, program: u32, shader: u32) {
        unsafe { gl::AttachShader(program, shader) };
    }

    fn link(&self, program: u32) {
        unsafe { gl::LinkProgram(program) };
    }

    fn link_status(&self, program: u32) -> bool {
        let mut success = 0;
        unsafe { gl::GetProgramiv(program, gl::LINK_STATUS, &mut success) };
        success != 0
    }

    fn program_log(&self, program: u32) -> String {
        let mut len = 0_i32;
        unsafe { gl::GetProgramiv(program, gl::INFO_LOG_LENGTH, &mut len) };
        if len <= 0 {
            return String::new();
        }
        let mut v: Vec<u8> = vec![0; len as usize];
        let mut written = 0_i32;
        unsafe { gl::GetProgramInfoLog(program, len, &mut written, v.as_mut_ptr().cast()) };
        v.truncate(written.max(0) as usize);
        String::from_utf8_lossy(&v).into_owned()
    }

    fn delete_program(&self, program: u32) {
        unsafe { gl::DeleteProgram(program) };
    }

    fn use_program(&self, program: u32) {
        unsafe { gl::UseProgram(program) };
    }
}

/// A compiled shader stage.
pub struct Stage<B: ShaderBackend> {
    backend: B,
    id: u32,
    kind: StageKind,
}

impl<B: ShaderBackend> Stage<B> {
    pub fn id(&self) -> u32 {
        self.id
    }
}

impl<B: ShaderBackend> Drop for Stage<B> {
    fn drop(&mut self) {
        debug!("deleting {} shader {}", self.kind, self.id);
        self.backend.delete_shader(self.id);
    }
}

/// A linked program.
pub struct Program<B: ShaderBackend> {
    backend: B,
    id: u32,
}

impl<B: ShaderBackend> Program<B> {
    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn use_program(&self) {
        self.backend.use_program(self.id);
    }
}

impl<B: ShaderBackend> Drop for Program<B> {
    fn drop(&mut self) {
        self.backend.delete_program(self.id);
    }
}

// SPIR-V modules are small, anything past this grows while reading
const MAX_PREALLOC: u64 = 1 << 20;

/// Reads a whole regular file into memory.
pub fn read_binary(path: &Path) -> Result<Vec<u8>> {
    let file = File::open(path).map_err(|e| Error::file(path, FileOp::Open, e))?;

    let metadata = file
        .metadata()
        .map_err(|e| Error::file(path, FileOp::Read, e))?;
    if !metadata.is_file() {
        let e = io::Error::new(io::ErrorKind::InvalidInput, "not a regular file");
        return Err(Error::file(path, FileOp::Read, e));
    }

    read_all(path, file)
}

fn read_all<R: Read + Seek>(path: &Path, mut reader: R) -> Result<Vec<u8>> {
    let len = reader
        .seek(SeekFrom::End(0))
        .and_then(|len| reader.rewind().map(|_| len))
        .map_err(|e| Error::file(path, FileOp::Seek, e))?;

    let mut data = Vec::with_capacity(len.min(MAX_PREALLOC) as usize);
    reader
        .read_to_end(&mut data)
        .map_err(|e| Error::file(path, FileOp::Read, e))?;
    Ok(data)
}

pub fn load_shader_stage<B: ShaderBackend>(
    backend: &B,
    kind: StageKind,
    path: impl AsRef<Path>,
) -> Result<Stage<B>> {
    let path = path.as_ref();
    let binary = read_binary(path)?;

    let entry = CString::new(SHADER_ENTRY).map_err(|_| Error::ShaderCompile {
        stage: kind,
        log: format!("invalid entry point name {SHADER_ENTRY:?}"),
    })?;

    let id = backend.create_shader(kind);
    if id == 0 {
        return Err(Error::ShaderCompile {
            stage: kind,
            log: "glCreateShader failed".to_string(),
        });
    }
    let stage = Stage {
        backend: backend.clone(),
        id,
        kind,
    };

    backend.shader_binary(id, &binary);
    // the driver has its own copy now
    drop(binary);
    backend.specialize(id, &entry);

    if !backend.compile_status(id) {
        let log = backend.shader_log(id);
        error!("{kind} shader {}: {log}", path.display());
        return Err(Error::ShaderCompile { stage: kind, log });
    }

    debug!("loaded {kind} shader {}", path.display());
    Ok(stage)
}

/// Links both stages into a program. The stages are released once linking
/// has been attempted, whatever the outcome.
pub fn link_program<B: ShaderBackend>(
    backend: &B,
    vertex: Stage<B>,
    fragment: Stage<B>,
) -> Result<Program<B>> {
    let id = backend.create_program();
    if id == 0 {
        return Err(Error::ShaderLink {
            log: "glCreateProgram failed".to_string(),
        });
    }
    let program = Program {
        backend: backend.clone(),
        id,
    };

    backend.attach(id, vertex.id());
    backend.attach(id, fragment.id());
    backend.link(id);

    drop(vertex);
    drop(fragment);

    if !backend.link_status(id) {
        let log = backend.program_log(id);
        error!("program link: {log}");
        return Err(Error::ShaderLink { log });
    }

    Ok(program)
}
