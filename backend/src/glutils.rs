use gl::{types::*, *};

/// Returns the oldest pending GL error, if any.
pub fn gl_error() -> Option<GLenum> {
    let err = unsafe { gl::GetError() };
    if err == gl::NO_ERROR {
        return None;
    }
    Some(err)
}

/// Pops pending GL errors, at most 16.
pub fn drain_gl_errors() -> Vec<GLenum> {
    let mut errors = Vec::new();
    while errors.len() < 16 {
        match gl_error() {
            Some(err) => errors.push(err),
            None => break,
        }
    }
    errors
}

pub fn gl_version() -> (i32, i32) {
    let mut major: i32 = 0;
    let mut minor: i32 = 0;
    unsafe { gl::GetIntegerv(MAJOR_VERSION, &mut major) };
    unsafe { gl::GetIntegerv(MINOR_VERSION, &mut minor) };
    (major, minor)
}

pub fn gl_buffer_data_arr_stat<T: Sized>(buffer: &[T]) {
    unsafe {
        gl::BufferData(
            ARRAY_BUFFER,
            std::mem::size_of_val(buffer) as isize,
            buffer.as_ptr().cast(),
            STATIC_DRAW,
        )
    };
}

pub fn gl_buffer_data_element_stat<T: Sized>(buffer: &[T]) {
    unsafe {
        gl::BufferData(
            ELEMENT_ARRAY_BUFFER,
            std::mem::size_of_val(buffer) as isize,
            buffer.as_ptr().cast(),
            STATIC_DRAW,
        )
    };
}

/// `size`, `stride` and `offset` are counted in floats.
pub fn gl_vertex_attrib_ptr_enab(index: u32, size: u32, stride: u32, offset: usize) {
    unsafe {
        gl::VertexAttribPointer(
            index,
            size as i32,
            FLOAT,
            FALSE,
            (stride as usize * std::mem::size_of::<f32>()) as i32,
            (offset * std::mem::size_of::<f32>()) as *const _,
        )
    };
    unsafe { gl::EnableVertexAttribArray(index) };
}
