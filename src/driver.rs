//! the slice of the OpenGL API used to build a program
//!
//! Every method assumes that a GL context is current on the calling thread.

use crate::shader_source::StageKind;
use glow::HasContext;

pub trait ShaderDriver {
    type Shader: Copy + std::fmt::Debug;
    type Program: Copy + std::fmt::Debug;

    fn create_shader(&self, kind: StageKind) -> Result<Self::Shader, String>;
    fn shader_source(&self, shader: Self::Shader, source: &str);
    fn compile_shader(&self, shader: Self::Shader);
    fn shader_compile_status(&self, shader: Self::Shader) -> bool;
    fn shader_info_log(&self, shader: Self::Shader) -> String;
    fn delete_shader(&self, shader: Self::Shader);

    fn create_program(&self) -> Result<Self::Program, String>;
    fn attach_shader(&self, program: Self::Program, shader: Self::Shader);
    fn detach_shader(&self, program: Self::Program, shader: Self::Shader);
    fn link_program(&self, program: Self::Program);
    fn program_link_status(&self, program: Self::Program) -> bool;
    fn program_info_log(&self, program: Self::Program) -> String;
    fn delete_program(&self, program: Self::Program);

    /// Validate the program against the current GL state.
    fn validate_program(&self, program: Self::Program) -> bool;
}

/// The driver's error flags, read one at a time.
pub trait ErrorQueue {
    /// returns `glow::NO_ERROR` once the queue is empty
    fn pop_error(&self) -> u32;
}

impl ShaderDriver for glow::Context {
    type Shader = glow::Shader;
    type Program = glow::Program;

    fn create_shader(&self, kind: StageKind) -> Result<Self::Shader, String> {
        unsafe { HasContext::create_shader(self, kind.gl_enum()) }
    }

    fn shader_source(&self, shader: Self::Shader, source: &str) {
        unsafe { HasContext::shader_source(self, shader, source) }
    }

    fn compile_shader(&self, shader: Self::Shader) {
        unsafe { HasContext::compile_shader(self, shader) }
    }

    fn shader_compile_status(&self, shader: Self::Shader) -> bool {
        unsafe { HasContext::get_shader_compile_status(self, shader) }
    }

    fn shader_info_log(&self, shader: Self::Shader) -> String {
        unsafe { HasContext::get_shader_info_log(self, shader) }
    }

    fn delete_shader(&self, shader: Self::Shader) {
        unsafe { HasContext::delete_shader(self, shader) }
    }

    fn create_program(&self) -> Result<Self::Program, String> {
        unsafe { HasContext::create_program(self) }
    }

    fn attach_shader(&self, program: Self::Program, shader: Self::Shader) {
        unsafe { HasContext::attach_shader(self, program, shader) }
    }

    fn detach_shader(&self, program: Self::Program, shader: Self::Shader) {
        unsafe { HasContext::detach_shader(self, program, shader) }
    }

    fn link_program(&self, program: Self::Program) {
        unsafe { HasContext::link_program(self, program) }
    }

    fn program_link_status(&self, program: Self::Program) -> bool {
        unsafe { HasContext::get_program_link_status(self, program) }
    }

    fn program_info_log(&self, program: Self::Program) -> String {
        unsafe { HasContext::get_program_info_log(self, program) }
    }

    fn delete_program(&self, program: Self::Program) {
        unsafe { HasContext::delete_program(self, program) }
    }

    fn validate_program(&self, program: Self::Program) -> bool {
        unsafe {
            HasContext::validate_program(self, program);
            HasContext::get_program_validate_status(self, program)
        }
    }
}

impl ErrorQueue for glow::Context {
    fn pop_error(&self) -> u32 {
        unsafe { HasContext::get_error(self) }
    }
}

/// In-memory driver recording every object it hands out.
#[cfg(test)]
pub(crate) mod fake {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::collections::{BTreeMap, VecDeque};

    /// a stage source compiles only if it has an entry point
    pub const ENTRY_POINT: &str = "void main";

    #[derive(Default)]
    pub struct FakeDriver {
        next_id: Cell<u32>,
        /// live shader objects: id -> (stage, source)
        pub shaders: RefCell<BTreeMap<u32, (StageKind, String)>>,
        /// live program objects: id -> attached shader ids
        pub programs: RefCell<BTreeMap<u32, Vec<u32>>>,
        pub fail_create_program: Cell<bool>,
        pub fail_link: Cell<bool>,
        pub fail_validate: Cell<bool>,
        pub errors: RefCell<VecDeque<u32>>,
        pub calls: RefCell<Vec<String>>,
    }

    impl FakeDriver {
        fn fresh_id(&self) -> u32 {
            let id = self.next_id.get() + 1;
            self.next_id.set(id);
            id
        }

        fn record(&self, call: String) {
            self.calls.borrow_mut().push(call);
        }
    }

    impl ShaderDriver for FakeDriver {
        type Shader = u32;
        type Program = u32;

        fn create_shader(&self, kind: StageKind) -> Result<u32, String> {
            let id = self.fresh_id();
            self.shaders
                .borrow_mut()
                .insert(id, (kind, String::new()));
            self.record(format!("create_shader {kind} {id}"));
            Ok(id)
        }

        fn shader_source(&self, shader: u32, source: &str) {
            if let Some(entry) = self.shaders.borrow_mut().get_mut(&shader) {
                entry.1 = source.to_string();
            }
        }

        fn compile_shader(&self, shader: u32) {
            self.record(format!("compile_shader {shader}"));
        }

        fn shader_compile_status(&self, shader: u32) -> bool {
            self.shaders
                .borrow()
                .get(&shader)
                .is_some_and(|(_, src)| src.contains(ENTRY_POINT))
        }

        fn shader_info_log(&self, shader: u32) -> String {
            if self.shader_compile_status(shader) {
                String::new()
            } else {
                "0:1(1): error: syntax error, unexpected end of file".to_string()
            }
        }

        fn delete_shader(&self, shader: u32) {
            self.shaders.borrow_mut().remove(&shader);
            self.record(format!("delete_shader {shader}"));
        }

        fn create_program(&self) -> Result<u32, String> {
            if self.fail_create_program.get() {
                return Err("out of program names".to_string());
            }
            let id = self.fresh_id();
            self.programs.borrow_mut().insert(id, vec![]);
            self.record(format!("create_program {id}"));
            Ok(id)
        }

        fn attach_shader(&self, program: u32, shader: u32) {
            if let Some(attached) = self.programs.borrow_mut().get_mut(&program) {
                attached.push(shader);
            }
            self.record(format!("attach_shader {program} {shader}"));
        }

        fn detach_shader(&self, program: u32, shader: u32) {
            if let Some(attached) = self.programs.borrow_mut().get_mut(&program) {
                attached.retain(|&s| s != shader);
            }
            self.record(format!("detach_shader {program} {shader}"));
        }

        fn link_program(&self, program: u32) {
            self.record(format!("link_program {program}"));
        }

        fn program_link_status(&self, _program: u32) -> bool {
            !self.fail_link.get()
        }

        fn program_info_log(&self, _program: u32) -> String {
            if self.fail_link.get() {
                "error: vertex output `v_color` not read by fragment shader".to_string()
            } else if self.fail_validate.get() {
                "validation failed: sampler type mismatch".to_string()
            } else {
                String::new()
            }
        }

        fn delete_program(&self, program: u32) {
            self.programs.borrow_mut().remove(&program);
            self.record(format!("delete_program {program}"));
        }

        fn validate_program(&self, program: u32) -> bool {
            self.record(format!("validate_program {program}"));
            !self.fail_validate.get()
        }
    }

    impl ErrorQueue for FakeDriver {
        fn pop_error(&self) -> u32 {
            self.errors
                .borrow_mut()
                .pop_front()
                .unwrap_or(glow::NO_ERROR)
        }
    }
}
