//! compile the two stages and link them into a program

use crate::driver::ShaderDriver;
use crate::shader_source::StageKind;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ShaderError {
    #[error("cannot create {object}: {reason}")]
    CreateObject { object: &'static str, reason: String },

    #[error("failed to compile {stage} shader: {log}")]
    Compile { stage: StageKind, log: String },

    #[error("failed to link program: {log}")]
    Link { log: String },

    #[error("program failed validation: {log}")]
    Validate { log: String },
}

/// A compiled stage, owned by whoever compiled it until deleted.
#[derive(Debug, PartialEq, Eq)]
pub struct CompiledStage<S> {
    raw: S,
    kind: StageKind,
}

impl<S: Copy> CompiledStage<S> {
    pub fn raw(&self) -> S {
        self.raw
    }

    pub fn kind(&self) -> StageKind {
        self.kind
    }

    pub fn delete<D: ShaderDriver<Shader = S>>(self, gl: &D) {
        gl.delete_shader(self.raw);
    }
}

/// A linked and validated program. Release it with [`LinkedProgram::delete`].
#[derive(Debug, PartialEq, Eq)]
pub struct LinkedProgram<P> {
    raw: P,
}

impl<P: Copy> LinkedProgram<P> {
    pub fn raw(&self) -> P {
        self.raw
    }

    pub fn delete<D: ShaderDriver<Program = P>>(self, gl: &D) {
        gl.delete_program(self.raw);
    }
}

pub fn compile_stage<D: ShaderDriver>(
    gl: &D,
    kind: StageKind,
    source: &str,
) -> Result<CompiledStage<D::Shader>, ShaderError> {
    let shader = gl
        .create_shader(kind)
        .map_err(|reason| ShaderError::CreateObject {
            object: "shader",
            reason,
        })?;
    gl.shader_source(shader, source);
    gl.compile_shader(shader);
    if gl.shader_compile_status(shader) {
        return Ok(CompiledStage { raw: shader, kind });
    }
    let log = gl.shader_info_log(shader);
    log::error!("Failed to compile {kind} shader.\n{log}");
    gl.delete_shader(shader);
    Err(ShaderError::Compile { stage: kind, log })
}

/// Compile both stages and link them.
///
/// Nothing is attached unless both stages compiled. The intermediate stage objects are
/// released on every path, and the program object is released on failure.
pub fn create_program<D: ShaderDriver>(
    gl: &D,
    vertex_source: &str,
    fragment_source: &str,
) -> Result<LinkedProgram<D::Program>, ShaderError> {
    let program = gl
        .create_program()
        .map_err(|reason| ShaderError::CreateObject {
            object: "program",
            reason,
        })?;
    // both stages are compiled so that every failing stage gets its diagnostic
    let vs = compile_stage(gl, StageKind::Vertex, vertex_source);
    let fs = compile_stage(gl, StageKind::Fragment, fragment_source);
    let stages = match (vs, fs) {
        (Ok(vs), Ok(fs)) => [vs, fs],
        (Ok(ok), Err(e)) | (Err(e), Ok(ok)) => {
            ok.delete(gl);
            gl.delete_program(program);
            return Err(e);
        }
        (Err(e), Err(_)) => {
            gl.delete_program(program);
            return Err(e);
        }
    };

    for stage in &stages {
        log::debug!("attaching {} stage to {program:?}", stage.kind());
        gl.attach_shader(program, stage.raw());
    }
    gl.link_program(program);
    let result = if !gl.program_link_status(program) {
        Err(ShaderError::Link {
            log: gl.program_info_log(program),
        })
    } else if !gl.validate_program(program) {
        Err(ShaderError::Validate {
            log: gl.program_info_log(program),
        })
    } else {
        Ok(LinkedProgram { raw: program })
    };

    // the linked program keeps its own copy of the stages
    for stage in stages {
        gl.detach_shader(program, stage.raw());
        stage.delete(gl);
    }
    if let Err(e) = &result {
        log::error!("{e}");
        gl.delete_program(program);
    }
    result
}
