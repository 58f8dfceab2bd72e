pub mod driver;
pub mod drawer_quad;
pub mod gl_error;
pub mod program;
pub mod shader_source;

pub use driver::{ErrorQueue, ShaderDriver};
pub use program::{compile_stage, create_program, CompiledStage, LinkedProgram, ShaderError};
pub use shader_source::{parse_shader_file, ShaderProgramSource, StageKind};
