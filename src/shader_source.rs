//! split one combined shader file into its vertex and fragment sources
//!
//! A section starts at a line containing `#shader` together with `vertex` or `fragment`.
//! Everything after it, up to the next marker, belongs to that section verbatim.

use std::io::BufRead;

const MARKER: &str = "#shader";

/// One of the two programmable stages of a program
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum StageKind {
    Vertex,
    Fragment,
}

impl StageKind {
    pub const ALL: [StageKind; 2] = [StageKind::Vertex, StageKind::Fragment];

    /// the OpenGL enumerant passed to `glCreateShader`
    pub fn gl_enum(&self) -> u32 {
        match self {
            StageKind::Vertex => glow::VERTEX_SHADER,
            StageKind::Fragment => glow::FRAGMENT_SHADER,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            StageKind::Vertex => "vertex",
            StageKind::Fragment => "fragment",
        }
    }

    /// stage selected by a marker line, `None` if the line is not a recognized marker
    fn from_marker(line: &str) -> Option<StageKind> {
        if line.contains("vertex") {
            Some(StageKind::Vertex)
        } else if line.contains("fragment") {
            Some(StageKind::Fragment)
        } else {
            None
        }
    }
}

impl std::fmt::Display for StageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ShaderProgramSource {
    pub vertex_source: String,
    pub fragment_source: String,
}

impl ShaderProgramSource {
    pub fn source(&self, kind: StageKind) -> &str {
        match kind {
            StageKind::Vertex => &self.vertex_source,
            StageKind::Fragment => &self.fragment_source,
        }
    }

    fn source_mut(&mut self, kind: StageKind) -> &mut String {
        match kind {
            StageKind::Vertex => &mut self.vertex_source,
            StageKind::Fragment => &mut self.fragment_source,
        }
    }

    /// true when neither section produced any line
    pub fn is_empty(&self) -> bool {
        self.vertex_source.is_empty() && self.fragment_source.is_empty()
    }

    /// stages whose section is empty (or absent)
    pub fn missing_stages(&self) -> Vec<StageKind> {
        StageKind::ALL
            .into_iter()
            .filter(|&kind| self.source(kind).is_empty())
            .collect()
    }

    /// feed one line to the splitter, returning the new active section
    fn push_line(&mut self, current: Option<StageKind>, line: &str) -> Option<StageKind> {
        if line.contains(MARKER) {
            // a marker naming neither stage keeps the current section
            return StageKind::from_marker(line).or(current);
        }
        if let Some(kind) = current {
            let buf = self.source_mut(kind);
            buf.push_str(line);
            buf.push('\n');
        }
        current
    }
}

pub fn split_lines<I, S>(lines: I) -> ShaderProgramSource
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut source = ShaderProgramSource::default();
    let mut current: Option<StageKind> = None;
    for line in lines {
        current = source.push_line(current, line.as_ref());
    }
    source
}

/// Split a stream line by line.
///
/// A read error ends the parse; the lines read before it are kept.
pub fn split_reader<R: BufRead>(reader: R) -> ShaderProgramSource {
    let mut source = ShaderProgramSource::default();
    let mut current: Option<StageKind> = None;
    for line in reader.lines() {
        match line {
            Ok(line) => current = source.push_line(current, &line),
            Err(e) => {
                log::warn!("stopped reading shader source: {e}");
                break;
            }
        }
    }
    source
}

/// Parse a combined shader file.
///
/// A file that cannot be opened yields two empty sources, the same as a file without sections.
/// Callers detect both cases through [`ShaderProgramSource::is_empty`].
pub fn parse_shader_file<P: AsRef<std::path::Path>>(path: P) -> ShaderProgramSource {
    let path = path.as_ref();
    match std::fs::File::open(path) {
        Ok(file) => {
            let source = split_reader(std::io::BufReader::new(file));
            log::debug!(
                "parsed {}: vertex {} bytes, fragment {} bytes",
                path.display(),
                source.vertex_source.len(),
                source.fragment_source.len()
            );
            source
        }
        Err(e) => {
            log::warn!("cannot open shader file {}: {e}", path.display());
            ShaderProgramSource::default()
        }
    }
}
