//! Named shader programs and the backend that compiles them.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::error::{MeshError, Result};

/// GLSL (or any other) source for one shader program.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ShaderSource {
    /// Vertex stage.
    pub vertex: String,
    /// Fragment stage.
    pub fragment: String,
    /// Optional geometry stage.
    pub geometry: Option<String>,
}

impl ShaderSource {
    /// Source from in-memory vertex and fragment stages.
    pub fn new(vertex: impl Into<String>, fragment: impl Into<String>) -> Self {
        Self {
            vertex: vertex.into(),
            fragment: fragment.into(),
            geometry: None,
        }
    }

    /// Add a geometry stage.
    pub fn with_geometry(mut self, geometry: impl Into<String>) -> Self {
        self.geometry = Some(geometry.into());
        self
    }

    /// Read the vertex and fragment stages from files.
    pub fn from_files<P: AsRef<Path>, Q: AsRef<Path>>(vertex: P, fragment: Q) -> Result<Self> {
        Ok(Self::new(
            fs::read_to_string(vertex)?,
            fs::read_to_string(fragment)?,
        ))
    }

    /// Check that no stage is blank.
    pub fn validate(&self, name: &str) -> Result<()> {
        let stages = [
            ("vertex", Some(&self.vertex)),
            ("fragment", Some(&self.fragment)),
            ("geometry", self.geometry.as_ref()),
        ];
        for (stage, text) in stages {
            if text.is_some_and(|t| t.trim().is_empty()) {
                return Err(MeshError::Shader {
                    name: name.to_string(),
                    message: format!("{stage} stage is empty"),
                });
            }
        }
        Ok(())
    }
}

/// Turns shader sources into programs on some graphics API.
pub trait ShaderBackend {
    /// The API's program object.
    type Handle;

    /// Compile and link a program.
    fn compile(&mut self, name: &str, source: &ShaderSource) -> Result<Self::Handle>;

    /// Free a program. Called exactly once per successful `compile`.
    fn release(&mut self, handle: Self::Handle);
}

/// A compiled program and the source it came from.
#[derive(Debug)]
pub struct Shader<H> {
    name: String,
    source: ShaderSource,
    handle: H,
}

impl<H> Shader<H> {
    /// Registry name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The source the program was compiled from.
    pub fn source(&self) -> &ShaderSource {
        &self.source
    }

    /// The backend's program object.
    pub fn handle(&self) -> &H {
        &self.handle
    }
}

/// Owns every shader program by name.
///
/// Programs are released through the backend when replaced, removed,
/// cleared, or when the manager is dropped.
pub struct ResourceManager<B: ShaderBackend> {
    backend: B,
    shaders: BTreeMap<String, Shader<B::Handle>>,
}

impl<B: ShaderBackend> ResourceManager<B> {
    /// An empty registry on top of `backend`.
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            shaders: BTreeMap::new(),
        }
    }

    /// Read, compile and register a program from two files.
    pub fn load_shader<P: AsRef<Path>, Q: AsRef<Path>>(
        &mut self,
        vertex_path: P,
        fragment_path: Q,
        name: &str,
    ) -> Result<&Shader<B::Handle>> {
        let source = ShaderSource::from_files(vertex_path, fragment_path)?;
        self.insert_shader(name, source)
    }

    /// Compile and register a program, replacing any program of that name.
    ///
    /// On failure the previous program, if any, stays registered.
    pub fn insert_shader(&mut self, name: &str, source: ShaderSource) -> Result<&Shader<B::Handle>> {
        source.validate(name)?;
        let handle = self.backend.compile(name, &source)?;

        let shader = Shader {
            name: name.to_string(),
            source,
            handle,
        };
        if let Some(old) = self.shaders.insert(name.to_string(), shader) {
            log::debug!("replacing shader '{name}'");
            self.backend.release(old.handle);
        }

        self.shader(name)
    }

    /// Look up a program.
    pub fn shader(&self, name: &str) -> Result<&Shader<B::Handle>> {
        self.shaders
            .get(name)
            .ok_or_else(|| MeshError::ResourceNotFound {
                kind: "shader",
                name: name.to_string(),
            })
    }

    /// Unregister and release a program. Returns whether it existed.
    pub fn remove_shader(&mut self, name: &str) -> bool {
        match self.shaders.remove(name) {
            Some(shader) => {
                self.backend.release(shader.handle);
                true
            }
            None => false,
        }
    }

    /// Registered names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.shaders.keys().map(String::as_str)
    }

    /// Number of registered programs.
    pub fn len(&self) -> usize {
        self.shaders.len()
    }

    /// Whether no program is registered.
    pub fn is_empty(&self) -> bool {
        self.shaders.is_empty()
    }

    /// Release every program.
    pub fn clear(&mut self) {
        let shaders = std::mem::take(&mut self.shaders);
        for (_, shader) in shaders {
            self.backend.release(shader.handle);
        }
    }

    /// The backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// The backend, mutably.
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }
}

impl<B: ShaderBackend> Drop for ResourceManager<B> {
    fn drop(&mut self) {
        self.clear();
    }
}
