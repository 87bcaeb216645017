use crate::error::TranslateError;
use std::fmt;
use std::path::{Path, PathBuf};

pub const ENTRY_POINT: &str = "main";

/// Pipeline stage a source file is written for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    /// Classify a source file by extension: `.vp` is a vertex program,
    /// `.fp` a fragment program.
    pub fn from_path(path: &Path) -> Result<Self, TranslateError> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("vp") => Ok(ShaderStage::Vertex),
            Some("fp") => Ok(ShaderStage::Fragment),
            _ => Err(TranslateError::UnsupportedFileExtension {
                path: path.to_path_buf(),
            }),
        }
    }

    pub fn output_extension(self) -> &'static str {
        match self {
            ShaderStage::Vertex => "cgvp",
            ShaderStage::Fragment => "cgfp",
        }
    }

    /// `foo/bar.vp` → `foo/bar.cgvp`, optionally relocated into `out_dir`.
    pub fn output_path(self, input: &Path, out_dir: Option<&Path>) -> PathBuf {
        let renamed = input.with_extension(self.output_extension());
        match (out_dir, renamed.file_name()) {
            (Some(dir), Some(name)) => dir.join(name),
            _ => renamed,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ShaderStage::Vertex => "vertex",
            ShaderStage::Fragment => "fragment",
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A shader-scope `attribute`, `uniform` or `varying`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub name: String,
    pub data_type: String,
}

pub type AttributeDecl = Declaration;
pub type UniformDecl = Declaration;
pub type VaryingDecl = Declaration;

impl Declaration {
    pub fn new(data_type: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
        }
    }

    pub fn is_sampler(&self) -> bool {
        self.data_type == "sampler2D"
    }

    /// Post-massage matrix types (`float2x2` … `float4x4`).
    pub fn is_matrix(&self) -> bool {
        matches!(self.data_type.as_str(), "float2x2" | "float3x3" | "float4x4")
    }
}

/// One function definition. Parameters and body are kept as raw text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionDecl {
    pub name: String,
    pub return_type: String,
    pub raw_parameters: String,
    pub raw_body: String,
}

impl FunctionDecl {
    pub fn is_entry_point(&self) -> bool {
        self.name == ENTRY_POINT
    }
}

/// Everything the parser learned about one source file, in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderModel {
    pub stage: ShaderStage,
    pub attributes: Vec<AttributeDecl>,
    pub uniforms: Vec<UniformDecl>,
    pub varyings: Vec<VaryingDecl>,
    pub functions: Vec<FunctionDecl>,
}

impl ShaderModel {
    pub fn new(stage: ShaderStage) -> Self {
        Self {
            stage,
            attributes: Vec::new(),
            uniforms: Vec::new(),
            varyings: Vec::new(),
            functions: Vec::new(),
        }
    }

    pub fn entry_point(&self) -> Result<&FunctionDecl, TranslateError> {
        self.functions
            .iter()
            .find(|f| f.is_entry_point())
            .ok_or(TranslateError::MissingEntryPoint)
    }

    /// Every function except `main`, in declaration order.
    pub fn helpers(&self) -> impl Iterator<Item = &FunctionDecl> {
        self.functions.iter().filter(|f| !f.is_entry_point())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn func(name: &str) -> FunctionDecl {
        FunctionDecl {
            name: name.into(),
            return_type: "void".into(),
            raw_parameters: String::new(),
            raw_body: String::new(),
        }
    }

    #[test]
    fn test_stage_from_path() {
        assert_eq!(
            ShaderStage::from_path(Path::new("shaders/sprite.vp")),
            Ok(ShaderStage::Vertex)
        );
        assert_eq!(
            ShaderStage::from_path(Path::new("sprite.fp")),
            Ok(ShaderStage::Fragment)
        );
        for bad in ["sprite.glsl", "sprite", "sprite.VP"] {
            assert_eq!(
                ShaderStage::from_path(Path::new(bad)),
                Err(TranslateError::UnsupportedFileExtension { path: bad.into() })
            );
        }
    }

    #[test]
    fn test_output_path() {
        let vp = Path::new("shaders/sprite.vp");
        assert_eq!(
            ShaderStage::Vertex.output_path(vp, None),
            PathBuf::from("shaders/sprite.cgvp")
        );
        assert_eq!(
            ShaderStage::Fragment.output_path(Path::new("a/b.fp"), Some(Path::new("out"))),
            PathBuf::from("out/b.cgfp")
        );
    }

    #[test]
    fn test_entry_point_lookup() {
        let mut model = ShaderModel::new(ShaderStage::Fragment);
        model.functions.push(func("helper"));
        assert_eq!(model.entry_point(), Err(TranslateError::MissingEntryPoint));

        model.functions.push(func("main"));
        assert_eq!(model.entry_point().unwrap().name, "main");
        let helpers: Vec<_> = model.helpers().map(|f| f.name.as_str()).collect();
        assert_eq!(helpers, vec!["helper"]);
    }

    #[test]
    fn test_declaration_kinds() {
        assert!(Declaration::new("sampler2D", "tex").is_sampler());
        assert!(!Declaration::new("float4", "tex").is_sampler());
        assert!(Declaration::new("float4x4", "m").is_matrix());
        assert!(!Declaration::new("float4", "m").is_matrix());
    }
}
