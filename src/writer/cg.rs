//! Emit Cg source for a parsed shader model.

use crate::config::TranslatorConfig;
use crate::error::TranslateError;
use crate::model::{FunctionDecl, ShaderModel, ShaderStage};
use regex::Regex;
use std::sync::LazyLock;

static FRAG_COLOR_ASSIGN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bgl_FragColor[ ]*=[ ]*").unwrap());
static STATEMENT_END: LazyLock<Regex> = LazyLock::new(|| Regex::new(r";[ ]*").unwrap());

/// Generate the full Cg program for `model`.
///
/// Fails with `MissingEntryPoint` when no function is named `main`.
pub fn generate(model: &ShaderModel, config: &TranslatorConfig) -> Result<String, TranslateError> {
    let main = model.entry_point()?;
    let writer = CgWriter::new(model, config)?;

    let mut out = format!("// Auto-generated from GLSL {} shader\n", model.stage);

    for func in model.helpers() {
        out.push_str(&writer.helper(func));
    }

    let return_type = match model.stage {
        ShaderStage::Vertex => "void",
        ShaderStage::Fragment => "float4",
    };
    out.push_str(&format!("{return_type} main(\n"));
    let params = writer.parameters();
    if !params.is_empty() {
        out.push_str(&params.join(",\n"));
        out.push('\n');
    }
    out.push_str("\t)\n{\n");
    out.push_str(&writer.body(&main.raw_body));
    out.push_str("\n}\n");

    Ok(out)
}

struct CgWriter<'a> {
    model: &'a ShaderModel,
    config: &'a TranslatorConfig,
    /// `<matrix> * <expr>;` for every identifier the multiply rewrite covers.
    matrix_mul: Option<Regex>,
}

impl<'a> CgWriter<'a> {
    fn new(model: &'a ShaderModel, config: &'a TranslatorConfig) -> Result<Self, TranslateError> {
        Ok(Self {
            model,
            config,
            matrix_mul: matrix_mul_pattern(&matrix_identifiers(model, config))?,
        })
    }

    /// One line per parameter: attributes, uniforms, then outputs/varyings.
    fn parameters(&self) -> Vec<String> {
        let mut params = Vec::new();

        for attr in &self.model.attributes {
            params.push(format!("\t{} {}", attr.data_type, attr.name));
        }

        let mut texunit = 0;
        for uniform in &self.model.uniforms {
            if uniform.is_sampler() {
                params.push(format!(
                    "\tuniform {} {} : TEXUNIT{texunit}",
                    uniform.data_type, uniform.name
                ));
                texunit += 1;
            } else {
                params.push(format!("\tuniform {} {}", uniform.data_type, uniform.name));
            }
        }

        let direction = match self.model.stage {
            ShaderStage::Vertex => {
                params.push(format!(
                    "\tout float4 {} : POSITION",
                    self.config.position_output()
                ));
                "out"
            }
            ShaderStage::Fragment => "in",
        };

        for (texcoord, varying) in self.model.varyings.iter().enumerate() {
            params.push(format!(
                "\t{direction} {} {} : TEXCOORD{texcoord}",
                varying.data_type, varying.name
            ));
        }

        params
    }

    fn helper(&self, func: &FunctionDecl) -> String {
        format!(
            "{} {} ({})\n{{\n{}\n}}\n\n",
            func.return_type,
            func.name,
            func.raw_parameters,
            self.body(&func.raw_body)
        )
    }

    /// Reformat a raw body: fragment colour writes become `return`, one
    /// statement per line, and `m * v;` becomes `mul( v, m );`.
    fn body(&self, raw: &str) -> String {
        let mut body = raw.trim().to_string();
        if body.is_empty() {
            return body;
        }

        if self.model.stage == ShaderStage::Fragment {
            body = FRAG_COLOR_ASSIGN.replace_all(&body, "return ").into_owned();
        }
        body = STATEMENT_END.replace_all(&body, ";\n\t").into_owned();
        if let Some(matrix_mul) = &self.matrix_mul {
            body = matrix_mul
                .replace_all(&body, "mul( ${expr}, ${matrix} );")
                .into_owned();
        }

        format!("\t{}", body.trim_end())
    }
}

/// The configured transform-matrix name, plus every matrix-typed uniform
/// when the generalised rewrite is enabled.
fn matrix_identifiers<'a>(model: &'a ShaderModel, config: &'a TranslatorConfig) -> Vec<&'a str> {
    let mut names = Vec::new();
    if !config.mvp_identifier.is_empty() {
        names.push(config.mvp_identifier.as_str());
    }
    if config.rewrite_all_matrix_uniforms {
        for uniform in model.uniforms.iter().filter(|u| u.is_matrix()) {
            if !names.contains(&uniform.name.as_str()) {
                names.push(uniform.name.as_str());
            }
        }
    }
    names
}

/// Fails only when the identifiers blow the regex size limit.
fn matrix_mul_pattern(names: &[&str]) -> Result<Option<Regex>, TranslateError> {
    if names.is_empty() {
        return Ok(None);
    }
    let alternatives: Vec<String> = names.iter().map(|n| regex::escape(n)).collect();
    let pattern = format!(
        r"\b(?P<matrix>{})\b[ ]*\*[ ]*(?P<expr>.*?);",
        alternatives.join("|")
    );
    let regex = Regex::new(&pattern).map_err(|e| TranslateError::MatrixRewritePattern {
        names: names.iter().map(|n| n.to_string()).collect(),
        reason: e.to_string(),
    })?;
    Ok(Some(regex))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Declaration;

    fn model(stage: ShaderStage, main_body: &str) -> ShaderModel {
        let mut model = ShaderModel::new(stage);
        model.functions.push(FunctionDecl {
            name: "main".into(),
            return_type: "void".into(),
            raw_parameters: String::new(),
            raw_body: main_body.into(),
        });
        model
    }

    #[test]
    fn test_sampler_texunits_count_only_samplers() {
        let mut m = model(ShaderStage::Fragment, "");
        m.uniforms = vec![
            Declaration::new("sampler2D", "a"),
            Declaration::new("float", "b"),
            Declaration::new("sampler2D", "c"),
        ];
        let config = TranslatorConfig::default();
        let params = CgWriter::new(&m, &config).unwrap().parameters();
        assert_eq!(
            params,
            vec![
                "\tuniform sampler2D a : TEXUNIT0",
                "\tuniform float b",
                "\tuniform sampler2D c : TEXUNIT1",
            ]
        );
    }

    #[test]
    fn test_fragment_varyings_are_inputs() {
        let mut m = model(ShaderStage::Fragment, "");
        m.varyings = vec![
            Declaration::new("float2", "uv"),
            Declaration::new("float3", "normal"),
        ];
        let config = TranslatorConfig::default();
        let params = CgWriter::new(&m, &config).unwrap().parameters();
        assert_eq!(
            params,
            vec!["\tin float2 uv : TEXCOORD0", "\tin float3 normal : TEXCOORD1"]
        );
    }

    #[test]
    fn test_vertex_position_precedes_varyings() {
        let mut m = model(ShaderStage::Vertex, "");
        m.attributes = vec![Declaration::new("float4", "pos")];
        m.varyings = vec![Declaration::new("float2", "uv")];
        let config = TranslatorConfig::default();
        let params = CgWriter::new(&m, &config).unwrap().parameters();
        assert_eq!(
            params,
            vec![
                "\tfloat4 pos",
                "\tout float4 v_position : POSITION",
                "\tout float2 uv : TEXCOORD0",
            ]
        );
    }

    #[test]
    fn test_fragment_color_becomes_return() {
        let m = model(ShaderStage::Fragment, " gl_FragColor = tex2D(tex, uv); ");
        let config = TranslatorConfig::default();
        assert_eq!(
            CgWriter::new(&m, &config).unwrap().body(&m.functions[0].raw_body),
            "\treturn tex2D(tex, uv);"
        );
    }

    #[test]
    fn test_vertex_keeps_assignment() {
        let m = model(ShaderStage::Vertex, " v_position = pos; ");
        let config = TranslatorConfig::default();
        assert_eq!(
            CgWriter::new(&m, &config).unwrap().body(&m.functions[0].raw_body),
            "\tv_position = pos;"
        );
    }

    #[test]
    fn test_statements_split_per_line() {
        let m = model(ShaderStage::Fragment, "float a = 1.0; float b = a;   return a;");
        let config = TranslatorConfig::default();
        assert_eq!(
            CgWriter::new(&m, &config).unwrap().body(&m.functions[0].raw_body),
            "\tfloat a = 1.0;\n\tfloat b = a;\n\treturn a;"
        );
    }

    #[test]
    fn test_mvp_rewrite_is_narrow() {
        let m = model(ShaderStage::Vertex, "");
        let config = TranslatorConfig::default();
        let writer = CgWriter::new(&m, &config).unwrap();
        assert_eq!(writer.body("u_mvp * pos;"), "\tmul( pos, u_mvp );");
        assert_eq!(writer.body("other_mat * pos;"), "\tother_mat * pos;");
        assert_eq!(writer.body("my_u_mvp * pos;"), "\tmy_u_mvp * pos;");
        assert_eq!(
            writer.body("v_position = u_mvp*float4(p, 1.0); x = 1.0;"),
            "\tv_position = mul( float4(p, 1.0), u_mvp );\n\tx = 1.0;"
        );
    }

    #[test]
    fn test_configured_mvp_identifier() {
        let m = model(ShaderStage::Vertex, "");
        let config = TranslatorConfig {
            mvp_identifier: "u_wvp".into(),
            ..TranslatorConfig::default()
        };
        let writer = CgWriter::new(&m, &config).unwrap();
        assert_eq!(writer.body("u_wvp * pos;"), "\tmul( pos, u_wvp );");
        assert_eq!(writer.body("u_mvp * pos;"), "\tu_mvp * pos;");
    }

    #[test]
    fn test_all_matrix_uniforms_rewrite() {
        let mut m = model(ShaderStage::Vertex, "");
        m.uniforms = vec![
            Declaration::new("float4x4", "u_model"),
            Declaration::new("float4", "u_tint"),
        ];
        let config = TranslatorConfig {
            rewrite_all_matrix_uniforms: true,
            ..TranslatorConfig::default()
        };
        let writer = CgWriter::new(&m, &config).unwrap();
        assert_eq!(writer.body("u_model * pos;"), "\tmul( pos, u_model );");
        assert_eq!(writer.body("u_mvp * pos;"), "\tmul( pos, u_mvp );");
        assert_eq!(writer.body("u_tint * c;"), "\tu_tint * c;");
    }

    #[test]
    fn test_generate_layout() {
        let mut m = model(ShaderStage::Fragment, " gl_FragColor = shade(uv); ");
        m.functions.insert(
            0,
            FunctionDecl {
                name: "shade".into(),
                return_type: "float4".into(),
                raw_parameters: "float2 uv".into(),
                raw_body: " return float4(uv, 0.0, 1.0); ".into(),
            },
        );
        m.varyings = vec![Declaration::new("float2", "uv")];

        let out = generate(&m, &TranslatorConfig::default()).unwrap();
        assert_eq!(
            out,
            "// Auto-generated from GLSL fragment shader\n\
             float4 shade (float2 uv)\n\
             {\n\
             \treturn float4(uv, 0.0, 1.0);\n\
             }\n\
             \n\
             float4 main(\n\
             \tin float2 uv : TEXCOORD0\n\
             \t)\n\
             {\n\
             \treturn shade(uv);\n\
             }\n"
        );
    }

    #[test]
    fn test_matrix_pattern_covers_escaped_names() {
        let pattern = matrix_mul_pattern(&["u.mvp", "u_model"]).unwrap().unwrap();
        assert!(pattern.is_match("u_model * p;"));
        assert!(!pattern.is_match("uxmvp * p;"));
        assert!(matrix_mul_pattern(&[]).unwrap().is_none());
    }

    #[test]
    fn test_missing_entry_point() {
        let mut m = ShaderModel::new(ShaderStage::Vertex);
        m.functions.push(FunctionDecl {
            name: "helper".into(),
            return_type: "float".into(),
            raw_parameters: String::new(),
            raw_body: " return 1.0; ".into(),
        });
        assert_eq!(
            generate(&m, &TranslatorConfig::default()),
            Err(TranslateError::MissingEntryPoint)
        );
    }
}
