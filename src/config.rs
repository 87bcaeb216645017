//! Translator configuration: the identifier substitution table plus the
//! knobs the code generator reads.
//!
//! Everything here is built once and only ever read afterwards, so one
//! `TranslatorConfig` can be shared by any number of translations.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Default name of the out-parameter bound to `POSITION`.
pub const DEFAULT_POSITION_OUTPUT: &str = "v_position";

/// Default name of the combined model-view-projection uniform.
pub const DEFAULT_MVP_IDENTIFIER: &str = "u_mvp";

/// Source identifier → replacement text.
///
/// Keys are whole identifiers; the massager never matches them inside a
/// longer identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReplacementTable(HashMap<String, String>);

impl ReplacementTable {
    pub fn get(&self, ident: &str) -> Option<&str> {
        self.0.get(ident).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for ReplacementTable {
    fn default() -> Self {
        [
            // types
            ("vec2", "float2"),
            ("vec3", "float3"),
            ("vec4", "float4"),
            ("mat2", "float2x2"),
            ("mat3", "float3x3"),
            ("mat4", "float4x4"),
            // precision qualifiers have no Cg counterpart
            ("lowp", ""),
            ("mediump", ""),
            ("highp", ""),
            // intrinsics
            ("mix", "lerp"),
            ("fract", "frac"),
            ("inversesqrt", "rsqrt"),
            ("texture2D", "tex2D"),
            // built-in outputs
            ("gl_Position", DEFAULT_POSITION_OUTPUT),
            ("gl_PointSize", "float psize"),
        ]
        .into_iter()
        .collect()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ReplacementTable {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslatorConfig {
    pub replacements: ReplacementTable,
    /// Left operand recognised by the `mvp * expr;` → `mul( expr, mvp );` rewrite.
    pub mvp_identifier: String,
    /// Also apply the multiply rewrite to every matrix-typed uniform.
    pub rewrite_all_matrix_uniforms: bool,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            replacements: ReplacementTable::default(),
            mvp_identifier: DEFAULT_MVP_IDENTIFIER.to_string(),
            rewrite_all_matrix_uniforms: false,
        }
    }
}

impl TranslatorConfig {
    /// Name of the vertex out-parameter bound to `POSITION`.
    ///
    /// Taken from the `gl_Position` replacement when the table has one. The
    /// massager renames `gl_Position` to this name even when it doesn't.
    pub fn position_output(&self) -> &str {
        match self.replacements.get("gl_Position") {
            Some(name) if !name.trim().is_empty() => name.trim(),
            _ => DEFAULT_POSITION_OUTPUT,
        }
    }
}

/// Parse a JSON config. Missing fields fall back to their defaults.
pub fn load_from_json(json: &str) -> Result<TranslatorConfig> {
    let config: TranslatorConfig = serde_json::from_str(json)?;
    Ok(config)
}

pub fn load(path: &Path) -> Result<TranslatorConfig> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Reading config {}", path.display()))?;
    load_from_json(&json).with_context(|| format!("Parsing config {}", path.display()))
}
