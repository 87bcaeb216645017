use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// GLSL sources to translate (`.vp` vertex, `.fp` fragment)
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Write outputs here instead of next to each input
    #[arg(short, long)]
    pub out_dir: Option<PathBuf>,

    /// JSON translator config (replacement table, matrix rewrite)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Uniform name treated as the model-view-projection matrix
    #[arg(long)]
    pub mvp: Option<String>,

    /// Rewrite `m * v` into `mul( v, m )` for every matrix uniform
    #[arg(long)]
    pub all_matrix_uniforms: bool,
}
