//! # Saorsa Paint Replay
//!
//! Headless driver for the paint core. Reads a JSON array of session
//! commands, replays them in order and writes the flattened image.
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p paint-cli -- strokes.json --out drawing.png --layered drawing.json
//! ```
//!
//! A script looks like:
//!
//! ```json
//! [
//!   {"type": "set_color", "color": "#ff0000"},
//!   {"type": "pointer_down", "x": 10, "y": 10},
//!   {"type": "pointer_move", "x": 50, "y": 10},
//!   {"type": "pointer_up"}
//! ]
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use paint_core::{EditorSession, Rgb, SessionCommand, SessionConfig};
use paint_export::{ExportConfig, ExportFormat, LayerExporter};

/// Command-line arguments for paint-replay.
#[derive(Debug, Clone, Parser)]
#[command(name = "paint-replay")]
#[command(about = "Replay a paint command script and export the result")]
#[command(version)]
pub struct CliArgs {
    /// JSON file holding an array of session commands
    pub script: PathBuf,

    /// Flattened output image (.png, .jpg or .jpeg)
    #[arg(long, short, default_value = "drawing.png")]
    pub out: PathBuf,

    /// Also write a layered JSON document to this path
    #[arg(long)]
    pub layered: Option<PathBuf>,

    /// Session configuration JSON file
    #[arg(long, env = "PAINT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Canvas width in pixels (overrides the config file)
    #[arg(long)]
    pub width: Option<u32>,

    /// Canvas height in pixels (overrides the config file)
    #[arg(long)]
    pub height: Option<u32>,

    /// Background color as #rrggbb (overrides the config file)
    #[arg(long)]
    pub background: Option<String>,

    /// Maximum undo depth (overrides the config file)
    #[arg(long)]
    pub max_history: Option<usize>,

    /// Keep going when a command fails instead of aborting
    #[arg(long)]
    pub keep_going: bool,
}

impl CliArgs {
    /// Build the session configuration from the config file and overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be read or parsed, or the
    /// background color is malformed.
    pub fn session_config(&self) -> anyhow::Result<SessionConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let json = std::fs::read_to_string(path)
                    .with_context(|| format!("reading config {}", path.display()))?;
                SessionConfig::from_json(&json)
                    .with_context(|| format!("parsing config {}", path.display()))?
            }
            None => SessionConfig::default(),
        };

        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        if let Some(ref background) = self.background {
            config.background = Rgb::parse_hex(background)?;
        }
        if let Some(max_history) = self.max_history {
            config.max_history = max_history;
        }
        Ok(config)
    }
}

/// Outcome of a replay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplaySummary {
    /// Commands that succeeded.
    pub applied: usize,
    /// Commands that failed (only non-zero with `--keep-going`).
    pub failed: usize,
    /// Layer count at the end.
    pub layers: usize,
    /// Undo stack depth at the end.
    pub undo_depth: usize,
}

/// Apply `commands` to `session` in order.
///
/// # Errors
///
/// Returns the first failing command's error unless `keep_going` is set,
/// in which case failures are logged and counted.
pub fn replay(
    session: &mut EditorSession,
    commands: &[SessionCommand],
    keep_going: bool,
) -> anyhow::Result<ReplaySummary> {
    let mut applied = 0;
    let mut failed = 0;
    for (i, command) in commands.iter().enumerate() {
        match session.apply(command) {
            Ok(()) => applied += 1,
            Err(e) if keep_going => {
                tracing::warn!("Command {i} ({command:?}) failed: {e}");
                failed += 1;
            }
            Err(e) => return Err(e).with_context(|| format!("command {i} ({command:?})")),
        }
    }
    Ok(ReplaySummary {
        applied,
        failed,
        layers: session.layers().len(),
        undo_depth: session.history().undo_depth(),
    })
}

/// Run the replay described by `args`, writing every requested output.
///
/// # Errors
///
/// Returns an error if reading, replaying or writing fails.
pub fn run(args: &CliArgs) -> anyhow::Result<ReplaySummary> {
    let config = args.session_config()?;
    let script = std::fs::read_to_string(&args.script)
        .with_context(|| format!("reading script {}", args.script.display()))?;
    let commands = SessionCommand::parse_script(&script)
        .with_context(|| format!("parsing script {}", args.script.display()))?;
    tracing::info!(
        "Replaying {} commands on a {}x{} canvas",
        commands.len(),
        config.width,
        config.height
    );

    let background = config.background;
    let mut session = EditorSession::new(config)?;
    let summary = replay(&mut session, &commands, args.keep_going)?;

    let exporter = LayerExporter::new(ExportConfig {
        background,
        ..ExportConfig::default()
    });
    let layers = session.export_layers();

    let format = output_format(&args.out)?;
    let bytes = exporter.export(&layers, format)?;
    std::fs::write(&args.out, bytes)
        .with_context(|| format!("writing {}", args.out.display()))?;
    tracing::info!("Wrote {}", args.out.display());

    if let Some(ref path) = args.layered {
        let document = exporter.layered_document(&layers)?;
        std::fs::write(path, document.to_json()?)
            .with_context(|| format!("writing {}", path.display()))?;
        tracing::info!("Wrote layered document {}", path.display());
    }

    Ok(summary)
}

fn output_format(path: &Path) -> anyhow::Result<ExportFormat> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or_default();
    ExportFormat::from_extension(ext)
        .ok_or_else(|| anyhow::anyhow!("unsupported output extension: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCRIPT: &str = r##"[
        {"type": "set_color", "color": "#ff0000"},
        {"type": "pointer_down", "x": 2, "y": 8},
        {"type": "pointer_move", "x": 30, "y": 8},
        {"type": "pointer_up"},
        {"type": "add_layer"},
        {"type": "rename_layer", "index": 1, "name": "Notes"}
    ]"##;

    fn args_for(dir: &Path, script: &str) -> CliArgs {
        let script_path = dir.join("script.json");
        std::fs::write(&script_path, script).unwrap();
        CliArgs::parse_from([
            "paint-replay",
            script_path.to_str().unwrap(),
            "--out",
            dir.join("out.png").to_str().unwrap(),
            "--width",
            "32",
            "--height",
            "16",
        ])
    }

    #[test]
    fn run_writes_png_and_layered_document() {
        let dir = tempfile::tempdir().unwrap();
        let mut args = args_for(dir.path(), SCRIPT);
        args.layered = Some(dir.path().join("layers.json"));

        let summary = run(&args).unwrap();
        assert_eq!(summary.applied, 6);
        assert_eq!(summary.failed, 0);
        assert_eq!(summary.layers, 2);
        assert_eq!(summary.undo_depth, 3);

        let png = std::fs::read(dir.path().join("out.png")).unwrap();
        assert_eq!(&png[0..4], &[137, 80, 78, 71]);

        let doc: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(dir.path().join("layers.json")).unwrap())
                .unwrap();
        assert_eq!(doc["layers"][1]["name"], "Notes");
        assert_eq!(doc["width"], 32);
    }

    #[test]
    fn failing_command_aborts_unless_keep_going() {
        let script = r#"[{"type": "select_layer", "index": 5}, {"type": "add_layer"}]"#;
        let dir = tempfile::tempdir().unwrap();
        let mut args = args_for(dir.path(), script);
        assert!(run(&args).is_err());

        args.keep_going = true;
        let summary = run(&args).unwrap();
        assert_eq!(summary.applied, 1);
        assert_eq!(summary.failed, 1);
    }

    #[test]
    fn overrides_apply_on_top_of_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("config.json");
        std::fs::write(&config_path, r#"{"width": 100, "height": 50, "max_history": 7}"#).unwrap();

        let args = CliArgs::parse_from([
            "paint-replay",
            "script.json",
            "--config",
            config_path.to_str().unwrap(),
            "--height",
            "64",
            "--background",
            "#000000",
        ]);
        let config = args.session_config().unwrap();
        assert_eq!(config.width, 100);
        assert_eq!(config.height, 64);
        assert_eq!(config.max_history, 7);
        assert_eq!(config.background, Rgb::BLACK);
    }

    #[test]
    fn unknown_output_extension_is_rejected() {
        assert!(output_format(Path::new("drawing.psd")).is_err());
        assert_eq!(output_format(Path::new("a.JPG")).unwrap(), ExportFormat::Jpeg);
    }
}
