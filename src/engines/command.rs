//! Subprocess-backed engine adapters.
//!
//! Each adapter wraps one configured external tool (a separation model
//! wrapper, a diarization script, a TTS binary, ...) behind the matching
//! engine trait. Audio crosses the process boundary as WAV files in a
//! per-call scratch directory; structured results come back as JSON on
//! stdout, text results as plain stdout. A non-zero exit status or
//! unparseable output becomes an engine error naming the engine.
//!
//! Commands are configured as argv vectors (program first); per-call
//! arguments are appended. See `config.toml` `[engines]`.

use crate::audio::{AudioBuffer, read_wav, write_wav};
use crate::engines::classify::{HeuristicClassifier, SpeechClassifier};
use crate::engines::{
    DiarizedTurn, Diarizer, Separator, Synthesizer, Transcriber, TranscriptFragment, Translator,
};
use crate::error::{RedubError, Result};
use crate::timeline::SegmentKind;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::atomic::{AtomicU64, Ordering};

/// Monotonic counter so concurrent calls never share a scratch directory.
static CALL_SEQ: AtomicU64 = AtomicU64::new(0);

/// Scratch directory for one engine call, removed when the call finishes.
struct CallDir {
    path: PathBuf,
}

impl CallDir {
    fn create(root: &Path, engine: &'static str) -> Result<Self> {
        let path = root.join(format!(
            "{}-call-{}-{}",
            engine,
            std::process::id(),
            CALL_SEQ.fetch_add(1, Ordering::Relaxed)
        ));
        fs::create_dir_all(&path)?;
        Ok(Self { path })
    }

    fn file(&self, name: &str) -> PathBuf {
        self.path.join(name)
    }
}

impl Drop for CallDir {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_dir_all(&self.path) {
            log::warn!(
                "failed to remove engine scratch dir {}: {}",
                self.path.display(),
                e
            );
        }
    }
}

fn engine_error(engine: &'static str, message: impl Into<String>) -> RedubError {
    RedubError::Engine {
        engine,
        message: message.into(),
    }
}

/// Run `argv ++ extra_args`, optionally feeding `stdin_text`, and return
/// stdout. Maps spawn failures and non-zero exits onto the engine's error.
fn run_command(
    engine: &'static str,
    argv: &[String],
    extra_args: &[&str],
    stdin_text: Option<&str>,
) -> Result<String> {
    let (program, base_args) = argv
        .split_first()
        .ok_or_else(|| engine_error(engine, "empty command"))?;

    let mut command = Command::new(program);
    command
        .args(base_args)
        .args(extra_args)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    command.stdin(if stdin_text.is_some() {
        Stdio::piped()
    } else {
        Stdio::null()
    });

    let mut child = command
        .spawn()
        .map_err(|e| engine_error(engine, format!("failed to spawn {}: {}", program, e)))?;

    if let Some(text) = stdin_text
        && let Some(mut stdin) = child.stdin.take()
    {
        stdin
            .write_all(text.as_bytes())
            .map_err(|e| engine_error(engine, format!("failed to write stdin: {}", e)))?;
    }

    let output = child
        .wait_with_output()
        .map_err(|e| engine_error(engine, format!("failed to wait for {}: {}", program, e)))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(engine_error(
            engine,
            format!(
                "{} exited with {:?}: {}",
                program,
                output.status.code(),
                stderr.trim()
            ),
        ));
    }

    Ok(String::from_utf8_lossy(&output.stdout).to_string())
}

/// Separation adapter: `cmd <input.wav> <vocals.wav> <background.wav>`.
pub struct CommandSeparator {
    argv: Vec<String>,
    scratch_root: PathBuf,
}

impl CommandSeparator {
    pub fn new(argv: Vec<String>, scratch_root: PathBuf) -> Self {
        Self { argv, scratch_root }
    }
}

impl Separator for CommandSeparator {
    fn separate(&self, recording: &AudioBuffer) -> Result<(AudioBuffer, AudioBuffer)> {
        const ENGINE: &str = "separation";
        let dir = CallDir::create(&self.scratch_root, ENGINE)?;
        let input = dir.file("input.wav");
        let vocals_path = dir.file("vocals.wav");
        let background_path = dir.file("background.wav");
        write_wav(&input, recording)?;

        run_command(
            ENGINE,
            &self.argv,
            &[
                &input.to_string_lossy(),
                &vocals_path.to_string_lossy(),
                &background_path.to_string_lossy(),
            ],
            None,
        )?;

        let vocals = read_wav(&vocals_path)
            .map_err(|e| engine_error(ENGINE, format!("no vocal stem produced: {}", e)))?;
        let background = read_wav(&background_path)
            .map_err(|e| engine_error(ENGINE, format!("no background stem produced: {}", e)))?;
        Ok((vocals, background))
    }
}

/// Diarization adapter: `cmd <vocals.wav>`, JSON turn array on stdout.
pub struct CommandDiarizer {
    argv: Vec<String>,
    scratch_root: PathBuf,
}

impl CommandDiarizer {
    pub fn new(argv: Vec<String>, scratch_root: PathBuf) -> Self {
        Self { argv, scratch_root }
    }
}

impl Diarizer for CommandDiarizer {
    fn diarize(&self, vocals: &AudioBuffer) -> Result<Vec<DiarizedTurn>> {
        const ENGINE: &str = "diarization";
        let dir = CallDir::create(&self.scratch_root, ENGINE)?;
        let input = dir.file("vocals.wav");
        write_wav(&input, vocals)?;

        let stdout = run_command(ENGINE, &self.argv, &[&input.to_string_lossy()], None)?;
        serde_json::from_str(&stdout)
            .map_err(|e| engine_error(ENGINE, format!("invalid turn JSON: {}", e)))
    }
}

/// Transcription adapter: `cmd <vocals.wav>`, JSON fragment array on stdout.
pub struct CommandTranscriber {
    argv: Vec<String>,
    scratch_root: PathBuf,
}

impl CommandTranscriber {
    pub fn new(argv: Vec<String>, scratch_root: PathBuf) -> Self {
        Self { argv, scratch_root }
    }
}

impl Transcriber for CommandTranscriber {
    fn transcribe(&self, vocals: &AudioBuffer) -> Result<Vec<TranscriptFragment>> {
        const ENGINE: &str = "transcription";
        let dir = CallDir::create(&self.scratch_root, ENGINE)?;
        let input = dir.file("vocals.wav");
        write_wav(&input, vocals)?;

        let stdout = run_command(ENGINE, &self.argv, &[&input.to_string_lossy()], None)?;
        serde_json::from_str(&stdout)
            .map_err(|e| engine_error(ENGINE, format!("invalid fragment JSON: {}", e)))
    }
}

/// Translation adapter: `cmd <language>`, source text on stdin, translated
/// text on stdout.
pub struct CommandTranslator {
    argv: Vec<String>,
}

impl CommandTranslator {
    pub fn new(argv: Vec<String>) -> Self {
        Self { argv }
    }
}

impl Translator for CommandTranslator {
    fn translate(&self, text: &str, target_language: &str) -> Result<String> {
        let stdout = run_command("translation", &self.argv, &[target_language], Some(text))?;
        Ok(stdout.trim_end_matches('\n').to_string())
    }
}

/// Synthesis adapter: `cmd <language> <out.wav>`, text on stdin.
pub struct CommandSynthesizer {
    argv: Vec<String>,
    scratch_root: PathBuf,
}

impl CommandSynthesizer {
    pub fn new(argv: Vec<String>, scratch_root: PathBuf) -> Self {
        Self { argv, scratch_root }
    }
}

impl Synthesizer for CommandSynthesizer {
    fn synthesize(&self, text: &str, target_language: &str) -> Result<AudioBuffer> {
        const ENGINE: &str = "synthesis";
        let dir = CallDir::create(&self.scratch_root, ENGINE)?;
        let out = dir.file("synth.wav");

        run_command(
            ENGINE,
            &self.argv,
            &[target_language, &out.to_string_lossy()],
            Some(text),
        )?;

        read_wav(&out).map_err(|e| engine_error(ENGINE, format!("no audio produced: {}", e)))
    }
}

/// Model-backed classifier: `cmd <turn.wav>`, label `speech` or `singing` on
/// stdout. Falls back to the duration/energy heuristic on any failure, so
/// classification stays total even when the model tool is broken.
pub struct CommandClassifier {
    argv: Vec<String>,
    scratch_root: PathBuf,
    fallback: HeuristicClassifier,
}

impl CommandClassifier {
    pub fn new(argv: Vec<String>, scratch_root: PathBuf) -> Self {
        Self {
            argv,
            scratch_root,
            fallback: HeuristicClassifier::default(),
        }
    }

    fn classify_with_model(&self, vocals: &AudioBuffer, turn: &DiarizedTurn) -> Result<SegmentKind> {
        const ENGINE: &str = "classification";
        let dir = CallDir::create(&self.scratch_root, ENGINE)?;
        let input = dir.file("turn.wav");
        write_wav(&input, &vocals.slice_secs(turn.start, turn.end))?;

        let stdout = run_command(ENGINE, &self.argv, &[&input.to_string_lossy()], None)?;
        match stdout.trim() {
            "speech" => Ok(SegmentKind::Speech),
            "singing" => Ok(SegmentKind::Singing),
            other => Err(engine_error(ENGINE, format!("unknown label {:?}", other))),
        }
    }
}

impl SpeechClassifier for CommandClassifier {
    fn classify(&self, vocals: &AudioBuffer, turn: &DiarizedTurn) -> SegmentKind {
        match self.classify_with_model(vocals, turn) {
            Ok(kind) => kind,
            Err(e) => {
                log::warn!("classification model failed ({}), using heuristic", e);
                self.fallback.classify(vocals, turn)
            }
        }
    }
}
