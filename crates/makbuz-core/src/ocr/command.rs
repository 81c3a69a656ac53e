//! Subprocess-backed OCR engine adapter.
//!
//! Wraps any external recognizer invocable as `program args.. <image>`
//! (the stock Tesseract binary, or an LLM-vision script) behind the
//! [`OcrEngine`] contract. The child process gets a hard deadline: OCR
//! engines can hang on malformed images, and a hung engine must look like
//! a failed one so the pipeline can move on.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::time::{Duration, Instant};

use image::DynamicImage;
use tracing::{debug, warn};

use crate::error::OcrError;
use crate::models::config::EngineSpec;

use super::OcrEngine;

/// Placeholder in engine argument templates for the image path.
const IMAGE_PLACEHOLDER: &str = "{image}";

/// Poll interval while waiting on the child process.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Opaque image → image transform applied before recognition.
pub type Enhancer = Box<dyn Fn(DynamicImage) -> DynamicImage + Send + Sync>;

/// OCR engine that shells out to an external program.
pub struct CommandEngine {
    name: String,
    program: String,
    args: Vec<String>,
    timeout: Duration,
    enhancer: Option<Enhancer>,
}

impl CommandEngine {
    pub fn new(spec: &EngineSpec, timeout: Duration) -> Self {
        Self {
            name: spec.name.clone(),
            program: spec.program.clone(),
            args: spec.args.clone(),
            timeout,
            enhancer: None,
        }
    }

    /// Enhance images (threshold/deskew/contrast, whatever the caller
    /// supplies) before handing them to the engine.
    pub fn with_enhancer(mut self, enhancer: Enhancer) -> Self {
        self.enhancer = Some(enhancer);
        self
    }

    /// Run the enhancer and stage the result in a temp file, or pass the
    /// original path through untouched.
    fn stage_image(&self, image: &Path) -> Option<(PathBuf, Option<tempfile::TempDir>)> {
        let Some(enhancer) = &self.enhancer else {
            return Some((image.to_path_buf(), None));
        };

        let loaded = match image::open(image) {
            Ok(loaded) => loaded,
            Err(e) => {
                debug!(engine = %self.name, "could not load image: {e}");
                return None;
            }
        };

        let enhanced = enhancer(loaded);
        let dir = match tempfile::tempdir() {
            Ok(dir) => dir,
            Err(e) => {
                debug!(engine = %self.name, "could not create temp dir: {e}");
                return None;
            }
        };

        let staged = dir.path().join("enhanced.png");
        if let Err(e) = enhanced.save(&staged) {
            debug!(engine = %self.name, "could not stage enhanced image: {e}");
            return None;
        }

        Some((staged, Some(dir)))
    }

    fn run(&self, image: &Path) -> Option<String> {
        let image_arg = image.to_str()?;
        let args: Vec<String> = self
            .args
            .iter()
            .map(|a| a.replace(IMAGE_PLACEHOLDER, image_arg))
            .collect();

        let mut child = match Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
        {
            Ok(child) => child,
            Err(e) => {
                debug!(engine = %self.name, "spawn failed: {e}");
                return None;
            }
        };

        // Drain stdout on a helper thread so a chatty child cannot fill
        // the pipe and deadlock against the wait loop below.
        let mut stdout = child.stdout.take()?;
        let reader = std::thread::spawn(move || {
            let mut buf = String::new();
            let _ = stdout.read_to_string(&mut buf);
            buf
        });

        let status = self.wait_with_deadline(&mut child)?;
        let output = reader.join().ok()?;

        if !status {
            debug!(engine = %self.name, "engine exited with failure");
            return None;
        }

        Some(output)
    }

    /// Wait for the child, killing it at the deadline. Returns `None` on
    /// timeout, `Some(success)` otherwise.
    fn wait_with_deadline(&self, child: &mut Child) -> Option<bool> {
        let deadline = Instant::now() + self.timeout;

        loop {
            match child.try_wait() {
                Ok(Some(status)) => return Some(status.success()),
                Ok(None) => {
                    if Instant::now() >= deadline {
                        warn!(engine = %self.name, "timed out after {:?}, killing", self.timeout);
                        let _ = child.kill();
                        let _ = child.wait();
                        return None;
                    }
                    std::thread::sleep(POLL_INTERVAL);
                }
                Err(e) => {
                    debug!(engine = %self.name, "wait failed: {e}");
                    let _ = child.kill();
                    let _ = child.wait();
                    return None;
                }
            }
        }
    }
}

impl OcrEngine for CommandEngine {
    fn name(&self) -> &str {
        &self.name
    }

    fn recognize(&self, image: &Path) -> Option<String> {
        if !image.is_file() {
            debug!(engine = %self.name, "not a file: {}", image.display());
            return None;
        }

        // `_staging` keeps the temp dir alive for the child's lifetime.
        let (staged, _staging) = self.stage_image(image)?;
        let output = self.run(&staged)?;

        let text = output.trim().to_uppercase();
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }

    fn verify(&self) -> Result<(), OcrError> {
        // `--version` is universally cheap and proves the binary resolves.
        match Command::new(&self.program)
            .arg("--version")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
        {
            Ok(_) => Ok(()),
            Err(e) => Err(OcrError::EngineUnavailable {
                name: self.name.clone(),
                reason: format!("cannot execute '{}': {e}", self.program),
            }),
        }
    }
}
