//! Tesseract bridge.
//!
//! Runs the `tesseract` CLI as a subprocess, feeding a PNG on stdin and reading
//! plain text from stdout. The binary is looked up on `PATH` (or taken from
//! config) on every call so that installing tesseract while the app is open
//! starts working without a restart.

use std::io::{Cursor, ErrorKind, Write};
use std::path::PathBuf;
use std::process::{Child, Command, Stdio};

use image::{GrayImage, ImageFormat};

use super::{EngineError, OcrEngine};
use crate::config::OcrConfig;

const DEFAULT_BINARY: &str = "tesseract";

/// stderr fragments tesseract prints when its install (or language data) is broken.
const INSTALL_PROBLEMS: &[&str] = &[
    "Failed loading language",
    "Error opening data file",
    "Could not initialize tesseract",
    "Please make sure the TESSDATA_PREFIX",
];

pub struct TesseractEngine {
    binary: PathBuf,
    language: String,
    page_segmentation_mode: Option<u8>,
}

impl TesseractEngine {
    pub fn new(config: &OcrConfig) -> Self {
        Self {
            binary: config
                .binary
                .clone()
                .unwrap_or_else(|| PathBuf::from(DEFAULT_BINARY)),
            language: config.language.clone(),
            page_segmentation_mode: config.page_segmentation_mode,
        }
    }

    fn resolve_binary(&self) -> Result<PathBuf, EngineError> {
        which::which(&self.binary).map_err(|err| {
            EngineError::Unavailable(format!(
                "could not find '{}' ({err}); install Tesseract OCR or set ocr.binary in the config",
                self.binary.display()
            ))
        })
    }

    fn args(&self) -> Vec<String> {
        let mut args = vec![
            "stdin".to_string(),
            "stdout".to_string(),
            "-l".to_string(),
            self.language.clone(),
        ];
        if let Some(psm) = self.page_segmentation_mode {
            args.push("--psm".to_string());
            args.push(psm.to_string());
        }
        args
    }

    /// Checks the binary starts at all. Returns its version banner.
    pub fn probe(&self) -> Result<String, EngineError> {
        let binary = self.resolve_binary()?;
        let output = Command::new(&binary)
            .arg("--version")
            .stdin(Stdio::null())
            .output()
            .map_err(|err| spawn_error(&binary, err))?;

        if !output.status.success() {
            return Err(EngineError::Unavailable(format!(
                "'{} --version' exited with {}",
                binary.display(),
                output.status
            )));
        }
        // Older releases print the banner on stderr.
        let banner = if output.stdout.is_empty() {
            output.stderr
        } else {
            output.stdout
        };
        Ok(String::from_utf8_lossy(&banner)
            .lines()
            .next()
            .unwrap_or_default()
            .to_string())
    }
}

impl OcrEngine for TesseractEngine {
    fn name(&self) -> &str {
        "tesseract"
    }

    fn recognize(&self, image: &GrayImage) -> Result<String, EngineError> {
        let binary = self.resolve_binary()?;

        let mut png = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
            .map_err(|err| EngineError::Failed(format!("PNG encoding failed: {err}")))?;

        let mut child = Command::new(&binary)
            .args(self.args())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|err| spawn_error(&binary, err))?;

        if let Some(mut stdin) = child.stdin.take() {
            // tesseract reads the whole image before writing anything, so a
            // single write then close cannot deadlock on a full stdout pipe.
            if let Err(err) = stdin.write_all(&png) {
                drop(stdin);
                reap(&mut child);
                return Err(EngineError::Failed(format!("failed to send image: {err}")));
            }
        }

        let output = child
            .wait_with_output()
            .map_err(|err| EngineError::Failed(format!("failed to read tesseract output: {err}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(classify_failure(output.status.to_string(), &stderr));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Kills and waits on a child we are giving up on so it does not linger as a zombie.
fn reap(child: &mut Child) {
    if let Err(err) = child.kill() {
        log::debug!("tesseract already exited: {err}");
    }
    if let Err(err) = child.wait() {
        log::warn!("Failed to reap tesseract process: {err}");
    }
}

fn spawn_error(binary: &std::path::Path, err: std::io::Error) -> EngineError {
    match err.kind() {
        ErrorKind::NotFound | ErrorKind::PermissionDenied => EngineError::Unavailable(format!(
            "could not start {}: {err}",
            binary.display()
        )),
        _ => EngineError::Failed(format!("could not start {}: {err}", binary.display())),
    }
}

fn classify_failure(status: String, stderr: &str) -> EngineError {
    let detail = stderr.trim();
    if INSTALL_PROBLEMS.iter().any(|needle| detail.contains(needle)) {
        EngineError::Unavailable(format!("tesseract is not usable ({status}): {detail}"))
    } else {
        EngineError::Failed(format!("tesseract exited with {status}: {detail}"))
    }
}
