//! Gateway running an external OCR program over a temporary file.

use std::io::Write;
use std::process::Command;

use tracing::{debug, info};

use super::{check_sentinel, OcrGateway};
use crate::error::OcrError;
use crate::models::config::OcrConfig;

const INPUT_PLACEHOLDER: &str = "{input}";

/// Runs e.g. `tesseract {input} stdout -l spa` and reads its stdout.
pub struct CommandGateway {
    program: String,
    args: Vec<String>,
}

impl CommandGateway {
    pub fn new(config: &OcrConfig) -> Result<Self, OcrError> {
        let program = config.command.trim();
        if program.is_empty() {
            return Err(OcrError::NotConfigured("missing OCR command".to_string()));
        }
        Ok(Self {
            program: program.to_string(),
            args: config.command_args.clone(),
        })
    }
}

impl OcrGateway for CommandGateway {
    fn analyze(&self, image: &[u8]) -> Result<String, OcrError> {
        // Removed when dropped, on every return path.
        let mut file = tempfile::Builder::new()
            .prefix("aduana-")
            .tempfile()
            .map_err(|e| OcrError::Command(format!("cannot create temp file: {}", e)))?;
        file.write_all(image)
            .and_then(|_| file.flush())
            .map_err(|e| OcrError::Command(format!("cannot write temp file: {}", e)))?;

        let input = file.path().to_string_lossy().into_owned();
        let args: Vec<String> = self
            .args
            .iter()
            .map(|a| a.replace(INPUT_PLACEHOLDER, &input))
            .collect();

        debug!(program = %self.program, ?args, "running OCR command");
        let output = Command::new(&self.program)
            .args(&args)
            .output()
            .map_err(|e| OcrError::Command(format!("{}: {}", self.program, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(OcrError::Command(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                stderr.trim()
            )));
        }

        let text = String::from_utf8_lossy(&output.stdout).into_owned();
        info!(program = %self.program, chars = text.len(), "OCR command finished");
        check_sentinel(text)
    }

    fn name(&self) -> &str {
        &self.program
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::path::Path;

    fn gateway(program: &str, args: &[&str]) -> CommandGateway {
        let config = OcrConfig {
            command: program.to_string(),
            command_args: args.iter().map(|a| a.to_string()).collect(),
            ..Default::default()
        };
        CommandGateway::new(&config).unwrap()
    }

    #[test]
    fn test_reads_stdout() {
        let gw = gateway("cat", &["{input}"]);
        let text = gw.analyze(b"Folio 4560010758").unwrap();
        assert_eq!(text, "Folio 4560010758");
    }

    #[test]
    fn test_temp_file_is_removed() {
        let gw = gateway("sh", &["-c", "echo {input}"]);
        let path = gw.analyze(b"imagen").unwrap();
        let path = path.trim();
        assert!(path.contains("aduana-"));
        assert!(!Path::new(path).exists());
    }

    #[test]
    fn test_failing_command() {
        let gw = gateway("false", &[]);
        assert!(matches!(gw.analyze(b"x"), Err(OcrError::Command(_))));
    }

    #[test]
    fn test_missing_program() {
        let gw = gateway("aduana-ocr-that-does-not-exist", &["{input}"]);
        assert!(matches!(gw.analyze(b"x"), Err(OcrError::Command(_))));
    }

    #[test]
    fn test_empty_output_is_error() {
        let gw = gateway("true", &[]);
        assert!(matches!(gw.analyze(b"x"), Err(OcrError::EmptyText)));
    }

    #[test]
    fn test_blank_command_is_not_configured() {
        let config = OcrConfig {
            command: "  ".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            CommandGateway::new(&config),
            Err(OcrError::NotConfigured(_))
        ));
    }
}
