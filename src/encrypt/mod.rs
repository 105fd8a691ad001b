//! Encryption of the archive for its recipients
//!
//! Drives the system `gpg` binary. All key material, recipients, and the
//! key-store location are supplied explicitly through [`GpgConfig`];
//! this module has no built-in recipients and no process-wide defaults.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use crate::error::{EncryptError, EncryptResult};

/// Extension of the encrypted output artifact
pub const ENCRYPTED_EXTENSION: &str = "ved";

/// Explicit encryption configuration, owned by the caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GpgConfig {
    /// Key-store directory handed to gpg as `--homedir`
    pub home_dir: PathBuf,
    /// Recipients the archive is encrypted for; every one must have a
    /// public key in the store after import
    pub recipients: Vec<String>,
    /// Public key files imported into the store during init
    pub key_files: Vec<PathBuf>,
}

/// A verified gpg context: binary located, keys imported, recipients
/// checked
#[derive(Debug)]
pub struct Gpg {
    binary: String,
    config: GpgConfig,
}

impl Gpg {
    /// Initialize the key store and verify every recipient has a key
    pub fn init(config: GpgConfig) -> EncryptResult<Self> {
        let binary = locate_binary().ok_or(EncryptError::BinaryNotFound)?;
        fs::create_dir_all(&config.home_dir)?;

        let gpg = Self { binary, config };
        gpg.import_keys()?;
        gpg.verify_recipients()?;
        Ok(gpg)
    }

    pub fn recipients(&self) -> &[String] {
        &self.config.recipients
    }

    /// Encrypt `source` to a sibling `.ved` file
    ///
    /// The source archive is consumed whether or not encryption
    /// succeeded; a partial output never survives a failure.
    pub fn encrypt(&self, source: &Path) -> EncryptResult<PathBuf> {
        let output_path = source.with_extension(ENCRYPTED_EXTENSION);
        let encrypted = self.run_encrypt(source, &output_path);

        if source.exists() {
            let _ = fs::remove_file(source);
        }

        match encrypted {
            Ok(()) => Ok(output_path),
            Err(err) => {
                if output_path.exists() {
                    let _ = fs::remove_file(&output_path);
                }
                Err(err)
            }
        }
    }

    fn command(&self) -> Command {
        let mut command = Command::new(&self.binary);
        command
            .arg("--homedir")
            .arg(&self.config.home_dir)
            .arg("--batch")
            .arg("--no-tty");
        command
    }

    fn import_keys(&self) -> EncryptResult<()> {
        for key_file in &self.config.key_files {
            let output = self.command().arg("--import").arg(key_file).output()?;
            if !output.status.success() {
                return Err(EncryptError::KeyImport {
                    path: key_file.clone(),
                    message: stderr_text(&output),
                });
            }
        }
        Ok(())
    }

    /// Every configured recipient must appear in a uid of the key
    /// listing as `<address>`
    fn verify_recipients(&self) -> EncryptResult<()> {
        let output = self
            .command()
            .arg("--list-keys")
            .arg("--with-colons")
            .output()?;
        let listing = String::from_utf8_lossy(&output.stdout);

        let missing: Vec<String> = self
            .config
            .recipients
            .iter()
            .filter(|recipient| !uid_present(&listing, recipient))
            .cloned()
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(EncryptError::MissingPublicKeys(missing))
        }
    }

    fn run_encrypt(&self, source: &Path, output_path: &Path) -> EncryptResult<()> {
        let mut command = self.command();
        command.arg("--yes").arg("--trust-model").arg("always");
        for recipient in &self.config.recipients {
            command.arg("--recipient").arg(recipient);
        }
        command
            .arg("--output")
            .arg(output_path)
            .arg("--encrypt")
            .arg(source);

        let output = command.output()?;
        if output.status.success() {
            Ok(())
        } else {
            Err(EncryptError::Encrypt {
                path: source.to_path_buf(),
                message: stderr_text(&output),
            })
        }
    }
}

fn uid_present(listing: &str, recipient: &str) -> bool {
    let needle = format!("<{recipient}>");
    listing
        .lines()
        .filter(|line| line.starts_with("uid"))
        .any(|line| line.contains(&needle))
}

fn stderr_text(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).trim().to_string()
}

/// Probe for a usable gpg binary, preferring `gpg` over `gpg2`
fn locate_binary() -> Option<String> {
    for candidate in ["gpg", "gpg2"] {
        let probe = Command::new(candidate)
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status();
        if matches!(probe, Ok(status) if status.success()) {
            return Some(candidate.to_string());
        }
    }
    None
}
