// ABOUTME: Page encryption through the staticrypt command-line tool
// ABOUTME: Runs staticrypt on one HTML file and moves the result into the site

use crate::errors::{Result, SiteError};
use crate::utils;
use log::{debug, info};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Encrypts a single HTML page with a password.
pub trait Encryptor {
    fn encrypt(&self, input: &Path, output: &Path, password: &str) -> Result<()>;
}

/// Command line settings for staticrypt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticryptOptions {
    pub program: String,
    /// Days the browser remembers an entered password
    pub remember_days: u32,
    pub template_title: String,
    pub template_instructions: String,
    pub template_button: String,
}

impl Default for StaticryptOptions {
    fn default() -> Self {
        Self {
            program: "staticrypt".to_string(),
            remember_days: crate::config::DEFAULT_REMEMBER_DAYS,
            template_title: "Enter password".to_string(),
            template_instructions: "This page is encrypted. Enter the password to view it."
                .to_string(),
            template_button: "Unlock".to_string(),
        }
    }
}

/// Encryptor backed by the external `staticrypt` tool.
#[derive(Debug, Clone)]
pub struct Staticrypt {
    options: StaticryptOptions,
    staging_dir: PathBuf,
    working_dir: PathBuf,
}

impl Staticrypt {
    pub fn new(options: StaticryptOptions, staging_dir: PathBuf) -> Self {
        Self {
            options,
            staging_dir,
            working_dir: PathBuf::from("."),
        }
    }

    /// Run staticrypt from `dir`, where it keeps `.staticrypt.json`.
    ///
    /// The salt in that file must stay the same between builds or
    /// remembered passwords stop working.
    pub fn in_dir(mut self, dir: PathBuf) -> Self {
        self.working_dir = dir;
        self
    }

    pub fn staging_dir(&self) -> &Path {
        &self.staging_dir
    }

    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    /// Arguments passed to staticrypt for one file.
    pub fn args(&self, input: &Path, staging_dir: &Path, password: &str) -> Vec<String> {
        vec![
            input.to_string_lossy().into_owned(),
            "-p".to_string(),
            password.to_string(),
            "--short".to_string(),
            "--remember".to_string(),
            self.options.remember_days.to_string(),
            "-d".to_string(),
            staging_dir.to_string_lossy().into_owned(),
            "--template-title".to_string(),
            self.options.template_title.clone(),
            "--template-instructions".to_string(),
            self.options.template_instructions.clone(),
            "--template-button".to_string(),
            self.options.template_button.clone(),
        ]
    }

    /// The staticrypt invocation for one file, run from the working directory.
    pub fn command(&self, input: &Path, staging_dir: &Path, password: &str) -> Command {
        let mut command = Command::new(&self.options.program);
        command
            .current_dir(&self.working_dir)
            .args(self.args(input, staging_dir, password));
        command
    }
}

impl Encryptor for Staticrypt {
    fn encrypt(&self, input: &Path, output: &Path, password: &str) -> Result<()> {
        utils::ensure_directory_exists(&self.staging_dir)?;
        // Paths are resolved here since the tool runs from another directory
        let staging_dir = fs::canonicalize(&self.staging_dir)?;
        let absolute_input = fs::canonicalize(input)?;

        debug!(
            "Running {} on {:?} in {:?}",
            self.options.program, input, self.working_dir
        );
        let result = self
            .command(&absolute_input, &staging_dir, password)
            .output()
            .map_err(|e| SiteError::EncryptionError {
                path: input.to_path_buf(),
                message: format!("failed to run {}: {}", self.options.program, e),
            })?;

        if !result.status.success() {
            return Err(SiteError::EncryptionError {
                path: input.to_path_buf(),
                message: String::from_utf8_lossy(&result.stderr).trim().to_string(),
            });
        }

        let file_name = input.file_name().ok_or_else(|| {
            SiteError::ValidationError(format!("Input has no file name: {:?}", input))
        })?;
        let encrypted = staging_dir.join(file_name);
        if !encrypted.exists() {
            return Err(SiteError::EncryptionError {
                path: input.to_path_buf(),
                message: format!("encrypted file not found at {:?}", encrypted),
            });
        }

        utils::ensure_parent_directory_exists(output)?;
        move_file(&encrypted, output)?;
        info!("Encrypted {:?} -> {:?}", input, output);
        Ok(())
    }
}

/// Rename, falling back to copy and delete across filesystems.
fn move_file(from: &Path, to: &Path) -> Result<()> {
    if fs::rename(from, to).is_ok() {
        return Ok(());
    }
    fs::copy(from, to)?;
    fs::remove_file(from)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_staticrypt_args() {
        let staticrypt = Staticrypt::new(StaticryptOptions::default(), PathBuf::from("encrypted"));
        let args = staticrypt.args(
            Path::new("docs/notes.temp.html"),
            Path::new("encrypted"),
            "s3cret",
        );

        assert_eq!(args[0], "docs/notes.temp.html");
        assert_eq!(&args[1..3], &["-p", "s3cret"]);
        assert!(args.contains(&"--short".to_string()));
        let remember = args.iter().position(|a| a == "--remember").unwrap();
        assert_eq!(args[remember + 1], "7");
        let dir = args.iter().position(|a| a == "-d").unwrap();
        assert_eq!(args[dir + 1], "encrypted");
    }

    #[test]
    fn test_command_runs_from_site_root() {
        let staticrypt = Staticrypt::new(
            StaticryptOptions::default(),
            PathBuf::from("/site/encrypted"),
        )
        .in_dir(PathBuf::from("/site"));
        let command = staticrypt.command(
            Path::new("/site/docs/a.temp.html"),
            Path::new("/site/encrypted"),
            "pw",
        );

        assert_eq!(command.get_program(), "staticrypt");
        assert_eq!(command.get_current_dir(), Some(Path::new("/site")));
        let args: Vec<_> = command.get_args().collect();
        assert_eq!(args[0], "/site/docs/a.temp.html");
    }

    #[cfg(unix)]
    #[test]
    fn test_salt_file_lands_in_working_dir() {
        use std::os::unix::fs::PermissionsExt;

        let temp = tempfile::TempDir::new().expect("Failed to create temp dir");
        let root = temp.path();
        // Stand-in for staticrypt: writes a salt file and copies the input to `-d`
        let program = root.join("fake-staticrypt");
        fs::write(
            &program,
            "#!/bin/sh\ninput=\"$1\"\nwhile [ $# -gt 0 ]; do\n  if [ \"$1\" = \"-d\" ]; then dir=\"$2\"; fi\n  shift\ndone\necho salt > .staticrypt.json\ncp \"$input\" \"$dir/$(basename \"$input\")\"\n",
        )
        .expect("Failed to write program");
        fs::set_permissions(&program, fs::Permissions::from_mode(0o755))
            .expect("Failed to mark program executable");

        fs::create_dir_all(root.join("docs")).expect("Failed to create docs");
        let input = root.join("docs/page.temp.html");
        fs::write(&input, "<p>hi</p>").expect("Failed to write page");

        let options = StaticryptOptions {
            program: program.to_string_lossy().into_owned(),
            ..StaticryptOptions::default()
        };
        let staticrypt =
            Staticrypt::new(options, root.join("encrypted")).in_dir(root.to_path_buf());
        let output = root.join("docs/page.html");
        staticrypt
            .encrypt(&input, &output, "pw")
            .expect("Encryption failed");

        assert!(root.join(".staticrypt.json").exists());
        assert_eq!(fs::read_to_string(&output).unwrap(), "<p>hi</p>");
    }

    #[test]
    fn test_missing_program_is_an_encryption_error() {
        let temp = tempfile::TempDir::new().expect("Failed to create temp dir");
        let input = temp.path().join("page.html");
        fs::write(&input, "<p>hi</p>").expect("Failed to write page");

        let options = StaticryptOptions {
            program: "staticrypt-does-not-exist".to_string(),
            ..StaticryptOptions::default()
        };
        let staticrypt = Staticrypt::new(options, temp.path().join("encrypted"));
        let result = staticrypt.encrypt(&input, &temp.path().join("out.html"), "pw");

        assert!(matches!(result, Err(SiteError::EncryptionError { .. })));
    }
}
