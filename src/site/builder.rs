// ABOUTME: Static site builder
// ABOUTME: Renders, encrypts and copies the source tree into the output tree incrementally

use crate::config::Config;
use crate::errors::{Result, SiteError};
use crate::site::cache::BuildCache;
use crate::site::encrypt::Encryptor;
use crate::site::index_page::{render_index, IndexEntry};
use crate::site::markdown::{document_title, render_markdown_page};
use crate::site::passwords::PasswordBook;
use crate::utils;
use chrono::Local;
use log::{debug, info, warn};
use std::fs;
use std::path::{Component, Path, PathBuf};

/// Directory name that marks files as published without encryption.
pub const PUBLIC_DIR: &str = "public";

/// What happened to one source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOutcome {
    /// Unchanged since the last build and its output still exists
    Skipped,
    /// Markdown rendered and written without encryption
    Rendered,
    /// Encrypted with its own password
    Encrypted,
    /// Copied as-is
    Copied,
    /// Encryption failed; nothing was written
    Failed,
}

/// Summary of a build.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildReport {
    pub discovered: usize,
    pub processed: usize,
    pub skipped: usize,
    pub encrypted: usize,
    pub failed: usize,
    pub index_path: PathBuf,
}

impl BuildReport {
    fn count(&mut self, outcome: FileOutcome) {
        match outcome {
            FileOutcome::Skipped => self.skipped += 1,
            FileOutcome::Failed => self.failed += 1,
            FileOutcome::Encrypted => {
                self.encrypted += 1;
                self.processed += 1;
            }
            FileOutcome::Rendered | FileOutcome::Copied => self.processed += 1,
        }
    }
}

/// Builds the output tree from the source tree.
pub struct SiteBuilder<E> {
    config: Config,
    encryptor: E,
}

fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension()
        .map(|e| e.to_string_lossy().eq_ignore_ascii_case(ext))
        .unwrap_or(false)
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Join path components with `/` regardless of platform.
fn slash_path(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

impl<E: Encryptor> SiteBuilder<E> {
    pub fn new(config: Config, encryptor: E) -> Self {
        Self { config, encryptor }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn encryptor(&self) -> &E {
        &self.encryptor
    }

    fn relative<'a>(&self, src: &'a Path) -> Result<&'a Path> {
        src.strip_prefix(&self.config.src_dir).map_err(|_| {
            SiteError::ValidationError(format!(
                "{:?} is outside the source directory {:?}",
                src, self.config.src_dir
            ))
        })
    }

    /// Key identifying a source file in the cache and the password book:
    /// the source directory's name followed by the relative path, so books
    /// written as `src/notes/a.md` keep matching.
    pub fn source_key(&self, src: &Path) -> Result<String> {
        let relative = slash_path(self.relative(src)?);
        Ok(match self.config.src_dir.file_name() {
            Some(name) => format!("{}/{}", name.to_string_lossy(), relative),
            None => relative,
        })
    }

    /// Every regular file under the source directory except dot-files.
    pub fn collect_files(&self) -> Result<Vec<PathBuf>> {
        utils::validate_directory_exists(&self.config.src_dir)?;

        let pattern = format!(
            "{}/**/*",
            glob::Pattern::escape(&self.config.src_dir.to_string_lossy())
        );
        let mut files = Vec::new();
        for entry in glob::glob(&pattern)? {
            let path = entry?;
            let hidden = path
                .file_name()
                .map(|n| n.to_string_lossy().starts_with('.'))
                .unwrap_or(true);
            if path.is_file() && !hidden {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }

    /// Whether a source file lives under a `public` directory.
    pub fn is_public(&self, src: &Path) -> bool {
        let relative = self.relative(src).unwrap_or(src);
        relative
            .components()
            .any(|c| matches!(c, Component::Normal(part) if part == PUBLIC_DIR))
    }

    /// Where a source file lands in the output tree. Markdown becomes HTML.
    pub fn output_path(&self, src: &Path) -> Result<PathBuf> {
        let mut relative = self.relative(src)?.to_path_buf();
        if has_extension(&relative, "md") {
            relative.set_extension("html");
        }
        Ok(self.config.docs_dir.join(relative))
    }

    /// Name shown for a document: its markdown title or the file stem.
    pub fn display_name(&self, src: &Path) -> Result<String> {
        let stem = file_stem(src);
        if has_extension(src, "md") {
            let content = fs::read_to_string(src)?;
            return Ok(document_title(&content, &stem));
        }
        Ok(stem)
    }

    fn encrypt_into(
        &self,
        input: &Path,
        output: &Path,
        key: &str,
        name: &str,
        passwords: &mut PasswordBook,
    ) -> FileOutcome {
        let password = passwords.password_for(key, name, self.config.password_length);
        match self.encryptor.encrypt(input, output, &password) {
            Ok(()) => FileOutcome::Encrypted,
            Err(e) => {
                warn!("Encryption failed for {}: {}", key, e);
                FileOutcome::Failed
            }
        }
    }

    /// Process one source file into the output tree.
    pub fn process_file(
        &self,
        src: &Path,
        cache: &mut BuildCache,
        passwords: &mut PasswordBook,
        style_css: &str,
    ) -> Result<FileOutcome> {
        let key = self.source_key(src)?;
        let output = self.output_path(src)?;

        if !cache.needs_rebuild(&key, src)? && output.exists() {
            debug!("Skipped (unchanged): {}", key);
            return Ok(FileOutcome::Skipped);
        }

        utils::ensure_parent_directory_exists(&output)?;
        let is_public = self.is_public(src);

        let outcome = if has_extension(src, "md") {
            let markdown = fs::read_to_string(src)?;
            let name = document_title(&markdown, &file_stem(src));
            let page = render_markdown_page(&markdown, &name, style_css);

            if is_public {
                fs::write(&output, page)?;
                info!("Rendered (public): {} -> {:?}", key, output);
                FileOutcome::Rendered
            } else {
                let scratch = output.with_extension("temp.html");
                fs::write(&scratch, page)?;
                let outcome = self.encrypt_into(&scratch, &output, &key, &name, passwords);
                if let Err(e) = fs::remove_file(&scratch) {
                    warn!("Failed to remove scratch file {:?}: {}", scratch, e);
                }
                outcome
            }
        } else if has_extension(src, "html") && !is_public {
            let name = file_stem(src);
            self.encrypt_into(src, &output, &key, &name, passwords)
        } else {
            fs::copy(src, &output)?;
            info!("Copied: {} -> {:?}", key, output);
            FileOutcome::Copied
        };

        if outcome == FileOutcome::Encrypted {
            info!("Encrypted: {} -> {:?}", key, output);
        }
        if outcome != FileOutcome::Failed {
            cache.record(&key, src)?;
        }
        Ok(outcome)
    }

    /// Directory page entries for the markdown and HTML documents.
    pub fn index_entries(&self, files: &[PathBuf]) -> Result<Vec<IndexEntry>> {
        let mut entries = Vec::new();
        for src in files {
            if !has_extension(src, "md") && !has_extension(src, "html") {
                continue;
            }
            let output = self.output_path(src)?;
            let href = output
                .strip_prefix(&self.config.docs_dir)
                .map(slash_path)
                .unwrap_or_else(|_| slash_path(&output));
            entries.push(IndexEntry {
                name: self.display_name(src)?,
                href,
                source: self.source_key(src)?,
                is_public: self.is_public(src),
            });
        }
        Ok(entries)
    }

    fn copy_assets(&self) -> Result<()> {
        if !self.config.assets_dir.is_dir() {
            debug!("No assets directory at {:?}", self.config.assets_dir);
            return Ok(());
        }
        let target = self.config.docs_dir.join("assets");
        let copied = utils::replace_dir_with_copy(&self.config.assets_dir, &target)?;
        info!(
            "Copied {} asset files: {:?} -> {:?}",
            copied, self.config.assets_dir, target
        );
        Ok(())
    }

    fn clean_staging_dir(&self) -> Result<()> {
        let staging = &self.config.staging_dir;
        if !staging.is_dir() {
            return Ok(());
        }
        let pattern = format!(
            "{}/*.temp.html",
            glob::Pattern::escape(&staging.to_string_lossy())
        );
        for leftover in glob::glob(&pattern)? {
            fs::remove_file(leftover?)?;
        }
        if utils::remove_dir_if_empty(staging)? {
            info!("Removed staging directory {:?}", staging);
        }
        Ok(())
    }

    /// Build the whole site.
    pub fn build(&self) -> Result<BuildReport> {
        info!(
            "Building site: {:?} -> {:?}",
            self.config.src_dir, self.config.docs_dir
        );
        utils::validate_directory_writable(&self.config.docs_dir)?;

        let mut passwords = PasswordBook::load(&self.config.passwords_file)?;
        self.copy_assets()?;

        let style_css = utils::read_optional(&self.config.markdown_css())?;
        let index_css = utils::read_optional(&self.config.index_css())?;

        let cache_file = self.config.cache_file();
        let mut cache = BuildCache::load(&cache_file)?;

        let files = self.collect_files()?;
        info!("Found {} files to process", files.len());

        let mut report = BuildReport {
            discovered: files.len(),
            ..BuildReport::default()
        };
        for src in &files {
            let outcome = self.process_file(src, &mut cache, &mut passwords, &style_css)?;
            report.count(outcome);
        }

        cache.save(&cache_file)?;
        passwords.save(&self.config.passwords_file)?;

        let entries = self.index_entries(&files)?;
        let built_at = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
        let index_path = self.config.docs_dir.join("index.html");
        fs::write(&index_path, render_index(&entries, &index_css, &built_at))?;
        info!("Wrote directory page: {:?}", index_path);
        report.index_path = index_path;

        self.clean_staging_dir()?;

        info!(
            "Build complete: {} processed, {} skipped, {} failed",
            report.processed, report.skipped, report.failed
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use tempfile::TempDir;

    /// Records calls and writes a marker page instead of running staticrypt.
    #[derive(Default)]
    struct FakeEncryptor {
        calls: RefCell<Vec<(PathBuf, String)>>,
    }

    impl Encryptor for FakeEncryptor {
        fn encrypt(&self, input: &Path, output: &Path, password: &str) -> Result<()> {
            self.calls
                .borrow_mut()
                .push((input.to_path_buf(), password.to_string()));
            fs::write(output, format!("encrypted:{}", password))?;
            Ok(())
        }
    }

    fn builder(root: &Path) -> SiteBuilder<FakeEncryptor> {
        SiteBuilder::new(Config::default().rooted_at(root), FakeEncryptor::default())
    }

    #[test]
    fn test_paths_and_visibility() {
        let temp = TempDir::new().expect("Failed to create temp dir");
        let site = builder(temp.path());
        let src = temp.path().join("src");

        assert!(site.is_public(&src.join("public/readme.md")));
        assert!(!site.is_public(&src.join("thesis/publication.md")));
        assert_eq!(
            site.output_path(&src.join("thesis/Draft.MD")).unwrap(),
            temp.path().join("docs/thesis/Draft.html")
        );
        assert_eq!(
            site.output_path(&src.join("img/plot.png")).unwrap(),
            temp.path().join("docs/img/plot.png")
        );
        assert_eq!(
            site.source_key(&src.join("thesis/draft.md")).unwrap(),
            "src/thesis/draft.md"
        );
        assert!(site.output_path(Path::new("/elsewhere/a.md")).is_err());
    }

    #[test]
    fn test_collect_files_skips_dotfiles() {
        let temp = TempDir::new().expect("Failed to create temp dir");
        let src = temp.path().join("src");
        fs::create_dir_all(src.join("notes")).unwrap();
        fs::write(src.join("notes/a.md"), "# A").unwrap();
        fs::write(src.join(".DS_Store"), "").unwrap();
        fs::write(src.join("b.html"), "<p>b</p>").unwrap();

        let files = builder(temp.path()).collect_files().unwrap();
        assert_eq!(files, vec![src.join("b.html"), src.join("notes/a.md")]);
    }

    #[test]
    fn test_private_html_is_encrypted_with_book_password() {
        let temp = TempDir::new().expect("Failed to create temp dir");
        let src = temp.path().join("src/talks/defense.html");
        fs::create_dir_all(src.parent().unwrap()).unwrap();
        fs::write(&src, "<section>slide</section>").unwrap();

        let site = builder(temp.path());
        let mut cache = BuildCache::default();
        let mut passwords = PasswordBook::default();
        let outcome = site
            .process_file(&src, &mut cache, &mut passwords, "")
            .unwrap();

        assert_eq!(outcome, FileOutcome::Encrypted);
        let calls = site.encryptor().calls.borrow();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, src);
        assert_eq!(
            calls[0].1,
            passwords.get("src/talks/defense.html").unwrap().password
        );
        assert!(cache.get("src/talks/defense.html").is_some());

        drop(calls);
        let again = site
            .process_file(&src, &mut cache, &mut passwords, "")
            .unwrap();
        assert_eq!(again, FileOutcome::Skipped);
    }

    #[test]
    fn test_failed_encryption_is_not_cached() {
        struct Broken;
        impl Encryptor for Broken {
            fn encrypt(&self, input: &Path, _: &Path, _: &str) -> Result<()> {
                Err(SiteError::EncryptionError {
                    path: input.to_path_buf(),
                    message: "boom".to_string(),
                })
            }
        }

        let temp = TempDir::new().expect("Failed to create temp dir");
        let src = temp.path().join("src/secret.md");
        fs::create_dir_all(src.parent().unwrap()).unwrap();
        fs::write(&src, "# Secret").unwrap();

        let site = SiteBuilder::new(Config::default().rooted_at(temp.path()), Broken);
        let mut cache = BuildCache::default();
        let mut passwords = PasswordBook::default();
        let outcome = site
            .process_file(&src, &mut cache, &mut passwords, "")
            .unwrap();

        assert_eq!(outcome, FileOutcome::Failed);
        assert!(cache.is_empty());
        assert!(!temp.path().join("docs/secret.temp.html").exists());
    }
}
