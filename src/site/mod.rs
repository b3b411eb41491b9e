// ABOUTME: Static document site generation
// ABOUTME: Markdown pages, per-file encryption, password book, build cache and directory page

pub mod builder;
pub mod cache;
pub mod encrypt;
pub mod index_page;
pub mod markdown;
pub mod passwords;

pub use builder::{BuildReport, FileOutcome, SiteBuilder};
pub use cache::BuildCache;
pub use encrypt::{Encryptor, Staticrypt, StaticryptOptions};
pub use passwords::{generate_password, PasswordBook};
