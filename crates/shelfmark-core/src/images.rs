use std::path::{Path, PathBuf};

use shelfmark_catalog::BookSourceKind;

/// Locally cached cover images, one directory per source.
pub trait ImageStore: Send + Sync {
    /// Whether the cached file exists.
    fn exists(&self, source: BookSourceKind, file: &str) -> bool;

    /// Public URL the cached file is served from.
    fn public_url(&self, source: BookSourceKind, file: &str) -> String;
}

/// Image cache on the local file system, served under `<base>/images/<source>/`.
#[derive(Debug, Clone)]
pub struct LocalImageCache {
    publisher_dir: PathBuf,
    bookseller_dir: PathBuf,
    public_base_url: String,
}

impl LocalImageCache {
    pub fn new(
        publisher_dir: impl Into<PathBuf>,
        bookseller_dir: impl Into<PathBuf>,
        public_base_url: impl Into<String>,
    ) -> Self {
        Self {
            publisher_dir: publisher_dir.into(),
            bookseller_dir: bookseller_dir.into(),
            public_base_url: public_base_url.into(),
        }
    }

    /// Cache rooted at `<home>/images/{publisher,bookseller}`.
    pub fn in_home(home: &Path, public_base_url: impl Into<String>) -> Self {
        let images = home.join("images");
        Self::new(
            images.join(BookSourceKind::Publisher.as_str()),
            images.join(BookSourceKind::Bookseller.as_str()),
            public_base_url,
        )
    }

    pub fn dir(&self, source: BookSourceKind) -> &Path {
        match source {
            BookSourceKind::Publisher => &self.publisher_dir,
            BookSourceKind::Bookseller => &self.bookseller_dir,
        }
    }
}

impl ImageStore for LocalImageCache {
    fn exists(&self, source: BookSourceKind, file: &str) -> bool {
        if !is_plain_file_name(file) {
            return false;
        }
        self.dir(source).join(file).is_file()
    }

    fn public_url(&self, source: BookSourceKind, file: &str) -> String {
        format!(
            "{}/images/{}/{}",
            self.public_base_url.trim_end_matches('/'),
            source.as_str(),
            file
        )
    }
}

/// Stored image names are bare file names; anything else is never served.
fn is_plain_file_name(file: &str) -> bool {
    !file.is_empty()
        && file != "."
        && file != ".."
        && !file.contains(['/', '\\'])
}
