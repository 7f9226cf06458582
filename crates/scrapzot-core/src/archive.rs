//! On-disk layout of a Scrapbook archive.
//!
//! ```text
//! <root>/scrapbook.rdf
//! <root>/data/<item-id>/index.html   (or default.html)
//! <root>/data/<item-id>/*.pdf        (optional)
//! ```

use crate::error::ArchiveError;
use scrapzot_ingest_rdf::{load_rdf_file, ItemMap, RdfFormat};
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

pub const RDF_FILE_NAME: &str = "scrapbook.rdf";
pub const DATA_DIR_NAME: &str = "data";

/// Payload file names, in order of preference.
pub const PAYLOAD_CANDIDATES: [&str; 2] = ["index.html", "default.html"];

#[derive(Debug, Clone)]
pub struct ScrapbookArchive {
    root: PathBuf,
}

impl ScrapbookArchive {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn rdf_path(&self) -> PathBuf {
        self.root.join(RDF_FILE_NAME)
    }

    pub fn data_dir(&self) -> PathBuf {
        self.root.join(DATA_DIR_NAME)
    }

    pub fn item_dir(&self, id: &str) -> PathBuf {
        self.data_dir().join(id)
    }

    /// Parse `scrapbook.rdf` into the item map.
    pub fn load_items(&self) -> anyhow::Result<ItemMap> {
        let path = self.rdf_path();
        let format = RdfFormat::from_path(&path)?;
        load_rdf_file(&path, format)
    }

    /// Names of the directories directly under `dir`, sorted. A missing
    /// directory has no entries.
    pub fn subdirs(&self, dir: &Path) -> Result<Vec<String>, ArchiveError> {
        list_entries(dir, EntryKind::Dir)
    }

    /// Names of the regular files directly under `dir`, sorted.
    pub fn subfiles(&self, dir: &Path) -> Result<Vec<String>, ArchiveError> {
        list_entries(dir, EntryKind::File)
    }

    /// The page file of an item: `index.html`, else `default.html`.
    pub fn payload_file(&self, id: &str) -> Option<PathBuf> {
        let dir = self.item_dir(id);
        PAYLOAD_CANDIDATES
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.is_file())
    }

    /// File names matching `*.pdf` (case-sensitive) in an item directory.
    pub fn pdf_files(&self, id: &str) -> Result<Vec<String>, ArchiveError> {
        Ok(self
            .subfiles(&self.item_dir(id))?
            .into_iter()
            .filter(|name| name.ends_with(".pdf"))
            .collect())
    }
}

#[derive(Clone, Copy)]
enum EntryKind {
    Dir,
    File,
}

fn list_entries(dir: &Path, kind: EntryKind) -> Result<Vec<String>, ArchiveError> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    let mut out = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|err| ArchiveError::List {
            path: dir.to_path_buf(),
            source: err.into(),
        })?;
        let wanted = match kind {
            EntryKind::Dir => entry.file_type().is_dir(),
            EntryKind::File => entry.file_type().is_file(),
        };
        if wanted {
            out.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    Ok(out)
}

/// Lexically normalize a path: drop `.` components, fold `..` into its
/// parent and collapse repeated separators. Symlinks are not consulted.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut out: Vec<Component<'_>> = Vec::new();
    for comp in path.components() {
        match comp {
            Component::CurDir => {}
            Component::ParentDir => match out.last() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(comp),
            },
            other => out.push(other),
        }
    }
    if out.is_empty() {
        return PathBuf::from(".");
    }
    out.iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn lists_dirs_and_files_separately_and_sorted() {
        let dir = tempdir().unwrap();
        let data = dir.path().join("data");
        std::fs::create_dir_all(data.join("b")).unwrap();
        std::fs::create_dir_all(data.join("a")).unwrap();
        std::fs::write(data.join("stray.txt"), "x").unwrap();

        let archive = ScrapbookArchive::new(dir.path());
        assert_eq!(archive.subdirs(&data).unwrap(), vec!["a", "b"]);
        assert_eq!(archive.subfiles(&data).unwrap(), vec!["stray.txt"]);
    }

    #[test]
    fn missing_data_dir_lists_nothing() {
        let dir = tempdir().unwrap();
        let archive = ScrapbookArchive::new(dir.path());
        assert!(archive.subdirs(&archive.data_dir()).unwrap().is_empty());
    }

    #[test]
    fn payload_prefers_index_over_default() {
        let dir = tempdir().unwrap();
        let archive = ScrapbookArchive::new(dir.path());
        let item = archive.item_dir("20180101120000");
        std::fs::create_dir_all(&item).unwrap();
        assert_eq!(archive.payload_file("20180101120000"), None);

        std::fs::write(item.join("default.html"), "d").unwrap();
        assert_eq!(
            archive.payload_file("20180101120000"),
            Some(item.join("default.html"))
        );

        std::fs::write(item.join("index.html"), "i").unwrap();
        assert_eq!(
            archive.payload_file("20180101120000"),
            Some(item.join("index.html"))
        );
    }

    #[test]
    fn pdf_glob_is_case_sensitive() {
        let dir = tempdir().unwrap();
        let archive = ScrapbookArchive::new(dir.path());
        let item = archive.item_dir("20180101120000");
        std::fs::create_dir_all(&item).unwrap();
        for name in ["b.pdf", "a.pdf", "C.PDF", "index.html"] {
            std::fs::write(item.join(name), "x").unwrap();
        }
        assert_eq!(archive.pdf_files("20180101120000").unwrap(), vec!["a.pdf", "b.pdf"]);
    }

    #[test]
    fn loads_items_from_triple_store() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join(RDF_FILE_NAME),
            r#"<?xml version="1.0"?>
<RDF:RDF xmlns:NS1="http://amb.vis.ne.jp/mozilla/scrapbook-rdf#"
         xmlns:RDF="http://www.w3.org/1999/02/22-rdf-syntax-ns#">
  <RDF:Seq RDF:about="urn:scrapbook:root">
    <RDF:li RDF:resource="urn:scrapbook:item20180101120000"/>
  </RDF:Seq>
  <RDF:Description RDF:about="urn:scrapbook:item20180101120000"
                   NS1:type="" NS1:title="Page" />
</RDF:RDF>
"#,
        )
        .unwrap();

        let items = ScrapbookArchive::new(dir.path()).load_items().unwrap();
        assert_eq!(items["urn:scrapbook:root"].child(1), Some("20180101120000"));
        assert_eq!(items["20180101120000"].title(), "Page");
    }

    #[test]
    fn missing_triple_store_names_the_path() {
        let dir = tempdir().unwrap();
        let err = ScrapbookArchive::new(dir.path()).load_items().unwrap_err();
        assert!(format!("{err:#}").contains(RDF_FILE_NAME));
    }

    #[test]
    fn normalizes_like_normpath() {
        assert_eq!(
            normalize_path(Path::new("./book//data/./x/../20180101120000/index.html")),
            PathBuf::from("book/data/20180101120000/index.html")
        );
        assert_eq!(normalize_path(Path::new("../a/b")), PathBuf::from("../a/b"));
        assert_eq!(normalize_path(Path::new("/../a")), PathBuf::from("/a"));
        assert_eq!(normalize_path(Path::new("a/..")), PathBuf::from("."));
    }
}
