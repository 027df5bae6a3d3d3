use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::errors::CheckerError;

/// Controlled vocabularies the interoperability and reusability metrics
/// compare against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VocabularyId {
    MachineReadable,
    NonProprietary,
    FileTypes,
    MediaTypes,
    Licenses,
    AccessRights,
}

impl VocabularyId {
    pub fn file_name(&self) -> &'static str {
        match self {
            VocabularyId::MachineReadable => "machine_readable.csv",
            VocabularyId::NonProprietary => "non_proprietary.csv",
            VocabularyId::FileTypes => "file_types.csv",
            VocabularyId::MediaTypes => "media_types.csv",
            VocabularyId::Licenses => "licenses.csv",
            VocabularyId::AccessRights => "access_rights.csv",
        }
    }

    fn slot(&self) -> usize {
        match self {
            VocabularyId::MachineReadable => 0,
            VocabularyId::NonProprietary => 1,
            VocabularyId::FileTypes => 2,
            VocabularyId::MediaTypes => 3,
            VocabularyId::Licenses => 4,
            VocabularyId::AccessRights => 5,
        }
    }
}

impl fmt::Display for VocabularyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_name())
    }
}

/// Allow-list of URIs and lower-cased labels.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Vocabulary {
    uris: HashSet<String>,
    labels: HashSet<String>,
}

impl Vocabulary {
    pub fn new<U, L>(uris: U, labels: L) -> Self
    where
        U: IntoIterator,
        U::Item: Into<String>,
        L: IntoIterator,
        L::Item: AsRef<str>,
    {
        Self {
            uris: uris.into_iter().map(Into::into).collect(),
            labels: labels
                .into_iter()
                .map(|label| label.as_ref().trim().to_lowercase())
                .filter(|label| !label.is_empty())
                .collect(),
        }
    }

    /// Parse a vocabulary CSV.
    ///
    /// Lines starting with `#` are comments. The first row is a header unless
    /// its first cell looks like a URI. URIs come from the first column;
    /// labels from a `label` column, else the second column.
    pub fn from_csv(text: &str) -> Result<Self, csv::Error> {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .comment(Some(b'#'))
            .trim(csv::Trim::All)
            .from_reader(text.as_bytes());

        let mut uris = Vec::new();
        let mut labels = Vec::new();
        let mut label_column = 1;

        for (idx, record) in reader.records().enumerate() {
            let record = record?;
            let first = record.get(0).unwrap_or_default();
            if idx == 0 && !first.contains("://") {
                if let Some(position) = record
                    .iter()
                    .position(|cell| cell.eq_ignore_ascii_case("label"))
                {
                    label_column = position;
                }
                continue;
            }
            if !first.is_empty() {
                uris.push(first.to_string());
            }
            if let Some(label) = record.get(label_column) {
                labels.push(label.to_string());
            }
        }

        Ok(Self::new(uris, labels))
    }

    pub fn contains_uri(&self, uri: &str) -> bool {
        self.uris.contains(uri)
    }

    /// Case-insensitive label match.
    pub fn contains_label(&self, label: &str) -> bool {
        self.labels.contains(&label.trim().to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.uris.len()
    }

    pub fn is_empty(&self) -> bool {
        self.uris.is_empty() && self.labels.is_empty()
    }
}

/// Loads vocabularies from a directory, once per vocabulary.
///
/// Reads after the first successful build are lock-free. Builds are
/// serialized and read the file on the blocking pool; a failed build is not
/// cached so the next call retries.
#[derive(Debug)]
pub struct VocabularyLoader {
    dir: PathBuf,
    slots: [OnceLock<Arc<Vocabulary>>; 6],
    build: Mutex<()>,
}

impl VocabularyLoader {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            slots: Default::default(),
            build: Mutex::new(()),
        }
    }

    pub async fn load(&self, id: VocabularyId) -> Result<Arc<Vocabulary>, CheckerError> {
        let slot = &self.slots[id.slot()];
        if let Some(vocabulary) = slot.get() {
            return Ok(Arc::clone(vocabulary));
        }

        let _guard = self.build.lock().await;
        if let Some(vocabulary) = slot.get() {
            return Ok(Arc::clone(vocabulary));
        }

        let path = self.dir.join(id.file_name());
        let source = path.clone();
        let vocabulary = tokio::task::spawn_blocking(move || read_vocabulary(&source))
            .await
            .map_err(|err| CheckerError::Task(err.to_string()))?
            .map_err(|reason| {
                warn!(
                    vocabulary = %id,
                    path = %path.display(),
                    reason = %reason,
                    "vocabulary load failed"
                );
                CheckerError::Vocabulary {
                    name: id.to_string(),
                    reason,
                }
            })?;
        info!(vocabulary = %id, entries = vocabulary.len(), "vocabulary loaded");

        Ok(Arc::clone(slot.get_or_init(|| Arc::new(vocabulary))))
    }
}

fn read_vocabulary(path: &Path) -> Result<Vocabulary, String> {
    let text = std::fs::read_to_string(path).map_err(|err| err.to_string())?;
    Vocabulary::from_csv(&text).map_err(|err| err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_with_header_and_label_column() {
        let text = "\u{feff}# piveau file types\nuri,code,label\n\
http://publications.europa.eu/resource/authority/file-type/CSV,CSV,Comma Separated Values\n\
http://publications.europa.eu/resource/authority/file-type/JSON,JSON,JSON\n";
        let vocabulary = Vocabulary::from_csv(text).expect("parse csv");

        assert_eq!(vocabulary.len(), 2);
        assert!(vocabulary.contains_uri(
            "http://publications.europa.eu/resource/authority/file-type/CSV"
        ));
        assert!(vocabulary.contains_label("comma separated values"));
        assert!(vocabulary.contains_label("Json"));
        assert!(!vocabulary.contains_label("CSV"));
    }

    #[test]
    fn csv_without_header_uses_second_column() {
        let text = "http://x/a,Alpha\nhttp://x/b,Beta\n";
        let vocabulary = Vocabulary::from_csv(text).expect("parse csv");

        assert!(vocabulary.contains_uri("http://x/a"));
        assert!(vocabulary.contains_uri("http://x/b"));
        assert!(vocabulary.contains_label("alpha"));
    }

    #[tokio::test]
    async fn failed_loads_are_not_cached() {
        let dir = std::env::temp_dir().join(format!("mqa_vocab_{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).expect("create dir");
        let loader = VocabularyLoader::new(&dir);

        let err = loader.load(VocabularyId::Licenses).await.expect_err("missing file");
        assert!(matches!(err, CheckerError::Vocabulary { .. }));

        std::fs::write(dir.join("licenses.csv"), "uri\nhttp://x/cc-by\n").expect("write csv");
        let first = loader.load(VocabularyId::Licenses).await.expect("load after write");
        let second = loader.load(VocabularyId::Licenses).await.expect("cached load");
        assert!(Arc::ptr_eq(&first, &second));
        assert!(first.contains_uri("http://x/cc-by"));

        let _ = std::fs::remove_dir_all(&dir);
    }
}
