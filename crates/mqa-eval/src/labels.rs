use std::collections::{BTreeMap, HashMap};

/// Localized metric names.
pub trait LabelLookup: Send + Sync {
    fn label(&self, metric_id: &str, language: &str) -> Option<String>;
}

const BUILTIN_LABELS: &[(&str, &str, &str)] = &[
    ("dcat_keyword", "Keywords", "Palabras clave"),
    ("dcat_theme", "Themes/Categories", "Temas/Categorías"),
    ("dct_spatial", "Spatial Coverage", "Cobertura espacial"),
    ("dct_temporal", "Temporal Coverage", "Cobertura temporal"),
    (
        "dcat_accessURL_status",
        "Access URL Availability",
        "Disponibilidad de URL de acceso",
    ),
    ("dcat_downloadURL", "Download URL", "URL de descarga"),
    (
        "dcat_downloadURL_status",
        "Download URL Availability",
        "Disponibilidad de URL de descarga",
    ),
    ("dct_format", "Format", "Formato"),
    ("dcat_mediaType", "Media Type", "Tipo de medio"),
    (
        "dct_format_vocabulary",
        "Format Vocabulary",
        "Vocabulario de formato",
    ),
    (
        "dct_format_nonproprietary",
        "Non-proprietary Format",
        "Formato no propietario",
    ),
    (
        "dct_format_machinereadable",
        "Machine-readable Format",
        "Formato legible por máquina",
    ),
    (
        "dcat_ap_compliance",
        "DCAT-AP Compliance",
        "Conformidad con DCAT-AP",
    ),
    (
        "dcat_ap_es_compliance",
        "DCAT-AP-ES Compliance",
        "Conformidad con DCAT-AP-ES",
    ),
    (
        "nti_risp_compliance",
        "NTI-RISP Compliance",
        "Conformidad con NTI-RISP (2013)",
    ),
    ("dct_license", "License", "Licencia"),
    (
        "dct_license_vocabulary",
        "License Vocabulary",
        "Vocabulario de licencia",
    ),
    ("dct_accessRights", "Access Rights", "Derechos de acceso"),
    (
        "dct_accessRights_vocabulary",
        "Access Rights Vocabulary",
        "Vocabulario de derechos de acceso",
    ),
    ("dcat_contactPoint", "Contact Point", "Punto de contacto"),
    ("dct_publisher", "Publisher", "Editor"),
    ("dct_rights", "Rights", "Derechos"),
    ("dcat_byteSize", "Byte Size", "Tamaño en bytes"),
    ("dct_issued", "Issued Date", "Fecha de emisión"),
    ("dct_modified", "Modified Date", "Fecha de modificación"),
    (
        "dct_format_vocabulary_nti_risp",
        "Format Vocabulary (NTI-RISP)",
        "Vocabulario de formato (NTI-RISP)",
    ),
];

/// In-memory label table keyed by metric id, then language.
#[derive(Debug, Clone, Default)]
pub struct StaticLabels {
    labels: HashMap<String, HashMap<String, String>>,
}

impl StaticLabels {
    /// English and Spanish labels of the built-in metrics.
    pub fn builtin() -> Self {
        let mut table = Self::default();
        for (id, en, es) in BUILTIN_LABELS {
            table.insert(id, "en", en);
            table.insert(id, "es", es);
        }
        table
    }

    pub fn insert(&mut self, metric_id: &str, language: &str, label: &str) {
        self.labels
            .entry(metric_id.to_string())
            .or_default()
            .insert(language.to_string(), label.to_string());
    }

    /// Layer `metric id -> language -> label` entries over the table.
    pub fn with_overrides(
        mut self,
        overrides: &BTreeMap<String, BTreeMap<String, String>>,
    ) -> Self {
        for (id, by_language) in overrides {
            for (language, label) in by_language {
                self.insert(id, language, label);
            }
        }
        self
    }
}

impl LabelLookup for StaticLabels {
    fn label(&self, metric_id: &str, language: &str) -> Option<String> {
        self.labels
            .get(metric_id)
            .and_then(|by_language| by_language.get(language))
            .cloned()
    }
}

/// `dct_mediaType_vocabulary` -> `Dct mediatype vocabulary`.
pub fn fallback_label(metric_id: &str) -> String {
    let spaced = metric_id.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// Label for `metric_id`, or its mechanical fallback.
pub fn metric_label(lookup: &dyn LabelLookup, metric_id: &str, language: &str) -> String {
    lookup
        .label(metric_id, language)
        .unwrap_or_else(|| fallback_label(metric_id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_labels_cover_both_languages() {
        let labels = StaticLabels::builtin();
        assert_eq!(
            labels.label("dct_publisher", "es").as_deref(),
            Some("Editor")
        );
        assert_eq!(
            labels.label("dcat_keyword", "en").as_deref(),
            Some("Keywords")
        );
        assert_eq!(labels.label("dcat_keyword", "fr"), None);
    }

    #[test]
    fn missing_labels_fall_back_to_the_id() {
        let labels = StaticLabels::builtin();
        assert_eq!(
            metric_label(&labels, "dct_mediaType_vocabulary", "en"),
            "Dct mediatype vocabulary"
        );
        assert_eq!(fallback_label(""), "");
    }

    #[test]
    fn overrides_replace_builtin_entries() {
        let mut overrides = BTreeMap::new();
        overrides.insert(
            "dct_publisher".to_string(),
            BTreeMap::from([("es".to_string(), "Publicador".to_string())]),
        );
        let labels = StaticLabels::builtin().with_overrides(&overrides);
        assert_eq!(
            labels.label("dct_publisher", "es").as_deref(),
            Some("Publicador")
        );
        assert_eq!(
            labels.label("dct_publisher", "en").as_deref(),
            Some("Publisher")
        );
    }
}
