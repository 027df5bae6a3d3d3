use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use mqa_core::Dimension::{self, *};

use crate::errors::{ConfigurationError, Result};
use crate::model::{
    DimensionMaxima, MetricDefinition, MetricKind, Profile, ProfileDefinition, RatingThresholds,
    ResourceScope::{self, *},
};

pub const DCAT_AP: &str = "dcat_ap";
pub const DCAT_AP_ES: &str = "dcat_ap_es";
pub const NTI_RISP: &str = "nti_risp";

type MetricRow = (&'static str, Dimension, u32, ResourceScope);

/// Metrics shared by every profile (195 points).
const COMMON_METRICS: &[MetricRow] = &[
    ("dcat_keyword", Findability, 30, Dataset),
    ("dcat_theme", Findability, 30, Dataset),
    ("dct_spatial", Findability, 20, Dataset),
    ("dct_temporal", Findability, 20, Dataset),
    ("dcat_accessURL_status", Accessibility, 50, Distribution),
    ("dct_format", Interoperability, 20, Distribution),
    ("dcat_mediaType", Interoperability, 10, Distribution),
    ("dcat_byteSize", Contextuality, 5, Distribution),
    ("dct_issued", Contextuality, 5, DatasetAndDistribution),
    ("dct_modified", Contextuality, 5, DatasetAndDistribution),
];

/// Metrics shared by the DCAT-AP family (180 points).
const DCAT_COMMON_METRICS: &[MetricRow] = &[
    ("dcat_downloadURL", Accessibility, 20, Distribution),
    ("dcat_downloadURL_status", Accessibility, 30, Distribution),
    ("dct_format_vocabulary", Interoperability, 5, Distribution),
    ("dct_mediaType_vocabulary", Interoperability, 5, Distribution),
    ("dct_format_nonproprietary", Interoperability, 20, Distribution),
    ("dct_format_machinereadable", Interoperability, 20, Distribution),
    ("dct_license", Reusability, 20, Distribution),
    ("dct_license_vocabulary", Reusability, 10, Distribution),
    ("dct_accessRights", Reusability, 10, Dataset),
    ("dct_accessRights_vocabulary", Reusability, 5, Dataset),
    ("dcat_contactPoint", Reusability, 20, Dataset),
    ("dct_publisher", Reusability, 10, Dataset),
    ("dct_rights", Contextuality, 5, Distribution),
];

const NTI_RISP_INTEROPERABILITY: &[MetricRow] = &[
    ("dct_format_vocabulary_nti_risp", Interoperability, 5, Distribution),
    ("dct_format_nonproprietary", Interoperability, 20, Distribution),
    ("dct_format_machinereadable", Interoperability, 20, Distribution),
];

const NTI_RISP_REUSABILITY: &[MetricRow] = &[
    ("dct_license", Reusability, 20, Distribution),
    ("dct_license_vocabulary", Reusability, 10, Distribution),
    ("dct_publisher", Reusability, 10, Dataset),
];

/// Whole-graph compliance metrics. Every profile lists all of them and keeps
/// only its own designated one.
const COMPLIANCE_METRICS: &[MetricRow] = &[
    ("dcat_ap_compliance", Interoperability, 30, WholeGraph),
    ("dcat_ap_es_compliance", Interoperability, 30, WholeGraph),
    ("nti_risp_compliance", Interoperability, 30, WholeGraph),
];

const DCAT_MAXIMA: DimensionMaxima = DimensionMaxima {
    findability: 100,
    accessibility: 100,
    interoperability: 110,
    reusability: 75,
    contextuality: 20,
};

const NTI_RISP_MAXIMA: DimensionMaxima = DimensionMaxima {
    findability: 100,
    accessibility: 50,
    interoperability: 105,
    reusability: 40,
    contextuality: 15,
};

const DCAT_THRESHOLDS: RatingThresholds = RatingThresholds {
    excellent: 351,
    good: 221,
    sufficient: 121,
};

const NTI_RISP_THRESHOLDS: RatingThresholds = RatingThresholds {
    excellent: 264,
    good: 166,
    sufficient: 91,
};

/// Named set of validated profiles.
#[derive(Debug, Clone)]
pub struct ProfileCatalog {
    profiles: BTreeMap<String, Profile>,
}

impl ProfileCatalog {
    /// Catalog with the `dcat_ap`, `dcat_ap_es` and `nti_risp` profiles.
    pub fn builtin() -> Self {
        let profiles = builtin_definitions()
            .into_iter()
            .map(|definition| {
                (
                    definition.name.clone(),
                    Profile::from_builtin(definition),
                )
            })
            .collect();
        Self { profiles }
    }

    /// Fresh copy of the named profile.
    pub fn get(&self, name: &str) -> Result<Profile> {
        self.profiles
            .get(name)
            .cloned()
            .ok_or_else(|| ConfigurationError::UnknownProfile(name.to_string()))
    }

    pub fn names(&self) -> Vec<&str> {
        self.profiles.keys().map(String::as_str).collect()
    }

    pub fn profiles(&self) -> impl Iterator<Item = &Profile> {
        self.profiles.values()
    }

    /// Add custom profiles. A definition named like an existing profile
    /// replaces it. Nothing is added unless every definition validates.
    pub fn extend(&mut self, definitions: Vec<ProfileDefinition>) -> Result<()> {
        let validated = definitions
            .into_iter()
            .map(Profile::from_definition)
            .collect::<Result<Vec<_>>>()?;
        for profile in validated {
            self.profiles.insert(profile.name().to_string(), profile);
        }
        Ok(())
    }

    /// Read a JSON array of profile definitions and add them.
    pub fn extend_from_file(&mut self, path: &Path) -> Result<()> {
        let contents = fs::read_to_string(path)?;
        let definitions: Vec<ProfileDefinition> = serde_json::from_str(&contents)?;
        self.extend(definitions)
    }
}

impl Default for ProfileCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Resolve a built-in profile by name.
pub fn get_profile(name: &str) -> Result<Profile> {
    ProfileCatalog::builtin().get(name)
}

/// Definitions of the built-in profiles, before validation.
pub fn builtin_definitions() -> Vec<ProfileDefinition> {
    vec![
        compose(
            DCAT_AP,
            "dcat_ap_compliance",
            &[DCAT_COMMON_METRICS, COMPLIANCE_METRICS],
            DCAT_MAXIMA,
            DCAT_THRESHOLDS,
        ),
        compose(
            DCAT_AP_ES,
            "dcat_ap_es_compliance",
            &[DCAT_COMMON_METRICS, COMPLIANCE_METRICS],
            DCAT_MAXIMA,
            DCAT_THRESHOLDS,
        ),
        compose(
            NTI_RISP,
            "nti_risp_compliance",
            &[
                NTI_RISP_INTEROPERABILITY,
                COMPLIANCE_METRICS,
                NTI_RISP_REUSABILITY,
            ],
            NTI_RISP_MAXIMA,
            NTI_RISP_THRESHOLDS,
        ),
    ]
}

fn compose(
    name: &str,
    compliance_metric: &str,
    groups: &[&[MetricRow]],
    dimension_max: DimensionMaxima,
    thresholds: RatingThresholds,
) -> ProfileDefinition {
    let metrics = std::iter::once(COMMON_METRICS)
        .chain(groups.iter().copied())
        .flat_map(|group| group.iter())
        .map(|(id, dimension, weight, scope)| MetricDefinition {
            id: id.to_string(),
            dimension: *dimension,
            weight: *weight,
            scope: *scope,
            kind: if *scope == WholeGraph {
                MetricKind::Compliance
            } else {
                MetricKind::Standard
            },
        })
        .filter(|metric| !metric.is_compliance() || metric.id == compliance_metric)
        .collect();

    ProfileDefinition {
        name: name.to_string(),
        metrics,
        dimension_max,
        thresholds,
        compliance_metric: compliance_metric.to_string(),
    }
}
