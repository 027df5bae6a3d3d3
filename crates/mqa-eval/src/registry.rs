use std::collections::HashMap;

use mqa_core::namespaces::{dcat, dct, rdfs};
use mqa_profile::{ConfigurationError, MetricDefinition, Profile};

use crate::checkers::Checker;
use crate::compliance;
use crate::vocabulary::VocabularyId;

/// Binds metric ids to checkers. A checker can only be bound to a metric
/// that was registered first.
#[derive(Debug, Clone, Default)]
pub struct CheckerRegistry {
    metrics: HashMap<String, MetricDefinition>,
    checkers: HashMap<String, Checker>,
}

impl CheckerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the profile's metrics and their standard checkers.
    pub fn standard(profile: &Profile) -> Result<Self, ConfigurationError> {
        let mut registry = Self::new();
        for metric in profile.metrics() {
            registry.register_metric(metric.clone());
        }
        for (id, checker) in standard_checkers() {
            if registry.metrics.contains_key(id) {
                registry.register_checker(id, checker)?;
            }
        }
        Ok(registry)
    }

    pub fn register_metric(&mut self, metric: MetricDefinition) {
        self.metrics.insert(metric.id.clone(), metric);
    }

    pub fn register_checker(
        &mut self,
        metric_id: &str,
        checker: Checker,
    ) -> Result<(), ConfigurationError> {
        if !self.metrics.contains_key(metric_id) {
            return Err(ConfigurationError::UnregisteredMetric(metric_id.to_string()));
        }
        self.checkers.insert(metric_id.to_string(), checker);
        Ok(())
    }

    /// `None` when nothing is bound; callers skip the metric.
    pub fn get_checker(&self, metric_id: &str) -> Option<&Checker> {
        self.checkers.get(metric_id)
    }
}

/// Checkers for every metric of the built-in profiles.
pub fn standard_checkers() -> Vec<(&'static str, Checker)> {
    vec![
        // findability
        ("dcat_keyword", Checker::typed(dcat::KEYWORD, dcat::DATASET)),
        ("dcat_theme", Checker::typed(dcat::THEME, dcat::DATASET)),
        ("dct_spatial", Checker::typed(dct::SPATIAL, dcat::DATASET)),
        ("dct_temporal", Checker::typed(dct::TEMPORAL, dcat::DATASET)),
        // accessibility
        (
            "dcat_accessURL_status",
            Checker::url(dcat::ACCESS_URL, dcat::DISTRIBUTION),
        ),
        (
            "dcat_downloadURL",
            Checker::typed(dcat::DOWNLOAD_URL, dcat::DISTRIBUTION),
        ),
        (
            "dcat_downloadURL_status",
            Checker::url(dcat::DOWNLOAD_URL, dcat::DISTRIBUTION),
        ),
        // interoperability
        ("dct_format", Checker::typed(dct::FORMAT, dcat::DISTRIBUTION)),
        (
            "dcat_mediaType",
            Checker::typed(dcat::MEDIA_TYPE, dcat::DISTRIBUTION),
        ),
        (
            "dct_format_vocabulary",
            Checker::vocabulary(&[dct::FORMAT], VocabularyId::FileTypes),
        ),
        (
            "dct_format_vocabulary_nti_risp",
            Checker::vocabulary_label(&[dct::FORMAT], VocabularyId::FileTypes, rdfs::LABEL),
        ),
        (
            "dct_mediaType_vocabulary",
            Checker::vocabulary(&[dcat::MEDIA_TYPE], VocabularyId::MediaTypes),
        ),
        (
            "dct_format_nonproprietary",
            Checker::vocabulary(&[dct::FORMAT], VocabularyId::NonProprietary),
        ),
        (
            "dct_format_machinereadable",
            Checker::vocabulary(&[dct::FORMAT], VocabularyId::MachineReadable),
        ),
        (
            "dcat_ap_compliance",
            Checker::LeveledComplianceDelegate(compliance::dcat_ap_shapes()),
        ),
        (
            "dcat_ap_es_compliance",
            Checker::ComplianceDelegate(compliance::dcat_ap_es_shapes()),
        ),
        (
            "nti_risp_compliance",
            Checker::ComplianceDelegate(compliance::nti_risp_shapes()),
        ),
        // reusability
        ("dct_license", Checker::typed(dct::LICENSE, dcat::DISTRIBUTION)),
        (
            "dct_license_vocabulary",
            Checker::vocabulary(&[dct::LICENSE], VocabularyId::Licenses),
        ),
        (
            "dct_accessRights",
            Checker::typed(dct::ACCESS_RIGHTS, dcat::DATASET),
        ),
        (
            "dct_accessRights_vocabulary",
            Checker::vocabulary(&[dct::ACCESS_RIGHTS], VocabularyId::AccessRights),
        ),
        (
            "dcat_contactPoint",
            Checker::typed(dcat::CONTACT_POINT, dcat::DATASET),
        ),
        ("dct_publisher", Checker::typed(dct::PUBLISHER, dcat::DATASET)),
        // contextuality
        ("dct_rights", Checker::typed(dct::RIGHTS, dcat::DISTRIBUTION)),
        (
            "dcat_byteSize",
            Checker::typed(dcat::BYTE_SIZE, dcat::DISTRIBUTION),
        ),
        (
            "dct_issued",
            Checker::multi_typed(dct::ISSUED, &[dcat::DATASET, dcat::DISTRIBUTION]),
        ),
        (
            "dct_modified",
            Checker::multi_typed(dct::MODIFIED, &[dcat::DATASET, dcat::DISTRIBUTION]),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use mqa_core::Dimension;
    use mqa_profile::{MetricKind, ProfileCatalog, ResourceScope};

    use super::*;

    #[test]
    fn checker_before_metric_is_rejected() {
        let mut registry = CheckerRegistry::new();
        let err = registry
            .register_checker("dcat_keyword", Checker::property(dcat::KEYWORD))
            .expect_err("metric not registered");
        assert!(matches!(err, ConfigurationError::UnregisteredMetric(id) if id == "dcat_keyword"));

        registry.register_metric(MetricDefinition {
            id: "dcat_keyword".to_string(),
            dimension: Dimension::Findability,
            weight: 30,
            scope: ResourceScope::Dataset,
            kind: MetricKind::Standard,
        });
        registry
            .register_checker("dcat_keyword", Checker::property(dcat::KEYWORD))
            .expect("metric registered");
        assert!(registry.get_checker("dcat_keyword").is_some());
        assert!(registry.get_checker("dct_theme").is_none());
    }

    #[test]
    fn every_builtin_metric_has_a_checker() {
        let catalog = ProfileCatalog::builtin();
        for profile in catalog.profiles() {
            let registry = CheckerRegistry::standard(profile).expect("standard registry");
            for metric in profile.metrics() {
                assert!(
                    registry.get_checker(&metric.id).is_some(),
                    "{} has no checker in {}",
                    metric.id,
                    profile.name()
                );
            }
        }
    }
}
