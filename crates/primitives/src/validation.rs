//! Ordered validation pipelines
//!
//! Each pipeline checks one rule at a time in a fixed order and stops at
//! the first violation, so a request with several problems always reports
//! the same error code. Capacity is checked by the registries before these
//! run (it needs the registry state); authorization, uniqueness and
//! authority readiness are checked after.
//!
//! Text lengths are measured in characters, not bytes.

use rxregistry_core::limits::{
    is_optional_text, is_required_text, MAX_CLASSIFICATION_CODE_CHARS,
    MAX_CONTRAINDICATION_CHARS, MAX_DESCRIPTION_CHARS, MAX_DOSAGE_FORM_CHARS,
    MAX_DRUG_CATEGORY_CHARS, MAX_DRUG_NAME_CHARS, MAX_EFFECTS_CHARS, MAX_EVIDENCE_LEVEL,
    MAX_INDICATION_CHARS, MAX_MANUFACTURER_CHARS, MAX_RECOMMENDATIONS_CHARS,
    MAX_SIDE_EFFECTS_CHARS,
};
use rxregistry_core::{ContentHash, DrugError, InteractionError, UpdateRejection};

use crate::drug::{DrugChanges, NewDrug};
use crate::interaction::{InteractionCategory, InteractionChanges, NewInteraction, Severity};

// =============================================================================
// Drugs
// =============================================================================

/// Field checks for a new drug
///
/// Order: name, category, content hash, dosage form, manufacturer,
/// approval date, expiry date, classification code, indication,
/// contraindication, side effects, version.
pub fn check_new_drug(request: &NewDrug) -> Result<ContentHash, DrugError> {
    if !is_required_text(&request.name, MAX_DRUG_NAME_CHARS) {
        return Err(DrugError::InvalidName);
    }
    if !is_required_text(&request.category, MAX_DRUG_CATEGORY_CHARS) {
        return Err(DrugError::InvalidCategory);
    }
    let content_hash =
        ContentHash::from_slice(&request.content_hash).ok_or(DrugError::InvalidContentHash)?;
    if !is_optional_text(&request.dosage_form, MAX_DOSAGE_FORM_CHARS) {
        return Err(DrugError::InvalidDosageForm);
    }
    if !is_optional_text(&request.manufacturer, MAX_MANUFACTURER_CHARS) {
        return Err(DrugError::InvalidManufacturer);
    }
    if request.approval_date == 0 {
        return Err(DrugError::InvalidApprovalDate);
    }
    if request.expiry_date == 0 {
        return Err(DrugError::InvalidExpiryDate);
    }
    if !is_optional_text(&request.classification_code, MAX_CLASSIFICATION_CODE_CHARS) {
        return Err(DrugError::InvalidClassificationCode);
    }
    if !is_optional_text(&request.indication, MAX_INDICATION_CHARS) {
        return Err(DrugError::InvalidIndication);
    }
    if !is_optional_text(&request.contraindication, MAX_CONTRAINDICATION_CHARS) {
        return Err(DrugError::InvalidContraindication);
    }
    if !is_optional_text(&request.side_effects, MAX_SIDE_EFFECTS_CHARS) {
        return Err(DrugError::InvalidSideEffects);
    }
    if request.version == 0 {
        return Err(DrugError::InvalidVersion);
    }
    Ok(content_hash)
}

/// Field checks for a drug update: name, then category
pub fn check_drug_changes(changes: &DrugChanges) -> Result<(), UpdateRejection> {
    if !is_required_text(&changes.name, MAX_DRUG_NAME_CHARS) {
        return Err(UpdateRejection::InvalidField("name"));
    }
    if !is_required_text(&changes.category, MAX_DRUG_CATEGORY_CHARS) {
        return Err(UpdateRejection::InvalidField("category"));
    }
    Ok(())
}

// =============================================================================
// Interactions
// =============================================================================

/// Typed fields produced by a successful interaction check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidInteraction {
    /// Parsed severity
    pub severity: Severity,
    /// Source hash
    pub source_hash: ContentHash,
    /// Parsed category
    pub category: InteractionCategory,
    /// Onset, non-negative
    pub onset: u64,
    /// Duration, non-negative
    pub duration: u64,
}

/// Field checks for a new interaction
///
/// Order: drug ids (both), severity, description, effects,
/// recommendations, source hash, category, onset, duration, evidence
/// level, version.
pub fn check_new_interaction(
    request: &NewInteraction,
) -> Result<ValidInteraction, InteractionError> {
    if request.drug_a == 0 || request.drug_b == 0 {
        return Err(InteractionError::InvalidDrugId);
    }
    let severity = Severity::from_level(request.severity).ok_or(InteractionError::InvalidSeverity)?;
    if !is_required_text(&request.description, MAX_DESCRIPTION_CHARS) {
        return Err(InteractionError::InvalidDescription);
    }
    if !is_required_text(&request.effects, MAX_EFFECTS_CHARS) {
        return Err(InteractionError::InvalidEffects);
    }
    if !is_optional_text(&request.recommendations, MAX_RECOMMENDATIONS_CHARS) {
        return Err(InteractionError::InvalidRecommendations);
    }
    let source_hash =
        ContentHash::from_slice(&request.source_hash).ok_or(InteractionError::InvalidSourceHash)?;
    let category: InteractionCategory = request.category.parse()?;
    let onset = u64::try_from(request.onset).map_err(|_| InteractionError::InvalidOnset)?;
    let duration = u64::try_from(request.duration).map_err(|_| InteractionError::InvalidDuration)?;
    if request.evidence_level > MAX_EVIDENCE_LEVEL {
        return Err(InteractionError::InvalidEvidenceLevel);
    }
    if request.version == 0 {
        return Err(InteractionError::InvalidVersion);
    }
    Ok(ValidInteraction {
        severity,
        source_hash,
        category,
        onset,
        duration,
    })
}

/// Field checks for an interaction update: severity, then description
pub fn check_interaction_changes(
    changes: &InteractionChanges,
) -> Result<Severity, UpdateRejection> {
    let severity =
        Severity::from_level(changes.severity).ok_or(UpdateRejection::InvalidField("severity"))?;
    if !is_required_text(&changes.description, MAX_DESCRIPTION_CHARS) {
        return Err(UpdateRejection::InvalidField("description"));
    }
    Ok(severity)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drug() -> NewDrug {
        NewDrug {
            name: "Aspirin".into(),
            category: "Analgesic".into(),
            content_hash: vec![1; 32],
            dosage_form: "Tablet".into(),
            manufacturer: "Bayer".into(),
            approval_date: 1_234_567_890,
            expiry_date: 2_345_678_901,
            classification_code: "B01AC06".into(),
            indication: "Pain relief".into(),
            contraindication: "Bleeding disorders".into(),
            side_effects: "Nausea, stomach pain".into(),
            version: 1,
        }
    }

    fn interaction() -> NewInteraction {
        NewInteraction {
            drug_a: 1,
            drug_b: 2,
            severity: 1,
            description: "Moderate interaction".into(),
            effects: "Dizziness and nausea".into(),
            recommendations: "Monitor closely".into(),
            source_hash: vec![1; 32],
            category: "pharmacokinetic".into(),
            contraindicated: false,
            onset: 60,
            duration: 3600,
            evidence_level: 3,
            version: 1,
        }
    }

    #[test]
    fn test_valid_drug_passes() {
        assert_eq!(check_new_drug(&drug()), Ok(ContentHash::filled(1)));
    }

    #[test]
    fn test_drug_first_failure_wins() {
        // Every field is wrong; the name is checked first
        let request = NewDrug {
            name: String::new(),
            category: String::new(),
            content_hash: vec![],
            approval_date: 0,
            version: 0,
            ..drug()
        };
        assert_eq!(check_new_drug(&request), Err(DrugError::InvalidName));

        let request = NewDrug {
            content_hash: vec![1; 31],
            version: 0,
            ..drug()
        };
        assert_eq!(check_new_drug(&request), Err(DrugError::InvalidContentHash));
    }

    #[test]
    fn test_drug_each_rule_has_its_code() {
        let cases: Vec<(NewDrug, DrugError)> = vec![
            (NewDrug { name: "x".repeat(101), ..drug() }, DrugError::InvalidName),
            (NewDrug { category: "x".repeat(51), ..drug() }, DrugError::InvalidCategory),
            (NewDrug { content_hash: vec![1; 33], ..drug() }, DrugError::InvalidContentHash),
            (NewDrug { dosage_form: "x".repeat(51), ..drug() }, DrugError::InvalidDosageForm),
            (NewDrug { manufacturer: "x".repeat(101), ..drug() }, DrugError::InvalidManufacturer),
            (NewDrug { approval_date: 0, ..drug() }, DrugError::InvalidApprovalDate),
            (NewDrug { expiry_date: 0, ..drug() }, DrugError::InvalidExpiryDate),
            (
                NewDrug { classification_code: "x".repeat(21), ..drug() },
                DrugError::InvalidClassificationCode,
            ),
            (NewDrug { indication: "x".repeat(501), ..drug() }, DrugError::InvalidIndication),
            (
                NewDrug { contraindication: "x".repeat(501), ..drug() },
                DrugError::InvalidContraindication,
            ),
            (NewDrug { side_effects: "x".repeat(1001), ..drug() }, DrugError::InvalidSideEffects),
            (NewDrug { version: 0, ..drug() }, DrugError::InvalidVersion),
        ];
        for (request, expected) in cases {
            assert_eq!(check_new_drug(&request), Err(expected));
        }
    }

    #[test]
    fn test_drug_rules_apply_in_order() {
        let rules: [(fn(&mut NewDrug), DrugError); 12] = [
            (|d| d.name.clear(), DrugError::InvalidName),
            (|d| d.category.clear(), DrugError::InvalidCategory),
            (|d| d.content_hash.clear(), DrugError::InvalidContentHash),
            (|d| d.dosage_form = "x".repeat(51), DrugError::InvalidDosageForm),
            (|d| d.manufacturer = "x".repeat(101), DrugError::InvalidManufacturer),
            (|d| d.approval_date = 0, DrugError::InvalidApprovalDate),
            (|d| d.expiry_date = 0, DrugError::InvalidExpiryDate),
            (|d| d.classification_code = "x".repeat(21), DrugError::InvalidClassificationCode),
            (|d| d.indication = "x".repeat(501), DrugError::InvalidIndication),
            (|d| d.contraindication = "x".repeat(501), DrugError::InvalidContraindication),
            (|d| d.side_effects = "x".repeat(1001), DrugError::InvalidSideEffects),
            (|d| d.version = 0, DrugError::InvalidVersion),
        ];
        // Break rule i and every rule after it; rule i must win
        for (i, (_, expected)) in rules.iter().enumerate() {
            let mut request = drug();
            for (break_rule, _) in &rules[i..] {
                break_rule(&mut request);
            }
            assert_eq!(check_new_drug(&request), Err(expected.clone()), "rule {}", i);
        }
    }

    #[test]
    fn test_drug_optional_fields_may_be_empty() {
        let request = NewDrug {
            dosage_form: String::new(),
            manufacturer: String::new(),
            classification_code: String::new(),
            indication: String::new(),
            contraindication: String::new(),
            side_effects: String::new(),
            ..drug()
        };
        assert!(check_new_drug(&request).is_ok());
    }

    #[test]
    fn test_name_limit_counts_characters() {
        let request = NewDrug {
            name: "é".repeat(100),
            ..drug()
        };
        assert!(check_new_drug(&request).is_ok());
    }

    #[test]
    fn test_drug_changes() {
        let ok = DrugChanges {
            name: "NewName".into(),
            category: "NewCategory".into(),
        };
        assert_eq!(check_drug_changes(&ok), Ok(()));

        let bad_name = DrugChanges {
            name: String::new(),
            category: String::new(),
        };
        assert_eq!(
            check_drug_changes(&bad_name),
            Err(UpdateRejection::InvalidField("name"))
        );

        let bad_category = DrugChanges {
            category: "x".repeat(51),
            ..ok
        };
        assert_eq!(
            check_drug_changes(&bad_category),
            Err(UpdateRejection::InvalidField("category"))
        );
    }

    #[test]
    fn test_valid_interaction_passes() {
        let valid = check_new_interaction(&interaction()).unwrap();
        assert_eq!(valid.severity, Severity::Moderate);
        assert_eq!(valid.category, InteractionCategory::Pharmacokinetic);
        assert_eq!(valid.onset, 60);
        assert_eq!(valid.duration, 3600);
    }

    #[test]
    fn test_interaction_each_rule_has_its_code() {
        let cases: Vec<(NewInteraction, InteractionError)> = vec![
            (NewInteraction { drug_a: 0, ..interaction() }, InteractionError::InvalidDrugId),
            (NewInteraction { drug_b: 0, ..interaction() }, InteractionError::InvalidDrugId),
            (NewInteraction { severity: 3, ..interaction() }, InteractionError::InvalidSeverity),
            (
                NewInteraction { description: String::new(), ..interaction() },
                InteractionError::InvalidDescription,
            ),
            (
                NewInteraction { effects: "x".repeat(1001), ..interaction() },
                InteractionError::InvalidEffects,
            ),
            (
                NewInteraction { recommendations: "x".repeat(501), ..interaction() },
                InteractionError::InvalidRecommendations,
            ),
            (
                NewInteraction { source_hash: vec![1; 31], ..interaction() },
                InteractionError::InvalidSourceHash,
            ),
            (
                NewInteraction { category: "invalid".into(), ..interaction() },
                InteractionError::InvalidCategory,
            ),
            (NewInteraction { onset: -1, ..interaction() }, InteractionError::InvalidOnset),
            (NewInteraction { duration: -1, ..interaction() }, InteractionError::InvalidDuration),
            (
                NewInteraction { evidence_level: 6, ..interaction() },
                InteractionError::InvalidEvidenceLevel,
            ),
            (NewInteraction { version: 0, ..interaction() }, InteractionError::InvalidVersion),
        ];
        for (request, expected) in cases {
            assert_eq!(check_new_interaction(&request).unwrap_err(), expected);
        }
    }

    #[test]
    fn test_interaction_drug_ids_checked_before_severity() {
        let request = NewInteraction {
            drug_a: 0,
            severity: 9,
            ..interaction()
        };
        assert_eq!(
            check_new_interaction(&request).unwrap_err(),
            InteractionError::InvalidDrugId
        );
    }

    #[test]
    fn test_interaction_rules_apply_in_order() {
        let rules: [(fn(&mut NewInteraction), InteractionError); 12] = [
            (|r| r.drug_a = 0, InteractionError::InvalidDrugId),
            (|r| r.drug_b = 0, InteractionError::InvalidDrugId),
            (|r| r.severity = 3, InteractionError::InvalidSeverity),
            (|r| r.description.clear(), InteractionError::InvalidDescription),
            (|r| r.effects.clear(), InteractionError::InvalidEffects),
            (|r| r.recommendations = "x".repeat(501), InteractionError::InvalidRecommendations),
            (|r| r.source_hash = vec![1; 31], InteractionError::InvalidSourceHash),
            (|r| r.category = "invalid".into(), InteractionError::InvalidCategory),
            (|r| r.onset = -1, InteractionError::InvalidOnset),
            (|r| r.duration = -1, InteractionError::InvalidDuration),
            (|r| r.evidence_level = 6, InteractionError::InvalidEvidenceLevel),
            (|r| r.version = 0, InteractionError::InvalidVersion),
        ];
        for (i, (_, expected)) in rules.iter().enumerate() {
            let mut request = interaction();
            for (break_rule, _) in &rules[i..] {
                break_rule(&mut request);
            }
            assert_eq!(
                check_new_interaction(&request).unwrap_err(),
                expected.clone(),
                "rule {}",
                i
            );
        }
    }

    #[test]
    fn test_update_rules_apply_in_order() {
        let both_bad = DrugChanges {
            name: String::new(),
            category: String::new(),
        };
        assert_eq!(
            check_drug_changes(&both_bad),
            Err(UpdateRejection::InvalidField("name"))
        );

        let both_bad = InteractionChanges {
            severity: 3,
            description: String::new(),
        };
        assert_eq!(
            check_interaction_changes(&both_bad),
            Err(UpdateRejection::InvalidField("severity"))
        );
        let description_bad = InteractionChanges {
            severity: 1,
            description: String::new(),
        };
        assert_eq!(
            check_interaction_changes(&description_bad),
            Err(UpdateRejection::InvalidField("description"))
        );
    }

    #[test]
    fn test_interaction_changes() {
        let ok = InteractionChanges {
            severity: 2,
            description: "Severe interaction".into(),
        };
        assert_eq!(check_interaction_changes(&ok), Ok(Severity::Severe));

        let bad = InteractionChanges {
            severity: 3,
            description: String::new(),
        };
        assert_eq!(
            check_interaction_changes(&bad),
            Err(UpdateRejection::InvalidField("severity"))
        );
    }
}
