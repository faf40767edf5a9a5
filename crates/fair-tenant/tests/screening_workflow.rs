use std::sync::Arc;

use fair_tenant::screening::legacy::{write_training_rows, TrainingRow};
use fair_tenant::screening::synthetic::DEFAULT_SEED;
use fair_tenant::screening::{
    generate_population, parse_audit_batch, LegacySource, ModelBundle, RiskLevel,
    ScreeningService,
};

fn fixture_batch() -> Vec<fair_tenant::screening::LabeledApplicant> {
    let data = include_bytes!("fixtures/audit_batch.csv");
    parse_audit_batch(&data[..]).expect("fixture parses")
}

#[test]
fn fixture_audit_flags_the_same_group_under_both_models() {
    let service = ScreeningService::new(Arc::new(ModelBundle::reference()));
    let batch = fixture_batch();
    assert_eq!(batch.len(), 12);

    let report = service.audit(&batch, Some(50.0), None).expect("audit runs");

    let fair = report.model("new_model").expect("fair model audited");
    assert_eq!(fair.reference_group.as_deref(), Some("Hispanic"));
    let black = fair.group("Black").expect("group present");
    assert_eq!(black.approved, 3);
    assert_eq!(black.disparity_ratio, Some(0.75));
    assert_eq!(fair.adverse_impact_groups(), vec!["Black"]);

    let legacy = report.model("legacy_model").expect("legacy model audited");
    assert_eq!(legacy.reference_group.as_deref(), Some("White"));
    assert_eq!(legacy.group("Black").map(|g| g.approved), Some(2));
    assert_eq!(legacy.group("Hispanic").map(|g| g.approved), Some(3));
    assert_eq!(legacy.adverse_impact_groups(), vec!["Black", "Hispanic"]);
}

#[test]
fn synthetic_population_trains_and_audits_end_to_end() {
    let population = generate_population(600, DEFAULT_SEED);
    let rows: Vec<TrainingRow> = population.iter().map(|a| a.training_row()).collect();

    let mut table = Vec::new();
    write_training_rows(&mut table, &rows).expect("table written");
    let bundle = ModelBundle::from_training_reader(table.as_slice()).expect("bundle trains");
    assert_eq!(bundle.legacy_source, LegacySource::Trained);

    let service = ScreeningService::new(Arc::new(bundle));
    let batch: Vec<_> = population.iter().map(|a| a.labeled()).collect();
    let report = service.audit(&batch, None, None).expect("audit runs");

    assert_eq!(report.applicants, 600);
    for model in &report.models {
        let counted: usize = model.groups.iter().map(|g| g.applicants).sum();
        assert_eq!(counted, 600, "model {}", model.model);
        assert_eq!(model.groups.len(), 3);

        if let Some(reference) = model.reference_group.as_deref() {
            let stats = model.group(reference).expect("reference listed");
            if stats.approved > 0 {
                assert_eq!(stats.disparity_ratio, Some(1.0));
            }
        }
        for group in &model.groups {
            if let Some(rate) = group.approval_rate {
                assert!((0.0..=1.0).contains(&rate));
            }
        }
    }
}

#[test]
fn scoring_and_comparison_agree_on_the_new_model() {
    let service = ScreeningService::new(Arc::new(ModelBundle::reference()));

    for applicant in fixture_batch() {
        let scored = service.score(&applicant.record).expect("scores");
        let compared = service.compare(&applicant.record).expect("compares");

        assert_eq!(scored.score, compared.new_model.score);
        assert_eq!(scored.breakdown, compared.new_model.breakdown);
        if scored.risk_level == RiskLevel::Low {
            assert!(compared.new_model.impact.expected_missed_months <= 0.75);
        }
    }
}
