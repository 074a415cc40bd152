use super::common::*;
use crate::assessment::blueprint::AssessmentBlueprint;
use crate::assessment::domain::{Field, RiskLevel};
use crate::assessment::scoring::{
    PolicyError, Recommendation, RiskPredicate, RiskThresholds, ScoreBand, ScoreComponent,
    ScoreRule, ScoringEngine, ScoringPolicy,
};

const BASELINE: [&str; 4] = [
    "Maintain regular blood pressure monitoring",
    "Follow a balanced, heart-healthy diet",
    "Engage in regular physical activity",
    "Schedule regular check-ups with your healthcare provider",
];

/// Three toggles worth 3, 3 and 4 points out of 10.
fn toggle_policy() -> ScoringPolicy {
    ScoringPolicy {
        name: "toggles".to_string(),
        rules: vec![
            ScoreRule::weighted("Hypertension", 3, RiskPredicate::Flag(Field::Hypertension)),
            ScoreRule::weighted("Heart disease", 3, RiskPredicate::Flag(Field::HeartDisease)),
            ScoreRule::weighted("Stroke", 4, RiskPredicate::Flag(Field::StrokeHistory)),
        ],
        thresholds: RiskThresholds::default(),
        recommendations: vec![Recommendation::always("Keep monitoring")],
    }
}

#[test]
fn high_risk_stroke_profile_scores_sixteen_of_nineteen() {
    let blueprint = AssessmentBlueprint::stroke();
    let record = complete_record(&blueprint, &high_risk_stroke_answers());

    let result = stroke_engine().score(&record);

    assert_eq!(result.raw_score, 16);
    assert_eq!(result.max_score, 19);
    assert!((result.risk_score - 16.0 / 19.0).abs() < 1e-12);
    assert_eq!(result.risk_level, RiskLevel::High);
    assert!((result.risk_percentage() - 84.21).abs() < 0.01);

    let mut expected: Vec<String> = BASELINE.iter().map(|text| text.to_string()).collect();
    expected.extend([
        "Consider smoking cessation programs".to_string(),
        "Work with a healthcare provider on weight management".to_string(),
        "Increase daily physical activity levels".to_string(),
    ]);
    assert_eq!(result.recommendations, expected);
}

#[test]
fn low_risk_stroke_profile_scores_zero() {
    let blueprint = AssessmentBlueprint::stroke();
    let record = complete_record(&blueprint, &low_risk_stroke_answers());

    let result = stroke_engine().score(&record);

    assert_eq!(result.raw_score, 0);
    assert_eq!(result.risk_score, 0.0);
    assert_eq!(result.risk_level, RiskLevel::Low);
    assert!(result.components.is_empty());
    assert_eq!(result.recommendations, BASELINE);
}

#[test]
fn components_list_every_rule_that_fired_in_table_order() {
    let blueprint = AssessmentBlueprint::stroke();
    let record = complete_record(&blueprint, &high_risk_stroke_answers());

    let result = stroke_engine().score(&record);
    let labels: Vec<&str> = result
        .components
        .iter()
        .map(|component| component.label.as_str())
        .collect();

    assert_eq!(
        labels,
        [
            "Age",
            "Hypertension",
            "Previous stroke history",
            "Family history of stroke",
            "Current smoker",
            "Low physical activity",
            "BMI above 30",
            "Average glucose above 200 mg/dL",
            "Blood pressure above 140",
        ]
    );
    assert_eq!(
        result.components[0],
        ScoreComponent {
            label: "Age".to_string(),
            weight: 2,
        }
    );
    let total: u16 = result.components.iter().map(|component| component.weight).sum();
    assert_eq!(total, result.raw_score);
}

#[test]
fn age_bands_are_exclusive_and_strict() {
    let blueprint = AssessmentBlueprint::stroke();
    let engine = stroke_engine();

    for (age, expected) in [("45", 0), ("46", 1), ("65", 1), ("66", 2)] {
        let answers = low_risk_stroke_answers().with(Field::Age, age);
        let result = engine.score(&complete_record(&blueprint, &answers));
        assert_eq!(result.raw_score, expected, "age {age}");
    }
}

#[test]
fn numeric_risk_factors_need_to_exceed_their_cut_off() {
    let blueprint = AssessmentBlueprint::stroke();
    let engine = stroke_engine();

    let at_limit = low_risk_stroke_answers()
        .with(Field::Bmi, "30")
        .with(Field::AvgGlucoseLevel, "200")
        .with(Field::BloodPressureLevel, "140");
    assert_eq!(engine.score(&complete_record(&blueprint, &at_limit)).raw_score, 0);

    let beyond = low_risk_stroke_answers()
        .with(Field::Bmi, "30.1")
        .with(Field::AvgGlucoseLevel, "200.5")
        .with(Field::BloodPressureLevel, "141");
    assert_eq!(engine.score(&complete_record(&blueprint, &beyond)).raw_score, 5);
}

#[test]
fn frequent_drinking_adds_a_point_and_advice() {
    let blueprint = AssessmentBlueprint::stroke();
    let answers = low_risk_stroke_answers().with(Field::AlcoholIntake, "frequent drinker");

    let result = stroke_engine().score(&complete_record(&blueprint, &answers));

    assert_eq!(result.raw_score, 1);
    assert_eq!(
        result.recommendations.last().map(String::as_str),
        Some("Reduce alcohol consumption")
    );
}

#[test]
fn scoring_is_deterministic() {
    let blueprint = AssessmentBlueprint::stroke();
    let record = complete_record(&blueprint, &high_risk_stroke_answers());
    let engine = stroke_engine();

    assert_eq!(engine.score(&record), engine.score(&record));
    assert_eq!(engine.score(&record), stroke_engine().score(&record));
}

#[test]
fn adding_a_risk_factor_never_lowers_the_score() {
    let blueprint = AssessmentBlueprint::stroke();
    let engine = stroke_engine();
    let mut answers = low_risk_stroke_answers();
    let mut previous = engine.score(&complete_record(&blueprint, &answers));

    for (field, value) in [
        (Field::Hypertension, "yes"),
        (Field::PhysicalActivity, "low"),
        (Field::Age, "50"),
        (Field::SmokingStatus, "currently"),
        (Field::BloodPressureLevel, "160"),
        (Field::Age, "80"),
        (Field::StrokeHistory, "yes"),
    ] {
        answers.set(field, value);
        let next = engine.score(&complete_record(&blueprint, &answers));
        assert!(next.raw_score > previous.raw_score, "{field} did not raise the score");
        assert!(next.risk_level >= previous.risk_level);
        previous = next;
    }
}

#[test]
fn tier_boundaries_fall_to_the_lower_tier() {
    let blueprint = AssessmentBlueprint::stroke();
    let engine = ScoringEngine::new(toggle_policy()).expect("toggle policy valid");
    assert_eq!(engine.policy().max_score(), 10);

    let cases = [
        (low_risk_stroke_answers(), 0, RiskLevel::Low),
        (
            low_risk_stroke_answers().with(Field::Hypertension, true),
            3,
            RiskLevel::Low,
        ),
        (
            low_risk_stroke_answers().with(Field::StrokeHistory, true),
            4,
            RiskLevel::Moderate,
        ),
        (
            low_risk_stroke_answers()
                .with(Field::Hypertension, true)
                .with(Field::HeartDisease, true),
            6,
            RiskLevel::Moderate,
        ),
        (
            low_risk_stroke_answers()
                .with(Field::Hypertension, true)
                .with(Field::StrokeHistory, true),
            7,
            RiskLevel::High,
        ),
    ];

    for (answers, raw, level) in cases {
        let result = engine.score(&complete_record(&blueprint, &answers));
        assert_eq!(result.raw_score, raw);
        assert_eq!(result.risk_level, level, "raw score {raw}");
    }
}

#[test]
fn default_thresholds_classify_strictly() {
    let thresholds = RiskThresholds::default();

    assert_eq!(thresholds.classify(0.0), RiskLevel::Low);
    assert_eq!(thresholds.classify(0.3), RiskLevel::Low);
    assert_eq!(thresholds.classify(0.31), RiskLevel::Moderate);
    assert_eq!(thresholds.classify(0.6), RiskLevel::Moderate);
    assert_eq!(thresholds.classify(0.61), RiskLevel::High);
    assert_eq!(thresholds.classify(1.0), RiskLevel::High);
}

#[test]
fn preset_scales_have_fixed_maxima() {
    assert_eq!(ScoringPolicy::stroke().max_score(), 19);
    assert_eq!(ScoringPolicy::cardio().max_score(), 21);
}

#[test]
fn cardio_profile_scores_from_the_checklist() {
    let blueprint = AssessmentBlueprint::cardio();
    let record = complete_record(&blueprint, &cardio_answers());

    let result = cardio_engine().score(&record);

    assert_eq!(result.raw_score, 9);
    assert_eq!(result.max_score, 21);
    assert_eq!(result.risk_level, RiskLevel::Moderate);
    assert_eq!(result.recommendations.len(), 8);
    assert_eq!(&result.recommendations[..4], BASELINE);
    assert!(result
        .recommendations
        .iter()
        .any(|text| text == "Keep blood sugar within the range agreed with your care team"));
    assert!(!result
        .recommendations
        .iter()
        .any(|text| text == "Consider smoking cessation programs"));
}

#[test]
fn blank_recommendations_are_dropped() {
    let blueprint = AssessmentBlueprint::stroke();
    let mut policy = toggle_policy();
    policy.recommendations = vec![
        Recommendation::always("  "),
        Recommendation::always(" Walk daily "),
        Recommendation::when("Ask about statins", RiskPredicate::Flag(Field::HeartDisease)),
    ];
    let engine = ScoringEngine::new(policy).expect("policy valid");

    let result = engine.score(&complete_record(&blueprint, &low_risk_stroke_answers()));

    assert_eq!(result.recommendations, ["Walk daily"]);
}

#[test]
fn custom_policy_loads_from_json_with_default_thresholds() {
    let raw = r#"{
        "name": "clinic",
        "rules": [
            {
                "kind": "banded",
                "label": "Age",
                "field": "age",
                "bands": [{ "above": 60.0, "weight": 3 }, { "above": 40.0, "weight": 1 }]
            },
            {
                "kind": "weighted",
                "label": "Smoker",
                "weight": 2,
                "when": { "equals": { "field": "smokingStatus", "value": { "smoking": "current" } } }
            },
            {
                "kind": "weighted",
                "label": "Obese",
                "weight": 1,
                "when": { "above": { "field": "bmi", "threshold": 30.0 } }
            }
        ],
        "recommendations": [
            { "text": "Stay active" },
            { "text": "Quit smoking", "when": { "equals": { "field": "smokingStatus", "value": { "smoking": "current" } } } }
        ]
    }"#;

    let policy = ScoringPolicy::from_json(raw).expect("policy parses");
    assert_eq!(policy.max_score(), 6);
    assert_eq!(policy.thresholds, RiskThresholds::default());
    assert_eq!(
        policy.rules[0],
        ScoreRule::Banded {
            label: "Age".to_string(),
            field: Field::Age,
            bands: vec![
                ScoreBand {
                    above: 60.0,
                    weight: 3,
                },
                ScoreBand {
                    above: 40.0,
                    weight: 1,
                },
            ],
        }
    );

    let blueprint = AssessmentBlueprint::stroke();
    let record = complete_record(&blueprint, &high_risk_stroke_answers());
    let result = ScoringEngine::new(policy).expect("engine").score(&record);

    assert_eq!(result.raw_score, 6);
    assert_eq!(result.risk_level, RiskLevel::High);
    assert_eq!(result.recommendations, ["Stay active", "Quit smoking"]);
}

#[test]
fn presets_survive_a_json_round_trip() {
    for policy in [ScoringPolicy::stroke(), ScoringPolicy::cardio()] {
        let json = serde_json::to_string(&policy).expect("serializes");
        let parsed = ScoringPolicy::from_json(&json).expect("parses back");
        assert_eq!(parsed, policy);
    }
}

#[test]
fn policy_files_load_from_disk() {
    let dir = tempfile::tempdir().expect("tmpdir");
    let path = dir.path().join("policy.json");
    let json = serde_json::to_string(&toggle_policy()).expect("serializes");
    std::fs::write(&path, json).expect("write policy");

    let policy = ScoringPolicy::from_path(&path).expect("policy loads");
    assert_eq!(policy.name, "toggles");

    match ScoringPolicy::from_path(dir.path().join("missing.json")) {
        Err(PolicyError::Io(_)) => {}
        other => panic!("expected io error, got {other:?}"),
    }
}

#[test]
fn policies_without_attainable_score_are_rejected() {
    let policy = ScoringPolicy {
        name: "empty".to_string(),
        rules: vec![ScoreRule::weighted(
            "Nothing",
            0,
            RiskPredicate::Flag(Field::Hypertension),
        )],
        thresholds: RiskThresholds::default(),
        recommendations: Vec::new(),
    };

    match ScoringEngine::new(policy) {
        Err(PolicyError::EmptyScale(name)) => assert_eq!(name, "empty"),
        other => panic!("expected empty scale error, got {other:?}"),
    }
}

#[test]
fn policies_whose_weights_overflow_the_scale_are_rejected() {
    let raw = r#"{
        "name": "huge",
        "rules": [
            { "kind": "weighted", "label": "Hypertension", "weight": 65535,
              "when": { "flag": "hypertension" } },
            { "kind": "weighted", "label": "Heart disease", "weight": 1,
              "when": { "flag": "heartDisease" } }
        ]
    }"#;

    match ScoringPolicy::from_json(raw) {
        Err(PolicyError::ScaleOverflow(name)) => assert_eq!(name, "huge"),
        other => panic!("expected scale overflow error, got {other:?}"),
    }

    let policy: ScoringPolicy = serde_json::from_str(raw).expect("well-formed json");
    assert_eq!(policy.max_score(), u16::MAX);
    assert!(ScoringEngine::new(policy).is_err());
}

#[test]
fn inverted_thresholds_are_rejected() {
    let mut policy = toggle_policy();
    policy.thresholds = RiskThresholds {
        moderate: 0.7,
        high: 0.5,
    };

    match policy.validate() {
        Err(PolicyError::InvalidThresholds { moderate, high, .. }) => {
            assert_eq!(moderate, 0.7);
            assert_eq!(high, 0.5);
        }
        other => panic!("expected invalid thresholds error, got {other:?}"),
    }

    match ScoringPolicy::from_json("{\"name\": \"broken\", \"rules\": [") {
        Err(PolicyError::Parse(_)) => {}
        other => panic!("expected parse error, got {other:?}"),
    }
}
