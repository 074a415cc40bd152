use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Every question the assessment can ask, across both presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    Age,
    Gender,
    MaritalStatus,
    WorkType,
    ResidenceType,
    #[serde(rename = "systolicBP")]
    SystolicBp,
    #[serde(rename = "diastolicBP")]
    DiastolicBp,
    BloodPressureLevel,
    Bmi,
    AvgGlucoseLevel,
    SmokingStatus,
    AlcoholIntake,
    PhysicalActivity,
    DietaryHabits,
    MedicalConditions,
    Hypertension,
    HeartDisease,
    StrokeHistory,
    FamilyHistory,
}

impl Field {
    pub const ALL: [Field; 19] = [
        Field::Age,
        Field::Gender,
        Field::MaritalStatus,
        Field::WorkType,
        Field::ResidenceType,
        Field::SystolicBp,
        Field::DiastolicBp,
        Field::BloodPressureLevel,
        Field::Bmi,
        Field::AvgGlucoseLevel,
        Field::SmokingStatus,
        Field::AlcoholIntake,
        Field::PhysicalActivity,
        Field::DietaryHabits,
        Field::MedicalConditions,
        Field::Hypertension,
        Field::HeartDisease,
        Field::StrokeHistory,
        Field::FamilyHistory,
    ];

    /// Wire name used in answer files and error maps.
    pub const fn key(self) -> &'static str {
        match self {
            Field::Age => "age",
            Field::Gender => "gender",
            Field::MaritalStatus => "maritalStatus",
            Field::WorkType => "workType",
            Field::ResidenceType => "residenceType",
            Field::SystolicBp => "systolicBP",
            Field::DiastolicBp => "diastolicBP",
            Field::BloodPressureLevel => "bloodPressureLevel",
            Field::Bmi => "bmi",
            Field::AvgGlucoseLevel => "avgGlucoseLevel",
            Field::SmokingStatus => "smokingStatus",
            Field::AlcoholIntake => "alcoholIntake",
            Field::PhysicalActivity => "physicalActivity",
            Field::DietaryHabits => "dietaryHabits",
            Field::MedicalConditions => "medicalConditions",
            Field::Hypertension => "hypertension",
            Field::HeartDisease => "heartDisease",
            Field::StrokeHistory => "strokeHistory",
            Field::FamilyHistory => "familyHistory",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Field::Age => "Age",
            Field::Gender => "Gender",
            Field::MaritalStatus => "Marital status",
            Field::WorkType => "Work type",
            Field::ResidenceType => "Residence type",
            Field::SystolicBp => "Systolic blood pressure",
            Field::DiastolicBp => "Diastolic blood pressure",
            Field::BloodPressureLevel => "Blood pressure level",
            Field::Bmi => "BMI",
            Field::AvgGlucoseLevel => "Average glucose level",
            Field::SmokingStatus => "Smoking status",
            Field::AlcoholIntake => "Alcohol intake",
            Field::PhysicalActivity => "Physical activity level",
            Field::DietaryHabits => "Dietary habits",
            Field::MedicalConditions => "Medical conditions",
            Field::Hypertension => "Hypertension",
            Field::HeartDisease => "Heart disease",
            Field::StrokeHistory => "Previous stroke",
            Field::FamilyHistory => "Family history of heart disease",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Field {
    type Err = UnknownToken;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        Field::ALL
            .into_iter()
            .find(|field| field.key() == trimmed)
            .ok_or_else(|| UnknownToken(trimmed.to_string()))
    }
}

/// Raised when an option token does not belong to a closed vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown option '{0}'")]
pub struct UnknownToken(pub String);

/// Closed option set parsed from the exact token a form submits.
macro_rules! option_enum {
    (
        $(#[$meta:meta])*
        $name:ident { $($variant:ident => [$($token:literal),+]),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            /// Every token accepted for the variant, canonical token first.
            pub const fn tokens(self) -> &'static [&'static str] {
                match self {
                    $($name::$variant => &[$($token),+]),+
                }
            }

            pub const fn token(self) -> &'static str {
                self.tokens()[0]
            }

            pub fn from_token(raw: &str) -> Result<Self, UnknownToken> {
                $(
                    if [$($token),+].iter().any(|token| *token == raw) {
                        return Ok($name::$variant);
                    }
                )+
                Err(UnknownToken(raw.to_string()))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.token())
            }
        }
    };
}

option_enum! {
    Gender { Male => ["male"], Female => ["female"], Other => ["other"] }
}

option_enum! {
    MaritalStatus { Married => ["married"], Single => ["single"], Divorced => ["divorced"] }
}

option_enum! {
    WorkType {
        Private => ["private"],
        SelfEmployed => ["self-employed"],
        Government => ["Govt_job"],
    }
}

option_enum! {
    ResidenceType { Urban => ["urban"], Rural => ["rural"] }
}

option_enum! {
    /// The cardio form and the stroke questionnaire word these differently.
    SmokingStatus {
        Never => ["never", "non-smoker"],
        Former => ["former", "formerly smoker"],
        Current => ["current", "currently"],
    }
}

option_enum! {
    AlcoholIntake {
        Never => ["never"],
        Rarely => ["rarely"],
        Social => ["social drinking"],
        Frequent => ["frequent drinker"],
    }
}

option_enum! {
    ActivityLevel {
        Sedentary => ["sedentary"],
        Low => ["low"],
        Light => ["light"],
        Moderate => ["moderate"],
        Active => ["active"],
        High => ["high"],
    }
}

option_enum! {
    DietaryHabit {
        Vegan => ["vegan"],
        Paleo => ["paleo"],
        Pescatarian => ["pescatarian"],
        GlutenFree => ["gluten-free"],
        NonVegetarian => ["non-vegetarian"],
    }
}

option_enum! {
    MedicalCondition {
        Hypertension => ["Hypertension"],
        Diabetes => ["Diabetes"],
        HighCholesterol => ["High Cholesterol"],
        HeartDisease => ["Heart Disease"],
        Obesity => ["Obesity"],
        PreviousStroke => ["Previous Stroke"],
    }
}

impl MedicalCondition {
    pub const ALL: [MedicalCondition; 6] = [
        MedicalCondition::Hypertension,
        MedicalCondition::Diabetes,
        MedicalCondition::HighCholesterol,
        MedicalCondition::HeartDisease,
        MedicalCondition::Obesity,
        MedicalCondition::PreviousStroke,
    ];
}

/// Typed answer stored in the record once a step has validated it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldValue {
    Integer(i64),
    Decimal(f64),
    Flag(bool),
    Gender(Gender),
    MaritalStatus(MaritalStatus),
    WorkType(WorkType),
    ResidenceType(ResidenceType),
    Smoking(SmokingStatus),
    Alcohol(AlcoholIntake),
    Activity(ActivityLevel),
    Diet(DietaryHabit),
    Conditions(BTreeSet<MedicalCondition>),
}

impl FieldValue {
    /// Builds the typed value for a choice field from its submitted token.
    pub fn choice(field: Field, token: &str) -> Result<Self, UnknownToken> {
        let value = match field {
            Field::Gender => FieldValue::Gender(Gender::from_token(token)?),
            Field::MaritalStatus => FieldValue::MaritalStatus(MaritalStatus::from_token(token)?),
            Field::WorkType => FieldValue::WorkType(WorkType::from_token(token)?),
            Field::ResidenceType => FieldValue::ResidenceType(ResidenceType::from_token(token)?),
            Field::SmokingStatus => FieldValue::Smoking(SmokingStatus::from_token(token)?),
            Field::AlcoholIntake => FieldValue::Alcohol(AlcoholIntake::from_token(token)?),
            Field::PhysicalActivity => FieldValue::Activity(ActivityLevel::from_token(token)?),
            Field::DietaryHabits => FieldValue::Diet(DietaryHabit::from_token(token)?),
            Field::Age
            | Field::SystolicBp
            | Field::DiastolicBp
            | Field::BloodPressureLevel
            | Field::Bmi
            | Field::AvgGlucoseLevel
            | Field::MedicalConditions
            | Field::Hypertension
            | Field::HeartDisease
            | Field::StrokeHistory
            | Field::FamilyHistory => return Err(UnknownToken(token.to_string())),
        };
        Ok(value)
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Integer(value) => Some(*value as f64),
            FieldValue::Decimal(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_flag(&self) -> Option<bool> {
        match self {
            FieldValue::Flag(value) => Some(*value),
            _ => None,
        }
    }

    /// Canonical token for choice values.
    pub fn token(&self) -> Option<&'static str> {
        match self {
            FieldValue::Gender(value) => Some(value.token()),
            FieldValue::MaritalStatus(value) => Some(value.token()),
            FieldValue::WorkType(value) => Some(value.token()),
            FieldValue::ResidenceType(value) => Some(value.token()),
            FieldValue::Smoking(value) => Some(value.token()),
            FieldValue::Alcohol(value) => Some(value.token()),
            FieldValue::Activity(value) => Some(value.token()),
            FieldValue::Diet(value) => Some(value.token()),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Integer(value) => write!(f, "{value}"),
            FieldValue::Decimal(value) => write!(f, "{value}"),
            FieldValue::Flag(value) => f.write_str(if *value { "yes" } else { "no" }),
            FieldValue::Conditions(conditions) => {
                if conditions.is_empty() {
                    return f.write_str("none");
                }
                let tokens: Vec<&str> = conditions.iter().map(|c| c.token()).collect();
                f.write_str(&tokens.join(", "))
            }
            other => f.write_str(other.token().unwrap_or_default()),
        }
    }
}

/// Answers accumulated across wizard steps. Merging only ever adds or overwrites keys.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PatientRecord {
    values: BTreeMap<Field, FieldValue>,
}

impl PatientRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field: Field) -> Option<&FieldValue> {
        self.values.get(&field)
    }

    pub fn contains(&self, field: Field) -> bool {
        self.values.contains_key(&field)
    }

    pub fn insert(&mut self, field: Field, value: FieldValue) {
        self.values.insert(field, value);
    }

    pub fn merge(&mut self, fragment: PatientRecord) {
        self.values.extend(fragment.values);
    }

    pub fn number(&self, field: Field) -> Option<f64> {
        self.get(field).and_then(FieldValue::as_number)
    }

    /// Unset toggles read as `false`.
    pub fn flag(&self, field: Field) -> bool {
        self.get(field)
            .and_then(FieldValue::as_flag)
            .unwrap_or(false)
    }

    pub fn has_condition(&self, condition: MedicalCondition) -> bool {
        matches!(
            self.get(Field::MedicalConditions),
            Some(FieldValue::Conditions(conditions)) if conditions.contains(&condition)
        )
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &FieldValue)> {
        self.values.iter().map(|(field, value)| (*field, value))
    }
}

impl FromIterator<(Field, FieldValue)> for PatientRecord {
    fn from_iter<T: IntoIterator<Item = (Field, FieldValue)>>(iter: T) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

/// A record whose every required field has passed validation. Only
/// `AssessmentBlueprint::finalize` produces one, so partial records cannot be scored.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct CompletePatientRecord(PatientRecord);

impl CompletePatientRecord {
    pub(crate) fn new(record: PatientRecord) -> Self {
        Self(record)
    }

    pub fn record(&self) -> &PatientRecord {
        &self.0
    }

    pub fn into_inner(self) -> PatientRecord {
        self.0
    }
}

impl std::ops::Deref for CompletePatientRecord {
    type Target = PatientRecord;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Discrete risk tier derived from the normalized score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
}

impl RiskLevel {
    pub const fn label(self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Moderate => "Moderate",
            RiskLevel::High => "High",
        }
    }

    /// Colour the result view paints the tier with.
    pub const fn color(self) -> &'static str {
        match self {
            RiskLevel::Low => "green",
            RiskLevel::Moderate => "yellow",
            RiskLevel::High => "red",
        }
    }
}
