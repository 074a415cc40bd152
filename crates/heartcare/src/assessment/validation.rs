use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::blueprint::{FieldRule, FieldSpec, StepDefinition};
use super::domain::{Field, FieldValue, MedicalCondition, PatientRecord};

/// Raw value exactly as a form control submits it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawInput {
    Flag(bool),
    Number(f64),
    Text(String),
    Selections(Vec<String>),
}

impl From<&str> for RawInput {
    fn from(value: &str) -> Self {
        RawInput::Text(value.to_string())
    }
}

impl From<String> for RawInput {
    fn from(value: String) -> Self {
        RawInput::Text(value)
    }
}

impl From<bool> for RawInput {
    fn from(value: bool) -> Self {
        RawInput::Flag(value)
    }
}

/// Locally entered values for the step being filled.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StepInput {
    values: BTreeMap<Field, RawInput>,
}

impl StepInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, field: Field, value: impl Into<RawInput>) -> Self {
        self.set(field, value);
        self
    }

    pub fn with_selections<I, S>(mut self, field: Field, selections: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.set(
            field,
            RawInput::Selections(selections.into_iter().map(Into::into).collect()),
        );
        self
    }

    pub fn set(&mut self, field: Field, value: impl Into<RawInput>) {
        self.values.insert(field, value.into());
    }

    pub fn get(&self, field: Field) -> Option<&RawInput> {
        self.values.get(&field)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Restrict a full answer sheet to the fields one step asks for.
    pub fn for_step(&self, step: &StepDefinition) -> StepInput {
        let values = step
            .fields
            .iter()
            .filter_map(|spec| {
                self.values
                    .get(&spec.field)
                    .map(|value| (spec.field, value.clone()))
            })
            .collect();
        StepInput { values }
    }

    /// Raw form of already collected answers, used to pre-fill a revisited step.
    pub fn prefill(step: &StepDefinition, record: &PatientRecord) -> StepInput {
        let values = step
            .fields
            .iter()
            .filter_map(|spec| {
                let value = record.get(spec.field)?;
                let raw = match value {
                    FieldValue::Flag(flag) => RawInput::Flag(*flag),
                    FieldValue::Integer(number) => RawInput::Text(number.to_string()),
                    FieldValue::Decimal(number) => RawInput::Text(number.to_string()),
                    FieldValue::Conditions(conditions) => RawInput::Selections(
                        conditions.iter().map(|c| c.token().to_string()).collect(),
                    ),
                    other => RawInput::Text(spec_token(spec, other)?.to_string()),
                };
                Some((spec.field, raw))
            })
            .collect();
        StepInput { values }
    }
}

/// Token as the step offers it, which may differ from the canonical spelling.
fn spec_token(spec: &FieldSpec, value: &FieldValue) -> Option<&'static str> {
    if let FieldRule::Choice(options) = spec.rule {
        if let Some(option) = options
            .iter()
            .find(|option| FieldValue::choice(spec.field, option).ok().as_ref() == Some(value))
        {
            return Some(*option);
        }
    }
    value.token()
}

impl FromIterator<(Field, RawInput)> for StepInput {
    fn from_iter<T: IntoIterator<Item = (Field, RawInput)>>(iter: T) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

/// Why a single field blocked the step.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FieldError {
    #[error("{label} is required")]
    Required { label: &'static str },
    #[error("{label} must be between {min} and {max}")]
    OutOfRange {
        label: &'static str,
        min: f64,
        max: f64,
    },
    #[error("{label} must be a number")]
    NotANumber { label: &'static str },
    #[error("{label} must be a whole number")]
    NotAWholeNumber { label: &'static str },
    #[error("'{value}' is not a valid option for {label}")]
    UnknownOption { label: &'static str, value: String },
}

/// Field-level errors for the step currently being filled.
#[derive(Debug, Clone, Default, PartialEq, thiserror::Error)]
#[error("{} answer(s) need attention", .errors.len())]
pub struct StepErrors {
    errors: BTreeMap<Field, FieldError>,
}

impl StepErrors {
    pub fn get(&self, field: Field) -> Option<&FieldError> {
        self.errors.get(&field)
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &FieldError)> {
        self.errors.iter().map(|(field, error)| (*field, error))
    }

    /// Field key to display message, ready to render next to each control.
    pub fn messages(&self) -> BTreeMap<&'static str, String> {
        self.errors
            .iter()
            .map(|(field, error)| (field.key(), error.to_string()))
            .collect()
    }
}

/// Validate a step's input, yielding the typed fragment to merge or every failing field.
pub fn validate_step(step: &StepDefinition, input: &StepInput) -> Result<PatientRecord, StepErrors> {
    let mut fragment = PatientRecord::new();
    let mut errors = BTreeMap::new();

    for spec in &step.fields {
        match validate_field(spec, input.get(spec.field)) {
            Ok(Some(value)) => fragment.insert(spec.field, value),
            Ok(None) => {}
            Err(error) => {
                errors.insert(spec.field, error);
            }
        }
    }

    if errors.is_empty() {
        Ok(fragment)
    } else {
        debug!(step = step.id, failures = errors.len(), "step validation failed");
        Err(StepErrors { errors })
    }
}

fn validate_field(spec: &FieldSpec, raw: Option<&RawInput>) -> Result<Option<FieldValue>, FieldError> {
    let label = spec.field.label();

    match &spec.rule {
        FieldRule::Flag => match raw {
            None => Ok(Some(FieldValue::Flag(false))),
            Some(RawInput::Flag(value)) => Ok(Some(FieldValue::Flag(*value))),
            Some(RawInput::Text(text)) => match text.trim().to_ascii_lowercase().as_str() {
                "" | "false" | "no" | "n" => Ok(Some(FieldValue::Flag(false))),
                "true" | "yes" | "y" => Ok(Some(FieldValue::Flag(true))),
                other => Err(FieldError::UnknownOption {
                    label,
                    value: other.to_string(),
                }),
            },
            Some(other) => Err(unexpected(label, other)),
        },
        FieldRule::Conditions => {
            let selections: Vec<&str> = match raw {
                None => Vec::new(),
                Some(RawInput::Selections(items)) => items.iter().map(String::as_str).collect(),
                // `none` clears the checklist.
                Some(RawInput::Text(text)) if text.trim().eq_ignore_ascii_case("none") => {
                    Vec::new()
                }
                Some(RawInput::Text(text)) => text
                    .split(',')
                    .map(str::trim)
                    .filter(|item| !item.is_empty())
                    .collect(),
                Some(other) => return Err(unexpected(label, other)),
            };

            let mut conditions = BTreeSet::new();
            for selection in selections {
                let condition = MedicalCondition::from_token(selection).map_err(|_| {
                    FieldError::UnknownOption {
                        label,
                        value: selection.to_string(),
                    }
                })?;
                conditions.insert(condition);
            }
            Ok(Some(FieldValue::Conditions(conditions)))
        }
        FieldRule::Integer { min, max } => {
            let Some(number) = numeric(spec, raw)? else {
                return Ok(None);
            };
            if number.fract() != 0.0 {
                return Err(FieldError::NotAWholeNumber { label });
            }
            if number < *min as f64 || number > *max as f64 {
                return Err(FieldError::OutOfRange {
                    label,
                    min: *min as f64,
                    max: *max as f64,
                });
            }
            Ok(Some(FieldValue::Integer(number as i64)))
        }
        FieldRule::Decimal { min, max } => {
            let Some(number) = numeric(spec, raw)? else {
                return Ok(None);
            };
            if number < *min || number > *max {
                return Err(FieldError::OutOfRange {
                    label,
                    min: *min,
                    max: *max,
                });
            }
            Ok(Some(FieldValue::Decimal(number)))
        }
        FieldRule::Choice(options) => {
            let token = match raw {
                None => None,
                Some(RawInput::Text(text)) if text.trim().is_empty() => None,
                Some(RawInput::Text(text)) => Some(text.trim()),
                Some(other) => return Err(unexpected(label, other)),
            };
            let Some(token) = token else {
                return missing(spec);
            };
            if !options.iter().any(|option| *option == token) {
                return Err(FieldError::UnknownOption {
                    label,
                    value: token.to_string(),
                });
            }
            FieldValue::choice(spec.field, token)
                .map(Some)
                .map_err(|_| FieldError::UnknownOption {
                    label,
                    value: token.to_string(),
                })
        }
    }
}

/// Parsed number, `None` for an omitted optional field.
fn numeric(spec: &FieldSpec, raw: Option<&RawInput>) -> Result<Option<f64>, FieldError> {
    let label = spec.field.label();
    let number = match raw {
        None => return missing(spec),
        Some(RawInput::Text(text)) if text.trim().is_empty() => return missing(spec),
        Some(RawInput::Text(text)) => text
            .trim()
            .parse::<f64>()
            .map_err(|_| FieldError::NotANumber { label })?,
        Some(RawInput::Number(number)) => *number,
        Some(other) => return Err(unexpected(label, other)),
    };

    if !number.is_finite() {
        return Err(FieldError::NotANumber { label });
    }
    Ok(Some(number))
}

fn missing<T>(spec: &FieldSpec) -> Result<Option<T>, FieldError> {
    if spec.required {
        Err(FieldError::Required {
            label: spec.field.label(),
        })
    } else {
        Ok(None)
    }
}

fn unexpected(label: &'static str, raw: &RawInput) -> FieldError {
    let value = match raw {
        RawInput::Flag(flag) => flag.to_string(),
        RawInput::Number(number) => number.to_string(),
        RawInput::Text(text) => text.clone(),
        RawInput::Selections(items) => items.join(", "),
    };
    FieldError::UnknownOption { label, value }
}
