//! Field-level validation for [`RecurrenceRule`].
//!
//! Violations are collected, not fail-fast, so an edit form can show
//! every problem at once. Each violation carries the serialized field
//! path, a message template, and the template's parameters; rendering
//! and localization belong to the caller.

use serde::Serialize;
use serde_json::{Map, Value, json};

use crate::expand::{interval_multiple_of_for, max_interval_for, required_fields_for};
use crate::model::rule::{RecurrenceRule, RecurrenceType, RuleField, Weekday};

/// One field-scoped validation problem.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldViolation {
    /// Serialized field path, e.g. `dayOfWeek`.
    pub field: &'static str,
    /// Message template with `{{ parameter }}` placeholders.
    pub template: &'static str,
    /// Values for the template's placeholders.
    pub parameters: Map<String, Value>,
}

impl FieldViolation {
    fn new(field: RuleField, template: &'static str) -> Self {
        Self {
            field: field.path(),
            template,
            parameters: Map::new(),
        }
    }

    fn with_parameter(mut self, name: &str, value: Value) -> Self {
        self.parameters.insert(name.to_string(), value);
        self
    }

    fn blank(field: RuleField) -> Self {
        Self::new(field, "This value should not be blank.")
    }
}

fn allowed_types() -> Value {
    json!(
        RecurrenceType::ALL
            .iter()
            .map(|t| t.as_str())
            .collect::<Vec<_>>()
    )
}

fn allowed_weekdays() -> Value {
    json!(
        Weekday::all()
            .iter()
            .map(|d| d.as_str())
            .collect::<Vec<_>>()
    )
}

/// ## Summary
/// Validates a recurrence rule, returning every violation found.
///
/// An unusable `recurrenceType` short-circuits: the remaining checks
/// depend on the type's field table, so nothing else is reported.
#[must_use]
pub fn validate(rule: &RecurrenceRule) -> Vec<FieldViolation> {
    let mut violations = Vec::new();

    if rule.is_blank(RuleField::RecurrenceType) {
        violations.push(FieldViolation::blank(RuleField::RecurrenceType));
        return violations;
    }
    let token = rule.recurrence_type.as_deref().unwrap_or_default().trim();
    let Some(kind) = RecurrenceType::parse(token) else {
        violations.push(
            FieldViolation::new(
                RuleField::RecurrenceType,
                "The value you selected is not a valid choice.",
            )
            .with_parameter("allowed_values", allowed_types()),
        );
        return violations;
    };

    for field in required_fields_for(kind) {
        if *field == RuleField::RecurrenceType {
            continue;
        }
        if rule.is_blank(*field) {
            violations.push(FieldViolation::blank(*field));
        }
    }

    if let Some(interval) = rule.interval {
        if interval < 1 {
            violations.push(
                FieldViolation::new(
                    RuleField::Interval,
                    "This value should be {{ limit }} or more.",
                )
                .with_parameter("limit", json!(1)),
            );
        } else {
            let max = max_interval_for(kind);
            if interval > max {
                violations.push(
                    FieldViolation::new(
                        RuleField::Interval,
                        "This value should be {{ limit }} or less.",
                    )
                    .with_parameter("limit", json!(max)),
                );
            }
            if let Some(multiple) = interval_multiple_of_for(kind)
                && interval % multiple != 0
            {
                violations.push(
                    FieldViolation::new(
                        RuleField::Interval,
                        "This value should be a multiple of {{ multiple_of_value }}.",
                    )
                    .with_parameter("multiple_of_value", json!(multiple)),
                );
            }
        }
    }

    if let (Some(start), Some(end)) = (rule.start_time, rule.end_time)
        && end < start
    {
        violations.push(
            FieldViolation::new(
                RuleField::EndTime,
                "This value should be {{ limit }} or more.",
            )
            .with_parameter("limit", json!(start.to_rfc3339()))
            .with_parameter("value", json!(end.to_rfc3339())),
        );
    }

    let invalid_days: Vec<&str> = rule
        .day_of_week
        .iter()
        .filter(|token| Weekday::parse(token).is_none())
        .map(String::as_str)
        .collect();
    if !invalid_days.is_empty() {
        violations.push(
            FieldViolation::new(
                RuleField::DayOfWeek,
                "One or more of the given values is invalid.",
            )
            .with_parameter("invalid_values", json!(invalid_days))
            .with_parameter("allowed_values", allowed_weekdays()),
        );
    }

    violations
}
