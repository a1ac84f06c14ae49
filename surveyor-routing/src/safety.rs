//! Safety override: conditions under which only the external assessor may answer.

use std::fmt;

use surveyor_core::models::{PropertyType, RawEvidence, SafetyContext, Urgency};

/// Why a request was forced onto the external route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SafetyTrigger {
    ImmediateUrgency,
    CommercialProperty,
    CriticalHazard,
}

impl SafetyTrigger {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ImmediateUrgency => "immediate_urgency",
            Self::CommercialProperty => "commercial_property",
            Self::CriticalHazard => "critical_hazard",
        }
    }
}

impl fmt::Display for SafetyTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// First matching trigger, checked in order: urgency, property type, hazard.
/// Industrial properties are treated like residential.
pub fn check_safety(context: &SafetyContext, evidence: &RawEvidence) -> Option<SafetyTrigger> {
    if context.urgency == Some(Urgency::Immediate) {
        return Some(SafetyTrigger::ImmediateUrgency);
    }
    if context.property_type == Some(PropertyType::Commercial) {
        return Some(SafetyTrigger::CommercialProperty);
    }
    if context.has_critical_hazards || evidence.flags_critical_hazard() {
        return Some(SafetyTrigger::CriticalHazard);
    }
    None
}

#[cfg(test)]
mod tests {
    use surveyor_core::models::{ExternalAssessorEvidence, Severity};

    use super::*;

    #[test]
    fn no_flags_no_override() {
        assert_eq!(check_safety(&SafetyContext::default(), &RawEvidence::default()), None);
        let industrial = SafetyContext {
            property_type: Some(PropertyType::Industrial),
            urgency: Some(Urgency::Urgent),
            has_critical_hazards: false,
        };
        assert_eq!(check_safety(&industrial, &RawEvidence::default()), None);
    }

    #[test]
    fn hazard_from_assessor_evidence() {
        let evidence = RawEvidence {
            external_assessor: Some(ExternalAssessorEvidence {
                severity: Severity::Full,
                confidence: 60.0,
                damage_type: "corrosion".to_string(),
                has_critical_hazards: true,
            }),
            ..RawEvidence::default()
        };
        assert_eq!(
            check_safety(&SafetyContext::default(), &evidence),
            Some(SafetyTrigger::CriticalHazard)
        );
    }

    #[test]
    fn urgency_checked_first() {
        let ctx = SafetyContext {
            property_type: Some(PropertyType::Commercial),
            urgency: Some(Urgency::Immediate),
            has_critical_hazards: true,
        };
        assert_eq!(
            check_safety(&ctx, &RawEvidence::default()),
            Some(SafetyTrigger::ImmediateUrgency)
        );
    }
}
