//! semaforo-indicators
//!
//! Indicator family rule sets. Pure functions, no storage dependency.
//! Each family turns its current counters plus one event fact into updated
//! counters and a freshly recomputed set of sub-indicator statuses.

pub mod error;
pub mod families;
pub mod rules;
pub mod validation;
pub mod window;

use jiff::civil::Date;
use semaforo_core::models::fact::{EventFact, EventKind};
use semaforo_core::models::family::FamilyKind;
use semaforo_core::models::patient::ReferenceDates;
use semaforo_core::models::record::FamilyRecord;

use error::RuleError;
use rules::{SubIndicator, TimelinessCheck};

/// Trait implemented by each indicator family.
pub trait IndicatorFamily: Send + Sync {
    /// The family this rule set evaluates.
    fn kind(&self) -> FamilyKind;

    /// Human-readable name (e.g., "Childcare", "Woman health").
    fn name(&self) -> &str;

    /// The sub-indicators this family reports.
    fn sub_indicators(&self) -> &[SubIndicator];

    /// Event kinds that move this family's counters.
    fn consumes(&self) -> &[EventKind];

    /// The date this family's time windows are measured from.
    fn anchor(&self, refs: &ReferenceDates) -> Result<Date, RuleError>;

    /// Fold one already-validated fact into the counters and recompute every status.
    fn update(
        &self,
        record: &FamilyRecord,
        fact: &EventFact,
        refs: &ReferenceDates,
    ) -> Result<FamilyRecord, RuleError>;

    /// Deadline checks that are reported but never affect status.
    fn timeliness(
        &self,
        _record: &FamilyRecord,
        _fact: &EventFact,
        _refs: &ReferenceDates,
    ) -> Result<Vec<TimelinessCheck>, RuleError> {
        Ok(Vec::new())
    }

    /// Reject facts this family cannot consume or whose payload is malformed.
    fn validate_fact(&self, fact: &EventFact, refs: &ReferenceDates) -> Result<(), RuleError> {
        let kind = fact.kind();
        if !self.consumes().contains(&kind) {
            return Err(RuleError::UnsupportedFact {
                family: self.kind(),
                kind,
            });
        }
        let anchor = self.anchor(refs)?;
        window::elapsed_days(anchor, fact.occurred_on())?;
        validation::check_payload(&fact.payload, anchor, fact.occurred_on())
    }

    /// Validate, then update. Nothing is returned unless the whole fact applies.
    fn apply(
        &self,
        record: &FamilyRecord,
        fact: &EventFact,
        refs: &ReferenceDates,
    ) -> Result<FamilyRecord, RuleError> {
        self.validate_fact(fact, refs)?;
        self.update(record, fact, refs)
    }
}

/// Return all registered families.
pub fn all_families() -> Vec<Box<dyn IndicatorFamily>> {
    vec![
        Box::new(families::childcare::Childcare),
        Box::new(families::prenatal::Prenatal),
        Box::new(families::diabetes::Diabetes),
        Box::new(families::hypertension::Hypertension),
        Box::new(families::elderly::Elderly),
        Box::new(families::woman_health::WomanHealth),
    ]
}

/// Look up the rule set for a family.
pub fn get_family(kind: FamilyKind) -> Box<dyn IndicatorFamily> {
    match kind {
        FamilyKind::Childcare => Box::new(families::childcare::Childcare),
        FamilyKind::Prenatal => Box::new(families::prenatal::Prenatal),
        FamilyKind::Diabetes => Box::new(families::diabetes::Diabetes),
        FamilyKind::Hypertension => Box::new(families::hypertension::Hypertension),
        FamilyKind::Elderly => Box::new(families::elderly::Elderly),
        FamilyKind::WomanHealth => Box::new(families::woman_health::WomanHealth),
    }
}
