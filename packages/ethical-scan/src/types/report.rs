//! The pipeline's sole output.

use serde::{Deserialize, Serialize};

use super::{barcode::Barcode, finding::EthicalFinding, product::ProductRecord};
use crate::traits::provider::ProviderId;

/// How a consulted provider responded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallOutcome {
    /// Returned a usable record
    Found,
    /// Reached, but had no record for the query
    NotFound,
    /// Transport error, malformed response, or timeout
    Failed,
}

/// One provider consultation, in the order it happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrailEntry {
    pub provider: ProviderId,
    pub outcome: CallOutcome,
}

impl TrailEntry {
    pub fn new(provider: ProviderId, outcome: CallOutcome) -> Self {
        Self { provider, outcome }
    }
}

/// Result of resolving one barcode. Immutable once built.
///
/// Always carries the barcode, even when every lookup failed. Callers detect
/// degraded results by inspecting [`product`](Self::product) and
/// [`ethical`](Self::ethical) rather than by catching errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionReport {
    barcode: Barcode,
    product: Option<ProductRecord>,
    /// Company name from the retailer directory, when it was consulted and
    /// knew the barcode.
    #[serde(default)]
    manufacturer: Option<String>,
    ethical: Vec<EthicalFinding>,
    source_trail: Vec<TrailEntry>,
}

impl ResolutionReport {
    pub(crate) fn new(
        barcode: Barcode,
        product: Option<ProductRecord>,
        ethical: Vec<EthicalFinding>,
        source_trail: Vec<TrailEntry>,
    ) -> Self {
        Self {
            barcode,
            product,
            manufacturer: None,
            ethical,
            source_trail,
        }
    }

    pub(crate) fn with_manufacturer(mut self, manufacturer: Option<String>) -> Self {
        self.manufacturer = manufacturer;
        self
    }

    pub fn barcode(&self) -> &Barcode {
        &self.barcode
    }

    pub fn product(&self) -> Option<&ProductRecord> {
        self.product.as_ref()
    }

    pub fn manufacturer(&self) -> Option<&str> {
        self.manufacturer.as_deref()
    }

    pub fn ethical(&self) -> &[EthicalFinding] {
        &self.ethical
    }

    pub fn source_trail(&self) -> &[TrailEntry] {
        &self.source_trail
    }

    /// Provider identities in consultation order.
    pub fn providers(&self) -> Vec<ProviderId> {
        self.source_trail.iter().map(|entry| entry.provider).collect()
    }

    /// How many times `provider` was consulted.
    pub fn calls_to(&self, provider: ProviderId) -> usize {
        self.source_trail
            .iter()
            .filter(|entry| entry.provider == provider)
            .count()
    }

    pub fn consulted(&self, provider: ProviderId) -> bool {
        self.calls_to(provider) > 0
    }

    /// Outcome of the first consultation of `provider`, if any.
    pub fn outcome_of(&self, provider: ProviderId) -> Option<CallOutcome> {
        self.source_trail
            .iter()
            .find(|entry| entry.provider == provider)
            .map(|entry| entry.outcome)
    }

    /// The primary finding, if any source produced one.
    pub fn primary_finding(&self) -> Option<&EthicalFinding> {
        self.ethical.first()
    }

    /// True when the product or the ethical assessment is missing.
    pub fn is_degraded(&self) -> bool {
        self.product.is_none() || self.ethical.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::finding::labels;

    fn barcode() -> Barcode {
        Barcode::parse("0000000000000").unwrap()
    }

    #[test]
    fn test_trail_queries() {
        let report = ResolutionReport::new(
            barcode(),
            None,
            vec![],
            vec![
                TrailEntry::new(ProviderId::ProductCatalog, CallOutcome::NotFound),
                TrailEntry::new(ProviderId::RetailerDirectory, CallOutcome::Failed),
            ],
        );

        assert_eq!(
            report.providers(),
            vec![ProviderId::ProductCatalog, ProviderId::RetailerDirectory]
        );
        assert_eq!(report.calls_to(ProviderId::ProductCatalog), 1);
        assert!(!report.consulted(ProviderId::WebSearch));
        assert_eq!(
            report.outcome_of(ProviderId::RetailerDirectory),
            Some(CallOutcome::Failed)
        );
        assert!(report.is_degraded());
    }

    #[test]
    fn test_complete_report_is_not_degraded() {
        let report = ResolutionReport::new(
            barcode(),
            Some(ProductRecord::new().with_name("Tee")),
            vec![EthicalFinding::new(ProviderId::BrandRatings).with_entry(labels::RATING, "Good")],
            vec![TrailEntry::new(ProviderId::ProductCatalog, CallOutcome::Found)],
        );

        assert!(!report.is_degraded());
        assert_eq!(
            report.primary_finding().and_then(|f| f.get(labels::RATING)),
            Some("Good")
        );
    }

    #[test]
    fn test_manufacturer_serializes_and_defaults() {
        let report = ResolutionReport::new(barcode(), None, vec![], vec![])
            .with_manufacturer(Some("Acme Ltd".to_string()));
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["manufacturer"], "Acme Ltd");

        let without: ResolutionReport = serde_json::from_str(
            r#"{"barcode": "0000000000000", "product": null, "ethical": [], "source_trail": []}"#,
        )
        .unwrap();
        assert_eq!(without.manufacturer(), None);
    }
}
