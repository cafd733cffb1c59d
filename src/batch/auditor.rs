//! The batch auditor and its entry points.

use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::calculation::evaluate;
use crate::config::{RateTable, RateTableLoader};
use crate::error::{AuditError, AuditResult};
use crate::extraction::extract;
use crate::models::{AuditRow, BatchResult, DocumentPayload, RowOutcome};

/// Audits payloads against a borrowed rate table.
///
/// # Example
///
/// ```
/// use fiscal_audit::batch::BatchAuditor;
/// use fiscal_audit::config::RateTable;
/// use fiscal_audit::models::DocumentPayload;
///
/// let rates = RateTable::from_json_str(r#"{"PIS": []}"#).unwrap();
/// let auditor = BatchAuditor::new(&rates);
///
/// let result = auditor.audit(&[
///     DocumentPayload::new("<NFe><nNF>1</nNF></NFe>"),
///     DocumentPayload::new("not xml"),
/// ]);
/// assert_eq!(result.total_count, 1);
/// assert_eq!(result.error_count, 1);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct BatchAuditor<'a> {
    rates: &'a RateTable,
}

impl<'a> BatchAuditor<'a> {
    /// Creates an auditor for one rate table.
    pub fn new(rates: &'a RateTable) -> Self {
        Self { rates }
    }

    /// Extracts and evaluates a single payload.
    ///
    /// # Errors
    ///
    /// Returns `UnparseableDocument` when the payload is not well-formed XML.
    pub fn audit_document(&self, payload: &DocumentPayload) -> AuditResult<RowOutcome> {
        let document = extract(&payload.content)?;
        let verdict = evaluate(&document, self.rates);

        debug!(
            source = payload.name.as_deref().unwrap_or("-"),
            document_type = %document.document_type,
            number = document.number.as_deref().unwrap_or("-"),
            status = ?verdict.status,
            exposure = %verdict.exposure,
            "Document audited"
        );

        Ok(RowOutcome::Audited { document, verdict })
    }

    /// Audits every payload in order and aggregates the result.
    pub fn audit(&self, payloads: &[DocumentPayload]) -> BatchResult {
        let mut run = BatchRun::begin();

        for (position, payload) in payloads.iter().enumerate() {
            run.record(position, payload.name.clone(), self.audit_document(payload));
        }

        run.finish()
    }
}

/// Audits payloads against an already loaded rate table.
pub fn audit_batch(payloads: &[DocumentPayload], rates: &RateTable) -> BatchResult {
    BatchAuditor::new(rates).audit(payloads)
}

/// Loads the rate table, then reads and audits each file in order.
///
/// A file that cannot be read becomes a failed row. Bytes that are not valid
/// UTF-8 (e.g. ISO-8859-1 files) are decoded lossily.
///
/// # Errors
///
/// Returns `RateSourceUnavailable` when no rate source loads; no file is read
/// in that case.
pub async fn audit_files(loader: &RateTableLoader, paths: &[PathBuf]) -> AuditResult<BatchResult> {
    let rates = loader.load().await?;
    let auditor = BatchAuditor::new(&rates);
    let mut run = BatchRun::begin();

    for (position, path) in paths.iter().enumerate() {
        let source = path.display().to_string();
        let outcome = read_document(path)
            .await
            .and_then(|content| auditor.audit_document(&DocumentPayload::named(source.clone(), content)));
        run.record(position, Some(source), outcome);
    }

    Ok(run.finish())
}

/// Rows and timing for one batch in progress.
struct BatchRun {
    start_time: Instant,
    result: BatchResult,
}

impl BatchRun {
    fn begin() -> Self {
        Self {
            start_time: Instant::now(),
            result: BatchResult::begin(),
        }
    }

    fn record(&mut self, position: usize, source: Option<String>, outcome: AuditResult<RowOutcome>) {
        let outcome = outcome.unwrap_or_else(|err| {
            warn!(
                position,
                source = source.as_deref().unwrap_or("-"),
                error = %err,
                "Document skipped"
            );
            RowOutcome::Failed {
                error: err.to_string(),
            }
        });

        self.result.record(AuditRow {
            position,
            source,
            outcome,
        });
    }

    fn finish(self) -> BatchResult {
        let elapsed = u64::try_from(self.start_time.elapsed().as_micros()).unwrap_or(u64::MAX);
        let result = self.result.finish(elapsed);
        log_summary(&result);
        result
    }
}

async fn read_document(path: &Path) -> AuditResult<String> {
    tokio::fs::read(path)
        .await
        .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
        .map_err(|e| AuditError::DocumentReadError {
            path: path.display().to_string(),
            message: e.to_string(),
        })
}

fn log_summary(result: &BatchResult) {
    info!(
        batch_id = %result.batch_id,
        total = result.total_count,
        ok = result.ok_count,
        risk = result.risk_count,
        errors = result.error_count,
        total_exposure = %result.total_exposure,
        duration_us = result.duration_us,
        "Batch audited"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{IssueKind, VerdictStatus};
    use rust_decimal::Decimal;
    use std::str::FromStr;

    const RATES: &str = r#"{
        "PIS": [{"percentual": "1.65", "vigencia_inicio": "2002-12-01", "vigencia_fim": "2027-01-01"}],
        "COFINS": [{"percentual": "7.6", "vigencia_inicio": "2004-02-01", "vigencia_fim": "2027-01-01"}],
        "ICMS": {"SP": [{"percentual": "18", "vigencia_inicio": "2016-01-01"}]}
    }"#;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn rates() -> RateTable {
        RateTable::from_json_str(RATES).unwrap()
    }

    fn nfe(number: u32, pis: &str) -> DocumentPayload {
        DocumentPayload::named(
            format!("nfe-{}.xml", number),
            format!(
                r#"<nfeProc xmlns="http://www.portalfiscal.inf.br/nfe"><NFe><infNFe>
                    <ide><nNF>{number}</nNF><dhEmi>2025-03-10T10:00:00-03:00</dhEmi></ide>
                    <emit><enderEmit><UF>SP</UF></enderEmit></emit>
                    <total><ICMSTot><vProd>1000.00</vProd><vPIS>{pis}</vPIS></ICMSTot></total>
                </infNFe></NFe></nfeProc>"#
            ),
        )
    }

    #[test]
    fn test_malformed_payload_in_batch_of_three() {
        let payloads = vec![
            nfe(1, "16.50"),
            DocumentPayload::named("broken.xml", "<NFe><nNF>2</NFe>"),
            nfe(3, "20.00"),
        ];

        let result = audit_batch(&payloads, &rates());

        assert_eq!(result.rows.len(), 3);
        assert_eq!(result.total_count, 2);
        assert_eq!(result.error_count, 1);
        assert_eq!(result.ok_count, 1);
        assert_eq!(result.risk_count, 1);
        assert_eq!(result.total_exposure, dec("3.50"));

        assert!(!result.rows[0].is_error());
        assert!(result.rows[1].is_error());
        assert_eq!(result.rows[1].source.as_deref(), Some("broken.xml"));
        assert!(!result.rows[2].is_error());
    }

    #[test]
    fn test_rows_preserve_input_order() {
        let payloads: Vec<_> = (1..=5).map(|n| nfe(n, "16.50")).collect();
        let result = audit_batch(&payloads, &rates());

        let numbers: Vec<String> = result
            .rows
            .iter()
            .filter_map(|row| row.document().and_then(|d| d.number.clone()))
            .collect();
        assert_eq!(numbers, vec!["1", "2", "3", "4", "5"]);
        assert!(result.rows.iter().enumerate().all(|(i, row)| row.position == i));
    }

    #[test]
    fn test_counts_are_consistent() {
        let payloads = vec![nfe(1, "16.50"), nfe(2, "40.00"), nfe(3, "17.00")];
        let result = audit_batch(&payloads, &rates());

        assert_eq!(result.total_count, result.ok_count + result.risk_count);
        assert_eq!(result.risk_count, 1);
        assert_eq!(result.total_exposure, dec("23.50"));
        assert!(result.total_exposure >= Decimal::ZERO);
    }

    #[test]
    fn test_empty_batch() {
        let result = audit_batch(&[], &rates());
        assert_eq!(result.total_count, 0);
        assert_eq!(result.total_exposure, Decimal::ZERO);
        assert!(result.rows.is_empty());
    }

    #[test]
    fn test_overflowing_base_does_not_abort_batch() {
        let huge = DocumentPayload::named(
            "huge.xml",
            r#"<NFe><infNFe>
                <ide><nNF>1</nNF><dhEmi>2025-03-10</dhEmi></ide>
                <emit><enderEmit><UF>SP</UF></enderEmit></emit>
                <total><ICMSTot><vProd>79228162514264337593543950335</vProd><vPIS>1.00</vPIS></ICMSTot></total>
            </infNFe></NFe>"#,
        );
        let payloads = vec![huge, nfe(2, "16.50")];

        let result = audit_batch(&payloads, &rates());

        assert_eq!(result.rows.len(), 2);
        assert_eq!(result.total_count, 2);
        assert_eq!(result.error_count, 0);
        assert_eq!(result.ok_count, 2);
        assert_eq!(result.total_exposure, Decimal::ZERO);

        let first = result.rows[0].verdict().unwrap();
        assert_eq!(first.status, VerdictStatus::Ok);
        assert_eq!(first.exposure, Decimal::ZERO);
        assert_eq!(first.audit_steps[0].output["expected"], serde_json::Value::Null);
        assert_eq!(result.rows[1].document().unwrap().number.as_deref(), Some("2"));
    }

    #[test]
    fn test_audit_document_reports_unparseable() {
        let rates = rates();
        let auditor = BatchAuditor::new(&rates);
        let err = auditor
            .audit_document(&DocumentPayload::new("not xml"))
            .unwrap_err();
        assert!(matches!(err, AuditError::UnparseableDocument { .. }));
    }

    #[test]
    fn test_audit_document_returns_verdict() {
        let rates = rates();
        let auditor = BatchAuditor::new(&rates);
        let outcome = auditor.audit_document(&nfe(9, "20.00")).unwrap();

        match outcome {
            RowOutcome::Audited { document, verdict } => {
                assert_eq!(document.number.as_deref(), Some("9"));
                assert_eq!(verdict.status, VerdictStatus::Divergent);
                assert_eq!(verdict.issue_kind, Some(IssueKind::Divergence));
            }
            RowOutcome::Failed { error } => panic!("Unexpected failure: {}", error),
        }
    }

    #[tokio::test]
    async fn test_audit_files_unavailable_rates_is_fatal() {
        let loader = RateTableLoader::new().with_file("/nonexistent/aliquotas.json");
        let result = audit_files(&loader, &[PathBuf::from("tests/fixtures/nfe_ok.xml")]).await;
        assert!(matches!(result, Err(AuditError::RateSourceUnavailable { .. })));
    }

    #[tokio::test]
    async fn test_audit_files_missing_file_is_failed_row() {
        let loader = RateTableLoader::new().with_inline(RATES);
        let result = audit_files(&loader, &[PathBuf::from("/nonexistent/nota.xml")])
            .await
            .unwrap();

        assert_eq!(result.error_count, 1);
        assert_eq!(result.total_count, 0);
        match &result.rows[0].outcome {
            RowOutcome::Failed { error } => {
                assert!(error.starts_with("Failed to read document '/nonexistent/nota.xml'"));
            }
            other => panic!("Expected failed row, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_audit_files_reads_latin1_document() {
        let loader = RateTableLoader::new().with_inline(RATES);
        let result = audit_files(&loader, &[PathBuf::from("tests/fixtures/nfe_latin1.xml")])
            .await
            .unwrap();

        assert_eq!(result.error_count, 0);
        assert_eq!(result.ok_count, 1);
        let document = result.rows[0].document().unwrap();
        assert_eq!(document.number.as_deref(), Some("5001"));
        assert_eq!(document.taxable_base, dec("1000.00"));
    }
}
