//! NF-e (goods invoice) extraction.
//!
//! Document-level totals live in `ICMSTot`; item-level elements with the same
//! names are only used when the totals group is absent.
//!
//! Only PIS and COFINS are read as declared amounts. Declared ICMS depends on
//! the destination (interstate rates) and on reduced bases, neither of which
//! the rate table models, so it is not compared.

use roxmltree::Document;

use crate::models::{DocumentType, NormalizedDocument, TaxType};

use super::fields::{FieldCandidates, TagQuery, extract_with};

const NUMBER: &[TagQuery] = &[TagQuery::anywhere("nNF")];

const ISSUE_DATE: &[TagQuery] = &[TagQuery::anywhere("dhEmi"), TagQuery::anywhere("dEmi")];

const JURISDICTION: &[TagQuery] = &[
    TagQuery::within("enderEmit", "UF"),
    TagQuery::anywhere("UF"),
];

const PRODUCTS_VALUE: &[TagQuery] = &[
    TagQuery::within("ICMSTot", "vProd"),
    TagQuery::anywhere("vProd"),
];

const INVOICE_VALUE: &[TagQuery] = &[
    TagQuery::within("ICMSTot", "vNF"),
    TagQuery::anywhere("vNF"),
];

const PIS: &[TagQuery] = &[
    TagQuery::within("ICMSTot", "vPIS"),
    TagQuery::anywhere("vPIS"),
];

const COFINS: &[TagQuery] = &[
    TagQuery::within("ICMSTot", "vCOFINS"),
    TagQuery::anywhere("vCOFINS"),
];

/// Field candidates for NF-e documents.
pub const NFE_FIELDS: FieldCandidates = FieldCandidates {
    number: NUMBER,
    issue_date: ISSUE_DATE,
    jurisdiction: JURISDICTION,
    taxable_base: &[PRODUCTS_VALUE, INVOICE_VALUE],
    declared: &[
        (TaxType::Pis, PIS),
        (TaxType::Cofins, COFINS),
    ],
};

/// Extracts an NF-e.
pub fn extract_nfe(doc: &Document<'_>) -> NormalizedDocument {
    extract_with(doc, DocumentType::Nfe, &NFE_FIELDS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    const NFE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<nfeProc xmlns="http://www.portalfiscal.inf.br/nfe" versao="4.00">
  <NFe>
    <infNFe Id="NFe35250312345678000199550010000012341000012345" versao="4.00">
      <ide><cUF>35</cUF><nNF>1234</nNF><dhEmi>2025-03-10T10:15:00-03:00</dhEmi></ide>
      <emit><enderEmit><xMun>Sao Paulo</xMun><UF>SP</UF></enderEmit></emit>
      <dest><enderDest><UF>RJ</UF></enderDest></dest>
      <det nItem="1">
        <prod><vProd>600.00</vProd></prod>
        <imposto>
          <ICMS><ICMS00><vICMS>108.00</vICMS></ICMS00></ICMS>
          <PIS><PISAliq><vPIS>9.90</vPIS></PISAliq></PIS>
          <COFINS><COFINSAliq><vCOFINS>45.60</vCOFINS></COFINSAliq></COFINS>
        </imposto>
      </det>
      <total>
        <ICMSTot>
          <vICMS>180.00</vICMS><vProd>1000.00</vProd>
          <vPIS>16.50</vPIS><vCOFINS>76.00</vCOFINS><vNF>1050.00</vNF>
        </ICMSTot>
      </total>
    </infNFe>
  </NFe>
</nfeProc>"#;

    #[test]
    fn test_extracts_header_fields() {
        let doc = Document::parse(NFE).unwrap();
        let nfe = extract_nfe(&doc);

        assert_eq!(nfe.document_type, DocumentType::Nfe);
        assert_eq!(nfe.number.as_deref(), Some("1234"));
        assert_eq!(nfe.issue_date, NaiveDate::from_ymd_opt(2025, 3, 10));
        assert_eq!(nfe.jurisdiction.as_deref(), Some("SP"));
    }

    #[test]
    fn test_totals_win_over_item_values() {
        let doc = Document::parse(NFE).unwrap();
        let nfe = extract_nfe(&doc);

        assert_eq!(nfe.taxable_base, dec("1000.00"));
        assert_eq!(nfe.declared(TaxType::Pis), Some(dec("16.50")));
        assert_eq!(nfe.declared(TaxType::Cofins), Some(dec("76.00")));
    }

    #[test]
    fn test_icms_and_reform_taxes_are_not_declared() {
        let xml = r#"<NFe><ide><nNF>9</nNF><dhEmi>2026-02-01T08:00:00-03:00</dhEmi></ide>
            <total><ICMSTot><vProd>500.00</vProd><vICMS>60.00</vICMS></ICMSTot>
            <IBSCBSTot><vCBS>4.50</vCBS><vIBS>0.50</vIBS></IBSCBSTot></total></NFe>"#;
        let doc = Document::parse(xml).unwrap();
        let nfe = extract_nfe(&doc);

        assert_eq!(nfe.declared(TaxType::Icms), None);
        assert_eq!(nfe.declared(TaxType::Cbs), None);
        assert_eq!(nfe.declared(TaxType::Ibs), None);
        assert_eq!(nfe.declared_amounts.len(), 0);
    }

    #[test]
    fn test_date_only_field_is_used_when_date_time_missing() {
        let xml = "<NFe><ide><nNF>1</nNF><dEmi>2009-11-30</dEmi></ide></NFe>";
        let doc = Document::parse(xml).unwrap();
        assert_eq!(
            extract_nfe(&doc).issue_date,
            NaiveDate::from_ymd_opt(2009, 11, 30)
        );
    }

    #[test]
    fn test_invoice_value_is_used_when_products_value_is_zero() {
        let xml = "<NFe><ICMSTot><vProd>0.00</vProd><vNF>250.00</vNF></ICMSTot></NFe>";
        let doc = Document::parse(xml).unwrap();
        assert_eq!(extract_nfe(&doc).taxable_base, dec("250.00"));
    }

    #[test]
    fn test_missing_fields_normalize_to_none_and_zero() {
        let doc = Document::parse("<NFe/>").unwrap();
        let nfe = extract_nfe(&doc);

        assert_eq!(nfe.number, None);
        assert_eq!(nfe.issue_date, None);
        assert_eq!(nfe.jurisdiction, None);
        assert_eq!(nfe.taxable_base, Decimal::ZERO);
        assert!(nfe.declared_amounts.is_empty());
    }

    #[test]
    fn test_malformed_declared_amount_is_present_as_zero() {
        let xml = "<NFe><ICMSTot><vProd>100</vProd><vPIS>n/a</vPIS></ICMSTot></NFe>";
        let doc = Document::parse(xml).unwrap();
        let nfe = extract_nfe(&doc);

        assert_eq!(nfe.declared(TaxType::Pis), Some(Decimal::ZERO));
        assert_eq!(nfe.declared_positive(TaxType::Pis), None);
    }

    #[test]
    fn test_jurisdiction_falls_back_to_any_uf() {
        let xml = "<NFe><dest><enderDest><UF>BA</UF></enderDest></dest></NFe>";
        let doc = Document::parse(xml).unwrap();
        assert_eq!(extract_nfe(&doc).jurisdiction.as_deref(), Some("BA"));
    }
}
