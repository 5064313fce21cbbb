//! CSV loader for movement exports
//!
//! Accepts English headers (`date`, `type`, `id`, `related_key`, `amount`,
//! `description`) or the column names of the Mercado Pago movements sheet.

use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Deserialize;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use crate::types::*;
use crate::utils::validation::validate_transaction;

const DATE_TIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
];

const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%d/%m/%Y"];

#[derive(Debug, Deserialize)]
struct MovementRow {
    #[serde(alias = "Data de pagamento")]
    date: String,
    #[serde(rename = "type", alias = "Tipo de operação")]
    operation_type: String,
    #[serde(alias = "Número do movimento")]
    id: String,
    #[serde(default, alias = "Operação relacionada")]
    related_key: Option<String>,
    #[serde(alias = "Valor")]
    amount: String,
    #[serde(default, alias = "Descrição")]
    description: Option<String>,
}

/// Parse a timestamp in any of the supported layouts
pub fn parse_timestamp(value: &str) -> ReconcileResult<NaiveDateTime> {
    let value = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.naive_local());
    }

    for format in DATE_TIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(dt);
        }
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(value, format) {
            if let Some(dt) = date.and_hms_opt(0, 0, 0) {
                return Ok(dt);
            }
        }
    }

    Err(ReconcileError::Validation(format!(
        "Unrecognised date '{}'",
        value
    )))
}

/// Parse an amount in either `1,234.56` or `1.234,56` notation
///
/// When both separators appear the last one is the decimal point. A lone
/// comma is a decimal point; a lone dot is left to `BigDecimal`.
pub fn parse_amount(value: &str) -> ReconcileResult<BigDecimal> {
    let trimmed = value.trim();
    let normalized = match (trimmed.rfind(','), trimmed.rfind('.')) {
        // "1,234.56" -> "1234.56"
        (Some(comma), Some(dot)) if dot > comma => trimmed.replace(',', ""),
        // "1.234,56" -> "1234.56"
        (Some(_), _) => trimmed.replace('.', "").replace(',', "."),
        _ => trimmed.to_string(),
    };

    BigDecimal::from_str(&normalized)
        .map_err(|_| ReconcileError::Validation(format!("Invalid amount '{}'", value)))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl MovementRow {
    fn into_transaction(self) -> ReconcileResult<Transaction> {
        let mut transaction = Transaction::new(
            self.id.trim().to_string(),
            parse_timestamp(&self.date)?,
            self.operation_type.trim().to_string(),
            parse_amount(&self.amount)?,
        );
        if let Some(key) = non_blank(self.related_key) {
            transaction = transaction.with_related_key(key);
        }
        if let Some(description) = non_blank(self.description) {
            transaction = transaction.with_description(description);
        }

        validate_transaction(&transaction)?;
        Ok(transaction)
    }
}

/// Read movements from CSV data with a header row
pub fn read_transactions_csv<R: Read>(reader: R) -> ReconcileResult<Vec<Transaction>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_reader(reader);
    let mut transactions = Vec::new();

    for (index, result) in csv_reader.deserialize::<MovementRow>().enumerate() {
        // +2 for the header row and 1-based numbering
        let line = index + 2;
        let row = result?;

        let transaction = row.into_transaction().map_err(|e| match e {
            ReconcileError::Validation(message) => ReconcileError::Import { line, message },
            other => other,
        })?;
        transactions.push(transaction);
    }

    tracing::info!(count = transactions.len(), "imported movements");
    Ok(transactions)
}

/// Load movements from a CSV file
pub fn load_transactions_csv(path: impl AsRef<Path>) -> ReconcileResult<Vec<Transaction>> {
    let path = path.as_ref();
    tracing::debug!(path = %path.display(), "reading movements");
    let file = std::fs::File::open(path)?;
    read_transactions_csv(file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::io::Write;

    #[rstest]
    #[case::iso_space("2025-06-07 19:51:20", "2025-06-07T19:51:20")]
    #[case::iso_t("2025-06-07T19:51:20", "2025-06-07T19:51:20")]
    #[case::iso_fraction("2025-06-07T19:51:20.500", "2025-06-07T19:51:20.500")]
    #[case::rfc3339("2025-06-07T19:51:20.000-04:00", "2025-06-07T19:51:20")]
    #[case::brazilian("07/06/2025 19:51:20", "2025-06-07T19:51:20")]
    #[case::brazilian_minutes("07/06/2025 19:51", "2025-06-07T19:51:00")]
    #[case::date_only("2025-06-07", "2025-06-07T00:00:00")]
    #[case::brazilian_date_only("07/06/2025", "2025-06-07T00:00:00")]
    fn test_parse_timestamp(#[case] input: &str, #[case] expected: &str) {
        let expected = NaiveDateTime::parse_from_str(expected, "%Y-%m-%dT%H:%M:%S%.f").unwrap();
        assert_eq!(parse_timestamp(input).unwrap(), expected);
    }

    #[test]
    fn test_parse_timestamp_rejects_garbage() {
        assert!(parse_timestamp("yesterday").is_err());
    }

    #[rstest]
    #[case::dot("12.34", "12.34")]
    #[case::comma("12,34", "12.34")]
    #[case::negative_comma("-4,99", "-4.99")]
    #[case::thousands("1.234,56", "1234.56")]
    #[case::english_thousands("1,234.56", "1234.56")]
    #[case::english_millions("-1,234,567.89", "-1234567.89")]
    #[case::padded(" 7 ", "7")]
    fn test_parse_amount(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(
            parse_amount(input).unwrap(),
            BigDecimal::from_str(expected).unwrap()
        );
    }

    #[test]
    fn test_read_english_headers() {
        let data = "\
date,type,id,related_key,amount,description
2024-01-01 09:00:00,Recebimento,1,A,100.00,Venda
2024-01-01 09:00:00,Tarifa do Mercado Pago,2,A,-5.00,
2024-01-01 18:00:00,Transferência via Pix,3,,-95.00,
";

        let transactions = read_transactions_csv(data.as_bytes()).unwrap();

        assert_eq!(transactions.len(), 3);
        assert_eq!(transactions[0].related_key.as_deref(), Some("A"));
        assert_eq!(transactions[0].description.as_deref(), Some("Venda"));
        assert_eq!(transactions[1].description, None);
        assert_eq!(transactions[2].related_key, None);
        assert_eq!(transactions[2].amount, BigDecimal::from(-95));
    }

    #[test]
    fn test_read_portuguese_headers() {
        let data = "\
Data de pagamento,Tipo de operação,Número do movimento,Operação relacionada,Valor
07/06/2025 10:00:00,Recebimento,111,9001,\"59,90\"
07/06/2025 10:00:00,Tarifa do Mercado Pago,112,9001,\"-2,99\"
";

        let transactions = read_transactions_csv(data.as_bytes()).unwrap();

        assert_eq!(transactions.len(), 2);
        assert_eq!(transactions[0].id, "111");
        assert_eq!(transactions[0].operation_type, "Recebimento");
        assert_eq!(transactions[1].amount, BigDecimal::from_str("-2.99").unwrap());
        assert_eq!(transactions[1].key(), Some("9001"));
    }

    #[test]
    fn test_bad_row_reports_line() {
        let data = "\
date,type,id,related_key,amount
2024-01-01,Recebimento,1,,10.00
2024-01-02,Recebimento,2,,ten
";

        match read_transactions_csv(data.as_bytes()) {
            Err(ReconcileError::Import { line, message }) => {
                assert_eq!(line, 3);
                assert!(message.contains("ten"));
            }
            other => panic!("expected import error, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_column_is_csv_error() {
        let data = "date,type,amount\n2024-01-01,Recebimento,1\n";
        assert!(matches!(
            read_transactions_csv(data.as_bytes()),
            Err(ReconcileError::Csv(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "date,type,id,amount").unwrap();
        writeln!(file, "2024-03-01,Pagamento,7,-12.00").unwrap();

        let transactions = load_transactions_csv(file.path()).unwrap();
        assert_eq!(transactions.len(), 1);
        assert_eq!(transactions[0].related_key, None);
    }
}
