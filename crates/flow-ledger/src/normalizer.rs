use flow_types::{CountryCode, Period, Quantity, Stage, Transaction, TransactionId, TypeError};
use flow_workbook::Sheet;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::columns::LedgerColumns;
use crate::error::{LedgerError, LedgerResult};

/// One raw ledger row before normalization.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RawEntry {
    pub stage: String,
    pub period: i64,
    pub quantity: f64,
    pub origin: String,
    pub destination: String,
}

/// The normalized ledger: transactions sorted by `(period, stage)`, ties in
/// original row order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ledger {
    transactions: Vec<Transaction>,
}

impl Ledger {
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// Number of delivery transactions, i.e. demand paths the ledger opens.
    pub fn delivery_count(&self) -> usize {
        self.transactions.iter().filter(|t| t.is_delivery()).count()
    }

    /// Transactions newest first: the order the traceback consumes them in.
    pub fn newest_first(&self) -> impl Iterator<Item = &Transaction> {
        self.transactions.iter().rev()
    }
}

/// Maps raw ledger rows onto sorted [`Transaction`]s.
#[derive(Clone, Debug, Default)]
pub struct LedgerNormalizer {
    columns: LedgerColumns,
}

impl LedgerNormalizer {
    pub fn new(columns: LedgerColumns) -> Self {
        Self { columns }
    }

    pub fn columns(&self) -> &LedgerColumns {
        &self.columns
    }

    /// Normalize a ledger sheet. Row indices in errors and provenance are
    /// 0-based data rows (the header is not counted).
    pub fn normalize_sheet(&self, sheet: &Sheet) -> LedgerResult<Ledger> {
        let layout = ColumnLayout::locate(sheet, &self.columns)?;
        let mut transactions = Vec::with_capacity(sheet.len());

        let columns = &self.columns;
        for (row, cells) in sheet.rows().iter().enumerate() {
            let stage = cell(cells, row, layout.stage, &columns.stage)?;
            let period = cell(cells, row, layout.period, &columns.period)?;
            let quantity = cell(cells, row, layout.quantity, &columns.quantity)?;
            let origin = cell(cells, row, layout.origin, &columns.origin)?;
            let destination = cell(cells, row, layout.destination, &columns.destination)?;
            let entry = RawEntry {
                stage: stage.to_string(),
                period: parse_period(row, &columns.period, period)?,
                quantity: parse_float(row, &columns.quantity, quantity)?,
                origin: origin.to_string(),
                destination: destination.to_string(),
            };
            transactions.push(to_transaction(row, entry)?);
        }

        Ok(finish(transactions))
    }

    /// Normalize rows that are already split into typed fields.
    pub fn normalize_entries<I>(&self, entries: I) -> LedgerResult<Ledger>
    where
        I: IntoIterator<Item = RawEntry>,
    {
        let transactions = entries
            .into_iter()
            .enumerate()
            .map(|(row, entry)| to_transaction(row, entry))
            .collect::<LedgerResult<Vec<_>>>()?;
        Ok(finish(transactions))
    }
}

struct ColumnLayout {
    stage: usize,
    period: usize,
    quantity: usize,
    origin: usize,
    destination: usize,
}

impl ColumnLayout {
    fn locate(sheet: &Sheet, columns: &LedgerColumns) -> LedgerResult<Self> {
        let find = |name: &str| {
            sheet
                .column_index(name)
                .ok_or_else(|| LedgerError::MissingColumn(name.to_string()))
        };
        Ok(Self {
            stage: find(&columns.stage)?,
            period: find(&columns.period)?,
            quantity: find(&columns.quantity)?,
            origin: find(&columns.origin)?,
            destination: find(&columns.destination)?,
        })
    }
}

fn cell<'a>(cells: &'a [String], row: usize, index: usize, column: &str) -> LedgerResult<&'a str> {
    let value = cells.get(index).map(|c| c.trim()).unwrap_or_default();
    if value.is_empty() {
        return Err(LedgerError::MissingField {
            row,
            column: column.to_string(),
        });
    }
    Ok(value)
}

fn to_transaction(row: usize, entry: RawEntry) -> LedgerResult<Transaction> {
    let stage: Stage = entry.stage.parse().map_err(|_| LedgerError::InvalidStage {
        row,
        label: entry.stage.clone(),
    })?;
    let type_err = |source: TypeError| LedgerError::Type { row, source };

    Ok(Transaction {
        id: TransactionId(row),
        period: Period(entry.period),
        stage,
        quantity: Quantity::from_f64(entry.quantity).map_err(type_err)?,
        origin: CountryCode::new(entry.origin).map_err(type_err)?,
        destination: CountryCode::new(entry.destination).map_err(type_err)?,
    })
}

fn finish(mut transactions: Vec<Transaction>) -> Ledger {
    // `sort_by_key` is stable: equal keys keep ledger row order.
    transactions.sort_by_key(|t| (t.period, t.stage));

    let ledger = Ledger { transactions };
    info!(
        transactions = ledger.len(),
        deliveries = ledger.delivery_count(),
        "ledger normalized"
    );
    for tx in ledger.transactions() {
        debug!(%tx, "normalized transaction");
    }
    ledger
}

fn parse_period(row: usize, column: &str, value: &str) -> LedgerResult<i64> {
    if let Ok(period) = value.parse::<i64>() {
        return Ok(period);
    }
    // Spreadsheet exports often write integral weeks as `12.0`.
    match value.parse::<f64>() {
        Ok(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64 => Ok(f as i64),
        _ => Err(invalid_number(row, column, value)),
    }
}

fn parse_float(row: usize, column: &str, value: &str) -> LedgerResult<f64> {
    value
        .parse::<f64>()
        .map_err(|_| invalid_number(row, column, value))
}

fn invalid_number(row: usize, column: &str, value: &str) -> LedgerError {
    LedgerError::InvalidNumber {
        row,
        column: column.to_string(),
        value: value.to_string(),
    }
}
