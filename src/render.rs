//! Terminal rendering of the cached view

use rust_decimal::Decimal;

use fintrack_config::{CurrencyConfig, SymbolPosition};
use fintrack_core::{Notice, Period, SummarySnapshot, Transaction, TransactionStore};

pub struct Renderer {
    currency: CurrencyConfig,
}

impl Renderer {
    pub fn new(currency: &CurrencyConfig) -> Self {
        Self {
            currency: currency.clone(),
        }
    }

    pub fn money(&self, amount: Decimal) -> String {
        let formatted = fintrack_utils::format_decimal(
            amount,
            self.currency.decimal_places,
            &self.currency.thousands_separator,
            &self.currency.decimal_separator,
        );
        fintrack_utils::with_symbol(
            &formatted,
            &self.currency.symbol,
            self.currency.symbol_position == SymbolPosition::Before,
        )
    }

    /// "January 2024"
    pub fn period_title(&self, period: Period) -> String {
        match fintrack_utils::month_name(period.month()) {
            Some(name) => format!("{} {}", name, period.year()),
            None => period.to_string(),
        }
    }

    pub fn summary(&self, period: Period, snapshot: &SummarySnapshot) -> String {
        [
            self.period_title(period),
            format!("  Income:   {}", self.money(snapshot.total_income())),
            format!("  Expenses: {}", self.money(snapshot.total_expenses())),
            format!("  Balance:  {}", self.money(snapshot.balance())),
        ]
        .join("\n")
    }

    /// One line per transaction, in the order given
    pub fn transactions(&self, store: &TransactionStore) -> String {
        if store.is_empty() {
            return "No transactions for this period.".to_string();
        }
        store
            .iter()
            .map(|tx| self.transaction_line(tx))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn transaction_line(&self, tx: &Transaction) -> String {
        let sign = if tx.is_income() { '+' } else { '-' };
        let mut line = format!(
            "{:>6}  {}  {} {:>14}  {}",
            tx.id.as_str(),
            tx.date,
            sign,
            self.money(tx.amount),
            tx.description
        );
        if let Some(category) = tx.category.as_deref().filter(|c| !c.is_empty()) {
            line.push_str(&format!(" [{}]", category));
        }
        line
    }

    /// Year window with the current year marked
    pub fn years(&self, years: &[i32], current: i32) -> String {
        years
            .iter()
            .map(|&year| {
                if year == current {
                    format!("{} *", year)
                } else {
                    year.to_string()
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn notice(&self, notice: &Notice) -> String {
        format!("{}: {} failed: {}", notice.severity, notice.operation, notice.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use fintrack_core::{Summary, TransactionId, TransactionType};
    use std::str::FromStr;

    fn renderer() -> Renderer {
        Renderer::new(&CurrencyConfig::default())
    }

    fn tx(id: i64, amount: &str, kind: TransactionType, category: Option<&str>) -> Transaction {
        Transaction {
            id: TransactionId::from(id),
            description: format!("entry {}", id),
            amount: Decimal::from_str(amount).unwrap(),
            kind,
            date: NaiveDate::from_ymd_opt(2024, 1, id as u32).unwrap(),
            category: category.map(str::to_string),
        }
    }

    #[test]
    fn test_money_uses_currency_settings() {
        assert_eq!(renderer().money(Decimal::from_str("1234.5").unwrap()), "R$ 1,234.50");

        let euro = CurrencyConfig {
            symbol: "€".to_string(),
            thousands_separator: ".".to_string(),
            decimal_separator: ",".to_string(),
            symbol_position: SymbolPosition::After,
            ..CurrencyConfig::default()
        };
        assert_eq!(Renderer::new(&euro).money(Decimal::from_str("-1234.5").unwrap()), "-1.234,50 €");
    }

    #[test]
    fn test_summary_block() {
        let period = Period::new(3, 2024).unwrap();
        let snapshot = SummarySnapshot::new(Summary {
            total_income: Decimal::from(1000),
            total_expenses: Decimal::from(250),
            balance: Decimal::from(750),
        });

        let text = renderer().summary(period, &snapshot);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "March 2024");
        assert_eq!(lines[3], "  Balance:  R$ 750.00");
    }

    #[test]
    fn test_transactions_keep_given_order() {
        let store = TransactionStore::new(vec![
            tx(9, "10", TransactionType::Expense, Some("food")),
            tx(2, "1000", TransactionType::Income, None),
        ]);

        let text = renderer().transactions(&store);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].trim_start().starts_with("9  2024-01-09  -"));
        assert!(lines[0].ends_with("entry 9 [food]"));
        assert!(lines[1].contains("+"));
        assert!(lines[1].contains("R$ 1,000.00"));
    }

    #[test]
    fn test_empty_list() {
        assert_eq!(renderer().transactions(&TransactionStore::default()), "No transactions for this period.");
    }

    #[test]
    fn test_years_marks_current() {
        assert_eq!(renderer().years(&[2023, 2024, 2025], 2024), "2023\n2024 *\n2025");
    }
}
