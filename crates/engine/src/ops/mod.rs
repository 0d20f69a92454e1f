use std::collections::HashMap;
use std::sync::Mutex;

use sea_orm::DatabaseConnection;

use crate::{EngineError, ResultEngine};

mod access;
mod categories;
mod expenses;
mod friends;
mod goals;
mod incomes;
mod reports;
mod splits;

pub use expenses::ExpenseListFilter;
pub use friends::{FriendLink, FriendshipStatus};
pub use incomes::IncomeListFilter;
pub use reports::{CategoryTotal, MonthlySummary, SettlementOverview};
pub use splits::SplitExpenseView;

use reports::{CachedSeries, SeriesCacheKey};

/// Run a block inside a DB transaction, committing on success and rolling back on error.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
    /// Computed report series by (user, anchor period, length); entries
    /// expire by TTL only and are recomputed from fresh rows, never patched.
    series_cache: Mutex<HashMap<SeriesCacheKey, CachedSeries>>,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }
}

fn normalize_required_name(value: &str, label: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::InvalidName(format!(
            "{label} name must not be empty"
        )));
    }
    Ok(trimmed.to_string())
}

fn normalize_optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

fn require_positive_amount(amount_minor: i64, label: &str) -> ResultEngine<()> {
    if amount_minor <= 0 {
        return Err(EngineError::InvalidAmount(format!(
            "{label} must be positive, got {amount_minor}"
        )));
    }
    Ok(())
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> ResultEngine<Engine> {
        Ok(Engine {
            database: self.database,
            series_cache: Mutex::new(HashMap::new()),
        })
    }
}
