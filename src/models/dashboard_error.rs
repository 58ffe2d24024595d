use thiserror::Error;

/// Every failure the dashboard can surface. All variants render as text the
/// pages show inline; none of them stops the process.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DashboardError {
    #[error("Configuratie ontbreekt: {0}")]
    MissingConfig(String),

    #[error("Ophalen uit `{table}` mislukt: {message}")]
    Query { table: String, message: String },

    #[error("Live-verbinding met `{table}` mislukt: {message}")]
    Subscription { table: String, message: String },

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Write(String),
}

impl DashboardError {
    pub fn query(table: &str, message: impl ToString) -> Self {
        DashboardError::Query {
            table: table.to_string(),
            message: message.to_string(),
        }
    }

    pub fn subscription(table: &str, message: impl ToString) -> Self {
        DashboardError::Subscription {
            table: table.to_string(),
            message: message.to_string(),
        }
    }
}
