use crate::domain::account::Account;
use crate::domain::ports::Notifier;
use crate::error::Result;
use async_trait::async_trait;
use tracing::info;

/// Delivers notifications by writing them to the log.
#[derive(Debug, Default, Clone)]
pub struct LoggingNotifier;

impl LoggingNotifier {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Notifier for LoggingNotifier {
    async fn notify(&self, account: &Account, message: &str) -> Result<()> {
        info!(account = %account.id(), "{message}");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::account::Balance;

    #[tokio::test]
    async fn test_logging_notifier_never_fails() {
        let notifier = LoggingNotifier::new();
        let account = Account::new("Id-1", Balance::ZERO).unwrap();
        assert!(notifier.notify(&account, "hello").await.is_ok());
    }
}
