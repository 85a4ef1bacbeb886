pub mod audit;
pub mod investment;
pub mod transaction;
pub mod user;
pub mod wallet;

pub use audit::AuditLog;
pub use investment::{Investment, InvestmentView};
pub use transaction::Transaction;
pub use user::User;
pub use wallet::Wallet;
