//! Command implementations.

mod extract;
mod init;
mod open;
mod pack;
mod query;
mod validate;

pub use extract::ExtractCommand;
pub use init::InitCommand;
pub use open::OpenCommand;
pub use pack::PackCommand;
pub use query::QueryCommand;
pub use validate::ValidateCommand;
