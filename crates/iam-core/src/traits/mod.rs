//! Domain traits (ports) - interfaces the infrastructure layer implements

mod clock;
mod repositories;

pub use clock::{Clock, SystemClock};
pub use repositories::{
    AccountPage, AccountQuery, AccountRepository, RefreshTokenRepository, RepoResult,
};
