//! Domain ports for the hexagonal boundary.
//!
//! Driven ports (repositories, logs) are implemented by outbound adapters;
//! driving ports (use-cases) are implemented by the domain services and
//! consumed by inbound adapters.

mod admin_command;
mod admin_query;
mod directory_command;
mod directory_query;
mod feedback_log;
mod login_service;
mod message_repository;
mod swap_command;
mod swap_query;
mod swap_repository;
mod user_repository;

#[cfg(test)]
pub use admin_command::MockAdminCommand;
pub use admin_command::AdminCommand;
#[cfg(test)]
pub use admin_query::MockAdminQuery;
pub use admin_query::AdminQuery;
#[cfg(test)]
pub use directory_command::MockDirectoryCommand;
pub use directory_command::{DirectoryCommand, RegisterUserRequest, UpdateProfileRequest};
#[cfg(test)]
pub use directory_query::MockDirectoryQuery;
pub use directory_query::DirectoryQuery;
#[cfg(test)]
pub use feedback_log::MockFeedbackLog;
pub use feedback_log::{FeedbackLog, FeedbackLogError};
#[cfg(test)]
pub use login_service::MockLoginService;
pub use login_service::LoginService;
#[cfg(test)]
pub use message_repository::MockAdminMessageRepository;
pub use message_repository::{AdminMessageRepository, MessagePersistenceError};
#[cfg(test)]
pub use swap_command::MockSwapCommand;
pub use swap_command::{ProposeSwapRequest, SwapCommand};
#[cfg(test)]
pub use swap_query::MockSwapQuery;
pub use swap_query::SwapQuery;
#[cfg(test)]
pub use swap_repository::MockSwapRepository;
pub use swap_repository::{SwapPersistenceError, SwapRepository};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
