//! Application Layer - Use Cases

pub mod config;
pub mod issue_token;
pub mod verify_token;

pub use issue_token::IssueTokenUseCase;
pub use verify_token::VerifyTokenUseCase;
