pub mod topic;
pub mod user;
pub mod word;
