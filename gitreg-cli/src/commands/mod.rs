pub mod abi;
pub mod branch;
pub mod deploy;
pub mod fund;
pub mod issue;
pub mod repo;
pub mod tips;
