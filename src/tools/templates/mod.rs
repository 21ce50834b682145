//! Template and reference lookup tools

pub mod openzeppelin;
pub mod solidity_docs;

pub use openzeppelin::{ContractKind, OpenZeppelinTool, CONTRACT_KINDS};
pub use solidity_docs::SolidityDocsTool;
