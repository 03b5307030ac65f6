//! Engine configuration.
//!
//! The exchange never reads global state: fee receiver, protocol fee and the
//! trusted order-book identity are passed into [`crate::Exchange::new`].

use std::collections::HashMap;
use thiserror::Error;

use crate::types::{Address, MAX_BPS};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Protocol fee charged on the payment leg, in basis points
    pub protocol_fee_bps: u16,
    /// Receiver of the protocol fee
    pub fee_receiver: Address,
    /// Identity whose signature authorizes match allowances
    pub order_book: Address,
    /// Pay the protocol fee in native coin when the payment is wrapped native
    pub fee_in_native: bool,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnv(String),
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

impl EngineConfig {
    pub fn new(protocol_fee_bps: u16, fee_receiver: Address, order_book: Address) -> Self {
        Self {
            protocol_fee_bps,
            fee_receiver,
            order_book,
            fee_in_native: false,
        }
    }

    pub fn with_fee_in_native(mut self, fee_in_native: bool) -> Self {
        self.fee_in_native = fee_in_native;
        self
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_map(std::env::vars().collect())
    }

    pub fn from_env_map(env_map: HashMap<String, String>) -> Result<Self, ConfigError> {
        let protocol_fee_bps = env_map
            .get("EXCHANGE_PROTOCOL_FEE_BPS")
            .map(|s| s.as_str())
            .unwrap_or("0")
            .parse::<u16>()
            .ok()
            .filter(|bps| (*bps as u32) <= MAX_BPS)
            .ok_or_else(|| {
                ConfigError::InvalidValue(
                    "EXCHANGE_PROTOCOL_FEE_BPS".to_string(),
                    "must be an integer between 0 and 10000".to_string(),
                )
            })?;

        let fee_receiver = parse_address(&env_map, "EXCHANGE_FEE_RECEIVER")?;
        let order_book = parse_address(&env_map, "EXCHANGE_ORDER_BOOK")?;

        let fee_in_native = match env_map
            .get("EXCHANGE_FEE_IN_NATIVE")
            .map(|s| s.as_str())
            .unwrap_or("false")
        {
            "true" | "1" => true,
            "false" | "0" => false,
            other => {
                return Err(ConfigError::InvalidValue(
                    "EXCHANGE_FEE_IN_NATIVE".to_string(),
                    format!("must be true or false, got {}", other),
                ))
            }
        };

        Ok(EngineConfig {
            protocol_fee_bps,
            fee_receiver,
            order_book,
            fee_in_native,
        })
    }
}

fn parse_address(env_map: &HashMap<String, String>, key: &str) -> Result<Address, ConfigError> {
    let raw = env_map
        .get(key)
        .ok_or_else(|| ConfigError::MissingEnv(key.to_string()))?;
    Address::from_hex(raw.trim()).ok_or_else(|| {
        ConfigError::InvalidValue(key.to_string(), "must be a 20-byte hex address".to_string())
    })
}
