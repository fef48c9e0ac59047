//! Typed batched reads of public contract fields.
//!
//! A `FieldSpec` names the field, the contract to hit, the ABI-encoded
//! calldata, and the decode type we expect back. All specs in one
//! `read_fields` call go out as a single batched round trip; anything that
//! comes back not matching the declared shape is a `DecodeError`.

use crate::error::{DecodeError, Result};
use crate::reader::{BatchCall, ChainReader};
use alloy::primitives::{Address, Bytes, U256};
use alloy::sol_types::SolCall;
use std::collections::HashMap;

alloy::sol! {
    function prizeStrategy() external view returns (address);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Address,
    Uint,
    Bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldValue {
    Address(Address),
    Uint(U256),
    Bool(bool),
}

impl FieldValue {
    pub fn as_address(&self) -> Option<Address> {
        match self {
            FieldValue::Address(a) => Some(*a),
            _ => None,
        }
    }

    pub fn as_uint(&self) -> Option<U256> {
        match self {
            FieldValue::Uint(v) => Some(*v),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub name: &'static str,
    pub target: Address,
    pub calldata: Bytes,
    pub kind: FieldKind,
}

/// The prize pool's linked strategy address (`prizeStrategy()` getter).
pub fn prize_strategy_field(prize_pool: Address) -> FieldSpec {
    FieldSpec {
        name: "prizeStrategy",
        target: prize_pool,
        calldata: prizeStrategyCall {}.abi_encode().into(),
        kind: FieldKind::Address,
    }
}

fn decode_word(spec: &FieldSpec, data: &[u8]) -> Result<FieldValue> {
    if data.len() != 32 {
        return Err(DecodeError::FieldShape {
            field: spec.name.to_string(),
            reason: format!("expected one 32-byte word, got {} bytes", data.len()),
        }
        .into());
    }
    match spec.kind {
        FieldKind::Address => {
            if data[..12].iter().any(|b| *b != 0) {
                return Err(DecodeError::FieldShape {
                    field: spec.name.to_string(),
                    reason: "address word has nonzero padding".to_string(),
                }
                .into());
            }
            Ok(FieldValue::Address(Address::from_slice(&data[12..32])))
        }
        FieldKind::Uint => Ok(FieldValue::Uint(U256::from_be_slice(data))),
        FieldKind::Bool => {
            if data[..31].iter().any(|b| *b != 0) || data[31] > 1 {
                return Err(DecodeError::FieldShape {
                    field: spec.name.to_string(),
                    reason: "bool word is not 0 or 1".to_string(),
                }
                .into());
            }
            Ok(FieldValue::Bool(data[31] == 1))
        }
    }
}

/// One batched round trip for all `specs`, decoded per the declared kinds.
pub async fn read_fields(
    reader: &dyn ChainReader,
    specs: &[FieldSpec],
) -> Result<HashMap<&'static str, FieldValue>> {
    let calls = specs
        .iter()
        .map(|spec| BatchCall {
            target: spec.target,
            calldata: spec.calldata.clone(),
        })
        .collect::<Vec<_>>();
    let outcomes = reader.batch_call(&calls).await?;
    if outcomes.len() != specs.len() {
        return Err(DecodeError::ResultCount {
            expected: specs.len(),
            got: outcomes.len(),
        }
        .into());
    }

    let mut values = HashMap::with_capacity(specs.len());
    for (spec, outcome) in specs.iter().zip(outcomes) {
        if !outcome.success {
            return Err(DecodeError::FieldShape {
                field: spec.name.to_string(),
                reason: "call reverted".to_string(),
            }
            .into());
        }
        values.insert(spec.name, decode_word(spec, outcome.data.as_ref())?);
    }
    Ok(values)
}
