//! Call descriptors and parameter validation

use super::MulticallError;
use alloy::dyn_abi::{DynSolValue, JsonAbiExt};
use alloy::json_abi::{Function, JsonAbi};
use alloy::primitives::{Address, Bytes};

/// A function name and its arguments, resolved against an ABI at batch time
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionCall {
    pub function_name: String,
    pub args: Vec<DynSolValue>,
}

impl FunctionCall {
    pub fn new(function_name: impl Into<String>, args: Vec<DynSolValue>) -> Self {
        Self {
            function_name: function_name.into(),
            args,
        }
    }

    /// A call without arguments
    pub fn bare(function_name: impl Into<String>) -> Self {
        Self::new(function_name, Vec::new())
    }
}

/// A fully specified call: its own target address and ABI
#[derive(Debug, Clone)]
pub struct ContractCall<'a> {
    pub address: String,
    pub abi: &'a JsonAbi,
    pub call: FunctionCall,
}

impl<'a> ContractCall<'a> {
    pub fn new(address: impl Into<String>, abi: &'a JsonAbi, call: FunctionCall) -> Self {
        Self {
            address: address.into(),
            abi,
            call,
        }
    }
}

/// A validated call ready to be dispatched
#[derive(Debug, Clone)]
pub(crate) struct PreparedCall {
    pub address: Address,
    pub function: Function,
    pub call_data: Bytes,
}

/// Parse a `0x`-prefixed 20-byte hex address
///
/// Mixed-case input must carry a valid EIP-55 checksum.
pub fn parse_address(chain_id: u64, raw: &str) -> Result<Address, MulticallError> {
    let body = raw
        .strip_prefix("0x")
        .ok_or_else(|| {
            MulticallError::invalid(chain_id, format!("address {raw:?} is missing 0x prefix"))
        })?;

    if body.len() != 40 {
        return Err(MulticallError::invalid(
            chain_id,
            format!("address {raw:?} is not 20 bytes"),
        ));
    }

    let address: Address = raw
        .parse()
        .map_err(|e| MulticallError::invalid(chain_id, format!("address {raw:?}: {e}")))?;

    let has_upper = body.chars().any(|c| c.is_ascii_uppercase());
    let has_lower = body.chars().any(|c| c.is_ascii_lowercase());
    if has_upper && has_lower && address.to_checksum(None) != raw {
        return Err(MulticallError::invalid(
            chain_id,
            format!("address {raw:?} has an invalid checksum"),
        ));
    }

    Ok(address)
}

/// Resolve a call against an ABI and encode its calldata
pub(crate) fn prepare_call(
    chain_id: u64,
    address: Address,
    abi: &JsonAbi,
    call: &FunctionCall,
) -> Result<PreparedCall, MulticallError> {
    let overloads = abi.function(&call.function_name).ok_or_else(|| {
        MulticallError::invalid(
            chain_id,
            format!("function {} not found in ABI", call.function_name),
        )
    })?;

    let function = overloads
        .iter()
        .find(|f| f.inputs.len() == call.args.len())
        .ok_or_else(|| {
            MulticallError::invalid(
                chain_id,
                format!(
                    "no overload of {} takes {} arguments",
                    call.function_name,
                    call.args.len()
                ),
            )
        })?;

    let call_data = function.abi_encode_input(&call.args).map_err(|e| {
        MulticallError::invalid(
            chain_id,
            format!("cannot encode arguments for {}: {e}", call.function_name),
        )
    })?;

    Ok(PreparedCall {
        address,
        function: function.clone(),
        call_data: call_data.into(),
    })
}
