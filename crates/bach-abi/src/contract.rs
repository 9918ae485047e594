//! Custom errors and events

use crate::error::{AbiError, Result};
use crate::function::{validate_name, AbiKind, AbiObject, Function};
use crate::types::TupleType;
use crate::value::Tuple;

/// A custom error declared by a contract, e.g. `InsufficientBalance(uint256,uint256)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractError {
    name: String,
    inputs: TupleType,
}

impl ContractError {
    /// Create from a name and parameter types
    pub fn new(name: &str, inputs: TupleType) -> Result<ContractError> {
        Ok(ContractError {
            name: validate_name(name)?,
            inputs,
        })
    }

    /// The function whose selector prefixes this error's revert data
    pub fn function(&self) -> Result<Function> {
        Function::parse(&self.canonical_signature())
    }

    /// Decode revert data: the error selector followed by its arguments
    pub fn decode_revert(&self, data: &[u8]) -> Result<Tuple> {
        self.function()?.decode_call(data)
    }
}

impl AbiObject for ContractError {
    fn kind(&self) -> AbiKind {
        AbiKind::Error
    }

    fn name(&self) -> Option<&str> {
        Some(&self.name)
    }

    fn inputs(&self) -> &TupleType {
        &self.inputs
    }
}

/// A log event with its `indexed` parameter manifest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    name: String,
    inputs: TupleType,
    indexed: Vec<bool>,
    anonymous: bool,
    indexed_params: TupleType,
    non_indexed_params: TupleType,
}

impl Event {
    /// Create a named event; `indexed` holds one flag per input
    pub fn new(name: &str, inputs: TupleType, indexed: &[bool], anonymous: bool) -> Result<Event> {
        let indexed_params = inputs.sub_tuple_type(indexed)?;
        let non_indexed_params = inputs.sub_tuple_type_negative(indexed)?;
        Ok(Event {
            name: validate_name(name)?,
            inputs,
            indexed: indexed.to_vec(),
            anonymous,
            indexed_params,
            non_indexed_params,
        })
    }

    /// Per-input `indexed` flags
    pub fn indexed_manifest(&self) -> &[bool] {
        &self.indexed
    }

    /// Whether the event omits its signature topic
    pub fn is_anonymous(&self) -> bool {
        self.anonymous
    }

    /// Types of the parameters stored as topics
    pub fn indexed_params(&self) -> &TupleType {
        &self.indexed_params
    }

    /// Types of the parameters stored in the log data
    pub fn non_indexed_params(&self) -> &TupleType {
        &self.non_indexed_params
    }

    /// Decode the log data section
    pub fn decode_data(&self, data: &[u8]) -> Result<Tuple> {
        self.non_indexed_params.decode(data)
    }

    /// Index of the input named `param`
    pub fn param_index(&self, param: &str) -> Result<usize> {
        self.inputs
            .iter()
            .position(|t| t.name() == Some(param))
            .ok_or_else(|| AbiError::Shape(format!("no such param: \"{}\"", param)))
    }
}

impl AbiObject for Event {
    fn kind(&self) -> AbiKind {
        AbiKind::Event
    }

    fn name(&self) -> Option<&str> {
        Some(&self.name)
    }

    fn inputs(&self) -> &TupleType {
        &self.inputs
    }
}
