//! Function descriptors and selectors

use std::fmt;
use std::str::FromStr;

use bach_crypto::{Hasher256, Keccak256Hasher};
use tracing::debug;

use crate::decode::Reader;
use crate::error::{AbiError, Result};
use crate::types::TupleType;
use crate::value::{Tuple, Value};

const RECEIVE: &str = "receive";
const PAYABLE: &str = "payable";

/// Kind of an ABI descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AbiKind {
    /// Regular named function
    Function,
    /// Plain ether receiver
    Receive,
    /// Catch-all function
    Fallback,
    /// Contract constructor
    Constructor,
    /// Log event
    Event,
    /// Custom error
    Error,
}

impl AbiKind {
    /// Name as written in JSON ABI descriptors
    pub fn as_str(&self) -> &'static str {
        match self {
            AbiKind::Function => "function",
            AbiKind::Receive => "receive",
            AbiKind::Fallback => "fallback",
            AbiKind::Constructor => "constructor",
            AbiKind::Event => "event",
            AbiKind::Error => "error",
        }
    }
}

impl fmt::Display for AbiKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AbiKind {
    type Err = AbiError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "function" => Ok(AbiKind::Function),
            "receive" => Ok(AbiKind::Receive),
            "fallback" => Ok(AbiKind::Fallback),
            "constructor" => Ok(AbiKind::Constructor),
            "event" => Ok(AbiKind::Event),
            "error" => Ok(AbiKind::Error),
            _ => Err(unexpected_kind(s)),
        }
    }
}

fn unexpected_kind(kind: &str) -> AbiError {
    AbiError::Descriptor(format!("unexpected type: \"{}\"", kind))
}

/// Common view of functions, events and errors
pub trait AbiObject {
    /// Descriptor kind
    fn kind(&self) -> AbiKind;

    /// Name, if the descriptor has one
    fn name(&self) -> Option<&str>;

    /// Input parameter types
    fn inputs(&self) -> &TupleType;

    /// `name` followed by the canonical input tuple
    fn canonical_signature(&self) -> String {
        format!("{}{}", self.name().unwrap_or(""), self.inputs().canonical_type())
    }

    /// Whether this is a function-like descriptor
    fn is_function(&self) -> bool {
        matches!(
            self.kind(),
            AbiKind::Function | AbiKind::Receive | AbiKind::Fallback | AbiKind::Constructor
        )
    }

    /// Whether this is an event
    fn is_event(&self) -> bool {
        self.kind() == AbiKind::Event
    }

    /// Whether this is a custom error
    fn is_contract_error(&self) -> bool {
        self.kind() == AbiKind::Error
    }
}

/// A contract function: encodes calls and decodes call data and return data
///
/// ```
/// use bach_abi::{tuple, Function};
///
/// let f = Function::parse("baz(uint32,bool)").unwrap();
/// assert_eq!(f.selector_hex(), "cdcd77c0");
///
/// let call = f.encode_call(&tuple![69i64, true]).unwrap();
/// assert_eq!(call.len(), 4 + 64);
/// assert_eq!(f.decode_call(&call).unwrap(), tuple![69i64, true]);
/// ```
#[derive(Debug, Clone)]
pub struct Function {
    kind: AbiKind,
    name: Option<String>,
    inputs: TupleType,
    outputs: TupleType,
    state_mutability: Option<String>,
    hash_algorithm: &'static str,
    selector: [u8; 4],
}

impl Function {
    /// Length of a selector in bytes
    pub const SELECTOR_LEN: usize = 4;

    /// Parse a signature such as `"transfer(address,uint256)"`; no outputs
    pub fn parse(signature: &str) -> Result<Function> {
        Self::parse_with_hasher(signature, "()", &mut Keccak256Hasher::new())
    }

    /// Parse a signature and an output tuple type string
    pub fn parse_with_outputs(signature: &str, outputs: &str) -> Result<Function> {
        Self::parse_with_hasher(signature, outputs, &mut Keccak256Hasher::new())
    }

    /// Parse a signature and output types, deriving the selector with `hasher`
    pub fn parse_with_hasher(
        signature: &str,
        outputs: &str,
        hasher: &mut dyn Hasher256,
    ) -> Result<Function> {
        let params_start = signature
            .find('(')
            .ok_or_else(|| AbiError::Grammar("params start not found".to_string()))?;
        let inputs = TupleType::parse(&signature[params_start..])?;
        Self::with_hasher(
            AbiKind::Function,
            Some(&signature[..params_start]),
            inputs,
            TupleType::parse(outputs)?,
            None,
            hasher,
        )
    }

    /// Build a descriptor using Keccak-256 for the selector
    pub fn new(
        kind: AbiKind,
        name: Option<&str>,
        inputs: TupleType,
        outputs: TupleType,
        state_mutability: Option<&str>,
    ) -> Result<Function> {
        Self::with_hasher(
            kind,
            name,
            inputs,
            outputs,
            state_mutability,
            &mut Keccak256Hasher::new(),
        )
    }

    /// Build a descriptor whose selector is derived with `hasher`
    pub fn with_hasher(
        kind: AbiKind,
        name: Option<&str>,
        inputs: TupleType,
        outputs: TupleType,
        state_mutability: Option<&str>,
        hasher: &mut dyn Hasher256,
    ) -> Result<Function> {
        let name = name.map(validate_name).transpose()?;
        let mut function = Function {
            kind,
            name,
            inputs,
            outputs,
            state_mutability: state_mutability.map(str::to_string),
            hash_algorithm: hasher.algorithm(),
            selector: [0u8; Self::SELECTOR_LEN],
        };
        function.validate_kind()?;

        let digest = hasher.digest(function.canonical_signature().as_bytes());
        function
            .selector
            .copy_from_slice(&digest[..Self::SELECTOR_LEN]);

        debug!(
            signature = %function.canonical_signature(),
            selector = %function.selector_hex(),
            algorithm = function.hash_algorithm,
            "function built"
        );
        Ok(function)
    }

    fn validate_kind(&self) -> Result<()> {
        match self.kind {
            AbiKind::Function => {
                if self.name.is_none() {
                    return Err(self.rule_violation("define name"));
                }
                Ok(())
            }
            AbiKind::Receive | AbiKind::Fallback | AbiKind::Constructor => {
                if self.kind == AbiKind::Receive {
                    if self.name.as_deref() != Some(RECEIVE) {
                        return Err(self.rule_violation("define name as \"receive\""));
                    }
                    if self.state_mutability.as_deref() != Some(PAYABLE) {
                        return Err(self.rule_violation("define stateMutability as \"payable\""));
                    }
                }
                if self.kind != AbiKind::Constructor && !self.inputs.is_empty() {
                    return Err(self.rule_violation("define no inputs"));
                }
                if !self.outputs.is_empty() {
                    return Err(self.rule_violation("define no outputs"));
                }
                if self.name.is_some() && self.kind != AbiKind::Receive {
                    return Err(self.rule_violation("not define name"));
                }
                Ok(())
            }
            AbiKind::Event | AbiKind::Error => Err(unexpected_kind(self.kind.as_str())),
        }
    }

    fn rule_violation(&self, rule: &str) -> AbiError {
        AbiError::Descriptor(format!(
            "type is \"{}\"; functions of this type must {}",
            self.kind, rule
        ))
    }

    /// Output parameter types
    pub fn outputs(&self) -> &TupleType {
        &self.outputs
    }

    /// `pure`, `view`, `payable`, ...
    pub fn state_mutability(&self) -> Option<&str> {
        self.state_mutability.as_deref()
    }

    /// Identifier of the selector hash algorithm
    pub fn hash_algorithm(&self) -> &'static str {
        self.hash_algorithm
    }

    /// The 4-byte selector
    pub fn selector(&self) -> [u8; Self::SELECTOR_LEN] {
        self.selector
    }

    /// Selector as 8 lowercase hex characters
    pub fn selector_hex(&self) -> String {
        hex::encode(self.selector)
    }

    /// Length of the call data for `args`, after validating them
    pub fn measure_call_length(&self, args: &Tuple) -> Result<usize> {
        Ok(Self::SELECTOR_LEN + self.inputs.validate(args)?)
    }

    /// Selector followed by the encoded arguments
    pub fn encode_call(&self, args: &Tuple) -> Result<Vec<u8>> {
        let mut out = Vec::with_capacity(self.measure_call_length(args)?);
        out.extend_from_slice(&self.selector);
        self.inputs.encode_into(args, &mut out)?;
        Ok(out)
    }

    /// [`Function::encode_call`] from a list of argument values
    pub fn encode_call_with_args(&self, args: Vec<Value>) -> Result<Vec<u8>> {
        self.encode_call(&Tuple::new(args))
    }

    /// Append the call data for `args` to `out`; nothing is written if `args` is invalid
    pub fn encode_call_into(&self, args: &Tuple, out: &mut Vec<u8>) -> Result<()> {
        let len = self.measure_call_length(args)?;
        out.reserve(len);
        out.extend_from_slice(&self.selector);
        self.inputs.encode_into(args, out)
    }

    /// Check the selector, then decode the arguments that follow it
    pub fn decode_call(&self, call: &[u8]) -> Result<Tuple> {
        let mut reader = Reader::new(call, 0);
        let found = reader.read_bytes(Self::SELECTOR_LEN)?;
        if found != &self.selector[..] {
            return Err(AbiError::Format(format!(
                "given selector does not match: expected: {}, found: {}",
                self.selector_hex(),
                hex::encode(found)
            )));
        }
        self.inputs
            .decode_from(&mut reader)
            .and_then(|args| reader.finish().map(|_| args))
            .inspect_err(|e| debug!(selector = %self.selector_hex(), error = %e, "call decode failed"))
    }

    /// Decode return data against the output types
    pub fn decode_return(&self, data: &[u8]) -> Result<Tuple> {
        self.outputs.decode(data)
    }

    /// Decode return data consisting of a single encoded value of the first output type
    pub fn decode_single_return(&self, data: &[u8]) -> Result<Value> {
        let output = self.outputs.get(0).ok_or_else(|| {
            AbiError::Shape(format!(
                "{} declares no outputs",
                self.canonical_signature()
            ))
        })?;
        output.decode(data)
    }
}

impl AbiObject for Function {
    fn kind(&self) -> AbiKind {
        self.kind
    }

    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn inputs(&self) -> &TupleType {
        &self.inputs
    }
}

impl PartialEq for Function {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
            && self.name == other.name
            && self.inputs == other.inputs
            && self.outputs == other.outputs
            && self.state_mutability == other.state_mutability
            && self.hash_algorithm == other.hash_algorithm
            && self.selector == other.selector
    }
}

impl Eq for Function {}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.canonical_signature())?;
        if !self.outputs.is_empty() {
            write!(f, " returns {}", self.outputs)?;
        }
        Ok(())
    }
}

/// Names must be ASCII and contain no `(`
pub(crate) fn validate_name(name: &str) -> Result<String> {
    match name.char_indices().find(|(_, c)| !c.is_ascii() || *c == '(') {
        Some((index, c)) => Err(AbiError::Grammar(format!(
            "illegal char {:#x} '{}' @ index {}",
            c as u32, c, index
        ))),
        None => Ok(name.to_string()),
    }
}
