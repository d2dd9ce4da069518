use std::fmt::Display;

use thiserror::Error;

use crate::Position;

#[derive(Debug, Clone)]
pub struct Error {
    internal_error: ErrorImpl,
    position: Position,
}

impl Error {
    pub fn new(error_impl: ErrorImpl, position: Position) -> Self {
        Error {
            internal_error: error_impl,
            position,
        }
    }

    pub fn get_position(&self) -> &Position {
        &self.position
    }

    pub fn get_impl(&self) -> &ErrorImpl {
        &self.internal_error
    }

    /// Whether the error came from the caller's expected result kind
    /// rather than from a node inside the tree.
    pub fn is_expectation(&self) -> bool {
        matches!(self.internal_error, ErrorImpl::UnexpectedResultType { .. })
    }

    pub fn get_error_name(&self) -> &str {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => "UnrecognisedToken",
            ErrorImpl::UnexpectedToken { .. } => "UnexpectedToken",
            ErrorImpl::UnexpectedTokenDetailed { .. } => "UnexpectedTokenDetailed",
            ErrorImpl::NumberParseError { .. } => "NumberParseError",
            ErrorImpl::UnknownName { .. } => "UnknownName",
            ErrorImpl::AmbiguousIdentifier { .. } => "AmbiguousIdentifier",
            ErrorImpl::UnknownNamespace { .. } => "UnknownNamespace",
            ErrorImpl::UnknownBuiltin { .. } => "UnknownBuiltin",
            ErrorImpl::MissingArguments { .. } => "MissingArguments",
            ErrorImpl::UnexpectedArguments { .. } => "UnexpectedArguments",
            ErrorImpl::InvalidUnaryOperation { .. } => "InvalidUnaryOperation",
            ErrorImpl::InvalidBinaryOperation { .. } => "InvalidBinaryOperation",
            ErrorImpl::ArgumentTypeMatchError { .. } => "ArgumentTypeMatchError",
            ErrorImpl::NonBoolCondition { .. } => "NonBoolCondition",
            ErrorImpl::MapKeyMismatch { .. } => "MapKeyMismatch",
            ErrorImpl::NonIntegerIndex { .. } => "NonIntegerIndex",
            ErrorImpl::NonIntegerSliceIndex { .. } => "NonIntegerSliceIndex",
            ErrorImpl::BuiltinTakesArray { .. } => "BuiltinTakesArray",
            ErrorImpl::ClosureShouldReturnBool { .. } => "ClosureShouldReturnBool",
            ErrorImpl::ClosureSignature => "ClosureSignature",
            ErrorImpl::InvalidLenArgument { .. } => "InvalidLenArgument",
            ErrorImpl::BuiltinArity { .. } => "BuiltinArity",
            ErrorImpl::BuiltinArgumentType { .. } => "BuiltinArgumentType",
            ErrorImpl::NoSuchField { .. } => "NoSuchField",
            ErrorImpl::NoSuchMethod { .. } => "NoSuchMethod",
            ErrorImpl::UndefinedIndex { .. } => "UndefinedIndex",
            ErrorImpl::CannotSlice { .. } => "CannotSlice",
            ErrorImpl::NoReturnValue { .. } => "NoReturnValue",
            ErrorImpl::TooManyReturnValues { .. } => "TooManyReturnValues",
            ErrorImpl::PointerOutsideClosure => "PointerOutsideClosure",
            ErrorImpl::NotAnArray { .. } => "NotAnArray",
            ErrorImpl::NotCallable { .. } => "NotCallable",
            ErrorImpl::InvalidPattern { .. } => "InvalidPattern",
            ErrorImpl::UnknownOperator { .. } => "UnknownOperator",
            ErrorImpl::ConstantInvoked { .. } => "ConstantInvoked",
            ErrorImpl::UnexpectedResultType { .. } => "UnexpectedResultType",
            ErrorImpl::NestingTooDeep { .. } => "NestingTooDeep",
        }
    }

    pub fn get_tip(&self) -> ErrorTip {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => ErrorTip::None,
            ErrorImpl::UnexpectedToken { token } => {
                ErrorTip::Suggestion(format!("Unexpected token: `{}`", token))
            }
            ErrorImpl::UnexpectedTokenDetailed { token, message } => {
                ErrorTip::Suggestion(format!("Unexpected token: `{}`, {}", token, message))
            }
            ErrorImpl::NumberParseError { token } => ErrorTip::Suggestion(format!(
                "Invalid number: `{}`, is it above the integer limit?",
                token
            )),
            ErrorImpl::UnknownName { name } => ErrorTip::Suggestion(format!(
                "`{}` is not defined in the environment",
                name
            )),
            ErrorImpl::AmbiguousIdentifier { name } => ErrorTip::Suggestion(format!(
                "`{}` is promoted from more than one embedded member",
                name
            )),
            ErrorImpl::MissingArguments { .. } | ErrorImpl::UnexpectedArguments { .. } => {
                ErrorTip::Suggestion(self.internal_error.to_string())
            }
            ErrorImpl::PointerOutsideClosure => ErrorTip::Suggestion(String::from(
                "`#` is only available inside the closure of all, none, any, one, filter, map and count",
            )),
            ErrorImpl::ConstantInvoked { .. } => {
                ErrorTip::Suggestion(String::from("Remove the parentheses"))
            }
            ErrorImpl::NestingTooDeep { .. } => ErrorTip::Suggestion(String::from(
                "Split the expression or bind part of it in the environment",
            )),
            _ => ErrorTip::Suggestion(self.internal_error.to_string()),
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.internal_error)
    }
}

impl std::error::Error for Error {}

pub enum ErrorTip {
    None,
    Suggestion(String),
}

impl Display for ErrorTip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorTip::None => write!(f, ""),
            ErrorTip::Suggestion(suggestion) => write!(f, "{}", suggestion),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ErrorImpl {
    // Lexing and parsing
    #[error("unrecognised token: {token:?}")]
    UnrecognisedToken { token: String },
    #[error("unexpected token: {token:?}")]
    UnexpectedToken { token: String },
    #[error("unexpected token ({message}): {token:?}")]
    UnexpectedTokenDetailed { token: String, message: String },
    #[error("error parsing number: {token:?}")]
    NumberParseError { token: String },

    // Binding
    #[error("unknown name {name}")]
    UnknownName { name: String },
    #[error("ambiguous identifier {name}")]
    AmbiguousIdentifier { name: String },
    #[error("there is no builtin namespace {namespace}")]
    UnknownNamespace { namespace: String },
    #[error("{name} does not exist in {namespace}")]
    UnknownBuiltin { namespace: String, name: String },

    // Arity
    #[error("not enough arguments to call {function}")]
    MissingArguments { function: String },
    #[error("too many arguments to call {function}")]
    UnexpectedArguments { function: String },

    // Type mismatch
    #[error("invalid operation: {operator} (mismatched type {operand})")]
    InvalidUnaryOperation { operator: String, operand: String },
    #[error("invalid operation: {operator} (mismatched types {left} and {right})")]
    InvalidBinaryOperation {
        operator: String,
        left: String,
        right: String,
    },
    #[error("cannot use {received} as argument (type {expected}) to call {function}")]
    ArgumentTypeMatchError {
        function: String,
        expected: String,
        received: String,
    },
    #[error("non-bool expression (type {received}) used as condition")]
    NonBoolCondition { received: String },
    #[error("cannot use {key} to get an element from {map}")]
    MapKeyMismatch { key: String, map: String },
    #[error("array elements can only be selected using an integer (got {received})")]
    NonIntegerIndex { received: String },
    #[error("non-integer slice index {received}")]
    NonIntegerSliceIndex { received: String },
    #[error("builtin {builtin} takes only array (got {received})")]
    BuiltinTakesArray { builtin: String, received: String },
    #[error("closure should return boolean (got {received})")]
    ClosureShouldReturnBool { received: String },
    #[error("closure should has one input and one output param")]
    ClosureSignature,
    #[error("invalid argument for len (type {received})")]
    InvalidLenArgument { received: String },
    #[error("{builtin} expects {expected} as input")]
    BuiltinArity { builtin: String, expected: String },
    #[error("{builtin} expects {expected} as input - got: {received}")]
    BuiltinArgumentType {
        builtin: String,
        expected: String,
        received: String,
    },

    // Structural
    #[error("type {base} has no field {name}")]
    NoSuchField { base: String, name: String },
    #[error("type {base} has no method {name}")]
    NoSuchMethod { base: String, name: String },
    #[error("type {base}[{property}] is undefined")]
    UndefinedIndex { base: String, property: String },
    #[error("cannot slice {received}")]
    CannotSlice { received: String },
    #[error("func {function} doesn't return value")]
    NoReturnValue { function: String },
    #[error("func {function} returns more then two values")]
    TooManyReturnValues { function: String },

    // Usage
    #[error("cannot use pointer accessor outside closure")]
    PointerOutsideClosure,
    #[error("cannot use {received} as array")]
    NotAnArray { received: String },
    #[error("{received} is not callable")]
    NotCallable { received: String },
    #[error("{message}")]
    InvalidPattern { message: String },
    #[error("unknown operator ({operator})")]
    UnknownOperator { operator: String },
    #[error("{constant} is a constant - it cannot be invoked")]
    ConstantInvoked { constant: String },

    // Expectation
    #[error("expected {expected}, but got {received}")]
    UnexpectedResultType { expected: String, received: String },

    // Limits
    #[error("expression is nested too deeply (more than {limit} levels)")]
    NestingTooDeep { limit: usize },
}
