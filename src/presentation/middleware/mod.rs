pub mod validation;

pub use validation::{
    validate_command, validate_request, ValidatedCommand, ValidationMiddlewareError,
};
