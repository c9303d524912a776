// Resume document generation: payload validation, date handling, document
// assembly and the HTTP handler that serves the result.

pub mod assembler;
pub mod dates;
pub mod handlers;
pub mod validation;
