mod errors;
mod jwt;

pub use errors::CredentialError;
pub use jwt::{Credential, decode_credential, decode_credential_with, decode_role};
