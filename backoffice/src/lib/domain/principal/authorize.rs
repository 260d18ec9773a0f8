use crate::principal::errors::PrincipalError;
use crate::principal::models::Principal;
use crate::principal::models::Role;

/// Check that a resolved principal's role is in the allowed set.
///
/// Pure set-membership test, order-independent. An empty allowed set rejects
/// every principal. Identity resolution must already have happened; this
/// check never consults the store.
///
/// # Errors
/// * `Forbidden` - The principal's role is not in the allowed set
pub fn authorize(principal: &Principal, allowed: &[Role]) -> Result<(), PrincipalError> {
    if allowed.contains(&principal.role) {
        Ok(())
    } else {
        Err(PrincipalError::Forbidden {
            role: principal.role,
            allowed: allowed.to_vec(),
        })
    }
}
