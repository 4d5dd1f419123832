//! Explicit user confirmation for destructive operations.

/// Asks the user to approve a destructive operation (delete, import-replace).
///
/// Returning `false` aborts the operation with no state change.
pub trait Confirm {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: Fn(&str) -> bool,
{
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}
