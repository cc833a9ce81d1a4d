use crate::error::CompileError;

/// Reject names the shell cannot assign to. Only hyphens are checked.
pub(crate) fn check_identifier(name: &str) -> Result<&str, CompileError> {
    if name.contains('-') {
        return Err(CompileError::invalid_identifier(name));
    }
    Ok(name)
}

/// Turn a rendered array or key name into a shell identifier for the hash helpers.
pub fn mangle(name: &str) -> String {
    name.replace('-', "__")
        .replace('.', "_DOT_")
        .replace('/', "_SLASH_")
}
