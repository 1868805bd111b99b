use std::path::{Path, PathBuf};

/// Expand environment variables in a path string.
///
/// Supports `$VAR`, `${VAR}` and `~` for the home directory.
/// Falls back to the input when a variable is undefined.
pub fn expand_env_vars(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}

pub fn expand_path(path: &Path) -> PathBuf {
    PathBuf::from(expand_env_vars(path.to_string_lossy().as_ref()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_undefined_variable_when_expanding_then_returns_input() {
        let input = "$QUERYTREE_SURELY_UNDEFINED_VAR/seed.toml";
        assert_eq!(expand_env_vars(input), input);
    }

    #[test]
    fn given_tilde_when_expanding_then_uses_home() {
        let home = std::env::var("HOME").expect("HOME should be set");
        let expanded = expand_path(Path::new("~/seed.toml"));
        assert!(expanded.starts_with(&home));
    }
}
