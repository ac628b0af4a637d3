//! Dot-separated document paths.

pub(crate) fn join_path(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}.{key}")
    }
}

/// Whether `path` lies strictly below `ancestor`, i.e. `a.b` is below `a` but `ab` is not.
pub(crate) fn is_sub_path(path: &str, ancestor: &str) -> bool {
    path.strip_prefix(ancestor)
        .is_some_and(|rest| rest.starts_with('.'))
}
