//! Persisted SELinux mode rewrite.
//!
//! `/etc/selinux/config` is a `KEY=value` file. Every line whose trimmed form
//! starts with `SELINUX=` is replaced by `SELINUX=disabled`; every other line
//! (comments, `SELINUXTYPE=`, blank lines) is kept byte for byte, in order.

/// Result of rewriting a config file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigRewrite {
    /// The full new file content.
    pub content: String,
    /// How many lines were replaced.
    pub replaced: usize,
}

/// Replace every `key=...` line in `content` with `key=value`.
///
/// Leading and trailing whitespace is ignored when matching, so an indented
/// `  SELINUX=enforcing` is replaced too. A replaced line always ends with
/// `\n`, even when it was the unterminated last line. Applying the rewrite to
/// its own output changes nothing.
pub fn rewrite_config(content: &str, key: &str, value: &str) -> ConfigRewrite {
    let prefix = format!("{}=", key);
    let replacement = format!("{}={}\n", key, value);

    let mut rewritten = String::with_capacity(content.len());
    let mut replaced = 0;

    for line in content.split_inclusive('\n') {
        if line.trim().starts_with(&prefix) {
            rewritten.push_str(&replacement);
            replaced += 1;
        } else {
            rewritten.push_str(line);
        }
    }

    ConfigRewrite {
        content: rewritten,
        replaced,
    }
}
