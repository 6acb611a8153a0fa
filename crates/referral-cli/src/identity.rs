//! Acting-user resolution for CLI commands.
//!
//! The resolution chain: `--user` flag > `REFERRAL_USER` env > `user` in the
//! user config > `USER` env (TTY only). `register` needs an identity; read
//! commands work without one.

use std::env;

use referral_core::error::ErrorCode;

/// Environment reader trait for dependency injection in tests.
trait EnvReader {
    fn get(&self, key: &str) -> Option<String>;
    fn is_tty(&self) -> bool;
}

/// Real environment reader.
struct RealEnv;

impl EnvReader for RealEnv {
    fn get(&self, key: &str) -> Option<String> {
        env::var(key).ok().filter(|v| !v.trim().is_empty())
    }

    fn is_tty(&self) -> bool {
        use std::io::IsTerminal;
        std::io::stdin().is_terminal()
    }
}

fn resolve_user_with(
    cli_flag: Option<&str>,
    config_user: Option<&str>,
    env: &dyn EnvReader,
) -> Option<String> {
    if let Some(user) = cli_flag.map(str::trim).filter(|u| !u.is_empty()) {
        return Some(user.to_string());
    }

    if let Some(val) = env.get("REFERRAL_USER") {
        return Some(val.trim().to_string());
    }

    if let Some(user) = config_user.map(str::trim).filter(|u| !u.is_empty()) {
        return Some(user.to_string());
    }

    if env.is_tty() {
        if let Some(val) = env.get("USER") {
            return Some(val.trim().to_string());
        }
    }

    None
}

/// Resolve the acting user, if any source names one.
pub fn resolve_user(cli_flag: Option<&str>, config_user: Option<&str>) -> Option<String> {
    resolve_user_with(cli_flag, config_user, &RealEnv)
}

/// Resolve the acting user or fail with [`ErrorCode::MissingIdentity`].
pub fn require_user(
    cli_flag: Option<&str>,
    config_user: Option<&str>,
) -> Result<String, ErrorCode> {
    resolve_user(cli_flag, config_user).ok_or(ErrorCode::MissingIdentity)
}
