use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tracing::debug;

use crate::error::{ControlError, Result};

#[cfg(windows)]
const CREATE_NO_WINDOW: u32 = 0x0800_0000;

/// Run a PowerShell script and return its trimmed stdout.
pub async fn run_powershell(program: &str, script: &str, timeout: Duration) -> Result<String> {
    debug!(program, "Executing PowerShell:\n{}", script.trim());

    let mut command = Command::new(program);
    command
        .arg("-NoProfile")
        .arg("-NonInteractive")
        .arg("-Command")
        .arg(script)
        .stdin(Stdio::null())
        .kill_on_drop(true);
    #[cfg(windows)]
    command.creation_flags(CREATE_NO_WINDOW);

    // Dropping the future on timeout kills the child
    let output = match tokio::time::timeout(timeout, command.output()).await {
        Ok(result) => result.map_err(ControlError::Spawn)?,
        Err(_) => {
            debug!(?timeout, "PowerShell timed out");
            return Err(ControlError::Timeout(timeout));
        }
    };

    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
    if !output.status.success() {
        debug!(status = %output.status, %stderr, "PowerShell failed");
        return Err(ControlError::ScriptFailed {
            status: output.status,
            stderr,
        });
    }
    if !stderr.is_empty() {
        debug!(%stderr, "PowerShell stderr");
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Characters PowerShell accepts as a single-quote delimiter.
const SINGLE_QUOTES: [char; 5] = ['\'', '\u{2018}', '\u{2019}', '\u{201A}', '\u{201B}'];

/// Quote a value as a single-quoted PowerShell literal. Every quote
/// character, typographic ones included, is escaped by doubling it.
pub fn ps_quote(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('\'');
    for c in value.chars() {
        if SINGLE_QUOTES.contains(&c) {
            quoted.push(c);
        }
        quoted.push(c);
    }
    quoted.push('\'');
    quoted
}

/// Scripts report their verdict on the last line of stdout.
pub fn last_line(output: &str) -> &str {
    output.lines().last().map(str::trim).unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ps_quote_doubles_single_quotes() {
        assert_eq!(ps_quote("Spotify.exe"), "'Spotify.exe'");
        assert_eq!(ps_quote("it's"), "'it''s'");
        assert_eq!(ps_quote("$(rm -r ~)"), "'$(rm -r ~)'");
    }

    #[test]
    fn test_ps_quote_doubles_typographic_quotes() {
        let quoted = ps_quote("Evil\u{2019}; Stop-Process -Name explorer; \u{2018}x\u{201A}\u{201B}");
        assert_eq!(
            quoted,
            "'Evil\u{2019}\u{2019}; Stop-Process -Name explorer; \u{2018}\u{2018}x\u{201A}\u{201A}\u{201B}\u{201B}'"
        );

        // Inside the literal every quote character comes in pairs
        let inner: Vec<char> = quoted.chars().skip(1).collect();
        let inner = &inner[..inner.len() - 1];
        let mut i = 0;
        while i < inner.len() {
            if SINGLE_QUOTES.contains(&inner[i]) {
                assert_eq!(inner.get(i + 1), Some(&inner[i]));
                i += 2;
            } else {
                i += 1;
            }
        }
    }

    #[test]
    fn test_last_line() {
        assert_eq!(last_line(""), "");
        assert_eq!(last_line("Success"), "Success");
        assert_eq!(last_line("noise\r\nRejected\r\n"), "Rejected");
    }

    #[tokio::test]
    async fn test_missing_program_is_spawn_error() {
        let err = run_powershell(
            "mediactl-no-such-powershell",
            "'hi'",
            Duration::from_secs(5),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ControlError::Spawn(_)));
    }
}
