use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use super::common::{last_line, ps_quote, run_powershell};
use crate::config::Config;
use crate::error::{ControlError, Result};
use crate::media::parse::parse_sessions;
use crate::media::{Action, MediaController, MediaSession};

/// Shared by every session script: loads the WinRT projection, defines
/// `Await` for `IAsyncOperation<T>`, and fetches the session manager.
const PRELUDE: &str = r#"
[Console]::OutputEncoding = [System.Text.Encoding]::UTF8
Add-Type -AssemblyName System.Runtime.WindowsRuntime
$asTaskGeneric = ([System.WindowsRuntimeSystemExtensions].GetMethods() | Where-Object {
    $_.Name -eq 'AsTask' -and $_.GetParameters().Count -eq 1 -and
    $_.GetParameters()[0].ParameterType.Name -eq 'IAsyncOperation`1'
})[0]
function Await($operation, [Type]$resultType) {
    $task = $asTaskGeneric.MakeGenericMethod($resultType).Invoke($null, @($operation))
    $task.Wait(-1) | Out-Null
    $task.Result
}
[Windows.Media.Control.GlobalSystemMediaTransportControlsSessionManager,Windows.Media.Control,ContentType=WindowsRuntime] | Out-Null
$manager = Await ([Windows.Media.Control.GlobalSystemMediaTransportControlsSessionManager]::RequestAsync()) ([Windows.Media.Control.GlobalSystemMediaTransportControlsSessionManager])
"#;

const LIST_SESSIONS: &str = r#"
function Get-FriendlyName([string]$appId) {
    $stem = $appId -replace '\.exe$', ''
    try {
        $proc = Get-Process -Name $stem -ErrorAction SilentlyContinue | Select-Object -First 1
        if ($proc) {
            $description = $proc.MainModule.FileVersionInfo.FileDescription
            if ($description) { return $description }
            return $proc.ProcessName
        }
    } catch {}
    if ($appId -match '\.exe$') { return $stem }
    try {
        $package = Get-AppxPackage | Where-Object {
            $_.PackageFamilyName -like "*$appId*" -or $_.Name -like "*$appId*"
        } | Select-Object -First 1
        if ($package -and $package.Name) { return $package.Name }
    } catch {}
    # Firefox registers under an opaque hash instead of its executable
    $firefox = Get-Process -Name firefox -ErrorAction SilentlyContinue | Select-Object -First 1
    if ($firefox) {
        try {
            $description = $firefox.MainModule.FileVersionInfo.FileDescription
            if ($description) { return $description }
        } catch {}
        return 'Firefox'
    }
    return $appId
}

$results = @()
foreach ($session in $manager.GetSessions()) {
    $appId = $session.SourceAppUserModelId
    $entry = [ordered]@{
        appName = Get-FriendlyName $appId
        appId = $appId
        title = ''
        artist = ''
        playbackStatus = $session.GetPlaybackInfo().PlaybackStatus.ToString()
    }
    try {
        $media = Await ($session.TryGetMediaPropertiesAsync()) ([Windows.Media.Control.GlobalSystemMediaTransportControlsSessionMediaProperties])
        if ($media) {
            $entry.title = [string]$media.Title
            $entry.artist = [string]$media.Artist
        }
    } catch {}
    $results += [pscustomobject]$entry
}
$results | ConvertTo-Json -Compress
"#;

const INVOKE_SESSION: &str = r#"
$target = __APP_ID__
$session = $manager.GetSessions() | Where-Object { $_.SourceAppUserModelId -eq $target } | Select-Object -First 1
if ($session) {
    if (Await ($session.Try__VERB__Async()) ([bool])) { 'Success' } else { 'Rejected' }
}
"#;

const INVOKE_CURRENT: &str = r#"
$session = $manager.GetCurrentSession()
if (-not $session) { 'NoSession' }
elseif (Await ($session.Try__VERB__Async()) ([bool])) { 'Success' }
else { 'Rejected' }
"#;

// The here-string terminator must start at column 0.
const PRESS_MEDIA_KEY: &str = r#"
[Console]::OutputEncoding = [System.Text.Encoding]::UTF8
Add-Type -Language CSharp -TypeDefinition @"
using System;
using System.Runtime.InteropServices;
public static class MediactlKeys {
    [DllImport("user32.dll")]
    private static extern void keybd_event(byte bVk, byte bScan, uint dwFlags, UIntPtr dwExtraInfo);
    private const uint KEYEVENTF_EXTENDEDKEY = 0x1;
    private const uint KEYEVENTF_KEYUP = 0x2;
    public static void Press(byte vk) {
        keybd_event(vk, 0, KEYEVENTF_EXTENDEDKEY, UIntPtr.Zero);
        keybd_event(vk, 0, KEYEVENTF_EXTENDEDKEY | KEYEVENTF_KEYUP, UIntPtr.Zero);
    }
}
"@
[MediactlKeys]::Press(__KEY__)
'Success'
"#;

/// Talks to the Global System Media Transport Controls through PowerShell.
pub struct PowerShellController {
    program: String,
    timeout: Duration,
}

impl PowerShellController {
    pub fn new(config: &Config) -> Self {
        Self {
            program: config.powershell.clone(),
            timeout: config.timeout(),
        }
    }

    async fn run(&self, script: &str) -> Result<String> {
        run_powershell(&self.program, script, self.timeout).await
    }
}

fn session_script(body: &str) -> String {
    format!("{PRELUDE}{body}")
}

pub(crate) fn invoke_script(app_id: &str, action: Action) -> String {
    session_script(
        &INVOKE_SESSION
            .replace("__APP_ID__", &ps_quote(app_id))
            .replace("__VERB__", action.verb()),
    )
}

pub(crate) fn invoke_current_script(action: Action) -> String {
    session_script(&INVOKE_CURRENT.replace("__VERB__", action.verb()))
}

pub(crate) fn media_key_script(action: Action) -> String {
    PRESS_MEDIA_KEY.replace("__KEY__", &format!("0x{:X}", action.media_key()))
}

#[async_trait]
impl MediaController for PowerShellController {
    async fn list_sessions(&self) -> Result<Vec<MediaSession>> {
        let output = self.run(&session_script(LIST_SESSIONS)).await?;
        parse_sessions(&output)
    }

    async fn invoke(&self, app_id: &str, action: Action) -> Result<()> {
        let output = self.run(&invoke_script(app_id, action)).await?;
        match last_line(&output) {
            "Success" => Ok(()),
            "Rejected" => Err(ControlError::Rejected { action }),
            _ => Err(ControlError::SessionClosed(app_id.to_string())),
        }
    }

    async fn invoke_current(&self, action: Action) -> Result<()> {
        let output = self.run(&invoke_current_script(action)).await?;
        match last_line(&output) {
            "Success" => Ok(()),
            "Rejected" => Err(ControlError::UnsupportedAction { action }),
            _ => Err(ControlError::NoCurrentSession),
        }
    }

    async fn simulate_key(&self, action: Action) -> Result<()> {
        debug!(key = action.key_label(), "Simulating media key press");
        self.run(&media_key_script(action)).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invoke_script_targets_exact_id() {
        let script = invoke_script("O'Brien.App!Player", Action::SkipNext);
        assert!(script.contains("$target = 'O''Brien.App!Player'"));
        assert!(script.contains("$session.TrySkipNextAsync()"));
        assert!(script.starts_with(PRELUDE));
        assert!(!script.contains("__"));
    }

    #[test]
    fn test_current_script_uses_current_session() {
        let script = invoke_current_script(Action::TogglePlayPause);
        assert!(script.contains("GetCurrentSession()"));
        assert!(script.contains("TryTogglePlayPauseAsync()"));
    }

    #[test]
    fn test_media_key_script() {
        let script = media_key_script(Action::SkipPrevious);
        assert!(script.contains("[MediactlKeys]::Press(0xB1)"));
        assert!(script.contains("\n\"@\n"));
    }

    #[test]
    fn test_scripts_emit_utf8() {
        let encoding = "[Console]::OutputEncoding = [System.Text.Encoding]::UTF8";
        for script in [
            session_script(LIST_SESSIONS),
            invoke_script("Spotify.exe", Action::Play),
            invoke_current_script(Action::Pause),
            media_key_script(Action::Stop),
        ] {
            assert!(script.trim_start().starts_with(encoding), "{script}");
        }
    }
}
