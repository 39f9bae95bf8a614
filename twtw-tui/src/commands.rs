// File: twtw-tui/src/commands.rs

use twtw_core::TwitchTweaks;
use twtw_core::services::command_service::COMMANDS;

use crate::console_host::ConsoleHost;

/// Handles one input line. Returns `(quit_requested, output)`.
///
/// Lines starting with a client command (`/join`, `/part`, ...) act on the
/// console host; everything else is offered to the plugin.
pub async fn dispatch(
    line: &str,
    host: &ConsoleHost,
    plugin: &TwitchTweaks,
) -> (bool, Option<String>) {
    let parts: Vec<&str> = line.split_whitespace().collect();
    let cmd = parts.first().copied().unwrap_or("").to_lowercase();
    let args = parts.get(1..).unwrap_or(&[]);

    match cmd.as_str() {
        "/quit" | "/exit" => (true, None),
        "/help" => (false, Some(help())),
        "/join" => {
            let Some(name) = args.first() else {
                return (false, Some("Usage: /join <#channel>".to_string()));
            };
            match host.join(name) {
                Some(channel) => {
                    plugin.on_join(host.server(), host.host_name(), &channel).await;
                    (false, Some(format!("Joined {}", channel)))
                }
                None => (false, Some(format!("Already in {}", name))),
            }
        }
        "/part" => {
            let Some(name) = args.first() else {
                return (false, Some("Usage: /part <#channel>".to_string()));
            };
            if host.part(name) {
                (false, Some(format!("Left {}", name)))
            } else {
                (false, Some(format!("Not in {}", name)))
            }
        }
        "/channels" => (false, Some(host.describe_channels())),
        _ => {
            if plugin.handle_command(line).await {
                (false, None)
            } else {
                (false, Some(format!("Unknown command: {}", line)))
            }
        }
    }
}

fn help() -> String {
    let mut out = String::from(
        "\
Client commands:
  /join <#channel>
  /part <#channel>
  /channels
  /quit
Plugin commands:
",
    );
    for (name, usage) in COMMANDS {
        out.push_str(&format!("  {:<12} {}\n", name, usage));
    }
    out
}
