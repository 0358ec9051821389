use std::path::{Path, PathBuf};

use anyhow::bail;
use services::input::confirm;
use services::{Console, ConsoleInput, ModelConfig};
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tracing::warn;

/// Make sure `config` carries an API key, asking the user when it does not.
///
/// # Errors
///
/// Fails when no key is configured and the user does not provide one.
pub async fn ensure_api_key(
    console: &mut dyn Console,
    config: ModelConfig,
) -> anyhow::Result<ModelConfig> {
    if config.api_key.is_some() {
        return Ok(config);
    }

    console.say("OpenAI API key not found in the environment.");
    let key = match console.read_line("Please enter your OpenAI API key: ").await {
        ConsoleInput::Line(line) => line.trim().to_string(),
        ConsoleInput::TimedOut | ConsoleInput::Closed => String::new(),
    };
    if key.is_empty() {
        bail!("an OpenAI API key is required (set OPENAI_API_KEY or add it to .env)");
    }

    if confirm(
        console,
        "Would you like to save this API key to your ~/.bashrc? (y/n): ",
    )
    .await
    {
        match bashrc_path() {
            Some(path) => match append_export(&path, &key).await {
                Ok(()) => console.say(&format!(
                    "API key saved to {}. Run 'source ~/.bashrc' to load it in new shells.",
                    path.display()
                )),
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "could not update shell profile");
                    console.say(&format!("Could not write {}: {err}", path.display()));
                }
            },
            None => console.say("Could not locate your home directory; the key was not saved."),
        }
    }

    Ok(config.with_api_key(key))
}

fn bashrc_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".bashrc"))
}

/// Append an `export OPENAI_API_KEY=...` line to a shell profile.
async fn append_export(path: &Path, key: &str) -> std::io::Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await?;
    file.write_all(export_line(key).as_bytes()).await?;
    file.flush().await
}

fn export_line(key: &str) -> String {
    format!("\nexport OPENAI_API_KEY=\"{key}\"\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use services::ScriptedConsole;

    #[tokio::test]
    async fn configured_key_is_kept_without_prompting() {
        let mut console = ScriptedConsole::default();
        let transcript = console.transcript();
        let config = ensure_api_key(&mut console, ModelConfig::default().with_api_key("sk-env"))
            .await
            .unwrap();
        assert_eq!(config.api_key.as_deref(), Some("sk-env"));
        assert!(transcript.text().is_empty());
    }

    #[tokio::test]
    async fn prompted_key_is_used() {
        let mut console = ScriptedConsole::new(["  sk-typed  ", "n"]);
        let config = ensure_api_key(&mut console, ModelConfig::default())
            .await
            .unwrap();
        assert_eq!(config.api_key.as_deref(), Some("sk-typed"));
    }

    #[tokio::test]
    async fn missing_key_is_fatal() {
        let mut console = ScriptedConsole::new([""]);
        assert!(ensure_api_key(&mut console, ModelConfig::default()).await.is_err());
    }

    #[tokio::test]
    async fn export_line_is_appended() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".bashrc");
        tokio::fs::write(&path, "alias ll='ls -l'").await.unwrap();
        append_export(&path, "sk-123").await.unwrap();
        let contents = tokio::fs::read_to_string(&path).await.unwrap();
        assert_eq!(
            contents,
            "alias ll='ls -l'\nexport OPENAI_API_KEY=\"sk-123\"\n"
        );
    }
}
