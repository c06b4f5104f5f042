//! Packaging tool invocation
//!
//! The external releaser consumes the staging directory and produces
//! the npm packages. Its stdout/stderr are inherited so its own output
//! lands on the operator's terminal unmodified.

use gh2npm_config::{constants, RunConfig};
use gh2npm_errors::{Error, PackagingError};
use gh2npm_events::{Event, EventSender, EventSenderExt};
use std::process::Stdio;
use tokio::process::Command;

/// Build the releaser argument vector for one release version
///
/// The publish flag is withheld on dry runs; the no-prefix flag is
/// included only when configured.
#[must_use]
pub fn pack_args(config: &RunConfig, version: &str) -> Vec<String> {
    let mut args = vec![
        "-n".to_string(),
        config.name.clone(),
        "-r".to_string(),
        version.to_string(),
        "--license".to_string(),
        config.license.clone(),
        "--homepage".to_string(),
        config.homepage.clone(),
        "--repository".to_string(),
        format!("github:{}/{}", config.owner, config.repo),
        "--package-name-prefix".to_string(),
        constants::PACKAGE_NAME_PREFIX.to_string(),
    ];

    if config.no_prefix_for_main_package {
        args.push("--no-prefix-for-main-package".to_string());
    }
    if config.publish {
        args.push("--publish".to_string());
    }

    args
}

/// Run the external releaser for one version and wait for it to exit
///
/// # Errors
///
/// Returns [`PackagingError`] if the tool cannot be started, exits
/// nonzero, or is killed by a signal.
pub async fn invoke_releaser(
    config: &RunConfig,
    version: &str,
    tx: &EventSender,
) -> Result<(), Error> {
    let command = config.releaser_path.display().to_string();

    if !config.publish {
        tx.emit(Event::DryRunNotice);
    }
    tx.emit(Event::PackagingStarted {
        command: command.clone(),
        version: version.to_string(),
    });

    let status = Command::new(&config.releaser_path)
        .args(pack_args(config, version))
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .await
        .map_err(|e| PackagingError::SpawnFailed {
            command: command.clone(),
            message: e.to_string(),
        })?;

    if status.success() {
        tx.emit(Event::PackagingCompleted {
            version: version.to_string(),
        });
        return Ok(());
    }

    match status.code() {
        Some(code) => Err(PackagingError::ExitFailure { command, code }.into()),
        None => Err(PackagingError::Terminated { command }.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(no_prefix: bool, publish: bool) -> RunConfig {
        let mut config: RunConfig = serde_json::from_str(
            r#"{
                "Owner": "lotabout",
                "Repo": "skim",
                "Name": "sk",
                "License": "MIT",
                "Homepage": "https://github.com/lotabout/skim"
            }"#,
        )
        .unwrap();
        config.no_prefix_for_main_package = no_prefix;
        config.publish = publish;
        config
    }

    #[test]
    fn test_pack_args_base_shape() {
        let args = pack_args(&config(false, false), "1.2.3");
        assert_eq!(
            args,
            vec![
                "-n",
                "sk",
                "-r",
                "1.2.3",
                "--license",
                "MIT",
                "--homepage",
                "https://github.com/lotabout/skim",
                "--repository",
                "github:lotabout/skim",
                "--package-name-prefix",
                "@install-binary/",
            ]
        );
    }

    #[test]
    fn test_pack_args_publish_flag() {
        let args = pack_args(&config(false, true), "1.0.0");
        assert!(args.contains(&"--publish".to_string()));
        assert!(!args.contains(&"--no-prefix-for-main-package".to_string()));
    }

    #[test]
    fn test_pack_args_no_prefix_flag() {
        let args = pack_args(&config(true, false), "1.0.0");
        assert!(args.contains(&"--no-prefix-for-main-package".to_string()));
        assert!(!args.contains(&"--publish".to_string()));
    }
}
