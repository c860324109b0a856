// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Adapter choices made from the config file

use async_trait::async_trait;
use rota_adapters::{
    ApplyError, CommandSetter, DesktopNotifier, NoOpNotifyAdapter, NoOpSetter, NotifyAdapter,
    NotifyError, WallpaperSetter,
};
use rota_core::{ApplyTarget, ScalingPolicy};

use crate::config::DaemonConfig;

/// Configured command, or nothing when no command is set
#[derive(Clone, Debug)]
pub enum DaemonSetter {
    Command(CommandSetter),
    NoOp(NoOpSetter),
}

impl DaemonSetter {
    pub fn from_config(config: &DaemonConfig) -> Self {
        match &config.setter.command {
            Some(command) => DaemonSetter::Command(
                CommandSetter::new(command.clone()).with_timeout(config.setter.timeout),
            ),
            None => DaemonSetter::NoOp(NoOpSetter::new()),
        }
    }
}

#[async_trait]
impl WallpaperSetter for DaemonSetter {
    async fn apply(
        &self,
        image: &str,
        target: ApplyTarget,
        scaling: ScalingPolicy,
    ) -> Result<(), ApplyError> {
        match self {
            DaemonSetter::Command(setter) => setter.apply(image, target, scaling).await,
            DaemonSetter::NoOp(setter) => setter.apply(image, target, scaling).await,
        }
    }
}

#[derive(Clone, Debug)]
pub enum DaemonNotifier {
    Desktop(DesktopNotifier),
    Silent(NoOpNotifyAdapter),
}

impl DaemonNotifier {
    pub fn from_config(config: &DaemonConfig) -> Self {
        if config.notify.enabled {
            DaemonNotifier::Desktop(DesktopNotifier::new())
        } else {
            DaemonNotifier::Silent(NoOpNotifyAdapter::new())
        }
    }
}

#[async_trait]
impl NotifyAdapter for DaemonNotifier {
    async fn notify(&self, title: &str, message: &str) -> Result<(), NotifyError> {
        match self {
            DaemonNotifier::Desktop(notifier) => notifier.notify(title, message).await,
            DaemonNotifier::Silent(notifier) => notifier.notify(title, message).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn setter_follows_config() {
        let mut config = DaemonConfig::default();
        assert!(matches!(
            DaemonSetter::from_config(&config),
            DaemonSetter::NoOp(_)
        ));

        config.setter.command = Some("true".to_string());
        assert!(matches!(
            DaemonSetter::from_config(&config),
            DaemonSetter::Command(_)
        ));
    }

    #[tokio::test]
    async fn noop_setter_accepts_everything() {
        let setter = DaemonSetter::from_config(&DaemonConfig::default());
        assert!(setter
            .apply("/img/a.jpg", ApplyTarget::Both, ScalingPolicy::Fill)
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn command_setter_reports_failure() {
        let mut config = DaemonConfig::default();
        config.setter.command = Some("exit 3".to_string());
        let err = DaemonSetter::from_config(&config)
            .apply("/img/a.jpg", ApplyTarget::Home, ScalingPolicy::Fill)
            .await
            .unwrap_err();
        assert!(matches!(err, ApplyError::CommandFailed { code: Some(3), .. }));
    }

    #[tokio::test]
    async fn command_setter_uses_configured_timeout() {
        let mut config = DaemonConfig::default();
        config.setter.command = Some("sleep 5".to_string());
        config.setter.timeout = std::time::Duration::from_millis(100);
        let err = DaemonSetter::from_config(&config)
            .apply("/img/a.jpg", ApplyTarget::Home, ScalingPolicy::Fill)
            .await
            .unwrap_err();
        assert!(matches!(err, ApplyError::TimedOut(_)));
    }

    #[test]
    fn notifier_follows_config() {
        let mut config = DaemonConfig::default();
        assert!(matches!(
            DaemonNotifier::from_config(&config),
            DaemonNotifier::Desktop(_)
        ));
        config.notify.enabled = false;
        assert!(matches!(
            DaemonNotifier::from_config(&config),
            DaemonNotifier::Silent(_)
        ));
    }
}
