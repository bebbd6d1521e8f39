//! Interactive y/N confirmation on the terminal

use async_trait::async_trait;
use dialoguer::{theme::ColorfulTheme, Confirm};

use fintrack_core::{Confirmation, ConfirmationRequest};

pub struct StdinConfirmation;

#[async_trait]
impl Confirmation for StdinConfirmation {
    /// Defaults to no; a prompt that cannot be shown declines
    async fn confirm(&self, request: &ConfirmationRequest) -> bool {
        let message = request.message.clone();
        let answer = tokio::task::spawn_blocking(move || {
            Confirm::with_theme(&ColorfulTheme::default())
                .with_prompt(message)
                .default(false)
                .interact()
        })
        .await;

        match answer {
            Ok(Ok(answer)) => answer,
            Ok(Err(e)) => {
                log::warn!("Could not read confirmation: {}", e);
                false
            }
            Err(e) => {
                log::warn!("Confirmation prompt aborted: {}", e);
                false
            }
        }
    }
}
