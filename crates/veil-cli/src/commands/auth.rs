use anyhow::Result;
use colored::Colorize;
use veil_application::AuthError;
use veil_application::workflow::Notification;
use veil_core::session::{AuthState, Credentials};

use crate::context::AppContext;
use crate::output::{self, fail};

pub async fn register(ctx: &AppContext, credentials: Credentials) -> Result<()> {
    match ctx.session.register(&credentials).await {
        Ok(()) => {
            output::notify(&Notification::registered());
            Ok(())
        }
        Err(AuthError::Invalid(_)) => Err(fail(&Notification::missing_credentials())),
        Err(e) => Err(fail(&Notification::registration_failed(e.user_message()))),
    }
}

pub async fn login(ctx: &AppContext, credentials: Credentials) -> Result<()> {
    match ctx.session.login(&credentials).await {
        Ok(_) => {
            output::notify(&Notification::login_succeeded());
            Ok(())
        }
        Err(AuthError::Invalid(_)) => Err(fail(&Notification::missing_credentials())),
        Err(e) => Err(fail(&Notification::login_failed(e.user_message()))),
    }
}

pub fn logout(ctx: &AppContext) -> Result<()> {
    ctx.session.logout()?;
    println!("{} Logged out.", "✓".green());
    Ok(())
}

pub fn status(ctx: &AppContext) -> Result<()> {
    let state = match ctx.session.state() {
        AuthState::Authenticated => "logged in".green(),
        AuthState::Anonymous | AuthState::Unknown => "not logged in".yellow(),
    };
    println!("Session:  {}", state);
    println!("Service:  {}", ctx.config.base_url);
    println!("Config:   {}", ctx.paths.config_dir().display());
    Ok(())
}
