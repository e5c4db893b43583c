use arena_views::{LoginForm, RegistrationForm};
use colored::Colorize;

use super::App;
use crate::prompt::ask;

pub async fn login(app: &App, username: String, password: Option<String>) -> anyhow::Result<()> {
    let password = match password {
        Some(password) => password,
        None => ask("Password: ")?,
    };

    let user = app.auth.login(&LoginForm { username, password }).await?;
    println!("Logged in as {}", user.username.bold());

    Ok(())
}

pub async fn register(app: &App, username: String, email: String) -> anyhow::Result<()> {
    let password = ask("Password: ")?;
    let confirm_password = ask("Repeat password: ")?;

    let form = RegistrationForm {
        username,
        email,
        password,
        confirm_password,
    };

    let user = app.auth.register(&form).await?;
    println!("Welcome to the arena, {}!", user.username.bold());

    Ok(())
}

pub fn logout(app: &App) -> anyhow::Result<()> {
    app.auth.logout();
    println!("Logged out");

    Ok(())
}

pub async fn whoami(app: &App) -> anyhow::Result<()> {
    if !app.auth.is_authenticated() {
        println!("{}", "Not logged in".bright_black());
        return Ok(());
    }

    let user = app.auth.refresh().await?;

    println!("{} <{}>", user.username.bold(), user.email);

    if let Some(tag) = user.clash_tag {
        println!("Player tag: {}", tag);
    }

    if let Some(role) = user.role {
        println!("Role: {}", role);
    }

    Ok(())
}
