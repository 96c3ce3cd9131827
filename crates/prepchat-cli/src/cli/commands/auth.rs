//! Login, register and logout handlers.

use std::io::{BufRead, Write};

use anyhow::{Context, Result, bail};
use prepchat_core::api::ApiClient;
use prepchat_core::auth::Credentials;

pub async fn login(base_url: &str, email: &str, password: Option<&str>) -> Result<()> {
    let password = resolve_password(password)?;
    let client = ApiClient::new(base_url);
    let token = client
        .login(email, &password)
        .await
        .context("login failed")?;

    Credentials::new(token).save().context("store credentials")?;
    println!("Logged in as {email}");
    Ok(())
}

pub async fn register(base_url: &str, email: &str, password: Option<&str>) -> Result<()> {
    let password = resolve_password(password)?;
    let client = ApiClient::new(base_url);
    let user_id = client
        .register(email, &password)
        .await
        .context("registration failed")?;

    println!("Registered {email} (user {user_id}). You can now log in.");
    Ok(())
}

pub fn logout() -> Result<()> {
    Credentials::clear().context("clear credentials")?;
    println!("Logged out");
    Ok(())
}

/// Uses the flag value when given, otherwise prompts on stdin.
fn resolve_password(flag: Option<&str>) -> Result<String> {
    if let Some(password) = flag {
        return Ok(password.to_string());
    }

    print!("Password: ");
    std::io::stdout().flush().context("flush stdout")?;

    let mut line = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut line)
        .context("read password")?;
    let password = line.trim_end_matches(['\r', '\n']);
    if password.is_empty() {
        bail!("No password provided");
    }
    Ok(password.to_string())
}
