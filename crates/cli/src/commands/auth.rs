//! Login and logout commands.

#![allow(clippy::print_stdout)]

use std::io::{BufRead, Write};

use secrecy::SecretString;

use bakeline_client::Bakeline;
use bakeline_client::error::{ApiError, Result};

fn read_password() -> Result<SecretString> {
    print!("password: ");
    std::io::stdout()
        .flush()
        .map_err(|e| ApiError::Validation(e.to_string()))?;
    let mut line = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut line)
        .map_err(|e| ApiError::Validation(e.to_string()))?;
    Ok(SecretString::from(line.trim_end().to_string()))
}

/// Log in and persist the session token.
pub async fn login(app: &Bakeline, email: &str, password: Option<String>) -> Result<()> {
    let password = match password {
        Some(password) => SecretString::from(password),
        None => read_password()?,
    };

    let user = app.auth().login(email, &password).await?;
    match user.and_then(|user| user.name) {
        Some(name) => println!("logged in as {name}"),
        None => println!("logged in"),
    }
    Ok(())
}

/// Log out and drop the stored session.
pub async fn logout(app: &Bakeline) {
    app.auth().logout().await;
    println!("logged out");
}
