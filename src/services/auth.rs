use bcrypt::DEFAULT_COST;
use rusqlite::Connection;

use crate::db::queries;
use crate::errors::AppError;
use crate::models::{Role, User};
use crate::services::verification::VerificationStore;

/// Create an account. The password is stored only as a salted bcrypt hash.
pub fn register(conn: &Connection, email: &str, password: &str, role: Role) -> Result<(), AppError> {
    if queries::get_user(conn, email)?.is_some() {
        return Err(AppError::Conflict(format!(
            "user already exists with email {email}"
        )));
    }

    let password_hash =
        bcrypt::hash(password, DEFAULT_COST).map_err(|e| anyhow::anyhow!("bcrypt hash: {e}"))?;

    queries::insert_user(
        conn,
        &User {
            email: email.to_string(),
            password_hash,
            role,
        },
    )?;

    tracing::info!(email, role = role.as_str(), "new user registered");
    Ok(())
}

/// Check credentials against the stored hash. The result is advisory only;
/// no session or token is issued.
pub fn login(conn: &Connection, email: &str, password: &str, role: Role) -> Result<Role, AppError> {
    let user = queries::get_user(conn, email)?
        .ok_or_else(|| AppError::NotFound(format!("user {email}")))?;

    if user.role != role {
        return Err(AppError::RoleMismatch(user.role.as_str().to_string()));
    }

    let matches = bcrypt::verify(password, &user.password_hash)
        .map_err(|e| anyhow::anyhow!("bcrypt verify: {e}"))?;
    if !matches {
        return Err(AppError::InvalidCredentials);
    }

    tracing::info!(email, "user logged in");
    Ok(user.role)
}

/// Issue a reset code for an existing account. Returns Ok either way so the
/// endpoint cannot be used to probe which emails are registered. Delivery is
/// handled elsewhere; the code is only traced at debug level.
pub fn start_password_reset(
    conn: &Connection,
    store: &mut VerificationStore,
    email: &str,
) -> Result<(), AppError> {
    if queries::get_user(conn, email)?.is_none() {
        tracing::info!(email, "password reset requested for unknown email");
        return Ok(());
    }

    let code = store.issue(email);
    tracing::debug!(email, code, "password reset code issued");
    Ok(())
}

/// Consume a reset code and replace the stored password hash.
pub fn reset_password(
    conn: &Connection,
    store: &mut VerificationStore,
    email: &str,
    code: &str,
    new_password: &str,
) -> Result<(), AppError> {
    if new_password.len() < 6 {
        return Err(AppError::Validation(
            "password must be at least 6 characters".to_string(),
        ));
    }

    if !store.consume(email, code) {
        return Err(AppError::Validation(
            "invalid or expired reset code".to_string(),
        ));
    }

    let hash =
        bcrypt::hash(new_password, DEFAULT_COST).map_err(|e| anyhow::anyhow!("bcrypt hash: {e}"))?;

    if !queries::update_user_password(conn, email, &hash)? {
        return Err(AppError::NotFound(format!("user {email}")));
    }

    tracing::info!(email, "password reset");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;

    fn setup_db() -> Connection {
        db::init_db(":memory:").unwrap()
    }

    #[test]
    fn test_register_then_login() {
        let conn = setup_db();
        register(&conn, "a@x.com", "hunter22", Role::Tourist).unwrap();

        let role = login(&conn, "a@x.com", "hunter22", Role::Tourist).unwrap();
        assert_eq!(role, Role::Tourist);
    }

    #[test]
    fn test_duplicate_registration_conflicts() {
        let conn = setup_db();
        register(&conn, "a@x.com", "hunter22", Role::Tourist).unwrap();

        let err = register(&conn, "a@x.com", "other", Role::Guide).unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[test]
    fn test_password_never_stored_in_plaintext() {
        let conn = setup_db();
        register(&conn, "a@x.com", "hunter22", Role::Tourist).unwrap();

        let user = queries::get_user(&conn, "a@x.com").unwrap().unwrap();
        assert_ne!(user.password_hash, "hunter22");
        assert!(user.password_hash.starts_with("$2"));
    }

    #[test]
    fn test_login_unknown_email() {
        let conn = setup_db();
        let err = login(&conn, "nobody@x.com", "pw", Role::Tourist).unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[test]
    fn test_login_role_mismatch() {
        let conn = setup_db();
        register(&conn, "g@x.com", "hunter22", Role::Guide).unwrap();

        let err = login(&conn, "g@x.com", "hunter22", Role::Tourist).unwrap_err();
        match err {
            AppError::RoleMismatch(stored) => assert_eq!(stored, "guide"),
            other => panic!("expected RoleMismatch, got {other:?}"),
        }
    }

    #[test]
    fn test_login_wrong_password() {
        let conn = setup_db();
        register(&conn, "a@x.com", "hunter22", Role::Tourist).unwrap();

        let err = login(&conn, "a@x.com", "wrong", Role::Tourist).unwrap_err();
        assert!(matches!(err, AppError::InvalidCredentials));
    }

    #[test]
    fn test_password_reset_roundtrip() {
        let conn = setup_db();
        let mut store = VerificationStore::new();
        register(&conn, "a@x.com", "oldpassword", Role::Tourist).unwrap();

        start_password_reset(&conn, &mut store, "a@x.com").unwrap();
        assert_eq!(store.len(), 1);

        let err = reset_password(&conn, &mut store, "a@x.com", "not-it", "newpassword").unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_reset_for_unknown_email_issues_nothing() {
        let conn = setup_db();
        let mut store = VerificationStore::new();

        start_password_reset(&conn, &mut store, "ghost@x.com").unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_reset_with_valid_code_changes_password() {
        let conn = setup_db();
        let mut store = VerificationStore::new();
        register(&conn, "a@x.com", "oldpassword", Role::Tourist).unwrap();

        let code = store.issue("a@x.com");
        reset_password(&conn, &mut store, "a@x.com", &code, "newpassword").unwrap();

        assert!(login(&conn, "a@x.com", "oldpassword", Role::Tourist).is_err());
        login(&conn, "a@x.com", "newpassword", Role::Tourist).unwrap();
    }
}
