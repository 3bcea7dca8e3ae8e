use bcrypt::{hash, verify};
use rand::distributions::Alphanumeric;
use rand::Rng;

use crate::error::AppError;

// bcrypt is CPU-bound, so both calls run on the blocking pool.

pub async fn hash_password(plain: String, cost: u32) -> Result<String, AppError> {
    tokio::task::spawn_blocking(move || hash(plain, cost))
        .await
        .map_err(|e| AppError::internal(format!("Hash task failed: {e}")))?
        .map_err(|e| AppError::internal(format!("Hash error: {e}")))
}

pub async fn verify_password(plain: String, password_hash: String) -> Result<bool, AppError> {
    tokio::task::spawn_blocking(move || verify(plain, &password_hash))
        .await
        .map_err(|e| AppError::internal(format!("Verify task failed: {e}")))?
        .map_err(|e| AppError::internal(format!("Password verify error: {e}")))
}

pub const RESET_TOKEN_LEN: usize = 32;

/// Random alphanumeric one-time token for password resets.
pub fn generate_reset_token() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(RESET_TOKEN_LEN)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    // Minimum bcrypt cost keeps the tests fast
    const TEST_COST: u32 = 4;

    #[tokio::test]
    async fn hash_verifies_only_the_original_password() {
        let hashed = hash_password("hunter22".into(), TEST_COST).await.unwrap();
        assert_ne!(hashed, "hunter22");
        assert!(verify_password("hunter22".into(), hashed.clone()).await.unwrap());
        assert!(!verify_password("hunter23".into(), hashed).await.unwrap());
    }

    #[test]
    fn reset_tokens_are_alphanumeric_and_unique() {
        let a = generate_reset_token();
        let b = generate_reset_token();
        assert_eq!(a.len(), RESET_TOKEN_LEN);
        assert!(a.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn malformed_hash_is_an_error() {
        assert!(verify_password("anything".into(), "not-a-bcrypt-hash".into()).await.is_err());
    }
}
