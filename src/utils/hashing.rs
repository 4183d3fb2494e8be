use bcrypt::{BcryptError, hash, verify};

pub fn hash_password(password: &str, cost: u32) -> Result<String, BcryptError> {
    hash(password, cost)
}

pub fn verify_password(password: &str, hashed: &str) -> Result<bool, BcryptError> {
    verify(password, hashed)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_COST: u32 = 4;

    #[test]
    fn hashes_are_salted_and_verifiable() {
        let first = hash_password("secret123", TEST_COST).unwrap();
        let second = hash_password("secret123", TEST_COST).unwrap();
        assert_ne!(first, second);
        assert!(verify_password("secret123", &first).unwrap());
        assert!(!verify_password("secret124", &first).unwrap());
    }
}
