use rand::distributions::Alphanumeric;
use rand::{thread_rng, Rng};

/// Generates an alphanumeric secret of the given length. Used for account
/// api keys and for auto-generated admin secrets.
pub fn create_random_secret(secret_len: usize) -> String {
    thread_rng()
        .sample_iter(&Alphanumeric)
        .take(secret_len)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generates_secret_of_requested_length() {
        for len in [1, 16, 64] {
            assert_eq!(create_random_secret(len).len(), len);
        }
    }

    #[test]
    fn generates_distinct_secrets() {
        assert_ne!(create_random_secret(32), create_random_secret(32));
    }
}
