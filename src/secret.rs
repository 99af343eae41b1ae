use secrecy::{ExposeSecret, ExposeSecretMut, SecretBox, SecretString};

use crate::config::KEY_SIZE;

/// Derived AES-256 key, zeroized on drop.
pub struct SecretKey {
    inner: SecretBox<[u8; KEY_SIZE]>,
}

impl SecretKey {
    pub fn zeroed() -> Self {
        Self { inner: SecretBox::new(Box::new([0u8; KEY_SIZE])) }
    }

    pub fn from_array(key: [u8; KEY_SIZE]) -> Self {
        Self { inner: SecretBox::new(Box::new(key)) }
    }

    pub fn expose_secret(&self) -> &[u8; KEY_SIZE] {
        self.inner.expose_secret()
    }

    pub fn expose_secret_mut(&mut self) -> &mut [u8; KEY_SIZE] {
        self.inner.expose_secret_mut()
    }
}

impl std::fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SecretKey([... {KEY_SIZE} bytes ...])")
    }
}

/// User password, zeroized on drop.
pub struct Password {
    inner: SecretString,
}

impl Password {
    pub fn new(password: &str) -> Self {
        Self { inner: SecretString::from(password.to_owned()) }
    }

    pub fn from_string(password: String) -> Self {
        Self { inner: SecretString::from(password) }
    }

    pub fn expose_secret(&self) -> &str {
        self.inner.expose_secret()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.expose_secret().is_empty()
    }
}

impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Password([REDACTED])")
    }
}
