//! Common type definitions.
//!
//! - [`DecryptionResult`]: classified outcome of a decryption attempt
//! - [`ProcessorMode`]: encryption or decryption, used by the front end
//! - [`Processing`]: the in-progress form of a mode, used for labels

use strum::{Display, EnumIter};

/// Outcome of a decryption attempt.
///
/// Anything other than [`DecryptionResult::Success`] means the output file
/// must not be trusted. The discriminants are stable and double as process
/// exit codes in the command line front end.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Display, EnumIter)]
#[repr(u8)]
pub enum DecryptionResult {
    /// No classification was made.
    #[default]
    #[strum(to_string = "unknown")]
    Unknown = 0,

    /// Tag, hash and length checks all passed.
    #[strum(to_string = "success")]
    Success = 1,

    /// The magic tag did not decrypt to the expected constant.
    ///
    /// Either the password is wrong or the input is not an intact
    /// container. The two causes cannot be told apart.
    #[strum(to_string = "wrong password or corrupted file")]
    FailedFileCorrupted = 2,

    /// The tag was valid but the payload hash did not match.
    #[strum(to_string = "content hash mismatch")]
    FailedHashesDoNotMatch = 3,

    /// Fewer payload bytes were recovered than the container declared.
    #[strum(to_string = "recovered size does not match declared size")]
    FailedFileSizesDoNotMatch = 4,
}

impl DecryptionResult {
    /// Numeric code of the result.
    #[inline]
    pub fn code(self) -> u8 {
        self as u8
    }

    #[inline]
    pub fn is_success(self) -> bool {
        self == Self::Success
    }
}

/// Represents the type of file operation to perform.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Display)]
pub enum ProcessorMode {
    /// Encrypt the file, producing a `.fce` output.
    Encrypt,

    /// Decrypt the file, removing the `.fce` extension.
    Decrypt,
}

/// Represents a processing operation in progress.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Display)]
pub enum Processing {
    #[strum(to_string = "Encrypting...")]
    Encryption,

    #[strum(to_string = "Decrypting...")]
    Decryption,
}

impl Processing {
    /// Converts a `Processing` to its corresponding `ProcessorMode`.
    #[inline]
    pub fn mode(self) -> ProcessorMode {
        match self {
            Self::Encryption => ProcessorMode::Encrypt,
            Self::Decryption => ProcessorMode::Decrypt,
        }
    }
}
