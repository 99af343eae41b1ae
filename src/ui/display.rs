//! Outcome messages.

use std::path::Path;

use bytesize::ByteSize;
use console::style;
use filecrypt_rs::DecryptionResult;
use filecrypt_rs::types::ProcessorMode;

/// Human readable size, e.g. `1.5 KiB`.
pub fn format_bytes(bytes: u64) -> String {
    ByteSize::b(bytes).to_string()
}

pub fn show_success(mode: ProcessorMode, path: &Path, bytes: u64) {
    let action = match mode {
        ProcessorMode::Encrypt => "encrypted",
        ProcessorMode::Decrypt => "decrypted",
    };

    println!();
    println!("{} {}", style("✓").green(), style(format!("File {action} successfully: {} ({})", path.display(), format_bytes(bytes))).bold());
}

/// Reports a non-success decryption result. `discarded` names the partial
/// output that was removed, if any.
pub fn show_failure(result: DecryptionResult, discarded: Option<&Path>) {
    eprintln!();
    eprintln!("{} {}", style("✗").red(), style(format!("Decryption failed: {result} (code {})", result.code())).bold());

    if let Some(path) = discarded {
        eprintln!("  {}", style(format!("Partial output removed: {}", path.display())).dim());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(0), "0 B");
        assert_eq!(format_bytes(500), "500 B");
        let large = format_bytes(300_000);
        assert!(large.contains("KiB") || large.contains("kB"), "{large}");
    }
}
